#![forbid(unsafe_code)]

use crate::projects::ProjectRegistry;
use crate::{McpServer, ProjectId};
use serde_json::{Value, json};
use std::sync::Arc;

impl McpServer {
    pub(crate) fn new(projects: Arc<ProjectRegistry>, default_project: Option<ProjectId>) -> Self {
        Self {
            initialized: false,
            projects,
            default_project,
        }
    }

    pub(crate) fn handle(&mut self, request: crate::JsonRpcRequest) -> Option<Value> {
        let method = request.method.as_str();

        if method == "initialize" {
            return Some(crate::json_rpc_response(
                request.id,
                json!({
                    "protocolVersion": crate::MCP_VERSION,
                    "serverInfo": { "name": crate::SERVER_NAME, "version": crate::SERVER_VERSION },
                    "capabilities": { "tools": {} }
                }),
            ));
        }

        if !self.initialized && method != "notifications/initialized" {
            return Some(crate::json_rpc_error(
                request.id,
                -32002,
                "Server not initialized",
            ));
        }

        if method == "notifications/initialized" {
            self.initialized = true;
            return None;
        }

        if method == "ping" {
            return Some(crate::json_rpc_response(request.id, json!({})));
        }

        if method == "tools/list" {
            return Some(crate::json_rpc_response(
                request.id,
                json!({ "tools": crate::tools::tool_definitions() }),
            ));
        }

        if method == "tools/call" {
            let Some(params_obj) = request.params.as_ref().and_then(|v| v.as_object()) else {
                return Some(crate::json_rpc_error(
                    request.id,
                    -32602,
                    "params must be an object",
                ));
            };

            let tool_name = params_obj
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or("");
            let args = params_obj
                .get("arguments")
                .cloned()
                .unwrap_or_else(|| json!({}));
            let response_body = self.call_tool(tool_name, args);

            return Some(crate::json_rpc_response(
                request.id,
                json!({
                    "content": [crate::tool_text_content(&response_body)],
                    "isError": !response_body.get("success").and_then(|v| v.as_bool()).unwrap_or(false)
                }),
            ));
        }

        // Notifications never get a response, known or not.
        if request.id.is_none() {
            return None;
        }

        Some(crate::json_rpc_error(
            request.id,
            -32601,
            &format!("Method not found: {method}"),
        ))
    }

    pub(crate) fn call_tool(&mut self, name: &str, args: Value) -> Value {
        match crate::tools::dispatch_tool(self, name, args) {
            Some(resp) => resp,
            None => crate::ai_error_with(
                "UNKNOWN_TOOL",
                &format!("Unknown tool: {name}"),
                Some("Call tools/list to see the available tools."),
                Value::Null,
            ),
        }
    }

    /// Explicit `project` argument, else the configured default.
    pub(crate) fn resolve_project(&self, args: &crate::Args) -> Result<ProjectId, Value> {
        match crate::optional_string(args, "project")? {
            Some(raw) => ProjectId::try_new(raw.trim())
                .map_err(|err| crate::ai_error("INVALID_INPUT", &format!("project: {}", err.message()))),
            None => self.default_project.clone().ok_or_else(|| {
                crate::ai_error_with(
                    "INVALID_INPUT",
                    "project is required",
                    Some("Pass project or start the server with --project."),
                    Value::Null,
                )
            }),
        }
    }

    /// Runs `f` against an initialized project's graph, holding its lock for the call.
    pub(crate) fn with_project<T>(
        &self,
        project: &ProjectId,
        f: impl FnOnce(&mut bg_core::graph::BeatGraph) -> T,
    ) -> Result<T, Value> {
        self.projects.with_graph(project, f).ok_or_else(|| {
            let known = self
                .projects
                .project_ids()
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>();
            crate::ai_error_with(
                "UNKNOWN_PROJECT",
                &format!("unknown project: {project}"),
                Some("call beats_init first"),
                json!({ "project": project.as_str(), "known": known }),
            )
        })
    }

    pub(crate) fn projects(&self) -> &ProjectRegistry {
        &self.projects
    }
}
