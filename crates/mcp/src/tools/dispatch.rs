#![forbid(unsafe_code)]

use crate::McpServer;
use serde_json::Value;

pub(crate) fn dispatch_tool(server: &mut McpServer, name: &str, args: Value) -> Option<Value> {
    let resp = match name {
        "beats_init" => server.tool_beats_init(args),
        "beats_snapshot" => server.tool_beats_snapshot(args),
        "beats_stats" => server.tool_beats_stats(args),
        "dependency_add" => server.tool_dependency_add(args),
        "dependency_remove" => server.tool_dependency_remove(args),
        "dependency_update" => server.tool_dependency_update(args),
        "dependency_cycle_check" => server.tool_dependency_cycle_check(args),
        "beats_validate" => server.tool_beats_validate(args),
        "beats_impact" => server.tool_beats_impact(args),
        "beats_order" => server.tool_beats_order(args),
        "beats_suggest_order" => server.tool_beats_suggest_order(args),
        "beats_causality" => server.tool_beats_causality(args),
        "beats_reorder_check" => server.tool_beats_reorder_check(args),
        "beats_prerequisites" => server.tool_beats_prerequisites(args),
        "beats_dependents" => server.tool_beats_dependents(args),
        "beats_visualize" => server.tool_beats_visualize(args),
        _ => return None,
    };
    Some(resp.unwrap_or_else(|err| err))
}
