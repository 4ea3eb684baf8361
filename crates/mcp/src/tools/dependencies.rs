#![forbid(unsafe_code)]

use super::render::dependency_json;
use crate::*;
use bg_core::graph::{Dependency, DependencyType, DependencyUpdate, Strength};
use serde_json::{Value, json};

impl McpServer {
    pub(crate) fn tool_dependency_add(&mut self, args: Value) -> Result<Value, Value> {
        let args = args_object(args)?;
        let project = self.resolve_project(&args)?;
        let id = require_dependency_id(&args, "id")?;
        let source_id = require_beat_id(&args, "sourceId")?;
        let target_id = require_beat_id(&args, "targetId")?;
        let dep_type = optional_dependency_type(&args, "type")?.unwrap_or(DependencyType::Sequential);
        let strength = optional_strength(&args, "strength")?.unwrap_or(Strength::Required);

        let mut dependency = Dependency::new(id, source_id, target_id, strength).with_type(dep_type);
        dependency.description = optional_string(&args, "description")?;

        let (result, unknown) = self.with_project(&project, |graph| {
            let unknown = [&dependency.source_id, &dependency.target_id]
                .into_iter()
                .filter(|id| !graph.contains_beat(id))
                .cloned()
                .collect::<Vec<_>>();
            (graph.add_edge(dependency.clone()), unknown)
        })?;
        result.map_err(mutation_error)?;

        let mut warnings = Vec::new();
        if !unknown.is_empty() {
            warnings.push(warning(
                "ORPHAN_DEPENDENCY",
                &format!("unknown beat(s): {}", unknown.join(", ")),
            ));
        }
        Ok(ai_ok_with_warnings(
            "dependency_add",
            json!({ "dependency": dependency_json(&dependency) }),
            warnings,
        ))
    }

    pub(crate) fn tool_dependency_remove(&mut self, args: Value) -> Result<Value, Value> {
        let args = args_object(args)?;
        let project = self.resolve_project(&args)?;
        let id = require_dependency_id(&args, "id")?;

        let removed = self.with_project(&project, |graph| graph.remove_edge(&id))?;
        let warnings = match removed {
            Some(_) => Vec::new(),
            None => vec![warning("NOT_FOUND", &format!("no dependency with id '{id}'"))],
        };
        Ok(ai_ok_with_warnings(
            "dependency_remove",
            json!({
                "removed": removed.is_some(),
                "dependency": removed.as_ref().map(dependency_json)
            }),
            warnings,
        ))
    }

    pub(crate) fn tool_dependency_update(&mut self, args: Value) -> Result<Value, Value> {
        let args = args_object(args)?;
        let project = self.resolve_project(&args)?;
        let id = require_dependency_id(&args, "id")?;
        let update = DependencyUpdate {
            source_id: optional_beat_id(&args, "sourceId")?,
            target_id: optional_beat_id(&args, "targetId")?,
            dep_type: optional_dependency_type(&args, "type")?,
            strength: optional_strength(&args, "strength")?,
            description: optional_nullable_string(&args, "description")?,
        };

        let dependency = self
            .with_project(&project, |graph| graph.update_edge(&id, update))?
            .map_err(mutation_error)?;
        Ok(ai_ok(
            "dependency_update",
            json!({ "dependency": dependency_json(&dependency) }),
        ))
    }

    pub(crate) fn tool_dependency_cycle_check(&mut self, args: Value) -> Result<Value, Value> {
        let args = args_object(args)?;
        let project = self.resolve_project(&args)?;
        let source_id = require_beat_id(&args, "sourceId")?;
        let target_id = require_beat_id(&args, "targetId")?;

        let path = self.with_project(&project, |graph| graph.cycle_path(&source_id, &target_id))?;
        Ok(ai_ok(
            "dependency_cycle_check",
            json!({
                "sourceId": source_id,
                "targetId": target_id,
                "wouldCreateCycle": path.is_some(),
                "path": path
            }),
        ))
    }
}
