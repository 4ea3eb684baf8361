#![forbid(unsafe_code)]

use super::render::{impact_json, order_json, reorder_json, validation_json, visualization_json};
use crate::*;
use bg_core::graph::{BeatGraph, Positions};
use serde_json::{Value, json};

/// Stored `order` of every beat, used when the caller sends no positions.
fn stored_positions(graph: &BeatGraph) -> Positions {
    graph
        .beats()
        .into_iter()
        .map(|beat| (beat.id, beat.order))
        .collect()
}

fn unknown_beat_warnings(graph: &BeatGraph, beat_id: &str) -> Vec<Value> {
    if graph.contains_beat(beat_id) {
        return Vec::new();
    }
    vec![warning(
        "UNKNOWN_BEAT",
        &format!("beat '{beat_id}' is not part of the graph"),
    )]
}

fn unknown_position_warnings(graph: &BeatGraph, positions: Option<&Positions>) -> Vec<Value> {
    let Some(positions) = positions else {
        return Vec::new();
    };
    let mut unknown: Vec<&str> = positions
        .keys()
        .map(String::as_str)
        .filter(|id| !graph.contains_beat(id))
        .collect();
    unknown.sort_unstable();
    unknown
        .into_iter()
        .flat_map(|id| unknown_beat_warnings(graph, id))
        .collect()
}

impl McpServer {
    pub(crate) fn tool_beats_validate(&mut self, args: Value) -> Result<Value, Value> {
        let args = args_object(args)?;
        let project = self.resolve_project(&args)?;
        let positions = optional_positions(&args, "positions")?;

        let (report, warnings) = self.with_project(&project, |graph| {
            let warnings = unknown_position_warnings(graph, positions.as_ref());
            let positions = positions.unwrap_or_else(|| stored_positions(graph));
            (graph.validate(&positions), warnings)
        })?;
        Ok(ai_ok_with_warnings(
            "beats_validate",
            validation_json(&report),
            warnings,
        ))
    }

    pub(crate) fn tool_beats_impact(&mut self, args: Value) -> Result<Value, Value> {
        let args = args_object(args)?;
        let project = self.resolve_project(&args)?;
        let beat_id = require_beat_id(&args, "beatId")?;

        let (impact, warnings) = self.with_project(&project, |graph| {
            (graph.analyze_impact(&beat_id), unknown_beat_warnings(graph, &beat_id))
        })?;
        Ok(ai_ok_with_warnings("beats_impact", impact_json(&impact), warnings))
    }

    pub(crate) fn tool_beats_order(&mut self, args: Value) -> Result<Value, Value> {
        let args = args_object(args)?;
        let project = self.resolve_project(&args)?;
        let order = self.with_project(&project, |graph| graph.topological_order())?;

        let mut warnings = Vec::new();
        if !order.has_valid_order {
            warnings.push(warning(
                "CYCLES_PRESENT",
                "no valid order exists; beats on a cycle are left out",
            ));
        }
        Ok(ai_ok_with_warnings("beats_order", order_json(&order), warnings))
    }

    pub(crate) fn tool_beats_suggest_order(&mut self, args: Value) -> Result<Value, Value> {
        let args = args_object(args)?;
        let project = self.resolve_project(&args)?;
        let order = self.with_project(&project, |graph| graph.suggest_optimal_order())?;
        Ok(ai_ok("beats_suggest_order", json!({ "order": order })))
    }

    pub(crate) fn tool_beats_causality(&mut self, args: Value) -> Result<Value, Value> {
        let args = args_object(args)?;
        let project = self.resolve_project(&args)?;
        let chains = self.with_project(&project, |graph| graph.find_causality_chains())?;
        Ok(ai_ok("beats_causality", json!({ "chains": chains })))
    }

    pub(crate) fn tool_beats_reorder_check(&mut self, args: Value) -> Result<Value, Value> {
        let args = args_object(args)?;
        let project = self.resolve_project(&args)?;
        let beat_id = require_beat_id(&args, "beatId")?;
        let new_position = require_i64(&args, "newPosition")?;
        let positions = optional_positions(&args, "positions")?;

        let (check, warnings) = self.with_project(&project, |graph| {
            let warnings = unknown_position_warnings(graph, positions.as_ref());
            let positions = positions.unwrap_or_else(|| stored_positions(graph));
            (
                graph.is_valid_reorder(&beat_id, new_position, &positions),
                warnings,
            )
        })?;
        Ok(ai_ok_with_warnings(
            "beats_reorder_check",
            reorder_json(&check),
            warnings,
        ))
    }

    pub(crate) fn tool_beats_prerequisites(&mut self, args: Value) -> Result<Value, Value> {
        let args = args_object(args)?;
        let project = self.resolve_project(&args)?;
        let beat_id = require_beat_id(&args, "beatId")?;

        let (prerequisites, warnings) = self.with_project(&project, |graph| {
            (graph.all_prerequisites(&beat_id), unknown_beat_warnings(graph, &beat_id))
        })?;
        Ok(ai_ok_with_warnings(
            "beats_prerequisites",
            json!({ "beatId": beat_id, "prerequisites": prerequisites }),
            warnings,
        ))
    }

    pub(crate) fn tool_beats_dependents(&mut self, args: Value) -> Result<Value, Value> {
        let args = args_object(args)?;
        let project = self.resolve_project(&args)?;
        let beat_id = require_beat_id(&args, "beatId")?;

        let (dependents, warnings) = self.with_project(&project, |graph| {
            (graph.all_dependents(&beat_id), unknown_beat_warnings(graph, &beat_id))
        })?;
        Ok(ai_ok_with_warnings(
            "beats_dependents",
            json!({ "beatId": beat_id, "dependents": dependents }),
            warnings,
        ))
    }

    pub(crate) fn tool_beats_visualize(&mut self, args: Value) -> Result<Value, Value> {
        let args = args_object(args)?;
        let project = self.resolve_project(&args)?;
        let data = self.with_project(&project, |graph| graph.visualization_data())?;
        Ok(ai_ok("beats_visualize", visualization_json(&data)))
    }
}
