#![forbid(unsafe_code)]

use serde_json::{Value, json};

fn project_prop() -> Value {
    json!({ "type": "string", "description": "Project id; defaults to the server's --project." })
}

fn positions_prop() -> Value {
    json!({
        "type": "object",
        "description": "Beat id -> position. Defaults to each beat's stored order.",
        "additionalProperties": { "type": "integer" }
    })
}

fn enum_prop(values: &[&str]) -> Value {
    json!({ "type": "string", "enum": values })
}

fn dependency_type_prop() -> Value {
    enum_prop(&["sequential", "parallel", "causal"])
}

fn strength_prop() -> Value {
    enum_prop(&["required", "suggested", "optional"])
}

fn project_only_schema() -> Value {
    json!({
        "type": "object",
        "properties": { "project": project_prop() },
        "required": []
    })
}

fn beat_id_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "project": project_prop(),
            "beatId": { "type": "string" }
        },
        "required": ["beatId"]
    })
}

pub(crate) fn tool_definitions() -> Vec<Value> {
    let mut defs = vec![
        json!({
            "name": "beats_init",
            "description": "Replace a project's graph with the given beats and dependencies (no cycle check; legacy cycles are reported).",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "project": project_prop(),
                    "beats": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "id": { "type": "string" },
                                "name": { "type": "string" },
                                "order": { "type": "integer" }
                            },
                            "required": ["id"]
                        }
                    },
                    "dependencies": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "id": { "type": "string" },
                                "sourceId": { "type": "string" },
                                "targetId": { "type": "string" },
                                "type": dependency_type_prop(),
                                "strength": strength_prop(),
                                "description": { "type": "string" }
                            },
                            "required": ["id", "sourceId", "targetId"]
                        }
                    }
                },
                "required": ["beats"]
            }
        }),
        json!({
            "name": "beats_snapshot",
            "description": "List beats (with derived adjacency) and dependency records.",
            "inputSchema": project_only_schema()
        }),
        json!({
            "name": "beats_stats",
            "description": "Counts: beats, dependencies, orphan dependencies, roots, deepest level.",
            "inputSchema": project_only_schema()
        }),
        json!({
            "name": "dependency_add",
            "description": "Add a dependency source -> target (target depends on source). Rejected if it would create a cycle.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "project": project_prop(),
                    "id": { "type": "string" },
                    "sourceId": { "type": "string" },
                    "targetId": { "type": "string" },
                    "type": dependency_type_prop(),
                    "strength": strength_prop(),
                    "description": { "type": "string" }
                },
                "required": ["id", "sourceId", "targetId"]
            }
        }),
        json!({
            "name": "dependency_remove",
            "description": "Remove a dependency by id. Unknown ids are a no-op.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "project": project_prop(),
                    "id": { "type": "string" }
                },
                "required": ["id"]
            }
        }),
        json!({
            "name": "dependency_update",
            "description": "Change fields of a dependency. Endpoint changes are cycle-checked and rolled back on rejection.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "project": project_prop(),
                    "id": { "type": "string" },
                    "sourceId": { "type": "string" },
                    "targetId": { "type": "string" },
                    "type": dependency_type_prop(),
                    "strength": strength_prop(),
                    "description": { "type": ["string", "null"] }
                },
                "required": ["id"]
            }
        }),
        json!({
            "name": "dependency_cycle_check",
            "description": "Would adding source -> target create a cycle? Returns the closing path when it would.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "project": project_prop(),
                    "sourceId": { "type": "string" },
                    "targetId": { "type": "string" }
                },
                "required": ["sourceId", "targetId"]
            }
        }),
        json!({
            "name": "beats_validate",
            "description": "Report cycles, orphan dependencies and order violations against the given positions.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "project": project_prop(),
                    "positions": positions_prop()
                },
                "required": []
            }
        }),
        json!({
            "name": "beats_impact",
            "description": "Beats affected directly and transitively by changing one beat, with a 0-100 impact score.",
            "inputSchema": beat_id_schema()
        }),
        json!({
            "name": "beats_order",
            "description": "Topological order with levels; reports cycles when no valid order exists.",
            "inputSchema": project_only_schema()
        }),
        json!({
            "name": "beats_suggest_order",
            "description": "Beat ids sorted by level, then by current order.",
            "inputSchema": project_only_schema()
        }),
        json!({
            "name": "beats_causality",
            "description": "Maximal chains of causal dependencies.",
            "inputSchema": project_only_schema()
        }),
        json!({
            "name": "beats_reorder_check",
            "description": "Would moving a beat to a new position respect all transitive dependencies?",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "project": project_prop(),
                    "beatId": { "type": "string" },
                    "newPosition": { "type": "integer" },
                    "positions": positions_prop()
                },
                "required": ["beatId", "newPosition"]
            }
        }),
        json!({
            "name": "beats_prerequisites",
            "description": "All transitive prerequisites of a beat.",
            "inputSchema": beat_id_schema()
        }),
        json!({
            "name": "beats_dependents",
            "description": "All transitive dependents of a beat.",
            "inputSchema": beat_id_schema()
        }),
        json!({
            "name": "beats_visualize",
            "description": "Nodes with level and degrees plus all edges, for rendering.",
            "inputSchema": project_only_schema()
        }),
    ];
    defs.sort_by(|a, b| {
        let a = a.get("name").and_then(|v| v.as_str()).unwrap_or("");
        let b = b.get("name").and_then(|v| v.as_str()).unwrap_or("");
        a.cmp(b)
    });
    defs
}
