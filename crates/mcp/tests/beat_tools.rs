#![forbid(unsafe_code)]

mod support;
use support::*;

use serde_json::json;

#[test]
fn init_snapshot_and_stats() {
    let mut server = Server::start_initialized("init_snapshot_and_stats");
    let init = init_story(&mut server, "novel");
    assert_eq!(init["project"], "novel");
    assert_eq!(init["stats"]["beats"], 4);
    assert_eq!(init["stats"]["dependencies"], 3);
    assert_eq!(init["cycles"], json!([]));

    let snapshot = server.call_ok("beats_snapshot", json!({ "project": "novel" }));
    let beats = snapshot["beats"].as_array().expect("beats");
    assert_eq!(beats.len(), 4);
    assert_eq!(beats[0]["id"], "A");
    assert_eq!(strings(&beats[0]["dependents"]), vec!["B", "D"]);
    assert_eq!(strings(&beats[2]["dependencies"]), vec!["B"]);

    let deps = snapshot["dependencies"].as_array().expect("dependencies");
    assert_eq!(deps.len(), 3);
    assert_eq!(deps[0]["type"], "sequential");
    assert_eq!(deps[0]["strength"], "required");
    assert_eq!(deps[2]["strength"], "suggested");

    let stats = server.call_ok("beats_stats", json!({ "project": "novel" }));
    assert_eq!(stats["roots"], 1);
    assert_eq!(stats["maxLevel"], 2);
    assert_eq!(stats["orphanDependencies"], 0);
}

#[test]
fn add_rejects_cycles_with_path_and_leaves_graph_unchanged() {
    let mut server = Server::start_initialized("add_rejects_cycles");
    init_story(&mut server, "novel");

    let rejected = server.call_tool(
        "dependency_add",
        json!({ "project": "novel", "id": "ca", "sourceId": "C", "targetId": "A" }),
    );
    assert_eq!(rejected["success"], false);
    assert_eq!(error_code(&rejected), Some("CYCLE"));
    assert_eq!(strings(&rejected["error"]["details"]["path"]), vec!["A", "B", "C"]);

    let self_loop = server.call_tool(
        "dependency_add",
        json!({ "project": "novel", "id": "aa", "sourceId": "A", "targetId": "A" }),
    );
    assert_eq!(error_code(&self_loop), Some("CYCLE"));

    let stats = server.call_ok("beats_stats", json!({ "project": "novel" }));
    assert_eq!(stats["dependencies"], 3);

    let added = server.call_ok(
        "dependency_add",
        json!({
            "project": "novel",
            "id": "dc",
            "sourceId": "D",
            "targetId": "C",
            "type": "causal",
            "strength": "optional",
            "description": "mentor's gift enables the crossing"
        }),
    );
    assert_eq!(added["dependency"]["type"], "causal");
    assert_eq!(added["dependency"]["description"], "mentor's gift enables the crossing");

    let duplicate = server.call_tool(
        "dependency_add",
        json!({ "project": "novel", "id": "dc", "sourceId": "D", "targetId": "C" }),
    );
    assert_eq!(error_code(&duplicate), Some("DUPLICATE_DEPENDENCY"));
}

#[test]
fn cycle_check_reports_without_mutating() {
    let mut server = Server::start_initialized("cycle_check_reports");
    init_story(&mut server, "novel");

    let closing = server.call_ok(
        "dependency_cycle_check",
        json!({ "project": "novel", "sourceId": "C", "targetId": "A" }),
    );
    assert_eq!(closing["wouldCreateCycle"], true);
    assert_eq!(strings(&closing["path"]), vec!["A", "B", "C"]);

    let safe = server.call_ok(
        "dependency_cycle_check",
        json!({ "project": "novel", "sourceId": "D", "targetId": "C" }),
    );
    assert_eq!(safe["wouldCreateCycle"], false);
    assert!(safe["path"].is_null());
}

#[test]
fn update_rolls_back_rejected_endpoint_change() {
    let mut server = Server::start_initialized("update_rolls_back");
    init_story(&mut server, "novel");

    // B -> A would close A -> B.
    let rejected = server.call_tool(
        "dependency_update",
        json!({ "project": "novel", "id": "bc", "targetId": "A" }),
    );
    assert_eq!(error_code(&rejected), Some("CYCLE"));

    let snapshot = server.call_ok("beats_snapshot", json!({ "project": "novel" }));
    let ids = snapshot["dependencies"]
        .as_array()
        .expect("dependencies")
        .iter()
        .map(|d| d["id"].as_str().unwrap_or_default().to_string())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["ab", "bc", "ad"]);
    assert_eq!(snapshot["dependencies"][1]["targetId"], "C");

    let relinked = server.call_ok(
        "dependency_update",
        json!({ "project": "novel", "id": "bc", "sourceId": "D", "strength": "suggested" }),
    );
    assert_eq!(relinked["dependency"]["sourceId"], "D");
    assert_eq!(relinked["dependency"]["targetId"], "C");
    assert_eq!(relinked["dependency"]["strength"], "suggested");

    let prerequisites = server.call_ok(
        "beats_prerequisites",
        json!({ "project": "novel", "beatId": "C" }),
    );
    assert_eq!(strings(&prerequisites["prerequisites"]), vec!["D", "A"]);

    let cleared = server.call_ok(
        "dependency_update",
        json!({ "project": "novel", "id": "ab", "description": null }),
    );
    assert!(cleared["dependency"]["description"].is_null());

    let unknown = server.call_tool(
        "dependency_update",
        json!({ "project": "novel", "id": "zz", "strength": "optional" }),
    );
    assert_eq!(error_code(&unknown), Some("UNKNOWN_DEPENDENCY"));
}

#[test]
fn remove_is_idempotent() {
    let mut server = Server::start_initialized("remove_is_idempotent");
    init_story(&mut server, "novel");

    let removed = server.call_ok("dependency_remove", json!({ "project": "novel", "id": "ab" }));
    assert_eq!(removed["removed"], true);
    assert_eq!(removed["dependency"]["sourceId"], "A");

    let again = server.call_tool("dependency_remove", json!({ "project": "novel", "id": "ab" }));
    assert_eq!(again["success"], true);
    assert_eq!(again["result"]["removed"], false);
    assert_eq!(again["warnings"][0]["code"], "NOT_FOUND");

    // With A -> B gone, C -> A is acceptable.
    let added = server.call_tool(
        "dependency_add",
        json!({ "project": "novel", "id": "ca", "sourceId": "C", "targetId": "A" }),
    );
    assert_eq!(added["success"], true);
}

#[test]
fn validate_reports_order_violations_by_strength() {
    let mut server = Server::start_initialized("validate_order_violations");
    init_story(&mut server, "novel");

    let stored = server.call_ok("beats_validate", json!({ "project": "novel" }));
    assert_eq!(stored["ok"], true);
    assert_eq!(stored["errors"], 0);

    let report = server.call_ok(
        "beats_validate",
        json!({ "project": "novel", "positions": { "A": 5, "B": 1, "C": 2, "D": 3 } }),
    );
    assert_eq!(report["ok"], false);
    assert_eq!(report["errors"], 1);
    assert_eq!(report["warnings"], 1);
    let findings = report["findings"].as_array().expect("findings");
    assert_eq!(findings.len(), 2);
    assert_eq!(findings[0]["kind"], "order_violation");
    assert_eq!(findings[0]["severity"], "error");
    assert_eq!(findings[0]["dependencyId"], "ab");
    assert_eq!(findings[1]["severity"], "warning");
    assert_eq!(findings[1]["dependencyId"], "ad");
}

#[test]
fn explicit_positions_use_trimmed_beat_ids() {
    let mut server = Server::start_initialized("explicit_positions_trimmed");
    server.call_ok(
        "beats_init",
        json!({
            "project": "padded",
            "beats": [ { "id": " A " }, { "id": " B " } ],
            "dependencies": [
                { "id": "ab", "sourceId": " A ", "targetId": " B ", "strength": "required" }
            ]
        }),
    );

    let payload = server.call_tool(
        "beats_validate",
        json!({ "project": "padded", "positions": { " A ": 5, " B ": 0 } }),
    );
    assert_eq!(payload["success"], true);
    assert_eq!(payload["result"]["ok"], false);
    assert_eq!(payload["result"]["errors"], 1);
    assert_eq!(payload["result"]["findings"][0]["kind"], "order_violation");
    assert_eq!(payload["warnings"].as_array().map(Vec::len), Some(0));

    let payload = server.call_tool(
        "beats_reorder_check",
        json!({
            "project": "padded",
            "beatId": " B ",
            "newPosition": 3,
            "positions": { " A ": 5, " B ": 0, "ghost": 1 }
        }),
    );
    assert_eq!(payload["success"], true);
    assert_eq!(payload["result"]["valid"], false);
    let codes: Vec<&str> = payload["warnings"]
        .as_array()
        .expect("warnings")
        .iter()
        .filter_map(|w| w["code"].as_str())
        .collect();
    assert_eq!(codes, vec!["UNKNOWN_BEAT"]);

    let blank = server.call_tool(
        "beats_validate",
        json!({ "project": "padded", "positions": { "  ": 1 } }),
    );
    assert_eq!(error_code(&blank), Some("INVALID_INPUT"));
}

#[test]
fn legacy_cycles_survive_init_and_are_reported() {
    let mut server = Server::start_initialized("legacy_cycles");
    let payload = server.call_tool(
        "beats_init",
        json!({
            "project": "legacy",
            "beats": [ { "id": "X" }, { "id": "Y" }, { "id": "Z" } ],
            "dependencies": [
                { "id": "xy", "sourceId": "X", "targetId": "Y" },
                { "id": "yx", "sourceId": "Y", "targetId": "X" },
                { "id": "xg", "sourceId": "X", "targetId": "ghost" }
            ]
        }),
    );
    assert_eq!(payload["success"], true);
    let codes = payload["warnings"]
        .as_array()
        .expect("warnings")
        .iter()
        .map(|w| w["code"].as_str().unwrap_or_default().to_string())
        .collect::<Vec<_>>();
    assert_eq!(codes, vec!["LEGACY_CYCLES", "ORPHAN_DEPENDENCIES"]);

    let order = server.call_tool("beats_order", json!({ "project": "legacy" }));
    assert_eq!(order["result"]["hasValidOrder"], false);
    assert_eq!(strings(&order["result"]["order"]), vec!["Z"]);
    assert_eq!(order["warnings"][0]["code"], "CYCLES_PRESENT");

    let report = server.call_ok("beats_validate", json!({ "project": "legacy" }));
    let kinds = report["findings"]
        .as_array()
        .expect("findings")
        .iter()
        .map(|f| f["kind"].as_str().unwrap_or_default().to_string())
        .collect::<Vec<_>>();
    assert!(kinds.contains(&"cycle".to_string()));
    assert!(kinds.contains(&"orphan".to_string()));

    let suggested = server.call_ok("beats_suggest_order", json!({ "project": "legacy" }));
    assert_eq!(strings(&suggested["order"]), vec!["Z", "X", "Y"]);
}

#[test]
fn order_impact_and_reorder() {
    let mut server = Server::start_initialized("order_impact_reorder");
    init_story(&mut server, "novel");

    let order = server.call_ok("beats_order", json!({ "project": "novel" }));
    assert_eq!(order["hasValidOrder"], true);
    assert_eq!(strings(&order["order"]), vec!["A", "B", "D", "C"]);
    assert_eq!(order["levels"], json!({ "A": 0, "B": 1, "C": 2, "D": 1 }));

    let impact = server.call_ok("beats_impact", json!({ "project": "novel", "beatId": "A" }));
    assert_eq!(strings(&impact["directlyAffected"]), vec!["B", "D"]);
    assert_eq!(strings(&impact["transitivelyAffected"]), vec!["C"]);
    assert_eq!(impact["impactScore"], 75);

    let unknown = server.call_tool("beats_impact", json!({ "project": "novel", "beatId": "Q" }));
    assert_eq!(unknown["result"]["impactScore"], 0);
    assert_eq!(unknown["warnings"][0]["code"], "UNKNOWN_BEAT");

    let blocked = server.call_ok(
        "beats_reorder_check",
        json!({ "project": "novel", "beatId": "C", "newPosition": 0 }),
    );
    assert_eq!(blocked["valid"], false);
    assert_eq!(blocked["reasons"].as_array().map(Vec::len), Some(2));

    let fine = server.call_ok(
        "beats_reorder_check",
        json!({ "project": "novel", "beatId": "D", "newPosition": 9 }),
    );
    assert_eq!(fine["valid"], true);

    let dependents = server.call_ok("beats_dependents", json!({ "project": "novel", "beatId": "A" }));
    assert_eq!(strings(&dependents["dependents"]), vec!["B", "D", "C"]);
}

#[test]
fn causality_chains_and_visualization() {
    let mut server = Server::start_initialized("causality_and_visualization");
    server.call_ok(
        "beats_init",
        json!({
            "project": "heist",
            "beats": [
                { "id": "R", "name": "Robbery" },
                { "id": "S", "name": "Suspicion" },
                { "id": "T", "name": "Trial" },
                { "id": "U", "name": "Witness" }
            ],
            "dependencies": [
                { "id": "rs", "sourceId": "R", "targetId": "S", "type": "causal" },
                { "id": "st", "sourceId": "S", "targetId": "T", "type": "causal" },
                { "id": "ut", "sourceId": "U", "targetId": "T", "type": "parallel" }
            ]
        }),
    );

    let chains = server.call_ok("beats_causality", json!({ "project": "heist" }));
    assert_eq!(chains["chains"], json!([["R", "S", "T"], ["U", "T"]]));

    let viz = server.call_ok("beats_visualize", json!({ "project": "heist" }));
    let nodes = viz["nodes"].as_array().expect("nodes");
    assert_eq!(nodes.len(), 4);
    assert_eq!(nodes[0]["order"], 0);
    assert_eq!(nodes[0]["outDegree"], 1);
    assert_eq!(nodes[2]["inDegree"], 2);
    assert_eq!(nodes[2]["level"], 2);
    assert_eq!(nodes[3]["level"], 0);
    assert_eq!(viz["edges"].as_array().map(Vec::len), Some(3));
}

#[test]
fn projects_are_isolated_and_default_project_applies() {
    let mut server = Server::start_initialized_with_args("projects_isolated", &["--project", "novel"]);
    init_story(&mut server, "novel");
    init_story(&mut server, "sequel");

    server.call_ok(
        "dependency_remove",
        json!({ "project": "sequel", "id": "ab" }),
    );

    let default_stats = server.call_ok("beats_stats", json!({}));
    assert_eq!(default_stats["dependencies"], 3);
    let sequel_stats = server.call_ok("beats_stats", json!({ "project": "sequel" }));
    assert_eq!(sequel_stats["dependencies"], 2);

    let unknown = server.call_tool("beats_order", json!({ "project": "prequel" }));
    assert_eq!(error_code(&unknown), Some("UNKNOWN_PROJECT"));
    assert_eq!(unknown["error"]["recovery"], "call beats_init first");
}

#[test]
fn invalid_arguments_are_rejected() {
    let mut server = Server::start_initialized("invalid_arguments");

    let no_project = server.call_tool("beats_stats", json!({}));
    assert_eq!(error_code(&no_project), Some("INVALID_INPUT"));

    init_story(&mut server, "novel");
    let bad_strength = server.call_tool(
        "dependency_add",
        json!({ "project": "novel", "id": "x", "sourceId": "A", "targetId": "C", "strength": "mandatory" }),
    );
    assert_eq!(error_code(&bad_strength), Some("INVALID_INPUT"));

    let missing_target = server.call_tool(
        "dependency_add",
        json!({ "project": "novel", "id": "x", "sourceId": "A" }),
    );
    assert_eq!(error_code(&missing_target), Some("INVALID_INPUT"));

    let bad_positions = server.call_tool(
        "beats_validate",
        json!({ "project": "novel", "positions": { "A": "first" } }),
    );
    assert_eq!(error_code(&bad_positions), Some("INVALID_INPUT"));

    let bad_record = server.call_tool(
        "beats_init",
        json!({ "project": "novel", "beats": [ { "name": "no id" } ] }),
    );
    assert_eq!(error_code(&bad_record), Some("INVALID_INPUT"));
}
