#![forbid(unsafe_code)]

use bg_core::graph::{
    BeatSnapshot, Dependency, GraphStats, ImpactAnalysis, ReorderCheck, TopologicalOrder,
    ValidationFinding, ValidationReport, VisualizationData,
};
use serde_json::{Map, Value, json};

pub(super) fn dependency_json(dep: &Dependency) -> Value {
    json!({
        "id": dep.id,
        "sourceId": dep.source_id,
        "targetId": dep.target_id,
        "type": dep.dep_type.as_str(),
        "strength": dep.strength.as_str(),
        "description": dep.description
    })
}

pub(super) fn beat_json(beat: &BeatSnapshot) -> Value {
    json!({
        "id": beat.id,
        "name": beat.name,
        "order": beat.order,
        "dependencies": beat.dependencies,
        "dependents": beat.dependents
    })
}

fn finding_json(finding: &ValidationFinding) -> Value {
    json!({
        "kind": finding.kind.as_str(),
        "severity": finding.severity.as_str(),
        "message": finding.message,
        "beatIds": finding.beat_ids,
        "dependencyId": finding.dependency_id
    })
}

pub(super) fn validation_json(report: &ValidationReport) -> Value {
    json!({
        "ok": report.ok,
        "errors": report.errors,
        "warnings": report.warnings,
        "findings": report.findings.iter().map(finding_json).collect::<Vec<_>>()
    })
}

pub(super) fn order_json(order: &TopologicalOrder) -> Value {
    let mut levels = Map::new();
    for id in &order.order {
        if let Some(level) = order.levels.get(id) {
            levels.insert(id.clone(), json!(level));
        }
    }
    json!({
        "order": order.order,
        "levels": Value::Object(levels),
        "hasValidOrder": order.has_valid_order,
        "cycles": order.cycles
    })
}

pub(super) fn impact_json(impact: &ImpactAnalysis) -> Value {
    json!({
        "beatId": impact.beat_id,
        "directlyAffected": impact.directly_affected,
        "transitivelyAffected": impact.transitively_affected,
        "impactScore": impact.impact_score,
        "warnings": impact.warnings
    })
}

pub(super) fn reorder_json(check: &ReorderCheck) -> Value {
    json!({
        "valid": check.valid,
        "reasons": check.reasons
    })
}

pub(super) fn visualization_json(data: &VisualizationData) -> Value {
    let nodes = data
        .nodes
        .iter()
        .map(|node| {
            json!({
                "id": node.id,
                "name": node.name,
                "order": node.order,
                "level": node.level,
                "inDegree": node.in_degree,
                "outDegree": node.out_degree
            })
        })
        .collect::<Vec<_>>();
    json!({
        "nodes": nodes,
        "edges": data.edges.iter().map(dependency_json).collect::<Vec<_>>()
    })
}

pub(super) fn stats_json(stats: &GraphStats) -> Value {
    json!({
        "beats": stats.beats,
        "dependencies": stats.dependencies,
        "orphanDependencies": stats.orphan_dependencies,
        "roots": stats.roots,
        "maxLevel": stats.max_level
    })
}
