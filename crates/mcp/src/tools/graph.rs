#![forbid(unsafe_code)]

use super::render::{beat_json, dependency_json, stats_json};
use crate::*;
use bg_core::graph::{Beat, Dependency, DependencyType, Strength};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct BeatRecord {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    order: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct DependencyRecord {
    id: String,
    source_id: String,
    target_id: String,
    #[serde(default, rename = "type")]
    dep_type: Option<String>,
    #[serde(default)]
    strength: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

fn parse_records<T: for<'de> Deserialize<'de>>(args: &Args, key: &str) -> Result<Vec<T>, Value> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|err| ai_error("INVALID_INPUT", &format!("{key}: {err}"))),
    }
}

fn beat_from_record(record: BeatRecord, position: usize) -> Result<Beat, Value> {
    let id = parse_beat_id(&record.id, "beats[].id")?;
    let name = record
        .name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| id.clone());
    let order = record.order.unwrap_or(position as i64);
    Ok(Beat::new(id, name, order))
}

fn dependency_from_record(record: DependencyRecord) -> Result<Dependency, Value> {
    let id = parse_dependency_id(&record.id, "dependencies[].id")?;
    let source_id = parse_beat_id(&record.source_id, "dependencies[].sourceId")?;
    let target_id = parse_beat_id(&record.target_id, "dependencies[].targetId")?;
    let dep_type = match record.dep_type {
        Some(raw) => parse_dependency_type(&raw, "dependencies[].type")?,
        None => DependencyType::Sequential,
    };
    let strength = match record.strength {
        Some(raw) => parse_strength(&raw, "dependencies[].strength")?,
        None => Strength::Required,
    };
    let mut dependency = Dependency::new(id, source_id, target_id, strength).with_type(dep_type);
    dependency.description = record.description;
    Ok(dependency)
}

impl McpServer {
    pub(crate) fn tool_beats_init(&mut self, args: Value) -> Result<Value, Value> {
        let args = args_object(args)?;
        let project = self.resolve_project(&args)?;
        if !args.contains_key("beats") {
            return Err(ai_error("INVALID_INPUT", "beats is required"));
        }

        let beats = parse_records::<BeatRecord>(&args, "beats")?
            .into_iter()
            .enumerate()
            .map(|(position, record)| beat_from_record(record, position))
            .collect::<Result<Vec<_>, _>>()?;
        let dependencies = parse_records::<DependencyRecord>(&args, "dependencies")?
            .into_iter()
            .map(dependency_from_record)
            .collect::<Result<Vec<_>, _>>()?;

        let (stats, cycles) = self.projects().with_graph_or_create(&project, |graph| {
            graph.initialize(beats, dependencies);
            (graph.stats(), graph.detect_cycles())
        });

        let mut warnings = Vec::new();
        if !cycles.is_empty() {
            warnings.push(warning(
                "LEGACY_CYCLES",
                &format!(
                    "{} cycle(s) present in the loaded data; run beats_validate for details",
                    cycles.len()
                ),
            ));
        }
        if stats.orphan_dependencies > 0 {
            warnings.push(warning(
                "ORPHAN_DEPENDENCIES",
                &format!(
                    "{} dependency(ies) reference unknown beats",
                    stats.orphan_dependencies
                ),
            ));
        }

        Ok(ai_ok_with_warnings(
            "beats_init",
            json!({
                "project": project.as_str(),
                "stats": stats_json(&stats),
                "cycles": cycles
            }),
            warnings,
        ))
    }

    pub(crate) fn tool_beats_snapshot(&mut self, args: Value) -> Result<Value, Value> {
        let args = args_object(args)?;
        let project = self.resolve_project(&args)?;
        let (beats, dependencies) = self.with_project(&project, |graph| {
            let beats = graph.beats().iter().map(beat_json).collect::<Vec<_>>();
            let dependencies = graph.dependencies().map(dependency_json).collect::<Vec<_>>();
            (beats, dependencies)
        })?;
        Ok(ai_ok(
            "beats_snapshot",
            json!({
                "project": project.as_str(),
                "beats": beats,
                "dependencies": dependencies
            }),
        ))
    }

    pub(crate) fn tool_beats_stats(&mut self, args: Value) -> Result<Value, Value> {
        let args = args_object(args)?;
        let project = self.resolve_project(&args)?;
        let stats = self.with_project(&project, |graph| graph.stats())?;
        Ok(ai_ok("beats_stats", stats_json(&stats)))
    }
}
