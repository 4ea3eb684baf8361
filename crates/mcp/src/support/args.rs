#![forbid(unsafe_code)]

use super::ai::ai_error;
use bg_core::graph::{BeatId, DependencyId, DependencyType, Positions, Strength};
use serde_json::{Map, Value};

pub(crate) type Args = Map<String, Value>;

pub(crate) fn args_object(args: Value) -> Result<Args, Value> {
    match args {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        _ => Err(ai_error("INVALID_INPUT", "arguments must be an object")),
    }
}

pub(crate) fn require_string(args: &Args, key: &str) -> Result<String, Value> {
    match optional_string(args, key)? {
        Some(value) => Ok(value),
        None => Err(ai_error("INVALID_INPUT", &format!("{key} is required"))),
    }
}

pub(crate) fn optional_string(args: &Args, key: &str) -> Result<Option<String>, Value> {
    let Some(value) = args.get(key) else {
        return Ok(None);
    };
    match value {
        Value::Null => Ok(None),
        Value::String(v) => Ok(Some(v.to_string())),
        _ => Err(ai_error("INVALID_INPUT", &format!("{key} must be a string"))),
    }
}

/// `None` when absent, `Some(None)` when explicitly null.
pub(crate) fn optional_nullable_string(
    args: &Args,
    key: &str,
) -> Result<Option<Option<String>>, Value> {
    let Some(value) = args.get(key) else {
        return Ok(None);
    };
    match value {
        Value::Null => Ok(Some(None)),
        Value::String(v) => Ok(Some(Some(v.to_string()))),
        _ => Err(ai_error(
            "INVALID_INPUT",
            &format!("{key} must be a string or null"),
        )),
    }
}

pub(crate) fn require_i64(args: &Args, key: &str) -> Result<i64, Value> {
    let Some(value) = args.get(key) else {
        return Err(ai_error("INVALID_INPUT", &format!("{key} is required")));
    };
    value
        .as_i64()
        .ok_or_else(|| ai_error("INVALID_INPUT", &format!("{key} must be an integer")))
}

pub(crate) fn require_beat_id(args: &Args, key: &str) -> Result<String, Value> {
    let raw = require_string(args, key)?;
    parse_beat_id(&raw, key)
}

pub(crate) fn optional_beat_id(args: &Args, key: &str) -> Result<Option<String>, Value> {
    match optional_string(args, key)? {
        Some(raw) => parse_beat_id(&raw, key).map(Some),
        None => Ok(None),
    }
}

pub(crate) fn parse_beat_id(raw: &str, key: &str) -> Result<String, Value> {
    BeatId::try_new(raw)
        .map(BeatId::into_string)
        .map_err(|err| ai_error("INVALID_INPUT", &format!("{key}: {}", err.message())))
}

pub(crate) fn require_dependency_id(args: &Args, key: &str) -> Result<String, Value> {
    let raw = require_string(args, key)?;
    parse_dependency_id(&raw, key)
}

pub(crate) fn parse_dependency_id(raw: &str, key: &str) -> Result<String, Value> {
    DependencyId::try_new(raw)
        .map(DependencyId::into_string)
        .map_err(|err| ai_error("INVALID_INPUT", &format!("{key}: {}", err.message())))
}

pub(crate) fn optional_dependency_type(
    args: &Args,
    key: &str,
) -> Result<Option<DependencyType>, Value> {
    match optional_string(args, key)? {
        Some(raw) => parse_dependency_type(&raw, key).map(Some),
        None => Ok(None),
    }
}

pub(crate) fn parse_dependency_type(raw: &str, key: &str) -> Result<DependencyType, Value> {
    DependencyType::parse(raw).ok_or_else(|| {
        ai_error(
            "INVALID_INPUT",
            &format!("{key} must be one of: sequential|parallel|causal"),
        )
    })
}

pub(crate) fn optional_strength(args: &Args, key: &str) -> Result<Option<Strength>, Value> {
    match optional_string(args, key)? {
        Some(raw) => parse_strength(&raw, key).map(Some),
        None => Ok(None),
    }
}

pub(crate) fn parse_strength(raw: &str, key: &str) -> Result<Strength, Value> {
    Strength::parse(raw).ok_or_else(|| {
        ai_error(
            "INVALID_INPUT",
            &format!("{key} must be one of: required|suggested|optional"),
        )
    })
}

/// `{ "<beatId>": <integer position>, .. }`
pub(crate) fn optional_positions(args: &Args, key: &str) -> Result<Option<Positions>, Value> {
    let Some(value) = args.get(key) else {
        return Ok(None);
    };
    let obj = match value {
        Value::Null => return Ok(None),
        Value::Object(obj) => obj,
        _ => {
            return Err(ai_error(
                "INVALID_INPUT",
                &format!("{key} must be an object of beat id -> position"),
            ));
        }
    };
    let mut out = Positions::with_capacity(obj.len());
    for (id, position) in obj {
        let Some(position) = position.as_i64() else {
            return Err(ai_error(
                "INVALID_INPUT",
                &format!("{key}.{id} must be an integer"),
            ));
        };
        let beat = parse_beat_id(id, &format!("{key}.{id}"))?;
        if out.insert(beat.clone(), position).is_some() {
            return Err(ai_error(
                "INVALID_INPUT",
                &format!("{key} names beat {beat} more than once"),
            ));
        }
    }
    Ok(Some(out))
}
