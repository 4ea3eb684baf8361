#![forbid(unsafe_code)]

use bg_core::graph::MutationError;
use serde_json::{Value, json};

pub(crate) fn ai_ok_with_warnings(intent: &str, result: Value, warnings: Vec<Value>) -> Value {
    json!({
        "success": true,
        "intent": intent,
        "result": result,
        "warnings": warnings,
        "error": null
    })
}

pub(crate) fn ai_ok(intent: &str, result: Value) -> Value {
    ai_ok_with_warnings(intent, result, Vec::new())
}

pub(crate) fn warning(code: &str, message: &str) -> Value {
    json!({
        "code": code,
        "message": message
    })
}

pub(crate) fn ai_error_with(code: &str, message: &str, recovery: Option<&str>, details: Value) -> Value {
    let mut error_obj = serde_json::Map::new();
    error_obj.insert("code".to_string(), Value::String(code.to_string()));
    error_obj.insert(
        "message".to_string(),
        Value::String(message.trim().to_string()),
    );
    if let Some(recovery) = recovery {
        error_obj.insert(
            "recovery".to_string(),
            Value::String(recovery.trim().to_string()),
        );
    }
    if !details.is_null() {
        error_obj.insert("details".to_string(), details);
    }

    json!({
        "success": false,
        "intent": "error",
        "result": {},
        "warnings": [],
        "error": Value::Object(error_obj)
    })
}

pub(crate) fn ai_error(code: &str, message: &str) -> Value {
    ai_error_with(code, message, None, Value::Null)
}

pub(crate) fn mutation_error(err: MutationError) -> Value {
    let message = err.to_string();
    match err {
        MutationError::Cycle {
            source_id,
            target_id,
            path,
        } => ai_error_with(
            "CYCLE",
            &message,
            Some("Remove or reverse a dependency on the reported path, or pick other endpoints."),
            json!({ "sourceId": source_id, "targetId": target_id, "path": path }),
        ),
        MutationError::UnknownDependency { id } => ai_error_with(
            "UNKNOWN_DEPENDENCY",
            &message,
            Some("Call beats_snapshot to list the current dependencies."),
            json!({ "id": id }),
        ),
        MutationError::DuplicateDependency { id } => ai_error_with(
            "DUPLICATE_DEPENDENCY",
            &message,
            Some("Use dependency_update to change an existing dependency."),
            json!({ "id": id }),
        ),
    }
}
