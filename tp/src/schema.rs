//! Strict JSON Schema for `trip-plan.v3` structured output
//!
//! The schema mirrors [`TripPlanResponse`](crate::domain::TripPlanResponse)
//! field for field. Structured output in strict mode wants fully specified
//! objects, so every object sets `additionalProperties: false`, lists every
//! property as required, and optional values are typed `["string", "null"]`
//! instead of being omittable. Enum lists are read from the Rust enums.
//!
//! [`conformance_errors`] checks a JSON value against the schema. Tests run
//! every response the planner can emit through it, which is what keeps the
//! types and the schema in lockstep.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::domain::{IssueType, ItemType, Pace, ProtocolVersion, Severity, SpotPriority, Timezone, TransportMode, VariantId};

/// Schema name sent with the structured output request
pub const SCHEMA_NAME: &str = "tripPlanV3";

/// `YYYY-MM-DD`
pub const DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";

/// `HH:mm`, 24 hour clock
pub const TIME_PATTERN: &str = r"^([01]\d|2[0-3]):[0-5]\d$";

/// Named schema as the structured output API expects it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonSchemaFormat {
    pub name: &'static str,
    pub schema: Value,
    pub strict: bool,
}

static TRIP_PLAN_SCHEMA: LazyLock<Value> = LazyLock::new(build_schema);

/// The v3 response schema with its name and strict flag
pub fn trip_plan_json_schema() -> JsonSchemaFormat {
    debug!("trip_plan_json_schema: called");
    JsonSchemaFormat {
        name: SCHEMA_NAME,
        schema: TRIP_PLAN_SCHEMA.clone(),
        strict: true,
    }
}

fn closed_enum<T>(all: &[T], as_str: fn(&T) -> &'static str) -> Value {
    json!({
        "type": "string",
        "enum": all.iter().map(as_str).collect::<Vec<_>>(),
    })
}

/// Object node with every property required
fn strict_object(properties: Vec<(&str, Value)>) -> Value {
    let required: Vec<&str> = properties.iter().map(|(k, _)| *k).collect();
    let properties: Map<String, Value> = properties.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
    json!({
        "type": "object",
        "additionalProperties": false,
        "required": required,
        "properties": properties,
    })
}

fn non_empty_string() -> Value {
    json!({ "type": "string", "minLength": 1 })
}

fn patterned(pattern: &str) -> Value {
    json!({ "type": "string", "pattern": pattern })
}

fn build_schema() -> Value {
    let item = strict_object(vec![
        ("spotId", non_empty_string()),
        ("type", closed_enum(ItemType::ALL, ItemType::as_str)),
        ("startTime", patterned(TIME_PATTERN)),
        ("endTime", patterned(TIME_PATTERN)),
        ("name", non_empty_string()),
        ("stayMinutes", json!({ "type": "integer", "minimum": 0 })),
        ("detail", json!({ "type": "string" })),
    ]);

    let day = strict_object(vec![
        ("dayNumber", json!({ "type": "integer", "minimum": 1 })),
        ("date", patterned(DATE_PATTERN)),
        ("theme", non_empty_string()),
        ("items", json!({ "type": "array", "items": item })),
    ]);

    let plan = strict_object(vec![
        ("title", non_empty_string()),
        ("totalDays", json!({ "type": "integer", "minimum": 1 })),
        ("days", json!({ "type": "array", "minItems": 1, "items": day })),
    ]);

    let spot = strict_object(vec![
        ("name", non_empty_string()),
        ("priority", closed_enum(SpotPriority::ALL, SpotPriority::as_str)),
    ]);

    let variant = strict_object(vec![
        ("id", closed_enum(VariantId::ALL, VariantId::as_str)),
        ("title", non_empty_string()),
        ("rationale", non_empty_string()),
        ("includedSpots", json!({ "type": "array", "items": non_empty_string() })),
        ("excludedSpots", json!({ "type": "array", "items": { "type": "string" } })),
        ("plan", plan),
    ]);

    let request = strict_object(vec![
        ("startDate", patterned(DATE_PATTERN)),
        ("endDate", patterned(DATE_PATTERN)),
        ("startLocation", non_empty_string()),
        ("startTime", patterned(TIME_PATTERN)),
        ("baseStay", non_empty_string()),
        ("spots", json!({ "type": "array", "minItems": 1, "items": spot })),
        ("endLocation", json!({ "type": ["string", "null"] })),
        ("endTime", json!({ "type": ["string", "null"] })),
        ("transportMode", closed_enum(TransportMode::ALL, TransportMode::as_str)),
        ("pace", closed_enum(Pace::ALL, Pace::as_str)),
    ]);

    let feasibility = strict_object(vec![
        ("isFeasible", json!({ "type": "boolean" })),
        ("summary", non_empty_string()),
    ]);

    let issue = strict_object(vec![
        ("type", closed_enum(IssueType::ALL, IssueType::as_str)),
        ("severity", closed_enum(Severity::ALL, Severity::as_str)),
        ("description", non_empty_string()),
        ("affectedSpots", json!({ "type": "array", "items": { "type": "string" } })),
    ]);

    strict_object(vec![
        // Only the current version may be generated
        ("version", json!({ "type": "string", "enum": [ProtocolVersion::CURRENT.as_str()] })),
        ("timezone", closed_enum(Timezone::ALL, Timezone::as_str)),
        ("request", request),
        ("feasibility", feasibility),
        ("plans", json!({ "type": "array", "minItems": 1, "maxItems": 2, "items": variant })),
        ("issues", json!({ "type": "array", "items": issue })),
    ])
}

/// Validate `value` against the subset of JSON Schema this module emits
///
/// Returns one message per violation, each prefixed with a JSON pointer to
/// the offending node. An empty vector means the value conforms.
pub fn conformance_errors(schema: &Value, value: &Value) -> Vec<String> {
    let mut errors = Vec::new();
    check_node(schema, value, "", &mut errors);
    errors
}

fn json_type_matches(expected: &str, value: &Value) -> bool {
    match expected {
        "object" => value.is_object(),
        "array" => value.is_array(),
        "string" => value.is_string(),
        "boolean" => value.is_boolean(),
        "null" => value.is_null(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        _ => false,
    }
}

fn check_node(schema: &Value, value: &Value, path: &str, errors: &mut Vec<String>) {
    if let Some(ty) = schema.get("type") {
        let allowed: Vec<&str> = match ty {
            Value::String(s) => vec![s.as_str()],
            Value::Array(types) => types.iter().filter_map(Value::as_str).collect(),
            _ => vec![],
        };
        if !allowed.iter().any(|t| json_type_matches(t, value)) {
            errors.push(format!("{}: expected type {:?}, found {}", path, allowed, value));
            return;
        }
    }

    if let Some(Value::Array(options)) = schema.get("enum")
        && !options.contains(value)
    {
        errors.push(format!("{}: {} is not one of {:?}", path, value, options));
    }

    match value {
        Value::String(s) => check_string(schema, s, path, errors),
        Value::Number(n) => {
            if let (Some(min), Some(actual)) = (schema.get("minimum").and_then(Value::as_f64), n.as_f64())
                && actual < min
            {
                errors.push(format!("{}: {} is below minimum {}", path, actual, min));
            }
        }
        Value::Array(items) => check_array(schema, items, path, errors),
        Value::Object(fields) => check_object(schema, fields, path, errors),
        _ => {}
    }
}

fn check_string(schema: &Value, s: &str, path: &str, errors: &mut Vec<String>) {
    if let Some(min) = schema.get("minLength").and_then(Value::as_u64)
        && (s.chars().count() as u64) < min
    {
        errors.push(format!("{}: string shorter than {}", path, min));
    }
    if let Some(pattern) = schema.get("pattern").and_then(Value::as_str) {
        match Regex::new(pattern) {
            Ok(re) if !re.is_match(s) => errors.push(format!("{}: {:?} does not match {}", path, s, pattern)),
            Ok(_) => {}
            Err(e) => errors.push(format!("{}: invalid pattern {}: {}", path, pattern, e)),
        }
    }
}

fn check_array(schema: &Value, items: &[Value], path: &str, errors: &mut Vec<String>) {
    if let Some(min) = schema.get("minItems").and_then(Value::as_u64)
        && (items.len() as u64) < min
    {
        errors.push(format!("{}: {} items, expected at least {}", path, items.len(), min));
    }
    if let Some(max) = schema.get("maxItems").and_then(Value::as_u64)
        && (items.len() as u64) > max
    {
        errors.push(format!("{}: {} items, expected at most {}", path, items.len(), max));
    }
    if let Some(item_schema) = schema.get("items") {
        for (i, item) in items.iter().enumerate() {
            check_node(item_schema, item, &format!("{}/{}", path, i), errors);
        }
    }
}

fn check_object(schema: &Value, fields: &Map<String, Value>, path: &str, errors: &mut Vec<String>) {
    let properties = schema.get("properties").and_then(Value::as_object);

    if let Some(Value::Array(required)) = schema.get("required") {
        for key in required.iter().filter_map(Value::as_str) {
            if !fields.contains_key(key) {
                errors.push(format!("{}: missing required property {:?}", path, key));
            }
        }
    }

    let closed = schema.get("additionalProperties") == Some(&Value::Bool(false));
    for (key, field) in fields {
        match properties.and_then(|p| p.get(key)) {
            Some(field_schema) => check_node(field_schema, field, &format!("{}/{}", path, key), errors),
            None if closed => errors.push(format!("{}: unexpected property {:?}", path, key)),
            None => {}
        }
    }
}

/// Problems that would make the schema unusable in strict mode
///
/// Every object node must be closed and require all of its properties.
pub fn strictness_errors(schema: &Value) -> Vec<String> {
    let mut errors = Vec::new();
    check_strict(schema, "", &mut errors);
    errors
}

fn check_strict(schema: &Value, path: &str, errors: &mut Vec<String>) {
    if schema.get("type") == Some(&json!("object")) {
        if schema.get("additionalProperties") != Some(&Value::Bool(false)) {
            errors.push(format!("{}: object is not closed", path));
        }
        let properties = schema.get("properties").and_then(Value::as_object);
        let required: Vec<&str> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|r| r.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();
        if let Some(properties) = properties {
            for (key, child) in properties {
                if !required.contains(&key.as_str()) {
                    errors.push(format!("{}: property {:?} is not required", path, key));
                }
                check_strict(child, &format!("{}/{}", path, key), errors);
            }
        }
    }
    if let Some(items) = schema.get("items") {
        check_strict(items, &format!("{}/items", path), errors);
    }
}
