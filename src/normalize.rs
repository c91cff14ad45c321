use serde_json::{Value, json};

use crate::schema::{Category, Severity};

const DEFAULT_SUMMARY: &str = "No summary provided.";
const DEFAULT_TITLE: &str = "Untitled issue";
const DEFAULT_SUGGESTION: &str = "Provide a fix for this issue.";

/// Coerce arbitrary decoded model output into the report shape.
///
/// Advisory only: this never rejects its input. Whatever the model produced,
/// the result is a JSON object that deserializes into `ReviewReport`, at the
/// price of information loss (malformed findings are dropped, out-of-range
/// scores clamped, junk fields defaulted).
pub fn normalize_report(value: Value, fallback_path: &str, fallback_language: &str) -> Value {
    let obj = match value {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };

    let path = obj
        .get("path")
        .and_then(coerce_string)
        .unwrap_or_else(|| fallback_path.to_string());
    let language = obj
        .get("language")
        .and_then(coerce_string)
        .unwrap_or_else(|| fallback_language.to_string());
    let summary = obj
        .get("summary")
        .and_then(coerce_string)
        .unwrap_or_else(|| DEFAULT_SUMMARY.to_string());
    let score = coerce_score(obj.get("score"));

    let findings: Vec<Value> = match obj.get("findings") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_object().map(normalize_finding))
            .collect(),
        _ => Vec::new(),
    };

    json!({
        "path": path,
        "language": language,
        "summary": summary,
        "score": score,
        "findings": findings,
    })
}

/// Build a fresh finding with exactly the schema's fields; anything else the
/// model attached is discarded.
fn normalize_finding(finding: &serde_json::Map<String, Value>) -> Value {
    let category = finding
        .get("category")
        .and_then(coerce_string)
        .and_then(|s| Category::parse(s.to_lowercase().trim()))
        .unwrap_or(Category::Bug);
    let severity = finding
        .get("severity")
        .and_then(coerce_string)
        .and_then(|s| Severity::parse(s.to_lowercase().trim()))
        .unwrap_or(Severity::Medium);
    let title = finding
        .get("title")
        .and_then(coerce_string)
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let details = finding
        .get("details")
        .and_then(coerce_string)
        .unwrap_or_default();
    let line_start = finding.get("line_start").and_then(coerce_int).unwrap_or(0);
    let line_end = finding
        .get("line_end")
        .and_then(coerce_int)
        .unwrap_or(line_start);
    let suggestion = finding
        .get("suggestion")
        .and_then(coerce_string)
        .unwrap_or_else(|| DEFAULT_SUGGESTION.to_string());

    json!({
        "category": category.as_str(),
        "severity": severity.as_str(),
        "title": title,
        "details": details,
        "line_start": line_start,
        "line_end": line_end,
        "suggestion": suggestion,
    })
}

/// Null counts as absent. Scalars use their display form; nested structures
/// their compact JSON text.
fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(i),
            None => n.as_f64().map(|f| f as i64),
        },
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn coerce_score(value: Option<&Value>) -> i64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(f) if f.is_finite() => (f.round_ties_even() as i64).clamp(0, 100),
        _ => 0,
    }
}
