//! Cell coercion. Every function here is total: bad input becomes `None`
//! (or `false` for booleans), never an error.

use serde_json::Value;

const NULL_LITERALS: [&str; 4] = ["none", "null", "n/a", "na"];
const TRUE_LITERALS: [&str; 4] = ["yes", "true", "1", "y"];

/// Trimmed string or untouched non-string scalar; `None` for anything in
/// the null vocabulary.
pub fn clean_value(value: Option<&Value>) -> Option<Value> {
    match value? {
        Value::Null => None,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || NULL_LITERALS.contains(&trimmed.to_ascii_lowercase().as_str()) {
                None
            } else {
                Some(Value::String(trimmed.to_string()))
            }
        }
        other => Some(other.clone()),
    }
}

/// `clean_value` rendered as text, for string-typed destination columns.
pub fn clean_text(value: Option<&Value>) -> Option<String> {
    match clean_value(value)? {
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

pub fn clean_numeric(value: Option<&Value>) -> Option<f64> {
    let parsed = match clean_value(value)? {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
        Value::String(s) => s
            .replace(['$', ','], "")
            .trim()
            .parse::<f64>()
            .ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

/// Truncates toward zero.
pub fn clean_int(value: Option<&Value>) -> Option<i64> {
    clean_numeric(value).map(|n| n.trunc() as i64)
}

pub fn clean_bool(value: Option<&Value>) -> bool {
    match clean_value(value) {
        None => false,
        Some(Value::Bool(b)) => b,
        Some(Value::String(s)) => TRUE_LITERALS.contains(&s.to_ascii_lowercase().as_str()),
        Some(other) => TRUE_LITERALS.contains(&other.to_string().as_str()),
    }
}
