//! Loose value coercions used by comparisons and numeric state changes.
//!
//! Authored adventures compare loosely typed JSON values, so `"5" == 5` holds
//! and `">"` compares numerically. `None` stands for an unresolved path.

use serde_json::{Number, Value};

/// Numeric value of `value`; NaN when it has none.
pub fn to_number(value: Option<&Value>) -> f64 {
    match value {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(f64::NAN)
            }
        }
        Some(Value::Array(items)) => match items.as_slice() {
            [] => 0.0,
            [single] if !single.is_object() && !single.is_array() => to_number(Some(single)),
            _ => f64::NAN,
        },
        Some(Value::Object(_)) => f64::NAN,
    }
}

/// Textual form of `value` as used by `contains`.
pub fn to_text(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => number_text(n),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => to_text(Some(other)),
            })
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => "[object Object]".to_string(),
    }
}

fn number_text(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        // f64 Display already drops a trailing `.0`.
        n.as_f64().map(|f| f.to_string()).unwrap_or_default()
    }
}

/// Truthiness of a value when it is stored as a flag.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Loose equality. Objects and arrays compare structurally.
pub fn loose_eq(a: Option<&Value>, b: Option<&Value>) -> bool {
    let nullish = |v: Option<&Value>| matches!(v, None | Some(Value::Null));
    if nullish(a) || nullish(b) {
        return nullish(a) && nullish(b);
    }
    let (Some(a), Some(b)) = (a, b) else {
        return false;
    };

    match (a, b) {
        (Value::Number(_), Value::Number(_)) => to_number(Some(a)) == to_number(Some(b)),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Array(_), Value::Array(_)) | (Value::Object(_), Value::Object(_)) => a == b,
        (Value::Bool(_), _) => loose_eq(Some(&number_value(to_number(Some(a)))), Some(b)),
        (_, Value::Bool(_)) => loose_eq(Some(a), Some(&number_value(to_number(Some(b))))),
        (Value::Number(_), Value::String(_)) | (Value::String(_), Value::Number(_)) => {
            to_number(Some(a)) == to_number(Some(b))
        }
        (Value::Array(_) | Value::Object(_), _) => {
            loose_eq(Some(&Value::String(to_text(Some(a)))), Some(b))
        }
        (_, Value::Array(_) | Value::Object(_)) => {
            loose_eq(Some(a), Some(&Value::String(to_text(Some(b)))))
        }
        _ => false,
    }
}

/// JSON value for a number, kept integral when it has no fractional part.
/// Non-finite numbers become `null`.
pub fn number_value(n: f64) -> Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}
