use serde_json::Value;

/// Extracts the row array from a backend list payload. The backend
/// answers some list endpoints with a bare array and others with a
/// paginated `{"results": [...]}` envelope.
pub fn result_rows(value: &Value) -> Vec<Value> {
    if let Some(rows) = value.as_array() {
        return rows.clone();
    }
    for key in ["results", "data", "items"] {
        if let Some(rows) = value.get(key).and_then(|v| v.as_array()) {
            return rows.clone();
        }
    }
    Vec::new()
}

pub fn pick_string(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(v) = value.get(*key) {
            if let Some(s) = as_string(v) {
                return Some(s);
            }
        }
    }
    None
}

pub fn pick_u64(value: &Value, keys: &[&str]) -> Option<u64> {
    for key in keys {
        if let Some(v) = value.get(*key) {
            if let Some(num) = v.as_u64() {
                return Some(num);
            }
            if let Some(s) = v.as_str() {
                if let Ok(num) = s.parse::<u64>() {
                    return Some(num);
                }
            }
        }
    }
    None
}

pub fn pick_f64(value: &Value, keys: &[&str]) -> Option<f64> {
    for key in keys {
        if let Some(v) = value.get(*key) {
            if let Some(num) = v.as_f64() {
                return Some(num);
            }
            if let Some(s) = v.as_str() {
                if let Ok(num) = s.trim().parse::<f64>() {
                    return Some(num);
                }
            }
        }
    }
    None
}

pub fn pick_bool(value: &Value, keys: &[&str]) -> Option<bool> {
    for key in keys {
        if let Some(v) = value.get(*key) {
            match v {
                Value::Bool(b) => return Some(*b),
                Value::String(s) => match s.trim().to_lowercase().as_str() {
                    "true" | "yes" | "1" => return Some(true),
                    "false" | "no" | "0" => return Some(false),
                    _ => {}
                },
                Value::Number(n) => {
                    if let Some(num) = n.as_i64() {
                        return Some(num != 0);
                    }
                }
                _ => {}
            }
        }
    }
    None
}

fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => {
            if let Some(Value::String(name)) = map.get("name") {
                return Some(name.trim().to_string());
            }
            None
        }
        _ => None,
    }
}
