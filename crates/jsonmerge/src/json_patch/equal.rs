use serde_json::{Number, Value};

/// Structural equality as JSON Patch `test` defines it.
///
/// Objects compare member-wise regardless of key order, arrays element-wise,
/// and numbers by numeric value, so `1` equals `1.0`.
///
/// ```
/// use serde_json::json;
/// use jsonmerge::json_patch::json_equal;
///
/// assert!(json_equal(&json!({"a": 1, "b": [1.0]}), &json!({"b": [1], "a": 1.0})));
/// assert!(!json_equal(&json!([1, 2]), &json!([2, 1])));
/// ```
pub fn json_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => number_equal(a, b),
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(arr_a), Value::Array(arr_b)) => {
            arr_a.len() == arr_b.len() && arr_a.iter().zip(arr_b).all(|(x, y)| json_equal(x, y))
        }
        (Value::Object(obj_a), Value::Object(obj_b)) => {
            if obj_a.len() != obj_b.len() {
                return false;
            }
            obj_a
                .iter()
                .all(|(key, val_a)| obj_b.get(key).is_some_and(|val_b| json_equal(val_a, val_b)))
        }
        _ => false,
    }
}

fn number_equal(a: &Number, b: &Number) -> bool {
    if a == b {
        return true;
    }
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}
