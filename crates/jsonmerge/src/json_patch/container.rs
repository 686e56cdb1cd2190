//! Uniform token-keyed access to JSON objects and arrays.
//!
//! Every patch operation is written once against "a container and a key";
//! whether the key is a member name or an array index is decided here.

use jsonmerge_pointer::{parse_index, APPEND_INDEX};
use serde_json::{Map, Value};

use super::types::PatchError;

/// A borrowed view of an object or array value. Scalars have no container.
#[derive(Debug)]
pub enum Container<'a> {
    Object(&'a mut Map<String, Value>),
    Array(&'a mut Vec<Value>),
}

impl<'a> Container<'a> {
    pub fn from_value(value: &'a mut Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Container::Object(map)),
            Value::Array(arr) => Some(Container::Array(arr)),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Container::Object(_) => "object",
            Container::Array(_) => "array",
        }
    }

    pub fn get(&self, key: &str) -> Result<&Value, PatchError> {
        match self {
            Container::Object(map) => map
                .get(key)
                .ok_or_else(|| PatchError::MissingKey(key.to_string())),
            Container::Array(arr) => {
                let idx = existing_index(arr, key)?;
                Ok(&arr[idx])
            }
        }
    }

    /// Overwrites the value at `key`. On arrays the index must already exist;
    /// on objects a new member is appended after the existing ones.
    pub fn set(&mut self, key: &str, value: Value) -> Result<(), PatchError> {
        match self {
            Container::Object(map) => {
                map.insert(key.to_string(), value);
                Ok(())
            }
            Container::Array(arr) => {
                let idx = existing_index(arr, key)?;
                arr[idx] = value;
                Ok(())
            }
        }
    }

    /// JSON Patch `add`: upsert on objects, insert (shifting right) on arrays.
    pub fn add(&mut self, key: &str, value: Value) -> Result<(), PatchError> {
        self.try_add(key, value).map_err(|(e, _)| e)
    }

    /// Like [`Container::add`], but hands the value back when the key is not
    /// a valid insertion point.
    pub fn try_add(&mut self, key: &str, value: Value) -> Result<(), (PatchError, Value)> {
        match self {
            Container::Object(map) => {
                map.insert(key.to_string(), value);
                Ok(())
            }
            Container::Array(arr) => {
                if key == APPEND_INDEX {
                    arr.push(value);
                    return Ok(());
                }
                let idx = match index(key) {
                    Ok(idx) => idx,
                    Err(e) => return Err((e, value)),
                };
                if idx > arr.len() {
                    let e = PatchError::IndexOutOfBounds {
                        index: idx,
                        len: arr.len(),
                    };
                    return Err((e, value));
                }
                arr.insert(idx, value);
                Ok(())
            }
        }
    }

    /// Deletes the value at `key` and hands it back. Array elements after it
    /// shift left; remaining object members keep their order.
    pub fn remove(&mut self, key: &str) -> Result<Value, PatchError> {
        match self {
            Container::Object(map) => map
                .shift_remove(key)
                .ok_or_else(|| PatchError::MissingKey(key.to_string())),
            Container::Array(arr) => {
                let idx = existing_index(arr, key)?;
                Ok(arr.remove(idx))
            }
        }
    }

    /// Like [`Container::remove`], but also reports where the value sat so
    /// that [`Container::restore`] can put it back in the same place.
    pub fn take(&mut self, key: &str) -> Result<(Value, usize), PatchError> {
        match self {
            Container::Object(map) => {
                let pos = map
                    .keys()
                    .position(|k| k == key)
                    .ok_or_else(|| PatchError::MissingKey(key.to_string()))?;
                let value = map
                    .shift_remove(key)
                    .ok_or_else(|| PatchError::MissingKey(key.to_string()))?;
                Ok((value, pos))
            }
            Container::Array(arr) => {
                let idx = existing_index(arr, key)?;
                Ok((arr.remove(idx), idx))
            }
        }
    }

    /// Reinserts a value taken with [`Container::take`] at position `pos`.
    pub fn restore(&mut self, key: &str, value: Value, pos: usize) {
        match self {
            Container::Object(map) => {
                let members = std::mem::take(&mut **map);
                let mut value = Some(value);
                for (i, (k, v)) in members.into_iter().enumerate() {
                    if i == pos {
                        if let Some(value) = value.take() {
                            map.insert(key.to_string(), value);
                        }
                    }
                    map.insert(k, v);
                }
                if let Some(value) = value {
                    map.insert(key.to_string(), value);
                }
            }
            Container::Array(arr) => {
                let pos = pos.min(arr.len());
                arr.insert(pos, value);
            }
        }
    }

    /// Consumes the view and descends into the child at `key`, keeping the
    /// original borrow.
    pub fn into_child(self, key: &str) -> Result<&'a mut Value, PatchError> {
        match self {
            Container::Object(map) => map
                .get_mut(key)
                .ok_or_else(|| PatchError::MissingKey(key.to_string())),
            Container::Array(arr) => {
                let idx = existing_index(arr, key)?;
                Ok(&mut arr[idx])
            }
        }
    }
}

fn index(key: &str) -> Result<usize, PatchError> {
    parse_index(key).ok_or_else(|| PatchError::InvalidIndex(key.to_string()))
}

fn existing_index(arr: &[Value], key: &str) -> Result<usize, PatchError> {
    let idx = index(key)?;
    if idx >= arr.len() {
        return Err(PatchError::IndexOutOfBounds {
            index: idx,
            len: arr.len(),
        });
    }
    Ok(idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_have_no_container() {
        assert!(Container::from_value(&mut json!(1)).is_none());
        assert!(Container::from_value(&mut json!("s")).is_none());
        assert!(Container::from_value(&mut Value::Null).is_none());
    }

    #[test]
    fn object_get_set_remove() {
        let mut doc = json!({"a": 1, "b": 2});
        let mut c = Container::from_value(&mut doc).unwrap();
        assert_eq!(c.get("a"), Ok(&json!(1)));
        assert_eq!(c.get("z"), Err(PatchError::MissingKey("z".into())));
        c.set("a", json!(10)).unwrap();
        c.add("c", json!(3)).unwrap();
        assert_eq!(c.remove("z"), Err(PatchError::MissingKey("z".into())));
        assert_eq!(c.remove("b"), Ok(json!(2)));
        assert_eq!(doc, json!({"a": 10, "c": 3}));
    }

    #[test]
    fn object_overwrite_keeps_order() {
        let mut doc = json!({"a": 1, "b": 2, "c": 3});
        let mut c = Container::from_value(&mut doc).unwrap();
        c.set("a", json!(0)).unwrap();
        c.remove("b").unwrap();
        let keys: Vec<&String> = doc.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["a", "c"]);
    }

    #[test]
    fn array_add_inserts_and_appends() {
        let mut doc = json!(["a", "c"]);
        let mut c = Container::from_value(&mut doc).unwrap();
        c.add("1", json!("b")).unwrap();
        c.add("3", json!("d")).unwrap();
        c.add("-", json!("e")).unwrap();
        assert_eq!(
            c.add("6", json!("x")),
            Err(PatchError::IndexOutOfBounds { index: 6, len: 5 })
        );
        assert_eq!(doc, json!(["a", "b", "c", "d", "e"]));
    }

    #[test]
    fn array_set_requires_existing_index() {
        let mut doc = json!([1, 2]);
        let mut c = Container::from_value(&mut doc).unwrap();
        c.set("1", json!(20)).unwrap();
        assert_eq!(
            c.set("2", json!(3)),
            Err(PatchError::IndexOutOfBounds { index: 2, len: 2 })
        );
        assert_eq!(c.set("-", json!(3)), Err(PatchError::InvalidIndex("-".into())));
        assert_eq!(doc, json!([1, 20]));
    }

    #[test]
    fn array_rejects_bad_tokens() {
        let mut doc = json!([1, 2]);
        let mut c = Container::from_value(&mut doc).unwrap();
        for token in ["-1", "x", "01", "1.0", ""] {
            assert_eq!(c.get(token), Err(PatchError::InvalidIndex(token.into())));
            assert_eq!(c.add(token, json!(0)), Err(PatchError::InvalidIndex(token.into())));
        }
        assert_eq!(c.get("-"), Err(PatchError::InvalidIndex("-".into())));
        assert_eq!(c.remove("-"), Err(PatchError::InvalidIndex("-".into())));
    }

    #[test]
    fn take_and_restore_keep_member_position() {
        let mut v = json!({"a": 1, "b": 2, "c": 3});
        let mut c = Container::from_value(&mut v).unwrap();
        let (taken, pos) = c.take("b").unwrap();
        assert_eq!((taken.clone(), pos), (json!(2), 1));
        c.restore("b", taken, pos);
        let keys: Vec<&String> = v.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["a", "b", "c"]);
    }

    #[test]
    fn take_and_restore_keep_element_index() {
        let mut v = json!([1, 2, 3]);
        let mut c = Container::from_value(&mut v).unwrap();
        let (taken, pos) = c.take("0").unwrap();
        c.restore("0", taken, pos);
        assert_eq!(v, json!([1, 2, 3]));
    }

    #[test]
    fn array_remove_shifts_left() {
        let mut doc = json!([1, 2, 3]);
        let mut c = Container::from_value(&mut doc).unwrap();
        assert_eq!(c.remove("0"), Ok(json!(1)));
        assert_eq!(
            c.remove("2"),
            Err(PatchError::IndexOutOfBounds { index: 2, len: 2 })
        );
        assert_eq!(doc, json!([2, 3]));
    }

    #[test]
    fn into_child_descends() {
        let mut doc = json!({"a": [{"b": 1}]});
        let c = Container::from_value(&mut doc).unwrap();
        let arr = c.into_child("a").unwrap();
        let c = Container::from_value(arr).unwrap();
        assert_eq!(c.kind(), "array");
        let obj = c.into_child("0").unwrap();
        *obj = json!("replaced");
        assert_eq!(doc, json!({"a": ["replaced"]}));
    }
}
