//! JSON codec for patches.
//!
//! Decoding only checks the outer shape (an array of objects); the fields of
//! each operation are validated lazily when the operation is applied.
//! Encoding writes every operation back with its original members.

use serde_json::Value;

use crate::json_patch::types::{json_type_name, Operation, Patch, PatchError};

// ── Deserialization ───────────────────────────────────────────────────────

/// Decode a raw patch buffer.
pub fn decode_patch(buf: &[u8]) -> Result<Patch, PatchError> {
    let parsed: Value = serde_json::from_slice(buf)?;
    from_json_patch(parsed)
}

/// Convert an already parsed JSON array into a [`Patch`].
pub fn from_json_patch(v: Value) -> Result<Patch, PatchError> {
    let ops = match v {
        Value::Array(ops) => ops,
        other => {
            return Err(PatchError::Malformed(format!(
                "unexpected patch type: {}",
                json_type_name(&other)
            )))
        }
    };
    ops.into_iter()
        .enumerate()
        .map(|(index, op)| from_json(op).map_err(|e| at_index(index, e)))
        .collect()
}

/// Convert one JSON object into an [`Operation`].
pub fn from_json(v: Value) -> Result<Operation, PatchError> {
    match v {
        Value::Object(fields) => Ok(Operation::from_map(fields)),
        other => Err(PatchError::Malformed(format!(
            "operation must be an object, got {}",
            json_type_name(&other)
        ))),
    }
}

fn at_index(index: usize, e: PatchError) -> PatchError {
    match e {
        PatchError::Malformed(msg) => PatchError::Malformed(format!("element {index}: {msg}")),
        other => other,
    }
}

// ── Serialization ─────────────────────────────────────────────────────────

pub fn to_json(op: &Operation) -> Value {
    Value::Object(op.as_map().clone())
}

pub fn to_json_patch(patch: &Patch) -> Value {
    Value::Array(patch.iter().map(to_json).collect())
}

/// Encode a patch as a compact JSON array.
pub fn encode_patch(patch: &Patch) -> Result<Vec<u8>, PatchError> {
    Ok(serde_json::to_vec(&to_json_patch(patch))?)
}

impl Patch {
    /// See [`decode_patch`].
    pub fn decode(buf: &[u8]) -> Result<Self, PatchError> {
        decode_patch(buf)
    }

    /// See [`encode_patch`].
    pub fn marshal(&self) -> Result<Vec<u8>, PatchError> {
        encode_patch(self)
    }
}

impl TryFrom<Value> for Patch {
    type Error = PatchError;

    fn try_from(v: Value) -> Result<Self, Self::Error> {
        from_json_patch(v)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json_patch::types::OpKind;
    use serde_json::json;

    #[test]
    fn decode_single_move() {
        let patch = decode_patch(
            br#"[
                { "op": "move", "from": "/biscuits", "path": "/cookies" }
            ]"#,
        )
        .unwrap();
        assert_eq!(patch.len(), 1);
        let op = &patch[0];
        assert_eq!(op.kind(), "move");
        assert_eq!(op.path(), Ok("/cookies"));
        assert_eq!(op.from(), Ok("/biscuits"));
    }

    #[test]
    fn decode_single_add() {
        let patch = decode_patch(
            br#"[{ "op": "add", "path": "/biscuits/1", "value": { "name": "Ginger Nut" } }]"#,
        )
        .unwrap();
        let op = &patch[0];
        assert_eq!(op.op_kind(), OpKind::Add);
        assert_eq!(op.path(), Ok("/biscuits/1"));
        assert!(op.from().is_err());
    }

    #[test]
    fn decode_keeps_order() {
        let patch = decode_patch(
            br#"[{"op":"test","path":"/a","value":1},{"op":"remove","path":"/a"},{"op":"add","path":"/b","value":2}]"#,
        )
        .unwrap();
        let kinds: Vec<&str> = patch.iter().map(Operation::kind).collect();
        assert_eq!(kinds, ["test", "remove", "add"]);
    }

    #[test]
    fn decode_empty_patch() {
        assert!(decode_patch(b"[]").unwrap().is_empty());
    }

    #[test]
    fn decode_rejects_non_array() {
        assert_eq!(
            decode_patch(br#"{"op":"add"}"#),
            Err(PatchError::Malformed("unexpected patch type: object".into()))
        );
    }

    #[test]
    fn decode_rejects_non_object_element() {
        assert_eq!(
            decode_patch(br#"[{"op":"remove","path":"/a"}, 3]"#),
            Err(PatchError::Malformed(
                "element 1: operation must be an object, got number".into()
            ))
        );
    }

    #[test]
    fn decode_rejects_invalid_json() {
        assert!(matches!(decode_patch(b"[{"), Err(PatchError::Json(_))));
    }

    #[test]
    fn decode_is_lazy_about_fields() {
        // Missing fields only surface when the operation is applied.
        let patch = decode_patch(br#"[{"op":"add"}]"#).unwrap();
        assert_eq!(
            patch[0].path(),
            Err(PatchError::MissingField { field: "path" })
        );
    }

    #[test]
    fn encode_preserves_fields_and_order() {
        let src = json!([
            { "op": "add", "path": "/a", "value": { "x": [1, 2] }, "comment": "kept" },
            { "op": "copy", "from": "/a", "path": "/b" }
        ]);
        let patch = Patch::try_from(src.clone()).unwrap();
        let out: Value = serde_json::from_slice(&patch.marshal().unwrap()).unwrap();
        assert_eq!(out, src);
    }
}
