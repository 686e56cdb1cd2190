//! Core types for the JSON Patch module: the error taxonomy, the lazily
//! validated [`Operation`] wrapper and the ordered [`Patch`].

use std::fmt;
use std::ops::Index;

use jsonmerge_pointer::JsonPointerError;
use serde_json::{Map, Value};
use thiserror::Error;

// ── Error ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatchError {
    /// The input could not be parsed as JSON at all.
    #[error("invalid JSON: {0}")]
    Json(String),
    /// The patch is valid JSON but not an array of objects.
    #[error("malformed patch: {0}")]
    Malformed(String),
    #[error("couldn't get {field} field")]
    MissingField { field: &'static str },
    #[error(transparent)]
    Pointer(#[from] JsonPointerError),
    #[error("doc is missing path: {0}")]
    MissingPath(String),
    #[error("missing key {0:?}")]
    MissingKey(String),
    #[error("invalid array index {0:?}")]
    InvalidIndex(String),
    #[error("array index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("invalid target: {0}")]
    InvalidTarget(String),
    #[error("invalid json type for document root: {0}")]
    InvalidRoot(&'static str),
    #[error("test failed for path {path:?}")]
    TestFailed { path: String },
    #[error("unexpected operation kind: {0}")]
    UnknownOp(String),
    /// Context wrapper added by the engine around the failure of one step.
    #[error("operation {index} ({op}) at path {path:?} failed: {source}")]
    Operation {
        index: usize,
        op: String,
        path: String,
        #[source]
        source: Box<PatchError>,
    },
}

impl PatchError {
    /// Strips the [`PatchError::Operation`] context layer, if any.
    pub fn root_cause(&self) -> &PatchError {
        match self {
            PatchError::Operation { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl From<serde_json::Error> for PatchError {
    fn from(e: serde_json::Error) -> Self {
        PatchError::Json(e.to_string())
    }
}

/// Name of a JSON value's type, as used in error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ── Operation kind ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpKind {
    Add,
    Remove,
    Replace,
    Move,
    Test,
    Copy,
    /// Anything else, including a missing or non-string `op` member.
    Unknown(String),
}

impl OpKind {
    pub fn parse(s: &str) -> Self {
        match s {
            "add" => OpKind::Add,
            "remove" => OpKind::Remove,
            "replace" => OpKind::Replace,
            "move" => OpKind::Move,
            "test" => OpKind::Test,
            "copy" => OpKind::Copy,
            other => OpKind::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            OpKind::Add => "add",
            OpKind::Remove => "remove",
            OpKind::Replace => "replace",
            OpKind::Move => "move",
            OpKind::Test => "test",
            OpKind::Copy => "copy",
            OpKind::Unknown(name) => name,
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Operation ─────────────────────────────────────────────────────────────

/// A single decoded patch step.
///
/// The original JSON object is kept untouched: fields are only read (and
/// validated) when the engine needs them, and encoding writes back exactly
/// what was decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    fields: Map<String, Value>,
}

impl Operation {
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn add(path: impl Into<String>, value: Value) -> Self {
        Self::build("add", path.into(), None, Some(value))
    }

    pub fn remove(path: impl Into<String>) -> Self {
        Self::build("remove", path.into(), None, None)
    }

    pub fn replace(path: impl Into<String>, value: Value) -> Self {
        Self::build("replace", path.into(), None, Some(value))
    }

    pub fn move_value(from: impl Into<String>, path: impl Into<String>) -> Self {
        Self::build("move", path.into(), Some(from.into()), None)
    }

    pub fn copy_value(from: impl Into<String>, path: impl Into<String>) -> Self {
        Self::build("copy", path.into(), Some(from.into()), None)
    }

    pub fn test(path: impl Into<String>, value: Value) -> Self {
        Self::build("test", path.into(), None, Some(value))
    }

    fn build(op: &str, path: String, from: Option<String>, value: Option<Value>) -> Self {
        let mut fields = Map::new();
        fields.insert("op".into(), Value::String(op.to_string()));
        if let Some(from) = from {
            fields.insert("from".into(), Value::String(from));
        }
        fields.insert("path".into(), Value::String(path));
        if let Some(value) = value {
            fields.insert("value".into(), value);
        }
        Self { fields }
    }

    /// The `op` member, or `"unknown"` when it is absent or not a string.
    pub fn kind(&self) -> &str {
        self.string_field("op").unwrap_or("unknown")
    }

    pub fn op_kind(&self) -> OpKind {
        OpKind::parse(self.kind())
    }

    pub fn path(&self) -> Result<&str, PatchError> {
        self.string_field("path")
            .ok_or(PatchError::MissingField { field: "path" })
    }

    pub fn from(&self) -> Result<&str, PatchError> {
        self.string_field("from")
            .ok_or(PatchError::MissingField { field: "from" })
    }

    /// The `value` member. An explicit `null` is a present value.
    pub(crate) fn value(&self) -> Result<&Value, PatchError> {
        self.fields
            .get("value")
            .ok_or(PatchError::MissingField { field: "value" })
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }

    fn string_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

// ── Patch ─────────────────────────────────────────────────────────────────

/// An ordered list of operations. Order is significant: every operation
/// sees the effects of the ones before it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch(Vec<Operation>);

impl Patch {
    pub fn new(ops: Vec<Operation>) -> Self {
        Self(ops)
    }

    pub fn operations(&self) -> &[Operation] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.0.iter()
    }

    pub fn push(&mut self, op: Operation) {
        self.0.push(op);
    }
}

impl From<Vec<Operation>> for Patch {
    fn from(ops: Vec<Operation>) -> Self {
        Self(ops)
    }
}

impl FromIterator<Operation> for Patch {
    fn from_iter<I: IntoIterator<Item = Operation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Patch {
    type Item = Operation;
    type IntoIter = std::vec::IntoIter<Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Patch {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Index<usize> for Patch {
    type Output = Operation;

    fn index(&self, index: usize) -> &Operation {
        &self.0[index]
    }
}

// ── Options ───────────────────────────────────────────────────────────────

/// Options for `apply_patch`.
#[derive(Debug, Clone, Default)]
pub struct ApplyPatchOptions {
    /// Snapshot the document before applying and restore it if any
    /// operation fails. Without this, operations that succeeded before the
    /// failing one stay applied.
    pub atomic: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn op(v: Value) -> Operation {
        match v {
            Value::Object(map) => Operation::from_map(map),
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn move_accessors() {
        let o = op(json!({ "op": "move", "from": "/biscuits", "path": "/cookies" }));
        assert_eq!(o.kind(), "move");
        assert_eq!(o.op_kind(), OpKind::Move);
        assert_eq!(o.path(), Ok("/cookies"));
        assert_eq!(o.from(), Ok("/biscuits"));
        assert_eq!(o.value(), Err(PatchError::MissingField { field: "value" }));
    }

    #[test]
    fn add_has_no_from() {
        let o = op(json!({ "op": "add", "path": "/biscuits/1", "value": { "name": "Ginger Nut" } }));
        assert_eq!(o.path(), Ok("/biscuits/1"));
        assert_eq!(o.from(), Err(PatchError::MissingField { field: "from" }));
        assert_eq!(o.value(), Ok(&json!({ "name": "Ginger Nut" })));
    }

    #[test]
    fn missing_or_non_string_op_is_unknown() {
        assert_eq!(op(json!({ "path": "/a" })).kind(), "unknown");
        assert_eq!(op(json!({ "op": 7, "path": "/a" })).kind(), "unknown");
        assert_eq!(
            op(json!({ "op": "frobnicate" })).op_kind(),
            OpKind::Unknown("frobnicate".into())
        );
    }

    #[test]
    fn non_string_path_is_missing() {
        let o = op(json!({ "op": "remove", "path": 3 }));
        assert_eq!(o.path(), Err(PatchError::MissingField { field: "path" }));
    }

    #[test]
    fn null_value_is_present() {
        let o = op(json!({ "op": "add", "path": "/a", "value": null }));
        assert_eq!(o.value(), Ok(&Value::Null));
    }

    #[test]
    fn constructors_match_decoded_form() {
        assert_eq!(
            Operation::move_value("/a", "/b"),
            op(json!({ "op": "move", "from": "/a", "path": "/b" }))
        );
        assert_eq!(Operation::remove("/a"), op(json!({ "op": "remove", "path": "/a" })));
    }

    #[test]
    fn root_cause_unwraps_context() {
        let err = PatchError::Operation {
            index: 2,
            op: "remove".into(),
            path: "/x".into(),
            source: Box::new(PatchError::MissingKey("x".into())),
        };
        assert_eq!(err.root_cause(), &PatchError::MissingKey("x".into()));
        assert_eq!(
            err.to_string(),
            "operation 2 (remove) at path \"/x\" failed: missing key \"x\""
        );
    }
}
