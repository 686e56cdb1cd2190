//! JSON Patch apply logic.
//!
//! Operations run strictly in order against one exclusively borrowed
//! document. The first failure stops the patch; unless the caller asked for
//! an atomic apply, the operations before it stay applied.

use jsonmerge_pointer::{is_child, is_path_equal};
use serde_json::Value;
use tracing::{debug, trace};

use super::equal::json_equal;
use super::resolve::{find_container, get_value, parse_path};
use super::types::{json_type_name, ApplyPatchOptions, OpKind, Operation, Patch, PatchError};

// ── Placement helpers ─────────────────────────────────────────────────────

/// Puts `value` at `path`. The root is not a mutable location, so `""`
/// fails to resolve. On failure nothing is modified and the value is handed
/// back.
fn place(doc: &mut Value, path: &str, value: Value) -> Result<(), (PatchError, Value)> {
    match find_container(doc, path) {
        Ok((mut parent, key)) => parent.try_add(&key, value),
        Err(e) => Err((e, value)),
    }
}

fn add_value(doc: &mut Value, path: &str, value: Value) -> Result<(), PatchError> {
    place(doc, path, value).map_err(|(e, _)| e)
}

fn take_value(doc: &mut Value, path: &str) -> Result<Value, PatchError> {
    let (mut parent, key) = find_container(doc, path)?;
    parent.remove(&key)
}

fn replace_root(doc: &mut Value, value: Value) -> Result<(), PatchError> {
    match value {
        Value::Object(_) | Value::Array(_) => {
            *doc = value;
            Ok(())
        }
        other => Err(PatchError::InvalidRoot(json_type_name(&other))),
    }
}

// ── Individual operation applicators ─────────────────────────────────────

fn apply_add(doc: &mut Value, op: &Operation) -> Result<(), PatchError> {
    let path = op.path()?;
    let value = op.value()?.clone();
    add_value(doc, path, value)
}

fn apply_remove(doc: &mut Value, op: &Operation) -> Result<(), PatchError> {
    let path = op.path()?;
    if path.is_empty() {
        return Err(PatchError::InvalidTarget(
            "cannot remove the document root".into(),
        ));
    }
    take_value(doc, path).map(drop)
}

fn apply_replace(doc: &mut Value, op: &Operation) -> Result<(), PatchError> {
    let path = op.path()?;
    let value = op.value()?.clone();
    if path.is_empty() {
        return replace_root(doc, value);
    }
    let (mut parent, key) = find_container(doc, path)?;
    // Replace never creates.
    parent.get(&key)?;
    parent.set(&key, value)
}

fn apply_move(doc: &mut Value, op: &Operation) -> Result<(), PatchError> {
    let from = op.from()?;
    let path = op.path()?;
    let from_path = parse_path(from)?;
    let to_path = parse_path(path)?;

    if is_path_equal(&from_path, &to_path) {
        return get_value(doc, from).map(drop);
    }
    if is_child(&from_path, &to_path) {
        return Err(PatchError::InvalidTarget(format!(
            "cannot move {from:?} into its own child {path:?}"
        )));
    }

    let (value, pos) = {
        let (mut source, key) = find_container(doc, from)?;
        source.take(&key)?
    };
    if let Err((e, value)) = place(doc, path, value) {
        debug!(from, path, error = %e, "move destination rejected, restoring source");
        let (mut source, key) = find_container(doc, from)?;
        source.restore(&key, value, pos);
        return Err(e);
    }
    Ok(())
}

fn apply_copy(doc: &mut Value, op: &Operation) -> Result<(), PatchError> {
    let from = op.from()?;
    let path = op.path()?;
    let value = get_value(doc, from)?.clone();
    add_value(doc, path, value)
}

fn apply_test(doc: &Value, op: &Operation) -> Result<(), PatchError> {
    let path = op.path()?;
    let expected = op.value()?;
    let actual = get_value(doc, path)?;
    if json_equal(actual, expected) {
        Ok(())
    } else {
        Err(PatchError::TestFailed {
            path: path.to_string(),
        })
    }
}

// ── Main apply functions ──────────────────────────────────────────────────

/// Apply a single operation to the document in place.
pub fn apply_op(doc: &mut Value, op: &Operation) -> Result<(), PatchError> {
    match op.op_kind() {
        OpKind::Add => apply_add(doc, op),
        OpKind::Remove => apply_remove(doc, op),
        OpKind::Replace => apply_replace(doc, op),
        OpKind::Move => apply_move(doc, op),
        OpKind::Test => apply_test(doc, op),
        OpKind::Copy => apply_copy(doc, op),
        OpKind::Unknown(kind) => Err(PatchError::UnknownOp(kind)),
    }
}

/// Apply operations in order, stopping at the first failure.
///
/// The returned error is a [`PatchError::Operation`] naming the failing
/// step. Operations before it are not rolled back.
pub fn apply_ops(doc: &mut Value, ops: &[Operation]) -> Result<(), PatchError> {
    for (index, op) in ops.iter().enumerate() {
        let kind = op.kind();
        let path = op.path().unwrap_or_default();
        debug!(index, op = kind, path, "applying operation");
        if let Err(e) = apply_op(doc, op) {
            debug!(index, op = kind, path, error = %e, "operation failed");
            return Err(PatchError::Operation {
                index,
                op: kind.to_string(),
                path: path.to_string(),
                source: Box::new(e),
            });
        }
    }
    trace!(count = ops.len(), "patch applied");
    Ok(())
}

/// Apply a patch with options.
///
/// With `atomic: true` the document is cloned up front and put back if any
/// operation fails, so the caller sees either every operation or none.
pub fn apply_patch(
    doc: &mut Value,
    patch: &Patch,
    options: &ApplyPatchOptions,
) -> Result<(), PatchError> {
    if !options.atomic {
        return apply_ops(doc, patch.operations());
    }
    let snapshot = doc.clone();
    let result = apply_ops(doc, patch.operations());
    if result.is_err() {
        debug!("restoring document snapshot");
        *doc = snapshot;
    }
    result
}

/// Apply a patch to a serialized document and serialize the result.
///
/// An empty buffer is returned unchanged without being parsed.
pub fn apply(patch: &Patch, doc: &[u8]) -> Result<Vec<u8>, PatchError> {
    if doc.is_empty() {
        return Ok(Vec::new());
    }
    let mut parsed: Value = serde_json::from_slice(doc)?;
    apply_ops(&mut parsed, patch.operations())?;
    Ok(serde_json::to_vec(&parsed)?)
}

impl Patch {
    /// See [`apply`].
    pub fn apply(&self, doc: &[u8]) -> Result<Vec<u8>, PatchError> {
        apply(self, doc)
    }

    /// Apply to an already parsed document in place.
    pub fn apply_value(&self, doc: &mut Value) -> Result<(), PatchError> {
        apply_ops(doc, self.operations())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
