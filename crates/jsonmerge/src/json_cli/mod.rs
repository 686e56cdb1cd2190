//! Command-line glue for the `json-patch` binary.
//!
//! The binary only parses flags and does I/O; everything testable lives here.

use serde_json::Value;
use thiserror::Error;

use crate::json_patch::{apply_patch, decode_patch, ApplyPatchOptions, PatchError};

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CliError {
    #[error("document is not valid JSON: {0}")]
    Document(#[from] serde_json::Error),
    #[error(transparent)]
    Patch(#[from] PatchError),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

// ── json-patch ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    /// Leave the document untouched unless every operation succeeds.
    pub atomic: bool,
    pub pretty: bool,
}

/// Apply a JSON Patch (given as a JSON array string) to a JSON document.
///
/// Returns the patched document as compact JSON.
pub fn apply_json_patch(doc_json: &str, patch_json: &str) -> Result<String, CliError> {
    apply_json_patch_with(doc_json, patch_json, &CliOptions::default())
}

pub fn apply_json_patch_with(
    doc_json: &str,
    patch_json: &str,
    options: &CliOptions,
) -> Result<String, CliError> {
    let patch = decode_patch(patch_json.as_bytes())?;
    // Nothing to patch; mirrors the byte-level short-circuit.
    if doc_json.trim().is_empty() {
        return Ok(String::new());
    }
    let mut doc: Value = serde_json::from_str(doc_json)?;
    let apply_options = ApplyPatchOptions {
        atomic: options.atomic,
    };
    apply_patch(&mut doc, &patch, &apply_options)?;
    let out = if options.pretty {
        serde_json::to_string_pretty(&doc)?
    } else {
        serde_json::to_string(&doc)?
    };
    Ok(out)
}

// ── Tests ─────────────────────────────────────────────────────────────────
