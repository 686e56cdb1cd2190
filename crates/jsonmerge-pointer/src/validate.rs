//! Validation functions for JSON Pointer.

use crate::JsonPointerError;

/// Validate a JSON Pointer string without decoding it.
///
/// # Errors
///
/// Returns [`JsonPointerError::Malformed`] if the pointer is non-empty and
/// does not start with `/`.
///
/// # Example
///
/// ```
/// use jsonmerge_pointer::validate_json_pointer;
///
/// validate_json_pointer("").unwrap();
/// validate_json_pointer("/foo/bar").unwrap();
/// validate_json_pointer("foo").unwrap_err();
/// ```
pub fn validate_json_pointer(pointer: &str) -> Result<(), JsonPointerError> {
    if pointer.is_empty() || pointer.starts_with('/') {
        return Ok(());
    }
    Err(JsonPointerError::Malformed(pointer.to_string()))
}
