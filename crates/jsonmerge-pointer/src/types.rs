//! Type definitions for JSON Pointer.

/// A single decoded reference token.
///
/// Tokens are opaque strings; whether one is a valid array index is only
/// decided once the enclosing container turns out to be an array.
pub type PathStep = String;

/// A decoded JSON Pointer: the ordered reference tokens, root first.
pub type Path = Vec<PathStep>;

/// The array token meaning "one past the last element".
pub const APPEND_INDEX: &str = "-";
