//! JSON Pointer (RFC 6901) utilities.
//!
//! This crate implements the pointer half of [RFC 6901](https://tools.ietf.org/html/rfc6901):
//! splitting a pointer into reference tokens, unescaping and escaping them,
//! and the small path relationship helpers the patch engine needs.
//!
//! # Example
//!
//! ```
//! use jsonmerge_pointer::{format_json_pointer, parse_json_pointer};
//!
//! let path = parse_json_pointer("/foo/bar").unwrap();
//! assert_eq!(path, vec!["foo".to_string(), "bar".to_string()]);
//!
//! let pointer = format_json_pointer(&path);
//! assert_eq!(pointer, "/foo/bar");
//! ```

use thiserror::Error;

pub mod types;
pub use types::{Path, PathStep, APPEND_INDEX};

pub mod util;
pub use util::{
    escape_component, format_json_pointer, is_child, is_path_equal, is_root, is_valid_index,
    parent, parse_index, parse_json_pointer, unescape_component,
};

pub mod validate;
pub use validate::validate_json_pointer;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JsonPointerError {
    /// A non-empty pointer that does not start with `/`.
    #[error("malformed JSON pointer {0:?}: must be empty or start with '/'")]
    Malformed(String),
    #[error("root path has no parent")]
    NoParent,
}
