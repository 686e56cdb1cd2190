//! jsonmerge: apply JSON Patch (RFC 6902) documents in place.
//!
//! Patch targets are JSON Pointers (RFC 6901), decoded by the
//! `jsonmerge-pointer` crate. Documents are plain `serde_json::Value`s with
//! member order preserved.
//!
//! - [`json_patch`]: operations, pointer resolution, the apply engine and
//!   the JSON codec.
//! - [`json_cli`]: the logic behind the `json-patch` binary.

pub mod json_patch;
pub mod json_cli;

pub use json_patch::{apply, apply_patch, decode_patch, encode_patch, Operation, Patch, PatchError};
