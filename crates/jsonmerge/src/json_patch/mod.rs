//! JSON Patch (RFC 6902) implementation.
//!
//! # Operations
//!
//! `add`, `remove`, `replace`, `move`, `copy` and `test`.
//!
//! Targets are resolved through JSON Pointers by walking every token but the
//! last; the last token is then applied to the parent [`Container`], which
//! hides whether it is an object member or an array index.
//!
//! ```
//! use jsonmerge::json_patch::Patch;
//!
//! let patch = Patch::decode(br#"[{"op":"add","path":"/foo/1","value":"qux"}]"#).unwrap();
//! let out = patch.apply(br#"{"foo":["bar","baz"]}"#).unwrap();
//! assert_eq!(out, br#"{"foo":["bar","qux","baz"]}"#);
//! ```

pub mod types;
pub mod container;
pub mod resolve;
pub mod equal;
pub mod apply;
pub mod codec;

pub use types::{ApplyPatchOptions, OpKind, Operation, Patch, PatchError};
pub use container::Container;
pub use resolve::{find_container, get_value};
pub use equal::json_equal;
pub use apply::{apply, apply_op, apply_ops, apply_patch};
pub use codec::json::{decode_patch, encode_patch, from_json, from_json_patch, to_json, to_json_patch};
