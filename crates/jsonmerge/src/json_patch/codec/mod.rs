//! Patch codecs. Only the plain JSON form is supported.

pub mod json;
