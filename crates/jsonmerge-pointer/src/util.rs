use crate::types::Path;
use crate::JsonPointerError;

/// Unescapes a JSON Pointer path component.
///
/// `~1` becomes `/` and `~0` becomes `~`. The component is scanned once from
/// left to right, so `~01` decodes to `~1` and never to `/`. A `~` that is not
/// part of an escape sequence is kept as is.
///
/// # Example
///
/// ```
/// use jsonmerge_pointer::unescape_component;
///
/// assert_eq!(unescape_component("a~0b"), "a~b");
/// assert_eq!(unescape_component("c~1d"), "c/d");
/// assert_eq!(unescape_component("a~01b"), "a~1b");
/// ```
pub fn unescape_component(component: &str) -> String {
    if !component.contains('~') {
        return component.to_string();
    }
    let mut out = String::with_capacity(component.len());
    let mut chars = component.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('1') => {
                chars.next();
                out.push('/');
            }
            Some('0') => {
                chars.next();
                out.push('~');
            }
            _ => out.push('~'),
        }
    }
    out
}

/// Escapes a JSON Pointer path component.
///
/// `~` must be escaped before `/`, otherwise the `~` of `~1` would be escaped
/// again.
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    component.replace('~', "~0").replace('/', "~1")
}

/// Parse a JSON Pointer string into decoded path components.
///
/// - The empty string is the whole document and yields an empty path.
/// - The leading `/` is stripped and the rest is split on `/`.
/// - Anything else is malformed.
///
/// # Example
///
/// ```
/// use jsonmerge_pointer::parse_json_pointer;
///
/// assert_eq!(parse_json_pointer("").unwrap(), Vec::<String>::new());
/// assert_eq!(parse_json_pointer("/").unwrap(), vec![""]);
/// assert_eq!(parse_json_pointer("/a~0b/c~1d").unwrap(), vec!["a~b", "c/d"]);
/// assert!(parse_json_pointer("foo").is_err());
/// ```
pub fn parse_json_pointer(pointer: &str) -> Result<Path, JsonPointerError> {
    if pointer.is_empty() {
        return Ok(Vec::new());
    }
    match pointer.strip_prefix('/') {
        Some(rest) => Ok(rest.split('/').map(unescape_component).collect()),
        None => Err(JsonPointerError::Malformed(pointer.to_string())),
    }
}

/// Format path components into a JSON Pointer string.
///
/// Returns an empty string for the root path.
pub fn format_json_pointer(path: &[String]) -> String {
    if path.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    for component in path {
        out.push('/');
        out.push_str(&escape_component(component));
    }
    out
}

/// Check if a path points to the root value.
pub fn is_root(path: &[String]) -> bool {
    path.is_empty()
}

/// Check if `child` lies strictly below `parent`.
///
/// # Example
///
/// ```
/// use jsonmerge_pointer::is_child;
///
/// let parent = vec!["foo".to_string()];
/// let child = vec!["foo".to_string(), "bar".to_string()];
/// assert!(is_child(&parent, &child));
/// assert!(!is_child(&child, &parent));
/// ```
pub fn is_child(parent: &[String], child: &[String]) -> bool {
    parent.len() < child.len() && child.starts_with(parent)
}

/// Check if two paths are equal.
pub fn is_path_equal(p1: &[String], p2: &[String]) -> bool {
    p1 == p2
}

/// Get the parent path of a given path.
pub fn parent(path: &[String]) -> Result<Path, JsonPointerError> {
    match path.split_last() {
        Some((_, rest)) => Ok(rest.to_vec()),
        None => Err(JsonPointerError::NoParent),
    }
}

/// Check if a token is an RFC 6901 `array-index`: `0` or a run of digits
/// without a leading zero.
pub fn is_valid_index(index: &str) -> bool {
    if index.is_empty() {
        return false;
    }
    let bytes = index.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(|&b| b.is_ascii_digit())
}

/// Parse an array index token. Returns `None` for anything that is not a
/// valid index, including the append token `-` and values overflowing `usize`.
pub fn parse_index(index: &str) -> Option<usize> {
    if !is_valid_index(index) {
        return None;
    }
    index.parse().ok()
}
