//! Pointer resolution: walks a JSON Pointer down to the container that holds
//! its last token.

use jsonmerge_pointer::{parse_index, parse_json_pointer, Path};
use serde_json::Value;

use super::container::Container;
use super::types::PatchError;

/// Resolves `pointer` to its parent container and final decoded token.
///
/// Every token but the last must name an existing object or array. The root
/// pointer `""` has no parent container and fails here; callers that accept
/// the root handle it before resolving.
pub fn find_container<'a>(
    root: &'a mut Value,
    pointer: &str,
) -> Result<(Container<'a>, String), PatchError> {
    let path = parse_json_pointer(pointer)?;
    let (last, parents) = path
        .split_last()
        .ok_or_else(|| PatchError::MissingPath(pointer.to_string()))?;

    let missing = || PatchError::MissingPath(pointer.to_string());
    let mut container = Container::from_value(root).ok_or_else(missing)?;
    for token in parents {
        let child = container.into_child(token).map_err(|_| missing())?;
        container = Container::from_value(child).ok_or_else(missing)?;
    }
    Ok((container, last.clone()))
}

/// Read-only lookup of the value at `pointer`. The empty pointer is the root.
pub fn get_value<'a>(root: &'a Value, pointer: &str) -> Result<&'a Value, PatchError> {
    let path = parse_json_pointer(pointer)?;
    let Some((last, parents)) = path.split_last() else {
        return Ok(root);
    };
    let parent = walk(root, parents).ok_or_else(|| PatchError::MissingPath(pointer.to_string()))?;
    match parent {
        Value::Object(map) => map
            .get(last)
            .ok_or_else(|| PatchError::MissingKey(last.clone())),
        Value::Array(arr) => {
            let idx = parse_index(last).ok_or_else(|| PatchError::InvalidIndex(last.clone()))?;
            arr.get(idx).ok_or(PatchError::IndexOutOfBounds {
                index: idx,
                len: arr.len(),
            })
        }
        _ => Err(PatchError::MissingPath(pointer.to_string())),
    }
}

fn walk<'a>(root: &'a Value, path: &[String]) -> Option<&'a Value> {
    let mut current = root;
    for token in path {
        current = match current {
            Value::Object(map) => map.get(token)?,
            Value::Array(arr) => arr.get(parse_index(token)?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Decodes a pointer, mapping malformed input onto [`PatchError::Pointer`].
pub fn parse_path(pointer: &str) -> Result<Path, PatchError> {
    Ok(parse_json_pointer(pointer)?)
}
