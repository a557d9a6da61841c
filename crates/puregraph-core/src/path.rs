//! Element path utilities
//!
//! Paths are flat, `::`-delimited namespaces (`model::domain::Person`), not
//! filesystem paths: there is no `.`/`..` normalization.

use crate::errors::{GraphError, Result};

/// Delimiter between path segments
pub const ELEMENT_PATH_DELIMITER: &str = "::";

/// Names that may not be used as a path segment
pub const RESERVED_PACKAGE_NAMES: &[&str] = &["$implicit"];

/// Whether `name` is reserved
pub fn is_reserved_name(name: &str) -> bool {
    RESERVED_PACKAGE_NAMES.contains(&name)
}

/// Validate a full element path
///
/// # Errors
///
/// * `InvalidPath` - empty path, leading/trailing delimiter, or an empty segment
/// * `ReservedName` - a segment is a reserved name
pub fn validate_path(path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(GraphError::InvalidPath {
            path: path.to_string(),
            reason: "path cannot be empty".to_string(),
        });
    }
    if path.starts_with(ELEMENT_PATH_DELIMITER) || path.ends_with(ELEMENT_PATH_DELIMITER) {
        return Err(GraphError::InvalidPath {
            path: path.to_string(),
            reason: "path cannot start or end with a delimiter".to_string(),
        });
    }
    for segment in path.split(ELEMENT_PATH_DELIMITER) {
        validate_name_in(segment, path)?;
    }
    Ok(())
}

/// Validate a single (unqualified) element name
///
/// # Errors
///
/// Same conditions as [`validate_path`], applied to one segment.
pub fn validate_name(name: &str) -> Result<()> {
    validate_name_in(name, name)
}

fn validate_name_in(segment: &str, path: &str) -> Result<()> {
    if segment.is_empty() || segment.trim() != segment {
        return Err(GraphError::InvalidPath {
            path: path.to_string(),
            reason: format!("invalid segment '{}'", segment),
        });
    }
    if segment.contains(':') {
        return Err(GraphError::InvalidPath {
            path: path.to_string(),
            reason: format!("segment '{}' contains a stray ':'", segment),
        });
    }
    if is_reserved_name(segment) {
        return Err(GraphError::ReservedName {
            name: segment.to_string(),
            path: path.to_string(),
        });
    }
    Ok(())
}

/// Split a path on its last delimiter into `(package_path, name)`
///
/// The package path is empty for top-level elements.
///
/// # Errors
///
/// Fails when the path does not pass [`validate_path`].
///
/// ```
/// use puregraph_core::path::split_path;
///
/// assert_eq!(
///     split_path("model::domain::Person").unwrap(),
///     ("model::domain".to_string(), "Person".to_string())
/// );
/// assert_eq!(split_path("Person").unwrap(), (String::new(), "Person".to_string()));
/// ```
pub fn split_path(path: &str) -> Result<(String, String)> {
    validate_path(path)?;
    Ok(match path.rfind(ELEMENT_PATH_DELIMITER) {
        Some(idx) => (
            path[..idx].to_string(),
            path[idx + ELEMENT_PATH_DELIMITER.len()..].to_string(),
        ),
        None => (String::new(), path.to_string()),
    })
}

/// Join a package path and a child name
///
/// An empty side is dropped so joining onto the root yields the bare name.
pub fn join_path(package_path: &str, name: &str) -> String {
    match (package_path.is_empty(), name.is_empty()) {
        (true, _) => name.to_string(),
        (false, true) => package_path.to_string(),
        (false, false) => format!("{}{}{}", package_path, ELEMENT_PATH_DELIMITER, name),
    }
}

/// Whether the path contains a package qualifier
pub fn is_qualified(path: &str) -> bool {
    path.contains(ELEMENT_PATH_DELIMITER)
}

/// The unqualified trailing segment of a path
pub fn local_name(path: &str) -> &str {
    path.rsplit(ELEMENT_PATH_DELIMITER).next().unwrap_or(path)
}

/// Whether `path` equals `suffix` or ends with `::suffix`
pub fn has_suffix(path: &str, suffix: &str) -> bool {
    path == suffix
        || (path.len() > suffix.len() + ELEMENT_PATH_DELIMITER.len()
            && path.ends_with(suffix)
            && path[..path.len() - suffix.len()].ends_with(ELEMENT_PATH_DELIMITER))
}

/// Default mapping element id for a class path (`a::b::C` -> `a_b_C`)
pub fn to_mapping_element_id(path: &str) -> String {
    path.replace(ELEMENT_PATH_DELIMITER, "_")
}
