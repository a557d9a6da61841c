//! Structural hash engine
//!
//! Every hashed entity folds a per-kind tag, its own fields, and the current
//! hashes of its nested parts into one SHA256 digest. Hashes are recomputed on
//! every call; nothing is cached, so a read always reflects live state.
//!
//! ## Rules
//!
//! - The tag distinguishes otherwise identical field tuples across kinds
//! - References contribute the current path of their target, not their
//!   serialization text
//! - Packages hash the set of child *paths* only
//! - Source information is never part of the model and so never hashed

pub mod diff;

use sha2::{Digest, Sha256};

use crate::graph::Graph;

pub use diff::{diff_hashes, HashDiff};

/// Per-kind hash tags
pub mod tags {
    pub const PACKAGE: &str = "PACKAGE";
    pub const PRIMITIVE_TYPE: &str = "PRIMITIVE_TYPE";
    pub const PROFILE: &str = "PROFILE";
    pub const STEREOTYPE: &str = "STEREOTYPE";
    pub const TAGGED_VALUE: &str = "TAGGED_VALUE";
    pub const CLASS: &str = "CLASS";
    pub const PROPERTY: &str = "PROPERTY";
    pub const MULTIPLICITY: &str = "MULTIPLICITY";
    pub const CONSTRAINT: &str = "CONSTRAINT";
    pub const ENUMERATION: &str = "ENUMERATION";
    pub const ASSOCIATION: &str = "ASSOCIATION";
    pub const FUNCTION: &str = "FUNCTION";
    pub const PARAMETER: &str = "PARAMETER";
    pub const MAPPING: &str = "MAPPING";
    pub const CLASS_MAPPING: &str = "CLASS_MAPPING";
    pub const PROPERTY_MAPPING: &str = "PROPERTY_MAPPING";
    pub const ENUMERATION_MAPPING: &str = "ENUMERATION_MAPPING";
    pub const ENUM_VALUE_MAPPING: &str = "ENUM_VALUE_MAPPING";
    pub const DATABASE: &str = "DATABASE";
    pub const SCHEMA: &str = "SCHEMA";
    pub const TABLE: &str = "TABLE";
    pub const COLUMN: &str = "COLUMN";
    pub const JOIN: &str = "JOIN";
    pub const FILTER: &str = "FILTER";
    pub const FLAT_DATA: &str = "FLAT_DATA";
    pub const FLAT_DATA_SECTION: &str = "FLAT_DATA_SECTION";
    pub const FLAT_DATA_FIELD: &str = "FLAT_DATA_FIELD";
    pub const DIAGRAM: &str = "DIAGRAM";
    pub const CLASS_VIEW: &str = "CLASS_VIEW";
    pub const PROPERTY_VIEW: &str = "PROPERTY_VIEW";
    pub const GENERALIZATION_VIEW: &str = "GENERALIZATION_VIEW";
    pub const POINT: &str = "POINT";
    pub const RECTANGLE: &str = "RECTANGLE";
    pub const GENERATION_SPECIFICATION: &str = "GENERATION_SPECIFICATION";
    pub const GENERATION_NODE: &str = "GENERATION_NODE";
    pub const SECTION_INDEX: &str = "SECTION_INDEX";
    pub const SECTION: &str = "SECTION";
    pub const EXTENSION: &str = "EXTENSION";
}

const FIELD_SEPARATOR: u8 = 0x1f;

/// Hash an ordered sequence of strings
///
/// Each item is length-prefixed so `["ab", "c"]` and `["a", "bc"]` differ.
///
/// ```
/// use puregraph_core::hash::hash_array;
///
/// let a = hash_array(["CLASS", "model::A"]);
/// assert_eq!(a, hash_array(["CLASS", "model::A"]));
/// assert_ne!(a, hash_array(["ENUMERATION", "model::A"]));
/// assert_eq!(a.len(), 64);
/// ```
pub fn hash_array<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut hasher = Sha256::new();
    for item in items {
        let bytes = item.as_ref().as_bytes();
        hasher.update((bytes.len() as u64).to_le_bytes());
        hasher.update(bytes);
        hasher.update([FIELD_SEPARATOR]);
    }
    hex::encode(hasher.finalize())
}

/// Something whose structural hash depends on the live graph
pub trait Hashable {
    fn hash_code(&self, graph: &Graph) -> String;
}

/// Hash of a list of hashable parts, order-sensitive
pub fn hash_list<T: Hashable>(items: &[T], graph: &Graph) -> String {
    hash_array(items.iter().map(|item| item.hash_code(graph)))
}

/// Hash of a list of plain strings
pub fn hash_strings(items: &[String]) -> String {
    hash_array(items)
}

/// Text form of an optional flag, `""` when unset
pub(crate) fn opt_bool(value: Option<bool>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_array_is_deterministic() {
        assert_eq!(hash_array(["a", "b"]), hash_array(["a", "b"]));
    }

    #[test]
    fn test_hash_array_is_order_sensitive() {
        assert_ne!(hash_array(["a", "b"]), hash_array(["b", "a"]));
    }

    #[test]
    fn test_hash_array_item_boundaries() {
        assert_ne!(hash_array(["ab", "c"]), hash_array(["a", "bc"]));
        assert_ne!(hash_array(Vec::<String>::new()), hash_array([""]));
    }
}
