//! Built-in core model
//!
//! Primitive types live outside the package tree: they have no package, are
//! resolvable by bare name only, and never show up in `element_hashes`.

use super::Graph;
use crate::model::{Element, ElementBody};

/// Names of the built-in primitive types, in registration order
pub const PRIMITIVE_TYPES: &[&str] = &[
    "String",
    "Boolean",
    "Binary",
    "Date",
    "StrictDate",
    "DateTime",
    "StrictTime",
    "Number",
    "Float",
    "Decimal",
    "Integer",
    "LatestDate",
];

impl Graph {
    pub(crate) fn install_core_model(&mut self) {
        for name in PRIMITIVE_TYPES {
            let id = self.alloc(Element::new(*name, ElementBody::PrimitiveType));
            self.primitives.insert((*name).to_string(), id);
        }
    }
}
