//! Domain model: profiles, classes, enumerations, associations, functions

use crate::graph::Graph;
use crate::hash::{hash_array, hash_list, hash_strings, tags, Hashable};
use crate::reference::ElementReference;

/// Multiplicity bounds; `upper = None` means unbounded (`*`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Multiplicity {
    pub lower: u32,
    pub upper: Option<u32>,
}

impl Multiplicity {
    pub const ONE: Multiplicity = Multiplicity {
        lower: 1,
        upper: Some(1),
    };
    pub const ZERO_ONE: Multiplicity = Multiplicity {
        lower: 0,
        upper: Some(1),
    };
    pub const ZERO_MANY: Multiplicity = Multiplicity {
        lower: 0,
        upper: None,
    };

    pub fn is_valid(&self) -> bool {
        self.upper.map_or(true, |upper| upper >= self.lower)
    }
}

impl Default for Multiplicity {
    fn default() -> Self {
        Multiplicity::ONE
    }
}

impl std::fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.upper {
            Some(upper) if upper == self.lower => write!(f, "[{}]", upper),
            Some(upper) => write!(f, "[{}..{}]", self.lower, upper),
            None if self.lower == 0 => write!(f, "[*]"),
            None => write!(f, "[{}..*]", self.lower),
        }
    }
}

impl Hashable for Multiplicity {
    fn hash_code(&self, _graph: &Graph) -> String {
        hash_array([
            tags::MULTIPLICITY.to_string(),
            self.lower.to_string(),
            self.upper.map(|u| u.to_string()).unwrap_or_default(),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub stereotypes: Vec<String>,
    pub tags: Vec<String>,
}

impl Profile {
    pub(crate) fn element_hash(&self, path: &str, _graph: &Graph) -> String {
        hash_array([
            tags::PROFILE,
            path,
            &hash_strings(&self.stereotypes),
            &hash_strings(&self.tags),
        ])
    }
}

/// Stereotype applied to an element, e.g. `<<meta::pure::profiles::doc.deprecated>>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StereotypeReference {
    pub profile: ElementReference,
    pub value: String,
}

impl Hashable for StereotypeReference {
    fn hash_code(&self, graph: &Graph) -> String {
        hash_array([
            tags::STEREOTYPE,
            &self.profile.hash_value(graph),
            &self.value,
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedValue {
    pub profile: ElementReference,
    pub tag: String,
    pub value: String,
}

impl Hashable for TaggedValue {
    fn hash_code(&self, graph: &Graph) -> String {
        hash_array([
            tags::TAGGED_VALUE,
            &self.profile.hash_value(graph),
            &self.tag,
            &self.value,
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub generic_type: ElementReference,
    pub multiplicity: Multiplicity,
    pub stereotypes: Vec<StereotypeReference>,
    pub tagged_values: Vec<TaggedValue>,
}

impl Hashable for Property {
    fn hash_code(&self, graph: &Graph) -> String {
        hash_array([
            tags::PROPERTY,
            &self.name,
            &self.generic_type.hash_value(graph),
            &self.multiplicity.hash_code(graph),
            &hash_list(&self.stereotypes, graph),
            &hash_list(&self.tagged_values, graph),
        ])
    }
}

/// Class constraint; the function body is kept as opaque text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub name: String,
    pub function_definition: String,
}

impl Hashable for Constraint {
    fn hash_code(&self, _graph: &Graph) -> String {
        hash_array([tags::CONSTRAINT, &self.name, &self.function_definition])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Class {
    pub generalizations: Vec<ElementReference>,
    pub properties: Vec<Property>,
    pub constraints: Vec<Constraint>,
    pub stereotypes: Vec<StereotypeReference>,
    pub tagged_values: Vec<TaggedValue>,
}

impl Class {
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub(crate) fn element_hash(&self, path: &str, graph: &Graph) -> String {
        hash_array([
            tags::CLASS,
            path,
            &hash_list(&self.generalizations, graph),
            &hash_list(&self.properties, graph),
            &hash_list(&self.constraints, graph),
            &hash_list(&self.stereotypes, graph),
            &hash_list(&self.tagged_values, graph),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enumeration {
    pub values: Vec<String>,
    pub stereotypes: Vec<StereotypeReference>,
    pub tagged_values: Vec<TaggedValue>,
}

impl Enumeration {
    pub(crate) fn element_hash(&self, path: &str, graph: &Graph) -> String {
        hash_array([
            tags::ENUMERATION,
            path,
            &hash_strings(&self.values),
            &hash_list(&self.stereotypes, graph),
            &hash_list(&self.tagged_values, graph),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Association {
    /// Exactly two ends once linked
    pub properties: Vec<Property>,
    pub stereotypes: Vec<StereotypeReference>,
    pub tagged_values: Vec<TaggedValue>,
}

impl Association {
    pub(crate) fn element_hash(&self, path: &str, graph: &Graph) -> String {
        hash_array([
            tags::ASSOCIATION,
            path,
            &hash_list(&self.properties, graph),
            &hash_list(&self.stereotypes, graph),
            &hash_list(&self.tagged_values, graph),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub parameter_type: ElementReference,
    pub multiplicity: Multiplicity,
}

impl Hashable for Parameter {
    fn hash_code(&self, graph: &Graph) -> String {
        hash_array([
            tags::PARAMETER,
            &self.name,
            &self.parameter_type.hash_value(graph),
            &self.multiplicity.hash_code(graph),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConcreteFunctionDefinition {
    pub parameters: Vec<Parameter>,
    pub return_type: Option<ElementReference>,
    pub return_multiplicity: Multiplicity,
    /// Body expressions, kept as opaque text
    pub body: Vec<String>,
    pub stereotypes: Vec<StereotypeReference>,
    pub tagged_values: Vec<TaggedValue>,
}

impl ConcreteFunctionDefinition {
    pub(crate) fn element_hash(&self, path: &str, graph: &Graph) -> String {
        let return_type = self
            .return_type
            .as_ref()
            .map(|r| r.hash_value(graph))
            .unwrap_or_default();
        hash_array([
            tags::FUNCTION,
            path,
            &hash_list(&self.parameters, graph),
            &return_type,
            &self.return_multiplicity.hash_code(graph),
            &hash_strings(&self.body),
            &hash_list(&self.stereotypes, graph),
            &hash_list(&self.tagged_values, graph),
        ])
    }
}
