//! Mappings between classes and stores

use crate::graph::Graph;
use crate::hash::{hash_array, hash_list, opt_bool, tags, Hashable};
use crate::reference::ElementReference;

/// Single property mapping; the transform is kept as opaque text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyMapping {
    pub property: String,
    pub source: Option<String>,
    pub target: Option<String>,
    pub transform: String,
}

impl Hashable for PropertyMapping {
    fn hash_code(&self, _graph: &Graph) -> String {
        hash_array([
            tags::PROPERTY_MAPPING,
            &self.property,
            self.source.as_deref().unwrap_or_default(),
            self.target.as_deref().unwrap_or_default(),
            &self.transform,
        ])
    }
}

/// Class mapping (set implementation)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMapping {
    pub id: String,
    pub class: ElementReference,
    pub root: bool,
    /// Source class for model-to-model mappings
    pub source_class: Option<ElementReference>,
    /// Store for store-backed mappings
    pub store: Option<ElementReference>,
    pub property_mappings: Vec<PropertyMapping>,
}

impl Hashable for ClassMapping {
    fn hash_code(&self, graph: &Graph) -> String {
        let source = self
            .source_class
            .as_ref()
            .map(|r| r.hash_value(graph))
            .unwrap_or_default();
        let store = self
            .store
            .as_ref()
            .map(|r| r.hash_value(graph))
            .unwrap_or_default();
        hash_array([
            tags::CLASS_MAPPING.to_string(),
            self.id.clone(),
            self.class.hash_value(graph),
            opt_bool(Some(self.root)),
            source,
            store,
            hash_list(&self.property_mappings, graph),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValueMapping {
    pub enum_value: String,
    pub source_values: Vec<String>,
}

impl Hashable for EnumValueMapping {
    fn hash_code(&self, _graph: &Graph) -> String {
        hash_array(
            [tags::ENUM_VALUE_MAPPING, self.enum_value.as_str()]
                .into_iter()
                .chain(self.source_values.iter().map(String::as_str)),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerationMapping {
    pub id: String,
    pub enumeration: ElementReference,
    pub value_mappings: Vec<EnumValueMapping>,
}

impl Hashable for EnumerationMapping {
    fn hash_code(&self, graph: &Graph) -> String {
        hash_array([
            tags::ENUMERATION_MAPPING,
            &self.id,
            &self.enumeration.hash_value(graph),
            &hash_list(&self.value_mappings, graph),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    pub includes: Vec<ElementReference>,
    pub class_mappings: Vec<ClassMapping>,
    pub enumeration_mappings: Vec<EnumerationMapping>,
}

impl Mapping {
    pub fn class_mapping(&self, id: &str) -> Option<&ClassMapping> {
        self.class_mappings.iter().find(|cm| cm.id == id)
    }

    pub(crate) fn element_hash(&self, path: &str, graph: &Graph) -> String {
        hash_array([
            tags::MAPPING,
            path,
            &hash_list(&self.includes, graph),
            &hash_list(&self.class_mappings, graph),
            &hash_list(&self.enumeration_mappings, graph),
        ])
    }
}
