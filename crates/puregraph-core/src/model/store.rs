//! Stores: relational databases and flat-data schemas

use crate::graph::Graph;
use crate::hash::{hash_array, hash_list, tags, Hashable};
use crate::reference::ElementReference;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
}

impl Hashable for Column {
    fn hash_code(&self, _graph: &Graph) -> String {
        hash_array([
            tags::COLUMN.to_string(),
            self.name.clone(),
            self.data_type.clone(),
            self.nullable.to_string(),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub primary_key: Vec<String>,
}

impl Hashable for Table {
    fn hash_code(&self, graph: &Graph) -> String {
        hash_array(
            [
                tags::TABLE.to_string(),
                self.name.clone(),
                hash_list(&self.columns, graph),
            ]
            .into_iter()
            .chain(self.primary_key.iter().cloned()),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub name: String,
    pub tables: Vec<Table>,
}

impl Hashable for Schema {
    fn hash_code(&self, graph: &Graph) -> String {
        hash_array([tags::SCHEMA, &self.name, &hash_list(&self.tables, graph)])
    }
}

/// Join; the operation is kept as opaque text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub name: String,
    pub operation: String,
}

impl Hashable for Join {
    fn hash_code(&self, _graph: &Graph) -> String {
        hash_array([tags::JOIN, &self.name, &self.operation])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub name: String,
    pub operation: String,
}

impl Hashable for Filter {
    fn hash_code(&self, _graph: &Graph) -> String {
        hash_array([tags::FILTER, &self.name, &self.operation])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Database {
    pub includes: Vec<ElementReference>,
    pub schemas: Vec<Schema>,
    pub joins: Vec<Join>,
    pub filters: Vec<Filter>,
}

impl Database {
    pub fn schema(&self, name: &str) -> Option<&Schema> {
        self.schemas.iter().find(|s| s.name == name)
    }

    pub(crate) fn element_hash(&self, path: &str, graph: &Graph) -> String {
        hash_array([
            tags::DATABASE,
            path,
            &hash_list(&self.includes, graph),
            &hash_list(&self.schemas, graph),
            &hash_list(&self.joins, graph),
            &hash_list(&self.filters, graph),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatDataField {
    pub label: String,
    pub data_type: String,
    pub optional: bool,
}

impl Hashable for FlatDataField {
    fn hash_code(&self, _graph: &Graph) -> String {
        hash_array([
            tags::FLAT_DATA_FIELD.to_string(),
            self.label.clone(),
            self.data_type.clone(),
            self.optional.to_string(),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatDataSection {
    pub name: String,
    pub driver_id: String,
    pub fields: Vec<FlatDataField>,
}

impl Hashable for FlatDataSection {
    fn hash_code(&self, graph: &Graph) -> String {
        hash_array([
            tags::FLAT_DATA_SECTION,
            &self.name,
            &self.driver_id,
            &hash_list(&self.fields, graph),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatData {
    pub includes: Vec<ElementReference>,
    pub sections: Vec<FlatDataSection>,
}

impl FlatData {
    pub(crate) fn element_hash(&self, path: &str, graph: &Graph) -> String {
        hash_array([
            tags::FLAT_DATA,
            path,
            &hash_list(&self.includes, graph),
            &hash_list(&self.sections, graph),
        ])
    }
}
