//! Protocol shapes of the core element kinds
//!
//! Unknown keys (including `sourceInformation`) are ignored.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::{GraphError, Result};

const SOURCE_INFORMATION: &str = "sourceInformation";

/// Deserialize entity content into a protocol struct
pub(crate) fn parse<T: DeserializeOwned>(path: &str, content: &Value) -> Result<T> {
    serde_json::from_value(content.clone()).map_err(|err| GraphError::InvalidContent {
        path: path.to_string(),
        reason: err.to_string(),
    })
}

/// Drop every `sourceInformation` key, at any depth
pub(crate) fn strip_source_information(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.remove(SOURCE_INFORMATION);
            map.values_mut().for_each(strip_source_information);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_source_information),
        _ => {}
    }
}

/// `name`/`package` pair every element protocol carries
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ElementHeader {
    pub name: Option<String>,
    pub package: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MultiplicityProtocol {
    pub lower_bound: u32,
    pub upper_bound: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StereotypePtr {
    pub profile: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TagPtr {
    pub profile: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TaggedValueProtocol {
    pub tag: TagPtr,
    pub value: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct Annotations {
    pub stereotypes: Vec<StereotypePtr>,
    pub tagged_values: Vec<TaggedValueProtocol>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ProfileProtocol {
    pub stereotypes: Vec<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PropertyProtocol {
    pub name: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub multiplicity: MultiplicityProtocol,
    #[serde(flatten)]
    pub annotations: Annotations,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConstraintProtocol {
    pub name: String,
    #[serde(default)]
    pub function_definition: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ClassProtocol {
    pub super_types: Vec<String>,
    pub properties: Vec<PropertyProtocol>,
    pub constraints: Vec<ConstraintProtocol>,
    #[serde(flatten)]
    pub annotations: Annotations,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EnumValueProtocol {
    pub value: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct EnumerationProtocol {
    pub values: Vec<EnumValueProtocol>,
    #[serde(flatten)]
    pub annotations: Annotations,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AssociationProtocol {
    pub properties: Vec<PropertyProtocol>,
    #[serde(flatten)]
    pub annotations: Annotations,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ParameterProtocol {
    pub name: String,
    #[serde(rename = "type")]
    pub parameter_type: String,
    pub multiplicity: MultiplicityProtocol,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct FunctionProtocol {
    pub parameters: Vec<ParameterProtocol>,
    pub return_type: Option<String>,
    pub return_multiplicity: Option<MultiplicityProtocol>,
    pub body: Vec<String>,
    #[serde(flatten)]
    pub annotations: Annotations,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MappingIncludeProtocol {
    pub included_mapping: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PropertyMappingProtocol {
    pub property: String,
    pub source: Option<String>,
    pub target: Option<String>,
    #[serde(default)]
    pub transform: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ClassMappingProtocol {
    pub id: Option<String>,
    pub class: String,
    #[serde(default)]
    pub root: bool,
    pub src_class: Option<String>,
    pub store: Option<String>,
    #[serde(default)]
    pub property_mappings: Vec<PropertyMappingProtocol>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EnumValueMappingProtocol {
    pub enum_value: String,
    #[serde(default)]
    pub source_values: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EnumerationMappingProtocol {
    pub id: Option<String>,
    pub enumeration: String,
    #[serde(default)]
    pub enum_value_mappings: Vec<EnumValueMappingProtocol>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct MappingProtocol {
    pub includes: Vec<MappingIncludeProtocol>,
    pub class_mappings: Vec<ClassMappingProtocol>,
    pub enumeration_mappings: Vec<EnumerationMappingProtocol>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ColumnProtocol {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(default = "default_true")]
    pub nullable: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TableProtocol {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnProtocol>,
    #[serde(default)]
    pub primary_key: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SchemaProtocol {
    pub name: String,
    #[serde(default)]
    pub tables: Vec<TableProtocol>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OperationProtocol {
    pub name: String,
    #[serde(default)]
    pub operation: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct DatabaseProtocol {
    pub includes: Vec<String>,
    pub schemas: Vec<SchemaProtocol>,
    pub joins: Vec<OperationProtocol>,
    pub filters: Vec<OperationProtocol>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FlatDataFieldProtocol {
    pub label: String,
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(default)]
    pub optional: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FlatDataSectionProtocol {
    pub name: String,
    pub driver_id: String,
    #[serde(default)]
    pub fields: Vec<FlatDataFieldProtocol>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct FlatDataProtocol {
    pub includes: Vec<String>,
    pub sections: Vec<FlatDataSectionProtocol>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub(crate) struct PointProtocol {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub(crate) struct RectangleProtocol {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct LineProtocol {
    pub points: Vec<PointProtocol>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ClassViewProtocol {
    pub id: String,
    pub class: String,
    #[serde(default)]
    pub position: PointProtocol,
    #[serde(default)]
    pub rectangle: RectangleProtocol,
    pub hide_properties: Option<bool>,
    pub hide_stereotypes: Option<bool>,
    pub hide_tagged_values: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PropertyPtr {
    pub class: String,
    pub property: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PropertyViewProtocol {
    pub property: PropertyPtr,
    pub source_view: String,
    pub target_view: String,
    #[serde(default)]
    pub line: LineProtocol,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeneralizationViewProtocol {
    pub source_view: String,
    pub target_view: String,
    #[serde(default)]
    pub line: LineProtocol,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct DiagramProtocol {
    pub class_views: Vec<ClassViewProtocol>,
    pub property_views: Vec<PropertyViewProtocol>,
    pub generalization_views: Vec<GeneralizationViewProtocol>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationNodeProtocol {
    pub id: Option<String>,
    pub generation_element: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct GenerationSpecificationProtocol {
    pub generation_nodes: Vec<GenerationNodeProtocol>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SectionProtocol {
    #[serde(default)]
    pub parser_name: String,
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub elements: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SectionIndexProtocol {
    pub sections: Vec<SectionProtocol>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_source_information_is_ignored() {
        let content = json!({
            "name": "Person",
            "package": "model",
            "sourceInformation": {"startLine": 3},
            "properties": [{
                "name": "age",
                "type": "Integer",
                "multiplicity": {"lowerBound": 0, "upperBound": 1},
                "sourceInformation": {"startLine": 4}
            }]
        });
        let class: ClassProtocol = parse("model::Person", &content).unwrap();
        assert_eq!(class.properties.len(), 1);
        assert_eq!(class.properties[0].multiplicity.upper_bound, Some(1));
    }

    #[test]
    fn test_strip_source_information_recurses() {
        let mut value = json!({
            "sourceInformation": 1,
            "nested": [{"sourceInformation": 2, "keep": true}]
        });
        strip_source_information(&mut value);
        assert_eq!(value, json!({"nested": [{"keep": true}]}));
    }

    #[test]
    fn test_bad_content_is_invalid_content() {
        let err = parse::<PropertyProtocol>("model::P", &json!({"name": 1})).unwrap_err();
        assert!(matches!(err, GraphError::InvalidContent { path, .. } if path == "model::P"));
    }
}
