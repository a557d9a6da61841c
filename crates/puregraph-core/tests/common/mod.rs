use puregraph_core::builder::core_builders::{
    CLASS_CLASSIFIER_PATH, ENUMERATION_CLASSIFIER_PATH, MAPPING_CLASSIFIER_PATH,
    PACKAGE_CLASSIFIER_PATH, PROFILE_CLASSIFIER_PATH, SECTION_INDEX_CLASSIFIER_PATH,
};
use puregraph_core::{BuilderOptions, ElementEntity, Graph, GraphBuilder};
use serde_json::{json, Value};

/// Entity with `name`/`package` filled in from `path`
#[allow(dead_code)]
pub fn entity(path: &str, classifier_path: &str, mut content: Value) -> ElementEntity {
    let (package, name) = match path.rsplit_once("::") {
        Some((package, name)) => (package, name),
        None => ("", path),
    };
    if let Value::Object(fields) = &mut content {
        fields.insert("name".into(), json!(name));
        fields.insert("package".into(), json!(package));
    }
    ElementEntity::new(path, classifier_path, content)
}

#[allow(dead_code)]
pub fn class(path: &str, properties: &[(&str, &str)]) -> ElementEntity {
    let properties: Vec<Value> = properties
        .iter()
        .map(|(name, ty)| {
            json!({
                "name": name,
                "type": ty,
                "multiplicity": {"lowerBound": 1, "upperBound": 1}
            })
        })
        .collect();
    entity(path, CLASS_CLASSIFIER_PATH, json!({ "properties": properties }))
}

#[allow(dead_code)]
pub fn section_index(path: &str, imports: &[&str], elements: &[&str]) -> ElementEntity {
    entity(
        path,
        SECTION_INDEX_CLASSIFIER_PATH,
        json!({"sections": [{
            "parserName": "Pure",
            "imports": imports,
            "elements": elements
        }]}),
    )
}

/// Small model-to-model fixture: two classes, a profile, an enumeration
/// and a mapping between the classes
#[allow(dead_code)]
pub fn m2m_fixture() -> Vec<ElementEntity> {
    vec![
        entity("ui::test1", PACKAGE_CLASSIFIER_PATH, json!({})),
        entity(
            "ui::test1::Target_Something",
            CLASS_CLASSIFIER_PATH,
            json!({
                "stereotypes": [{"profile": "ui::test1::Doc", "value": "important"}],
                "properties": [
                    {"name": "name", "type": "String",
                     "multiplicity": {"lowerBound": 1, "upperBound": 1}},
                    {"name": "status", "type": "ui::test1::Status",
                     "multiplicity": {"lowerBound": 0, "upperBound": 1}}
                ]
            }),
        ),
        class("ui::test1::Source_Something", &[("fullName", "String")]),
        entity(
            "ui::test1::Doc",
            PROFILE_CLASSIFIER_PATH,
            json!({"stereotypes": ["important"], "tags": ["doc"]}),
        ),
        entity(
            "ui::test1::Status",
            ENUMERATION_CLASSIFIER_PATH,
            json!({"values": [{"value": "ACTIVE"}, {"value": "CLOSED"}]}),
        ),
        entity(
            "ui::testMapping",
            MAPPING_CLASSIFIER_PATH,
            json!({"classMappings": [{
                "class": "ui::test1::Target_Something",
                "root": true,
                "srcClass": "ui::test1::Source_Something",
                "propertyMappings": [
                    {"property": "name", "transform": "$src.fullName"}
                ]
            }]}),
        ),
    ]
}

#[allow(dead_code)]
pub fn build(entities: &[ElementEntity]) -> Graph {
    GraphBuilder::new(BuilderOptions::default()).build(entities)
}
