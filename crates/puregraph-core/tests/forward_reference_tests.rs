#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{build, class, entity};
use puregraph_core::builder::core_builders::{ASSOCIATION_CLASSIFIER_PATH, FUNCTION_CLASSIFIER_PATH};
use puregraph_core::model::ElementBody;
use puregraph_core::ElementKind;
use serde_json::json;

#[test]
fn test_reference_to_later_entity_resolves() {
    // GIVEN "model::B" declared before the "model::A" it points at
    let graph = build(&[
        class("model::B", &[("a", "model::A")]),
        class("model::A", &[("name", "String")]),
    ]);

    // THEN pass 2 links B to A regardless of order
    assert!(graph.build_state().has_succeeded());
    let a = graph.get_element(&ElementKind::Class, "model::A").unwrap();
    let b = graph.get_element(&ElementKind::Class, "model::B").unwrap();
    let ElementBody::Class(body) = graph.element(b).unwrap().body() else {
        panic!("expected a class body");
    };
    assert_eq!(body.property("a").unwrap().generic_type.value(), a);
}

#[test]
fn test_declaration_order_does_not_change_the_graph() {
    let forward = build(&[
        class("model::B", &[("a", "model::A")]),
        class("model::A", &[]),
    ]);
    let backward = build(&[
        class("model::A", &[]),
        class("model::B", &[("a", "model::A")]),
    ]);
    assert_eq!(forward.element_hashes(), backward.element_hashes());
}

#[test]
fn test_mutual_references_between_classes() {
    let graph = build(&[
        class("model::Person", &[("firm", "model::Firm")]),
        class("model::Firm", &[("ceo", "model::Person")]),
        entity(
            "model::Employment",
            ASSOCIATION_CLASSIFIER_PATH,
            json!({"properties": [
                {"name": "employer", "type": "model::Firm",
                 "multiplicity": {"lowerBound": 0, "upperBound": 1}},
                {"name": "employees", "type": "model::Person",
                 "multiplicity": {"lowerBound": 0}}
            ]}),
        ),
    ]);
    assert!(graph.build_state().has_succeeded(), "{:?}", graph.build_state().errors());
}

#[test]
fn test_function_signature_links_forward() {
    let graph = build(&[
        entity(
            "model::fullName",
            FUNCTION_CLASSIFIER_PATH,
            json!({
                "parameters": [{"name": "p", "type": "model::Person",
                                "multiplicity": {"lowerBound": 1, "upperBound": 1}}],
                "returnType": "String",
                "returnMultiplicity": {"lowerBound": 1, "upperBound": 1},
                "body": ["$p.first + ' ' + $p.last"]
            }),
        ),
        class("model::Person", &[("first", "String"), ("last", "String")]),
    ]);
    assert!(graph.build_state().has_succeeded());
    let function = graph
        .get_element(&ElementKind::Function, "model::fullName")
        .unwrap();
    let ElementBody::Function(body) = graph.element(function).unwrap().body() else {
        panic!("expected a function body");
    };
    assert_eq!(
        graph.path_of(body.parameters[0].parameter_type.value()),
        "model::Person"
    );
    assert_eq!(
        body.return_type
            .as_ref()
            .map(|r| graph.path_of(r.value())),
        Some("String".to_string())
    );
}
