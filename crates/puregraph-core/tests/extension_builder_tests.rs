#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{class, entity};
use puregraph_core::model::ElementBody;
use puregraph_core::{BuilderOptions, ElementKind, ExtensionElementBuilder, GraphBuilder, GraphError};
use serde_json::json;

const SERVICE_CLASSIFIER_PATH: &str = "meta::legend::service::metamodel::Service";

fn builder() -> GraphBuilder {
    let mut builder = GraphBuilder::new(BuilderOptions::default());
    builder.registry_mut().register(Box::new(
        ExtensionElementBuilder::new("service", SERVICE_CLASSIFIER_PATH)
            .with_reference_field("mapping")
            .with_reference_field("owners"),
    ))
    .unwrap();
    builder
}

#[test]
fn test_plugin_kind_is_built_and_indexed() {
    // GIVEN a builder that knows about services
    let graph = builder().build(&[
        class("model::Person", &[]),
        class("model::Admin", &[]),
        entity(
            "model::PersonService",
            SERVICE_CLASSIFIER_PATH,
            json!({
                "pattern": "/people",
                "mapping": "model::Person",
                "owners": ["model::Admin"],
                "sourceInformation": {"startLine": 3}
            }),
        ),
    ]);

    // THEN the service lands in its own kind index
    assert!(graph.build_state().has_succeeded(), "{:?}", graph.build_state().errors());
    let kind = ElementKind::Extension("service".to_string());
    let id = graph.get_element(&kind, "model::PersonService").unwrap();
    assert_eq!(graph.elements_of_kind(&kind), vec![id]);

    // AND its reference fields are linked while the rest stays raw
    let ElementBody::Extension(service) = graph.element(id).unwrap().body() else {
        panic!("expected an extension body");
    };
    assert_eq!(service.content, json!({"pattern": "/people"}));
    let targets: Vec<String> = service
        .references
        .iter()
        .map(|(field, r)| format!("{}={}", field, graph.path_of(r.value())))
        .collect();
    assert_eq!(targets, vec!["mapping=model::Person", "owners=model::Admin"]);
}

#[test]
fn test_plugin_kind_unknown_without_registration() {
    let graph = GraphBuilder::new(BuilderOptions::default()).build(&[entity(
        "model::PersonService",
        SERVICE_CLASSIFIER_PATH,
        json!({}),
    )]);
    assert!(matches!(
        graph.build_state().errors(),
        [GraphError::UnknownElementKind { .. }]
    ));
}

#[test]
fn test_plugin_reference_failures_are_collected() {
    let graph = builder().build(&[entity(
        "model::PersonService",
        SERVICE_CLASSIFIER_PATH,
        json!({"mapping": "model::Missing", "owners": ["model::AlsoMissing"]}),
    )]);
    assert_eq!(graph.build_state().errors().len(), 2);
}

#[test]
fn test_extension_hash_tracks_referenced_path() {
    let mut graph = builder().build(&[
        class("model::Person", &[]),
        entity(
            "model::PersonService",
            SERVICE_CLASSIFIER_PATH,
            json!({"mapping": "model::Person"}),
        ),
    ]);
    let service = graph.get_element_by_path("model::PersonService").unwrap();
    let before = graph.hash_code(service).unwrap();

    let person = graph.get_element_by_path("model::Person").unwrap();
    graph.rename_element(person, "Human").unwrap();

    assert_ne!(graph.hash_code(service).unwrap(), before);
}

#[test]
fn test_plugin_source_information_does_not_affect_hash() {
    // GIVEN the same service with and without source positions
    let service = |content| entity("model::PersonService", SERVICE_CLASSIFIER_PATH, content);
    let plain = builder().build(&[
        class("model::Person", &[]),
        service(json!({"pattern": "/people", "mapping": "model::Person",
                       "options": {"cache": true}})),
    ]);
    let annotated = builder().build(&[
        class("model::Person", &[]),
        service(json!({"pattern": "/people", "mapping": "model::Person",
                       "options": {"cache": true, "sourceInformation": {"startLine": 9}},
                       "sourceInformation": {"sourceId": "svc.pure", "startLine": 1}})),
    ]);

    // THEN both build and the service hashes the same
    assert!(plain.build_state().has_succeeded());
    assert!(annotated.build_state().has_succeeded());
    let hash = |graph: &puregraph_core::Graph| {
        let id = graph.get_element_by_path("model::PersonService").unwrap();
        graph.hash_code(id).unwrap()
    };
    assert_eq!(hash(&plain), hash(&annotated));
    assert_eq!(plain.element_hashes(), annotated.element_hashes());
}

#[test]
fn test_plugin_non_string_reference_item_is_reported() {
    // GIVEN an owners list with a number among the paths
    let graph = builder().build(&[
        class("model::Admin", &[]),
        entity(
            "model::PersonService",
            SERVICE_CLASSIFIER_PATH,
            json!({"owners": ["model::Admin", 5]}),
        ),
    ]);

    // THEN the build fails with an invalid content error for that item
    let state = graph.build_state();
    assert!(state.has_failed());
    assert!(matches!(
        state.errors(),
        [GraphError::InvalidContent { path, reason }]
            if path == "model::PersonService" && reason.contains("owners")
    ));
}
