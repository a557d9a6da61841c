#![allow(clippy::unwrap_used, clippy::expect_used)]

use puregraph_core::model::domain::Class;
use puregraph_core::model::section::{Section, SectionHandle, SectionIndex};
use puregraph_core::model::{ElementBody, ElementId};
use puregraph_core::{ElementReference, Graph};

fn class_at(graph: &mut Graph, package: &str, name: &str) -> ElementId {
    let package = graph.get_or_create_package(package, true).unwrap();
    graph
        .create_element(package, name, ElementBody::Class(Class::default()))
        .unwrap()
}

fn section_at(graph: &mut Graph, imports: &[&str]) -> SectionHandle {
    let package = graph.get_or_create_package("sources", true).unwrap();
    let index = graph
        .create_element(
            package,
            "Index",
            ElementBody::SectionIndex(SectionIndex {
                sections: vec![Section {
                    parser_name: "Pure".to_string(),
                    imports: imports.iter().map(|s| s.to_string()).collect(),
                    elements: Vec::new(),
                }],
                is_deleted: false,
            }),
        )
        .unwrap();
    SectionHandle { index, section: 0 }
}

#[test]
fn test_implicit_reference_restores_text_by_identity() {
    // GIVEN T at "model::Foo" referenced as "Foo"
    let mut graph = Graph::new();
    let t = class_at(&mut graph, "model", "Foo");
    let u = class_at(&mut graph, "model", "Bar");
    let mut reference = ElementReference::implicit(&graph, t, "Foo");
    assert_eq!(reference.value_for_serialization(&graph), "Foo");

    // WHEN redirected to U the full path of U is emitted
    reference.set_value(u);
    assert_eq!(reference.value_for_serialization(&graph), "model::Bar");

    // AND pointing back at T restores the original text
    reference.set_value(t);
    assert_eq!(reference.value_for_serialization(&graph), "Foo");
}

#[test]
fn test_explicit_reference_follows_renames() {
    let mut graph = Graph::new();
    let t = class_at(&mut graph, "model", "Foo");
    let reference = ElementReference::explicit(t);
    assert_eq!(reference.value_for_serialization(&graph), "model::Foo");

    graph.rename_element(t, "Renamed").unwrap();
    assert_eq!(reference.value_for_serialization(&graph), "model::Renamed");
    assert_eq!(reference.hash_value(&graph), "model::Renamed");
}

#[test]
fn test_empty_input_serializes_empty() {
    let mut graph = Graph::new();
    let t = class_at(&mut graph, "model", "Foo");
    let u = class_at(&mut graph, "model", "Bar");
    let mut reference = ElementReference::implicit(&graph, t, "");
    assert_eq!(reference.value_for_serialization(&graph), "");
    reference.set_value(u);
    assert_eq!(reference.value_for_serialization(&graph), "");
}

#[test]
fn test_section_scoped_reference_degrades_when_section_deleted() {
    // GIVEN a reference resolved as "Foo" inside a live section
    let mut graph = Graph::new();
    let t = class_at(&mut graph, "model", "Foo");
    let section = section_at(&mut graph, &["model"]);
    let reference = ElementReference::resolve_from_section(&graph, t, "Foo", Some(section));
    assert_eq!(reference.value_for_serialization(&graph), "Foo");

    // WHEN the owning section index is marked deleted
    graph.set_section_index_deleted(section.index, true).unwrap();

    // THEN the same reference now emits the full path
    assert_eq!(reference.value_for_serialization(&graph), "model::Foo");

    // AND undeleting is observed on the next read as well
    graph.set_section_index_deleted(section.index, false).unwrap();
    assert_eq!(reference.value_for_serialization(&graph), "Foo");
}

#[test]
fn test_section_scoped_reference_keeps_text_if_imports_still_select_target() {
    let mut graph = Graph::new();
    let t = class_at(&mut graph, "model", "Foo");
    let u = class_at(&mut graph, "other", "Foo");
    let section = section_at(&mut graph, &["model", "other"]);
    let mut reference = ElementReference::resolve_from_section(&graph, t, "Foo", Some(section));

    // "Foo" under the imports still reaches other::Foo
    reference.set_value(u);
    assert_eq!(reference.value_for_serialization(&graph), "Foo");
}

#[test]
fn test_section_scoped_reference_redirected_out_of_imports() {
    let mut graph = Graph::new();
    let t = class_at(&mut graph, "model", "Foo");
    let u = class_at(&mut graph, "elsewhere", "Bar");
    let section = section_at(&mut graph, &["model"]);
    let mut reference = ElementReference::resolve_from_section(&graph, t, "Foo", Some(section));

    reference.set_value(u);
    assert_eq!(reference.value_for_serialization(&graph), "elsewhere::Bar");
}

#[test]
fn test_reference_without_section_emits_full_path() {
    let mut graph = Graph::new();
    let t = class_at(&mut graph, "model", "Foo");
    let reference = ElementReference::resolve_from_section(&graph, t, "Foo", None);
    assert_eq!(reference.value_for_serialization(&graph), "model::Foo");
    assert_eq!(reference.input_value(), Some("Foo"));
    assert!(reference.section().is_none());
}

#[test]
fn test_implicit_reference_falls_back_to_path_after_rename() {
    // GIVEN references written as "Foo" to model::Foo
    let mut graph = Graph::new();
    let t = class_at(&mut graph, "model", "Foo");
    let section = section_at(&mut graph, &["model"]);
    let implicit = ElementReference::implicit(&graph, t, "Foo");
    let scoped = ElementReference::resolve_from_section(&graph, t, "Foo", Some(section));

    // WHEN the target is renamed
    graph.rename_element(t, "Baz").unwrap();

    // THEN neither keeps the stale text
    assert_eq!(implicit.value_for_serialization(&graph), "model::Baz");
    assert_eq!(scoped.value_for_serialization(&graph), "model::Baz");
}

#[test]
fn test_scoped_reference_falls_back_to_path_after_move_out_of_imports() {
    // GIVEN "Foo" resolved through the `model` import
    let mut graph = Graph::new();
    let t = class_at(&mut graph, "model", "Foo");
    let section = section_at(&mut graph, &["model"]);
    let scoped = ElementReference::resolve_from_section(&graph, t, "Foo", Some(section));
    let qualified = ElementReference::implicit(&graph, t, "model::Foo");

    // WHEN the target moves to a package the section does not import
    graph.move_element(t, "other").unwrap();

    // THEN the full new path is emitted
    assert_eq!(scoped.value_for_serialization(&graph), "other::Foo");
    assert_eq!(qualified.value_for_serialization(&graph), "other::Foo");
}
