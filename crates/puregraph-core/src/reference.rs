//! Element references
//!
//! A reference is a live, non-owning pointer from one element's field to
//! another element, together with the textual form it was declared with.
//!
//! - **Explicit**: built from a resolved target; always serializes as the
//!   target's current path.
//! - **Implicit**: built from a target plus the input text it was resolved
//!   from; serializes as that text while the reference still points at the
//!   target it was created with (identity, re-checked on every read) and
//!   that target still sits at the path it had then. A rename or move
//!   falls back to the full path.
//! - **Section-scoped implicit**: as implicit, but the text is only kept while
//!   the import section it was declared in is alive. Section deletion is
//!   observed at read time.
//!
//! An empty input text means "no textual reference emitted" and always
//! serializes as `""`.

use crate::graph::Graph;
use crate::hash::Hashable;
use crate::model::section::SectionHandle;
use crate::model::ElementId;

/// How a reference decides its serialization text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionCheck {
    /// Plain implicit reference; no section involvement
    Skip,
    /// Resolved inside a section (or outside any section when `None`)
    Scoped(Option<SectionHandle>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ReferenceForm {
    Explicit,
    Implicit {
        input: String,
        initial_value: ElementId,
        /// Path of `initial_value` when the reference was created
        initial_path: String,
        section: SectionCheck,
    },
}

/// Resolvable pointer to another element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementReference {
    value: ElementId,
    form: ReferenceForm,
}

impl ElementReference {
    /// Reference whose text always follows the target's current path
    pub fn explicit(value: ElementId) -> Self {
        Self {
            value,
            form: ReferenceForm::Explicit,
        }
    }

    /// Reference that keeps `input` while it points at `value`
    pub fn implicit(graph: &Graph, value: ElementId, input: impl Into<String>) -> Self {
        Self {
            value,
            form: ReferenceForm::Implicit {
                input: input.into(),
                initial_value: value,
                initial_path: graph.path_of(value),
                section: SectionCheck::Skip,
            },
        }
    }

    /// Reference resolved from `input` inside `section`
    ///
    /// Without a section the text is never preserved: the reference
    /// serializes as the full path of whatever it points at.
    pub fn resolve_from_section(
        graph: &Graph,
        value: ElementId,
        input: impl Into<String>,
        section: Option<SectionHandle>,
    ) -> Self {
        Self {
            value,
            form: ReferenceForm::Implicit {
                input: input.into(),
                initial_value: value,
                initial_path: graph.path_of(value),
                section: SectionCheck::Scoped(section),
            },
        }
    }

    /// The current target
    pub fn value(&self) -> ElementId {
        self.value
    }

    /// Redirect the reference; the target element itself is not touched
    pub fn set_value(&mut self, value: ElementId) {
        self.value = value;
    }

    /// Original input text for implicit references
    pub fn input_value(&self) -> Option<&str> {
        match &self.form {
            ReferenceForm::Explicit => None,
            ReferenceForm::Implicit { input, .. } => Some(input),
        }
    }

    /// The section this reference was resolved in, if any
    pub fn section(&self) -> Option<SectionHandle> {
        match &self.form {
            ReferenceForm::Implicit {
                section: SectionCheck::Scoped(section),
                ..
            } => *section,
            _ => None,
        }
    }

    /// Textual form to emit when re-serializing, computed against live state
    pub fn value_for_serialization(&self, graph: &Graph) -> String {
        let current_path = graph.path_of(self.value);
        let (input, initial_value, initial_path, section) = match &self.form {
            ReferenceForm::Explicit => return current_path,
            ReferenceForm::Implicit {
                input,
                initial_value,
                initial_path,
                section,
            } => (input, *initial_value, initial_path, section),
        };
        if input.is_empty() {
            return String::new();
        }
        let unchanged_target = self.value == initial_value && current_path == *initial_path;
        match section {
            SectionCheck::Skip => {
                if unchanged_target {
                    input.clone()
                } else {
                    current_path
                }
            }
            SectionCheck::Scoped(None) => current_path,
            SectionCheck::Scoped(Some(handle)) => {
                let Some(owner_section) = graph.section(*handle) else {
                    return current_path;
                };
                if graph.is_section_index_deleted(handle.index) {
                    return current_path;
                }
                if unchanged_target || owner_section.resolves_to(input, &current_path) {
                    input.clone()
                } else {
                    current_path
                }
            }
        }
    }

    /// The target's current path; this is what structural hashes consume
    pub fn hash_value(&self, graph: &Graph) -> String {
        graph.path_of(self.value)
    }
}

impl Hashable for ElementReference {
    fn hash_code(&self, graph: &Graph) -> String {
        self.hash_value(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::section::{Section, SectionIndex};
    use crate::model::{ElementBody, ElementKind};

    fn class_in(graph: &mut Graph, package: &str, name: &str) -> ElementId {
        let pkg = graph.get_or_create_package(package, true).unwrap();
        graph
            .create_element(pkg, name, ElementBody::skeleton(&ElementKind::Class))
            .unwrap()
    }

    #[test]
    fn test_explicit_follows_current_path() {
        let mut graph = Graph::new();
        let class1 = class_in(&mut graph, "model", "Class1");
        let class2 = class_in(&mut graph, "model", "Class2");

        let mut reference = ElementReference::explicit(class2);
        assert_eq!(reference.value_for_serialization(&graph), "model::Class2");
        reference.set_value(class1);
        assert_eq!(reference.value_for_serialization(&graph), "model::Class1");

        graph.rename_element(class1, "Renamed").unwrap();
        assert_eq!(reference.value_for_serialization(&graph), "model::Renamed");
    }

    #[test]
    fn test_implicit_restores_input_by_identity() {
        let mut graph = Graph::new();
        let foo = class_in(&mut graph, "model", "Foo");
        let bar = class_in(&mut graph, "model", "Bar");

        let mut reference = ElementReference::implicit(&graph, foo, "Foo");
        assert_eq!(reference.value_for_serialization(&graph), "Foo");
        reference.set_value(bar);
        assert_eq!(reference.value_for_serialization(&graph), "model::Bar");
        reference.set_value(foo);
        assert_eq!(reference.value_for_serialization(&graph), "Foo");
    }

    #[test]
    fn test_empty_input_never_emits_text() {
        let mut graph = Graph::new();
        let foo = class_in(&mut graph, "model", "Foo");
        let bar = class_in(&mut graph, "model", "Bar");

        let mut reference = ElementReference::implicit(&graph, foo, "");
        assert_eq!(reference.value_for_serialization(&graph), "");
        reference.set_value(bar);
        assert_eq!(reference.value_for_serialization(&graph), "");
    }

    #[test]
    fn test_scoped_without_section_uses_full_path() {
        let mut graph = Graph::new();
        let foo = class_in(&mut graph, "model", "Foo");

        let reference = ElementReference::resolve_from_section(&graph, foo, "something", None);
        assert_eq!(reference.value_for_serialization(&graph), "model::Foo");
    }

    #[test]
    fn test_scoped_degrades_when_section_index_deleted() {
        let mut graph = Graph::new();
        let foo = class_in(&mut graph, "model", "Foo");
        let bar = class_in(&mut graph, "model", "Bar");
        let index = graph
            .create_element(
                graph.root(),
                "SectionIndex",
                ElementBody::SectionIndex(SectionIndex {
                    sections: vec![Section::default()],
                    ..SectionIndex::default()
                }),
            )
            .unwrap();
        let handle = SectionHandle { index, section: 0 };

        let mut reference = ElementReference::resolve_from_section(&graph, foo, "Foo", Some(handle));
        assert_eq!(reference.value_for_serialization(&graph), "Foo");
        reference.set_value(bar);
        assert_eq!(reference.value_for_serialization(&graph), "model::Bar");
        reference.set_value(foo);
        assert_eq!(reference.value_for_serialization(&graph), "Foo");

        graph.set_section_index_deleted(index, true).unwrap();
        assert_eq!(reference.value_for_serialization(&graph), "model::Foo");
        reference.set_value(bar);
        assert_eq!(reference.value_for_serialization(&graph), "model::Bar");
        reference.set_value(foo);
        assert_eq!(reference.value_for_serialization(&graph), "model::Foo");

        // undeletion is observed live as well
        graph.set_section_index_deleted(index, false).unwrap();
        assert_eq!(reference.value_for_serialization(&graph), "Foo");
    }

    #[test]
    fn test_implicit_drops_text_once_renamed() {
        let mut graph = Graph::new();
        let foo = class_in(&mut graph, "model", "Foo");

        let reference = ElementReference::implicit(&graph, foo, "Foo");
        graph.rename_element(foo, "Baz").unwrap();
        assert_eq!(reference.value_for_serialization(&graph), "model::Baz");
    }

    #[test]
    fn test_scoped_keeps_text_when_imports_still_select_new_target() {
        let mut graph = Graph::new();
        let old = class_in(&mut graph, "old", "Foo");
        let new = class_in(&mut graph, "model", "Foo");
        let index = graph
            .create_element(
                graph.root(),
                "SectionIndex",
                ElementBody::SectionIndex(SectionIndex {
                    sections: vec![Section {
                        imports: vec!["model".to_string()],
                        ..Section::default()
                    }],
                    ..SectionIndex::default()
                }),
            )
            .unwrap();

        let mut reference = ElementReference::resolve_from_section(
            &graph,
            old,
            "Foo",
            Some(SectionHandle { index, section: 0 }),
        );
        reference.set_value(new);
        assert_eq!(reference.value_for_serialization(&graph), "Foo");
    }

    #[test]
    fn test_reference_to_stub_is_allowed() {
        let mut graph = Graph::new();
        let pkg = graph.get_or_create_package("model", true).unwrap();
        let stub = graph.create_stub(pkg, "Pending", &ElementKind::Class).unwrap();
        assert!(graph.element(stub).unwrap().is_stub());

        let reference = ElementReference::implicit(&graph, stub, "Pending");
        assert_eq!(reference.value(), stub);
        assert_eq!(reference.hash_value(&graph), "model::Pending");
    }
}
