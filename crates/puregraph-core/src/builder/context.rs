//! Second-pass linking context
//!
//! One context is created per element. It resolves reference strings
//! against the fully registered graph and collects every failure instead of
//! stopping at the first.

use crate::errors::GraphError;
use crate::graph::Graph;
use crate::model::domain::Profile;
use crate::model::section::{Section, SectionHandle};
use crate::model::{ElementBody, ElementId, ElementKind};
use crate::reference::ElementReference;

/// Kinds a property, parameter or return type may point at
pub const TYPE_KINDS: &[ElementKind] = &[
    ElementKind::PrimitiveType,
    ElementKind::Class,
    ElementKind::Enumeration,
];

/// Kinds a class mapping may read from
pub const STORE_KINDS: &[ElementKind] = &[ElementKind::Database, ElementKind::FlatData];

pub struct LinkContext<'a> {
    graph: &'a Graph,
    element_path: &'a str,
    section: Option<SectionHandle>,
    strict: bool,
    errors: Vec<GraphError>,
}

impl<'a> LinkContext<'a> {
    pub fn new(
        graph: &'a Graph,
        element_path: &'a str,
        section: Option<SectionHandle>,
        strict: bool,
    ) -> Self {
        Self {
            graph,
            element_path,
            section,
            strict,
            errors: Vec::new(),
        }
    }

    pub fn graph(&self) -> &'a Graph {
        self.graph
    }

    /// Path of the element being linked
    pub fn element_path(&self) -> &str {
        self.element_path
    }

    pub fn section(&self) -> Option<SectionHandle> {
        self.section
    }

    pub fn record(&mut self, error: GraphError) {
        self.errors.push(error);
    }

    /// Record an `InvalidContent` error against the element being linked
    pub fn invalid(&mut self, reason: impl Into<String>) {
        let path = self.element_path.to_string();
        self.record(GraphError::InvalidContent {
            path,
            reason: reason.into(),
        });
    }

    pub fn errors(&self) -> &[GraphError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<GraphError> {
        self.errors
    }

    /// Resolve `input` and check the target kind
    ///
    /// `expected` empty accepts any kind. On failure the error is recorded
    /// and `None` is returned.
    pub fn resolve(
        &mut self,
        field: &str,
        input: &str,
        expected: &[ElementKind],
    ) -> Option<ElementReference> {
        let id = match self.lookup(field, input) {
            Ok(id) => id,
            Err(err) => {
                self.record(err);
                return None;
            }
        };
        if !expected.is_empty() {
            let actual = self.graph.element(id).map(|e| e.kind()).ok()?;
            if !expected.contains(&actual) {
                let expected = expected
                    .iter()
                    .map(ElementKind::label)
                    .collect::<Vec<_>>()
                    .join("|");
                self.record(GraphError::WrongElementKind {
                    path: self.graph.path_of(id),
                    expected,
                    actual: actual.to_string(),
                });
                return None;
            }
        }
        Some(ElementReference::resolve_from_section(
            self.graph,
            id,
            input,
            self.section,
        ))
    }

    pub fn resolve_all(
        &mut self,
        field: &str,
        inputs: &[String],
        expected: &[ElementKind],
    ) -> Vec<ElementReference> {
        inputs
            .iter()
            .filter_map(|input| self.resolve(field, input, expected))
            .collect()
    }

    /// Whether the profile behind `profile` satisfies `f`
    pub fn profile_declares(
        &self,
        profile: &ElementReference,
        f: impl Fn(&Profile) -> bool,
    ) -> bool {
        match self.graph.element(profile.value()).map(|e| e.body()) {
            Ok(ElementBody::Profile(p)) => f(p),
            _ => false,
        }
    }

    fn live_section(&self) -> Option<&'a Section> {
        let handle = self.section?;
        if self.graph.is_section_index_deleted(handle.index) {
            return None;
        }
        self.graph.section(handle)
    }

    fn lookup(&self, field: &str, input: &str) -> Result<ElementId, GraphError> {
        let unresolved = || GraphError::UnresolvedReference {
            reference: input.to_string(),
            element: self.element_path.to_string(),
            field: field.to_string(),
        };
        if input.is_empty() {
            return Err(unresolved());
        }

        if let Some(section) = self.live_section() {
            let mut found: Vec<ElementId> = Vec::new();
            for candidate in section.candidate_paths(input) {
                if let Ok(id) = self.graph.get_element_by_path(&candidate) {
                    if !found.contains(&id) {
                        found.push(id);
                    }
                }
            }
            match found.as_slice() {
                [id] => return Ok(*id),
                [] if self.strict => return Err(unresolved()),
                [] => {}
                _ => return Err(self.ambiguous(input, &found)),
            }
        } else if let Ok(id) = self.graph.get_element_by_path(input) {
            return Ok(id);
        }

        let matches = self.graph.find_by_suffix(input);
        match matches.as_slice() {
            [id] => Ok(*id),
            [] => Err(unresolved()),
            _ => Err(self.ambiguous(input, &matches)),
        }
    }

    fn ambiguous(&self, input: &str, ids: &[ElementId]) -> GraphError {
        GraphError::AmbiguousReference {
            reference: input.to_string(),
            element: self.element_path.to_string(),
            candidates: ids.iter().map(|id| self.graph.path_of(*id)).collect(),
        }
    }
}
