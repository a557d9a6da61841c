//! The element graph
//!
//! `Graph` owns every element in a flat table addressed by [`ElementId`].
//! The root package sits at slot 0. Package membership and reference targets
//! are plain ids, so there are no ownership cycles and a reference keeps
//! pointing at the same element across renames and moves.
//!
//! Two indices are derived from the package tree and kept in step with every
//! tree mutation:
//!
//! - `paths`: full path -> element, for everything reachable from the root
//! - `kinds`: kind -> elements, for enumeration by kind
//!
//! Built-in primitive types are held separately (see [`core_model`]).

pub mod build_state;
pub mod core_model;
mod package_tree;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::errors::{GraphError, Result};
use crate::hash::{hash_array, tags};
use crate::model::section::{Section, SectionHandle};
use crate::model::{Element, ElementBody, ElementId, ElementKind, Package};
use crate::path::{has_suffix, local_name, ELEMENT_PATH_DELIMITER};

pub use build_state::{BuildPhase, BuildState};

#[derive(Debug, Clone)]
pub struct Graph {
    elements: Vec<Element>,
    root: ElementId,
    pub(crate) paths: HashMap<String, ElementId>,
    pub(crate) kinds: HashMap<ElementKind, BTreeSet<ElementId>>,
    pub(crate) primitives: HashMap<String, ElementId>,
    build_state: BuildState,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Empty graph with the built-in primitive types installed
    pub fn new() -> Self {
        let mut graph = Self::without_core_model();
        graph.install_core_model();
        graph
    }

    /// Empty graph holding only the root package
    pub fn without_core_model() -> Self {
        let root = Element::new("", ElementBody::Package(Package::default()));
        Self {
            elements: vec![root],
            root: ElementId::from_index(0),
            paths: HashMap::new(),
            kinds: HashMap::new(),
            primitives: HashMap::new(),
            build_state: BuildState::default(),
        }
    }

    pub(crate) fn alloc(&mut self, element: Element) -> ElementId {
        let id = ElementId::from_index(self.elements.len());
        self.elements.push(element);
        id
    }

    /// The synthetic root package; its path is `""`
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// # Errors
    ///
    /// Returns `Internal` if the id was not issued by this graph.
    pub fn element(&self, id: ElementId) -> Result<&Element> {
        self.elements.get(id.index()).ok_or_else(|| GraphError::Internal {
            message: format!("unknown element handle {}", id),
        })
    }

    pub(crate) fn element_mut(&mut self, id: ElementId) -> Result<&mut Element> {
        self.elements
            .get_mut(id.index())
            .ok_or_else(|| GraphError::Internal {
                message: format!("unknown element handle {}", id),
            })
    }

    /// Edit an element's kind-specific fields in place
    ///
    /// The kind index follows if `f` swaps in a body of another kind.
    ///
    /// # Errors
    ///
    /// Returns `Internal` for a foreign handle.
    pub fn update_body<R>(
        &mut self,
        id: ElementId,
        f: impl FnOnce(&mut ElementBody) -> R,
    ) -> Result<R> {
        let element = self.element_mut(id)?;
        let before = element.kind();
        let result = f(&mut element.body);
        let after = element.kind();
        if before != after && self.is_indexed(id) {
            self.remove_from_kind_index(&before, id);
            self.kinds.entry(after).or_default().insert(id);
        }
        Ok(result)
    }

    /// Current full path, derived from the package chain on every call
    ///
    /// Detached elements report the path relative to their topmost
    /// remaining ancestor.
    pub fn path_of(&self, id: ElementId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            let Some(element) = self.elements.get(cur.index()) else {
                break;
            };
            if !element.name.is_empty() {
                segments.push(element.name.as_str());
            }
            current = element.package;
        }
        segments.reverse();
        segments.join(ELEMENT_PATH_DELIMITER)
    }

    pub fn build_state(&self) -> &BuildState {
        &self.build_state
    }

    pub(crate) fn build_state_mut(&mut self) -> &mut BuildState {
        &mut self.build_state
    }

    /// Fails unless the last build succeeded
    ///
    /// # Errors
    ///
    /// Returns `BuildFailed` carrying the number of recorded build errors.
    pub fn ensure_built(&self) -> Result<()> {
        if self.build_state.has_succeeded() {
            Ok(())
        } else {
            Err(GraphError::BuildFailed {
                error_count: self.build_state.errors().len(),
            })
        }
    }

    /// Look up an element by full path (tree first, then primitive types)
    ///
    /// # Errors
    ///
    /// Returns `ElementNotFound` when nothing lives at `path`.
    pub fn get_element_by_path(&self, path: &str) -> Result<ElementId> {
        self.paths
            .get(path)
            .or_else(|| self.primitives.get(path))
            .copied()
            .ok_or_else(|| GraphError::ElementNotFound {
                segment: local_name(path).to_string(),
                path: path.to_string(),
            })
    }

    /// Look up an element of a given kind by full path
    ///
    /// # Errors
    ///
    /// Returns `ElementNotFound` when nothing lives at `path`, or
    /// `WrongElementKind` when the element there has another kind.
    pub fn get_element(&self, kind: &ElementKind, path: &str) -> Result<ElementId> {
        let id = self.get_element_by_path(path)?;
        let actual = self.element(id)?.kind();
        if &actual != kind {
            return Err(GraphError::WrongElementKind {
                path: path.to_string(),
                expected: kind.to_string(),
                actual: actual.to_string(),
            });
        }
        Ok(id)
    }

    /// Elements of `kind` in registration order
    pub fn elements_of_kind(&self, kind: &ElementKind) -> Vec<ElementId> {
        if *kind == ElementKind::PrimitiveType {
            return self.primitive_types();
        }
        self.kinds
            .get(kind)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Every element reachable from the root, in registration order
    pub fn all_elements(&self) -> Vec<ElementId> {
        let mut ids: Vec<ElementId> = self.paths.values().copied().collect();
        ids.sort();
        ids
    }

    pub fn primitive_types(&self) -> Vec<ElementId> {
        let mut ids: Vec<ElementId> = self.primitives.values().copied().collect();
        ids.sort();
        ids
    }

    /// Elements whose path is `suffix` or ends with `::suffix`, sorted by path
    pub fn find_by_suffix(&self, suffix: &str) -> Vec<ElementId> {
        let mut matches: Vec<(&String, ElementId)> = self
            .paths
            .iter()
            .chain(self.primitives.iter())
            .filter(|(path, _)| has_suffix(path, suffix))
            .map(|(path, id)| (path, *id))
            .collect();
        matches.sort();
        matches.into_iter().map(|(_, id)| id).collect()
    }

    /// Section addressed by `handle`, if its index element still holds it
    pub fn section(&self, handle: SectionHandle) -> Option<&Section> {
        match &self.elements.get(handle.index.index())?.body {
            ElementBody::SectionIndex(index) => index.sections.get(handle.section),
            _ => None,
        }
    }

    /// Deleted flag of a section index; anything else counts as deleted
    pub fn is_section_index_deleted(&self, id: ElementId) -> bool {
        match self.elements.get(id.index()).map(|e| &e.body) {
            Some(ElementBody::SectionIndex(index)) => index.is_deleted,
            _ => true,
        }
    }

    /// # Errors
    ///
    /// Returns `WrongElementKind` if `id` is not a section index.
    pub fn set_section_index_deleted(&mut self, id: ElementId, deleted: bool) -> Result<()> {
        let path = self.path_of(id);
        let element = self.element_mut(id)?;
        match &mut element.body {
            ElementBody::SectionIndex(index) => {
                index.is_deleted = deleted;
                Ok(())
            }
            other => Err(GraphError::WrongElementKind {
                path,
                expected: ElementKind::SectionIndex.to_string(),
                actual: other.kind().to_string(),
            }),
        }
    }

    /// Structural hash of one element, recomputed against live state
    ///
    /// # Errors
    ///
    /// Returns `Internal` for a foreign handle.
    pub fn hash_code(&self, id: ElementId) -> Result<String> {
        let element = self.element(id)?;
        let path = self.path_of(id);
        Ok(match &element.body {
            ElementBody::Package(package) => {
                let mut child_paths: Vec<String> =
                    package.children.iter().map(|c| self.path_of(*c)).collect();
                child_paths.sort();
                hash_array([tags::PACKAGE, &path, &hash_array(&child_paths)])
            }
            ElementBody::PrimitiveType => hash_array([tags::PRIMITIVE_TYPE, &path]),
            ElementBody::Profile(body) => body.element_hash(&path, self),
            ElementBody::Class(body) => body.element_hash(&path, self),
            ElementBody::Enumeration(body) => body.element_hash(&path, self),
            ElementBody::Association(body) => body.element_hash(&path, self),
            ElementBody::Function(body) => body.element_hash(&path, self),
            ElementBody::Mapping(body) => body.element_hash(&path, self),
            ElementBody::Database(body) => body.element_hash(&path, self),
            ElementBody::FlatData(body) => body.element_hash(&path, self),
            ElementBody::Diagram(body) => body.element_hash(&path, self),
            ElementBody::GenerationSpecification(body) => body.element_hash(&path, self),
            ElementBody::SectionIndex(body) => body.element_hash(&path, self),
            ElementBody::Extension(ext) => {
                let references = hash_array(ext.references.iter().flat_map(|(field, r)| {
                    [field.clone(), r.hash_value(self)]
                }));
                hash_array([
                    tags::EXTENSION,
                    &ext.kind_name,
                    &path,
                    &ext.content.to_string(),
                    &references,
                ])
            }
        })
    }

    /// Path -> structural hash for every element in the tree
    pub fn element_hashes(&self) -> BTreeMap<String, String> {
        self.paths
            .iter()
            .filter_map(|(path, id)| self.hash_code(*id).ok().map(|h| (path.clone(), h)))
            .collect()
    }

    pub(crate) fn is_indexed(&self, id: ElementId) -> bool {
        self.paths.get(&self.path_of(id)) == Some(&id)
    }

    fn remove_from_kind_index(&mut self, kind: &ElementKind, id: ElementId) {
        if let Some(ids) = self.kinds.get_mut(kind) {
            ids.remove(&id);
            if ids.is_empty() {
                self.kinds.remove(kind);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::domain::Class;

    #[test]
    fn test_root_has_empty_path() {
        let graph = Graph::new();
        assert_eq!(graph.path_of(graph.root()), "");
        assert!(graph.element(graph.root()).unwrap().is_package());
    }

    #[test]
    fn test_get_element_checks_kind() {
        let mut graph = Graph::new();
        let pkg = graph.get_or_create_package("model", true).unwrap();
        graph
            .create_element(pkg, "Person", ElementBody::Class(Class::default()))
            .unwrap();

        assert!(graph.get_element(&ElementKind::Class, "model::Person").is_ok());
        assert!(matches!(
            graph.get_element(&ElementKind::Enumeration, "model::Person"),
            Err(GraphError::WrongElementKind { .. })
        ));
        assert!(matches!(
            graph.get_element(&ElementKind::Class, "model::Nobody"),
            Err(GraphError::ElementNotFound { segment, .. }) if segment == "Nobody"
        ));
    }

    #[test]
    fn test_update_body_follows_kind_change() {
        let mut graph = Graph::new();
        let id = graph
            .create_element(graph.root(), "Thing", ElementBody::Class(Class::default()))
            .unwrap();
        graph
            .update_body(id, |body| {
                *body = ElementBody::skeleton(&ElementKind::Enumeration);
            })
            .unwrap();
        assert!(graph.elements_of_kind(&ElementKind::Class).is_empty());
        assert_eq!(graph.elements_of_kind(&ElementKind::Enumeration), vec![id]);
    }

    #[test]
    fn test_find_by_suffix_respects_segment_boundary() {
        let mut graph = Graph::new();
        let a = graph.get_or_create_package("a", true).unwrap();
        let b = graph.get_or_create_package("b", true).unwrap();
        let foo = graph
            .create_element(a, "Foo", ElementBody::Class(Class::default()))
            .unwrap();
        graph
            .create_element(b, "XFoo", ElementBody::Class(Class::default()))
            .unwrap();
        assert_eq!(graph.find_by_suffix("Foo"), vec![foo]);
        assert_eq!(graph.find_by_suffix("a::Foo"), vec![foo]);
    }

    #[test]
    fn test_ensure_built_on_fresh_graph() {
        let graph = Graph::new();
        assert!(matches!(
            graph.ensure_built(),
            Err(GraphError::BuildFailed { error_count: 0 })
        ));
    }

    #[test]
    fn test_package_hash_ignores_child_order() {
        let mut first = Graph::new();
        let p1 = first.get_or_create_package("model", true).unwrap();
        first
            .create_element(p1, "A", ElementBody::Class(Class::default()))
            .unwrap();
        first
            .create_element(p1, "B", ElementBody::Class(Class::default()))
            .unwrap();

        let mut second = Graph::new();
        let p2 = second.get_or_create_package("model", true).unwrap();
        second
            .create_element(p2, "B", ElementBody::Class(Class::default()))
            .unwrap();
        second
            .create_element(p2, "A", ElementBody::Class(Class::default()))
            .unwrap();

        assert_eq!(first.hash_code(p1).unwrap(), second.hash_code(p2).unwrap());
    }
}
