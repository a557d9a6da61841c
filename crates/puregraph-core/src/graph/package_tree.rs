//! Package tree operations
//!
//! Every mutation here keeps the `paths` and `kinds` indices equal to the
//! set of elements reachable from the root.

use tracing::debug;

use super::Graph;
use crate::errors::{GraphError, Result};
use crate::model::{Element, ElementBody, ElementId, ElementKind, Package};
use crate::path::{join_path, validate_name, validate_path, ELEMENT_PATH_DELIMITER};

impl Graph {
    /// Descend `path` one segment at a time from the root
    ///
    /// Missing packages are created when `insert` is true. An empty path
    /// names the root. Calling this twice with the same path returns the
    /// same package.
    ///
    /// # Errors
    ///
    /// * `InvalidPath` / `ReservedName` - malformed path
    /// * `ElementNotFound` - a segment is missing and `insert` is false
    /// * `DuplicatePath` - a segment is taken by an element that is not a package
    pub fn get_or_create_package(&mut self, path: &str, insert: bool) -> Result<ElementId> {
        if path.is_empty() {
            return Ok(self.root());
        }
        validate_path(path)?;

        let mut current = self.root();
        for segment in path.split(ELEMENT_PATH_DELIMITER) {
            let existing = self
                .element(current)?
                .children()
                .iter()
                .copied()
                .find(|child| {
                    self.element(*child)
                        .map(|e| e.name() == segment)
                        .unwrap_or(false)
                });
            current = match existing {
                Some(child) => {
                    if !self.element(child)?.is_package() {
                        return Err(GraphError::DuplicatePath {
                            path: self.path_of(child),
                            entities: Vec::new(),
                        });
                    }
                    child
                }
                None if insert => {
                    let package = Element::new(segment, ElementBody::Package(Package::default()));
                    let id = self.alloc(package);
                    self.attach(current, id);
                    id
                }
                None => {
                    return Err(GraphError::ElementNotFound {
                        segment: segment.to_string(),
                        path: path.to_string(),
                    })
                }
            };
        }
        Ok(current)
    }

    /// Create a fully populated element inside `package`
    ///
    /// # Errors
    ///
    /// Fails on an invalid name, a non-package parent, or a taken path.
    pub fn create_element(
        &mut self,
        package: ElementId,
        name: &str,
        body: ElementBody,
    ) -> Result<ElementId> {
        self.check_vacant(package, name)?;
        let id = self.alloc(Element::new(name, body));
        self.attach(package, id);
        Ok(id)
    }

    /// Create a registration stub of `kind` inside `package`
    ///
    /// # Errors
    ///
    /// Same as [`Graph::create_element`].
    pub fn create_stub(
        &mut self,
        package: ElementId,
        name: &str,
        kind: &ElementKind,
    ) -> Result<ElementId> {
        self.insert_element(package, Element::stub(name, ElementBody::skeleton(kind)))
    }

    /// Place a prepared element inside `package`
    pub(crate) fn insert_element(&mut self, package: ElementId, element: Element) -> Result<ElementId> {
        self.check_vacant(package, element.name())?;
        let id = self.alloc(element);
        self.attach(package, id);
        Ok(id)
    }

    /// Make `element` a child of `package`
    ///
    /// Adding an element that is already a child is a no-op. An element
    /// attached elsewhere is moved, together with its subtree.
    ///
    /// # Errors
    ///
    /// * `WrongElementKind` - `package` is not a package
    /// * `DuplicatePath` - another element already has the resulting path
    /// * `InvalidPath` - the root, a primitive type, or a move into the
    ///   element's own subtree
    pub fn add_element(&mut self, package: ElementId, element: ElementId) -> Result<()> {
        if self.element(package)?.children().contains(&element) {
            return Ok(());
        }
        let name = self.element(element)?.name().to_string();
        self.check_vacant(package, &name)?;
        if element == self.root() || self.primitives.get(&name) == Some(&element) {
            return Err(GraphError::InvalidPath {
                path: name,
                reason: "element cannot be placed in the package tree".to_string(),
            });
        }
        if self.is_ancestor_or_self(element, package) {
            return Err(GraphError::InvalidPath {
                path: self.path_of(element),
                reason: "cannot move a package into its own subtree".to_string(),
            });
        }
        self.detach(element)?;
        self.attach(package, element);
        Ok(())
    }

    /// Remove `element` from `package` by identity
    ///
    /// The element and its whole subtree leave the indices. Children of a
    /// deleted package stay under it (orphaned, never promoted). Deleting
    /// something that is not a child of `package` does nothing.
    ///
    /// # Errors
    ///
    /// Returns `WrongElementKind` if `package` is not a package.
    pub fn delete_element(&mut self, package: ElementId, element: ElementId) -> Result<()> {
        self.require_package(package)?;
        if !self.element(package)?.children().contains(&element) {
            return Ok(());
        }
        debug!(path = %self.path_of(element), "delete element");
        self.detach(element)
    }

    /// Give `element` a new local name
    ///
    /// # Errors
    ///
    /// Fails on an invalid name or when the new path is taken.
    pub fn rename_element(&mut self, element: ElementId, name: &str) -> Result<()> {
        validate_name(name)?;
        if element == self.root() || self.primitive_types().contains(&element) {
            return Err(GraphError::InvalidPath {
                path: self.path_of(element),
                reason: "built-in elements cannot be renamed".to_string(),
            });
        }
        let current = self.element(element)?;
        if current.name() == name {
            return Ok(());
        }
        let Some(package) = current.package() else {
            self.element_mut(element)?.name = name.to_string();
            return Ok(());
        };
        let indexed = self.is_indexed(element);
        if indexed {
            self.check_vacant(package, name)?;
        } else {
            // detached subtree: live paths are not ours to collide with
            self.check_no_sibling_named(package, name)?;
        }

        if indexed {
            self.unindex_subtree(element);
        }
        self.element_mut(element)?.name = name.to_string();
        if indexed {
            self.index_subtree(element);
        }
        Ok(())
    }

    /// Move `element` under the package at `package_path`, creating it if needed
    ///
    /// # Errors
    ///
    /// Same as [`Graph::add_element`].
    pub fn move_element(&mut self, element: ElementId, package_path: &str) -> Result<()> {
        let name = self.element(element)?.name().to_string();
        let target = join_path(package_path, &name);
        if let Some(existing) = self.paths.get(&target) {
            if *existing == element {
                return Ok(());
            }
            return Err(GraphError::DuplicatePath {
                path: target,
                entities: Vec::new(),
            });
        }
        let package = self.get_or_create_package(package_path, true)?;
        self.add_element(package, element)
    }

    /// All elements below `package`, depth-first in child order
    pub fn descendants(&self, package: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self
            .element(package)
            .map(|e| e.children().iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Ok(element) = self.element(id) {
                stack.extend(element.children().iter().rev().copied());
            }
        }
        out
    }

    fn require_package(&self, package: ElementId) -> Result<()> {
        let element = self.element(package)?;
        if element.is_package() {
            Ok(())
        } else {
            Err(GraphError::WrongElementKind {
                path: self.path_of(package),
                expected: ElementKind::Package.to_string(),
                actual: element.kind().to_string(),
            })
        }
    }

    fn check_vacant(&self, package: ElementId, name: &str) -> Result<()> {
        validate_name(name)?;
        self.require_package(package)?;
        let path = join_path(&self.path_of(package), name);
        if self.paths.contains_key(&path) {
            return Err(GraphError::DuplicatePath {
                path,
                entities: Vec::new(),
            });
        }
        Ok(())
    }

    fn check_no_sibling_named(&self, package: ElementId, name: &str) -> Result<()> {
        let parent = self.element(package)?;
        let taken = parent
            .children()
            .iter()
            .filter_map(|child| self.element(*child).ok())
            .any(|child| child.name() == name);
        if taken {
            return Err(GraphError::DuplicatePath {
                path: join_path(&self.path_of(package), name),
                entities: Vec::new(),
            });
        }
        Ok(())
    }

    fn is_ancestor_or_self(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(cur) = current {
            if cur == ancestor {
                return true;
            }
            current = self.element(cur).ok().and_then(|e| e.package());
        }
        false
    }

    /// Append without checks; the caller has validated the move
    fn attach(&mut self, package: ElementId, element: ElementId) {
        if let Ok(parent) = self.element_mut(package) {
            if let ElementBody::Package(pkg) = &mut parent.body {
                pkg.children.push(element);
            }
        }
        if let Ok(child) = self.element_mut(element) {
            child.package = Some(package);
        }
        if self.is_reachable(package) {
            self.index_subtree(element);
        }
    }

    fn detach(&mut self, element: ElementId) -> Result<()> {
        if self.is_indexed(element) {
            self.unindex_subtree(element);
        }
        let Some(parent) = self.element(element)?.package() else {
            return Ok(());
        };
        if let ElementBody::Package(pkg) = &mut self.element_mut(parent)?.body {
            pkg.children.retain(|child| *child != element);
        }
        self.element_mut(element)?.package = None;
        Ok(())
    }

    fn is_reachable(&self, id: ElementId) -> bool {
        id == self.root() || self.is_indexed(id)
    }

    fn index_subtree(&mut self, element: ElementId) {
        for id in std::iter::once(element).chain(self.descendants(element)) {
            let path = self.path_of(id);
            if let Ok(e) = self.element(id) {
                let kind = e.kind();
                self.paths.insert(path, id);
                self.kinds.entry(kind).or_default().insert(id);
            }
        }
    }

    fn unindex_subtree(&mut self, element: ElementId) {
        for id in std::iter::once(element).chain(self.descendants(element)) {
            let path = self.path_of(id);
            if self.paths.get(&path) == Some(&id) {
                self.paths.remove(&path);
            }
            if let Ok(kind) = self.element(id).map(|e| e.kind()) {
                self.remove_from_kind_index(&kind, id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::domain::Class;

    fn class() -> ElementBody {
        ElementBody::Class(Class::default())
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let mut graph = Graph::new();
        let first = graph.get_or_create_package("a::b::c", true).unwrap();
        let count = graph.all_elements().len();
        let second = graph.get_or_create_package("a::b::c", true).unwrap();
        assert_eq!(first, second);
        assert_eq!(graph.all_elements().len(), count);
        assert_eq!(count, 3);
    }

    #[test]
    fn test_get_without_insert_names_missing_segment() {
        let mut graph = Graph::new();
        graph.get_or_create_package("a", true).unwrap();
        let err = graph.get_or_create_package("a::b::c", false).unwrap_err();
        assert_eq!(
            err,
            GraphError::ElementNotFound {
                segment: "b".to_string(),
                path: "a::b::c".to_string(),
            }
        );
    }

    #[test]
    fn test_package_segment_taken_by_class() {
        let mut graph = Graph::new();
        let pkg = graph.get_or_create_package("model", true).unwrap();
        graph.create_element(pkg, "Foo", class()).unwrap();
        assert!(matches!(
            graph.get_or_create_package("model::Foo::inner", true),
            Err(GraphError::DuplicatePath { path, .. }) if path == "model::Foo"
        ));
    }

    #[test]
    fn test_add_element_is_idempotent_and_rejects_duplicates() {
        let mut graph = Graph::new();
        let pkg = graph.get_or_create_package("model", true).unwrap();
        let foo = graph.create_element(pkg, "Foo", class()).unwrap();
        graph.add_element(pkg, foo).unwrap();
        assert_eq!(graph.element(pkg).unwrap().children(), &[foo]);

        assert!(matches!(
            graph.create_element(pkg, "Foo", class()),
            Err(GraphError::DuplicatePath { .. })
        ));
    }

    #[test]
    fn test_delete_orphans_children_and_purges_indices() {
        let mut graph = Graph::new();
        let model = graph.get_or_create_package("model", true).unwrap();
        let inner = graph.get_or_create_package("model::inner", true).unwrap();
        let foo = graph.create_element(inner, "Foo", class()).unwrap();

        graph.delete_element(model, inner).unwrap();

        assert!(graph.get_element_by_path("model::inner").is_err());
        assert!(graph.get_element_by_path("model::inner::Foo").is_err());
        assert!(graph.elements_of_kind(&ElementKind::Class).is_empty());
        // orphaned, not promoted
        assert_eq!(graph.element(foo).unwrap().package(), Some(inner));
        assert!(graph.element(model).unwrap().children().is_empty());
    }

    #[test]
    fn test_rename_reindexes_subtree() {
        let mut graph = Graph::new();
        let inner = graph.get_or_create_package("model::inner", true).unwrap();
        let foo = graph.create_element(inner, "Foo", class()).unwrap();

        graph.rename_element(inner, "renamed").unwrap();

        assert_eq!(graph.path_of(foo), "model::renamed::Foo");
        assert_eq!(graph.get_element_by_path("model::renamed::Foo").unwrap(), foo);
        assert!(graph.get_element_by_path("model::inner::Foo").is_err());
    }

    #[test]
    fn test_move_element_creates_target_package() {
        let mut graph = Graph::new();
        let pkg = graph.get_or_create_package("model", true).unwrap();
        let foo = graph.create_element(pkg, "Foo", class()).unwrap();

        graph.move_element(foo, "other::place").unwrap();

        assert_eq!(graph.path_of(foo), "other::place::Foo");
        assert!(graph.element(pkg).unwrap().children().is_empty());
        assert_eq!(graph.elements_of_kind(&ElementKind::Class), vec![foo]);
    }

    #[test]
    fn test_cannot_move_package_into_itself() {
        let mut graph = Graph::new();
        let outer = graph.get_or_create_package("outer", true).unwrap();
        graph.get_or_create_package("outer::inner", true).unwrap();
        assert!(matches!(
            graph.move_element(outer, "outer::inner"),
            Err(GraphError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_descendants_depth_first() {
        let mut graph = Graph::new();
        let a = graph.get_or_create_package("a", true).unwrap();
        let b = graph.get_or_create_package("a::b", true).unwrap();
        let x = graph.create_element(b, "X", class()).unwrap();
        let y = graph.create_element(a, "Y", class()).unwrap();
        assert_eq!(graph.descendants(a), vec![b, x, y]);
        assert_eq!(graph.descendants(graph.root()), vec![a, b, x, y]);
    }
}
