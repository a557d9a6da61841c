//! Source sections
//!
//! A section index lists the sections of one source unit. Each section
//! carries the import prefixes in effect at that location and the paths of
//! the elements declared in it.

use serde::{Deserialize, Serialize};

use super::ElementId;
use crate::graph::Graph;
use crate::hash::{hash_array, hash_list, hash_strings, tags, Hashable};
use crate::path::{is_qualified, join_path};

/// Address of one section inside a section index element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectionHandle {
    pub index: ElementId,
    pub section: usize,
}

/// Import-aware code section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub parser_name: String,
    /// Package prefixes, tried in declaration order
    pub imports: Vec<String>,
    /// Paths of the elements declared in this section
    pub elements: Vec<String>,
}

impl Section {
    /// Candidate full paths for `input`, in resolution order
    ///
    /// A qualified input only ever names itself; an unqualified one is tried
    /// under each import and then bare.
    pub fn candidate_paths(&self, input: &str) -> Vec<String> {
        if is_qualified(input) {
            return vec![input.to_string()];
        }
        let mut candidates: Vec<String> = self
            .imports
            .iter()
            .map(|import| join_path(import, input))
            .collect();
        candidates.push(input.to_string());
        candidates
    }

    /// Whether resolving `input` in this section can select `path`
    pub fn resolves_to(&self, input: &str, path: &str) -> bool {
        self.candidate_paths(input).iter().any(|c| c == path)
    }
}

impl Hashable for Section {
    fn hash_code(&self, _graph: &Graph) -> String {
        hash_array([
            tags::SECTION,
            self.parser_name.as_str(),
            &hash_strings(&self.imports),
            &hash_strings(&self.elements),
        ])
    }
}

/// Element listing all sections of a source unit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionIndex {
    pub sections: Vec<Section>,
    /// Read lazily by section-scoped references
    pub is_deleted: bool,
}

impl SectionIndex {
    /// Section declaring the element at `path`
    pub fn section_of(&self, path: &str) -> Option<usize> {
        self.sections
            .iter()
            .position(|section| section.elements.iter().any(|p| p == path))
    }

    pub(crate) fn element_hash(&self, path: &str, graph: &Graph) -> String {
        hash_array([tags::SECTION_INDEX, path, &hash_list(&self.sections, graph)])
    }
}
