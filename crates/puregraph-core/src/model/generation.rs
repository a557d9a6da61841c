use crate::graph::Graph;
use crate::hash::{hash_array, hash_list, tags, Hashable};
use crate::reference::ElementReference;

/// One generation step, pointing at the element that drives it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationNode {
    pub id: String,
    pub generation_element: ElementReference,
}

impl Hashable for GenerationNode {
    fn hash_code(&self, graph: &Graph) -> String {
        hash_array([
            tags::GENERATION_NODE,
            &self.id,
            &self.generation_element.hash_value(graph),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationSpecification {
    pub generation_nodes: Vec<GenerationNode>,
}

impl GenerationSpecification {
    pub(crate) fn element_hash(&self, path: &str, graph: &Graph) -> String {
        hash_array([
            tags::GENERATION_SPECIFICATION,
            path,
            &hash_list(&self.generation_nodes, graph),
        ])
    }
}
