//! Class diagrams

use crate::graph::Graph;
use crate::hash::{hash_array, hash_list, opt_bool, tags, Hashable};
use crate::reference::ElementReference;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Hashable for Point {
    fn hash_code(&self, _graph: &Graph) -> String {
        hash_array([tags::POINT.to_string(), self.x.to_string(), self.y.to_string()])
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rectangle {
    pub width: f64,
    pub height: f64,
}

impl Hashable for Rectangle {
    fn hash_code(&self, _graph: &Graph) -> String {
        hash_array([
            tags::RECTANGLE.to_string(),
            self.width.to_string(),
            self.height.to_string(),
        ])
    }
}

/// Box drawn for one class
#[derive(Debug, Clone, PartialEq)]
pub struct ClassView {
    pub id: String,
    pub class: ElementReference,
    pub position: Point,
    pub rectangle: Rectangle,
    pub hide_properties: Option<bool>,
    pub hide_stereotypes: Option<bool>,
    pub hide_tagged_values: Option<bool>,
}

impl Hashable for ClassView {
    fn hash_code(&self, graph: &Graph) -> String {
        hash_array([
            tags::CLASS_VIEW.to_string(),
            self.id.clone(),
            self.class.hash_value(graph),
            self.position.hash_code(graph),
            self.rectangle.hash_code(graph),
            opt_bool(self.hide_properties),
            opt_bool(self.hide_stereotypes),
            opt_bool(self.hide_tagged_values),
        ])
    }
}

/// Edge between two class views; `source_view`/`target_view` are class view ids
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyView {
    pub owning_class: ElementReference,
    pub property: String,
    pub source_view: String,
    pub target_view: String,
    pub path: Vec<Point>,
}

impl Hashable for PropertyView {
    fn hash_code(&self, graph: &Graph) -> String {
        hash_array([
            tags::PROPERTY_VIEW,
            &self.owning_class.hash_value(graph),
            &self.property,
            &self.source_view,
            &self.target_view,
            &hash_list(&self.path, graph),
        ])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneralizationView {
    pub source_view: String,
    pub target_view: String,
    pub path: Vec<Point>,
}

impl Hashable for GeneralizationView {
    fn hash_code(&self, graph: &Graph) -> String {
        hash_array([
            tags::GENERALIZATION_VIEW,
            &self.source_view,
            &self.target_view,
            &hash_list(&self.path, graph),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagram {
    pub class_views: Vec<ClassView>,
    pub property_views: Vec<PropertyView>,
    pub generalization_views: Vec<GeneralizationView>,
}

impl Diagram {
    pub fn class_view(&self, id: &str) -> Option<&ClassView> {
        self.class_views.iter().find(|view| view.id == id)
    }

    pub(crate) fn element_hash(&self, path: &str, graph: &Graph) -> String {
        hash_array([
            tags::DIAGRAM,
            path,
            &hash_list(&self.class_views, graph),
            &hash_list(&self.property_views, graph),
            &hash_list(&self.generalization_views, graph),
        ])
    }
}
