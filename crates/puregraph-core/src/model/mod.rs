pub mod diagram;
pub mod domain;
pub mod element;
pub mod generation;
pub mod mapping;
pub mod section;
pub mod store;

pub use element::{Element, ElementBody, ElementId, ElementKind, ExtensionElement, Package};
