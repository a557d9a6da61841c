//! PureGraph Core - in-memory graph of packageable model elements
//!
//! This crate provides:
//! - Path utilities for `::`-delimited element paths
//! - A package tree with per-kind indices over an element arena
//! - Element references that keep their source spelling (explicit,
//!   implicit, and section-scoped)
//! - A two-pass builder turning protocol entities into a linked graph
//! - Structural hashing for change detection
//!
//! ```rust
//! use puregraph_core::{BuilderOptions, ElementEntity, GraphBuilder};
//! use serde_json::json;
//!
//! let entities = vec![ElementEntity::new(
//!     "model::Person",
//!     "meta::pure::metamodel::type::Class",
//!     json!({"name": "Person", "package": "model"}),
//! )];
//! let graph = GraphBuilder::new(BuilderOptions::default()).build(&entities);
//! assert!(graph.build_state().has_succeeded());
//! ```

pub mod builder;
pub mod errors;
pub mod graph;
pub mod hash;
pub mod logging_facility;
pub mod model;
pub mod path;
pub mod reference;

// Used by the exported logging macros
#[doc(hidden)]
pub use puregraph_core_types;
#[doc(hidden)]
pub use tracing;

// Re-export commonly used types
pub use builder::{
    BuilderOptions, ElementBuilder, ElementBuilderRegistry, ElementEntity, ExtensionElementBuilder,
    GraphBuilder, LinkContext,
};
pub use errors::{ExError, ExErrorKind, GraphError, Result};
pub use graph::{BuildPhase, BuildState, Graph};
pub use hash::{diff_hashes, HashDiff, Hashable};
pub use model::{Element, ElementBody, ElementId, ElementKind};
pub use reference::ElementReference;
