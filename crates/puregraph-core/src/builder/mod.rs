//! Two-pass graph builder
//!
//! ## Pass 1: registration
//!
//! Every entity, in input order, is classified by its classifier path and
//! registered as a stub at its path; owning packages are created on demand.
//! Nothing is resolved yet, which is what makes forward references work.
//! The first error here (bad path, duplicate path, unknown classifier, or
//! unreadable registration content) fails the whole build.
//!
//! ## Pass 2: linking
//!
//! Every registered element, in the same order, gets its full body with all
//! reference fields resolved against the complete graph. Errors are
//! collected and the pass keeps going, so one failed build reports every
//! problem at once.

pub mod context;
pub mod core_builders;
pub mod entity;
pub mod options;
mod protocol;
pub mod registry;

use std::collections::HashMap;
use std::time::Instant;

use tracing::{debug, warn};

use crate::errors::{ExError, GraphError, Result};
use crate::graph::{BuildPhase, Graph};
use crate::model::section::SectionHandle;
use crate::model::{Element, ElementId, ElementKind};
use crate::path::{join_path, split_path};
use crate::{log_op_end, log_op_error, log_op_start};

pub use context::LinkContext;
pub use core_builders::PACKAGE_CLASSIFIER_PATH;
pub use entity::ElementEntity;
pub use options::BuilderOptions;
pub use registry::{ElementBuilder, ElementBuilderRegistry, ExtensionElementBuilder};

use protocol::ElementHeader;

/// Entity registered in pass 1 and waiting to be linked
struct Registered<'e> {
    entity: &'e ElementEntity,
    id: ElementId,
}

#[derive(Debug, Default)]
pub struct GraphBuilder {
    registry: ElementBuilderRegistry,
    options: BuilderOptions,
}

impl GraphBuilder {
    /// Builder with the core element kinds registered
    pub fn new(options: BuilderOptions) -> Self {
        Self::with_registry(ElementBuilderRegistry::with_core_builders(), options)
    }

    pub fn with_registry(registry: ElementBuilderRegistry, options: BuilderOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &ElementBuilderRegistry {
        &self.registry
    }

    /// Register extension kinds here before building
    pub fn registry_mut(&mut self) -> &mut ElementBuilderRegistry {
        &mut self.registry
    }

    pub fn options(&self) -> &BuilderOptions {
        &self.options
    }

    /// Build a fresh graph from `entities`
    ///
    /// Always returns the graph; check
    /// [`BuildState::has_succeeded`](crate::graph::BuildState::has_succeeded)
    /// before using it.
    pub fn build(&self, entities: &[ElementEntity]) -> Graph {
        let start = Instant::now();
        log_op_start!("graph_build", entity_count = entities.len());

        let mut graph = if self.options.include_core_model {
            Graph::new()
        } else {
            Graph::without_core_model()
        };

        if let Err(err) = self.run(&mut graph, entities) {
            // only lifecycle bugs end up here
            graph.build_state_mut().record(err);
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        let state = graph.build_state();
        if state.has_succeeded() {
            log_op_end!(
                "graph_build",
                duration_ms = duration_ms,
                element_count = graph.all_elements().len()
            );
        } else {
            let error_count = state.errors().len();
            log_op_error!(
                "graph_build",
                GraphError::BuildFailed { error_count },
                duration_ms = duration_ms,
                error_count = error_count
            );
        }
        graph
    }

    fn run(&self, graph: &mut Graph, entities: &[ElementEntity]) -> Result<()> {
        graph.build_state_mut().transition(BuildPhase::Pass1Running)?;
        let registered = match self.register_all(graph, entities) {
            Ok(registered) => registered,
            Err(err) => {
                let ex: ExError = err.clone().into();
                warn!(pass = 1, err.code = ex.code(), error = %err, "registration failed");
                graph.build_state_mut().record(err);
                return graph.build_state_mut().transition(BuildPhase::Failed);
            }
        };
        graph.build_state_mut().transition(BuildPhase::Pass1Complete)?;
        debug!(pass = 1, registered = registered.len(), "registration complete");

        graph.build_state_mut().transition(BuildPhase::Pass2Running)?;
        let sections = section_map(graph);
        for item in &registered {
            self.link(graph, item, &sections)?;
        }
        debug!(
            pass = 2,
            linked = registered.len(),
            error_count = graph.build_state().errors().len(),
            "linking complete"
        );

        let next = if graph.build_state().errors().is_empty() {
            BuildPhase::Succeeded
        } else {
            BuildPhase::Failed
        };
        graph.build_state_mut().transition(next)
    }

    /// Pass 1; stops at the first error
    fn register_all<'e>(
        &self,
        graph: &mut Graph,
        entities: &'e [ElementEntity],
    ) -> Result<Vec<Registered<'e>>> {
        let mut declared: HashMap<&str, usize> = HashMap::new();
        let mut registered = Vec::new();

        for (index, entity) in entities.iter().enumerate() {
            let (package_path, name) = split_path(&entity.path)?;
            check_header(entity, &package_path, &name)?;

            if let Some(first) = declared.insert(entity.path.as_str(), index) {
                return Err(GraphError::DuplicatePath {
                    path: entity.path.clone(),
                    entities: vec![first, index],
                });
            }
            let with_entity = |err: GraphError| match err {
                GraphError::DuplicatePath { path, .. } => {
                    let mut involved: Vec<usize> = declared_index(&declared, &path)
                        .filter(|first| *first != index)
                        .into_iter()
                        .collect();
                    involved.push(index);
                    GraphError::DuplicatePath {
                        path,
                        entities: involved,
                    }
                }
                other => other,
            };

            if entity.classifier_path == PACKAGE_CLASSIFIER_PATH {
                let id = graph
                    .get_or_create_package(&entity.path, true)
                    .map_err(with_entity)?;
                graph.element_mut(id)?.mark_linked();
                continue;
            }

            let builder = self.registry.get(&entity.classifier_path).ok_or_else(|| {
                GraphError::UnknownElementKind {
                    classifier_path: entity.classifier_path.clone(),
                    path: entity.path.clone(),
                }
            })?;
            let body = builder.first_pass(&entity.path, &entity.content)?;
            let package = graph
                .get_or_create_package(&package_path, true)
                .map_err(with_entity)?;
            let id = graph
                .insert_element(package, Element::stub(name, body))
                .map_err(with_entity)?;
            registered.push(Registered { entity, id });
        }
        Ok(registered)
    }

    /// Pass 2 for one element; link errors are recorded, not returned
    fn link(
        &self,
        graph: &mut Graph,
        item: &Registered<'_>,
        sections: &HashMap<String, SectionHandle>,
    ) -> Result<()> {
        let entity = item.entity;
        let Some(builder) = self.registry.get(&entity.classifier_path) else {
            return Err(GraphError::Internal {
                message: format!("builder for '{}' vanished", entity.classifier_path),
            });
        };

        let section = sections.get(&entity.path).copied();
        let mut ctx = LinkContext::new(
            graph,
            &entity.path,
            section,
            self.options.strict_section_resolution,
        );
        let outcome = builder.second_pass(&entity.content, &mut ctx);
        let mut errors = ctx.into_errors();

        match outcome {
            Ok(body) => {
                graph.update_body(item.id, |current| *current = body)?;
                graph.element_mut(item.id)?.mark_linked();
            }
            Err(err) => errors.push(err),
        }

        for err in errors {
            let ex: ExError = err.clone().into();
            warn!(
                pass = 2,
                element_path = %entity.path,
                err.code = ex.code(),
                error = %err,
                "link error"
            );
            graph.build_state_mut().record(err);
        }
        Ok(())
    }
}

fn declared_index(declared: &HashMap<&str, usize>, path: &str) -> Option<usize> {
    declared.get(path).copied()
}

/// Entity `name`/`package` keys, when present, must agree with its path
///
/// Content that is not an object, or header keys that are not strings, is
/// `InvalidContent`.
fn check_header(entity: &ElementEntity, package_path: &str, name: &str) -> Result<()> {
    let header: ElementHeader = protocol::parse(&entity.path, &entity.content)?;
    let declared = join_path(
        header.package.as_deref().unwrap_or(package_path),
        header.name.as_deref().unwrap_or(name),
    );
    if declared != entity.path {
        return Err(GraphError::InvalidPath {
            path: entity.path.clone(),
            reason: format!("content declares '{}'", declared),
        });
    }
    Ok(())
}

/// Element path -> section it is declared in; the first listing wins
fn section_map(graph: &Graph) -> HashMap<String, SectionHandle> {
    let mut map = HashMap::new();
    for index in graph.elements_of_kind(&ElementKind::SectionIndex) {
        let Ok(element) = graph.element(index) else {
            continue;
        };
        if let crate::model::ElementBody::SectionIndex(section_index) = element.body() {
            for (section, declared) in section_index.sections.iter().enumerate() {
                for path in &declared.elements {
                    map.entry(path.clone())
                        .or_insert(SectionHandle { index, section });
                }
            }
        }
    }
    map
}
