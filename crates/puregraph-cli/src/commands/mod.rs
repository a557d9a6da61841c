//! Subcommands
//!
//! Every command reads the same entity file and builds a fresh graph.

use std::path::Path;

use puregraph_core::{ElementEntity, ExError, Graph, GraphBuilder};

use crate::config::Settings;

pub mod build;
pub mod get;
pub mod hash;

/// Read `input` and run a build with the configured options
///
/// The returned graph may hold a failed build; callers decide whether that
/// is an error.
pub fn load_graph(input: &Path, settings: &Settings) -> Result<Graph, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(input)
        .map_err(|e| format!("can't read {}: {}", input.display(), e))?;
    let entities = ElementEntity::list_from_json(&text).map_err(ExError::from)?;
    tracing::debug!(entity_count = entities.len(), input = %input.display(), "entities loaded");
    Ok(GraphBuilder::new(settings.builder.clone()).build(&entities))
}

/// Like [`load_graph`], but a failed build is an error
pub fn load_built_graph(
    input: &Path,
    settings: &Settings,
) -> Result<Graph, Box<dyn std::error::Error>> {
    let graph = load_graph(input, settings)?;
    if let Err(err) = graph.ensure_built() {
        for build_error in graph.build_state().errors() {
            eprintln!("{}", ExError::from(build_error.clone()));
        }
        return Err(ExError::from(err).into());
    }
    Ok(graph)
}
