//! Build command
//!
//! Usage: puregraph build <ENTITIES> [--json]

use clap::Args;
use puregraph_core::{ElementKind, ExError, GraphError};
use std::path::PathBuf;

use crate::config::Settings;

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// JSON array of serialized element entities
    pub input: PathBuf,

    /// Print the build state as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute build command
pub fn execute(args: BuildArgs, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let graph = super::load_graph(&args.input, settings)?;
    let state = graph.build_state();

    if args.json {
        let errors: Vec<serde_json::Value> = state
            .errors()
            .iter()
            .map(|err| {
                let ex = ExError::from(err.clone());
                serde_json::json!({
                    "code": ex.code(),
                    "element": ex.element_path(),
                    "field": ex.field(),
                    "message": err.to_string(),
                })
            })
            .collect();
        let report = serde_json::json!({
            "phase": state.phase(),
            "succeeded": state.has_succeeded(),
            "elementCount": graph.all_elements().len(),
            "errors": errors,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if state.has_succeeded() {
        println!("✓ Build succeeded");
        let mut counts: Vec<(ElementKind, usize)> = graph
            .all_elements()
            .into_iter()
            .filter_map(|id| graph.element(id).ok().map(|e| e.kind()))
            .fold(Vec::new(), |mut acc, kind| {
                match acc.iter_mut().find(|(k, _)| *k == kind) {
                    Some((_, n)) => *n += 1,
                    None => acc.push((kind, 1)),
                }
                acc
            });
        counts.sort();
        for (kind, count) in counts {
            println!("  {:<14} {}", kind, count);
        }
    } else {
        println!("✗ Build failed ({} error(s))", state.errors().len());
        for err in state.errors() {
            println!("  {}", ExError::from(err.clone()));
        }
    }

    if state.has_succeeded() {
        Ok(())
    } else {
        Err(ExError::from(GraphError::BuildFailed {
            error_count: state.errors().len(),
        })
        .into())
    }
}
