//! Get command
//!
//! Usage: puregraph get <ENTITIES> --kind <KIND> --path <PATH>

use clap::Args;
use puregraph_core::{ElementKind, ExError};
use std::path::PathBuf;

use crate::config::Settings;

#[derive(Debug, Args)]
pub struct GetArgs {
    /// JSON array of serialized element entities
    pub input: PathBuf,

    /// Element kind label (class, mapping, package, ...)
    #[arg(long)]
    pub kind: ElementKind,

    /// Full element path
    #[arg(long)]
    pub path: String,
}

/// Execute get command
pub fn execute(args: GetArgs, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let graph = super::load_built_graph(&args.input, settings)?;
    let id = graph
        .get_element(&args.kind, &args.path)
        .map_err(ExError::from)?;
    let element = graph.element(id).map_err(ExError::from)?;

    println!("path: {}", graph.path_of(id));
    println!("kind: {}", element.kind());
    println!("hash: {}", graph.hash_code(id).map_err(ExError::from)?);
    if element.is_package() {
        for child in element.children() {
            println!("child: {}", graph.path_of(*child));
        }
    }
    for (field, reference) in element.body().references() {
        println!(
            "ref {}: {} -> {}",
            field,
            reference.value_for_serialization(&graph),
            graph.path_of(reference.value())
        );
    }
    Ok(())
}
