//! Hash command
//!
//! Usage: puregraph hash <ENTITIES> [--path <PATH>]

use clap::Args;
use puregraph_core::ExError;
use std::path::PathBuf;

use crate::config::Settings;

#[derive(Debug, Args)]
pub struct HashArgs {
    /// JSON array of serialized element entities
    pub input: PathBuf,

    /// Only print the hash of this element
    #[arg(long)]
    pub path: Option<String>,

    /// Print the path -> hash map as JSON
    #[arg(long, conflicts_with = "path")]
    pub json: bool,
}

/// Execute hash command
pub fn execute(args: HashArgs, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let graph = super::load_built_graph(&args.input, settings)?;

    if let Some(path) = args.path {
        let id = graph.get_element_by_path(&path).map_err(ExError::from)?;
        println!("{}", graph.hash_code(id).map_err(ExError::from)?);
        return Ok(());
    }

    let hashes = graph.element_hashes();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&hashes)?);
    } else {
        for (path, hash) in hashes {
            println!("{}  {}", hash, path);
        }
    }
    Ok(())
}
