//! PureGraph CLI
//!
//! Builds an element graph from a JSON file of serialized entities and
//! reports build state, element lookups and structural hashes.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use puregraph_core::logging_facility::{self, Profile};

mod commands;
mod config;

#[derive(Debug, Parser)]
#[command(name = "puregraph")]
#[command(about = "PureGraph - packageable element graph tools", long_about = None)]
struct Cli {
    /// TOML file with builder options
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Logging profile (development, production, test)
    #[arg(long, global = true)]
    log_profile: Option<Profile>,

    /// Resolve unqualified names in a section through its imports only
    #[arg(long, global = true)]
    strict: bool,

    /// Build without the built-in primitive types
    #[arg(long, global = true)]
    no_core_model: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build the graph and report its state
    Build(commands::build::BuildArgs),
    /// Print structural hashes
    Hash(commands::hash::HashArgs),
    /// Look up one element by kind and path
    Get(commands::get::GetArgs),
}

fn main() {
    let cli = Cli::parse();

    let mut settings = match config::Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };
    // flags win over the file
    if let Some(profile) = cli.log_profile {
        settings.log_profile = profile;
    }
    if cli.strict {
        settings.builder.strict_section_resolution = true;
    }
    if cli.no_core_model {
        settings.builder.include_core_model = false;
    }
    logging_facility::init(settings.log_profile);

    let result = match cli.command {
        Commands::Build(args) => commands::build::execute(args, &settings),
        Commands::Hash(args) => commands::hash::execute(args, &settings),
        Commands::Get(args) => commands::get::execute(args, &settings),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
