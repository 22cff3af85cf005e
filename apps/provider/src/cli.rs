use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Declarative management of a Dependency-Track server.
#[derive(Debug, Parser)]
#[command(name = "dtrack-provider", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Declarative resource document.
    #[arg(long, global = true, default_value = "dtrack.json", env = "DTRACK_CONFIG_FILE")]
    pub config: PathBuf,

    /// State file written after every run.
    #[arg(long, global = true, default_value = "dtrack.state.json", env = "DTRACK_STATE_FILE")]
    pub state: PathBuf,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the actions an apply would take.
    Plan,
    /// Converge the server to the document.
    Apply,
    /// Delete every resource recorded in state.
    Destroy,
    /// Re-read recorded resources and drop the ones that are gone.
    Refresh,
    /// Adopt an existing entity into state.
    Import {
        /// Resource type, e.g. `team`.
        #[arg(value_name = "TYPE")]
        resource_type: String,
        /// Address the resource has in the document, e.g. `team.ops`.
        address: String,
        /// Import identifier understood by the resource type.
        id: String,
    },
}
