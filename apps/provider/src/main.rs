//! Dependency-Track declarative provider driver.

#![forbid(unsafe_code)]

mod cli;
mod data_sources;
mod document;
mod engine;
mod provider_config;
mod provider_context;
mod resources;
mod state_file;

use std::sync::Arc;

use clap::Parser;
use dtrack_core::AppError;
use dtrack_infrastructure::DependencyTrackClient;
use tracing::info;

use crate::cli::{Cli, Commands};
use crate::document::Document;
use crate::engine::Change;
use crate::provider_config::{ProviderConfig, init_tracing};
use crate::provider_context::ProviderContext;
use crate::state_file::StateFile;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = ProviderConfig::load()?;
    let client = DependencyTrackClient::connect(config.client_settings()).await?;
    let ctx = ProviderContext::new(Arc::new(client), config.page_size);

    let mut state = StateFile::load(&cli.state).await?;
    info!(
        state = %cli.state.display(),
        resources = state.resources.len(),
        "loaded state"
    );

    match cli.command {
        Commands::Plan => {
            let document = Document::load(&cli.config).await?;
            print_changes(&engine::plan(&ctx, &document, &state).await?);
            Ok(())
        }
        Commands::Apply => {
            let document = Document::load(&cli.config).await?;
            let outcome = engine::apply(&ctx, &document, &mut state).await;
            state.save(&cli.state).await?;
            print_changes(&outcome?);
            Ok(())
        }
        Commands::Destroy => {
            let outcome = engine::destroy(&ctx, &mut state).await;
            state.save(&cli.state).await?;
            print_changes(&outcome?);
            Ok(())
        }
        Commands::Refresh => {
            engine::refresh(&ctx, &mut state).await?;
            state.save(&cli.state).await
        }
        Commands::Import {
            resource_type,
            address,
            id,
        } => {
            engine::import(&ctx, &mut state, &resource_type, &address, &id).await?;
            state.save(&cli.state).await
        }
    }
}

fn print_changes(changes: &[Change]) {
    let pending = changes
        .iter()
        .filter(|change| change.action != resources::Action::NoOp)
        .inspect(|change| println!("{change}"))
        .count();

    if pending == 0 {
        println!("No changes.");
    }
}
