//! Dimensions command - Print the events grouped by dimension.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use taxa_core::{ConsoleReporter, DimensionIndex, Reporter};

use super::Workspace;

#[derive(Args)]
pub struct DimensionsArgs {
    /// Include each event's key, name and description in the listing
    #[arg(long)]
    pub include_event_details: bool,
}

pub fn execute(workspace: &Workspace, args: DimensionsArgs) -> Result<()> {
    info!("Building dimension index from {}", workspace.config);

    let source = workspace.source()?;
    // stdout carries only the JSON listing.
    let reporter = ConsoleReporter::new(true);

    let (_, taxonomies) = workspace.validated(&source, &reporter)?;

    let (index, warnings) = DimensionIndex::build(&taxonomies);
    for warning in &warnings {
        reporter.warn(&warning.to_string());
    }

    let listing = index.listing(args.include_event_details);
    let json = serde_json::to_string_pretty(&listing).context("Failed to serialize dimensions")?;
    println!("{}", json);

    Ok(())
}
