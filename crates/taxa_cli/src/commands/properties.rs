//! Properties command - Print every property, tagged with its owner.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use taxa_core::{property_listing, ConsoleReporter, Taxonomy};

use super::Workspace;

#[derive(Args)]
pub struct PropertiesArgs {}

pub fn execute(workspace: &Workspace, _args: PropertiesArgs) -> Result<()> {
    info!("Listing properties from {}", workspace.config);

    let source = workspace.source()?;
    // stdout carries only the JSON listing.
    let reporter = ConsoleReporter::new(true);

    let (_, taxonomies) = workspace.validated(&source, &reporter)?;
    println!("{}", render(&taxonomies)?);

    Ok(())
}

fn render(taxonomies: &[Taxonomy]) -> Result<String> {
    let listing = property_listing(taxonomies);
    serde_json::to_string_pretty(&listing).context("Failed to serialize properties")
}
