//! Events command - Print every event of every generation config.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use taxa_core::{event_listing, ConsoleReporter, Taxonomy};

use super::Workspace;

#[derive(Args)]
pub struct EventsArgs {
    /// Include each event's properties in the listing
    #[arg(long)]
    pub include_properties: bool,
}

pub fn execute(workspace: &Workspace, args: EventsArgs) -> Result<()> {
    info!("Listing events from {}", workspace.config);

    let source = workspace.source()?;
    // stdout carries only the JSON listing.
    let reporter = ConsoleReporter::new(true);

    let (_, taxonomies) = workspace.validated(&source, &reporter)?;
    println!("{}", render(&taxonomies, &args)?);

    Ok(())
}

fn render(taxonomies: &[Taxonomy], args: &EventsArgs) -> Result<String> {
    let listing = event_listing(taxonomies, args.include_properties);
    serde_json::to_string_pretty(&listing).context("Failed to serialize events")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init::{self, InitArgs};
    use serde_json::Value;
    use taxa_core::{CollectingReporter, CONFIG_FILE};
    use tempfile::tempdir;

    #[test]
    fn test_events_listing_from_validated_taxonomy() {
        let temp = tempdir().unwrap();
        let workspace = Workspace {
            root: temp.path().to_path_buf(),
            config: CONFIG_FILE.to_string(),
            quiet: true,
        };
        init::execute(&workspace, InitArgs { reset: false }).unwrap();

        let source = workspace.source().unwrap();
        let (_, taxonomies) = workspace
            .validated(&source, &CollectingReporter::new())
            .unwrap();
        let args = EventsArgs {
            include_properties: true,
        };
        let listing: Value = serde_json::from_str(&render(&taxonomies, &args).unwrap()).unwrap();

        let rows = listing.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["key"], "page_view");
        assert_eq!(rows[0]["config"], 1);
        assert_eq!(rows[1]["dimensions"], serde_json::json!(["marketing", "onboarding"]));
        assert_eq!(rows[1]["properties"][0]["name"], "method");

        assert!(execute(&workspace, args).is_ok());
    }
}
