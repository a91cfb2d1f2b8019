//! Init command - Write a starter config and taxonomy.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::{debug, info};

use taxa_core::Reporter;

use super::Workspace;

/// Starter taxonomy files, relative to the root.
const TAXONOMY_FILES: [(&str, &str); 3] = [
    ("analytics/events.json", include_str!("../../defaults/events.json")),
    ("analytics/groups.json", include_str!("../../defaults/groups.json")),
    ("analytics/dimensions.json", include_str!("../../defaults/dimensions.json")),
];

const DEFAULT_CONFIG: &str = include_str!("../../defaults/analytics.config.json");

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing config and starter files
    #[arg(long)]
    pub reset: bool,
}

pub fn execute(workspace: &Workspace, args: InitArgs) -> Result<()> {
    info!("Initializing taxonomy at {:?}", workspace.root);

    let config_path = workspace.root.join(&workspace.config);
    if config_path.exists() && !args.reset {
        bail!(
            "{} already exists at {:?}. Use --reset to overwrite it.",
            workspace.config,
            workspace.root
        );
    }

    write_file(&config_path, DEFAULT_CONFIG)?;
    for (relative, contents) in TAXONOMY_FILES {
        write_file(&workspace.root.join(relative), contents)?;
    }

    let reporter = workspace.reporter();
    reporter.info("✅ Taxonomy initialized successfully!");
    reporter.info("");
    reporter.info("Created:");
    reporter.info(&format!("  📄 {}", workspace.config));
    for (relative, _) in TAXONOMY_FILES {
        reporter.info(&format!("  📄 {}", relative));
    }
    reporter.info("");
    reporter.info("Next steps:");
    reporter.info("  taxa validate");
    reporter.info("  taxa generate");

    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))?;
    debug!("Wrote {:?}", path);
    Ok(())
}
