//! Validate command - Check the whole taxonomy.

use anyhow::Result;
use clap::Args;
use tracing::info;

use taxa_core::Reporter;

use super::Workspace;

#[derive(Args)]
pub struct ValidateArgs {}

pub fn execute(workspace: &Workspace, _args: ValidateArgs) -> Result<()> {
    info!("Validating taxonomy from {}", workspace.config);

    let source = workspace.source()?;
    let reporter = workspace.reporter();

    reporter.info("🔍 Validating analytics files...");
    let (config, _) = workspace.validated(&source, &reporter)?;

    reporter.info(&format!(
        "✅ All {} generation config(s) are valid!",
        config.generates.len()
    ));

    Ok(())
}
