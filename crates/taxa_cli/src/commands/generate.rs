//! Generate command - Write tracking modules for every generation config.

use anyhow::{Context, Result};
use clap::Args;
use tracing::{debug, info};

use taxa_codegen::ModuleRenderer;
use taxa_core::Reporter;

use super::Workspace;

#[derive(Args)]
pub struct GenerateArgs {}

pub fn execute(workspace: &Workspace, _args: GenerateArgs) -> Result<()> {
    info!("Generating tracking modules from {}", workspace.config);

    let source = workspace.source()?;
    let reporter = workspace.reporter();

    let (config, taxonomies) = workspace.validated(&source, &reporter)?;

    for (index, (entry, taxonomy)) in config.generates.iter().zip(&taxonomies).enumerate() {
        let Some(output) = entry.output.as_deref() else {
            continue;
        };
        let path = source.resolve(output);
        debug!("Rendering generation config #{} to {:?}", index + 1, path);

        let renderer = ModuleRenderer::new(!entry.disable_comments)
            .context("Failed to prepare module renderer")?;
        let written = renderer
            .generate(taxonomy, &path)
            .with_context(|| format!("Failed to generate {}", output))?;

        reporter.info(&format!("✅ Generated {}", written.display()));
    }

    Ok(())
}
