//! CLI command definitions.
//!
//! Every subcommand except `init` validates the whole taxonomy first and
//! stops with a non-zero exit when validation fails.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use taxa_core::{
    AnalyticsConfig, ConsoleReporter, DocumentSource, FsSource, Reporter, Taxonomy,
    ValidationAggregator, Verdict, CONFIG_FILE,
};

pub mod dimensions;
pub mod events;
pub mod generate;
pub mod init;
pub mod properties;
pub mod validate;

/// taxa - analytics taxonomy validator and generator
#[derive(Parser)]
#[command(name = "taxa")]
#[command(version, about = "taxa - analytics taxonomy validator and generator")]
#[command(long_about = r#"
taxa validates analytics event taxonomies split across events, groups and
dimensions files, and generates typed tracking modules from them.

WORKFLOWS:
  init        → Create a starter analytics.config.json and taxonomy files
  validate    → Check every generation config for consistency
  generate    → Validate, then write each configured tracking module
  dimensions  → Validate, then list events grouped by dimension as JSON
  events      → Validate, then list every event as JSON
  properties  → Validate, then list every property and its owner as JSON

EXIT CODES:
  0 - Success
  1 - Validation failure or error
  2 - Invalid arguments
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path of the config file, relative to the root
    #[arg(long, global = true, env = "TAXA_CONFIG", default_value = CONFIG_FILE)]
    pub config: String,

    /// Directory that config and taxonomy paths resolve against (defaults to the current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn workspace(&self) -> Workspace {
        Workspace {
            root: self.root.clone().unwrap_or_else(|| PathBuf::from(".")),
            config: self.config.clone(),
            quiet: self.quiet,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate the analytics config and every taxonomy it references
    Validate(validate::ValidateArgs),

    /// Generate tracking modules for every generation config
    Generate(generate::GenerateArgs),

    /// List all events grouped by dimension
    Dimensions(dimensions::DimensionsArgs),

    /// List all events of every generation config
    Events(events::EventsArgs),

    /// List all event, group and global properties
    Properties(properties::PropertiesArgs),

    /// Create a starter analytics.config.json and taxonomy files
    Init(init::InitArgs),
}

/// Where the commands run and how loudly.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
    pub config: String,
    pub quiet: bool,
}

impl Workspace {
    pub fn source(&self) -> Result<FsSource> {
        FsSource::new(&self.root).context("Failed to prepare document loader")
    }

    pub fn reporter(&self) -> ConsoleReporter {
        ConsoleReporter::new(self.quiet)
    }

    /// Read and schema-check the top-level config.
    pub fn load_config(
        &self,
        source: &FsSource,
        reporter: &dyn Reporter,
    ) -> Result<AnalyticsConfig> {
        let path = source.resolve(&self.config);
        if !path.is_file() {
            bail!("{} file is missing in project root", self.config);
        }
        debug!("Using config {:?}", path);

        let loaded = source
            .load_config(&self.config)
            .with_context(|| format!("Failed to read {}", self.config))?;
        if !loaded.is_valid() {
            reporter.report(&loaded.errors);
        }
        match loaded.data {
            Some(config) => Ok(config),
            None => bail!("Config schema validation failed for {}", self.config),
        }
    }

    /// Validate everything and return the resolved taxonomies in config order.
    pub fn validated(
        &self,
        source: &FsSource,
        reporter: &dyn Reporter,
    ) -> Result<(AnalyticsConfig, Vec<Taxonomy>)> {
        let config = self.load_config(source, reporter)?;
        let verdict = ValidationAggregator::new(source, reporter)
            .run(&config)
            .context("Validation could not complete")?;

        match verdict {
            Verdict::Passed(taxonomies) => Ok((config, taxonomies)),
            Verdict::Failed { entry: Some(index) } => {
                bail!("Validation failed for generation config #{}", index + 1)
            }
            Verdict::Failed { entry: None } => bail!("Validation failed for {}", self.config),
        }
    }
}
