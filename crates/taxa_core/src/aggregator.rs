//! Validation across every `generates` entry of the config.
//!
//! Config-level checks are collected for all entries before anything is
//! loaded. After that the entries are resolved in declaration order and the
//! first invalid one ends the run: later entries are never loaded.

use tracing::{debug, info};

use crate::checks::check_generation_config;
use crate::diagnostics::{Diagnostics, Loaded};
use crate::error::TaxaResult;
use crate::loader::DocumentSource;
use crate::models::{AnalyticsConfig, GenerationConfig, Taxonomy};
use crate::report::Reporter;
use crate::resolver::{ReferenceResolver, Resolution};

/// Outcome of a full run.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Every entry resolved; taxonomies are in config order.
    Passed(Vec<Taxonomy>),
    /// `entry` is `None` when the config itself was rejected.
    Failed { entry: Option<usize> },
}

impl Verdict {
    pub fn passed(&self) -> bool {
        matches!(self, Verdict::Passed(_))
    }
}

/// Runs the loader and resolver over a whole config.
pub struct ValidationAggregator<'a> {
    source: &'a dyn DocumentSource,
    reporter: &'a dyn Reporter,
}

impl<'a> ValidationAggregator<'a> {
    pub fn new(source: &'a dyn DocumentSource, reporter: &'a dyn Reporter) -> Self {
        Self { source, reporter }
    }

    /// `true` when every entry is valid. Details go to the reporter.
    pub fn validate(&self, config: &AnalyticsConfig) -> TaxaResult<bool> {
        Ok(self.run(config)?.passed())
    }

    /// Validate and hand back the resolved taxonomies.
    pub fn run(&self, config: &AnalyticsConfig) -> TaxaResult<Verdict> {
        let mut config_findings = Diagnostics::new();
        for (index, entry) in config.generates.iter().enumerate() {
            config_findings.extend(check_generation_config(index, entry));
        }
        if !config_findings.is_clean() {
            self.reporter.report(&config_findings.messages());
            return Ok(Verdict::Failed { entry: None });
        }
        self.reporter.info("✅ All generation configs are valid");

        let mut taxonomies = Vec::with_capacity(config.generates.len());
        for (index, entry) in config.generates.iter().enumerate() {
            self.reporter
                .info(&format!("🔍 Validating generation config #{}", index + 1));

            let resolution = self.resolve_entry(entry)?;
            if !resolution.is_valid() {
                info!(
                    "Generation config #{} failed with {} error(s)",
                    index + 1,
                    resolution.findings().len()
                );
                self.reporter.report(&resolution.errors());
                return Ok(Verdict::Failed { entry: Some(index) });
            }
            taxonomies.push(resolution.data);
        }

        Ok(Verdict::Passed(taxonomies))
    }

    /// Load and resolve one entry: groups, then dimensions, then events.
    ///
    /// The events file is only loaded when the declarations are clean.
    pub fn resolve_entry(&self, entry: &GenerationConfig) -> TaxaResult<Resolution> {
        let globals = entry
            .globals
            .as_deref()
            .map(|path| self.source.load_globals(path))
            .transpose()?;
        let groups = entry
            .groups
            .iter()
            .map(|path| self.source.load_groups(path))
            .collect::<TaxaResult<Vec<_>>>()?;
        let dimensions = entry
            .dimensions
            .iter()
            .map(|path| self.source.load_dimensions(path))
            .collect::<TaxaResult<Vec<_>>>()?;

        let declarations = ReferenceResolver::resolve_declarations(globals, groups, dimensions);
        if !declarations.is_valid() {
            debug!("Declarations failed; skipping events");
            return Ok(declarations.into());
        }

        let events = match entry.events.as_deref() {
            Some(path) => self.source.load_events(path)?,
            None => Loaded::invalid(
                "events",
                vec!["missing required \"events\" field".to_string()],
            ),
        };
        Ok(ReferenceResolver::validate_events(declarations, events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemorySource;
    use crate::report::CollectingReporter;
    use serde_json::json;

    fn source() -> MemorySource {
        MemorySource::new()
            .unwrap()
            .with_document(
                "dims.json",
                json!({"dimensions": [{"name": "page", "description": "d",
                    "identifiers": [{"property": "url", "startsWith": "/"}]}]}),
            )
            .with_document(
                "events.json",
                json!({"events": {"view": {"name": "View", "dimensions": ["page"]}}}),
            )
    }

    #[test]
    fn test_config_checks_report_every_entry() {
        let source = source();
        let reporter = CollectingReporter::new();
        let config = AnalyticsConfig {
            generates: vec![
                GenerationConfig::new("events.yaml", "out.ts"),
                GenerationConfig::new("events.json", "out.rb"),
            ],
        };

        let verdict = ValidationAggregator::new(&source, &reporter)
            .run(&config)
            .unwrap();

        assert_eq!(verdict, Verdict::Failed { entry: None });
        assert_eq!(reporter.errors().len(), 2);
        assert!(source.loaded_paths().is_empty());
    }

    #[test]
    fn test_events_not_loaded_when_declarations_fail() {
        let source = source()
            .with_document(
                "dims2.json",
                json!({"dimensions": [{"name": "page", "identifiers": [{"property": "url", "in": []}]}]}),
            )
            .with_poisoned("events.json");
        let reporter = CollectingReporter::new();
        let config = AnalyticsConfig {
            generates: vec![GenerationConfig::new("events.json", "out.ts")
                .with_dimensions(["dims.json", "dims2.json"])],
        };

        let valid = ValidationAggregator::new(&source, &reporter)
            .validate(&config)
            .unwrap();

        assert!(!valid);
        assert_eq!(
            reporter.errors(),
            vec!["Found duplicate dimension names across dimension files: page".to_string()]
        );
    }

    #[test]
    fn test_passing_run_returns_taxonomies() {
        let source = source();
        let reporter = CollectingReporter::new();
        let config = AnalyticsConfig {
            generates: vec![
                GenerationConfig::new("events.json", "out.ts").with_dimensions(["dims.json"])
            ],
        };

        let verdict = ValidationAggregator::new(&source, &reporter)
            .run(&config)
            .unwrap();

        match verdict {
            Verdict::Passed(taxonomies) => {
                assert_eq!(taxonomies.len(), 1);
                assert_eq!(taxonomies[0].events[0].0, "view");
            }
            other => panic!("unexpected verdict {:?}", other),
        }
        assert!(reporter.errors().is_empty());
    }
}
