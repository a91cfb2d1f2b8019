//! Dimension → events index used by `taxa dimensions` and the docs view.
//!
//! The builder is fed one generation config at a time. It is lenient: an
//! event naming a dimension the index does not know is skipped for that
//! dimension and surfaced as an [`UnknownDimension`] warning. Reference
//! validation treats the same condition as fatal; both behaviours are kept.
//!
//! Initialization quirk: the set of indexed dimensions comes from the first
//! config fed in, and is replaced by a later config's set only while it is
//! still empty. Configs after that reuse the established set.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::models::{Dimension, Event, Identifier, Taxonomy};

/// An event's reference to a dimension the index does not know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDimension {
    pub event: String,
    pub dimension: String,
}

impl fmt::Display for UnknownDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Dimension \"{}\" in event \"{}\" is not listed in any dimensions file.",
            self.dimension, self.event
        )
    }
}

/// Key, name and description of an event contributing to a dimension.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EventDetail {
    pub key: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Labels and details of the events under one dimension, in parallel order.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DimensionEntry {
    pub events: Vec<String>,
    pub event_details: Vec<EventDetail>,
}

/// Accumulates dimension entries across generation configs.
#[derive(Debug, Default)]
pub struct DimensionIndexBuilder {
    definitions: Vec<Dimension>,
    entries: HashMap<String, DimensionEntry>,
    counts: HashMap<String, HashMap<String, usize>>,
    seeded: bool,
    warnings: Vec<UnknownDimension>,
}

impl DimensionIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one resolved taxonomy; returns the warnings it produced.
    pub fn add_taxonomy(&mut self, taxonomy: &Taxonomy) -> Vec<UnknownDimension> {
        self.add(&taxonomy.dimensions, &taxonomy.events)
    }

    /// Feed one config's dimensions and events.
    pub fn add(
        &mut self,
        dimensions: &[Dimension],
        events: &[(String, Event)],
    ) -> Vec<UnknownDimension> {
        if !self.seeded || self.entries.is_empty() {
            self.seed(dimensions);
        }

        let mut warnings = Vec::new();
        for (key, event) in events {
            for dimension in &event.dimensions {
                if let Some(warning) = self.record(key, event, dimension) {
                    warnings.push(warning);
                }
            }
        }

        self.warnings.extend(warnings.iter().cloned());
        warnings
    }

    fn seed(&mut self, dimensions: &[Dimension]) {
        self.definitions = dimensions.to_vec();
        self.entries = dimensions
            .iter()
            .map(|d| (d.name.clone(), DimensionEntry::default()))
            .collect();
        self.counts = dimensions
            .iter()
            .map(|d| (d.name.clone(), HashMap::new()))
            .collect();
        self.seeded = true;
    }

    fn record(&mut self, key: &str, event: &Event, dimension: &str) -> Option<UnknownDimension> {
        let Some(entry) = self.entries.get_mut(dimension) else {
            return Some(UnknownDimension {
                event: key.to_string(),
                dimension: dimension.to_string(),
            });
        };

        let count = self
            .counts
            .entry(dimension.to_string())
            .or_default()
            .entry(key.to_string())
            .or_insert(0);
        *count += 1;

        let label = if *count > 1 {
            format!("{} ({})", key, count)
        } else {
            key.to_string()
        };

        entry.events.push(label);
        entry.event_details.push(EventDetail {
            key: key.to_string(),
            name: event.name.clone(),
            description: event.description.clone(),
        });
        None
    }

    /// Every warning produced so far.
    pub fn warnings(&self) -> &[UnknownDimension] {
        &self.warnings
    }

    pub fn finish(mut self) -> DimensionIndex {
        let entries = self
            .definitions
            .iter()
            .map(|d| {
                let entry = self.entries.remove(&d.name).unwrap_or_default();
                (d.clone(), entry)
            })
            .collect();
        DimensionIndex { entries }
    }
}

/// Finished index, ordered by dimension declaration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DimensionIndex {
    entries: Vec<(Dimension, DimensionEntry)>,
}

impl DimensionIndex {
    /// Build an index from taxonomies in config order.
    pub fn build<'a>(
        taxonomies: impl IntoIterator<Item = &'a Taxonomy>,
    ) -> (Self, Vec<UnknownDimension>) {
        let mut builder = DimensionIndexBuilder::new();
        for taxonomy in taxonomies {
            builder.add_taxonomy(taxonomy);
        }
        let warnings = builder.warnings().to_vec();
        (builder.finish(), warnings)
    }

    pub fn get(&self, dimension: &str) -> Option<&DimensionEntry> {
        self.entries
            .iter()
            .find(|(d, _)| d.name == dimension)
            .map(|(_, entry)| entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Presentation rows: each entry merged with its dimension's definition.
    pub fn listing(&self, include_event_details: bool) -> Vec<DimensionListing> {
        self.entries
            .iter()
            .map(|(dimension, entry)| DimensionListing {
                dimension: dimension.name.clone(),
                description: dimension.description.clone(),
                identifiers: dimension.identifiers.clone(),
                events: entry.events.clone(),
                event_details: include_event_details.then(|| entry.event_details.clone()),
            })
            .collect()
    }
}

/// One row of `taxa dimensions` output.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DimensionListing {
    pub dimension: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub identifiers: Vec<Identifier>,
    pub events: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_details: Option<Vec<EventDetail>>,
}
