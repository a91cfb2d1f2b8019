//! # taxa_core
//!
//! Loading, validation and indexing of analytics event taxonomies.
//!
//! A taxonomy is declared across several JSON files per generation config:
//! an events file, optional globals, and any number of group and dimension
//! files. This crate reconciles them into one [`Taxonomy`] per config.
//!
//! ## Components
//!
//! - **Loader** ([`FsSource`]): reads documents and checks them against the
//!   bundled JSON Schemas
//! - **Reference resolver** ([`ReferenceResolver`]): duplicate names across
//!   split files, unknown dimension references, incomplete properties
//! - **Dimension index** ([`DimensionIndexBuilder`]): events grouped by
//!   dimension with numbered labels for repeated keys
//! - **Catalog** ([`event_listing`], [`property_listing`]): flat event and
//!   property rows tagged with the config and owner they came from
//! - **Aggregator** ([`ValidationAggregator`]): runs the above over every
//!   `generates` entry and stops at the first invalid one
//!
//! ## Example
//!
//! ```rust,no_run
//! use taxa_core::{ConsoleReporter, DocumentSource, FsSource, ValidationAggregator, CONFIG_FILE};
//!
//! let source = FsSource::new(".").unwrap();
//! let reporter = ConsoleReporter::new(false);
//!
//! let loaded = source.load_config(CONFIG_FILE).unwrap();
//! if let Some(config) = loaded.data {
//!     let valid = ValidationAggregator::new(&source, &reporter)
//!         .validate(&config)
//!         .unwrap();
//!     println!("valid: {}", valid);
//! }
//! ```

pub mod aggregator;
pub mod catalog;
pub mod checks;
pub mod diagnostics;
pub mod error;
pub mod index;
pub mod loader;
pub mod memory;
pub mod models;
pub mod report;
pub mod resolver;

pub use aggregator::{ValidationAggregator, Verdict};
pub use catalog::{event_listing, property_listing, EventListing, PropertyListing, PropertySource};
pub use diagnostics::{Diagnostics, Finding, Loaded, PropertyOwner};
pub use error::{TaxaError, TaxaResult};
pub use index::{
    DimensionEntry, DimensionIndex, DimensionIndexBuilder, DimensionListing, EventDetail,
    UnknownDimension,
};
pub use loader::{DocumentKind, DocumentSource, FsSource, Schemas, CONFIG_FILE};
pub use memory::MemorySource;
pub use models::*;
pub use report::{CollectingReporter, ConsoleReporter, Reporter};
pub use resolver::{Declarations, NameRegistry, ReferenceResolver, Resolution, ResolverInput};
