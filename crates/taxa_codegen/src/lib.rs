//! # taxa_codegen
//!
//! Tracking module generation for validated taxonomies.
//!
//! The output language follows the extension of the configured `output`
//! path: `.ts`/`.tsx` produce event configs, type definitions and the
//! tracking config; `.js` produces event configs and the tracking config.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use taxa_codegen::ModuleRenderer;
//! use taxa_core::Taxonomy;
//!
//! let taxonomy = Taxonomy::default();
//! let renderer = ModuleRenderer::new(true).unwrap();
//! renderer.generate(&taxonomy, Path::new("src/analytics/tracking.ts")).unwrap();
//! ```

pub mod error;
pub mod naming;
pub mod renderer;

pub use error::{CodegenError, CodegenResult};
pub use naming::KeyNormalizer;
pub use renderer::{ModuleRenderer, OutputFormat};
