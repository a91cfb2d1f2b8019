//! In-memory document source for testing.
//!
//! Holds documents as JSON values keyed by path, applies the same bundled
//! schemas as [`FsSource`](crate::FsSource), and records which paths were
//! loaded so tests can verify what a run touched.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use serde_json::Value;

use crate::diagnostics::Loaded;
use crate::error::{TaxaError, TaxaResult};
use crate::loader::{DocumentKind, DocumentSource, Schemas};

/// Document source backed by a map of path to JSON value.
pub struct MemorySource {
    schemas: Schemas,
    documents: HashMap<String, Value>,
    /// Paths that must never be read; loading one panics.
    poisoned: HashSet<String>,
    loaded: RefCell<Vec<String>>,
}

impl MemorySource {
    pub fn new() -> TaxaResult<Self> {
        Ok(Self {
            schemas: Schemas::bundled()?,
            documents: HashMap::new(),
            poisoned: HashSet::new(),
            loaded: RefCell::new(Vec::new()),
        })
    }

    /// Register a document under `path`.
    pub fn with_document(mut self, path: impl Into<String>, document: Value) -> Self {
        self.documents.insert(path.into(), document);
        self
    }

    /// Mark `path` as one that must not be reached.
    pub fn with_poisoned(mut self, path: impl Into<String>) -> Self {
        self.poisoned.insert(path.into());
        self
    }

    /// Paths loaded so far, in order.
    pub fn loaded_paths(&self) -> Vec<String> {
        self.loaded.borrow().clone()
    }
}

impl DocumentSource for MemorySource {
    fn load(&self, kind: DocumentKind, path: &str) -> TaxaResult<Loaded<Value>> {
        if self.poisoned.contains(path) {
            panic!("poisoned {} document {} was loaded", kind.name(), path);
        }
        self.loaded.borrow_mut().push(path.to_string());

        let value = self
            .documents
            .get(path)
            .cloned()
            .ok_or_else(|| TaxaError::MissingFile(PathBuf::from(path)))?;

        Ok(self.schemas.check(kind, path, value))
    }
}
