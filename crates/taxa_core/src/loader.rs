//! Schema loader: reads taxonomy documents and checks them against the
//! bundled JSON Schemas.
//!
//! Schemas are compiled into the binary, so they resolve relative to the tool
//! itself; document paths resolve against the source's root directory.

use std::fs;
use std::path::{Path, PathBuf};

use jsonschema::JSONSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::diagnostics::Loaded;
use crate::error::{TaxaError, TaxaResult};
use crate::models::{
    AnalyticsConfig, DimensionsDocument, EventsDocument, GlobalsDocument, GroupsDocument,
};

/// Default name of the top-level config file.
pub const CONFIG_FILE: &str = "analytics.config.json";

const CONFIG_SCHEMA: &str = include_str!("../schemas/analytics.config.schema.json");
const EVENTS_SCHEMA: &str = include_str!("../schemas/events.schema.json");
const GLOBALS_SCHEMA: &str = include_str!("../schemas/globals.schema.json");
const GROUPS_SCHEMA: &str = include_str!("../schemas/groups.schema.json");
const DIMENSIONS_SCHEMA: &str = include_str!("../schemas/dimensions.schema.json");

/// The kinds of document a taxonomy is assembled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Config,
    Events,
    Globals,
    Groups,
    Dimensions,
}

impl DocumentKind {
    pub fn name(&self) -> &'static str {
        match self {
            DocumentKind::Config => "config",
            DocumentKind::Events => "events",
            DocumentKind::Globals => "globals",
            DocumentKind::Groups => "groups",
            DocumentKind::Dimensions => "dimensions",
        }
    }
}

/// Compiled bundled schemas.
pub struct Schemas {
    config: JSONSchema,
    events: JSONSchema,
    globals: JSONSchema,
    groups: JSONSchema,
    dimensions: JSONSchema,
}

impl Schemas {
    /// Compile every bundled schema.
    pub fn bundled() -> TaxaResult<Self> {
        Ok(Self {
            config: compile(DocumentKind::Config, CONFIG_SCHEMA)?,
            events: compile(DocumentKind::Events, EVENTS_SCHEMA)?,
            globals: compile(DocumentKind::Globals, GLOBALS_SCHEMA)?,
            groups: compile(DocumentKind::Groups, GROUPS_SCHEMA)?,
            dimensions: compile(DocumentKind::Dimensions, DIMENSIONS_SCHEMA)?,
        })
    }

    fn get(&self, kind: DocumentKind) -> &JSONSchema {
        match kind {
            DocumentKind::Config => &self.config,
            DocumentKind::Events => &self.events,
            DocumentKind::Globals => &self.globals,
            DocumentKind::Groups => &self.groups,
            DocumentKind::Dimensions => &self.dimensions,
        }
    }

    /// Validate a parsed JSON value against the schema for `kind`.
    pub fn check(&self, kind: DocumentKind, source: &str, value: Value) -> Loaded<Value> {
        let errors: Vec<String> = match self.get(kind).validate(&value) {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .map(|error| {
                    let location = error.instance_path.to_string();
                    if location.is_empty() {
                        error.to_string()
                    } else {
                        format!("{} (at {})", error, location)
                    }
                })
                .collect(),
        };

        if errors.is_empty() {
            Loaded::valid(source, value)
        } else {
            debug!("{} document {} failed schema validation", kind.name(), source);
            Loaded::invalid(source, errors)
        }
    }
}

/// Deserialize a schema-checked document into its model type.
fn decode<T: DeserializeOwned>(loaded: Loaded<Value>) -> Loaded<T> {
    let Loaded {
        source,
        errors,
        data,
    } = loaded;
    match data.map(serde_json::from_value) {
        Some(Ok(document)) if errors.is_empty() => Loaded::valid(source, document),
        Some(Err(e)) => Loaded::invalid(source, vec![e.to_string()]),
        _ => Loaded::invalid(source, errors),
    }
}

fn compile(kind: DocumentKind, raw: &str) -> TaxaResult<JSONSchema> {
    let schema: Value = serde_json::from_str(raw)?;
    JSONSchema::compile(&schema).map_err(|e| TaxaError::Schema {
        name: kind.name(),
        message: e.to_string(),
    })
}

/// Where taxonomy documents come from.
///
/// Schema mismatches are returned as invalid [`Loaded`] values; only missing
/// files, unreadable files and malformed JSON are errors.
pub trait DocumentSource {
    fn load(&self, kind: DocumentKind, path: &str) -> TaxaResult<Loaded<Value>>;

    fn load_config(&self, path: &str) -> TaxaResult<Loaded<AnalyticsConfig>> {
        self.load(DocumentKind::Config, path).map(decode)
    }

    fn load_events(&self, path: &str) -> TaxaResult<Loaded<EventsDocument>> {
        self.load(DocumentKind::Events, path).map(decode)
    }

    fn load_globals(&self, path: &str) -> TaxaResult<Loaded<GlobalsDocument>> {
        self.load(DocumentKind::Globals, path).map(decode)
    }

    fn load_groups(&self, path: &str) -> TaxaResult<Loaded<GroupsDocument>> {
        self.load(DocumentKind::Groups, path).map(decode)
    }

    fn load_dimensions(&self, path: &str) -> TaxaResult<Loaded<DimensionsDocument>> {
        self.load(DocumentKind::Dimensions, path).map(decode)
    }
}

/// Reads documents from disk relative to a root directory.
pub struct FsSource {
    root: PathBuf,
    schemas: Schemas,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> TaxaResult<Self> {
        Ok(Self {
            root: root.into(),
            schemas: Schemas::bundled()?,
        })
    }

    /// Resolve a config-relative path against the root.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DocumentSource for FsSource {
    fn load(&self, kind: DocumentKind, path: &str) -> TaxaResult<Loaded<Value>> {
        let full = self.resolve(path);
        if !full.is_file() {
            return Err(TaxaError::MissingFile(full));
        }

        debug!("Loading {} document from {:?}", kind.name(), full);
        let content = fs::read_to_string(&full)?;
        let value: Value = serde_json::from_str(&content).map_err(|source| TaxaError::Parse {
            path: full.clone(),
            source,
        })?;

        Ok(self.schemas.check(kind, path, value))
    }
}
