//! Reference resolution across the split files of one generation config.
//!
//! Resolution runs in two stages. The declaration stage merges globals,
//! group files and dimension files, checking each document and collecting
//! duplicate names. Only when it is clean does the event stage check events
//! and global properties against the resolved dimension names.

use std::collections::HashSet;

use crate::checks::{
    check_dimensions_document, check_event, check_groups_document, check_properties,
};
use crate::diagnostics::{Diagnostics, Finding, Loaded, PropertyOwner};
use crate::models::{
    Dimension, DimensionsDocument, EventsDocument, GlobalsDocument, Group, GroupsDocument,
    Property, Taxonomy,
};

/// Records names in declaration order and remembers the ones seen twice.
///
/// The first occurrence of a name is never a duplicate; later occurrences add
/// the name to the duplicate list once.
#[derive(Debug, Default, Clone)]
pub struct NameRegistry {
    seen: HashSet<String>,
    duplicates: Vec<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name`; returns `true` on its first occurrence.
    pub fn record(&mut self, name: &str) -> bool {
        if self.seen.insert(name.to_string()) {
            return true;
        }
        if !self.duplicates.iter().any(|d| d == name) {
            self.duplicates.push(name.to_string());
        }
        false
    }

    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }

    pub fn names(&self) -> &HashSet<String> {
        &self.seen
    }
}

/// Everything the resolver needs for one generation config.
#[derive(Debug, Clone)]
pub struct ResolverInput {
    pub globals: Option<Loaded<GlobalsDocument>>,
    pub groups: Vec<Loaded<GroupsDocument>>,
    pub dimensions: Vec<Loaded<DimensionsDocument>>,
    pub events: Loaded<EventsDocument>,
}

/// Outcome of the declaration stage.
#[derive(Debug, Clone, Default)]
pub struct Declarations {
    pub groups: Vec<Group>,
    pub dimensions: Vec<Dimension>,
    pub properties: Vec<Property>,
    dimension_names: NameRegistry,
    diagnostics: Diagnostics,
}

impl Declarations {
    pub fn is_valid(&self) -> bool {
        self.diagnostics.is_clean()
    }

    pub fn findings(&self) -> &[Finding] {
        self.diagnostics.findings()
    }

    pub fn errors(&self) -> Vec<String> {
        self.diagnostics.messages()
    }

    /// Names of every dimension declared for this config.
    pub fn dimension_names(&self) -> &HashSet<String> {
        self.dimension_names.names()
    }
}

/// Final outcome for one generation config: `{is_valid, errors, data}`.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub data: Taxonomy,
    diagnostics: Diagnostics,
}

impl Resolution {
    pub fn is_valid(&self) -> bool {
        self.diagnostics.is_clean()
    }

    pub fn findings(&self) -> &[Finding] {
        self.diagnostics.findings()
    }

    pub fn errors(&self) -> Vec<String> {
        self.diagnostics.messages()
    }
}

impl From<Declarations> for Resolution {
    fn from(declarations: Declarations) -> Self {
        Self {
            data: Taxonomy {
                events: Vec::new(),
                groups: declarations.groups,
                dimensions: declarations.dimensions,
                properties: declarations.properties,
            },
            diagnostics: declarations.diagnostics,
        }
    }
}

/// Resolver for cross-file references.
pub struct ReferenceResolver;

impl ReferenceResolver {
    /// Run both stages over already loaded documents.
    pub fn resolve(input: ResolverInput) -> Resolution {
        let declarations =
            Self::resolve_declarations(input.globals, input.groups, input.dimensions);
        Self::validate_events(declarations, input.events)
    }

    /// Merge groups, then dimensions, and report duplicates (groups first).
    ///
    /// A document that fails its schema or its own checks fails the stage and
    /// is left out of the merge; the remaining documents are still processed.
    pub fn resolve_declarations(
        globals: Option<Loaded<GlobalsDocument>>,
        groups: Vec<Loaded<GroupsDocument>>,
        dimensions: Vec<Loaded<DimensionsDocument>>,
    ) -> Declarations {
        let mut declarations = Declarations::default();
        let mut group_names = NameRegistry::new();

        let globals = match globals {
            Some(loaded) if !loaded.is_valid() => {
                declarations
                    .diagnostics
                    .extend(loaded.structural_findings());
                None
            }
            other => other.and_then(|loaded| loaded.data),
        };

        let (global_groups, global_dimensions) = match globals {
            Some(document) => {
                declarations.properties = document.properties;
                (
                    GroupsDocument {
                        groups: document.groups,
                    },
                    DimensionsDocument {
                        dimensions: document.dimensions,
                    },
                )
            }
            None => (GroupsDocument::default(), DimensionsDocument::default()),
        };

        let group_sources = std::iter::once(Loaded::valid("globals", global_groups)).chain(groups);
        for loaded in group_sources {
            let accepted =
                Self::accept(loaded, check_groups_document, &mut declarations.diagnostics);
            let Some(document) = accepted else {
                continue;
            };
            for group in document.groups {
                if group_names.record(&group.name) {
                    declarations.groups.push(group);
                }
            }
        }

        let dimension_sources =
            std::iter::once(Loaded::valid("globals", global_dimensions)).chain(dimensions);
        for loaded in dimension_sources {
            let accepted =
                Self::accept(loaded, check_dimensions_document, &mut declarations.diagnostics);
            let Some(document) = accepted else {
                continue;
            };
            for dimension in document.dimensions {
                if declarations.dimension_names.record(&dimension.name) {
                    declarations.dimensions.push(dimension);
                }
            }
        }

        if !group_names.duplicates().is_empty() {
            declarations
                .diagnostics
                .push(Finding::DuplicateGroups(group_names.duplicates().to_vec()));
        }
        if !declarations.dimension_names.duplicates().is_empty() {
            declarations.diagnostics.push(Finding::DuplicateDimensions(
                declarations.dimension_names.duplicates().to_vec(),
            ));
        }

        declarations
    }

    /// Check events and global properties against resolved declarations.
    ///
    /// A failed declaration stage is carried through unchanged: events are
    /// not checked and the resolution stays invalid.
    pub fn validate_events(
        declarations: Declarations,
        events: Loaded<EventsDocument>,
    ) -> Resolution {
        if !declarations.is_valid() {
            return declarations.into();
        }

        let Resolution {
            mut data,
            mut diagnostics,
        } = declarations.into();
        let dimension_names = data
            .dimensions
            .iter()
            .map(|d| d.name.clone())
            .collect::<HashSet<_>>();

        diagnostics.extend(check_properties(&PropertyOwner::Global, &data.properties));

        if !events.is_valid() {
            diagnostics.extend(events.structural_findings());
            return Resolution { data, diagnostics };
        }

        if let Some(document) = events.data {
            for (key, event) in &document.events {
                diagnostics.extend(check_event(key, event, &dimension_names));
            }
            data.events = document.events;
        }

        Resolution { data, diagnostics }
    }

    fn accept<T>(
        loaded: Loaded<T>,
        check: fn(&T) -> Vec<Finding>,
        diagnostics: &mut Diagnostics,
    ) -> Option<T> {
        if !loaded.is_valid() {
            diagnostics.extend(loaded.structural_findings());
            return None;
        }
        let document = loaded.data?;
        let findings = check(&document);
        if findings.is_empty() {
            Some(document)
        } else {
            diagnostics.extend(findings);
            None
        }
    }
}
