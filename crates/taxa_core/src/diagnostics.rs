//! Validation findings and the collect-all accumulator.
//!
//! Everything a well-formed run can discover about a taxonomy is a [`Finding`].
//! Findings are data: they are collected in [`Diagnostics`] and rendered into
//! human-readable messages for the reporter.

use std::fmt;

use crate::models::EvaluationField;

/// Where a property was declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyOwner {
    Event(String),
    Group(String),
    Global,
}

/// A fatal problem found while validating one generation config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    /// A config entry is missing a field or names a file with the wrong extension.
    Config { entry: usize, message: String },
    /// A document does not match its schema.
    Structural { source: String, message: String },
    DuplicateGroups(Vec<String>),
    DuplicateDimensions(Vec<String>),
    UnknownDimension { event: String, dimension: String },
    MissingPropertyField {
        owner: PropertyOwner,
        property: Option<String>,
    },
    MissingIdentifierProperty { dimension: String, position: usize },
    IdentifierArity {
        dimension: String,
        property: Option<String>,
        fields: Vec<EvaluationField>,
    },
    NoIdentifiers { dimension: String },
    UnknownIdentifyingProperty { group: String, property: String },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::Config { entry, message } => {
                write!(f, "Generation config #{}: {}", entry + 1, message)
            }
            Finding::Structural { source, message } => {
                write!(f, "Schema validation failed for {}: {}", source, message)
            }
            Finding::DuplicateGroups(names) => write!(
                f,
                "Found duplicate group names across group files: {}",
                names.join(", ")
            ),
            Finding::DuplicateDimensions(names) => write!(
                f,
                "Found duplicate dimension names across dimension files: {}",
                names.join(", ")
            ),
            Finding::UnknownDimension { event, dimension } => write!(
                f,
                "Invalid dimension \"{}\" in event \"{}\". It is not listed in any dimensions file.",
                dimension, event
            ),
            Finding::MissingPropertyField { owner, property } => {
                let name = property.as_deref().unwrap_or("[Unnamed]");
                match owner {
                    PropertyOwner::Event(event) => write!(
                        f,
                        "Property \"{}\" in event \"{}\" is missing required fields (name, type).",
                        name, event
                    ),
                    PropertyOwner::Group(group) => write!(
                        f,
                        "Property \"{}\" in group \"{}\" is missing required fields (name, type).",
                        name, group
                    ),
                    PropertyOwner::Global => write!(
                        f,
                        "Global property \"{}\" is missing required fields (name, type).",
                        name
                    ),
                }
            }
            Finding::MissingIdentifierProperty {
                dimension,
                position,
            } => write!(
                f,
                "Identifier #{} in dimension \"{}\" is missing a \"property\" field.",
                position + 1,
                dimension
            ),
            Finding::IdentifierArity {
                dimension,
                property,
                fields,
            } => {
                let property = property.as_deref().unwrap_or("[Unnamed]");
                if fields.is_empty() {
                    write!(
                        f,
                        "Identifier for property \"{}\" in dimension \"{}\" is missing an evaluation field.",
                        property, dimension
                    )
                } else {
                    let names: Vec<_> = fields.iter().map(EvaluationField::as_str).collect();
                    write!(
                        f,
                        "Identifier for property \"{}\" in dimension \"{}\" has multiple evaluation fields ({}). Only one is allowed.",
                        property,
                        dimension,
                        names.join(", ")
                    )
                }
            }
            Finding::NoIdentifiers { dimension } => {
                write!(f, "Dimension \"{}\" has no identifiers.", dimension)
            }
            Finding::UnknownIdentifyingProperty { group, property } => write!(
                f,
                "Group \"{}\" is identified by \"{}\", which is not one of its properties.",
                group, property
            ),
        }
    }
}

/// Collect-all accumulator used within a single generation config.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Diagnostics {
    findings: Vec<Finding>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn extend(&mut self, findings: impl IntoIterator<Item = Finding>) {
        self.findings.extend(findings);
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }

    /// Rendered messages, in discovery order.
    pub fn messages(&self) -> Vec<String> {
        self.findings.iter().map(ToString::to_string).collect()
    }
}

/// A document as returned by the schema loader.
///
/// `data` is present only when the document matched its schema and
/// deserialized; otherwise `errors` explains why.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub source: String,
    pub errors: Vec<String>,
    pub data: Option<T>,
}

impl<T> Loaded<T> {
    pub fn valid(source: impl Into<String>, data: T) -> Self {
        Self {
            source: source.into(),
            errors: Vec::new(),
            data: Some(data),
        }
    }

    pub fn invalid(source: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            source: source.into(),
            errors,
            data: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && self.data.is_some()
    }

    /// Structural findings for an invalid document.
    pub fn structural_findings(&self) -> Vec<Finding> {
        self.errors
            .iter()
            .map(|message| Finding::Structural {
                source: self.source.clone(),
                message: message.clone(),
            })
            .collect()
    }
}
