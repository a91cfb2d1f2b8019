//! Per-document semantic checks.
//!
//! These run on documents that already passed their schema. Each check
//! returns every problem it finds rather than stopping at the first one.

use std::collections::HashSet;
use std::path::Path;

use crate::diagnostics::{Finding, PropertyOwner};
use crate::models::{
    Dimension, DimensionsDocument, Event, GenerationConfig, Group, GroupsDocument, Property,
};

/// Extensions accepted for taxonomy input files.
pub const INPUT_EXTENSIONS: &[&str] = &["json"];

/// Extensions accepted for generated modules.
pub const OUTPUT_EXTENSIONS: &[&str] = &["js", "ts", "tsx"];

/// Every property must carry a `name` and a `type`.
pub fn check_properties(owner: &PropertyOwner, properties: &[Property]) -> Vec<Finding> {
    properties
        .iter()
        .filter(|property| !property.is_complete())
        .map(|property| Finding::MissingPropertyField {
            owner: owner.clone(),
            property: property.name.clone().filter(|n| !n.is_empty()),
        })
        .collect()
}

/// Property completeness and `identifiedBy` membership for one group.
pub fn check_group(group: &Group) -> Vec<Finding> {
    let owner = PropertyOwner::Group(group.name.clone());
    let mut findings = check_properties(&owner, &group.properties);

    if let Some(identified_by) = &group.identified_by {
        let declared = group
            .properties
            .iter()
            .any(|p| p.name.as_deref() == Some(identified_by.as_str()));
        if !declared {
            findings.push(Finding::UnknownIdentifyingProperty {
                group: group.name.clone(),
                property: identified_by.clone(),
            });
        }
    }

    findings
}

pub fn check_groups_document(document: &GroupsDocument) -> Vec<Finding> {
    document.groups.iter().flat_map(check_group).collect()
}

/// Identifier rules of one dimension: each needs a `property` and exactly
/// one evaluation field.
pub fn check_dimension(dimension: &Dimension) -> Vec<Finding> {
    if dimension.identifiers.is_empty() {
        return vec![Finding::NoIdentifiers {
            dimension: dimension.name.clone(),
        }];
    }

    let mut findings = Vec::new();
    for (position, identifier) in dimension.identifiers.iter().enumerate() {
        if identifier.property.as_deref().map_or(true, str::is_empty) {
            findings.push(Finding::MissingIdentifierProperty {
                dimension: dimension.name.clone(),
                position,
            });
        }

        let fields = identifier.evaluation_fields();
        if fields.len() != 1 {
            findings.push(Finding::IdentifierArity {
                dimension: dimension.name.clone(),
                property: identifier.property.clone(),
                fields,
            });
        }
    }
    findings
}

pub fn check_dimensions_document(document: &DimensionsDocument) -> Vec<Finding> {
    document.dimensions.iter().flat_map(check_dimension).collect()
}

/// Dimension references and property completeness of one event.
///
/// An unknown dimension is reported once per event even when the event
/// lists it more than once.
pub fn check_event(key: &str, event: &Event, known_dimensions: &HashSet<String>) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut reported = HashSet::new();

    for dimension in &event.dimensions {
        if !known_dimensions.contains(dimension) && reported.insert(dimension.as_str()) {
            findings.push(Finding::UnknownDimension {
                event: key.to_string(),
                dimension: dimension.clone(),
            });
        }
    }

    findings.extend(check_properties(
        &PropertyOwner::Event(key.to_string()),
        &event.properties,
    ));
    findings
}

/// Required fields and file extensions of one `generates` entry.
pub fn check_generation_config(entry: usize, config: &GenerationConfig) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut problem = |message: String| findings.push(Finding::Config { entry, message });

    match config.events.as_deref() {
        None | Some("") => problem("missing required \"events\" field".to_string()),
        Some(events) if !has_extension(events, INPUT_EXTENSIONS) => problem(format!(
            "invalid file extension for events file \"{}\". Expected: .json",
            events
        )),
        Some(_) => {}
    }

    if let Some(globals) = config.globals.as_deref() {
        if !has_extension(globals, INPUT_EXTENSIONS) {
            problem(format!(
                "invalid file extension for globals file \"{}\". Expected: .json",
                globals
            ));
        }
    }

    match config.output.as_deref() {
        None | Some("") => problem("missing required \"output\" field".to_string()),
        Some(output) if !has_extension(output, OUTPUT_EXTENSIONS) => problem(format!(
            "invalid file extension for output file \"{}\". Expected one of: .js, .ts, .tsx",
            output
        )),
        Some(_) => {}
    }

    findings
}

/// Case-insensitive extension match.
pub fn has_extension(path: &str, allowed: &[&str]) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .is_some_and(|ext| allowed.contains(&ext.as_str()))
}
