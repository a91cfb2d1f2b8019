//! Tracking module rendering.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use taxa_core::{EvaluationField, Event, Group, Property, PropertyType, Taxonomy};

use crate::error::{CodegenError, CodegenResult};
use crate::naming::KeyNormalizer;

/// Language of the generated module, chosen by the output extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    TypeScript,
    JavaScript,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> CodegenResult<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match ext.as_deref() {
            Some("ts") | Some("tsx") => Ok(OutputFormat::TypeScript),
            Some("js") => Ok(OutputFormat::JavaScript),
            _ => Err(CodegenError::UnsupportedOutput(path.to_path_buf())),
        }
    }
}

/// Renders a resolved taxonomy into a tracking module.
pub struct ModuleRenderer {
    normalizer: KeyNormalizer,
    include_comments: bool,
}

impl ModuleRenderer {
    pub fn new(include_comments: bool) -> CodegenResult<Self> {
        Ok(Self {
            normalizer: KeyNormalizer::new()?,
            include_comments,
        })
    }

    /// Render and write the module for `taxonomy` to `output`.
    pub fn generate(&self, taxonomy: &Taxonomy, output: &Path) -> CodegenResult<PathBuf> {
        let format = OutputFormat::from_path(output)?;
        let contents = self.render(taxonomy, format)?;

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                debug!("Creating output directory {:?}", parent);
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(output, contents)?;
        info!("Generated {:?} module at {:?}", format, output);

        Ok(output.to_path_buf())
    }

    /// Render the module source. Fails when two event keys normalize to the
    /// same identifier.
    pub fn render(&self, taxonomy: &Taxonomy, format: OutputFormat) -> CodegenResult<String> {
        let identifiers = self.identifiers(&taxonomy.events)?;
        let configs = self.event_configs(&taxonomy.events, &identifiers);
        let tracking = self.tracking_config(taxonomy, &identifiers);

        Ok(match format {
            OutputFormat::TypeScript => format!(
                "// 🔹 Event Types & Configurations\n\n{}\n\n// 🔹 Generated Types\n{}\n\n{}\n",
                configs,
                type_definitions(taxonomy),
                tracking
            ),
            OutputFormat::JavaScript => format!(
                "// 🔹 Event Configurations\n{}\n\n{}\n",
                configs, tracking
            ),
        })
    }

    /// One `<name>Event` identifier per event, in event order.
    fn identifiers(&self, events: &[(String, Event)]) -> CodegenResult<Vec<String>> {
        let mut seen: HashMap<String, &str> = HashMap::new();
        let mut identifiers = Vec::with_capacity(events.len());
        for (key, _) in events {
            let identifier = format!("{}Event", self.normalizer.normalize(key));
            if let Some(first) = seen.insert(identifier.clone(), key) {
                return Err(CodegenError::IdentifierCollision {
                    first: first.to_string(),
                    second: key.clone(),
                    identifier,
                });
            }
            identifiers.push(identifier);
        }
        Ok(identifiers)
    }

    fn event_configs(&self, events: &[(String, Event)], identifiers: &[String]) -> String {
        events
            .iter()
            .zip(identifiers)
            .map(|((_, event), identifier)| {
                let comment = match (&event.description, self.include_comments) {
                    (Some(description), true) => format!("/** {} */\n", doc_text(description)),
                    _ => String::new(),
                };
                format!(
                    "{}export const {} = {{\n  name: {},\n  properties: [{}]\n}};",
                    comment,
                    identifier,
                    quote(&event.name),
                    property_configs(&event.properties, "    ", "  ")
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn tracking_config(&self, taxonomy: &Taxonomy, identifiers: &[String]) -> String {
        let events = taxonomy
            .events
            .iter()
            .zip(identifiers)
            .map(|((key, _), identifier)| format!("    {}: {}", quote(key), identifier))
            .collect::<Vec<_>>()
            .join(",\n");

        let groups = taxonomy
            .groups
            .iter()
            .map(group_config)
            .collect::<Vec<_>>()
            .join(",\n");

        format!(
            "export const trackingConfig = {{\n  events: {{\n{}\n  }},\n  groups: {{\n{}\n  }}\n}};",
            events, groups
        )
    }
}

fn group_config(group: &Group) -> String {
    let identified_by = group
        .identified_by
        .as_deref()
        .map(|id| format!(",\n      identifiedBy: {}", quote(id)))
        .unwrap_or_default();
    format!(
        "    {}: {{\n      name: {},\n      properties: [{}]{}\n    }}",
        quote(&group.name),
        quote(&group.name),
        property_configs(&group.properties, "        ", "      "),
        identified_by
    )
}

/// Property objects for a config literal, one per line at `indent`.
fn property_configs(properties: &[Property], indent: &str, closing: &str) -> String {
    if properties.is_empty() {
        return String::new();
    }
    let items = properties
        .iter()
        .map(|property| {
            let mut fields = vec![
                format!("name: {}", quote(property.name.as_deref().unwrap_or_default())),
                format!("type: {}", type_literal(property.kind.as_ref())),
            ];
            if property.is_optional() {
                fields.push("optional: true".to_string());
            }
            format!("{}{{ {} }}", indent, fields.join(", "))
        })
        .collect::<Vec<_>>()
        .join(",\n");
    format!("\n{}\n{}", items, closing)
}

fn type_definitions(taxonomy: &Taxonomy) -> String {
    let event_types = taxonomy
        .events
        .iter()
        .map(|(key, event)| {
            format!(
                "    {}: {{\n      name: {};\n      properties: {{ {} }};\n    }};",
                quote(key),
                quote(&event.name),
                property_types(&event.properties)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let group_types = taxonomy
        .groups
        .iter()
        .map(|group| {
            let identified_by = group
                .identified_by
                .as_deref()
                .map(|id| format!("\n      identifiedBy: {};", quote(id)))
                .unwrap_or_default();
            format!(
                "    {}: {{\n      name: {};\n      properties: {{ {} }};{}\n    }};",
                quote(&group.name),
                quote(&group.name),
                property_types(&group.properties),
                identified_by
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let operators = EvaluationField::ALL
        .iter()
        .map(|field| format!("          {}?: {};", field.as_str(), operator_type(*field)))
        .collect::<Vec<_>>()
        .join("\n");

    let event_keys = union(taxonomy.events.iter().map(|(key, _)| key.as_str()));
    let group_names = union(taxonomy.groups.iter().map(|group| group.name.as_str()));

    format!(
        r#"export interface TrackerEventBase {{
  name: string;
  properties?: Array<{{
    name: string;
    type: string | string[];
    optional?: boolean;
  }}>;
  passthrough?: boolean;
}}

export interface TrackerEvents {{
  events: {{
{event_types}
  }};
  groups: {{
{group_types}
  }};
  globals: {{
    dimensions: {{
      [K: string]: {{
        name: string;
        description: string;
        identifiers: Array<{{
          property: string;
{operators}
        }}>;
      }};
    }};
  }};
}}

export type TrackerEvent<T extends TrackerEvents> = {event_keys};
export type TrackerGroup<T extends TrackerEvents> = {group_names};

export type EventProperties<T extends TrackerEvents, E extends TrackerEvent<T>> = T['events'][E]['properties'];
export type GroupProperties<T extends TrackerEvents, G extends TrackerGroup<T>> = T['groups'][G]['properties'];

export interface AnalyticsTracker<T extends TrackerEvents> {{
  track: <E extends TrackerEvent<T>>(eventKey: E, eventProperties: EventProperties<T, E>) => void;
  setProperties: <G extends TrackerGroup<T>>(groupName: G, properties: T['groups'][G]['properties']) => void;
  getProperties: () => {{ [K in TrackerGroup<T>]: T['groups'][K]['properties'] }};
}}

export interface TrackerOptions<T extends TrackerEvents> {{
  onEventTracked: <E extends TrackerEvent<T>>(
    eventName: T['events'][E]['name'],
    eventProperties: T['events'][E]['properties'],
    groupProperties: Record<TrackerGroup<T>, GroupProperties<T, TrackerGroup<T>>>,
  ) => void;
  onGroupUpdated: <G extends TrackerGroup<T>>(
    groupName: T['groups'][G]['name'],
    properties: T['groups'][G]['properties'],
  ) => void;
  onError?: (error: Error) => void;
}}"#
    )
}

fn operator_type(field: EvaluationField) -> &'static str {
    match field {
        EvaluationField::Contains | EvaluationField::In | EvaluationField::NotIn => {
            "(string | number | boolean)[]"
        }
        EvaluationField::Equals | EvaluationField::Not => "string | number | boolean",
        EvaluationField::StartsWith | EvaluationField::EndsWith => "string",
        EvaluationField::Lt | EvaluationField::Lte | EvaluationField::Gt | EvaluationField::Gte => {
            "number"
        }
    }
}

/// `'name': type | (() => type)` entries for an interface body.
fn property_types(properties: &[Property]) -> String {
    properties
        .iter()
        .map(|property| {
            let ty = type_annotation(property.kind.as_ref());
            let marker = if property.is_optional() { "?" } else { "" };
            format!(
                "{}{}: {} | (() => {})",
                quote(property.name.as_deref().unwrap_or_default()),
                marker,
                ty,
                ty
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn type_literal(kind: Option<&PropertyType>) -> String {
    match kind {
        Some(PropertyType::Primitive(name)) => quote(name),
        Some(PropertyType::Literals(values)) => Value::Array(values.clone()).to_string(),
        None => quote("unknown"),
    }
}

fn type_annotation(kind: Option<&PropertyType>) -> String {
    match kind {
        Some(PropertyType::Primitive(name)) => name.clone(),
        Some(PropertyType::Literals(values)) if !values.is_empty() => values
            .iter()
            .map(|value| match value {
                Value::String(s) => quote(s),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" | "),
        _ => "never".to_string(),
    }
}

fn union<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let members: Vec<String> = names.map(quote).collect();
    if members.is_empty() {
        "never".to_string()
    } else {
        members.join(" | ")
    }
}

/// Text safe to place inside a `/** */` block comment.
fn doc_text(value: &str) -> String {
    value.replace("*/", "*\\/")
}

/// Single-quoted JS string literal.
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}
