//! Data models for taxonomy documents.
//!
//! Field names follow the on-disk JSON contract (`camelCase`). Fields that the
//! semantic checks must be able to report as missing are kept optional here so
//! that a document missing them still deserializes.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level `analytics.config.json` document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsConfig {
    #[serde(default)]
    pub generates: Vec<GenerationConfig>,
}

/// One unit of work: taxonomy inputs mapped to one generated module.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub globals: Option<String>,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub dimensions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default)]
    pub disable_comments: bool,
}

impl GenerationConfig {
    pub fn new(events: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            events: Some(events.into()),
            output: Some(output.into()),
            ..Self::default()
        }
    }

    pub fn with_groups<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_dimensions<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dimensions = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_globals(mut self, file: impl Into<String>) -> Self {
        self.globals = Some(file.into());
        self
    }
}

/// Property type: a primitive name such as `string`, or a list of literals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PropertyType {
    Primitive(String),
    Literals(Vec<Value>),
}

impl PropertyType {
    fn is_declared(&self) -> bool {
        match self {
            PropertyType::Primitive(name) => !name.is_empty(),
            PropertyType::Literals(_) => true,
        }
    }
}

/// A property attached to an event, a group, or the globals document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Property {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<PropertyType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
}

impl Property {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            kind: Some(PropertyType::Primitive(kind.into())),
            ..Self::default()
        }
    }

    /// Both `name` and `type` are present and non-empty.
    pub fn is_complete(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.is_empty())
            && self.kind.as_ref().is_some_and(PropertyType::is_declared)
    }

    pub fn is_optional(&self) -> bool {
        self.optional.unwrap_or(false)
    }
}

/// An event declaration. The map key in the events file is its identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Property>,
}

/// Events document: `{"events": {<key>: Event}}`, key order preserved.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EventsDocument {
    #[serde(with = "keyed")]
    pub events: Vec<(String, Event)>,
}

impl EventsDocument {
    pub fn get(&self, key: &str) -> Option<&Event> {
        self.events.iter().find(|(k, _)| k == key).map(|(_, e)| e)
    }
}

/// A named bundle of properties shared across events.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identified_by: Option<String>,
}

/// Groups document: `{"groups": [Group]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GroupsDocument {
    #[serde(default)]
    pub groups: Vec<Group>,
}

/// The evaluation operators an [`Identifier`] may carry. Exactly one is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EvaluationField {
    Contains,
    Equals,
    Not,
    In,
    NotIn,
    StartsWith,
    EndsWith,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl EvaluationField {
    pub const ALL: [EvaluationField; 11] = [
        EvaluationField::Contains,
        EvaluationField::Equals,
        EvaluationField::Not,
        EvaluationField::In,
        EvaluationField::NotIn,
        EvaluationField::StartsWith,
        EvaluationField::EndsWith,
        EvaluationField::Lt,
        EvaluationField::Lte,
        EvaluationField::Gt,
        EvaluationField::Gte,
    ];

    /// JSON key of this operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationField::Contains => "contains",
            EvaluationField::Equals => "equals",
            EvaluationField::Not => "not",
            EvaluationField::In => "in",
            EvaluationField::NotIn => "notIn",
            EvaluationField::StartsWith => "startsWith",
            EvaluationField::EndsWith => "endsWith",
            EvaluationField::Lt => "lt",
            EvaluationField::Lte => "lte",
            EvaluationField::Gt => "gt",
            EvaluationField::Gte => "gte",
        }
    }
}

impl fmt::Display for EvaluationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single property-matching rule of a [`Dimension`].
///
/// Operators are kept as raw JSON so that presence, not value, decides
/// whether a field is set: `{"equals": null}` still counts as `equals`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Identifier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(flatten)]
    pub operators: Map<String, Value>,
}

impl Identifier {
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: Some(property.into()),
            operators: Map::new(),
        }
    }

    pub fn with(mut self, field: EvaluationField, value: impl Into<Value>) -> Self {
        self.operators.insert(field.as_str().to_string(), value.into());
        self
    }

    /// Evaluation fields present on this identifier, in canonical order.
    pub fn evaluation_fields(&self) -> Vec<EvaluationField> {
        EvaluationField::ALL
            .into_iter()
            .filter(|field| self.operators.contains_key(field.as_str()))
            .collect()
    }
}

/// A named grouping of events defined by identifier rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Dimension {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub identifiers: Vec<Identifier>,
}

/// Dimensions document: `{"dimensions": [Dimension]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DimensionsDocument {
    #[serde(default)]
    pub dimensions: Vec<Dimension>,
}

/// Globals document: dimensions, groups and properties not tied to an event.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GlobalsDocument {
    #[serde(default)]
    pub dimensions: Vec<Dimension>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub properties: Vec<Property>,
}

/// Merged view of one generation config's documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Taxonomy {
    pub events: Vec<(String, Event)>,
    pub groups: Vec<Group>,
    pub dimensions: Vec<Dimension>,
    pub properties: Vec<Property>,
}

impl Taxonomy {
    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }
}

/// (De)serializes a JSON object as an ordered list of `(key, value)` pairs.
mod keyed {
    use std::fmt;
    use std::marker::PhantomData;

    use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
    use serde::ser::{Serialize, SerializeMap, Serializer};

    pub fn serialize<S, T>(entries: &[(String, T)], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Vec<(String, T)>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        struct KeyedVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for KeyedVisitor<T> {
            type Value = Vec<(String, T)>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of keyed entries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, T>()? {
                    entries.push((key, value));
                }
                Ok(entries)
            }
        }

        deserializer.deserialize_map(KeyedVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_keep_file_order() {
        let doc: EventsDocument = serde_json::from_str(
            r#"{"events": {"zeta": {"name": "Z"}, "alpha": {"name": "A"}, "mid": {"name": "M"}}}"#,
        )
        .unwrap();
        let keys: Vec<_> = doc.events.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_identifier_counts_present_keys() {
        let identifier: Identifier =
            serde_json::from_str(r#"{"property": "url", "equals": null, "gt": 3, "label": "x"}"#)
                .unwrap();
        assert_eq!(
            identifier.evaluation_fields(),
            vec![EvaluationField::Equals, EvaluationField::Gt]
        );
    }

    #[test]
    fn test_property_completeness() {
        assert!(Property::new("url", "string").is_complete());

        let enum_type: Property =
            serde_json::from_str(r#"{"name": "plan", "type": ["free", "pro"]}"#).unwrap();
        assert!(enum_type.is_complete());

        let untyped: Property = serde_json::from_str(r#"{"name": "plan"}"#).unwrap();
        assert!(!untyped.is_complete());

        let blank: Property = serde_json::from_str(r#"{"name": "", "type": "string"}"#).unwrap();
        assert!(!blank.is_complete());
    }

    #[test]
    fn test_group_identified_by_is_camel_case() {
        let group: Group = serde_json::from_str(
            r#"{"name": "user", "properties": [], "identifiedBy": "id"}"#,
        )
        .unwrap();
        assert_eq!(group.identified_by.as_deref(), Some("id"));
    }
}
