//! Flat event and property listings used by `taxa events` and
//! `taxa properties`.
//!
//! Both listings walk validated taxonomies in config order. Rows carry the
//! 1-based number of the generation config they came from, since the same
//! event key may appear in several configs.

use serde::Serialize;

use crate::models::{Property, PropertyType, Taxonomy};

/// One event of one generation config.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EventListing {
    pub config: usize,
    pub key: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub dimensions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<Property>>,
}

/// Where a listed property is declared.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PropertySource {
    Event,
    Group,
    Global,
}

/// One property declaration, tagged with its owner.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyListing {
    pub config: usize,
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<PropertyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub optional: bool,
    pub source: PropertySource,
    /// Event key, for event properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
}

impl PropertyListing {
    fn new(config: usize, property: &Property, source: PropertySource) -> Self {
        Self {
            config,
            name: property.name.clone().unwrap_or_default(),
            kind: property.kind.clone(),
            description: property.description.clone(),
            optional: property.is_optional(),
            source,
            event: None,
            group_name: None,
        }
    }
}

/// Every event in config order, then file order.
pub fn event_listing<'a>(
    taxonomies: impl IntoIterator<Item = &'a Taxonomy>,
    include_properties: bool,
) -> Vec<EventListing> {
    taxonomies
        .into_iter()
        .enumerate()
        .flat_map(|(index, taxonomy)| {
            taxonomy.events.iter().map(move |(key, event)| EventListing {
                config: index + 1,
                key: key.clone(),
                name: event.name.clone(),
                description: event.description.clone(),
                dimensions: event.dimensions.clone(),
                properties: include_properties.then(|| event.properties.clone()),
            })
        })
        .collect()
}

/// Every property declaration. Per config: event properties, then group
/// properties, then global properties.
pub fn property_listing<'a>(
    taxonomies: impl IntoIterator<Item = &'a Taxonomy>,
) -> Vec<PropertyListing> {
    let mut rows = Vec::new();
    for (index, taxonomy) in taxonomies.into_iter().enumerate() {
        let config = index + 1;
        for (key, event) in &taxonomy.events {
            rows.extend(event.properties.iter().map(|property| PropertyListing {
                event: Some(key.clone()),
                ..PropertyListing::new(config, property, PropertySource::Event)
            }));
        }
        for group in &taxonomy.groups {
            rows.extend(group.properties.iter().map(|property| PropertyListing {
                group_name: Some(group.name.clone()),
                ..PropertyListing::new(config, property, PropertySource::Group)
            }));
        }
        rows.extend(
            taxonomy
                .properties
                .iter()
                .map(|property| PropertyListing::new(config, property, PropertySource::Global)),
        );
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Event, Group};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn taxonomy() -> Taxonomy {
        Taxonomy {
            events: vec![(
                "page_view".to_string(),
                Event {
                    name: "Page View".to_string(),
                    description: Some("A page was shown".to_string()),
                    dimensions: vec!["marketing".to_string()],
                    properties: vec![Property::new("path", "string")],
                },
            )],
            groups: vec![Group {
                name: "user".to_string(),
                properties: vec![Property::new("userId", "string")],
                identified_by: Some("userId".to_string()),
            }],
            properties: vec![Property::new("locale", "string")],
            ..Taxonomy::default()
        }
    }

    #[test]
    fn test_event_listing_numbers_configs() {
        let first = taxonomy();
        let second = taxonomy();

        let rows = event_listing([&first, &second], false);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].config, 1);
        assert_eq!(rows[1].config, 2);
        assert_eq!(rows[1].key, "page_view");
        assert_eq!(rows[0].properties, None);
    }

    #[test]
    fn test_event_listing_json() {
        let taxonomy = taxonomy();
        let rows = event_listing([&taxonomy], true);

        assert_eq!(
            serde_json::to_value(&rows).unwrap(),
            json!([{
                "config": 1,
                "key": "page_view",
                "name": "Page View",
                "description": "A page was shown",
                "dimensions": ["marketing"],
                "properties": [{"name": "path", "type": "string"}]
            }])
        );
    }

    #[test]
    fn test_property_listing_tags_sources() {
        let taxonomy = taxonomy();
        let rows = property_listing([&taxonomy]);

        assert_eq!(
            serde_json::to_value(&rows).unwrap(),
            json!([
                {"config": 1, "name": "path", "type": "string", "optional": false,
                    "source": "event", "event": "page_view"},
                {"config": 1, "name": "userId", "type": "string", "optional": false,
                    "source": "group", "groupName": "user"},
                {"config": 1, "name": "locale", "type": "string", "optional": false,
                    "source": "global"}
            ])
        );
    }
}
