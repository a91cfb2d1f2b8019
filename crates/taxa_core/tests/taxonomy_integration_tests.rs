//! Integration tests for taxonomy validation and indexing.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::tempdir;

use taxa_core::{
    AnalyticsConfig, CollectingReporter, DimensionIndex, DimensionIndexBuilder, DocumentSource,
    EventDetail, Finding, FsSource, GenerationConfig, MemorySource, ReferenceResolver,
    ResolverInput, ValidationAggregator, Verdict,
};

fn write(root: &Path, name: &str, content: serde_json::Value) {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, serde_json::to_string_pretty(&content).unwrap()).unwrap();
}

/// The documented end-to-end scenario: one event, one dimension.
#[test]
fn test_single_event_single_dimension_end_to_end() {
    let temp = tempdir().unwrap();
    let root = temp.path();

    write(
        root,
        "analytics/events.json",
        json!({"events": {"view": {"name": "View", "dimensions": ["page"],
            "properties": [{"name": "url", "type": "string"}]}}}),
    );
    write(
        root,
        "analytics/dimensions.json",
        json!({"dimensions": [{"name": "page", "description": "d",
            "identifiers": [{"property": "url", "startsWith": "/"}]}]}),
    );
    write(
        root,
        "analytics.config.json",
        json!({"generates": [{"events": "analytics/events.json",
            "dimensions": ["analytics/dimensions.json"], "output": "src/tracking.ts"}]}),
    );

    let source = FsSource::new(root).unwrap();
    let reporter = CollectingReporter::new();

    let config = source.load_config("analytics.config.json").unwrap();
    assert!(config.is_valid(), "config rejected: {:?}", config.errors);
    let config = config.data.unwrap();

    let verdict = ValidationAggregator::new(&source, &reporter)
        .run(&config)
        .unwrap();
    let taxonomies = match verdict {
        Verdict::Passed(taxonomies) => taxonomies,
        other => panic!("validation failed: {:?} {:?}", other, reporter.errors()),
    };

    let (index, warnings) = DimensionIndex::build(&taxonomies);
    assert!(warnings.is_empty());

    let entry = index.get("page").unwrap();
    assert_eq!(entry.events, vec!["view".to_string()]);
    assert_eq!(
        entry.event_details,
        vec![EventDetail {
            key: "view".to_string(),
            name: "View".to_string(),
            description: None,
        }]
    );

    let listing = serde_json::to_value(index.listing(true)).unwrap();
    assert_eq!(
        listing,
        json!([{
            "dimension": "page",
            "description": "d",
            "identifiers": [{"property": "url", "startsWith": "/"}],
            "events": ["view"],
            "eventDetails": [{"key": "view", "name": "View"}]
        }])
    );
}

/// The first invalid entry ends the run before the next one is loaded.
#[test]
fn test_fail_fast_across_generation_configs() {
    let source = MemorySource::new()
        .unwrap()
        .with_document(
            "first/events.json",
            json!({"events": {"view": {"name": "View", "dimensions": ["missing"]}}}),
        )
        .with_poisoned("second/events.json")
        .with_poisoned("second/groups.json");
    let reporter = CollectingReporter::new();

    let config = AnalyticsConfig {
        generates: vec![
            GenerationConfig::new("first/events.json", "first.ts"),
            GenerationConfig::new("second/events.json", "second.ts")
                .with_groups(["second/groups.json"]),
        ],
    };

    let verdict = ValidationAggregator::new(&source, &reporter)
        .run(&config)
        .unwrap();

    assert_eq!(verdict, Verdict::Failed { entry: Some(0) });
    assert_eq!(source.loaded_paths(), vec!["first/events.json".to_string()]);
    assert_eq!(
        reporter.errors(),
        vec![
            "Invalid dimension \"missing\" in event \"view\". It is not listed in any dimensions file."
                .to_string()
        ]
    );
}

/// Unknown dimensions: fatal for validation, a warning for the index.
#[test]
fn test_unknown_dimension_is_fatal_for_validation_but_tolerated_by_index() {
    let source = MemorySource::new()
        .unwrap()
        .with_document(
            "dims.json",
            json!({"dimensions": [{"name": "page", "identifiers": [{"property": "url", "endsWith": "/"}]}]}),
        )
        .with_document(
            "events.json",
            json!({"events": {"view": {"name": "View", "dimensions": ["page", "nonexistent"]}}}),
        );

    let input = ResolverInput {
        globals: None,
        groups: vec![],
        dimensions: vec![source.load_dimensions("dims.json").unwrap()],
        events: source.load_events("events.json").unwrap(),
    };
    let resolution = ReferenceResolver::resolve(input);

    assert!(!resolution.is_valid());
    assert_eq!(
        resolution.findings(),
        &[Finding::UnknownDimension {
            event: "view".to_string(),
            dimension: "nonexistent".to_string(),
        }]
    );

    let mut builder = DimensionIndexBuilder::new();
    let warnings = builder.add_taxonomy(&resolution.data);
    assert_eq!(warnings.len(), 1);
    assert_eq!(
        warnings[0].to_string(),
        "Dimension \"nonexistent\" in event \"view\" is not listed in any dimensions file."
    );
    assert_eq!(builder.finish().get("page").unwrap().events, vec!["view".to_string()]);
}

/// A group repeated in several files is named once in the duplicate error.
#[test]
fn test_duplicate_group_across_many_files() {
    let group = json!({"groups": [{"name": "user", "properties": [{"name": "id", "type": "string"}],
        "identifiedBy": "id"}]});
    let source = MemorySource::new()
        .unwrap()
        .with_document("g1.json", group.clone())
        .with_document("g2.json", group.clone())
        .with_document("g3.json", group)
        .with_document("events.json", json!({"events": {}}));
    let reporter = CollectingReporter::new();

    let config = AnalyticsConfig {
        generates: vec![GenerationConfig::new("events.json", "out.js")
            .with_groups(["g1.json", "g2.json", "g3.json"])],
    };
    let valid = ValidationAggregator::new(&source, &reporter)
        .validate(&config)
        .unwrap();

    assert!(!valid);
    assert_eq!(
        reporter.errors(),
        vec!["Found duplicate group names across group files: user".to_string()]
    );
}

/// Labels stay distinct when the same event key feeds one dimension from
/// several generation configs.
#[test]
fn test_index_labels_across_generation_configs() {
    let dimensions = json!({"dimensions": [{"name": "auth", "identifiers": [{"property": "method", "in": ["email"]}]}]});
    let signup = json!({"events": {"signup": {"name": "Signup", "description": "User signs up", "dimensions": ["auth"]}}});

    let source = MemorySource::new()
        .unwrap()
        .with_document("dims.json", dimensions)
        .with_document("web/events.json", signup.clone())
        .with_document("ios/events.json", signup.clone())
        .with_document("android/events.json", signup);
    let reporter = CollectingReporter::new();

    let config = AnalyticsConfig {
        generates: vec![
            GenerationConfig::new("web/events.json", "web.ts").with_dimensions(["dims.json"]),
            GenerationConfig::new("ios/events.json", "ios.ts").with_dimensions(["dims.json"]),
            GenerationConfig::new("android/events.json", "android.ts")
                .with_dimensions(["dims.json"]),
        ],
    };

    let taxonomies = match ValidationAggregator::new(&source, &reporter).run(&config).unwrap() {
        Verdict::Passed(taxonomies) => taxonomies,
        other => panic!("unexpected verdict {:?}", other),
    };
    let (index, warnings) = DimensionIndex::build(&taxonomies);

    assert!(warnings.is_empty());
    assert_eq!(
        index.get("auth").unwrap().events,
        vec!["signup".to_string(), "signup (2)".to_string(), "signup (3)".to_string()]
    );
}

/// A dimension declared only by a later config passes validation but is
/// unknown to the index seeded by the first config.
#[test]
fn test_index_warns_for_dimension_missing_from_seeding_config() {
    let source = MemorySource::new()
        .unwrap()
        .with_document(
            "web/dims.json",
            json!({"dimensions": [{"name": "page",
                "identifiers": [{"property": "url", "startsWith": "/"}]}]}),
        )
        .with_document(
            "web/events.json",
            json!({"events": {"view": {"name": "View", "dimensions": ["page"]}}}),
        )
        .with_document(
            "ios/dims.json",
            json!({"dimensions": [{"name": "checkout",
                "identifiers": [{"property": "step", "in": ["cart"]}]}]}),
        )
        .with_document(
            "ios/events.json",
            json!({"events": {"purchase": {"name": "Purchase", "dimensions": ["checkout"]}}}),
        );
    let reporter = CollectingReporter::new();

    let config = AnalyticsConfig {
        generates: vec![
            GenerationConfig::new("web/events.json", "web.ts").with_dimensions(["web/dims.json"]),
            GenerationConfig::new("ios/events.json", "ios.ts").with_dimensions(["ios/dims.json"]),
        ],
    };

    let taxonomies = match ValidationAggregator::new(&source, &reporter).run(&config).unwrap() {
        Verdict::Passed(taxonomies) => taxonomies,
        other => panic!("unexpected verdict {:?}", other),
    };
    assert!(reporter.errors().is_empty());

    let (index, warnings) = DimensionIndex::build(&taxonomies);

    assert_eq!(warnings.len(), 1);
    assert_eq!(
        warnings[0].to_string(),
        "Dimension \"checkout\" in event \"purchase\" is not listed in any dimensions file."
    );
    assert_eq!(index.len(), 1);
    assert!(index.get("checkout").is_none());
    assert_eq!(index.get("page").unwrap().events, vec!["view".to_string()]);
}

/// Schema errors in a dimensions file are reported and block the entry.
#[test]
fn test_structurally_invalid_dimension_file() {
    let source = MemorySource::new()
        .unwrap()
        .with_document("dims.json", json!({"dimensions": [{"description": "no name"}]}))
        .with_document("events.json", json!({"events": {}}));
    let reporter = CollectingReporter::new();

    let config = AnalyticsConfig {
        generates: vec![
            GenerationConfig::new("events.json", "out.ts").with_dimensions(["dims.json"])
        ],
    };
    let valid = ValidationAggregator::new(&source, &reporter)
        .validate(&config)
        .unwrap();

    assert!(!valid);
    let errors = reporter.errors();
    assert!(!errors.is_empty());
    assert!(errors
        .iter()
        .all(|e| e.starts_with("Schema validation failed for dims.json")));
    assert!(!source.loaded_paths().contains(&"events.json".to_string()));
}
