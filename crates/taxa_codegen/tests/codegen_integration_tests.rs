//! Integration tests for module generation.

use std::fs;

use serde_json::json;
use tempfile::tempdir;

use taxa_codegen::{CodegenError, ModuleRenderer};
use taxa_core::{
    AnalyticsConfig, CollectingReporter, GenerationConfig, MemorySource, ValidationAggregator,
    Verdict,
};

fn resolved_taxonomy() -> taxa_core::Taxonomy {
    let source = MemorySource::new()
        .unwrap()
        .with_document(
            "groups.json",
            json!({"groups": [{"name": "team", "properties": [
                {"name": "teamId", "type": "string"},
                {"name": "tier", "type": ["basic", "enterprise"]}
            ], "identifiedBy": "teamId"}]}),
        )
        .with_document(
            "events.json",
            json!({"events": {
                "checkout_started": {"name": "Checkout Started", "description": "Cart submitted",
                    "properties": [{"name": "total", "type": "number"}]},
                "checkout_completed": {"name": "Checkout Completed"}
            }}),
        );
    let reporter = CollectingReporter::new();
    let config = AnalyticsConfig {
        generates: vec![
            GenerationConfig::new("events.json", "out.ts").with_groups(["groups.json"])
        ],
    };

    match ValidationAggregator::new(&source, &reporter).run(&config).unwrap() {
        Verdict::Passed(mut taxonomies) => taxonomies.remove(0),
        other => panic!("unexpected verdict {:?}: {:?}", other, reporter.errors()),
    }
}

#[test]
fn test_generate_typescript_module() {
    let temp = tempdir().unwrap();
    let output = temp.path().join("src/analytics/tracking.ts");

    let renderer = ModuleRenderer::new(true).unwrap();
    let written = renderer.generate(&resolved_taxonomy(), &output).unwrap();
    assert_eq!(written, output);

    let contents = fs::read_to_string(&output).unwrap();
    assert!(contents.contains("/** Cart submitted */"));
    assert!(contents.contains("export const checkoutStartedEvent = {"));
    assert!(contents.contains("export const checkoutCompletedEvent = {"));
    assert!(contents.contains("'checkout_started' | 'checkout_completed'"));
    assert!(contents.contains("'tier': 'basic' | 'enterprise'"));
    assert!(contents.contains("identifiedBy: 'teamId'"));
    assert!(contents.ends_with("};\n"));
}

#[test]
fn test_generate_javascript_module() {
    let temp = tempdir().unwrap();
    let output = temp.path().join("tracking.js");

    ModuleRenderer::new(true)
        .unwrap()
        .generate(&resolved_taxonomy(), &output)
        .unwrap();

    let contents = fs::read_to_string(&output).unwrap();
    assert!(contents.contains("export const trackingConfig = {"));
    assert!(contents.contains("'team': {"));
    assert!(!contents.contains("export interface"));
}

#[test]
fn test_unsupported_output_is_rejected() {
    let temp = tempdir().unwrap();
    let err = ModuleRenderer::new(true)
        .unwrap()
        .generate(&resolved_taxonomy(), &temp.path().join("tracking.py"))
        .unwrap_err();
    assert!(matches!(err, CodegenError::UnsupportedOutput(_)));
}

#[test]
fn test_colliding_keys_write_nothing() {
    let temp = tempdir().unwrap();
    let output = temp.path().join("tracking.ts");
    let source = MemorySource::new().unwrap().with_document(
        "events.json",
        json!({"events": {"page_view": {"name": "Page View"}, "page-view": {"name": "Page View"}}}),
    );
    let reporter = CollectingReporter::new();
    let config = AnalyticsConfig {
        generates: vec![GenerationConfig::new("events.json", "tracking.ts")],
    };
    let taxonomy = match ValidationAggregator::new(&source, &reporter).run(&config).unwrap() {
        Verdict::Passed(mut taxonomies) => taxonomies.remove(0),
        other => panic!("unexpected verdict {:?}", other),
    };

    let err = ModuleRenderer::new(true)
        .unwrap()
        .generate(&taxonomy, &output)
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Event keys \"page_view\" and \"page-view\" both generate the identifier \"pageViewEvent\""
    );
    assert!(!output.exists());
}
