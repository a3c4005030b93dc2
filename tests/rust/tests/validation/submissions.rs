//! End-to-end submission validation

use mcpdir_core::{
    format_validation_errors, validate_listing, AuthKind, Capabilities, Transport,
    LISTING_SCHEMA_VERSION,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tests::fixtures;

fn errors_for(raw: &Value) -> Vec<String> {
    format_validation_errors(&validate_listing(raw).expect_err("payload should be rejected"))
}

#[test]
fn test_fixture_submission_is_valid() {
    let validated = validate_listing(&fixtures::valid_submission("github")).unwrap();

    let serialized = serde_json::to_value(&validated).unwrap();
    assert_eq!(serialized["schema_version"], LISTING_SCHEMA_VERSION);

    let listing = validated.into_inner();
    assert_eq!(listing.transport, Transport::Stdio);
    assert_eq!(listing.auth, AuthKind::Oauth);
    assert_eq!(listing.tags, vec!["git", "code"]);
    assert_eq!(
        listing.capabilities,
        Capabilities {
            tools: true,
            resources: true,
            prompts: false
        }
    );
    assert!(listing.docs_url.is_none());
}

#[test]
fn test_slug_formats() {
    let mut raw = fixtures::valid_submission("my-slug-2");
    assert!(validate_listing(&raw).is_ok());

    raw["slug"] = json!("My_Slug");
    assert_eq!(
        errors_for(&raw),
        vec!["slug: Slug must contain only lowercase letters, numbers, and single hyphens"]
    );

    for bad in ["-leading", "trailing-", "double--hyphen", "has space"] {
        raw["slug"] = json!(bad);
        assert!(validate_listing(&raw).is_err(), "{:?} should be rejected", bad);
    }
}

#[test]
fn test_missing_capabilities_default_to_false() {
    let mut raw = fixtures::valid_submission("github");
    raw.as_object_mut().unwrap().remove("capabilities");

    let listing = validate_listing(&raw).unwrap().into_inner();
    assert_eq!(listing.capabilities, Capabilities::default());
    assert!(!listing.capabilities.tools);
    assert!(!listing.capabilities.resources);
    assert!(!listing.capabilities.prompts);
}

#[test]
fn test_fifteen_tags_keep_first_ten_in_order() {
    let tags: Vec<String> = (1..=15).map(|i| format!("tag{}", i)).collect();
    let mut raw = fixtures::valid_submission("github");
    raw["tags"] = json!(tags);

    let listing = validate_listing(&raw).unwrap().into_inner();
    assert_eq!(listing.tags, tags[..10].to_vec());
}

#[test]
fn test_all_errors_are_reported_together() {
    let raw = json!({
        "slug": "Bad Slug",
        "name": "",
        "transport": "carrier-pigeon",
        "auth": 7,
        "homepage_url": "github.com",
        "tags": ["ok", 3],
        "capabilities": { "tools": "yes" }
    });

    assert_eq!(
        errors_for(&raw),
        vec![
            "slug: Slug must contain only lowercase letters, numbers, and single hyphens",
            "name: String must contain at least 1 character(s)",
            "description: Required",
            "transport: Invalid enum value. Expected 'stdio' | 'http' | 'both', received 'carrier-pigeon'",
            "auth: Expected 'none' | 'oauth' | 'api_key' | 'other', received number",
            "homepage_url: Invalid URL",
            "tags.1: Expected string, received number",
            "capabilities.tools: Expected boolean, received string",
        ]
    );
}

#[test]
fn test_non_object_body() {
    assert_eq!(errors_for(&json!([1, 2])), vec!["Expected object, received array"]);
}
