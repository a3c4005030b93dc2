//! Listing validation
//!
//! Submissions arrive as arbitrary JSON. [`validate_listing`] walks the fields
//! in schema order, collects every problem instead of stopping at the first,
//! and on success returns a normalized [`Listing`].

use serde::Serialize;
use serde_json::{Map, Value};
use std::str::FromStr;

use super::format::{is_valid_url, matches_slug_pattern, SLUG_MAX_LEN};
use super::schema::*;
use super::tags::normalize_tags;
use super::types::*;

const SLUG_PATTERN_MESSAGE: &str =
    "Slug must contain only lowercase letters, numbers, and single hyphens";

/// One failed check, located by its field path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Path segments from the root (`["capabilities", "tools"]`, `["tags", "3"]`)
    pub path: Vec<String>,
    pub message: String,
}

/// Every issue found in a submission, in schema declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("listing validation failed with {} issue(s)", .issues.len())]
pub struct ValidationErrors {
    issues: Vec<ValidationIssue>,
}

impl ValidationErrors {
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    fn push<P, S>(&mut self, path: P, message: impl Into<String>)
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.issues.push(ValidationIssue {
            path: path.into_iter().map(Into::into).collect(),
            message: message.into(),
        });
    }
}

/// Render issues as `"<dotted.path>: <reason>"`, or just `"<reason>"` at the root
pub fn format_validation_errors(errors: &ValidationErrors) -> Vec<String> {
    errors
        .issues
        .iter()
        .map(|issue| {
            if issue.path.is_empty() {
                issue.message.clone()
            } else {
                format!("{}: {}", issue.path.join("."), issue.message)
            }
        })
        .collect()
}

/// Validate and normalize a raw listing submission
pub fn validate_listing(raw: &Value) -> Result<ValidatedListing, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let Some(obj) = raw.as_object() else {
        errors.push(
            Vec::<String>::new(),
            format!("Expected object, received {}", kind_of(raw)),
        );
        return Err(errors);
    };

    let slug = slug_field(obj, &mut errors);
    let name = bounded_string(obj, "name", 1, NAME_MAX_LEN, &mut errors);
    let description = bounded_string(obj, "description", 1, DESCRIPTION_MAX_LEN, &mut errors);
    let transport = enum_field::<Transport>(obj, "transport", Transport::VALUES, &mut errors);
    let auth = enum_field::<AuthKind>(obj, "auth", AuthKind::VALUES, &mut errors);
    let homepage_url = optional_url(obj, "homepage_url", &mut errors);
    let repo_url = optional_url(obj, "repo_url", &mut errors);
    let docs_url = optional_url(obj, "docs_url", &mut errors);
    let tags = tags_field(obj, &mut errors);
    let capabilities = capabilities_field(obj, &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    match (slug, name, description, transport, auth, tags, capabilities) {
        (
            Some(slug),
            Some(name),
            Some(description),
            Some(transport),
            Some(auth),
            Some(tags),
            Some(capabilities),
        ) => Ok(ValidatedListing::new(Listing {
            slug,
            name,
            description,
            transport,
            auth,
            homepage_url: homepage_url.flatten(),
            repo_url: repo_url.flatten(),
            docs_url: docs_url.flatten(),
            tags,
            capabilities,
        })),
        _ => Err(errors),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Present-and-string, or record why not
fn string_field<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    errors: &mut ValidationErrors,
) -> Option<&'a str> {
    match obj.get(key) {
        None => {
            errors.push([key], "Required");
            None
        }
        Some(Value::String(s)) => Some(s.as_str()),
        Some(other) => {
            errors.push([key], format!("Expected string, received {}", kind_of(other)));
            None
        }
    }
}

/// Record length violations at `path`; true when within bounds
fn check_length(
    value: &str,
    min: usize,
    max: usize,
    path: &[&str],
    errors: &mut ValidationErrors,
) -> bool {
    let len = value.chars().count();
    if len < min {
        errors.push(
            path.iter().copied(),
            format!("String must contain at least {} character(s)", min),
        );
        return false;
    }
    if len > max {
        errors.push(
            path.iter().copied(),
            format!("String must contain at most {} character(s)", max),
        );
        return false;
    }
    true
}

fn bounded_string(
    obj: &Map<String, Value>,
    key: &str,
    min: usize,
    max: usize,
    errors: &mut ValidationErrors,
) -> Option<String> {
    let value = string_field(obj, key, errors)?;
    check_length(value, min, max, &[key], errors).then(|| value.to_string())
}

fn slug_field(obj: &Map<String, Value>, errors: &mut ValidationErrors) -> Option<String> {
    let value = string_field(obj, "slug", errors)?;
    let length_ok = check_length(value, 1, SLUG_MAX_LEN, &["slug"], errors);
    let pattern_ok = matches_slug_pattern(value);
    if !pattern_ok {
        errors.push(["slug"], SLUG_PATTERN_MESSAGE);
    }
    (length_ok && pattern_ok).then(|| value.to_string())
}

fn enum_field<T: FromStr>(
    obj: &Map<String, Value>,
    key: &str,
    values: &[&str],
    errors: &mut ValidationErrors,
) -> Option<T> {
    let expected = values
        .iter()
        .map(|v| format!("'{}'", v))
        .collect::<Vec<_>>()
        .join(" | ");

    match obj.get(key) {
        None => {
            errors.push([key], "Required");
            None
        }
        Some(Value::String(s)) => match s.parse::<T>() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                errors.push(
                    [key],
                    format!("Invalid enum value. Expected {}, received '{}'", expected, s),
                );
                None
            }
        },
        Some(other) => {
            errors.push([key], format!("Expected {}, received {}", expected, kind_of(other)));
            None
        }
    }
}

/// `Some(None)` for absent/empty, `Some(Some(url))` when valid, `None` on error
fn optional_url(
    obj: &Map<String, Value>,
    key: &str,
    errors: &mut ValidationErrors,
) -> Option<Option<String>> {
    match obj.get(key) {
        None | Some(Value::Null) => Some(None),
        Some(Value::String(s)) if s.is_empty() => Some(None),
        Some(Value::String(s)) => {
            if is_valid_url(s) {
                Some(Some(s.clone()))
            } else {
                errors.push([key], "Invalid URL");
                None
            }
        }
        Some(other) => {
            errors.push([key], format!("Expected string, received {}", kind_of(other)));
            None
        }
    }
}

fn tags_field(obj: &Map<String, Value>, errors: &mut ValidationErrors) -> Option<Vec<String>> {
    let items = match obj.get("tags") {
        None | Some(Value::Null) => return Some(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            errors.push(["tags"], format!("Expected array, received {}", kind_of(other)));
            return None;
        }
    };

    let mut raw = Vec::with_capacity(items.len());
    let mut ok = true;
    for (index, item) in items.iter().enumerate() {
        let index = index.to_string();
        match item {
            Value::String(s) => {
                if check_length(s, 1, TAG_MAX_LEN, &["tags", index.as_str()], errors) {
                    raw.push(s.as_str());
                } else {
                    ok = false;
                }
            }
            other => {
                errors.push(
                    ["tags", index.as_str()],
                    format!("Expected string, received {}", kind_of(other)),
                );
                ok = false;
            }
        }
    }

    ok.then(|| normalize_tags(raw))
}

fn capabilities_field(
    obj: &Map<String, Value>,
    errors: &mut ValidationErrors,
) -> Option<Capabilities> {
    let caps = match obj.get("capabilities") {
        None | Some(Value::Null) => return Some(Capabilities::default()),
        Some(Value::Object(caps)) => caps,
        Some(other) => {
            errors.push(
                ["capabilities"],
                format!("Expected object, received {}", kind_of(other)),
            );
            return None;
        }
    };

    let mut flag = |key: &str| -> Option<bool> {
        match caps.get(key) {
            None | Some(Value::Null) => Some(false),
            Some(Value::Bool(b)) => Some(*b),
            Some(other) => {
                errors.push(
                    ["capabilities", key],
                    format!("Expected boolean, received {}", kind_of(other)),
                );
                None
            }
        }
    };

    let tools = flag("tools");
    let resources = flag("resources");
    let prompts = flag("prompts");

    Some(Capabilities {
        tools: tools?,
        resources: resources?,
        prompts: prompts?,
    })
}
