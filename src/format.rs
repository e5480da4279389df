use indexmap::IndexMap;

use crate::error::{PathSegment, ZodError, ZodIssue};

/// Messages split into root and per-field buckets.
///
/// - `form_errors`: messages of issues raised at the root
/// - `field_errors`: messages keyed by the first path segment
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct FlatError {
    pub form_errors: Vec<String>,
    pub field_errors: IndexMap<String, Vec<String>>,
}

/// Flatten a `ZodError` into a simple field-based structure.
///
/// # Example
/// ```
/// use zodkit::prelude::*;
/// use zodkit::format::flatten_error;
/// use serde_json::json;
///
/// let schema = zodkit::object().field("name", zodkit::string());
/// let err = schema.parse_value(&json!({"name": 1}).into()).unwrap_err();
/// let flat = flatten_error(&err);
/// assert_eq!(flat.field_errors["name"].len(), 1);
/// ```
pub fn flatten_error(error: &ZodError) -> FlatError {
    let mut flat = FlatError::default();
    for issue in &error.issues {
        match issue.path.first() {
            None => flat.form_errors.push(issue.message.clone()),
            Some(segment) => {
                let key = match segment {
                    PathSegment::Field(name) => name.clone(),
                    PathSegment::Index(idx) => idx.to_string(),
                };
                flat.field_errors
                    .entry(key)
                    .or_default()
                    .push(issue.message.clone());
            }
        }
    }
    flat
}

/// Messages nested along each issue's path.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct ErrorTree {
    pub errors: Vec<String>,
    pub properties: IndexMap<String, ErrorTree>,
    pub items: Vec<Option<ErrorTree>>,
}

impl ErrorTree {
    fn insert(&mut self, path: &[PathSegment], message: &str) {
        let Some((head, rest)) = path.split_first() else {
            self.errors.push(message.to_string());
            return;
        };
        let child = match head {
            PathSegment::Field(name) => self.properties.entry(name.clone()).or_default(),
            PathSegment::Index(idx) => {
                if self.items.len() <= *idx {
                    self.items.resize(*idx + 1, None);
                }
                self.items[*idx].get_or_insert_with(ErrorTree::default)
            }
        };
        child.insert(rest, message);
    }
}

/// Convert a `ZodError` into a tree structure that mirrors the schema.
pub fn treeify_error(error: &ZodError) -> ErrorTree {
    let mut root = ErrorTree::default();
    for issue in &error.issues {
        root.insert(&issue.path, &issue.message);
    }
    root
}

fn push_issue(lines: &mut Vec<String>, issue: &ZodIssue, indent: usize) {
    let pad = "  ".repeat(indent);
    lines.push(format!("{}✖ {}", pad, issue.message));
    if !issue.path.is_empty() {
        lines.push(format!("{}  → at {}", pad, issue.path_string()));
    }
    for branch in &issue.errors {
        for child in branch {
            push_issue(lines, child, indent + 1);
        }
    }
    for child in &issue.issues {
        push_issue(lines, child, indent + 1);
    }
}

/// Format a `ZodError` into a human-readable string.
///
/// # Example output
/// ```text
/// ✖ Too small: expected string to have >=2 characters
///   → at .name
/// ✖ Invalid email address
///   → at .email
/// ```
pub fn prettify_error(error: &ZodError) -> String {
    let mut lines = Vec::new();
    for issue in &error.issues {
        push_issue(&mut lines, issue, 0);
    }
    lines.join("\n")
}
