use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::json;
use zodkit::error::SchemaBuildError;
use zodkit::prelude::*;

// ---------------------------------------------------------------------------
// Union
// ---------------------------------------------------------------------------

#[test]
fn union_first_matching_option_wins() {
    let schema = zodkit::union(vec![
        zodkit::string().into_dyn(),
        zodkit::int().into_dyn(),
    ]);
    assert_eq!(schema.parse(&json!("a")).unwrap(), Value::from("a"));
    assert_eq!(schema.parse(&json!(5)).unwrap(), Value::Int(5));
}

#[test]
fn union_order_matters_for_overlapping_options() {
    let trimmed = zodkit::string().trim();
    let schema = zodkit::union(vec![trimmed.into_dyn(), zodkit::string().into_dyn()]);
    assert_eq!(schema.parse(&json!("  x ")).unwrap(), Value::from("x"));
}

#[test]
fn union_failure_carries_every_branch() {
    let schema = zodkit::string().or(zodkit::int());
    let err = schema.parse(&json!(true)).unwrap_err();
    assert_eq!(err.len(), 1);
    let issue = &err.issues[0];
    assert_eq!(issue.code, IssueCode::InvalidUnion);
    assert_eq!(issue.message, "Invalid input");
    assert_eq!(issue.errors.len(), 2);
    assert_eq!(issue.errors[0][0].expected.as_deref(), Some("string"));
    assert_eq!(issue.errors[1][0].expected.as_deref(), Some("int"));
}

#[test]
fn union_with_one_live_branch_reports_it_directly() {
    let schema = zodkit::string().min(5).or(zodkit::int());
    let err = schema.parse(&json!("abc")).unwrap_err();
    assert_eq!(err.codes(), vec![IssueCode::TooSmall]);
}

#[test]
fn union_option_appends() {
    let schema = zodkit::union(vec![zodkit::literal("a").into_dyn()]).option(zodkit::literal("b"));
    assert_eq!(schema.options().len(), 2);
    assert!(schema.parse(&json!("b")).is_ok());
    assert!(schema.parse(&json!("c")).is_err());
}

#[test]
fn union_option_with_default_accepts_nil() {
    let schema = zodkit::union(vec![
        zodkit::string().into_dyn(),
        zodkit::int().with_default(7).into_dyn(),
    ]);
    assert_eq!(schema.parse(&json!(null)).unwrap(), Value::Int(7));
    assert_eq!(schema.parse(&json!("a")).unwrap(), Value::from("a"));

    let without_default = zodkit::string().or(zodkit::int());
    assert!(without_default.parse(&json!(null)).is_err());
}

#[test]
fn union_inside_object_paths() {
    let schema = zodkit::object().field("id", zodkit::string().or(zodkit::int()));
    let err = schema.parse(&json!({"id": []})).unwrap_err();
    assert_eq!(err.issues[0].path_string(), ".id");
    assert_eq!(err.issues[0].code, IssueCode::InvalidUnion);
}

// ---------------------------------------------------------------------------
// Discriminated union
// ---------------------------------------------------------------------------

fn account() -> ZDiscriminatedUnion {
    zodkit::discriminated_union(
        "type",
        vec![
            zodkit::object()
                .field("type", zodkit::literal("user"))
                .field("name", zodkit::string()),
            zodkit::object()
                .field("type", zodkit::literal("admin"))
                .field("level", zodkit::int().min(1)),
        ],
    )
}

#[test]
fn discriminated_union_selects_branch() {
    let out = account().parse(&json!({"type": "admin", "level": 3})).unwrap();
    assert_eq!(out.get("level"), Some(&Value::Int(3)));
    assert!(account().parse(&json!({"type": "user", "name": "a"})).is_ok());
}

#[test]
fn discriminated_union_reports_only_the_selected_branch() {
    let err = account().parse(&json!({"type": "admin", "level": 0})).unwrap_err();
    assert_eq!(err.len(), 1);
    assert_eq!(err.issues[0].code, IssueCode::TooSmall);
    assert_eq!(err.issues[0].path_string(), ".level");
}

#[test]
fn discriminated_union_unknown_tag() {
    let err = account().parse(&json!({"type": "guest"})).unwrap_err();
    let issue = &err.issues[0];
    assert_eq!(issue.code, IssueCode::InvalidValue);
    assert_eq!(issue.options, vec![Value::from("user"), Value::from("admin")]);
    assert_eq!(issue.path_string(), ".type");
    assert_eq!(issue.message, "Invalid option: expected one of \"user\"|\"admin\"");
}

#[test]
fn discriminated_union_missing_tag() {
    let err = account().parse(&json!({"name": "x"})).unwrap_err();
    let issue = &err.issues[0];
    assert_eq!(issue.code, IssueCode::MissingDiscriminator);
    assert_eq!(issue.message, "Missing required discriminator field: type");
    assert_eq!(issue.details.discriminator.as_deref(), Some("type"));

    let err = account().parse(&json!({"type": null})).unwrap_err();
    assert_eq!(err.issues[0].code, IssueCode::MissingDiscriminator);
}

#[test]
fn discriminated_union_ignores_defaults_on_the_tag() {
    let schema = zodkit::discriminated_union(
        "type",
        vec![
            zodkit::object()
                .field("type", zodkit::literal("user").with_default("user".into()))
                .field("name", zodkit::string()),
            zodkit::object()
                .field("type", zodkit::literal("admin"))
                .field("level", zodkit::int()),
        ],
    );
    let err = schema.parse(&json!({"name": "x"})).unwrap_err();
    assert_eq!(err.codes(), vec![IssueCode::MissingDiscriminator]);
    assert!(schema.parse(&json!({"type": "user", "name": "x"})).is_ok());
}

#[test]
fn discriminated_union_rejects_non_objects() {
    let err = account().parse(&json!("user")).unwrap_err();
    assert_eq!(err.issues[0].code, IssueCode::InvalidType);
    assert_eq!(err.issues[0].expected.as_deref(), Some("object"));
}

#[test]
fn discriminated_union_branch_with_several_values() {
    let schema = zodkit::discriminated_union(
        "kind",
        vec![
            zodkit::object().field("kind", zodkit::literals(vec!["a", "b"])),
            zodkit::object()
                .field("kind", zodkit::enumeration(&["c"]))
                .field("n", zodkit::int()),
        ],
    );
    assert!(schema.parse(&json!({"kind": "b"})).is_ok());
    assert!(schema.parse(&json!({"kind": "c"})).is_err());
    assert_eq!(schema.discriminator_map().len(), 3);
    assert_eq!(schema.discriminator(), "kind");
}

#[test]
fn discriminated_union_build_errors() {
    let duplicate = zodkit::try_discriminated_union(
        "type",
        vec![
            zodkit::object().field("type", zodkit::literal("a")),
            zodkit::object().field("type", zodkit::literal("a")),
        ],
    );
    assert!(matches!(
        duplicate,
        Err(SchemaBuildError::DuplicateDiscriminator { first: 0, second: 1, .. })
    ));

    let missing = zodkit::try_discriminated_union(
        "type",
        vec![zodkit::object().field("kind", zodkit::literal("a"))],
    );
    assert!(matches!(
        missing,
        Err(SchemaBuildError::MissingDiscriminator { branch: 0, .. })
    ));
}

#[test]
#[should_panic(expected = "invalid discriminated union")]
fn discriminated_union_panics_on_invalid_branches() {
    zodkit::discriminated_union("type", vec![zodkit::object().field("type", zodkit::string())]);
}

// ---------------------------------------------------------------------------
// Intersection
// ---------------------------------------------------------------------------

#[test]
fn intersection_merges_objects() {
    let schema = zodkit::intersection(
        zodkit::object().field("a", zodkit::int()),
        zodkit::object().field("b", zodkit::string()),
    );
    let out = schema.parse(&json!({"a": 1, "b": "x", "c": true})).unwrap();
    assert_eq!(out, Value::from(json!({"a": 1, "b": "x"})));
}

#[test]
fn intersection_collects_issues_from_both_sides() {
    let schema = zodkit::object()
        .field("a", zodkit::int())
        .and(zodkit::object().field("b", zodkit::string()));
    let err = schema.parse(&json!({})).unwrap_err();
    let paths: Vec<String> = err.issues.iter().map(|i| i.path_string()).collect();
    assert_eq!(paths, vec![".a", ".b"]);
}

#[test]
fn intersection_conflicting_outputs() {
    let schema = zodkit::object()
        .field("name", zodkit::string())
        .and(zodkit::object().field("name", zodkit::string().to_upper_case()));
    let err = schema.parse(&json!({"name": "abc"})).unwrap_err();
    let issue = &err.issues[0];
    assert_eq!(issue.code, IssueCode::IncompatibleTypes);
    assert!(issue.message.contains("conflicting values for key"));
    assert_eq!(issue.message, "Invalid input: conflicting values for key \"name\"");

    // equal outputs merge fine
    assert!(schema.parse(&json!({"name": "ABC"})).is_ok());
}

#[test]
fn intersection_conflicting_scalars() {
    let schema = zodkit::string().and(zodkit::string().trim());
    let err = schema.parse(&json!(" a ")).unwrap_err();
    assert_eq!(err.issues[0].message, "Invalid input: values cannot be merged");
    assert!(schema.parse(&json!("a")).is_ok());
}

#[test]
fn intersection_of_strict_objects_accepts_keys_known_to_either_side() {
    let schema = zodkit::strict_object()
        .field("a", zodkit::int())
        .and(zodkit::strict_object().field("b", zodkit::int()));
    assert!(schema.parse(&json!({"a": 1, "b": 2})).is_ok());

    let err = schema.parse(&json!({"a": 1, "b": 2, "c": 3})).unwrap_err();
    assert_eq!(err.issues[0].code, IssueCode::UnrecognizedKeys);
    assert_eq!(err.issues[0].keys, vec!["c".to_string()]);
}

#[test]
fn intersection_of_differing_arrays_is_incompatible() {
    let schema = zodkit::intersection(
        zodkit::slice(zodkit::object().field("a", zodkit::int())),
        zodkit::slice(zodkit::object().field("b", zodkit::int())),
    );
    let err = schema.parse(&json!([{"a": 1, "b": 2}])).unwrap_err();
    assert_eq!(err.codes(), vec![IssueCode::IncompatibleTypes]);

    let same = zodkit::slice(zodkit::int()).and(zodkit::slice(zodkit::int()));
    assert_eq!(same.parse(&json!([1, 2])).unwrap(), Value::from(json!([1, 2])));
}

#[test]
fn intersection_abort_early_skips_right_side() {
    let schema = zodkit::object()
        .field("a", zodkit::int())
        .and(zodkit::object().field("b", zodkit::int()));
    let ctx = ParseContext::new().abort_early();
    let err = schema.parse_with(&json!({}), &ctx).unwrap_err();
    assert_eq!(err.len(), 1);
    assert_eq!(err.issues[0].path_string(), ".a");
}

// ---------------------------------------------------------------------------
// Lazy and recursive
// ---------------------------------------------------------------------------

#[test]
fn lazy_resolves_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let schema = zodkit::lazy(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        zodkit::int().positive()
    });
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(schema.parse(&json!(1)).is_ok());
    assert!(schema.parse(&json!(-1)).is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn recursive_tree() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let node = zodkit::recursive(move |this| {
        counter.fetch_add(1, Ordering::SeqCst);
        zodkit::object()
            .field("name", zodkit::string())
            .field("child", this.optional())
    });

    let deep = json!({"name": "a", "child": {"name": "b", "child": {"name": "c"}}});
    assert!(node.parse(&deep).is_ok());
    let err = node
        .parse(&json!({"name": "a", "child": {"name": "b", "child": {"name": 1}}}))
        .unwrap_err();
    assert_eq!(err.issues[0].path_string(), ".child.child.name");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn recursive_children_list() {
    let category = zodkit::recursive(|this| {
        zodkit::object()
            .field("name", zodkit::string())
            .field("children", zodkit::slice(this))
    });
    let input = json!({
        "name": "root",
        "children": [
            {"name": "a", "children": []},
            {"name": "b", "children": [{"name": "c", "children": []}]}
        ]
    });
    assert!(category.parse(&input).is_ok());
    let err = category
        .parse(&json!({"name": "root", "children": [{"name": "a"}]}))
        .unwrap_err();
    assert_eq!(err.issues[0].path_string(), ".children[0].children");
}

// ---------------------------------------------------------------------------
// Transform and pipe
// ---------------------------------------------------------------------------

#[test]
fn transform_maps_output() {
    let schema = zodkit::string().transform(|s, _| s.len());
    assert_eq!(schema.parse(&json!("hello")).unwrap(), 5);
    // the inner schema still validates
    assert!(schema.parse(&json!(5)).is_err());
}

#[test]
fn transform_can_report_issues() {
    let schema = zodkit::string().transform(|s, ctx| match s.parse::<i64>() {
        Ok(n) => n,
        Err(_) => {
            ctx.issue("expected digits");
            0
        }
    });
    assert_eq!(schema.parse(&json!("12")).unwrap(), 12);
    let err = schema.parse(&json!("x")).unwrap_err();
    assert_eq!(err.issues[0].code, IssueCode::Custom);
    assert_eq!(err.issues[0].message, "expected digits");
}

#[test]
fn transform_output_can_be_checked() {
    let schema = zodkit::string()
        .transform(|s, _| s.len() as i64)
        .refine(|n| *n > 2, "too short");
    assert!(schema.parse(&json!("abc")).is_ok());
    assert_eq!(schema.parse(&json!("a")).unwrap_err().issues[0].message, "too short");
}

#[test]
fn pipe_feeds_output_forward() {
    let schema = zodkit::string().trim().pipe(zodkit::coerce::int().min(10));
    assert_eq!(schema.parse(&json!(" 42 ")).unwrap(), 42);

    let err = schema.parse(&json!("5")).unwrap_err();
    assert_eq!(err.issues[0].code, IssueCode::TooSmall);

    // first stage failures stop the pipe
    let err = schema.parse(&json!(5)).unwrap_err();
    assert_eq!(err.issues[0].expected.as_deref(), Some("string"));
}

#[test]
fn pipe_into_object() {
    let schema = zodkit::string()
        .transform(|s, _| Value::from(json!({"raw": s})))
        .pipe(zodkit::object().field("raw", zodkit::string().min(2)));
    assert!(schema.parse(&json!("ab")).is_ok());
    let err = schema.parse(&json!("a")).unwrap_err();
    assert_eq!(err.issues[0].path_string(), ".raw");
}
