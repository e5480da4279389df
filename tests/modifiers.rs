use serde_json::json;
use zodkit::checks;
use zodkit::prelude::*;

// ---------------------------------------------------------------------------
// Optionality
// ---------------------------------------------------------------------------

#[test]
fn optional_accepts_nil() {
    let schema = zodkit::string().optional();
    assert_eq!(schema.parse(&json!(null)).unwrap(), None);
    assert_eq!(schema.parse(&json!("a")).unwrap(), Some("a".to_string()));
    assert!(schema.parse(&json!(1)).is_err());
}

#[test]
fn optional_still_runs_checks_on_values() {
    let schema = zodkit::string().min(3).optional();
    assert!(schema.parse(&json!("ab")).is_err());
    assert!(schema.parse(&json!(null)).is_ok());
}

#[test]
fn nilable_and_nullish() {
    assert_eq!(zodkit::int().nilable().parse(&json!(null)).unwrap(), None);
    assert_eq!(zodkit::int().nullish().parse(&json!(3)).unwrap(), Some(3));

    let schema = zodkit::object()
        .field("a", zodkit::int().nilable())
        .field("b", zodkit::int().nullish());
    assert!(schema.parse(&json!({})).is_ok());
    assert!(schema.parse(&json!({"a": null, "b": null})).is_ok());
}

#[test]
fn exact_optional_rejects_explicit_null() {
    let schema = zodkit::object().field("nick", zodkit::string().exact_optional());
    let out = schema.parse(&json!({})).unwrap();
    assert!(!out.contains_key("nick"));

    let err = schema.parse(&json!({"nick": null})).unwrap_err();
    assert_eq!(err.issues[0].path_string(), ".nick");
    assert_eq!(err.issues[0].received.as_deref(), Some("null"));

    assert!(schema.parse(&json!({"nick": "x"})).is_ok());
}

#[test]
fn non_optional_rejects_nil() {
    let schema = zodkit::string().optional().non_optional();
    assert_eq!(schema.parse(&json!("a")).unwrap(), "a");
    let err = schema.parse(&json!(null)).unwrap_err();
    assert_eq!(err.issues[0].code, IssueCode::InvalidType);
    assert_eq!(err.issues[0].expected.as_deref(), Some("nonOptional"));
}

#[test]
fn non_optional_over_a_default_still_uses_the_default() {
    let schema = zodkit::int().with_default(7).optional().non_optional();
    assert_eq!(schema.parse(&json!(null)).unwrap(), 7);
}

#[test]
fn modifiers_return_new_schemas() {
    let base = zodkit::string();
    let optional = base.clone().optional();
    assert!(base.parse(&json!(null)).is_err());
    assert!(optional.parse(&json!(null)).is_ok());
    assert_ne!(base.id(), optional.id());
}

// ---------------------------------------------------------------------------
// Defaults and prefaults
// ---------------------------------------------------------------------------

#[test]
fn default_short_circuits_checks() {
    let schema = zodkit::string().min(5).with_default("short".into());
    assert_eq!(schema.parse(&json!(null)).unwrap(), "short");

    let err = schema.parse(&json!("hi")).unwrap_err();
    assert_eq!(err.issues[0].code, IssueCode::TooSmall);
    assert_eq!(err.issues[0].details.minimum, Some(5.0));
    assert_eq!(err.issues[0].expected.as_deref(), Some("5"));
}

#[test]
fn default_bypasses_checks_even_when_they_would_fail() {
    let schema = zodkit::string().min(10).with_default("tiny".into());
    assert_eq!(schema.parse(&json!(null)).unwrap(), "tiny");
}

#[test]
fn default_func_is_called_per_parse() {
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Arc;

    let next = Arc::new(AtomicI64::new(0));
    let source = Arc::clone(&next);
    let schema = zodkit::int().default_func(move || source.fetch_add(1, Ordering::SeqCst));
    assert_eq!(schema.parse(&json!(null)).unwrap(), 0);
    assert_eq!(schema.parse(&json!(null)).unwrap(), 1);
    assert_eq!(schema.parse(&json!(9)).unwrap(), 9);
}

#[test]
fn prefault_runs_the_full_pipeline() {
    let schema = zodkit::string().trim().min(2).prefault("  ok  ".into());
    assert_eq!(schema.parse(&json!(null)).unwrap(), "ok");

    let failing = zodkit::string().min(5).prefault("hi".into());
    let from_nil = failing.parse(&json!(null)).unwrap_err();
    let from_value = failing.parse(&json!("hi")).unwrap_err();
    assert_eq!(from_nil.codes(), from_value.codes());
    assert_eq!(from_nil.issues[0].message, from_value.issues[0].message);
}

#[test]
fn object_field_default() {
    let schema = zodkit::object()
        .field("page", zodkit::int().positive().with_default(1))
        .field("size", zodkit::int().max(100).prefault(500));
    let err = schema.parse(&json!({})).unwrap_err();
    assert_eq!(err.len(), 1);
    assert_eq!(err.issues[0].path_string(), ".size");

    let out = schema.parse(&json!({"size": 10})).unwrap();
    assert_eq!(out.get("page"), Some(&Value::Int(1)));
}

// ---------------------------------------------------------------------------
// Refinements
// ---------------------------------------------------------------------------

#[test]
fn refine_with_message() {
    let even = zodkit::int().refine(|n| n % 2 == 0, "must be even");
    assert!(even.parse(&json!(4)).is_ok());
    let err = even.parse(&json!(3)).unwrap_err();
    assert_eq!(err.issues[0].code, IssueCode::Custom);
    assert_eq!(err.issues[0].message, "must be even");
}

#[test]
fn refine_does_not_run_after_type_failure() {
    let schema = zodkit::int().refine(|_| panic!("must not run"), "never");
    assert!(schema.parse(&json!("x")).is_err());
}

#[test]
fn refine_on_objects() {
    let passwords = zodkit::object()
        .field("password", zodkit::string())
        .field("confirm", zodkit::string())
        .refine(
            |obj| obj.get("password") == obj.get("confirm"),
            "passwords do not match",
        );
    assert!(passwords
        .parse(&json!({"password": "a", "confirm": "a"}))
        .is_ok());
    let err = passwords
        .parse(&json!({"password": "a", "confirm": "b"}))
        .unwrap_err();
    assert_eq!(err.issues[0].message, "passwords do not match");
    assert!(err.issues[0].path.is_empty());
}

#[test]
fn object_refinements_skip_when_fields_fail() {
    let schema = zodkit::object()
        .field("a", zodkit::int())
        .refine(|_| false, "refined");
    let err = schema.parse(&json!({"a": "x"})).unwrap_err();
    assert_eq!(err.codes(), vec![IssueCode::InvalidType]);
}

#[test]
fn super_refine_reports_several_issues() {
    let schema = zodkit::slice(zodkit::int()).super_refine(|items, ctx| {
        if items.len() > 2 {
            ctx.issue("too many items");
        }
        if items.iter().any(|n| *n < 0) {
            let mut issue = RawIssue::custom("negative item", None);
            issue.path.push(PathSegment::Index(0));
            ctx.add_issue(issue);
        }
    });
    assert!(schema.parse(&json!([1, 2])).is_ok());
    let err = schema.parse(&json!([-1, 2, 3])).unwrap_err();
    assert_eq!(err.len(), 2);
    assert_eq!(err.issues[0].message, "too many items");
    assert_eq!(err.issues[1].path_string(), "[0]");
}

#[test]
fn overwrite_changes_the_value_checks_see() {
    let schema = zodkit::int().overwrite(|n| n * 10).max(50);
    assert_eq!(schema.parse(&json!(5)).unwrap(), 50);
    assert!(schema.parse(&json!(6)).is_err());
}

#[test]
fn checks_run_in_chain_order() {
    let schema = zodkit::string().min(2).trim().max(3);
    // min sees the untrimmed text, max the trimmed one
    assert_eq!(schema.parse(&json!(" abc ")).unwrap(), "abc");
    assert!(schema.parse(&json!(" a")).is_ok());
}

// ---------------------------------------------------------------------------
// Aborting
// ---------------------------------------------------------------------------

#[test]
fn abort_check_stops_the_chain() {
    let schema = zodkit::string()
        .check(checks::min_length(5).abort())
        .email();
    let err = schema.parse(&json!("a")).unwrap_err();
    assert_eq!(err.codes(), vec![IssueCode::TooSmall]);

    // without abort both are reported
    let err = zodkit::string().min(5).email().parse(&json!("a")).unwrap_err();
    assert_eq!(err.len(), 2);
}

#[test]
fn abort_early_context_stops_at_first_issue() {
    let ctx = ParseContext::new().abort_early();
    let schema = zodkit::object()
        .field("a", zodkit::string().min(5).email())
        .field("b", zodkit::int());
    let err = schema.parse_with(&json!({"a": "x", "b": "y"}), &ctx).unwrap_err();
    assert_eq!(err.len(), 1);
    assert_eq!(err.issues[0].path_string(), ".a");
    assert_eq!(err.issues[0].code, IssueCode::TooSmall);

    let err = zodkit::slice(zodkit::int())
        .parse_with(&json!(["a", "b"]), &ctx)
        .unwrap_err();
    assert_eq!(err.len(), 1);
}

// ---------------------------------------------------------------------------
// Typed parsing on modified schemas
// ---------------------------------------------------------------------------

#[test]
fn strict_parse_optional() {
    let schema = zodkit::int().positive().optional();
    assert_eq!(schema.strict_parse(None).unwrap(), None);
    assert_eq!(schema.strict_parse(Some(3)).unwrap(), Some(3));
    assert!(schema.strict_parse(Some(-3)).is_err());
}

#[test]
fn strict_parse_applies_default() {
    let schema = zodkit::int().with_default(5).optional();
    assert_eq!(schema.strict_parse(None).unwrap(), Some(5));
}
