//! Global configuration is process-wide, so everything touching it lives in
//! one test.

use serde_json::json;
use zodkit::prelude::*;

#[test]
fn global_formatter_sits_below_context_and_schema() {
    zodkit::configure(|cfg| {
        cfg.custom_error = Some(ErrorMap::new(|issue| {
            (issue.code == IssueCode::InvalidType).then(|| "global: wrong type".to_string())
        }));
    });
    assert!(zodkit::global_config().custom_error.is_some());

    let err = zodkit::int().parse(&json!("x")).unwrap_err();
    assert_eq!(err.issues[0].message, "global: wrong type");

    // codes the formatter ignores fall back to the defaults
    let err = zodkit::int().min(5).parse(&json!(1)).unwrap_err();
    assert_eq!(err.issues[0].message, "Too small: expected number to be >=5");

    let ctx = ParseContext::new().error("context");
    let err = zodkit::int().parse_with(&json!("x"), &ctx).unwrap_err();
    assert_eq!(err.issues[0].message, "context");

    let err = zodkit::int().error("schema").parse(&json!("x")).unwrap_err();
    assert_eq!(err.issues[0].message, "schema");

    zodkit::configure(|cfg| cfg.custom_error = None);
    let err = zodkit::int().parse(&json!("x")).unwrap_err();
    assert_eq!(err.issues[0].message, "Invalid input: expected int, received string");
}
