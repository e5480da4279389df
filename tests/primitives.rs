use serde_json::json;
use zodkit::checks::NormalizeForm;
use zodkit::iso;
use zodkit::prelude::*;

// ---------------------------------------------------------------------------
// String
// ---------------------------------------------------------------------------

#[test]
fn string_basic() {
    let schema = zodkit::string();
    assert_eq!(schema.parse(&json!("hello")).unwrap(), "hello");
    assert!(schema.parse(&json!(42)).is_err());
    assert!(schema.parse(&json!(null)).is_err());
}

#[test]
fn string_type_mismatch_reports_expected_and_received() {
    let err = zodkit::string().parse(&json!(42)).unwrap_err();
    let issue = &err.issues[0];
    assert_eq!(issue.code, IssueCode::InvalidType);
    assert_eq!(issue.expected.as_deref(), Some("string"));
    assert_eq!(issue.received.as_deref(), Some("number"));
    assert_eq!(issue.message, "Invalid input: expected string, received number");
}

#[test]
fn string_min_max_length() {
    let schema = zodkit::string().min(2).max(5);
    assert!(schema.parse(&json!("ab")).is_ok());
    assert!(schema.parse(&json!("abcde")).is_ok());

    let err = schema.parse(&json!("a")).unwrap_err();
    assert_eq!(err.issues[0].code, IssueCode::TooSmall);
    assert_eq!(err.issues[0].details.minimum, Some(2.0));
    assert_eq!(err.issues[0].details.origin.as_deref(), Some("string"));
    assert_eq!(
        err.issues[0].message,
        "Too small: expected string to have >=2 characters"
    );

    let err = schema.parse(&json!("abcdef")).unwrap_err();
    assert_eq!(err.issues[0].code, IssueCode::TooBig);
    assert_eq!(err.issues[0].details.maximum, Some(5.0));
}

#[test]
fn string_length_counts_chars() {
    let schema = zodkit::string().length(3);
    assert!(schema.parse(&json!("日本語")).is_ok());
    let err = schema.parse(&json!("ab")).unwrap_err();
    assert!(err.issues[0].details.exact);
}

#[test]
fn string_checks_report_all_issues() {
    let schema = zodkit::string().min(5).email();
    let err = schema.parse(&json!("a@b")).unwrap_err();
    assert_eq!(err.codes(), vec![IssueCode::TooSmall, IssueCode::InvalidFormat]);
}

#[test]
fn string_prefix_suffix_includes() {
    let schema = zodkit::string()
        .starts_with("ab")
        .ends_with("yz")
        .includes("mm");
    assert!(schema.parse(&json!("abmmyz")).is_ok());

    let err = schema.parse(&json!("xxmmyz")).unwrap_err();
    assert_eq!(err.issues[0].details.format.as_deref(), Some("starts_with"));
    assert_eq!(err.issues[0].message, "Invalid string: must start with \"ab\"");
}

#[test]
fn string_regex() {
    let schema = zodkit::string().regex(zodkit::regex_lite::Regex::new(r"^\d{3}$").unwrap());
    assert!(schema.parse(&json!("123")).is_ok());
    let err = schema.parse(&json!("12a")).unwrap_err();
    assert_eq!(err.issues[0].code, IssueCode::InvalidFormat);
    assert_eq!(err.issues[0].details.format.as_deref(), Some("regex"));
}

#[test]
fn string_case_checks() {
    assert!(zodkit::string().lowercase().parse(&json!("abc")).is_ok());
    assert!(zodkit::string().lowercase().parse(&json!("aBc")).is_err());
    assert!(zodkit::string().uppercase().parse(&json!("ABC1")).is_ok());
    assert!(zodkit::string().uppercase().parse(&json!("ABc")).is_err());
}

#[test]
fn string_formats() {
    let cases: Vec<(ZString, &str, &str)> = vec![
        (zodkit::string().email(), "user@example.com", "not-an-email"),
        (zodkit::string().url(), "https://example.com/a?b=1", "example"),
        (
            zodkit::string().uuid(),
            "123e4567-e89b-42d3-a456-426614174000",
            "123e4567",
        ),
        (zodkit::string().ipv4(), "10.0.0.1", "256.0.0.1"),
        (zodkit::string().ipv6(), "2001:db8::1", "2001:::1"),
        (zodkit::string().cidrv4(), "10.0.0.0/8", "10.0.0.0/33"),
        (zodkit::string().mac(), "00:1a:2b:3c:4d:5e", "00:1a:2b"),
        (zodkit::string().base64(), "aGVsbG8=", "aGVsbG8"),
        (zodkit::string().e164(), "+14155552671", "4155552671"),
        (zodkit::string().json(), r#"{"a":[1,2]}"#, "{a}"),
        (zodkit::string().hostname(), "api.example.com", "-bad-.com"),
    ];
    for (schema, good, bad) in cases {
        assert!(schema.parse(&json!(good)).is_ok(), "{} should pass", good);
        let err = schema.parse(&json!(bad)).unwrap_err();
        assert_eq!(err.issues[0].code, IssueCode::InvalidFormat, "{}", bad);
    }
}

#[test]
fn string_format_message_names_format() {
    let err = zodkit::string().email().parse(&json!("nope")).unwrap_err();
    assert_eq!(err.issues[0].message, "Invalid email address");
    assert_eq!(err.issues[0].details.format.as_deref(), Some("email"));
}

#[test]
fn string_overwrites_apply_in_chain_order() {
    let schema = zodkit::string().trim().to_lower_case().min(3);
    assert_eq!(schema.parse(&json!("  HeLLo  ")).unwrap(), "hello");
    // min sees the trimmed value
    assert!(schema.parse(&json!("  AB  ")).is_err());

    assert_eq!(
        zodkit::string().to_upper_case().parse(&json!("abc")).unwrap(),
        "ABC"
    );
    assert_eq!(
        zodkit::string().slugify().parse(&json!(" Hello World ")).unwrap(),
        "hello-world"
    );
}

#[test]
fn string_normalize() {
    let schema = zodkit::string().normalize(NormalizeForm::Nfc);
    // "e" followed by a combining acute accent
    assert_eq!(schema.parse(&json!("e\u{301}")).unwrap(), "\u{e9}");
}

#[test]
fn string_custom_messages() {
    let schema = zodkit::string()
        .min_msg(3, "too short")
        .email_msg("bad email");
    let err = schema.parse(&json!("a")).unwrap_err();
    let messages: Vec<&str> = err.issues.iter().map(|i| i.message.as_str()).collect();
    assert_eq!(messages, vec!["too short", "bad email"]);
}

// ---------------------------------------------------------------------------
// ISO formats
// ---------------------------------------------------------------------------

#[test]
fn iso_schemas() {
    assert!(iso::date().parse(&json!("2024-02-29")).is_ok());
    assert!(iso::date().parse(&json!("2023-02-29")).is_err());
    assert!(iso::time().parse(&json!("23:59:59")).is_ok());
    assert!(iso::time().parse(&json!("24:00:00")).is_err());
    assert!(iso::datetime().parse(&json!("2024-01-01T10:20:30Z")).is_ok());
    assert!(iso::datetime().parse(&json!("2024-01-01T10:20:30+02:00")).is_err());
    assert!(iso::duration().parse(&json!("P3Y6M4DT12H30M5S")).is_ok());

    let offset = iso::datetime_with(iso::IsoDatetimeOptions {
        offset: true,
        ..Default::default()
    });
    assert!(offset.parse(&json!("2024-01-01T10:20:30+02:00")).is_ok());

    let err = iso::date().parse(&json!("yesterday")).unwrap_err();
    assert_eq!(err.issues[0].message, "Invalid ISO date");
}

#[test]
fn iso_schemas_keep_string_methods() {
    let schema = iso::date().starts_with("2024");
    assert!(schema.parse(&json!("2024-05-01")).is_ok());
    assert!(schema.parse(&json!("2023-05-01")).is_err());
}

// ---------------------------------------------------------------------------
// Numbers
// ---------------------------------------------------------------------------

#[test]
fn number_basic() {
    let schema = zodkit::number();
    assert_eq!(schema.parse(&json!(1.5)).unwrap(), 1.5);
    assert_eq!(schema.parse(&json!(3)).unwrap(), 3.0);
    let err = schema.parse(&json!("3")).unwrap_err();
    assert_eq!(err.issues[0].expected.as_deref(), Some("number"));
}

#[test]
fn int_rejects_fractions() {
    let err = zodkit::int().parse(&json!(1.5)).unwrap_err();
    assert_eq!(err.issues[0].code, IssueCode::InvalidType);
    assert_eq!(err.issues[0].expected.as_deref(), Some("int"));
    assert_eq!(zodkit::int().parse(&json!(2.0)).unwrap(), 2);
}

#[test]
fn sized_integers_reject_out_of_range() {
    assert_eq!(zodkit::uint8().parse(&json!(255)).unwrap(), 255u8);
    let err = zodkit::uint8().parse(&json!(256)).unwrap_err();
    assert_eq!(err.issues[0].expected.as_deref(), Some("uint8"));
    assert!(zodkit::uint32().parse(&json!(-1)).is_err());
    assert_eq!(zodkit::int16().parse(&json!(-300)).unwrap(), -300i16);
    assert_eq!(
        zodkit::uint64().parse(&json!(u64::MAX)).unwrap(),
        u64::MAX
    );
}

#[test]
fn number_bounds() {
    let schema = zodkit::int().gt(0).lte(10);
    assert!(schema.parse(&json!(10)).is_ok());

    let err = schema.parse(&json!(0)).unwrap_err();
    assert_eq!(err.issues[0].code, IssueCode::TooSmall);
    assert!(!err.issues[0].details.inclusive);
    assert_eq!(err.issues[0].message, "Too small: expected number to be >0");

    let err = schema.parse(&json!(11)).unwrap_err();
    assert_eq!(err.issues[0].code, IssueCode::TooBig);
    assert!(err.issues[0].details.inclusive);
}

#[test]
fn number_sign_helpers() {
    assert!(zodkit::int().positive().parse(&json!(0)).is_err());
    assert!(zodkit::int().non_negative().parse(&json!(0)).is_ok());
    assert!(zodkit::number().negative().parse(&json!(-0.5)).is_ok());
    assert!(zodkit::number().non_positive().parse(&json!(0.1)).is_err());
}

#[test]
fn number_multiple_of() {
    let schema = zodkit::int().multiple_of(5);
    assert!(schema.parse(&json!(15)).is_ok());
    let err = schema.parse(&json!(7)).unwrap_err();
    assert_eq!(err.issues[0].code, IssueCode::NotMultipleOf);
    assert_eq!(err.issues[0].details.divisor, Some(5.0));

    // float steps tolerate binary rounding
    assert!(zodkit::number().step(0.1).parse(&json!(0.3)).is_ok());
}

#[test]
fn multiple_of_minus_one_accepts_the_minimum() {
    let schema = zodkit::int().multiple_of(-1);
    assert_eq!(schema.parse(&json!(i64::MIN)).unwrap(), i64::MIN);
    assert_eq!(zodkit::int8().multiple_of(-1).parse(&json!(-128)).unwrap(), -128i8);
}

#[test]
fn integral_floats_past_the_range_are_rejected() {
    let err = zodkit::int().parse("9223372036854775808.0").unwrap_err();
    assert_eq!(err.issues[0].code, IssueCode::InvalidType);
    assert!(zodkit::uint64().parse("18446744073709551616.0").is_err());
    assert_eq!(zodkit::int().parse("-9223372036854775808.0").unwrap(), i64::MIN);
    assert_eq!(zodkit::int8().parse("127.0").unwrap(), 127i8);
    assert!(zodkit::int8().parse("128.0").is_err());
}

#[test]
fn bound_issues_report_the_bound_as_expected() {
    let err = zodkit::int().gte(3).parse(&json!(1)).unwrap_err();
    assert_eq!(err.issues[0].expected.as_deref(), Some("3"));
    let err = zodkit::number().lt(2.5).parse(&json!(4)).unwrap_err();
    assert_eq!(err.issues[0].expected.as_deref(), Some("2.5"));
}

// ---------------------------------------------------------------------------
// Boolean
// ---------------------------------------------------------------------------

#[test]
fn boolean_basic() {
    assert!(zodkit::boolean().parse(&json!(true)).unwrap());
    assert!(!zodkit::boolean().parse(&json!(false)).unwrap());
    let err = zodkit::boolean().parse(&json!("true")).unwrap_err();
    assert_eq!(err.issues[0].expected.as_deref(), Some("boolean"));
}

// ---------------------------------------------------------------------------
// Coercion
// ---------------------------------------------------------------------------

#[test]
fn coerce_string() {
    let schema = zodkit::coerce::string();
    assert_eq!(schema.parse(&json!(42)).unwrap(), "42");
    assert_eq!(schema.parse(&json!(true)).unwrap(), "true");
    assert!(schema.parse(&json!([1])).is_err());
}

#[test]
fn coerce_numbers() {
    assert_eq!(zodkit::coerce::int().parse(&json!(" 42 ")).unwrap(), 42);
    assert_eq!(zodkit::coerce::number().parse(&json!("1.5")).unwrap(), 1.5);
    assert_eq!(zodkit::coerce::int().parse(&json!(true)).unwrap(), 1);
    assert!(zodkit::coerce::int().parse(&json!("abc")).is_err());
    assert!(zodkit::coerce::int().parse(&json!("1.5")).is_err());
}

#[test]
fn coerce_boolean() {
    let schema = zodkit::coerce::boolean();
    assert!(schema.parse(&json!("1")).unwrap());
    assert!(!schema.parse(&json!("false")).unwrap());
    assert!(!schema.parse(&json!(0)).unwrap());
    assert!(schema.parse(&json!("maybe")).is_err());
}

#[test]
fn coerced_value_still_runs_checks() {
    let schema = zodkit::coerce::int().min(10);
    let err = schema.parse(&json!("5")).unwrap_err();
    assert_eq!(err.issues[0].code, IssueCode::TooSmall);
}

// ---------------------------------------------------------------------------
// Literal and enum
// ---------------------------------------------------------------------------

#[test]
fn literal_string() {
    let schema = zodkit::literal("admin");
    assert_eq!(schema.parse(&json!("admin")).unwrap(), "admin");
    let err = schema.parse(&json!("user")).unwrap_err();
    assert_eq!(err.issues[0].code, IssueCode::InvalidValue);
    assert_eq!(err.issues[0].options, vec![Value::from("admin")]);
    assert_eq!(err.issues[0].message, "Invalid input: expected \"admin\"");
}

#[test]
fn literal_numbers_and_bools() {
    assert_eq!(zodkit::literal(42i64).parse(&json!(42)).unwrap(), 42);
    assert!(zodkit::literal(42i64).parse(&json!(43)).is_err());
    assert!(zodkit::literal(true).parse(&json!(true)).unwrap());
}

#[test]
fn literals_multi() {
    let schema = zodkit::literals(vec!["a", "b"]);
    assert!(schema.parse(&json!("b")).is_ok());
    let err = schema.parse(&json!("c")).unwrap_err();
    assert_eq!(err.issues[0].message, "Invalid option: expected one of \"a\"|\"b\"");
}

#[test]
fn enum_basic() {
    let schema = zodkit::enumeration(&["red", "green", "blue"]);
    assert_eq!(schema.parse(&json!("green")).unwrap(), "green");
    let err = schema.parse(&json!("purple")).unwrap_err();
    assert_eq!(err.issues[0].code, IssueCode::InvalidValue);
    assert_eq!(err.issues[0].options.len(), 3);
}

#[test]
fn enum_extract_and_exclude() {
    let color = zodkit::enumeration(&["red", "green", "blue"]);
    let warm = color.extract(&["red"]);
    assert_eq!(warm.options(), vec!["red".to_string()]);
    assert!(warm.parse(&json!("green")).is_err());

    let cool = color.exclude(&["red"]);
    assert_eq!(cool.options().len(), 2);
    assert!(cool.parse(&json!("blue")).is_ok());
    // the source enum is unchanged
    assert_eq!(color.options().len(), 3);
}

#[test]
#[should_panic]
fn enum_extract_unknown_key_panics() {
    zodkit::enumeration(&["a"]).extract(&["b"]);
}

#[test]
fn native_enum_values() {
    let level = zodkit::native_enum(&[("Low", 1i64), ("High", 10)]);
    assert_eq!(level.parse(&json!(10)).unwrap(), 10);
    assert!(level.parse(&json!("High")).is_err());
    assert_eq!(level.enum_map().get("Low"), Some(&1));
}

// ---------------------------------------------------------------------------
// Any / unknown
// ---------------------------------------------------------------------------

#[test]
fn any_accepts_everything() {
    let schema = zodkit::any();
    assert_eq!(schema.parse(&json!(null)).unwrap(), Value::Null);
    assert_eq!(
        schema.parse(&json!({"a": [1]})).unwrap(),
        Value::from(json!({"a": [1]}))
    );
    assert!(zodkit::unknown().parse(&json!(1)).is_ok());
}

#[test]
fn primitive_parse_from_json_text() {
    assert_eq!(zodkit::string().parse(r#""text""#).unwrap(), "text");
    assert!(zodkit::int().parse("not json").is_err());
}
