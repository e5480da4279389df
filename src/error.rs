use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// One step of an issue path: an object key or an element index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum PathSegment {
    /// Object field name.
    Field(String),
    /// Array index.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => write!(f, ".{}", name),
            PathSegment::Index(idx) => write!(f, "[{}]", idx),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(name: &str) -> Self {
        PathSegment::Field(name.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(name: String) -> Self {
        PathSegment::Field(name)
    }
}

impl From<usize> for PathSegment {
    fn from(idx: usize) -> Self {
        PathSegment::Index(idx)
    }
}

/// Validation issue code. Describes what went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialize",
    derive(serde::Serialize),
    serde(rename_all = "snake_case")
)]
pub enum IssueCode {
    InvalidType,
    TooSmall,
    TooBig,
    InvalidFormat,
    InvalidValue,
    InvalidElement,
    InvalidUnion,
    InvalidKey,
    UnrecognizedKeys,
    NotMultipleOf,
    IncompatibleTypes,
    Custom,
    MissingDiscriminator,
}

impl IssueCode {
    /// Canonical code string, e.g. `"invalid_type"`.
    pub fn key(&self) -> &'static str {
        match self {
            IssueCode::InvalidType => "invalid_type",
            IssueCode::TooSmall => "too_small",
            IssueCode::TooBig => "too_big",
            IssueCode::InvalidFormat => "invalid_format",
            IssueCode::InvalidValue => "invalid_value",
            IssueCode::InvalidElement => "invalid_element",
            IssueCode::InvalidUnion => "invalid_union",
            IssueCode::InvalidKey => "invalid_key",
            IssueCode::UnrecognizedKeys => "unrecognized_keys",
            IssueCode::NotMultipleOf => "not_multiple_of",
            IssueCode::IncompatibleTypes => "incompatible_types",
            IssueCode::Custom => "custom",
            IssueCode::MissingDiscriminator => "missing_discriminator",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Code-specific properties of an issue.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct IssueDetails {
    /// What kind of value the bound applies to (`string`, `array`, `number`, ...).
    pub origin: Option<String>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub inclusive: bool,
    /// Set for `length`-style checks and fixed tuple sizes.
    pub exact: bool,
    /// Format name for `invalid_format` (`email`, `regex`, `starts_with`, ...).
    pub format: Option<String>,
    /// Pattern, prefix, suffix or substring the format check used.
    pub pattern: Option<String>,
    pub divisor: Option<f64>,
    pub discriminator: Option<String>,
    /// Extra text appended to the resolved message.
    pub note: Option<String>,
}

/// Shared message formatter consulted while finalising an issue.
///
/// Returning `None` defers to the next formatter in the chain.
#[derive(Clone)]
pub struct ErrorMap(Arc<dyn Fn(&RawIssue) -> Option<String> + Send + Sync>);

impl ErrorMap {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&RawIssue) -> Option<String> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn resolve(&self, issue: &RawIssue) -> Option<String> {
        (self.0)(issue)
    }
}

impl fmt::Debug for ErrorMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ErrorMap(..)")
    }
}

impl From<&str> for ErrorMap {
    fn from(message: &str) -> Self {
        let message = message.to_string();
        ErrorMap::new(move |_| Some(message.clone()))
    }
}

impl From<String> for ErrorMap {
    fn from(message: String) -> Self {
        ErrorMap::new(move |_| Some(message.clone()))
    }
}

/// In-flight diagnostic produced by checks and the engine.
///
/// Raw issues carry everything message formatters may want to inspect. They
/// become [`ZodIssue`]s when a parse finishes.
#[derive(Debug, Clone)]
pub struct RawIssue {
    pub code: IssueCode,
    /// The offending input. `None` when the value was absent.
    pub input: Option<Value>,
    pub path: Vec<PathSegment>,
    /// Message supplied by the component that raised the issue.
    pub message: Option<String>,
    pub expected: Option<String>,
    pub received: Option<String>,
    /// Unknown keys for `unrecognized_keys`.
    pub keys: Vec<String>,
    /// Allowed values for `invalid_value`.
    pub options: Vec<Value>,
    pub details: IssueDetails,
    /// Child issues of `invalid_key` / `invalid_element`.
    pub issues: Vec<RawIssue>,
    /// Per-branch issues of `invalid_union`.
    pub union_errors: Vec<Vec<RawIssue>>,
    /// Name of the check that raised the issue.
    pub check: Option<&'static str>,
    pub(crate) check_error: Option<ErrorMap>,
    pub(crate) schema_error: Option<ErrorMap>,
    pub(crate) stamped: bool,
}

impl RawIssue {
    pub fn new(code: IssueCode, input: Option<&Value>) -> Self {
        Self {
            code,
            input: input.cloned(),
            path: Vec::new(),
            message: None,
            expected: None,
            received: None,
            keys: Vec::new(),
            options: Vec::new(),
            details: IssueDetails::default(),
            issues: Vec::new(),
            union_errors: Vec::new(),
            check: None,
            check_error: None,
            schema_error: None,
            stamped: false,
        }
    }

    /// `invalid_type` with `received` derived from the input.
    pub fn invalid_type(expected: impl Into<String>, input: Option<&Value>) -> Self {
        let received = received_name(input);
        let mut issue = Self::new(IssueCode::InvalidType, input);
        issue.expected = Some(expected.into());
        issue.received = Some(received.to_string());
        issue
    }

    pub fn custom(message: impl Into<String>, input: Option<&Value>) -> Self {
        Self::new(IssueCode::Custom, input).message(message)
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.details.origin = Some(origin.into());
        self
    }

    /// Also fills `expected` with the bound unless it is already set.
    pub fn minimum(mut self, minimum: f64, inclusive: bool) -> Self {
        self.details.minimum = Some(minimum);
        self.details.inclusive = inclusive;
        self.expected.get_or_insert_with(|| minimum.to_string());
        self
    }

    /// Also fills `expected` with the bound unless it is already set.
    pub fn maximum(mut self, maximum: f64, inclusive: bool) -> Self {
        self.details.maximum = Some(maximum);
        self.details.inclusive = inclusive;
        self.expected.get_or_insert_with(|| maximum.to_string());
        self
    }

    pub fn exact(mut self) -> Self {
        self.details.exact = true;
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.details.format = Some(format.into());
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.details.pattern = Some(pattern.into());
        self
    }

    pub fn keys(mut self, keys: Vec<String>) -> Self {
        self.keys = keys;
        self
    }

    pub fn options(mut self, options: Vec<Value>) -> Self {
        self.options = options;
        self
    }

    pub fn nested(mut self, issues: Vec<RawIssue>) -> Self {
        self.issues = issues;
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.details.note = Some(note.into());
        self
    }

    /// Prepend a path segment (used for nested objects and arrays).
    pub fn with_prefix(mut self, segment: PathSegment) -> Self {
        self.path.insert(0, segment);
        self
    }

    /// Key/value parameters for message templates.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        collect_params(
            self.expected.as_deref(),
            self.received.as_deref(),
            &self.details,
            &self.keys,
            &self.options,
        )
    }
}

fn collect_params(
    expected: Option<&str>,
    received: Option<&str>,
    d: &IssueDetails,
    keys: &[String],
    options: &[Value],
) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(expected) = expected {
        params.push(("expected", expected.to_string()));
    }
    if let Some(received) = received {
        params.push(("received", received.to_string()));
    }
    if let Some(origin) = &d.origin {
        params.push(("origin", origin.clone()));
    }
    if let Some(minimum) = d.minimum {
        params.push(("minimum", minimum.to_string()));
    }
    if let Some(maximum) = d.maximum {
        params.push(("maximum", maximum.to_string()));
    }
    if d.minimum.is_some() || d.maximum.is_some() {
        params.push(("inclusive", d.inclusive.to_string()));
    }
    if let Some(format) = &d.format {
        params.push(("format", format.clone()));
    }
    if let Some(pattern) = &d.pattern {
        params.push(("pattern", pattern.clone()));
    }
    if let Some(divisor) = d.divisor {
        params.push(("divisor", divisor.to_string()));
    }
    if let Some(discriminator) = &d.discriminator {
        params.push(("discriminator", discriminator.clone()));
    }
    if !keys.is_empty() {
        params.push(("keys", keys.join(", ")));
    }
    if !options.is_empty() {
        let options: Vec<String> = options.iter().map(|o| o.to_string()).collect();
        params.push(("options", options.join("|")));
    }
    params
}

/// `received` name for an input: `undefined` when absent.
pub fn received_name(input: Option<&Value>) -> &'static str {
    match input {
        None => "undefined",
        Some(v) => v.type_name(),
    }
}

/// A finalised validation issue.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct ZodIssue {
    pub code: IssueCode,
    pub message: String,
    pub path: Vec<PathSegment>,
    pub expected: Option<String>,
    pub received: Option<String>,
    pub keys: Vec<String>,
    pub options: Vec<Value>,
    /// The offending input, kept only when the context sets `report_input`.
    pub input: Option<Value>,
    pub details: IssueDetails,
    /// Child issues of `invalid_key` / `invalid_element`.
    pub issues: Vec<ZodIssue>,
    /// Per-branch issues of `invalid_union`.
    pub errors: Vec<Vec<ZodIssue>>,
}

impl ZodIssue {
    /// Dotted path string, e.g. `.user.tags[2]`.
    pub fn path_string(&self) -> String {
        self.path.iter().map(|p| p.to_string()).collect()
    }

    /// Key/value parameters for message templates.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        collect_params(
            self.expected.as_deref(),
            self.received.as_deref(),
            &self.details,
            &self.keys,
            &self.options,
        )
    }
}

/// Collection of validation issues returned by a failed parse.
///
/// Issues are accumulated, so every problem is reported at once.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct ZodError {
    pub issues: Vec<ZodIssue>,
}

impl ZodError {
    pub fn new(issues: Vec<ZodIssue>) -> Self {
        Self { issues }
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn first(&self) -> Option<&ZodIssue> {
        self.issues.first()
    }

    /// Codes of all top-level issues, in order.
    pub fn codes(&self) -> Vec<IssueCode> {
        self.issues.iter().map(|i| i.code).collect()
    }

    /// Appends the issues of `other`.
    pub fn merge(mut self, other: ZodError) -> Self {
        self.issues.extend(other.issues);
        self
    }
}

impl fmt::Display for ZodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            if !issue.path.is_empty() {
                write!(f, "{}: ", issue.path_string())?;
            }
            write!(f, "{}", issue.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ZodError {}

/// Errors raised while constructing a schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaBuildError {
    #[error("discriminated union needs at least one branch")]
    NoBranches,
    #[error("branch {branch} has no field '{discriminator}'")]
    MissingDiscriminator { branch: usize, discriminator: String },
    #[error("branch {branch} field '{discriminator}' is not a literal or enum")]
    NonLiteralDiscriminator { branch: usize, discriminator: String },
    #[error("discriminator value {value} is used by branches {first} and {second}")]
    DuplicateDiscriminator {
        value: String,
        first: usize,
        second: usize,
    },
}

/// Errors raised by metadata registries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("schema id {0:?} already exists in registry")]
    DuplicateId(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_type_names_absent_input_undefined() {
        let issue = RawIssue::invalid_type("string", None);
        assert_eq!(issue.received.as_deref(), Some("undefined"));
        let issue = RawIssue::invalid_type("string", Some(&Value::Null));
        assert_eq!(issue.received.as_deref(), Some("null"));
    }

    #[test]
    fn prefix_goes_in_front() {
        let issue = RawIssue::new(IssueCode::Custom, None)
            .with_prefix(PathSegment::Index(1))
            .with_prefix(PathSegment::from("items"));
        assert_eq!(
            issue.path,
            vec![PathSegment::Field("items".into()), PathSegment::Index(1)]
        );
    }

    #[test]
    fn params_include_bounds() {
        let issue = RawIssue::new(IssueCode::TooSmall, None)
            .origin("string")
            .minimum(3.0, true);
        let params = issue.params();
        assert!(params.contains(&("minimum", "3".to_string())));
        assert!(params.contains(&("origin", "string".to_string())));
    }

    #[test]
    fn display_prefixes_paths() {
        let err = ZodError::new(vec![ZodIssue {
            code: IssueCode::Custom,
            message: "bad".into(),
            path: vec![PathSegment::from("a"), PathSegment::Index(0)],
            expected: None,
            received: None,
            keys: vec![],
            options: vec![],
            input: None,
            details: IssueDetails::default(),
            issues: vec![],
            errors: vec![],
        }]);
        assert_eq!(err.to_string(), ".a[0]: bad");
    }
}
