//! Default messages and internationalization (i18n) support.
//!
//! [`default_message`] produces the built-in English wording for a raw issue.
//! The [`MessageResolver`] trait and the built-in resolvers translate messages
//! by [`IssueCode::key()`](crate::error::IssueCode::key) using `{param}`
//! templates filled from the issue's parameters.
//!
//! # Example
//!
//! ```
//! use zodkit::prelude::*;
//! use zodkit::i18n::{MapResolver, translate_error};
//! use std::collections::HashMap;
//!
//! let resolver = MapResolver::new(HashMap::new())
//!     .set("too_small", "Debe tener al menos {minimum} caracteres");
//!
//! let err = zodkit::string().min(5).parse(r#""ab""#).unwrap_err();
//! let spanish = translate_error(&err, &resolver);
//! assert_eq!(spanish.issues[0].message, "Debe tener al menos 5 caracteres");
//! ```

use std::collections::HashMap;

use crate::error::{ErrorMap, IssueCode, IssueDetails, RawIssue, ZodError, ZodIssue};
use crate::value::Value;

/// Maps an issue code key to a message template.
///
/// `key` is the canonical code string (`"too_small"`, `"invalid_type"`, ...).
/// Returning `None` leaves the issue's message untouched.
pub trait MessageResolver {
    fn resolve(&self, key: &str) -> Option<String>;
}

/// Templates looked up in a plain table.
///
/// # Example
/// ```
/// use zodkit::i18n::MapResolver;
/// use std::collections::HashMap;
///
/// let resolver = MapResolver::new(HashMap::new())
///     .set("too_small", "Минимум {minimum}");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapResolver {
    map: HashMap<String, String>,
}

impl MapResolver {
    pub fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    /// Override or add one template.
    pub fn set(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.map.insert(key.into(), template.into());
        self
    }
}

impl MessageResolver for MapResolver {
    fn resolve(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }
}

/// Templates produced by a closure.
///
/// # Example
/// ```
/// use zodkit::i18n::FnResolver;
///
/// let resolver = FnResolver::new(|key| match key {
///     "too_big" => Some("Too long".into()),
///     _ => None,
/// });
/// ```
pub struct FnResolver<F: Fn(&str) -> Option<String>> {
    f: F,
}

impl<F: Fn(&str) -> Option<String>> FnResolver<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F: Fn(&str) -> Option<String>> MessageResolver for FnResolver<F> {
    fn resolve(&self, key: &str) -> Option<String> {
        (self.f)(key)
    }
}

/// Replace `{param_name}` placeholders with values from `params`.
fn apply_params(template: &str, params: &[(&str, String)]) -> String {
    let mut result = template.to_string();
    for (key, value) in params {
        result = result.replace(&format!("{{{}}}", key), value);
    }
    result
}

/// Use a resolver as a message formatter during finalisation.
///
/// The result can be passed to [`ParseContext::error`](crate::ParseContext::error)
/// or installed globally through [`configure`](crate::configure).
pub fn error_map<R>(resolver: R) -> ErrorMap
where
    R: MessageResolver + Send + Sync + 'static,
{
    ErrorMap::new(move |issue| {
        resolver
            .resolve(issue.code.key())
            .map(|template| apply_params(&template, &issue.params()))
    })
}

/// Rewrites one finished issue and its children.
pub fn translate_issue(issue: &ZodIssue, resolver: &dyn MessageResolver) -> ZodIssue {
    let message = match resolver.resolve(issue.code.key()) {
        Some(template) => apply_params(&template, &issue.params()),
        None => issue.message.clone(),
    };
    ZodIssue {
        message,
        issues: issue
            .issues
            .iter()
            .map(|i| translate_issue(i, resolver))
            .collect(),
        errors: issue
            .errors
            .iter()
            .map(|branch| branch.iter().map(|i| translate_issue(i, resolver)).collect())
            .collect(),
        ..issue.clone()
    }
}

/// Rewrites every message of a finished error, nested issues included.
///
/// # Example
/// ```
/// use zodkit::prelude::*;
/// use zodkit::i18n::{FnResolver, translate_error};
///
/// let resolver = FnResolver::new(|key| match key {
///     "too_small" => Some("Zu kurz! Mindestens {minimum} Zeichen.".into()),
///     _ => None,
/// });
///
/// let err = zodkit::string().min(3).parse(r#""ab""#).unwrap_err();
/// let german = translate_error(&err, &resolver);
/// assert_eq!(german.issues[0].message, "Zu kurz! Mindestens 3 Zeichen.");
/// ```
pub fn translate_error(error: &ZodError, resolver: &dyn MessageResolver) -> ZodError {
    ZodError::new(
        error
            .issues
            .iter()
            .map(|i| translate_issue(i, resolver))
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Default English wording
// ---------------------------------------------------------------------------

fn sizing_unit(origin: &str) -> Option<&'static str> {
    match origin {
        "string" => Some("characters"),
        "array" | "set" => Some("items"),
        "map" | "record" | "object" => Some("entries"),
        "bytes" => Some("bytes"),
        _ => None,
    }
}

fn format_noun(format: &str) -> &str {
    match format {
        "regex" => "input",
        "email" => "email address",
        "url" => "URL",
        "emoji" => "emoji",
        "uuid" => "UUID",
        "guid" => "GUID",
        "nanoid" => "nanoid",
        "cuid2" => "cuid2",
        "ulid" => "ULID",
        "datetime" => "ISO datetime",
        "date" => "ISO date",
        "time" => "ISO time",
        "duration" => "ISO duration",
        "ipv4" => "IPv4 address",
        "ipv6" => "IPv6 address",
        "cidrv4" => "IPv4 range",
        "cidrv6" => "IPv6 range",
        "mac" => "MAC address",
        "base64" => "base64-encoded string",
        "base64url" => "base64url-encoded string",
        "json_string" => "JSON string",
        "e164" => "E.164 number",
        "jwt" => "JWT",
        "hostname" => "hostname",
        "lowercase" => "lowercase string",
        "uppercase" => "uppercase string",
        other => other,
    }
}

fn bound_message(prefix: &str, bound: f64, d: &IssueDetails, small: bool) -> String {
    let origin = d.origin.as_deref().unwrap_or("value");
    let adj = match (d.exact, small, d.inclusive) {
        (true, _, _) => "exactly ",
        (false, true, true) => ">=",
        (false, true, false) => ">",
        (false, false, true) => "<=",
        (false, false, false) => "<",
    };
    match sizing_unit(origin) {
        Some(unit) => format!(
            "{}: expected {} to have {}{} {}",
            prefix, origin, adj, bound, unit
        ),
        None => format!("{}: expected {} to be {}{}", prefix, origin, adj, bound),
    }
}

fn join_values(values: &[Value], sep: &str) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(sep)
}

/// Built-in English message for a raw issue.
pub fn default_message(issue: &RawIssue) -> String {
    let d = &issue.details;
    match issue.code {
        IssueCode::InvalidType => format!(
            "Invalid input: expected {}, received {}",
            issue.expected.as_deref().unwrap_or("unknown"),
            issue.received.as_deref().unwrap_or("unknown")
        ),
        IssueCode::TooSmall => bound_message("Too small", d.minimum.unwrap_or(0.0), d, true),
        IssueCode::TooBig => bound_message("Too big", d.maximum.unwrap_or(0.0), d, false),
        IssueCode::InvalidFormat => {
            let pattern = d.pattern.as_deref().unwrap_or("");
            match d.format.as_deref().unwrap_or("") {
                "starts_with" => format!("Invalid string: must start with \"{}\"", pattern),
                "ends_with" => format!("Invalid string: must end with \"{}\"", pattern),
                "includes" => format!("Invalid string: must include \"{}\"", pattern),
                "regex" => format!("Invalid string: must match pattern {}", pattern),
                other => format!("Invalid {}", format_noun(other)),
            }
        }
        IssueCode::NotMultipleOf => format!(
            "Invalid number: must be a multiple of {}",
            d.divisor.unwrap_or(1.0)
        ),
        IssueCode::UnrecognizedKeys => {
            let keys: Vec<String> = issue.keys.iter().map(|k| format!("\"{}\"", k)).collect();
            let plural = if issue.keys.len() > 1 { "s" } else { "" };
            format!("Unrecognized key{}: {}", plural, keys.join(", "))
        }
        IssueCode::InvalidKey => {
            format!("Invalid key in {}", d.origin.as_deref().unwrap_or("record"))
        }
        IssueCode::InvalidElement => {
            format!("Invalid value in {}", d.origin.as_deref().unwrap_or("collection"))
        }
        IssueCode::InvalidValue => match issue.options.as_slice() {
            [single] => format!("Invalid input: expected {}", single),
            options => format!("Invalid option: expected one of {}", join_values(options, "|")),
        },
        IssueCode::InvalidUnion | IssueCode::Custom => "Invalid input".to_string(),
        IssueCode::IncompatibleTypes => "Invalid input: values cannot be merged".to_string(),
        IssueCode::MissingDiscriminator => format!(
            "Missing required discriminator field: {}",
            d.discriminator.as_deref().unwrap_or("")
        ),
    }
}

// ---------------------------------------------------------------------------
// Bundled locales
// ---------------------------------------------------------------------------

fn resolver_from(pairs: &[(&str, &str)]) -> MapResolver {
    MapResolver::new(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    )
}

/// Short English templates, a base for [`MapResolver::set`] overrides.
pub fn english() -> MapResolver {
    resolver_from(&[
        ("invalid_type", "Expected {expected}, received {received}"),
        ("too_small", "Value must be at least {minimum}"),
        ("too_big", "Value must be at most {maximum}"),
        ("invalid_format", "Invalid {format}"),
        ("invalid_value", "Expected one of {options}"),
        ("not_multiple_of", "Must be a multiple of {divisor}"),
        ("unrecognized_keys", "Unrecognized keys: {keys}"),
        ("missing_discriminator", "Missing discriminator field {discriminator}"),
        ("custom", "Invalid input"),
    ])
}

/// Russian templates.
pub fn russian() -> MapResolver {
    resolver_from(&[
        ("invalid_type", "Ожидалось {expected}, получено {received}"),
        ("too_small", "Значение должно быть не менее {minimum}"),
        ("too_big", "Значение должно быть не более {maximum}"),
        ("invalid_format", "Некорректный формат ({format})"),
        ("invalid_value", "Ожидалось одно из {options}"),
        ("not_multiple_of", "Число должно быть кратно {divisor}"),
        ("unrecognized_keys", "Неизвестные ключи: {keys}"),
        ("missing_discriminator", "Отсутствует поле {discriminator}"),
        ("custom", "Некорректное значение"),
    ])
}

/// German templates.
pub fn german() -> MapResolver {
    resolver_from(&[
        ("invalid_type", "{expected} erwartet, {received} erhalten"),
        ("too_small", "Wert muss mindestens {minimum} sein"),
        ("too_big", "Wert darf höchstens {maximum} sein"),
        ("invalid_format", "Ungültiges Format ({format})"),
        ("invalid_value", "Einer von {options} erwartet"),
        ("not_multiple_of", "Muss ein Vielfaches von {divisor} sein"),
        ("unrecognized_keys", "Unbekannte Schlüssel: {keys}"),
        ("missing_discriminator", "Feld {discriminator} fehlt"),
        ("custom", "Ungültige Eingabe"),
    ])
}

/// Spanish templates.
pub fn spanish() -> MapResolver {
    resolver_from(&[
        ("invalid_type", "Se esperaba {expected}, se recibió {received}"),
        ("too_small", "El valor debe ser al menos {minimum}"),
        ("too_big", "El valor debe ser como máximo {maximum}"),
        ("invalid_format", "Formato inválido ({format})"),
        ("invalid_value", "Se esperaba uno de {options}"),
        ("not_multiple_of", "Debe ser múltiplo de {divisor}"),
        ("unrecognized_keys", "Claves no reconocidas: {keys}"),
        ("missing_discriminator", "Falta el campo {discriminator}"),
        ("custom", "Entrada inválida"),
    ])
}
