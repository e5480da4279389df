use std::marker::PhantomData;

use crate::checks::{self, IsoDatetimeOptions, NormalizeForm, StringFormat};
use crate::coerce::Coercible;
use crate::config::ParseContext;
use crate::constraint::{Constraint, Required};
use crate::engine::{parse_primitive, Parsed, Source};
use crate::error::ErrorMap;
use crate::internals::Internals;
use crate::schema::ZodSchema;
use crate::value::Value;

/// Schema for string validation. Created via [`zodkit::string()`](crate::string).
///
/// Length bounds count characters, not bytes. `lowercase`/`uppercase` are
/// checks; `trim`, `to_lower_case`, `to_upper_case`, `normalize` and
/// `slugify` rewrite the value for the checks that follow them.
///
/// # Example
/// ```
/// use zodkit::prelude::*;
///
/// let schema = zodkit::string().trim().min(3).max(20).email();
/// assert_eq!(schema.parse(r#"" ann@example.com ""#).unwrap(), "ann@example.com");
/// ```
#[derive(Debug, Clone)]
pub struct ZString<C: Constraint = Required> {
    pub(crate) internals: Internals<String>,
    pub(crate) _mode: PhantomData<C>,
}

zod_schema!(ZString [], base = String, fields = []);

fn extract_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

macro_rules! format_methods {
    ($($(#[$doc:meta])* $name:ident / $msg:ident => $format:expr;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(self) -> Self {
                self.check(checks::format($format))
            }

            pub fn $msg(self, error: impl Into<ErrorMap>) -> Self {
                self.check(checks::format($format).error(error))
            }
        )*
    };
}

impl ZString<Required> {
    pub fn new() -> Self {
        Self {
            internals: Internals::new("string"),
            _mode: PhantomData,
        }
    }
}

impl Default for ZString<Required> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Constraint> ZString<C> {
    fn run(&self, source: Source<'_, String>, ctx: &ParseContext) -> Parsed<C::Out<String>> {
        parse_primitive::<String, C>(
            &self.internals,
            source,
            ctx,
            extract_string,
            String::coerce_from,
        )
    }

    /// Minimum length in characters (inclusive).
    pub fn min(self, len: usize) -> Self {
        self.check(checks::min_length(len))
    }

    pub fn min_msg(self, len: usize, error: impl Into<ErrorMap>) -> Self {
        self.check(checks::min_length(len).error(error))
    }

    /// Maximum length in characters (inclusive).
    pub fn max(self, len: usize) -> Self {
        self.check(checks::max_length(len))
    }

    pub fn max_msg(self, len: usize, error: impl Into<ErrorMap>) -> Self {
        self.check(checks::max_length(len).error(error))
    }

    /// Exact length in characters.
    pub fn length(self, len: usize) -> Self {
        self.check(checks::length(len))
    }

    pub fn length_msg(self, len: usize, error: impl Into<ErrorMap>) -> Self {
        self.check(checks::length(len).error(error))
    }

    /// At least one character.
    pub fn non_empty(self) -> Self {
        self.min(1)
    }

    pub fn non_empty_msg(self, error: impl Into<ErrorMap>) -> Self {
        self.min_msg(1, error)
    }

    /// Must match the given regex.
    ///
    /// Requires the `regex` feature.
    #[cfg(feature = "regex")]
    pub fn regex(self, re: regex_lite::Regex) -> Self {
        self.check(checks::regex(re))
    }

    #[cfg(feature = "regex")]
    pub fn regex_msg(self, re: regex_lite::Regex, error: impl Into<ErrorMap>) -> Self {
        self.check(checks::regex(re).error(error))
    }

    pub fn starts_with(self, prefix: impl Into<String>) -> Self {
        self.check(checks::starts_with(prefix))
    }

    pub fn starts_with_msg(self, prefix: impl Into<String>, error: impl Into<ErrorMap>) -> Self {
        self.check(checks::starts_with(prefix).error(error))
    }

    pub fn ends_with(self, suffix: impl Into<String>) -> Self {
        self.check(checks::ends_with(suffix))
    }

    pub fn ends_with_msg(self, suffix: impl Into<String>, error: impl Into<ErrorMap>) -> Self {
        self.check(checks::ends_with(suffix).error(error))
    }

    pub fn includes(self, needle: impl Into<String>) -> Self {
        self.check(checks::includes(needle))
    }

    pub fn includes_msg(self, needle: impl Into<String>, error: impl Into<ErrorMap>) -> Self {
        self.check(checks::includes(needle).error(error))
    }

    /// No uppercase characters.
    pub fn lowercase(self) -> Self {
        self.check(checks::lowercase())
    }

    pub fn lowercase_msg(self, error: impl Into<ErrorMap>) -> Self {
        self.check(checks::lowercase().error(error))
    }

    /// No lowercase characters.
    pub fn uppercase(self) -> Self {
        self.check(checks::uppercase())
    }

    pub fn uppercase_msg(self, error: impl Into<ErrorMap>) -> Self {
        self.check(checks::uppercase().error(error))
    }

    format_methods! {
        email / email_msg => StringFormat::Email;
        url / url_msg => StringFormat::Url;
        /// RFC 9562 UUID (versions 1-8, plus nil and max).
        uuid / uuid_msg => StringFormat::Uuid;
        /// Any 8-4-4-4-12 hex identifier.
        guid / guid_msg => StringFormat::Guid;
        base64 / base64_msg => StringFormat::Base64;
        base64url / base64url_msg => StringFormat::Base64Url;
        hostname / hostname_msg => StringFormat::Hostname;
        cuid2 / cuid2_msg => StringFormat::Cuid2;
        ulid / ulid_msg => StringFormat::Ulid;
        nanoid / nanoid_msg => StringFormat::Nanoid;
        emoji / emoji_msg => StringFormat::Emoji;
        e164 / e164_msg => StringFormat::E164;
        ipv4 / ipv4_msg => StringFormat::Ipv4;
        ipv6 / ipv6_msg => StringFormat::Ipv6;
        cidrv4 / cidrv4_msg => StringFormat::CidrV4;
        cidrv6 / cidrv6_msg => StringFormat::CidrV6;
        /// Six colon-separated hex octets.
        mac / mac_msg => StringFormat::Mac { delimiter: ':' };
        jwt / jwt_msg => StringFormat::Jwt { alg: None };
        /// Parses as JSON.
        json / json_msg => StringFormat::Json;
        iso_date / iso_date_msg => StringFormat::Date;
        iso_time / iso_time_msg => StringFormat::Time { precision: None };
        iso_datetime / iso_datetime_msg => StringFormat::Datetime(IsoDatetimeOptions::default());
        iso_duration / iso_duration_msg => StringFormat::Duration;
    }

    /// MAC address with a custom octet delimiter.
    pub fn mac_with(self, delimiter: char) -> Self {
        self.check(checks::format(StringFormat::Mac { delimiter }))
    }

    /// JWT whose header `alg` must equal `alg`.
    pub fn jwt_alg(self, alg: impl Into<String>) -> Self {
        self.check(checks::format(StringFormat::Jwt {
            alg: Some(alg.into()),
        }))
    }

    /// Trim surrounding whitespace.
    pub fn trim(self) -> Self {
        self.overwrite(|s: &String| s.trim().to_string())
    }

    pub fn to_lower_case(self) -> Self {
        self.overwrite(|s: &String| s.to_lowercase())
    }

    pub fn to_upper_case(self) -> Self {
        self.overwrite(|s: &String| s.to_uppercase())
    }

    /// Unicode normalization.
    pub fn normalize(self, form: NormalizeForm) -> Self {
        self.overwrite(move |s: &String| form.apply(s))
    }

    /// Lowercase, ASCII-alphanumeric words joined by `-`.
    pub fn slugify(self) -> Self {
        self.overwrite(|s: &String| slugify(s))
    }
}

fn slugify(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_dash = false;
    for ch in s.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch);
        } else if ch.is_whitespace() || ch == '-' {
            pending_dash = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("  Hello,  World -- again! "), "hello-world-again");
        assert_eq!(slugify("---"), "");
        assert_eq!(slugify("snake_case Name"), "snake_case-name");
    }
}
