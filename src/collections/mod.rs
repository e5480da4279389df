use crate::config::ParseContext;
use crate::error::{IssueCode, PathSegment, RawIssue};
use crate::schema::ZodType;
use crate::value::Value;

/// Length builders for schemas whose base type is `Sizable`.
macro_rules! size_methods {
    ($unit:literal) => {
        #[doc = concat!("Minimum number of ", $unit, " (inclusive).")]
        pub fn min(self, len: usize) -> Self {
            self.check($crate::checks::min_length(len))
        }

        pub fn min_msg(self, len: usize, error: impl Into<$crate::error::ErrorMap>) -> Self {
            self.check($crate::checks::min_length(len).error(error))
        }

        #[doc = concat!("Maximum number of ", $unit, " (inclusive).")]
        pub fn max(self, len: usize) -> Self {
            self.check($crate::checks::max_length(len))
        }

        pub fn max_msg(self, len: usize, error: impl Into<$crate::error::ErrorMap>) -> Self {
            self.check($crate::checks::max_length(len).error(error))
        }

        #[doc = concat!("Exact number of ", $unit, ".")]
        pub fn length(self, len: usize) -> Self {
            self.check($crate::checks::length(len))
        }

        pub fn length_msg(self, len: usize, error: impl Into<$crate::error::ErrorMap>) -> Self {
            self.check($crate::checks::length(len).error(error))
        }

        /// Alias for `min(1)`.
        pub fn non_empty(self) -> Self {
            self.min(1)
        }
    };
}

mod array;
mod map;
mod record;
mod set;
mod slice;

pub use array::ZArray;
pub use map::ZMap;
pub use record::ZRecord;
pub use set::ZSet;
pub use slice::ZSlice;

/// Move child issues under `segment`, returning whether any were added.
pub(crate) fn absorb(
    into: &mut Vec<RawIssue>,
    issues: Vec<RawIssue>,
    segment: impl Into<PathSegment>,
) -> bool {
    if issues.is_empty() {
        return false;
    }
    let segment = segment.into();
    into.extend(issues.into_iter().map(|i| i.with_prefix(segment.clone())));
    true
}

/// Whether a container should stop visiting children.
pub(crate) fn should_stop(issues: &[RawIssue], ctx: &ParseContext) -> bool {
    ctx.abort_early && !issues.is_empty()
}

/// How value issues of a keyed container are reported.
#[derive(Clone, Copy)]
pub(crate) enum ValueIssues {
    /// Child issues keep their code, prefixed with the key.
    Propagate,
    /// Child issues are nested under one `invalid_element`.
    Wrap,
}

/// Parse one key/value pair of a record or map.
///
/// Key failures become an `invalid_key` issue at the key's path; `None` is
/// returned when either side produced no value.
pub(crate) fn parse_entry<K, V>(
    key_schema: &K,
    value_schema: &V,
    (key, value): (&Value, &Value),
    origin: &'static str,
    mode: ValueIssues,
    issues: &mut Vec<RawIssue>,
    ctx: &ParseContext,
) -> Option<(K::Output, V::Output)>
where
    K: ZodType,
    V: ZodType,
{
    let segment = PathSegment::Field(key.to_key());
    let parsed_key = key_schema.parse_input(Some(key), ctx);
    if !parsed_key.issues.is_empty() {
        let issue = RawIssue::new(IssueCode::InvalidKey, Some(key))
            .origin(origin)
            .nested(parsed_key.issues);
        issues.push(issue.with_prefix(segment));
        return None;
    }
    let parsed_value = value_schema.parse_input(Some(value), ctx);
    if !parsed_value.issues.is_empty() {
        match mode {
            ValueIssues::Propagate => {
                absorb(issues, parsed_value.issues, segment);
            }
            ValueIssues::Wrap => {
                let issue = RawIssue::new(IssueCode::InvalidElement, Some(value))
                    .origin(origin)
                    .nested(parsed_value.issues);
                issues.push(issue.with_prefix(segment));
            }
        }
        return None;
    }
    Some((parsed_key.value?, parsed_value.value?))
}
