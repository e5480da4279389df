use std::fmt::Debug;
use std::marker::PhantomData;

use crate::config::ParseContext;
use crate::constraint::{Constraint, Required};
use crate::engine::{parse_complex, Extracted, Input, Parsed, Source};
use crate::error::{IssueCode, RawIssue};
use crate::internals::Internals;
use crate::value::{FromValue, ToValue, Value};

/// Comparable base types usable in literals and enums.
pub trait LiteralValue:
    Clone + PartialEq + Debug + Send + Sync + ToValue + FromValue + 'static
{
}

impl<T> LiteralValue for T where
    T: Clone + PartialEq + Debug + Send + Sync + ToValue + FromValue + 'static
{
}

/// Values accepted by [`zodkit::literal()`](crate::literal).
pub trait IntoLiteral {
    type Output: LiteralValue;

    fn into_literal(self) -> Self::Output;
}

impl IntoLiteral for &str {
    type Output = String;

    fn into_literal(self) -> String {
        self.to_string()
    }
}

macro_rules! identity_literal {
    ($($t:ty),*) => {
        $(impl IntoLiteral for $t {
            type Output = $t;

            fn into_literal(self) -> $t {
                self
            }
        })*
    };
}

identity_literal!(String, bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

/// `invalid_value` listing the allowed options.
pub(crate) fn invalid_value(input: Option<&Value>, options: Vec<Value>) -> RawIssue {
    RawIssue::new(IssueCode::InvalidValue, input).options(options)
}

/// Schema accepting one of a closed set of values.
///
/// Membership uses `PartialEq`, so a `NaN` literal never matches.
///
/// # Example
/// ```
/// use zodkit::prelude::*;
///
/// let role = zodkit::literal("admin");
/// assert_eq!(role.value(), "admin");
/// assert!(role.parse(r#""admin""#).is_ok());
/// assert!(role.parse(r#""user""#).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ZLiteral<T, C: Constraint = Required> {
    pub(crate) internals: Internals<T>,
    values: Vec<T>,
    pub(crate) _mode: PhantomData<C>,
}

zod_schema!(ZLiteral [T], base = T, fields = [values], where T: LiteralValue);

impl<T: LiteralValue> ZLiteral<T, Required> {
    /// Panics when `values` is empty.
    pub fn new(values: Vec<T>) -> Self {
        assert!(!values.is_empty(), "a literal needs at least one value");
        let mut internals = Internals::new("literal");
        internals.values = Some(values.iter().map(ToValue::to_value).collect());
        Self {
            internals,
            values,
            _mode: PhantomData,
        }
    }
}

impl<T: LiteralValue, C: Constraint> ZLiteral<T, C> {
    fn run(&self, source: Source<'_, T>, ctx: &ParseContext) -> Parsed<C::Out<T>> {
        parse_complex::<T, C, _>(&self.internals, source, ctx, |input, _| {
            let (value, raw) = match input {
                Input::Owned(value) => (Some(value), None),
                Input::Raw(raw) => (raw.and_then(T::from_value), raw),
            };
            match value {
                Some(value) if self.contains(&value) => Extracted::value(value),
                Some(value) => {
                    let input = raw.cloned().unwrap_or_else(|| value.to_value());
                    Extracted::Failed(vec![invalid_value(Some(&input), self.options_as_values())])
                }
                None => Extracted::Failed(vec![invalid_value(raw, self.options_as_values())]),
            }
        })
    }

    fn options_as_values(&self) -> Vec<Value> {
        self.values.iter().map(ToValue::to_value).collect()
    }

    /// The single literal value.
    ///
    /// # Panics
    /// When the literal was built from several values.
    pub fn value(&self) -> &T {
        match self.values.as_slice() {
            [single] => single,
            _ => panic!("value() called on a literal with {} values", self.values.len()),
        }
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn contains(&self, value: &T) -> bool {
        self.values.iter().any(|v| v == value)
    }
}
