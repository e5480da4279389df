use std::marker::PhantomData;

use indexmap::IndexMap;

use super::literal::{invalid_value, LiteralValue};
use crate::config::ParseContext;
use crate::constraint::{Constraint, Required};
use crate::engine::{parse_complex, Extracted, Input, Parsed, Source};
use crate::internals::Internals;
use crate::value::{ToValue, Value};

/// Schema for a named set of values. Created via
/// [`zodkit::enumeration()`](crate::enumeration) or
/// [`zodkit::native_enum()`](crate::native_enum).
///
/// # Example
/// ```
/// use zodkit::prelude::*;
///
/// let role = zodkit::enumeration(&["admin", "user", "moderator"]);
/// assert!(role.parse(r#""admin""#).is_ok());
/// assert!(role.parse(r#""hacker""#).is_err());
///
/// let staff = role.exclude(&["user"]);
/// assert_eq!(staff.options(), vec!["admin".to_string(), "moderator".to_string()]);
/// ```
#[derive(Debug, Clone)]
pub struct ZEnum<T, C: Constraint = Required> {
    pub(crate) internals: Internals<T>,
    entries: IndexMap<String, T>,
    pub(crate) _mode: PhantomData<C>,
}

zod_schema!(ZEnum [T], base = T, fields = [entries], where T: LiteralValue);

impl<T: LiteralValue> ZEnum<T, Required> {
    pub fn new(entries: IndexMap<String, T>) -> Self {
        let mut internals = Internals::new("enum");
        internals.values = Some(entries.values().map(ToValue::to_value).collect());
        Self {
            internals,
            entries,
            _mode: PhantomData,
        }
    }
}

impl<T: LiteralValue, C: Constraint> ZEnum<T, C> {
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
                    Extracted::Failed(vec![invalid_value(Some(&input), self.option_values())])
                }
                None => Extracted::Failed(vec![invalid_value(raw, self.option_values())]),
            }
        })
    }

    fn option_values(&self) -> Vec<Value> {
        self.entries.values().map(ToValue::to_value).collect()
    }

    pub fn contains(&self, value: &T) -> bool {
        self.entries.values().any(|v| v == value)
    }

    /// Allowed values in declaration order.
    pub fn options(&self) -> Vec<T> {
        self.entries.values().cloned().collect()
    }

    /// Name-to-value mapping.
    pub fn enum_map(&self) -> &IndexMap<String, T> {
        &self.entries
    }

    /// Sub-enum with only `keys`.
    ///
    /// # Panics
    /// When a key is not part of this enum.
    pub fn extract(&self, keys: &[&str]) -> Self {
        let entries = keys
            .iter()
            .map(|k| match self.entries.get(*k) {
                Some(v) => (k.to_string(), v.clone()),
                None => panic!("key {:?} is not part of this enum", k),
            })
            .collect();
        self.derive(entries)
    }

    /// Sub-enum without `keys`.
    ///
    /// # Panics
    /// When a key is not part of this enum.
    pub fn exclude(&self, keys: &[&str]) -> Self {
        for k in keys {
            if !self.entries.contains_key(*k) {
                panic!("key {:?} is not part of this enum", k);
            }
        }
        let entries = self
            .entries
            .iter()
            .filter(|(k, _)| !keys.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        self.derive(entries)
    }

    fn derive(&self, entries: IndexMap<String, T>) -> Self {
        let mut internals = self.internals.fork();
        internals.values = Some(entries.values().map(ToValue::to_value).collect());
        Self {
            internals,
            entries,
            _mode: PhantomData,
        }
    }
}
