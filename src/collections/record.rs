use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;

use super::{parse_entry, should_stop, ValueIssues};
use crate::config::ParseContext;
use crate::constraint::{Constraint, Required};
use crate::engine::{parse_complex, Extracted, Input, Parsed, Source};
use crate::internals::Internals;
use crate::schema::{ZodSchema, ZodType};
use crate::value::{ToValue, Value};

/// Object with uniform keys and values. Created via [`zodkit::record()`](crate::record).
///
/// Keys are parsed as strings by the key schema; a rejected key is reported
/// as `invalid_key` at that key. Value issues keep their own codes and get
/// the key prepended to their path.
///
/// # Example
/// ```
/// use zodkit::prelude::*;
///
/// let scores = zodkit::record(zodkit::string().min(2), zodkit::int().positive());
/// let result = scores.parse(r#"{"ab": 1, "cd": 2}"#).unwrap();
/// assert_eq!(result.get("ab"), Some(&1));
///
/// let err = scores.parse(r#"{"x": 1}"#).unwrap_err();
/// assert_eq!(err.issues[0].code.key(), "invalid_key");
/// ```
pub struct ZRecord<K: ZodType, V: ZodType, C: Constraint = Required> {
    pub(crate) internals: Internals<HashMap<K::Output, V::Output>>,
    key: K,
    value: V,
    pub(crate) _mode: PhantomData<C>,
}

zod_schema!(
    ZRecord [K, V],
    base = HashMap<K::Output, V::Output>,
    fields = [key, value],
    where
        K: ZodType + Clone,
        K::Output: Eq + Hash + ToValue + Send + Sync + 'static,
        V: ZodType + Clone,
        V::Output: ToValue + Send + Sync + 'static
);

impl<K: ZodType + Clone, V: ZodType + Clone, C: Constraint> Clone for ZRecord<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            internals: self.internals.clone(),
            key: self.key.clone(),
            value: self.value.clone(),
            _mode: PhantomData,
        }
    }
}

impl<K, V> ZRecord<K, V, Required>
where
    K: ZodType + Clone,
    K::Output: Eq + Hash + ToValue + Send + Sync + 'static,
    V: ZodType + Clone,
    V::Output: ToValue + Send + Sync + 'static,
{
    pub fn new(key: K, value: V) -> Self {
        Self {
            internals: Internals::new("record"),
            key,
            value,
            _mode: PhantomData,
        }
    }
}

impl<K, V, C> ZRecord<K, V, C>
where
    K: ZodType + Clone,
    K::Output: Eq + Hash + ToValue + Send + Sync + 'static,
    V: ZodType + Clone,
    V::Output: ToValue + Send + Sync + 'static,
    C: Constraint,
{
    #[allow(clippy::type_complexity)]
    fn run(
        &self,
        source: Source<'_, HashMap<K::Output, V::Output>>,
        ctx: &ParseContext,
    ) -> Parsed<C::Out<HashMap<K::Output, V::Output>>> {
        parse_complex::<_, C, _>(&self.internals, source, ctx, |input, ctx| {
            let mut issues = Vec::new();
            let out = match input {
                Input::Owned(mut map) => {
                    let entries: Vec<_> = map.drain().collect();
                    for (k, v) in entries {
                        let (k, v) = (k.to_value(), v.to_value());
                        if let Some((k, v)) = self.entry((&k, &v), &mut issues, ctx) {
                            map.insert(k, v);
                        }
                        if should_stop(&issues, ctx) {
                            break;
                        }
                    }
                    map
                }
                Input::Raw(Some(Value::Object(obj))) => {
                    let mut map = HashMap::with_capacity(obj.len());
                    for (k, v) in obj {
                        let k = Value::String(k.clone());
                        if let Some((k, v)) = self.entry((&k, v), &mut issues, ctx) {
                            map.insert(k, v);
                        }
                        if should_stop(&issues, ctx) {
                            break;
                        }
                    }
                    map
                }
                Input::Raw(_) => return Extracted::Mismatch,
            };
            Extracted::from_parts(out, issues)
        })
    }

    fn entry(
        &self,
        pair: (&Value, &Value),
        issues: &mut Vec<crate::error::RawIssue>,
        ctx: &ParseContext,
    ) -> Option<(K::Output, V::Output)> {
        parse_entry(
            &self.key,
            &self.value,
            pair,
            "record",
            ValueIssues::Propagate,
            issues,
            ctx,
        )
    }

    pub fn key_schema(&self) -> &K {
        &self.key
    }

    pub fn value_schema(&self) -> &V {
        &self.value
    }

    size_methods!("entries");
}
