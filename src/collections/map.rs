use std::hash::Hash;
use std::marker::PhantomData;

use indexmap::IndexMap;

use super::{parse_entry, should_stop, ValueIssues};
use crate::config::ParseContext;
use crate::constraint::{Constraint, Required};
use crate::engine::{parse_complex, Extracted, Input, Parsed, Source};
use crate::error::RawIssue;
use crate::internals::Internals;
use crate::schema::{ZodSchema, ZodType};
use crate::value::{ToValue, Value};

/// Insertion-ordered map with typed keys. Created via [`zodkit::map()`](crate::map).
///
/// Accepts an object (keys given to the key schema as strings) or an array
/// of `[key, value]` pairs. Rejected keys are `invalid_key`, rejected values
/// `invalid_element`, both at the entry's key.
///
/// # Example
/// ```
/// use zodkit::prelude::*;
///
/// let schema = zodkit::map(zodkit::int(), zodkit::string());
/// let map = schema.parse("[[1, \"one\"], [2, \"two\"]]").unwrap();
/// assert_eq!(map.get(&1i64).map(String::as_str), Some("one"));
/// assert_eq!(map.get_index(1).map(|(k, _)| *k), Some(2));
/// ```
pub struct ZMap<K: ZodType, V: ZodType, C: Constraint = Required> {
    pub(crate) internals: Internals<IndexMap<K::Output, V::Output>>,
    key: K,
    value: V,
    pub(crate) _mode: PhantomData<C>,
}

zod_schema!(
    ZMap [K, V],
    base = IndexMap<K::Output, V::Output>,
    fields = [key, value],
    where
        K: ZodType + Clone,
        K::Output: Eq + Hash + ToValue + Send + Sync + 'static,
        V: ZodType + Clone,
        V::Output: ToValue + Send + Sync + 'static
);

impl<K: ZodType + Clone, V: ZodType + Clone, C: Constraint> Clone for ZMap<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            internals: self.internals.clone(),
            key: self.key.clone(),
            value: self.value.clone(),
            _mode: PhantomData,
        }
    }
}

impl<K, V> ZMap<K, V, Required>
where
    K: ZodType + Clone,
    K::Output: Eq + Hash + ToValue + Send + Sync + 'static,
    V: ZodType + Clone,
    V::Output: ToValue + Send + Sync + 'static,
{
    pub fn new(key: K, value: V) -> Self {
        Self {
            internals: Internals::new("map"),
            key,
            value,
            _mode: PhantomData,
        }
    }
}

/// Entries of a map-like input: object members or `[key, value]` pairs.
fn raw_entries(input: &Value) -> Option<Vec<(Value, &Value)>> {
    match input {
        Value::Object(obj) => Some(
            obj.iter()
                .map(|(k, v)| (Value::String(k.clone()), v))
                .collect(),
        ),
        Value::Array(pairs) => pairs
            .iter()
            .map(|pair| match pair.as_array().map(Vec::as_slice) {
                Some([k, v]) => Some((k.clone(), v)),
                _ => None,
            })
            .collect(),
        _ => None,
    }
}

impl<K, V, C> ZMap<K, V, C>
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
        source: Source<'_, IndexMap<K::Output, V::Output>>,
        ctx: &ParseContext,
    ) -> Parsed<C::Out<IndexMap<K::Output, V::Output>>> {
        parse_complex::<_, C, _>(&self.internals, source, ctx, |input, ctx| {
            let mut issues = Vec::new();
            let out = match input {
                Input::Owned(mut map) => {
                    let entries: Vec<_> = map.drain(..).collect();
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
                Input::Raw(Some(raw)) => {
                    let Some(entries) = raw_entries(raw) else {
                        return Extracted::Mismatch;
                    };
                    let mut map = IndexMap::with_capacity(entries.len());
                    for (k, v) in entries {
                        if let Some((k, v)) = self.entry((&k, v), &mut issues, ctx) {
                            map.insert(k, v);
                        }
                        if should_stop(&issues, ctx) {
                            break;
                        }
                    }
                    map
                }
                Input::Raw(None) => return Extracted::Mismatch,
            };
            Extracted::from_parts(out, issues)
        })
    }

    fn entry(
        &self,
        pair: (&Value, &Value),
        issues: &mut Vec<RawIssue>,
        ctx: &ParseContext,
    ) -> Option<(K::Output, V::Output)> {
        parse_entry(&self.key, &self.value, pair, "map", ValueIssues::Wrap, issues, ctx)
    }

    pub fn key_schema(&self) -> &K {
        &self.key
    }

    pub fn value_schema(&self) -> &V {
        &self.value
    }

    size_methods!("entries");
}
