use std::marker::PhantomData;

use indexmap::IndexMap;

use crate::collections::{absorb, should_stop};
use crate::config::ParseContext;
use crate::constraint::{Constraint, Required};
use crate::engine::{parse_complex, Extracted, Input, ParsePayload, Parsed, Source};
use crate::error::{IssueCode, RawIssue};
use crate::internals::Internals;
use crate::primitives::ZEnum;
use crate::schema::{SchemaRef, ZodType};
use crate::value::{ObjectMap, ToValue, Value};

/// How an object treats keys that are not part of its shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownKeys {
    /// Silently drop unknown keys (default).
    #[default]
    Strip,
    /// Reject unknown keys with a single `unrecognized_keys` issue.
    Strict,
    /// Keep unknown keys in the output unvalidated.
    Passthrough,
}

/// Object schema with named fields. Created via [`zodkit::object()`](crate::object).
///
/// Missing keys are handed to the field schema as absent, so optional fields
/// and defaults behave as they do at the top level. Field issues get the
/// field name prepended to their path and accumulate.
///
/// # Example
/// ```
/// use zodkit::prelude::*;
///
/// let user = zodkit::object()
///     .field("name", zodkit::string().min(2))
///     .field("age", zodkit::int().non_negative().optional());
///
/// let out = user.parse(r#"{"name": "Alex", "extra": true}"#).unwrap();
/// assert_eq!(out.get("name"), Some(&Value::from("Alex")));
/// assert!(!out.contains_key("extra"));
///
/// let err = user.parse(r#"{"name": "A", "age": -1}"#).unwrap_err();
/// assert_eq!(err.issues.len(), 2);
/// assert_eq!(err.issues[1].path_string(), ".age");
/// ```
#[derive(Clone)]
pub struct ZObject<C: Constraint = Required> {
    pub(crate) internals: Internals<ObjectMap>,
    shape: IndexMap<String, SchemaRef>,
    unknown: UnknownKeys,
    catchall: Option<SchemaRef>,
    pub(crate) _mode: PhantomData<C>,
}

zod_schema!(ZObject [], base = ObjectMap, fields = [shape, unknown, catchall]);

impl ZObject<Required> {
    pub fn new() -> Self {
        Self {
            internals: Internals::new("object"),
            shape: IndexMap::new(),
            unknown: UnknownKeys::Strip,
            catchall: None,
            _mode: PhantomData,
        }
    }
}

impl Default for ZObject<Required> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Constraint> ZObject<C> {
    fn run(&self, source: Source<'_, ObjectMap>, ctx: &ParseContext) -> Parsed<C::Out<ObjectMap>> {
        parse_complex::<ObjectMap, C, _>(&self.internals, source, ctx, |input, ctx| {
            let (mut map, raw) = match input {
                Input::Owned(map) => (map, None),
                Input::Raw(Some(raw)) => match raw.as_object() {
                    Some(obj) => (obj.clone(), Some(raw)),
                    None => return Extracted::Mismatch,
                },
                Input::Raw(None) => return Extracted::Mismatch,
            };
            self.parse_map(&mut map, raw, ctx)
        })
    }

    /// Validate `map` in place: shape fields first, then unknown keys.
    fn parse_map(
        &self,
        map: &mut ObjectMap,
        raw: Option<&Value>,
        ctx: &ParseContext,
    ) -> Extracted<ObjectMap> {
        let mut issues = Vec::new();
        for (name, schema) in &self.shape {
            let input = map.get(name);
            let present = input.is_some();
            let parsed = schema.parse_input(input, ctx);
            match parsed.value {
                // An absent optional field stays absent.
                Some(Value::Null) if !present => {}
                Some(value) => {
                    map.insert(name.clone(), value);
                }
                None => {}
            }
            absorb(&mut issues, parsed.issues, name.as_str());
            if should_stop(&issues, ctx) {
                return Extracted::Failed(issues);
            }
        }

        let unknown: Vec<String> = map
            .keys()
            .filter(|k| !self.shape.contains_key(*k))
            .cloned()
            .collect();
        if unknown.is_empty() {
            return Extracted::from_parts(std::mem::take(map), issues);
        }

        if let Some(catchall) = &self.catchall {
            for key in unknown {
                let parsed = catchall.parse_input(map.get(&key), ctx);
                if let Some(value) = parsed.value {
                    map.insert(key.clone(), value);
                }
                absorb(&mut issues, parsed.issues, key);
                if should_stop(&issues, ctx) {
                    break;
                }
            }
            return Extracted::from_parts(std::mem::take(map), issues);
        }

        match self.unknown {
            UnknownKeys::Passthrough => Extracted::from_parts(std::mem::take(map), issues),
            UnknownKeys::Strip => {
                map.retain(|k, _| self.shape.contains_key(k));
                Extracted::from_parts(std::mem::take(map), issues)
            }
            UnknownKeys::Strict => {
                map.retain(|k, _| self.shape.contains_key(k));
                let shape_issue = RawIssue::new(IssueCode::UnrecognizedKeys, raw).keys(unknown);
                if !issues.is_empty() {
                    issues.push(shape_issue);
                    return Extracted::Failed(issues);
                }
                // The value travels with the issue so an intersection can
                // discard keys the other side accepted.
                Extracted::Ok(ParsePayload {
                    value: std::mem::take(map),
                    issues: vec![shape_issue],
                })
            }
        }
    }

    /// Add (or replace) a field.
    pub fn field<S>(mut self, name: impl Into<String>, schema: S) -> Self
    where
        S: ZodType + 'static,
        S::Output: ToValue,
    {
        self.internals = self.internals.fork();
        self.shape.insert(name.into(), schema.into_dyn());
        self
    }

    /// Add a field that is already type-erased.
    pub fn field_dyn(mut self, name: impl Into<String>, schema: SchemaRef) -> Self {
        self.internals = self.internals.fork();
        self.shape.insert(name.into(), schema);
        self
    }

    fn derive(&self, f: impl FnOnce(&mut Self)) -> Self {
        let mut next = self.clone();
        next.internals = self.internals.fork();
        f(&mut next);
        next
    }

    /// Reject unknown keys.
    pub fn strict(&self) -> Self {
        self.derive(|o| o.unknown = UnknownKeys::Strict)
    }

    /// Drop unknown keys.
    pub fn strip(&self) -> Self {
        self.derive(|o| o.unknown = UnknownKeys::Strip)
    }

    /// Keep unknown keys as-is.
    pub fn passthrough(&self) -> Self {
        self.derive(|o| o.unknown = UnknownKeys::Passthrough)
    }

    /// Validate every unknown key with `schema`. Takes precedence over the
    /// unknown-key mode.
    pub fn catchall<S>(&self, schema: S) -> Self
    where
        S: ZodType + 'static,
        S::Output: ToValue,
    {
        let schema = schema.into_dyn();
        self.derive(|o| o.catchall = Some(schema))
    }

    /// Add fields from another shape, overriding existing ones.
    pub fn extend<M: Constraint>(&self, other: &ZObject<M>) -> Self {
        self.derive(|o| {
            for (name, schema) in &other.shape {
                o.shape.insert(name.clone(), schema.clone());
            }
        })
    }

    /// Like [`extend`](Self::extend), also taking the other object's
    /// unknown-key handling.
    pub fn merge<M: Constraint>(&self, other: &ZObject<M>) -> Self {
        let mut merged = self.extend(other);
        merged.unknown = other.unknown;
        merged.catchall = other.catchall.clone().or(merged.catchall);
        merged
    }

    /// Keep only the named fields.
    pub fn pick(&self, names: &[&str]) -> Self {
        self.derive(|o| o.shape.retain(|k, _| names.contains(&k.as_str())))
    }

    /// Drop the named fields.
    pub fn omit(&self, names: &[&str]) -> Self {
        self.derive(|o| o.shape.retain(|k, _| !names.contains(&k.as_str())))
    }

    /// Make every field optional.
    pub fn partial(&self) -> Self {
        self.derive(|o| {
            for schema in o.shape.values_mut() {
                *schema = PartialField(schema.clone()).into_dyn();
            }
        })
    }

    /// Make the named fields optional.
    pub fn partial_fields(&self, names: &[&str]) -> Self {
        self.derive(|o| {
            for (name, schema) in o.shape.iter_mut() {
                if names.contains(&name.as_str()) {
                    *schema = PartialField(schema.clone()).into_dyn();
                }
            }
        })
    }

    /// Reject nil for every field with `expected = "nonOptional"`.
    pub fn required(&self) -> Self {
        self.derive(|o| {
            for schema in o.shape.values_mut() {
                *schema = RequiredField(schema.clone()).into_dyn();
            }
        })
    }

    /// Enum schema over the field names. An object without fields yields an
    /// enum that rejects every input.
    pub fn keyof(&self) -> ZEnum<String> {
        ZEnum::new(self.shape.keys().map(|k| (k.clone(), k.clone())).collect())
    }

    pub fn shape(&self) -> &IndexMap<String, SchemaRef> {
        &self.shape
    }

    pub fn field_schema(&self, name: &str) -> Option<&SchemaRef> {
        self.shape.get(name)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.shape.keys().map(String::as_str).collect()
    }

    pub fn unknown_keys(&self) -> UnknownKeys {
        self.unknown
    }

    pub fn catchall_schema(&self) -> Option<&SchemaRef> {
        self.catchall.as_ref()
    }
}

/// Field made optional by [`ZObject::partial`].
///
/// Nil input runs the inner schema so defaults still apply; if the inner
/// schema rejects nil the field yields null instead.
struct PartialField(SchemaRef);

impl ZodType for PartialField {
    type Output = Value;

    fn parse_input(&self, input: Option<&Value>, ctx: &ParseContext) -> Parsed<Value> {
        let parsed = self.0.parse_input(input, ctx);
        match input {
            None | Some(Value::Null) if !parsed.is_ok() => Parsed::ok(Value::Null),
            _ => parsed,
        }
    }

    fn literal_values(&self) -> Option<Vec<Value>> {
        self.0.literal_values()
    }
}

/// Field made mandatory by [`ZObject::required`].
struct RequiredField(SchemaRef);

impl ZodType for RequiredField {
    type Output = Value;

    fn parse_input(&self, input: Option<&Value>, ctx: &ParseContext) -> Parsed<Value> {
        let nil = input.map_or(true, Value::is_null);
        let parsed = self.0.parse_input(input, ctx);
        if nil && parsed.issues.is_empty() && matches!(parsed.value, None | Some(Value::Null)) {
            return Parsed::fail(vec![RawIssue::invalid_type("nonOptional", input)]);
        }
        parsed
    }

    fn literal_values(&self) -> Option<Vec<Value>> {
        self.0.literal_values()
    }
}
