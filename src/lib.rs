//! # zodkit: Zod v4 style schemas for Rust
//!
//! `zodkit` builds validators from composable schemas and parses untyped
//! input ([`Value`], JSON text, `serde_json::Value`, files) into typed output.
//! Every modifier returns a new schema, so schemas can be shared freely
//! between threads and derived from one another.
//!
//! ## Quick Start
//!
//! ```rust
//! use zodkit::prelude::*;
//!
//! let user = zodkit::object()
//!     .field("name", zodkit::string().min(2).max(50))
//!     .field("email", zodkit::string().email())
//!     .field("age", zodkit::int().gte(18).optional());
//!
//! let out = user.parse(r#"{"name": "Alex", "email": "alex@example.com"}"#).unwrap();
//! assert_eq!(out.get("name"), Some(&Value::from("Alex")));
//! assert!(out.get("age").is_none());
//!
//! let err = user.parse(r#"{"name": "A", "email": "nope"}"#).unwrap_err();
//! assert_eq!(err.issues.len(), 2);
//! ```
//!
//! Typed schemas keep their Rust types:
//!
//! ```rust
//! use zodkit::prelude::*;
//!
//! let port: u16 = zodkit::uint16().min(1024).parse("8080").unwrap();
//! let name: Option<String> = zodkit::string().optional().parse("null").unwrap();
//! assert_eq!((port, name), (8080, None));
//! ```

#[macro_use]
mod macros;

pub mod checks;
pub mod coerce;
pub mod collections;
pub mod combinators;
pub mod config;
pub mod constraint;
pub mod engine;
pub mod error;
pub mod format;
pub mod i18n;
pub mod input;
pub mod internals;
pub mod object;
pub mod primitives;
pub mod registry;
pub mod schema;
pub mod value;

pub use config::{configure, global_config, GlobalConfig, ParseContext};
pub use constraint::{Constraint, Optional, Required};
pub use error::{IssueCode, PathSegment, ZodError, ZodIssue};
pub use primitives::iso;
pub use schema::{DynSchema, SchemaRef, ZodSchema, ZodType};
pub use value::{ObjectMap, Value};

// Re-export regex_lite when the `regex` feature is enabled
#[cfg(feature = "regex")]
pub use regex_lite;

use indexmap::IndexMap;

use crate::checks::Numeric;
use crate::primitives::{IntoLiteral, LiteralValue};
use crate::value::ToValue;

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

/// Create a string schema.
pub fn string() -> primitives::ZString {
    primitives::ZString::new()
}

fn numeric<N: Numeric>() -> primitives::ZNumber<N> {
    primitives::ZNumber::new()
}

/// Create an integer schema (`i64`).
pub fn int() -> primitives::ZNumber<i64> {
    numeric()
}

/// Create an integer schema (`i8`).
pub fn int8() -> primitives::ZNumber<i8> {
    numeric()
}

/// Create an integer schema (`i16`).
pub fn int16() -> primitives::ZNumber<i16> {
    numeric()
}

/// Create an integer schema (`i32`).
pub fn int32() -> primitives::ZNumber<i32> {
    numeric()
}

/// Create an integer schema (`i64`, same as [`int`]).
pub fn int64() -> primitives::ZNumber<i64> {
    numeric()
}

/// Create an unsigned integer schema (`u64`).
pub fn uint() -> primitives::ZNumber<u64> {
    numeric()
}

/// Create an unsigned integer schema (`u8`).
pub fn uint8() -> primitives::ZNumber<u8> {
    numeric()
}

/// Create an unsigned integer schema (`u16`).
pub fn uint16() -> primitives::ZNumber<u16> {
    numeric()
}

/// Create an unsigned integer schema (`u32`).
pub fn uint32() -> primitives::ZNumber<u32> {
    numeric()
}

/// Create an unsigned integer schema (`u64`, same as [`uint`]).
pub fn uint64() -> primitives::ZNumber<u64> {
    numeric()
}

/// Create a float schema (`f32`).
pub fn float32() -> primitives::ZNumber<f32> {
    numeric()
}

/// Create a float schema (`f64`, same as [`number`]).
pub fn float64() -> primitives::ZNumber<f64> {
    numeric()
}

/// Create a number schema (`f64`).
pub fn number() -> primitives::ZNumber<f64> {
    numeric()
}

/// Create a boolean schema.
pub fn boolean() -> primitives::ZBool {
    primitives::ZBool::new()
}

/// Create a literal schema. Validates exact match.
///
/// ```
/// use zodkit::prelude::*;
///
/// assert!(zodkit::literal(3).parse("3").is_ok());
/// assert!(zodkit::literal(true).parse("false").is_err());
/// ```
pub fn literal<T: IntoLiteral>(value: T) -> primitives::ZLiteral<T::Output> {
    primitives::ZLiteral::new(vec![value.into_literal()])
}

/// Literal schema accepting any of `values`.
///
/// # Panics
/// If `values` is empty.
pub fn literals<T: IntoLiteral>(values: Vec<T>) -> primitives::ZLiteral<T::Output> {
    primitives::ZLiteral::new(values.into_iter().map(IntoLiteral::into_literal).collect())
}

/// String enum whose names are its values.
///
/// ```
/// use zodkit::prelude::*;
///
/// let color = zodkit::enumeration(&["red", "green", "blue"]);
/// assert!(color.parse(r#""red""#).is_ok());
/// assert!(color.parse(r#""purple""#).is_err());
/// ```
pub fn enumeration(variants: &[&str]) -> primitives::ZEnum<String> {
    primitives::ZEnum::new(
        variants
            .iter()
            .map(|v| (v.to_string(), v.to_string()))
            .collect(),
    )
}

/// Enum over named values of any comparable type.
///
/// ```
/// use zodkit::prelude::*;
///
/// let level = zodkit::native_enum(&[("Low", 1), ("High", 10)]);
/// assert_eq!(level.parse("10").unwrap(), 10);
/// assert!(level.parse("5").is_err());
/// ```
pub fn native_enum<T: LiteralValue>(entries: &[(&str, T)]) -> primitives::ZEnum<T> {
    primitives::ZEnum::new(
        entries
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect::<IndexMap<_, _>>(),
    )
}

/// Schema accepting every value, including nil.
pub fn any() -> primitives::ZAny {
    primitives::ZAny::new()
}

/// Like [`any`], reported as `unknown`.
pub fn unknown() -> primitives::ZAny {
    primitives::ZAny::with_code("unknown")
}

/// Fixed-length array (tuple) of element schemas.
pub fn array(items: Vec<SchemaRef>) -> collections::ZArray {
    collections::ZArray::new(items)
}

/// Tuple whose extra elements must match `rest`.
///
/// ```
/// use zodkit::prelude::*;
///
/// let args = zodkit::array_rest(vec![zodkit::string().into_dyn()], zodkit::int());
/// assert!(args.parse(r#"["sum", 1, 2, 3]"#).is_ok());
/// assert_eq!(args.parse(r#"["sum", 1, "x"]"#).unwrap_err().issues[0].path_string(), "[2]");
/// ```
pub fn array_rest<S>(items: Vec<SchemaRef>, rest: S) -> collections::ZArray
where
    S: ZodType + 'static,
    S::Output: ToValue,
{
    collections::ZArray::new(items).rest(rest.into_dyn())
}

/// Array whose elements all match `element`.
pub fn slice<S>(element: S) -> collections::ZSlice<S>
where
    S: ZodType + Clone,
    S::Output: ToValue + Send + Sync + 'static,
{
    collections::ZSlice::new(element)
}

/// Object with uniform keys and values.
pub fn record<K, V>(key: K, value: V) -> collections::ZRecord<K, V>
where
    K: ZodType + Clone,
    K::Output: Eq + std::hash::Hash + ToValue + Send + Sync + 'static,
    V: ZodType + Clone,
    V::Output: ToValue + Send + Sync + 'static,
{
    collections::ZRecord::new(key, value)
}

/// Insertion-ordered map with typed keys.
pub fn map<K, V>(key: K, value: V) -> collections::ZMap<K, V>
where
    K: ZodType + Clone,
    K::Output: Eq + std::hash::Hash + ToValue + Send + Sync + 'static,
    V: ZodType + Clone,
    V::Output: ToValue + Send + Sync + 'static,
{
    collections::ZMap::new(key, value)
}

/// Array of unique elements.
pub fn set<S>(element: S) -> collections::ZSet<S>
where
    S: ZodType + Clone,
    S::Output: Eq + std::hash::Hash + ToValue + Send + Sync + 'static,
{
    collections::ZSet::new(element)
}

/// Object schema that strips unknown keys.
pub fn object() -> object::ZObject {
    object::ZObject::new()
}

/// Object schema that rejects unknown keys.
pub fn strict_object() -> object::ZObject {
    object::ZObject::new().strict()
}

/// Object schema that keeps unknown keys.
pub fn loose_object() -> object::ZObject {
    object::ZObject::new().passthrough()
}

/// Union of type-erased options, tried in order.
pub fn union(options: Vec<SchemaRef>) -> combinators::ZUnion {
    combinators::ZUnion::new(options)
}

/// Union of objects selected by the `discriminator` field.
///
/// # Panics
/// If a branch lacks a literal discriminator or two branches share a
/// value. Use [`try_discriminated_union`] to get the error instead.
pub fn discriminated_union(
    discriminator: impl Into<String>,
    branches: Vec<object::ZObject>,
) -> combinators::ZDiscriminatedUnion {
    match combinators::ZDiscriminatedUnion::try_new(discriminator, branches) {
        Ok(schema) => schema,
        Err(err) => panic!("invalid discriminated union: {}", err),
    }
}

pub fn try_discriminated_union(
    discriminator: impl Into<String>,
    branches: Vec<object::ZObject>,
) -> Result<combinators::ZDiscriminatedUnion, error::SchemaBuildError> {
    combinators::ZDiscriminatedUnion::try_new(discriminator, branches)
}

/// Input must satisfy both schemas; outputs are merged.
pub fn intersection<A, B>(left: A, right: B) -> combinators::ZIntersection<A, B>
where
    A: ZodType,
    A::Output: ToValue,
    B: ZodType,
    B::Output: ToValue,
{
    combinators::ZIntersection::new(left, right)
}

/// Schema produced by `getter` on first use.
pub fn lazy<S, F>(getter: F) -> combinators::ZLazy
where
    F: Fn() -> S + Send + Sync + 'static,
    S: ZodType + 'static,
    S::Output: ToValue,
{
    combinators::ZLazy::new(getter)
}

/// Self-referencing schema: `getter` receives a handle to the schema being
/// defined.
pub fn recursive<S, F>(getter: F) -> combinators::ZLazy
where
    F: Fn(combinators::ZLazy) -> S + Send + Sync + 'static,
    S: ZodType + 'static,
    S::Output: ToValue,
{
    combinators::ZLazy::recursive(getter)
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Common imports for working with `zodkit`.
pub mod prelude {
    pub use crate::collections::{ZArray, ZMap, ZRecord, ZSet, ZSlice};
    pub use crate::combinators::{
        ZDiscriminatedUnion, ZIntersection, ZLazy, ZPipe, ZTransform, ZUnion,
    };
    pub use crate::config::ParseContext;
    pub use crate::constraint::{Constraint, Optional, Required};
    pub use crate::engine::RefinementContext;
    pub use crate::error::{ErrorMap, IssueCode, PathSegment, RawIssue, ZodError, ZodIssue};
    pub use crate::format::{flatten_error, prettify_error, treeify_error};
    pub use crate::input::ZodInput;
    pub use crate::object::{UnknownKeys, ZObject};
    pub use crate::primitives::{IntoLiteral, ZAny, ZBool, ZEnum, ZLiteral, ZNumber, ZString};
    pub use crate::registry::GlobalMeta;
    pub use crate::schema::{SchemaRef, ZodSchema, ZodType};
    pub use crate::value::{ObjectMap, ToValue, Value};
}
