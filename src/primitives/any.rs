use std::marker::PhantomData;

use crate::config::ParseContext;
use crate::constraint::{Constraint, Required};
use crate::engine::{parse_complex, Extracted, Input, Parsed, Source};
use crate::internals::Internals;
use crate::value::Value;

/// Schema that accepts any value, nil included. Created via
/// [`zodkit::any()`](crate::any) and [`zodkit::unknown()`](crate::unknown).
///
/// A missing value parses as [`Value::Null`].
#[derive(Debug, Clone)]
pub struct ZAny<C: Constraint = Required> {
    pub(crate) internals: Internals<Value>,
    pub(crate) _mode: PhantomData<C>,
}

zod_schema!(ZAny [], base = Value, fields = []);

impl ZAny<Required> {
    pub fn new() -> Self {
        Self::with_code("any")
    }

    pub(crate) fn with_code(type_code: &'static str) -> Self {
        Self {
            internals: Internals::new(type_code).pass_nil(),
            _mode: PhantomData,
        }
    }
}

impl Default for ZAny<Required> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Constraint> ZAny<C> {
    fn run(&self, source: Source<'_, Value>, ctx: &ParseContext) -> Parsed<C::Out<Value>> {
        parse_complex::<Value, C, _>(&self.internals, source, ctx, |input, _| match input {
            Input::Owned(value) => Extracted::value(value),
            Input::Raw(raw) => Extracted::value(raw.cloned().unwrap_or(Value::Null)),
        })
    }
}
