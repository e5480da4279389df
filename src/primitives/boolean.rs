use std::marker::PhantomData;

use crate::coerce::Coercible;
use crate::config::ParseContext;
use crate::constraint::{Constraint, Required};
use crate::engine::{parse_primitive, Parsed, Source};
use crate::internals::Internals;
use crate::value::Value;

/// Schema for boolean validation. Created via [`zodkit::boolean()`](crate::boolean).
///
/// With [`coerce`](crate::ZodSchema::coerce) enabled:
/// - Strings: `"true"`, `"1"` → `true`; `"false"`, `"0"` → `false`
/// - Numbers: `0` → `false`; anything else → `true`
#[derive(Debug, Clone)]
pub struct ZBool<C: Constraint = Required> {
    pub(crate) internals: Internals<bool>,
    pub(crate) _mode: PhantomData<C>,
}

zod_schema!(ZBool [], base = bool, fields = []);

impl ZBool<Required> {
    pub fn new() -> Self {
        Self {
            internals: Internals::new("boolean"),
            _mode: PhantomData,
        }
    }
}

impl Default for ZBool<Required> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Constraint> ZBool<C> {
    fn run(&self, source: Source<'_, bool>, ctx: &ParseContext) -> Parsed<C::Out<bool>> {
        parse_primitive::<bool, C>(&self.internals, source, ctx, Value::as_bool, bool::coerce_from)
    }
}
