use std::marker::PhantomData;

use super::{absorb, should_stop};
use crate::config::ParseContext;
use crate::constraint::{Constraint, Required};
use crate::engine::{parse_complex, Extracted, Input, Parsed, Source};
use crate::internals::Internals;
use crate::schema::{ZodSchema, ZodType};
use crate::value::{ToValue, Value};

/// Array whose elements all match one schema. Created via
/// [`zodkit::slice()`](crate::slice).
///
/// Every element is visited and all element issues are reported, each under
/// its index. Length bounds are ordinary checks and run once the elements
/// are valid.
///
/// # Example
/// ```
/// use zodkit::prelude::*;
///
/// let tags = zodkit::slice(zodkit::string().min(1)).min(1).max(10);
/// assert_eq!(tags.parse(r#"["a", "b"]"#).unwrap(), vec!["a", "b"]);
/// assert_eq!(tags.parse(r#"["a", ""]"#).unwrap_err().issues[0].path_string(), "[1]");
/// ```
pub struct ZSlice<S: ZodType, C: Constraint = Required> {
    pub(crate) internals: Internals<Vec<S::Output>>,
    element: S,
    pub(crate) _mode: PhantomData<C>,
}

zod_schema!(
    ZSlice [S],
    base = Vec<S::Output>,
    fields = [element],
    where S: ZodType + Clone, S::Output: ToValue + Send + Sync + 'static
);

impl<S: ZodType + Clone, C: Constraint> Clone for ZSlice<S, C> {
    fn clone(&self) -> Self {
        Self {
            internals: self.internals.clone(),
            element: self.element.clone(),
            _mode: PhantomData,
        }
    }
}

impl<S> ZSlice<S, Required>
where
    S: ZodType + Clone,
    S::Output: ToValue + Send + Sync + 'static,
{
    pub fn new(element: S) -> Self {
        Self {
            internals: Internals::new("array"),
            element,
            _mode: PhantomData,
        }
    }
}

impl<S, C> ZSlice<S, C>
where
    S: ZodType + Clone,
    S::Output: ToValue + Send + Sync + 'static,
    C: Constraint,
{
    fn run(
        &self,
        source: Source<'_, Vec<S::Output>>,
        ctx: &ParseContext,
    ) -> Parsed<C::Out<Vec<S::Output>>> {
        parse_complex::<Vec<S::Output>, C, _>(&self.internals, source, ctx, |input, ctx| {
            match input {
                Input::Owned(mut items) => {
                    let mut issues = Vec::new();
                    for (i, item) in items.iter_mut().enumerate() {
                        let parsed = self.element.parse_input(Some(&item.to_value()), ctx);
                        if let Some(value) = parsed.value {
                            *item = value;
                        }
                        absorb(&mut issues, parsed.issues, i);
                        if should_stop(&issues, ctx) {
                            break;
                        }
                    }
                    Extracted::from_parts(items, issues)
                }
                Input::Raw(Some(Value::Array(raw))) => {
                    let mut items = Vec::with_capacity(raw.len());
                    let mut issues = Vec::new();
                    for (i, item) in raw.iter().enumerate() {
                        let parsed = self.element.parse_input(Some(item), ctx);
                        if let Some(value) = parsed.value {
                            items.push(value);
                        }
                        absorb(&mut issues, parsed.issues, i);
                        if should_stop(&issues, ctx) {
                            break;
                        }
                    }
                    Extracted::from_parts(items, issues)
                }
                Input::Raw(_) => Extracted::Mismatch,
            }
        })
    }

    pub fn element(&self) -> &S {
        &self.element
    }

    size_methods!("elements");
}
