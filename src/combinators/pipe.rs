use std::marker::PhantomData;

use crate::config::ParseContext;
use crate::constraint::{Constraint, Required};
use crate::engine::{parse_complex, Extracted, Input, ParsePayload, Parsed, Source};
use crate::internals::Internals;
use crate::schema::ZodType;
use crate::value::ToValue;

/// Chains two schemas: the output of the first is converted to a [`Value`]
/// and parsed by the second.
///
/// Created via [`ZodType::pipe()`].
///
/// [`Value`]: crate::Value
///
/// # Example
/// ```
/// use zodkit::prelude::*;
///
/// let schema = zodkit::string().trim().pipe(zodkit::coerce::int().positive());
/// assert_eq!(schema.parse(r#"" 42 ""#).unwrap(), 42);
/// assert!(schema.parse(r#""-1""#).is_err());
/// ```
pub struct ZPipe<A, B: ZodType, C: Constraint = Required> {
    pub(crate) internals: Internals<B::Output>,
    first: A,
    second: B,
    pub(crate) _mode: PhantomData<C>,
}

zod_schema!(
    ZPipe [A, B],
    base = B::Output,
    fields = [first, second],
    where
        A: ZodType + Clone,
        A::Output: ToValue,
        B: ZodType + Clone,
        B::Output: Send + Sync + 'static
);

impl<A: Clone, B: ZodType + Clone, C: Constraint> Clone for ZPipe<A, B, C> {
    fn clone(&self) -> Self {
        Self {
            internals: self.internals.clone(),
            first: self.first.clone(),
            second: self.second.clone(),
            _mode: PhantomData,
        }
    }
}

impl<A, B: ZodType> ZPipe<A, B, Required> {
    pub fn new(first: A, second: B) -> Self {
        Self {
            internals: Internals::new("pipe").pass_nil(),
            first,
            second,
            _mode: PhantomData,
        }
    }
}

impl<A, B, C> ZPipe<A, B, C>
where
    A: ZodType + Clone,
    A::Output: ToValue,
    B: ZodType + Clone,
    B::Output: Send + Sync + 'static,
    C: Constraint,
{
    fn run(&self, source: Source<'_, B::Output>, ctx: &ParseContext) -> Parsed<C::Out<B::Output>> {
        parse_complex::<B::Output, C, _>(&self.internals, source, ctx, |input, ctx| match input {
            Input::Owned(value) => Extracted::value(value),
            Input::Raw(raw) => {
                let first = self.first.parse_input(raw, ctx);
                let intermediate = match first.value {
                    Some(value) if first.issues.is_empty() => value.to_value(),
                    _ => return Extracted::Failed(first.issues),
                };
                let second = self.second.parse_input(Some(&intermediate), ctx);
                match second.value {
                    Some(value) => Extracted::Ok(ParsePayload {
                        value,
                        issues: second.issues,
                    }),
                    None => Extracted::Failed(second.issues),
                }
            }
        })
    }

    pub fn first(&self) -> &A {
        &self.first
    }

    pub fn second(&self) -> &B {
        &self.second
    }
}
