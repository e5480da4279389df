use std::marker::PhantomData;
use std::sync::Arc;

use crate::config::ParseContext;
use crate::constraint::{Constraint, Required};
use crate::engine::{parse_complex, Extracted, Input, Parsed, RefinementContext, Source};
use crate::internals::Internals;
use crate::schema::ZodType;

/// Maps the output of a schema after it parsed successfully.
///
/// Created via [`ZodType::transform()`]. The function may report issues
/// through the [`RefinementContext`]; any reported issue fails the parse.
///
/// # Example
/// ```
/// use zodkit::prelude::*;
///
/// let len = zodkit::string().transform(|s, _| s.len());
/// assert_eq!(len.parse(r#""hello""#).unwrap(), 5);
///
/// let port = zodkit::string().transform(|s, ctx| match s.parse::<u16>() {
///     Ok(port) => port,
///     Err(_) => {
///         ctx.issue("not a port");
///         0
///     }
/// });
/// assert_eq!(port.parse(r#""x""#).unwrap_err().issues[0].message, "not a port");
/// ```
pub struct ZTransform<S, F, U, C: Constraint = Required> {
    pub(crate) internals: Internals<U>,
    inner: S,
    func: Arc<F>,
    pub(crate) _mode: PhantomData<C>,
}

zod_schema!(
    ZTransform [S, F, U],
    base = U,
    fields = [inner, func],
    where
        S: ZodType + Clone,
        F: Fn(S::Output, &mut RefinementContext<'_>) -> U + Send + Sync,
        U: Send + Sync + 'static
);

impl<S: Clone, F, U, C: Constraint> Clone for ZTransform<S, F, U, C> {
    fn clone(&self) -> Self {
        Self {
            internals: self.internals.clone(),
            inner: self.inner.clone(),
            func: Arc::clone(&self.func),
            _mode: PhantomData,
        }
    }
}

impl<S, F, U> ZTransform<S, F, U, Required> {
    pub fn new(inner: S, func: F) -> Self {
        Self {
            internals: Internals::new("transform").pass_nil(),
            inner,
            func: Arc::new(func),
            _mode: PhantomData,
        }
    }
}

impl<S, F, U, C> ZTransform<S, F, U, C>
where
    S: ZodType + Clone,
    F: Fn(S::Output, &mut RefinementContext<'_>) -> U + Send + Sync,
    U: Send + Sync + 'static,
    C: Constraint,
{
    fn run(&self, source: Source<'_, U>, ctx: &ParseContext) -> Parsed<C::Out<U>> {
        parse_complex::<U, C, _>(&self.internals, source, ctx, |input, ctx| match input {
            Input::Owned(value) => Extracted::value(value),
            Input::Raw(raw) => {
                let parsed = self.inner.parse_input(raw, ctx);
                let value = match parsed.value {
                    Some(value) if parsed.issues.is_empty() => value,
                    _ => return Extracted::Failed(parsed.issues),
                };
                let mut issues = Vec::new();
                let out = (self.func)(value, &mut RefinementContext::new(&mut issues, ctx));
                Extracted::from_parts(out, issues)
            }
        })
    }

    /// The schema whose output is transformed.
    pub fn inner_schema(&self) -> &S {
        &self.inner
    }
}
