use std::marker::PhantomData;

use crate::checks::{self, Numeric};
use crate::config::ParseContext;
use crate::constraint::{Constraint, Required};
use crate::engine::{parse_primitive, Parsed, Source};
use crate::error::ErrorMap;
use crate::internals::Internals;
use crate::schema::ZodSchema;

/// Schema for numbers of base type `N`.
///
/// Integer schemas reject fractional and out-of-range input at extraction,
/// float schemas reject NaN and infinities; both report `invalid_type`.
/// Created via [`zodkit::int()`](crate::int), [`zodkit::number()`](crate::number)
/// and the sized constructors.
///
/// # Example
/// ```
/// use zodkit::prelude::*;
///
/// let age = zodkit::uint8().max(150);
/// assert_eq!(age.parse("42").unwrap(), 42u8);
/// assert!(age.parse("256").is_err());
/// assert!(zodkit::int().parse("1.5").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ZNumber<N, C: Constraint = Required> {
    pub(crate) internals: Internals<N>,
    pub(crate) _mode: PhantomData<C>,
}

zod_schema!(ZNumber [N], base = N, fields = [], where N: Numeric);

impl<N: Numeric> ZNumber<N, Required> {
    pub fn new() -> Self {
        Self {
            internals: Internals::new(N::TYPE_CODE),
            _mode: PhantomData,
        }
    }
}

impl<N: Numeric> Default for ZNumber<N, Required> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Numeric, C: Constraint> ZNumber<N, C> {
    fn run(&self, source: Source<'_, N>, ctx: &ParseContext) -> Parsed<C::Out<N>> {
        parse_primitive::<N, C>(&self.internals, source, ctx, N::extract, N::coerce)
    }

    pub fn gt(self, bound: N) -> Self {
        self.check(checks::gt(bound))
    }

    pub fn gt_msg(self, bound: N, error: impl Into<ErrorMap>) -> Self {
        self.check(checks::gt(bound).error(error))
    }

    pub fn gte(self, bound: N) -> Self {
        self.check(checks::gte(bound))
    }

    pub fn gte_msg(self, bound: N, error: impl Into<ErrorMap>) -> Self {
        self.check(checks::gte(bound).error(error))
    }

    pub fn lt(self, bound: N) -> Self {
        self.check(checks::lt(bound))
    }

    pub fn lt_msg(self, bound: N, error: impl Into<ErrorMap>) -> Self {
        self.check(checks::lt(bound).error(error))
    }

    pub fn lte(self, bound: N) -> Self {
        self.check(checks::lte(bound))
    }

    pub fn lte_msg(self, bound: N, error: impl Into<ErrorMap>) -> Self {
        self.check(checks::lte(bound).error(error))
    }

    /// Alias of [`gte`](Self::gte).
    pub fn min(self, bound: N) -> Self {
        self.gte(bound)
    }

    pub fn min_msg(self, bound: N, error: impl Into<ErrorMap>) -> Self {
        self.gte_msg(bound, error)
    }

    /// Alias of [`lte`](Self::lte).
    pub fn max(self, bound: N) -> Self {
        self.lte(bound)
    }

    pub fn max_msg(self, bound: N, error: impl Into<ErrorMap>) -> Self {
        self.lte_msg(bound, error)
    }

    /// `> 0`
    pub fn positive(self) -> Self {
        self.gt(N::default())
    }

    /// `< 0`
    pub fn negative(self) -> Self {
        self.lt(N::default())
    }

    /// `>= 0`
    pub fn non_negative(self) -> Self {
        self.gte(N::default())
    }

    /// `<= 0`
    pub fn non_positive(self) -> Self {
        self.lte(N::default())
    }

    pub fn multiple_of(self, divisor: N) -> Self {
        self.check(checks::multiple_of(divisor))
    }

    pub fn multiple_of_msg(self, divisor: N, error: impl Into<ErrorMap>) -> Self {
        self.check(checks::multiple_of(divisor).error(error))
    }

    /// Alias of [`multiple_of`](Self::multiple_of).
    pub fn step(self, step: N) -> Self {
        self.multiple_of(step)
    }
}
