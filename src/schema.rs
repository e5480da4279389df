use std::sync::Arc;

use crate::checks::{self, Check};
use crate::combinators::{ZIntersection, ZPipe, ZTransform, ZUnion};
use crate::config::ParseContext;
use crate::constraint::{Constraint, Optional, Required};
use crate::engine::{Parsed, RefinementContext};
use crate::error::{ErrorMap, ZodError};
use crate::input::ZodInput;
use crate::internals::{Internals, SchemaId};
use crate::registry::{global_registry, GlobalMeta};
use crate::value::{ToValue, Value};

/// Core parse trait.
///
/// Every validator in `zodkit` implements this trait. The associated type
/// `Output` defines what Rust type is produced after successful parsing.
///
/// # Example
/// ```
/// use zodkit::prelude::*;
///
/// let schema = zodkit::string().min(3);
/// assert!(schema.parse(r#""hello""#).is_ok());
/// ```
pub trait ZodType: Send + Sync {
    /// The Rust type produced by this schema after successful parsing.
    type Output;

    /// Run the schema. `None` means the value is absent (missing object key).
    fn parse_input(&self, input: Option<&Value>, ctx: &ParseContext) -> Parsed<Self::Output>;

    /// Closed value set, for literal-like schemas.
    fn literal_values(&self) -> Option<Vec<Value>> {
        None
    }

    /// Parse from any supported input (JSON string, file path, [`Value`], etc.)
    fn parse<I: ZodInput + ?Sized>(&self, input: &I) -> Result<Self::Output, ZodError>
    where
        Self: Sized,
    {
        self.parse_with(input, &ParseContext::default())
    }

    fn parse_with<I: ZodInput + ?Sized>(
        &self,
        input: &I,
        ctx: &ParseContext,
    ) -> Result<Self::Output, ZodError>
    where
        Self: Sized,
    {
        let value = input.to_input_value()?;
        self.parse_value_with(&value, ctx)
    }

    fn parse_value(&self, value: &Value) -> Result<Self::Output, ZodError> {
        self.parse_value_with(value, &ParseContext::default())
    }

    fn parse_value_with(&self, value: &Value, ctx: &ParseContext) -> Result<Self::Output, ZodError> {
        self.parse_input(Some(value), ctx).into_result(ctx)
    }

    /// Parse and panic with the error's `Display` on failure.
    fn must_parse<I: ZodInput + ?Sized>(&self, input: &I) -> Self::Output
    where
        Self: Sized,
    {
        match self.parse(input) {
            Ok(value) => value,
            Err(err) => panic!("{}", err),
        }
    }

    /// Parse and return the output as a dynamic [`Value`].
    fn parse_any<I: ZodInput + ?Sized>(&self, input: &I) -> Result<Value, ZodError>
    where
        Self: Sized,
        Self::Output: ToValue,
    {
        self.parse(input).map(|out| out.to_value())
    }

    /// Transform the output value after successful parsing.
    ///
    /// The closure may report issues through the [`RefinementContext`].
    fn transform<U, F>(self, f: F) -> ZTransform<Self, F, U>
    where
        Self: Sized,
        F: Fn(Self::Output, &mut RefinementContext<'_>) -> U + Send + Sync,
        U: Send + Sync + 'static,
    {
        ZTransform::new(self, f)
    }

    /// Feed this schema's output into another schema.
    fn pipe<B: ZodType>(self, next: B) -> ZPipe<Self, B>
    where
        Self: Sized,
        Self::Output: ToValue,
        B::Output: Send + Sync + 'static,
    {
        ZPipe::new(self, next)
    }

    /// Intersection: input must satisfy **both** schemas.
    fn and<B>(self, other: B) -> ZIntersection<Self, B>
    where
        Self: Sized,
        Self::Output: ToValue,
        B: ZodType,
        B::Output: ToValue,
    {
        ZIntersection::new(self, other)
    }

    /// Union: this schema **or** another.
    fn or<B>(self, other: B) -> ZUnion
    where
        Self: Sized + 'static,
        Self::Output: ToValue,
        B: ZodType + 'static,
        B::Output: ToValue,
    {
        ZUnion::new(vec![self.into_dyn(), other.into_dyn()])
    }

    /// Erase the concrete type.
    fn into_dyn(self) -> SchemaRef
    where
        Self: Sized + 'static,
        Self::Output: ToValue,
    {
        Arc::new(self)
    }
}

/// Schemas backed by [`Internals`].
///
/// Modifiers never touch the receiver's configuration in place: each one
/// forks the internals (fresh [`SchemaId`], parent recorded in the lineage)
/// and returns the new schema.
pub trait ZodSchema: ZodType + Clone + Sized {
    /// Type the schema validates before the constraint is applied.
    type Base: Send + Sync + 'static;
    /// [`Required`] or [`Optional`].
    type Mode: Constraint;
    /// The same schema under another constraint.
    type Retyped<M: Constraint>: ZodSchema<Base = Self::Base, Mode = M>;

    fn internals(&self) -> &Internals<Self::Base>;

    fn internals_mut(&mut self) -> &mut Internals<Self::Base>;

    fn retype<M: Constraint>(self) -> Self::Retyped<M>;

    /// Run the pipeline on an already-typed value (`None` is nil).
    fn parse_owned(&self, value: Option<Self::Base>, ctx: &ParseContext) -> Parsed<Self::Output>;

    fn id(&self) -> SchemaId {
        self.internals().id()
    }

    /// Fork the internals and apply `f` to the copy.
    fn modify<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut Internals<Self::Base>),
    {
        let forked = self.internals().fork();
        *self.internals_mut() = forked;
        f(self.internals_mut());
        self
    }

    /// Parse a value of the exact constrained type.
    ///
    /// When no overwrite replaces it, the returned value is the one passed in
    /// (same allocation).
    fn strict_parse(
        &self,
        value: <Self::Mode as Constraint>::Out<Self::Base>,
    ) -> Result<Self::Output, ZodError> {
        self.strict_parse_with(value, &ParseContext::default())
    }

    fn strict_parse_with(
        &self,
        value: <Self::Mode as Constraint>::Out<Self::Base>,
        ctx: &ParseContext,
    ) -> Result<Self::Output, ZodError> {
        let value = <Self::Mode as Constraint>::into_option(value);
        self.parse_owned(value, ctx).into_result(ctx)
    }

    /// Nil input yields `None`.
    fn optional(self) -> Self::Retyped<Optional> {
        self.modify(|i| {
            i.optional = true;
            i.non_optional = false;
        })
        .retype()
    }

    /// Nil input yields `None`; the null-oriented spelling of `optional`.
    fn nilable(self) -> Self::Retyped<Optional> {
        self.modify(|i| {
            i.nilable = true;
            i.non_optional = false;
        })
        .retype()
    }

    /// Both [`optional`](Self::optional) and [`nilable`](Self::nilable).
    fn nullish(self) -> Self::Retyped<Optional> {
        self.modify(|i| {
            i.optional = true;
            i.nilable = true;
            i.non_optional = false;
        })
        .retype()
    }

    /// A missing key yields `None`; an explicit null is rejected.
    fn exact_optional(self) -> Self::Retyped<Optional> {
        self.modify(|i| {
            i.exact_optional = true;
            i.optional = false;
            i.nilable = false;
            i.non_optional = false;
        })
        .retype()
    }

    /// Reject nil with `expected = "nonOptional"`.
    fn non_optional(self) -> Self::Retyped<Required> {
        self.modify(|i| {
            i.optional = false;
            i.nilable = false;
            i.exact_optional = false;
            i.non_optional = true;
        })
        .retype()
    }

    /// Value returned for nil input. Checks do not run on it.
    fn with_default(self, value: Self::Base) -> Self
    where
        Self::Base: Clone,
    {
        self.modify(|i| i.default = Some(Arc::new(move || value.clone())))
    }

    fn default_func<F>(self, f: F) -> Self
    where
        F: Fn() -> Self::Base + Send + Sync + 'static,
    {
        self.modify(|i| i.default = Some(Arc::new(f)))
    }

    /// Value substituted for nil input and then parsed like any other input.
    fn prefault(self, value: Self::Base) -> Self
    where
        Self::Base: ToValue,
    {
        let value = value.to_value();
        self.modify(|i| i.prefault = Some(Arc::new(move || value.clone())))
    }

    fn prefault_func<F>(self, f: F) -> Self
    where
        F: Fn() -> Self::Base + Send + Sync + 'static,
        Self::Base: ToValue,
    {
        self.modify(|i| i.prefault = Some(Arc::new(move || f().to_value())))
    }

    /// Add a check to the chain.
    fn check<K>(self, check: K) -> Self
    where
        K: Check<Self::Base> + 'static,
    {
        self.modify(|i| i.add_check(Arc::new(check)))
    }

    /// Custom predicate; `message` is used when it returns `false`.
    fn refine<F>(self, f: F, message: impl Into<ErrorMap>) -> Self
    where
        F: Fn(&Self::Base) -> bool + Send + Sync + 'static,
    {
        self.check(checks::refine(f).error(message))
    }

    /// Refinement that can report any number of issues.
    fn super_refine<F>(self, f: F) -> Self
    where
        F: Fn(&Self::Base, &mut RefinementContext<'_>) + Send + Sync + 'static,
    {
        self.check(checks::super_refine(f))
    }

    /// Replace the value in place; never reports issues.
    fn overwrite<F>(self, f: F) -> Self
    where
        F: Fn(&Self::Base) -> Self::Base + Send + Sync + 'static,
    {
        self.check(checks::overwrite(f))
    }

    /// Schema-level message formatter.
    fn error(self, error: impl Into<ErrorMap>) -> Self {
        let error = error.into();
        self.modify(|i| i.error = Some(error))
    }

    /// Mark extraction as coercing.
    fn coerce(self) -> Self {
        self.modify(|i| i.coerce = true)
    }

    /// Register metadata for a derived schema in the global registry.
    ///
    /// Entries live as long as the process unless released with
    /// [`forget_meta`](ZodSchema::forget_meta), so short-lived schemas that
    /// are described on every construction keep adding entries.
    fn meta(self, meta: GlobalMeta) -> Self {
        let schema = self.modify(|_| {});
        global_registry().insert(schema.id(), meta);
        schema
    }

    /// Shorthand for `meta` with only a description, keeping other metadata.
    fn describe(self, description: impl Into<String>) -> Self {
        let mut meta = self.get_meta().unwrap_or_default();
        meta.description = Some(description.into());
        self.meta(meta)
    }

    /// Metadata from the global registry, merged along the lineage.
    fn get_meta(&self) -> Option<GlobalMeta> {
        global_registry().get_with_lineage(self.internals().lineage(), self.id())
    }

    fn description(&self) -> Option<String> {
        self.get_meta().and_then(|m| m.description)
    }

    /// Drop this schema's own entry from the global registry. Ancestors'
    /// metadata is untouched and still visible through the lineage.
    fn forget_meta(&self) -> Option<GlobalMeta> {
        global_registry().remove(self)
    }
}

/// Object-safe view of a schema producing dynamic values.
///
/// Implemented for every [`ZodType`] whose output converts to [`Value`].
pub trait DynSchema: Send + Sync {
    fn parse_dyn(&self, input: Option<&Value>, ctx: &ParseContext) -> Parsed<Value>;

    fn dyn_literal_values(&self) -> Option<Vec<Value>>;
}

impl<S> DynSchema for S
where
    S: ZodType,
    S::Output: ToValue,
{
    fn parse_dyn(&self, input: Option<&Value>, ctx: &ParseContext) -> Parsed<Value> {
        self.parse_input(input, ctx).map(|out| out.to_value())
    }

    fn dyn_literal_values(&self) -> Option<Vec<Value>> {
        self.literal_values()
    }
}

/// Shared type-erased schema.
pub type SchemaRef = Arc<dyn DynSchema>;

impl ZodType for SchemaRef {
    type Output = Value;

    fn parse_input(&self, input: Option<&Value>, ctx: &ParseContext) -> Parsed<Value> {
        (**self).parse_dyn(input, ctx)
    }

    fn literal_values(&self) -> Option<Vec<Value>> {
        (**self).dyn_literal_values()
    }
}
