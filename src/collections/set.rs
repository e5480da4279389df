use std::collections::HashSet;
use std::hash::Hash;
use std::marker::PhantomData;

use super::should_stop;
use crate::config::ParseContext;
use crate::constraint::{Constraint, Required};
use crate::engine::{parse_complex, Extracted, Input, Parsed, Source};
use crate::error::{IssueCode, RawIssue};
use crate::internals::Internals;
use crate::schema::{ZodSchema, ZodType};
use crate::value::{ToValue, Value};

/// Array parsed into a `HashSet` of unique elements. Created via
/// [`zodkit::set()`](crate::set).
///
/// Duplicates (after parsing) are merged, and size checks see the unique
/// count. A rejected element is reported as `invalid_element` carrying the
/// element's own issues.
///
/// # Example
/// ```
/// use zodkit::prelude::*;
///
/// let schema = zodkit::set(zodkit::string().min(1)).max(2);
/// assert_eq!(schema.parse(r#"["a", "b", "a"]"#).unwrap().len(), 2);
/// assert!(schema.parse(r#"["a", "b", "c"]"#).is_err());
/// ```
pub struct ZSet<S: ZodType, C: Constraint = Required> {
    pub(crate) internals: Internals<HashSet<S::Output>>,
    element: S,
    pub(crate) _mode: PhantomData<C>,
}

zod_schema!(
    ZSet [S],
    base = HashSet<S::Output>,
    fields = [element],
    where S: ZodType + Clone, S::Output: Eq + Hash + ToValue + Send + Sync + 'static
);

impl<S: ZodType + Clone, C: Constraint> Clone for ZSet<S, C> {
    fn clone(&self) -> Self {
        Self {
            internals: self.internals.clone(),
            element: self.element.clone(),
            _mode: PhantomData,
        }
    }
}

impl<S> ZSet<S, Required>
where
    S: ZodType + Clone,
    S::Output: Eq + Hash + ToValue + Send + Sync + 'static,
{
    pub fn new(element: S) -> Self {
        Self {
            internals: Internals::new("set"),
            element,
            _mode: PhantomData,
        }
    }
}

impl<S, C> ZSet<S, C>
where
    S: ZodType + Clone,
    S::Output: Eq + Hash + ToValue + Send + Sync + 'static,
    C: Constraint,
{
    fn run(
        &self,
        source: Source<'_, HashSet<S::Output>>,
        ctx: &ParseContext,
    ) -> Parsed<C::Out<HashSet<S::Output>>> {
        parse_complex::<_, C, _>(&self.internals, source, ctx, |input, ctx| {
            let mut issues = Vec::new();
            let out = match input {
                Input::Owned(mut set) => {
                    let items: Vec<Value> = set.drain().map(|v| v.to_value()).collect();
                    for item in &items {
                        if let Some(v) = self.element_value(item, &mut issues, ctx) {
                            set.insert(v);
                        }
                        if should_stop(&issues, ctx) {
                            break;
                        }
                    }
                    set
                }
                Input::Raw(Some(Value::Array(items))) => {
                    let mut set = HashSet::with_capacity(items.len());
                    for item in items {
                        if let Some(v) = self.element_value(item, &mut issues, ctx) {
                            set.insert(v);
                        }
                        if should_stop(&issues, ctx) {
                            break;
                        }
                    }
                    set
                }
                Input::Raw(_) => return Extracted::Mismatch,
            };
            Extracted::from_parts(out, issues)
        })
    }

    fn element_value(
        &self,
        item: &Value,
        issues: &mut Vec<RawIssue>,
        ctx: &ParseContext,
    ) -> Option<S::Output> {
        let parsed = self.element.parse_input(Some(item), ctx);
        if parsed.issues.is_empty() {
            return parsed.value;
        }
        issues.push(
            RawIssue::new(IssueCode::InvalidElement, Some(item))
                .origin("set")
                .nested(parsed.issues),
        );
        None
    }

    pub fn element(&self) -> &S {
        &self.element
    }

    size_methods!("items");
}
