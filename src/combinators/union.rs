use std::marker::PhantomData;

use crate::config::ParseContext;
use crate::constraint::{Constraint, Required};
use crate::engine::{parse_complex, Extracted, Input, Parsed, Source};
use crate::error::{IssueCode, RawIssue};
use crate::internals::Internals;
use crate::schema::{SchemaRef, ZodType};
use crate::value::Value;

/// Union of schemas: the first option that accepts the input wins.
///
/// Created via [`zodkit::union()`](crate::union()) or [`ZodType::or`].
///
/// When every option fails the result is one `invalid_union` issue carrying
/// each option's issues, unless exactly one option got past the type check,
/// in which case that option's issues are reported directly.
///
/// # Example
/// ```
/// use zodkit::prelude::*;
///
/// let id = zodkit::string().uuid().or(zodkit::int().positive());
/// assert_eq!(id.parse("42").unwrap(), Value::Int(42));
///
/// let err = id.parse("true").unwrap_err();
/// assert_eq!(err.issues[0].code.key(), "invalid_union");
/// assert_eq!(err.issues[0].errors.len(), 2);
/// ```
#[derive(Clone)]
pub struct ZUnion<C: Constraint = Required> {
    pub(crate) internals: Internals<Value>,
    options: Vec<SchemaRef>,
    pub(crate) _mode: PhantomData<C>,
}

zod_schema!(ZUnion [], base = Value, fields = [options]);

impl ZUnion<Required> {
    pub fn new(options: Vec<SchemaRef>) -> Self {
        let mut internals = Internals::new("union").pass_nil();
        internals.values = literal_set(&options);
        Self {
            internals,
            options,
            _mode: PhantomData,
        }
    }
}

impl<C: Constraint> ZUnion<C> {
    fn run(&self, source: Source<'_, Value>, ctx: &ParseContext) -> Parsed<C::Out<Value>> {
        parse_complex::<Value, C, _>(&self.internals, source, ctx, |input, ctx| {
            let owned;
            let raw = match input {
                Input::Owned(value) => {
                    owned = value;
                    Some(&owned)
                }
                Input::Raw(raw) => raw,
            };

            let mut branches = Vec::with_capacity(self.options.len());
            for option in &self.options {
                let parsed = option.parse_input(raw, ctx);
                if parsed.issues.is_empty() {
                    if let Some(value) = parsed.value {
                        return Extracted::value(value);
                    }
                }
                branches.push(parsed.issues);
            }

            let live: Vec<usize> = branches
                .iter()
                .enumerate()
                .filter(|(_, issues)| !is_type_failure(issues))
                .map(|(i, _)| i)
                .collect();
            if let [only] = live[..] {
                return Extracted::Failed(branches.swap_remove(only));
            }

            let mut issue = RawIssue::new(IssueCode::InvalidUnion, raw);
            issue.union_errors = branches;
            Extracted::Failed(vec![issue])
        })
    }

    /// Option schemas in declaration order.
    pub fn options(&self) -> &[SchemaRef] {
        &self.options
    }

    /// Append another option.
    pub fn option<S>(mut self, schema: S) -> Self
    where
        S: ZodType + 'static,
        S::Output: crate::value::ToValue,
    {
        self.internals = self.internals.fork();
        self.options.push(schema.into_dyn());
        self.internals.values = literal_set(&self.options);
        self
    }
}

/// Every value the options accept, when all of them are literal-like.
fn literal_set(options: &[SchemaRef]) -> Option<Vec<Value>> {
    options
        .iter()
        .map(|o| o.literal_values())
        .collect::<Option<Vec<_>>>()
        .map(|sets| sets.into_iter().flatten().collect())
}

/// An option rejected the input's type outright.
fn is_type_failure(issues: &[RawIssue]) -> bool {
    issues
        .iter()
        .any(|i| i.code == IssueCode::InvalidType && i.path.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_success_wins() {
        let schema = ZUnion::new(vec![
            crate::string().min(1).into_dyn(),
            crate::string().into_dyn(),
        ]);
        let input = Value::from("x");
        let parsed = schema.parse_input(Some(&input), &ParseContext::new());
        assert_eq!(parsed.value, Some(Value::from("x")));
    }

    #[test]
    fn single_live_branch_reports_its_own_issues() {
        let schema = ZUnion::new(vec![
            crate::string().min(5).into_dyn(),
            crate::int().into_dyn(),
        ]);
        let input = Value::from("abc");
        let parsed = schema.parse_input(Some(&input), &ParseContext::new());
        assert_eq!(parsed.issues.len(), 1);
        assert_eq!(parsed.issues[0].code, IssueCode::TooSmall);
    }

    #[test]
    fn literal_options_expose_their_values() {
        let schema = ZUnion::new(vec![
            crate::literal("a").into_dyn(),
            crate::literal("b").into_dyn(),
        ]);
        assert_eq!(
            schema.literal_values(),
            Some(vec![Value::from("a"), Value::from("b")])
        );
    }
}
