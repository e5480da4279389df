use std::marker::PhantomData;

use super::{absorb, should_stop};
use crate::config::ParseContext;
use crate::constraint::{Constraint, Required};
use crate::engine::{parse_complex, Extracted, Input, ParsePayload, Parsed, Source};
use crate::error::{IssueCode, RawIssue};
use crate::internals::Internals;
use crate::schema::{SchemaRef, ZodSchema, ZodType};
use crate::value::Value;

/// Fixed-length array with an optional rest element. Created via
/// [`zodkit::array()`](crate::array) and [`zodkit::array_rest()`](crate::array_rest).
///
/// Without a rest schema the input must have exactly as many elements as
/// there are slots; with one, it needs at least that many and the extra
/// elements are checked against the rest schema. A wrong length is the only
/// issue reported: elements are not visited.
///
/// # Example
/// ```
/// use zodkit::prelude::*;
///
/// let pair = zodkit::array(vec![zodkit::string().into_dyn(), zodkit::int().into_dyn()]);
/// assert!(pair.parse(r#"["asdf", 1234]"#).is_ok());
///
/// let err = pair.parse(r#"["asdf", "asdf"]"#).unwrap_err();
/// assert_eq!(err.issues[0].path_string(), "[1]");
/// ```
#[derive(Clone)]
pub struct ZArray<C: Constraint = Required> {
    pub(crate) internals: Internals<Vec<Value>>,
    items: Vec<Option<SchemaRef>>,
    rest: Option<SchemaRef>,
    pub(crate) _mode: PhantomData<C>,
}

zod_schema!(ZArray [], base = Vec<Value>, fields = [items, rest]);

impl ZArray<Required> {
    /// `None` slots accept any value.
    pub fn from_slots(items: Vec<Option<SchemaRef>>) -> Self {
        Self {
            internals: Internals::new("array"),
            items,
            rest: None,
            _mode: PhantomData,
        }
    }

    pub fn new(items: Vec<SchemaRef>) -> Self {
        Self::from_slots(items.into_iter().map(Some).collect())
    }
}

impl<C: Constraint> ZArray<C> {
    fn run(&self, source: Source<'_, Vec<Value>>, ctx: &ParseContext) -> Parsed<C::Out<Vec<Value>>> {
        parse_complex::<Vec<Value>, C, _>(&self.internals, source, ctx, |input, ctx| {
            let items = match input {
                Input::Owned(items) => items,
                Input::Raw(Some(Value::Array(items))) => items.clone(),
                Input::Raw(_) => return Extracted::Mismatch,
            };
            if let Some(issue) = self.length_issue(items.len()) {
                return Extracted::Failed(vec![issue]);
            }
            let mut payload = ParsePayload::new(items);
            self.parse_elements(&mut payload, ctx);
            if payload.issues.is_empty() {
                Extracted::Ok(payload)
            } else {
                Extracted::Failed(payload.issues)
            }
        })
    }

    fn length_issue(&self, len: usize) -> Option<RawIssue> {
        let fixed = self.items.len();
        let bound = fixed as f64;
        let issue = match &self.rest {
            None if len < fixed => RawIssue::new(IssueCode::TooSmall, None)
                .minimum(bound, true)
                .exact(),
            None if len > fixed => RawIssue::new(IssueCode::TooBig, None)
                .maximum(bound, true)
                .exact(),
            Some(_) if len < fixed => RawIssue::new(IssueCode::TooSmall, None).minimum(bound, true),
            _ => return None,
        };
        Some(issue.origin("array"))
    }

    /// Replace every element with its parsed output.
    fn parse_elements(&self, payload: &mut ParsePayload<Vec<Value>>, ctx: &ParseContext) {
        for (i, item) in payload.value.iter_mut().enumerate() {
            let (schema, is_rest) = match self.items.get(i) {
                Some(slot) => (slot.as_ref(), false),
                None => (self.rest.as_ref(), true),
            };
            let Some(schema) = schema else {
                continue;
            };
            let parsed = schema.parse_input(Some(&*item), ctx);
            let mut issues = parsed.issues;
            if is_rest {
                for issue in &mut issues {
                    if issue.details.note.is_none() {
                        issue.details.note = Some(format!(" (rest element at index {})", i));
                    }
                }
            }
            if let Some(value) = parsed.value {
                *item = value;
            }
            absorb(&mut payload.issues, issues, i);
            if should_stop(&payload.issues, ctx) {
                break;
            }
        }
    }

    /// Schema of the `i`-th fixed slot; `None` past the end or for an open slot.
    pub fn element(&self, i: usize) -> Option<&SchemaRef> {
        self.items.get(i).and_then(Option::as_ref)
    }

    pub fn rest_schema(&self) -> Option<&SchemaRef> {
        self.rest.as_ref()
    }

    /// Number of fixed slots.
    pub fn arity(&self) -> usize {
        self.items.len()
    }

    /// Validate elements past the fixed slots against `rest`.
    pub fn rest(self, rest: SchemaRef) -> Self {
        let mut next = self.modify(|_| {});
        next.rest = Some(rest);
        next
    }

    size_methods!("elements");
}
