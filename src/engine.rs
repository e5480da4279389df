//! Generic parse drivers shared by every schema.
//!
//! [`parse_complex`] implements the whole pipeline: nil handling (default,
//! prefault, optionality), type extraction, the check chain and issue
//! stamping. [`parse_primitive`] specialises it for scalar types that are
//! extracted by a plain function.

use std::sync::Arc;

use crate::checks::Check;
use crate::config::{global_config, GlobalConfig, ParseContext};
use crate::constraint::{convert_to_constraint, Constraint};
use crate::error::{ErrorMap, RawIssue, ZodError, ZodIssue};
use crate::i18n::default_message;
use crate::internals::Internals;
use crate::value::Value;

/// In-flight value plus the issues raised so far.
#[derive(Debug)]
pub struct ParsePayload<T> {
    pub value: T,
    pub issues: Vec<RawIssue>,
}

impl<T> ParsePayload<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            issues: Vec::new(),
        }
    }
}

/// Outcome of running one schema.
///
/// A value can be present together with issues; a run without issues always
/// carries a value.
#[derive(Debug)]
pub struct Parsed<T> {
    pub value: Option<T>,
    pub issues: Vec<RawIssue>,
}

impl<T> Parsed<T> {
    pub fn ok(value: T) -> Self {
        Self {
            value: Some(value),
            issues: Vec::new(),
        }
    }

    pub fn fail(issues: Vec<RawIssue>) -> Self {
        Self {
            value: None,
            issues,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.issues.is_empty() && self.value.is_some()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Parsed<U> {
        Parsed {
            value: self.value.map(f),
            issues: self.issues,
        }
    }

    /// Finalise into the public result type.
    pub fn into_result(self, ctx: &ParseContext) -> Result<T, ZodError> {
        match self.value {
            Some(value) if self.issues.is_empty() => Ok(value),
            value => {
                let mut issues = self.issues;
                if issues.is_empty() && value.is_none() {
                    issues.push(RawIssue::custom("Invalid input", None));
                }
                tracing::debug!(issues = issues.len(), "parse failed");
                Err(finalize(issues, ctx))
            }
        }
    }
}

/// Input handed to the pipeline.
pub enum Source<'a, T> {
    /// Key missing or no value at all.
    Absent,
    Value(&'a Value),
    /// Already-typed value, or `None` for nil.
    Owned(Option<T>),
}

impl<'a, T> From<Option<&'a Value>> for Source<'a, T> {
    fn from(input: Option<&'a Value>) -> Self {
        match input {
            Some(v) => Source::Value(v),
            None => Source::Absent,
        }
    }
}

/// Input handed to a type extractor.
pub enum Input<'a, T> {
    /// Raw value; `None` only reaches extractors of nil-passing schemas.
    Raw(Option<&'a Value>),
    Owned(T),
}

impl<'a, T> Input<'a, T> {
    pub fn raw(&self) -> Option<&'a Value> {
        match self {
            Input::Raw(v) => *v,
            Input::Owned(_) => None,
        }
    }
}

/// Result of a type extractor.
pub enum Extracted<T> {
    /// A value, possibly with issues raised by children.
    Ok(ParsePayload<T>),
    /// The input is not of the expected base type.
    Mismatch,
    /// Extraction failed; no value could be produced.
    Failed(Vec<RawIssue>),
}

impl<T> Extracted<T> {
    pub fn value(value: T) -> Self {
        Extracted::Ok(ParsePayload::new(value))
    }

    /// Value when `issues` is empty, otherwise failure.
    pub fn from_parts(value: T, issues: Vec<RawIssue>) -> Self {
        if issues.is_empty() {
            Extracted::value(value)
        } else {
            Extracted::Failed(issues)
        }
    }
}

/// Handle given to user refinements and transforms for reporting issues.
pub struct RefinementContext<'a> {
    issues: &'a mut Vec<RawIssue>,
    ctx: &'a ParseContext,
}

impl<'a> RefinementContext<'a> {
    pub(crate) fn new(issues: &'a mut Vec<RawIssue>, ctx: &'a ParseContext) -> Self {
        Self { issues, ctx }
    }

    /// Report a fully built issue.
    pub fn add_issue(&mut self, issue: RawIssue) {
        self.issues.push(issue);
    }

    /// Report a `custom` issue whose message wins over every formatter.
    pub fn issue(&mut self, message: impl Into<String>) {
        let message = message.into();
        let mut issue = RawIssue::custom(message.clone(), None);
        issue.check_error = Some(ErrorMap::from(message));
        self.issues.push(issue);
    }

    /// Number of issues reported so far in this run.
    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    pub fn context(&self) -> &ParseContext {
        self.ctx
    }
}

/// Run the full pipeline for a schema whose values are built by `extract`.
pub fn parse_complex<'a, T, C, F>(
    internals: &Internals<T>,
    source: Source<'a, T>,
    ctx: &ParseContext,
    extract: F,
) -> Parsed<C::Out<T>>
where
    C: Constraint,
    F: FnOnce(Input<'_, T>, &ParseContext) -> Extracted<T>,
{
    let prefaulted;
    let input = match source {
        Source::Owned(Some(value)) => Input::Owned(value),
        Source::Value(v) if !v.is_null() => Input::Raw(Some(v)),
        nil => {
            let explicit = match &nil {
                Source::Value(v) => Some(*v),
                _ => None,
            };
            let explicit_null = explicit.is_some() || matches!(nil, Source::Owned(None));
            match resolve_nil::<T, C>(internals, explicit_null) {
                Nil::Done(parsed) => return parsed,
                Nil::Prefault(value) => {
                    prefaulted = value;
                    if prefaulted.is_null() && !internals.pass_nil {
                        return invalid_nil(internals, Some(&prefaulted));
                    }
                    Input::Raw(Some(&prefaulted))
                }
                Nil::Pass => Input::Raw(explicit),
                Nil::Reject => {
                    let null = Value::Null;
                    return invalid_nil(internals, explicit_null.then_some(&null));
                }
            }
        }
    };

    let raw = input.raw();
    let payload = match extract(input, ctx) {
        Extracted::Ok(payload) => payload,
        Extracted::Mismatch => {
            let issue = RawIssue::invalid_type(internals.type_code, raw);
            return stamped(Parsed::fail(vec![issue]), internals);
        }
        Extracted::Failed(issues) => return stamped(Parsed::fail(issues), internals),
    };
    finish::<T, C>(internals, payload, ctx)
}

/// [`parse_complex`] for scalars: `extract` reads the base type and `coerce`
/// converts foreign input when coercion is enabled.
pub fn parse_primitive<T, C>(
    internals: &Internals<T>,
    source: Source<'_, T>,
    ctx: &ParseContext,
    extract: fn(&Value) -> Option<T>,
    coerce: fn(&Value) -> Option<T>,
) -> Parsed<C::Out<T>>
where
    C: Constraint,
{
    parse_complex::<T, C, _>(internals, source, ctx, |input, _| match input {
        Input::Owned(value) => Extracted::value(value),
        Input::Raw(Some(v)) => {
            let found = extract(v).or_else(|| if internals.coerce { coerce(v) } else { None });
            match found {
                Some(value) => Extracted::value(value),
                None => Extracted::Mismatch,
            }
        }
        Input::Raw(None) => Extracted::Mismatch,
    })
}

/// `invalid_type` for a value the extractor rejected.
pub fn mismatch(expected: &str, input: &Value) -> RawIssue {
    RawIssue::invalid_type(expected, Some(input))
}

enum Nil<T> {
    Done(T),
    Prefault(Value),
    Pass,
    Reject,
}

fn resolve_nil<T, C: Constraint>(
    internals: &Internals<T>,
    explicit_null: bool,
) -> Nil<Parsed<C::Out<T>>> {
    if internals.exact_optional && explicit_null {
        return Nil::Reject;
    }
    if let Some(default) = &internals.default {
        return Nil::Done(Parsed::ok(convert_to_constraint::<C, T>(default())));
    }
    if let Some(prefault) = &internals.prefault {
        return Nil::Prefault(prefault());
    }
    let accepts = internals.optional || internals.nilable || internals.exact_optional;
    if accepts && !internals.non_optional {
        if let Some(absent) = C::absent::<T>() {
            return Nil::Done(Parsed::ok(absent));
        }
    }
    if internals.pass_nil && !internals.non_optional {
        return Nil::Pass;
    }
    Nil::Reject
}

fn invalid_nil<T, O>(internals: &Internals<T>, input: Option<&Value>) -> Parsed<O> {
    let expected = if internals.non_optional {
        "nonOptional"
    } else {
        internals.type_code
    };
    stamped(
        Parsed::fail(vec![RawIssue::invalid_type(expected, input)]),
        internals,
    )
}

fn finish<T, C: Constraint>(
    internals: &Internals<T>,
    mut payload: ParsePayload<T>,
    ctx: &ParseContext,
) -> Parsed<C::Out<T>> {
    if payload.issues.is_empty() {
        run_checks_on_value(&internals.checks, &mut payload, ctx);
    }
    stamped(
        Parsed {
            value: Some(convert_to_constraint::<C, T>(payload.value)),
            issues: payload.issues,
        },
        internals,
    )
}

fn stamped<T, O>(mut parsed: Parsed<O>, internals: &Internals<T>) -> Parsed<O> {
    stamp(&mut parsed.issues, internals.error.as_ref());
    parsed
}

/// Attach the schema-level formatter to issues raised by this schema.
///
/// Issues already stamped by a child schema keep the child's formatter.
pub fn stamp(issues: &mut [RawIssue], error: Option<&ErrorMap>) {
    for issue in issues.iter_mut().filter(|i| !i.stamped) {
        issue.schema_error = error.cloned();
        issue.stamped = true;
    }
}

/// Run `checks` in order against the payload.
///
/// Issues raised by a check are tagged with its name and error override.
/// The chain stops after a failing check marked `abort`, or after the first
/// issue when the context asks to abort early.
pub fn run_checks_on_value<T>(
    checks: &[Arc<dyn Check<T>>],
    payload: &mut ParsePayload<T>,
    ctx: &ParseContext,
) {
    for check in checks {
        let before = payload.issues.len();
        check.run(payload, ctx);
        if payload.issues.len() == before {
            continue;
        }
        let def = check.def();
        for issue in &mut payload.issues[before..] {
            issue.check.get_or_insert(def.name);
            if issue.check_error.is_none() {
                issue.check_error = def.error.clone();
            }
        }
        if def.abort || ctx.abort_early {
            break;
        }
    }
}

/// Run `checks` on an owned value and return the (possibly rewritten) value.
pub fn apply_checks<T>(
    value: T,
    checks: &[Arc<dyn Check<T>>],
    ctx: &ParseContext,
) -> Result<T, ZodError> {
    let mut payload = ParsePayload::new(value);
    run_checks_on_value(checks, &mut payload, ctx);
    if payload.issues.is_empty() {
        Ok(payload.value)
    } else {
        Err(finalize(payload.issues, ctx))
    }
}

/// Turn raw issues into the public aggregate.
pub fn finalize(issues: Vec<RawIssue>, ctx: &ParseContext) -> ZodError {
    let global = global_config();
    ZodError::new(
        issues
            .into_iter()
            .map(|issue| finalize_issue(issue, ctx, &global))
            .collect(),
    )
}

fn finalize_issue(raw: RawIssue, ctx: &ParseContext, global: &GlobalConfig) -> ZodIssue {
    let mut message = raw
        .check_error
        .as_ref()
        .and_then(|m| m.resolve(&raw))
        .or_else(|| raw.schema_error.as_ref().and_then(|m| m.resolve(&raw)))
        .or_else(|| ctx.error.as_ref().and_then(|m| m.resolve(&raw)))
        .or_else(|| global.custom_error.as_ref().and_then(|m| m.resolve(&raw)))
        .or_else(|| raw.message.clone())
        .unwrap_or_else(|| default_message(&raw));
    if let Some(note) = &raw.details.note {
        message.push_str(note);
    }
    ZodIssue {
        code: raw.code,
        message,
        path: raw.path,
        expected: raw.expected,
        received: raw.received,
        keys: raw.keys,
        options: raw.options,
        input: if ctx.report_input { raw.input } else { None },
        details: raw.details,
        issues: raw
            .issues
            .into_iter()
            .map(|i| finalize_issue(i, ctx, global))
            .collect(),
        errors: raw
            .union_errors
            .into_iter()
            .map(|branch| {
                branch
                    .into_iter()
                    .map(|i| finalize_issue(i, ctx, global))
                    .collect()
            })
            .collect(),
    }
}
