use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use super::{Check, CheckBag, CheckDef};
use crate::config::ParseContext;
use crate::engine::ParsePayload;
use crate::error::{IssueCode, RawIssue};
use crate::value::ToValue;

/// Values with a logical length.
pub trait Sizable: ToValue {
    fn size(&self) -> usize;

    /// Origin reported on size issues.
    fn origin() -> &'static str;
}

impl Sizable for String {
    fn size(&self) -> usize {
        self.chars().count()
    }

    fn origin() -> &'static str {
        "string"
    }
}

impl<T: ToValue> Sizable for Vec<T> {
    fn size(&self) -> usize {
        self.len()
    }

    fn origin() -> &'static str {
        "array"
    }
}

impl<K: ToValue, V: ToValue, S> Sizable for HashMap<K, V, S> {
    fn size(&self) -> usize {
        self.len()
    }

    fn origin() -> &'static str {
        "record"
    }
}

impl<K: ToValue, V: ToValue, S> Sizable for IndexMap<K, V, S> {
    fn size(&self) -> usize {
        self.len()
    }

    fn origin() -> &'static str {
        "map"
    }
}

impl<T: ToValue + Eq + Hash, S> Sizable for HashSet<T, S> {
    fn size(&self) -> usize {
        self.len()
    }

    fn origin() -> &'static str {
        "set"
    }
}

fn size_issue<T: Sizable>(code: IssueCode, value: &T, ctx: &ParseContext) -> RawIssue {
    let input = ctx.report_input.then(|| value.to_value());
    RawIssue::new(code, input.as_ref()).origin(T::origin())
}

#[derive(Debug, Clone)]
pub struct MinSize {
    def: CheckDef,
    min: usize,
}

#[derive(Debug, Clone)]
pub struct MaxSize {
    def: CheckDef,
    max: usize,
}

#[derive(Debug, Clone)]
pub struct SizeEquals {
    def: CheckDef,
    len: usize,
}

check_builders!(MinSize);
check_builders!(MaxSize);
check_builders!(SizeEquals);

/// Length must be at least `min`.
pub fn min_length(min: usize) -> MinSize {
    MinSize {
        def: CheckDef::new("min_length"),
        min,
    }
}

/// Length must be at most `max`.
pub fn max_length(max: usize) -> MaxSize {
    MaxSize {
        def: CheckDef::new("max_length"),
        max,
    }
}

/// Length must be exactly `len`.
pub fn length(len: usize) -> SizeEquals {
    SizeEquals {
        def: CheckDef::new("length_equals"),
        len,
    }
}

impl<T: Sizable> Check<T> for MinSize {
    fn def(&self) -> &CheckDef {
        &self.def
    }

    fn run(&self, payload: &mut ParsePayload<T>, ctx: &ParseContext) {
        if payload.value.size() < self.min {
            let issue = size_issue(IssueCode::TooSmall, &payload.value, ctx)
                .minimum(self.min as f64, true);
            payload.issues.push(issue);
        }
    }

    fn on_attach(&self, bag: &mut CheckBag) {
        bag.min_size = Some(bag.min_size.map_or(self.min, |m| m.max(self.min)));
    }
}

impl<T: Sizable> Check<T> for MaxSize {
    fn def(&self) -> &CheckDef {
        &self.def
    }

    fn run(&self, payload: &mut ParsePayload<T>, ctx: &ParseContext) {
        if payload.value.size() > self.max {
            let issue = size_issue(IssueCode::TooBig, &payload.value, ctx)
                .maximum(self.max as f64, true);
            payload.issues.push(issue);
        }
    }

    fn on_attach(&self, bag: &mut CheckBag) {
        bag.max_size = Some(bag.max_size.map_or(self.max, |m| m.min(self.max)));
    }
}

impl<T: Sizable> Check<T> for SizeEquals {
    fn def(&self) -> &CheckDef {
        &self.def
    }

    fn run(&self, payload: &mut ParsePayload<T>, ctx: &ParseContext) {
        let size = payload.value.size();
        if size == self.len {
            return;
        }
        let bound = self.len as f64;
        let issue = if size < self.len {
            size_issue(IssueCode::TooSmall, &payload.value, ctx).minimum(bound, true)
        } else {
            size_issue(IssueCode::TooBig, &payload.value, ctx).maximum(bound, true)
        };
        payload.issues.push(issue.exact());
    }

    fn on_attach(&self, bag: &mut CheckBag) {
        bag.min_size = Some(self.len);
        bag.max_size = Some(self.len);
    }
}
