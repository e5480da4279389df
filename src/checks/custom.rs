use std::fmt;
use std::marker::PhantomData;

use super::{Check, CheckDef};
use crate::config::ParseContext;
use crate::engine::{ParsePayload, RefinementContext};
use crate::error::RawIssue;

/// Replaces the in-flight value; never reports issues.
pub struct Overwrite<T, F> {
    def: CheckDef,
    f: F,
    _marker: PhantomData<fn(&T)>,
}

/// Boolean predicate; `false` reports a `custom` issue.
pub struct Refine<T, F> {
    def: CheckDef,
    f: F,
    _marker: PhantomData<fn(&T)>,
}

/// Predicate that reports its own issues through a [`RefinementContext`].
pub struct SuperRefine<T, F> {
    def: CheckDef,
    f: F,
    _marker: PhantomData<fn(&T)>,
}

check_builders!(Overwrite<T, F>);
check_builders!(Refine<T, F>);
check_builders!(SuperRefine<T, F>);

impl<T, F> fmt::Debug for Overwrite<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overwrite").field("def", &self.def).finish()
    }
}

impl<T, F> fmt::Debug for Refine<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Refine").field("def", &self.def).finish()
    }
}

impl<T, F> fmt::Debug for SuperRefine<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuperRefine").field("def", &self.def).finish()
    }
}

pub fn overwrite<T, F>(f: F) -> Overwrite<T, F>
where
    F: Fn(&T) -> T + Send + Sync,
{
    Overwrite {
        def: CheckDef::new("overwrite"),
        f,
        _marker: PhantomData,
    }
}

pub fn refine<T, F>(f: F) -> Refine<T, F>
where
    F: Fn(&T) -> bool + Send + Sync,
{
    Refine {
        def: CheckDef::new("custom"),
        f,
        _marker: PhantomData,
    }
}

pub fn super_refine<T, F>(f: F) -> SuperRefine<T, F>
where
    F: Fn(&T, &mut RefinementContext<'_>) + Send + Sync,
{
    SuperRefine {
        def: CheckDef::new("custom"),
        f,
        _marker: PhantomData,
    }
}

impl<T, F> Check<T> for Overwrite<T, F>
where
    F: Fn(&T) -> T + Send + Sync,
{
    fn def(&self) -> &CheckDef {
        &self.def
    }

    fn run(&self, payload: &mut ParsePayload<T>, _ctx: &ParseContext) {
        payload.value = (self.f)(&payload.value);
    }
}

impl<T, F> Check<T> for Refine<T, F>
where
    F: Fn(&T) -> bool + Send + Sync,
{
    fn def(&self) -> &CheckDef {
        &self.def
    }

    fn run(&self, payload: &mut ParsePayload<T>, _ctx: &ParseContext) {
        if !(self.f)(&payload.value) {
            payload.issues.push(RawIssue::custom("Invalid input", None));
        }
    }
}

impl<T, F> Check<T> for SuperRefine<T, F>
where
    F: Fn(&T, &mut RefinementContext<'_>) + Send + Sync,
{
    fn def(&self) -> &CheckDef {
        &self.def
    }

    fn run(&self, payload: &mut ParsePayload<T>, ctx: &ParseContext) {
        let mut refinement = RefinementContext::new(&mut payload.issues, ctx);
        (self.f)(&payload.value, &mut refinement);
    }
}
