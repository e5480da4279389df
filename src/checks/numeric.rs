use std::fmt::Debug;

use super::{Check, CheckBag, CheckDef};
use crate::config::ParseContext;
use crate::engine::ParsePayload;
use crate::error::{IssueCode, RawIssue};
use crate::value::{ToValue, Value};

/// Numeric base types a number schema can produce.
pub trait Numeric:
    Copy + PartialOrd + Debug + Default + Send + Sync + ToValue + 'static
{
    /// Type code reported by `invalid_type`.
    const TYPE_CODE: &'static str;
    const INTEGER: bool;

    /// Read a value without loss; integers reject fractions and out-of-range input.
    fn extract(value: &Value) -> Option<Self>;

    /// Convert strings and booleans.
    fn coerce(value: &Value) -> Option<Self>;

    fn to_f64(self) -> f64;

    fn is_multiple_of(self, divisor: Self) -> bool;
}

macro_rules! impl_numeric_int {
    ($($t:ty => $code:literal),* $(,)?) => {
        $(impl Numeric for $t {
            const TYPE_CODE: &'static str = $code;
            const INTEGER: bool = true;

            fn extract(value: &Value) -> Option<Self> {
                match value {
                    Value::Int(i) => <$t>::try_from(*i).ok(),
                    Value::Uint(u) => <$t>::try_from(*u).ok(),
                    Value::Float(f) if f.is_finite() && f.fract() == 0.0 => {
                        // MAX as f64 rounds up for 64-bit types, so the upper bound is exclusive
                        if *f >= <$t>::MIN as f64 && *f < <$t>::MAX as f64 + 1.0 {
                            Some(*f as $t)
                        } else {
                            None
                        }
                    }
                    _ => None,
                }
            }

            fn coerce(value: &Value) -> Option<Self> {
                match value {
                    Value::String(s) => {
                        let s = s.trim();
                        s.parse::<$t>().ok().or_else(|| {
                            s.parse::<f64>().ok().and_then(|f| Self::extract(&Value::Float(f)))
                        })
                    }
                    Value::Bool(b) => Some(if *b { 1 } else { 0 }),
                    other => Self::extract(other),
                }
            }

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn is_multiple_of(self, divisor: Self) -> bool {
                divisor != 0 && self.checked_rem(divisor).map_or(true, |r| r == 0)
            }
        })*
    };
}

macro_rules! impl_numeric_float {
    ($($t:ty),*) => {
        $(impl Numeric for $t {
            const TYPE_CODE: &'static str = "number";
            const INTEGER: bool = false;

            fn extract(value: &Value) -> Option<Self> {
                let f = value.as_f64()?;
                if !f.is_finite() {
                    return None;
                }
                let narrowed = f as $t;
                narrowed.is_finite().then_some(narrowed)
            }

            fn coerce(value: &Value) -> Option<Self> {
                match value {
                    Value::String(s) => s
                        .trim()
                        .parse::<f64>()
                        .ok()
                        .and_then(|f| Self::extract(&Value::Float(f))),
                    Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
                    other => Self::extract(other),
                }
            }

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn is_multiple_of(self, divisor: Self) -> bool {
                divisor != 0.0 && float_safe_remainder(self as f64, divisor as f64) == 0.0
            }
        })*
    };
}

impl_numeric_int!(
    i8 => "int8",
    i16 => "int16",
    i32 => "int32",
    i64 => "int",
    u8 => "uint8",
    u16 => "uint16",
    u32 => "uint32",
    u64 => "uint64",
);
impl_numeric_float!(f32, f64);

fn decimals(value: f64) -> usize {
    let text = format!("{}", value);
    match text.split_once('.') {
        Some((_, frac)) => frac.len(),
        None => 0,
    }
}

/// Remainder that treats decimal steps like `0.1` exactly.
fn float_safe_remainder(value: f64, step: f64) -> f64 {
    let places = decimals(value).max(decimals(step)).min(15) as i32;
    let scale = 10f64.powi(places);
    let value_int = (value * scale).round();
    let step_int = (step * scale).round();
    if step_int == 0.0 {
        return value;
    }
    (value_int % step_int) / scale
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cmp {
    Gt,
    Gte,
    Lt,
    Lte,
}

/// Bound comparison (`gt`, `gte`, `lt`, `lte`).
#[derive(Debug, Clone)]
pub struct Comparison<N> {
    def: CheckDef,
    bound: N,
    cmp: Cmp,
}

#[derive(Debug, Clone)]
pub struct MultipleOf<N> {
    def: CheckDef,
    divisor: N,
}

check_builders!(Comparison<N>);
check_builders!(MultipleOf<N>);

pub fn gt<N: Numeric>(bound: N) -> Comparison<N> {
    Comparison {
        def: CheckDef::new("greater_than"),
        bound,
        cmp: Cmp::Gt,
    }
}

pub fn gte<N: Numeric>(bound: N) -> Comparison<N> {
    Comparison {
        def: CheckDef::new("greater_than"),
        bound,
        cmp: Cmp::Gte,
    }
}

pub fn lt<N: Numeric>(bound: N) -> Comparison<N> {
    Comparison {
        def: CheckDef::new("less_than"),
        bound,
        cmp: Cmp::Lt,
    }
}

pub fn lte<N: Numeric>(bound: N) -> Comparison<N> {
    Comparison {
        def: CheckDef::new("less_than"),
        bound,
        cmp: Cmp::Lte,
    }
}

pub fn multiple_of<N: Numeric>(divisor: N) -> MultipleOf<N> {
    MultipleOf {
        def: CheckDef::new("multiple_of"),
        divisor,
    }
}

impl<N: Numeric> Check<N> for Comparison<N> {
    fn def(&self) -> &CheckDef {
        &self.def
    }

    fn run(&self, payload: &mut ParsePayload<N>, ctx: &ParseContext) {
        let v = payload.value;
        let ok = match self.cmp {
            Cmp::Gt => v > self.bound,
            Cmp::Gte => v >= self.bound,
            Cmp::Lt => v < self.bound,
            Cmp::Lte => v <= self.bound,
        };
        if ok {
            return;
        }
        let input = ctx.report_input.then(|| v.to_value());
        let bound = self.bound.to_f64();
        let issue = match self.cmp {
            Cmp::Gt | Cmp::Gte => RawIssue::new(IssueCode::TooSmall, input.as_ref())
                .minimum(bound, self.cmp == Cmp::Gte),
            Cmp::Lt | Cmp::Lte => RawIssue::new(IssueCode::TooBig, input.as_ref())
                .maximum(bound, self.cmp == Cmp::Lte),
        };
        payload.issues.push(issue.origin("number"));
    }

    fn on_attach(&self, bag: &mut CheckBag) {
        let bound = self.bound.to_f64();
        match self.cmp {
            Cmp::Gt | Cmp::Gte => {
                bag.minimum = Some(bag.minimum.map_or(bound, |m| m.max(bound)));
            }
            Cmp::Lt | Cmp::Lte => {
                bag.maximum = Some(bag.maximum.map_or(bound, |m| m.min(bound)));
            }
        }
    }
}

impl<N: Numeric> Check<N> for MultipleOf<N> {
    fn def(&self) -> &CheckDef {
        &self.def
    }

    fn run(&self, payload: &mut ParsePayload<N>, ctx: &ParseContext) {
        if payload.value.is_multiple_of(self.divisor) {
            return;
        }
        let input = ctx.report_input.then(|| payload.value.to_value());
        let mut issue = RawIssue::new(IssueCode::NotMultipleOf, input.as_ref()).origin("number");
        issue.details.divisor = Some(self.divisor.to_f64());
        payload.issues.push(issue);
    }

    fn on_attach(&self, bag: &mut CheckBag) {
        bag.multiple_of = Some(self.divisor.to_f64());
    }
}
