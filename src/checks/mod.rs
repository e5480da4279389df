//! Check protocol and built-in checks.
//!
//! A check is one step of a schema's ordered chain. It sees the value left by
//! the previous step and may append issues or, for overwrites, replace it.
//! Checks are immutable and shared between schemas through `Arc`.
//!
//! Every built-in check can be attached with [`ZodSchema::check`](crate::ZodSchema::check):
//!
//! ```
//! use zodkit::prelude::*;
//! use zodkit::checks;
//!
//! let schema = zodkit::string()
//!     .check(checks::min_length(3).error("three or more"))
//!     .check(checks::starts_with("ab").abort());
//! let err = schema.parse(r#""x""#).unwrap_err();
//! assert_eq!(err.issues[0].message, "three or more");
//! ```

use crate::config::ParseContext;
use crate::engine::ParsePayload;
use crate::error::ErrorMap;

/// Adds the `error` and `abort` builders to a check struct with a `def` field.
macro_rules! check_builders {
    ($name:ident $(< $($p:ident),+ >)?) => {
        impl $(< $($p),+ >)? $name $(< $($p),+ >)? {
            /// Check-level message, taking precedence over every other formatter.
            pub fn error(mut self, error: impl Into<$crate::error::ErrorMap>) -> Self {
                self.def.error = Some(error.into());
                self
            }

            /// Skip the remaining checks when this one fails.
            pub fn abort(mut self) -> Self {
                self.def.abort = true;
                self
            }
        }
    };
}

pub mod custom;
pub mod formats;
pub mod numeric;
pub mod size;
pub mod string;

pub use custom::{overwrite, refine, super_refine, Overwrite, Refine, SuperRefine};
pub use formats::{IsoDatetimeOptions, StringFormat};
pub use numeric::{gt, gte, lt, lte, multiple_of, Comparison, MultipleOf, Numeric};
pub use size::{length, max_length, min_length, MaxSize, MinSize, SizeEquals, Sizable};
#[cfg(feature = "regex")]
pub use string::{regex, RegexCheck};
pub use string::{
    ends_with, format, includes, lowercase, starts_with, uppercase, CaseCheck, FormatCheck,
    Includes, NormalizeForm, StringAffix,
};

/// Static definition shared by all checks.
#[derive(Debug, Clone)]
pub struct CheckDef {
    pub name: &'static str,
    pub error: Option<ErrorMap>,
    /// Stop the chain after this check reports an issue.
    pub abort: bool,
}

impl CheckDef {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            error: None,
            abort: false,
        }
    }
}

/// Summary of constraints recorded by checks when they are attached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckBag {
    pub min_size: Option<usize>,
    pub max_size: Option<usize>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub multiple_of: Option<f64>,
    pub formats: Vec<String>,
    pub patterns: Vec<String>,
}

/// A validation step over values of type `T`.
pub trait Check<T>: Send + Sync {
    fn def(&self) -> &CheckDef;

    /// Inspect `payload.value`, append issues or replace the value.
    fn run(&self, payload: &mut ParsePayload<T>, ctx: &ParseContext);

    /// Called once when the check is added to a schema.
    fn on_attach(&self, _bag: &mut CheckBag) {}
}
