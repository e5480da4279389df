//! Per-call parse options and process-wide configuration.

use parking_lot::RwLock;
use std::sync::OnceLock;

use crate::error::ErrorMap;

/// Caller-supplied knobs for a single parse.
///
/// # Example
/// ```
/// use zodkit::prelude::*;
///
/// let ctx = ParseContext::new().error("nope").abort_early();
/// let err = zodkit::string().min(3).parse_with(r#""a""#, &ctx).unwrap_err();
/// assert_eq!(err.issues[0].message, "nope");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParseContext {
    pub error: Option<ErrorMap>,
    pub abort_early: bool,
    pub report_input: bool,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context-level message formatter.
    pub fn error(mut self, error: impl Into<ErrorMap>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Stop at the first issue.
    pub fn abort_early(mut self) -> Self {
        self.abort_early = true;
        self
    }

    /// Keep the offending input on finalised issues.
    pub fn report_input(mut self) -> Self {
        self.report_input = true;
        self
    }
}

/// Process-wide configuration.
#[derive(Debug, Clone, Default)]
pub struct GlobalConfig {
    /// Formatter consulted after the context-level one.
    pub custom_error: Option<ErrorMap>,
}

fn store() -> &'static RwLock<GlobalConfig> {
    static CONFIG: OnceLock<RwLock<GlobalConfig>> = OnceLock::new();
    CONFIG.get_or_init(|| RwLock::new(GlobalConfig::default()))
}

/// Update the global configuration.
///
/// # Example
/// ```
/// zodkit::configure(|cfg| cfg.custom_error = None);
/// ```
pub fn configure<F: FnOnce(&mut GlobalConfig)>(f: F) {
    let mut cfg = store().write();
    f(&mut cfg);
    tracing::debug!(
        custom_error = cfg.custom_error.is_some(),
        "global config updated"
    );
}

/// Snapshot of the current global configuration.
pub fn global_config() -> GlobalConfig {
    store().read().clone()
}
