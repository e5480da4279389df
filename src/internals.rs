//! Shared configuration carried by every schema.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::checks::{Check, CheckBag};
use crate::error::ErrorMap;
use crate::value::Value;

/// Identity of a schema instance.
///
/// Every modifier yields a schema with a fresh id; `clone()` keeps it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(u64);

impl SchemaId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        SchemaId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub(crate) type Provider<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// Configuration bag of a schema over base type `T`.
pub struct Internals<T> {
    pub(crate) id: SchemaId,
    /// Ancestor ids, oldest first.
    pub(crate) lineage: Vec<SchemaId>,
    pub(crate) type_code: &'static str,
    pub(crate) checks: Vec<Arc<dyn Check<T>>>,
    pub(crate) bag: CheckBag,
    pub(crate) optional: bool,
    pub(crate) nilable: bool,
    pub(crate) non_optional: bool,
    pub(crate) exact_optional: bool,
    pub(crate) coerce: bool,
    /// Nil input is handed to the extractor instead of being rejected.
    pub(crate) pass_nil: bool,
    pub(crate) default: Option<Provider<T>>,
    pub(crate) prefault: Option<Provider<Value>>,
    pub(crate) error: Option<ErrorMap>,
    /// Closed value set for literal-like schemas.
    pub(crate) values: Option<Vec<Value>>,
}

impl<T> Clone for Internals<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            lineage: self.lineage.clone(),
            type_code: self.type_code,
            checks: self.checks.clone(),
            bag: self.bag.clone(),
            optional: self.optional,
            nilable: self.nilable,
            non_optional: self.non_optional,
            exact_optional: self.exact_optional,
            coerce: self.coerce,
            pass_nil: self.pass_nil,
            default: self.default.clone(),
            prefault: self.prefault.clone(),
            error: self.error.clone(),
            values: self.values.clone(),
        }
    }
}

impl<T> fmt::Debug for Internals<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Internals")
            .field("id", &self.id)
            .field("type_code", &self.type_code)
            .field("checks", &self.checks.len())
            .field("optional", &self.optional)
            .field("nilable", &self.nilable)
            .field("non_optional", &self.non_optional)
            .field("exact_optional", &self.exact_optional)
            .field("coerce", &self.coerce)
            .field("has_default", &self.default.is_some())
            .field("has_prefault", &self.prefault.is_some())
            .finish()
    }
}

impl<T> Internals<T> {
    pub(crate) fn new(type_code: &'static str) -> Self {
        Self {
            id: SchemaId::next(),
            lineage: Vec::new(),
            type_code,
            checks: Vec::new(),
            bag: CheckBag::default(),
            optional: false,
            nilable: false,
            non_optional: false,
            exact_optional: false,
            coerce: false,
            pass_nil: false,
            default: None,
            prefault: None,
            error: None,
            values: None,
        }
    }

    pub(crate) fn pass_nil(mut self) -> Self {
        self.pass_nil = true;
        self
    }

    /// Copy with a fresh identity that remembers this one as its parent.
    pub(crate) fn fork(&self) -> Self {
        let mut next = self.clone();
        next.lineage.push(self.id);
        next.id = SchemaId::next();
        next
    }

    pub(crate) fn add_check(&mut self, check: Arc<dyn Check<T>>) {
        check.on_attach(&mut self.bag);
        self.checks.push(check);
    }

    pub fn id(&self) -> SchemaId {
        self.id
    }

    /// Ancestor ids, oldest first.
    pub fn lineage(&self) -> &[SchemaId] {
        &self.lineage
    }

    pub fn type_code(&self) -> &'static str {
        self.type_code
    }

    pub fn checks(&self) -> &[Arc<dyn Check<T>>] {
        &self.checks
    }

    /// Constraint summary collected from attached checks.
    pub fn bag(&self) -> &CheckBag {
        &self.bag
    }

    pub fn is_optional(&self) -> bool {
        self.optional || self.nilable || self.exact_optional
    }

    pub fn is_coerced(&self) -> bool {
        self.coerce
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub fn has_prefault(&self) -> bool {
        self.prefault.is_some()
    }
}
