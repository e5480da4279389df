//! Schema metadata registries.
//!
//! A [`Registry`] maps schema identities to metadata. The process-wide
//! [`global_registry`] backs [`ZodSchema::meta`](crate::ZodSchema::meta) and
//! [`ZodSchema::describe`](crate::ZodSchema::describe); user registries are
//! independent and any number can exist.

use std::collections::HashMap;
use std::sync::OnceLock;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::error::RegistryError;
use crate::internals::SchemaId;
use crate::schema::ZodSchema;
use crate::value::Value;

/// Metadata stored by a [`Registry`].
pub trait Metadata: Clone + Send + Sync {
    /// Unique identifier within one registry, if any.
    fn meta_id(&self) -> Option<&str>;

    /// Overlay `newer` onto `self`.
    fn merge(&mut self, newer: Self);
}

/// Metadata understood by the global registry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalMeta {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub deprecated: bool,
    pub examples: Vec<Value>,
    /// Free-form entries.
    pub extra: IndexMap<String, Value>,
}

impl GlobalMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    pub fn example(mut self, example: impl Into<Value>) -> Self {
        self.examples.push(example.into());
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

impl Metadata for GlobalMeta {
    fn meta_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn merge(&mut self, newer: Self) {
        if newer.id.is_some() {
            self.id = newer.id;
        }
        if newer.title.is_some() {
            self.title = newer.title;
        }
        if newer.description.is_some() {
            self.description = newer.description;
        }
        self.deprecated |= newer.deprecated;
        if !newer.examples.is_empty() {
            self.examples = newer.examples;
        }
        self.extra.extend(newer.extra);
    }
}

/// Thread-safe map from schema identity to metadata.
///
/// # Example
/// ```
/// use zodkit::prelude::*;
/// use zodkit::registry::{GlobalMeta, Registry};
///
/// let registry = Registry::new();
/// let email = zodkit::string().email();
/// registry.add(&email, GlobalMeta::new().id("email")).unwrap();
///
/// assert!(registry.has(&email));
/// assert_eq!(registry.find_by_id("email"), Some(email.id()));
/// assert!(registry.add(&zodkit::string(), GlobalMeta::new().id("email")).is_err());
/// ```
pub struct Registry<M: Metadata = GlobalMeta> {
    entries: RwLock<HashMap<SchemaId, M>>,
}

impl<M: Metadata> Default for Registry<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Metadata> Registry<M> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Register `schema`, rejecting a metadata id already used by another
    /// schema.
    pub fn add<S: ZodSchema>(&self, schema: &S, meta: M) -> Result<(), RegistryError> {
        let target = schema.id();
        let mut entries = self.entries.write();
        if let Some(id) = meta.meta_id() {
            let taken = entries
                .iter()
                .any(|(key, existing)| *key != target && existing.meta_id() == Some(id));
            if taken {
                return Err(RegistryError::DuplicateId(id.to_string()));
            }
        }
        tracing::trace!(schema = %target, "registry add");
        entries.insert(target, meta);
        Ok(())
    }

    /// Store metadata for an identity, replacing any previous entry.
    pub fn insert(&self, id: SchemaId, meta: M) {
        tracing::trace!(schema = %id, "registry insert");
        self.entries.write().insert(id, meta);
    }

    /// Metadata stored for exactly this schema.
    pub fn get<S: ZodSchema>(&self, schema: &S) -> Option<M> {
        self.get_by_key(schema.id())
    }

    pub fn get_by_key(&self, id: SchemaId) -> Option<M> {
        self.entries.read().get(&id).cloned()
    }

    /// Metadata of `id` merged over that of its ancestors, oldest first.
    pub fn get_with_lineage(&self, lineage: &[SchemaId], id: SchemaId) -> Option<M> {
        let entries = self.entries.read();
        lineage
            .iter()
            .chain(std::iter::once(&id))
            .filter_map(|key| entries.get(key))
            .cloned()
            .reduce(|mut acc, newer| {
                acc.merge(newer);
                acc
            })
    }

    pub fn remove<S: ZodSchema>(&self, schema: &S) -> Option<M> {
        let removed = self.entries.write().remove(&schema.id());
        if removed.is_some() {
            tracing::trace!(schema = %schema.id(), "registry remove");
        }
        removed
    }

    pub fn has<S: ZodSchema>(&self, schema: &S) -> bool {
        self.entries.read().contains_key(&schema.id())
    }

    /// Identity of the schema registered under metadata id `id`.
    pub fn find_by_id(&self, id: &str) -> Option<SchemaId> {
        self.entries
            .read()
            .iter()
            .find(|(_, meta)| meta.meta_id() == Some(id))
            .map(|(key, _)| *key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

/// The process-wide registry used by `meta` and `describe`.
pub fn global_registry() -> &'static Registry<GlobalMeta> {
    static GLOBAL: OnceLock<Registry<GlobalMeta>> = OnceLock::new();
    GLOBAL.get_or_init(Registry::new)
}
