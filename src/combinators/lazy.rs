use std::marker::PhantomData;
use std::sync::{Arc, OnceLock, Weak};

use crate::config::ParseContext;
use crate::constraint::{Constraint, Required};
use crate::engine::{parse_complex, Extracted, Input, Parsed, Source};
use crate::error::RawIssue;
use crate::internals::Internals;
use crate::schema::{SchemaRef, ZodType};
use crate::value::Value;

type Getter = Box<dyn Fn() -> SchemaRef + Send + Sync>;

struct LazyCell {
    schema: OnceLock<SchemaRef>,
    getter: Getter,
}

impl LazyCell {
    fn resolve(&self) -> &SchemaRef {
        self.schema.get_or_init(|| {
            tracing::trace!("resolving lazy schema");
            (self.getter)()
        })
    }
}

#[derive(Clone)]
enum Edge {
    Strong(Arc<LazyCell>),
    /// Self-reference handed to a recursive definition.
    Weak(Weak<LazyCell>),
}

/// Schema built on first use. Created via [`zodkit::lazy()`](crate::lazy)
/// or [`zodkit::recursive()`](crate::recursive).
///
/// The getter runs at most once, even under concurrent parses; every clone
/// shares the memoised schema. Recursive definitions receive a handle to
/// the schema being defined, which refers back to it without keeping it
/// alive.
///
/// # Example
/// ```
/// use zodkit::prelude::*;
///
/// let tree = zodkit::recursive(|node| {
///     zodkit::object()
///         .field("value", zodkit::int())
///         .field("children", zodkit::slice(node))
/// });
///
/// let input = r#"{"value": 1, "children": [{"value": 2, "children": []}]}"#;
/// assert!(tree.parse(input).is_ok());
/// assert!(tree.parse(r#"{"value": 1, "children": [{"value": "x", "children": []}]}"#).is_err());
/// ```
#[derive(Clone)]
pub struct ZLazy<C: Constraint = Required> {
    pub(crate) internals: Internals<Value>,
    edge: Edge,
    pub(crate) _mode: PhantomData<C>,
}

zod_schema!(ZLazy [], base = Value, fields = [edge]);

impl ZLazy<Required> {
    pub fn new<S, F>(getter: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: ZodType + 'static,
        S::Output: crate::value::ToValue,
    {
        let cell = LazyCell {
            schema: OnceLock::new(),
            getter: Box::new(move || getter().into_dyn()),
        };
        Self::with_edge(Edge::Strong(Arc::new(cell)))
    }

    /// Lazy schema whose getter receives a handle to the schema itself.
    pub fn recursive<S, F>(getter: F) -> Self
    where
        F: Fn(ZLazy) -> S + Send + Sync + 'static,
        S: ZodType + 'static,
        S::Output: crate::value::ToValue,
    {
        let cell = Arc::new_cyclic(|weak: &Weak<LazyCell>| {
            let back = weak.clone();
            LazyCell {
                schema: OnceLock::new(),
                getter: Box::new(move || {
                    getter(ZLazy::with_edge(Edge::Weak(back.clone()))).into_dyn()
                }),
            }
        });
        Self::with_edge(Edge::Strong(cell))
    }

    fn with_edge(edge: Edge) -> Self {
        Self {
            internals: Internals::new("lazy").pass_nil(),
            edge,
            _mode: PhantomData,
        }
    }
}

impl<C: Constraint> ZLazy<C> {
    fn run(&self, source: Source<'_, Value>, ctx: &ParseContext) -> Parsed<C::Out<Value>> {
        parse_complex::<Value, C, _>(&self.internals, source, ctx, |input, ctx| {
            let Some(cell) = self.cell() else {
                return Extracted::Failed(vec![RawIssue::custom(
                    "Invalid input: lazy schema no longer exists",
                    input.raw(),
                )]);
            };
            let owned;
            let raw = match input {
                Input::Owned(value) => {
                    owned = value;
                    Some(&owned)
                }
                Input::Raw(raw) => raw,
            };
            let parsed = cell.resolve().parse_input(raw, ctx);
            match parsed.value {
                Some(value) if parsed.issues.is_empty() => Extracted::value(value),
                _ => Extracted::Failed(parsed.issues),
            }
        })
    }

    fn cell(&self) -> Option<Arc<LazyCell>> {
        match &self.edge {
            Edge::Strong(cell) => Some(Arc::clone(cell)),
            Edge::Weak(cell) => cell.upgrade(),
        }
    }

    /// The memoised schema, resolving it if needed.
    pub fn schema(&self) -> Option<SchemaRef> {
        self.cell().map(|cell| Arc::clone(cell.resolve()))
    }

    /// Whether the getter has already run.
    pub fn is_resolved(&self) -> bool {
        self.cell().is_some_and(|cell| cell.schema.get().is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn getter_runs_once_across_clones() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let schema = ZLazy::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            crate::string()
        });
        let copy = schema.clone();
        assert!(!schema.is_resolved());
        assert!(schema.parse_value(&Value::from("a")).is_ok());
        assert!(copy.parse_value(&Value::Int(1)).is_err());
        assert!(copy.is_resolved());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn recursive_handle_does_not_keep_cell_alive() {
        let schema = ZLazy::recursive(|this| crate::slice(this));
        let Edge::Strong(cell) = &schema.edge else {
            panic!("root edge must be strong");
        };
        let weak = Arc::downgrade(cell);
        assert!(schema.parse_value(&Value::Array(vec![Value::Array(vec![])])).is_ok());
        drop(schema);
        assert!(weak.upgrade().is_none());
    }
}
