use std::marker::PhantomData;

use crate::config::ParseContext;
use crate::constraint::{Constraint, Required};
use crate::engine::{parse_complex, Extracted, Input, Parsed, Source};
use crate::error::{IssueCode, PathSegment, RawIssue};
use crate::internals::Internals;
use crate::schema::ZodType;
use crate::value::{ToValue, Value};

/// Intersection: the input must satisfy both schemas. Created via
/// [`zodkit::intersection()`](crate::intersection) or [`ZodType::and`].
///
/// Both outputs are merged: objects by key, anything else (arrays included)
/// must be equal. A key rejected as unknown by only one side is accepted.
///
/// # Example
/// ```
/// use zodkit::prelude::*;
///
/// let named = zodkit::object().field("name", zodkit::string());
/// let aged = zodkit::object().field("age", zodkit::int());
/// let person = named.and(aged);
///
/// let out = person.parse(r#"{"name": "Ann", "age": 30}"#).unwrap();
/// assert_eq!(out.get("age"), Some(&Value::Int(30)));
/// ```
pub struct ZIntersection<A, B, C: Constraint = Required> {
    pub(crate) internals: Internals<Value>,
    left: A,
    right: B,
    pub(crate) _mode: PhantomData<C>,
}

zod_schema!(
    ZIntersection [A, B],
    base = Value,
    fields = [left, right],
    where
        A: ZodType + Clone,
        A::Output: ToValue,
        B: ZodType + Clone,
        B::Output: ToValue
);

impl<A: Clone, B: Clone, C: Constraint> Clone for ZIntersection<A, B, C> {
    fn clone(&self) -> Self {
        Self {
            internals: self.internals.clone(),
            left: self.left.clone(),
            right: self.right.clone(),
            _mode: PhantomData,
        }
    }
}

impl<A, B> ZIntersection<A, B, Required> {
    pub fn new(left: A, right: B) -> Self {
        Self {
            internals: Internals::new("intersection").pass_nil(),
            left,
            right,
            _mode: PhantomData,
        }
    }
}

impl<A, B, C> ZIntersection<A, B, C>
where
    A: ZodType + Clone,
    A::Output: ToValue,
    B: ZodType + Clone,
    B::Output: ToValue,
    C: Constraint,
{
    fn run(&self, source: Source<'_, Value>, ctx: &ParseContext) -> Parsed<C::Out<Value>> {
        parse_complex::<Value, C, _>(&self.internals, source, ctx, |input, ctx| {
            let owned;
            let raw = match input {
                Input::Owned(value) => {
                    owned = value;
                    Some(&owned)
                }
                Input::Raw(raw) => raw,
            };

            let left = self.left.parse_input(raw, ctx);
            if ctx.abort_early && !left.issues.is_empty() {
                return Extracted::Failed(left.issues);
            }
            let right = self.right.parse_input(raw, ctx);

            let (left_keys, mut issues) = split_unrecognized(left.issues);
            let (right_keys, right_issues) = split_unrecognized(right.issues);
            issues.extend(right_issues);
            let shared: Vec<String> = left_keys
                .into_iter()
                .filter(|k| right_keys.contains(k))
                .collect();
            if !shared.is_empty() {
                issues.push(RawIssue::new(IssueCode::UnrecognizedKeys, raw).keys(shared));
            }
            if !issues.is_empty() {
                return Extracted::Failed(issues);
            }

            let (Some(l), Some(r)) = (left.value, right.value) else {
                return Extracted::Failed(issues);
            };
            match merge_values(l.to_value(), r.to_value()) {
                Ok(merged) => Extracted::value(merged),
                Err(path) => Extracted::Failed(vec![incompatible(raw, &path)]),
            }
        })
    }

    pub fn left(&self) -> &A {
        &self.left
    }

    pub fn right(&self) -> &B {
        &self.right
    }
}

/// Separate root-level `unrecognized_keys` issues into their key lists.
fn split_unrecognized(issues: Vec<RawIssue>) -> (Vec<String>, Vec<RawIssue>) {
    let mut keys = Vec::new();
    let mut rest = Vec::new();
    for issue in issues {
        if issue.code == IssueCode::UnrecognizedKeys && issue.path.is_empty() {
            keys.extend(issue.keys);
        } else {
            rest.push(issue);
        }
    }
    (keys, rest)
}

fn incompatible(input: Option<&Value>, path: &[PathSegment]) -> RawIssue {
    let issue = RawIssue::new(IssueCode::IncompatibleTypes, input);
    if path.is_empty() {
        return issue;
    }
    let key: String = path.iter().map(|s| s.to_string()).collect();
    let key = key.strip_prefix('.').unwrap_or(&key).to_string();
    issue.message(format!(
        "Invalid input: conflicting values for key \"{}\"",
        key
    ))
}

/// Merge two parse outputs.
///
/// Equal values collapse and null yields to the other side. Objects merge
/// key by key. Arrays and scalars must be equal. On conflict the path of the
/// first incompatible pair is returned.
pub(crate) fn merge_values(a: Value, b: Value) -> Result<Value, Vec<PathSegment>> {
    if a == b {
        return Ok(a);
    }
    match (a, b) {
        (Value::Null, other) | (other, Value::Null) => Ok(other),
        (Value::Object(mut left), Value::Object(right)) => {
            for (key, value) in right {
                match left.get_mut(&key) {
                    Some(existing) => {
                        let merged = merge_values(std::mem::take(existing), value)
                            .map_err(|path| prefixed(PathSegment::Field(key.clone()), path))?;
                        *existing = merged;
                    }
                    None => {
                        left.insert(key, value);
                    }
                }
            }
            Ok(Value::Object(left))
        }
        _ => Err(Vec::new()),
    }
}

fn prefixed(segment: PathSegment, mut path: Vec<PathSegment>) -> Vec<PathSegment> {
    path.insert(0, segment);
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ObjectMap;

    fn obj(pairs: &[(&str, Value)]) -> Value {
        Value::Object(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<ObjectMap>(),
        )
    }

    #[test]
    fn objects_union_their_keys() {
        let merged = merge_values(
            obj(&[("a", Value::from("x"))]),
            obj(&[("b", Value::Int(1))]),
        )
        .unwrap();
        assert_eq!(merged, obj(&[("a", Value::from("x")), ("b", Value::Int(1))]));
    }

    #[test]
    fn nested_conflict_reports_path() {
        let left = obj(&[("a", obj(&[("b", Value::Int(1))]))]);
        let right = obj(&[("a", obj(&[("b", Value::Int(2))]))]);
        let path = merge_values(left, right).unwrap_err();
        assert_eq!(
            path,
            vec![PathSegment::Field("a".into()), PathSegment::Field("b".into())]
        );
    }

    #[test]
    fn null_yields_to_other_side() {
        assert_eq!(merge_values(Value::Null, Value::Int(3)), Ok(Value::Int(3)));
        assert_eq!(merge_values(Value::from("s"), Value::Null), Ok(Value::from("s")));
    }

    #[test]
    fn arrays_must_be_equal() {
        let a = Value::Array(vec![Value::Int(1)]);
        let b = Value::Array(vec![Value::Int(1), Value::Int(2)]);
        assert!(merge_values(a, b).is_err());
        assert!(merge_values(Value::Int(1), Value::from("1")).is_err());

        let left = Value::Array(vec![obj(&[("a", Value::Int(1))])]);
        let right = Value::Array(vec![obj(&[("b", Value::Int(2))])]);
        assert_eq!(merge_values(left, right), Err(Vec::new()));
    }

    #[test]
    fn unknown_key_accepted_by_one_side_is_dropped() {
        let left = crate::strict_object().field("a", crate::string());
        let right = crate::object().field("b", crate::int());
        let schema = ZIntersection::new(left, right);
        let input = obj(&[("a", Value::from("x")), ("b", Value::Int(1))]);
        let out = schema.parse_value(&input).unwrap();
        assert_eq!(out, input);

        let input = obj(&[("a", Value::from("x")), ("b", Value::Int(1)), ("c", Value::Null)]);
        let parsed = schema.parse_input(Some(&input), &ParseContext::new());
        assert!(parsed.issues.is_empty());

        let both_strict = ZIntersection::new(
            crate::strict_object().field("a", crate::string()),
            crate::strict_object().field("b", crate::int()),
        );
        let err = both_strict.parse_value(&input).unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issues[0].keys, vec!["c".to_string()]);
    }
}
