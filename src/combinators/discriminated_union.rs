use std::marker::PhantomData;

use indexmap::IndexMap;

use crate::config::ParseContext;
use crate::constraint::{Constraint, Required};
use crate::engine::{parse_complex, Extracted, Input, ParsePayload, Parsed, Source};
use crate::error::{IssueCode, PathSegment, RawIssue, SchemaBuildError};
use crate::internals::Internals;
use crate::object::ZObject;
use crate::schema::ZodType;
use crate::value::{ObjectMap, Value};

/// Union of object schemas selected by a discriminator field.
///
/// Created via [`zodkit::discriminated_union()`](crate::discriminated_union)
/// or [`zodkit::try_discriminated_union()`](crate::try_discriminated_union).
///
/// The branch is looked up by the discriminator value instead of trying each
/// branch in order, and the input is then parsed by that branch alone.
///
/// # Example
/// ```
/// use zodkit::prelude::*;
///
/// let event = zodkit::discriminated_union(
///     "type",
///     vec![
///         zodkit::object()
///             .field("type", zodkit::literal("click"))
///             .field("x", zodkit::int()),
///         zodkit::object()
///             .field("type", zodkit::literal("key"))
///             .field("code", zodkit::string()),
///     ],
/// );
///
/// assert!(event.parse(r#"{"type": "key", "code": "Enter"}"#).is_ok());
/// let err = event.parse(r#"{"type": "scroll"}"#).unwrap_err();
/// assert_eq!(err.issues[0].code.key(), "invalid_value");
/// ```
#[derive(Clone)]
pub struct ZDiscriminatedUnion<C: Constraint = Required> {
    pub(crate) internals: Internals<ObjectMap>,
    discriminator: String,
    branches: Vec<ZObject>,
    /// Discriminator value (rendered) to branch index.
    lookup: IndexMap<String, usize>,
    /// Discriminator values in branch order.
    values: Vec<Value>,
    pub(crate) _mode: PhantomData<C>,
}

zod_schema!(
    ZDiscriminatedUnion [],
    base = ObjectMap,
    fields = [discriminator, branches, lookup, values]
);

impl ZDiscriminatedUnion<Required> {
    pub fn try_new(
        discriminator: impl Into<String>,
        branches: Vec<ZObject>,
    ) -> Result<Self, SchemaBuildError> {
        let discriminator = discriminator.into();
        if branches.is_empty() {
            return Err(SchemaBuildError::NoBranches);
        }

        let mut lookup = IndexMap::new();
        let mut values = Vec::new();
        for (branch, schema) in branches.iter().enumerate() {
            let field = schema.field_schema(&discriminator).ok_or_else(|| {
                SchemaBuildError::MissingDiscriminator {
                    branch,
                    discriminator: discriminator.clone(),
                }
            })?;
            let accepted = field.literal_values().ok_or_else(|| {
                SchemaBuildError::NonLiteralDiscriminator {
                    branch,
                    discriminator: discriminator.clone(),
                }
            })?;
            for value in accepted {
                let key = value.to_string();
                match lookup.get(&key) {
                    Some(&first) if first != branch => {
                        return Err(SchemaBuildError::DuplicateDiscriminator {
                            value: key,
                            first,
                            second: branch,
                        });
                    }
                    Some(_) => {}
                    None => {
                        lookup.insert(key, branch);
                        values.push(value);
                    }
                }
            }
        }

        tracing::debug!(
            discriminator = %discriminator,
            branches = branches.len(),
            "discriminated union built"
        );
        Ok(Self {
            internals: Internals::new("object"),
            discriminator,
            branches,
            lookup,
            values,
            _mode: PhantomData,
        })
    }
}

impl<C: Constraint> ZDiscriminatedUnion<C> {
    fn run(&self, source: Source<'_, ObjectMap>, ctx: &ParseContext) -> Parsed<C::Out<ObjectMap>> {
        parse_complex::<ObjectMap, C, _>(&self.internals, source, ctx, |input, ctx| {
            let owned;
            let raw = match input {
                Input::Owned(map) => {
                    owned = Value::Object(map);
                    &owned
                }
                Input::Raw(Some(raw)) => raw,
                Input::Raw(None) => return Extracted::Mismatch,
            };
            let Some(obj) = raw.as_object() else {
                return Extracted::Mismatch;
            };

            let tag = match obj.get(&self.discriminator) {
                Some(tag) if !tag.is_null() => tag,
                _ => return Extracted::Failed(vec![self.missing(raw)]),
            };
            let Some(&index) = self.lookup.get(&tag.to_string()) else {
                let issue = RawIssue::new(IssueCode::InvalidValue, Some(tag))
                    .options(self.values.clone())
                    .with_prefix(self.segment());
                return Extracted::Failed(vec![issue]);
            };

            let parsed = self.branches[index].parse_input(Some(raw), ctx);
            match parsed.value {
                Some(value) => Extracted::Ok(ParsePayload {
                    value,
                    issues: parsed.issues,
                }),
                None => Extracted::Failed(parsed.issues),
            }
        })
    }

    fn segment(&self) -> PathSegment {
        PathSegment::Field(self.discriminator.clone())
    }

    fn missing(&self, input: &Value) -> RawIssue {
        let mut issue = RawIssue::new(IssueCode::MissingDiscriminator, Some(input));
        issue.details.discriminator = Some(self.discriminator.clone());
        issue.with_prefix(self.segment())
    }

    pub fn discriminator(&self) -> &str {
        &self.discriminator
    }

    /// Branch schemas in declaration order.
    pub fn options(&self) -> &[ZObject] {
        &self.branches
    }

    /// Each accepted discriminator value with the branch it selects.
    pub fn discriminator_map(&self) -> Vec<(&Value, &ZObject)> {
        self.values
            .iter()
            .zip(self.lookup.values())
            .map(|(value, &index)| (value, &self.branches[index]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branch(tag: &str) -> ZObject {
        ZObject::new().field("kind", crate::literal(tag.to_string()))
    }

    #[test]
    fn rejects_duplicate_values() {
        let err = ZDiscriminatedUnion::try_new("kind", vec![branch("a"), branch("a")]).err();
        assert_eq!(
            err,
            Some(SchemaBuildError::DuplicateDiscriminator {
                value: "\"a\"".into(),
                first: 0,
                second: 1,
            })
        );
    }

    #[test]
    fn rejects_non_literal_discriminator() {
        let plain = ZObject::new().field("kind", crate::string());
        let err = ZDiscriminatedUnion::try_new("kind", vec![plain]).err();
        assert!(matches!(
            err,
            Some(SchemaBuildError::NonLiteralDiscriminator { branch: 0, .. })
        ));
    }

    #[test]
    fn rejects_branch_without_field() {
        let err = ZDiscriminatedUnion::try_new("type", vec![branch("a")]).err();
        assert!(matches!(
            err,
            Some(SchemaBuildError::MissingDiscriminator { branch: 0, .. })
        ));
        assert_eq!(
            ZDiscriminatedUnion::try_new("kind", Vec::new()).err(),
            Some(SchemaBuildError::NoBranches)
        );
    }

    #[test]
    fn map_follows_branch_order() {
        let union = ZDiscriminatedUnion::try_new("kind", vec![branch("a"), branch("b")]).unwrap();
        let map = union.discriminator_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map[1].0, &Value::from("b"));
        assert_eq!(union.discriminator(), "kind");
    }
}
