//! Coercing constructors.
//!
//! Each schema here converts compatible foreign input before validating:
//!
//! ```
//! use zodkit::prelude::*;
//!
//! assert_eq!(zodkit::coerce::string().parse("42").unwrap(), "42");
//! assert_eq!(zodkit::coerce::int().parse(r#"" 7 ""#).unwrap(), 7);
//! assert!(zodkit::coerce::boolean().parse(r#""1""#).unwrap());
//! ```

use crate::checks::Numeric;
use crate::primitives::{ZBool, ZNumber, ZString};
use crate::schema::ZodSchema;
use crate::value::Value;

/// Base types with a type-specific conversion from foreign input.
pub trait Coercible: Sized {
    fn coerce_from(value: &Value) -> Option<Self>;
}

impl Coercible for String {
    /// Numbers and booleans are rendered; valid UTF-8 bytes are decoded.
    fn coerce_from(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Int(i) => Some(i.to_string()),
            Value::Uint(u) => Some(u.to_string()),
            Value::Float(f) if f.is_nan() => Some("NaN".to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Bytes(b) => String::from_utf8(b.clone()).ok(),
            _ => None,
        }
    }
}

impl Coercible for bool {
    /// `"true"`/`"1"` and `"false"`/`"0"`; numbers are `false` only at zero.
    fn coerce_from(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            Value::Int(i) => Some(*i != 0),
            Value::Uint(u) => Some(*u != 0),
            Value::Float(f) => Some(*f != 0.0 && !f.is_nan()),
            _ => None,
        }
    }
}

macro_rules! coercible_numeric {
    ($($t:ty),*) => {
        $(impl Coercible for $t {
            fn coerce_from(value: &Value) -> Option<Self> {
                <$t as Numeric>::coerce(value)
            }
        })*
    };
}

coercible_numeric!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

pub fn string() -> ZString {
    crate::string().coerce()
}

pub fn number() -> ZNumber<f64> {
    crate::number().coerce()
}

pub fn int() -> ZNumber<i64> {
    crate::int().coerce()
}

pub fn boolean() -> ZBool {
    crate::boolean().coerce()
}
