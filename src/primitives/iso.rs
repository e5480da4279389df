//! ISO 8601 string schemas.
//!
//! Each constructor returns a [`ZString`] carrying the matching format check,
//! so the output is the validated string and every string method stays
//! available.
//!
//! ```
//! use zodkit::prelude::*;
//! use zodkit::iso;
//!
//! assert!(iso::date().parse(r#""2024-02-29""#).is_ok());
//! assert!(iso::datetime().parse(r#""2024-01-01T00:00:00Z""#).is_ok());
//!
//! let local = iso::datetime_with(iso::IsoDatetimeOptions { local: true, ..Default::default() });
//! assert!(local.parse(r#""2024-01-01T00:00""#).is_ok());
//! ```

use super::ZString;
use crate::checks::{self, StringFormat};
use crate::schema::ZodSchema;

pub use crate::checks::IsoDatetimeOptions;

/// `YYYY-MM-DD`
pub fn date() -> ZString {
    ZString::new().check(checks::format(StringFormat::Date))
}

/// `HH:MM[:SS[.s+]]`
pub fn time() -> ZString {
    time_with(None)
}

/// Time with an exact number of fractional-second digits.
pub fn time_with(precision: Option<u8>) -> ZString {
    ZString::new().check(checks::format(StringFormat::Time { precision }))
}

/// UTC datetime (`Z` designator required).
pub fn datetime() -> ZString {
    datetime_with(IsoDatetimeOptions::default())
}

pub fn datetime_with(options: IsoDatetimeOptions) -> ZString {
    ZString::new().check(checks::format(StringFormat::Datetime(options)))
}

/// `PnYnMnWnDTnHnMnS`
pub fn duration() -> ZString {
    ZString::new().check(checks::format(StringFormat::Duration))
}
