use crate::config::ParseContext;
use crate::engine::finalize;
use crate::error::{RawIssue, ZodError};
use crate::value::Value;

/// Trait for types that can be used as input to schema parsing.
///
/// Implemented for [`Value`], `serde_json::Value`, JSON text (`&str`,
/// `String`), raw JSON bytes (`[u8]`) and file paths (`Path`, `PathBuf`,
/// requires the `std` feature).
pub trait ZodInput {
    /// Convert this input into a [`Value`].
    fn to_input_value(&self) -> Result<Value, ZodError>;
}

fn input_error(message: String) -> ZodError {
    let issue = RawIssue::custom(message, None).origin("input");
    finalize(vec![issue], &ParseContext::default())
}

impl ZodInput for Value {
    fn to_input_value(&self) -> Result<Value, ZodError> {
        Ok(self.clone())
    }
}

impl ZodInput for serde_json::Value {
    fn to_input_value(&self) -> Result<Value, ZodError> {
        Ok(Value::from(self))
    }
}

impl ZodInput for str {
    fn to_input_value(&self) -> Result<Value, ZodError> {
        serde_json::from_str::<serde_json::Value>(self)
            .map(Value::from)
            .map_err(|e| input_error(format!("Invalid JSON: {}", e)))
    }
}

impl ZodInput for String {
    fn to_input_value(&self) -> Result<Value, ZodError> {
        self.as_str().to_input_value()
    }
}

impl ZodInput for [u8] {
    fn to_input_value(&self) -> Result<Value, ZodError> {
        serde_json::from_slice::<serde_json::Value>(self)
            .map(Value::from)
            .map_err(|e| input_error(format!("Invalid JSON: {}", e)))
    }
}

#[cfg(feature = "std")]
impl ZodInput for std::path::Path {
    fn to_input_value(&self) -> Result<Value, ZodError> {
        let content = std::fs::read_to_string(self)
            .map_err(|e| input_error(format!("Failed to read file: {}", e)))?;
        content.as_str().to_input_value()
    }
}

#[cfg(feature = "std")]
impl ZodInput for std::path::PathBuf {
    fn to_input_value(&self) -> Result<Value, ZodError> {
        self.as_path().to_input_value()
    }
}
