//! Request-body validation with field-level error detail.
//!
//! DESIGN
//! ======
//! Validators collect every failing field instead of stopping at the first
//! one, then render the result as a tree keyed by field name so callers can
//! show each message next to the offending input.

use std::sync::LazyLock;

use serde::Serialize;
use serde_json::{Map, Value, json};

/// Maximum allowed email length (RFC 5321).
pub const MAX_EMAIL_LENGTH: usize = 254;

static EMAIL_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(
        r"(?i)^[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?$",
    )
    .expect("EMAIL_REGEX is a valid regex pattern")
});

/// A single validation failure. `field` is `None` for body-level problems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub code: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn field(field: impl Into<String>, code: &'static str, message: impl Into<String>) -> Self {
        Self { field: Some(field.into()), code, message: message.into() }
    }

    pub fn body(code: &'static str, message: impl Into<String>) -> Self {
        Self { field: None, code, message: message.into() }
    }
}

/// Every failure found while validating one payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, err: ValidationError) {
        self.0.push(err);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    /// Errors reported against `field`.
    #[cfg(test)]
    pub(crate) fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a ValidationError> + 'a {
        self.0.iter().filter(move |e| e.field.as_deref() == Some(field))
    }

    /// Render as `{"errors": [msg], "properties": {"<name>": {"errors": [msg]}}}`.
    #[must_use]
    pub fn to_details(&self) -> Value {
        let mut body_errors = Vec::new();
        let mut properties: Map<String, Value> = Map::new();
        for err in &self.0 {
            let message = Value::String(err.message.clone());
            match &err.field {
                None => body_errors.push(message),
                Some(name) => {
                    let slot = properties
                        .entry(name.clone())
                        .or_insert_with(|| json!({ "errors": [] }));
                    if let Some(list) = slot.get_mut("errors").and_then(Value::as_array_mut) {
                        list.push(message);
                    }
                }
            }
        }
        json!({ "errors": body_errors, "properties": properties })
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(err: ValidationError) -> Self {
        Self(vec![err])
    }
}

/// Validate an email address against an RFC 5322 style pattern.
///
/// # Errors
///
/// Returns a `ValidationError` for `field` naming the first rule violated.
pub fn validate_email(field: &str, email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::field(field, "required", "Email is required"));
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::field(
            field,
            "too_long",
            format!("Email must not exceed {MAX_EMAIL_LENGTH} characters"),
        ));
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::field(field, "invalid_format", "Invalid email address"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "validation_test.rs"]
mod tests;
