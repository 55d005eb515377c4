//! Per-field validation errors.
//!
//! Request DTOs derive [`validator::Validate`]; the resulting
//! [`validator::ValidationErrors`] are flattened into [`FieldErrors`], a
//! plain `field -> [messages]` map that serializes straight into the 400
//! response body. Uniqueness violations detected by the store use the same
//! shape so clients see one error format.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use validator::Validate;

use crate::error::CoreError;

/// Message used when a `Permission.code` collides with an existing one.
pub const DUPLICATE_CODE: &str = "permission with this code already exists.";

/// Message used when a `Person.email` collides with an existing one.
pub const DUPLICATE_EMAIL: &str = "person with this email already exists.";

/// Field name -> human-readable messages, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.0.get(field)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{field}: {}", messages.join(", "))?;
        }
        Ok(())
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, field_errors) in errors.field_errors() {
            let field = field.to_string();
            for error in field_errors.iter() {
                let message = match &error.message {
                    Some(message) => message.to_string(),
                    None => default_message(&error.code),
                };
                out.add(&field, message);
            }
        }
        out
    }
}

/// Fallback text for validator rules declared without a custom message.
fn default_message(code: &str) -> String {
    match code {
        "email" => "Enter a valid email address.".to_string(),
        "length" => "Ensure this field has a valid length.".to_string(),
        other => format!("Invalid value ({other})."),
    }
}

/// Run the derived validator rules on `input`, converting failures into
/// [`CoreError::Validation`].
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input.validate().map_err(CoreError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(
            min = 1,
            max = 7,
            message = "Ensure this field has at most 7 characters."
        ))]
        code: String,
        #[validate(email)]
        email: String,
    }

    #[test]
    fn valid_input_passes() {
        let input = Sample {
            code: "perm_1".into(),
            email: "person1@example.com".into(),
        };
        assert!(validate_input(&input).is_ok());
    }

    #[test]
    fn each_failing_field_is_reported() {
        let input = Sample {
            code: "far_too_long".into(),
            email: "not-an-email".into(),
        };
        let err = validate_input(&input).unwrap_err();
        assert_matches!(err, CoreError::Validation(fields) => {
            assert_eq!(
                fields.get("code").unwrap()[0],
                "Ensure this field has at most 7 characters."
            );
            assert_eq!(fields.get("email").unwrap()[0], "Enter a valid email address.");
        });
    }

    #[test]
    fn display_joins_fields() {
        let mut errors = FieldErrors::single("code", DUPLICATE_CODE);
        errors.add("name", "This field may not be blank.");
        assert_eq!(
            errors.to_string(),
            "code: permission with this code already exists.; name: This field may not be blank."
        );
    }

    #[test]
    fn serializes_as_plain_map() {
        let errors = FieldErrors::single("email", DUPLICATE_EMAIL);
        let json = serde_json::to_string(&errors).unwrap();
        assert_eq!(json, r#"{"email":["person with this email already exists."]}"#);
    }
}
