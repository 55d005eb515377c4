use crate::types::DbId;
use crate::validation::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// An operation whose precondition on current state does not hold,
    /// e.g. removing a relation that is not present.
    #[error("{0}")]
    InvalidState(String),
}

impl CoreError {
    /// Shorthand for a validation failure on a single field.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        CoreError::Validation(FieldErrors::single(field, message))
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CoreError::Validation(FieldErrors::from(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity_and_id() {
        let err = CoreError::NotFound {
            entity: "Role",
            id: 9999,
        };
        assert_eq!(err.to_string(), "Role with id 9999 not found");
    }

    #[test]
    fn invalid_state_displays_message_verbatim() {
        let err = CoreError::InvalidState("The role does not have this permission.".into());
        assert_eq!(err.to_string(), "The role does not have this permission.");
    }

    #[test]
    fn field_shorthand_builds_single_entry() {
        let err = CoreError::field("email", "person with this email already exists.");
        match err {
            CoreError::Validation(fields) => {
                assert_eq!(
                    fields.get("email"),
                    Some(&vec!["person with this email already exists.".to_string()])
                );
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
