//! Form definitions backing the site and admin routes.

use std::collections::BTreeMap;

use thiserror::Error;
use validator::ValidationErrors;

pub mod account;
pub mod booking;
pub mod contact;
pub mod filters;
pub mod patients;
pub mod testimonials;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Name is required")]
    InvalidName,

    #[error("Please enter a valid phone number")]
    InvalidPhoneNumber,

    #[error("Please pick a valid date")]
    InvalidDate,

    #[error("Please enter a valid date of birth")]
    InvalidBirthDate,

    #[error("Date of birth cannot be in the future")]
    FutureBirthDate,

    #[error("Condition is required")]
    InvalidCondition,

    #[error("Rating must be between 1 and 5")]
    InvalidRating,

    #[error("Message must be between 10 and 1000 characters")]
    InvalidMessage,

    #[error("Unknown status")]
    InvalidStatus,

    #[error("Unknown identifier")]
    InvalidId,
}

impl FormError {
    /// Name of the form field the error belongs to, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            FormError::Validation(_) | FormError::InvalidId => None,
            FormError::InvalidEmail => Some("email"),
            FormError::InvalidName => Some("name"),
            FormError::InvalidPhoneNumber => Some("phone"),
            FormError::InvalidDate => Some("date"),
            FormError::InvalidBirthDate | FormError::FutureBirthDate => Some("date_of_birth"),
            FormError::InvalidCondition => Some("condition"),
            FormError::InvalidRating => Some("rating"),
            FormError::InvalidMessage => Some("message"),
            FormError::InvalidStatus => Some("status"),
        }
    }

    /// Field-level messages suitable for inline display.
    pub fn field_errors(&self) -> BTreeMap<String, String> {
        match self {
            FormError::Validation(errors) => field_errors(errors),
            other => BTreeMap::from([(
                other.field().unwrap_or("form").to_string(),
                other.to_string(),
            )]),
        }
    }
}

/// Flattens `validator` errors into the first message per field.
pub fn field_errors(errors: &ValidationErrors) -> BTreeMap<String, String> {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errors)| {
            let error = errors.first()?;
            let message = error
                .message
                .as_ref()
                .map(|message| message.to_string())
                .unwrap_or_else(|| format!("Invalid {field}"));
            Some((field.to_string(), message))
        })
        .collect()
}

/// Treats blank optional inputs as absent.
pub(crate) fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use validator::Validate;

    use super::*;

    #[derive(Deserialize, Validate)]
    struct Sample {
        #[validate(length(min = 3, message = "Too short"))]
        name: String,
        #[validate(email)]
        email: String,
    }

    #[test]
    fn field_errors_prefer_custom_messages() {
        let sample = Sample {
            name: "ab".to_string(),
            email: "nope".to_string(),
        };

        let errors = field_errors(&sample.validate().unwrap_err());

        assert_eq!(errors.get("name").map(String::as_str), Some("Too short"));
        assert_eq!(errors.get("email").map(String::as_str), Some("Invalid email"));
    }

    #[test]
    fn payload_errors_map_to_their_field() {
        let errors = FormError::InvalidRating.field_errors();
        assert_eq!(
            errors.get("rating").map(String::as_str),
            Some("Rating must be between 1 and 5")
        );
    }

    #[test]
    fn blank_optional_text_is_none() {
        assert_eq!(optional_text("   "), None);
        assert_eq!(optional_text(" note "), Some("note".to_string()));
    }
}
