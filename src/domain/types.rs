//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (non-empty identifiers, normalized
//! email, ratings within range) so that once a value reaches the domain layer
//! it can be treated as trusted.
use std::ops::Deref;
use std::str::FromStr;

use chrono::NaiveDate;
use phonenumber::{Mode, parse};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;
use uuid::Uuid;
use validator::ValidateEmail;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier was blank.
    #[error("id cannot be empty")]
    EmptyId,
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// Phone number did not meet expected format.
    #[error("invalid phone number")]
    InvalidPhone,
    /// Rating outside of the 1..=5 scale.
    #[error("rating must be between 1 and 5")]
    InvalidRating,
    /// Date could not be parsed or is outside the allowed range.
    #[error("invalid date")]
    InvalidDate,
}

/// Normalizes and validates an email string.
fn normalize_email<S: Into<String>>(email: S) -> Result<String, TypeConstraintError> {
    let normalized = email.into().trim().to_lowercase();
    if normalized.validate_email() {
        Ok(normalized)
    } else {
        Err(TypeConstraintError::InvalidEmail)
    }
}

/// Macro to generate opaque string identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier ensuring it is not blank.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let value = value.into().trim().to_string();
                if value.is_empty() {
                    Err(TypeConstraintError::EmptyId)
                } else {
                    Ok(Self(value))
                }
            }

            /// Assigns a fresh random identifier, the way a backend would.
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Wraps a compile-time slug used by seeded content.
            pub(crate) fn from_static(value: &'static str) -> Self {
                Self(value.to_string())
            }

            /// Borrow the identifier as a `&str`.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl FromStr for $name {
            type Err = TypeConstraintError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(PatientId, "Unique identifier for a patient record.");
id_newtype!(TestimonialId, "Unique identifier for a testimonial.");
id_newtype!(AppointmentId, "Unique identifier for a booked appointment.");
id_newtype!(DoctorId, "Unique identifier for a clinic doctor.");
id_newtype!(ServiceId, "Slug identifying a treatment offered by the clinic.");

/// Lower-cased and validated email address.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PatientEmail(String);

impl PatientEmail {
    /// Validates and normalizes an email string.
    pub fn new<S: Into<String>>(email: S) -> Result<Self, TypeConstraintError> {
        let normalized = normalize_email(email)?;
        Ok(Self(normalized))
    }

    /// Borrow the email as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the owned inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for PatientEmail {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for PatientEmail {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

non_empty_string_newtype!(PersonName, "Patient or author name enforcing non-empty values.");
non_empty_string_newtype!(ConditionLabel, "Primary complaint recorded for a patient.");

/// Testimonial body, sanitized of markup and trimmed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TestimonialMessage(String);

impl TestimonialMessage {
    pub const MIN_LEN: usize = 10;
    pub const MAX_LEN: usize = 1000;

    /// Sanitizes the text and enforces the 10..=1000 character window.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let sanitized = ammonia::clean(&value.into());
        let inner = NonEmptyString::new(sanitized)?.into_inner();
        let len = inner.chars().count();
        if !(Self::MIN_LEN..=Self::MAX_LEN).contains(&len) {
            return Err(TypeConstraintError::InvalidValue(format!(
                "message must be between {} and {} characters",
                Self::MIN_LEN,
                Self::MAX_LEN
            )));
        }
        Ok(Self(inner))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Star rating on a 1 to 5 scale.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, TypeConstraintError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::InvalidRating)
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = TypeConstraintError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

impl Display for Rating {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalizes a phone number string to E.164 format.
pub fn normalize_phone_to_e164(value: &str) -> Result<String, TypeConstraintError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TypeConstraintError::EmptyString);
    }
    let parsed = parse(None, trimmed).map_err(|_| TypeConstraintError::InvalidPhone)?;
    Ok(parsed.format().mode(Mode::E164).to_string())
}

/// Normalized phone number wrapper (expected E.164).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Constructs a phone number ensuring it is valid and normalizes to E.164 format.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let normalized = normalize_phone_to_e164(&value.into())?;
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Parses the `YYYY-MM-DD` value produced by an HTML date picker.
pub fn parse_picker_date(value: &str) -> Result<NaiveDate, TypeConstraintError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| TypeConstraintError::InvalidDate)
}

/// Formats a date the way an HTML date picker expects it.
pub fn format_picker_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_reject_blank_values() {
        assert_eq!(PatientId::new("   "), Err(TypeConstraintError::EmptyId));
        assert_eq!(PatientId::new(" p-1 ").unwrap().as_str(), "p-1");
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(TestimonialId::generate(), TestimonialId::generate());
    }

    #[test]
    fn ids_deserialize_through_validation() {
        let id: DoctorId = serde_json::from_str("\"dr-lee\"").unwrap();
        assert_eq!(id.as_str(), "dr-lee");
        assert!(serde_json::from_str::<DoctorId>("\"  \"").is_err());
    }

    #[test]
    fn rating_is_bounded() {
        assert!(Rating::new(0).is_err());
        assert!(Rating::new(6).is_err());
        assert_eq!(Rating::new(5).unwrap().get(), 5);
        assert!(serde_json::from_str::<Rating>("7").is_err());
    }

    #[test]
    fn email_is_normalized() {
        let email = PatientEmail::new("  Jane@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "jane@example.com");
        assert_eq!(
            PatientEmail::new("not-an-email"),
            Err(TypeConstraintError::InvalidEmail)
        );
    }

    #[test]
    fn testimonial_message_is_sanitized_and_bounded() {
        let message = TestimonialMessage::new("<b>Great care</b> from the whole team").unwrap();
        assert_eq!(message.as_str(), "<b>Great care</b> from the whole team");

        let stripped = TestimonialMessage::new("<script>x</script>Fantastic physio!").unwrap();
        assert_eq!(stripped.as_str(), "Fantastic physio!");

        assert!(TestimonialMessage::new("too short").is_err());
        assert!(TestimonialMessage::new("x".repeat(1001)).is_err());
    }

    #[test]
    fn phone_numbers_normalize_to_e164() {
        let phone = PhoneNumber::new("+1 202 555 0143").unwrap();
        assert_eq!(phone.as_str(), "+12025550143");
        assert_eq!(
            PhoneNumber::new("call me"),
            Err(TypeConstraintError::InvalidPhone)
        );
    }

    #[test]
    fn picker_dates_round_trip() {
        let date = parse_picker_date("2026-03-09").unwrap();
        assert_eq!(format_picker_date(date), "2026-03-09");
        assert_eq!(
            parse_picker_date("09/03/2026"),
            Err(TypeConstraintError::InvalidDate)
        );
    }
}
