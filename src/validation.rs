//! Pure field and form validators shared by the account and contact pages.

use std::collections::BTreeMap;

use serde::Serialize;
use validator::ValidateEmail;

use crate::domain::types::normalize_phone_to_e164;

pub type FieldResult = Result<(), &'static str>;

pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Please enter a valid email address";
pub const PASSWORD_REQUIRED: &str = "Password is required";
pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";
pub const NAME_REQUIRED: &str = "Name is required";
pub const PHONE_INVALID: &str = "Please enter a valid phone number";
pub const MESSAGE_TOO_SHORT: &str = "Message must be at least 10 characters";

const MESSAGE_MIN_LEN: usize = 10;

/// Minimum password length depends on where the password is entered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PasswordPolicy {
    Login,
    Register,
}

impl PasswordPolicy {
    pub fn min_len(self) -> usize {
        match self {
            PasswordPolicy::Login => 4,
            PasswordPolicy::Register => 8,
        }
    }

    fn too_short(self) -> &'static str {
        match self {
            PasswordPolicy::Login => "Password must be at least 4 characters",
            PasswordPolicy::Register => "Password must be at least 8 characters",
        }
    }
}

pub fn validate_email(email: &str) -> FieldResult {
    let email = email.trim();
    if email.is_empty() {
        return Err(EMAIL_REQUIRED);
    }
    if !email.validate_email() {
        return Err(EMAIL_INVALID);
    }
    Ok(())
}

pub fn validate_password(password: &str, policy: PasswordPolicy) -> FieldResult {
    if password.is_empty() {
        return Err(PASSWORD_REQUIRED);
    }
    if password.chars().count() < policy.min_len() {
        return Err(policy.too_short());
    }
    Ok(())
}

pub fn validate_confirm_password(password: &str, confirm: &str) -> FieldResult {
    if password != confirm {
        return Err(PASSWORDS_DO_NOT_MATCH);
    }
    Ok(())
}

pub fn validate_name(name: &str) -> FieldResult {
    if name.trim().is_empty() {
        return Err(NAME_REQUIRED);
    }
    Ok(())
}

/// Phone is optional; when present it must parse as an international number.
pub fn validate_phone(phone: &str) -> FieldResult {
    if phone.trim().is_empty() {
        return Ok(());
    }
    normalize_phone_to_e164(phone).map(|_| ()).map_err(|_| PHONE_INVALID)
}

pub fn validate_message(message: &str) -> FieldResult {
    if message.trim().chars().count() < MESSAGE_MIN_LEN {
        return Err(MESSAGE_TOO_SHORT);
    }
    Ok(())
}

/// Outcome of validating a whole form: the first error per field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: BTreeMap<String, String>,
}

impl ValidationReport {
    fn collect<'a>(checks: impl IntoIterator<Item = (&'a str, FieldResult)>) -> Self {
        let errors: BTreeMap<String, String> = checks
            .into_iter()
            .filter_map(|(field, result)| {
                result
                    .err()
                    .map(|message| (field.to_string(), message.to_string()))
            })
            .collect();
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }
}

pub fn validate_login(email: &str, password: &str) -> ValidationReport {
    ValidationReport::collect([
        ("email", validate_email(email)),
        ("password", validate_password(password, PasswordPolicy::Login)),
    ])
}

pub fn validate_register(
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> ValidationReport {
    ValidationReport::collect([
        ("name", validate_name(name)),
        ("email", validate_email(email)),
        ("password", validate_password(password, PasswordPolicy::Register)),
        (
            "confirm_password",
            validate_confirm_password(password, confirm_password),
        ),
    ])
}

pub fn validate_contact(name: &str, email: &str, phone: &str, message: &str) -> ValidationReport {
    ValidationReport::collect([
        ("name", validate_name(name)),
        ("email", validate_email(email)),
        ("phone", validate_phone(phone)),
        ("message", validate_message(message)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_rules() {
        assert_eq!(validate_email("a@b.com"), Ok(()));
        assert_eq!(validate_email("not-an-email"), Err(EMAIL_INVALID));
        assert_eq!(validate_email(""), Err(EMAIL_REQUIRED));
        assert_eq!(validate_email("   "), Err(EMAIL_REQUIRED));
    }

    #[test]
    fn password_lengths_follow_policy() {
        assert!(validate_password("abc", PasswordPolicy::Login).is_err());
        assert!(validate_password("abc", PasswordPolicy::Register).is_err());
        assert!(validate_password("abcd", PasswordPolicy::Login).is_ok());
        assert!(validate_password("abcd", PasswordPolicy::Register).is_err());
        assert!(validate_password("abcdefgh", PasswordPolicy::Register).is_ok());
    }

    #[test]
    fn confirm_password_must_match() {
        assert_eq!(validate_confirm_password("x", "y"), Err(PASSWORDS_DO_NOT_MATCH));
        assert_eq!(validate_confirm_password("same", "same"), Ok(()));
    }

    #[test]
    fn phone_is_optional_but_checked() {
        assert_eq!(validate_phone(""), Ok(()));
        assert_eq!(validate_phone("+44 20 7946 0958"), Ok(()));
        assert_eq!(validate_phone("call me"), Err(PHONE_INVALID));
    }

    #[test]
    fn register_report_lists_every_failing_field() {
        let report = validate_register("", "bad", "short", "other");

        assert!(!report.is_valid);
        assert_eq!(report.error("name"), Some(NAME_REQUIRED));
        assert_eq!(report.error("email"), Some(EMAIL_INVALID));
        assert_eq!(
            report.error("password"),
            Some("Password must be at least 8 characters")
        );
        assert_eq!(report.error("confirm_password"), Some(PASSWORDS_DO_NOT_MATCH));
    }

    #[test]
    fn valid_contact_report() {
        let report = validate_contact("Jo", "jo@example.com", "", "My knee hurts on stairs.");
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
    }
}
