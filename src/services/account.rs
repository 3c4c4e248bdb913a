//! Login and registration. Forms are validated but no account is stored.

use crate::forms::account::{LoginForm, RegisterForm};
use crate::services::{ServiceError, ServiceResult};

pub fn login(form: &LoginForm) -> ServiceResult<()> {
    let report = form.validate();
    if !report.is_valid {
        return Err(ServiceError::Validation(report));
    }
    log::info!("Login form accepted for {}", form.email.trim());
    Ok(())
}

pub fn register(form: &RegisterForm) -> ServiceResult<()> {
    let report = form.validate();
    if !report.is_valid {
        return Err(ServiceError::Validation(report));
    }
    log::info!("Registration form accepted for {}", form.email.trim());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_login_password_is_rejected() {
        let form = LoginForm {
            email: "a@b.com".to_string(),
            password: "abc".to_string(),
        };

        let Err(ServiceError::Validation(report)) = login(&form) else {
            panic!("expected a validation error");
        };
        assert!(report.error("password").is_some());
        assert!(report.error("email").is_none());
    }

    #[test]
    fn matching_register_form_is_accepted() {
        let form = RegisterForm {
            name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            password: "long-enough".to_string(),
            confirm_password: "long-enough".to_string(),
        };

        assert!(register(&form).is_ok());
    }
}
