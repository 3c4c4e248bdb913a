//! Login and registration forms.

use serde::{Deserialize, Serialize};

use crate::validation::{ValidationReport, validate_login, validate_register};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> ValidationReport {
        validate_login(&self.email, &self.password)
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(default, skip_serializing)]
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> ValidationReport {
        validate_register(
            &self.name,
            &self.email,
            &self.password,
            &self.confirm_password,
        )
    }
}
