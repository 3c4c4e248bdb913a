use serde::{Deserialize, Serialize};

use crate::validation::{ValidationReport, validate_contact};

/// Message sent from the contact page.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
}

impl ContactForm {
    pub fn validate(&self) -> ValidationReport {
        validate_contact(&self.name, &self.email, &self.phone, &self.message)
    }
}
