//! Patient record form used by the admin modal.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::patient::{Patient, PatientDetails, PatientStatus};
use crate::domain::types::{
    ConditionLabel, PatientEmail, PatientId, PersonName, PhoneNumber, format_picker_date,
    parse_picker_date,
};
use crate::forms::{FormError, optional_text};
use crate::store::crud::EditableEntity;

/// Raw values posted by the patient modal.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, Validate)]
pub struct PatientForm {
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    /// `YYYY-MM-DD` as produced by the date picker.
    #[validate(length(min = 1, message = "Date of birth is required"))]
    pub date_of_birth: String,
    #[validate(length(min = 1, max = 200, message = "Condition is required"))]
    pub condition: String,
    #[serde(default)]
    #[validate(length(max = 2000, message = "Notes are too long"))]
    pub notes: String,
    #[serde(default)]
    pub status: String,
}

impl Default for PatientForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            date_of_birth: String::new(),
            condition: String::new(),
            notes: String::new(),
            status: PatientStatus::default().as_str().to_string(),
        }
    }
}

impl From<&Patient> for PatientForm {
    fn from(patient: &Patient) -> Self {
        Self {
            name: patient.name.clone(),
            email: patient.email.clone(),
            phone: patient.phone.clone().unwrap_or_default(),
            date_of_birth: format_picker_date(patient.date_of_birth),
            condition: patient.condition.clone(),
            notes: patient.notes.clone().unwrap_or_default(),
            status: patient.status.as_str().to_string(),
        }
    }
}

impl TryFrom<PatientForm> for PatientDetails {
    type Error = FormError;

    fn try_from(form: PatientForm) -> Result<Self, Self::Error> {
        let date_of_birth =
            parse_picker_date(&form.date_of_birth).map_err(|_| FormError::InvalidBirthDate)?;
        if date_of_birth > Utc::now().date_naive() {
            return Err(FormError::FutureBirthDate);
        }

        let phone = match optional_text(&form.phone) {
            Some(phone) => Some(PhoneNumber::new(phone).map_err(|_| FormError::InvalidPhoneNumber)?),
            None => None,
        };

        let status = match optional_text(&form.status) {
            Some(status) => status
                .parse::<PatientStatus>()
                .map_err(|_| FormError::InvalidStatus)?,
            None => PatientStatus::default(),
        };

        Ok(Self {
            name: PersonName::new(ammonia::clean(&form.name))
                .map_err(|_| FormError::InvalidName)?,
            email: PatientEmail::new(form.email).map_err(|_| FormError::InvalidEmail)?,
            phone,
            date_of_birth,
            condition: ConditionLabel::new(ammonia::clean(&form.condition))
                .map_err(|_| FormError::InvalidCondition)?,
            notes: optional_text(&form.notes).map(|notes| ammonia::clean(&notes)),
            status,
        })
    }
}

impl EditableEntity for Patient {
    type Id = PatientId;
    type Form = PatientForm;
    type Payload = PatientDetails;

    const LABEL: &'static str = "Patient";

    fn id(&self) -> &PatientId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> PatientForm {
        PatientForm {
            name: "Maria Lopez".to_string(),
            email: "Maria.Lopez@Example.com ".to_string(),
            phone: "+1 415 555 2671".to_string(),
            date_of_birth: "1988-04-12".to_string(),
            condition: "ACL reconstruction".to_string(),
            notes: "  ".to_string(),
            status: "active".to_string(),
        }
    }

    #[test]
    fn valid_form_becomes_details() {
        let form = valid_form();
        assert!(form.validate().is_ok());

        let details = PatientDetails::try_from(form).unwrap();

        assert_eq!(details.email.as_str(), "maria.lopez@example.com");
        assert_eq!(details.phone.unwrap().as_str(), "+14155552671");
        assert_eq!(format_picker_date(details.date_of_birth), "1988-04-12");
        assert!(details.notes.is_none());
        assert_eq!(details.status, PatientStatus::Active);
    }

    #[test]
    fn bad_date_and_status_are_reported_per_field() {
        let form = PatientForm {
            date_of_birth: "12/04/1988".to_string(),
            ..valid_form()
        };
        let err = PatientDetails::try_from(form).unwrap_err();
        assert_eq!(err.field(), Some("date_of_birth"));

        let form = PatientForm {
            status: "archived".to_string(),
            ..valid_form()
        };
        let err = PatientDetails::try_from(form).unwrap_err();
        assert_eq!(err.field(), Some("status"));
    }

    #[test]
    fn missing_email_fails_validation() {
        let form = PatientForm {
            email: String::new(),
            ..valid_form()
        };

        let errors = crate::forms::field_errors(&form.validate().unwrap_err());
        assert_eq!(
            errors.get("email").map(String::as_str),
            Some("Please enter a valid email address")
        );
    }

    #[test]
    fn edit_form_is_prefilled_with_picker_strings() {
        let details = PatientDetails::try_from(valid_form()).unwrap();
        let now = Utc::now().naive_utc();
        let patient = details.into_patient(PatientId::new("pat-1").unwrap(), now);

        let form = PatientForm::from(&patient);

        assert_eq!(form.date_of_birth, "1988-04-12");
        assert_eq!(form.status, "active");
        assert_eq!(form.phone, "+14155552671");
    }
}
