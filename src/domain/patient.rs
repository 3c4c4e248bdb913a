use std::fmt::Display;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    ConditionLabel, PatientEmail, PatientId, PersonName, PhoneNumber, TypeConstraintError,
};

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PatientStatus {
    #[default]
    Active,
    Discharged,
}

impl PatientStatus {
    pub const ALL: [PatientStatus; 2] = [PatientStatus::Active, PatientStatus::Discharged];

    pub fn as_str(self) -> &'static str {
        match self {
            PatientStatus::Active => "active",
            PatientStatus::Discharged => "discharged",
        }
    }
}

impl Display for PatientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatientStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "active" => Ok(PatientStatus::Active),
            "discharged" => Ok(PatientStatus::Discharged),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown patient status `{other}`"
            ))),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    pub id: PatientId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: NaiveDate,
    /// Main complaint the patient is being treated for.
    pub condition: String,
    pub notes: Option<String>,
    pub status: PatientStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Patient {
    /// Case-insensitive match against name, email and condition.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term)
            || self.email.contains(&term)
            || self.condition.to_lowercase().contains(&term)
    }
}

/// Validated data for a patient record, shared by create and update.
#[derive(Clone, Debug)]
pub struct PatientDetails {
    pub name: PersonName,
    pub email: PatientEmail,
    pub phone: Option<PhoneNumber>,
    pub date_of_birth: NaiveDate,
    pub condition: ConditionLabel,
    pub notes: Option<String>,
    pub status: PatientStatus,
}

pub type NewPatient = PatientDetails;
pub type UpdatePatient = PatientDetails;

impl PatientDetails {
    /// Materializes a new record with a fresh identifier.
    pub fn into_patient(self, id: PatientId, now: NaiveDateTime) -> Patient {
        Patient {
            id,
            name: self.name.into_inner(),
            email: self.email.into_inner(),
            phone: self.phone.map(PhoneNumber::into_inner),
            date_of_birth: self.date_of_birth,
            condition: self.condition.into_inner(),
            notes: self.notes,
            status: self.status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites the mutable attributes of `patient`, keeping identity and
    /// creation time.
    pub fn apply_to(&self, patient: &mut Patient, now: NaiveDateTime) {
        patient.name = self.name.as_str().to_string();
        patient.email = self.email.as_str().to_string();
        patient.phone = self.phone.as_ref().map(|p| p.as_str().to_string());
        patient.date_of_birth = self.date_of_birth;
        patient.condition = self.condition.as_str().to_string();
        patient.notes = self.notes.clone();
        patient.status = self.status;
        patient.updated_at = now;
    }
}
