use std::fmt::Display;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::domain::catalog::{ClinicService, Doctor};
use crate::domain::types::{AppointmentId, DoctorId, ServiceId, TypeConstraintError};

/// Start times offered on every opening day.
pub const DAILY_SCHEDULE: [&str; 8] = [
    "09:00", "10:00", "11:00", "12:00", "14:00", "15:00", "16:00", "17:00",
];

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 3] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "scheduled" => Ok(AppointmentStatus::Scheduled),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown appointment status `{other}`"
            ))),
        }
    }
}

/// A bookable start time on a given day.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeSlot {
    /// Start time formatted as `HH:MM`.
    pub id: String,
    pub label: String,
    pub available: bool,
}

impl TimeSlot {
    /// Builds the day's slots, marking the ones already taken. The clinic is
    /// closed on Sundays.
    pub fn schedule_for(date: NaiveDate, booked: &[String]) -> Vec<TimeSlot> {
        let open = date.weekday() != Weekday::Sun;
        DAILY_SCHEDULE
            .iter()
            .map(|start| TimeSlot {
                id: (*start).to_string(),
                label: (*start).to_string(),
                available: open && !booked.iter().any(|taken| taken == start),
            })
            .collect()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: AppointmentId,
    pub patient_name: Option<String>,
    pub service_id: ServiceId,
    pub service_name: String,
    pub doctor_id: DoctorId,
    pub doctor_name: String,
    pub date: NaiveDate,
    pub time_slot: String,
    pub status: AppointmentStatus,
    pub created_at: NaiveDateTime,
}

impl Appointment {
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.patient_name
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains(&term))
            || self.service_name.to_lowercase().contains(&term)
    }
}

#[derive(Clone, Debug)]
pub struct NewAppointment {
    pub patient_name: Option<String>,
    pub service: ClinicService,
    pub doctor: Doctor,
    pub date: NaiveDate,
    pub time_slot: String,
}

impl NewAppointment {
    pub fn into_appointment(self, id: AppointmentId, now: NaiveDateTime) -> Appointment {
        Appointment {
            id,
            patient_name: self.patient_name,
            service_id: self.service.id,
            service_name: self.service.name,
            doctor_id: self.doctor.id,
            doctor_name: self.doctor.name,
            date: self.date,
            time_slot: self.time_slot,
            status: AppointmentStatus::Scheduled,
            created_at: now,
        }
    }
}

/// In-progress booking selection carried across the booking steps.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AppointmentDraft {
    pub service: ClinicService,
    pub doctor: Doctor,
    pub date: NaiveDate,
    pub time_slot: Option<TimeSlot>,
    pub patient_name: Option<String>,
}

impl AppointmentDraft {
    pub fn new(service: ClinicService, doctor: Doctor, today: NaiveDate) -> Self {
        Self {
            service,
            doctor,
            date: today,
            time_slot: None,
            patient_name: None,
        }
    }

    /// Returns the commit payload once a slot has been chosen.
    pub fn to_new_appointment(&self) -> Option<NewAppointment> {
        let slot = self.time_slot.as_ref()?;
        Some(NewAppointment {
            patient_name: self.patient_name.clone(),
            service: self.service.clone(),
            doctor: self.doctor.clone(),
            date: self.date,
            time_slot: slot.id.clone(),
        })
    }
}
