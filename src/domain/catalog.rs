//! Treatments and practitioners offered by the clinic.

use serde::{Deserialize, Serialize};

use crate::domain::types::{DoctorId, ServiceId};

/// A treatment that can be booked.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClinicService {
    pub id: ServiceId,
    pub name: String,
    pub summary: String,
    pub description: String,
    pub duration_minutes: u32,
    /// Session price in whole currency units.
    pub price: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Doctor {
    pub id: DoctorId,
    pub name: String,
    pub specialty: String,
    pub bio: String,
}
