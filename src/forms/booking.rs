//! Forms posted by the booking steps.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SelectDateForm {
    /// `YYYY-MM-DD` from the date picker.
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectDoctorForm {
    pub doctor_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectSlotForm {
    pub slot: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConfirmBookingForm {
    #[serde(default)]
    pub patient_name: String,
}
