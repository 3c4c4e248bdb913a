//! Domain aggregates exposed by the clinic service layer.

pub mod appointment;
pub mod catalog;
pub mod patient;
pub mod testimonial;
pub mod types;
