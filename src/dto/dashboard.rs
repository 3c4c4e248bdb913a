use serde::Serialize;

use crate::domain::appointment::Appointment;
use crate::domain::testimonial::Testimonial;

/// Headline figures and short lists for the admin dashboard.
#[derive(Debug, Serialize)]
pub struct DashboardData {
    pub total_patients: usize,
    pub active_patients: usize,
    pub pending_testimonials: usize,
    pub average_rating: Option<f32>,
    pub upcoming_appointments: usize,
    pub next_appointments: Vec<Appointment>,
    pub latest_pending: Vec<Testimonial>,
}
