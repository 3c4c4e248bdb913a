//! Page data for the public site.

use serde::Serialize;

use crate::domain::catalog::{ClinicService, Doctor};
use crate::domain::testimonial::Testimonial;
use crate::pagination::Paginated;

#[derive(Debug, Serialize)]
pub struct HomePageData {
    pub featured_services: Vec<ClinicService>,
    pub testimonials: Vec<Testimonial>,
    pub doctors: Vec<Doctor>,
}

#[derive(Debug, Serialize)]
pub struct ServiceDetailData {
    pub service: ClinicService,
    pub doctors: Vec<Doctor>,
    /// Other treatments shown under "you may also need".
    pub related: Vec<ClinicService>,
}

#[derive(Debug, Serialize)]
pub struct AboutPageData {
    pub doctors: Vec<Doctor>,
    pub service_count: usize,
    pub patients_treated: usize,
    pub average_rating: Option<f32>,
}

#[derive(Debug, Serialize)]
pub struct TestimonialsPageData {
    pub testimonials: Paginated<Testimonial>,
    pub total: usize,
}

/// Catalog needed to start or continue a booking.
#[derive(Debug, Clone, Serialize)]
pub struct BookingCatalog {
    pub service: ClinicService,
    pub doctor: Doctor,
    pub services: Vec<ClinicService>,
    pub doctors: Vec<Doctor>,
}
