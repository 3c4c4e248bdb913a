use chrono::NaiveDate;

use crate::{
    domain::{
        appointment::{Appointment, AppointmentStatus, NewAppointment},
        catalog::{ClinicService, Doctor},
        patient::{NewPatient, Patient, PatientStatus, UpdatePatient},
        testimonial::{NewTestimonial, Testimonial, TestimonialStatus, UpdateTestimonial},
        types::{DoctorId, PatientId, Rating, ServiceId, TestimonialId},
    },
    repository::errors::RepositoryResult,
};

pub mod errors;
pub mod memory;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod seed;

pub use memory::InMemoryRepository;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Zero-based offset of the first item on the page.
    pub fn offset(&self) -> usize {
        self.page.max(1).saturating_sub(1).saturating_mul(self.per_page)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PatientListQuery {
    pub search: Option<String>,
    pub status: Option<PatientStatus>,
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Default)]
pub struct TestimonialListQuery {
    pub search: Option<String>,
    pub status: Option<TestimonialStatus>,
    pub min_rating: Option<Rating>,
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Default)]
pub struct AppointmentListQuery {
    pub search: Option<String>,
    pub doctor_id: Option<DoctorId>,
    pub status: Option<AppointmentStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub pagination: Option<Pagination>,
}

impl PatientListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn status(mut self, status: PatientStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

impl TestimonialListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn status(mut self, status: TestimonialStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn min_rating(mut self, rating: Rating) -> Self {
        self.min_rating = Some(rating);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

impl AppointmentListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn doctor(mut self, doctor_id: DoctorId) -> Self {
        self.doctor_id = Some(doctor_id);
        self
    }

    pub fn status(mut self, status: AppointmentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

pub trait PatientReader {
    fn list_patients(&self, query: PatientListQuery) -> RepositoryResult<(usize, Vec<Patient>)>;
}

pub trait PatientWriter {
    fn create_patient(&self, new_patient: &NewPatient) -> RepositoryResult<Patient>;
    fn update_patient(&self, id: &PatientId, updates: &UpdatePatient)
    -> RepositoryResult<Patient>;
    fn delete_patient(&self, id: &PatientId) -> RepositoryResult<()>;
}

pub trait TestimonialReader {
    fn list_testimonials(
        &self,
        query: TestimonialListQuery,
    ) -> RepositoryResult<(usize, Vec<Testimonial>)>;
}

pub trait TestimonialWriter {
    fn create_testimonial(&self, new_testimonial: &NewTestimonial)
    -> RepositoryResult<Testimonial>;
    fn update_testimonial(
        &self,
        id: &TestimonialId,
        updates: &UpdateTestimonial,
    ) -> RepositoryResult<Testimonial>;
    fn set_testimonial_status(
        &self,
        id: &TestimonialId,
        status: TestimonialStatus,
    ) -> RepositoryResult<Testimonial>;
    fn delete_testimonial(&self, id: &TestimonialId) -> RepositoryResult<()>;
}

pub trait AppointmentReader {
    fn list_appointments(
        &self,
        query: AppointmentListQuery,
    ) -> RepositoryResult<(usize, Vec<Appointment>)>;
    /// Start times already taken for the doctor on `date`.
    fn list_booked_slots(&self, doctor_id: &DoctorId, date: NaiveDate)
    -> RepositoryResult<Vec<String>>;
}

pub trait AppointmentWriter {
    fn create_appointment(&self, new_appointment: &NewAppointment)
    -> RepositoryResult<Appointment>;
}

pub trait CatalogReader {
    fn list_services(&self) -> RepositoryResult<Vec<ClinicService>>;
    fn get_service_by_id(&self, id: &ServiceId) -> RepositoryResult<Option<ClinicService>>;
    fn list_doctors(&self) -> RepositoryResult<Vec<Doctor>>;
    fn get_doctor_by_id(&self, id: &DoctorId) -> RepositoryResult<Option<Doctor>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_counts_from_the_first_page() {
        let pagination = Pagination {
            page: 3,
            per_page: 10,
        };
        assert_eq!(pagination.offset(), 20);
        assert_eq!(Pagination { page: 0, per_page: 10 }.offset(), 0);
    }

    #[test]
    fn offset_saturates_for_huge_pages() {
        let pagination = Pagination {
            page: usize::MAX / 2,
            per_page: 10,
        };
        assert_eq!(pagination.offset(), usize::MAX);
    }
}
