//! Mock repository implementations for isolating services in tests.

use chrono::NaiveDate;
use mockall::mock;

use crate::domain::appointment::{Appointment, NewAppointment};
use crate::domain::catalog::{ClinicService, Doctor};
use crate::domain::patient::{NewPatient, Patient, UpdatePatient};
use crate::domain::testimonial::{NewTestimonial, Testimonial, TestimonialStatus, UpdateTestimonial};
use crate::domain::types::{DoctorId, PatientId, ServiceId, TestimonialId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    AppointmentListQuery, AppointmentReader, AppointmentWriter, CatalogReader, PatientListQuery,
    PatientReader, PatientWriter, TestimonialListQuery, TestimonialReader, TestimonialWriter,
};

mock! {
    pub Repository {}

    impl PatientReader for Repository {
        fn list_patients(&self, query: PatientListQuery) -> RepositoryResult<(usize, Vec<Patient>)>;
    }

    impl PatientWriter for Repository {
        fn create_patient(&self, new_patient: &NewPatient) -> RepositoryResult<Patient>;
        fn update_patient(
            &self,
            id: &PatientId,
            updates: &UpdatePatient,
        ) -> RepositoryResult<Patient>;
        fn delete_patient(&self, id: &PatientId) -> RepositoryResult<()>;
    }

    impl TestimonialReader for Repository {
        fn list_testimonials(
            &self,
            query: TestimonialListQuery,
        ) -> RepositoryResult<(usize, Vec<Testimonial>)>;
    }

    impl TestimonialWriter for Repository {
        fn create_testimonial(&self, new_testimonial: &NewTestimonial) -> RepositoryResult<Testimonial>;
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

    impl AppointmentReader for Repository {
        fn list_appointments(
            &self,
            query: AppointmentListQuery,
        ) -> RepositoryResult<(usize, Vec<Appointment>)>;
        fn list_booked_slots(
            &self,
            doctor_id: &DoctorId,
            date: NaiveDate,
        ) -> RepositoryResult<Vec<String>>;
    }

    impl AppointmentWriter for Repository {
        fn create_appointment(&self, new_appointment: &NewAppointment) -> RepositoryResult<Appointment>;
    }

    impl CatalogReader for Repository {
        fn list_services(&self) -> RepositoryResult<Vec<ClinicService>>;
        fn get_service_by_id(&self, id: &ServiceId) -> RepositoryResult<Option<ClinicService>>;
        fn list_doctors(&self) -> RepositoryResult<Vec<Doctor>>;
        fn get_doctor_by_id(&self, id: &DoctorId) -> RepositoryResult<Option<Doctor>>;
    }
}
