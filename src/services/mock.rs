//! Mock backend standing in for a future clinic API.
//!
//! Every call sleeps for the configured delay and can be switched to fail,
//! so the admin store and the booking flow see the latency and errors a real
//! network service would produce.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use actix_web::rt::time::sleep;
use chrono::NaiveDate;

use crate::booking::BookingBackend;
use crate::domain::appointment::{Appointment, NewAppointment, TimeSlot};
use crate::domain::patient::{Patient, PatientDetails};
use crate::domain::testimonial::{Testimonial, TestimonialDetails, TestimonialStatus};
use crate::domain::types::{DoctorId, PatientId, TestimonialId};
use crate::repository::{
    AppointmentReader, AppointmentWriter, PatientReader, PatientWriter, TestimonialReader,
    TestimonialWriter,
};
use crate::services::{ListPage, ServiceError, ServiceResult};
use crate::store::crud::{CrudBackend, ModerationBackend};
use crate::store::filters::{AppointmentFilters, PatientFilters, TestimonialFilters};
use crate::store::list_query::ListSource;

#[derive(Debug)]
pub struct MockService<R> {
    repo: R,
    delay: Duration,
    failing: AtomicBool,
}

impl<R> MockService<R> {
    pub fn new(repo: R, delay: Duration) -> Self {
        Self {
            repo,
            delay,
            failing: AtomicBool::new(false),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Makes every following call fail until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    async fn round_trip(&self, operation: &str) -> ServiceResult<()> {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            log::warn!("Mock backend refused `{operation}`");
            return Err(ServiceError::Unavailable(format!(
                "{operation} is currently unavailable"
            )));
        }
        Ok(())
    }
}

impl<R: PatientReader> ListSource<PatientFilters> for MockService<R> {
    type Item = Patient;

    async fn fetch(
        &self,
        filters: PatientFilters,
        page: usize,
        page_size: usize,
    ) -> ServiceResult<ListPage<Patient>> {
        self.round_trip("list patients").await?;
        let result = self
            .repo
            .list_patients(filters.to_query(page, page_size))
            .map_err(|err| {
                log::error!("Failed to list patients: {err}");
                err
            })?;
        Ok(result.into())
    }
}

impl<R: TestimonialReader> ListSource<TestimonialFilters> for MockService<R> {
    type Item = Testimonial;

    async fn fetch(
        &self,
        filters: TestimonialFilters,
        page: usize,
        page_size: usize,
    ) -> ServiceResult<ListPage<Testimonial>> {
        self.round_trip("list testimonials").await?;
        let result = self
            .repo
            .list_testimonials(filters.to_query(page, page_size))
            .map_err(|err| {
                log::error!("Failed to list testimonials: {err}");
                err
            })?;
        Ok(result.into())
    }
}

impl<R: AppointmentReader> ListSource<AppointmentFilters> for MockService<R> {
    type Item = Appointment;

    async fn fetch(
        &self,
        filters: AppointmentFilters,
        page: usize,
        page_size: usize,
    ) -> ServiceResult<ListPage<Appointment>> {
        self.round_trip("list appointments").await?;
        let result = self
            .repo
            .list_appointments(filters.to_query(page, page_size))
            .map_err(|err| {
                log::error!("Failed to list appointments: {err}");
                err
            })?;
        Ok(result.into())
    }
}

impl<R: PatientWriter> CrudBackend<Patient> for MockService<R> {
    async fn create(&self, payload: PatientDetails) -> ServiceResult<Patient> {
        self.round_trip("create patient").await?;
        let patient = self.repo.create_patient(&payload)?;
        log::info!("Created patient {}", patient.id);
        Ok(patient)
    }

    async fn update(&self, id: PatientId, payload: PatientDetails) -> ServiceResult<Patient> {
        self.round_trip("update patient").await?;
        Ok(self.repo.update_patient(&id, &payload)?)
    }

    async fn delete(&self, id: PatientId) -> ServiceResult<()> {
        self.round_trip("delete patient").await?;
        self.repo.delete_patient(&id)?;
        log::info!("Deleted patient {id}");
        Ok(())
    }
}

impl<R: TestimonialWriter> CrudBackend<Testimonial> for MockService<R> {
    async fn create(&self, payload: TestimonialDetails) -> ServiceResult<Testimonial> {
        self.round_trip("create testimonial").await?;
        Ok(self.repo.create_testimonial(&payload)?)
    }

    async fn update(
        &self,
        id: TestimonialId,
        payload: TestimonialDetails,
    ) -> ServiceResult<Testimonial> {
        self.round_trip("update testimonial").await?;
        Ok(self.repo.update_testimonial(&id, &payload)?)
    }

    async fn delete(&self, id: TestimonialId) -> ServiceResult<()> {
        self.round_trip("delete testimonial").await?;
        self.repo.delete_testimonial(&id)?;
        log::info!("Deleted testimonial {id}");
        Ok(())
    }
}

impl<R: TestimonialWriter> ModerationBackend for MockService<R> {
    async fn set_testimonial_status(
        &self,
        id: TestimonialId,
        status: TestimonialStatus,
    ) -> ServiceResult<Testimonial> {
        self.round_trip("moderate testimonial").await?;
        let testimonial = self.repo.set_testimonial_status(&id, status)?;
        log::info!("Testimonial {id} is now {status}");
        Ok(testimonial)
    }
}

impl<R: AppointmentReader + AppointmentWriter> BookingBackend for MockService<R> {
    async fn time_slots(&self, doctor_id: DoctorId, date: NaiveDate) -> ServiceResult<Vec<TimeSlot>> {
        self.round_trip("load time slots").await?;
        let booked = self.repo.list_booked_slots(&doctor_id, date)?;
        Ok(TimeSlot::schedule_for(date, &booked))
    }

    async fn book(&self, appointment: NewAppointment) -> ServiceResult<Appointment> {
        self.round_trip("book appointment").await?;
        let slots = TimeSlot::schedule_for(
            appointment.date,
            &self
                .repo
                .list_booked_slots(&appointment.doctor.id, appointment.date)?,
        );
        let available = slots
            .iter()
            .any(|slot| slot.id == appointment.time_slot && slot.available);
        if !available {
            return Err(ServiceError::Conflict(
                "This time slot is no longer available".to_string(),
            ));
        }

        let created = self.repo.create_appointment(&appointment)?;
        log::info!(
            "Booked appointment {} with {} on {} at {}",
            created.id,
            created.doctor_name,
            created.date,
            created.time_slot
        );
        Ok(created)
    }
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;

    #[actix_web::test]
    async fn fetch_passes_filters_and_pagination_to_repository() {
        let mut repo = MockRepository::new();
        repo.expect_list_patients()
            .withf(|query| {
                query.search.as_deref() == Some("maria")
                    && query.pagination.as_ref().map(|p| (p.page, p.per_page)) == Some((2, 5))
            })
            .returning(|_| Ok((0, Vec::new())));
        let service = MockService::new(repo, Duration::ZERO);

        let filters = PatientFilters {
            search: "maria".to_string(),
            ..PatientFilters::default()
        };
        let page = ListSource::<PatientFilters>::fetch(&service, filters, 2, 5)
            .await
            .unwrap();

        assert_eq!(page.total, 0);
    }

    #[actix_web::test]
    async fn failure_switch_short_circuits() {
        let repo = MockRepository::new();
        let service = MockService::new(repo, Duration::ZERO);
        service.set_failing(true);

        let result =
            ListSource::<PatientFilters>::fetch(&service, PatientFilters::default(), 1, 10).await;

        assert!(matches!(result, Err(ServiceError::Unavailable(_))));
    }

    #[actix_web::test]
    async fn missing_testimonial_maps_to_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_set_testimonial_status()
            .returning(|_, _| Err(RepositoryError::NotFound));
        let service = MockService::new(repo, Duration::ZERO);

        let result = service
            .set_testimonial_status(
                TestimonialId::new("tst-missing").unwrap(),
                TestimonialStatus::Approved,
            )
            .await;

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
