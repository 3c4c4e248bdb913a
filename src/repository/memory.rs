//! In-memory repository backing the mock service layer.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{NaiveDate, NaiveDateTime, Utc};

use crate::domain::appointment::{Appointment, AppointmentStatus, NewAppointment};
use crate::domain::catalog::{ClinicService, Doctor};
use crate::domain::patient::{NewPatient, Patient, UpdatePatient};
use crate::domain::testimonial::{NewTestimonial, Testimonial, TestimonialStatus, UpdateTestimonial};
use crate::domain::types::{AppointmentId, DoctorId, PatientId, ServiceId, TestimonialId};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    AppointmentListQuery, AppointmentReader, AppointmentWriter, CatalogReader, Pagination,
    PatientListQuery, PatientReader, PatientWriter, TestimonialListQuery, TestimonialReader,
    TestimonialWriter, seed,
};

/// Every collection held by the mock backend.
#[derive(Debug, Clone, Default)]
pub struct ClinicData {
    pub patients: Vec<Patient>,
    pub testimonials: Vec<Testimonial>,
    pub appointments: Vec<Appointment>,
    pub services: Vec<ClinicService>,
    pub doctors: Vec<Doctor>,
}

/// Thread-safe in-memory store. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    data: Arc<RwLock<ClinicData>>,
}

impl InMemoryRepository {
    pub fn new(data: ClinicData) -> Self {
        Self {
            data: Arc::new(RwLock::new(data)),
        }
    }

    /// Builds a repository filled with the demo clinic content.
    pub fn seeded(today: NaiveDate) -> RepositoryResult<Self> {
        let now = Utc::now().naive_utc();
        let data = seed::clinic_data(today, now)
            .map_err(|err| RepositoryError::ValidationError(err.to_string()))?;
        Ok(Self::new(data))
    }

    fn read(&self) -> RepositoryResult<RwLockReadGuard<'_, ClinicData>> {
        Ok(self.data.read()?)
    }

    fn write(&self) -> RepositoryResult<RwLockWriteGuard<'_, ClinicData>> {
        Ok(self.data.write()?)
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Normalized search term, `None` when blank.
fn search_term(search: &Option<String>) -> Option<String> {
    search
        .as_deref()
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
}

fn paginate<T>(items: Vec<T>, pagination: Option<&Pagination>) -> (usize, Vec<T>) {
    let total = items.len();
    match pagination {
        Some(pagination) => {
            let page = items
                .into_iter()
                .skip(pagination.offset())
                .take(pagination.per_page)
                .collect();
            (total, page)
        }
        None => (total, items),
    }
}

impl PatientReader for InMemoryRepository {
    fn list_patients(&self, query: PatientListQuery) -> RepositoryResult<(usize, Vec<Patient>)> {
        let data = self.read()?;
        let term = search_term(&query.search);

        let mut items: Vec<Patient> = data
            .patients
            .iter()
            .filter(|p| term.as_deref().is_none_or(|t| p.matches_search(t)))
            .filter(|p| query.status.is_none_or(|status| p.status == status))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(paginate(items, query.pagination.as_ref()))
    }
}

impl PatientWriter for InMemoryRepository {
    fn create_patient(&self, new_patient: &NewPatient) -> RepositoryResult<Patient> {
        let mut data = self.write()?;
        if data
            .patients
            .iter()
            .any(|p| p.email == new_patient.email.as_str())
        {
            return Err(RepositoryError::ConstraintViolation(
                "patient email already registered".to_string(),
            ));
        }

        let patient = new_patient.clone().into_patient(PatientId::generate(), now());
        data.patients.push(patient.clone());
        Ok(patient)
    }

    fn update_patient(
        &self,
        id: &PatientId,
        updates: &UpdatePatient,
    ) -> RepositoryResult<Patient> {
        let mut data = self.write()?;
        if data
            .patients
            .iter()
            .any(|p| &p.id != id && p.email == updates.email.as_str())
        {
            return Err(RepositoryError::ConstraintViolation(
                "patient email already registered".to_string(),
            ));
        }

        let patient = data
            .patients
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or(RepositoryError::NotFound)?;
        updates.apply_to(patient, now());
        Ok(patient.clone())
    }

    fn delete_patient(&self, id: &PatientId) -> RepositoryResult<()> {
        let mut data = self.write()?;
        let before = data.patients.len();
        data.patients.retain(|p| &p.id != id);
        if data.patients.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

impl TestimonialReader for InMemoryRepository {
    fn list_testimonials(
        &self,
        query: TestimonialListQuery,
    ) -> RepositoryResult<(usize, Vec<Testimonial>)> {
        let data = self.read()?;
        let term = search_term(&query.search);

        let mut items: Vec<Testimonial> = data
            .testimonials
            .iter()
            .filter(|t| term.as_deref().is_none_or(|term| t.matches_search(term)))
            .filter(|t| query.status.is_none_or(|status| t.status == status))
            .filter(|t| query.min_rating.is_none_or(|min| t.rating >= min))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(paginate(items, query.pagination.as_ref()))
    }
}

impl TestimonialWriter for InMemoryRepository {
    fn create_testimonial(
        &self,
        new_testimonial: &NewTestimonial,
    ) -> RepositoryResult<Testimonial> {
        let mut data = self.write()?;
        let testimonial = new_testimonial
            .clone()
            .into_testimonial(TestimonialId::generate(), now());
        data.testimonials.push(testimonial.clone());
        Ok(testimonial)
    }

    fn update_testimonial(
        &self,
        id: &TestimonialId,
        updates: &UpdateTestimonial,
    ) -> RepositoryResult<Testimonial> {
        let mut data = self.write()?;
        let testimonial = data
            .testimonials
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or(RepositoryError::NotFound)?;
        updates.apply_to(testimonial, now());
        Ok(testimonial.clone())
    }

    fn set_testimonial_status(
        &self,
        id: &TestimonialId,
        status: TestimonialStatus,
    ) -> RepositoryResult<Testimonial> {
        let mut data = self.write()?;
        let testimonial = data
            .testimonials
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or(RepositoryError::NotFound)?;
        testimonial.status = status;
        testimonial.updated_at = now();
        Ok(testimonial.clone())
    }

    fn delete_testimonial(&self, id: &TestimonialId) -> RepositoryResult<()> {
        let mut data = self.write()?;
        let before = data.testimonials.len();
        data.testimonials.retain(|t| &t.id != id);
        if data.testimonials.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

impl AppointmentReader for InMemoryRepository {
    fn list_appointments(
        &self,
        query: AppointmentListQuery,
    ) -> RepositoryResult<(usize, Vec<Appointment>)> {
        let data = self.read()?;
        let term = search_term(&query.search);

        let mut items: Vec<Appointment> = data
            .appointments
            .iter()
            .filter(|a| term.as_deref().is_none_or(|term| a.matches_search(term)))
            .filter(|a| query.doctor_id.as_ref().is_none_or(|id| &a.doctor_id == id))
            .filter(|a| query.status.is_none_or(|status| a.status == status))
            .filter(|a| query.date_from.is_none_or(|from| a.date >= from))
            .filter(|a| query.date_to.is_none_or(|to| a.date <= to))
            .cloned()
            .collect();
        items.sort_by(|a, b| (a.date, &a.time_slot).cmp(&(b.date, &b.time_slot)));

        Ok(paginate(items, query.pagination.as_ref()))
    }

    fn list_booked_slots(
        &self,
        doctor_id: &DoctorId,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<String>> {
        let data = self.read()?;
        Ok(data
            .appointments
            .iter()
            .filter(|a| {
                &a.doctor_id == doctor_id
                    && a.date == date
                    && a.status == AppointmentStatus::Scheduled
            })
            .map(|a| a.time_slot.clone())
            .collect())
    }
}

impl AppointmentWriter for InMemoryRepository {
    fn create_appointment(
        &self,
        new_appointment: &NewAppointment,
    ) -> RepositoryResult<Appointment> {
        let mut data = self.write()?;
        let taken = data.appointments.iter().any(|a| {
            a.doctor_id == new_appointment.doctor.id
                && a.date == new_appointment.date
                && a.time_slot == new_appointment.time_slot
                && a.status == AppointmentStatus::Scheduled
        });
        if taken {
            return Err(RepositoryError::ConstraintViolation(
                "time slot already booked".to_string(),
            ));
        }

        let appointment = new_appointment
            .clone()
            .into_appointment(AppointmentId::generate(), now());
        data.appointments.push(appointment.clone());
        Ok(appointment)
    }
}

impl CatalogReader for InMemoryRepository {
    fn list_services(&self) -> RepositoryResult<Vec<ClinicService>> {
        Ok(self.read()?.services.clone())
    }

    fn get_service_by_id(&self, id: &ServiceId) -> RepositoryResult<Option<ClinicService>> {
        let data = self.read()?;
        Ok(data.services.iter().find(|s| &s.id == id).cloned())
    }

    fn list_doctors(&self) -> RepositoryResult<Vec<Doctor>> {
        Ok(self.read()?.doctors.clone())
    }

    fn get_doctor_by_id(&self, id: &DoctorId) -> RepositoryResult<Option<Doctor>> {
        let data = self.read()?;
        Ok(data.doctors.iter().find(|d| &d.id == id).cloned())
    }
}
