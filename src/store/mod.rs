//! Client-side state for the admin area.
//!
//! [`AdminStore`] owns one list slice per domain and the editors that mutate
//! them. It is built once at server start and shared with the handlers.

use std::sync::Arc;

use crate::domain::appointment::Appointment;
use crate::domain::patient::Patient;
use crate::domain::testimonial::Testimonial;
use crate::notifications::Notifier;
use crate::store::crud::{CrudBackend, CrudController, ModerationBackend};
use crate::store::filters::{AppointmentFilters, PatientFilters, TestimonialFilters};
use crate::store::list_query::{ListController, ListSource};

pub mod crud;
pub mod filters;
pub mod list_query;

/// Everything the admin store needs from its backend.
pub trait AdminBackend:
    ListSource<PatientFilters, Item = Patient>
    + ListSource<TestimonialFilters, Item = Testimonial>
    + ListSource<AppointmentFilters, Item = Appointment>
    + CrudBackend<Patient>
    + CrudBackend<Testimonial>
    + ModerationBackend
{
}

impl<T> AdminBackend for T where
    T: ListSource<PatientFilters, Item = Patient>
        + ListSource<TestimonialFilters, Item = Testimonial>
        + ListSource<AppointmentFilters, Item = Appointment>
        + CrudBackend<Patient>
        + CrudBackend<Testimonial>
        + ModerationBackend
{
}

pub type PatientList<S> = ListController<S, PatientFilters>;
pub type TestimonialList<S> = ListController<S, TestimonialFilters>;
pub type AppointmentList<S> = ListController<S, AppointmentFilters>;
pub type PatientEditor<S> = CrudController<S, Patient, PatientFilters>;
pub type TestimonialEditor<S> = CrudController<S, Testimonial, TestimonialFilters>;

pub struct AdminStore<S: AdminBackend> {
    pub patients: Arc<PatientList<S>>,
    pub testimonials: Arc<TestimonialList<S>>,
    pub appointments: Arc<AppointmentList<S>>,
    pub patient_editor: PatientEditor<S>,
    pub testimonial_editor: TestimonialEditor<S>,
}

impl<S: AdminBackend> AdminStore<S> {
    pub fn new(backend: Arc<S>, notifier: Arc<dyn Notifier>, page_size: usize) -> Self {
        let patients = Arc::new(ListController::new(
            backend.clone(),
            notifier.clone(),
            "patients",
            page_size,
        ));
        let testimonials = Arc::new(ListController::new(
            backend.clone(),
            notifier.clone(),
            "testimonials",
            page_size,
        ));
        let appointments = Arc::new(ListController::new(
            backend.clone(),
            notifier.clone(),
            "appointments",
            page_size,
        ));

        Self {
            patient_editor: CrudController::new(backend.clone(), patients.clone(), notifier.clone()),
            testimonial_editor: CrudController::new(backend, testimonials.clone(), notifier),
            patients,
            testimonials,
            appointments,
        }
    }
}
