//! Three-step appointment booking flow.
//!
//! A visitor picks a date and a free time slot, reviews the draft and
//! confirms it. Steps are strictly linear: `SelectDateTime -> Confirm ->
//! Success`, with `back` as the only way to go from `Confirm` to
//! `SelectDateTime`. `Success` is terminal; starting over creates a new flow.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::appointment::{Appointment, AppointmentDraft, NewAppointment, TimeSlot};
use crate::domain::catalog::{ClinicService, Doctor};
use crate::domain::types::DoctorId;
use crate::services::{ServiceError, ServiceResult};

/// Backend calls the booking flow depends on.
pub trait BookingBackend {
    fn time_slots(
        &self,
        doctor_id: DoctorId,
        date: NaiveDate,
    ) -> impl Future<Output = ServiceResult<Vec<TimeSlot>>>;

    /// Commits the appointment, re-checking that the slot is still free.
    fn book(&self, appointment: NewAppointment) -> impl Future<Output = ServiceResult<Appointment>>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStep {
    SelectDateTime = 1,
    Confirm = 2,
    Success = 3,
}

impl BookingStep {
    pub fn number(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookingError {
    #[error("Please choose today or a later date")]
    PastDate,

    #[error("Please choose a date and an available time")]
    IncompleteSelection,

    #[error("That action is not available at this step")]
    InvalidTransition,

    #[error("This booking has already been confirmed")]
    Completed,

    #[error("{0}")]
    Conflict(String),

    #[error("We could not reach the booking service. Please try again.")]
    Unavailable,
}

impl From<ServiceError> for BookingError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Conflict(message) => BookingError::Conflict(message),
            other => {
                log::error!("Booking backend failed: {other}");
                BookingError::Unavailable
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookingFlow {
    pub step: BookingStep,
    pub draft: AppointmentDraft,
    pub selected_date: NaiveDate,
    pub selected_time_slot: Option<TimeSlot>,
    /// Slots for the selected doctor and date.
    pub slots: Vec<TimeSlot>,
    /// Set once the booking is confirmed.
    pub appointment: Option<Appointment>,
}

impl BookingFlow {
    /// Starts a flow on `today` with no slot selected.
    ///
    /// A failure to load the slots leaves the list empty; the visitor can
    /// retry by picking the date again.
    pub async fn start<B: BookingBackend>(
        backend: &B,
        service: ClinicService,
        doctor: Doctor,
        today: NaiveDate,
    ) -> Self {
        let mut flow = Self {
            step: BookingStep::SelectDateTime,
            draft: AppointmentDraft::new(service, doctor, today),
            selected_date: today,
            selected_time_slot: None,
            slots: Vec::new(),
            appointment: None,
        };
        if let Err(err) = flow.reload_slots(backend).await {
            log::warn!("Starting booking without time slots: {err}");
        }
        flow
    }

    fn ensure_selecting(&self) -> Result<(), BookingError> {
        match self.step {
            BookingStep::SelectDateTime => Ok(()),
            BookingStep::Confirm => Err(BookingError::InvalidTransition),
            BookingStep::Success => Err(BookingError::Completed),
        }
    }

    async fn reload_slots<B: BookingBackend>(&mut self, backend: &B) -> Result<(), BookingError> {
        self.slots.clear();
        self.slots = backend
            .time_slots(self.draft.doctor.id.clone(), self.selected_date)
            .await?;
        Ok(())
    }

    pub async fn select_doctor<B: BookingBackend>(
        &mut self,
        backend: &B,
        doctor: Doctor,
    ) -> Result<(), BookingError> {
        self.ensure_selecting()?;
        self.draft.doctor = doctor;
        self.selected_time_slot = None;
        self.reload_slots(backend).await
    }

    /// Rejects dates before `today`, leaving the flow untouched.
    pub async fn select_date<B: BookingBackend>(
        &mut self,
        backend: &B,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<(), BookingError> {
        self.ensure_selecting()?;
        if date < today {
            return Err(BookingError::PastDate);
        }
        self.selected_date = date;
        self.selected_time_slot = None;
        self.reload_slots(backend).await
    }

    /// Selects a slot by id. Unknown or unavailable slots are ignored and
    /// `false` is returned.
    pub fn select_time_slot(&mut self, slot_id: &str) -> bool {
        if self.ensure_selecting().is_err() {
            return false;
        }
        match self
            .slots
            .iter()
            .find(|slot| slot.id == slot_id && slot.available)
        {
            Some(slot) => {
                self.selected_time_slot = Some(slot.clone());
                true
            }
            None => {
                log::debug!("Ignoring selection of unavailable slot `{slot_id}`");
                false
            }
        }
    }

    pub fn next(&mut self, today: NaiveDate) -> Result<(), BookingError> {
        self.ensure_selecting()?;
        let Some(slot) = self.selected_time_slot.clone() else {
            return Err(BookingError::IncompleteSelection);
        };
        if self.selected_date < today {
            return Err(BookingError::PastDate);
        }
        self.draft.date = self.selected_date;
        self.draft.time_slot = Some(slot);
        self.step = BookingStep::Confirm;
        Ok(())
    }

    pub fn back(&mut self) -> Result<(), BookingError> {
        match self.step {
            BookingStep::Confirm => {
                self.step = BookingStep::SelectDateTime;
                Ok(())
            }
            BookingStep::SelectDateTime => Err(BookingError::InvalidTransition),
            BookingStep::Success => Err(BookingError::Completed),
        }
    }

    /// Books the draft. A slot taken in the meantime keeps the flow on the
    /// confirmation step.
    pub async fn confirm<B: BookingBackend>(
        &mut self,
        backend: &B,
        patient_name: Option<String>,
    ) -> Result<&Appointment, BookingError> {
        match self.step {
            BookingStep::Confirm => {}
            BookingStep::SelectDateTime => return Err(BookingError::InvalidTransition),
            BookingStep::Success => return Err(BookingError::Completed),
        }
        self.draft.patient_name = patient_name
            .map(|name| ammonia::clean(name.trim()))
            .filter(|name| !name.is_empty());
        let new_appointment = self
            .draft
            .to_new_appointment()
            .ok_or(BookingError::IncompleteSelection)?;

        let appointment = backend.book(new_appointment).await?;
        self.step = BookingStep::Success;
        Ok(self.appointment.insert(appointment))
    }
}

/// How long an abandoned flow is kept.
const FLOW_TTL: TimeDelta = TimeDelta::hours(2);

struct StoredFlow {
    flow: BookingFlow,
    version: u64,
    touched_at: NaiveDateTime,
}

/// A copy of a stored flow, tagged with the version it was read at.
///
/// Handlers mutate `flow` and hand the checkout back to
/// [`BookingFlows::save`], which refuses it if another request saved the
/// same flow in the meantime.
#[derive(Clone, Debug)]
pub struct FlowCheckout {
    pub flow: BookingFlow,
    version: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Another request changed the flow first; the stored flow is kept.
    Superseded,
    Missing,
}

/// Server-side home of the visitors' booking flows.
///
/// The visitor's session only carries the token returned by [`insert`],
/// which keeps the session cookie small.
///
/// [`insert`]: BookingFlows::insert
#[derive(Default)]
pub struct BookingFlows {
    flows: Mutex<HashMap<String, StoredFlow>>,
}

impl BookingFlows {
    pub fn new() -> Self {
        Self::default()
    }

    fn flows(&self) -> MutexGuard<'_, HashMap<String, StoredFlow>> {
        self.flows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores a new flow and returns its token. Expired flows are dropped.
    pub fn insert(&self, flow: BookingFlow) -> String {
        let now = Utc::now().naive_utc();
        let token = Uuid::new_v4().to_string();
        let mut flows = self.flows();
        flows.retain(|_, stored| now - stored.touched_at < FLOW_TTL);
        flows.insert(
            token.clone(),
            StoredFlow {
                flow,
                version: 0,
                touched_at: now,
            },
        );
        token
    }

    pub fn get(&self, token: &str) -> Option<FlowCheckout> {
        self.flows().get(token).map(|stored| FlowCheckout {
            flow: stored.flow.clone(),
            version: stored.version,
        })
    }

    /// Replaces the flow behind `token` if it is still at the checkout's
    /// version. A confirmed flow is never replaced by an unconfirmed one.
    pub fn save(&self, token: &str, checkout: FlowCheckout) -> SaveOutcome {
        let mut flows = self.flows();
        let Some(stored) = flows.get_mut(token) else {
            return SaveOutcome::Missing;
        };
        let downgrade = stored.flow.step == BookingStep::Success
            && checkout.flow.step != BookingStep::Success;
        if stored.version != checkout.version || downgrade {
            log::debug!("Dropping stale update of booking flow `{token}`");
            return SaveOutcome::Superseded;
        }
        stored.flow = checkout.flow;
        stored.version += 1;
        stored.touched_at = Utc::now().naive_utc();
        SaveOutcome::Saved
    }

    pub fn remove(&self, token: &str) {
        self.flows().remove(token);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::types::AppointmentId;
    use crate::repository::seed;

    /// Serves the regular schedule with a fixed set of taken slots.
    #[derive(Default)]
    struct FixedSchedule {
        taken: Mutex<Vec<String>>,
        offline: bool,
        delay: Duration,
    }

    impl BookingBackend for FixedSchedule {
        async fn time_slots(
            &self,
            _doctor_id: DoctorId,
            date: NaiveDate,
        ) -> ServiceResult<Vec<TimeSlot>> {
            if self.offline {
                return Err(ServiceError::Unavailable("offline".to_string()));
            }
            Ok(TimeSlot::schedule_for(date, &self.taken.lock().unwrap()))
        }

        async fn book(&self, appointment: NewAppointment) -> ServiceResult<Appointment> {
            if !self.delay.is_zero() {
                actix_web::rt::time::sleep(self.delay).await;
            }
            let mut taken = self.taken.lock().unwrap();
            if taken.contains(&appointment.time_slot) {
                return Err(ServiceError::Conflict("Slot already taken".to_string()));
            }
            taken.push(appointment.time_slot.clone());
            let now = appointment.date.and_hms_opt(8, 0, 0).unwrap();
            Ok(appointment.into_appointment(AppointmentId::new("apt-new").unwrap(), now))
        }
    }

    // A Monday.
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    async fn started(backend: &FixedSchedule) -> BookingFlow {
        let service = seed::services().remove(0);
        let doctor = seed::doctors().remove(0);
        BookingFlow::start(backend, service, doctor, today()).await
    }

    #[actix_web::test]
    async fn starts_on_today_without_slot() {
        let backend = FixedSchedule::default();
        let flow = started(&backend).await;

        assert_eq!(flow.step, BookingStep::SelectDateTime);
        assert_eq!(flow.step.number(), 1);
        assert_eq!(flow.selected_date, today());
        assert!(flow.selected_time_slot.is_none());
        assert!(!flow.slots.is_empty());
    }

    #[actix_web::test]
    async fn every_available_slot_leads_to_confirm() {
        let backend = FixedSchedule {
            taken: Mutex::new(vec!["10:00".to_string()]),
            ..FixedSchedule::default()
        };
        let date = today() + TimeDelta::days(1);
        let base = started(&backend).await;

        for slot in base.slots.iter().filter(|slot| slot.available) {
            let mut flow = base.clone();
            flow.select_date(&backend, date, today()).await.unwrap();
            assert!(flow.select_time_slot(&slot.id));

            flow.next(today()).unwrap();

            assert_eq!(flow.step, BookingStep::Confirm);
            assert_eq!(flow.draft.date, date);
            assert_eq!(flow.draft.time_slot.as_ref().unwrap().id, slot.id);
        }
    }

    #[actix_web::test]
    async fn unavailable_slot_never_changes_selection() {
        let backend = FixedSchedule {
            taken: Mutex::new(vec!["10:00".to_string()]),
            ..FixedSchedule::default()
        };
        let mut flow = started(&backend).await;
        assert!(flow.select_time_slot("09:00"));

        assert!(!flow.select_time_slot("10:00"));
        assert!(!flow.select_time_slot("23:00"));

        assert_eq!(flow.selected_time_slot.as_ref().unwrap().id, "09:00");
    }

    #[actix_web::test]
    async fn past_dates_are_rejected() {
        let backend = FixedSchedule::default();
        let mut flow = started(&backend).await;

        let result = flow
            .select_date(&backend, today() - TimeDelta::days(1), today())
            .await;

        assert_eq!(result, Err(BookingError::PastDate));
        assert_eq!(flow.selected_date, today());
    }

    #[actix_web::test]
    async fn changing_date_or_doctor_clears_slot() {
        let backend = FixedSchedule::default();
        let mut flow = started(&backend).await;
        flow.select_time_slot("11:00");

        flow.select_date(&backend, today() + TimeDelta::days(2), today())
            .await
            .unwrap();
        assert!(flow.selected_time_slot.is_none());

        flow.select_time_slot("11:00");
        let other = seed::doctors().remove(1);
        flow.select_doctor(&backend, other.clone()).await.unwrap();
        assert!(flow.selected_time_slot.is_none());
        assert_eq!(flow.draft.doctor, other);
    }

    #[actix_web::test]
    async fn next_requires_a_slot() {
        let backend = FixedSchedule::default();
        let mut flow = started(&backend).await;

        assert_eq!(flow.next(today()), Err(BookingError::IncompleteSelection));
        assert_eq!(flow.step, BookingStep::SelectDateTime);
    }

    #[actix_web::test]
    async fn back_keeps_selection() {
        let backend = FixedSchedule::default();
        let mut flow = started(&backend).await;
        let date = today() + TimeDelta::days(3);
        flow.select_date(&backend, date, today()).await.unwrap();
        flow.select_time_slot("14:00");
        flow.next(today()).unwrap();

        flow.back().unwrap();

        assert_eq!(flow.step, BookingStep::SelectDateTime);
        assert_eq!(flow.selected_date, date);
        assert_eq!(flow.selected_time_slot.as_ref().unwrap().id, "14:00");
        assert_eq!(flow.back(), Err(BookingError::InvalidTransition));
    }

    #[actix_web::test]
    async fn confirm_books_and_is_terminal() {
        let backend = FixedSchedule::default();
        let mut flow = started(&backend).await;
        flow.select_time_slot("15:00");
        flow.next(today()).unwrap();

        let appointment = flow
            .confirm(&backend, Some(" Nina Park ".to_string()))
            .await
            .unwrap()
            .clone();

        assert_eq!(appointment.time_slot, "15:00");
        assert_eq!(appointment.patient_name.as_deref(), Some("Nina Park"));
        assert_eq!(flow.step, BookingStep::Success);
        assert_eq!(flow.back(), Err(BookingError::Completed));
        assert_eq!(flow.next(today()), Err(BookingError::Completed));
        assert!(!flow.select_time_slot("16:00"));
        assert!(matches!(
            flow.confirm(&backend, None).await,
            Err(BookingError::Completed)
        ));
    }

    #[actix_web::test]
    async fn taken_slot_keeps_flow_on_confirm() {
        let backend = FixedSchedule::default();
        let mut flow = started(&backend).await;
        flow.select_time_slot("16:00");
        flow.next(today()).unwrap();
        backend.taken.lock().unwrap().push("16:00".to_string());

        let result = flow.confirm(&backend, None).await;

        assert!(matches!(result, Err(BookingError::Conflict(_))));
        assert_eq!(flow.step, BookingStep::Confirm);
    }

    #[actix_web::test]
    async fn offline_backend_starts_without_slots() {
        let backend = FixedSchedule {
            offline: true,
            ..FixedSchedule::default()
        };
        let flow = started(&backend).await;

        assert!(flow.slots.is_empty());
        assert!(!flow.clone().select_time_slot("09:00"));
    }

    #[actix_web::test]
    async fn flows_are_kept_per_token() {
        let backend = FixedSchedule::default();
        let flows = BookingFlows::new();
        let token = flows.insert(started(&backend).await);

        let mut checkout = flows.get(&token).unwrap();
        checkout.flow.select_time_slot("09:00");
        assert_eq!(flows.save(&token, checkout), SaveOutcome::Saved);
        assert_eq!(
            flows
                .get(&token)
                .unwrap()
                .flow
                .selected_time_slot
                .unwrap()
                .id,
            "09:00"
        );

        let stale = flows.get(&token).unwrap();
        flows.remove(&token);
        assert!(flows.get(&token).is_none());
        assert_eq!(flows.save(&token, stale), SaveOutcome::Missing);
    }

    #[actix_web::test]
    async fn older_checkout_cannot_overwrite_a_newer_save() {
        let backend = FixedSchedule::default();
        let flows = BookingFlows::new();
        let token = flows.insert(started(&backend).await);

        let mut first = flows.get(&token).unwrap();
        let mut second = flows.get(&token).unwrap();
        first.flow.select_time_slot("09:00");
        second.flow.select_time_slot("11:00");

        assert_eq!(flows.save(&token, first), SaveOutcome::Saved);
        assert_eq!(flows.save(&token, second), SaveOutcome::Superseded);
        assert_eq!(
            flows
                .get(&token)
                .unwrap()
                .flow
                .selected_time_slot
                .unwrap()
                .id,
            "09:00"
        );
    }

    #[actix_web::test]
    async fn double_confirm_keeps_the_flow_confirmed() {
        let backend = FixedSchedule {
            delay: Duration::from_millis(20),
            ..FixedSchedule::default()
        };
        let mut flow = started(&backend).await;
        flow.select_time_slot("17:00");
        flow.next(today()).unwrap();
        let flows = BookingFlows::new();
        let token = flows.insert(flow);

        let mut first = flows.get(&token).unwrap();
        let mut second = flows.get(&token).unwrap();
        let (first_result, second_result) = futures::join!(
            async { first.flow.confirm(&backend, None).await.map(|_| ()) },
            async { second.flow.confirm(&backend, None).await.map(|_| ()) },
        );

        assert_eq!(first_result, Ok(()));
        assert!(matches!(second_result, Err(BookingError::Conflict(_))));
        assert_eq!(flows.save(&token, first), SaveOutcome::Saved);
        assert_eq!(flows.save(&token, second), SaveOutcome::Superseded);

        let stored = flows.get(&token).unwrap().flow;
        assert_eq!(stored.step, BookingStep::Success);
        assert_eq!(stored.appointment.unwrap().time_slot, "17:00");
        assert_eq!(*backend.taken.lock().unwrap(), vec!["17:00".to_string()]);
    }
}
