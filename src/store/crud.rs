//! Modal and confirmation lifecycle for editable admin lists.
//!
//! A [`CrudController`] coordinates "open modal, submit, call the backend,
//! refetch the list, close the modal" for one entity type, plus the
//! confirm-before-delete flow and testimonial moderation.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use validator::Validate;

use crate::domain::testimonial::{Testimonial, TestimonialStatus};
use crate::domain::types::TestimonialId;
use crate::forms::FormError;
use crate::notifications::{Notification, Notifier};
use crate::services::{ServiceError, ServiceResult};
use crate::store::filters::Filters;
use crate::store::list_query::{ListController, ListSource};

pub const OPERATION_FAILED: &str = "Operation failed";
pub const LIST_REFRESHING: &str = "The list is refreshing, please try again in a moment.";
pub const NO_CHANGES: &str = "No changes to save";

/// An entity that can be created and edited through a modal form.
pub trait EditableEntity: Clone + Serialize {
    type Id: Clone + Display + Serialize;
    /// Raw form values, pre-filled from an existing entity when editing.
    type Form: Validate + Clone + Default + PartialEq + Serialize + for<'a> From<&'a Self>;
    /// Validated data handed to the backend.
    type Payload: TryFrom<Self::Form, Error = FormError>;

    /// Capitalized singular name used in notifications.
    const LABEL: &'static str;

    fn id(&self) -> &Self::Id;
}

pub trait CrudBackend<E: EditableEntity> {
    fn create(&self, payload: E::Payload) -> impl Future<Output = ServiceResult<E>>;

    fn update(&self, id: E::Id, payload: E::Payload) -> impl Future<Output = ServiceResult<E>>;

    fn delete(&self, id: E::Id) -> impl Future<Output = ServiceResult<()>>;
}

/// Status-only mutation used by approve/reject.
pub trait ModerationBackend {
    fn set_testimonial_status(
        &self,
        id: TestimonialId,
        status: TestimonialStatus,
    ) -> impl Future<Output = ServiceResult<Testimonial>>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModalMode {
    #[default]
    Create,
    Edit,
}

#[derive(Clone, Serialize)]
#[serde(bound = "")]
pub struct ModalState<E: EditableEntity> {
    pub open: bool,
    pub mode: ModalMode,
    /// Entity being edited; `None` in create mode.
    pub selected: Option<E>,
    pub form: E::Form,
    pub field_errors: BTreeMap<String, String>,
    /// General error shown above the form after a failed submit.
    pub error: Option<String>,
    pub submitting: bool,
}

impl<E: EditableEntity> Default for ModalState<E> {
    fn default() -> Self {
        Self {
            open: false,
            mode: ModalMode::Create,
            selected: None,
            form: E::Form::default(),
            field_errors: BTreeMap::new(),
            error: None,
            submitting: false,
        }
    }
}

/// Result of a mutating controller operation.
#[derive(Clone, Debug, PartialEq)]
pub enum MutationOutcome<T> {
    Completed(T),
    /// Rejected before reaching the backend: bad input or a disallowed
    /// transition.
    Invalid,
    /// Not attempted because of the controller state (no open modal, nothing
    /// pending, or the list is loading).
    Blocked,
    /// The backend call failed.
    Failed,
}

impl<T> MutationOutcome<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, MutationOutcome::Completed(_))
    }
}

struct EditorState<E: EditableEntity> {
    modal: ModalState<E>,
    pending_removal: Option<E>,
}

pub struct CrudController<S, E, F>
where
    S: CrudBackend<E> + ListSource<F, Item = E>,
    E: EditableEntity,
    F: Filters,
{
    backend: Arc<S>,
    list: Arc<ListController<S, F>>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<EditorState<E>>,
}

fn failure_message(err: &ServiceError) -> String {
    match err {
        ServiceError::Conflict(message) | ServiceError::Form(message) => message.clone(),
        _ => OPERATION_FAILED.to_string(),
    }
}

impl<S, E, F> CrudController<S, E, F>
where
    S: CrudBackend<E> + ListSource<F, Item = E>,
    E: EditableEntity,
    F: Filters,
{
    pub fn new(
        backend: Arc<S>,
        list: Arc<ListController<S, F>>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            backend,
            list,
            notifier,
            state: Mutex::new(EditorState {
                modal: ModalState::default(),
                pending_removal: None,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, EditorState<E>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn list(&self) -> &Arc<ListController<S, F>> {
        &self.list
    }

    pub fn modal(&self) -> ModalState<E> {
        self.state().modal.clone()
    }

    pub fn pending_removal(&self) -> Option<E> {
        self.state().pending_removal.clone()
    }

    /// Looks an entity up on the currently loaded page by its id.
    pub fn find(&self, id: &str) -> Option<E> {
        self.list.find(|entity| entity.id().to_string() == id)
    }

    pub fn open_create(&self) {
        self.state().modal = ModalState {
            open: true,
            ..ModalState::default()
        };
    }

    pub fn open_edit(&self, entity: E) {
        let form = E::Form::from(&entity);
        self.state().modal = ModalState {
            open: true,
            mode: ModalMode::Edit,
            selected: Some(entity),
            form,
            ..ModalState::default()
        };
    }

    pub fn close(&self) {
        self.state().modal = ModalState::default();
    }

    /// Validates `form` and creates or updates the entity.
    ///
    /// Field errors stay in the modal without a notification. Backend
    /// failures keep the modal open with the submitted values.
    pub async fn submit(&self, form: E::Form) -> MutationOutcome<E> {
        let (payload, target) = {
            let mut state = self.state();
            let modal = &mut state.modal;
            if !modal.open || modal.submitting {
                return MutationOutcome::Blocked;
            }
            let unchanged = modal
                .selected
                .as_ref()
                .filter(|entity| E::Form::from(*entity) == form)
                .cloned();
            if let Some(entity) = unchanged {
                *modal = ModalState::default();
                drop(state);
                self.notifier.notify(Notification::info(NO_CHANGES));
                return MutationOutcome::Completed(entity);
            }
            modal.form = form.clone();
            modal.field_errors.clear();
            modal.error = None;

            if let Err(errors) = form.validate() {
                modal.field_errors = crate::forms::field_errors(&errors);
                return MutationOutcome::Invalid;
            }
            let payload = match E::Payload::try_from(form) {
                Ok(payload) => payload,
                Err(err) => {
                    modal.field_errors = err.field_errors();
                    return MutationOutcome::Invalid;
                }
            };
            modal.submitting = true;
            (payload, modal.selected.as_ref().map(|entity| entity.id().clone()))
        };

        let (result, verb) = match target {
            Some(id) => (self.backend.update(id, payload).await, "updated"),
            None => (self.backend.create(payload).await, "created"),
        };

        match result {
            Ok(entity) => {
                self.state().modal = ModalState::default();
                self.notifier
                    .notify(Notification::success(format!("{} {verb}", E::LABEL)));
                self.list.load().await;
                MutationOutcome::Completed(entity)
            }
            Err(err) => {
                log::error!("Failed to save {}: {err}", E::LABEL);
                {
                    let mut state = self.state();
                    state.modal.submitting = false;
                    state.modal.error = Some(failure_message(&err));
                }
                self.notifier.notify(Notification::error(OPERATION_FAILED));
                MutationOutcome::Failed
            }
        }
    }

    pub fn request_remove(&self, entity: E) {
        self.state().pending_removal = Some(entity);
    }

    pub fn cancel_remove(&self) {
        self.state().pending_removal = None;
    }

    /// Deletes the entity awaiting confirmation.
    pub async fn confirm_remove(&self) -> MutationOutcome<()> {
        if self.list.is_loading() {
            self.notifier.notify(Notification::error(LIST_REFRESHING));
            return MutationOutcome::Blocked;
        }
        let Some(entity) = self.state().pending_removal.take() else {
            return MutationOutcome::Blocked;
        };

        match self.backend.delete(entity.id().clone()).await {
            Ok(()) => {
                self.notifier
                    .notify(Notification::success(format!("{} deleted", E::LABEL)));
                self.list.load().await;
                MutationOutcome::Completed(())
            }
            Err(err) => {
                log::error!("Failed to delete {} {}: {err}", E::LABEL, entity.id());
                self.notifier.notify(Notification::error(OPERATION_FAILED));
                MutationOutcome::Failed
            }
        }
    }
}

impl<S, F> CrudController<S, Testimonial, F>
where
    S: CrudBackend<Testimonial> + ListSource<F, Item = Testimonial> + ModerationBackend,
    F: Filters,
{
    pub async fn approve(&self, testimonial: &Testimonial) -> MutationOutcome<Testimonial> {
        self.moderate(testimonial, TestimonialStatus::Approved).await
    }

    pub async fn reject(&self, testimonial: &Testimonial) -> MutationOutcome<Testimonial> {
        self.moderate(testimonial, TestimonialStatus::Rejected).await
    }

    async fn moderate(
        &self,
        testimonial: &Testimonial,
        target: TestimonialStatus,
    ) -> MutationOutcome<Testimonial> {
        if self.list.is_loading() {
            self.notifier.notify(Notification::error(LIST_REFRESHING));
            return MutationOutcome::Blocked;
        }
        if !testimonial.status.can_moderate_to(target) {
            log::debug!(
                "Refusing to move testimonial {} from {} to {target}",
                testimonial.id,
                testimonial.status
            );
            self.notifier.notify(Notification::error(format!(
                "Only pending testimonials can be {target}"
            )));
            return MutationOutcome::Invalid;
        }

        match self
            .backend
            .set_testimonial_status(testimonial.id.clone(), target)
            .await
        {
            Ok(updated) => {
                self.notifier
                    .notify(Notification::success(format!("Testimonial {target}")));
                self.list.load().await;
                MutationOutcome::Completed(updated)
            }
            Err(err) => {
                log::error!("Failed to set testimonial {} to {target}: {err}", testimonial.id);
                self.notifier.notify(Notification::error(OPERATION_FAILED));
                MutationOutcome::Failed
            }
        }
    }
}
