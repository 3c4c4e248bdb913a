//! Admin patient list with its create/edit modal and delete confirmation.

use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::ClinicStore;
use crate::domain::patient::PatientStatus;
use crate::forms::filters::{PageQuery, PatientFilterForm};
use crate::forms::patients::PatientForm;
use crate::models::config::ServerConfig;
use crate::routes::{base_context, insert_list, redirect, render_template};
use crate::store::filters::PatientFilterPatch;

const LIST_URL: &str = "/admin/patients";

#[get("/admin/patients")]
pub async fn list(
    params: web::Query<PageQuery>,
    store: web::Data<ClinicStore>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let patients = &store.patients;
    match params.page {
        Some(page) => {
            let page_size = params.page_size.unwrap_or(patients.query().page_size);
            patients.set_page(page, page_size).await;
        }
        None => {
            patients.ensure_loaded().await;
        }
    }

    let mut context = base_context(&flash_messages, &server_config, "patients");
    insert_list(&mut context, &patients.snapshot());
    context.insert("modal", &store.patient_editor.modal());
    context.insert("pending_removal", &store.patient_editor.pending_removal());
    context.insert("statuses", &PatientStatus::ALL);
    render_template(&tera, "admin/patients.html", &context)
}

#[post("/admin/patients/filter")]
pub async fn filter(
    store: web::Data<ClinicStore>,
    web::Form(form): web::Form<PatientFilterForm>,
) -> impl Responder {
    store
        .patients
        .set_filter(PatientFilterPatch::from(form))
        .await;
    redirect(LIST_URL)
}

#[post("/admin/patients/filter/clear")]
pub async fn clear_filters(store: web::Data<ClinicStore>) -> impl Responder {
    store.patients.clear_filters().await;
    redirect(LIST_URL)
}

#[post("/admin/patients/new")]
pub async fn open_create(store: web::Data<ClinicStore>) -> impl Responder {
    store.patient_editor.open_create();
    redirect(LIST_URL)
}

#[post("/admin/patients/save")]
pub async fn save(
    store: web::Data<ClinicStore>,
    web::Form(form): web::Form<PatientForm>,
) -> impl Responder {
    store.patient_editor.submit(form).await;
    redirect(LIST_URL)
}

#[post("/admin/patients/modal/close")]
pub async fn close_modal(store: web::Data<ClinicStore>) -> impl Responder {
    store.patient_editor.close();
    redirect(LIST_URL)
}

#[post("/admin/patients/delete/confirm")]
pub async fn confirm_delete(store: web::Data<ClinicStore>) -> impl Responder {
    store.patient_editor.confirm_remove().await;
    redirect(LIST_URL)
}

#[post("/admin/patients/delete/cancel")]
pub async fn cancel_delete(store: web::Data<ClinicStore>) -> impl Responder {
    store.patient_editor.cancel_remove();
    redirect(LIST_URL)
}

#[post("/admin/patients/{patient_id}/edit")]
pub async fn open_edit(
    patient_id: web::Path<String>,
    store: web::Data<ClinicStore>,
) -> impl Responder {
    match store.patient_editor.find(&patient_id) {
        Some(patient) => store.patient_editor.open_edit(patient),
        None => FlashMessage::error("Patient not found").send(),
    }
    redirect(LIST_URL)
}

#[post("/admin/patients/{patient_id}/delete")]
pub async fn request_delete(
    patient_id: web::Path<String>,
    store: web::Data<ClinicStore>,
) -> impl Responder {
    match store.patient_editor.find(&patient_id) {
        Some(patient) => store.patient_editor.request_remove(patient),
        None => FlashMessage::error("Patient not found").send(),
    }
    redirect(LIST_URL)
}
