use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::domain::appointment::AppointmentStatus;
use crate::forms::filters::{AppointmentFilterForm, PageQuery};
use crate::models::config::ServerConfig;
use crate::routes::{base_context, insert_list, redirect, render_template};
use crate::services::site::load_doctors;
use crate::store::filters::AppointmentFilterPatch;
use crate::{ClinicBackend, ClinicStore};

const LIST_URL: &str = "/admin/appointments";

#[get("/admin/appointments")]
pub async fn list(
    params: web::Query<PageQuery>,
    store: web::Data<ClinicStore>,
    backend: web::Data<ClinicBackend>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let doctors = match load_doctors(backend.repository()) {
        Ok(doctors) => doctors,
        Err(err) => {
            log::error!("Failed to load doctors: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let appointments = &store.appointments;
    match params.page {
        Some(page) => {
            let page_size = params.page_size.unwrap_or(appointments.query().page_size);
            appointments.set_page(page, page_size).await;
        }
        None => {
            appointments.ensure_loaded().await;
        }
    }

    let mut context = base_context(&flash_messages, &server_config, "appointments");
    insert_list(&mut context, &appointments.snapshot());
    context.insert("doctors", &doctors);
    context.insert("statuses", &AppointmentStatus::ALL);
    render_template(&tera, "admin/appointments.html", &context)
}

#[post("/admin/appointments/filter")]
pub async fn filter(
    store: web::Data<ClinicStore>,
    web::Form(form): web::Form<AppointmentFilterForm>,
) -> impl Responder {
    store
        .appointments
        .set_filter(AppointmentFilterPatch::from(form))
        .await;
    redirect(LIST_URL)
}

#[post("/admin/appointments/filter/clear")]
pub async fn clear_filters(store: web::Data<ClinicStore>) -> impl Responder {
    store.appointments.clear_filters().await;
    redirect(LIST_URL)
}
