use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::ClinicBackend;
use crate::models::config::ServerConfig;
use crate::routes::{base_context, render_template, today};
use crate::services::dashboard::load_dashboard;

#[get("/admin")]
pub async fn dashboard(
    backend: web::Data<ClinicBackend>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_dashboard(backend.repository(), today()) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &server_config, "dashboard");
            context.insert("dashboard", &data);
            render_template(&tera, "admin/dashboard.html", &context)
        }
        Err(err) => {
            log::error!("Failed to load dashboard: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
