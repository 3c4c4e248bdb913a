//! HTTP handlers and the helpers they share.

use actix_web::http::header;
use actix_web::{HttpResponse, web};
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tera::{Context, Tera};

use crate::models::config::ServerConfig;
use crate::pagination::page_links;
use crate::store::list_query::ListSnapshot;

pub mod account;
pub mod admin;
pub mod appointments;
pub mod booking;
pub mod patients;
pub mod site;
pub mod testimonials;

pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// Context every page starts from: flash alerts, clinic name and the active
/// navigation entry.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    server_config: &ServerConfig,
    current_page: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("clinic_name", &server_config.clinic_name);
    context.insert("current_page", current_page);
    context
}

/// Adds a list slice to the context as `items`, `query` and `pages`.
pub fn insert_list<T: Serialize, F: Serialize>(
    context: &mut Context,
    snapshot: &ListSnapshot<T, F>,
) {
    context.insert("items", &snapshot.items);
    context.insert("query", &snapshot.query);
    context.insert("total_pages", &snapshot.query.total_pages());
    context.insert(
        "pages",
        &page_links(snapshot.query.page, snapshot.query.total_pages()),
    );
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// `303 See Other` to `location`.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Registers every route of the application.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(site::index)
        .service(site::services)
        .service(site::service_detail)
        .service(site::about)
        .service(site::contact)
        .service(site::send_contact)
        .service(site::testimonials)
        .service(site::share_story)
        .service(account::login_page)
        .service(account::login)
        .service(account::register_page)
        .service(account::register)
        // `/booking/step` must come before `/booking/{service_id}`.
        .service(booking::show_step)
        .service(booking::start)
        .service(booking::start_with_service)
        .service(booking::select_date)
        .service(booking::select_doctor)
        .service(booking::select_slot)
        .service(booking::next)
        .service(booking::back)
        .service(booking::confirm)
        .service(admin::dashboard)
        .service(patients::list)
        .service(patients::filter)
        .service(patients::clear_filters)
        .service(patients::open_create)
        .service(patients::save)
        .service(patients::close_modal)
        .service(patients::confirm_delete)
        .service(patients::cancel_delete)
        .service(patients::open_edit)
        .service(patients::request_delete)
        .service(testimonials::list)
        .service(testimonials::filter)
        .service(testimonials::clear_filters)
        .service(testimonials::open_create)
        .service(testimonials::save)
        .service(testimonials::close_modal)
        .service(testimonials::confirm_delete)
        .service(testimonials::cancel_delete)
        .service(testimonials::open_edit)
        .service(testimonials::request_delete)
        .service(testimonials::approve)
        .service(testimonials::reject)
        .service(appointments::list)
        .service(appointments::filter)
        .service(appointments::clear_filters);
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;

    use super::*;

    #[test]
    fn redirect_is_see_other() {
        let response = redirect("/admin/patients");

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/admin/patients"
        );
    }

    #[test]
    fn error_alerts_use_danger_style() {
        assert_eq!(alert_level_to_str(&Level::Error), "danger");
        assert_eq!(alert_level_to_str(&Level::Debug), "info");
    }
}
