//! Public pages of the clinic website.

use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::ClinicBackend;
use crate::forms::contact::ContactForm;
use crate::forms::testimonials::ShareStoryForm;
use crate::models::config::ServerConfig;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, site as site_service};

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<usize>,
}

#[get("/")]
pub async fn index(
    backend: web::Data<ClinicBackend>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match site_service::load_home(backend.repository()) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &server_config, "home");
            context.insert("featured_services", &data.featured_services);
            context.insert("testimonials", &data.testimonials);
            context.insert("doctors", &data.doctors);
            render_template(&tera, "site/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to load home page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/services")]
pub async fn services(
    backend: web::Data<ClinicBackend>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match site_service::load_services(backend.repository()) {
        Ok(services) => {
            let mut context = base_context(&flash_messages, &server_config, "services");
            context.insert("services", &services);
            render_template(&tera, "site/services.html", &context)
        }
        Err(err) => {
            log::error!("Failed to load services: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/services/{service_id}")]
pub async fn service_detail(
    service_id: web::Path<String>,
    backend: web::Data<ClinicBackend>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match site_service::load_service(backend.repository(), &service_id) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &server_config, "services");
            context.insert("service", &data.service);
            context.insert("doctors", &data.doctors);
            context.insert("related", &data.related);
            render_template(&tera, "site/service_detail.html", &context)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("We could not find that service.").send();
            redirect("/services")
        }
        Err(err) => {
            log::error!("Failed to load service {service_id}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/about")]
pub async fn about(
    backend: web::Data<ClinicBackend>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match site_service::load_about(backend.repository()) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &server_config, "about");
            context.insert("about", &data);
            render_template(&tera, "site/about.html", &context)
        }
        Err(err) => {
            log::error!("Failed to load about page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/contact")]
pub async fn contact(
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(&flash_messages, &server_config, "contact");
    context.insert("form", &ContactForm::default());
    render_template(&tera, "site/contact.html", &context)
}

#[post("/contact")]
pub async fn send_contact(
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<ContactForm>,
) -> impl Responder {
    match site_service::submit_contact(&form) {
        Ok(()) => {
            FlashMessage::success("Thank you! We will get back to you shortly.").send();
            redirect("/contact")
        }
        Err(ServiceError::Validation(report)) => {
            let mut context = base_context(&flash_messages, &server_config, "contact");
            context.insert("form", &form);
            context.insert("errors", &report.errors);
            render_template(&tera, "site/contact.html", &context)
        }
        Err(err) => {
            log::error!("Failed to submit contact form: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/testimonials")]
pub async fn testimonials(
    params: web::Query<PageParams>,
    backend: web::Data<ClinicBackend>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let page = params.page.unwrap_or(1);
    match site_service::load_testimonials(backend.repository(), page) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &server_config, "testimonials");
            context.insert("testimonials", &data.testimonials);
            context.insert("total", &data.total);
            render_template(&tera, "site/testimonials.html", &context)
        }
        Err(err) => {
            log::error!("Failed to load testimonials: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/testimonials")]
pub async fn share_story(
    backend: web::Data<ClinicBackend>,
    web::Form(form): web::Form<ShareStoryForm>,
) -> impl Responder {
    match site_service::share_story(backend.repository(), form) {
        Ok(_) => {
            FlashMessage::success("Thank you for sharing your story! It will appear once reviewed.")
                .send();
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(err) => {
            log::error!("Failed to share story: {err}");
            FlashMessage::error("We could not save your story. Please try again.").send();
        }
    }
    redirect("/testimonials")
}
