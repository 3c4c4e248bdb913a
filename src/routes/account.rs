//! Login and registration pages. Submissions are only validated.

use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::account::{LoginForm, RegisterForm};
use crate::models::config::ServerConfig;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, account as account_service};

#[get("/login")]
pub async fn login_page(
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(&flash_messages, &server_config, "login");
    context.insert("form", &LoginForm::default());
    render_template(&tera, "account/login.html", &context)
}

#[post("/login")]
pub async fn login(
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    match account_service::login(&form) {
        Ok(()) => {
            FlashMessage::success("Signed in.").send();
            redirect("/admin")
        }
        Err(ServiceError::Validation(report)) => {
            let mut context = base_context(&flash_messages, &server_config, "login");
            context.insert("form", &form);
            context.insert("errors", &report.errors);
            render_template(&tera, "account/login.html", &context)
        }
        Err(err) => {
            log::error!("Failed to process login: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/register")]
pub async fn register_page(
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(&flash_messages, &server_config, "register");
    context.insert("form", &RegisterForm::default());
    render_template(&tera, "account/register.html", &context)
}

#[post("/register")]
pub async fn register(
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<RegisterForm>,
) -> impl Responder {
    match account_service::register(&form) {
        Ok(()) => {
            FlashMessage::success("Account details accepted. You can now sign in.").send();
            redirect("/login")
        }
        Err(ServiceError::Validation(report)) => {
            let mut context = base_context(&flash_messages, &server_config, "register");
            context.insert("form", &form);
            context.insert("errors", &report.errors);
            render_template(&tera, "account/register.html", &context)
        }
        Err(err) => {
            log::error!("Failed to process registration: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
