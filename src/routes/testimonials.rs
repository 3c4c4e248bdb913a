//! Admin testimonial moderation: list, edit modal, approve/reject and delete.

use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::ClinicStore;
use crate::domain::testimonial::TestimonialStatus;
use crate::forms::filters::{PageQuery, TestimonialFilterForm};
use crate::forms::testimonials::TestimonialForm;
use crate::models::config::ServerConfig;
use crate::routes::{base_context, insert_list, redirect, render_template};
use crate::store::filters::TestimonialFilterPatch;

const LIST_URL: &str = "/admin/testimonials";
const NOT_FOUND: &str = "Testimonial not found";

#[get("/admin/testimonials")]
pub async fn list(
    params: web::Query<PageQuery>,
    store: web::Data<ClinicStore>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let testimonials = &store.testimonials;
    match params.page {
        Some(page) => {
            let page_size = params.page_size.unwrap_or(testimonials.query().page_size);
            testimonials.set_page(page, page_size).await;
        }
        None => {
            testimonials.ensure_loaded().await;
        }
    }

    let mut context = base_context(&flash_messages, &server_config, "testimonials");
    insert_list(&mut context, &testimonials.snapshot());
    context.insert("modal", &store.testimonial_editor.modal());
    context.insert(
        "pending_removal",
        &store.testimonial_editor.pending_removal(),
    );
    context.insert("statuses", &TestimonialStatus::ALL);
    render_template(&tera, "admin/testimonials.html", &context)
}

#[post("/admin/testimonials/filter")]
pub async fn filter(
    store: web::Data<ClinicStore>,
    web::Form(form): web::Form<TestimonialFilterForm>,
) -> impl Responder {
    store
        .testimonials
        .set_filter(TestimonialFilterPatch::from(form))
        .await;
    redirect(LIST_URL)
}

#[post("/admin/testimonials/filter/clear")]
pub async fn clear_filters(store: web::Data<ClinicStore>) -> impl Responder {
    store.testimonials.clear_filters().await;
    redirect(LIST_URL)
}

#[post("/admin/testimonials/new")]
pub async fn open_create(store: web::Data<ClinicStore>) -> impl Responder {
    store.testimonial_editor.open_create();
    redirect(LIST_URL)
}

#[post("/admin/testimonials/save")]
pub async fn save(
    store: web::Data<ClinicStore>,
    web::Form(form): web::Form<TestimonialForm>,
) -> impl Responder {
    store.testimonial_editor.submit(form).await;
    redirect(LIST_URL)
}

#[post("/admin/testimonials/modal/close")]
pub async fn close_modal(store: web::Data<ClinicStore>) -> impl Responder {
    store.testimonial_editor.close();
    redirect(LIST_URL)
}

#[post("/admin/testimonials/delete/confirm")]
pub async fn confirm_delete(store: web::Data<ClinicStore>) -> impl Responder {
    store.testimonial_editor.confirm_remove().await;
    redirect(LIST_URL)
}

#[post("/admin/testimonials/delete/cancel")]
pub async fn cancel_delete(store: web::Data<ClinicStore>) -> impl Responder {
    store.testimonial_editor.cancel_remove();
    redirect(LIST_URL)
}

#[post("/admin/testimonials/{testimonial_id}/edit")]
pub async fn open_edit(
    testimonial_id: web::Path<String>,
    store: web::Data<ClinicStore>,
) -> impl Responder {
    match store.testimonial_editor.find(&testimonial_id) {
        Some(testimonial) => store.testimonial_editor.open_edit(testimonial),
        None => FlashMessage::error(NOT_FOUND).send(),
    }
    redirect(LIST_URL)
}

#[post("/admin/testimonials/{testimonial_id}/delete")]
pub async fn request_delete(
    testimonial_id: web::Path<String>,
    store: web::Data<ClinicStore>,
) -> impl Responder {
    match store.testimonial_editor.find(&testimonial_id) {
        Some(testimonial) => store.testimonial_editor.request_remove(testimonial),
        None => FlashMessage::error(NOT_FOUND).send(),
    }
    redirect(LIST_URL)
}

#[post("/admin/testimonials/{testimonial_id}/approve")]
pub async fn approve(
    testimonial_id: web::Path<String>,
    store: web::Data<ClinicStore>,
) -> impl Responder {
    match store.testimonial_editor.find(&testimonial_id) {
        Some(testimonial) => {
            store.testimonial_editor.approve(&testimonial).await;
        }
        None => FlashMessage::error(NOT_FOUND).send(),
    }
    redirect(LIST_URL)
}

#[post("/admin/testimonials/{testimonial_id}/reject")]
pub async fn reject(
    testimonial_id: web::Path<String>,
    store: web::Data<ClinicStore>,
) -> impl Responder {
    match store.testimonial_editor.find(&testimonial_id) {
        Some(testimonial) => {
            store.testimonial_editor.reject(&testimonial).await;
        }
        None => FlashMessage::error(NOT_FOUND).send(),
    }
    redirect(LIST_URL)
}
