//! Booking pages. The visitor's flow lives in [`BookingFlows`]; the session
//! only stores its token.

use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::ClinicBackend;
use crate::booking::{
    BookingError, BookingFlow, BookingFlows, BookingStep, FlowCheckout, SaveOutcome,
};
use crate::domain::types::parse_picker_date;
use crate::forms::booking::{ConfirmBookingForm, SelectDateForm, SelectDoctorForm, SelectSlotForm};
use crate::models::config::ServerConfig;
use crate::routes::{base_context, redirect, render_template, today};
use crate::services::{ServiceError, site as site_service};

const FLOW_KEY: &str = "booking_token";
const STEP_URL: &str = "/booking/step";
const EXPIRED: &str = "Your booking session has expired. Please start again.";

fn current_flow(session: &Session, flows: &BookingFlows) -> Option<(String, FlowCheckout)> {
    let token = session
        .get::<String>(FLOW_KEY)
        .map_err(|err| log::warn!("Unreadable booking token in session: {err}"))
        .ok()
        .flatten()?;
    let flow = flows.get(&token)?;
    Some((token, flow))
}

fn expired() -> HttpResponse {
    FlashMessage::error(EXPIRED).send();
    redirect("/booking")
}

/// Saves the flow and sends `notice` only when this request's change stuck.
/// A flow changed by an overlapping request is shown as that request left it.
fn store_flow(
    flows: &BookingFlows,
    token: &str,
    checkout: FlowCheckout,
    notice: Option<FlashMessage>,
) -> HttpResponse {
    match flows.save(token, checkout) {
        SaveOutcome::Saved => {
            if let Some(notice) = notice {
                notice.send();
            }
            redirect(STEP_URL)
        }
        SaveOutcome::Superseded => redirect(STEP_URL),
        SaveOutcome::Missing => expired(),
    }
}

fn error_notice(result: Result<(), BookingError>) -> Option<FlashMessage> {
    result.err().map(|err| FlashMessage::error(err.to_string()))
}

async fn begin(
    service_id: Option<&str>,
    backend: &ClinicBackend,
    flows: &BookingFlows,
    session: &Session,
) -> HttpResponse {
    let catalog = match site_service::load_booking_catalog(backend.repository(), service_id) {
        Ok(catalog) => catalog,
        Err(ServiceError::NotFound) => {
            FlashMessage::error("We could not find that service.").send();
            return redirect("/services");
        }
        Err(err) => {
            log::error!("Failed to load booking catalog: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    if let Some((token, _)) = current_flow(session, flows) {
        flows.remove(&token);
    }
    let flow = BookingFlow::start(backend, catalog.service, catalog.doctor, today()).await;
    let token = flows.insert(flow);
    if let Err(err) = session.insert(FLOW_KEY, &token) {
        log::error!("Failed to store booking token: {err}");
        flows.remove(&token);
        return HttpResponse::InternalServerError().finish();
    }
    redirect(STEP_URL)
}

#[get("/booking")]
pub async fn start(
    backend: web::Data<ClinicBackend>,
    flows: web::Data<BookingFlows>,
    session: Session,
) -> impl Responder {
    begin(None, &backend, &flows, &session).await
}

#[get("/booking/step")]
pub async fn show_step(
    backend: web::Data<ClinicBackend>,
    flows: web::Data<BookingFlows>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Some((_, FlowCheckout { flow, .. })) = current_flow(&session, &flows) else {
        return redirect("/booking");
    };
    let catalog = match site_service::load_booking_catalog(
        backend.repository(),
        Some(flow.draft.service.id.as_str()),
    ) {
        Ok(catalog) => catalog,
        Err(err) => {
            log::error!("Failed to load booking catalog: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let mut context = base_context(&flash_messages, &server_config, "booking");
    context.insert("flow", &flow);
    context.insert("step", &flow.step.number());
    context.insert("is_success", &(flow.step == BookingStep::Success));
    context.insert("doctors", &catalog.doctors);
    context.insert("min_date", &today().format("%Y-%m-%d").to_string());
    render_template(&tera, "booking/step.html", &context)
}

#[get("/booking/{service_id}")]
pub async fn start_with_service(
    service_id: web::Path<String>,
    backend: web::Data<ClinicBackend>,
    flows: web::Data<BookingFlows>,
    session: Session,
) -> impl Responder {
    begin(Some(service_id.as_str()), &backend, &flows, &session).await
}

#[post("/booking/date")]
pub async fn select_date(
    backend: web::Data<ClinicBackend>,
    flows: web::Data<BookingFlows>,
    session: Session,
    web::Form(form): web::Form<SelectDateForm>,
) -> impl Responder {
    let Some((token, mut checkout)) = current_flow(&session, &flows) else {
        return expired();
    };
    let Ok(date) = parse_picker_date(&form.date) else {
        FlashMessage::error("Please choose a valid date").send();
        return redirect(STEP_URL);
    };
    let result = checkout
        .flow
        .select_date(backend.get_ref(), date, today())
        .await;
    store_flow(&flows, &token, checkout, error_notice(result))
}

#[post("/booking/doctor")]
pub async fn select_doctor(
    backend: web::Data<ClinicBackend>,
    flows: web::Data<BookingFlows>,
    session: Session,
    web::Form(form): web::Form<SelectDoctorForm>,
) -> impl Responder {
    let Some((token, mut checkout)) = current_flow(&session, &flows) else {
        return expired();
    };
    let doctor = match site_service::find_doctor(backend.repository(), &form.doctor_id) {
        Ok(doctor) => doctor,
        Err(err) => {
            log::debug!("Unknown doctor `{}`: {err}", form.doctor_id);
            FlashMessage::error("Please choose one of our specialists").send();
            return redirect(STEP_URL);
        }
    };
    let result = checkout.flow.select_doctor(backend.get_ref(), doctor).await;
    store_flow(&flows, &token, checkout, error_notice(result))
}

#[post("/booking/slot")]
pub async fn select_slot(
    flows: web::Data<BookingFlows>,
    session: Session,
    web::Form(form): web::Form<SelectSlotForm>,
) -> impl Responder {
    let Some((token, mut checkout)) = current_flow(&session, &flows) else {
        return expired();
    };
    checkout.flow.select_time_slot(&form.slot);
    store_flow(&flows, &token, checkout, None)
}

#[post("/booking/next")]
pub async fn next(flows: web::Data<BookingFlows>, session: Session) -> impl Responder {
    let Some((token, mut checkout)) = current_flow(&session, &flows) else {
        return expired();
    };
    let result = checkout.flow.next(today());
    store_flow(&flows, &token, checkout, error_notice(result))
}

#[post("/booking/back")]
pub async fn back(flows: web::Data<BookingFlows>, session: Session) -> impl Responder {
    let Some((token, mut checkout)) = current_flow(&session, &flows) else {
        return expired();
    };
    let result = checkout.flow.back();
    store_flow(&flows, &token, checkout, error_notice(result))
}

#[post("/booking/confirm")]
pub async fn confirm(
    backend: web::Data<ClinicBackend>,
    flows: web::Data<BookingFlows>,
    session: Session,
    web::Form(form): web::Form<ConfirmBookingForm>,
) -> impl Responder {
    let Some((token, mut checkout)) = current_flow(&session, &flows) else {
        return expired();
    };
    let notice = match checkout
        .flow
        .confirm(backend.get_ref(), Some(form.patient_name))
        .await
    {
        Ok(appointment) => {
            log::info!(
                "Appointment {} booked for {} at {}",
                appointment.id,
                appointment.date,
                appointment.time_slot
            );
            FlashMessage::success("Your appointment is booked. See you soon!")
        }
        Err(err) => FlashMessage::error(err.to_string()),
    };
    store_flow(&flows, &token, checkout, Some(notice))
}
