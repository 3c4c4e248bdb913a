//! Error boundary for server failures.
//!
//! Any 5xx response body is replaced with a generic failure page offering a
//! reload link, so a broken view never leaks a blank or partial page.

use actix_web::dev::ServiceResponse;
use actix_web::http::header;
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};
use actix_web::{HttpResponse, Result, web};
use tera::{Context, Tera};

pub const FAILURE_TEMPLATE: &str = "error.html";

/// Used when the failure template itself cannot be rendered.
const FALLBACK_PAGE: &str = "<!doctype html><html><head><title>Something went wrong</title></head>\
<body><h1>Something went wrong</h1><p>We could not display this page.</p>\
<p><a href=\"\">Reload the page</a></p></body></html>";

pub fn error_boundary<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new().default_handler_server(render_failure)
}

fn render_failure<B>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    let status = res.status();
    let path = res.request().path().to_string();
    log::error!("Request to {path} failed with {status}");

    let (req, _) = res.into_parts();
    let body = req
        .app_data::<web::Data<Tera>>()
        .and_then(|tera| {
            let mut context = Context::new();
            context.insert("path", &path);
            tera.render(FAILURE_TEMPLATE, &context)
                .map_err(|err| log::error!("Failed to render failure page: {err}"))
                .ok()
        })
        .unwrap_or_else(|| FALLBACK_PAGE.to_string());

    let response = HttpResponse::build(status)
        .insert_header((header::CONTENT_TYPE, "text/html; charset=utf-8"))
        .body(body);

    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(req, response).map_into_right_body(),
    ))
}
