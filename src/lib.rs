use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_files::Files;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::middleware::{Compress, Logger};
use actix_web::{App, HttpServer, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use tera::Tera;

use crate::booking::BookingFlows;
use crate::models::config::ServerConfig;
use crate::notifications::FlashNotifier;
use crate::repository::InMemoryRepository;
use crate::services::mock::MockService;
use crate::store::AdminStore;

pub mod booking;
pub mod domain;
pub mod dto;
pub mod error_conversions;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod notifications;
pub mod pagination;
pub mod repository;
pub mod routes;
pub mod services;
pub mod store;
pub mod validation;

/// Backend wired into the running server.
pub type ClinicBackend = MockService<InMemoryRepository>;
/// Admin store shared by the admin handlers.
pub type ClinicStore = AdminStore<ClinicBackend>;

/// Minimum key length accepted by [`Key::from`].
const MIN_SECRET_LEN: usize = 64;

/// Builds the shared backend seeded with the demo clinic content.
pub fn build_backend(server_config: &ServerConfig) -> std::io::Result<Arc<ClinicBackend>> {
    let repo = InMemoryRepository::seeded(routes::today())
        .map_err(|e| std::io::Error::other(format!("Failed to seed clinic data: {e}")))?;
    Ok(Arc::new(MockService::new(
        repo,
        Duration::from_millis(server_config.mock_delay_ms),
    )))
}

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    if server_config.secret.len() < MIN_SECRET_LEN {
        return Err(std::io::Error::other(format!(
            "Session secret must be at least {MIN_SECRET_LEN} bytes"
        )));
    }

    let backend = build_backend(&server_config)?;
    let store = web::Data::new(ClinicStore::new(
        backend.clone(),
        Arc::new(FlashNotifier),
        server_config.page_size,
    ));
    let backend = web::Data::from(backend);
    let flows = web::Data::new(BookingFlows::new());

    // Keys and stores for sessions and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Starting {} on {}:{}",
        server_config.clinic_name,
        bind_address.0,
        bind_address.1
    );

    HttpServer::new(move || {
        App::new()
            .wrap(crate::middleware::error_boundary())
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .build(),
            )
            .wrap(Compress::default())
            .wrap(Logger::default())
            .service(Files::new("/assets", "./assets"))
            .configure(routes::configure)
            .app_data(web::Data::new(tera.clone()))
            .app_data(backend.clone())
            .app_data(store.clone())
            .app_data(flows.clone())
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
