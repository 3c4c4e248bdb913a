#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use chrono::NaiveDate;
use tera::Tera;

use physio_clinic::booking::BookingFlows;
use physio_clinic::models::config::ServerConfig;
use physio_clinic::notifications::{FlashNotifier, RecordingNotifier};
use physio_clinic::repository::InMemoryRepository;
use physio_clinic::services::mock::MockService;
use physio_clinic::{ClinicBackend, ClinicStore};

pub const SECRET: &str =
    "integration-test-secret-integration-test-secret-integration-test-secret";

/// A Monday.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

pub fn backend() -> Arc<ClinicBackend> {
    backend_with_delay(Duration::ZERO)
}

/// Backend whose every call takes `delay`, so requests can overlap.
pub fn backend_with_delay(delay: Duration) -> Arc<ClinicBackend> {
    let repo = InMemoryRepository::seeded(today()).unwrap();
    Arc::new(MockService::new(repo, delay))
}

/// Admin store over a fresh backend, reporting to a recording notifier.
pub fn store() -> (Arc<ClinicBackend>, Arc<RecordingNotifier>, ClinicStore) {
    store_with_delay(Duration::ZERO)
}

pub fn store_with_delay(
    delay: Duration,
) -> (Arc<ClinicBackend>, Arc<RecordingNotifier>, ClinicStore) {
    let backend = backend_with_delay(delay);
    let notifier = Arc::new(RecordingNotifier::new());
    let store = ClinicStore::new(backend.clone(), notifier.clone(), 10);
    (backend, notifier, store)
}

pub fn server_config() -> ServerConfig {
    ServerConfig {
        address: "127.0.0.1".to_string(),
        port: 0,
        templates_dir: "templates/**/*".to_string(),
        secret: SECRET.to_string(),
        mock_delay_ms: 0,
        page_size: 10,
        clinic_name: "Test Physio".to_string(),
    }
}

/// Shared state handed to the application under test.
pub struct AppState {
    pub tera: web::Data<Tera>,
    pub backend: web::Data<ClinicBackend>,
    pub store: web::Data<ClinicStore>,
    pub flows: web::Data<BookingFlows>,
    pub config: web::Data<ServerConfig>,
}

pub fn app_state() -> AppState {
    app_state_with_delay(Duration::ZERO)
}

pub fn app_state_with_delay(delay: Duration) -> AppState {
    let config = server_config();
    let backend = backend_with_delay(delay);
    let store = ClinicStore::new(backend.clone(), Arc::new(FlashNotifier), config.page_size);
    AppState {
        tera: web::Data::new(Tera::new(&config.templates_dir).unwrap()),
        backend: web::Data::from(backend),
        store: web::Data::new(store),
        flows: web::Data::new(BookingFlows::new()),
        config: web::Data::new(config),
    }
}
