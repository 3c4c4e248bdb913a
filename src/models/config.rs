//! Configuration model loaded from external sources.

use serde::Deserialize;

fn default_mock_delay_ms() -> u64 {
    300
}

fn default_page_size() -> usize {
    crate::pagination::DEFAULT_ITEMS_PER_PAGE
}

fn default_clinic_name() -> String {
    "Motion Physio & Orthopedics".to_string()
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// Glob passed to Tera, e.g. `templates/**/*`.
    pub templates_dir: String,
    /// Session and flash cookie key material; at least 64 bytes.
    pub secret: String,
    /// Artificial latency of every mock backend call.
    #[serde(default = "default_mock_delay_ms")]
    pub mock_delay_ms: u64,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_clinic_name")]
    pub clinic_name: String,
}
