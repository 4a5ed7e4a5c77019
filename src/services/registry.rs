//! Process-wide remote clients. Built once from configuration on first use
//! and shared, unchanged, for the life of the process.

use crate::config::Config;
use crate::services::store::SupabaseClient;
use crate::services::upload::CloudinaryClient;
use once_cell::sync::{Lazy, OnceCell};
use std::sync::Arc;

static HTTP: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

static CLIENTS: OnceCell<Clients> = OnceCell::new();

pub struct Clients {
    pub host: Arc<CloudinaryClient>,
    pub store: Arc<SupabaseClient>,
}

impl Clients {
    fn build(config: &Config) -> Self {
        Self {
            host: Arc::new(CloudinaryClient::new(&config.cloudinary, HTTP.clone())),
            store: Arc::new(SupabaseClient::new(&config.supabase, HTTP.clone())),
        }
    }
}

/// Returns the shared clients, building them from `config` on the first call.
/// Later calls ignore `config`.
pub fn clients(config: &Config) -> &'static Clients {
    CLIENTS.get_or_init(|| {
        let missing = config.missing_remote_settings();
        if !missing.is_empty() {
            tracing::warn!(
                "Remote settings not configured: {}. Uploads and listings will fail until they are set.",
                missing.join(", ")
            );
        }
        Clients::build(config)
    })
}
