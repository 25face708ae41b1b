//! Ecoloop application core: page controllers, chat and the shell that ties
//! them together. A front end renders [`Shell`] and forwards user actions.

pub mod chat;
pub mod i18n;
pub mod pages;
pub mod shell;
pub mod state;

#[cfg(test)]
mod test_support;

use providers::GeminiGateway;
use services::geolocation::DeviceLocation;
use services::preferences::PreferenceStore;
use shared::settings::GatewaySettings;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

pub use shell::Shell;
pub use state::AppContext;

/// Install the global subscriber. `RUST_LOG` overrides the `info` default.
/// Safe to call more than once.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Wire the production shell from the environment: Gemini gateway, device
/// location and the on-disk language preference.
pub fn bootstrap() -> anyhow::Result<Shell> {
    init_tracing();
    let settings = GatewaySettings::from_env();
    let gateway = GeminiGateway::from_settings(&settings)?;
    tracing::info!(
        text_model = %settings.text_model,
        image_model = %settings.image_model,
        "gateway configured"
    );
    let ctx = AppContext::new(Arc::new(gateway), Arc::new(DeviceLocation::from_env()));
    Ok(Shell::new(ctx, PreferenceStore::open_default()))
}
