pub mod api;
pub mod config;
pub mod error;
pub mod expander;
pub mod generator;
pub mod media;
pub mod models;
pub mod prompts;
pub mod schema;
pub mod server;
pub mod variations;

pub use error::{GenerationError, ProviderError, ValidationError};
pub use generator::VariationStudio;
pub use models::{GenerateRequest, ImageSet, ResponseBundle, VariationResult};

/// Installs the `tracing` subscriber used by both binaries. `RUST_LOG`
/// overrides the default `info` level.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub(crate) fn logi(message: impl AsRef<str>) {
    tracing::info!("{}", message.as_ref());
}

pub(crate) fn logok(message: impl AsRef<str>) {
    tracing::info!(status = "ok", "{}", message.as_ref());
}

pub(crate) fn logw(message: impl AsRef<str>) {
    tracing::warn!("{}", message.as_ref());
}
