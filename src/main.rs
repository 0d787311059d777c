use anyhow::Result;
use prompt_variations::config::Config;
use prompt_variations::server;
use prompt_variations::{init_tracing, VariationStudio};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cfg = Config::from_env()?;
    let studio = Arc::new(VariationStudio::from_config(&cfg).await?);
    let app = server::router(studio, Some(&cfg.static_dir));

    server::serve(app, cfg.port).await
}
