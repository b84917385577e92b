use anyhow::Context as _;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::sync::Arc;
use tera::Tera;
use tokio::net::TcpListener;

mod config;
mod data;
mod features;
mod handlers;
mod utils;

use config::Settings;
use data::repositories::HttpBackend;
use features::view::ViewRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configuration
    let settings = Settings::from_env().context("Invalid configuration")?;

    TermLogger::init(
        settings.log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logger")?;

    // Backend client, shared by every view
    let backend = HttpBackend::new(settings.backend_url.clone(), settings.backend_timeout)
        .context("Failed to create backend client")?;
    let views = Arc::new(ViewRegistry::new(Arc::new(backend), settings.view_limits()));
    views.spawn_sweeper(settings.view_sweep_interval);

    // Templates configuration
    let templates = Tera::new(&settings.templates_glob)
        .with_context(|| format!("Template parsing error in {}", settings.templates_glob))?;

    let app = handlers::router(
        views,
        Arc::new(templates),
        &settings.static_dir,
        settings.session_idle_days,
    );

    // Start server
    let listener = TcpListener::bind(&settings.listen_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", settings.listen_addr))?;

    log::info!(
        "Server running on http://{} (backend {})",
        settings.listen_addr,
        settings.backend_url
    );

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
