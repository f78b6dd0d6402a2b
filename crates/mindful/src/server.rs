use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use mindful_core::Clock;
use mindful_db::open_storage;
use mindful_logging::{LogEvent, Logger};
use mindful_script::{create_generator, ScriptGenerator};

use crate::api::{self, AppState};
use crate::config::AppConfig;

pub async fn handle_serve_command(
    config: &AppConfig,
    persist: bool,
    logger: Logger,
    clock: Arc<dyn Clock>,
) -> Result<()> {
    let storage = open_storage(&config.storage_settings(persist), clock.clone())
        .context("Failed to open storage")?;
    let generator: Arc<dyn ScriptGenerator> = Arc::from(create_generator(config.generator_config()));

    let storage_name = storage.backend_name();
    let generator_name = generator.name().to_string();

    let router = api::create_router(AppState {
        storage,
        generator,
        clock,
        logger,
    });

    let addr = format!("{}:{}", config.host(), config.port());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind API server to {}", addr))?;
    let local_addr = listener
        .local_addr()
        .context("Failed to read bound address")?;

    info!(address = %local_addr, storage = storage_name, "Server listening");
    logger.log(&LogEvent::ServerStarted {
        address: local_addr.to_string(),
        storage: storage_name.to_string(),
        generator: generator_name,
    });

    let started = Instant::now();
    let result = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    logger.log(&LogEvent::ServerStopped {
        uptime_secs: started.elapsed().as_secs_f64(),
    });

    result.context("API server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
