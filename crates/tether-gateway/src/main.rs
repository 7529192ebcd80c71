mod app;
mod cli;
mod error;
mod handlers;
mod model;
mod state;
mod telemetry;

use crate::app::App;
use crate::cli::CLI;
use crate::state::{AppState, Engine};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tether_core::{Persistence, SystemClock};
use tether_engine::{spawn_sweeper, EngineSettings};
use tether_generator::RandomGenerator;
use tether_storage::{InMemoryPersistence, JsonFilePersistence};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CLI::try_parse()?;
    telemetry::init(config.log_format);

    info!(
        listen_addr = %config.listen_addr,
        base_url = %config.base_url,
        data_file = %config.data_file.display(),
        in_memory = config.in_memory,
        log_format = %config.log_format,
        "starting tether gateway"
    );

    let persistence: Box<dyn Persistence> = if config.in_memory {
        warn!("running with in-memory state, nothing will be persisted");
        Box::new(InMemoryPersistence::new())
    } else {
        Box::new(JsonFilePersistence::new(&config.data_file))
    };

    let engine: Arc<Engine> = Arc::new(
        Engine::open_with(
            persistence,
            RandomGenerator::new(),
            SystemClock,
            EngineSettings::default(),
        )
        .await?,
    );

    let sweeper = (config.sweep_interval_secs > 0).then(|| {
        spawn_sweeper(
            Arc::clone(&engine),
            Duration::from_secs(config.sweep_interval_secs),
        )
    });

    let router = App::router(AppState::new(engine, config.base_url));
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "gateway listening");

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }
    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
