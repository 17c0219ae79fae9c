//! Serve command implementation

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use habit_streak::config::Config;
use habit_streak::server::{ApiServer, ApiState};
use habit_streak::HabitTracker;

/// Run the API until Ctrl-C
pub async fn serve_command(mut config: Config, port: Option<u16>) -> Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }

    let tracker = HabitTracker::from_config(&config)?;
    let state = ApiState::new(Arc::new(tracker), &config.server);
    let server = ApiServer::bind(&config.server.bind_addr(), state)?;
    let shutdown = server.shutdown_handle();

    let mut handle = tokio::task::spawn_blocking(move || server.run());

    tokio::select! {
        result = &mut handle => {
            result.context("API server thread panicked")?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            info!("[habit-streak:serve] Shutting down");
            shutdown.shutdown();
            handle.await.context("API server thread panicked")?;
        }
    }

    Ok(())
}
