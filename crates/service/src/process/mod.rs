use std::time::Duration;

use tokio::sync::watch;
use tokio::time::timeout;
use tracing_subscriber::EnvFilter;

use crate::database::DatabaseSetupError;
use crate::{http_server, ServiceConfig, ServiceState};

const FINAL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Handle for gracefully shutting down the running service.
pub struct ShutdownHandle {
    handles: Vec<tokio::task::JoinHandle<()>>,
    shutdown_tx: watch::Sender<()>,
}

impl ShutdownHandle {
    /// Block until the service shuts down (via signal or explicit shutdown).
    pub async fn wait(mut self) {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutdown signal received");
            }
            _ = futures::future::join_all(self.handles.iter_mut()) => {
                tracing::warn!("service tasks exited");
                return;
            }
        }

        let _ = self.shutdown_tx.send(());
        let drained = futures::future::join_all(self.handles.iter_mut());
        if timeout(FINAL_SHUTDOWN_TIMEOUT, drained).await.is_err() {
            tracing::error!(
                "failed to shut down within {} seconds",
                FINAL_SHUTDOWN_TIMEOUT.as_secs()
            );
            std::process::exit(4);
        }
    }

    /// Trigger shutdown programmatically.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("database setup failed: {0}")]
    Database(#[from] DatabaseSetupError),
}

/// Initialize logging for the server process.
fn init_logging(service_config: &ServiceConfig) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(service_config.log_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(env_filter)
        .init();
}

/// Create state and spawn the API server, returning the state handle.
///
/// The returned `ShutdownHandle` must be kept alive; dropping it does not
/// stop the service.
pub async fn start_service(
    service_config: &ServiceConfig,
) -> Result<(ServiceState, ShutdownHandle), ProcessError> {
    let (shutdown_tx, shutdown_rx) = watch::channel(());
    let state = ServiceState::from_config(service_config).await?;

    let mut handles = Vec::new();

    let api_config = service_config.clone();
    let api_state = state.clone();
    let api_handle = tokio::spawn(async move {
        if let Err(e) = http_server::run_api(api_config, api_state, shutdown_rx).await {
            tracing::error!("API server error: {}", e);
        }
    });
    handles.push(api_handle);

    tracing::info!(addr = %service_config.listen_addr, "running: API server");

    let handle = ShutdownHandle {
        handles,
        shutdown_tx,
    };

    Ok((state, handle))
}

/// Spawns the service and blocks until shutdown. Use for CLI binary usage.
pub async fn spawn_service(service_config: &ServiceConfig) -> Result<(), ProcessError> {
    init_logging(service_config);
    let (_, handle) = start_service(service_config).await?;
    handle.wait().await;
    Ok(())
}
