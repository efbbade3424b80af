use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Args;

use service::process::ProcessError;
use service::{spawn_service, ServiceConfig};

/// Run the Keepsake API server.
#[derive(Args, Debug, Clone)]
pub struct Serve {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:3200")]
    pub listen: SocketAddr,

    /// Path to the sqlite database (in-memory if not set)
    #[arg(long)]
    pub sqlite_path: Option<PathBuf>,

    /// Log verbosely
    #[arg(long)]
    pub debug: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ServeOpError {
    #[error("service failed: {0}")]
    Process(#[from] ProcessError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Serve {
    type Error = ServeOpError;
    type Output = String;

    async fn execute(&self, _ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = ServiceConfig {
            listen_addr: self.listen,
            sqlite_path: self.sqlite_path.clone(),
            log_level: if self.debug {
                tracing::Level::DEBUG
            } else {
                tracing::Level::INFO
            },
        };

        spawn_service(&config).await?;
        Ok("server stopped".to_string())
    }
}
