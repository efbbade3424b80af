use crate::database::{Database, DatabaseSetupError};
use crate::ServiceConfig;

/// Shared handle threaded through the HTTP handlers.
///
/// There is no other shared mutable in-process state; every request works
/// against the connection pool alone.
#[derive(Debug, Clone)]
pub struct State {
    database: Database,
}

impl State {
    pub async fn from_config(config: &ServiceConfig) -> Result<Self, DatabaseSetupError> {
        let database = match &config.sqlite_path {
            Some(path) => Database::connect(path).await?,
            None => Database::in_memory().await?,
        };
        Ok(Self { database })
    }

    pub fn new(database: Database) -> Self {
        Self { database }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }
}
