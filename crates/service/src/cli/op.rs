use std::error::Error;
use std::path::PathBuf;

use tokio_util::sync::CancellationToken;
use url::Url;

use common::prelude::{KeyError, Keypair};
use service::http_server::api::client::{ApiClient, ApiError};

#[derive(Clone)]
pub struct OpContext {
    /// API client (always initialized with default or custom URL)
    pub client: ApiClient,
    /// Path to the user's key file, if given
    pub key_path: Option<PathBuf>,
    /// Cancellation signal, flipped by Ctrl-C
    pub cancel: CancellationToken,
}

#[derive(Debug, thiserror::Error)]
pub enum KeyAccessError {
    #[error("no key file specified; pass --key or generate one with `keepsake keygen`")]
    Missing,
    #[error("key error: {0}")]
    Key(#[from] KeyError),
}

impl OpContext {
    pub fn new(
        remote: Url,
        key_path: Option<PathBuf>,
        cancel: CancellationToken,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            client: ApiClient::new(&remote)?,
            key_path,
            cancel,
        })
    }

    /// Load the user's keypair from the configured key file.
    pub fn keypair(&self) -> Result<Keypair, KeyAccessError> {
        let path = self.key_path.as_deref().ok_or(KeyAccessError::Missing)?;
        Ok(Keypair::load(&self.cancel, path)?)
    }
}

#[async_trait::async_trait]
pub trait Op: Send + Sync {
    type Error: Error + Send + Sync + 'static;
    type Output;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}

#[macro_export]
macro_rules! command_enum {
    ($(($variant:ident, $type:ty)),* $(,)?) => {
        #[derive(Subcommand, Debug, Clone)]
        pub enum Command {
            $($variant($type),)*
        }

        #[derive(Debug)]
        pub enum OpOutput {
            $($variant(<$type as $crate::cli::op::Op>::Output),)*
        }

        #[derive(Debug, thiserror::Error)]
        pub enum OpError {
            $(
                #[error(transparent)]
                $variant(<$type as $crate::cli::op::Op>::Error),
            )*
        }

        #[async_trait::async_trait]
        impl $crate::cli::op::Op for Command {
            type Output = OpOutput;
            type Error = OpError;

            async fn execute(&self, ctx: &$crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
                match self {
                    $(
                        Command::$variant(op) => {
                            op.execute(ctx).await
                                .map(OpOutput::$variant)
                                .map_err(OpError::$variant)
                        },
                    )*
                }
            }
        }

        impl std::fmt::Display for OpOutput {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        OpOutput::$variant(output) => write!(f, "{}", output),
                    )*
                }
            }
        }
    };
}
