use std::path::PathBuf;

use clap::Args;

use common::prelude::{KeyError, Keypair};

/// Generate a new 4096-bit keypair and persist it as a PEM file.
#[derive(Args, Debug, Clone)]
pub struct Keygen {
    /// Directory to write the key file into
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum KeygenOpError {
    #[error("key error: {0}")]
    Key(#[from] KeyError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Keygen {
    type Error = KeygenOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let (keypair, path) = Keypair::generate(&ctx.cancel, &self.dir)?;

        Ok(format!(
            "Key saved to {}\nOwner key: {}",
            path.display(),
            keypair.owner_key().to_hex()
        ))
    }
}
