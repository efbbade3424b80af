use clap::Args;
use uuid::Uuid;

use common::crypto::envelope;
use common::prelude::{Entry, EntryError, EnvelopeError};
use service::http_server::api::client::ApiError;
use service::http_server::api::v0::entry::get::GetRequest;

use crate::cli::op::KeyAccessError;

/// Fetch one entry, decrypt it, and print its contents.
#[derive(Args, Debug, Clone)]
pub struct Get {
    /// Entry id
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum GetOpError {
    #[error("operation cancelled")]
    Cancelled,
    #[error(transparent)]
    Key(#[from] KeyAccessError),
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("decrypt failed: {0}")]
    Decrypt(#[from] EnvelopeError),
    #[error("parse entry failed: {0}")]
    Parse(#[from] EntryError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Get {
    type Error = GetOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        if ctx.cancel.is_cancelled() {
            return Err(GetOpError::Cancelled);
        }

        let keypair = ctx.keypair()?;
        let response = ctx.client.call(GetRequest { id: self.id }).await?;

        let plaintext = envelope::decrypt(&keypair, &response.data)?;
        let entry = Entry::decode(&plaintext)?;

        Ok(entry.summary())
    }
}
