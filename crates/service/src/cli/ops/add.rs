use clap::Args;

use common::crypto::envelope;
use common::prelude::{EntryError, EnvelopeError};
use service::http_server::api::client::ApiError;
use service::http_server::api::v0::entry::create::CreateRequest;

use super::entry_input::{EntryInput, EntryInputError};
use crate::cli::op::KeyAccessError;

/// Store a new entry: encrypt it under our own key and sign the ciphertext.
#[derive(Args, Debug, Clone)]
pub struct Add {
    #[command(subcommand)]
    pub entry: EntryInput,
}

#[derive(Debug, thiserror::Error)]
pub enum AddOpError {
    #[error("operation cancelled")]
    Cancelled,
    #[error(transparent)]
    Key(#[from] KeyAccessError),
    #[error(transparent)]
    Input(#[from] EntryInputError),
    #[error("encode entry failed: {0}")]
    Encode(#[from] EntryError),
    #[error("envelope error: {0}")]
    Envelope(#[from] EnvelopeError),
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Add {
    type Error = AddOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        if ctx.cancel.is_cancelled() {
            return Err(AddOpError::Cancelled);
        }

        let keypair = ctx.keypair()?;
        let entry = self.entry.build()?;

        let plaintext = entry.encode()?;
        let ciphertext = envelope::encrypt(&keypair.public_key(), &plaintext)?;
        let sign = envelope::sign_content(&keypair, &ciphertext)?;

        let response = ctx
            .client
            .call(CreateRequest {
                public_key: keypair.owner_key().to_vec(),
                data: ciphertext,
                sign,
            })
            .await?;

        Ok(format!("Entry ID: {}", response.id))
    }
}
