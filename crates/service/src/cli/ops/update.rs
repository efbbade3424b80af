use clap::Args;
use uuid::Uuid;

use common::crypto::envelope;
use common::prelude::{EntryError, EnvelopeError};
use service::http_server::api::client::ApiError;
use service::http_server::api::v0::entry::get::GetRequest;
use service::http_server::api::v0::entry::update::{UpdateBody, UpdateRequest};

use super::entry_input::{EntryInput, EntryInputError};
use crate::cli::op::KeyAccessError;

/// Replace an entry's content wholesale.
///
/// Carries two proofs: possession of the currently stored ciphertext (double
/// hash) and authorship of the replacement (single hash).
#[derive(Args, Debug, Clone)]
pub struct Update {
    /// Entry id
    pub id: Uuid,

    #[command(subcommand)]
    pub entry: EntryInput,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateOpError {
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
impl crate::cli::op::Op for Update {
    type Error = UpdateOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        if ctx.cancel.is_cancelled() {
            return Err(UpdateOpError::Cancelled);
        }

        let keypair = ctx.keypair()?;

        let current = ctx.client.call(GetRequest { id: self.id }).await?;
        let sign_old = envelope::sign_possession(&keypair, &current.data)?;

        let entry = self.entry.build()?;
        let plaintext = entry.encode()?;
        let ciphertext = envelope::encrypt(&keypair.public_key(), &plaintext)?;
        let sign_new = envelope::sign_content(&keypair, &ciphertext)?;

        ctx.client
            .call(UpdateRequest {
                id: self.id,
                body: UpdateBody {
                    data: ciphertext,
                    sign_old,
                    sign_new,
                },
            })
            .await?;

        Ok(format!("Entry {} successfully updated", self.id))
    }
}
