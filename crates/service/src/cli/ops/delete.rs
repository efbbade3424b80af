use clap::Args;
use uuid::Uuid;

use common::crypto::envelope;
use common::prelude::EnvelopeError;
use service::http_server::api::client::ApiError;
use service::http_server::api::v0::entry::delete::{DeleteBody, DeleteRequest};
use service::http_server::api::v0::entry::get::GetRequest;

use crate::cli::op::KeyAccessError;

/// Delete an entry by proving possession of its current ciphertext.
#[derive(Args, Debug, Clone)]
pub struct Delete {
    /// Entry id
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteOpError {
    #[error("operation cancelled")]
    Cancelled,
    #[error(transparent)]
    Key(#[from] KeyAccessError),
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("envelope error: {0}")]
    Envelope(#[from] EnvelopeError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Delete {
    type Error = DeleteOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        if ctx.cancel.is_cancelled() {
            return Err(DeleteOpError::Cancelled);
        }

        let keypair = ctx.keypair()?;

        // The possession proof covers the bytes the server currently holds,
        // so fetch them first.
        let current = ctx.client.call(GetRequest { id: self.id }).await?;
        let sign = envelope::sign_possession(&keypair, &current.data)?;

        ctx.client
            .call(DeleteRequest {
                id: self.id,
                body: DeleteBody { sign },
            })
            .await?;

        Ok(format!("Entry {} successfully deleted", self.id))
    }
}
