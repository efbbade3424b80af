use std::fmt::Write;

use clap::Args;

use common::crypto::envelope;
use common::prelude::Entry;
use service::http_server::api::client::ApiError;
use service::http_server::api::v0::entry::get_all::ListRequest;

use crate::cli::op::KeyAccessError;

/// List every entry stored under our own key.
#[derive(Args, Debug, Clone)]
pub struct All {}

#[derive(Debug, thiserror::Error)]
pub enum AllOpError {
    #[error("operation cancelled")]
    Cancelled,
    #[error(transparent)]
    Key(#[from] KeyAccessError),
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for All {
    type Error = AllOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        if ctx.cancel.is_cancelled() {
            return Err(AllOpError::Cancelled);
        }

        let keypair = ctx.keypair()?;
        let response = ctx
            .client
            .call(ListRequest {
                public_key: keypair.owner_key().to_vec(),
            })
            .await?;

        // Rows degrade independently: one undecryptable entry must not
        // hide the rest of the listing.
        let mut out = String::new();
        for item in response.entries {
            let plaintext = match envelope::decrypt(&keypair, &item.data) {
                Ok(p) => p,
                Err(_) => {
                    let _ = writeln!(out, "{}\tdecrypt failed", item.id);
                    continue;
                }
            };

            match Entry::decode(&plaintext) {
                Ok(entry) => {
                    let _ = writeln!(
                        out,
                        "{}\t{}\t{}",
                        item.id,
                        entry.type_label(),
                        entry.name()
                    );
                }
                Err(e) => {
                    let _ = writeln!(out, "{}\tparsing failed\t{}", item.id, e);
                }
            }
        }

        Ok(out)
    }
}
