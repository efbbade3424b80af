use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::entry::base64_bytes;
use common::prelude::{verify_content, verify_possession, OwnerKey};

use crate::database::StorageError;
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub id: Uuid,
    pub body: UpdateBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBody {
    /// Replacement ciphertext
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    /// Possession proof: signature over the double SHA-256 of the
    /// currently stored payload
    #[serde(with = "base64_bytes")]
    pub sign_old: Vec<u8>,
    /// Content proof: signature over the single SHA-256 of `data`
    #[serde(with = "base64_bytes")]
    pub sign_new: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub id: Uuid,
}

/// Lookup, verify the possession proof for the old payload, verify the
/// content proof for the new payload, then persist. Both proofs check
/// against the key stored on the entry; ownership can never move. Either
/// verification failing aborts before any mutation.
///
/// The verify-then-write sequence is deliberately not one isolation unit: a
/// concurrent writer can change the row between the lookup and the UPDATE,
/// in which case the last write lands. See the stale-proof tests.
pub async fn handler(
    State(state): State<ServiceState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateBody>,
) -> Result<impl IntoResponse, UpdateError> {
    let entry = state
        .database()
        .get_entry(&id)
        .await?
        .ok_or(UpdateError::NotFound(id))?;

    let owner = OwnerKey::from(entry.public_key);
    let public_key = owner
        .to_public_key()
        .map_err(|e| UpdateError::StoredKeyCorrupt(e.to_string()))?;

    if !verify_possession(&public_key, &entry.payload, &body.sign_old) {
        tracing::warn!(%id, "update rejected: old-proof mismatch");
        return Err(UpdateError::SignatureMismatch);
    }

    if !verify_content(&public_key, &body.data, &body.sign_new) {
        tracing::warn!(%id, "update rejected: new-proof mismatch");
        return Err(UpdateError::SignatureMismatch);
    }

    if !state.database().update_entry(&id, &body.data).await? {
        // Row vanished between the lookup and the write.
        return Err(UpdateError::NotFound(id));
    }

    tracing::info!(%id, "entry updated");
    Ok((http::StatusCode::OK, Json(UpdateResponse { id })).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("entry not found: {0}")]
    NotFound(Uuid),
    #[error("signature mismatch")]
    SignatureMismatch,
    #[error("stored owner key corrupt: {0}")]
    StoredKeyCorrupt(String),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl IntoResponse for UpdateError {
    fn into_response(self) -> Response {
        match self {
            UpdateError::NotFound(id) => (
                http::StatusCode::NOT_FOUND,
                format!("entry not found: {}", id),
            )
                .into_response(),
            UpdateError::SignatureMismatch => {
                (http::StatusCode::BAD_REQUEST, "signature mismatch").into_response()
            }
            UpdateError::StoredKeyCorrupt(e) => {
                tracing::error!("stored owner key corrupt: {}", e);
                (http::StatusCode::INTERNAL_SERVER_ERROR, "storage error").into_response()
            }
            UpdateError::Storage(e) => {
                tracing::error!("update failed: {}", e);
                (http::StatusCode::INTERNAL_SERVER_ERROR, "storage error").into_response()
            }
        }
    }
}

impl ApiRequest for UpdateRequest {
    type Response = UpdateResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url
            .join(&format!("/api/v0/entry/{}", self.id))
            .unwrap();
        client.put(full_url).json(&self.body)
    }
}
