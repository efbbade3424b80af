use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::entry::base64_bytes;
use common::prelude::{verify_possession, OwnerKey};

use crate::database::StorageError;
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub id: Uuid,
    pub body: DeleteBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteBody {
    /// Possession proof: signature over the double SHA-256 of the
    /// currently stored payload
    #[serde(with = "base64_bytes")]
    pub sign: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub id: Uuid,
}

/// Lookup, verify the possession proof against the stored owner key, then
/// remove. Two racing deletes both verify against the same stored payload,
/// but only one DELETE hits a row; the loser observes NotFound.
pub async fn handler(
    State(state): State<ServiceState>,
    Path(id): Path<Uuid>,
    Json(body): Json<DeleteBody>,
) -> Result<impl IntoResponse, DeleteError> {
    let entry = state
        .database()
        .get_entry(&id)
        .await?
        .ok_or(DeleteError::NotFound(id))?;

    let owner = OwnerKey::from(entry.public_key);
    let public_key = owner
        .to_public_key()
        .map_err(|e| DeleteError::StoredKeyCorrupt(e.to_string()))?;

    if !verify_possession(&public_key, &entry.payload, &body.sign) {
        tracing::warn!(%id, "delete rejected: signature mismatch");
        return Err(DeleteError::SignatureMismatch);
    }

    if !state.database().delete_entry(&id).await? {
        return Err(DeleteError::NotFound(id));
    }

    tracing::info!(%id, "entry deleted");
    Ok((http::StatusCode::OK, Json(DeleteResponse { id })).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteError {
    #[error("entry not found: {0}")]
    NotFound(Uuid),
    #[error("signature mismatch")]
    SignatureMismatch,
    #[error("stored owner key corrupt: {0}")]
    StoredKeyCorrupt(String),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl IntoResponse for DeleteError {
    fn into_response(self) -> Response {
        match self {
            DeleteError::NotFound(id) => (
                http::StatusCode::NOT_FOUND,
                format!("entry not found: {}", id),
            )
                .into_response(),
            DeleteError::SignatureMismatch => {
                (http::StatusCode::BAD_REQUEST, "signature mismatch").into_response()
            }
            DeleteError::StoredKeyCorrupt(e) => {
                tracing::error!("stored owner key corrupt: {}", e);
                (http::StatusCode::INTERNAL_SERVER_ERROR, "storage error").into_response()
            }
            DeleteError::Storage(e) => {
                tracing::error!("delete failed: {}", e);
                (http::StatusCode::INTERNAL_SERVER_ERROR, "storage error").into_response()
            }
        }
    }
}

impl ApiRequest for DeleteRequest {
    type Response = DeleteResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url
            .join(&format!("/api/v0/entry/{}", self.id))
            .unwrap();
        client.delete(full_url).json(&self.body)
    }
}
