use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::entry::base64_bytes;

use crate::database::StorageError;
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetRequest {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetResponse {
    pub id: Uuid,
    /// The stored ciphertext, byte-for-byte as submitted
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

/// No authorization check here. Anyone who knows an id receives the
/// ciphertext; without the owner's private key it stays opaque. This is the
/// protocol's confidentiality-only model, pinned by tests.
pub async fn handler(
    State(state): State<ServiceState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, GetError> {
    let entry = state
        .database()
        .get_entry(&id)
        .await?
        .ok_or(GetError::NotFound(id))?;

    Ok((
        http::StatusCode::OK,
        Json(GetResponse {
            id,
            data: entry.payload,
        }),
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum GetError {
    #[error("entry not found: {0}")]
    NotFound(Uuid),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl IntoResponse for GetError {
    fn into_response(self) -> Response {
        match self {
            GetError::NotFound(id) => (
                http::StatusCode::NOT_FOUND,
                format!("entry not found: {}", id),
            )
                .into_response(),
            GetError::Storage(e) => {
                tracing::error!("get failed: {}", e);
                (http::StatusCode::INTERNAL_SERVER_ERROR, "storage error").into_response()
            }
        }
    }
}

impl ApiRequest for GetRequest {
    type Response = GetResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url
            .join(&format!("/api/v0/entry/{}", self.id))
            .unwrap();
        client.get(full_url)
    }
}
