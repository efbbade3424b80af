use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::entry::base64_bytes;
use common::prelude::{verify_content, OwnerKey};

use crate::database::StorageError;
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRequest {
    /// Owner identity: raw big-endian RSA modulus bytes
    #[serde(with = "base64_bytes")]
    pub public_key: Vec<u8>,
    /// Ciphertext to store
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    /// Signature over the single SHA-256 of `data`
    #[serde(with = "base64_bytes")]
    pub sign: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResponse {
    pub id: Uuid,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<CreateRequest>,
) -> Result<impl IntoResponse, CreateError> {
    // The owner key is asserted by the request itself; this is the only
    // operation where the caller names their own identity.
    let owner = OwnerKey::from(req.public_key.clone());
    let public_key = owner
        .to_public_key()
        .map_err(|e| CreateError::InvalidKey(e.to_string()))?;

    if !verify_content(&public_key, &req.data, &req.sign) {
        tracing::warn!(owner = %owner.to_hex(), "create rejected: signature mismatch");
        return Err(CreateError::SignatureMismatch);
    }

    let id = state
        .database()
        .create_entry(owner.as_bytes(), &req.data)
        .await?;

    tracing::info!(%id, "entry created");
    Ok((http::StatusCode::CREATED, Json(CreateResponse { id })).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum CreateError {
    #[error("invalid owner key: {0}")]
    InvalidKey(String),
    #[error("signature mismatch")]
    SignatureMismatch,
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl IntoResponse for CreateError {
    fn into_response(self) -> Response {
        match self {
            CreateError::InvalidKey(msg) => (
                http::StatusCode::BAD_REQUEST,
                format!("invalid owner key: {}", msg),
            )
                .into_response(),
            CreateError::SignatureMismatch => {
                (http::StatusCode::BAD_REQUEST, "signature mismatch").into_response()
            }
            CreateError::Storage(e) => {
                tracing::error!("create failed: {}", e);
                (http::StatusCode::INTERNAL_SERVER_ERROR, "storage error").into_response()
            }
        }
    }
}

// Client implementation - builds request for this operation
impl ApiRequest for CreateRequest {
    type Response = CreateResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/entry").unwrap();
        client.post(full_url).json(&self)
    }
}
