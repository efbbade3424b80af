use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::entry::base64_bytes;

use crate::database::StorageError;
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListRequest {
    /// Owner identity to list entries for
    #[serde(with = "base64_bytes")]
    pub public_key: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub entries: Vec<ListEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListEntry {
    pub id: Uuid,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

/// Always succeeds, possibly with an empty list. An unknown key is
/// indistinguishable from a key with no entries.
pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<ListRequest>,
) -> Result<impl IntoResponse, ListError> {
    let entries = state.database().get_entries_for(&req.public_key).await?;

    let entries = entries
        .into_iter()
        .map(|e| ListEntry {
            id: e.id,
            data: e.payload,
        })
        .collect();

    Ok((http::StatusCode::OK, Json(ListResponse { entries })).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl IntoResponse for ListError {
    fn into_response(self) -> Response {
        match self {
            ListError::Storage(e) => {
                tracing::error!("list failed: {}", e);
                (http::StatusCode::INTERNAL_SERVER_ERROR, "storage error").into_response()
            }
        }
    }
}

impl ApiRequest for ListRequest {
    type Response = ListResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/entry/list").unwrap();
        client.post(full_url).json(&self)
    }
}
