//! Shared harness: a real API server on an ephemeral port, driven by the
//! real client.

use axum::Router;
use rsa::RsaPrivateKey;
use tokio::net::TcpListener;
use url::Url;
use uuid::Uuid;

use common::crypto::envelope;
use common::prelude::Keypair;
use service::database::Database;
use service::http_server::api;
use service::http_server::api::client::ApiClient;
use service::http_server::handlers::not_found_handler;
use service::http_server::api::v0::entry::create::CreateRequest;
use service::ServiceState;

/// Spin up an in-memory server and return a client pointed at it.
pub async fn spawn_server() -> ApiClient {
    let database = Database::in_memory().await.unwrap();
    let state = ServiceState::new(database);

    let app = Router::new()
        .nest("/api", api::router(state.clone()))
        .fallback(not_found_handler)
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let url = Url::parse(&format!("http://{}", addr)).unwrap();
    ApiClient::new(&url).unwrap()
}

/// 2048-bit keys keep the suite fast; the protocol is size-agnostic.
pub fn test_keypair() -> Keypair {
    let mut rng = rand::thread_rng();
    Keypair::from(RsaPrivateKey::new(&mut rng, 2048).unwrap())
}

/// Create an entry with a correctly signed payload, returning its id.
pub async fn create_entry(client: &ApiClient, keypair: &Keypair, data: &[u8]) -> Uuid {
    let sign = envelope::sign_content(keypair, data).unwrap();
    let response = client
        .call(CreateRequest {
            public_key: keypair.owner_key().to_vec(),
            data: data.to_vec(),
            sign,
        })
        .await
        .unwrap();
    response.id
}
