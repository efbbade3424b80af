use axum::Router;

pub mod entry;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .nest("/entry", entry::router(state.clone()))
        .with_state(state)
}
