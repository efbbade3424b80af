//! Entry API: the server half of the secret-store protocol.
//!
//! One file per operation. Each holds the wire types, the axum handler
//! implementing that operation's verify-then-write state machine, the
//! operation's error surface, and the client-side request builder.
//!
//! Authorization is signature-only: a mutation is allowed exactly when the
//! presented proof verifies against the owner modulus, asserted in the
//! request for Create and read from the stored row for Update/Delete. Reads
//! are not gated at all; payload confidentiality rests on the client-side
//! encryption, not on access control.

use axum::routing::post;
use axum::Router;

pub mod create;
pub mod delete;
pub mod get;
pub mod get_all;
pub mod update;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/", post(create::handler))
        .route("/list", post(get_all::handler))
        .route(
            "/:id",
            axum::routing::get(get::handler)
                .put(update::handler)
                .delete(delete::handler),
        )
        .with_state(state)
}
