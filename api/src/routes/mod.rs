//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → Health check endpoint
//! - `/tickets/{ticket_id}/messages` → Ticket thread listing and replies

use crate::routes::{health::health_routes, tickets::tickets_routes};
use crate::state::AppState;
use axum::Router;

pub mod health;
pub mod tickets;

/// Builds the complete application router for all HTTP endpoints.
///
/// Ticket routes carry no authentication layer; callers are trusted to pass
/// the author id of the message they post.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/tickets", tickets_routes())
        .with_state(app_state)
}
