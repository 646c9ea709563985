use crate::routes::tickets::messages::message_routes;
use crate::state::AppState;
use axum::Router;

pub mod messages;

pub fn tickets_routes() -> Router<AppState> {
    Router::new().nest("/{ticket_id}/messages", message_routes())
}
