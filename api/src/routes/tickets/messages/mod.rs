use crate::state::AppState;
use axum::{Router, routing::get};

pub mod common;
pub mod get;
pub mod post;

use get::list_messages;
use post::create_message;

pub fn message_routes() -> Router<AppState> {
    Router::new().route("/", get(list_messages).post(create_message))
}
