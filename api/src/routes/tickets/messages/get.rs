use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::response::ApiResponse;
use crate::routes::tickets::messages::common::service_error_response;
use crate::state::AppState;

/// GET /api/tickets/{ticket_id}/messages
///
/// Lists the thread of a ticket, oldest message first. Replies by support
/// staff are labelled according to the support name settings.
///
/// ### Responses
/// - `200 OK` with a list of message views
/// - `404 Not Found` if the ticket does not exist
/// - `500 Internal Server Error`
pub async fn list_messages(
    Path(ticket_id): Path<i64>,
    State(app_state): State<AppState>,
) -> impl IntoResponse {
    match app_state.messages().thread(ticket_id).await {
        Ok(views) => (
            StatusCode::OK,
            Json(ApiResponse::success(views, "Messages retrieved successfully")),
        )
            .into_response(),
        Err(err) => service_error_response(err),
    }
}
