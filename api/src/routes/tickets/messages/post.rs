use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use services::ticket_message_service::{MessageStatus, NewTicketMessage};

use crate::response::ApiResponse;
use crate::routes::tickets::messages::common::{
    CreateMessageRequest, CreatedMessageResponse, NotificationResponse, service_error_response,
};
use crate::state::AppState;

/// POST /api/tickets/{ticket_id}/messages
///
/// Adds a message to a ticket thread. The content is sanitized before it is
/// stored and the message starts out active. A reply to an existing ticket
/// queues a notification mail; the outcome of that hand-off is reported but
/// never fails the request.
///
/// ### Request Body
/// ```json
/// { "content": "<p>Any news?</p>", "user_id": 3, "new_ticket": false }
/// ```
/// `user_id` is omitted for guest replies.
///
/// ### Responses
/// - `201 Created`
/// ```json
/// {
///   "success": true,
///   "data": {
///     "id": 12,
///     "content": "<p>Any news?</p>",
///     "is_own": true,
///     "username": "jdoe",
///     "status": "Active",
///     "media_count": 0,
///     "created_at": "05.03.24 14:07:09",
///     "notification": { "status": "queued", "job_id": "..." }
///   },
///   "message": "Message created successfully"
/// }
/// ```
/// - `422 Unprocessable Entity` with every field error in `data`
/// - `500 Internal Server Error`
pub async fn create_message(
    Path(ticket_id): Path<i64>,
    State(app_state): State<AppState>,
    Json(req): Json<CreateMessageRequest>,
) -> impl IntoResponse {
    let service = app_state.messages();

    let input = NewTicketMessage {
        ticket_id: Some(ticket_id),
        user_id: req.user_id,
        content: req.content,
        status: Some(MessageStatus::Active.code()),
        new_ticket: req.new_ticket,
        ..Default::default()
    };

    let saved = match service.save(input).await {
        Ok(saved) => saved,
        Err(err) => return service_error_response(err),
    };

    match service.view(&saved.message, &saved.ticket).await {
        Ok(view) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                CreatedMessageResponse {
                    message: view,
                    notification: NotificationResponse::from(&saved.notification),
                },
                "Message created successfully",
            )),
        )
            .into_response(),
        Err(err) => service_error_response(err),
    }
}
