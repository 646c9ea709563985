use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use services::error::ServiceError;
use services::ticket_message_service::{MessageView, NotificationOutcome};

use crate::response::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    #[serde(default)]
    pub content: String,
    pub user_id: Option<i64>,
    #[serde(default)]
    pub new_ticket: bool,
}

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<&NotificationOutcome> for NotificationResponse {
    fn from(outcome: &NotificationOutcome) -> Self {
        match outcome {
            NotificationOutcome::Queued(id) => Self {
                status: "queued",
                job_id: Some(id.to_string()),
                reason: None,
            },
            NotificationOutcome::Skipped(reason) => Self {
                status: "skipped",
                job_id: None,
                reason: Some((*reason).to_owned()),
            },
            NotificationOutcome::Failed(reason) => Self {
                status: "failed",
                job_id: None,
                reason: Some(reason.clone()),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedMessageResponse {
    #[serde(flatten)]
    pub message: MessageView,
    pub notification: NotificationResponse,
}

/// Maps a service failure onto the response envelope.
pub fn service_error_response(err: ServiceError) -> Response {
    match err {
        ServiceError::Validation(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::error_with(errors, "Validation failed")),
        )
            .into_response(),
        ServiceError::NotFound(what) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error(format!("{what} not found"))),
        )
            .into_response(),
        ServiceError::Database(err) => {
            tracing::error!(error = %err, "Database error while handling ticket message");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Internal server error")),
            )
                .into_response()
        }
    }
}
