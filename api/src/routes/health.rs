use crate::response::ApiResponse;
use crate::state::AppState;
use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use serde::Serialize;

/// Builds the `/health` route group.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub database: &'static str,
}

/// GET /health
///
/// Reports whether the API is running and the database answers.
///
/// ### Responses
/// - `200 OK`
///
/// ```json
/// {
///   "success": true,
///   "data": { "database": "up" },
///   "message": "Health check passed"
/// }
/// ```
///
/// - `503 Service Unavailable` when the database does not respond
async fn health_check(State(app_state): State<AppState>) -> impl IntoResponse {
    match app_state.db().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                HealthResponse { database: "up" },
                "Health check passed",
            )),
        ),
        Err(err) => {
            tracing::error!(error = %err, "Database ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::error_with(
                    HealthResponse { database: "down" },
                    "Database unavailable",
                )),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::health_check;
    use crate::state::AppState;
    use axum::body::to_bytes;
    use axum::extract::State;
    use axum::response::IntoResponse;
    use db::test_utils::setup_test_db;
    use serde_json::Value;
    use services::mail_queue::mail_queue;
    use services::settings::SupportSettings;
    use std::sync::Arc;

    #[tokio::test]
    async fn health_check_reports_database_up() {
        let (queue, _rx) = mail_queue(1);
        let state = AppState::new(setup_test_db().await, Arc::new(queue), SupportSettings::default());

        let response = health_check(State(state)).await.into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["database"], "up");
        assert_eq!(json["message"], "Health check passed");
    }
}
