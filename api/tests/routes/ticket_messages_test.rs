use crate::helpers::make_test_app;
use axum::{
    Router,
    body::Body as AxumBody,
    http::{Request, StatusCode},
};
use db::models::{ticket_category::Model as CategoryModel, tickets::Model as TicketModel, user::Model as UserModel};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(match body {
            Some(body) => AxumBody::from(body.to_string()),
            None => AxumBody::empty(),
        })
        .unwrap();

    let response = router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

/// Test Case: Agent reply is stored, masked and queued for the ticket starter
#[tokio::test]
async fn test_post_agent_reply_queues_notification() {
    let mut app = make_test_app().await;
    let owner = UserModel::create(&app.db, "owner", "owner@example.com", false).await.unwrap();
    let agent = UserModel::create(&app.db, "Alice", "alice@x.com", true).await.unwrap();
    let ticket = TicketModel::create(&app.db, None, owner.id, "Printer on fire").await.unwrap();

    let uri = format!("/api/tickets/{}/messages", ticket.id);
    let (status, json) = send(
        &app.router,
        "POST",
        &uri,
        Some(json!({ "content": "<b>Hi</b><script>x()</script>", "user_id": agent.id })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["content"], "<b>Hi</b>");
    assert_eq!(json["data"]["is_own"], false);
    assert_eq!(json["data"]["username"], "Support Team");
    assert_eq!(json["data"]["status"], "Active");
    assert_eq!(json["data"]["notification"]["status"], "queued");

    let queued = app.mails.try_recv().unwrap();
    assert_eq!(queued.job.sender, "support@x.com");
    assert_eq!(queued.job.recipient, "owner@example.com");
    assert_eq!(json["data"]["notification"]["job_id"], queued.id.to_string());
}

/// Test Case: Owner reply on a categorised ticket goes to the category mailbox
#[tokio::test]
async fn test_post_owner_reply_uses_category_receiver() {
    let mut app = make_test_app().await;
    let owner = UserModel::create(&app.db, "owner", "owner@example.com", false).await.unwrap();
    let category = CategoryModel::create(&app.db, "Billing", Some("billing@x.com")).await.unwrap();
    let ticket = TicketModel::create(&app.db, Some(category.id), owner.id, "Refund").await.unwrap();

    let uri = format!("/api/tickets/{}/messages", ticket.id);
    let (status, json) = send(
        &app.router,
        "POST",
        &uri,
        Some(json!({ "content": "Any news?", "user_id": owner.id })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["is_own"], true);
    assert_eq!(json["data"]["username"], "owner");

    let queued = app.mails.try_recv().unwrap();
    assert_eq!(queued.job.sender, "billing@x.com");
    assert_eq!(queued.job.recipient, "billing@x.com");
}

/// Test Case: Opening message of a new ticket is stored without a notification
#[tokio::test]
async fn test_post_new_ticket_message_skips_notification() {
    let mut app = make_test_app().await;
    let owner = UserModel::create(&app.db, "owner", "owner@example.com", false).await.unwrap();
    let ticket = TicketModel::create(&app.db, None, owner.id, "Hello").await.unwrap();

    let uri = format!("/api/tickets/{}/messages", ticket.id);
    let (status, json) = send(
        &app.router,
        "POST",
        &uri,
        Some(json!({ "content": "First", "user_id": owner.id, "new_ticket": true })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["notification"]["status"], "skipped");
    assert!(app.mails.try_recv().is_err());
}

/// Test Case: Every violated constraint is returned at once
#[tokio::test]
async fn test_post_reports_all_field_errors() {
    let app = make_test_app().await;

    let (status, json) = send(
        &app.router,
        "POST",
        "/api/tickets/999/messages",
        Some(json!({ "content": "  ", "user_id": 42 })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Validation failed");

    let fields: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["content", "ticket_id", "user_id"]);
}

/// Test Case: Thread listing in creation order
#[tokio::test]
async fn test_get_thread() {
    let app = make_test_app().await;
    let guest_ticket = TicketModel::create_for_guest(&app.db, None, "Jane", "jane@example.com", "Login")
        .await
        .unwrap();
    let agent = UserModel::create(&app.db, "Alice", "alice@x.com", true).await.unwrap();

    let uri = format!("/api/tickets/{}/messages", guest_ticket.id);
    send(&app.router, "POST", &uri, Some(json!({ "content": "I cannot log in", "new_ticket": true }))).await;
    send(&app.router, "POST", &uri, Some(json!({ "content": "Reset sent", "user_id": agent.id }))).await;

    let (status, json) = send(&app.router, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["content"], "I cannot log in");
    assert_eq!(data[0]["is_own"], true);
    assert_eq!(data[0]["username"], "Jane (jane@example.com)");
    assert_eq!(data[1]["is_own"], false);
    assert_eq!(data[1]["username"], "Support Team");
}

/// Test Case: Unknown ticket
#[tokio::test]
async fn test_get_thread_of_missing_ticket() {
    let app = make_test_app().await;

    let (status, json) = send(&app.router, "GET", "/api/tickets/404/messages", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
}
