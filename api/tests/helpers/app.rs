use api::routes::routes;
use api::state::AppState;
use axum::Router;
use db::test_utils::setup_test_db;
use sea_orm::DatabaseConnection;
use services::mail_queue::{QueuedMail, mail_queue};
use services::settings::SupportSettings;
use std::sync::Arc;
use tokio::sync::mpsc::Receiver;

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    /// Receiving end of the mail queue, standing in for the mail worker.
    pub mails: Receiver<QueuedMail>,
}

pub fn test_settings() -> SupportSettings {
    SupportSettings {
        notify_by_email: true,
        show_username_support: false,
        username_support: "Support Team".into(),
        support_email: "support@x.com".into(),
        user_display_field: "username".into(),
    }
}

pub async fn make_test_app() -> TestApp {
    let db = setup_test_db().await;
    let (queue, mails) = mail_queue(16);
    let state = AppState::new(db.clone(), Arc::new(queue), test_settings());

    TestApp {
        router: Router::new().nest("/api", routes(state)),
        db,
        mails,
    }
}
