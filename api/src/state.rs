//! Application state shared across Axum route handlers.

use std::sync::Arc;

use db::repositories::SqlRepository;
use sea_orm::DatabaseConnection;
use services::mail_queue::MailQueue;
use services::sanitizer::AmmoniaSanitizer;
use services::settings::SupportSettings;
use services::ticket_message_service::{Stores, TicketMessageService};

/// Central application state shared across the server.
///
/// Holds the database connection and the ticket message service wired to the
/// SQL stores and the mail queue.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    messages: TicketMessageService,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        queue: Arc<dyn MailQueue>,
        settings: SupportSettings,
    ) -> Self {
        let messages = TicketMessageService::new(
            Stores::sql(SqlRepository::new(db.clone())),
            Arc::new(AmmoniaSanitizer),
            queue,
            settings,
        );
        Self { db, messages }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn messages(&self) -> &TicketMessageService {
        &self.messages
    }
}
