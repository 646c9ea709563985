//! Storage seams used by the service layer.
//!
//! Each concern gets its own trait so callers depend only on the lookups they
//! need. `SqlRepository` is the relational implementation of all of them and
//! works with any backend sea-orm can connect to.

pub mod attachment_repository;
pub mod ticket_message_repository;
pub mod ticket_repository;
pub mod user_repository;

pub use attachment_repository::AttachmentRepository;
pub use ticket_message_repository::TicketMessageRepository;
pub use ticket_repository::TicketRepository;
pub use user_repository::UserRepository;

use sea_orm::DatabaseConnection;

#[derive(Clone)]
pub struct SqlRepository {
    db: DatabaseConnection,
}

impl SqlRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
