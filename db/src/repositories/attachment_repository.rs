use async_trait::async_trait;
use sea_orm::DbErr;

use crate::models::ticket_attachments;

use super::SqlRepository;

#[async_trait]
pub trait AttachmentRepository: Send + Sync {
    /// Number of attachments whose `content_id` is `message_id`.
    async fn count_for_message(&self, message_id: i64) -> Result<u64, DbErr>;
}

#[async_trait]
impl AttachmentRepository for SqlRepository {
    async fn count_for_message(&self, message_id: i64) -> Result<u64, DbErr> {
        ticket_attachments::Model::count_for_message(self.db(), message_id).await
    }
}
