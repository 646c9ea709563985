use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DbErr, EntityTrait};

use crate::models::ticket_messages::{ActiveModel, Entity, Model};

use super::SqlRepository;

#[async_trait]
pub trait TicketMessageRepository: Send + Sync {
    async fn insert(&self, message: ActiveModel) -> Result<Model, DbErr>;

    async fn find_message(&self, id: i64) -> Result<Option<Model>, DbErr>;

    /// Messages of a ticket, oldest first.
    async fn find_for_ticket(&self, ticket_id: i64) -> Result<Vec<Model>, DbErr>;
}

#[async_trait]
impl TicketMessageRepository for SqlRepository {
    async fn insert(&self, message: ActiveModel) -> Result<Model, DbErr> {
        message.insert(self.db()).await
    }

    async fn find_message(&self, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(self.db()).await
    }

    async fn find_for_ticket(&self, ticket_id: i64) -> Result<Vec<Model>, DbErr> {
        Model::find_all_for_ticket(self.db(), ticket_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ticket_attachments::Model as AttachmentModel;
    use crate::models::ticket_messages::new_active_model;
    use crate::models::tickets::Model as TicketModel;
    use crate::models::user::Model as UserModel;
    use crate::repositories::{AttachmentRepository, TicketRepository, UserRepository};
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_sql_repository_lookups() {
        let db = setup_test_db().await;
        let repo = SqlRepository::new(db.clone());

        let owner = UserModel::create(&db, "owner", "owner@example.com", false).await.unwrap();
        let ticket = TicketModel::create(&db, None, owner.id, "Refund").await.unwrap();

        let message = repo
            .insert(new_active_model(ticket.id, Some(owner.id), "hello".into(), None))
            .await
            .unwrap();
        AttachmentModel::create(&db, message.id, "a.png", "files/a.png", 12).await.unwrap();
        AttachmentModel::create(&db, message.id, "b.png", "files/b.png", 34).await.unwrap();

        assert_eq!(repo.find_message(message.id).await.unwrap(), Some(message.clone()));
        assert_eq!(repo.find_for_ticket(ticket.id).await.unwrap().len(), 1);
        assert_eq!(repo.count_for_message(message.id).await.unwrap(), 2);
        assert_eq!(repo.count_for_message(message.id + 1).await.unwrap(), 0);
        assert!(repo.find_ticket(ticket.id).await.unwrap().is_some());
        assert!(repo.find_ticket(ticket.id + 100).await.unwrap().is_none());
        assert!(repo.find_user(owner.id).await.unwrap().is_some());
        assert!(repo.find_category(1).await.unwrap().is_none());
    }
}
