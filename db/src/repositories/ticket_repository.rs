use async_trait::async_trait;
use sea_orm::{DbErr, EntityTrait};

use crate::models::{ticket_category, tickets};

use super::SqlRepository;

#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn find_ticket(&self, id: i64) -> Result<Option<tickets::Model>, DbErr>;

    async fn find_category(&self, id: i64) -> Result<Option<ticket_category::Model>, DbErr>;
}

#[async_trait]
impl TicketRepository for SqlRepository {
    async fn find_ticket(&self, id: i64) -> Result<Option<tickets::Model>, DbErr> {
        tickets::Entity::find_by_id(id).one(self.db()).await
    }

    async fn find_category(&self, id: i64) -> Result<Option<ticket_category::Model>, DbErr> {
        ticket_category::Entity::find_by_id(id).one(self.db()).await
    }
}
