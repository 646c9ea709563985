use async_trait::async_trait;
use sea_orm::{DbErr, EntityTrait};

use crate::models::user;

use super::SqlRepository;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user(&self, id: i64) -> Result<Option<user::Model>, DbErr>;
}

#[async_trait]
impl UserRepository for SqlRepository {
    async fn find_user(&self, id: i64) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find_by_id(id).one(self.db()).await
    }
}
