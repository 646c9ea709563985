use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, PaginatorTrait};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "ticket_attachments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// The message this file was attached to.
    pub content_id: i64,

    pub file_name: String,
    pub path: String,
    pub size: i64,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ticket_messages::Entity",
        from = "Column::ContentId",
        to = "super::ticket_messages::Column::Id",
        on_delete = "Cascade"
    )]
    Message,
}

impl Related<super::ticket_messages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Message.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DbConn,
        content_id: i64,
        file_name: &str,
        path: &str,
        size: i64,
    ) -> Result<Model, DbErr> {
        let active = ActiveModel {
            content_id: Set(content_id),
            file_name: Set(file_name.to_owned()),
            path: Set(path.to_owned()),
            size: Set(size),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        active.insert(db).await
    }

    pub async fn count_for_message(db: &DbConn, message_id: i64) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::ContentId.eq(message_id))
            .count(db)
            .await
    }
}
