use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ticket_categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub receiver: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tickets::Entity")]
    Tickets,
}

impl Related<super::tickets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tickets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(db: &DbConn, title: &str, receiver: Option<&str>) -> Result<Model, DbErr> {
        let active = ActiveModel {
            title: Set(title.to_owned()),
            receiver: Set(receiver.map(str::to_owned)),
            ..Default::default()
        };

        active.insert(db).await
    }

    /// The category mailbox, if one is configured and non-blank.
    pub fn receiver_address(&self) -> Option<&str> {
        self.receiver
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }
}
