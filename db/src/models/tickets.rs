use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::DeriveActiveEnum;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tickets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub category_id: Option<i64>,
    /// The user who opened the ticket. Guests have no account and are
    /// identified by `user_name` / `user_email` instead.
    pub user_id: Option<i64>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,

    pub title: String,

    pub status: TicketStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, PartialEq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "ticket_status")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TicketStatus {
    #[sea_orm(string_value = "open")]
    Open,

    #[sea_orm(string_value = "closed")]
    Closed,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ticket_category::Entity",
        from = "Column::CategoryId",
        to = "super::ticket_category::Column::Id"
    )]
    Category,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,

    #[sea_orm(has_many = "super::ticket_messages::Entity")]
    Messages,
}

impl Related<super::ticket_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::ticket_messages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Messages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Opens a ticket on behalf of a registered user.
    pub async fn create(
        db: &DbConn,
        category_id: Option<i64>,
        user_id: i64,
        title: &str,
    ) -> Result<Model, DbErr> {
        Self::insert_new(db, category_id, Some(user_id), None, None, title).await
    }

    /// Opens a ticket for a guest who only left a name and an address.
    pub async fn create_for_guest(
        db: &DbConn,
        category_id: Option<i64>,
        name: &str,
        email: &str,
        title: &str,
    ) -> Result<Model, DbErr> {
        Self::insert_new(db, category_id, None, Some(name), Some(email), title).await
    }

    async fn insert_new(
        db: &DbConn,
        category_id: Option<i64>,
        user_id: Option<i64>,
        user_name: Option<&str>,
        user_email: Option<&str>,
        title: &str,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();

        let active_model = ActiveModel {
            category_id: Set(category_id),
            user_id: Set(user_id),
            user_name: Set(user_name.map(str::to_owned)),
            user_email: Set(user_email.map(str::to_owned)),
            title: Set(title.to_owned()),
            status: Set(TicketStatus::Open),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        active_model.insert(db).await
    }

    /// Guest identity stored on the ticket, e.g. `Jane (jane@example.com)`.
    pub fn name_email(&self) -> String {
        let name = non_blank(self.user_name.as_deref());
        let email = non_blank(self.user_email.as_deref());
        match (name, email) {
            (Some(name), Some(email)) => format!("{name} ({email})"),
            (Some(name), None) => name.to_owned(),
            (None, Some(email)) => email.to_owned(),
            (None, None) => String::new(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_guest_ticket_name_email() {
        let db = setup_test_db().await;
        let ticket = Model::create_for_guest(&db, None, "Jane", "jane@example.com", "Printer on fire")
            .await
            .unwrap();

        assert_eq!(ticket.user_id, None);
        assert_eq!(ticket.status, TicketStatus::Open);
        assert_eq!(ticket.name_email(), "Jane (jane@example.com)");
    }

    #[test]
    fn test_name_email_with_partial_identity() {
        let now = Utc::now();
        let mut ticket = Model {
            id: 1,
            category_id: None,
            user_id: None,
            user_name: Some("  ".into()),
            user_email: Some("guest@example.com".into()),
            title: "Help".into(),
            status: TicketStatus::Open,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(ticket.name_email(), "guest@example.com");

        ticket.user_email = None;
        assert_eq!(ticket.name_email(), "");
    }
}
