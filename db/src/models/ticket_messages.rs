use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, QueryOrder};
use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "ticket_messages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub ticket_id: i64,
    /// Author of the message; `None` for guests posting on their own ticket.
    pub user_id: Option<i64>,

    pub content: String,

    /// Set when the message was imported from a mailbox.
    pub mail_id: Option<String>,
    pub info: Option<String>,
    pub fetch_date: Option<DateTime<Utc>>,

    pub status: Option<i32>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum MessageStatus {
    Active = 10,
    Inactive = 20,
}

impl MessageStatus {
    pub const ALL: [MessageStatus; 2] = [MessageStatus::Active, MessageStatus::Inactive];

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    pub fn label(self) -> &'static str {
        match self {
            MessageStatus::Active => "Active",
            MessageStatus::Inactive => "Inactive",
        }
    }
}

/// Human readable label of a raw status column value.
pub fn status_label(status: Option<i32>) -> &'static str {
    status
        .and_then(MessageStatus::from_code)
        .map(MessageStatus::label)
        .unwrap_or("Unknown")
}

/// Selectable statuses in display order, without the ones in `exclude`.
pub fn status_options(exclude: &[MessageStatus]) -> Vec<(MessageStatus, &'static str)> {
    MessageStatus::ALL
        .into_iter()
        .filter(|s| !exclude.contains(s))
        .map(|s| (s, s.label()))
        .collect()
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tickets::Entity",
        from = "Column::TicketId",
        to = "super::tickets::Column::Id"
    )]
    Ticket,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,

    #[sea_orm(has_many = "super::ticket_attachments::Entity")]
    Attachments,
}

impl Related<super::tickets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ticket.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::ticket_attachments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attachments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn status_text(&self) -> &'static str {
        status_label(self.status)
    }

    /// Whether this message was written by the person who opened `ticket`.
    pub fn is_own(&self, ticket: &super::tickets::Model) -> bool {
        self.user_id == ticket.user_id
    }

    pub async fn find_all_for_ticket(
        db: &DbConn,
        ticket_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::TicketId.eq(ticket_id))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }
}

/// Active model for a fresh message with both timestamps set to now.
pub fn new_active_model(
    ticket_id: i64,
    user_id: Option<i64>,
    content: String,
    status: Option<i32>,
) -> ActiveModel {
    let now = Utc::now();
    ActiveModel {
        ticket_id: Set(ticket_id),
        user_id: Set(user_id),
        content: Set(content),
        status: Set(status),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}
