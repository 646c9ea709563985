use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Represents a user in the `users` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Primary key ID (auto-incremented).
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique login name.
    pub username: String,
    /// User's unique email address.
    pub email: String,
    /// Whether the user is a support agent with admin privileges.
    pub admin: bool,
    /// Timestamp when the user was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp when the user was last updated.
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DbConn,
        username: &str,
        email: &str,
        admin: bool,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();
        let active = ActiveModel {
            username: Set(username.to_owned()),
            email: Set(email.to_owned()),
            admin: Set(admin),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        active.insert(db).await
    }

    /// Value of the column used as the author name.
    ///
    /// Unknown field names fall back to `username`.
    pub fn display_value(&self, field: &str) -> &str {
        match field {
            "email" => &self.email,
            _ => &self.username,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Model as UserModel;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_display_value_follows_configured_field() {
        let db = setup_test_db().await;
        let user = UserModel::create(&db, "alice", "alice@example.com", false)
            .await
            .unwrap();

        assert_eq!(user.display_value("username"), "alice");
        assert_eq!(user.display_value("email"), "alice@example.com");
        assert_eq!(user.display_value("nickname"), "alice");
    }
}
