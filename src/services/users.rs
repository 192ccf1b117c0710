//! Account storage: registration, lookup and login bookkeeping.

use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, SqlErr,
};
use std::sync::Arc;
use tracing::info;

use crate::entities::user::{self, Entity as User};
use crate::errors::ServiceError;

/// Role assigned to every self-registered account (Employee). Other roles
/// exist in `user_types` but are only granted out of band.
pub const DEFAULT_USER_TYPE_ID: i16 = 1;

/// Syntactic username rule: 3 to 30 characters, ASCII letters, digits,
/// underscore or hyphen.
pub fn is_valid_username(username: &str) -> bool {
    (3..=30).contains(&username.len())
        && username
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

#[derive(Clone)]
pub struct UserService {
    db: Arc<DatabaseConnection>,
}

impl UserService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Case-sensitive lookup by username.
    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<user::Model>, ServiceError> {
        let found = User::find()
            .filter(user::Column::Username.eq(username))
            .one(&*self.db)
            .await?;
        Ok(found)
    }

    /// Creates an account with the default role.
    ///
    /// Uniqueness is ultimately enforced by the database constraint; the
    /// pre-check only gives a friendlier fast path. A concurrent insert that
    /// slips between the check and the insert still comes back as a conflict,
    /// never as an internal error.
    pub async fn register(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<user::Model, ServiceError> {
        if self.find_by_username(username).await?.is_some() {
            return Err(ServiceError::Conflict(
                "Username already exists".to_string(),
            ));
        }

        let model = user::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(password_hash.to_string()),
            user_type_id: Set(DEFAULT_USER_TYPE_ID),
            last_login_at: Set(None),
            created_at: Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        };

        let created = model.insert(&*self.db).await.map_err(|e| {
            match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    ServiceError::Conflict("Username already exists".to_string())
                }
                _ => ServiceError::DatabaseError(e),
            }
        })?;

        info!(user_id = created.id, username, "registered new user");
        Ok(created)
    }

    /// Stamps `last_login_at` after a successful credential check.
    pub async fn record_login(
        &self,
        user_id: i32,
        at: NaiveDateTime,
    ) -> Result<(), ServiceError> {
        let model = user::ActiveModel {
            id: Set(user_id),
            last_login_at: Set(Some(at)),
            ..Default::default()
        };
        model.update(&*self.db).await?;
        Ok(())
    }
}
