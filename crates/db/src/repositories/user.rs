//! User repository for database operations.

use chrono::Utc;
use fintrack_shared::types::UserId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, Set,
};

use super::error::RepositoryError;
use crate::entities::users;

/// Input for creating a user. The email must already be normalized.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Display name.
    pub name: String,
    /// Lowercased email.
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// ISO currency code.
    pub currency: String,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, RepositoryError> {
        Ok(users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await?)
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::UserNotFound` if no such user exists.
    pub async fn find_by_id(&self, id: UserId) -> Result<users::Model, RepositoryError> {
        users::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(RepositoryError::UserNotFound(id))
    }

    /// Checks if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::EmailTaken` if the email is registered.
    pub async fn create(&self, input: CreateUserInput) -> Result<users::Model, RepositoryError> {
        if self.email_exists(&input.email).await? {
            return Err(RepositoryError::EmailTaken);
        }

        let now = Utc::now().into();
        let user = users::ActiveModel {
            id: Set(UserId::new().into_inner()),
            name: Set(input.name),
            email: Set(input.email),
            password_hash: Set(input.password_hash),
            currency: Set(input.currency),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(user.insert(&self.db).await?)
    }

    /// Updates name and/or currency.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::UserNotFound` if no such user exists.
    pub async fn update_profile(
        &self,
        id: UserId,
        name: Option<String>,
        currency: Option<String>,
    ) -> Result<users::Model, RepositoryError> {
        let mut user = self.find_by_id(id).await?.into_active_model();

        if let Some(name) = name {
            user.name = Set(name);
        }
        if let Some(currency) = currency {
            user.currency = Set(currency);
        }
        user.updated_at = Set(Utc::now().into());

        Ok(user.update(&self.db).await?)
    }

    /// Replaces the stored password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::UserNotFound` if no such user exists.
    pub async fn update_password(
        &self,
        id: UserId,
        password_hash: String,
    ) -> Result<(), RepositoryError> {
        let mut user = self.find_by_id(id).await?.into_active_model();
        user.password_hash = Set(password_hash);
        user.updated_at = Set(Utc::now().into());
        user.update(&self.db).await?;
        Ok(())
    }
}
