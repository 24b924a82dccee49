//! User repository for database operations
//!
//! Operator and customer-portal accounts. Password hashes are written here
//! and read back only for verification; API read models never carry them.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::user::{self, Entity as User, UserRole};

/// Payload for creating a user account. The initial password is generated
/// server-side and returned exactly once from the create endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
    /// Linked customer record for portal accounts
    #[serde(default)]
    pub customer_id: Option<Uuid>,
}

/// Partial update payload. Omitted fields keep their stored values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default)]
    pub customer_id: Option<Uuid>,
    #[serde(default)]
    pub active: Option<bool>,
}

/// Repository for user database operations
#[derive(Debug, Clone)]
pub struct UserRepository {
    pub db: Arc<DatabaseConnection>,
}

impl UserRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<user::Model>, RepositoryError> {
        let users = User::find()
            .order_by_asc(user::Column::Email)
            .all(&*self.db)
            .await?;
        Ok(users)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<user::Model>, RepositoryError> {
        let found = User::find_by_id(id).one(&*self.db).await?;
        Ok(found)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, RepositoryError> {
        let found = User::find()
            .filter(user::Column::Email.eq(email))
            .one(&*self.db)
            .await?;
        Ok(found)
    }

    pub async fn count(&self) -> Result<u64, RepositoryError> {
        let count = User::find().count(&*self.db).await?;
        Ok(count)
    }

    /// Create a user with the given (already hashed) credential.
    pub async fn create(
        &self,
        request: CreateUserRequest,
        password_hash: String,
    ) -> Result<user::Model, RepositoryError> {
        if self.find_by_email(&request.email).await?.is_some() {
            return Err(RepositoryError::validation_error(format!(
                "A user with email {} already exists",
                request.email
            )));
        }

        let now = Utc::now().fixed_offset();
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(request.first_name),
            last_name: Set(request.last_name),
            email: Set(request.email),
            password_hash: Set(password_hash),
            role: Set(request.role),
            customer_id: Set(request.customer_id),
            active: Set(true),
            last_login_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = model.insert(&*self.db).await?;
        metrics::counter!("motorvault_users_created_total").increment(1);
        Ok(created)
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateUserRequest,
    ) -> Result<user::Model, RepositoryError> {
        let existing = User::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("User {} not found", id)))?;

        let mut model: user::ActiveModel = existing.into();

        if let Some(first_name) = request.first_name {
            model.first_name = Set(first_name);
        }
        if let Some(last_name) = request.last_name {
            model.last_name = Set(last_name);
        }
        if let Some(email) = request.email {
            model.email = Set(email);
        }
        if let Some(role) = request.role {
            model.role = Set(role);
        }
        if let Some(customer_id) = request.customer_id {
            model.customer_id = Set(Some(customer_id));
        }
        if let Some(active) = request.active {
            model.active = Set(active);
        }
        model.updated_at = Set(Utc::now().fixed_offset());

        let updated = model.update(&*self.db).await?;
        Ok(updated)
    }

    /// Replace a user's credential hash.
    pub async fn set_password_hash(
        &self,
        id: Uuid,
        password_hash: String,
    ) -> Result<(), RepositoryError> {
        let existing = User::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("User {} not found", id)))?;

        let mut model: user::ActiveModel = existing.into();
        model.password_hash = Set(password_hash);
        model.updated_at = Set(Utc::now().fixed_offset());
        model.update(&*self.db).await?;
        Ok(())
    }

    pub async fn touch_last_login(&self, id: Uuid) -> Result<(), RepositoryError> {
        let existing = User::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("User {} not found", id)))?;

        let mut model: user::ActiveModel = existing.into();
        model.last_login_at = Set(Some(Utc::now().fixed_offset()));
        model.update(&*self.db).await?;
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let result = User::delete_by_id(id).exec(&*self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
