//! # User API Handlers
//!
//! Account management, Admin-only. Credentials are generated server-side:
//! the initial password comes back exactly once from create, and a reset
//! issues a fresh random password returned exactly once. Stored hashes never
//! appear in any response.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::access;
use crate::auth::CurrentUser;
use crate::error::{ApiError, not_found, validation_error};
use crate::models::user::{self, UserRole};
use crate::passwords;
use crate::repositories::UserRepository;
use crate::repositories::user::{CreateUserRequest, UpdateUserRequest};
use crate::server::AppState;
use crate::validation;

/// User read model. The credential hash is deliberately absent.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
    pub customer_id: Option<Uuid>,
    pub active: bool,
    pub last_login_at: Option<DateTime<FixedOffset>>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            role: model.role,
            customer_id: model.customer_id,
            active: model.active,
            last_login_at: model.last_login_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Create response carrying the generated password, returned only here.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserCreatedResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub initial_password: String,
}

/// Reset response carrying the replacement password, returned only here.
#[derive(Debug, Serialize, ToSchema)]
pub struct PasswordResetResponse {
    pub user_id: Uuid,
    pub new_password: String,
}

/// List all users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All users", body = [UserResponse]),
        (status = 403, description = "Insufficient permissions", body = ApiError)
    ),
    tag = "users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    access::require(user.role, UserRole::Admin)?;

    let repo = UserRepository::new(Arc::clone(&state.db));
    let users = repo.list().await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User UUID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found", body = ApiError)
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    access::require(user.role, UserRole::Admin)?;

    let repo = UserRepository::new(Arc::clone(&state.db));
    let found = repo.get_by_id(id).await?.ok_or_else(|| not_found("User"))?;
    Ok(Json(found.into()))
}

/// Create a user account
///
/// The initial password is derived from the new user's name and returned in
/// the response body. It is not retrievable afterwards.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserCreatedResponse),
        (status = 400, description = "Validation failed or email taken", body = ApiError)
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserCreatedResponse>), ApiError> {
    access::require(user.role, UserRole::Admin)?;

    let errors = validation::validate_user_create(&request);
    if !errors.is_empty() {
        return Err(validation_error(
            "User validation failed",
            validation::to_details(&errors),
        ));
    }

    let initial_password = passwords::generate_initial(&request.first_name, &request.last_name);
    let password_hash = passwords::hash(&initial_password, state.config.bcrypt_cost)
        .map_err(anyhow::Error::from)?;

    let repo = UserRepository::new(Arc::clone(&state.db));
    let created = repo.create(request, password_hash).await?;

    tracing::info!(user_id = %created.id, "User created");
    Ok((
        StatusCode::CREATED,
        Json(UserCreatedResponse {
            user: created.into(),
            initial_password,
        }),
    ))
}

/// Update a user (partial merge)
#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User UUID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "User not found", body = ApiError)
    ),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    access::require(user.role, UserRole::Admin)?;

    let errors = validation::validate_user_update(&request);
    if !errors.is_empty() {
        return Err(validation_error(
            "User validation failed",
            validation::to_details(&errors),
        ));
    }

    let repo = UserRepository::new(Arc::clone(&state.db));
    let updated = repo.update(id, request).await?;
    Ok(Json(updated.into()))
}

/// Delete a user account
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User UUID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Cannot delete own account", body = ApiError),
        (status = 404, description = "User not found", body = ApiError)
    ),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    access::require(user.role, UserRole::Admin)?;

    if user.id == id {
        return Err(validation_error(
            "Cannot delete the account you are signed in as",
            serde_json::json!({ "id": "Self-deletion is not allowed" }),
        ));
    }

    let repo = UserRepository::new(Arc::clone(&state.db));
    if repo.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("User"))
    }
}

/// Reset a user's password
///
/// Replaces the stored credential with a fresh random password and returns
/// it in the response body, exactly once.
#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/reset-password",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User UUID")),
    responses(
        (status = 200, description = "Password reset", body = PasswordResetResponse),
        (status = 404, description = "User not found", body = ApiError)
    ),
    tag = "users"
)]
pub async fn reset_password(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PasswordResetResponse>, ApiError> {
    access::require(user.role, UserRole::Admin)?;

    let repo = UserRepository::new(Arc::clone(&state.db));
    if repo.get_by_id(id).await?.is_none() {
        return Err(not_found("User"));
    }

    let new_password = passwords::generate_random(16);
    let hash = passwords::hash(&new_password, state.config.bcrypt_cost)
        .map_err(anyhow::Error::from)?;
    repo.set_password_hash(id, hash).await?;

    tracing::info!(user_id = %id, "Password reset");
    Ok(Json(PasswordResetResponse {
        user_id: id,
        new_password,
    }))
}
