//! # Authentication
//!
//! Operator bearer authentication plus acting-user resolution for protected
//! API endpoints. The bearer token proves the request comes from a trusted
//! front end; the `X-User-Id` header names the staff member (or customer
//! account) acting, and their stored role drives the per-route access checks
//! in [`crate::access`].

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::{ApiError, unauthorized, validation_error};
use crate::models::user::UserRole;
use crate::repositories::UserRepository;
use crate::server::AppState;

/// The authenticated acting user, resolved from `X-User-Id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub role: UserRole,
    /// Linked customer record, for customer-portal accounts
    pub customer_id: Option<Uuid>,
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        Arc::clone(&app_state.config)
    }
}

/// Authentication middleware: validates the bearer token, then resolves the
/// acting user from the `X-User-Id` header.
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let headers = request.headers().clone();

    let token = extract_bearer_token(&headers)?;
    validate_token(&state.config, token)?;

    let user_id = extract_user_id(&headers)?;
    let users = UserRepository::new(Arc::clone(&state.db));
    let user = users
        .get_by_id(user_id)
        .await?
        .ok_or_else(|| unauthorized(Some("Unknown user")))?;
    if !user.active {
        return Err(unauthorized(Some("User account is deactivated")));
    }

    tracing::debug!(user_id = %user.id, role = ?user.role, "Authenticated request");

    let mut request = request;
    request.extensions_mut().insert(CurrentUser {
        id: user.id,
        role: user.role,
        customer_id: user.customer_id,
    });

    Ok(next.run(request).await)
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(AUTHORIZATION)
        .ok_or_else(|| unauthorized(Some("Missing Authorization header")))
        .and_then(|value| {
            value
                .to_str()
                .map_err(|_| unauthorized(Some("Invalid Authorization header")))
        })
        .and_then(|header| {
            header
                .strip_prefix("Bearer ")
                .ok_or_else(|| unauthorized(Some("Authorization header must use Bearer scheme")))
        })
}

fn validate_token(config: &AppConfig, token: &str) -> Result<(), ApiError> {
    let is_valid = config
        .operator_tokens
        .iter()
        .any(|configured| ConstantTimeEq::ct_eq(token.as_bytes(), configured.as_bytes()).into());

    if is_valid {
        Ok(())
    } else {
        Err(unauthorized(Some("Invalid bearer token")))
    }
}

fn extract_user_id(headers: &HeaderMap) -> Result<Uuid, ApiError> {
    let header_value = headers
        .get("X-User-Id")
        .ok_or_else(|| {
            validation_error(
                "Missing required header",
                serde_json::json!({ "X-User-Id": "Required header is missing" }),
            )
        })?
        .to_str()
        .map_err(|_| {
            validation_error(
                "Invalid user header",
                serde_json::json!({ "X-User-Id": "Header must be valid UTF-8" }),
            )
        })?;

    header_value.parse::<Uuid>().map_err(|_| {
        validation_error(
            "Invalid user ID",
            serde_json::json!({ "X-User-Id": "Must be a valid UUID" }),
        )
    })
}

/// OpenAPI header parameter for X-User-Id
#[derive(Debug, Serialize, Deserialize, IntoParams, utoipa::ToSchema)]
#[into_params(parameter_in = Header)]
pub struct UserHeader {
    /// Acting user identifier (UUID) whose role gates the request
    #[serde(rename = "X-User-Id")]
    #[param(rename = "X-User-Id", value_type = String)]
    pub user_id: String,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    Arc<AppConfig>: FromRef<S>,
    S: Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| unauthorized(Some("Authentication required")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;
    use tower::ServiceExt;

    use crate::models::user::{self, UserRole};
    use crate::seeds;

    fn test_config() -> Arc<AppConfig> {
        Arc::new(AppConfig {
            operator_tokens: vec!["test-token-123".to_string()],
            bcrypt_cost: 4,
            seed_fixtures: false,
            ..Default::default()
        })
    }

    async fn test_state(config: Arc<AppConfig>) -> AppState {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        AppState {
            config,
            db: Arc::new(db),
        }
    }

    async fn seed_user(state: &AppState, role: UserRole, active: bool) -> user::Model {
        seeds::insert_user(
            &state.db,
            "Test",
            "User",
            &format!("{}@example.com", Uuid::new_v4()),
            role,
            None,
            "hash",
            active,
        )
        .await
        .unwrap()
    }

    async fn run_middleware(state: AppState, request: Request<Body>) -> Response {
        async fn handler() -> &'static str {
            "OK"
        }

        Router::new()
            .route("/test", get(handler))
            .layer(axum::middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            ))
            .with_state(state)
            .oneshot(request)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn missing_auth_header_returns_401() {
        let state = test_state(test_config()).await;
        let user = seed_user(&state, UserRole::Staff, true).await;

        let request = Request::builder()
            .uri("/test")
            .header("X-User-Id", user.id.to_string())
            .body(Body::empty())
            .unwrap();

        let response = run_middleware(state, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn invalid_auth_scheme_returns_401() {
        let state = test_state(test_config()).await;
        let user = seed_user(&state, UserRole::Staff, true).await;

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", "Basic dGVzdDoxMjM=")
            .header("X-User-Id", user.id.to_string())
            .body(Body::empty())
            .unwrap();

        let response = run_middleware(state, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn invalid_token_returns_401() {
        let state = test_state(test_config()).await;
        let user = seed_user(&state, UserRole::Staff, true).await;

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", "Bearer wrong-token")
            .header("X-User-Id", user.id.to_string())
            .body(Body::empty())
            .unwrap();

        let response = run_middleware(state, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn missing_user_header_returns_400() {
        let state = test_state(test_config()).await;

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", "Bearer test-token-123")
            .body(Body::empty())
            .unwrap();

        let response = run_middleware(state, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn invalid_user_uuid_returns_400() {
        let state = test_state(test_config()).await;

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", "Bearer test-token-123")
            .header("X-User-Id", "not-a-uuid")
            .body(Body::empty())
            .unwrap();

        let response = run_middleware(state, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_user_returns_401() {
        let state = test_state(test_config()).await;

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", "Bearer test-token-123")
            .header("X-User-Id", Uuid::new_v4().to_string())
            .body(Body::empty())
            .unwrap();

        let response = run_middleware(state, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn deactivated_user_returns_401() {
        let state = test_state(test_config()).await;
        let user = seed_user(&state, UserRole::Staff, false).await;

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", "Bearer test-token-123")
            .header("X-User-Id", user.id.to_string())
            .body(Body::empty())
            .unwrap();

        let response = run_middleware(state, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_request_passes_through() {
        let state = test_state(test_config()).await;
        let user = seed_user(&state, UserRole::Staff, true).await;

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", "Bearer test-token-123")
            .header("X-User-Id", user.id.to_string())
            .body(Body::empty())
            .unwrap();

        let response = run_middleware(state, request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn multiple_tokens_supported() {
        let config = Arc::new(AppConfig {
            operator_tokens: vec![
                "token-one".to_string(),
                "token-two".to_string(),
                "token-three".to_string(),
            ],
            ..Default::default()
        });
        let state = test_state(config).await;
        let user = seed_user(&state, UserRole::Staff, true).await;

        for candidate in ["token-one", "token-two", "token-three"] {
            let request = Request::builder()
                .uri("/test")
                .header("Authorization", format!("Bearer {}", candidate))
                .header("X-User-Id", user.id.to_string())
                .body(Body::empty())
                .unwrap();

            let response = run_middleware(state.clone(), request).await;
            assert_eq!(response.status(), StatusCode::OK);
        }
    }
}
