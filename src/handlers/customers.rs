//! # Customer API Handlers
//!
//! CRUD endpoints for customer records. Creation derives the storage
//! location and monthly price when not supplied, hashes a generated portal
//! password, and returns that password exactly once — the stored hash never
//! appears in any response.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::access;
use crate::auth::CurrentUser;
use crate::error::{ApiError, not_found, validation_error};
use crate::handlers::vehicles::VehicleResponse;
use crate::models::customer::{self, CustomerType, MembershipLevel};
use crate::models::user::UserRole;
use crate::passwords;
use crate::repositories::customer::{CreateCustomerRequest, UpdateCustomerRequest};
use crate::repositories::{CustomerRepository, VehicleRepository};
use crate::server::AppState;
use crate::validation;

/// Customer read model. Never carries the credential hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub customer_type: CustomerType,
    pub membership_level: MembershipLevel,
    pub email: String,
    pub phone: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub storage_location: String,
    pub storage_spots: i32,
    pub storage_rows: Option<i32>,
    pub monthly_price: Option<Decimal>,
    /// Whether a portal credential exists for this customer
    pub has_portal_credential: bool,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<customer::Model> for CustomerResponse {
    fn from(model: customer::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            customer_type: model.customer_type,
            membership_level: model.membership_level,
            email: model.email,
            phone: model.phone,
            street: model.street,
            city: model.city,
            state: model.state,
            zip: model.zip,
            storage_location: model.storage_location,
            storage_spots: model.storage_spots,
            storage_rows: model.storage_rows,
            monthly_price: model.monthly_price,
            has_portal_credential: model.password_hash.is_some(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Create response: the customer plus the generated portal password,
/// surfaced here and nowhere else.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomerCreatedResponse {
    #[serde(flatten)]
    pub customer: CustomerResponse,
    /// Generated initial portal password; shown only in this response
    pub initial_password: String,
}

/// List all customers
#[utoipa::path(
    get,
    path = "/api/v1/customers",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All customers", body = [CustomerResponse]),
        (status = 401, description = "Missing or invalid credentials", body = ApiError),
        (status = 403, description = "Insufficient permissions", body = ApiError)
    ),
    tag = "customers"
)]
pub async fn list_customers(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<CustomerResponse>>, ApiError> {
    access::require(user.role, UserRole::Viewer)?;

    let repo = CustomerRepository::new(Arc::clone(&state.db));
    let customers = repo.list().await?;
    Ok(Json(customers.into_iter().map(Into::into).collect()))
}

/// Get a customer by ID
#[utoipa::path(
    get,
    path = "/api/v1/customers/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Customer UUID")),
    responses(
        (status = 200, description = "Customer found", body = CustomerResponse),
        (status = 404, description = "Customer not found", body = ApiError)
    ),
    tag = "customers"
)]
pub async fn get_customer(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CustomerResponse>, ApiError> {
    access::require(user.role, UserRole::Viewer)?;

    let repo = CustomerRepository::new(Arc::clone(&state.db));
    let customer = repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| not_found("Customer"))?;
    Ok(Json(customer.into()))
}

/// List a customer's vehicles
#[utoipa::path(
    get,
    path = "/api/v1/customers/{id}/vehicles",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Customer UUID")),
    responses(
        (status = 200, description = "Customer's vehicles", body = [VehicleResponse]),
        (status = 404, description = "Customer not found", body = ApiError)
    ),
    tag = "customers"
)]
pub async fn list_customer_vehicles(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<VehicleResponse>>, ApiError> {
    access::require(user.role, UserRole::Viewer)?;

    let customers = CustomerRepository::new(Arc::clone(&state.db));
    if customers.get_by_id(id).await?.is_none() {
        return Err(not_found("Customer"));
    }

    let vehicles = VehicleRepository::new(Arc::clone(&state.db));
    let list = vehicles.list_by_customer(id).await?;
    Ok(Json(list.into_iter().map(Into::into).collect()))
}

/// Create a customer
#[utoipa::path(
    post,
    path = "/api/v1/customers",
    security(("bearer_auth" = [])),
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = CustomerCreatedResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 403, description = "Insufficient permissions", body = ApiError)
    ),
    tag = "customers"
)]
pub async fn create_customer(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerCreatedResponse>), ApiError> {
    access::require(user.role, UserRole::Staff)?;

    let errors = validation::validate_customer_create(&request);
    if !errors.is_empty() {
        return Err(validation_error(
            "Customer validation failed",
            validation::to_details(&errors),
        ));
    }

    let initial_password =
        passwords::generate_initial(&request.first_name, &request.last_name);
    let hash = passwords::hash(&initial_password, state.config.bcrypt_cost)
        .map_err(|err| anyhow::Error::from(err))?;

    let repo = CustomerRepository::new(Arc::clone(&state.db));
    let customer = repo.create(request, Some(hash)).await?;

    tracing::info!(customer_id = %customer.id, "Customer created");

    Ok((
        StatusCode::CREATED,
        Json(CustomerCreatedResponse {
            customer: customer.into(),
            initial_password,
        }),
    ))
}

/// Update a customer (partial merge)
#[utoipa::path(
    patch,
    path = "/api/v1/customers/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Customer UUID")),
    request_body = UpdateCustomerRequest,
    responses(
        (status = 200, description = "Customer updated", body = CustomerResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Customer not found", body = ApiError)
    ),
    tag = "customers"
)]
pub async fn update_customer(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCustomerRequest>,
) -> Result<Json<CustomerResponse>, ApiError> {
    access::require(user.role, UserRole::Staff)?;

    let errors = validation::validate_customer_update(&request);
    if !errors.is_empty() {
        return Err(validation_error(
            "Customer validation failed",
            validation::to_details(&errors),
        ));
    }

    let repo = CustomerRepository::new(Arc::clone(&state.db));
    let customer = repo.update(id, request).await?;
    Ok(Json(customer.into()))
}

/// Delete a customer (refused while vehicles reference it)
#[utoipa::path(
    delete,
    path = "/api/v1/customers/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Customer UUID")),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 400, description = "Customer still has vehicles", body = ApiError),
        (status = 403, description = "Insufficient permissions", body = ApiError),
        (status = 404, description = "Customer not found", body = ApiError)
    ),
    tag = "customers"
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    access::require(user.role, UserRole::Manager)?;

    let repo = CustomerRepository::new(Arc::clone(&state.db));
    if repo.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Customer"))
    }
}
