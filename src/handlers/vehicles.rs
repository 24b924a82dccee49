//! # Vehicle API Handlers
//!
//! CRUD endpoints for vehicles and their authorized driver/contact lists.
//! Read models carry the derived display fields (fuel band, registration
//! status) so clients never re-implement those rules.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::access;
use crate::auth::CurrentUser;
use crate::error::{ApiError, not_found, validation_error};
use crate::models::user::UserRole;
use crate::models::vehicle::{self, BatteryType, FuelBand};
use crate::models::{authorized_contact, authorized_driver};
use crate::repositories::vehicle::{CreateVehicleRequest, UpdateVehicleRequest, VehicleDetail};
use crate::repositories::{CheckInOutRepository, CustomerRepository, VehicleRepository};
use crate::server::AppState;
use crate::validation;

use super::check_in_outs::CheckInOutSummary;

/// Vehicle read model with derived display fields.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VehicleResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub year: i32,
    pub make: String,
    pub model: String,
    pub vin: Option<String>,
    pub license_plate: Option<String>,
    pub color: Option<String>,
    pub market_value: Option<Decimal>,
    pub odometer: i32,
    pub fuel_level: i32,
    /// Derived fuel band for gauge display
    pub fuel_band: FuelBand,
    pub battery_type: BatteryType,
    pub storage_location: Option<String>,
    pub insurance_required: bool,
    pub insurance_amount: Option<Decimal>,
    pub registration_state: Option<String>,
    pub registration_expires: Option<NaiveDate>,
    /// Derived: expiry date strictly before today
    pub registration_expired: bool,
    pub default_front_psi: Option<i32>,
    pub default_rear_psi: Option<i32>,
    pub preferred_front_psi: Option<i32>,
    pub preferred_rear_psi: Option<i32>,
    pub last_service_date: Option<NaiveDate>,
    pub next_service_date: Option<NaiveDate>,
    pub service_interval_months: Option<i32>,
    pub maintenance_notes: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<vehicle::Model> for VehicleResponse {
    fn from(model: vehicle::Model) -> Self {
        let fuel_band = model.fuel_band();
        let registration_expired = model.registration_expired(Utc::now().date_naive());
        Self {
            id: model.id,
            customer_id: model.customer_id,
            year: model.year,
            make: model.make,
            model: model.model,
            vin: model.vin,
            license_plate: model.license_plate,
            color: model.color,
            market_value: model.market_value,
            odometer: model.odometer,
            fuel_level: model.fuel_level,
            fuel_band,
            battery_type: model.battery_type,
            storage_location: model.storage_location,
            insurance_required: model.insurance_required,
            insurance_amount: model.insurance_amount,
            registration_state: model.registration_state,
            registration_expires: model.registration_expires,
            registration_expired,
            default_front_psi: model.default_front_psi,
            default_rear_psi: model.default_rear_psi,
            preferred_front_psi: model.preferred_front_psi,
            preferred_rear_psi: model.preferred_rear_psi,
            last_service_date: model.last_service_date,
            next_service_date: model.next_service_date,
            service_interval_months: model.service_interval_months,
            maintenance_notes: model.maintenance_notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Authorized driver read model.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthorizedDriverResponse {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub license_number: Option<String>,
    pub relationship: Option<String>,
    pub position: i32,
}

impl From<authorized_driver::Model> for AuthorizedDriverResponse {
    fn from(model: authorized_driver::Model) -> Self {
        Self {
            name: model.name,
            phone: model.phone,
            email: model.email,
            license_number: model.license_number,
            relationship: model.relationship,
            position: model.position,
        }
    }
}

/// Authorized contact read model.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthorizedContactResponse {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub can_drop_off: bool,
    pub can_pick_up: bool,
    pub position: i32,
}

impl From<authorized_contact::Model> for AuthorizedContactResponse {
    fn from(model: authorized_contact::Model) -> Self {
        Self {
            name: model.name,
            phone: model.phone,
            email: model.email,
            can_drop_off: model.can_drop_off,
            can_pick_up: model.can_pick_up,
            position: model.position,
        }
    }
}

/// Full vehicle detail with ordered driver and contact lists.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VehicleDetailResponse {
    #[serde(flatten)]
    pub vehicle: VehicleResponse,
    pub drivers: Vec<AuthorizedDriverResponse>,
    pub contacts: Vec<AuthorizedContactResponse>,
}

impl From<VehicleDetail> for VehicleDetailResponse {
    fn from(detail: VehicleDetail) -> Self {
        Self {
            vehicle: detail.vehicle.into(),
            drivers: detail.drivers.into_iter().map(Into::into).collect(),
            contacts: detail.contacts.into_iter().map(Into::into).collect(),
        }
    }
}

/// List all vehicles
#[utoipa::path(
    get,
    path = "/api/v1/vehicles",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All vehicles", body = [VehicleResponse]),
        (status = 403, description = "Insufficient permissions", body = ApiError)
    ),
    tag = "vehicles"
)]
pub async fn list_vehicles(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<VehicleResponse>>, ApiError> {
    access::require(user.role, UserRole::Viewer)?;

    let repo = VehicleRepository::new(Arc::clone(&state.db));
    let vehicles = repo.list().await?;
    Ok(Json(vehicles.into_iter().map(Into::into).collect()))
}

/// Get a vehicle with its drivers and contacts
#[utoipa::path(
    get,
    path = "/api/v1/vehicles/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Vehicle UUID")),
    responses(
        (status = 200, description = "Vehicle found", body = VehicleDetailResponse),
        (status = 404, description = "Vehicle not found", body = ApiError)
    ),
    tag = "vehicles"
)]
pub async fn get_vehicle(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<VehicleDetailResponse>, ApiError> {
    access::require(user.role, UserRole::Viewer)?;

    let repo = VehicleRepository::new(Arc::clone(&state.db));
    let detail = repo
        .get_detail(id)
        .await?
        .ok_or_else(|| not_found("Vehicle"))?;
    Ok(Json(detail.into()))
}

/// List a vehicle's check-in/out history, newest first
#[utoipa::path(
    get,
    path = "/api/v1/vehicles/{id}/check-in-outs",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Vehicle UUID")),
    responses(
        (status = 200, description = "Visit history", body = [CheckInOutSummary]),
        (status = 404, description = "Vehicle not found", body = ApiError)
    ),
    tag = "vehicles"
)]
pub async fn list_vehicle_check_in_outs(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CheckInOutSummary>>, ApiError> {
    access::require(user.role, UserRole::Viewer)?;

    let vehicles = VehicleRepository::new(Arc::clone(&state.db));
    if vehicles.get_by_id(id).await?.is_none() {
        return Err(not_found("Vehicle"));
    }

    let visits = CheckInOutRepository::new(Arc::clone(&state.db));
    let records = visits.list_by_vehicle(id).await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

/// Create a vehicle with its authorized drivers and contacts
#[utoipa::path(
    post,
    path = "/api/v1/vehicles",
    security(("bearer_auth" = [])),
    request_body = CreateVehicleRequest,
    responses(
        (status = 201, description = "Vehicle created", body = VehicleDetailResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Owner not found", body = ApiError)
    ),
    tag = "vehicles"
)]
pub async fn create_vehicle(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<VehicleDetailResponse>), ApiError> {
    access::require(user.role, UserRole::Staff)?;

    let errors = validation::validate_vehicle_create(&request, current_year());
    if !errors.is_empty() {
        return Err(validation_error(
            "Vehicle validation failed",
            validation::to_details(&errors),
        ));
    }

    let customers = CustomerRepository::new(Arc::clone(&state.db));
    if customers.get_by_id(request.customer_id).await?.is_none() {
        return Err(not_found("Customer"));
    }

    let repo = VehicleRepository::new(Arc::clone(&state.db));
    let detail = repo.create(request).await?;

    tracing::info!(vehicle_id = %detail.vehicle.id, "Vehicle created");
    Ok((StatusCode::CREATED, Json(detail.into())))
}

/// Update a vehicle (partial merge; provided child lists replace)
#[utoipa::path(
    patch,
    path = "/api/v1/vehicles/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Vehicle UUID")),
    request_body = UpdateVehicleRequest,
    responses(
        (status = 200, description = "Vehicle updated", body = VehicleDetailResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Vehicle not found", body = ApiError)
    ),
    tag = "vehicles"
)]
pub async fn update_vehicle(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateVehicleRequest>,
) -> Result<Json<VehicleDetailResponse>, ApiError> {
    access::require(user.role, UserRole::Staff)?;

    let errors = validation::validate_vehicle_update(&request, current_year());
    if !errors.is_empty() {
        return Err(validation_error(
            "Vehicle validation failed",
            validation::to_details(&errors),
        ));
    }

    let repo = VehicleRepository::new(Arc::clone(&state.db));
    let detail = repo.update(id, request).await?;
    Ok(Json(detail.into()))
}

/// Delete a vehicle and its dependent records
#[utoipa::path(
    delete,
    path = "/api/v1/vehicles/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Vehicle UUID")),
    responses(
        (status = 204, description = "Vehicle deleted"),
        (status = 403, description = "Insufficient permissions", body = ApiError),
        (status = 404, description = "Vehicle not found", body = ApiError)
    ),
    tag = "vehicles"
)]
pub async fn delete_vehicle(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    access::require(user.role, UserRole::Manager)?;

    let repo = VehicleRepository::new(Arc::clone(&state.db));
    if repo.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Vehicle"))
    }
}

fn current_year() -> i32 {
    use chrono::Datelike;
    Utc::now().year()
}
