//! # Check-In/Out API Handlers
//!
//! Service-visit endpoints: the visit document itself, the intake prefill
//! used by the wizard, the per-visit service-item list, and the fixed-slot
//! inspection photo record.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::access;
use crate::auth::CurrentUser;
use crate::error::{ApiError, not_found, validation_error};
use crate::lifecycle::{self, IntakePrefill, ServiceTotals};
use crate::models::check_in_out::{self, CheckStatus, CheckType, TirePressureReading};
use crate::models::inspection_media::{InspectionPhotos, MultiSlot, SingleSlot};
use crate::models::service_item;
use crate::models::user::UserRole;
use crate::repositories::check_in_out::{
    CheckInOutDetail, CreateCheckInOutRequest, ServiceItemInput, UpdateCheckInOutRequest,
};
use crate::repositories::{CheckInOutRepository, CustomerRepository, VehicleRepository};
use crate::server::AppState;
use crate::validation;

/// Visit read model without child collections.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckInOutSummary {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub customer_id: Uuid,
    pub date: NaiveDate,
    pub check_type: CheckType,
    pub status: CheckStatus,
    pub location: Option<String>,
    pub contact_name: Option<String>,
    pub checked_in_at: Option<DateTime<FixedOffset>>,
    pub checked_out_at: Option<DateTime<FixedOffset>>,
    pub fuel_level: Option<i32>,
    pub mileage: Option<i32>,
    pub tire_pressures: TirePressureReading,
    pub car_cover: bool,
    pub kill_switch: bool,
    pub startup_directions: Option<String>,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    /// Present when a signature was captured; omitted otherwise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<check_in_out::Model> for CheckInOutSummary {
    fn from(model: check_in_out::Model) -> Self {
        let tire_pressures = model.tire_pressures();
        Self {
            id: model.id,
            vehicle_id: model.vehicle_id,
            customer_id: model.customer_id,
            date: model.date,
            check_type: model.check_type,
            status: model.status,
            location: model.location,
            contact_name: model.contact_name,
            checked_in_at: model.checked_in_at,
            checked_out_at: model.checked_out_at,
            fuel_level: model.fuel_level,
            mileage: model.mileage,
            tire_pressures,
            car_cover: model.car_cover,
            kill_switch: model.kill_switch,
            startup_directions: model.startup_directions,
            delivery_address: model.delivery_address,
            notes: model.notes,
            signature: model.signature,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Service item read model.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceItemResponse {
    pub description: String,
    pub cost: Decimal,
    pub completed: bool,
    pub completed_at: Option<DateTime<FixedOffset>>,
    pub position: i32,
}

impl From<service_item::Model> for ServiceItemResponse {
    fn from(model: service_item::Model) -> Self {
        Self {
            description: model.description,
            cost: model.cost,
            completed: model.completed,
            completed_at: model.completed_at,
            position: model.position,
        }
    }
}

/// Full visit detail: record, ordered service items with totals, and the
/// inspection photo document.
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckInOutDetailResponse {
    #[serde(flatten)]
    pub record: CheckInOutSummary,
    pub service_items: Vec<ServiceItemResponse>,
    pub totals: ServiceTotals,
    pub photos: InspectionPhotos,
}

impl From<CheckInOutDetail> for CheckInOutDetailResponse {
    fn from(detail: CheckInOutDetail) -> Self {
        let totals = lifecycle::service_totals(&detail.service_items);
        Self {
            record: detail.record.into(),
            service_items: detail.service_items.into_iter().map(Into::into).collect(),
            totals,
            photos: detail.photos,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PrefillParams {
    /// Vehicle to prefill the intake form for
    pub vehicle_id: Uuid,
}

/// Either kind of photo slot. Single and multi slot names do not overlap,
/// so the untagged representation is unambiguous.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum PhotoSlot {
    Single(SingleSlot),
    Multi(MultiSlot),
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AttachPhotoRequest {
    pub slot: PhotoSlot,
    pub url: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RemovePhotoRequest {
    pub slot: PhotoSlot,
    /// Required for multi-valued slots, ignored for single-valued ones
    #[serde(default)]
    pub index: Option<usize>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetCompletedRequest {
    pub completed: bool,
}

/// List all check-in/outs, newest first
#[utoipa::path(
    get,
    path = "/api/v1/check-in-outs",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All visits", body = [CheckInOutSummary]),
        (status = 403, description = "Insufficient permissions", body = ApiError)
    ),
    tag = "check-in-outs"
)]
pub async fn list_check_in_outs(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<CheckInOutSummary>>, ApiError> {
    access::require(user.role, UserRole::Viewer)?;

    let repo = CheckInOutRepository::new(Arc::clone(&state.db));
    let records = repo.list().await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

/// Intake form prefill for a vehicle
///
/// Seeds the wizard's details step from the vehicle and its owner: preferred
/// tire pressures falling back to defaults, vehicle storage location falling
/// back to the owner's, and the owner as contact.
#[utoipa::path(
    get,
    path = "/api/v1/check-in-outs/prefill",
    security(("bearer_auth" = [])),
    params(PrefillParams),
    responses(
        (status = 200, description = "Prefill values", body = IntakePrefill),
        (status = 404, description = "Vehicle or owner not found", body = ApiError)
    ),
    tag = "check-in-outs"
)]
pub async fn prefill_check_in_out(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<PrefillParams>,
) -> Result<Json<IntakePrefill>, ApiError> {
    access::require(user.role, UserRole::Viewer)?;

    let vehicles = VehicleRepository::new(Arc::clone(&state.db));
    let vehicle = vehicles
        .get_by_id(params.vehicle_id)
        .await?
        .ok_or_else(|| not_found("Vehicle"))?;

    let customers = CustomerRepository::new(Arc::clone(&state.db));
    let owner = customers
        .get_by_id(vehicle.customer_id)
        .await?
        .ok_or_else(|| not_found("Customer"))?;

    Ok(Json(lifecycle::build_prefill(&vehicle, &owner)))
}

/// Get a visit with service items, totals, and photos
#[utoipa::path(
    get,
    path = "/api/v1/check-in-outs/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Check-in/out UUID")),
    responses(
        (status = 200, description = "Visit found", body = CheckInOutDetailResponse),
        (status = 404, description = "Visit not found", body = ApiError)
    ),
    tag = "check-in-outs"
)]
pub async fn get_check_in_out(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CheckInOutDetailResponse>, ApiError> {
    access::require(user.role, UserRole::Viewer)?;

    let repo = CheckInOutRepository::new(Arc::clone(&state.db));
    let detail = repo
        .get_detail(id)
        .await?
        .ok_or_else(|| not_found("Check-in/out"))?;
    Ok(Json(detail.into()))
}

/// Create a check-in/out record
#[utoipa::path(
    post,
    path = "/api/v1/check-in-outs",
    security(("bearer_auth" = [])),
    request_body = CreateCheckInOutRequest,
    responses(
        (status = 201, description = "Visit created", body = CheckInOutDetailResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Vehicle not found", body = ApiError)
    ),
    tag = "check-in-outs"
)]
pub async fn create_check_in_out(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateCheckInOutRequest>,
) -> Result<(StatusCode, Json<CheckInOutDetailResponse>), ApiError> {
    access::require(user.role, UserRole::Staff)?;

    let errors = validation::validate_check_in_out_create(&request);
    if !errors.is_empty() {
        return Err(validation_error(
            "Check-in/out validation failed",
            validation::to_details(&errors),
        ));
    }

    let vehicles = VehicleRepository::new(Arc::clone(&state.db));
    let vehicle = vehicles
        .get_by_id(request.vehicle_id)
        .await?
        .ok_or_else(|| not_found("Vehicle"))?;
    if vehicle.customer_id != request.customer_id {
        return Err(validation_error(
            "Check-in/out validation failed",
            serde_json::json!({ "customer_id": "Customer does not own this vehicle" }),
        ));
    }

    let repo = CheckInOutRepository::new(Arc::clone(&state.db));
    let detail = repo.create(request).await?;

    tracing::info!(check_in_out_id = %detail.record.id, "Check-in/out created");
    Ok((StatusCode::CREATED, Json(detail.into())))
}

/// Update a check-in/out record (partial merge)
#[utoipa::path(
    patch,
    path = "/api/v1/check-in-outs/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Check-in/out UUID")),
    request_body = UpdateCheckInOutRequest,
    responses(
        (status = 200, description = "Visit updated", body = CheckInOutSummary),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Visit not found", body = ApiError)
    ),
    tag = "check-in-outs"
)]
pub async fn update_check_in_out(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCheckInOutRequest>,
) -> Result<Json<CheckInOutSummary>, ApiError> {
    access::require(user.role, UserRole::Staff)?;

    let errors = validation::validate_check_in_out_update(&request);
    if !errors.is_empty() {
        return Err(validation_error(
            "Check-in/out validation failed",
            validation::to_details(&errors),
        ));
    }

    let repo = CheckInOutRepository::new(Arc::clone(&state.db));
    let record = repo.update(id, request).await?;
    Ok(Json(record.into()))
}

/// Delete a check-in/out record
#[utoipa::path(
    delete,
    path = "/api/v1/check-in-outs/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Check-in/out UUID")),
    responses(
        (status = 204, description = "Visit deleted"),
        (status = 403, description = "Insufficient permissions", body = ApiError),
        (status = 404, description = "Visit not found", body = ApiError)
    ),
    tag = "check-in-outs"
)]
pub async fn delete_check_in_out(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    access::require(user.role, UserRole::Manager)?;

    let repo = CheckInOutRepository::new(Arc::clone(&state.db));
    if repo.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Check-in/out"))
    }
}

/// List a visit's service items, in position order
#[utoipa::path(
    get,
    path = "/api/v1/check-in-outs/{id}/service-items",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Check-in/out UUID")),
    responses(
        (status = 200, description = "Service items", body = [ServiceItemResponse]),
        (status = 404, description = "Visit not found", body = ApiError)
    ),
    tag = "check-in-outs"
)]
pub async fn list_service_items(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ServiceItemResponse>>, ApiError> {
    access::require(user.role, UserRole::Viewer)?;

    let repo = CheckInOutRepository::new(Arc::clone(&state.db));
    if repo.get_by_id(id).await?.is_none() {
        return Err(not_found("Check-in/out"));
    }
    let items = repo.list_service_items(id).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

/// Append a service item to a visit
#[utoipa::path(
    post,
    path = "/api/v1/check-in-outs/{id}/service-items",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Check-in/out UUID")),
    request_body = ServiceItemInput,
    responses(
        (status = 201, description = "Service item added", body = ServiceItemResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Visit not found", body = ApiError)
    ),
    tag = "check-in-outs"
)]
pub async fn add_service_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(input): Json<ServiceItemInput>,
) -> Result<(StatusCode, Json<ServiceItemResponse>), ApiError> {
    access::require(user.role, UserRole::Staff)?;

    let mut errors = validation::FieldErrors::new();
    validation::validate_service_item(&mut errors, "", &input);
    if !errors.is_empty() {
        return Err(validation_error(
            "Service item validation failed",
            validation::to_details(&errors),
        ));
    }

    let repo = CheckInOutRepository::new(Arc::clone(&state.db));
    let item = repo.add_service_item(id, input).await?;
    Ok((StatusCode::CREATED, Json(item.into())))
}

/// Remove the service item at a position; later items shift down
#[utoipa::path(
    delete,
    path = "/api/v1/check-in-outs/{id}/service-items/{position}",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Check-in/out UUID"),
        ("position" = i32, Path, description = "Zero-based item position")
    ),
    responses(
        (status = 204, description = "Service item removed"),
        (status = 404, description = "Visit or item not found", body = ApiError)
    ),
    tag = "check-in-outs"
)]
pub async fn remove_service_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((id, position)): Path<(Uuid, i32)>,
) -> Result<StatusCode, ApiError> {
    access::require(user.role, UserRole::Staff)?;

    let repo = CheckInOutRepository::new(Arc::clone(&state.db));
    if repo.remove_service_item(id, position).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Service item"))
    }
}

/// Mark the service item at a position completed or pending
#[utoipa::path(
    patch,
    path = "/api/v1/check-in-outs/{id}/service-items/{position}",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Check-in/out UUID"),
        ("position" = i32, Path, description = "Zero-based item position")
    ),
    request_body = SetCompletedRequest,
    responses(
        (status = 200, description = "Service item updated", body = ServiceItemResponse),
        (status = 404, description = "Visit or item not found", body = ApiError)
    ),
    tag = "check-in-outs"
)]
pub async fn set_service_item_completed(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((id, position)): Path<(Uuid, i32)>,
    Json(request): Json<SetCompletedRequest>,
) -> Result<Json<ServiceItemResponse>, ApiError> {
    access::require(user.role, UserRole::Staff)?;

    let repo = CheckInOutRepository::new(Arc::clone(&state.db));
    let item = repo
        .set_service_item_completed(id, position, request.completed)
        .await?;
    Ok(Json(item.into()))
}

/// Get a visit's inspection photo document
#[utoipa::path(
    get,
    path = "/api/v1/check-in-outs/{id}/photos",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Check-in/out UUID")),
    responses(
        (status = 200, description = "Photo document", body = InspectionPhotos),
        (status = 404, description = "Visit not found", body = ApiError)
    ),
    tag = "check-in-outs"
)]
pub async fn get_photos(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<InspectionPhotos>, ApiError> {
    access::require(user.role, UserRole::Viewer)?;

    let repo = CheckInOutRepository::new(Arc::clone(&state.db));
    if repo.get_by_id(id).await?.is_none() {
        return Err(not_found("Check-in/out"));
    }
    let photos = repo.get_photos(id).await?.unwrap_or_default();
    Ok(Json(photos))
}

/// Replace a visit's inspection photo document wholesale
#[utoipa::path(
    put,
    path = "/api/v1/check-in-outs/{id}/photos",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Check-in/out UUID")),
    request_body = InspectionPhotos,
    responses(
        (status = 200, description = "Photo document replaced", body = InspectionPhotos),
        (status = 404, description = "Visit not found", body = ApiError)
    ),
    tag = "check-in-outs"
)]
pub async fn put_photos(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(photos): Json<InspectionPhotos>,
) -> Result<Json<InspectionPhotos>, ApiError> {
    access::require(user.role, UserRole::Staff)?;

    let repo = CheckInOutRepository::new(Arc::clone(&state.db));
    if repo.get_by_id(id).await?.is_none() {
        return Err(not_found("Check-in/out"));
    }
    repo.put_photos(id, &photos).await?;
    Ok(Json(photos))
}

/// Attach a photo reference to a slot
///
/// Single-valued slots replace any previous reference; multi-valued slots
/// append.
#[utoipa::path(
    post,
    path = "/api/v1/check-in-outs/{id}/photos/attach",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Check-in/out UUID")),
    request_body = AttachPhotoRequest,
    responses(
        (status = 200, description = "Photo attached", body = InspectionPhotos),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Visit not found", body = ApiError)
    ),
    tag = "check-in-outs"
)]
pub async fn attach_photo(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<AttachPhotoRequest>,
) -> Result<Json<InspectionPhotos>, ApiError> {
    access::require(user.role, UserRole::Staff)?;

    if request.url.trim().is_empty() {
        return Err(validation_error(
            "Photo validation failed",
            serde_json::json!({ "url": "Photo URL is required" }),
        ));
    }

    let repo = CheckInOutRepository::new(Arc::clone(&state.db));
    if repo.get_by_id(id).await?.is_none() {
        return Err(not_found("Check-in/out"));
    }

    let mut photos = repo.get_photos(id).await?.unwrap_or_default();
    match request.slot {
        PhotoSlot::Single(slot) => photos.attach_single(slot, request.url),
        PhotoSlot::Multi(slot) => photos.attach_multi(slot, request.url),
    }
    repo.put_photos(id, &photos).await?;
    Ok(Json(photos))
}

/// Remove a photo reference from a slot
///
/// Single-valued slots clear; multi-valued slots remove the entry at
/// `index`, preserving the order of the rest.
#[utoipa::path(
    post,
    path = "/api/v1/check-in-outs/{id}/photos/remove",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Check-in/out UUID")),
    request_body = RemovePhotoRequest,
    responses(
        (status = 200, description = "Photo removed", body = InspectionPhotos),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Visit or photo not found", body = ApiError)
    ),
    tag = "check-in-outs"
)]
pub async fn remove_photo(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<RemovePhotoRequest>,
) -> Result<Json<InspectionPhotos>, ApiError> {
    access::require(user.role, UserRole::Staff)?;

    let repo = CheckInOutRepository::new(Arc::clone(&state.db));
    if repo.get_by_id(id).await?.is_none() {
        return Err(not_found("Check-in/out"));
    }

    let mut photos = repo.get_photos(id).await?.unwrap_or_default();
    match request.slot {
        PhotoSlot::Single(slot) => photos.clear_single(slot),
        PhotoSlot::Multi(slot) => {
            let index = request.index.ok_or_else(|| {
                validation_error(
                    "Photo validation failed",
                    serde_json::json!({ "index": "Index is required for multi-valued slots" }),
                )
            })?;
            if !photos.remove_multi(slot, index) {
                return Err(not_found("Photo"));
            }
        }
    }
    repo.put_photos(id, &photos).await?;
    Ok(Json(photos))
}
