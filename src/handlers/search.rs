//! # Global Search Handler
//!
//! Single endpoint backing the top-bar search box. Matching lives in
//! [`crate::search`]; this layer loads the candidate rows and shapes the
//! capped, grouped response.

use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::access;
use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::handlers::customers::CustomerResponse;
use crate::handlers::vehicles::VehicleResponse;
use crate::models::user::UserRole;
use crate::repositories::{CustomerRepository, VehicleRepository};
use crate::search;
use crate::server::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Free-text query; blank matches nothing
    #[serde(default)]
    pub q: String,
}

/// Grouped search results, capped per entity.
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    pub customers: Vec<CustomerResponse>,
    pub vehicles: Vec<VehicleResponse>,
}

/// Search customers and vehicles
///
/// Case-insensitive substring match over names, contact fields, and vehicle
/// identity fields. Customers cap at 3 results, vehicles at 20.
#[utoipa::path(
    get,
    path = "/api/v1/search",
    security(("bearer_auth" = [])),
    params(SearchParams),
    responses(
        (status = 200, description = "Grouped results", body = SearchResponse),
        (status = 403, description = "Insufficient permissions", body = ApiError)
    ),
    tag = "search"
)]
pub async fn search(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    access::require(user.role, UserRole::Viewer)?;

    let customers = CustomerRepository::new(Arc::clone(&state.db))
        .list()
        .await?;
    let vehicles = VehicleRepository::new(Arc::clone(&state.db)).list().await?;

    let matched_customers = search::search_customers(&customers, &params.q)
        .into_iter()
        .cloned()
        .map(Into::into)
        .collect();
    let matched_vehicles = search::search_vehicles(&vehicles, &params.q)
        .into_iter()
        .cloned()
        .map(Into::into)
        .collect();

    Ok(Json(SearchResponse {
        customers: matched_customers,
        vehicles: matched_vehicles,
    }))
}
