//! # Server Configuration
//!
//! Router assembly and startup for the MotorVault API. Everything under
//! `/api/v1` sits behind the bearer-token middleware; the root info page,
//! health check, and Swagger UI stay open.

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::auth;
use crate::config::AppConfig;
use crate::handlers;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Arc<DatabaseConnection>,
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/customers",
            get(handlers::customers::list_customers).post(handlers::customers::create_customer),
        )
        .route(
            "/customers/{id}",
            get(handlers::customers::get_customer)
                .patch(handlers::customers::update_customer)
                .delete(handlers::customers::delete_customer),
        )
        .route(
            "/customers/{id}/vehicles",
            get(handlers::customers::list_customer_vehicles),
        )
        .route(
            "/vehicles",
            get(handlers::vehicles::list_vehicles).post(handlers::vehicles::create_vehicle),
        )
        .route(
            "/vehicles/{id}",
            get(handlers::vehicles::get_vehicle)
                .patch(handlers::vehicles::update_vehicle)
                .delete(handlers::vehicles::delete_vehicle),
        )
        .route(
            "/vehicles/{id}/check-in-outs",
            get(handlers::vehicles::list_vehicle_check_in_outs),
        )
        .route(
            "/check-in-outs",
            get(handlers::check_in_outs::list_check_in_outs)
                .post(handlers::check_in_outs::create_check_in_out),
        )
        .route(
            "/check-in-outs/prefill",
            get(handlers::check_in_outs::prefill_check_in_out),
        )
        .route(
            "/check-in-outs/{id}",
            get(handlers::check_in_outs::get_check_in_out)
                .patch(handlers::check_in_outs::update_check_in_out)
                .delete(handlers::check_in_outs::delete_check_in_out),
        )
        .route(
            "/check-in-outs/{id}/service-items",
            get(handlers::check_in_outs::list_service_items)
                .post(handlers::check_in_outs::add_service_item),
        )
        .route(
            "/check-in-outs/{id}/service-items/{position}",
            axum::routing::patch(handlers::check_in_outs::set_service_item_completed)
                .delete(handlers::check_in_outs::remove_service_item),
        )
        .route(
            "/check-in-outs/{id}/photos",
            get(handlers::check_in_outs::get_photos).put(handlers::check_in_outs::put_photos),
        )
        .route(
            "/check-in-outs/{id}/photos/attach",
            post(handlers::check_in_outs::attach_photo),
        )
        .route(
            "/check-in-outs/{id}/photos/remove",
            post(handlers::check_in_outs::remove_photo),
        )
        .route(
            "/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/users/{id}",
            get(handlers::users::get_user)
                .patch(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        .route(
            "/users/{id}/reset-password",
            post(handlers::users::reset_password),
        )
        .route("/search", get(handlers::search::search))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .nest("/api/v1", api)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Starts the server with the given configuration
pub async fn run_server(
    config: AppConfig,
    db: DatabaseConnection,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config
        .bind_addr()
        .map_err(|e| format!("Invalid server address: {}", e))?;

    let state = AppState {
        config: Arc::new(config),
        db: Arc::new(db),
    };
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz,
        crate::handlers::customers::list_customers,
        crate::handlers::customers::get_customer,
        crate::handlers::customers::list_customer_vehicles,
        crate::handlers::customers::create_customer,
        crate::handlers::customers::update_customer,
        crate::handlers::customers::delete_customer,
        crate::handlers::vehicles::list_vehicles,
        crate::handlers::vehicles::get_vehicle,
        crate::handlers::vehicles::list_vehicle_check_in_outs,
        crate::handlers::vehicles::create_vehicle,
        crate::handlers::vehicles::update_vehicle,
        crate::handlers::vehicles::delete_vehicle,
        crate::handlers::check_in_outs::list_check_in_outs,
        crate::handlers::check_in_outs::prefill_check_in_out,
        crate::handlers::check_in_outs::get_check_in_out,
        crate::handlers::check_in_outs::create_check_in_out,
        crate::handlers::check_in_outs::update_check_in_out,
        crate::handlers::check_in_outs::delete_check_in_out,
        crate::handlers::check_in_outs::list_service_items,
        crate::handlers::check_in_outs::add_service_item,
        crate::handlers::check_in_outs::remove_service_item,
        crate::handlers::check_in_outs::set_service_item_completed,
        crate::handlers::check_in_outs::get_photos,
        crate::handlers::check_in_outs::put_photos,
        crate::handlers::check_in_outs::attach_photo,
        crate::handlers::check_in_outs::remove_photo,
        crate::handlers::users::list_users,
        crate::handlers::users::get_user,
        crate::handlers::users::create_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,
        crate::handlers::users::reset_password,
        crate::handlers::search::search,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::error::ApiError,
            crate::models::customer::CustomerType,
            crate::models::customer::MembershipLevel,
            crate::models::vehicle::BatteryType,
            crate::models::vehicle::FuelBand,
            crate::models::check_in_out::CheckType,
            crate::models::check_in_out::CheckStatus,
            crate::models::check_in_out::TirePressureReading,
            crate::models::inspection_media::InspectionPhotos,
            crate::models::inspection_media::SingleSlot,
            crate::models::inspection_media::MultiSlot,
            crate::models::user::UserRole,
            crate::lifecycle::IntakePrefill,
            crate::lifecycle::ServiceTotals,
            crate::repositories::customer::CreateCustomerRequest,
            crate::repositories::customer::UpdateCustomerRequest,
            crate::repositories::vehicle::AuthorizedDriverInput,
            crate::repositories::vehicle::AuthorizedContactInput,
            crate::repositories::vehicle::CreateVehicleRequest,
            crate::repositories::vehicle::UpdateVehicleRequest,
            crate::repositories::check_in_out::ServiceItemInput,
            crate::repositories::check_in_out::CreateCheckInOutRequest,
            crate::repositories::check_in_out::UpdateCheckInOutRequest,
            crate::repositories::user::CreateUserRequest,
            crate::repositories::user::UpdateUserRequest,
            crate::handlers::customers::CustomerResponse,
            crate::handlers::customers::CustomerCreatedResponse,
            crate::handlers::vehicles::VehicleResponse,
            crate::handlers::vehicles::AuthorizedDriverResponse,
            crate::handlers::vehicles::AuthorizedContactResponse,
            crate::handlers::vehicles::VehicleDetailResponse,
            crate::handlers::check_in_outs::CheckInOutSummary,
            crate::handlers::check_in_outs::ServiceItemResponse,
            crate::handlers::check_in_outs::CheckInOutDetailResponse,
            crate::handlers::check_in_outs::PhotoSlot,
            crate::handlers::check_in_outs::AttachPhotoRequest,
            crate::handlers::check_in_outs::RemovePhotoRequest,
            crate::handlers::check_in_outs::SetCompletedRequest,
            crate::handlers::users::UserResponse,
            crate::handlers::users::UserCreatedResponse,
            crate::handlers::users::PasswordResetResponse,
            crate::handlers::search::SearchResponse,
        )
    ),
    modifiers(&SecurityAddon),
    info(
        title = "MotorVault API",
        description = "Vehicle storage and service management API",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
