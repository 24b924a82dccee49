//! Test utilities for database and server testing.
//!
//! Provides in-memory SQLite setup with migrations applied, plus helpers for
//! seeding accounts and starting a fully wired server on a random port.

use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use uuid::Uuid;

use motorvault::config::AppConfig;
use motorvault::models::user::{self, UserRole};
use motorvault::seeds;
use motorvault::server::{AppState, create_app};

/// Bearer token accepted by test servers.
#[allow(dead_code)]
pub const TEST_TOKEN: &str = "test-operator-token";

/// Sets up an in-memory SQLite database with all migrations applied.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// Arc-wrapped variant for repository construction.
#[allow(dead_code)]
pub async fn setup_test_db_arc() -> Result<Arc<DatabaseConnection>> {
    let db = setup_test_db().await?;
    Ok(Arc::new(db))
}

/// Configuration a test server runs with: known bearer token, low bcrypt
/// cost so account creation stays fast, no fixture seeding.
pub fn test_config() -> AppConfig {
    AppConfig {
        operator_tokens: vec![TEST_TOKEN.to_string()],
        seed_fixtures: false,
        bcrypt_cost: 4,
        ..AppConfig::default()
    }
}

/// Inserts an active account with the given role and returns its id.
#[allow(dead_code)]
pub async fn seed_account(
    db: &DatabaseConnection,
    email: &str,
    role: UserRole,
) -> Result<user::Model> {
    let account = seeds::insert_user(
        db,
        "Test",
        "Account",
        email,
        role,
        None,
        "$2b$04$placeholderplaceholderplaceh",
        true,
    )
    .await?;
    Ok(account)
}

/// Starts a fully wired server over a fresh in-memory database. Returns the
/// base URL and the database handle for direct seeding.
#[allow(dead_code)]
pub async fn start_test_server() -> Result<(String, Arc<DatabaseConnection>)> {
    let db = Arc::new(setup_test_db().await?);

    let state = AppState {
        config: Arc::new(test_config()),
        db: Arc::clone(&db),
    };
    let app = create_app(state);

    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Ok((format!("http://{}", addr), db))
}

/// One account of each staff-facing role, seeded into a server's database.
#[allow(dead_code)]
pub struct RoleSet {
    pub admin: Uuid,
    pub manager: Uuid,
    pub staff: Uuid,
    pub viewer: Uuid,
}

#[allow(dead_code)]
pub async fn seed_roles(db: &DatabaseConnection) -> Result<RoleSet> {
    let admin = seed_account(db, "admin@test.local", UserRole::Admin).await?;
    let manager = seed_account(db, "manager@test.local", UserRole::Manager).await?;
    let staff = seed_account(db, "staff@test.local", UserRole::Staff).await?;
    let viewer = seed_account(db, "viewer@test.local", UserRole::Viewer).await?;
    Ok(RoleSet {
        admin: admin.id,
        manager: manager.id,
        staff: staff.id,
        viewer: viewer.id,
    })
}
