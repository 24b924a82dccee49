//! Startup fixtures
//!
//! The bootstrap admin is created whenever the users table is empty, with a
//! random password written to the log exactly once. Demo data (customers,
//! vehicles with drivers, one open check-in) is seeded only when
//! `MOTORVAULT_SEED_FIXTURES` is on and the customers table is empty, which
//! makes the local SQLite profile usable straight away.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::models::check_in_out::{CheckType, TirePressureReading};
use crate::models::customer::{CustomerType, MembershipLevel};
use crate::models::user::{self, UserRole};
use crate::models::vehicle::BatteryType;
use crate::passwords;
use crate::repositories::check_in_out::{CreateCheckInOutRequest, ServiceItemInput};
use crate::repositories::customer::CreateCustomerRequest;
use crate::repositories::vehicle::{
    AuthorizedContactInput, AuthorizedDriverInput, CreateVehicleRequest,
};
use crate::repositories::{CheckInOutRepository, CustomerRepository, UserRepository, VehicleRepository};

const BOOTSTRAP_ADMIN_EMAIL: &str = "admin@motorvault.local";

/// Seed the database if its tables are empty.
pub async fn seed_if_empty(db: &Arc<DatabaseConnection>, config: &AppConfig) -> Result<()> {
    seed_bootstrap_admin(db, config).await?;

    if config.seed_fixtures {
        seed_demo_data(db, config).await?;
    }

    Ok(())
}

/// Create the bootstrap admin when no users exist. The generated password is
/// logged once and never stored in plaintext.
async fn seed_bootstrap_admin(db: &Arc<DatabaseConnection>, config: &AppConfig) -> Result<()> {
    let users = UserRepository::new(Arc::clone(db));
    if users.count().await? > 0 {
        return Ok(());
    }

    let password = passwords::generate_random(16);
    let hash = passwords::hash(&password, config.bcrypt_cost)?;

    let admin = insert_user(
        db,
        "Bootstrap",
        "Admin",
        BOOTSTRAP_ADMIN_EMAIL,
        UserRole::Admin,
        None,
        &hash,
        true,
    )
    .await?;

    tracing::warn!(
        user_id = %admin.id,
        email = BOOTSTRAP_ADMIN_EMAIL,
        password = %password,
        "Bootstrap admin created; change this password after first login"
    );

    Ok(())
}

async fn seed_demo_data(db: &Arc<DatabaseConnection>, config: &AppConfig) -> Result<()> {
    let customers = CustomerRepository::new(Arc::clone(db));
    if customers.count().await? > 0 {
        return Ok(());
    }

    tracing::info!("Seeding demo customers and vehicles");

    let vehicles = VehicleRepository::new(Arc::clone(db));
    let visits = CheckInOutRepository::new(Arc::clone(db));

    let ana = customers
        .create(
            CreateCustomerRequest {
                first_name: "Ana".to_string(),
                last_name: "Lee".to_string(),
                customer_type: CustomerType::Individual,
                membership_level: MembershipLevel::Premium,
                email: "ana.lee@example.com".to_string(),
                phone: Some("805-555-0101".to_string()),
                street: Some("12 Harbor View".to_string()),
                city: Some("Santa Barbara".to_string()),
                state: Some("CA".to_string()),
                zip: Some("93101".to_string()),
                storage_location: None,
                storage_spots: 2,
                storage_rows: None,
                manual_price: None,
            },
            Some(passwords::hash(
                &passwords::generate_initial("Ana", "Lee"),
                config.bcrypt_cost,
            )?),
        )
        .await?;

    let mercer = customers
        .create(
            CreateCustomerRequest {
                first_name: "Grant".to_string(),
                last_name: "Mercer".to_string(),
                customer_type: CustomerType::Business,
                membership_level: MembershipLevel::Enterprise,
                email: "fleet@mercerclassics.example.com".to_string(),
                phone: Some("805-555-0188".to_string()),
                street: None,
                city: Some("Goleta".to_string()),
                state: Some("CA".to_string()),
                zip: None,
                storage_location: None,
                storage_spots: 4,
                storage_rows: Some(2),
                manual_price: Some(Decimal::new(110000, 2)),
            },
            None,
        )
        .await?;

    let camaro = vehicles
        .create(CreateVehicleRequest {
            customer_id: ana.id,
            year: 1969,
            make: "Chevrolet".to_string(),
            model: "Camaro SS".to_string(),
            vin: Some("124379N664389".to_string()),
            license_plate: Some("HUGGER69".to_string()),
            color: Some("Hugger Orange".to_string()),
            market_value: Some(Decimal::new(8500000, 2)),
            odometer: 48_200,
            fuel_level: 80,
            battery_type: BatteryType::LeadAcid,
            storage_location: None,
            insurance_required: true,
            insurance_amount: Some(Decimal::new(10000000, 2)),
            registration_state: Some("CA".to_string()),
            registration_expires: NaiveDate::from_ymd_opt(2027, 4, 30),
            default_front_psi: Some(32),
            default_rear_psi: Some(34),
            preferred_front_psi: Some(30),
            preferred_rear_psi: Some(32),
            last_service_date: NaiveDate::from_ymd_opt(2026, 1, 12),
            next_service_date: NaiveDate::from_ymd_opt(2026, 7, 12),
            service_interval_months: Some(6),
            maintenance_notes: Some("Runs rich when cold; let it idle two minutes.".to_string()),
            drivers: vec![AuthorizedDriverInput {
                name: "Ana Lee".to_string(),
                phone: Some("805-555-0101".to_string()),
                email: Some("ana.lee@example.com".to_string()),
                license_number: Some("D1234567".to_string()),
                relationship: Some("Owner".to_string()),
            }],
            contacts: vec![AuthorizedContactInput {
                name: "Sam Lee".to_string(),
                phone: Some("805-555-0102".to_string()),
                email: None,
                can_drop_off: true,
                can_pick_up: false,
            }],
        })
        .await?;

    vehicles
        .create(CreateVehicleRequest {
            customer_id: mercer.id,
            year: 1987,
            make: "Porsche".to_string(),
            model: "911 Carrera".to_string(),
            vin: Some("WP0AB0918HS121538".to_string()),
            license_plate: None,
            color: Some("Guards Red".to_string()),
            market_value: Some(Decimal::new(6500000, 2)),
            odometer: 96_450,
            fuel_level: 45,
            battery_type: BatteryType::Agm,
            storage_location: Some("Building B - Indoor, Business Wing, Row 2".to_string()),
            insurance_required: false,
            insurance_amount: None,
            registration_state: Some("CA".to_string()),
            registration_expires: NaiveDate::from_ymd_opt(2026, 11, 15),
            default_front_psi: Some(29),
            default_rear_psi: Some(36),
            preferred_front_psi: None,
            preferred_rear_psi: None,
            last_service_date: None,
            next_service_date: None,
            service_interval_months: Some(12),
            maintenance_notes: None,
            drivers: vec![
                AuthorizedDriverInput {
                    name: "Grant Mercer".to_string(),
                    phone: Some("805-555-0188".to_string()),
                    email: None,
                    license_number: None,
                    relationship: Some("Owner".to_string()),
                },
                AuthorizedDriverInput {
                    name: "Dana Mercer".to_string(),
                    phone: None,
                    email: None,
                    license_number: None,
                    relationship: Some("Spouse".to_string()),
                },
            ],
            contacts: vec![],
        })
        .await?;

    visits
        .create(CreateCheckInOutRequest {
            vehicle_id: camaro.vehicle.id,
            customer_id: ana.id,
            date: Utc::now().date_naive(),
            check_type: CheckType::CheckIn,
            status: None,
            location: Some(ana.storage_location.clone()),
            contact_name: Some("Ana Lee".to_string()),
            fuel_level: Some(80),
            mileage: Some(48_200),
            tire_pressures: Some(TirePressureReading {
                passenger_front: Some(30),
                passenger_rear: Some(32),
                driver_front: Some(30),
                driver_rear: Some(32),
            }),
            car_cover: true,
            kill_switch: false,
            startup_directions: None,
            delivery_address: None,
            notes: Some("Dropped off after weekend rally.".to_string()),
            signature: None,
            photos: None,
            service_items: vec![ServiceItemInput {
                description: "Full detail".to_string(),
                cost: Decimal::new(25000, 2),
                completed: false,
            }],
        })
        .await?;

    Ok(())
}

/// Insert a user row directly. Shared by the bootstrap seeder and tests.
#[allow(clippy::too_many_arguments)]
pub async fn insert_user(
    db: &DatabaseConnection,
    first_name: &str,
    last_name: &str,
    email: &str,
    role: UserRole,
    customer_id: Option<Uuid>,
    password_hash: &str,
    active: bool,
) -> Result<user::Model, sea_orm::DbErr> {
    let now = Utc::now().fixed_offset();
    let model = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        first_name: Set(first_name.to_string()),
        last_name: Set(last_name.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash.to_string()),
        role: Set(role),
        customer_id: Set(customer_id),
        active: Set(active),
        last_login_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    model.insert(db).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn memory_db() -> Arc<DatabaseConnection> {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        Arc::new(db)
    }

    fn seed_config(seed_fixtures: bool) -> AppConfig {
        AppConfig {
            operator_tokens: vec!["t".to_string()],
            bcrypt_cost: 4,
            seed_fixtures,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn bootstrap_admin_is_created_once() {
        let db = memory_db().await;
        let config = seed_config(false);

        seed_if_empty(&db, &config).await.unwrap();
        seed_if_empty(&db, &config).await.unwrap();

        let users = UserRepository::new(Arc::clone(&db));
        assert_eq!(users.count().await.unwrap(), 1);

        let admin = users
            .find_by_email(BOOTSTRAP_ADMIN_EMAIL)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.role, UserRole::Admin);
        assert!(admin.active);
    }

    #[tokio::test]
    async fn demo_data_seeds_only_when_enabled() {
        let db = memory_db().await;
        seed_if_empty(&db, &seed_config(false)).await.unwrap();

        let customers = CustomerRepository::new(Arc::clone(&db));
        assert_eq!(customers.count().await.unwrap(), 0);

        seed_if_empty(&db, &seed_config(true)).await.unwrap();
        assert_eq!(customers.count().await.unwrap(), 2);

        // Running again must not duplicate.
        seed_if_empty(&db, &seed_config(true)).await.unwrap();
        assert_eq!(customers.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn demo_vehicles_carry_drivers() {
        let db = memory_db().await;
        seed_if_empty(&db, &seed_config(true)).await.unwrap();

        let vehicles = VehicleRepository::new(Arc::clone(&db));
        let all = vehicles.list().await.unwrap();
        assert_eq!(all.len(), 2);

        for vehicle in &all {
            let detail = vehicles.get_detail(vehicle.id).await.unwrap().unwrap();
            assert!(!detail.drivers.is_empty());
        }
    }
}
