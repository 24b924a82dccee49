//! Database migrations for the Motorvault CRM.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2025_07_01_000001_create_customers;
mod m2025_07_01_000002_create_vehicles;
mod m2025_07_01_000003_create_check_in_outs;
mod m2025_07_01_000004_create_inspection_media;
mod m2025_07_01_000005_create_users;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_07_01_000001_create_customers::Migration),
            Box::new(m2025_07_01_000002_create_vehicles::Migration),
            Box::new(m2025_07_01_000003_create_check_in_outs::Migration),
            Box::new(m2025_07_01_000004_create_inspection_media::Migration),
            Box::new(m2025_07_01_000005_create_users::Migration),
        ]
    }
}
