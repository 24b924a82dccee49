//! Migration to create the vehicles table and its two authorization tables.
//!
//! Authorized drivers and authorized contacts are ordered children of a
//! vehicle; a vehicle always belongs to exactly one customer.

use sea_orm_migration::prelude::*;

use crate::m2025_07_01_000001_create_customers::Customers;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vehicles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vehicles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Vehicles::CustomerId).uuid().not_null())
                    .col(ColumnDef::new(Vehicles::Year).integer().not_null())
                    .col(ColumnDef::new(Vehicles::Make).text().not_null())
                    .col(ColumnDef::new(Vehicles::Model).text().not_null())
                    .col(ColumnDef::new(Vehicles::Vin).text().null())
                    .col(ColumnDef::new(Vehicles::LicensePlate).text().null())
                    .col(ColumnDef::new(Vehicles::Color).text().null())
                    .col(ColumnDef::new(Vehicles::MarketValue).decimal().null())
                    .col(
                        ColumnDef::new(Vehicles::Odometer)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Vehicles::FuelLevel)
                            .integer()
                            .not_null()
                            .default(100),
                    )
                    .col(ColumnDef::new(Vehicles::BatteryType).text().not_null())
                    .col(ColumnDef::new(Vehicles::StorageLocation).text().null())
                    .col(
                        ColumnDef::new(Vehicles::InsuranceRequired)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Vehicles::InsuranceAmount).decimal().null())
                    .col(ColumnDef::new(Vehicles::RegistrationState).text().null())
                    .col(
                        ColumnDef::new(Vehicles::RegistrationExpires)
                            .date()
                            .null(),
                    )
                    .col(ColumnDef::new(Vehicles::DefaultFrontPsi).integer().null())
                    .col(ColumnDef::new(Vehicles::DefaultRearPsi).integer().null())
                    .col(
                        ColumnDef::new(Vehicles::PreferredFrontPsi)
                            .integer()
                            .null(),
                    )
                    .col(ColumnDef::new(Vehicles::PreferredRearPsi).integer().null())
                    .col(ColumnDef::new(Vehicles::LastServiceDate).date().null())
                    .col(ColumnDef::new(Vehicles::NextServiceDate).date().null())
                    .col(
                        ColumnDef::new(Vehicles::ServiceIntervalMonths)
                            .integer()
                            .null(),
                    )
                    .col(ColumnDef::new(Vehicles::MaintenanceNotes).text().null())
                    .col(
                        ColumnDef::new(Vehicles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Vehicles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vehicles_customer_id")
                            .from(Vehicles::Table, Vehicles::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AuthorizedDrivers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuthorizedDrivers::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AuthorizedDrivers::VehicleId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AuthorizedDrivers::Name).text().not_null())
                    .col(ColumnDef::new(AuthorizedDrivers::Phone).text().null())
                    .col(ColumnDef::new(AuthorizedDrivers::Email).text().null())
                    .col(
                        ColumnDef::new(AuthorizedDrivers::LicenseNumber)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(AuthorizedDrivers::Relationship)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(AuthorizedDrivers::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AuthorizedDrivers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(AuthorizedDrivers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_authorized_drivers_vehicle_id")
                            .from(AuthorizedDrivers::Table, AuthorizedDrivers::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AuthorizedContacts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuthorizedContacts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AuthorizedContacts::VehicleId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AuthorizedContacts::Name).text().not_null())
                    .col(ColumnDef::new(AuthorizedContacts::Phone).text().null())
                    .col(ColumnDef::new(AuthorizedContacts::Email).text().null())
                    .col(
                        ColumnDef::new(AuthorizedContacts::CanDropOff)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AuthorizedContacts::CanPickUp)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AuthorizedContacts::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AuthorizedContacts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(AuthorizedContacts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_authorized_contacts_vehicle_id")
                            .from(AuthorizedContacts::Table, AuthorizedContacts::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vehicles_customer_id")
                    .table(Vehicles::Table)
                    .col(Vehicles::CustomerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuthorizedContacts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AuthorizedDrivers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vehicles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Vehicles {
    Table,
    Id,
    CustomerId,
    Year,
    Make,
    Model,
    Vin,
    LicensePlate,
    Color,
    MarketValue,
    Odometer,
    FuelLevel,
    BatteryType,
    StorageLocation,
    InsuranceRequired,
    InsuranceAmount,
    RegistrationState,
    RegistrationExpires,
    DefaultFrontPsi,
    DefaultRearPsi,
    PreferredFrontPsi,
    PreferredRearPsi,
    LastServiceDate,
    NextServiceDate,
    ServiceIntervalMonths,
    MaintenanceNotes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AuthorizedDrivers {
    Table,
    Id,
    VehicleId,
    Name,
    Phone,
    Email,
    LicenseNumber,
    Relationship,
    Position,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AuthorizedContacts {
    Table,
    Id,
    VehicleId,
    Name,
    Phone,
    Email,
    CanDropOff,
    CanPickUp,
    Position,
    CreatedAt,
    UpdatedAt,
}
