//! Migration to create the check_in_outs and service_items tables.
//!
//! A check-in/out row is one service-visit document; service items are its
//! ordered billable line items.

use sea_orm_migration::prelude::*;

use crate::m2025_07_01_000001_create_customers::Customers;
use crate::m2025_07_01_000002_create_vehicles::Vehicles;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CheckInOuts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CheckInOuts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CheckInOuts::VehicleId).uuid().not_null())
                    .col(ColumnDef::new(CheckInOuts::CustomerId).uuid().not_null())
                    .col(ColumnDef::new(CheckInOuts::Date).date().not_null())
                    .col(ColumnDef::new(CheckInOuts::CheckType).text().not_null())
                    .col(
                        ColumnDef::new(CheckInOuts::Status)
                            .text()
                            .not_null()
                            .default("CHECKED_IN"),
                    )
                    .col(ColumnDef::new(CheckInOuts::Location).text().null())
                    .col(ColumnDef::new(CheckInOuts::ContactName).text().null())
                    .col(
                        ColumnDef::new(CheckInOuts::CheckedInAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CheckInOuts::CheckedOutAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(CheckInOuts::FuelLevel).integer().null())
                    .col(ColumnDef::new(CheckInOuts::Mileage).integer().null())
                    .col(
                        ColumnDef::new(CheckInOuts::TirePassengerFront)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CheckInOuts::TirePassengerRear)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CheckInOuts::TireDriverFront)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CheckInOuts::TireDriverRear)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CheckInOuts::CarCover)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CheckInOuts::KillSwitch)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CheckInOuts::StartupDirections)
                            .text()
                            .null(),
                    )
                    .col(ColumnDef::new(CheckInOuts::DeliveryAddress).text().null())
                    .col(ColumnDef::new(CheckInOuts::Notes).text().null())
                    .col(ColumnDef::new(CheckInOuts::Signature).text().null())
                    .col(
                        ColumnDef::new(CheckInOuts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(CheckInOuts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_check_in_outs_vehicle_id")
                            .from(CheckInOuts::Table, CheckInOuts::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_check_in_outs_customer_id")
                            .from(CheckInOuts::Table, CheckInOuts::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ServiceItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServiceItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ServiceItems::CheckInOutId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ServiceItems::Description).text().not_null())
                    .col(ColumnDef::new(ServiceItems::Cost).decimal().not_null())
                    .col(
                        ColumnDef::new(ServiceItems::Completed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ServiceItems::CompletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ServiceItems::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ServiceItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ServiceItems::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_items_check_in_out_id")
                            .from(ServiceItems::Table, ServiceItems::CheckInOutId)
                            .to(CheckInOuts::Table, CheckInOuts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_check_in_outs_vehicle_id")
                    .table(CheckInOuts::Table)
                    .col(CheckInOuts::VehicleId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServiceItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CheckInOuts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum CheckInOuts {
    Table,
    Id,
    VehicleId,
    CustomerId,
    Date,
    CheckType,
    Status,
    Location,
    ContactName,
    CheckedInAt,
    CheckedOutAt,
    FuelLevel,
    Mileage,
    TirePassengerFront,
    TirePassengerRear,
    TireDriverFront,
    TireDriverRear,
    CarCover,
    KillSwitch,
    StartupDirections,
    DeliveryAddress,
    Notes,
    Signature,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ServiceItems {
    Table,
    Id,
    CheckInOutId,
    Description,
    Cost,
    Completed,
    CompletedAt,
    Position,
    CreatedAt,
    UpdatedAt,
}
