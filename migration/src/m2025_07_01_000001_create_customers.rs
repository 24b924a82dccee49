//! Migration to create the customers table.
//!
//! Customers are the billing party for stored vehicles; storage allocation and
//! the optional manual price override live here.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Customers::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Customers::FirstName).text().not_null())
                    .col(ColumnDef::new(Customers::LastName).text().not_null())
                    .col(ColumnDef::new(Customers::CustomerType).text().not_null())
                    .col(
                        ColumnDef::new(Customers::MembershipLevel)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Customers::Email).text().not_null())
                    .col(ColumnDef::new(Customers::Phone).text().null())
                    .col(ColumnDef::new(Customers::Street).text().null())
                    .col(ColumnDef::new(Customers::City).text().null())
                    .col(ColumnDef::new(Customers::State).text().null())
                    .col(ColumnDef::new(Customers::Zip).text().null())
                    .col(
                        ColumnDef::new(Customers::StorageLocation)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Customers::StorageSpots)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Customers::StorageRows).integer().null())
                    .col(ColumnDef::new(Customers::MonthlyPrice).decimal().null())
                    .col(ColumnDef::new(Customers::PasswordHash).text().null())
                    .col(
                        ColumnDef::new(Customers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Customers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_customers_last_name")
                    .table(Customers::Table)
                    .col(Customers::LastName)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Customers {
    Table,
    Id,
    FirstName,
    LastName,
    CustomerType,
    MembershipLevel,
    Email,
    Phone,
    Street,
    City,
    State,
    Zip,
    StorageLocation,
    StorageSpots,
    StorageRows,
    MonthlyPrice,
    PasswordHash,
    CreatedAt,
    UpdatedAt,
}
