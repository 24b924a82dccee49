//! Migration to create the inspection_media table.
//!
//! One row per check-in/out holding the fixed-schema photo-slot record and the
//! walkaround video reference as JSON. Media bytes live in an external object
//! store; only URL strings are kept here.

use sea_orm_migration::prelude::*;

use crate::m2025_07_01_000003_create_check_in_outs::CheckInOuts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InspectionMedia::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InspectionMedia::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InspectionMedia::CheckInOutId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(InspectionMedia::Media)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InspectionMedia::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(InspectionMedia::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inspection_media_check_in_out_id")
                            .from(InspectionMedia::Table, InspectionMedia::CheckInOutId)
                            .to(CheckInOuts::Table, CheckInOuts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InspectionMedia::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum InspectionMedia {
    Table,
    Id,
    CheckInOutId,
    Media,
    CreatedAt,
    UpdatedAt,
}
