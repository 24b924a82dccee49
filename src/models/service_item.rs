//! Service item entity model
//!
//! Billable line items attached to a check-in/out record, kept in insertion
//! order via the position column.

use rust_decimal::Decimal;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "service_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub check_in_out_id: Uuid,

    pub description: String,

    /// Line cost, never negative
    pub cost: Decimal,

    pub completed: bool,

    pub completed_at: Option<DateTimeWithTimeZone>,

    /// Insertion order within the parent record
    pub position: i32,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::check_in_out::Entity",
        from = "Column::CheckInOutId",
        to = "super::check_in_out::Column::Id"
    )]
    CheckInOut,
}

impl Related<super::check_in_out::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CheckInOut.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
