//! Check-in/out entity model
//!
//! A single service-visit document tracking a vehicle's condition at drop-off
//! and/or pickup, including the four-point tire pressure reading and the
//! captured signature.

use chrono::NaiveDate;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Direction of the visit
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckType {
    #[sea_orm(string_value = "CHECK_IN")]
    CheckIn,
    #[sea_orm(string_value = "CHECK_OUT")]
    CheckOut,
}

/// Visit status. The nominal progression is CHECKED_IN -> IN_SERVICE ->
/// CHECKED_OUT; out-of-order edits are accepted but flagged (see
/// `lifecycle::note_transition`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckStatus {
    #[sea_orm(string_value = "CHECKED_IN")]
    CheckedIn,
    #[sea_orm(string_value = "IN_SERVICE")]
    InService,
    #[sea_orm(string_value = "CHECKED_OUT")]
    CheckedOut,
}

impl CheckStatus {
    /// Position in the nominal forward progression.
    pub fn stage(self) -> u8 {
        match self {
            CheckStatus::CheckedIn => 0,
            CheckStatus::InService => 1,
            CheckStatus::CheckedOut => 2,
        }
    }
}

/// Four-point tire pressure reading, PSI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TirePressureReading {
    pub passenger_front: Option<i32>,
    pub passenger_rear: Option<i32>,
    pub driver_front: Option<i32>,
    pub driver_rear: Option<i32>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "check_in_outs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub vehicle_id: Uuid,

    /// Redundant owner reference, snapshotted at creation
    pub customer_id: Uuid,

    pub date: NaiveDate,

    pub check_type: CheckType,

    pub status: CheckStatus,

    pub location: Option<String>,

    pub contact_name: Option<String>,

    pub checked_in_at: Option<DateTimeWithTimeZone>,

    pub checked_out_at: Option<DateTimeWithTimeZone>,

    /// Fuel level percentage at the visit, 0-100
    pub fuel_level: Option<i32>,

    pub mileage: Option<i32>,

    pub tire_passenger_front: Option<i32>,

    pub tire_passenger_rear: Option<i32>,

    pub tire_driver_front: Option<i32>,

    pub tire_driver_rear: Option<i32>,

    pub car_cover: bool,

    pub kill_switch: bool,

    pub startup_directions: Option<String>,

    pub delivery_address: Option<String>,

    pub notes: Option<String>,

    /// base64-encoded signature image captured at the signature step
    pub signature: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn tire_pressures(&self) -> TirePressureReading {
        TirePressureReading {
            passenger_front: self.tire_passenger_front,
            passenger_rear: self.tire_passenger_rear,
            driver_front: self.tire_driver_front,
            driver_rear: self.tire_driver_rear,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vehicle::Entity",
        from = "Column::VehicleId",
        to = "super::vehicle::Column::Id"
    )]
    Vehicle,
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
    #[sea_orm(has_many = "super::service_item::Entity")]
    ServiceItem,
}

impl Related<super::vehicle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vehicle.def()
    }
}

impl Related<super::service_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
