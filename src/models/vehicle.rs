//! Vehicle entity model
//!
//! This module contains the SeaORM entity model for the vehicles table plus
//! the small pure helpers derived from a vehicle's stored condition (fuel
//! banding, registration expiry).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Battery chemistry of a stored vehicle
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum BatteryType {
    #[sea_orm(string_value = "LeadAcid")]
    LeadAcid,
    #[sea_orm(string_value = "AGM")]
    #[serde(rename = "AGM")]
    Agm,
    #[sea_orm(string_value = "Gel")]
    Gel,
    #[sea_orm(string_value = "Lithium")]
    Lithium,
}

/// Display band for a 0-100 fuel level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FuelBand {
    Green,
    Yellow,
    Orange,
    Red,
}

/// Maps a fuel level to its display band. Total over the whole 0-100 range.
pub fn fuel_band(level: i32) -> FuelBand {
    if level >= 75 {
        FuelBand::Green
    } else if level >= 50 {
        FuelBand::Yellow
    } else if level >= 25 {
        FuelBand::Orange
    } else {
        FuelBand::Red
    }
}

/// Vehicle entity, owned by exactly one customer.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    /// Unique identifier for the vehicle (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning customer
    pub customer_id: Uuid,

    /// Model year, within [1900, current year + 1]
    pub year: i32,

    pub make: String,

    pub model: String,

    pub vin: Option<String>,

    pub license_plate: Option<String>,

    pub color: Option<String>,

    /// Fair market value
    pub market_value: Option<Decimal>,

    pub odometer: i32,

    /// Fuel level percentage, 0-100
    pub fuel_level: i32,

    pub battery_type: BatteryType,

    pub storage_location: Option<String>,

    /// Insurance rider flag; when set an amount > 0 is required
    pub insurance_required: bool,

    pub insurance_amount: Option<Decimal>,

    pub registration_state: Option<String>,

    pub registration_expires: Option<NaiveDate>,

    /// Factory tire-pressure profile, PSI
    pub default_front_psi: Option<i32>,

    pub default_rear_psi: Option<i32>,

    /// Preferred storage tire-pressure profile, PSI (snapshotted into new
    /// check-in/out records)
    pub preferred_front_psi: Option<i32>,

    pub preferred_rear_psi: Option<i32>,

    pub last_service_date: Option<NaiveDate>,

    pub next_service_date: Option<NaiveDate>,

    pub service_interval_months: Option<i32>,

    pub maintenance_notes: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Registration is expired when its expiry date lies strictly before
    /// `today`. Vehicles without an expiry date are never flagged.
    pub fn registration_expired(&self, today: NaiveDate) -> bool {
        self.registration_expires
            .map(|expires| expires < today)
            .unwrap_or(false)
    }

    /// Fuel display band for this vehicle's stored level.
    pub fn fuel_band(&self) -> FuelBand {
        fuel_band(self.fuel_level)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
    #[sea_orm(has_many = "super::authorized_driver::Entity")]
    AuthorizedDriver,
    #[sea_orm(has_many = "super::authorized_contact::Entity")]
    AuthorizedContact,
    #[sea_orm(has_many = "super::check_in_out::Entity")]
    CheckInOut,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::authorized_driver::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AuthorizedDriver.def()
    }
}

impl Related<super::authorized_contact::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AuthorizedContact.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fuel_band_boundaries() {
        assert_eq!(fuel_band(100), FuelBand::Green);
        assert_eq!(fuel_band(75), FuelBand::Green);
        assert_eq!(fuel_band(74), FuelBand::Yellow);
        assert_eq!(fuel_band(50), FuelBand::Yellow);
        assert_eq!(fuel_band(49), FuelBand::Orange);
        assert_eq!(fuel_band(25), FuelBand::Orange);
        assert_eq!(fuel_band(24), FuelBand::Red);
        assert_eq!(fuel_band(0), fuel_band(24));
    }
}
