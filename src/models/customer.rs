//! Customer entity model
//!
//! This module contains the SeaORM entity model for the customers table,
//! which stores the billing party for stored vehicles along with their
//! storage allocation and membership tier.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Customer classification
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum CustomerType {
    #[sea_orm(string_value = "Individual")]
    Individual,
    #[sea_orm(string_value = "Business")]
    Business,
    #[sea_orm(string_value = "Corporate")]
    Corporate,
}

/// Membership pricing/service tier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum MembershipLevel {
    #[sea_orm(string_value = "Basic")]
    Basic,
    #[sea_orm(string_value = "Premium")]
    Premium,
    #[sea_orm(string_value = "VIP")]
    #[serde(rename = "VIP")]
    Vip,
    #[sea_orm(string_value = "Enterprise")]
    Enterprise,
    #[sea_orm(string_value = "Archived")]
    Archived,
}

/// Customer entity. The portal credential is kept only as a bcrypt hash and
/// must never be serialized into a response.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    /// Unique identifier for the customer (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub first_name: String,

    pub last_name: String,

    pub customer_type: CustomerType,

    pub membership_level: MembershipLevel,

    pub email: String,

    pub phone: Option<String>,

    pub street: Option<String>,

    pub city: Option<String>,

    pub state: Option<String>,

    pub zip: Option<String>,

    /// Assigned storage area (derived from type + membership at intake unless
    /// overridden)
    pub storage_location: String,

    /// Number of allocated storage spots, always >= 1
    pub storage_spots: i32,

    pub storage_rows: Option<i32>,

    /// Quoted or manually overridden monthly price
    pub monthly_price: Option<Decimal>,

    /// bcrypt hash of the customer-portal credential
    pub password_hash: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::vehicle::Entity")]
    Vehicle,
}

impl Related<super::vehicle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vehicle.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
