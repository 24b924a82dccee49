//! Vehicle repository for database operations
//!
//! Vehicles carry two ordered child lists, authorized drivers and authorized
//! contacts. Updates replace a child list wholesale when one is provided;
//! positions are reassigned from the incoming order.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::authorized_contact::{self, Entity as AuthorizedContact};
use crate::models::authorized_driver::{self, Entity as AuthorizedDriver};
use crate::models::vehicle::{self, BatteryType, Entity as Vehicle};

/// Incoming authorized driver, without ids or positions.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthorizedDriverInput {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub license_number: Option<String>,
    #[serde(default)]
    pub relationship: Option<String>,
}

/// Incoming authorized contact with drop-off/pick-up permissions.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthorizedContactInput {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub can_drop_off: bool,
    #[serde(default)]
    pub can_pick_up: bool,
}

/// Payload for creating a vehicle.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateVehicleRequest {
    pub customer_id: Uuid,
    pub year: i32,
    pub make: String,
    pub model: String,
    #[serde(default)]
    pub vin: Option<String>,
    #[serde(default)]
    pub license_plate: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub market_value: Option<Decimal>,
    #[serde(default)]
    pub odometer: i32,
    #[serde(default = "default_fuel_level")]
    pub fuel_level: i32,
    pub battery_type: BatteryType,
    #[serde(default)]
    pub storage_location: Option<String>,
    #[serde(default)]
    pub insurance_required: bool,
    #[serde(default)]
    pub insurance_amount: Option<Decimal>,
    #[serde(default)]
    pub registration_state: Option<String>,
    #[serde(default)]
    pub registration_expires: Option<NaiveDate>,
    #[serde(default)]
    pub default_front_psi: Option<i32>,
    #[serde(default)]
    pub default_rear_psi: Option<i32>,
    #[serde(default)]
    pub preferred_front_psi: Option<i32>,
    #[serde(default)]
    pub preferred_rear_psi: Option<i32>,
    #[serde(default)]
    pub last_service_date: Option<NaiveDate>,
    #[serde(default)]
    pub next_service_date: Option<NaiveDate>,
    #[serde(default)]
    pub service_interval_months: Option<i32>,
    #[serde(default)]
    pub maintenance_notes: Option<String>,
    /// At least one driver is required
    pub drivers: Vec<AuthorizedDriverInput>,
    #[serde(default)]
    pub contacts: Vec<AuthorizedContactInput>,
}

fn default_fuel_level() -> i32 {
    100
}

/// Partial update payload. A provided `drivers` or `contacts` list replaces
/// the stored list entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateVehicleRequest {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub vin: Option<String>,
    #[serde(default)]
    pub license_plate: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub market_value: Option<Decimal>,
    #[serde(default)]
    pub odometer: Option<i32>,
    #[serde(default)]
    pub fuel_level: Option<i32>,
    #[serde(default)]
    pub battery_type: Option<BatteryType>,
    #[serde(default)]
    pub storage_location: Option<String>,
    #[serde(default)]
    pub insurance_required: Option<bool>,
    #[serde(default)]
    pub insurance_amount: Option<Decimal>,
    #[serde(default)]
    pub registration_state: Option<String>,
    #[serde(default)]
    pub registration_expires: Option<NaiveDate>,
    #[serde(default)]
    pub default_front_psi: Option<i32>,
    #[serde(default)]
    pub default_rear_psi: Option<i32>,
    #[serde(default)]
    pub preferred_front_psi: Option<i32>,
    #[serde(default)]
    pub preferred_rear_psi: Option<i32>,
    #[serde(default)]
    pub last_service_date: Option<NaiveDate>,
    #[serde(default)]
    pub next_service_date: Option<NaiveDate>,
    #[serde(default)]
    pub service_interval_months: Option<i32>,
    #[serde(default)]
    pub maintenance_notes: Option<String>,
    #[serde(default)]
    pub drivers: Option<Vec<AuthorizedDriverInput>>,
    #[serde(default)]
    pub contacts: Option<Vec<AuthorizedContactInput>>,
}

/// A vehicle together with its ordered child lists.
#[derive(Debug, Clone)]
pub struct VehicleDetail {
    pub vehicle: vehicle::Model,
    pub drivers: Vec<authorized_driver::Model>,
    pub contacts: Vec<authorized_contact::Model>,
}

/// Repository for vehicle database operations
#[derive(Debug, Clone)]
pub struct VehicleRepository {
    pub db: Arc<DatabaseConnection>,
}

impl VehicleRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<vehicle::Model>, RepositoryError> {
        let vehicles = Vehicle::find()
            .order_by_asc(vehicle::Column::CreatedAt)
            .all(&*self.db)
            .await?;
        Ok(vehicles)
    }

    pub async fn list_by_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<vehicle::Model>, RepositoryError> {
        let vehicles = Vehicle::find()
            .filter(vehicle::Column::CustomerId.eq(customer_id))
            .order_by_asc(vehicle::Column::CreatedAt)
            .all(&*self.db)
            .await?;
        Ok(vehicles)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<vehicle::Model>, RepositoryError> {
        let found = Vehicle::find_by_id(id).one(&*self.db).await?;
        Ok(found)
    }

    /// Vehicle plus its drivers and contacts, children in position order.
    pub async fn get_detail(&self, id: Uuid) -> Result<Option<VehicleDetail>, RepositoryError> {
        let Some(vehicle) = Vehicle::find_by_id(id).one(&*self.db).await? else {
            return Ok(None);
        };

        let drivers = AuthorizedDriver::find()
            .filter(authorized_driver::Column::VehicleId.eq(id))
            .order_by_asc(authorized_driver::Column::Position)
            .all(&*self.db)
            .await?;
        let contacts = AuthorizedContact::find()
            .filter(authorized_contact::Column::VehicleId.eq(id))
            .order_by_asc(authorized_contact::Column::Position)
            .all(&*self.db)
            .await?;

        Ok(Some(VehicleDetail {
            vehicle,
            drivers,
            contacts,
        }))
    }

    pub async fn create(
        &self,
        request: CreateVehicleRequest,
    ) -> Result<VehicleDetail, RepositoryError> {
        let now = Utc::now().fixed_offset();
        let vehicle_id = Uuid::new_v4();

        let model = vehicle::ActiveModel {
            id: Set(vehicle_id),
            customer_id: Set(request.customer_id),
            year: Set(request.year),
            make: Set(request.make),
            model: Set(request.model),
            vin: Set(request.vin),
            license_plate: Set(request.license_plate),
            color: Set(request.color),
            market_value: Set(request.market_value),
            odometer: Set(request.odometer),
            fuel_level: Set(request.fuel_level),
            battery_type: Set(request.battery_type),
            storage_location: Set(request.storage_location),
            insurance_required: Set(request.insurance_required),
            insurance_amount: Set(request.insurance_amount),
            registration_state: Set(request.registration_state),
            registration_expires: Set(request.registration_expires),
            default_front_psi: Set(request.default_front_psi),
            default_rear_psi: Set(request.default_rear_psi),
            preferred_front_psi: Set(request.preferred_front_psi),
            preferred_rear_psi: Set(request.preferred_rear_psi),
            last_service_date: Set(request.last_service_date),
            next_service_date: Set(request.next_service_date),
            service_interval_months: Set(request.service_interval_months),
            maintenance_notes: Set(request.maintenance_notes),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let vehicle = model.insert(&*self.db).await?;
        let drivers = self.insert_drivers(vehicle_id, &request.drivers).await?;
        let contacts = self.insert_contacts(vehicle_id, &request.contacts).await?;

        metrics::counter!("motorvault_vehicles_created_total").increment(1);
        Ok(VehicleDetail {
            vehicle,
            drivers,
            contacts,
        })
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateVehicleRequest,
    ) -> Result<VehicleDetail, RepositoryError> {
        let existing = Vehicle::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("Vehicle {} not found", id)))?;

        let mut model: vehicle::ActiveModel = existing.into();

        if let Some(year) = request.year {
            model.year = Set(year);
        }
        if let Some(make) = request.make {
            model.make = Set(make);
        }
        if let Some(vehicle_model) = request.model {
            model.model = Set(vehicle_model);
        }
        if let Some(vin) = request.vin {
            model.vin = Set(Some(vin));
        }
        if let Some(license_plate) = request.license_plate {
            model.license_plate = Set(Some(license_plate));
        }
        if let Some(color) = request.color {
            model.color = Set(Some(color));
        }
        if let Some(market_value) = request.market_value {
            model.market_value = Set(Some(market_value));
        }
        if let Some(odometer) = request.odometer {
            model.odometer = Set(odometer);
        }
        if let Some(fuel_level) = request.fuel_level {
            model.fuel_level = Set(fuel_level);
        }
        if let Some(battery_type) = request.battery_type {
            model.battery_type = Set(battery_type);
        }
        if let Some(storage_location) = request.storage_location {
            model.storage_location = Set(Some(storage_location));
        }
        if let Some(insurance_required) = request.insurance_required {
            model.insurance_required = Set(insurance_required);
        }
        if let Some(insurance_amount) = request.insurance_amount {
            model.insurance_amount = Set(Some(insurance_amount));
        }
        if let Some(registration_state) = request.registration_state {
            model.registration_state = Set(Some(registration_state));
        }
        if let Some(registration_expires) = request.registration_expires {
            model.registration_expires = Set(Some(registration_expires));
        }
        if let Some(psi) = request.default_front_psi {
            model.default_front_psi = Set(Some(psi));
        }
        if let Some(psi) = request.default_rear_psi {
            model.default_rear_psi = Set(Some(psi));
        }
        if let Some(psi) = request.preferred_front_psi {
            model.preferred_front_psi = Set(Some(psi));
        }
        if let Some(psi) = request.preferred_rear_psi {
            model.preferred_rear_psi = Set(Some(psi));
        }
        if let Some(date) = request.last_service_date {
            model.last_service_date = Set(Some(date));
        }
        if let Some(date) = request.next_service_date {
            model.next_service_date = Set(Some(date));
        }
        if let Some(months) = request.service_interval_months {
            model.service_interval_months = Set(Some(months));
        }
        if let Some(notes) = request.maintenance_notes {
            model.maintenance_notes = Set(Some(notes));
        }
        model.updated_at = Set(Utc::now().fixed_offset());

        let vehicle = model.update(&*self.db).await?;

        // Child lists are replaced wholesale when present in the request.
        let drivers = match request.drivers {
            Some(incoming) => {
                AuthorizedDriver::delete_many()
                    .filter(authorized_driver::Column::VehicleId.eq(id))
                    .exec(&*self.db)
                    .await?;
                self.insert_drivers(id, &incoming).await?
            }
            None => {
                AuthorizedDriver::find()
                    .filter(authorized_driver::Column::VehicleId.eq(id))
                    .order_by_asc(authorized_driver::Column::Position)
                    .all(&*self.db)
                    .await?
            }
        };
        let contacts = match request.contacts {
            Some(incoming) => {
                AuthorizedContact::delete_many()
                    .filter(authorized_contact::Column::VehicleId.eq(id))
                    .exec(&*self.db)
                    .await?;
                self.insert_contacts(id, &incoming).await?
            }
            None => {
                AuthorizedContact::find()
                    .filter(authorized_contact::Column::VehicleId.eq(id))
                    .order_by_asc(authorized_contact::Column::Position)
                    .all(&*self.db)
                    .await?
            }
        };

        metrics::counter!("motorvault_vehicles_updated_total").increment(1);
        Ok(VehicleDetail {
            vehicle,
            drivers,
            contacts,
        })
    }

    /// Delete a vehicle. Drivers, contacts and visit records cascade.
    pub async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let result = Vehicle::delete_by_id(id).exec(&*self.db).await?;
        let deleted = result.rows_affected > 0;
        if deleted {
            metrics::counter!("motorvault_vehicles_deleted_total").increment(1);
        }
        Ok(deleted)
    }

    async fn insert_drivers(
        &self,
        vehicle_id: Uuid,
        inputs: &[AuthorizedDriverInput],
    ) -> Result<Vec<authorized_driver::Model>, RepositoryError> {
        let now = Utc::now().fixed_offset();
        let mut inserted = Vec::with_capacity(inputs.len());
        for (position, input) in inputs.iter().enumerate() {
            let model = authorized_driver::ActiveModel {
                id: Set(Uuid::new_v4()),
                vehicle_id: Set(vehicle_id),
                name: Set(input.name.clone()),
                phone: Set(input.phone.clone()),
                email: Set(input.email.clone()),
                license_number: Set(input.license_number.clone()),
                relationship: Set(input.relationship.clone()),
                position: Set(position as i32),
                created_at: Set(now),
                updated_at: Set(now),
            };
            inserted.push(model.insert(&*self.db).await?);
        }
        Ok(inserted)
    }

    async fn insert_contacts(
        &self,
        vehicle_id: Uuid,
        inputs: &[AuthorizedContactInput],
    ) -> Result<Vec<authorized_contact::Model>, RepositoryError> {
        let now = Utc::now().fixed_offset();
        let mut inserted = Vec::with_capacity(inputs.len());
        for (position, input) in inputs.iter().enumerate() {
            let model = authorized_contact::ActiveModel {
                id: Set(Uuid::new_v4()),
                vehicle_id: Set(vehicle_id),
                name: Set(input.name.clone()),
                phone: Set(input.phone.clone()),
                email: Set(input.email.clone()),
                can_drop_off: Set(input.can_drop_off),
                can_pick_up: Set(input.can_pick_up),
                position: Set(position as i32),
                created_at: Set(now),
                updated_at: Set(now),
            };
            inserted.push(model.insert(&*self.db).await?);
        }
        Ok(inserted)
    }
}
