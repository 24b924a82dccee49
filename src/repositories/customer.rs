//! Customer repository for database operations
//!
//! Encapsulates SeaORM operations for the customers table, including the
//! derived storage-location and monthly-price defaults applied at creation.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::customer::{self, CustomerType, Entity as Customer, MembershipLevel};
use crate::models::vehicle::{self, Entity as Vehicle};
use crate::pricing;

/// Payload for creating a customer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCustomerRequest {
    pub first_name: String,
    pub last_name: String,
    pub customer_type: CustomerType,
    pub membership_level: MembershipLevel,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    /// Explicit storage location; derived from type and level when omitted
    #[serde(default)]
    pub storage_location: Option<String>,
    #[serde(default = "default_storage_spots")]
    pub storage_spots: i32,
    #[serde(default)]
    pub storage_rows: Option<i32>,
    /// Manually negotiated price; the standard quote is used when omitted
    #[serde(default)]
    pub manual_price: Option<Decimal>,
}

fn default_storage_spots() -> i32 {
    1
}

/// Partial update payload. Omitted fields keep their stored values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateCustomerRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub customer_type: Option<CustomerType>,
    #[serde(default)]
    pub membership_level: Option<MembershipLevel>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub storage_location: Option<String>,
    #[serde(default)]
    pub storage_spots: Option<i32>,
    #[serde(default)]
    pub storage_rows: Option<i32>,
    #[serde(default)]
    pub monthly_price: Option<Decimal>,
}

/// Repository for customer database operations
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pub db: Arc<DatabaseConnection>,
}

impl CustomerRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// All customers, newest last.
    pub async fn list(&self) -> Result<Vec<customer::Model>, RepositoryError> {
        let customers = Customer::find()
            .order_by_asc(customer::Column::CreatedAt)
            .all(&*self.db)
            .await?;
        Ok(customers)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<customer::Model>, RepositoryError> {
        let found = Customer::find_by_id(id).one(&*self.db).await?;
        Ok(found)
    }

    pub async fn count(&self) -> Result<u64, RepositoryError> {
        let count = Customer::find().count(&*self.db).await?;
        Ok(count)
    }

    /// Create a customer.
    ///
    /// The storage location defaults to the building derived from customer
    /// type and membership level, and the monthly price defaults to the
    /// standard quote unless a manual price was negotiated. The password hash
    /// is produced by the caller so the repository never sees plaintext.
    pub async fn create(
        &self,
        request: CreateCustomerRequest,
        password_hash: Option<String>,
    ) -> Result<customer::Model, RepositoryError> {
        let now = Utc::now().fixed_offset();

        let storage_location = match request.storage_location {
            Some(location) if !location.trim().is_empty() => location,
            _ => pricing::default_storage_location(request.customer_type, request.membership_level),
        };
        let monthly_price = request.manual_price.or_else(|| {
            Some(pricing::monthly_price(
                request.membership_level,
                request.storage_spots,
            ))
        });

        let model = customer::ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(request.first_name),
            last_name: Set(request.last_name),
            customer_type: Set(request.customer_type),
            membership_level: Set(request.membership_level),
            email: Set(request.email),
            phone: Set(request.phone),
            street: Set(request.street),
            city: Set(request.city),
            state: Set(request.state),
            zip: Set(request.zip),
            storage_location: Set(storage_location),
            storage_spots: Set(request.storage_spots),
            storage_rows: Set(request.storage_rows),
            monthly_price: Set(monthly_price),
            password_hash: Set(password_hash),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = model.insert(&*self.db).await?;
        metrics::counter!("motorvault_customers_created_total").increment(1);
        Ok(created)
    }

    /// Merge the provided fields into the stored customer.
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateCustomerRequest,
    ) -> Result<customer::Model, RepositoryError> {
        let existing = Customer::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("Customer {} not found", id)))?;

        let mut model: customer::ActiveModel = existing.into();

        if let Some(first_name) = request.first_name {
            model.first_name = Set(first_name);
        }
        if let Some(last_name) = request.last_name {
            model.last_name = Set(last_name);
        }
        if let Some(customer_type) = request.customer_type {
            model.customer_type = Set(customer_type);
        }
        if let Some(membership_level) = request.membership_level {
            model.membership_level = Set(membership_level);
        }
        if let Some(email) = request.email {
            model.email = Set(email);
        }
        if let Some(phone) = request.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(street) = request.street {
            model.street = Set(Some(street));
        }
        if let Some(city) = request.city {
            model.city = Set(Some(city));
        }
        if let Some(state) = request.state {
            model.state = Set(Some(state));
        }
        if let Some(zip) = request.zip {
            model.zip = Set(Some(zip));
        }
        if let Some(storage_location) = request.storage_location {
            model.storage_location = Set(storage_location);
        }
        if let Some(storage_spots) = request.storage_spots {
            model.storage_spots = Set(storage_spots);
        }
        if let Some(storage_rows) = request.storage_rows {
            model.storage_rows = Set(Some(storage_rows));
        }
        if let Some(monthly_price) = request.monthly_price {
            model.monthly_price = Set(Some(monthly_price));
        }
        model.updated_at = Set(Utc::now().fixed_offset());

        let updated = model.update(&*self.db).await?;
        metrics::counter!("motorvault_customers_updated_total").increment(1);
        Ok(updated)
    }

    /// Delete a customer. Refused while vehicles still reference it.
    ///
    /// Returns `Ok(false)` when no customer with the id exists.
    pub async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let vehicle_count = Vehicle::find()
            .filter(vehicle::Column::CustomerId.eq(id))
            .count(&*self.db)
            .await?;
        if vehicle_count > 0 {
            return Err(RepositoryError::validation_error(format!(
                "Customer has {} vehicle(s); remove them first",
                vehicle_count
            )));
        }

        let result = Customer::delete_by_id(id).exec(&*self.db).await?;
        let deleted = result.rows_affected > 0;
        if deleted {
            metrics::counter!("motorvault_customers_deleted_total").increment(1);
        }
        Ok(deleted)
    }
}
