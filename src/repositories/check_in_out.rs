//! Check-in/out repository for database operations
//!
//! A visit record owns an ordered list of service items and a single
//! inspection-media document. Status edits are routed through
//! `lifecycle::note_transition` so out-of-order moves leave an audit trace.

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
use crate::lifecycle;
use crate::models::check_in_out::{
    self, CheckStatus, CheckType, Entity as CheckInOut, TirePressureReading,
};
use crate::models::inspection_media::{self, Entity as InspectionMedia, InspectionPhotos};
use crate::models::service_item::{self, Entity as ServiceItem};

/// Incoming service line item.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceItemInput {
    pub description: String,
    pub cost: Decimal,
    #[serde(default)]
    pub completed: bool,
}

/// Payload for creating a check-in/out record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCheckInOutRequest {
    pub vehicle_id: Uuid,
    pub customer_id: Uuid,
    pub date: NaiveDate,
    pub check_type: CheckType,
    #[serde(default)]
    pub status: Option<CheckStatus>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub fuel_level: Option<i32>,
    #[serde(default)]
    pub mileage: Option<i32>,
    #[serde(default)]
    pub tire_pressures: Option<TirePressureReading>,
    #[serde(default)]
    pub car_cover: bool,
    #[serde(default)]
    pub kill_switch: bool,
    #[serde(default)]
    pub startup_directions: Option<String>,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// base64-encoded signature image from the intake wizard
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub photos: Option<InspectionPhotos>,
    #[serde(default)]
    pub service_items: Vec<ServiceItemInput>,
}

/// Partial update payload. Omitted fields keep their stored values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateCheckInOutRequest {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub check_type: Option<CheckType>,
    #[serde(default)]
    pub status: Option<CheckStatus>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub fuel_level: Option<i32>,
    #[serde(default)]
    pub mileage: Option<i32>,
    #[serde(default)]
    pub tire_pressures: Option<TirePressureReading>,
    #[serde(default)]
    pub car_cover: Option<bool>,
    #[serde(default)]
    pub kill_switch: Option<bool>,
    #[serde(default)]
    pub startup_directions: Option<String>,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
}

/// A visit record with its service items and inspection photos.
#[derive(Debug, Clone)]
pub struct CheckInOutDetail {
    pub record: check_in_out::Model,
    pub service_items: Vec<service_item::Model>,
    pub photos: InspectionPhotos,
}

/// Repository for check-in/out database operations
#[derive(Debug, Clone)]
pub struct CheckInOutRepository {
    pub db: Arc<DatabaseConnection>,
}

impl CheckInOutRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<check_in_out::Model>, RepositoryError> {
        let records = CheckInOut::find()
            .order_by_desc(check_in_out::Column::Date)
            .order_by_desc(check_in_out::Column::CreatedAt)
            .all(&*self.db)
            .await?;
        Ok(records)
    }

    pub async fn list_by_vehicle(
        &self,
        vehicle_id: Uuid,
    ) -> Result<Vec<check_in_out::Model>, RepositoryError> {
        let records = CheckInOut::find()
            .filter(check_in_out::Column::VehicleId.eq(vehicle_id))
            .order_by_desc(check_in_out::Column::Date)
            .all(&*self.db)
            .await?;
        Ok(records)
    }

    pub async fn get_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<check_in_out::Model>, RepositoryError> {
        let found = CheckInOut::find_by_id(id).one(&*self.db).await?;
        Ok(found)
    }

    /// Record plus items (position order) and the photo document.
    pub async fn get_detail(&self, id: Uuid) -> Result<Option<CheckInOutDetail>, RepositoryError> {
        let Some(record) = CheckInOut::find_by_id(id).one(&*self.db).await? else {
            return Ok(None);
        };

        let service_items = self.list_service_items(id).await?;
        let photos = self.get_photos(id).await?.unwrap_or_default();

        Ok(Some(CheckInOutDetail {
            record,
            service_items,
            photos,
        }))
    }

    pub async fn create(
        &self,
        request: CreateCheckInOutRequest,
    ) -> Result<CheckInOutDetail, RepositoryError> {
        let now = Utc::now().fixed_offset();
        let record_id = Uuid::new_v4();
        let status = request.status.unwrap_or(CheckStatus::CheckedIn);
        let tires = request.tire_pressures.unwrap_or(TirePressureReading {
            passenger_front: None,
            passenger_rear: None,
            driver_front: None,
            driver_rear: None,
        });

        // A check-in that lands already checked in gets its arrival stamp;
        // a record created straight at checked-out gets the departure stamp.
        let checked_in_at = (status.stage() >= CheckStatus::CheckedIn.stage()).then_some(now);
        let checked_out_at = (status == CheckStatus::CheckedOut).then_some(now);

        let model = check_in_out::ActiveModel {
            id: Set(record_id),
            vehicle_id: Set(request.vehicle_id),
            customer_id: Set(request.customer_id),
            date: Set(request.date),
            check_type: Set(request.check_type),
            status: Set(status),
            location: Set(request.location),
            contact_name: Set(request.contact_name),
            checked_in_at: Set(checked_in_at),
            checked_out_at: Set(checked_out_at),
            fuel_level: Set(request.fuel_level),
            mileage: Set(request.mileage),
            tire_passenger_front: Set(tires.passenger_front),
            tire_passenger_rear: Set(tires.passenger_rear),
            tire_driver_front: Set(tires.driver_front),
            tire_driver_rear: Set(tires.driver_rear),
            car_cover: Set(request.car_cover),
            kill_switch: Set(request.kill_switch),
            startup_directions: Set(request.startup_directions),
            delivery_address: Set(request.delivery_address),
            notes: Set(request.notes),
            signature: Set(request.signature),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let record = model.insert(&*self.db).await?;

        let mut service_items = Vec::with_capacity(request.service_items.len());
        for (position, input) in request.service_items.iter().enumerate() {
            service_items.push(
                self.insert_service_item(record_id, input, position as i32)
                    .await?,
            );
        }

        let photos = request.photos.unwrap_or_default();
        self.put_photos(record_id, &photos).await?;

        metrics::counter!("motorvault_check_in_outs_created_total").increment(1);
        Ok(CheckInOutDetail {
            record,
            service_items,
            photos,
        })
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateCheckInOutRequest,
    ) -> Result<check_in_out::Model, RepositoryError> {
        let existing = CheckInOut::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                RepositoryError::NotFound(format!("Check-in/out record {} not found", id))
            })?;

        let previous_status = existing.status;
        let mut model: check_in_out::ActiveModel = existing.into();

        if let Some(date) = request.date {
            model.date = Set(date);
        }
        if let Some(check_type) = request.check_type {
            model.check_type = Set(check_type);
        }
        if let Some(status) = request.status {
            lifecycle::note_transition(id, previous_status, status);
            model.status = Set(status);
            if status == CheckStatus::CheckedOut {
                model.checked_out_at = Set(Some(lifecycle::now_timestamp()));
            }
        }
        if let Some(location) = request.location {
            model.location = Set(Some(location));
        }
        if let Some(contact_name) = request.contact_name {
            model.contact_name = Set(Some(contact_name));
        }
        if let Some(fuel_level) = request.fuel_level {
            model.fuel_level = Set(Some(fuel_level));
        }
        if let Some(mileage) = request.mileage {
            model.mileage = Set(Some(mileage));
        }
        if let Some(tires) = request.tire_pressures {
            model.tire_passenger_front = Set(tires.passenger_front);
            model.tire_passenger_rear = Set(tires.passenger_rear);
            model.tire_driver_front = Set(tires.driver_front);
            model.tire_driver_rear = Set(tires.driver_rear);
        }
        if let Some(car_cover) = request.car_cover {
            model.car_cover = Set(car_cover);
        }
        if let Some(kill_switch) = request.kill_switch {
            model.kill_switch = Set(kill_switch);
        }
        if let Some(startup_directions) = request.startup_directions {
            model.startup_directions = Set(Some(startup_directions));
        }
        if let Some(delivery_address) = request.delivery_address {
            model.delivery_address = Set(Some(delivery_address));
        }
        if let Some(notes) = request.notes {
            model.notes = Set(Some(notes));
        }
        if let Some(signature) = request.signature {
            model.signature = Set(Some(signature));
        }
        model.updated_at = Set(Utc::now().fixed_offset());

        let updated = model.update(&*self.db).await?;
        metrics::counter!("motorvault_check_in_outs_updated_total").increment(1);
        Ok(updated)
    }

    /// Delete a record; service items and media cascade.
    pub async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let result = CheckInOut::delete_by_id(id).exec(&*self.db).await?;
        let deleted = result.rows_affected > 0;
        if deleted {
            metrics::counter!("motorvault_check_in_outs_deleted_total").increment(1);
        }
        Ok(deleted)
    }

    pub async fn list_service_items(
        &self,
        check_in_out_id: Uuid,
    ) -> Result<Vec<service_item::Model>, RepositoryError> {
        let items = ServiceItem::find()
            .filter(service_item::Column::CheckInOutId.eq(check_in_out_id))
            .order_by_asc(service_item::Column::Position)
            .all(&*self.db)
            .await?;
        Ok(items)
    }

    /// Append a service item at the end of the list.
    pub async fn add_service_item(
        &self,
        check_in_out_id: Uuid,
        input: ServiceItemInput,
    ) -> Result<service_item::Model, RepositoryError> {
        self.require_record(check_in_out_id).await?;

        let next_position = self
            .list_service_items(check_in_out_id)
            .await?
            .last()
            .map(|item| item.position + 1)
            .unwrap_or(0);

        self.insert_service_item(check_in_out_id, &input, next_position)
            .await
    }

    /// Remove the item at `position` and close the gap so positions stay
    /// dense. Returns false when no item sits at that position.
    pub async fn remove_service_item(
        &self,
        check_in_out_id: Uuid,
        position: i32,
    ) -> Result<bool, RepositoryError> {
        let items = self.list_service_items(check_in_out_id).await?;
        let Some(target) = items.iter().find(|item| item.position == position) else {
            return Ok(false);
        };

        ServiceItem::delete_by_id(target.id).exec(&*self.db).await?;

        for item in items.into_iter().filter(|item| item.position > position) {
            let reindexed_position = item.position - 1;
            let mut model: service_item::ActiveModel = item.into();
            model.position = Set(reindexed_position);
            model.update(&*self.db).await?;
        }

        Ok(true)
    }

    /// Flip an item's completed flag, stamping or clearing `completed_at`.
    pub async fn set_service_item_completed(
        &self,
        check_in_out_id: Uuid,
        position: i32,
        completed: bool,
    ) -> Result<service_item::Model, RepositoryError> {
        let items = self.list_service_items(check_in_out_id).await?;
        let target = items
            .into_iter()
            .find(|item| item.position == position)
            .ok_or_else(|| {
                RepositoryError::NotFound(format!("No service item at position {}", position))
            })?;

        let mut model: service_item::ActiveModel = target.into();
        model.completed = Set(completed);
        model.completed_at = Set(completed.then(|| Utc::now().fixed_offset()));
        model.updated_at = Set(Utc::now().fixed_offset());

        let updated = model.update(&*self.db).await?;
        Ok(updated)
    }

    /// The photo document for a record, if one has been written.
    pub async fn get_photos(
        &self,
        check_in_out_id: Uuid,
    ) -> Result<Option<InspectionPhotos>, RepositoryError> {
        let Some(row) = InspectionMedia::find()
            .filter(inspection_media::Column::CheckInOutId.eq(check_in_out_id))
            .one(&*self.db)
            .await?
        else {
            return Ok(None);
        };

        let photos = serde_json::from_value(row.media).map_err(|err| {
            RepositoryError::Validation(format!("Stored inspection media is malformed: {}", err))
        })?;
        Ok(Some(photos))
    }

    /// Write the full photo document for a record, replacing any prior one.
    pub async fn put_photos(
        &self,
        check_in_out_id: Uuid,
        photos: &InspectionPhotos,
    ) -> Result<(), RepositoryError> {
        let now = Utc::now().fixed_offset();
        let media = serde_json::to_value(photos).map_err(|err| {
            RepositoryError::Validation(format!("Inspection media is not serializable: {}", err))
        })?;

        let existing = InspectionMedia::find()
            .filter(inspection_media::Column::CheckInOutId.eq(check_in_out_id))
            .one(&*self.db)
            .await?;

        match existing {
            Some(row) => {
                let mut model: inspection_media::ActiveModel = row.into();
                model.media = Set(media);
                model.updated_at = Set(now);
                model.update(&*self.db).await?;
            }
            None => {
                let model = inspection_media::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    check_in_out_id: Set(check_in_out_id),
                    media: Set(media),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                model.insert(&*self.db).await?;
            }
        }

        Ok(())
    }

    async fn require_record(&self, id: Uuid) -> Result<check_in_out::Model, RepositoryError> {
        CheckInOut::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                RepositoryError::NotFound(format!("Check-in/out record {} not found", id))
            })
    }

    async fn insert_service_item(
        &self,
        check_in_out_id: Uuid,
        input: &ServiceItemInput,
        position: i32,
    ) -> Result<service_item::Model, RepositoryError> {
        let now = Utc::now().fixed_offset();
        let model = service_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            check_in_out_id: Set(check_in_out_id),
            description: Set(input.description.clone()),
            cost: Set(input.cost),
            completed: Set(input.completed),
            completed_at: Set(input.completed.then_some(now)),
            position: Set(position),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let inserted = model.insert(&*self.db).await?;
        Ok(inserted)
    }
}
