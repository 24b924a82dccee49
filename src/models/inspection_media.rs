//! Inspection media entity model
//!
//! One row per check-in/out holding the walkaround media captured during
//! intake: a fixed-schema record of named photo slots plus one walkaround
//! video. Each slot is declared single- or multi-valued up front; there is no
//! dynamically-keyed map. Media bytes live in an external object store and
//! are referenced here by URL string only.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "inspection_media")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub check_in_out_id: Uuid,

    /// Serialized [`InspectionPhotos`]
    #[sea_orm(column_type = "JsonBinary")]
    pub media: Json,

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

/// Single-valued photo slots. Attaching replaces the previous reference;
/// removal clears the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SingleSlot {
    Front,
    Rear,
    DriverSide,
    PassengerSide,
    FrontDriverCorner,
    FrontPassengerCorner,
    RearDriverCorner,
    RearPassengerCorner,
    Roof,
    Hood,
    TrunkLid,
    Windshield,
    RearGlass,
    Undercarriage,
    DriverFrontWheel,
    DriverRearWheel,
    PassengerFrontWheel,
    PassengerRearWheel,
    DriverFrontTread,
    DriverRearTread,
    PassengerFrontTread,
    PassengerRearTread,
    Dashboard,
    Odometer,
    FuelGauge,
    DriverSeat,
    PassengerSeat,
    RearSeats,
    Headliner,
    TrunkInterior,
    GloveBox,
    CenterConsole,
    DriverFrontDoorPanel,
    PassengerFrontDoorPanel,
    DriverRearDoorPanel,
    PassengerRearDoorPanel,
    EngineBay,
    Battery,
    VinPlate,
    Keys,
}

/// Multi-valued photo slots. Attaching appends; removing one entry preserves
/// the order of the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MultiSlot {
    ExistingDamage,
    InteriorDamage,
    Documents,
    Additional,
}

/// The fixed-schema inspection photo record. Every slot is an explicit field;
/// absent slots serialize away entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct InspectionPhotos {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rear: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_side: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passenger_side: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_driver_corner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_passenger_corner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rear_driver_corner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rear_passenger_corner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roof: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trunk_lid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windshield: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rear_glass: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub undercarriage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_front_wheel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_rear_wheel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passenger_front_wheel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passenger_rear_wheel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_front_tread: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_rear_tread: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passenger_front_tread: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passenger_rear_tread: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub odometer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_gauge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_seat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passenger_seat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rear_seats: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headliner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trunk_interior: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glove_box: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_console: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_front_door_panel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passenger_front_door_panel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_rear_door_panel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passenger_rear_door_panel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_bay: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vin_plate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub existing_damage: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interior_damage: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional: Vec<String>,

    /// The one walkaround video reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub walkaround_video: Option<String>,
}

impl InspectionPhotos {
    pub fn single(&self, slot: SingleSlot) -> Option<&str> {
        self.single_ref(slot).as_deref()
    }

    /// Sets a single-valued slot, replacing any previous reference.
    pub fn attach_single(&mut self, slot: SingleSlot, url: impl Into<String>) {
        *self.single_mut(slot) = Some(url.into());
    }

    /// Clears a single-valued slot back to empty.
    pub fn clear_single(&mut self, slot: SingleSlot) {
        *self.single_mut(slot) = None;
    }

    pub fn multi(&self, slot: MultiSlot) -> &[String] {
        match slot {
            MultiSlot::ExistingDamage => &self.existing_damage,
            MultiSlot::InteriorDamage => &self.interior_damage,
            MultiSlot::Documents => &self.documents,
            MultiSlot::Additional => &self.additional,
        }
    }

    /// Appends a reference to a multi-valued slot.
    pub fn attach_multi(&mut self, slot: MultiSlot, url: impl Into<String>) {
        self.multi_mut(slot).push(url.into());
    }

    /// Removes the entry at `index` from a multi-valued slot, preserving the
    /// order of the remainder. Returns false when the index is out of range.
    pub fn remove_multi(&mut self, slot: MultiSlot, index: usize) -> bool {
        let entries = self.multi_mut(slot);
        if index < entries.len() {
            entries.remove(index);
            true
        } else {
            false
        }
    }

    /// Total number of attached photo references across all slots.
    pub fn photo_count(&self) -> usize {
        let singles = [
            &self.front,
            &self.rear,
            &self.driver_side,
            &self.passenger_side,
            &self.front_driver_corner,
            &self.front_passenger_corner,
            &self.rear_driver_corner,
            &self.rear_passenger_corner,
            &self.roof,
            &self.hood,
            &self.trunk_lid,
            &self.windshield,
            &self.rear_glass,
            &self.undercarriage,
            &self.driver_front_wheel,
            &self.driver_rear_wheel,
            &self.passenger_front_wheel,
            &self.passenger_rear_wheel,
            &self.driver_front_tread,
            &self.driver_rear_tread,
            &self.passenger_front_tread,
            &self.passenger_rear_tread,
            &self.dashboard,
            &self.odometer,
            &self.fuel_gauge,
            &self.driver_seat,
            &self.passenger_seat,
            &self.rear_seats,
            &self.headliner,
            &self.trunk_interior,
            &self.glove_box,
            &self.center_console,
            &self.driver_front_door_panel,
            &self.passenger_front_door_panel,
            &self.driver_rear_door_panel,
            &self.passenger_rear_door_panel,
            &self.engine_bay,
            &self.battery,
            &self.vin_plate,
            &self.keys,
        ];
        let single_count = singles.iter().filter(|slot| slot.is_some()).count();
        let multi_count = self.existing_damage.len()
            + self.interior_damage.len()
            + self.documents.len()
            + self.additional.len();
        single_count + multi_count
    }

    fn single_ref(&self, slot: SingleSlot) -> &Option<String> {
        match slot {
            SingleSlot::Front => &self.front,
            SingleSlot::Rear => &self.rear,
            SingleSlot::DriverSide => &self.driver_side,
            SingleSlot::PassengerSide => &self.passenger_side,
            SingleSlot::FrontDriverCorner => &self.front_driver_corner,
            SingleSlot::FrontPassengerCorner => &self.front_passenger_corner,
            SingleSlot::RearDriverCorner => &self.rear_driver_corner,
            SingleSlot::RearPassengerCorner => &self.rear_passenger_corner,
            SingleSlot::Roof => &self.roof,
            SingleSlot::Hood => &self.hood,
            SingleSlot::TrunkLid => &self.trunk_lid,
            SingleSlot::Windshield => &self.windshield,
            SingleSlot::RearGlass => &self.rear_glass,
            SingleSlot::Undercarriage => &self.undercarriage,
            SingleSlot::DriverFrontWheel => &self.driver_front_wheel,
            SingleSlot::DriverRearWheel => &self.driver_rear_wheel,
            SingleSlot::PassengerFrontWheel => &self.passenger_front_wheel,
            SingleSlot::PassengerRearWheel => &self.passenger_rear_wheel,
            SingleSlot::DriverFrontTread => &self.driver_front_tread,
            SingleSlot::DriverRearTread => &self.driver_rear_tread,
            SingleSlot::PassengerFrontTread => &self.passenger_front_tread,
            SingleSlot::PassengerRearTread => &self.passenger_rear_tread,
            SingleSlot::Dashboard => &self.dashboard,
            SingleSlot::Odometer => &self.odometer,
            SingleSlot::FuelGauge => &self.fuel_gauge,
            SingleSlot::DriverSeat => &self.driver_seat,
            SingleSlot::PassengerSeat => &self.passenger_seat,
            SingleSlot::RearSeats => &self.rear_seats,
            SingleSlot::Headliner => &self.headliner,
            SingleSlot::TrunkInterior => &self.trunk_interior,
            SingleSlot::GloveBox => &self.glove_box,
            SingleSlot::CenterConsole => &self.center_console,
            SingleSlot::DriverFrontDoorPanel => &self.driver_front_door_panel,
            SingleSlot::PassengerFrontDoorPanel => &self.passenger_front_door_panel,
            SingleSlot::DriverRearDoorPanel => &self.driver_rear_door_panel,
            SingleSlot::PassengerRearDoorPanel => &self.passenger_rear_door_panel,
            SingleSlot::EngineBay => &self.engine_bay,
            SingleSlot::Battery => &self.battery,
            SingleSlot::VinPlate => &self.vin_plate,
            SingleSlot::Keys => &self.keys,
        }
    }

    fn single_mut(&mut self, slot: SingleSlot) -> &mut Option<String> {
        match slot {
            SingleSlot::Front => &mut self.front,
            SingleSlot::Rear => &mut self.rear,
            SingleSlot::DriverSide => &mut self.driver_side,
            SingleSlot::PassengerSide => &mut self.passenger_side,
            SingleSlot::FrontDriverCorner => &mut self.front_driver_corner,
            SingleSlot::FrontPassengerCorner => &mut self.front_passenger_corner,
            SingleSlot::RearDriverCorner => &mut self.rear_driver_corner,
            SingleSlot::RearPassengerCorner => &mut self.rear_passenger_corner,
            SingleSlot::Roof => &mut self.roof,
            SingleSlot::Hood => &mut self.hood,
            SingleSlot::TrunkLid => &mut self.trunk_lid,
            SingleSlot::Windshield => &mut self.windshield,
            SingleSlot::RearGlass => &mut self.rear_glass,
            SingleSlot::Undercarriage => &mut self.undercarriage,
            SingleSlot::DriverFrontWheel => &mut self.driver_front_wheel,
            SingleSlot::DriverRearWheel => &mut self.driver_rear_wheel,
            SingleSlot::PassengerFrontWheel => &mut self.passenger_front_wheel,
            SingleSlot::PassengerRearWheel => &mut self.passenger_rear_wheel,
            SingleSlot::DriverFrontTread => &mut self.driver_front_tread,
            SingleSlot::DriverRearTread => &mut self.driver_rear_tread,
            SingleSlot::PassengerFrontTread => &mut self.passenger_front_tread,
            SingleSlot::PassengerRearTread => &mut self.passenger_rear_tread,
            SingleSlot::Dashboard => &mut self.dashboard,
            SingleSlot::Odometer => &mut self.odometer,
            SingleSlot::FuelGauge => &mut self.fuel_gauge,
            SingleSlot::DriverSeat => &mut self.driver_seat,
            SingleSlot::PassengerSeat => &mut self.passenger_seat,
            SingleSlot::RearSeats => &mut self.rear_seats,
            SingleSlot::Headliner => &mut self.headliner,
            SingleSlot::TrunkInterior => &mut self.trunk_interior,
            SingleSlot::GloveBox => &mut self.glove_box,
            SingleSlot::CenterConsole => &mut self.center_console,
            SingleSlot::DriverFrontDoorPanel => &mut self.driver_front_door_panel,
            SingleSlot::PassengerFrontDoorPanel => &mut self.passenger_front_door_panel,
            SingleSlot::DriverRearDoorPanel => &mut self.driver_rear_door_panel,
            SingleSlot::PassengerRearDoorPanel => &mut self.passenger_rear_door_panel,
            SingleSlot::EngineBay => &mut self.engine_bay,
            SingleSlot::Battery => &mut self.battery,
            SingleSlot::VinPlate => &mut self.vin_plate,
            SingleSlot::Keys => &mut self.keys,
        }
    }

    fn multi_mut(&mut self, slot: MultiSlot) -> &mut Vec<String> {
        match slot {
            MultiSlot::ExistingDamage => &mut self.existing_damage,
            MultiSlot::InteriorDamage => &mut self.interior_damage,
            MultiSlot::Documents => &mut self.documents,
            MultiSlot::Additional => &mut self.additional,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_slot_attach_replaces_and_clear_empties() {
        let mut photos = InspectionPhotos::default();
        photos.attach_single(SingleSlot::Front, "https://cdn/front-1.jpg");
        photos.attach_single(SingleSlot::Front, "https://cdn/front-2.jpg");
        assert_eq!(photos.single(SingleSlot::Front), Some("https://cdn/front-2.jpg"));
        assert_eq!(photos.photo_count(), 1);

        photos.clear_single(SingleSlot::Front);
        assert_eq!(photos.single(SingleSlot::Front), None);
        assert_eq!(photos.photo_count(), 0);
    }

    #[test]
    fn multi_slot_removal_preserves_order() {
        let mut photos = InspectionPhotos::default();
        for url in ["a.jpg", "b.jpg", "c.jpg"] {
            photos.attach_multi(MultiSlot::ExistingDamage, url);
        }

        assert!(photos.remove_multi(MultiSlot::ExistingDamage, 1));
        assert_eq!(photos.multi(MultiSlot::ExistingDamage), ["a.jpg", "c.jpg"]);
        assert!(!photos.remove_multi(MultiSlot::ExistingDamage, 5));
    }

    #[test]
    fn empty_slots_serialize_away() {
        let mut photos = InspectionPhotos::default();
        photos.attach_single(SingleSlot::Odometer, "odo.jpg");
        photos.walkaround_video = Some("walk.mp4".to_string());

        let value = serde_json::to_value(&photos).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["odometer"], "odo.jpg");
        assert_eq!(map["walkaround_video"], "walk.mp4");

        let back: InspectionPhotos = serde_json::from_value(value).unwrap();
        assert_eq!(back, photos);
    }
}
