//! Request validation
//!
//! Every write endpoint runs its payload through one of these validators
//! before touching a repository. A validator returns a map of field name to
//! message; an empty map means the payload is acceptable. Handlers turn a
//! non-empty map into a 400 `VALIDATION_FAILED` response with the map in the
//! error details.

use base64::Engine;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::repositories::check_in_out::{
    CreateCheckInOutRequest, ServiceItemInput, UpdateCheckInOutRequest,
};
use crate::repositories::customer::{CreateCustomerRequest, UpdateCustomerRequest};
use crate::repositories::user::{CreateUserRequest, UpdateUserRequest};
use crate::repositories::vehicle::{
    AuthorizedDriverInput, CreateVehicleRequest, UpdateVehicleRequest,
};

/// Field name -> human-readable message. BTreeMap keeps output ordering
/// stable for clients and tests.
pub type FieldErrors = BTreeMap<String, String>;

/// Earliest model year the intake form accepts.
pub const MIN_VEHICLE_YEAR: i32 = 1900;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern must compile")
});

fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

fn require_text(errors: &mut FieldErrors, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.insert(field.to_string(), message.to_string());
    }
}

fn check_fuel_level(errors: &mut FieldErrors, field: &str, level: i32) {
    if !(0..=100).contains(&level) {
        errors.insert(
            field.to_string(),
            "Fuel level must be between 0 and 100".to_string(),
        );
    }
}

fn check_non_negative(errors: &mut FieldErrors, field: &str, value: i32, message: &str) {
    if value < 0 {
        errors.insert(field.to_string(), message.to_string());
    }
}

fn check_year(errors: &mut FieldErrors, year: i32, current_year: i32) {
    // Next-model-year vehicles arrive before the calendar year does.
    if year < MIN_VEHICLE_YEAR || year > current_year + 1 {
        errors.insert(
            "year".to_string(),
            format!(
                "Year must be between {} and {}",
                MIN_VEHICLE_YEAR,
                current_year + 1
            ),
        );
    }
}

/// Check that a signature payload is decodable base64, with or without a
/// `data:` URL prefix.
pub fn is_valid_signature(signature: &str) -> bool {
    let payload = match signature.split_once(";base64,") {
        Some((_, payload)) => payload,
        None => signature,
    };
    if payload.trim().is_empty() {
        return false;
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .is_ok()
}

pub fn validate_customer_create(request: &CreateCustomerRequest) -> FieldErrors {
    let mut errors = FieldErrors::new();

    require_text(
        &mut errors,
        "first_name",
        &request.first_name,
        "First name is required",
    );
    require_text(
        &mut errors,
        "last_name",
        &request.last_name,
        "Last name is required",
    );
    require_text(&mut errors, "email", &request.email, "Email is required");
    if !request.email.trim().is_empty() && !is_valid_email(request.email.trim()) {
        errors.insert("email".to_string(), "Email format is invalid".to_string());
    }
    if request.storage_spots < 1 {
        errors.insert(
            "storage_spots".to_string(),
            "At least one storage spot is required".to_string(),
        );
    }
    if let Some(rows) = request.storage_rows {
        if rows < 1 {
            errors.insert(
                "storage_rows".to_string(),
                "Storage rows must be at least 1".to_string(),
            );
        }
    }
    if let Some(price) = request.manual_price {
        if price.is_sign_negative() {
            errors.insert(
                "manual_price".to_string(),
                "Manual price cannot be negative".to_string(),
            );
        }
    }

    errors
}

pub fn validate_customer_update(request: &UpdateCustomerRequest) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if let Some(first_name) = &request.first_name {
        require_text(&mut errors, "first_name", first_name, "First name is required");
    }
    if let Some(last_name) = &request.last_name {
        require_text(&mut errors, "last_name", last_name, "Last name is required");
    }
    if let Some(email) = &request.email {
        if !is_valid_email(email.trim()) {
            errors.insert("email".to_string(), "Email format is invalid".to_string());
        }
    }
    if let Some(spots) = request.storage_spots {
        if spots < 1 {
            errors.insert(
                "storage_spots".to_string(),
                "At least one storage spot is required".to_string(),
            );
        }
    }
    if let Some(price) = request.monthly_price {
        if price.is_sign_negative() {
            errors.insert(
                "monthly_price".to_string(),
                "Monthly price cannot be negative".to_string(),
            );
        }
    }

    errors
}

fn check_drivers(errors: &mut FieldErrors, drivers: &[AuthorizedDriverInput]) {
    if drivers.is_empty() {
        errors.insert(
            "drivers".to_string(),
            "At least one authorized driver is required".to_string(),
        );
        return;
    }
    for (index, driver) in drivers.iter().enumerate() {
        if driver.name.trim().is_empty() {
            errors.insert(
                format!("drivers[{}].name", index),
                "Driver name is required".to_string(),
            );
        }
    }
}

pub fn validate_vehicle_create(request: &CreateVehicleRequest, current_year: i32) -> FieldErrors {
    let mut errors = FieldErrors::new();

    require_text(&mut errors, "make", &request.make, "Make is required");
    require_text(&mut errors, "model", &request.model, "Model is required");
    check_year(&mut errors, request.year, current_year);
    check_fuel_level(&mut errors, "fuel_level", request.fuel_level);
    check_non_negative(
        &mut errors,
        "odometer",
        request.odometer,
        "Odometer cannot be negative",
    );
    check_drivers(&mut errors, &request.drivers);

    if request.insurance_required {
        match request.insurance_amount {
            Some(amount) if amount.is_sign_positive() && !amount.is_zero() => {}
            _ => {
                errors.insert(
                    "insurance_amount".to_string(),
                    "Insurance amount is required when insurance is required".to_string(),
                );
            }
        }
    }

    errors
}

pub fn validate_vehicle_update(request: &UpdateVehicleRequest, current_year: i32) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if let Some(make) = &request.make {
        require_text(&mut errors, "make", make, "Make is required");
    }
    if let Some(model) = &request.model {
        require_text(&mut errors, "model", model, "Model is required");
    }
    if let Some(year) = request.year {
        check_year(&mut errors, year, current_year);
    }
    if let Some(fuel_level) = request.fuel_level {
        check_fuel_level(&mut errors, "fuel_level", fuel_level);
    }
    if let Some(odometer) = request.odometer {
        check_non_negative(&mut errors, "odometer", odometer, "Odometer cannot be negative");
    }
    if let Some(drivers) = &request.drivers {
        check_drivers(&mut errors, drivers);
    }
    if request.insurance_required == Some(true) {
        match request.insurance_amount {
            Some(amount) if amount.is_sign_positive() && !amount.is_zero() => {}
            _ => {
                errors.insert(
                    "insurance_amount".to_string(),
                    "Insurance amount is required when insurance is required".to_string(),
                );
            }
        }
    }

    errors
}

pub fn validate_service_item(errors: &mut FieldErrors, prefix: &str, item: &ServiceItemInput) {
    let field = |name: &str| {
        if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", prefix, name)
        }
    };
    if item.description.trim().is_empty() {
        errors.insert(field("description"), "Description is required".to_string());
    }
    if item.cost.is_sign_negative() {
        errors.insert(field("cost"), "Cost cannot be negative".to_string());
    }
}

pub fn validate_check_in_out_create(request: &CreateCheckInOutRequest) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if let Some(fuel_level) = request.fuel_level {
        check_fuel_level(&mut errors, "fuel_level", fuel_level);
    }
    if let Some(mileage) = request.mileage {
        check_non_negative(&mut errors, "mileage", mileage, "Mileage cannot be negative");
    }
    if let Some(signature) = &request.signature {
        if !is_valid_signature(signature) {
            errors.insert(
                "signature".to_string(),
                "Signature must be a base64-encoded image".to_string(),
            );
        }
    }
    for (index, item) in request.service_items.iter().enumerate() {
        validate_service_item(&mut errors, &format!("service_items[{}]", index), item);
    }

    errors
}

pub fn validate_check_in_out_update(request: &UpdateCheckInOutRequest) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if let Some(fuel_level) = request.fuel_level {
        check_fuel_level(&mut errors, "fuel_level", fuel_level);
    }
    if let Some(mileage) = request.mileage {
        check_non_negative(&mut errors, "mileage", mileage, "Mileage cannot be negative");
    }
    if let Some(signature) = &request.signature {
        if !is_valid_signature(signature) {
            errors.insert(
                "signature".to_string(),
                "Signature must be a base64-encoded image".to_string(),
            );
        }
    }

    errors
}

pub fn validate_user_create(request: &CreateUserRequest) -> FieldErrors {
    let mut errors = FieldErrors::new();

    require_text(
        &mut errors,
        "first_name",
        &request.first_name,
        "First name is required",
    );
    require_text(
        &mut errors,
        "last_name",
        &request.last_name,
        "Last name is required",
    );
    require_text(&mut errors, "email", &request.email, "Email is required");
    if !request.email.trim().is_empty() && !is_valid_email(request.email.trim()) {
        errors.insert("email".to_string(), "Email format is invalid".to_string());
    }

    errors
}

pub fn validate_user_update(request: &UpdateUserRequest) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if let Some(email) = &request.email {
        if !is_valid_email(email.trim()) {
            errors.insert("email".to_string(), "Email format is invalid".to_string());
        }
    }

    errors
}

/// Render field errors as the details value for a 400 response.
pub fn to_details(errors: &FieldErrors) -> serde_json::Value {
    serde_json::to_value(errors).unwrap_or(serde_json::Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::customer::{CustomerType, MembershipLevel};
    use crate::models::vehicle::BatteryType;
    use rust_decimal::Decimal;

    fn customer_request() -> CreateCustomerRequest {
        CreateCustomerRequest {
            first_name: "Ana".to_string(),
            last_name: "Lee".to_string(),
            customer_type: CustomerType::Individual,
            membership_level: MembershipLevel::Premium,
            email: "ana.lee@example.com".to_string(),
            phone: Some("805-555-0101".to_string()),
            street: None,
            city: None,
            state: None,
            zip: None,
            storage_location: None,
            storage_spots: 2,
            storage_rows: None,
            manual_price: None,
        }
    }

    fn vehicle_request() -> CreateVehicleRequest {
        CreateVehicleRequest {
            customer_id: uuid::Uuid::new_v4(),
            year: 1969,
            make: "Chevrolet".to_string(),
            model: "Camaro".to_string(),
            vin: None,
            license_plate: None,
            color: Some("Hugger Orange".to_string()),
            market_value: None,
            odometer: 48_200,
            fuel_level: 80,
            battery_type: BatteryType::LeadAcid,
            storage_location: None,
            insurance_required: false,
            insurance_amount: None,
            registration_state: None,
            registration_expires: None,
            default_front_psi: Some(32),
            default_rear_psi: Some(32),
            preferred_front_psi: None,
            preferred_rear_psi: None,
            last_service_date: None,
            next_service_date: None,
            service_interval_months: None,
            maintenance_notes: None,
            drivers: vec![AuthorizedDriverInput {
                name: "Ana Lee".to_string(),
                phone: None,
                email: None,
                license_number: None,
                relationship: Some("Owner".to_string()),
            }],
            contacts: vec![],
        }
    }

    #[test]
    fn valid_customer_passes() {
        assert!(validate_customer_create(&customer_request()).is_empty());
    }

    #[test]
    fn customer_requires_name_and_email() {
        let mut request = customer_request();
        request.first_name = "  ".to_string();
        request.email = "not-an-email".to_string();

        let errors = validate_customer_create(&request);
        assert_eq!(
            errors.get("first_name").map(String::as_str),
            Some("First name is required")
        );
        assert_eq!(
            errors.get("email").map(String::as_str),
            Some("Email format is invalid")
        );
    }

    #[test]
    fn customer_requires_a_storage_spot() {
        let mut request = customer_request();
        request.storage_spots = 0;
        assert!(validate_customer_create(&request).contains_key("storage_spots"));
    }

    #[test]
    fn valid_vehicle_passes() {
        assert!(validate_vehicle_create(&vehicle_request(), 2026).is_empty());
    }

    #[test]
    fn vehicle_year_bounds() {
        let mut request = vehicle_request();
        request.year = 1899;
        assert!(validate_vehicle_create(&request, 2026).contains_key("year"));

        request.year = 2027; // next model year is fine
        assert!(validate_vehicle_create(&request, 2026).is_empty());

        request.year = 2028;
        assert!(validate_vehicle_create(&request, 2026).contains_key("year"));
    }

    #[test]
    fn vehicle_fuel_level_bounds() {
        let mut request = vehicle_request();
        request.fuel_level = 101;
        assert!(validate_vehicle_create(&request, 2026).contains_key("fuel_level"));
        request.fuel_level = -1;
        assert!(validate_vehicle_create(&request, 2026).contains_key("fuel_level"));
        request.fuel_level = 0;
        assert!(validate_vehicle_create(&request, 2026).is_empty());
    }

    #[test]
    fn vehicle_needs_at_least_one_driver() {
        let mut request = vehicle_request();
        request.drivers.clear();
        let errors = validate_vehicle_create(&request, 2026);
        assert_eq!(
            errors.get("drivers").map(String::as_str),
            Some("At least one authorized driver is required")
        );
    }

    #[test]
    fn insurance_rider_needs_an_amount() {
        let mut request = vehicle_request();
        request.insurance_required = true;
        assert!(validate_vehicle_create(&request, 2026).contains_key("insurance_amount"));

        request.insurance_amount = Some(Decimal::new(250_000, 0));
        assert!(validate_vehicle_create(&request, 2026).is_empty());
    }

    #[test]
    fn driver_replacement_cannot_be_emptied() {
        let request = UpdateVehicleRequest {
            drivers: Some(vec![]),
            ..Default::default()
        };
        assert!(validate_vehicle_update(&request, 2026).contains_key("drivers"));
    }

    #[test]
    fn signature_payloads_must_decode() {
        assert!(is_valid_signature("aGVsbG8="));
        assert!(is_valid_signature("data:image/png;base64,aGVsbG8="));
        assert!(!is_valid_signature(""));
        assert!(!is_valid_signature("data:image/png;base64,"));
        assert!(!is_valid_signature("not base64!!"));
    }

    #[test]
    fn check_in_out_rejects_bad_service_items() {
        let request = CreateCheckInOutRequest {
            vehicle_id: uuid::Uuid::new_v4(),
            customer_id: uuid::Uuid::new_v4(),
            date: chrono::NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            check_type: crate::models::check_in_out::CheckType::CheckIn,
            status: None,
            location: None,
            contact_name: None,
            fuel_level: Some(120),
            mileage: Some(-5),
            tire_pressures: None,
            car_cover: false,
            kill_switch: false,
            startup_directions: None,
            delivery_address: None,
            notes: None,
            signature: None,
            photos: None,
            service_items: vec![ServiceItemInput {
                description: " ".to_string(),
                cost: Decimal::new(-100, 2),
                completed: false,
            }],
        };

        let errors = validate_check_in_out_create(&request);
        assert!(errors.contains_key("fuel_level"));
        assert!(errors.contains_key("mileage"));
        assert!(errors.contains_key("service_items[0].description"));
        assert!(errors.contains_key("service_items[0].cost"));
    }

    #[test]
    fn user_email_is_checked() {
        let request = CreateUserRequest {
            first_name: "Mia".to_string(),
            last_name: "Ford".to_string(),
            email: "mia.ford".to_string(),
            role: crate::models::user::UserRole::Staff,
            customer_id: None,
        };
        assert!(validate_user_create(&request).contains_key("email"));
    }

    #[test]
    fn details_rendering_is_a_json_object() {
        let mut errors = FieldErrors::new();
        errors.insert("make".to_string(), "Make is required".to_string());
        let details = to_details(&errors);
        assert_eq!(details["make"], "Make is required");
    }
}
