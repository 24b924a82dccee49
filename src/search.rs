//! # Global Search
//!
//! Free-text matching for the top-bar search: a lowercased query matches a
//! record when it is a substring of any of a fixed set of fields. Results keep
//! source order and are capped per entity (customers 3, vehicles 20); there is
//! no relevance scoring.

use crate::models::{customer, vehicle};

/// Maximum customer rows returned per query.
pub const CUSTOMER_RESULT_CAP: usize = 3;

/// Maximum vehicle rows returned per query.
pub const VEHICLE_RESULT_CAP: usize = 20;

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn opt_contains(haystack: Option<&str>, needle: &str) -> bool {
    haystack.map(|value| contains(value, needle)).unwrap_or(false)
}

/// Whether a customer matches the (already lowercased) query.
fn customer_matches(customer: &customer::Model, needle: &str) -> bool {
    let full_name = format!("{} {}", customer.first_name, customer.last_name);
    contains(&full_name, needle)
        || contains(&customer.email, needle)
        || opt_contains(customer.phone.as_deref(), needle)
        || contains(&customer.storage_location, needle)
}

/// Whether a vehicle matches the (already lowercased) query.
fn vehicle_matches(vehicle: &vehicle::Model, needle: &str) -> bool {
    contains(&vehicle.make, needle)
        || contains(&vehicle.model, needle)
        || contains(&vehicle.year.to_string(), needle)
        || opt_contains(vehicle.vin.as_deref(), needle)
        || opt_contains(vehicle.license_plate.as_deref(), needle)
        || opt_contains(vehicle.color.as_deref(), needle)
}

/// Filters customers by query, capped at [`CUSTOMER_RESULT_CAP`], in source
/// order. A blank query matches nothing.
pub fn search_customers<'a>(
    customers: &'a [customer::Model],
    query: &str,
) -> Vec<&'a customer::Model> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    customers
        .iter()
        .filter(|candidate| customer_matches(candidate, &needle))
        .take(CUSTOMER_RESULT_CAP)
        .collect()
}

/// Filters vehicles by query, capped at [`VEHICLE_RESULT_CAP`], in source
/// order. A blank query matches nothing.
pub fn search_vehicles<'a>(
    vehicles: &'a [vehicle::Model],
    query: &str,
) -> Vec<&'a vehicle::Model> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    vehicles
        .iter()
        .filter(|candidate| vehicle_matches(candidate, &needle))
        .take(VEHICLE_RESULT_CAP)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::customer::{CustomerType, MembershipLevel};
    use crate::models::vehicle::BatteryType;
    use chrono::Utc;
    use uuid::Uuid;

    fn customer(first: &str, last: &str, email: &str, phone: &str) -> customer::Model {
        customer::Model {
            id: Uuid::new_v4(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            customer_type: CustomerType::Individual,
            membership_level: MembershipLevel::Basic,
            email: email.to_string(),
            phone: Some(phone.to_string()),
            street: None,
            city: None,
            state: None,
            zip: None,
            storage_location: "Building C - Standard, Member Wing".to_string(),
            storage_spots: 1,
            storage_rows: None,
            monthly_price: None,
            password_hash: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn vehicle(make: &str, model: &str, plate: &str) -> vehicle::Model {
        vehicle::Model {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            year: 1967,
            make: make.to_string(),
            model: model.to_string(),
            vin: Some("1FTYR10D99PB12345".to_string()),
            license_plate: Some(plate.to_string()),
            color: Some("Red".to_string()),
            market_value: None,
            odometer: 42_000,
            fuel_level: 80,
            battery_type: BatteryType::LeadAcid,
            storage_location: None,
            insurance_required: false,
            insurance_amount: None,
            registration_state: None,
            registration_expires: None,
            default_front_psi: None,
            default_rear_psi: None,
            preferred_front_psi: None,
            preferred_rear_psi: None,
            last_service_date: None,
            next_service_date: None,
            service_interval_months: None,
            maintenance_notes: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn phone_fragments_match_customers() {
        let customers = vec![
            customer("Ana", "Lee", "ana@example.com", "(805) 795-6808"),
            customer("Bob", "Ng", "bob@example.com", "(212) 555-0100"),
        ];

        let hits = search_customers(&customers, "805");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].first_name, "Ana");
    }

    #[test]
    fn unmatched_query_returns_empty() {
        let customers = vec![customer("Ana", "Lee", "ana@example.com", "(805) 795-6808")];
        assert!(search_customers(&customers, "zzz").is_empty());
        assert!(search_vehicles(&[], "zzz").is_empty());
    }

    #[test]
    fn matching_is_case_insensitive_over_names() {
        let customers = vec![customer("Ana", "Lee", "ana@example.com", "555")];
        assert_eq!(search_customers(&customers, "ana lee").len(), 1);
        assert_eq!(search_customers(&customers, "ANA").len(), 1);
    }

    #[test]
    fn customer_results_cap_at_three_in_source_order() {
        let customers: Vec<_> = (0..6)
            .map(|i| customer(&format!("Match{i}"), "Smith", "x@example.com", "555"))
            .collect();

        let hits = search_customers(&customers, "smith");
        assert_eq!(hits.len(), CUSTOMER_RESULT_CAP);
        assert_eq!(hits[0].first_name, "Match0");
        assert_eq!(hits[2].first_name, "Match2");
    }

    #[test]
    fn vehicle_results_cap_at_twenty() {
        let vehicles: Vec<_> = (0..25)
            .map(|i| vehicle("Porsche", "911", &format!("PLATE{i}")))
            .collect();
        assert_eq!(search_vehicles(&vehicles, "porsche").len(), VEHICLE_RESULT_CAP);
    }

    #[test]
    fn vehicles_match_on_plate_and_vin() {
        let vehicles = vec![vehicle("Ford", "Bronco", "8ABC123")];
        assert_eq!(search_vehicles(&vehicles, "8abc").len(), 1);
        assert_eq!(search_vehicles(&vehicles, "1ftyr").len(), 1);
        assert_eq!(search_vehicles(&vehicles, "1967").len(), 1);
    }

    #[test]
    fn blank_query_matches_nothing() {
        let customers = vec![customer("Ana", "Lee", "ana@example.com", "555")];
        assert!(search_customers(&customers, "   ").is_empty());
    }
}
