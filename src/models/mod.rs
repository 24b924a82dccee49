//! # Data Models
//!
//! This module contains all the data models used throughout the Motorvault
//! CRM API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod authorized_contact;
pub mod authorized_driver;
pub mod check_in_out;
pub mod customer;
pub mod inspection_media;
pub mod service_item;
pub mod user;
pub mod vehicle;

pub use authorized_contact::Entity as AuthorizedContact;
pub use authorized_driver::Entity as AuthorizedDriver;
pub use check_in_out::Entity as CheckInOut;
pub use customer::Entity as Customer;
pub use inspection_media::Entity as InspectionMedia;
pub use service_item::Entity as ServiceItem;
pub use user::Entity as User;
pub use vehicle::Entity as Vehicle;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "motorvault".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
