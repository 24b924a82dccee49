//! Database seeding functionality
//!
//! Populates an empty database at startup: a bootstrap admin account always,
//! and demo customers/vehicles when fixture seeding is enabled. Seeding is
//! idempotent; tables that already hold rows are left untouched.

pub mod fixtures;

pub use fixtures::{insert_user, seed_if_empty};
