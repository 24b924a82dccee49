//! Repository layer
//!
//! Each repository wraps the shared SeaORM connection pool and exposes the
//! storage contract for one aggregate: list, get, create, partial update,
//! delete, plus the child-collection operations that aggregate owns.

pub mod check_in_out;
pub mod customer;
pub mod user;
pub mod vehicle;

pub use check_in_out::CheckInOutRepository;
pub use customer::CustomerRepository;
pub use user::UserRepository;
pub use vehicle::VehicleRepository;
