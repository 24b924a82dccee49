//! # MotorVault Library
//!
//! Core functionality for the MotorVault vehicle storage and service
//! management API: domain models, repositories, HTTP handlers, and the
//! supporting configuration and telemetry plumbing.

pub mod access;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod lifecycle;
pub mod models;
pub mod passwords;
pub mod pricing;
pub mod repositories;
pub mod search;
pub mod seeds;
pub mod server;
pub mod telemetry;
pub mod validation;
pub use migration;
