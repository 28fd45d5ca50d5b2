//! # parento_core
//!
//! Core domain logic for the Parento advisory backend: token lifecycle,
//! permission resolution, the booking capacity guard, and the database
//! queries backing them.

pub mod auth;
pub mod authz;
pub mod booking;
pub mod db;
pub mod ids;
pub mod migrate;
pub mod models;
