//! Domain models shared across the Parento crates.

pub mod auth;
pub mod booking;
