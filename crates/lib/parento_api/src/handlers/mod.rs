//! Request handlers.

pub mod auth;
pub mod bookings;
pub mod slots;
