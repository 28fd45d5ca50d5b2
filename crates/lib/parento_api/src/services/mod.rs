//! Service layer — business flows composing `parento_core`.

pub mod auth;
pub mod bookings;
pub mod permissions;
