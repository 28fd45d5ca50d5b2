//! Role/permission evaluation.
//!
//! Answers "may principal P perform action A on resource R?". The
//! resolver itself is a pure predicate over in-memory data; the sparse
//! per-user overrides are loaded by [`queries`] and role permission
//! sets are seeded in [`roles`].

pub mod model;
pub mod queries;
pub mod resolver;
pub mod roles;

pub use model::{Action, Permission, PermissionOverride, Resource};
pub use resolver::{resolve, resolve_for_role};
