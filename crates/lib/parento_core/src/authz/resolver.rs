//! The permission resolver.
//!
//! A pure boolean predicate: it never fails, "no permission found"
//! resolves to `false`. Callers translate a `false` into whatever
//! rejection their boundary needs.

use chrono::Utc;

use crate::models::auth::Role;

use super::model::{Action, Permission, PermissionOverride, Resource};
use super::roles::permissions_for;

/// Evaluate whether a principal holding `role_permissions` plus
/// `overrides` may perform `action` on `resource`.
///
/// Overrides win when one applies and has not expired: an explicit
/// denial beats any role grant, an explicit grant beats absence. When
/// both an exact-action row and a `manage` row apply to the resource,
/// the exact one decides, independent of the order the store returned
/// them in. Only without any applicable override are role permissions
/// consulted.
pub fn resolve(
    role_permissions: &[Permission],
    overrides: &[PermissionOverride],
    resource: &Resource,
    action: Action,
) -> bool {
    let now = Utc::now();
    let mut exact: Option<bool> = None;
    let mut manage: Option<bool> = None;
    for ov in overrides {
        if ov.is_expired(now) || !ov.applies_to(resource, action) {
            continue;
        }
        let tier = if ov.action == action {
            &mut exact
        } else {
            &mut manage
        };
        // within a tier, a denial wins
        *tier = Some(tier.unwrap_or(true) && ov.granted);
    }
    if let Some(granted) = exact.or(manage) {
        return granted;
    }

    role_permissions.iter().any(|p| p.grants(resource, action))
}

/// [`resolve`] against a role's seeded permission bundle.
pub fn resolve_for_role(
    role: Role,
    overrides: &[PermissionOverride],
    resource: &Resource,
    action: Action,
) -> bool {
    resolve(&permissions_for(role), overrides, resource, action)
}
