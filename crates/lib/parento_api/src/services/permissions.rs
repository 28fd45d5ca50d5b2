//! Permission checks for handlers.

use parento_core::authz::{self, Action, Resource};
use parento_core::models::auth::TokenClaims;

use crate::AppState;
use crate::error::{AppError, AppResult};

/// Check that the principal may perform `action` on `resource`,
/// consulting per-user overrides before the role bundle. Returns
/// `Forbidden` on denial; the resolver itself never fails.
pub async fn ensure_permission(
    state: &AppState,
    claims: &TokenClaims,
    resource: &str,
    action: Action,
) -> AppResult<()> {
    let overrides = authz::queries::load_overrides(&state.pool, claims.sub).await?;
    let resource = Resource::parse(resource);

    if authz::resolve_for_role(claims.role, &overrides, &resource, action) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Missing permission: {action} on {resource}"
        )))
    }
}
