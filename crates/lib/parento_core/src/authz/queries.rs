//! Permission-override queries.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::AuthError;

use super::model::{Action, PermissionOverride, Resource};

/// Load the sparse override rows for a user. Expiry is checked at read
/// time by the resolver, not here, so an admin can still list expired
/// entries for audit.
pub async fn load_overrides(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<PermissionOverride>, AuthError> {
    type Row = (
        String,
        String,
        bool,
        Option<DateTime<Utc>>,
        Option<Uuid>,
        DateTime<Utc>,
        Option<String>,
    );

    let rows = sqlx::query_as::<_, Row>(
        "SELECT resource, action, granted, expires_at, granted_by, granted_at, reason \
         FROM permission_overrides WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(
            |(resource, action, granted, expires_at, granted_by, granted_at, reason)| {
                Ok(PermissionOverride {
                    user_id,
                    resource: Resource::parse(&resource),
                    action: action.parse().map_err(AuthError::Internal)?,
                    granted,
                    expires_at,
                    granted_by,
                    granted_at,
                    reason,
                })
            },
        )
        .collect()
}

/// Upsert an override for a user. `granted_by` is the administrator
/// recording the change.
pub async fn upsert_override(pool: &PgPool, ov: &PermissionOverride) -> Result<(), AuthError> {
    sqlx::query(
        "INSERT INTO permission_overrides \
           (user_id, resource, action, granted, expires_at, granted_by, reason) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         ON CONFLICT (user_id, resource, action) DO UPDATE SET \
           granted = EXCLUDED.granted, \
           expires_at = EXCLUDED.expires_at, \
           granted_by = EXCLUDED.granted_by, \
           granted_at = now(), \
           reason = EXCLUDED.reason",
    )
    .bind(ov.user_id)
    .bind(ov.resource.to_string())
    .bind(ov.action.as_str())
    .bind(ov.granted)
    .bind(ov.expires_at)
    .bind(ov.granted_by)
    .bind(&ov.reason)
    .execute(pool)
    .await?;
    Ok(())
}

/// Remove an override.
pub async fn delete_override(
    pool: &PgPool,
    user_id: Uuid,
    resource: &Resource,
    action: Action,
) -> Result<(), AuthError> {
    sqlx::query(
        "DELETE FROM permission_overrides \
         WHERE user_id = $1 AND resource = $2 AND action = $3",
    )
    .bind(user_id)
    .bind(resource.to_string())
    .bind(action.as_str())
    .execute(pool)
    .await?;
    Ok(())
}
