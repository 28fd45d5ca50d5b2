//! In-process access-token revocation list.
//!
//! Maps a token's `jti` to its natural expiry. An entry is active only
//! while `now` is before that expiry; once the token would have expired
//! anyway the entry is dead weight and gets pruned, lazily on lookup
//! and in bulk via [`RevocationList::cleanup`].
//!
//! This is deliberately process-local state: a restart clears all
//! revocations, and a multi-instance deployment needs a shared store
//! behind the same interface. The list is injected (constructed once at
//! startup, shared via `Arc`) rather than held as a global, so tests
//! get a fresh list and the backing store can be swapped without
//! touching call sites.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

/// Concurrent revocation registry keyed by token id.
#[derive(Debug, Default)]
pub struct RevocationList {
    entries: DashMap<Uuid, DateTime<Utc>>,
}

impl RevocationList {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Record a token id as revoked until its natural expiry.
    pub fn revoke(&self, jti: Uuid, expires_at: DateTime<Utc>) {
        self.entries.insert(jti, expires_at);
    }

    /// Whether a token id has an active revocation entry.
    ///
    /// Expired entries are removed on the way through, so a revoked
    /// token stops costing memory once it would have expired anyway.
    pub fn is_revoked(&self, jti: &Uuid) -> bool {
        let now = Utc::now();
        self.entries.remove_if(jti, |_, expires_at| *expires_at <= now);
        self.entries.contains_key(jti)
    }

    /// Sweep all entries whose recorded expiry has passed.
    pub fn cleanup(&self) {
        let now = Utc::now();
        let before = self.entries.len();
        self.entries.retain(|_, expires_at| now < *expires_at);
        let swept = before.saturating_sub(self.entries.len());
        if swept > 0 {
            debug!(swept, remaining = self.entries.len(), "revocation sweep");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
