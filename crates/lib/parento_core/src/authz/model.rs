//! Resource/action model for permission evaluation.
//!
//! Resources are dot-segmented hierarchical names (`leads`,
//! `leads.own`, `bookings.all`). They are parsed into segment vectors
//! once, so matching is slice comparison rather than repeated string
//! splitting.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Actions applicable to a resource. `Manage` subsumes every other
/// action on the same or narrower resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    List,
    Manage,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::List => "list",
            Action::Manage => "manage",
        }
    }

    /// Whether a held action satisfies a requested one.
    pub fn satisfies(&self, requested: Action) -> bool {
        *self == Action::Manage || *self == requested
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Action::Create),
            "read" => Ok(Action::Read),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            "list" => Ok(Action::List),
            "manage" => Ok(Action::Manage),
            other => Err(format!("unknown action: {other}")),
        }
    }
}

/// A dot-segmented hierarchical resource name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    segments: Vec<String>,
}

impl Resource {
    /// Parse a dotted name into segments. Empty segments are dropped,
    /// so `"leads..own"` and `"leads.own"` are the same resource.
    pub fn parse(name: &str) -> Self {
        Self {
            segments: name
                .split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// The wildcard resource, matching everything (admin grant).
    pub fn wildcard() -> Self {
        Self {
            segments: vec!["*".to_string()],
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.segments.len() == 1 && self.segments[0] == "*"
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Whether a grant on `self` covers `target`:
    /// - the wildcard covers everything,
    /// - `x.all` covers `x` and every descendant of `x`,
    /// - otherwise `self` covers `target` when it equals `target` or is
    ///   a segment-wise ancestor of it. Never upward: a grant on
    ///   `leads.own` does not cover `leads`.
    pub fn covers(&self, target: &Resource) -> bool {
        if self.is_wildcard() {
            return true;
        }
        if let Some(("all", prefix)) = self.segments.split_last().map(|(l, p)| (l.as_str(), p)) {
            return target.segments.len() >= prefix.len() && target.segments.starts_with(prefix);
        }
        target.segments.starts_with(&self.segments)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl Serialize for Resource {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Resource {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Resource::parse(&name))
    }
}

/// A grantable capability: a resource, an action, and a human-readable
/// description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    pub resource: Resource,
    pub action: Action,
    pub description: String,
}

impl Permission {
    pub fn new(resource: &str, action: Action, description: &str) -> Self {
        Self {
            resource: Resource::parse(resource),
            action,
            description: description.to_string(),
        }
    }

    /// Whether this permission grants `action` on `resource`.
    pub fn grants(&self, resource: &Resource, action: Action) -> bool {
        self.action.satisfies(action) && self.resource.covers(resource)
    }
}

/// Per-user override of a specific permission, with audit fields.
/// Overrides are consulted before role evaluation; expired overrides
/// are treated as absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionOverride {
    pub user_id: Uuid,
    pub resource: Resource,
    pub action: Action,
    /// `true` = explicit grant, `false` = explicit denial. Denial beats
    /// any role-derived grant.
    pub granted: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub granted_by: Option<Uuid>,
    pub granted_at: DateTime<Utc>,
    pub reason: Option<String>,
}

impl PermissionOverride {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    /// Overrides match exactly: the same resource with the same action,
    /// or a `manage` override on the same resource. No hierarchy here.
    pub fn applies_to(&self, resource: &Resource, action: Action) -> bool {
        self.resource == *resource && self.action.satisfies(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_parse_drops_empty_segments() {
        assert_eq!(Resource::parse("leads..own"), Resource::parse("leads.own"));
    }

    #[test]
    fn ancestor_covers_descendant_but_not_upward() {
        let leads = Resource::parse("leads");
        let own = Resource::parse("leads.own");
        assert!(leads.covers(&own));
        assert!(leads.covers(&leads));
        assert!(!own.covers(&leads));
    }

    #[test]
    fn sibling_resources_do_not_cover_each_other() {
        let own = Resource::parse("bookings.own");
        let all = Resource::parse("bookings.all");
        assert!(!own.covers(&all));
    }

    #[test]
    fn all_suffix_covers_parent_and_descendants() {
        let leads_all = Resource::parse("leads.all");
        assert!(leads_all.covers(&Resource::parse("leads")));
        assert!(leads_all.covers(&Resource::parse("leads.own")));
        assert!(leads_all.covers(&Resource::parse("leads.own.notes")));
        assert!(!leads_all.covers(&Resource::parse("documents")));
    }

    #[test]
    fn wildcard_covers_everything() {
        let star = Resource::wildcard();
        assert!(star.covers(&Resource::parse("leads")));
        assert!(star.covers(&Resource::parse("bookings.own")));
    }

    #[test]
    fn manage_satisfies_every_action() {
        for action in [
            Action::Create,
            Action::Read,
            Action::Update,
            Action::Delete,
            Action::List,
            Action::Manage,
        ] {
            assert!(Action::Manage.satisfies(action));
        }
        assert!(!Action::Read.satisfies(Action::Update));
    }

    #[test]
    fn resource_serde_round_trip() {
        let r = Resource::parse("leads.own");
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, "\"leads.own\"");
        assert_eq!(serde_json::from_str::<Resource>(&json).unwrap(), r);
    }
}
