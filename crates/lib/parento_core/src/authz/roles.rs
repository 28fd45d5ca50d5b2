//! Seeded role permission sets.

use crate::models::auth::Role;

use super::model::{Action, Permission, Resource};

/// The permission bundle for a role.
///
/// `user` is own-scoped; `junior_advisor` additionally works the shared
/// lead pool; `advisor` manages the whole advisory surface; `admin`
/// holds a wildcard `manage` grant.
pub fn permissions_for(role: Role) -> Vec<Permission> {
    use Action::*;

    match role {
        Role::User => vec![
            Permission::new("bookings.own", Create, "Book an advisory slot"),
            Permission::new("bookings.own", Read, "View own bookings"),
            Permission::new("bookings.own", List, "List own bookings"),
            Permission::new("bookings.own", Update, "Cancel or reschedule own bookings"),
            Permission::new("leads.own", Create, "Submit own inquiry"),
            Permission::new("leads.own", Read, "View own inquiry"),
            Permission::new("documents.own", Create, "Upload own documents"),
            Permission::new("documents.own", Read, "View own documents"),
            Permission::new("documents.own", Delete, "Remove own documents"),
            Permission::new("slots", Read, "View available slots"),
            Permission::new("slots", List, "Browse available slots"),
        ],
        Role::JuniorAdvisor => vec![
            Permission::new("leads.all", Read, "View any lead"),
            Permission::new("leads.all", Update, "Work any lead"),
            Permission::new("bookings.all", Read, "View any booking"),
            Permission::new("bookings.all", List, "List all bookings"),
            Permission::new("slots.own", Manage, "Manage own slots"),
            Permission::new("documents.all", Read, "View client documents"),
            Permission::new("slots", Read, "View available slots"),
            Permission::new("slots", List, "Browse available slots"),
        ],
        Role::Advisor => vec![
            Permission::new("leads", Manage, "Full lead management"),
            Permission::new("bookings", Manage, "Full booking management"),
            Permission::new("slots", Manage, "Full slot management"),
            Permission::new("documents", Manage, "Full document management"),
        ],
        Role::Admin => vec![Permission {
            resource: Resource::wildcard(),
            action: Manage,
            description: "Unrestricted".to_string(),
        }],
    }
}
