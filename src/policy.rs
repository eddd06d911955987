//! Capability predicates for the back-office.
//!
//! Every predicate takes `Option<Role>`; `None` stands for "no recognized
//! role" (missing profile, malformed role text, no session) and is denied by
//! all of them. Each predicate spells out its own allowed roles instead of
//! deriving them from a privilege ordering.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::roles::Role;

/// Minimum bar for any back-office view.
pub fn can_access_admin_area(role: Option<Role>) -> bool {
    matches!(role, Some(Role::Owner | Role::Admin | Role::Moderator))
}

/// List, create and edit users (user deletion is a stubbed affordance).
pub fn can_manage_users(role: Option<Role>) -> bool {
    matches!(role, Some(Role::Owner))
}

/// Create and update services, news items and job postings.
pub fn can_edit_content(role: Option<Role>) -> bool {
    matches!(role, Some(Role::Owner | Role::Admin))
}

/// Delete services, news items and job postings.
pub fn can_delete_content(role: Option<Role>) -> bool {
    matches!(role, Some(Role::Owner | Role::Admin))
}

/// Placeholder for a moderator publish workflow that does not exist yet.
/// No route consults it; content publication is gated by `can_edit_content`.
pub fn can_publish_content(role: Option<Role>) -> bool {
    matches!(role, Some(Role::Owner | Role::Admin | Role::Moderator))
}

/// Capability
///
/// Names a single predicate so guards and handlers can ask for it by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    AccessAdminArea,
    ManageUsers,
    EditContent,
    DeleteContent,
    PublishContent,
}

impl Capability {
    pub fn allows(self, role: Option<Role>) -> bool {
        match self {
            Capability::AccessAdminArea => can_access_admin_area(role),
            Capability::ManageUsers => can_manage_users(role),
            Capability::EditContent => can_edit_content(role),
            Capability::DeleteContent => can_delete_content(role),
            Capability::PublishContent => can_publish_content(role),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
    Publish,
}

impl Action {
    /// Value written to `admin_actions.action_type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
            Action::Publish => "publish",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    AdminArea,
    Service,
    News,
    Job,
    User,
}

impl Resource {
    /// Value written to `admin_actions.entity_type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::AdminArea => "admin_area",
            Resource::Service => "service",
            Resource::News => "news",
            Resource::Job => "job",
            Resource::User => "user",
        }
    }
}

/// required_capability
///
/// Maps "action A on resource type T" onto the predicate that governs it.
/// Authorization is role-based only: resources carry no owner linkage.
pub fn required_capability(action: Action, resource: Resource) -> Capability {
    match (resource, action) {
        (Resource::User, _) => Capability::ManageUsers,
        (Resource::AdminArea, _) | (_, Action::View) => Capability::AccessAdminArea,
        (_, Action::Create | Action::Edit) => Capability::EditContent,
        (_, Action::Delete) => Capability::DeleteContent,
        (_, Action::Publish) => Capability::PublishContent,
    }
}

/// permits
///
/// Can `role` perform `action` on `resource`?
pub fn permits(role: Option<Role>, action: Action, resource: Resource) -> bool {
    required_capability(action, resource).allows(role)
}

/// CapabilitySet
///
/// Snapshot of the predicates for one role, returned to the UI so it can hide
/// affordances the caller is not allowed to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CapabilitySet {
    pub can_access_admin_area: bool,
    pub can_manage_users: bool,
    pub can_edit_content: bool,
    pub can_delete_content: bool,
}

impl CapabilitySet {
    pub fn for_role(role: Option<Role>) -> Self {
        Self {
            can_access_admin_area: can_access_admin_area(role),
            can_manage_users: can_manage_users(role),
            can_edit_content: can_edit_content(role),
            can_delete_content: can_delete_content(role),
        }
    }
}
