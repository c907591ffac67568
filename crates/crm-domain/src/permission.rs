//! Permission evaluation and the presentation gate built on top of it.
//!
//! A permission is a string such as `leads.read`. A caller holds a
//! [`PermissionSet`]; a [`Requirement`] is checked against it. When no
//! requirement is given access is granted (the gate fails open).

use std::collections::BTreeSet;

use serde::Serialize;

use crate::entity::ENTITIES;
use crate::user::UserRole;

pub const ACTION_READ: &str = "read";
pub const ACTION_CREATE: &str = "create";
pub const ACTION_UPDATE: &str = "update";
pub const ACTION_DELETE: &str = "delete";

pub const DASHBOARD_VIEW: &str = "dashboard.view";
pub const USERS_MANAGE: &str = "users.manage";

/// Text of the fixed panel shown by [`Denial::AccessDenied`].
pub const ACCESS_DENIED_MESSAGE: &str = "You don't have permission to access this resource.";

/// Build the permission name for an action on an entity route segment.
pub fn permission(entity: &str, action: &str) -> String {
    format!("{entity}.{action}")
}

/// Permissions granted to a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<String>);

impl PermissionSet {
    pub fn new<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(permissions.into_iter().map(Into::into).collect())
    }

    /// Default grants for a role.
    ///
    /// Every role reads every entity and writes the entities its role may
    /// write. Deleting needs manager or above.
    pub fn for_role(role: UserRole) -> Self {
        let mut granted = BTreeSet::new();
        granted.insert(DASHBOARD_VIEW.to_owned());
        if role >= UserRole::Admin {
            granted.insert(USERS_MANAGE.to_owned());
        }
        for entity in ENTITIES {
            granted.insert(permission(entity.name, ACTION_READ));
            if !entity.can_write(role) {
                continue;
            }
            granted.insert(permission(entity.name, ACTION_CREATE));
            granted.insert(permission(entity.name, ACTION_UPDATE));
            if role >= UserRole::Manager {
                granted.insert(permission(entity.name, ACTION_DELETE));
            }
        }
        Self(granted)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.0.contains(permission)
    }

    /// True when at least one of `permissions` is granted. False for an empty slice.
    pub fn has_any_permission<S: AsRef<str>>(&self, permissions: &[S]) -> bool {
        permissions.iter().any(|p| self.has_permission(p.as_ref()))
    }

    /// True when every one of `permissions` is granted. True for an empty slice.
    pub fn has_all_permissions<S: AsRef<str>>(&self, permissions: &[S]) -> bool {
        permissions.iter().all(|p| self.has_permission(p.as_ref()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// What a gate demands of the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    None,
    Single(String),
    AnyOf(Vec<String>),
    AllOf(Vec<String>),
}

impl Requirement {
    /// Build from gate options. A single permission wins over a list; an
    /// empty list counts as no requirement.
    pub fn from_options(
        permission: Option<String>,
        permissions: Vec<String>,
        require_all: bool,
    ) -> Self {
        match permission {
            Some(p) => Self::Single(p),
            None if permissions.is_empty() => Self::None,
            None if require_all => Self::AllOf(permissions),
            None => Self::AnyOf(permissions),
        }
    }

    pub fn is_satisfied_by(&self, granted: &PermissionSet) -> bool {
        match self {
            Self::None => true,
            Self::Single(p) => granted.has_permission(p),
            Self::AnyOf(ps) => granted.has_any_permission(ps.as_slice()),
            Self::AllOf(ps) => granted.has_all_permissions(ps.as_slice()),
        }
    }
}

/// What to show when the requirement is not met.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial<T> {
    Hide,
    Fallback(T),
    AccessDenied,
}

/// Outcome of evaluating a [`Gate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered<T> {
    Content(T),
    Nothing,
    Fallback(T),
    AccessDenied,
}

/// Conditionally exposes content based on the caller's permissions.
#[derive(Debug, Clone)]
pub struct Gate<T> {
    requirement: Requirement,
    denial: Denial<T>,
}

impl<T> Gate<T> {
    /// A gate that hides its content on denial.
    pub fn new(requirement: Requirement) -> Self {
        Self {
            requirement,
            denial: Denial::Hide,
        }
    }

    pub fn with_fallback(mut self, fallback: T) -> Self {
        self.denial = Denial::Fallback(fallback);
        self
    }

    pub fn with_access_denied(mut self) -> Self {
        self.denial = Denial::AccessDenied;
        self
    }

    pub fn allows(&self, granted: &PermissionSet) -> bool {
        self.requirement.is_satisfied_by(granted)
    }

    pub fn render(self, granted: &PermissionSet, content: T) -> Rendered<T> {
        if self.allows(granted) {
            return Rendered::Content(content);
        }
        match self.denial {
            Denial::Hide => Rendered::Nothing,
            Denial::Fallback(fallback) => Rendered::Fallback(fallback),
            Denial::AccessDenied => Rendered::AccessDenied,
        }
    }
}
