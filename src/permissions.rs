//! Viewer permission lookup
//!
//! The viewer's role is resolved from the backend. Anything short of a
//! successful lookup (still loading, anonymous, failed query) never grants
//! admin or moderator rights.

use uuid::Uuid;

use crate::api::Backend;
use crate::models::Role;

/// Who is looking at the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    /// The session is still being restored
    Loading,
    /// Nobody is signed in
    Anonymous,
    /// A signed-in user
    SignedIn(Uuid),
}

/// Outcome of a role lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleResolution {
    /// No decision yet
    Unresolved,
    /// The role is known
    Resolved(Role),
    /// The lookup failed
    Failed,
}

impl RoleResolution {
    /// The effective role, or `None` while unresolved
    pub const fn role(&self) -> Option<Role> {
        match self {
            Self::Unresolved => None,
            Self::Resolved(role) => Some(*role),
            Self::Failed => Some(Role::User),
        }
    }
}

/// Permission flags exposed to views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions {
    /// Viewer is an administrator
    pub is_admin: bool,
    /// Viewer is at least a moderator
    pub is_moderator: bool,
    /// The role is still being resolved
    pub loading: bool,
}

impl Permissions {
    /// Still loading, nothing granted
    pub const LOADING: Self = Self {
        is_admin: false,
        is_moderator: false,
        loading: true,
    };
}

impl From<RoleResolution> for Permissions {
    fn from(resolution: RoleResolution) -> Self {
        match resolution.role() {
            None => Self::LOADING,
            Some(role) => Self {
                is_admin: role.is_admin(),
                is_moderator: role.is_moderator(),
                loading: false,
            },
        }
    }
}

/// Resolve the role of `identity` against the backend
pub async fn resolve_role<B: Backend>(identity: Identity, backend: &B) -> RoleResolution {
    match identity {
        Identity::Loading => RoleResolution::Unresolved,
        Identity::Anonymous => RoleResolution::Resolved(Role::User),
        Identity::SignedIn(user_id) => match backend.fetch_role(user_id).await {
            Ok(role) => {
                tracing::debug!(%user_id, %role, "Resolved viewer role");
                RoleResolution::Resolved(role)
            }
            Err(e) => {
                tracing::warn!(%user_id, "Role lookup failed, using least privilege: {}", e);
                RoleResolution::Failed
            }
        },
    }
}

/// Keeps the viewer's permissions in step with their identity
#[derive(Debug)]
pub struct PermissionWatcher {
    identity: Option<Identity>,
    resolution: RoleResolution,
}

impl Default for PermissionWatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PermissionWatcher {
    /// Create a watcher with nothing resolved
    pub const fn new() -> Self {
        Self {
            identity: None,
            resolution: RoleResolution::Unresolved,
        }
    }

    /// Current permissions
    pub fn permissions(&self) -> Permissions {
        self.resolution.into()
    }

    /// Current resolution
    pub const fn resolution(&self) -> RoleResolution {
        self.resolution
    }

    /// Re-resolve if the identity changed since the last call
    pub async fn refresh<B: Backend>(&mut self, identity: Identity, backend: &B) -> Permissions {
        if self.identity != Some(identity) {
            self.identity = Some(identity);
            self.resolution = resolve_role(identity, backend).await;
        }

        self.permissions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{Call, MockBackend};
    use tokio_test::block_on;

    #[test]
    fn test_loading_identity_withholds_decision() {
        let backend = MockBackend::new();
        let perms = block_on(PermissionWatcher::new().refresh(Identity::Loading, &backend));
        assert_eq!(perms, Permissions::LOADING);
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_anonymous_gets_nothing() {
        let backend = MockBackend::new();
        let perms = block_on(PermissionWatcher::new().refresh(Identity::Anonymous, &backend));
        assert!(!perms.loading);
        assert!(!perms.is_admin);
        assert!(!perms.is_moderator);
    }

    #[test]
    fn test_admin_is_also_moderator() {
        let backend = MockBackend {
            role: Some(Role::Admin),
            ..MockBackend::new()
        };
        let user = Uuid::new_v4();
        let perms = block_on(PermissionWatcher::new().refresh(Identity::SignedIn(user), &backend));
        assert!(perms.is_admin);
        assert!(perms.is_moderator);
        assert_eq!(backend.calls(), vec![Call::FetchRole(user)]);
    }

    #[test]
    fn test_lookup_failure_is_least_privilege() {
        let backend = MockBackend::new();
        let mut watcher = PermissionWatcher::new();
        let perms = block_on(watcher.refresh(Identity::SignedIn(Uuid::new_v4()), &backend));

        assert_eq!(watcher.resolution(), RoleResolution::Failed);
        assert!(!perms.loading);
        assert!(!perms.is_admin);
        assert!(!perms.is_moderator);
    }

    #[test]
    fn test_unchanged_identity_is_not_requeried() {
        let backend = MockBackend {
            role: Some(Role::Moderator),
            ..MockBackend::new()
        };
        let user = Identity::SignedIn(Uuid::new_v4());
        let mut watcher = PermissionWatcher::new();

        block_on(watcher.refresh(Identity::Loading, &backend));
        block_on(watcher.refresh(user, &backend));
        let perms = block_on(watcher.refresh(user, &backend));

        assert_eq!(backend.calls().len(), 1);
        assert!(perms.is_moderator);
        assert!(!perms.is_admin);
    }
}
