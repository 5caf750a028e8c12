//! Admin-only surface gate

use crate::permissions::Permissions;

/// Placeholder shown while permissions are being resolved
pub const VERIFYING_MESSAGE: &str = "Verifying permissions...";

/// Result of asking the gate to render protected content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome<T> {
    /// Permissions are not known yet; show the placeholder
    Loading(&'static str),
    /// Access granted; the rendered children
    Render(T),
    /// Access denied; navigate to the target instead
    Redirect(String),
}

/// Decision gate in front of admin or moderator content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminGate {
    require_moderator: bool,
    redirect_to: String,
}

impl AdminGate {
    /// Gate that admits admins, and moderators when `require_moderator` is set
    pub fn new(require_moderator: bool) -> Self {
        Self {
            require_moderator,
            redirect_to: "/".to_string(),
        }
    }

    /// Where denied viewers are sent
    pub fn redirect_to(mut self, target: impl Into<String>) -> Self {
        self.redirect_to = target.into();
        self
    }

    /// Whether settled permissions grant access
    pub const fn allows(&self, permissions: &Permissions) -> bool {
        permissions.is_admin || (self.require_moderator && permissions.is_moderator)
    }

    /// Render `children` only if the viewer may see them
    pub fn render<T>(&self, permissions: &Permissions, children: impl FnOnce() -> T) -> GateOutcome<T> {
        if permissions.loading {
            return GateOutcome::Loading(VERIFYING_MESSAGE);
        }

        if self.allows(permissions) {
            GateOutcome::Render(children())
        } else {
            tracing::info!(redirect = %self.redirect_to, "Access denied, redirecting");
            GateOutcome::Redirect(self.redirect_to.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn perms(is_admin: bool, is_moderator: bool) -> Permissions {
        Permissions {
            is_admin,
            is_moderator,
            loading: false,
        }
    }

    #[test]
    fn test_loading_takes_no_decision() {
        let mut rendered = false;
        let outcome = AdminGate::new(false).render(&Permissions::LOADING, || rendered = true);
        assert_eq!(outcome, GateOutcome::Loading(VERIFYING_MESSAGE));
        assert!(!rendered);
    }

    #[test]
    fn test_admin_is_admitted() {
        let outcome = AdminGate::new(false).render(&perms(true, true), || "dashboard");
        assert_eq!(outcome, GateOutcome::Render("dashboard"));
    }

    #[test]
    fn test_moderator_needs_require_moderator() {
        let moderator = perms(false, true);
        assert_eq!(
            AdminGate::new(false).render(&moderator, || "reports"),
            GateOutcome::Redirect("/".to_string())
        );
        assert_eq!(
            AdminGate::new(true).render(&moderator, || "reports"),
            GateOutcome::Render("reports")
        );
    }

    #[test]
    fn test_regular_user_is_redirected() {
        let gate = AdminGate::new(true).redirect_to("/feed");
        assert_eq!(
            gate.render(&perms(false, false), || ()),
            GateOutcome::Redirect("/feed".to_string())
        );
    }
}
