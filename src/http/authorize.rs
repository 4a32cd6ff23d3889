//! Explicit role-based authorization.
//!
//! Routes declare a [`RolePolicy`] and call `check` against the
//! request's [`AuthContext`]; there is no ambient current-user state
//! and no interception magic.

use crate::error::AuthError;
use crate::http::gate::AuthContext;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleMatch {
    /// Every listed role is required.
    All,
    /// Any one of the listed roles suffices.
    Any,
}

#[derive(Debug, Clone)]
pub struct RolePolicy {
    roles: Vec<String>,
    mode: RoleMatch,
}

impl RolePolicy {
    pub fn any<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RolePolicy {
            roles: roles.into_iter().map(Into::into).collect(),
            mode: RoleMatch::Any,
        }
    }

    pub fn all<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RolePolicy {
            roles: roles.into_iter().map(Into::into).collect(),
            mode: RoleMatch::All,
        }
    }

    /// Deny with [`AuthError::AccessDenied`] when the identity lacks
    /// the required roles.
    pub fn check(&self, ctx: &AuthContext) -> Result<(), AuthError> {
        let granted = match self.mode {
            RoleMatch::All => self.roles.iter().all(|r| ctx.has_role(r)),
            RoleMatch::Any => self.roles.iter().any(|r| ctx.has_role(r)),
        };

        if granted {
            Ok(())
        } else {
            warn!(
                user_id = %ctx.user_id,
                required = ?self.roles,
                mode = ?self.mode,
                "Access denied by role policy"
            );
            Err(AuthError::AccessDenied)
        }
    }
}

/// Resolve the request identity or fail with 401.
pub fn require_auth(ctx: Option<&AuthContext>) -> Result<&AuthContext, AuthError> {
    ctx.ok_or(AuthError::NotAuthenticated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn ctx(roles: &[&str]) -> AuthContext {
        AuthContext {
            user_id: 1,
            email: "user@example.com".to_string(),
            roles: roles.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
        }
    }

    #[test]
    fn test_any_policy() {
        let policy = RolePolicy::any(["ROLE_ADMIN", "ROLE_SUPPORT"]);
        assert!(policy.check(&ctx(&["ROLE_SUPPORT"])).is_ok());
        assert!(matches!(
            policy.check(&ctx(&["ROLE_USER"])),
            Err(AuthError::AccessDenied)
        ));
    }

    #[test]
    fn test_all_policy() {
        let policy = RolePolicy::all(["ROLE_ADMIN", "ROLE_AUDIT"]);
        assert!(policy.check(&ctx(&["ROLE_ADMIN", "ROLE_AUDIT"])).is_ok());
        assert!(policy.check(&ctx(&["ROLE_ADMIN"])).is_err(), "missing one role");
    }

    #[test]
    fn test_any_with_no_roles_listed_denies() {
        let policy = RolePolicy::any(Vec::<String>::new());
        assert!(policy.check(&ctx(&["ROLE_ADMIN"])).is_err());
    }

    #[test]
    fn test_require_auth() {
        let identity = ctx(&[]);
        assert!(require_auth(Some(&identity)).is_ok());
        assert!(matches!(
            require_auth(None),
            Err(AuthError::NotAuthenticated)
        ));
    }
}
