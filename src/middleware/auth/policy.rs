//! Role-based access decisions on top of an established AuthCtx.
//!
//! The gate (access.rs) answers "who is calling"; this module answers "may
//! they call this". Decisions are pure; the middleware wrappers only map a
//! decision onto an HTTP rejection.

use axum::{body::Body, http::Request, middleware::Next, response::Response};

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::Role;

/// Declared requirement of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleRequirement {
    /// Any authenticated identity.
    Authenticated,
    /// Exactly ADMIN. The hierarchy is flat; no role implies another.
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allowed,
    Forbidden,
    Unauthenticated,
}

/// Decide whether `ctx` satisfies `requirement`.
///
/// A missing context normally cannot reach this layer (the gate rejects
/// first), but it is still handled rather than assumed away.
pub fn authorize(ctx: Option<&AuthCtx>, requirement: RoleRequirement) -> AccessDecision {
    let Some(ctx) = ctx else {
        return AccessDecision::Unauthenticated;
    };

    match requirement {
        RoleRequirement::Authenticated => AccessDecision::Allowed,
        RoleRequirement::Admin if ctx.role == Role::Admin => AccessDecision::Allowed,
        RoleRequirement::Admin => AccessDecision::Forbidden,
    }
}

/// route_layer middleware for ADMIN-only subtrees.
pub async fn require_admin(req: Request<Body>, next: Next) -> Result<Response, AppError> {
    match authorize(req.extensions().get::<AuthCtx>(), RoleRequirement::Admin) {
        AccessDecision::Allowed => Ok(next.run(req).await),
        AccessDecision::Forbidden => Err(AppError::Forbidden),
        AccessDecision::Unauthenticated => Err(AppError::Unauthorized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(role: Role) -> AuthCtx {
        AuthCtx::new("alice@x.com".to_string(), role)
    }

    #[test]
    fn no_context_is_unauthenticated_for_any_requirement() {
        assert_eq!(
            authorize(None, RoleRequirement::Authenticated),
            AccessDecision::Unauthenticated
        );
        assert_eq!(
            authorize(None, RoleRequirement::Admin),
            AccessDecision::Unauthenticated
        );
    }

    #[test]
    fn any_role_satisfies_authenticated() {
        for role in [Role::Visitor, Role::Proposer, Role::Admin] {
            assert_eq!(
                authorize(Some(&ctx(role)), RoleRequirement::Authenticated),
                AccessDecision::Allowed
            );
        }
    }

    #[test]
    fn only_admin_satisfies_admin() {
        assert_eq!(
            authorize(Some(&ctx(Role::Admin)), RoleRequirement::Admin),
            AccessDecision::Allowed
        );
        assert_eq!(
            authorize(Some(&ctx(Role::Proposer)), RoleRequirement::Admin),
            AccessDecision::Forbidden
        );
        assert_eq!(
            authorize(Some(&ctx(Role::Visitor)), RoleRequirement::Admin),
            AccessDecision::Forbidden
        );
    }
}
