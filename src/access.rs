//! # Role Gate
//!
//! Access decisions for route rendering. Operator roles form a strict
//! hierarchy (Viewer < Staff < Manager < Admin); the Customer role is a
//! disjoint tier that only ever matches Customer-facing routes, regardless of
//! any numeric comparison.

use crate::error::{ApiError, forbidden};
use crate::models::user::UserRole;

impl UserRole {
    /// Hierarchy level for operator roles. Customer sits outside the
    /// hierarchy and is handled by the explicit carve-out in [`permits`].
    fn level(self) -> u8 {
        match self {
            UserRole::Customer => 0,
            UserRole::Viewer => 1,
            UserRole::Staff => 2,
            UserRole::Manager => 3,
            UserRole::Admin => 4,
        }
    }
}

/// Returns whether `role` may access a route requiring `required`.
///
/// A Customer-role user is denied every non-Customer route even though their
/// numeric level would not be compared at all; this is a deliberate side
/// channel, not a hierarchy rule.
pub fn permits(role: UserRole, required: UserRole) -> bool {
    match (role, required) {
        (UserRole::Customer, UserRole::Customer) => true,
        (UserRole::Customer, _) | (_, UserRole::Customer) => false,
        (role, required) => role.level() >= required.level(),
    }
}

/// Guard used at the top of handlers: 403 when the gate denies.
pub fn require(role: UserRole, required: UserRole) -> Result<(), ApiError> {
    if permits(role, required) {
        Ok(())
    } else {
        tracing::debug!(?role, ?required, "Role gate denied request");
        Err(forbidden(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hierarchy_grants_at_or_above_required_level() {
        assert!(permits(UserRole::Admin, UserRole::Manager));
        assert!(permits(UserRole::Manager, UserRole::Staff));
        assert!(permits(UserRole::Staff, UserRole::Staff));
        assert!(permits(UserRole::Viewer, UserRole::Viewer));
    }

    #[test]
    fn hierarchy_denies_below_required_level() {
        // Distinct denial path from the customer carve-out: plain numeric
        // comparison.
        assert!(!permits(UserRole::Viewer, UserRole::Staff));
        assert!(!permits(UserRole::Staff, UserRole::Manager));
        assert!(!permits(UserRole::Manager, UserRole::Admin));
    }

    #[test]
    fn customer_tier_is_disjoint() {
        // Customer is denied every operator route, even Viewer-level ones.
        assert!(!permits(UserRole::Customer, UserRole::Viewer));
        assert!(!permits(UserRole::Customer, UserRole::Staff));
        assert!(!permits(UserRole::Customer, UserRole::Admin));

        // And operators are denied customer-portal routes, admin included.
        assert!(!permits(UserRole::Admin, UserRole::Customer));
        assert!(!permits(UserRole::Viewer, UserRole::Customer));

        assert!(permits(UserRole::Customer, UserRole::Customer));
    }

    #[test]
    fn require_maps_denial_to_forbidden() {
        assert!(require(UserRole::Staff, UserRole::Staff).is_ok());
        let err = require(UserRole::Customer, UserRole::Staff).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::FORBIDDEN);
    }
}
