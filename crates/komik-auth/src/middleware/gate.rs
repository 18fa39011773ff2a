//! Operation-level authorization policy.
//!
//! Access rules live in one inspectable table instead of being
//! scattered across per-route guards. Each operation names whether it
//! requires authentication and which roles may call it; a single
//! [`PolicyTable::authorize`] check enforces the table.

use crate::error::{AuthError, AuthResult};
use crate::types::{Principal, Role};

/// Rejection message for authenticated callers lacking the required
/// role.
pub const FORBIDDEN_RESOURCE: &str = "You do not have access to this resource";

/// Access rule for one named operation.
#[derive(Debug, Clone, Copy)]
pub struct OperationPolicy {
    /// Operation name, e.g. `"auth.logout"`.
    pub operation: &'static str,

    /// Whether the caller must present a valid access token.
    pub requires_auth: bool,

    /// Roles allowed to call the operation. Empty means any
    /// authenticated caller.
    pub required_roles: &'static [Role],
}

impl OperationPolicy {
    /// A policy open to unauthenticated callers.
    #[must_use]
    pub const fn public(operation: &'static str) -> Self {
        Self {
            operation,
            requires_auth: false,
            required_roles: &[],
        }
    }

    /// A policy requiring any authenticated caller.
    #[must_use]
    pub const fn authenticated(operation: &'static str) -> Self {
        Self {
            operation,
            requires_auth: true,
            required_roles: &[],
        }
    }

    /// A policy requiring one of the given roles.
    #[must_use]
    pub const fn roles(operation: &'static str, required_roles: &'static [Role]) -> Self {
        Self {
            operation,
            requires_auth: true,
            required_roles,
        }
    }
}

/// The full set of operation policies for a deployment.
#[derive(Debug, Clone, Copy)]
pub struct PolicyTable {
    policies: &'static [OperationPolicy],
}

impl PolicyTable {
    /// Creates a table from a static policy list.
    #[must_use]
    pub const fn new(policies: &'static [OperationPolicy]) -> Self {
        Self { policies }
    }

    /// Looks up the policy for an operation.
    #[must_use]
    pub fn policy(&self, operation: &str) -> Option<&OperationPolicy> {
        self.policies.iter().find(|p| p.operation == operation)
    }

    /// Authorizes a caller for an operation.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Internal`] if the operation is not in the table.
    ///   An unlisted operation is a wiring bug, not a client fault.
    /// - [`AuthError::Unauthorized`] if authentication is required and
    ///   no principal is present.
    /// - [`AuthError::Forbidden`] if the principal's role is not among
    ///   the required roles.
    pub fn authorize(&self, operation: &str, principal: Option<&Principal>) -> AuthResult<()> {
        let policy = self.policy(operation).ok_or_else(|| {
            AuthError::internal(format!("no policy registered for operation {operation}"))
        })?;

        if !policy.requires_auth {
            return Ok(());
        }

        let Some(principal) = principal else {
            return Err(AuthError::unauthorized("Authentication required"));
        };

        if !policy.required_roles.is_empty() && !policy.required_roles.contains(&principal.role) {
            tracing::debug!(
                operation,
                user_id = %principal.user_id,
                role = %principal.role,
                "operation denied by role policy"
            );
            return Err(AuthError::forbidden(FORBIDDEN_RESOURCE));
        }

        Ok(())
    }
}
