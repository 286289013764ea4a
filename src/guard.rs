//! Tenant/role authorization, applied uniformly before every operation.
//!
//! Membership resolution prefers the claims attached to the caller's token
//! and falls back to the persisted user record when the token carries none.
//! The decision itself is a pure comparison so it can be tested without a
//! database.

use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::UserRole;
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// Resolved tenant membership for a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Membership {
    pub tenant_id: Uuid,
    pub role: UserRole,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Denial {
    /// Caller belongs to a different tenant than the one it targets
    TenantMismatch,
    /// Caller's role is not in the operation's allow-list
    RoleNotAllowed,
}

impl Denial {
    fn message(&self) -> &'static str {
        match self {
            Denial::TenantMismatch => "Caller is not a member of the requested tenant",
            Denial::RoleNotAllowed => "Caller's role does not permit this operation",
        }
    }
}

/// Pure authorization decision: tenant comparison plus optional role allow-list
pub fn check(
    membership: Membership,
    target_tenant: Uuid,
    required_roles: Option<&[UserRole]>,
) -> Result<(), Denial> {
    if membership.tenant_id != target_tenant {
        return Err(Denial::TenantMismatch);
    }

    if let Some(roles) = required_roles {
        if !roles.contains(&membership.role) {
            return Err(Denial::RoleNotAllowed);
        }
    }

    Ok(())
}

/// Authorize `caller` against `target_tenant`, optionally requiring the
/// caller's role to be within `required_roles`.
///
/// Returns the resolved membership so handlers can make follow-up decisions
/// (e.g. self-or-admin checks) without resolving twice.
pub async fn authorize(
    pool: &PgPool,
    caller: &AuthUser,
    target_tenant: Uuid,
    required_roles: Option<&[UserRole]>,
) -> Result<Membership, ApiError> {
    let membership = resolve_membership(pool, caller).await?;

    check(membership, target_tenant, required_roles).map_err(|denial| {
        tracing::warn!(
            user_id = %caller.user_id,
            target_tenant = %target_tenant,
            "authorization denied: {:?}",
            denial
        );
        ApiError::permission_denied(denial.message())
    })?;

    Ok(membership)
}

/// Claims first, persisted record as fallback. An inactive or missing user
/// record resolves to no membership at all.
async fn resolve_membership(pool: &PgPool, caller: &AuthUser) -> Result<Membership, ApiError> {
    if let (Some(tenant_id), Some(role)) = (caller.tenant_id, caller.role) {
        return Ok(Membership { tenant_id, role });
    }

    let row: Option<(Uuid, UserRole)> =
        sqlx::query_as("SELECT tenant_id, role FROM users WHERE id = $1 AND is_active = true")
            .bind(caller.user_id)
            .fetch_optional(pool)
            .await?;

    row.map(|(tenant_id, role)| Membership { tenant_id, role })
        .ok_or_else(|| ApiError::permission_denied("Caller has no active membership"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn membership(role: UserRole) -> (Membership, Uuid) {
        let tenant = Uuid::new_v4();
        (Membership { tenant_id: tenant, role }, tenant)
    }

    #[test]
    fn same_tenant_no_role_requirement_passes() {
        let (m, tenant) = membership(UserRole::Sales);
        assert_eq!(check(m, tenant, None), Ok(()));
    }

    #[test]
    fn foreign_tenant_is_denied_regardless_of_role() {
        let (m, _) = membership(UserRole::Admin);
        assert_eq!(check(m, Uuid::new_v4(), None), Err(Denial::TenantMismatch));
    }

    #[test]
    fn role_allow_list_is_enforced() {
        let (m, tenant) = membership(UserRole::Sales);
        assert_eq!(
            check(m, tenant, Some(&[UserRole::Admin])),
            Err(Denial::RoleNotAllowed)
        );

        let (m, tenant) = membership(UserRole::Admin);
        assert_eq!(check(m, tenant, Some(&[UserRole::Admin])), Ok(()));
    }

    #[test]
    fn tenant_mismatch_wins_over_role_check() {
        let (m, _) = membership(UserRole::Admin);
        assert_eq!(
            check(m, Uuid::new_v4(), Some(&[UserRole::Admin])),
            Err(Denial::TenantMismatch)
        );
    }
}
