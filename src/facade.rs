//! Single entry point for route-level authorization
//!
//! Routes go through the facade instead of the lower-level helpers so a
//! check cannot be bypassed by calling one helper and forgetting another.
//! The facade composes the role table, scope resolution, and the target
//! validators; it performs no I/O and returns typed decisions only.

use serde_json::Value;
use tracing::debug;

use crate::context::CallerContext;
use crate::error::{AuthzError, Decision};
use crate::role::{canonical_role_name, has_permission, has_super_sentinel, RoleName};
use crate::scope::{validate_scope_selection, validate_target_scope, ResourceScope};

/// Composes the authorization engine behind two kinds of entry point:
/// the per-request operation gate and the per-row scope checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizationFacade;

impl AuthorizationFacade {
    pub fn new() -> Self {
        Self
    }

    /// Route-level gate, evaluated once per request before any data access
    pub fn authorize_operation(&self, caller: &CallerContext, permission: &str) -> Decision {
        if has_permission(caller, permission) {
            return Ok(());
        }
        debug!(permission, role = ?caller.role, "operation denied");
        Err(AuthzError::forbidden(format!(
            "operation {} is not permitted for this role",
            permission
        )))
    }

    /// Per-row check against an already-fetched resource's scope columns
    ///
    /// The caller must run the subsequent write under the same snapshot used
    /// for the fetch.
    pub fn authorize_resource_access(
        &self,
        caller: &CallerContext,
        resource: &ResourceScope,
    ) -> Decision {
        validate_target_scope(caller, resource).inspect_err(|err| {
            debug!(
                organization_ids = ?resource.organization_ids,
                workspace_ids = ?resource.workspace_ids,
                %err,
                "resource access denied"
            );
        })
    }

    /// Validates the scope values a write wants to assign to a new or moved
    /// resource
    pub fn authorize_write(
        &self,
        caller: &CallerContext,
        organization_ids: Option<&[i64]>,
        workspace_ids: Option<&[i64]>,
    ) -> Decision {
        validate_scope_selection(caller, organization_ids, workspace_ids).inspect_err(|err| {
            debug!(?organization_ids, ?workspace_ids, %err, "write scope denied");
        })
    }

    /// Guards user-management writes beyond the permission table
    ///
    /// `target_role` is the stored role of the user being changed,
    /// `new_role` the role payload being assigned, if any. A manager may not
    /// change or delete an admin, and the super role can never be assigned
    /// through tenant routes.
    pub fn authorize_user_change(
        &self,
        caller: &CallerContext,
        target_role: &Value,
        new_role: Option<&Value>,
    ) -> Decision {
        // explicit-permission roles carry no name and are never manager
        let actor = caller.role.name();
        if actor == Some(RoleName::Manager)
            && canonical_role_name(target_role) == Some(RoleName::Admin)
        {
            debug!("manager attempted to modify an admin user");
            return Err(AuthzError::forbidden("manager cannot modify an admin user"));
        }
        if let Some(role) = new_role {
            if has_super_sentinel(role) {
                debug!("attempt to assign the reserved super role");
                return Err(AuthzError::forbidden(
                    "role reserved for the platform administrator",
                ));
            }
        }
        Ok(())
    }
}
