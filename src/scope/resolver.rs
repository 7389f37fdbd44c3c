//! Caller scope derivation and query-filter intersection
//!
//! Two distinct empty-input policies live here and must stay distinct:
//! a query that requests no ids silently defaults to the caller's full
//! allowed set, while write-time tenant inference (see `tenant::resolve_tenant`)
//! falls back to the caller's own tenants and fails loudly when ambiguous.

use crate::context::{CallerContext, Claims};
use crate::error::{AuthzError, Decision};

use super::types::ScopeSet;

/// Derives the caller's effective organization and workspace scope from
/// token claims
///
/// Absent, empty, or zero-valued claims normalize to the unrestricted scope,
/// never to the empty set.
pub fn resolve_caller_scope(claims: &Claims) -> (ScopeSet, ScopeSet) {
    (
        ScopeSet::from_claim(&claims.organization_id),
        ScopeSet::from_claim(&claims.workspace_id),
    )
}

/// Outcome of intersecting a requested id filter with an allowed scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIds {
    /// Ids the query may use; `None` means "no filter at all"
    pub ids: Option<Vec<i64>>,
    /// Set when the caller explicitly requested an id outside their scope
    pub invalid: bool,
}

/// Intersects requested ids with an allowed scope
///
/// - an unrestricted scope passes the request through unchanged, even `None`;
/// - no requested ids defaults to the full allowed set ("default to my
///   scope", not "return everything");
/// - otherwise the intersection is returned and `invalid` flags any
///   requested id outside the allowed set. The asymmetry is deliberate:
///   implicit queries degrade gracefully, explicit out-of-scope requests
///   must not leak a false empty success.
pub fn resolve_allowed_ids(allowed: &ScopeSet, requested: Option<&[i64]>) -> ResolvedIds {
    if allowed.is_unrestricted() {
        return ResolvedIds {
            ids: requested.map(<[i64]>::to_vec),
            invalid: false,
        };
    }
    let requested = match requested {
        Some(ids) if !ids.is_empty() => ids,
        _ => {
            return ResolvedIds {
                ids: Some(allowed.to_vec()),
                invalid: false,
            }
        }
    };
    let invalid = requested.iter().any(|id| !allowed.contains(*id));
    let ids = requested
        .iter()
        .copied()
        .filter(|id| allowed.contains(*id))
        .collect();
    ResolvedIds {
        ids: Some(ids),
        invalid,
    }
}

/// Id filters a list query asked for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFilter {
    pub tenant_ids: Option<Vec<i64>>,
    pub organization_ids: Option<Vec<i64>>,
    pub workspace_ids: Option<Vec<i64>>,
}

/// Effective filters for a list query after scope resolution
///
/// `None` in a dimension means the query runs unfiltered there. Routes must
/// turn `invalid_scope` into a 403 instead of running the narrowed query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryScope {
    pub is_super: bool,
    pub tenant_ids: Option<Vec<i64>>,
    pub organization_ids: Option<Vec<i64>>,
    pub workspace_ids: Option<Vec<i64>>,
    pub invalid_scope: bool,
}

/// Intersects a query's requested filters with the caller's scope
///
/// Super callers pass through unfiltered, including the tenant filter that
/// only they may use. Everyone else is pinned to their own tenants and gets
/// the per-dimension [`resolve_allowed_ids`] treatment.
pub fn resolve_query_scope(caller: &CallerContext, filter: &QueryFilter) -> QueryScope {
    if caller.is_super {
        return QueryScope {
            is_super: true,
            tenant_ids: filter.tenant_ids.clone(),
            organization_ids: filter.organization_ids.clone(),
            workspace_ids: filter.workspace_ids.clone(),
            invalid_scope: false,
        };
    }

    let org = resolve_allowed_ids(
        &caller.organization_scope,
        filter.organization_ids.as_deref(),
    );
    let ws = resolve_allowed_ids(&caller.workspace_scope, filter.workspace_ids.as_deref());

    QueryScope {
        is_super: false,
        tenant_ids: Some(caller.tenant_ids.clone()),
        organization_ids: org.ids,
        workspace_ids: ws.ids,
        invalid_scope: org.invalid || ws.invalid,
    }
}

fn check_selection(scope: &ScopeSet, ids: Option<&[i64]>, dimension: &str) -> Decision {
    let ids = match ids {
        Some(ids) if !ids.is_empty() => ids,
        _ => return Ok(()),
    };
    if scope.is_unrestricted() {
        return Ok(());
    }
    if ids.contains(&0) {
        return Err(AuthzError::invalid_scope(format!(
            "{} id 0 is not allowed for this caller",
            dimension
        )));
    }
    if ids.iter().any(|id| !scope.contains(*id)) {
        return Err(AuthzError::invalid_scope(format!(
            "{} id outside the caller's scope",
            dimension
        )));
    }
    Ok(())
}

/// Validates the organization/workspace ids a write wants to assign
///
/// Requested ids must sit inside the caller's scope, and assigning the
/// wildcard `0` requires the caller to hold the wildcard themselves.
pub fn validate_scope_selection(
    caller: &CallerContext,
    organization_ids: Option<&[i64]>,
    workspace_ids: Option<&[i64]>,
) -> Decision {
    if caller.is_super {
        return Ok(());
    }
    check_selection(&caller.organization_scope, organization_ids, "organization")?;
    check_selection(&caller.workspace_scope, workspace_ids, "workspace")?;
    Ok(())
}
