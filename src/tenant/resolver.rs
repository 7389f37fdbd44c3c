//! Owning-tenant resolution for writes
//!
//! Tenant id is never supplied directly by non-super callers; at write time
//! it is derived from the organization or workspaces the new resource is
//! assigned into. The resolver never touches the database: routes prefetch
//! the organization and workspace rows involved and hand them over through
//! [`TenantDirectory`].

use indexmap::{IndexMap, IndexSet};

use crate::context::CallerContext;
use crate::error::{AuthzError, Decision, Result};

/// An organization row reduced to its containment chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrganizationRef {
    pub id: i64,
    pub tenant_id: i64,
}

/// A workspace row reduced to its containment chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkspaceRef {
    pub id: i64,
    pub organization_id: i64,
    pub tenant_id: i64,
}

/// Pure lookups over rows the route already fetched
pub trait TenantDirectory {
    fn organization(&self, id: i64) -> Option<OrganizationRef>;
    fn workspace(&self, id: i64) -> Option<WorkspaceRef>;
}

/// Directory backed by prefetched rows
#[derive(Debug, Clone, Default)]
pub struct PrefetchedDirectory {
    organizations: IndexMap<i64, OrganizationRef>,
    workspaces: IndexMap<i64, WorkspaceRef>,
}

impl PrefetchedDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(organizations: Vec<OrganizationRef>, workspaces: Vec<WorkspaceRef>) -> Self {
        Self {
            organizations: organizations.into_iter().map(|org| (org.id, org)).collect(),
            workspaces: workspaces.into_iter().map(|ws| (ws.id, ws)).collect(),
        }
    }

    pub fn insert_organization(&mut self, org: OrganizationRef) {
        self.organizations.insert(org.id, org);
    }

    pub fn insert_workspace(&mut self, ws: WorkspaceRef) {
        self.workspaces.insert(ws.id, ws);
    }
}

impl TenantDirectory for PrefetchedDirectory {
    fn organization(&self, id: i64) -> Option<OrganizationRef> {
        self.organizations.get(&id).copied()
    }

    fn workspace(&self, id: i64) -> Option<WorkspaceRef> {
        self.workspaces.get(&id).copied()
    }
}

/// Resolves the authoritative owning tenant for a write
///
/// In priority order:
/// 1. An explicit organization id wins; any workspace ids given alongside
///    must belong to it.
/// 2. Workspace ids alone must resolve through their organizations to
///    exactly one tenant. A list straddling tenants is rejected; a single
///    write must never span tenants.
/// 3. Neither given: fall back to the caller's own tenants. `0` in the
///    fallback resolves to the platform tenant; a single positive value
///    resolves to itself; anything else is ambiguous and the caller must
///    disambiguate via organization or workspace.
///
/// Ambiguity is always an error; the resolver never picks "the first
/// tenant".
pub fn resolve_tenant(
    directory: &dyn TenantDirectory,
    organization_id: Option<i64>,
    workspace_ids: &[i64],
    fallback_tenant_ids: &[i64],
) -> Result<i64> {
    // 0 is the wildcard, not a real workspace row
    let workspace_ids: Vec<i64> = workspace_ids.iter().copied().filter(|id| *id > 0).collect();

    if let Some(org_id) = organization_id.filter(|id| *id > 0) {
        let org = directory
            .organization(org_id)
            .ok_or_else(|| AuthzError::not_found("organization"))?;
        for ws_id in &workspace_ids {
            match directory.workspace(*ws_id) {
                Some(ws) if ws.organization_id == org_id => {}
                _ => {
                    return Err(AuthzError::validation(
                        "workspace does not belong to the given organization",
                    ))
                }
            }
        }
        return Ok(org.tenant_id);
    }

    if !workspace_ids.is_empty() {
        let mut tenants: IndexSet<i64> = IndexSet::new();
        for ws_id in &workspace_ids {
            let ws = directory
                .workspace(*ws_id)
                .ok_or_else(|| AuthzError::not_found("workspace"))?;
            tenants.insert(ws.tenant_id);
        }
        if tenants.len() != 1 {
            return Err(AuthzError::validation("workspace ids span multiple tenants"));
        }
        return Ok(tenants[0]);
    }

    if fallback_tenant_ids.contains(&0) {
        return Ok(0);
    }
    if let [tenant_id] = fallback_tenant_ids {
        if *tenant_id > 0 {
            return Ok(*tenant_id);
        }
    }
    Err(AuthzError::validation("tenant id could not be resolved"))
}

/// Checks that a fetched workspace row sits inside the caller's scope
///
/// Both the workspace's organization and the workspace itself must be in
/// scope.
pub fn ensure_workspace_in_scope(caller: &CallerContext, workspace: &WorkspaceRef) -> Decision {
    if caller.is_super {
        return Ok(());
    }
    if !caller.organization_scope.contains(workspace.organization_id)
        || !caller.workspace_scope.contains(workspace.id)
    {
        return Err(AuthzError::invalid_scope(
            "workspace outside the caller's scope",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{CallerContext, Claims};
    use serde_json::json;

    fn directory() -> PrefetchedDirectory {
        PrefetchedDirectory::from_rows(
            vec![
                OrganizationRef { id: 1, tenant_id: 7 },
                OrganizationRef { id: 2, tenant_id: 8 },
            ],
            vec![
                WorkspaceRef {
                    id: 10,
                    organization_id: 1,
                    tenant_id: 7,
                },
                WorkspaceRef {
                    id: 11,
                    organization_id: 2,
                    tenant_id: 8,
                },
                WorkspaceRef {
                    id: 12,
                    organization_id: 1,
                    tenant_id: 7,
                },
            ],
        )
    }

    #[test]
    fn test_explicit_organization_wins() {
        let dir = directory();
        assert_eq!(resolve_tenant(&dir, Some(1), &[], &[99]), Ok(7));
        assert_eq!(resolve_tenant(&dir, Some(1), &[10, 12], &[99]), Ok(7));
    }

    #[test]
    fn test_workspace_must_belong_to_organization() {
        let dir = directory();
        assert_eq!(
            resolve_tenant(&dir, Some(1), &[10, 11], &[]),
            Err(AuthzError::validation(
                "workspace does not belong to the given organization"
            ))
        );
    }

    #[test]
    fn test_unknown_organization() {
        let dir = directory();
        assert_eq!(
            resolve_tenant(&dir, Some(99), &[], &[]),
            Err(AuthzError::not_found("organization"))
        );
    }

    #[test]
    fn test_workspaces_resolve_single_tenant() {
        let dir = directory();
        assert_eq!(resolve_tenant(&dir, None, &[10, 12], &[]), Ok(7));
    }

    #[test]
    fn test_workspaces_spanning_tenants_rejected() {
        let dir = directory();
        assert_eq!(
            resolve_tenant(&dir, None, &[10, 11], &[7]),
            Err(AuthzError::validation("workspace ids span multiple tenants"))
        );
    }

    #[test]
    fn test_unknown_workspace() {
        let dir = directory();
        assert_eq!(
            resolve_tenant(&dir, None, &[99], &[]),
            Err(AuthzError::not_found("workspace"))
        );
    }

    #[test]
    fn test_wildcard_workspace_ids_are_ignored() {
        let dir = directory();
        // [0] filters down to nothing, so the fallback applies
        assert_eq!(resolve_tenant(&dir, None, &[0], &[7]), Ok(7));
    }

    #[test]
    fn test_fallback_platform_tenant() {
        let dir = directory();
        assert_eq!(resolve_tenant(&dir, None, &[], &[0]), Ok(0));
        assert_eq!(resolve_tenant(&dir, None, &[], &[0, 7]), Ok(0));
    }

    #[test]
    fn test_fallback_single_tenant() {
        let dir = directory();
        assert_eq!(resolve_tenant(&dir, None, &[], &[7]), Ok(7));
    }

    #[test]
    fn test_fallback_ambiguous_is_an_error() {
        let dir = directory();
        let err = resolve_tenant(&dir, None, &[], &[7, 8]).unwrap_err();
        assert_eq!(err, AuthzError::validation("tenant id could not be resolved"));
        let err = resolve_tenant(&dir, None, &[], &[]).unwrap_err();
        assert_eq!(err, AuthzError::validation("tenant id could not be resolved"));
    }

    #[test]
    fn test_ensure_workspace_in_scope() {
        let ctx = CallerContext::from_claims(&Claims {
            tenant_id: json!(7),
            role: json!("manager"),
            organization_id: json!([1]),
            workspace_id: json!([10]),
            ..Claims::default()
        });
        let dir = directory();
        let in_scope = dir.workspace(10).unwrap();
        assert!(ensure_workspace_in_scope(&ctx, &in_scope).is_ok());

        // same organization, different workspace
        let sibling = dir.workspace(12).unwrap();
        assert!(ensure_workspace_in_scope(&ctx, &sibling).is_err());

        // different organization entirely
        let foreign = dir.workspace(11).unwrap();
        assert!(ensure_workspace_in_scope(&ctx, &foreign).is_err());
    }

    #[test]
    fn test_ensure_workspace_super_bypasses() {
        let ctx = CallerContext::from_claims(&Claims {
            role: json!([0]),
            organization_id: json!([99]),
            workspace_id: json!([99]),
            ..Claims::default()
        });
        let dir = directory();
        assert!(ensure_workspace_in_scope(&ctx, &dir.workspace(11).unwrap()).is_ok());
    }
}
