//! Per-request caller context built from verified token claims
//!
//! The context is constructed once per request, after JWT verification has
//! already happened upstream, and discarded at response time. It is never
//! persisted or shared across requests. All legacy claim shapes (scalar vs
//! list tenant ids, the various role encodings, scalar vs list scope ids)
//! are normalized here so the rest of the engine works on canonical values.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::role::{has_super_sentinel, Role};
use crate::scope::{resolve_caller_scope, ScopeSet};

/// Verified identity claims as issued at login
///
/// `tenant_id`, `role`, `organization_id` and `workspace_id` keep their wire
/// shape (`serde_json::Value`) because several legacy encodings are still in
/// circulation; they are normalized exactly once in
/// [`CallerContext::from_claims`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub tenant_id: Value,
    #[serde(default)]
    pub role: Value,
    #[serde(default)]
    pub organization_id: Value,
    #[serde(default)]
    pub workspace_id: Value,
    #[serde(default)]
    pub user_type: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub sub: Option<String>,
}

fn parse_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Normalizes a tenant id claim to a list
///
/// Callers may belong to more than one tenant, in which case the claim is a
/// list; a scalar becomes a one-element list and anything unparsable is
/// dropped.
pub fn normalize_tenant_ids(value: &Value) -> Vec<i64> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().filter_map(parse_id).collect(),
        other => parse_id(other).into_iter().collect(),
    }
}

/// Immutable per-request authorization context
#[derive(Debug, Clone)]
pub struct CallerContext {
    /// True only when the role encoding carries the super sentinel
    pub is_super: bool,
    /// Tenants the caller belongs to; usually one
    pub tenant_ids: Vec<i64>,
    /// Role, normalized from whichever legacy encoding the token used
    pub role: Role,
    /// Organization ids the caller may act within
    pub organization_scope: ScopeSet,
    /// Workspace ids the caller may act within
    pub workspace_scope: ScopeSet,
}

impl CallerContext {
    /// Builds the context from verified claims
    pub fn from_claims(claims: &Claims) -> Self {
        let (organization_scope, workspace_scope) = resolve_caller_scope(claims);
        Self {
            is_super: has_super_sentinel(&claims.role),
            tenant_ids: normalize_tenant_ids(&claims.tenant_id),
            role: Role::normalize(&claims.role),
            organization_scope,
            workspace_scope,
        }
    }

    /// Whether the caller may act on rows of the given tenant
    pub fn can_access_tenant(&self, tenant_id: i64) -> bool {
        self.is_super || self.tenant_ids.contains(&tenant_id)
    }

    /// Whether the caller's home tenant is the platform tenant (id `0`)
    ///
    /// Gate for `admin.`-prefixed permissions; a caller spread over several
    /// tenants is never treated as platform staff.
    pub fn is_platform_tenant(&self) -> bool {
        self.tenant_ids == [0]
    }
}
