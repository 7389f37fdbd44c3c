//! Target-scope validation for already-persisted resources
//!
//! Routes fetch the resource row, validate it here, and must perform the
//! subsequent write under the same transaction or snapshot as the read so no
//! mutation slips in between check and use.

use serde_json::Value;

use crate::context::CallerContext;
use crate::error::{AuthzError, Decision};

use super::types::ScopeSet;

/// Normalizes a stored scope column to an id list
///
/// Legacy rows store a scalar; that becomes a one-element list. Absent or
/// empty columns mean the resource applies everywhere (`[0]`).
pub fn resource_scope_ids(value: &Value) -> Vec<i64> {
    fn parse(value: &Value) -> Option<i64> {
        match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
    match value {
        Value::Null => vec![0],
        Value::Array(items) => {
            let parsed: Vec<i64> = items.iter().filter_map(parse).collect();
            if parsed.is_empty() {
                vec![0]
            } else {
                parsed
            }
        }
        other => match parse(other) {
            Some(id) => vec![id],
            None => vec![0],
        },
    }
}

/// Scope columns of a tenant-owned resource row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceScope {
    pub organization_ids: Vec<i64>,
    pub workspace_ids: Vec<i64>,
}

impl ResourceScope {
    pub fn new(organization_ids: Vec<i64>, workspace_ids: Vec<i64>) -> Self {
        Self {
            organization_ids,
            workspace_ids,
        }
    }

    /// Builds from raw row columns, normalizing legacy scalar storage
    pub fn from_columns(organization_id: &Value, workspace_id: &Value) -> Self {
        Self {
            organization_ids: resource_scope_ids(organization_id),
            workspace_ids: resource_scope_ids(workspace_id),
        }
    }
}

fn out_of_scope() -> AuthzError {
    AuthzError::invalid_scope("resource outside the caller's scope")
}

fn check_dimension(target_ids: &[i64], scope: &ScopeSet) -> Decision {
    // A wildcard on the resource side means "applies regardless of which id
    // the caller queries from", not "visible to all": only a caller holding
    // the wildcard themselves may touch a tenant-wide resource.
    if target_ids.contains(&0) && !scope.is_unrestricted() {
        return Err(out_of_scope());
    }
    if !scope.is_unrestricted() && !scope.contains_any(target_ids) {
        return Err(out_of_scope());
    }
    Ok(())
}

/// Validates a fetched resource's scope against the caller
///
/// Both dimensions must pass independently: the resource has to be reachable
/// through its organization ids AND through its workspace ids.
pub fn validate_target_scope(caller: &CallerContext, resource: &ResourceScope) -> Decision {
    if caller.is_super {
        return Ok(());
    }
    check_dimension(&resource.organization_ids, &caller.organization_scope)?;
    check_dimension(&resource.workspace_ids, &caller.workspace_scope)?;
    Ok(())
}
