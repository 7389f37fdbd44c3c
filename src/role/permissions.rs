//! Static role-to-permission table and the pattern matcher
//!
//! Permission names are dot-delimited strings (`tenant.sensors.create`).
//! A granted pattern is either an exact name, a prefix pattern ending in
//! `.*`, or the match-all `*`. The table is process-wide read-only data;
//! explicit permission lists on the role claim bypass it entirely.

use super::types::{Role, RoleName};
use crate::context::CallerContext;

const SUPER_PERMISSIONS: &[&str] = &["*"];

const ADMIN_PERMISSIONS: &[&str] = &[
    "tenant.*",
    "analytics.*",
    "telemetry.*",
    "health.*",
    "auth.*",
    "admin.*",
];

const MANAGER_PERMISSIONS: &[&str] = &[
    "tenant.organizations.read",
    "tenant.workspaces.*",
    "tenant.equipments.*",
    "tenant.sensors.*",
    "tenant.alerts.*",
    "tenant.webhooks.*",
    "tenant.limits.read",
    "tenant.usage.read",
    "tenant.alerts.history.read",
    "tenant.users.read",
    "tenant.users.create",
    "tenant.users.update",
    "tenant.users.password",
    "tenant.users.status",
    "analytics.*",
    "health.*",
    "auth.me",
];

const READ_ONLY_PERMISSIONS: &[&str] = &[
    "tenant.organizations.read",
    "tenant.workspaces.read",
    "tenant.equipments.read",
    "tenant.sensors.read",
    "tenant.alerts.read",
    "tenant.webhooks.read",
    "tenant.limits.read",
    "tenant.usage.read",
    "tenant.alerts.history.read",
    "tenant.users.read",
    "analytics.*",
    "health.*",
    "auth.me",
];

const DEVICE_PERMISSIONS: &[&str] = &[
    "auth.device.login",
    "auth.refresh",
    "auth.me",
    "telemetry.bulk",
    "tenant.workspaces.read",
];

/// Permission patterns granted to a canonical role
pub fn role_permissions(name: RoleName) -> &'static [&'static str] {
    match name {
        RoleName::Super => SUPER_PERMISSIONS,
        RoleName::Admin => ADMIN_PERMISSIONS,
        RoleName::Manager => MANAGER_PERMISSIONS,
        RoleName::User | RoleName::Viewer => READ_ONLY_PERMISSIONS,
        RoleName::Device => DEVICE_PERMISSIONS,
    }
}

/// Checks a granted pattern against a requested permission name
///
/// - `*` matches everything
/// - a pattern ending in `.*` matches by prefix (`tenant.sensors.*` matches
///   `tenant.sensors.create` but not `tenant.sensorsx.create`)
/// - anything else must match exactly
pub fn matches_permission(pattern: &str, requested: &str) -> bool {
    if pattern == "*" {
        return true;
    }
    if let Some(stem) = pattern.strip_suffix(".*") {
        let mut prefix = String::with_capacity(stem.len() + 1);
        prefix.push_str(stem);
        prefix.push('.');
        return requested.starts_with(&prefix);
    }
    pattern == requested
}

impl Role {
    /// Patterns in effect for this role: an explicit list verbatim, a named
    /// role's table entry, or nothing
    pub fn effective_permissions(&self) -> Vec<&str> {
        match self {
            Role::Named(name) => role_permissions(*name).to_vec(),
            Role::ExplicitPermissions(patterns) => {
                patterns.iter().map(String::as_str).collect()
            }
            Role::Unknown => Vec::new(),
        }
    }
}

/// Decides whether the caller may perform the named operation
///
/// An empty permission name marks an unguarded operation and always passes.
/// The super role passes everything. `admin.`-prefixed permissions are denied
/// off the platform tenant regardless of the table; this rule is independent
/// defense in front of whatever the role encoding claims to grant.
pub fn has_permission(ctx: &CallerContext, permission: &str) -> bool {
    if permission.is_empty() {
        return true;
    }
    if ctx.is_super || ctx.role.name() == Some(RoleName::Super) {
        return true;
    }
    if permission.starts_with("admin.") && !ctx.is_platform_tenant() {
        return false;
    }
    ctx.role
        .effective_permissions()
        .iter()
        .any(|granted| matches_permission(granted, permission))
}

/// Canonical permission name gating a tenant-administration route
///
/// Mirrors the gateway's route table; `method` is the HTTP verb and `route`
/// the route pattern as registered (e.g. `/users/:id/password`).
pub fn route_permission(method: &str, route: &str) -> Option<&'static str> {
    let name = match (method, route) {
        ("POST", "/organizations") => "tenant.organizations.create",
        ("GET", "/organizations") => "tenant.organizations.read",
        ("PUT", "/organizations/:id") => "tenant.organizations.update",
        ("DELETE", "/organizations/:id") => "tenant.organizations.delete",
        ("POST", "/workspaces") => "tenant.workspaces.create",
        ("GET", "/workspaces") => "tenant.workspaces.read",
        ("PUT", "/workspaces/:id") => "tenant.workspaces.update",
        ("DELETE", "/workspaces/:id") => "tenant.workspaces.delete",
        ("POST", "/equipments") => "tenant.equipments.create",
        ("GET", "/equipments") => "tenant.equipments.read",
        ("PUT", "/equipments/:id") => "tenant.equipments.update",
        ("DELETE", "/equipments/:id") => "tenant.equipments.delete",
        ("POST", "/sensors") => "tenant.sensors.create",
        ("GET", "/sensors") => "tenant.sensors.read",
        ("PUT", "/sensors/:id") => "tenant.sensors.update",
        ("DELETE", "/sensors/:id") => "tenant.sensors.delete",
        ("POST", "/alerts") => "tenant.alerts.create",
        ("GET", "/alerts") => "tenant.alerts.read",
        ("PUT", "/alerts/:id") => "tenant.alerts.update",
        ("DELETE", "/alerts/:id") => "tenant.alerts.delete",
        ("POST", "/webhooks") => "tenant.webhooks.create",
        ("GET", "/webhooks") => "tenant.webhooks.read",
        ("PUT", "/webhooks/:id") => "tenant.webhooks.update",
        ("DELETE", "/webhooks/:id") => "tenant.webhooks.delete",
        ("POST", "/users") => "tenant.users.create",
        ("GET", "/users") => "tenant.users.read",
        ("PUT", "/users/:id") => "tenant.users.update",
        ("PATCH", "/users/:id/password") => "tenant.users.password",
        ("PATCH", "/users/:id/status") => "tenant.users.status",
        ("DELETE", "/users/:id") => "tenant.users.delete",
        ("GET", "/limits") => "tenant.limits.read",
        ("GET", "/usage/daily") => "tenant.usage.read",
        ("GET", "/alerts/history") => "tenant.alerts.history.read",
        _ => return None,
    };
    Some(name)
}
