//! Tenant containment and write-time tenant resolution
//!
//! The containment hierarchy is tenant → organization → workspace. Writes
//! never carry a tenant id directly (except for super callers); the owning
//! tenant is derived from the organization/workspace the resource is
//! assigned into, with ambiguity reported instead of guessed.

mod resolver;

pub use resolver::{
    ensure_workspace_in_scope, resolve_tenant, OrganizationRef, PrefetchedDirectory,
    TenantDirectory, WorkspaceRef,
};
