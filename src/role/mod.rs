//! Role model and permission table
//!
//! Normalizes the legacy role encodings into a canonical form and maps
//! canonical roles to their granted permission patterns:
//! - **Named roles**: `super`, `admin`, `manager`, `user`, `viewer`, `device`
//! - **Explicit permission lists**: bypass the static table
//! - **Legacy array/object encodings**: resolved once at ingestion
//!
//! The `0` sentinel inside an array or object role marks the platform super
//! user and is detected independently of role naming.

mod permissions;
mod types;

pub use permissions::{has_permission, matches_permission, role_permissions, route_permission};
pub use types::{
    canonical_role_name, explicit_permissions, has_super_sentinel, normalize_role_payload, Role,
    RoleName,
};
