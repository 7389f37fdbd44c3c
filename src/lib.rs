//! # Tenant authorization engine (tenant-authz)
//!
//! Authorization and scope-resolution engine for a multi-tenant IoT
//! telemetry gateway. For every request it decides (a) whether the caller's
//! role grants the requested operation and (b) which tenant, organization,
//! and workspace rows the caller may read, write, or have a new resource
//! assigned into, reconciling:
//! - a three-level containment hierarchy (tenant → organization → workspace)
//! - several legacy encodings of "role"
//! - the pervasive `0` wildcard convention ("all ids in this dimension")
//!
//! The engine is purely functional and synchronous: it consumes verified
//! token claims and already-fetched rows, and returns typed decisions.
//! Persistence, lookups, and the final SQL write stay with the caller.
//!
//! ## Example
//!
//! ```rust
//! use tenant_authz::{AuthorizationFacade, CallerContext, Claims};
//!
//! let claims: Claims = serde_json::from_value(serde_json::json!({
//!     "tenant_id": 5,
//!     "role": "manager",
//!     "organization_id": [3],
//!     "workspace_id": [9]
//! }))
//! .unwrap();
//!
//! let caller = CallerContext::from_claims(&claims);
//! let facade = AuthorizationFacade::new();
//!
//! assert!(facade.authorize_operation(&caller, "tenant.sensors.create").is_ok());
//! assert!(facade.authorize_operation(&caller, "tenant.organizations.create").is_err());
//! ```

pub mod context;
pub mod error;
pub mod facade;
pub mod role;
pub mod scope;
pub mod tenant;

pub use context::{CallerContext, Claims};
pub use error::{AuthzError, Decision, ErrorKind, Result};
pub use facade::AuthorizationFacade;
pub use role::{Role, RoleName};
pub use scope::{QueryFilter, QueryScope, ResourceScope, ScopeSet};
pub use tenant::{OrganizationRef, PrefetchedDirectory, TenantDirectory, WorkspaceRef};
