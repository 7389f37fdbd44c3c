//! Scope module: wildcard-aware id sets and scope resolution
//!
//! Caller scope, query filters, and stored resource scope all share one
//! convention: the id `0` matches every id in its dimension. This module
//! centralizes that invariant in [`ScopeSet`] and provides:
//! - caller scope derivation from token claims
//! - query-filter intersection with the deliberate implicit/explicit
//!   asymmetry
//! - write-time scope-selection validation
//! - target-scope validation for fetched resource rows

mod resolver;
mod target;
mod types;

pub use resolver::{
    resolve_allowed_ids, resolve_caller_scope, resolve_query_scope, validate_scope_selection,
    QueryFilter, QueryScope, ResolvedIds,
};
pub use target::{resource_scope_ids, validate_target_scope, ResourceScope};
pub use types::ScopeSet;
