//! Error types for the authorization engine
//!
//! Every denial is a typed value carrying a wire code and a human-readable
//! reason. Routes surface the reason verbatim and map the code to an HTTP
//! status; the engine itself never performs I/O and never retries.

use thiserror::Error;

/// Result type alias for authorization operations
pub type Result<T> = std::result::Result<T, AuthzError>;

/// A decision returned by the facade entry points: `Ok(())` allows the
/// operation, the error carries the denial kind and reason.
pub type Decision = Result<()>;

/// Closed taxonomy of authorization failures
///
/// `Unauthorized` exists for completeness of the wire protocol; identity
/// verification happens upstream and this engine only consumes verified
/// claims, so it never produces that variant itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// Missing or invalid identity (produced upstream of this engine)
    #[error("missing or invalid credentials")]
    Unauthorized,

    /// The permission table denies the requested operation
    #[error("{reason}")]
    Forbidden { reason: String },

    /// The caller's scope excludes the requested or target ids
    #[error("{reason}")]
    InvalidScope { reason: String },

    /// Malformed input: negative ids, cross-tenant workspace list,
    /// unresolvable tenant
    #[error("{reason}")]
    Validation { reason: String },

    /// A row the resolver was asked about does not exist
    #[error("{resource} not found")]
    NotFound { resource: String },
}

/// Wire codes the gateway's error response schema declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthorized,
    Forbidden,
    InvalidScope,
    ValidationError,
    NotFound,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::InvalidScope => "INVALID_SCOPE",
            ErrorKind::ValidationError => "VALIDATION_ERROR",
            ErrorKind::NotFound => "NOT_FOUND",
        }
    }
}

impl AuthzError {
    pub fn forbidden(reason: impl Into<String>) -> Self {
        AuthzError::Forbidden {
            reason: reason.into(),
        }
    }

    pub fn invalid_scope(reason: impl Into<String>) -> Self {
        AuthzError::InvalidScope {
            reason: reason.into(),
        }
    }

    pub fn validation(reason: impl Into<String>) -> Self {
        AuthzError::Validation {
            reason: reason.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        AuthzError::NotFound {
            resource: resource.into(),
        }
    }

    /// Returns the wire code for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthzError::Unauthorized => ErrorKind::Unauthorized,
            AuthzError::Forbidden { .. } => ErrorKind::Forbidden,
            AuthzError::InvalidScope { .. } => ErrorKind::InvalidScope,
            AuthzError::Validation { .. } => ErrorKind::ValidationError,
            AuthzError::NotFound { .. } => ErrorKind::NotFound,
        }
    }

    /// HTTP status the gateway maps this error to
    pub fn http_status(&self) -> u16 {
        match self {
            AuthzError::Unauthorized => 401,
            AuthzError::Forbidden { .. } | AuthzError::InvalidScope { .. } => 403,
            AuthzError::Validation { .. } => 400,
            AuthzError::NotFound { .. } => 404,
        }
    }
}
