//! Error types and conversion into `tonic::Status`.
//!
//! Resolution failures are infrastructure problems, not authorization
//! decisions, and are surfaced as `INTERNAL`:
//!
//! | ScopeError | gRPC Status |
//! |------------|-------------|
//! | `MalformedMethodName` | `INTERNAL` |
//! | `ServiceNotFound` | `INTERNAL` |
//! | `NotAService` | `INTERNAL` |
//! | `MethodNotFound` | `INTERNAL` |
//! | `Cancelled` | `CANCELLED` |
//!
//! An authorization denial never appears here: the validator's own
//! `Status` is returned to the transport verbatim.

use thiserror::Error;
use tonic::Status;

/// Failures raised while resolving the scopes required for a call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScopeError {
    /// The call identifier does not have the `/package.Service/Method`
    /// shape. Indicates a transport or routing bug; not retryable.
    #[error("invalid full method name: {0}")]
    MalformedMethodName(String),

    /// No descriptor is registered under the requested service name.
    #[error("failed to find service descriptor: {0}")]
    ServiceNotFound(String),

    /// A descriptor is registered under the name, but it is not a service.
    #[error("descriptor is not of a service: {0}")]
    NotAService(String),

    /// The service exists but has no method with the requested name.
    #[error("method not found: {method} on service {service}")]
    MethodNotFound {
        /// Fully-qualified service name that was looked up.
        service: String,
        /// Bare method name that was not found.
        method: String,
    },

    /// The call ended before scope validation completed.
    #[error("call canceled before scope validation completed")]
    Cancelled,
}

impl ScopeError {
    /// Whether this error came out of the schema registry lookup, as
    /// opposed to identifier parsing or cancellation.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            ScopeError::ServiceNotFound(_)
                | ScopeError::NotAService(_)
                | ScopeError::MethodNotFound { .. }
        )
    }
}

/// Extension trait for converting types into `tonic::Status`.
pub trait IntoStatus {
    /// Convert into a `tonic::Status`.
    fn into_status(self) -> Status;
}

impl IntoStatus for ScopeError {
    fn into_status(self) -> Status {
        match &self {
            ScopeError::Cancelled => Status::cancelled(self.to_string()),
            _ => Status::internal(format!("failed to resolve method scopes: {}", self)),
        }
    }
}

impl From<ScopeError> for Status {
    fn from(err: ScopeError) -> Self {
        err.into_status()
    }
}
