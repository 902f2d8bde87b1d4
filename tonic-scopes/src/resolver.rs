//! Scope-resolution strategies.
//!
//! Two non-interchangeable strategies produce the required-scope list for a
//! call, behind one [`ScopeResolver`] abstraction so the enforcement hook
//! is written once:
//!
//! - [`SchemaResolver`] reads the annotation attached to the method's
//!   schema, resolved through the injected [`SchemaRegistry`];
//! - [`RequestResolver`] asks the decoded payload itself, via the
//!   [`ScopedRequest`] capability.
//!
//! A deployment configures exactly one of the two per hook.

use std::sync::Arc;

use crate::error::ScopeError;
use crate::identity::MethodIdentity;
use crate::interceptor::UnaryCallInfo;
use crate::schema::SchemaRegistry;

/// Outcome of resolving the scopes required for a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeResolution {
    /// No requirement is declared for this call; validation is bypassed
    /// and the handler runs directly.
    NotApplicable,
    /// Scopes that must pass validation before the handler runs, in
    /// declaration order. The list may be empty: an explicit empty
    /// declaration still invokes the validator.
    Required(Vec<String>),
}

/// A strategy producing the required-scope list for an in-flight call.
pub trait ScopeResolver<Req>: Send + Sync {
    /// Resolve the scopes required for the given call.
    ///
    /// Errors are infrastructure failures (malformed identifier, registry
    /// mismatch), never authorization decisions.
    fn resolve(
        &self,
        info: &UnaryCallInfo<'_>,
        request: &Req,
    ) -> Result<ScopeResolution, ScopeError>;
}

/// Static strategy: the requirement lives in the method's schema.
#[derive(Debug, Clone)]
pub struct SchemaResolver {
    registry: Arc<SchemaRegistry>,
}

impl SchemaResolver {
    /// Create a resolver over the given registry. The registry must be
    /// fully populated before the first call arrives.
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self { registry }
    }

    /// Resolve a wire-format call identifier to its scope requirement.
    pub fn resolve_method(&self, full_method: &str) -> Result<ScopeResolution, ScopeError> {
        let identity = MethodIdentity::parse(full_method)?;
        let method = self.registry.find_method(&identity)?;
        Ok(match method.options().required_scopes() {
            Some(annotation) => ScopeResolution::Required(annotation.scopes().to_vec()),
            None => ScopeResolution::NotApplicable,
        })
    }
}

impl<Req> ScopeResolver<Req> for SchemaResolver {
    fn resolve(
        &self,
        info: &UnaryCallInfo<'_>,
        _request: &Req,
    ) -> Result<ScopeResolution, ScopeError> {
        self.resolve_method(info.full_method)
    }
}

/// Capability for request payloads that declare their own required scopes.
///
/// Implement this on a request type to opt it into the dynamic strategy.
/// The accessor is consulted per instance, so the requirement may be fixed
/// for the type or computed from the payload's fields.
pub trait ScopedRequest {
    /// Scopes required to process this request, in declaration order.
    ///
    /// Returning `None` declares no requirement: validation is bypassed
    /// for the call, the same policy as an absent schema annotation.
    /// `Some(vec![])` is an explicit empty declaration and still invokes
    /// the validator.
    fn required_scopes(&self) -> Option<Vec<String>>;
}

/// Dynamic strategy: the requirement lives on the payload itself. No
/// registry is involved.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestResolver;

impl RequestResolver {
    /// Create the payload-driven resolver.
    pub fn new() -> Self {
        Self
    }
}

impl<Req> ScopeResolver<Req> for RequestResolver
where
    Req: ScopedRequest,
{
    fn resolve(
        &self,
        _info: &UnaryCallInfo<'_>,
        request: &Req,
    ) -> Result<ScopeResolution, ScopeError> {
        Ok(match request.required_scopes() {
            Some(scopes) => ScopeResolution::Required(scopes),
            None => ScopeResolution::NotApplicable,
        })
    }
}
