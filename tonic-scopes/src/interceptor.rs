//! The per-call enforcement hook.
//!
//! One interception point runs before every guarded handler: resolve the
//! scopes the call requires, hand them to the validator, and either
//! forward the call or reject it. The resolution strategy is fixed when
//! the hook is constructed; the enforcement logic is written once.

use std::sync::Arc;

use tonic::{Request, Response, Status};

use crate::context::CallContext;
use crate::error::IntoStatus;
use crate::resolver::{RequestResolver, SchemaResolver, ScopeResolution, ScopeResolver};
use crate::schema::SchemaRegistry;
use crate::validator::ScopeValidator;

/// Per-call metadata handed to the hook by the transport, alongside the
/// decoded payload.
#[derive(Debug, Clone, Copy)]
pub struct UnaryCallInfo<'a> {
    /// The wire-format call identifier, e.g. `/pingpong.PingPong/Ping`.
    pub full_method: &'a str,
}

impl<'a> UnaryCallInfo<'a> {
    /// Create call info for the given identifier.
    pub fn new(full_method: &'a str) -> Self {
        Self { full_method }
    }
}

/// The enforcement hook: one resolver strategy plus one validator.
///
/// Constructed once at server wiring time and shared across calls; it
/// keeps no per-call state, so repeated identical calls produce identical
/// authorization outcomes.
pub struct ScopeInterceptor<R, V> {
    resolver: R,
    validator: Arc<V>,
}

impl<R: Clone, V> Clone for ScopeInterceptor<R, V> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
            validator: Arc::clone(&self.validator),
        }
    }
}

impl<V: ScopeValidator> ScopeInterceptor<SchemaResolver, V> {
    /// Build a hook using the static strategy: requirements come from the
    /// method schemas in `registry`.
    pub fn from_schema(registry: Arc<SchemaRegistry>, validator: V) -> Self {
        Self::new(SchemaResolver::new(registry), validator)
    }
}

impl<V: ScopeValidator> ScopeInterceptor<RequestResolver, V> {
    /// Build a hook using the dynamic strategy: requirements come from the
    /// request payloads themselves.
    pub fn self_declared(validator: V) -> Self {
        Self::new(RequestResolver::new(), validator)
    }
}

impl<R, V> ScopeInterceptor<R, V>
where
    V: ScopeValidator,
{
    /// Build a hook from an explicit resolver strategy and validator.
    pub fn new(resolver: R, validator: V) -> Self {
        Self {
            resolver,
            validator: Arc::new(validator),
        }
    }

    /// Intercept one unary call.
    ///
    /// Resolves the call's scope requirement, validates it if one is
    /// declared, and forwards to `handler` on success. The handler's
    /// result, value or error, is returned unmodified. Rejections never
    /// reach the handler:
    ///
    /// - resolution failures reject as `INTERNAL` (a registry or routing
    ///   problem, not an authorization decision);
    /// - the validator's error is returned verbatim;
    /// - a canceled call rejects as `CANCELLED`, discarding any pending
    ///   validator result.
    pub async fn intercept<Req, Res, H, Fut>(
        &self,
        info: UnaryCallInfo<'_>,
        request: Request<Req>,
        handler: H,
    ) -> Result<Response<Res>, Status>
    where
        R: ScopeResolver<Req>,
        H: FnOnce(Request<Req>) -> Fut,
        Fut: std::future::Future<Output = Result<Response<Res>, Status>>,
    {
        let resolution = match self.resolver.resolve(&info, request.get_ref()) {
            Ok(resolution) => resolution,
            Err(err) => {
                tracing::warn!(
                    full_method = info.full_method,
                    error = %err,
                    "failed to resolve required scopes"
                );
                return Err(err.into_status());
            }
        };

        let scopes = match resolution {
            ScopeResolution::NotApplicable => {
                tracing::debug!(
                    full_method = info.full_method,
                    "no scope requirement declared, bypassing validation"
                );
                return handler(request).await;
            }
            ScopeResolution::Required(scopes) => scopes,
        };

        let ctx = CallContext::from_request(&request);
        if ctx.is_cancelled() {
            return Err(crate::error::ScopeError::Cancelled.into_status());
        }

        tracing::debug!(
            full_method = info.full_method,
            scopes = ?scopes,
            "validating required scopes"
        );

        let outcome = tokio::select! {
            _ = ctx.cancelled() => Err(crate::error::ScopeError::Cancelled.into_status()),
            result = self.validator.validate(&ctx, &scopes) => result,
        };

        match outcome {
            Ok(()) => handler(request).await,
            Err(status) => {
                tracing::warn!(
                    full_method = info.full_method,
                    code = ?status.code(),
                    "scope validation rejected the call"
                );
                Err(status)
            }
        }
    }
}
