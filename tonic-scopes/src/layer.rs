//! Tower middleware registering the schema-driven hook with a server.
//!
//! The layer runs below tonic's codecs, so the call identifier is the
//! request URI path and the caller's metadata is read from the HTTP
//! headers; the body passes through untouched. Rejections are encoded as
//! gRPC error responses without reaching the wrapped service.
//!
//! Only the static strategy can live here: the request payload is still
//! encoded at this point, so the payload-driven configuration is invoked
//! from service method bodies instead (see
//! [`ScopeInterceptor`](crate::interceptor::ScopeInterceptor)).

use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use http::{Request, Response};
use tonic::body::BoxBody;
use tonic::metadata::MetadataMap;
use tower::{Layer, Service};

use crate::context::CallContext;
use crate::error::IntoStatus;
use crate::resolver::{SchemaResolver, ScopeResolution};
use crate::schema::SchemaRegistry;
use crate::validator::ScopeValidator;

/// Layer applying scope enforcement to every unary call of the wrapped
/// service, driven by the injected schema registry.
pub struct ScopeLayer<V> {
    resolver: SchemaResolver,
    validator: Arc<V>,
}

impl<V: ScopeValidator> ScopeLayer<V> {
    /// Create a layer over the given registry and validator.
    pub fn new(registry: Arc<SchemaRegistry>, validator: V) -> Self {
        Self {
            resolver: SchemaResolver::new(registry),
            validator: Arc::new(validator),
        }
    }
}

impl<V> Clone for ScopeLayer<V> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
            validator: Arc::clone(&self.validator),
        }
    }
}

impl<S, V> Layer<S> for ScopeLayer<V> {
    type Service = ScopeService<S, V>;

    fn layer(&self, inner: S) -> Self::Service {
        ScopeService {
            inner,
            resolver: self.resolver.clone(),
            validator: Arc::clone(&self.validator),
        }
    }
}

/// The service produced by [`ScopeLayer`].
pub struct ScopeService<S, V> {
    inner: S,
    resolver: SchemaResolver,
    validator: Arc<V>,
}

impl<S: Clone, V> Clone for ScopeService<S, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            resolver: self.resolver.clone(),
            validator: Arc::clone(&self.validator),
        }
    }
}

impl<S, V, ReqBody> Service<Request<ReqBody>> for ScopeService<S, V>
where
    S: Service<Request<ReqBody>, Response = Response<BoxBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    V: ScopeValidator,
    ReqBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        // Take the ready inner service, leave a fresh clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let resolver = self.resolver.clone();
        let validator = Arc::clone(&self.validator);

        Box::pin(async move {
            let resolution = match resolver.resolve_method(req.uri().path()) {
                Ok(resolution) => resolution,
                Err(err) => {
                    tracing::warn!(
                        path = req.uri().path(),
                        error = %err,
                        "failed to resolve required scopes"
                    );
                    return Ok(err.into_status().into_http());
                }
            };

            let scopes = match resolution {
                ScopeResolution::NotApplicable => return inner.call(req).await,
                ScopeResolution::Required(scopes) => scopes,
            };

            let ctx = CallContext::new(MetadataMap::from_headers(req.headers().clone()));
            match validator.validate(&ctx, &scopes).await {
                Ok(()) => inner.call(req).await,
                Err(status) => {
                    tracing::warn!(
                        path = req.uri().path(),
                        code = ?status.code(),
                        "scope validation rejected the call"
                    );
                    Ok(status.into_http())
                }
            }
        })
    }
}
