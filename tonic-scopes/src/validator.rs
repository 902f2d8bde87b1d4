//! The externally supplied authorization decision function.

use std::future::Future;

use async_trait::async_trait;
use tonic::Status;

use crate::context::CallContext;

/// Decides whether a call context is authorized for a list of scopes.
///
/// The validator is owned by the embedding application; the core treats it
/// as opaque, invokes it exactly once per validated call, and returns its
/// error to the transport verbatim. It may block or perform I/O (e.g. a
/// remote policy check); the enforcement hook races it against the call's
/// cancellation.
#[async_trait]
pub trait ScopeValidator: Send + Sync + 'static {
    /// Validate the resolved scopes against the call's context.
    async fn validate(&self, ctx: &CallContext, scopes: &[String]) -> Result<(), Status>;
}

/// Adapter implementing [`ScopeValidator`] for a plain async closure.
#[derive(Clone)]
pub struct ValidatorFn<F>(F);

/// Wrap an async closure as a [`ScopeValidator`].
///
/// # Example
///
/// ```ignore
/// let validator = validator_fn(|ctx, scopes| async move {
///     match ctx.metadata().get("authorization-scope") {
///         Some(provided) if scopes.iter().any(|s| provided == s.as_str()) => Ok(()),
///         Some(_) => Err(Status::permission_denied("missing required scope")),
///         None => Err(Status::unauthenticated("missing authorization-scope")),
///     }
/// });
/// ```
pub fn validator_fn<F, Fut>(f: F) -> ValidatorFn<F>
where
    F: Fn(CallContext, Vec<String>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), Status>> + Send + 'static,
{
    ValidatorFn(f)
}

#[async_trait]
impl<F, Fut> ScopeValidator for ValidatorFn<F>
where
    F: Fn(CallContext, Vec<String>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), Status>> + Send + 'static,
{
    async fn validate(&self, ctx: &CallContext, scopes: &[String]) -> Result<(), Status> {
        (self.0)(ctx.clone(), scopes.to_vec()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::metadata::MetadataMap;

    #[tokio::test]
    async fn test_validator_fn_receives_scopes() {
        let validator = validator_fn(|_ctx, scopes| async move {
            if scopes == ["scope1"] {
                Ok(())
            } else {
                Err(Status::permission_denied("missing scope"))
            }
        });

        let ctx = CallContext::new(MetadataMap::new());
        assert!(validator.validate(&ctx, &["scope1".into()]).await.is_ok());
        assert!(validator.validate(&ctx, &["scope2".into()]).await.is_err());
    }
}
