//! Request-scoped context handed to the validator.

use tokio_util::sync::CancellationToken;
use tonic::metadata::MetadataMap;
use tonic::Request;

/// The validator-facing view of an in-flight call: the caller-presented
/// metadata and a cancellation token bound to the call.
///
/// The core passes this through to the validator unmodified; it never
/// inspects the metadata itself. Cloning is shallow for the token and deep
/// for the metadata map, which lives only for the duration of the call.
#[derive(Debug, Clone)]
pub struct CallContext {
    metadata: MetadataMap,
    cancellation: CancellationToken,
}

impl CallContext {
    /// Create a context over the given metadata with a token that is never
    /// canceled.
    pub fn new(metadata: MetadataMap) -> Self {
        Self {
            metadata,
            cancellation: CancellationToken::new(),
        }
    }

    /// Create a context bound to an externally owned cancellation token.
    pub fn with_cancellation(metadata: MetadataMap, cancellation: CancellationToken) -> Self {
        Self {
            metadata,
            cancellation,
        }
    }

    /// Build a context from an incoming request.
    ///
    /// If the transport installed a [`CancellationToken`] in the request
    /// extensions, validation is bound to it; otherwise the context cannot
    /// be canceled.
    pub fn from_request<T>(request: &Request<T>) -> Self {
        let cancellation = request
            .extensions()
            .get::<CancellationToken>()
            .cloned()
            .unwrap_or_default();
        Self {
            metadata: request.metadata().clone(),
            cancellation,
        }
    }

    /// Caller-presented request metadata.
    pub fn metadata(&self) -> &MetadataMap {
        &self.metadata
    }

    /// Whether the call has already been canceled.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Completes when the call is canceled.
    pub async fn cancelled(&self) {
        self.cancellation.cancelled().await
    }
}
