//! Scope-based authorization middleware for tonic unary services.
//!
//! For each incoming call this crate determines which scopes the targeted
//! method requires and hands the decision to a caller-supplied validator
//! before the request reaches the handler. Two resolution strategies feed
//! the same enforcement point:
//!
//! - **static**: the requirement is an annotation on the method's schema,
//!   resolved through an injected [`SchemaRegistry`];
//! - **dynamic**: the request payload declares its own requirement via the
//!   [`ScopedRequest`] capability.
//!
//! The crate does not authenticate callers, parse tokens, or match scopes;
//! that is the validator's job.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tonic_scopes::{
//!     validator_fn, MethodSchema, ScopeLayer, SchemaRegistry, ServiceSchema,
//! };
//!
//! let registry = Arc::new(
//!     SchemaRegistry::builder()
//!         .register_service(
//!             ServiceSchema::new("pingpong.PingPong")
//!                 .with_method(MethodSchema::new("Ping").with_required_scopes(["scope1"])),
//!         )
//!         .build(),
//! );
//!
//! let layer = ScopeLayer::new(registry, validator_fn(|ctx, scopes| async move {
//!     // inspect ctx.metadata(), compare against scopes
//!     Ok(())
//! }));
//!
//! // Server::builder().layer(layer).add_service(...)
//! ```

pub mod context;
pub mod error;
pub mod identity;
pub mod interceptor;
pub mod layer;
pub mod resolver;
pub mod schema;
pub mod validator;

pub use context::CallContext;
pub use error::{IntoStatus, ScopeError};
pub use identity::MethodIdentity;
pub use interceptor::{ScopeInterceptor, UnaryCallInfo};
pub use layer::{ScopeLayer, ScopeService};
pub use resolver::{
    RequestResolver, SchemaResolver, ScopeResolution, ScopeResolver, ScopedRequest,
};
pub use schema::{
    Descriptor, MessageSchema, MethodOptions, MethodSchema, RequiredScopes, SchemaRegistry,
    SchemaRegistryBuilder, ServiceSchema, REQUIRED_SCOPES_OPTION,
};
pub use validator::{validator_fn, ScopeValidator, ValidatorFn};

// Re-export commonly used tonic types
pub use tonic::{Code, Request, Response, Status};
