//! The schema registry consumed by the static resolution strategy.
//!
//! The registry maps fully-qualified names to descriptors, the way a proto
//! descriptor registry does, but as plain typed structures: the
//! required-scopes annotation that proto carries as a `MethodOptions`
//! extension is a typed field here, populated by schema-registration code
//! (generated or handwritten) before the server accepts its first call.
//!
//! The registry is an injected dependency, not process-global state, so
//! tests can supply a minimal one without registration side effects. It is
//! immutable once built; concurrent lookups need no synchronization.

use std::collections::HashMap;

use crate::error::ScopeError;
use crate::identity::MethodIdentity;

/// Fully-qualified name of the method option this crate understands, as it
/// appears in the proto schema.
pub const REQUIRED_SCOPES_OPTION: &str = "scopes.required_method_scopes";

/// The required-scopes annotation attached to a method.
///
/// Holds the declared scope tokens in declaration order. An annotation may
/// be present with an empty list; that is distinct from no annotation at
/// all (see [`MethodOptions::required_scopes`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredScopes {
    scopes: Vec<String>,
}

impl RequiredScopes {
    /// Create an annotation from the given scope tokens.
    pub fn new<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scopes: scopes.into_iter().map(Into::into).collect(),
        }
    }

    /// The declared scope tokens, in declaration order.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }
}

/// Schema-level options attached to a method description.
#[derive(Debug, Clone, Default)]
pub struct MethodOptions {
    required_scopes: Option<RequiredScopes>,
}

impl MethodOptions {
    /// The required-scopes annotation, or `None` if the schema author
    /// declared none for this method.
    pub fn required_scopes(&self) -> Option<&RequiredScopes> {
        self.required_scopes.as_ref()
    }
}

/// Structural description of one RPC method.
#[derive(Debug, Clone)]
pub struct MethodSchema {
    name: String,
    options: MethodOptions,
}

impl MethodSchema {
    /// Create a method description with no options.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: MethodOptions::default(),
        }
    }

    /// Attach a required-scopes annotation, preserving declaration order.
    pub fn with_required_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.required_scopes = Some(RequiredScopes::new(scopes));
        self
    }

    /// Bare method name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The method's option set.
    pub fn options(&self) -> &MethodOptions {
        &self.options
    }
}

/// Structural description of one RPC service.
#[derive(Debug, Clone)]
pub struct ServiceSchema {
    full_name: String,
    methods: Vec<MethodSchema>,
}

impl ServiceSchema {
    /// Create a service description under its fully-qualified name,
    /// e.g. `pingpong.PingPong`.
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            methods: Vec::new(),
        }
    }

    /// Add a method description.
    pub fn with_method(mut self, method: MethodSchema) -> Self {
        self.methods.push(method);
        self
    }

    /// Fully-qualified service name.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Look up a method by its bare name.
    pub fn method(&self, name: &str) -> Option<&MethodSchema> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// Structural description of a message type.
///
/// The registry holds these only so that a name resolving to a non-service
/// descriptor is distinguishable from a name that resolves to nothing.
#[derive(Debug, Clone)]
pub struct MessageSchema {
    full_name: String,
}

impl MessageSchema {
    /// Create a message description under its fully-qualified name.
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
        }
    }

    /// Fully-qualified message name.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }
}

/// A descriptor held by the registry.
#[derive(Debug, Clone)]
pub enum Descriptor {
    /// A service description.
    Service(ServiceSchema),
    /// A message description.
    Message(MessageSchema),
}

impl Descriptor {
    /// Fully-qualified name of the described entity.
    pub fn full_name(&self) -> &str {
        match self {
            Descriptor::Service(service) => service.full_name(),
            Descriptor::Message(message) => message.full_name(),
        }
    }
}

/// Read-only registry of descriptors keyed by fully-qualified name.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    descriptors: HashMap<String, Descriptor>,
}

impl SchemaRegistry {
    /// Start building a registry.
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::default()
    }

    /// Resolve a fully-qualified service name to its description.
    pub fn find_service(&self, full_name: &str) -> Result<&ServiceSchema, ScopeError> {
        match self.descriptors.get(full_name) {
            Some(Descriptor::Service(service)) => Ok(service),
            Some(other) => Err(ScopeError::NotAService(other.full_name().to_string())),
            None => Err(ScopeError::ServiceNotFound(full_name.to_string())),
        }
    }

    /// Resolve a parsed call identity to its method description.
    pub fn find_method(&self, identity: &MethodIdentity<'_>) -> Result<&MethodSchema, ScopeError> {
        let service = self.find_service(identity.service())?;
        service
            .method(identity.method())
            .ok_or_else(|| ScopeError::MethodNotFound {
                service: identity.service().to_string(),
                method: identity.method().to_string(),
            })
    }

    /// Number of registered descriptors.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the registry holds no descriptors.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Builder collecting descriptors at registration time.
#[derive(Debug, Default)]
pub struct SchemaRegistryBuilder {
    descriptors: HashMap<String, Descriptor>,
}

impl SchemaRegistryBuilder {
    /// Register a service description under its fully-qualified name.
    /// A later registration under the same name replaces the earlier one.
    pub fn register_service(mut self, service: ServiceSchema) -> Self {
        self.descriptors
            .insert(service.full_name().to_string(), Descriptor::Service(service));
        self
    }

    /// Register a message description under its fully-qualified name.
    pub fn register_message(mut self, message: MessageSchema) -> Self {
        self.descriptors
            .insert(message.full_name().to_string(), Descriptor::Message(message));
        self
    }

    /// Finish building; the registry is immutable from here on.
    pub fn build(self) -> SchemaRegistry {
        SchemaRegistry {
            descriptors: self.descriptors,
        }
    }
}
