//! Parsing of wire-level call identifiers.

use crate::error::ScopeError;

/// The parsed identity of a unary call: the fully-qualified service name
/// and the bare method name, borrowed from the wire-format identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodIdentity<'a> {
    service: &'a str,
    method: &'a str,
}

impl<'a> MethodIdentity<'a> {
    /// Parse a `/package.Service/Method` call identifier.
    ///
    /// The identifier must split on `/` into exactly three segments with a
    /// leading empty one, and the text after the last `.` must have the
    /// `Service/Method` shape. Anything else is rejected as
    /// [`ScopeError::MalformedMethodName`].
    pub fn parse(full_method: &'a str) -> Result<Self, ScopeError> {
        // /package.Service/Method
        let segments: Vec<&str> = full_method.split('/').collect();
        if segments.len() != 3 || !segments[0].is_empty() {
            return Err(ScopeError::MalformedMethodName(full_method.to_string()));
        }
        let service = segments[1];

        // Service/Method
        let simple = full_method.rsplit('.').next().unwrap_or(full_method);
        let parts: Vec<&str> = simple.split('/').collect();
        if parts.len() != 2 {
            return Err(ScopeError::MalformedMethodName(full_method.to_string()));
        }

        Ok(Self {
            service,
            method: parts[1],
        })
    }

    /// Fully-qualified service name, e.g. `pingpong.PingPong`.
    pub fn service(&self) -> &'a str {
        self.service
    }

    /// Bare method name, e.g. `Ping`.
    pub fn method(&self) -> &'a str {
        self.method
    }
}
