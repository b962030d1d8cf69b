//! Pluggable resolution of extra repository-method parameters.
//!
//! Repository methods may declare parameters beyond the id/ids/entity/query
//! arguments the adapter supplies itself: a security token, a tenant handle,
//! a request-scoped context. Producing a value for such a parameter is a
//! framework-level concern, so it lives behind the [`ParameterProvider`]
//! strategy, injected at adapter construction and swappable in tests.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use thiserror::Error;
use tracing::trace;

/// Errors raised while producing an extra parameter value.
#[derive(Debug, Error)]
pub enum ParameterError {
    /// The provider has no way to produce the requested type.
    #[error("no provider registered for parameter type `{type_name}`")]
    Unresolvable {
        /// Full name of the requested parameter type.
        type_name: &'static str,
    },

    /// The provider produced a value of a different type than requested.
    #[error("provider returned a value that is not a `{type_name}`")]
    TypeMismatch {
        /// Full name of the requested parameter type.
        type_name: &'static str,
    },
}

/// Identification of one wanted parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterRequest {
    /// `TypeId` of the wanted type.
    pub type_id: TypeId,
    /// Full name of the wanted type, for diagnostics.
    pub type_name: &'static str,
}

impl ParameterRequest {
    /// The request for a value of type `P`.
    pub fn of<P: Any>() -> Self {
        Self {
            type_id: TypeId::of::<P>(),
            type_name: std::any::type_name::<P>(),
        }
    }
}

/// Strategy for producing values of arbitrary extra-parameter types.
///
/// Implementations own the policy entirely; the adapter only forwards the
/// request and downcasts the result.
pub trait ParameterProvider: Send + Sync {
    /// Produce a value satisfying `request`.
    fn provide(&self, request: ParameterRequest) -> Result<Box<dyn Any>, ParameterError>;
}

type Factory = Box<dyn Fn() -> Box<dyn Any> + Send + Sync>;

/// The default strategy: a fresh default-constructed instance per request.
///
/// Types are opted in explicitly with [`register`](Self::register); an
/// unregistered type fails with [`ParameterError::Unresolvable`]. Each
/// resolution constructs a new value; nothing is shared between calls.
///
/// # Examples
///
/// ```rust
/// use lacquer::params::{NewInstanceProvider, ParameterProvider, ParameterRequest};
///
/// let provider = NewInstanceProvider::new().register::<String>();
/// let value = provider.provide(ParameterRequest::of::<String>()).unwrap();
/// assert_eq!(*value.downcast::<String>().unwrap(), String::new());
/// ```
#[derive(Default)]
pub struct NewInstanceProvider {
    factories: HashMap<TypeId, Factory>,
}

impl NewInstanceProvider {
    /// A provider with no registered types.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `P`, producing `P::default()` on each request.
    pub fn register<P: Default + Any>(mut self) -> Self {
        self.factories
            .insert(TypeId::of::<P>(), Box::new(|| Box::new(P::default())));
        self
    }
}

impl ParameterProvider for NewInstanceProvider {
    fn provide(&self, request: ParameterRequest) -> Result<Box<dyn Any>, ParameterError> {
        trace!(type_name = request.type_name, "resolving extra parameter");
        match self.factories.get(&request.type_id) {
            Some(factory) => Ok(factory()),
            None => Err(ParameterError::Unresolvable {
                type_name: request.type_name,
            }),
        }
    }
}
