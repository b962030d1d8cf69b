//! Operation arguments: the typed parameters a repository method may declare.
//!
//! A repository method's shape is whatever combination of these wrappers it
//! declares; the adapter supplies each one by kind rather than by position,
//! which is what makes methods shape-independent. [`ParamKind`] records the
//! declared shape for validation against each operation's contract.

use std::any::Any;
use std::fmt;

use crate::error::RepositoryError;
use crate::params::{ParameterError, ParameterProvider, ParameterRequest};
use crate::query::QueryParams;
use crate::repository::Operation;

/// Classification of one declared method parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// The single resource identifier.
    Id,
    /// The identifier collection.
    Ids,
    /// The resource entity itself.
    Entity,
    /// The opaque query parameters.
    Query,
    /// Anything else, resolved through the parameter provider.
    Extra(&'static str),
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id => f.write_str("id"),
            Self::Ids => f.write_str("ids collection"),
            Self::Entity => f.write_str("entity"),
            Self::Query => f.write_str("query parameters"),
            Self::Extra(name) => write!(f, "extra parameter `{name}`"),
        }
    }
}

/// Per-call state the adapter assembles before invoking a method.
///
/// Primary arguments are taken out of the context exactly once; extra
/// parameters are produced on demand by the configured provider.
pub struct CallContext<'a, T, I> {
    pub(crate) operation: Operation,
    pub(crate) resource_type: &'static str,
    pub(crate) id: Option<I>,
    pub(crate) ids: Option<Vec<I>>,
    pub(crate) entity: Option<T>,
    pub(crate) query: Option<&'a QueryParams>,
    pub(crate) provider: &'a dyn ParameterProvider,
}

impl<T, I> CallContext<'_, T, I> {
    /// The operation being dispatched.
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Resource type of the repository being dispatched to.
    pub fn resource_type(&self) -> &'static str {
        self.resource_type
    }

    /// The configured extra-parameter provider.
    pub fn provider(&self) -> &dyn ParameterProvider {
        self.provider
    }

    fn unavailable(&self, kind: ParamKind) -> RepositoryError {
        RepositoryError::MalformedMethod {
            operation: self.operation,
            resource_type: self.resource_type,
            reason: format!("method declares the {kind} but the operation does not supply it"),
        }
    }
}

/// A value a repository method can declare as a parameter.
pub trait OperationArg<T, I>: Sized {
    /// The parameter kind this argument occupies in the method shape.
    fn kind() -> ParamKind;

    /// Pull this argument's value out of the call context.
    fn extract(cx: &mut CallContext<'_, T, I>) -> Result<Self, RepositoryError>;
}

/// The resource identifier of `find_one` and `delete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Id<I>(pub I);

impl<T, I> OperationArg<T, I> for Id<I> {
    fn kind() -> ParamKind {
        ParamKind::Id
    }

    fn extract(cx: &mut CallContext<'_, T, I>) -> Result<Self, RepositoryError> {
        let id = cx.id.take().ok_or_else(|| cx.unavailable(ParamKind::Id))?;
        Ok(Self(id))
    }
}

/// The identifier collection of `find_all_with_ids`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ids<I>(pub Vec<I>);

impl<T, I> OperationArg<T, I> for Ids<I> {
    fn kind() -> ParamKind {
        ParamKind::Ids
    }

    fn extract(cx: &mut CallContext<'_, T, I>) -> Result<Self, RepositoryError> {
        let ids = cx.ids.take().ok_or_else(|| cx.unavailable(ParamKind::Ids))?;
        Ok(Self(ids))
    }
}

/// The entity passed to `save`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entity<T>(pub T);

impl<T, I> OperationArg<T, I> for Entity<T> {
    fn kind() -> ParamKind {
        ParamKind::Entity
    }

    fn extract(cx: &mut CallContext<'_, T, I>) -> Result<Self, RepositoryError> {
        let entity = cx
            .entity
            .take()
            .ok_or_else(|| cx.unavailable(ParamKind::Entity))?;
        Ok(Self(entity))
    }
}

/// The opaque query parameters, passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(pub QueryParams);

impl<T, I> OperationArg<T, I> for Query {
    fn kind() -> ParamKind {
        ParamKind::Query
    }

    fn extract(cx: &mut CallContext<'_, T, I>) -> Result<Self, RepositoryError> {
        let query = cx
            .query
            .cloned()
            .ok_or_else(|| cx.unavailable(ParamKind::Query))?;
        Ok(Self(query))
    }
}

/// Any other parameter, resolved through the configured provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extra<P>(pub P);

impl<T, I, P: Any> OperationArg<T, I> for Extra<P> {
    fn kind() -> ParamKind {
        ParamKind::Extra(std::any::type_name::<P>())
    }

    fn extract(cx: &mut CallContext<'_, T, I>) -> Result<Self, RepositoryError> {
        let request = ParameterRequest::of::<P>();
        let value = cx.provider.provide(request)?;
        let value = value.downcast::<P>().map_err(|_| ParameterError::TypeMismatch {
            type_name: request.type_name,
        })?;
        Ok(Self(*value))
    }
}
