//! Uniform dispatch over repositories with shape-independent methods.
//!
//! A repository is defined by registering a method for each operation it
//! supports (any subset of the five) on a [`ResourceRepositoryBuilder`].
//! Construction produces an immutable capability table; a
//! [`RepositoryAdapter`] then exposes the five uniform operations and maps
//! each call onto whatever parameters the registered method actually
//! declares.
//!
//! # Examples
//!
//! ```rust
//! use std::convert::Infallible;
//! use lacquer::params::NewInstanceProvider;
//! use lacquer::query::QueryParams;
//! use lacquer::repository::{Id, Query, RepositoryAdapter, ResourceRepository};
//!
//! #[derive(Debug, Clone)]
//! struct Project {
//!     id: u64,
//!     name: String,
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let repository = ResourceRepository::<Project, u64>::builder("projects")
//!     .find_one(|Id(id): Id<u64>, Query(_params): Query| {
//!         Ok::<_, Infallible>(Project { id, name: "alpha".into() })
//!     })
//!     .build()?;
//!
//! let adapter = RepositoryAdapter::new(repository, NewInstanceProvider::new());
//! let project = adapter.find_one(7, &QueryParams::new())?;
//! assert_eq!(project.id, 7);
//! # Ok(())
//! # }
//! ```

mod adapter;
mod args;
mod method;

pub use adapter::RepositoryAdapter;
pub use args::{CallContext, Entity, Extra, Id, Ids, OperationArg, ParamKind, Query};
pub use method::{IntoMethodBinding, MethodBinding};

use std::fmt;

use crate::error::RepositoryError;

/// The five operations a repository may implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Fetch one entity by identifier.
    FindOne,
    /// Fetch all entities.
    FindAll,
    /// Fetch the entities matching a collection of identifiers.
    FindAllWithIds,
    /// Create or update one entity.
    Save,
    /// Delete one entity by identifier.
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FindOne => "find_one",
            Self::FindAll => "find_all",
            Self::FindAllWithIds => "find_all_with_ids",
            Self::Save => "save",
            Self::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// A repository's capability table: the resource type it serves and the
/// method registered for each operation it supports.
///
/// Built once via [`ResourceRepository::builder`] and wrapped by exactly one
/// [`RepositoryAdapter`] for its lifetime; never mutated afterwards.
pub struct ResourceRepository<T, I> {
    pub(crate) resource_type: &'static str,
    pub(crate) find_one: Option<MethodBinding<T, I, T>>,
    pub(crate) find_all: Option<MethodBinding<T, I, Vec<T>>>,
    pub(crate) find_all_with_ids: Option<MethodBinding<T, I, Vec<T>>>,
    pub(crate) save: Option<MethodBinding<T, I, T>>,
    pub(crate) delete: Option<MethodBinding<T, I, ()>>,
}

impl<T, I> ResourceRepository<T, I> {
    /// Start defining a repository for the named resource type.
    pub fn builder(resource_type: &'static str) -> ResourceRepositoryBuilder<T, I> {
        ResourceRepositoryBuilder {
            resource_type,
            duplicate: None,
            find_one: None,
            find_all: None,
            find_all_with_ids: None,
            save: None,
            delete: None,
        }
    }

    /// The resource type this repository serves.
    pub fn resource_type(&self) -> &'static str {
        self.resource_type
    }

    /// Whether a method is registered for `operation`.
    ///
    /// Capability negotiation layers use this to advertise only the
    /// operations a repository actually implements.
    pub fn supports(&self, operation: Operation) -> bool {
        match operation {
            Operation::FindOne => self.find_one.is_some(),
            Operation::FindAll => self.find_all.is_some(),
            Operation::FindAllWithIds => self.find_all_with_ids.is_some(),
            Operation::Save => self.save.is_some(),
            Operation::Delete => self.delete.is_some(),
        }
    }
}

impl<T, I> std::fmt::Debug for ResourceRepository<T, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceRepository")
            .field("resource_type", &self.resource_type)
            .field("find_one", &self.find_one.is_some())
            .field("find_all", &self.find_all.is_some())
            .field("find_all_with_ids", &self.find_all_with_ids.is_some())
            .field("save", &self.save.is_some())
            .field("delete", &self.delete.is_some())
            .finish()
    }
}

/// Builder collecting one method per operation.
///
/// Registering two methods for the same operation is a definition error,
/// reported by [`build`](Self::build) rather than silently resolved in favor
/// of either method.
pub struct ResourceRepositoryBuilder<T, I> {
    resource_type: &'static str,
    duplicate: Option<Operation>,
    find_one: Option<MethodBinding<T, I, T>>,
    find_all: Option<MethodBinding<T, I, Vec<T>>>,
    find_all_with_ids: Option<MethodBinding<T, I, Vec<T>>>,
    save: Option<MethodBinding<T, I, T>>,
    delete: Option<MethodBinding<T, I, ()>>,
}

impl<T, I> ResourceRepositoryBuilder<T, I> {
    /// Register the `find_one` method.
    pub fn find_one<F, A>(mut self, method: F) -> Self
    where
        F: IntoMethodBinding<T, I, A, T>,
    {
        if self.find_one.is_some() {
            self.duplicate.get_or_insert(Operation::FindOne);
        } else {
            self.find_one = Some(method.into_binding());
        }
        self
    }

    /// Register the `find_all` method.
    pub fn find_all<F, A>(mut self, method: F) -> Self
    where
        F: IntoMethodBinding<T, I, A, Vec<T>>,
    {
        if self.find_all.is_some() {
            self.duplicate.get_or_insert(Operation::FindAll);
        } else {
            self.find_all = Some(method.into_binding());
        }
        self
    }

    /// Register the `find_all_with_ids` method.
    pub fn find_all_with_ids<F, A>(mut self, method: F) -> Self
    where
        F: IntoMethodBinding<T, I, A, Vec<T>>,
    {
        if self.find_all_with_ids.is_some() {
            self.duplicate.get_or_insert(Operation::FindAllWithIds);
        } else {
            self.find_all_with_ids = Some(method.into_binding());
        }
        self
    }

    /// Register the `save` method.
    pub fn save<F, A>(mut self, method: F) -> Self
    where
        F: IntoMethodBinding<T, I, A, T>,
    {
        if self.save.is_some() {
            self.duplicate.get_or_insert(Operation::Save);
        } else {
            self.save = Some(method.into_binding());
        }
        self
    }

    /// Register the `delete` method.
    pub fn delete<F, A>(mut self, method: F) -> Self
    where
        F: IntoMethodBinding<T, I, A, ()>,
    {
        if self.delete.is_some() {
            self.duplicate.get_or_insert(Operation::Delete);
        } else {
            self.delete = Some(method.into_binding());
        }
        self
    }

    /// Finish the definition.
    ///
    /// # Errors
    ///
    /// [`RepositoryError::DuplicateOperation`] if any operation was
    /// registered more than once.
    pub fn build(self) -> Result<ResourceRepository<T, I>, RepositoryError> {
        if let Some(operation) = self.duplicate {
            return Err(RepositoryError::DuplicateOperation {
                operation,
                resource_type: self.resource_type,
            });
        }
        Ok(ResourceRepository {
            resource_type: self.resource_type,
            find_one: self.find_one,
            find_all: self.find_all,
            find_all_with_ids: self.find_all_with_ids,
            save: self.save,
            delete: self.delete,
        })
    }
}
