#![deny(unsafe_code)]
#![warn(missing_docs)]

//! lacquer: uniform CRUD dispatch over shape-independent resource
//! repositories.
//!
//! Services exposing application objects over a hypermedia protocol need to
//! call user-supplied repositories without caring how each one spells its
//! methods. lacquer closes that gap with two pieces:
//!
//! - **The repository adapter** ([`repository`]): repositories register any
//!   subset of the five operations (`find_one`, `find_all`,
//!   `find_all_with_ids`, `save`, `delete`) as plain functions over typed
//!   [operation arguments](repository::OperationArg). The adapter validates
//!   each method's declared shape against the operation's contract and maps
//!   call-site arguments onto it, so a `find_one` taking `(Id, Query,
//!   Extra<Token>)` and one taking just `(Id,)` dispatch identically.
//! - **Extra-parameter resolution** ([`params`]): parameters beyond the
//!   id/ids/entity/query arguments (security tokens, request contexts) are
//!   produced by a pluggable [`params::ParameterProvider`], injected at
//!   adapter construction.
//!
//! Property access by logical name and the per-type schema cache live in
//! [`lacquer_core`] and are re-exported here as [`introspect`] and
//! [`property`].
//!
//! Missing capabilities are first-class: invoking an operation the
//! repository never registered fails with
//! [`RepositoryError::CapabilityAbsent`], which capability-negotiation
//! layers treat as "unsupported" rather than as a bug, unlike
//! [`RepositoryError::MalformedMethod`], which always indicates a defect in
//! the repository definition.
//!
//! See the [`repository`] module for a complete example.

pub mod error;
pub mod params;
pub mod query;
pub mod repository;

pub use error::{RepositoryError, Result};
pub use lacquer_core::{PropertyError, introspect, property};
pub use query::QueryParams;
pub use repository::{RepositoryAdapter, ResourceRepository};

/// Convenient re-exports of commonly used items.
pub mod prelude {
    pub use crate::error::RepositoryError;
    pub use crate::params::{NewInstanceProvider, ParameterProvider, ParameterRequest};
    pub use crate::query::QueryParams;
    pub use crate::repository::{
        Entity, Extra, Id, Ids, Operation, Query, RepositoryAdapter, ResourceRepository,
    };
    pub use lacquer_core::introspect::{Properties, Reflect, SchemaBuilder};
    pub use lacquer_core::property;
}
