//! Error types for repository dispatch.

use thiserror::Error;

use crate::params::ParameterError;
use crate::repository::Operation;

/// Result type alias for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Errors raised while resolving or invoking a repository method.
///
/// The variants split along the recoverability line callers care about:
/// [`CapabilityAbsent`](RepositoryError::CapabilityAbsent) means the
/// repository simply does not offer the operation and a capability layer may
/// degrade gracefully; everything else is either a defect in the repository
/// definition or a failure of the wrapped method itself.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The repository registered no method for the requested operation.
    #[error("repository for `{resource_type}` declares no `{operation}` method")]
    CapabilityAbsent {
        /// The operation that was requested.
        operation: Operation,
        /// Resource type the repository was declared for.
        resource_type: &'static str,
    },

    /// A method is registered for the operation, but its declared parameter
    /// shape violates the operation's contract.
    #[error("malformed `{operation}` method on repository for `{resource_type}`: {reason}")]
    MalformedMethod {
        /// The operation whose method is malformed.
        operation: Operation,
        /// Resource type the repository was declared for.
        resource_type: &'static str,
        /// What exactly is wrong with the declared shape.
        reason: String,
    },

    /// Two methods were registered for the same operation.
    #[error("duplicate `{operation}` method on repository for `{resource_type}`")]
    DuplicateOperation {
        /// The operation that was registered twice.
        operation: Operation,
        /// Resource type the repository was declared for.
        resource_type: &'static str,
    },

    /// The wrapped method ran and failed; the original cause is preserved so
    /// business-level handling upstream can inspect it.
    #[error("`{operation}` on repository for `{resource_type}` failed")]
    Invocation {
        /// The operation that was dispatched.
        operation: Operation,
        /// Resource type the repository was declared for.
        resource_type: &'static str,
        /// The error the wrapped method returned.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An extra parameter could not be produced by the configured provider.
    #[error("parameter resolution failed")]
    Parameter(#[from] ParameterError),
}
