//! Error types for schema introspection and property access.

use thiserror::Error;

/// Result type alias for property operations.
pub type Result<T> = std::result::Result<T, PropertyError>;

/// Errors raised while resolving or accessing a property by logical name.
///
/// All variants are fatal to the access that triggered them; callers such as
/// serialization code decide whether to skip the property or abort.
#[derive(Debug, Error)]
pub enum PropertyError {
    /// An argument was rejected before any resolution work started.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No field or accessor matches the requested property name.
    #[error("no property `{property}` on `{type_name}`")]
    NotFound {
        /// Type the lookup ran against.
        type_name: &'static str,
        /// The requested logical property name.
        property: String,
    },

    /// The property resolved, but the matching entry has no usable reader or
    /// writer for the requested direction.
    #[error("cannot access property `{property}` on `{type_name}`")]
    Inaccessible {
        /// Type the lookup ran against.
        type_name: &'static str,
        /// The requested logical property name.
        property: String,
    },

    /// A reader or writer ran, but the value could not be converted.
    #[error("value conversion failed for property `{property}` on `{type_name}`")]
    Conversion {
        /// Type the access ran against.
        type_name: &'static str,
        /// The property whose value failed to convert.
        property: String,
        /// The underlying serde failure.
        #[source]
        source: serde_json::Error,
    },
}
