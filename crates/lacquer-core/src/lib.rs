#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Core abstractions for the lacquer resource framework.
//!
//! This crate holds the two pieces the rest of the ecosystem leans on:
//!
//! - **Object schemas** via the [`Properties`] trait and the process-wide
//!   [`introspect::SchemaCache`]: an explicit, per-type map of fields and
//!   computed accessors, built once and shared behind an `Arc`.
//! - **Logical-name property access** via [`property::get`] and
//!   [`property::set`]: read or write any described object by property name,
//!   with explicit aliases taking precedence over literal field names.
//!
//! Serialization layers use these to walk resource objects without
//! compile-time knowledge of their concrete types; the repository adapter in
//! the `lacquer` crate shares the same error conventions.
//!
//! # Examples
//!
//! ```rust
//! use lacquer_core::introspect::{Properties, SchemaBuilder};
//! use lacquer_core::property;
//! use serde_json::json;
//!
//! struct Task {
//!     id: u64,
//!     label: String,
//! }
//!
//! impl Properties for Task {
//!     fn describe(schema: &mut SchemaBuilder<Self>) {
//!         schema.field("id", |t: &Task| t.id, |t: &mut Task, v| t.id = v);
//!         schema
//!             .field(
//!                 "label",
//!                 |t: &Task| t.label.clone(),
//!                 |t: &mut Task, v| t.label = v,
//!             )
//!             .alias("name");
//!     }
//! }
//!
//! let mut task = Task { id: 7, label: "write docs".into() };
//! assert_eq!(property::get(&task, "name").unwrap(), json!("write docs"));
//! property::set(&mut task, "id", json!(8)).unwrap();
//! assert_eq!(task.id, 8);
//! ```

pub mod error;
pub mod introspect;
pub mod property;

pub use error::{PropertyError, Result};
pub use introspect::{ObjectSchema, Properties, Reflect, SchemaBuilder, schema_of};

/// Convenient re-exports of commonly used items.
pub mod prelude {
    pub use crate::error::PropertyError;
    pub use crate::introspect::{ObjectSchema, Properties, Reflect, SchemaBuilder, schema_of};
    pub use crate::property;
}
