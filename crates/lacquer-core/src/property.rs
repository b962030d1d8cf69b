//! Logical-name property access over described objects.
//!
//! Resolution runs in the same order for reads and writes:
//!
//! 1. the field list, aliases first, literal names second;
//! 2. if a field matches, its reader/writer is used; a field declared
//!    without access fails with [`PropertyError::Inaccessible`];
//! 3. otherwise the accessor list, with the same two-pass precedence; writes
//!    through an accessor require its sibling setter.
//!
//! No match at all is a [`PropertyError::NotFound`]. The property name is
//! checked eagerly: an empty name never reaches resolution.

use serde_json::Value;
use tracing::trace;

use crate::error::{PropertyError, Result};
use crate::introspect::Reflect;

/// Read the property `name` from `object`.
pub fn get(object: &dyn Reflect, name: &str) -> Result<Value> {
    check_name(name)?;
    let schema = object.schema();

    if let Some(field) = schema.find_field(name) {
        trace!(type_name = schema.type_name(), property = name, "reading field");
        let reader = field.reader().ok_or_else(|| PropertyError::Inaccessible {
            type_name: schema.type_name(),
            property: name.to_owned(),
        })?;
        return reader(object.as_any());
    }

    if let Some(accessor) = schema.find_accessor(name) {
        trace!(type_name = schema.type_name(), property = name, "reading accessor");
        return (accessor.getter())(object.as_any());
    }

    Err(PropertyError::NotFound {
        type_name: schema.type_name(),
        property: name.to_owned(),
    })
}

/// Write `value` into the property `name` of `object`.
pub fn set(object: &mut dyn Reflect, name: &str, value: Value) -> Result<()> {
    check_name(name)?;
    let schema = object.schema();

    if let Some(field) = schema.find_field(name) {
        trace!(type_name = schema.type_name(), property = name, "writing field");
        let writer = field.writer().ok_or_else(|| PropertyError::Inaccessible {
            type_name: schema.type_name(),
            property: name.to_owned(),
        })?;
        return writer(object.as_any_mut(), value);
    }

    if let Some(accessor) = schema.find_accessor(name) {
        trace!(type_name = schema.type_name(), property = name, "writing accessor");
        let setter = accessor.setter().ok_or_else(|| PropertyError::Inaccessible {
            type_name: schema.type_name(),
            property: name.to_owned(),
        })?;
        return setter(object.as_any_mut(), value);
    }

    Err(PropertyError::NotFound {
        type_name: schema.type_name(),
        property: name.to_owned(),
    })
}

fn check_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(PropertyError::InvalidArgument(
            "no property name specified".to_owned(),
        ));
    }
    Ok(())
}
