//! Per-type object schemas and the process-wide schema cache.
//!
//! A type opts into introspection by implementing [`Properties`] and listing
//! its fields and computed accessors on a [`SchemaBuilder`]. The resulting
//! [`ObjectSchema`] is built once per type, cached behind an `Arc`, and shared
//! by every reader; the schema of a type does not change at runtime.
//!
//! Entries come in two shapes, mirroring how objects actually expose state:
//!
//! - **Fields** declared with [`SchemaBuilder::field`] carry a direct reader
//!   and writer. A field declared with [`SchemaBuilder::opaque_field`] is
//!   resolvable by name but has no way in or out; touching it is an
//!   [`PropertyError::Inaccessible`] error rather than a lookup miss.
//! - **Accessors** declared with [`SchemaBuilder::accessor`] are computed
//!   properties: a getter, optionally paired with a setter.
//!
//! Both kinds accept an explicit `alias` that takes precedence over the
//! literal name during resolution (see [`ObjectSchema::find_field`]).

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{PropertyError, Result};

/// Erased reader: borrows the object, yields one property as a JSON value.
type Reader = Arc<dyn Fn(&dyn Any) -> Result<Value> + Send + Sync>;

/// Erased writer: replaces one property from a JSON value.
type Writer = Arc<dyn Fn(&mut dyn Any, Value) -> Result<()> + Send + Sync>;

/// A type whose properties can be enumerated and accessed by logical name.
///
/// Implementations describe their shape once; the framework caches the result
/// per type. See the crate-level example for a typical implementation.
pub trait Properties: Sized + 'static {
    /// List the fields and accessors of this type on the builder.
    fn describe(schema: &mut SchemaBuilder<Self>);
}

/// Object-safe access to a described object and its cached schema.
///
/// Implemented for every [`Properties`] type via a blanket impl; accept
/// `&dyn Reflect` wherever heterogeneous objects must be walked.
pub trait Reflect: Any {
    /// The cached schema for this object's concrete type.
    fn schema(&self) -> Arc<ObjectSchema>;

    /// Upcast to `&dyn Any` for erased readers.
    fn as_any(&self) -> &dyn Any;

    /// Upcast to `&mut dyn Any` for erased writers.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Properties> Reflect for T {
    fn schema(&self) -> Arc<ObjectSchema> {
        schema_of::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A declared field: literal name, optional alias, and whatever access the
/// describing type handed out.
pub struct FieldDescriptor {
    name: &'static str,
    alias: Option<&'static str>,
    reader: Option<Reader>,
    writer: Option<Writer>,
}

impl FieldDescriptor {
    /// The literal field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The explicit-name alias, if one was declared.
    pub fn alias(&self) -> Option<&'static str> {
        self.alias
    }

    pub(crate) fn reader(&self) -> Option<&Reader> {
        self.reader.as_ref()
    }

    pub(crate) fn writer(&self) -> Option<&Writer> {
        self.writer.as_ref()
    }
}

/// A computed property: a getter under a logical name, optionally writable.
pub struct AccessorDescriptor {
    name: &'static str,
    alias: Option<&'static str>,
    getter: Reader,
    setter: Option<Writer>,
}

impl AccessorDescriptor {
    /// The logical property name the getter answers to.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The explicit-name alias, if one was declared.
    pub fn alias(&self) -> Option<&'static str> {
        self.alias
    }

    pub(crate) fn getter(&self) -> &Reader {
        &self.getter
    }

    pub(crate) fn setter(&self) -> Option<&Writer> {
        self.setter.as_ref()
    }
}

/// The cached, immutable shape of one type: its declared fields and computed
/// accessors, in declaration order.
pub struct ObjectSchema {
    type_name: &'static str,
    fields: Vec<FieldDescriptor>,
    accessors: Vec<AccessorDescriptor>,
}

impl ObjectSchema {
    /// Full name of the described type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The declared fields, in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// The computed accessors, in declaration order.
    pub fn accessors(&self) -> &[AccessorDescriptor] {
        &self.accessors
    }

    /// Resolve a logical name against the field list.
    ///
    /// Two passes over the whole list: first by explicit alias, then by
    /// literal name. An alias match anywhere in the list beats a literal-name
    /// match anywhere else.
    pub fn find_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|f| f.alias.is_some_and(|a| a == name))
            .or_else(|| self.fields.iter().find(|f| f.name == name))
    }

    /// Resolve a logical name against the accessor list, with the same
    /// alias-before-literal-name precedence as [`Self::find_field`].
    pub fn find_accessor(&self, name: &str) -> Option<&AccessorDescriptor> {
        self.accessors
            .iter()
            .find(|a| a.alias.is_some_and(|al| al == name))
            .or_else(|| self.accessors.iter().find(|a| a.name == name))
    }
}

/// Fluent registration surface handed to [`Properties::describe`].
pub struct SchemaBuilder<T> {
    type_name: &'static str,
    fields: Vec<FieldDescriptor>,
    accessors: Vec<AccessorDescriptor>,
    _marker: PhantomData<fn(T)>,
}

impl<T: 'static> SchemaBuilder<T> {
    pub(crate) fn new() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            fields: Vec::new(),
            accessors: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Declare a readable, writable field.
    pub fn field<V>(
        &mut self,
        name: &'static str,
        get: impl Fn(&T) -> V + Send + Sync + 'static,
        set: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> FieldRef<'_>
    where
        V: Serialize + DeserializeOwned + 'static,
    {
        self.fields.push(FieldDescriptor {
            name,
            alias: None,
            reader: Some(erase_reader(self.type_name, name, get)),
            writer: Some(erase_writer(self.type_name, name, set)),
        });
        FieldRef {
            entry: self.fields.last_mut().expect("entry just pushed"),
        }
    }

    /// Declare a field that resolves by name but cannot be read or written.
    ///
    /// Touching such a field fails with [`PropertyError::Inaccessible`],
    /// distinct from the [`PropertyError::NotFound`] a missing name produces.
    pub fn opaque_field(&mut self, name: &'static str) -> FieldRef<'_> {
        self.fields.push(FieldDescriptor {
            name,
            alias: None,
            reader: None,
            writer: None,
        });
        FieldRef {
            entry: self.fields.last_mut().expect("entry just pushed"),
        }
    }

    /// Declare a computed accessor under a logical name.
    ///
    /// The accessor is read-only until a setter is chained on the returned
    /// [`AccessorRef`].
    pub fn accessor<V>(
        &mut self,
        name: &'static str,
        get: impl Fn(&T) -> V + Send + Sync + 'static,
    ) -> AccessorRef<'_, T, V>
    where
        V: Serialize + DeserializeOwned + 'static,
    {
        self.accessors.push(AccessorDescriptor {
            name,
            alias: None,
            getter: erase_reader(self.type_name, name, get),
            setter: None,
        });
        AccessorRef {
            type_name: self.type_name,
            entry: self.accessors.last_mut().expect("entry just pushed"),
            _marker: PhantomData,
        }
    }

    fn finish(self) -> ObjectSchema {
        ObjectSchema {
            type_name: self.type_name,
            fields: self.fields,
            accessors: self.accessors,
        }
    }
}

/// Chained options for a just-declared field.
pub struct FieldRef<'a> {
    entry: &'a mut FieldDescriptor,
}

impl FieldRef<'_> {
    /// Attach an explicit-name alias that resolves ahead of literal names.
    pub fn alias(self, alias: &'static str) -> Self {
        self.entry.alias = Some(alias);
        self
    }
}

/// Chained options for a just-declared accessor.
pub struct AccessorRef<'a, T, V> {
    type_name: &'static str,
    entry: &'a mut AccessorDescriptor,
    _marker: PhantomData<fn(T, V)>,
}

impl<T, V> AccessorRef<'_, T, V>
where
    T: 'static,
    V: DeserializeOwned + 'static,
{
    /// Attach an explicit-name alias that resolves ahead of literal names.
    pub fn alias(self, alias: &'static str) -> Self {
        self.entry.alias = Some(alias);
        self
    }

    /// Attach the sibling setter, making the accessor writable.
    pub fn setter(self, set: impl Fn(&mut T, V) + Send + Sync + 'static) -> Self {
        self.entry.setter = Some(erase_writer(self.type_name, self.entry.name, set));
        self
    }
}

fn erase_reader<T, V>(
    type_name: &'static str,
    name: &'static str,
    get: impl Fn(&T) -> V + Send + Sync + 'static,
) -> Reader
where
    T: 'static,
    V: Serialize + 'static,
{
    Arc::new(move |object: &dyn Any| {
        let object = object
            .downcast_ref::<T>()
            .ok_or_else(|| mismatched_object(type_name))?;
        serde_json::to_value(get(object)).map_err(|source| PropertyError::Conversion {
            type_name,
            property: name.to_owned(),
            source,
        })
    })
}

fn erase_writer<T, V>(
    type_name: &'static str,
    name: &'static str,
    set: impl Fn(&mut T, V) + Send + Sync + 'static,
) -> Writer
where
    T: 'static,
    V: DeserializeOwned + 'static,
{
    Arc::new(move |object: &mut dyn Any, value: Value| {
        let object = object
            .downcast_mut::<T>()
            .ok_or_else(|| mismatched_object(type_name))?;
        let value = serde_json::from_value(value).map_err(|source| PropertyError::Conversion {
            type_name,
            property: name.to_owned(),
            source,
        })?;
        set(object, value);
        Ok(())
    })
}

fn mismatched_object(type_name: &'static str) -> PropertyError {
    PropertyError::InvalidArgument(format!("object is not a `{type_name}`"))
}

/// Concurrent cache of built schemas, keyed by `TypeId`.
///
/// First population may race: two threads can build the same schema, the
/// first insert wins, and the loser's copy is dropped. The computation is
/// idempotent and side-effect free, so this is cheaper than holding a lock
/// across `describe`. A partially built schema is never observable.
pub struct SchemaCache {
    schemas: RwLock<HashMap<TypeId, Arc<ObjectSchema>>>,
}

impl SchemaCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self {
            schemas: RwLock::new(HashMap::new()),
        }
    }

    /// The schema for `T`, building and caching it on first use.
    pub fn schema_of<T: Properties>(&self) -> Arc<ObjectSchema> {
        let id = TypeId::of::<T>();
        if let Some(schema) = self
            .schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
        {
            return Arc::clone(schema);
        }

        let mut builder = SchemaBuilder::<T>::new();
        T::describe(&mut builder);
        let built = Arc::new(builder.finish());

        let mut schemas = self
            .schemas
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(schemas.entry(id).or_insert(built))
    }
}

impl Default for SchemaCache {
    fn default() -> Self {
        Self::new()
    }
}

/// The schema for `T` from the process-wide cache.
pub fn schema_of<T: Properties>() -> Arc<ObjectSchema> {
    static CACHE: OnceLock<SchemaCache> = OnceLock::new();
    CACHE.get_or_init(SchemaCache::new).schema_of::<T>()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sample {
        count: u32,
        label: String,
    }

    impl Properties for Sample {
        fn describe(schema: &mut SchemaBuilder<Self>) {
            schema.field(
                "count",
                |s: &Sample| s.count,
                |s: &mut Sample, v| s.count = v,
            );
            schema
                .field(
                    "label",
                    |s: &Sample| s.label.clone(),
                    |s: &mut Sample, v| s.label = v,
                )
                .alias("title");
            schema.opaque_field("shadow");
            schema
                .accessor("doubled", |s: &Sample| s.count * 2)
                .setter(|s: &mut Sample, v: u32| s.count = v / 2);
        }
    }

    #[test]
    fn schema_is_cached_and_shared() {
        let first = schema_of::<Sample>();
        let second = schema_of::<Sample>();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.fields().len(), 3);
        assert_eq!(first.accessors().len(), 1);
    }

    #[test]
    fn alias_resolves_ahead_of_literal_name() {
        let schema = schema_of::<Sample>();
        let by_alias = schema.find_field("title").expect("alias should resolve");
        assert_eq!(by_alias.name(), "label");
        let by_name = schema.find_field("count").expect("name should resolve");
        assert_eq!(by_name.name(), "count");
        assert!(schema.find_field("missing").is_none());
    }

    #[test]
    fn opaque_fields_resolve_without_access() {
        let schema = schema_of::<Sample>();
        let shadow = schema.find_field("shadow").expect("declared field");
        assert!(shadow.reader().is_none());
        assert!(shadow.writer().is_none());
    }

    #[test]
    fn concurrent_first_population_yields_one_schema() {
        struct Racy;
        impl Properties for Racy {
            fn describe(schema: &mut SchemaBuilder<Self>) {
                schema.accessor("unit", |_: &Racy| 1u8);
            }
        }

        let cache = Arc::new(SchemaCache::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.schema_of::<Racy>())
            })
            .collect();
        let schemas: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for schema in &schemas {
            assert!(Arc::ptr_eq(schema, &schemas[0]));
            assert_eq!(schema.accessors().len(), 1);
        }
    }
}
