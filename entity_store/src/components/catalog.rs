//! Factory table of component kinds, keyed by kind name.

use serde::de::{self, DeserializeOwned, Deserializer, Visitor};
use serde::{forward_to_deserialize_any, Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

use super::{Component, ComponentKind, ErasedComponent};
use crate::error::{EcsError, EcsResult, LoadError};

/// Builds a default instance of a kind.
pub type DefaultFn = fn() -> Box<dyn ErasedComponent>;

/// Overwrites the named fields of an instance in place.
pub type LoadFn = fn(&mut dyn ErasedComponent, &Map<String, Value>) -> Result<(), LoadError>;

/// Everything the catalog knows about one kind.
#[derive(Clone, Copy)]
pub struct CatalogEntry {
    pub kind: ComponentKind,
    pub make_default: DefaultFn,
    /// `None` for kinds registered without payload support.
    pub load: Option<LoadFn>,
}

impl fmt::Debug for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogEntry")
            .field("kind", &self.kind)
            .field("loadable", &self.load.is_some())
            .finish()
    }
}

/// The set of component kinds a host knows how to build by name.
///
/// Populated once at startup and then shared read-only by every entity
/// that loads components from a payload.
#[derive(Debug, Clone, Default)]
pub struct ComponentCatalog {
    entries: HashMap<&'static str, CatalogEntry>,
}

impl ComponentCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a kind that can be default-constructed by name.
    pub fn register<T: Component>(&mut self) -> EcsResult<ComponentKind> {
        self.insert(CatalogEntry {
            kind: ComponentKind::of::<T>(),
            make_default: make_default::<T>,
            load: None,
        })
    }

    /// Add a kind that can also be populated from a payload object.
    pub fn register_loadable<T>(&mut self) -> EcsResult<ComponentKind>
    where
        T: Component + Serialize + DeserializeOwned,
    {
        self.insert(CatalogEntry {
            kind: ComponentKind::of::<T>(),
            make_default: make_default::<T>,
            load: Some(load_fields::<T>),
        })
    }

    fn insert(&mut self, entry: CatalogEntry) -> EcsResult<ComponentKind> {
        let name = entry.kind.name();
        if self.entries.contains_key(name) {
            return Err(EcsError::DuplicateRegistration { kind: name });
        }
        tracing::trace!(kind = name, loadable = entry.load.is_some(), "catalog entry added");
        self.entries.insert(name, entry);
        Ok(entry.kind)
    }

    /// Look up a kind by name.
    pub fn entry(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.get(name)
    }

    /// Resolve a name to its kind, failing with `InvalidKind` for unknown names.
    pub fn kind(&self, name: &str) -> EcsResult<ComponentKind> {
        self.entry(name)
            .map(|entry| entry.kind)
            .ok_or_else(|| EcsError::InvalidKind {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All catalogued kinds, in no particular order.
    pub fn kinds(&self) -> impl Iterator<Item = ComponentKind> + '_ {
        self.entries.values().map(|entry| entry.kind)
    }
}

fn make_default<T: Component>() -> Box<dyn ErasedComponent> {
    Box::new(T::default())
}

/// Overwrite the fields named in `fields`, leaving every other field alone.
///
/// Field names come from the type's own `Deserialize` impl, so fields the
/// serializer currently omits can still be set. The current value is
/// serialized to fill in unnamed fields, then deserialized in place into a
/// copy, which keeps fields marked `#[serde(skip)]` intact.
fn load_fields<T>(component: &mut dyn ErasedComponent, fields: &Map<String, Value>) -> Result<(), LoadError>
where
    T: Component + Serialize + DeserializeOwned,
{
    let kind = T::kind_name();
    let target = component
        .as_any_mut()
        .downcast_mut::<T>()
        .ok_or(LoadError::NotLoadable(kind))?;

    let known = field_names::<T>();
    if let Some(field) = fields.keys().find(|field| !known.contains(&field.as_str())) {
        return Err(LoadError::UnknownField {
            kind,
            field: field.clone(),
        });
    }

    let Value::Object(mut merged) =
        serde_json::to_value(&*target).map_err(|source| LoadError::Field { kind, source })?
    else {
        return Err(LoadError::NotLoadable(kind));
    };
    merged.extend(fields.iter().map(|(field, value)| (field.clone(), value.clone())));

    let mut staged = target.clone();
    Deserialize::deserialize_in_place(Value::Object(merged), &mut staged)
        .map_err(|source| LoadError::Field { kind, source })?;
    *target = staged;
    Ok(())
}

/// Names of the fields `T` accepts when deserialized from a map.
///
/// Derived impls hand their field list to `deserialize_struct`; this
/// deserializer records that list and stops. Types that are not structs
/// report no fields.
fn field_names<T: DeserializeOwned>() -> &'static [&'static str] {
    let mut names: &'static [&'static str] = &[];
    let _ = T::deserialize(FieldNames(&mut names));
    names
}

struct FieldNames<'a>(&'a mut &'static [&'static str]);

impl<'de> Deserializer<'de> for FieldNames<'_> {
    type Error = de::value::Error;

    fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, Self::Error> {
        Err(de::Error::custom("not a struct"))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value, Self::Error> {
        *self.0 = fields;
        Err(de::Error::custom("field names recorded"))
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct map enum identifier ignored_any
    }
}
