//! Component kinds and the capability contract every component satisfies.

mod catalog;

pub use catalog::*;

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A data record representing one facet of an entity's state.
///
/// `Default` is the fallback constructor used when a component is added
/// without a prototype, and `Clone` must produce an independent deep copy.
///
/// ```
/// use entity_store::Component;
///
/// #[derive(Debug, Clone, Default)]
/// struct Health {
///     current: i32,
/// }
///
/// impl Component for Health {}
///
/// assert_eq!(Health::kind_name(), "Health");
/// ```
pub trait Component: Any + Clone + Default + fmt::Debug {
    /// Name used for this kind in payloads and error messages.
    ///
    /// Defaults to the type's name without its module path or generic
    /// arguments, so `Wrapper<u8>` and `Wrapper<u16>`, or two `Health` types
    /// from different modules, share a name. Override it for such types;
    /// a [`ComponentCatalog`] rejects the second registration of a name.
    fn kind_name() -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }
}

/// Strip the module path (and any generic arguments) from a type name.
fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Stable identity of a component kind.
///
/// Two kinds are equal when they name the same Rust type; the display name
/// is carried along for diagnostics only.
#[derive(Clone, Copy)]
pub struct ComponentKind {
    id: TypeId,
    name: &'static str,
}

impl ComponentKind {
    /// The kind of component type `T`.
    pub fn of<T: Component>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: T::kind_name(),
        }
    }

    /// Display name of the kind.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }
}

impl PartialEq for ComponentKind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ComponentKind {}

impl Hash for ComponentKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentKind({})", self.name)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Object-safe view of a [`Component`], as stored in entity slots.
pub trait ErasedComponent: Any + fmt::Debug {
    fn kind(&self) -> ComponentKind;

    /// Deep copy behind a fresh box.
    fn clone_boxed(&self) -> Box<dyn ErasedComponent>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ErasedComponent for T {
    fn kind(&self) -> ComponentKind {
        ComponentKind::of::<T>()
    }

    fn clone_boxed(&self) -> Box<dyn ErasedComponent> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Clone for Box<dyn ErasedComponent> {
    fn clone(&self) -> Self {
        (**self).clone_boxed()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Component kinds shared by the crate's unit tests.

    use serde::{Deserialize, Serialize};

    use super::Component;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct Position {
        pub x: i32,
        pub y: i32,
    }

    impl Position {
        pub fn new(x: i32, y: i32) -> Self {
            Self { x, y }
        }
    }

    impl Component for Position {}

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct Name {
        pub value: String,
    }

    impl Component for Name {}

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct A;

    impl Component for A {}

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct B;

    impl Component for B {}

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct C;

    impl Component for C {}
}
