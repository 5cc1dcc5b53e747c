//! Specialized collection types

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

pub use slotmap::{SlotMap, DefaultKey};

/// Handle-based map using slot map for stable references
pub type HandleMap<T> = SlotMap<DefaultKey, T>;

/// Typed handle for type-safe asset references
///
/// A handle never owns the value it names; it stays valid until the owning
/// map removes the slot, after which lookups return `None`.
pub struct TypedHandle<T> {
    key: DefaultKey,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> TypedHandle<T> {
    /// Create a new typed handle from a key
    pub fn new(key: DefaultKey) -> Self {
        Self {
            key,
            _phantom: PhantomData,
        }
    }

    /// Get the underlying key
    pub fn key(&self) -> DefaultKey {
        self.key
    }

    /// Resolve the handle against the map that issued it
    pub fn resolve<'a>(&self, map: &'a HandleMap<T>) -> Option<&'a T> {
        map.get(self.key)
    }
}

// Manual impls: derives would put bounds on `T` itself.
impl<T> Clone for TypedHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedHandle<T> {}

impl<T> PartialEq for TypedHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<T> Eq for TypedHandle<T> {}

impl<T> Hash for TypedHandle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl<T> fmt::Debug for TypedHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypedHandle").field(&self.key).finish()
    }
}

/// Insert a value into a handle map and return a typed handle to it
pub fn insert_typed<T>(map: &mut HandleMap<T>, value: T) -> TypedHandle<T> {
    TypedHandle::new(map.insert(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_handle_resolves_until_removed() {
        let mut map: HandleMap<String> = HandleMap::new();
        let handle = insert_typed(&mut map, "cube".to_string());

        assert_eq!(handle.resolve(&map).map(String::as_str), Some("cube"));

        map.remove(handle.key());
        assert!(handle.resolve(&map).is_none());

        // A new value in the reused slot must not be reachable through the stale handle
        let fresh = insert_typed(&mut map, "sphere".to_string());
        assert_ne!(fresh, handle);
        assert!(handle.resolve(&map).is_none());
    }
}
