//! Per-origin property storage.

use std::borrow::Borrow;
use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use strum::IntoEnumIterator;

use super::Origin;

/// What one origin holds for one key.
///
/// `None`: the origin has no entry. `Some(None)`: the origin explicitly holds
/// "no value", which hides lower origins. `Some(Some(v))`: a value.
type Slot<V> = Option<Option<V>>;

/// A map from keys to values, with one independent slot per [`Origin`].
///
/// Reading a key returns the value from the highest origin that has an
/// entry for it. An entry may hold an explicit null (`None`), which is
/// different from having no entry at all: it wins over lower origins and
/// reads back as "no value".
///
/// ```
/// use tern_css::{Origin, StyleableMap};
///
/// let mut map = StyleableMap::new();
/// map.put(Origin::Author, "fill", Some("red"));
/// assert_eq!(map.get("fill"), Some(&"red"));
///
/// map.put(Origin::Inline, "fill", None);
/// assert_eq!(map.get("fill"), None);
/// assert_eq!(map.get_from(Origin::Author, "fill"), Some(&"red"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleableMap<K: Ord, V> {
    entries: BTreeMap<K, [Slot<V>; Origin::COUNT]>,
}

impl<K: Ord, V> Default for StyleableMap<K, V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<K: Ord, V> StyleableMap<K, V> {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value `origin` holds for `key`. `None` stores an explicit
    /// null. Returns what the slot held before.
    pub fn put(&mut self, origin: Origin, key: K, value: Option<V>) -> Slot<V> {
        let slots = self
            .entries
            .entry(key)
            .or_insert_with(|| std::array::from_fn(|_| None));
        slots[origin.rank()].replace(value)
    }

    /// The value `origin` holds for `key`, or `None` if it holds an explicit
    /// null or nothing at all.
    #[must_use]
    pub fn get_from<Q>(&self, origin: Origin, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.slot(origin, key)?.as_ref()
    }

    /// The effective value for `key`: the entry of the highest origin that
    /// has one. An explicit null there yields `None`.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let slots = self.entries.get(key)?;
        slots.iter().rev().flatten().next()?.as_ref()
    }

    /// The origin that supplies the effective value for `key`.
    #[must_use]
    pub fn effective_origin<Q>(&self, key: &Q) -> Option<Origin>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let slots = self.entries.get(key)?;
        Origin::iter().rev().find(|origin| slots[origin.rank()].is_some())
    }

    /// Whether `origin` has an entry (value or explicit null) for `key`.
    #[must_use]
    pub fn contains_key<Q>(&self, origin: Origin, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.slot(origin, key).is_some()
    }

    /// Remove `origin`'s entry for `key`, returning it.
    pub fn remove<Q>(&mut self, origin: Origin, key: &Q) -> Slot<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let slots = self.entries.get_mut(key)?;
        let removed = slots[origin.rank()].take();
        if slots.iter().all(Option::is_none) {
            let _ = self.entries.remove(key);
        }
        removed
    }

    /// Remove every entry `origin` holds. Other origins are untouched.
    pub fn remove_all(&mut self, origin: Origin) {
        self.entries.retain(|_, slots| {
            slots[origin.rank()] = None;
            slots.iter().any(Option::is_some)
        });
    }

    /// Keys with an entry in at least one origin, in key order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    /// Every key with its effective value, in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, Option<&V>)> {
        self.entries.iter().map(|(key, slots)| {
            let value = slots.iter().rev().flatten().next().and_then(Option::as_ref);
            (key, value)
        })
    }

    /// The entries `origin` holds, in key order.
    pub fn entries_from(&self, origin: Origin) -> impl Iterator<Item = (&K, Option<&V>)> {
        self.entries.iter().filter_map(move |(key, slots)| {
            slots[origin.rank()]
                .as_ref()
                .map(|value| (key, value.as_ref()))
        })
    }

    /// Number of keys with an entry in at least one origin.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no origin holds anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn slot<Q>(&self, origin: Origin, key: &Q) -> Option<&Option<V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entries.get(key)?[origin.rank()].as_ref()
    }
}

/// Serializes as `{ key: { origin: value-or-null, ... }, ... }`, listing only
/// the origins that have an entry.
impl<K, V> Serialize for StyleableMap<K, V>
where
    K: Ord + Serialize,
    V: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Slots<'a, V>(&'a [Slot<V>; Origin::COUNT]);

        impl<V: Serialize> Serialize for Slots<'_, V> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(None)?;
                for origin in Origin::iter() {
                    if let Some(value) = &self.0[origin.rank()] {
                        map.serialize_entry(&origin, value)?;
                    }
                }
                map.end()
            }
        }

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, slots) in &self.entries {
            map.serialize_entry(key, &Slots(slots))?;
        }
        map.end()
    }
}
