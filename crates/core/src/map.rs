//! Owned validated string-keyed mapping
//!
//! [`ScriveMap`] is the mapping counterpart of [`ScriveSet`](crate::ScriveSet):
//! values pass through the map's [`Validator`], batch inserts are
//! all-or-nothing, lifecycle transitions reach managed values and derived
//! copies.
//!
//! Keys are kept sorted, so iteration order is stable and `popitem` removes
//! the greatest key.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Bound;
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::error::{Error, Result};
use crate::lifecycle::{self, Lifecycle, Managed};
use crate::validator::Validator;
use crate::value::Value;

const OWNER: &str = "ScriveMap";

struct MapInner {
    lifecycle: Lifecycle,
    validator: Validator,
    items: RefCell<BTreeMap<String, Value>>,
    derived: RefCell<Vec<Weak<MapInner>>>,
}

/// Owned validated mapping handle
///
/// Cloning the handle shares the map; use [`ScriveMap::copy`] for a derived
/// copy.
#[derive(Clone)]
pub struct ScriveMap(Rc<MapInner>);

impl ScriveMap {
    /// Empty map whose values must satisfy `validator`
    pub fn new(validator: Validator) -> Self {
        Self::with_items(validator, BTreeMap::new())
    }

    /// Map holding `entries`, each value checked by `validator`
    pub fn from_entries(
        validator: Validator,
        entries: impl IntoIterator<Item = (String, Value)>,
    ) -> Result<Self> {
        let map = Self::new(validator);
        let checked = map.validate_all(entries)?;
        map.0.items.borrow_mut().extend(checked);
        Ok(map)
    }

    /// Map holding `entries` as given
    ///
    /// For values already checked by the caller, or decoded where no
    /// validator applies.
    pub fn from_entries_unchecked(
        validator: Validator,
        entries: impl IntoIterator<Item = (String, Value)>,
    ) -> Self {
        Self::with_items(validator, entries.into_iter().collect())
    }

    fn with_items(validator: Validator, items: BTreeMap<String, Value>) -> Self {
        ScriveMap(Rc::new(MapInner {
            lifecycle: Lifecycle::new(),
            validator,
            items: RefCell::new(items),
            derived: RefCell::new(Vec::new()),
        }))
    }

    /// The value validator
    pub fn validator(&self) -> &Validator {
        &self.0.validator
    }

    fn validate(&self, key: &str, value: Value) -> Result<Value> {
        self.0
            .validator
            .check_and_coerce(&format!("value for key {:?}", key), value)
    }

    fn validate_all(
        &self,
        entries: impl IntoIterator<Item = (String, Value)>,
    ) -> Result<Vec<(String, Value)>> {
        entries
            .into_iter()
            .map(|(key, value)| {
                let value = self.validate(&key, value)?;
                Ok((key, value))
            })
            .collect()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Guard for reads
    pub fn check_get(&self) -> Result<()> {
        self.0.lifecycle.check_get(OWNER)
    }

    /// Guard for writes
    pub fn check_set(&self) -> Result<()> {
        self.0.lifecycle.check_set(OWNER)
    }

    /// Whether the invalid flag is set
    pub fn is_invalid(&self) -> bool {
        self.0.lifecycle.is_invalid()
    }

    /// Whether the read-only flag is set
    pub fn is_read_only(&self) -> bool {
        self.0.lifecycle.is_read_only()
    }

    /// Invalidate this map, its managed values and its derived copies
    pub fn mark_invalid(&self) {
        lifecycle::mark_invalid(self);
    }

    /// Make this map, its managed values and its derived copies read-only
    pub fn mark_read_only(&self) {
        lifecycle::mark_read_only(self);
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Insert or replace the value under `key`
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        self.check_set()?;
        let key = key.into();
        let value = self.validate(&key, value.into())?;
        self.0.items.borrow_mut().insert(key, value);
        Ok(())
    }

    /// Remove `key`, failing if it is absent
    pub fn remove(&self, key: &str) -> Result<()> {
        self.pop(key).map(drop)
    }

    /// Remove and return the value under `key`, failing if it is absent
    pub fn pop(&self, key: &str) -> Result<Value> {
        self.check_set()?;
        self.0
            .items
            .borrow_mut()
            .remove(key)
            .ok_or_else(|| Error::NoSuchElement(format!("{:?}", key)))
    }

    /// Remove and return the value under `key`, or `default` if absent
    pub fn pop_or(&self, key: &str, default: impl Into<Value>) -> Result<Value> {
        self.check_set()?;
        Ok(self
            .0
            .items
            .borrow_mut()
            .remove(key)
            .unwrap_or_else(|| default.into()))
    }

    /// Remove and return the entry with the greatest key
    pub fn popitem(&self) -> Result<(String, Value)> {
        self.check_set()?;
        self.0
            .items
            .borrow_mut()
            .pop_last()
            .ok_or_else(|| Error::NoSuchElement("popitem from an empty mapping".to_string()))
    }

    /// Remove every entry
    pub fn clear(&self) -> Result<()> {
        self.check_set()?;
        self.0.items.borrow_mut().clear();
        Ok(())
    }

    /// Insert every entry
    ///
    /// All values are validated before any is stored.
    pub fn update<K, V>(&self, entries: impl IntoIterator<Item = (K, V)>) -> Result<()>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.check_set()?;
        let checked = self.validate_all(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect::<Vec<_>>(),
        )?;
        self.0.items.borrow_mut().extend(checked);
        Ok(())
    }

    /// Insert every entry of another owned map
    pub fn update_from(&self, other: &ScriveMap) -> Result<()> {
        let entries = other.items()?;
        self.update(entries)
    }

    /// Value under `key`, inserting `default` first if absent
    pub fn setdefault(&self, key: impl Into<String>, default: impl Into<Value>) -> Result<Value> {
        self.check_set()?;
        let key = key.into();
        if let Some(existing) = self.0.items.borrow().get(&key) {
            return Ok(existing.clone());
        }
        let value = self.validate(&key, default.into())?;
        self.0.items.borrow_mut().insert(key, value.clone());
        Ok(value)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Value under `key`, if any
    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        self.check_get()?;
        Ok(self.0.items.borrow().get(key).cloned())
    }

    /// Value under `key`, or `default`
    pub fn get_or(&self, key: &str, default: impl Into<Value>) -> Result<Value> {
        Ok(self.get(key)?.unwrap_or_else(|| default.into()))
    }

    /// Whether `key` is present
    pub fn contains_key(&self, key: &str) -> Result<bool> {
        self.check_get()?;
        Ok(self.0.items.borrow().contains_key(key))
    }

    /// Number of entries
    pub fn len(&self) -> Result<usize> {
        self.check_get()?;
        Ok(self.0.items.borrow().len())
    }

    /// Whether the map has no entries
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Keys, sorted
    pub fn keys(&self) -> Result<Vec<String>> {
        self.check_get()?;
        Ok(self.0.items.borrow().keys().cloned().collect())
    }

    /// Values, ordered by key
    pub fn values(&self) -> Result<Vec<Value>> {
        self.check_get()?;
        Ok(self.0.items.borrow().values().cloned().collect())
    }

    /// Entries, ordered by key
    pub fn items(&self) -> Result<Vec<(String, Value)>> {
        self.check_get()?;
        Ok(self.snapshot())
    }

    /// Lazy key iterator
    ///
    /// Every step re-checks the lifecycle, so an iterator outliving an
    /// invalidation yields the error.
    pub fn iter_keys(&self) -> impl Iterator<Item = Result<String>> + '_ {
        self.iter_items().map(|entry| entry.map(|(k, _)| k))
    }

    /// Lazy value iterator, same guarding as [`ScriveMap::iter_keys`]
    pub fn iter_values(&self) -> impl Iterator<Item = Result<Value>> + '_ {
        self.iter_items().map(|entry| entry.map(|(_, v)| v))
    }

    /// Lazy entry iterator, same guarding as [`ScriveMap::iter_keys`]
    pub fn iter_items(&self) -> impl Iterator<Item = Result<(String, Value)>> + '_ {
        let mut cursor: Option<String> = None;
        let mut done = false;
        std::iter::from_fn(move || {
            if done {
                return None;
            }
            if let Err(e) = self.check_get() {
                done = true;
                return Some(Err(e));
            }
            let items = self.0.items.borrow();
            let next = match &cursor {
                None => items.iter().next(),
                Some(last) => items
                    .range::<str, _>((Bound::Excluded(last.as_str()), Bound::Unbounded))
                    .next(),
            };
            match next {
                Some((k, v)) => {
                    cursor = Some(k.clone());
                    Some(Ok((k.clone(), v.clone())))
                }
                None => {
                    done = true;
                    None
                }
            }
        })
    }

    /// Entries without the lifecycle guard, for internal traversal
    pub(crate) fn snapshot(&self) -> Vec<(String, Value)> {
        self.0
            .items
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Whether both maps hold the same entries
    pub fn try_eq(&self, other: &ScriveMap) -> Result<bool> {
        self.check_get()?;
        other.check_get()?;
        Ok(*self.0.items.borrow() == *other.0.items.borrow())
    }

    /// First managed-object value whose attributes equal every criterion
    pub fn find_by_attributes(&self, criteria: &[(&str, Value)]) -> Result<Option<Value>> {
        for value in self.values()? {
            if let Value::Object(object) = &value {
                if object.matches(criteria)? {
                    return Ok(Some(value));
                }
            }
        }
        Ok(None)
    }

    /// Derived copy
    pub fn copy(&self) -> Result<ScriveMap> {
        self.check_get()?;
        let copy = Self::with_items(self.0.validator.clone(), self.0.items.borrow().clone());
        let mut derived = self.0.derived.borrow_mut();
        derived.retain(|d| d.strong_count() > 0);
        derived.push(Rc::downgrade(&copy.0));
        trace!(target: "scrive::lifecycle", derived = derived.len(), "derived mapping recorded");
        Ok(copy)
    }

    /// Whether both handles point at the same map
    pub fn ptr_eq(&self, other: &ScriveMap) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl Managed for ScriveMap {
    fn owner_name(&self) -> &str {
        OWNER
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.0.lifecycle
    }

    fn for_each_owned_child(&self, visit: &mut dyn FnMut(&dyn Managed)) {
        for (_, value) in self.snapshot() {
            if let Some(managed) = value.as_managed() {
                visit(managed);
            }
        }
        let derived: Vec<ScriveMap> = self
            .0
            .derived
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .map(ScriveMap)
            .collect();
        for map in &derived {
            visit(map);
        }
    }
}

impl fmt::Debug for ScriveMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(OWNER)
            .field("keys", &self.0.items.borrow().keys().collect::<Vec<_>>())
            .field("invalid", &self.is_invalid())
            .field("read_only", &self.is_read_only())
            .finish()
    }
}
