//! Owned validated set
//!
//! [`ScriveSet`] behaves like a native set of [`Value`]s, but:
//!
//! 1. every inserted element goes through the set's element [`Validator`],
//!    and bulk inserts validate the whole batch before touching storage;
//! 2. it carries the same lifecycle flags as a managed object, guarding every
//!    query with `check_get` and every mutation with `check_set`;
//! 3. lifecycle transitions cascade to member objects;
//! 4. sets produced by non-mutating operations (`copy`, `union`, ...) are
//!    recorded as *derived* and receive the source's later transitions,
//!    even though they share no storage with it.
//!
//! Derived sets are held weakly: the source only notifies them.
//!
//! ## Equality
//!
//! [`ScriveSet::try_eq`] compares elements *and* the read-only flags, so a
//! read-only transition is observable through equality.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashSet;
use tracing::trace;

use crate::error::{Error, Result};
use crate::lifecycle::{self, Lifecycle, Managed};
use crate::validator::Validator;
use crate::value::Value;

const OWNER: &str = "ScriveSet";
const ELEMENT: &str = "element";

struct SetInner {
    lifecycle: Lifecycle,
    validator: Validator,
    items: RefCell<FxHashSet<Value>>,
    derived: RefCell<Vec<Weak<SetInner>>>,
}

/// Right-hand side of a set operation
#[derive(Debug, Clone)]
pub enum SetOperand {
    /// Another owned set; read through its `check_get` guard
    Owned(ScriveSet),
    /// A plain, unmanaged collection
    Plain(Vec<Value>),
}

impl SetOperand {
    fn values(&self) -> Result<Vec<Value>> {
        match self {
            SetOperand::Owned(set) => set.to_vec(),
            SetOperand::Plain(values) => Ok(values.clone()),
        }
    }

    fn hashed(&self) -> Result<FxHashSet<Value>> {
        Ok(self.values()?.into_iter().collect())
    }
}

impl From<ScriveSet> for SetOperand {
    fn from(set: ScriveSet) -> Self {
        SetOperand::Owned(set)
    }
}

impl From<&ScriveSet> for SetOperand {
    fn from(set: &ScriveSet) -> Self {
        SetOperand::Owned(set.clone())
    }
}

impl<T: Into<Value>> From<Vec<T>> for SetOperand {
    fn from(values: Vec<T>) -> Self {
        SetOperand::Plain(values.into_iter().map(Into::into).collect())
    }
}

/// Owned validated set handle
///
/// Cloning the handle shares the set; use [`ScriveSet::copy`] for a
/// derived copy.
#[derive(Clone)]
pub struct ScriveSet(Rc<SetInner>);

impl ScriveSet {
    /// Empty set whose elements must satisfy `validator`
    pub fn new(validator: Validator) -> Self {
        Self::with_items(validator, FxHashSet::default())
    }

    /// Set holding `values`, each checked by `validator`
    pub fn from_values(
        validator: Validator,
        values: impl IntoIterator<Item = Value>,
    ) -> Result<Self> {
        let set = Self::new(validator);
        let checked = set.validate_all(values)?;
        set.0.items.borrow_mut().extend(checked);
        Ok(set)
    }

    fn with_items(validator: Validator, items: FxHashSet<Value>) -> Self {
        ScriveSet(Rc::new(SetInner {
            lifecycle: Lifecycle::new(),
            validator,
            items: RefCell::new(items),
            derived: RefCell::new(Vec::new()),
        }))
    }

    /// The element validator
    pub fn validator(&self) -> &Validator {
        &self.0.validator
    }

    fn validate_all(&self, values: impl IntoIterator<Item = Value>) -> Result<Vec<Value>> {
        values
            .into_iter()
            .map(|v| self.0.validator.check_and_coerce(ELEMENT, v))
            .collect()
    }

    fn validated(&self, operand: &SetOperand) -> Result<FxHashSet<Value>> {
        Ok(self.validate_all(operand.values()?)?.into_iter().collect())
    }

    fn collect_operands<I, O>(others: I) -> Result<Vec<SetOperand>>
    where
        I: IntoIterator<Item = O>,
        O: Into<SetOperand>,
    {
        Ok(others.into_iter().map(Into::into).collect())
    }

    /// Wrap `items` in a new set sharing this set's validator and record it
    /// as derived from this one
    fn derive(&self, items: FxHashSet<Value>) -> ScriveSet {
        let set = Self::with_items(self.0.validator.clone(), items);
        let mut derived = self.0.derived.borrow_mut();
        derived.retain(|d| d.strong_count() > 0);
        derived.push(Rc::downgrade(&set.0));
        trace!(target: "scrive::lifecycle", derived = derived.len(), "derived set recorded");
        set
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

    /// Invalidate this set, its member objects and its derived sets
    pub fn mark_invalid(&self) {
        lifecycle::mark_invalid(self);
    }

    /// Make this set, its member objects and its derived sets read-only
    pub fn mark_read_only(&self) {
        lifecycle::mark_read_only(self);
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Insert one element
    pub fn add(&self, value: impl Into<Value>) -> Result<()> {
        self.check_set()?;
        let value = self.0.validator.check_and_coerce(ELEMENT, value.into())?;
        self.0.items.borrow_mut().insert(value);
        Ok(())
    }

    /// Remove an element, failing if it is absent
    pub fn remove(&self, value: &Value) -> Result<()> {
        self.check_set()?;
        if self.0.items.borrow_mut().remove(value) {
            Ok(())
        } else {
            Err(Error::NoSuchElement(value.repr()))
        }
    }

    /// Remove an element if present
    pub fn discard(&self, value: &Value) -> Result<()> {
        self.check_set()?;
        self.0.items.borrow_mut().remove(value);
        Ok(())
    }

    /// Remove and return an arbitrary element
    pub fn pop(&self) -> Result<Value> {
        self.check_set()?;
        let mut items = self.0.items.borrow_mut();
        let value = items
            .iter()
            .next()
            .cloned()
            .ok_or_else(|| Error::NoSuchElement("pop from an empty set".to_string()))?;
        items.remove(&value);
        Ok(value)
    }

    /// Remove every element
    pub fn clear(&self) -> Result<()> {
        self.check_set()?;
        self.0.items.borrow_mut().clear();
        Ok(())
    }

    /// In-place union with every operand
    ///
    /// All elements of all operands are validated before any is inserted.
    pub fn update<I, O>(&self, others: I) -> Result<()>
    where
        I: IntoIterator<Item = O>,
        O: Into<SetOperand>,
    {
        self.check_set()?;
        let mut incoming = Vec::new();
        for operand in Self::collect_operands(others)? {
            incoming.extend(operand.values()?);
        }
        let checked = self.validate_all(incoming)?;
        self.0.items.borrow_mut().extend(checked);
        Ok(())
    }

    /// Keep only elements present in every operand
    pub fn intersection_update<I, O>(&self, others: I) -> Result<()>
    where
        I: IntoIterator<Item = O>,
        O: Into<SetOperand>,
    {
        self.check_set()?;
        let keep = Self::collect_operands(others)?
            .iter()
            .map(|operand| self.validated(operand))
            .collect::<Result<Vec<_>>>()?;
        self.0
            .items
            .borrow_mut()
            .retain(|v| keep.iter().all(|other| other.contains(v)));
        Ok(())
    }

    /// Remove every element present in any operand
    pub fn difference_update<I, O>(&self, others: I) -> Result<()>
    where
        I: IntoIterator<Item = O>,
        O: Into<SetOperand>,
    {
        self.check_set()?;
        let mut drop = Vec::new();
        for operand in Self::collect_operands(others)? {
            drop.extend(self.validated(&operand)?);
        }
        let mut items = self.0.items.borrow_mut();
        for value in &drop {
            items.remove(value);
        }
        Ok(())
    }

    /// Keep elements present in exactly one of `self` and `other`
    pub fn symmetric_difference_update(&self, other: impl Into<SetOperand>) -> Result<()> {
        self.check_set()?;
        let other = self.validate_all(other.into().hashed()?)?;
        let mut items = self.0.items.borrow_mut();
        for value in other {
            if !items.remove(&value) {
                items.insert(value);
            }
        }
        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Membership test
    pub fn contains(&self, value: &Value) -> Result<bool> {
        self.check_get()?;
        Ok(self.0.items.borrow().contains(value))
    }

    /// Number of elements
    pub fn len(&self) -> Result<usize> {
        self.check_get()?;
        Ok(self.0.items.borrow().len())
    }

    /// Whether the set has no elements
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Elements, in unspecified order
    pub fn to_vec(&self) -> Result<Vec<Value>> {
        self.check_get()?;
        Ok(self.snapshot())
    }

    /// Iterate over a snapshot of the elements
    pub fn iter(&self) -> Result<std::vec::IntoIter<Value>> {
        Ok(self.to_vec()?.into_iter())
    }

    /// Elements without the lifecycle guard, for internal traversal
    pub(crate) fn snapshot(&self) -> Vec<Value> {
        self.0.items.borrow().iter().cloned().collect()
    }

    /// Equality with another set or plain collection
    ///
    /// Against another `ScriveSet` the read-only flags must match too.
    pub fn try_eq(&self, other: impl Into<SetOperand>) -> Result<bool> {
        self.check_get()?;
        let other = other.into();
        let same_flags = match &other {
            SetOperand::Owned(set) => set.is_read_only() == self.is_read_only(),
            SetOperand::Plain(_) => true,
        };
        Ok(same_flags && *self.0.items.borrow() == other.hashed()?)
    }

    /// Whether every element is also in `other`
    pub fn is_subset(&self, other: impl Into<SetOperand>) -> Result<bool> {
        self.check_get()?;
        let other = other.into().hashed()?;
        Ok(self.0.items.borrow().is_subset(&other))
    }

    /// Whether every element of `other` is also here
    pub fn is_superset(&self, other: impl Into<SetOperand>) -> Result<bool> {
        self.check_get()?;
        let other = other.into().hashed()?;
        Ok(self.0.items.borrow().is_superset(&other))
    }

    /// Whether no element is shared with `other`
    pub fn is_disjoint(&self, other: impl Into<SetOperand>) -> Result<bool> {
        self.check_get()?;
        let other = other.into().hashed()?;
        Ok(self.0.items.borrow().is_disjoint(&other))
    }

    /// First member object whose attributes equal every criterion
    pub fn find_by_attributes(&self, criteria: &[(&str, Value)]) -> Result<Option<Value>> {
        for value in self.to_vec()? {
            if let Value::Object(object) = &value {
                if object.matches(criteria)? {
                    return Ok(Some(value));
                }
            }
        }
        Ok(None)
    }

    // ========================================================================
    // Derived sets
    // ========================================================================

    /// Derived copy
    pub fn copy(&self) -> Result<ScriveSet> {
        self.check_get()?;
        let items = self.0.items.borrow().clone();
        Ok(self.derive(items))
    }

    /// Derived union with every operand
    pub fn union<I, O>(&self, others: I) -> Result<ScriveSet>
    where
        I: IntoIterator<Item = O>,
        O: Into<SetOperand>,
    {
        self.check_get()?;
        let mut incoming = Vec::new();
        for operand in Self::collect_operands(others)? {
            incoming.extend(operand.values()?);
        }
        let checked = self.validate_all(incoming)?;
        let mut items = self.0.items.borrow().clone();
        items.extend(checked);
        Ok(self.derive(items))
    }

    /// Derived intersection with every operand
    pub fn intersection<I, O>(&self, others: I) -> Result<ScriveSet>
    where
        I: IntoIterator<Item = O>,
        O: Into<SetOperand>,
    {
        self.check_get()?;
        let keep = Self::collect_operands(others)?
            .iter()
            .map(|operand| self.validated(operand))
            .collect::<Result<Vec<_>>>()?;
        let items = self
            .0
            .items
            .borrow()
            .iter()
            .filter(|v| keep.iter().all(|other| other.contains(*v)))
            .cloned()
            .collect();
        Ok(self.derive(items))
    }

    /// Derived difference: elements not in any operand
    pub fn difference<I, O>(&self, others: I) -> Result<ScriveSet>
    where
        I: IntoIterator<Item = O>,
        O: Into<SetOperand>,
    {
        self.check_get()?;
        let mut drop = FxHashSet::default();
        for operand in Self::collect_operands(others)? {
            drop.extend(self.validated(&operand)?);
        }
        let items = self.0.items.borrow().difference(&drop).cloned().collect();
        Ok(self.derive(items))
    }

    /// Derived symmetric difference with `other`
    pub fn symmetric_difference(&self, other: impl Into<SetOperand>) -> Result<ScriveSet> {
        self.check_get()?;
        let other: FxHashSet<Value> = self.validate_all(other.into().hashed()?)?.into_iter().collect();
        let items = self
            .0
            .items
            .borrow()
            .symmetric_difference(&other)
            .cloned()
            .collect();
        Ok(self.derive(items))
    }

    /// Reflected difference: elements of the plain `other` not in this set
    ///
    /// The result is still derived from this set.
    pub fn rdifference(&self, other: impl Into<SetOperand>) -> Result<ScriveSet> {
        self.check_get()?;
        let other: FxHashSet<Value> = self.validate_all(other.into().hashed()?)?.into_iter().collect();
        let items = other.difference(&self.0.items.borrow()).cloned().collect();
        Ok(self.derive(items))
    }

    /// Whether both handles point at the same set
    pub fn ptr_eq(&self, other: &ScriveSet) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl Managed for ScriveSet {
    fn owner_name(&self) -> &str {
        OWNER
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.0.lifecycle
    }

    fn for_each_owned_child(&self, visit: &mut dyn FnMut(&dyn Managed)) {
        for member in self.snapshot() {
            if let Some(managed) = member.as_managed() {
                visit(managed);
            }
        }
        let derived: Vec<ScriveSet> = self
            .0
            .derived
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .map(ScriveSet)
            .collect();
        for set in &derived {
            visit(set);
        }
    }
}

impl fmt::Debug for ScriveSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(OWNER)
            .field("len", &self.0.items.borrow().len())
            .field("invalid", &self.is_invalid())
            .field("read_only", &self.is_read_only())
            .finish()
    }
}
