//! Lifecycle flags and their cascade
//!
//! Every managed object and owned collection carries two flags:
//!
//! | Flag | Blocks | Reversible |
//! |------|--------|------------|
//! | `invalid` | every get and set | never |
//! | `read_only` | every set | never cleared by the framework |
//!
//! `invalid` dominates: an object that is both invalid and read-only
//! reports [`Error::ObjectInvalid`] for writes too.
//!
//! Transitions cascade through the object graph with a single post-order
//! traversal over [`Managed::for_each_owned_child`]: children are marked
//! before their owner.

use std::cell::Cell;

use tracing::trace;

use crate::error::{Error, Result};

/// The two lifecycle flags of a managed node
#[derive(Debug, Default)]
pub struct Lifecycle {
    invalid: Cell<bool>,
    read_only: Cell<bool>,
}

impl Lifecycle {
    /// Fresh flags: valid and writable
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the invalid flag is set
    pub fn is_invalid(&self) -> bool {
        self.invalid.get()
    }

    /// Whether the read-only flag is set
    pub fn is_read_only(&self) -> bool {
        self.read_only.get()
    }

    /// Guard for every read
    pub fn check_get(&self, owner: &str) -> Result<()> {
        if self.invalid.get() {
            return Err(Error::ObjectInvalid(owner.to_string()));
        }
        Ok(())
    }

    /// Guard for every write
    pub fn check_set(&self, owner: &str) -> Result<()> {
        self.check_get(owner)?;
        if self.read_only.get() {
            return Err(Error::ObjectReadOnly(owner.to_string()));
        }
        Ok(())
    }

    pub(crate) fn apply(&self, transition: Transition) {
        match transition {
            Transition::Invalid => self.invalid.set(true),
            Transition::ReadOnly => self.read_only.set(true),
        }
    }
}

/// A lifecycle transition applied through [`cascade`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Set the invalid flag
    Invalid,
    /// Set the read-only flag
    ReadOnly,
}

/// A node of the managed object graph
///
/// Implemented by [`Object`](crate::Object), [`ScriveSet`](crate::ScriveSet)
/// and [`ScriveMap`](crate::ScriveMap).
pub trait Managed {
    /// Display name used in lifecycle errors
    fn owner_name(&self) -> &str;

    /// The node's flags
    fn lifecycle(&self) -> &Lifecycle;

    /// Visit every node that must receive this node's transitions
    ///
    /// Objects visit the managed values of their attributes (back-references
    /// excluded); collections visit their managed members and then the
    /// collections derived from them.
    fn for_each_owned_child(&self, visit: &mut dyn FnMut(&dyn Managed));
}

/// Post-order traversal applying `transition` to `node` and everything it owns
pub fn cascade(node: &dyn Managed, transition: Transition) {
    node.for_each_owned_child(&mut |child| cascade(child, transition));
    trace!(target: "scrive::lifecycle", owner = node.owner_name(), ?transition, "flag set");
    node.lifecycle().apply(transition);
}

/// Invalidate `node` and everything reachable through it
pub fn mark_invalid(node: &dyn Managed) {
    cascade(node, Transition::Invalid);
}

/// Make `node` and everything reachable through it read-only
pub fn mark_read_only(node: &dyn Managed) {
    cascade(node, Transition::ReadOnly);
}
