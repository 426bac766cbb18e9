use crate::error::AlreadyConstrained;
use crate::sync::{Mutex, MutexGuard};
use log::trace;
use std::collections::HashMap;
use std::hash::Hash;

/// Outcome of [`ConstraintTable::try_admit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Admission {
    Admitted,
    /// duplicate of a value that is still constrained
    Rejected,
}

/// Per-value uniqueness state.
///
/// `count` is the number of holders keeping the value out of the queue.
/// A `disabled` constraint lets the next arrival through and re-arms on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Constraint {
    count: usize,
    disabled: bool,
}

impl Constraint {
    fn active(&self) -> bool {
        !self.disabled
    }

    fn rearm(&mut self) {
        self.count += 1;
        self.disabled = false;
    }
}

/// Maps pending values to their [`Constraint`].
///
/// A value without an entry is unconstrained. Every operation holds the lock
/// only for the map update itself.
pub(crate) struct ConstraintTable<T> {
    entries: Mutex<HashMap<T, Constraint>>,
}

impl<T: Eq + Hash + Clone> ConstraintTable<T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Admits `value` and constrains it, unless it is already actively constrained.
    pub(crate) fn try_admit(&self, value: &T) -> Admission {
        let mut entries = self.lock();
        match entries.get_mut(value) {
            None => {
                entries.insert(value.clone(), Constraint { count: 1, disabled: false });
                Admission::Admitted
            }
            Some(constraint) if constraint.disabled => {
                constraint.rearm();
                trace!("re-armed ignored constraint ({} holders)", constraint.count);
                Admission::Admitted
            }
            Some(_) => Admission::Rejected,
        }
    }

    /// Drops one holder of `value`'s constraint. Returns `false` if there was none.
    pub(crate) fn release(&self, value: &T) -> bool {
        let mut entries = self.lock();
        let Some(constraint) = entries.get_mut(value) else {
            return false;
        };
        // an entry created by ignore_once has no holder yet; releasing it clears it.
        constraint.count = constraint.count.saturating_sub(1);
        if constraint.count == 0 {
            entries.remove(value);
        }
        true
    }

    /// Lets the next arrival of `value` through even if it is constrained.
    pub(crate) fn ignore_once(&self, value: T) {
        self.lock().entry(value).or_default().disabled = true;
    }

    /// Constrains `value` without it passing through the queue.
    pub(crate) fn force_add(&self, value: T) -> Result<(), AlreadyConstrained<T>> {
        let mut entries = self.lock();
        match entries.get_mut(&value) {
            Some(constraint) if constraint.active() => Err(AlreadyConstrained(value)),
            Some(constraint) => {
                constraint.rearm();
                Ok(())
            }
            None => {
                entries.insert(value, Constraint { count: 1, disabled: false });
                Ok(())
            }
        }
    }

    /// Checks if an arrival of `value` would be suppressed right now.
    pub(crate) fn is_constrained(&self, value: &T) -> bool {
        self.lock().get(value).is_some_and(Constraint::active)
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<T, Constraint>> {
        match self.entries.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
