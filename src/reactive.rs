//! Observable single-slot holder for merged rule sets.
//!
//! A [`SheetRef`] is the stable cache handle returned by merge operations:
//! its identity never changes, while its contents are replaced in place on
//! recomputation. Observers subscribe once and see every replacement without
//! re-fetching. The engine is the sole writer; reads are explicit snapshots.

use std::cell::RefCell;
use std::rc::Rc;

use crate::sheet::RuleSet;

/// Subscriber callback invoked synchronously after each replacement.
type Callback = Rc<RefCell<dyn FnMut(&Rc<RuleSet>)>>;

/// Handle for removing a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription(u64);

/// A mutable, observable reference to a [`RuleSet`].
///
/// Cloning shares identity: all clones observe the same slot. Replacing the
/// contents is a crate-internal operation, distinct from creating a new ref.
#[derive(Clone)]
pub struct SheetRef {
    inner: Rc<RefCell<Inner>>,
}

struct Inner {
    value: Rc<RuleSet>,
    subscribers: Vec<(u64, Callback)>,
    next_id: u64,
}

impl SheetRef {
    pub fn new(value: Rc<RuleSet>) -> Self {
        SheetRef {
            inner: Rc::new(RefCell::new(Inner {
                value,
                subscribers: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// A ref holding an empty rule set; usable as a null object.
    pub fn empty() -> Self {
        SheetRef::new(Rc::new(RuleSet::default()))
    }

    /// Snapshot of the current value.
    pub fn get(&self) -> Rc<RuleSet> {
        Rc::clone(&self.inner.borrow().value)
    }

    /// Replace the held value and notify every current subscriber before
    /// returning. Crate-internal: the merge engine is the only writer.
    pub(crate) fn set(&self, value: Rc<RuleSet>) {
        let callbacks: Vec<Callback> = {
            let mut inner = self.inner.borrow_mut();
            inner.value = Rc::clone(&value);
            inner
                .subscribers
                .iter()
                .map(|(_, callback)| Rc::clone(callback))
                .collect()
        };
        // Slot borrow is released before callbacks run, so observers may
        // read or subscribe reentrantly.
        for callback in callbacks {
            (callback.borrow_mut())(&value);
        }
    }

    /// Register a callback for future replacements.
    pub fn subscribe(&self, callback: impl FnMut(&Rc<RuleSet>) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push((id, Rc::new(RefCell::new(callback))));
        Subscription(id)
    }

    pub fn unsubscribe(&self, subscription: Subscription) {
        self.inner
            .borrow_mut()
            .subscribers
            .retain(|(id, _)| *id != subscription.0);
    }

    /// Whether two refs share the same slot.
    pub fn same_ref(&self, other: &SheetRef) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for SheetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("SheetRef")
            .field("rules", &inner.value.len())
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}
