use std::{any::type_name, fmt, sync::Arc};

use crate::{lifetime::OwnerRef, Accessor, LifetimePolicy};

/// An owner plus an [`Accessor`] for one of its slots: a place that emitted
/// values of type `T` get written to.
///
/// The owner's type is erased, such that targets with different owner types
/// can be bound to the same publisher in one call.
///
/// Until it is bound, a `Target` keeps its owner alive. Once bound, the
/// [`LifetimePolicy`] of the binding decides.
pub struct Target<T> {
    inner: Box<dyn Attach<T>>,
    owner_type: &'static str,
}

impl<T> Target<T>
where
    T: Clone + PartialEq + 'static,
{
    /// Pair the given owner with an accessor for one of its slots.
    pub fn new<O>(owner: &Arc<O>, accessor: Accessor<O, T>) -> Self
    where
        O: ?Sized + Send + Sync + 'static,
    {
        Self {
            inner: Box::new(Unattached { owner: owner.clone(), accessor }),
            owner_type: type_name::<O>(),
        }
    }
}

impl<T> Target<T> {
    pub(crate) fn attach(self, policy: LifetimePolicy) -> AttachedTarget<T> {
        self.inner.attach(policy)
    }
}

impl<T> fmt::Debug for Target<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target").field("owner_type", &self.owner_type).finish_non_exhaustive()
    }
}

/// What happened to a target for one emitted value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Assign {
    /// The value differed from the slot's contents and was written.
    Written,
    /// The slot already held an equal value.
    Unchanged,
    /// The target's weakly-held owner is gone.
    Released,
}

/// A target that has been bound under a [`LifetimePolicy`].
pub(crate) struct AttachedTarget<T> {
    slot: Arc<dyn Slot<T>>,
}

impl<T> AttachedTarget<T> {
    pub(crate) fn assign(&self, value: &T) -> Assign {
        self.slot.assign(value)
    }
}

impl<T> Clone for AttachedTarget<T> {
    fn clone(&self) -> Self {
        Self { slot: self.slot.clone() }
    }
}

trait Attach<T>: Send {
    fn attach(self: Box<Self>, policy: LifetimePolicy) -> AttachedTarget<T>;
}

trait Slot<T>: Send + Sync {
    fn assign(&self, value: &T) -> Assign;
}

struct Unattached<O: ?Sized, T> {
    owner: Arc<O>,
    accessor: Accessor<O, T>,
}

impl<O, T> Attach<T> for Unattached<O, T>
where
    O: ?Sized + Send + Sync + 'static,
    T: Clone + PartialEq + 'static,
{
    fn attach(self: Box<Self>, policy: LifetimePolicy) -> AttachedTarget<T> {
        let Unattached { owner, accessor } = *self;
        // For weak and unowned bindings, this drops the last strong reference
        // the target held.
        let owner = OwnerRef::new(owner, policy);
        AttachedTarget { slot: Arc::new(Bound { owner, accessor }) }
    }
}

struct Bound<O: ?Sized, T> {
    owner: OwnerRef<O>,
    accessor: Accessor<O, T>,
}

impl<O, T> Slot<T> for Bound<O, T>
where
    O: ?Sized + Send + Sync,
    T: Clone + PartialEq,
{
    fn assign(&self, value: &T) -> Assign {
        match self.owner.with(|owner| self.accessor.set_eq(owner, value)) {
            Some(true) => Assign::Written,
            Some(false) => Assign::Unchanged,
            None => Assign::Released,
        }
    }
}
