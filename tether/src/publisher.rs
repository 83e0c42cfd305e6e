use std::sync::Arc;

use crate::{bind, Accessor, Handle, LifetimePolicy, Target};

/// A source of values that are pushed to subscribers as they happen.
///
/// Implementations must deliver values to any one subscriber one at a time,
/// and must not call a subscriber's callback anymore after its subscription
/// has been cancelled (a delivery that is already in progress may finish).
pub trait Publisher {
    /// The type of value emitted by this publisher.
    type Output;

    /// The subscription returned by [`subscribe`][Self::subscribe].
    type Subscription: Cancellable + Send + 'static;

    /// Register a callback that is invoked for every emitted value, until the
    /// returned subscription is cancelled.
    fn subscribe<F>(&self, on_value: F) -> Self::Subscription
    where
        F: Fn(Self::Output) + Send + Sync + 'static;
}

/// Something that can be cancelled, like a subscription.
pub trait Cancellable {
    /// Cancel it.
    ///
    /// Calling this more than once must have no further effect.
    fn cancel(&mut self);
}

/// Extension trait for [`Publisher`]s, providing the `assign` operators.
///
/// All of these are shorthands for [`bind`].
pub trait PublisherExt: Publisher {
    /// Write every emitted value that differs from the slot's current value
    /// into the slot of `owner` described by `accessor`.
    fn assign<O>(
        &self,
        accessor: Accessor<O, Self::Output>,
        owner: &Arc<O>,
        policy: LifetimePolicy,
    ) -> Handle
    where
        O: ?Sized + Send + Sync + 'static;

    /// Like [`assign`][Self::assign], with two targets.
    ///
    /// Targets are visited in the order they are passed. Each target is
    /// compared and written independently of the other.
    fn assign2<O1, O2>(
        &self,
        first: (Accessor<O1, Self::Output>, &Arc<O1>),
        second: (Accessor<O2, Self::Output>, &Arc<O2>),
        policy: LifetimePolicy,
    ) -> Handle
    where
        O1: ?Sized + Send + Sync + 'static,
        O2: ?Sized + Send + Sync + 'static;

    /// Like [`assign`][Self::assign], with three targets.
    ///
    /// Targets are visited in the order they are passed. Each target is
    /// compared and written independently of the others.
    fn assign3<O1, O2, O3>(
        &self,
        first: (Accessor<O1, Self::Output>, &Arc<O1>),
        second: (Accessor<O2, Self::Output>, &Arc<O2>),
        third: (Accessor<O3, Self::Output>, &Arc<O3>),
        policy: LifetimePolicy,
    ) -> Handle
    where
        O1: ?Sized + Send + Sync + 'static,
        O2: ?Sized + Send + Sync + 'static,
        O3: ?Sized + Send + Sync + 'static;
}

impl<P> PublisherExt for P
where
    P: Publisher + ?Sized,
    P::Output: Clone + PartialEq + 'static,
{
    fn assign<O>(
        &self,
        accessor: Accessor<O, Self::Output>,
        owner: &Arc<O>,
        policy: LifetimePolicy,
    ) -> Handle
    where
        O: ?Sized + Send + Sync + 'static,
    {
        bind(self, [Target::new(owner, accessor)], policy)
    }

    fn assign2<O1, O2>(
        &self,
        (accessor1, owner1): (Accessor<O1, Self::Output>, &Arc<O1>),
        (accessor2, owner2): (Accessor<O2, Self::Output>, &Arc<O2>),
        policy: LifetimePolicy,
    ) -> Handle
    where
        O1: ?Sized + Send + Sync + 'static,
        O2: ?Sized + Send + Sync + 'static,
    {
        bind(self, [Target::new(owner1, accessor1), Target::new(owner2, accessor2)], policy)
    }

    fn assign3<O1, O2, O3>(
        &self,
        (accessor1, owner1): (Accessor<O1, Self::Output>, &Arc<O1>),
        (accessor2, owner2): (Accessor<O2, Self::Output>, &Arc<O2>),
        (accessor3, owner3): (Accessor<O3, Self::Output>, &Arc<O3>),
        policy: LifetimePolicy,
    ) -> Handle
    where
        O1: ?Sized + Send + Sync + 'static,
        O2: ?Sized + Send + Sync + 'static,
        O3: ?Sized + Send + Sync + 'static,
    {
        let targets = [
            Target::new(owner1, accessor1),
            Target::new(owner2, accessor2),
            Target::new(owner3, accessor3),
        ];
        bind(self, targets, policy)
    }
}
