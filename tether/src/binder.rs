use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;

#[cfg(feature = "tracing")]
use crate::target::Assign;
use crate::{target::AttachedTarget, Handle, LifetimePolicy, Publisher, Target};

/// Marker trait for the target collections a binding accepts: arrays of one,
/// two or three [`Target`]s.
///
/// This trait is sealed and can't be implemented outside of this crate.
pub trait Arity: sealed::Sealed {}

mod sealed {
    #[allow(unreachable_pub)]
    pub trait Sealed {}
}

macro_rules! impl_arity {
    ($($n:literal),*) => {
        $(
            impl<T> sealed::Sealed for [Target<T>; $n] {}
            impl<T> Arity for [Target<T>; $n] {}
        )*
    };
}

impl_arity!(1, 2, 3);

/// Bind the values emitted by `source` to the given targets.
///
/// For every emitted value, each target whose owner is still alive (see
/// [`LifetimePolicy`]) is visited in the order given here. The value is
/// written to the target's slot only if it doesn't compare equal to the
/// slot's current contents.
///
/// The returned [`Handle`] owns the subscription; cancelling or dropping it
/// stops all further writes.
///
/// [`PublisherExt`][crate::PublisherExt] has more convenient entry points for
/// the common cases.
pub fn bind<P, const N: usize>(
    source: &P,
    targets: [Target<P::Output>; N],
    policy: LifetimePolicy,
) -> Handle
where
    P: Publisher + ?Sized,
    P::Output: Clone + PartialEq + 'static,
    [Target<P::Output>; N]: Arity,
{
    let dispatcher = Dispatcher::attach(targets, policy);

    let on_value = {
        let dispatcher = dispatcher.clone();
        move |value: P::Output| dispatcher.dispatch(value)
    };
    let subscription = source.subscribe(on_value);

    #[cfg(feature = "tracing")]
    tracing::debug!(num_targets = N, %policy, "Bound publisher to targets");

    Handle::new(dispatcher, Some(Box::new(subscription)))
}

/// The state shared between a [`Handle`] and the callback (or stream driver)
/// that delivers values to its targets.
pub(crate) struct Dispatcher<T, const N: usize> {
    token: CancellationToken,
    /// `None` once the binding was cancelled.
    targets: Mutex<Option<[AttachedTarget<T>; N]>>,
}

impl<T, const N: usize> Dispatcher<T, N>
where
    T: Clone + PartialEq,
{
    pub(crate) fn attach(targets: [Target<T>; N], policy: LifetimePolicy) -> Arc<Self> {
        let targets = targets.map(|target| target.attach(policy));
        Arc::new(Self { token: CancellationToken::new(), targets: Mutex::new(Some(targets)) })
    }

    /// Assign `value` to every live target, in declaration order.
    pub(crate) fn dispatch(&self, value: T) {
        if self.token.is_cancelled() {
            return;
        }

        // Don't hold the lock while calling into accessors, setters are
        // allowed to emit new values.
        let Some(targets) = self.targets.lock().unwrap().clone() else {
            return;
        };

        for (_index, target) in targets.iter().enumerate() {
            let _outcome = target.assign(&value);
            #[cfg(feature = "tracing")]
            match _outcome {
                Assign::Written => tracing::trace!(target_index = _index, "Assigned new value"),
                Assign::Unchanged => tracing::trace!(target_index = _index, "Value unchanged"),
                Assign::Released => tracing::trace!(target_index = _index, "Owner was dropped"),
            }
        }
    }
}

/// Type-erased view of a [`Dispatcher`], as held by a stream driver.
pub(crate) trait Dispatch<T>: Release {
    fn dispatch(&self, value: T);
}

impl<T, const N: usize> Dispatch<T> for Dispatcher<T, N>
where
    T: Clone + PartialEq,
{
    fn dispatch(&self, value: T) {
        Dispatcher::dispatch(self, value);
    }
}

/// Type-erased view of a [`Dispatcher`], as held by a [`Handle`].
pub(crate) trait Release: Send + Sync {
    fn token(&self) -> &CancellationToken;

    /// Drop all targets, releasing strongly-held owners.
    fn release(&self);
}

impl<T, const N: usize> Release for Dispatcher<T, N> {
    fn token(&self) -> &CancellationToken {
        &self.token
    }

    fn release(&self) {
        let _targets = self.targets.lock().unwrap().take();
    }
}
