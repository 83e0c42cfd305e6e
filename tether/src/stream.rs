//! Bindings for async [`Stream`]s.
//!
//! Unlike a [`Publisher`][crate::Publisher], a stream has to be polled for
//! values. Binding a stream therefore returns a [`Drive`] future next to the
//! [`Handle`], which has to be spawned on an executor or awaited:
//!
//! ```
//! use std::sync::Arc;
//!
//! use eyeball::SharedObservable;
//! use tether::{stream::StreamAssignExt, Accessor, LifetimePolicy};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let source = SharedObservable::new(0);
//! let mirror = Arc::new(SharedObservable::new(0));
//! let accessor = Accessor::new(
//!     |ob: &SharedObservable<i32>| ob.get(),
//!     |ob: &SharedObservable<i32>, value: i32| {
//!         ob.set(value);
//!     },
//! );
//!
//! let (handle, drive) = source.subscribe().assign(accessor, &mirror, LifetimePolicy::Strong);
//! let join_handle = tokio::spawn(drive);
//!
//! source.set(5);
//! tokio::task::yield_now().await;
//! assert_eq!(mirror.get(), 5);
//!
//! // Dropping the handle makes the driver future finish.
//! drop(handle);
//! join_handle.await.unwrap();
//! # }
//! ```

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{ready, Context, Poll},
};

use futures_core::Stream;
use pin_project_lite::pin_project;
use tokio_util::sync::WaitForCancellationFutureOwned;

use crate::{
    binder::{Dispatch, Dispatcher, Release},
    Accessor, Arity, Handle, LifetimePolicy, Target,
};

/// Bind the items of `stream` to the given targets.
///
/// This is the stream counterpart of [`bind`][crate::bind]: every item is
/// written to each live target whose slot doesn't already hold an equal
/// value.
///
/// Nothing happens until the returned [`Drive`] future is polled. It
/// finishes once the stream ends, or once the [`Handle`] is cancelled or
/// dropped.
pub fn bind_stream<S, const N: usize>(
    stream: S,
    targets: [Target<S::Item>; N],
    policy: LifetimePolicy,
) -> (Handle, Drive<S>)
where
    S: Stream,
    S::Item: Clone + PartialEq + 'static,
    [Target<S::Item>; N]: Arity,
{
    let dispatcher = Dispatcher::attach(targets, policy);
    let cancelled = dispatcher.token().clone().cancelled_owned();

    #[cfg(feature = "tracing")]
    tracing::debug!(num_targets = N, %policy, "Bound stream to targets");

    let drive = Drive { stream, cancelled, dispatcher: dispatcher.clone() };
    (Handle::new(dispatcher, None), drive)
}

pin_project! {
    /// Future returned by [`bind_stream`] and the methods of
    /// [`StreamAssignExt`].
    ///
    /// Polls the bound stream and assigns its items to the binding's targets.
    #[must_use = "futures do nothing unless you `.await` or poll them"]
    pub struct Drive<S>
    where
        S: Stream,
    {
        #[pin]
        stream: S,
        #[pin]
        cancelled: WaitForCancellationFutureOwned,
        dispatcher: Arc<dyn Dispatch<S::Item>>,
    }
}

impl<S: Stream> Future for Drive<S> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut this = self.project();
        if this.cancelled.as_mut().poll(cx).is_ready() {
            return Poll::Ready(());
        }

        loop {
            match ready!(this.stream.as_mut().poll_next(cx)) {
                Some(value) => this.dispatcher.dispatch(value),
                None => {
                    this.dispatcher.release();
                    #[cfg(feature = "tracing")]
                    tracing::debug!("Bound stream ended");
                    return Poll::Ready(());
                }
            }

            // A setter may have cancelled the binding.
            if this.dispatcher.token().is_cancelled() {
                return Poll::Ready(());
            }
        }
    }
}

impl<S: Stream> std::fmt::Debug for Drive<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Drive")
            .field("is_cancelled", &self.dispatcher.token().is_cancelled())
            .finish_non_exhaustive()
    }
}

/// Extension trait for [`Stream`]s, providing the `assign` operators.
///
/// All of these are shorthands for [`bind_stream`].
pub trait StreamAssignExt: Stream + Sized {
    /// Write every item that differs from the slot's current value into the
    /// slot of `owner` described by `accessor`.
    fn assign<O>(
        self,
        accessor: Accessor<O, Self::Item>,
        owner: &Arc<O>,
        policy: LifetimePolicy,
    ) -> (Handle, Drive<Self>)
    where
        O: ?Sized + Send + Sync + 'static;

    /// Like [`assign`][Self::assign], with two targets.
    fn assign2<O1, O2>(
        self,
        first: (Accessor<O1, Self::Item>, &Arc<O1>),
        second: (Accessor<O2, Self::Item>, &Arc<O2>),
        policy: LifetimePolicy,
    ) -> (Handle, Drive<Self>)
    where
        O1: ?Sized + Send + Sync + 'static,
        O2: ?Sized + Send + Sync + 'static;

    /// Like [`assign`][Self::assign], with three targets.
    fn assign3<O1, O2, O3>(
        self,
        first: (Accessor<O1, Self::Item>, &Arc<O1>),
        second: (Accessor<O2, Self::Item>, &Arc<O2>),
        third: (Accessor<O3, Self::Item>, &Arc<O3>),
        policy: LifetimePolicy,
    ) -> (Handle, Drive<Self>)
    where
        O1: ?Sized + Send + Sync + 'static,
        O2: ?Sized + Send + Sync + 'static,
        O3: ?Sized + Send + Sync + 'static;
}

impl<S> StreamAssignExt for S
where
    S: Stream,
    S::Item: Clone + PartialEq + 'static,
{
    fn assign<O>(
        self,
        accessor: Accessor<O, Self::Item>,
        owner: &Arc<O>,
        policy: LifetimePolicy,
    ) -> (Handle, Drive<Self>)
    where
        O: ?Sized + Send + Sync + 'static,
    {
        bind_stream(self, [Target::new(owner, accessor)], policy)
    }

    fn assign2<O1, O2>(
        self,
        (accessor1, owner1): (Accessor<O1, Self::Item>, &Arc<O1>),
        (accessor2, owner2): (Accessor<O2, Self::Item>, &Arc<O2>),
        policy: LifetimePolicy,
    ) -> (Handle, Drive<Self>)
    where
        O1: ?Sized + Send + Sync + 'static,
        O2: ?Sized + Send + Sync + 'static,
    {
        bind_stream(self, [Target::new(owner1, accessor1), Target::new(owner2, accessor2)], policy)
    }

    fn assign3<O1, O2, O3>(
        self,
        (accessor1, owner1): (Accessor<O1, Self::Item>, &Arc<O1>),
        (accessor2, owner2): (Accessor<O2, Self::Item>, &Arc<O2>),
        (accessor3, owner3): (Accessor<O3, Self::Item>, &Arc<O3>),
        policy: LifetimePolicy,
    ) -> (Handle, Drive<Self>)
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
        bind_stream(self, targets, policy)
    }
}
