use std::{fmt, sync::Arc};

use crate::{binder::Release, Cancellable};

/// The owner of a binding created by `assign` or [`bind`][crate::bind].
///
/// As long as the `Handle` is alive and not cancelled, emitted values are
/// written to the binding's targets. Cancelling it, or dropping it, stops
/// delivery for good and releases the owners the binding held strongly.
#[must_use = "dropping a Handle cancels its binding immediately"]
pub struct Handle {
    dispatcher: Arc<dyn Release>,
    subscription: Option<Box<dyn Cancellable + Send>>,
}

impl Handle {
    pub(crate) fn new(
        dispatcher: Arc<dyn Release>,
        subscription: Option<Box<dyn Cancellable + Send>>,
    ) -> Self {
        Self { dispatcher, subscription }
    }

    /// Cancel the binding.
    ///
    /// No target is written to after this returns, even if the source keeps
    /// emitting. Calling this more than once has no further effect.
    pub fn cancel(&mut self) {
        let token = self.dispatcher.token();
        if token.is_cancelled() {
            return;
        }

        token.cancel();
        self.dispatcher.release();
        if let Some(mut subscription) = self.subscription.take() {
            subscription.cancel();
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("Cancelled binding");
    }

    /// Whether [`cancel`][Self::cancel] was called on this handle.
    pub fn is_cancelled(&self) -> bool {
        self.dispatcher.token().is_cancelled()
    }
}

impl Cancellable for Handle {
    fn cancel(&mut self) {
        Handle::cancel(self);
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle").field("is_cancelled", &self.is_cancelled()).finish_non_exhaustive()
    }
}
