//! Assign the values of a publisher to the slots of externally-owned objects.
//!
//! This crate implements a family of `assign` operators: each value emitted
//! by a [`Publisher`] (or an async [`Stream`][futures_core::Stream]) is
//! written into one, two or three [`Target`]s, where a target is an owner
//! object plus an [`Accessor`] for one of its slots. A value is only written
//! if it differs from what the slot currently holds, so setters that trigger
//! further reactions (like updating an observable) are not invoked for
//! redundant values.
//!
//! How the binding holds on to each owner is chosen through a
//! [`LifetimePolicy`]:
//!
//! - [`Strong`][LifetimePolicy::Strong] keeps the owner alive for as long as
//!   the binding is.
//! - [`Weak`][LifetimePolicy::Weak] lets the owner be dropped independently;
//!   values are silently skipped for a dropped owner.
//! - [`Unowned`][LifetimePolicy::Unowned] doesn't keep the owner alive and
//!   doesn't tolerate it going away either: the owner must outlive the
//!   binding.
//!
//! Here is a quick walk-through:
//!
//! ```
//! use std::sync::{Arc, Mutex};
//!
//! use tether::{Accessor, LifetimePolicy, PublisherExt, Subject};
//!
//! struct Label {
//!     text: Mutex<String>,
//! }
//!
//! let text = Accessor::new(
//!     |label: &Label| label.text.lock().unwrap().clone(),
//!     |label: &Label, value: String| *label.text.lock().unwrap() = value,
//! );
//! let label = Arc::new(Label { text: Mutex::new(String::new()) });
//!
//! let subject = Subject::new();
//! let mut handle = subject.assign(text, &label, LifetimePolicy::Weak);
//!
//! subject.send("hello".to_owned());
//! assert_eq!(*label.text.lock().unwrap(), "hello");
//!
//! // Cancelling (or dropping) the handle stops all further writes.
//! handle.cancel();
//! subject.send("ignored".to_owned());
//! assert_eq!(*label.text.lock().unwrap(), "hello");
//! ```
//!
//! Cargo features:
//!
//! - `tracing`: Emit [tracing] events for assignments and cancellations
#![warn(missing_debug_implementations, missing_docs, rust_2018_idioms, unreachable_pub)]

mod accessor;
mod binder;
mod handle;
mod lifetime;
mod publisher;
pub mod stream;
mod subject;
mod target;

#[doc(inline)]
pub use self::{
    accessor::Accessor,
    binder::{bind, Arity},
    handle::Handle,
    lifetime::{LifetimePolicy, ParseLifetimePolicyError},
    publisher::{Cancellable, Publisher, PublisherExt},
    subject::{Subject, SubjectSubscription},
    target::Target,
};
