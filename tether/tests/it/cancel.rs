use std::sync::{Arc, Mutex};

use tether::{Cancellable, LifetimePolicy, Publisher, PublisherExt, Subject};

use super::Slot;

#[test]
fn no_writes_after_cancel() {
    let subject = Subject::new();
    let slot = Slot::new(0);
    let mut handle = subject.assign(Slot::accessor(), &slot, LifetimePolicy::Strong);

    subject.send(1);
    subject.send(2);
    handle.cancel();
    assert!(handle.is_cancelled());

    subject.send(3);
    subject.send(4);
    assert_eq!(slot.writes(), [1, 2]);
    assert_eq!(slot.value(), 2);
}

#[test]
fn cancel_is_idempotent() {
    let subject = Subject::new();
    let slot = Slot::new(0);
    let mut handle = subject.assign(Slot::accessor(), &slot, LifetimePolicy::Strong);
    assert_eq!(subject.subscriber_count(), 1);

    subject.send(1);
    handle.cancel();
    handle.cancel();
    assert!(handle.is_cancelled());
    assert_eq!(subject.subscriber_count(), 0);

    subject.send(2);
    drop(handle);
    assert_eq!(slot.writes(), [1]);
}

#[test]
fn drop_cancels() {
    let subject = Subject::new();
    let slot = Slot::new(0);
    let handle = subject.assign(Slot::accessor(), &slot, LifetimePolicy::Weak);

    subject.send(1);
    drop(handle);
    assert_eq!(subject.subscriber_count(), 0);
    assert_eq!(subject.send(2), 0);
    assert_eq!(slot.value(), 1);
}

#[test]
fn cancel_releases_strong_owners() {
    let subject = Subject::new();
    let slot = Slot::new(0);
    let weak_slot = Arc::downgrade(&slot);
    let mut handle = subject.assign(Slot::accessor(), &slot, LifetimePolicy::Strong);

    drop(slot);
    assert!(weak_slot.upgrade().is_some());

    handle.cancel();
    assert!(weak_slot.upgrade().is_none());
}

/// A publisher that ignores cancellation and keeps delivering values.
#[derive(Default)]
struct Leaky {
    callbacks: Arc<Mutex<Vec<Box<dyn Fn(i32) + Send + Sync>>>>,
}

impl Leaky {
    fn send(&self, value: i32) {
        for callback in self.callbacks.lock().unwrap().iter() {
            callback(value);
        }
    }
}

struct LeakySubscription;

impl Cancellable for LeakySubscription {
    fn cancel(&mut self) {}
}

impl Publisher for Leaky {
    type Output = i32;
    type Subscription = LeakySubscription;

    fn subscribe<F>(&self, on_value: F) -> Self::Subscription
    where
        F: Fn(i32) + Send + Sync + 'static,
    {
        self.callbacks.lock().unwrap().push(Box::new(on_value));
        LeakySubscription
    }
}

#[test]
fn no_writes_after_cancel_with_leaky_publisher() {
    let publisher = Leaky::default();
    let slot = Slot::new(0);
    let mut handle = publisher.assign(Slot::accessor(), &slot, LifetimePolicy::Strong);

    publisher.send(1);
    handle.cancel();
    publisher.send(2);

    assert_eq!(slot.writes(), [1]);
}

#[test]
fn completed_subject_stops_writes() {
    let subject = Subject::new();
    let slot = Slot::new(0);
    let handle = subject.assign(Slot::accessor(), &slot, LifetimePolicy::Strong);

    subject.send(1);
    subject.complete();
    assert!(subject.is_completed());
    assert_eq!(subject.subscriber_count(), 0);
    assert_eq!(subject.send(2), 0);
    assert_eq!(slot.value(), 1);

    // Binding to a completed subject is inert.
    let other = Slot::new(0);
    let _other_handle = subject.assign(Slot::accessor(), &other, LifetimePolicy::Strong);
    subject.send(3);
    assert_eq!(other.writes(), Vec::<i32>::new());

    drop(handle);
}
