use std::sync::{Arc, Mutex};

use eyeball::SharedObservable;
use stream_assert::{assert_next_eq, assert_pending};
use tether::{bind, Accessor, LifetimePolicy, PublisherExt, Subject, Target};

use super::Slot;

#[test]
fn skips_values_equal_to_slot() {
    let subject = Subject::new();
    let slot = Slot::new(0);
    let _handle = subject.assign(Slot::accessor(), &slot, LifetimePolicy::Strong);

    for value in [1, 1, 2, 2, 3] {
        subject.send(value);
    }

    assert_eq!(slot.writes(), [1, 2, 3]);
    assert_eq!(slot.value(), 3);
}

#[test]
fn compares_against_current_slot_value() {
    let subject = Subject::new();
    let slot = Slot::new(7);
    let _handle = subject.assign(Slot::accessor(), &slot, LifetimePolicy::Strong);

    subject.send(7);
    assert_eq!(slot.writes(), Vec::<i32>::new());

    // Someone else writes to the slot, the next emission is compared against
    // that value rather than the last emitted one.
    *slot.value.lock().unwrap() = 1;
    subject.send(7);
    assert_eq!(slot.writes(), [7]);

    subject.send(7);
    assert_eq!(slot.writes(), [7]);
}

#[test]
fn targets_are_gated_independently() {
    let subject = Subject::new();
    let a = Slot::new("a".to_owned());
    let b = Slot::new("b".to_owned());
    let _handle = subject.assign2(
        (Slot::accessor(), &a),
        (Slot::accessor(), &b),
        LifetimePolicy::Strong,
    );

    subject.send("b".to_owned());
    assert_eq!(a.writes(), ["b"]);
    assert_eq!(b.writes(), Vec::<String>::new());

    subject.send("a".to_owned());
    assert_eq!(a.writes(), ["b", "a"]);
    assert_eq!(b.writes(), ["a"]);
}

#[test]
fn targets_with_different_owner_types() {
    struct Window {
        title: Mutex<String>,
    }

    let subject = Subject::new();
    let slot = Slot::new(String::new());
    let window = Arc::new(Window { title: Mutex::new("untitled".to_owned()) });
    let observable = Arc::new(SharedObservable::new(String::new()));

    let _handle = subject.assign3(
        (Slot::accessor(), &slot),
        (
            Accessor::new(
                |window: &Window| window.title.lock().unwrap().clone(),
                |window: &Window, title: String| *window.title.lock().unwrap() = title,
            ),
            &window,
        ),
        (
            Accessor::new(
                |ob: &SharedObservable<String>| ob.get(),
                |ob: &SharedObservable<String>, value: String| {
                    ob.set(value);
                },
            ),
            &observable,
        ),
        LifetimePolicy::Strong,
    );

    subject.send("notes.txt".to_owned());
    assert_eq!(slot.value(), "notes.txt");
    assert_eq!(*window.title.lock().unwrap(), "notes.txt");
    assert_eq!(observable.get(), "notes.txt");
}

#[test]
fn targets_are_visited_in_order() {
    struct Logged {
        name: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    let accessor = Accessor::new(
        |_: &Logged| 0,
        |logged: &Logged, _value: i32| logged.log.lock().unwrap().push(logged.name),
    );

    let log = Arc::new(Mutex::new(Vec::new()));
    let owners = ["first", "second", "third"]
        .map(|name| Arc::new(Logged { name, log: log.clone() }));

    let subject = Subject::new();
    let targets = [
        Target::new(&owners[0], accessor.clone()),
        Target::new(&owners[1], accessor.clone()),
        Target::new(&owners[2], accessor),
    ];
    let _handle = bind(&subject, targets, LifetimePolicy::Strong);

    subject.send(1);
    subject.send(2);
    assert_eq!(*log.lock().unwrap(), ["first", "second", "third", "first", "second", "third"]);
}

#[test]
fn no_redundant_notifications_downstream() {
    let label = Arc::new(SharedObservable::new(0));
    let mut label_updates = label.subscribe();
    let accessor = Accessor::new(
        |ob: &SharedObservable<i32>| ob.get(),
        |ob: &SharedObservable<i32>, value: i32| {
            ob.set(value);
        },
    );

    let subject = Subject::new();
    let _handle = subject.assign(accessor, &label, LifetimePolicy::Weak);

    subject.send(1);
    assert_next_eq!(label_updates, 1);

    subject.send(1);
    assert_pending!(label_updates);

    subject.send(2);
    assert_next_eq!(label_updates, 2);
    subject.send(0);
    subject.send(0);
    assert_next_eq!(label_updates, 0);
    assert_pending!(label_updates);
}

#[test]
fn setter_can_emit_into_source() {
    let subject = Subject::new();
    let slot = Slot::new(0);

    let accessor = {
        let subject = subject.clone();
        Accessor::new(
            |slot: &Slot<i32>| slot.value(),
            move |slot: &Slot<i32>, value: i32| {
                *slot.value.lock().unwrap() = value;
                if value < 10 {
                    subject.send(value * 10);
                }
            },
        )
    };
    // Holding a clone of the subject inside the accessor keeps the subject
    // alive, but not the binding: it goes away with the handle.
    let handle = subject.assign(accessor, &slot, LifetimePolicy::Weak);

    subject.send(2);
    assert_eq!(slot.value(), 20);

    drop(handle);
    assert_eq!(subject.subscriber_count(), 0);
}
