use std::{fmt, sync::Arc};

type Getter<O, T> = dyn Fn(&O) -> T + Send + Sync;
type Setter<O, T> = dyn Fn(&O, T) + Send + Sync;

/// A getter / setter pair for one slot of an owner of type `O`.
///
/// Both functions receive the owner by shared reference, so the slot itself
/// has to use interior mutability (a `Mutex`, an atomic, a
/// `SharedObservable`, ...). The accessor doesn't hold on to any owner; it is
/// paired with one through a [`Target`][crate::Target].
///
/// Cloning an `Accessor` is cheap, it only bumps two reference counts.
pub struct Accessor<O: ?Sized, T> {
    get: Arc<Getter<O, T>>,
    set: Arc<Setter<O, T>>,
}

impl<O: ?Sized, T> Accessor<O, T> {
    /// Create a new `Accessor` from the given getter and setter.
    ///
    /// The setter should store the value such that a subsequent call of the
    /// getter returns a value that compares equal to it. Otherwise, the
    /// redundant-write suppression of `assign` can't work as expected.
    pub fn new<G, S>(get: G, set: S) -> Self
    where
        G: Fn(&O) -> T + Send + Sync + 'static,
        S: Fn(&O, T) + Send + Sync + 'static,
    {
        Self { get: Arc::new(get), set: Arc::new(set) }
    }

    /// Read the current value of the slot.
    pub fn get(&self, owner: &O) -> T {
        (self.get)(owner)
    }

    /// Overwrite the slot with the given value, unconditionally.
    pub fn set(&self, owner: &O, value: T) {
        (self.set)(owner, value);
    }

    /// Overwrite the slot with the given value if it doesn't compare equal to
    /// the slot's current value.
    ///
    /// Returns whether the setter was called.
    pub fn set_eq(&self, owner: &O, value: &T) -> bool
    where
        T: Clone + PartialEq,
    {
        if self.get(owner) != *value {
            self.set(owner, value.clone());
            true
        } else {
            false
        }
    }
}

impl<O: ?Sized, T> Clone for Accessor<O, T> {
    fn clone(&self) -> Self {
        Self { get: self.get.clone(), set: self.set.clone() }
    }
}

impl<O: ?Sized, T> fmt::Debug for Accessor<O, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor").finish_non_exhaustive()
    }
}
