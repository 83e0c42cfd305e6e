use std::{
    error::Error,
    fmt,
    str::FromStr,
    sync::{Arc, Weak},
};

/// How a binding holds on to the owners of its targets.
///
/// The policy is chosen once per `assign` call and applies to all of its
/// targets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LifetimePolicy {
    /// The binding co-owns each owner. Owners can't be destroyed before the
    /// [`Handle`][crate::Handle] is cancelled or dropped.
    #[default]
    Strong,

    /// The binding holds non-owning references. Owners may be dropped at any
    /// time; values emitted afterwards are skipped for their targets.
    Weak,

    /// The binding holds non-owning references and expects every owner to
    /// outlive it.
    ///
    /// Emitting a value after an owner has been dropped is a bug in the
    /// calling code, and panics.
    Unowned,
}

impl LifetimePolicy {
    fn as_str(self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Weak => "weak",
            Self::Unowned => "unowned",
        }
    }
}

impl fmt::Display for LifetimePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifetimePolicy {
    type Err = ParseLifetimePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Strong, Self::Weak, Self::Unowned]
            .into_iter()
            .find(|policy| policy.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseLifetimePolicyError { input: s.to_owned() })
    }
}

/// Error returned when parsing a [`LifetimePolicy`] from a string fails.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseLifetimePolicyError {
    input: String,
}

impl ParseLifetimePolicyError {
    /// The string that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for ParseLifetimePolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid lifetime policy `{}`, expected one of `strong`, `weak` or `unowned`",
            self.input
        )
    }
}

impl Error for ParseLifetimePolicyError {}

/// A reference to a target's owner, held according to a [`LifetimePolicy`].
pub(crate) enum OwnerRef<O: ?Sized> {
    Strong(Arc<O>),
    Weak(Weak<O>),
    Unowned(Weak<O>),
}

impl<O: ?Sized> OwnerRef<O> {
    pub(crate) fn new(owner: Arc<O>, policy: LifetimePolicy) -> Self {
        match policy {
            LifetimePolicy::Strong => Self::Strong(owner),
            LifetimePolicy::Weak => Self::Weak(Arc::downgrade(&owner)),
            LifetimePolicy::Unowned => Self::Unowned(Arc::downgrade(&owner)),
        }
    }

    /// Run `f` on the owner if it is still alive.
    ///
    /// Returns `None` if a weakly-held owner has been dropped.
    ///
    /// # Panics
    ///
    /// If an unowned owner has been dropped.
    pub(crate) fn with<R>(&self, f: impl FnOnce(&O) -> R) -> Option<R> {
        match self {
            Self::Strong(owner) => Some(f(owner)),
            Self::Weak(owner) => owner.upgrade().map(|owner| f(&owner)),
            Self::Unowned(owner) => match owner.upgrade() {
                Some(owner) => Some(f(&owner)),
                None => panic!("owner of an unowned target was dropped while its binding was alive"),
            },
        }
    }
}
