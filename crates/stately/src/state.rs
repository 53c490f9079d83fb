use std::fmt;

/// An automaton state minted by [`Fresh`]
///
/// Two states compare equal only if they came from the same call to
/// [`Fresh::state`] on the same allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct State(u64);

impl State {
    #[inline]
    #[must_use]
    pub fn id(self) -> u64 { self.0 }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "q{}", self.0) }
}

/// Strictly-increasing allocator for [`State`]s
///
/// Owned by whatever is building an automaton, so it never needs to be
/// shared between threads.
#[derive(Debug, Default)]
#[repr(transparent)]
#[expect(missing_copy_implementations, reason = "copies would mint duplicate states")]
pub struct Fresh(u64);

impl From<u64> for Fresh {
    fn from(val: u64) -> Self { Self(val) }
}

impl Fresh {
    /// # Panics
    /// Panics if the allocator has handed out `u64::MAX` states already.
    #[must_use]
    pub fn state(&mut self) -> State {
        let next = self.0.checked_add(1).unwrap_or_else(|| panic!("State IDs exhausted"));
        State(std::mem::replace(&mut self.0, next))
    }

    /// Number of states handed out so far, assuming this allocator started
    /// at zero
    #[inline]
    #[must_use]
    pub fn count(&self) -> u64 { self.0 }
}
