use std::collections::{BTreeSet, VecDeque};

/// Worklist solver for monotone set closures
///
/// Every element popped off the queue is inserted into the output set, and
/// its successors are only enqueued if the insert actually grew the set.
/// Since the set never shrinks and the universe is finite, this terminates
/// after at most one expansion per distinct element.
#[derive(Debug)]
pub struct ClosureBuilder<T>(VecDeque<T>);

impl<T> Default for ClosureBuilder<T> {
    #[inline]
    fn default() -> Self { Self(VecDeque::new()) }
}

impl<T: Ord> ClosureBuilder<T> {
    /// Grow `set` until it is closed under `f`
    ///
    /// Elements already in `set` are treated as expanded, so the queue must
    /// be seeded with [`Extend::extend`] first.
    pub fn solve<I: IntoIterator<Item = T>>(
        &mut self,
        mut set: BTreeSet<T>,
        mut f: impl FnMut(&T) -> I,
    ) -> BTreeSet<T> {
        while let Some(el) = self.0.pop_front() {
            if set.contains(&el) {
                continue;
            }

            self.0.extend(f(&el));
            set.insert(el);
        }

        set
    }

    /// Close a seed set under `f`, including the seed itself
    #[inline]
    pub fn close<I: IntoIterator<Item = T>>(
        &mut self,
        seed: impl IntoIterator<Item = T>,
        f: impl FnMut(&T) -> I,
    ) -> BTreeSet<T> {
        debug_assert!(self.0.is_empty());
        self.extend(seed);
        self.solve(BTreeSet::new(), f)
    }
}

impl<T> Extend<T> for ClosureBuilder<T> {
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, it: I) { self.0.extend(it); }
}
