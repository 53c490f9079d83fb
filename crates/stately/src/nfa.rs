//! Nondeterministic automata with epsilon moves

use std::{collections::BTreeSet, fmt, hash::Hash, sync::Arc};

use self::dfa_builder::DfaBuilder;
use crate::{
    closure_builder::ClosureBuilder,
    dfa::DfaDesign,
    dot,
    rule::{Rule, Symbol, EPSILON},
};

mod dfa_builder;

/// An ordered list of rules, possibly with several rules (or none) for any
/// given state and symbol
#[derive(Debug, Clone, PartialEq, Eq)]
#[repr(transparent)]
pub struct NfaRulebook<S>(Vec<Rule<S>>);

impl<S> Default for NfaRulebook<S> {
    #[inline]
    fn default() -> Self { Self(Vec::new()) }
}

impl<S> From<Vec<Rule<S>>> for NfaRulebook<S> {
    #[inline]
    fn from(rules: Vec<Rule<S>>) -> Self { Self(rules) }
}

impl<S> FromIterator<Rule<S>> for NfaRulebook<S> {
    #[inline]
    fn from_iter<I: IntoIterator<Item = Rule<S>>>(it: I) -> Self { Self(it.into_iter().collect()) }
}

impl<S> NfaRulebook<S> {
    #[inline]
    #[must_use]
    pub fn new(rules: impl IntoIterator<Item = Rule<S>>) -> Self { rules.into_iter().collect() }

    #[inline]
    pub fn rules(&self) -> &[Rule<S>] { &self.0 }

    /// Every concrete symbol mentioned by a rule
    pub fn alphabet(&self) -> BTreeSet<char> { self.0.iter().filter_map(Rule::symbol).collect() }
}

impl<S: Clone + Ord> NfaRulebook<S> {
    pub fn rules_for<'a>(
        &'a self,
        state: &'a S,
        symbol: Symbol,
    ) -> impl Iterator<Item = &'a Rule<S>> + 'a {
        self.0.iter().filter(move |r| r.applies_to(state, symbol))
    }

    pub fn follow_rules_for(&self, state: &S, symbol: Symbol) -> BTreeSet<S> {
        self.rules_for(state, symbol)
            .map(|r| r.follow().clone())
            .collect()
    }

    /// Every state reachable from `states` by exactly one rule on `symbol`
    ///
    /// This does not follow free moves, even if `symbol` is [`EPSILON`].
    pub fn next_states<'a>(
        &self,
        states: impl IntoIterator<Item = &'a S>,
        symbol: Symbol,
    ) -> BTreeSet<S>
    where
        S: 'a,
    {
        states
            .into_iter()
            .flat_map(|s| self.follow_rules_for(s, symbol))
            .collect()
    }

    /// Epsilon-closure of `states`, including `states` themselves
    pub fn follow_free_moves(&self, states: impl IntoIterator<Item = S>) -> BTreeSet<S> {
        ClosureBuilder::default().close(states, |s| self.follow_rules_for(s, EPSILON))
    }

    /// Every state named by any rule
    pub fn states(&self) -> BTreeSet<S> {
        self.0
            .iter()
            .flat_map(|r| [r.state().clone(), r.follow().clone()])
            .collect()
    }
}

/// A running NFA
///
/// The stored frontier is the raw result of the last step; free moves are
/// followed lazily whenever the state set is observed or stepped.
#[derive(Debug, Clone)]
pub struct Nfa<S> {
    frontier: BTreeSet<S>,
    accept: Arc<BTreeSet<S>>,
    rulebook: Arc<NfaRulebook<S>>,
}

impl<S: Clone + Ord> Nfa<S> {
    pub fn new(
        current: impl IntoIterator<Item = S>,
        accept: impl IntoIterator<Item = S>,
        rulebook: impl Into<Arc<NfaRulebook<S>>>,
    ) -> Self {
        Self {
            frontier: current.into_iter().collect(),
            accept: Arc::new(accept.into_iter().collect()),
            rulebook: rulebook.into(),
        }
    }

    #[inline]
    pub fn frontier(&self) -> &BTreeSet<S> { &self.frontier }

    #[inline]
    pub fn accept_states(&self) -> &BTreeSet<S> { &self.accept }

    #[inline]
    pub fn rulebook(&self) -> &NfaRulebook<S> { &self.rulebook }

    /// The epsilon-closure of the current frontier
    #[inline]
    pub fn current_states(&self) -> BTreeSet<S> {
        self.rulebook.follow_free_moves(self.frontier.iter().cloned())
    }

    pub fn is_accepting(&self) -> bool {
        self.current_states()
            .iter()
            .any(|s| self.accept.contains(s))
    }

    pub fn read_symbol(&mut self, symbol: char) {
        let closed = self.current_states();
        self.frontier = self.rulebook.next_states(&closed, Some(symbol));
    }

    /// Feed every character of `input` in order
    ///
    /// Reading continues even once the frontier is empty.
    pub fn read_string(&mut self, input: &str) {
        for c in input.chars() {
            self.read_symbol(c);
        }
    }
}

/// Reusable blueprint for [`Nfa`]s
#[derive(Debug, Clone)]
pub struct NfaDesign<S> {
    start: S,
    accept: Arc<BTreeSet<S>>,
    rulebook: Arc<NfaRulebook<S>>,
}

impl<S: Clone + Ord> NfaDesign<S> {
    pub fn new(
        start: S,
        accept: impl IntoIterator<Item = S>,
        rulebook: impl Into<Arc<NfaRulebook<S>>>,
    ) -> Self {
        Self {
            start,
            accept: Arc::new(accept.into_iter().collect()),
            rulebook: rulebook.into(),
        }
    }

    #[inline]
    pub fn start(&self) -> &S { &self.start }

    #[inline]
    pub fn accept_states(&self) -> &BTreeSet<S> { &self.accept }

    #[inline]
    pub fn rulebook(&self) -> &NfaRulebook<S> { &self.rulebook }

    /// Start a new run with its own frontier
    #[must_use]
    pub fn to_nfa(&self) -> Nfa<S> {
        Nfa {
            frontier: [self.start.clone()].into_iter().collect(),
            accept: Arc::clone(&self.accept),
            rulebook: Arc::clone(&self.rulebook),
        }
    }

    pub fn accepts(&self, input: &str) -> bool {
        let mut nfa = self.to_nfa();
        nfa.read_string(input);
        let accepted = nfa.is_accepting();

        tracing::trace!(input, accepted, "NFA run finished");
        accepted
    }
}

impl<S: Clone + Ord + Hash> NfaDesign<S> {
    /// Convert to an equivalent DFA by subset construction
    ///
    /// DFA states are numbered in breadth-first discovery order starting from
    /// the closure of the start state.
    #[inline]
    #[must_use]
    pub fn to_dfa_design(&self) -> DfaDesign<usize> { DfaBuilder::new(self).build().0 }

    /// Like [`Self::to_dfa_design`], also returning the set of NFA states each
    /// DFA state represents
    #[inline]
    #[must_use]
    pub fn to_dfa_design_with_states(&self) -> (DfaDesign<usize>, Vec<BTreeSet<S>>) {
        DfaBuilder::new(self).build()
    }

    #[must_use]
    pub fn dot(&self) -> dot::Graph<'static>
    where S: fmt::Display {
        dot::Graph::state_machine(&self.start, &self.accept, self.rulebook.rules())
    }
}
