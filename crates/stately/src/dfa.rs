//! Deterministic automata

use std::{collections::BTreeSet, fmt, hash::Hash, sync::Arc};

use hashbrown::{HashMap, hash_map::Entry};

use crate::{dot, rule::Rule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RuleError<S> {
    #[error("No rule for state {state:?} on {symbol:?}")]
    NoApplicableRule { state: S, symbol: char },
    #[error("Multiple rules for state {state:?} on {symbol:?}")]
    AmbiguousRule { state: S, symbol: char },
    #[error("Free move out of state {state:?} in a deterministic rulebook")]
    FreeMove { state: S },
}

/// A rulebook with at most one rule per state and symbol, and no free moves
#[derive(Debug, Clone)]
pub struct DfaRulebook<S> {
    rules: Vec<Rule<S>>,
    index: HashMap<(S, char), usize>,
}

impl<S: Clone + Eq + Hash> DfaRulebook<S> {
    /// Build a rulebook, rejecting free moves and overlapping rules
    ///
    /// # Errors
    /// Returns [`RuleError::AmbiguousRule`] if two rules share a state and
    /// symbol, or [`RuleError::FreeMove`] for any epsilon rule.
    pub fn new(rules: impl IntoIterator<Item = Rule<S>>) -> Result<Self, RuleError<S>> {
        let rules: Vec<_> = rules.into_iter().collect();
        let mut index = HashMap::with_capacity(rules.len());

        for (i, rule) in rules.iter().enumerate() {
            let Some(symbol) = rule.symbol() else {
                return Err(RuleError::FreeMove {
                    state: rule.state().clone(),
                });
            };

            match index.entry((rule.state().clone(), symbol)) {
                Entry::Vacant(v) => {
                    v.insert(i);
                },
                Entry::Occupied(o) => {
                    let (state, symbol) = o.key().clone();
                    return Err(RuleError::AmbiguousRule { state, symbol });
                },
            }
        }

        Ok(Self { rules, index })
    }

    /// Build a rulebook where the first rule in list order wins any overlap
    ///
    /// Shadowed rules and free moves are kept in [`Self::rules`] but are
    /// never followed.
    pub fn first_match(rules: impl IntoIterator<Item = Rule<S>>) -> Self {
        let rules: Vec<_> = rules.into_iter().collect();
        let mut index = HashMap::with_capacity(rules.len());

        for (i, rule) in rules.iter().enumerate() {
            let Some(symbol) = rule.symbol() else {
                tracing::warn!(rule = i, "Ignoring free move in deterministic rulebook");
                continue;
            };

            match index.entry((rule.state().clone(), symbol)) {
                Entry::Vacant(v) => {
                    v.insert(i);
                },
                Entry::Occupied(o) => {
                    tracing::warn!(rule = i, shadowed_by = o.get(), "Ignoring ambiguous rule");
                },
            }
        }

        Self { rules, index }
    }

    /// Index rules that are deterministic by construction
    pub(crate) fn new_unchecked(rules: Vec<Rule<S>>) -> Self {
        let index: HashMap<_, _> = rules
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.symbol().map(|c| ((r.state().clone(), c), i)))
            .collect();
        debug_assert_eq!(index.len(), rules.len());

        Self { rules, index }
    }

    #[inline]
    pub fn rules(&self) -> &[Rule<S>] { &self.rules }

    /// # Errors
    /// Returns [`RuleError::NoApplicableRule`] if no rule leaves `state` on
    /// `symbol`.
    pub fn rule_for(&self, state: &S, symbol: char) -> Result<&Rule<S>, RuleError<S>> {
        self.index
            .get(&(state.clone(), symbol))
            .map(|&i| &self.rules[i])
            .ok_or_else(|| RuleError::NoApplicableRule {
                state: state.clone(),
                symbol,
            })
    }

    /// # Errors
    /// Returns [`RuleError::NoApplicableRule`] if no rule leaves `state` on
    /// `symbol`.
    #[inline]
    pub fn next_state(&self, state: &S, symbol: char) -> Result<&S, RuleError<S>> {
        self.rule_for(state, symbol).map(Rule::follow)
    }
}

/// A running DFA
///
/// Once a step fails the run is stuck: it never accepts, and every further
/// step reports the original failure.
#[derive(Debug, Clone)]
pub struct Dfa<S> {
    current: Result<S, RuleError<S>>,
    accept: Arc<BTreeSet<S>>,
    rulebook: Arc<DfaRulebook<S>>,
}

impl<S: Clone + Ord + Hash> Dfa<S> {
    pub fn new(
        current: S,
        accept: impl IntoIterator<Item = S>,
        rulebook: impl Into<Arc<DfaRulebook<S>>>,
    ) -> Self {
        Self {
            current: Ok(current),
            accept: Arc::new(accept.into_iter().collect()),
            rulebook: rulebook.into(),
        }
    }

    /// The current state, or `None` if the run is stuck
    #[inline]
    pub fn current_state(&self) -> Option<&S> { self.current.as_ref().ok() }

    #[inline]
    pub fn is_stuck(&self) -> bool { self.current.is_err() }

    #[inline]
    pub fn accept_states(&self) -> &BTreeSet<S> { &self.accept }

    #[inline]
    pub fn rulebook(&self) -> &DfaRulebook<S> { &self.rulebook }

    pub fn is_accepting(&self) -> bool {
        self.current
            .as_ref()
            .is_ok_and(|s| self.accept.contains(s))
    }

    /// # Errors
    /// Returns [`RuleError::NoApplicableRule`] if no rule applies to the
    /// current state and `symbol`, or if the run was already stuck.
    pub fn read_symbol(&mut self, symbol: char) -> Result<(), RuleError<S>> {
        let next = match &self.current {
            Ok(state) => self.rulebook.next_state(state, symbol).cloned(),
            Err(err) => Err(err.clone()),
        };

        self.current = next;
        self.current.as_ref().map(|_| ()).map_err(Clone::clone)
    }

    /// # Errors
    /// Stops at and returns the first failed step.
    pub fn read_string(&mut self, input: &str) -> Result<(), RuleError<S>> {
        input.chars().try_for_each(|c| self.read_symbol(c))
    }
}

/// Reusable blueprint for [`Dfa`]s
#[derive(Debug, Clone)]
pub struct DfaDesign<S> {
    start: S,
    accept: Arc<BTreeSet<S>>,
    rulebook: Arc<DfaRulebook<S>>,
}

impl<S: Clone + Ord + Hash> DfaDesign<S> {
    pub fn new(
        start: S,
        accept: impl IntoIterator<Item = S>,
        rulebook: impl Into<Arc<DfaRulebook<S>>>,
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
    pub fn rulebook(&self) -> &DfaRulebook<S> { &self.rulebook }

    #[must_use]
    pub fn to_dfa(&self) -> Dfa<S> {
        Dfa {
            current: Ok(self.start.clone()),
            accept: Arc::clone(&self.accept),
            rulebook: Arc::clone(&self.rulebook),
        }
    }

    /// Run `input` to completion and report whether the final state accepts
    ///
    /// # Errors
    /// Returns the first step that had no applicable rule.
    pub fn run(&self, input: &str) -> Result<bool, RuleError<S>> {
        let mut dfa = self.to_dfa();
        dfa.read_string(input)?;
        Ok(dfa.is_accepting())
    }

    #[must_use]
    pub fn dot(&self) -> dot::Graph<'static>
    where S: fmt::Display {
        dot::Graph::state_machine(&self.start, &self.accept, self.rulebook.rules())
    }

    pub fn accepts(&self, input: &str) -> bool {
        match self.run(input) {
            Ok(accepted) => {
                tracing::trace!(input, accepted, "DFA run finished");
                accepted
            },
            Err(RuleError::NoApplicableRule { symbol, .. }) => {
                tracing::debug!(input, %symbol, "DFA run got stuck");
                false
            },
            Err(RuleError::AmbiguousRule { .. } | RuleError::FreeMove { .. }) => {
                unreachable!("Rulebook lookups only fail on missing rules")
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Dfa, DfaDesign, DfaRulebook, RuleError};
    use crate::rule::Rule;

    fn rules() -> [Rule<u32>; 6] {
        [
            Rule::new(1, 'a', 2),
            Rule::new(1, 'b', 1),
            Rule::new(2, 'a', 2),
            Rule::new(2, 'b', 3),
            Rule::new(3, 'a', 3),
            Rule::new(3, 'b', 3),
        ]
    }

    fn rulebook() -> DfaRulebook<u32> { DfaRulebook::new(rules()).unwrap() }

    #[test]
    fn next_state() {
        let rulebook = rulebook();

        assert_eq!(rulebook.next_state(&1, 'a'), Ok(&2));
        assert_eq!(rulebook.next_state(&1, 'b'), Ok(&1));
        assert_eq!(rulebook.next_state(&2, 'b'), Ok(&3));
        assert_eq!(
            rulebook.next_state(&2, 'c'),
            Err(RuleError::NoApplicableRule {
                state: 2,
                symbol: 'c'
            })
        );
    }

    #[test]
    fn runtime() {
        let mut dfa = Dfa::new(1, [3], rulebook());
        assert!(!dfa.is_accepting());

        dfa.read_symbol('b').unwrap();
        assert!(!dfa.is_accepting());

        for _ in 0..3 {
            dfa.read_symbol('a').unwrap();
        }
        assert!(!dfa.is_accepting());

        dfa.read_symbol('b').unwrap();
        assert!(dfa.is_accepting());

        dfa.read_string("baaab").unwrap();
        assert!(dfa.is_accepting());
        assert_eq!(dfa.current_state(), Some(&3));
    }

    #[test]
    fn design() {
        let design = DfaDesign::new(1, [3], rulebook());

        assert!(!design.accepts("a"));
        assert!(!design.accepts("baa"));
        assert!(design.accepts("baba"));
    }

    #[test]
    fn stuck_is_absorbing() {
        let design = DfaDesign::new(1, [3], rulebook());
        let mut dfa = design.to_dfa();

        dfa.read_string("ab").unwrap();
        assert!(dfa.is_accepting());

        let err = dfa.read_symbol('c').unwrap_err();
        assert_eq!(err, RuleError::NoApplicableRule {
            state: 3,
            symbol: 'c'
        });
        assert!(dfa.is_stuck());
        assert!(!dfa.is_accepting());
        assert_eq!(dfa.read_symbol('a'), Err(err));

        assert!(!design.accepts("abc"));
        assert_eq!(design.run("abcb"), Err(err));
        assert_eq!(design.run("ab"), Ok(true));
    }

    #[test]
    fn accepts_opaque_states() {
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        struct Opaque(u8);

        let design = DfaDesign::new(
            Opaque(0),
            [Opaque(1)],
            DfaRulebook::first_match([Rule::new(Opaque(0), 'a', Opaque(1))]),
        );

        assert!(design.accepts("a"));
        assert!(!design.accepts(""));
        assert!(!design.accepts("aa"));
        assert!(!design.accepts("b"));
    }

    #[test]
    fn rejects_ambiguity() {
        let mut rules = rules().to_vec();
        rules.push(Rule::new(2, 'a', 3));

        assert_eq!(
            DfaRulebook::new(rules.clone()).unwrap_err(),
            RuleError::AmbiguousRule {
                state: 2,
                symbol: 'a'
            }
        );

        let lenient = DfaRulebook::first_match(rules);
        assert_eq!(lenient.next_state(&2, 'a'), Ok(&2));
        assert_eq!(lenient.rules().len(), 7);
    }

    #[test]
    fn rejects_free_moves() {
        let mut rules = rules().to_vec();
        rules.insert(0, Rule::free(1, 3));

        assert_eq!(
            DfaRulebook::new(rules.clone()).unwrap_err(),
            RuleError::FreeMove { state: 1 }
        );

        let design = DfaDesign::new(1, [3], DfaRulebook::first_match(rules));
        assert!(!design.accepts(""));
        assert!(design.accepts("ab"));
    }
}
