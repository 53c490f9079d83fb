use std::{
    collections::{BTreeSet, VecDeque},
    hash::Hash,
};

use indexmap::IndexSet;

use super::NfaDesign;
use crate::{
    dfa::{DfaDesign, DfaRulebook},
    rule::Rule,
};

/// Subset construction over the closed state sets reachable from an NFA's
/// start state
pub struct DfaBuilder<'a, S> {
    nfa: &'a NfaDesign<S>,
    sets: IndexSet<BTreeSet<S>>,
}

impl<'a, S: Clone + Ord + Hash> DfaBuilder<'a, S> {
    pub fn new(nfa: &'a NfaDesign<S>) -> Self {
        Self {
            nfa,
            sets: IndexSet::new(),
        }
    }

    /// Returns the DFA along with the NFA state set each DFA state stands
    /// for, indexed by DFA state
    pub fn build(mut self) -> (DfaDesign<usize>, Vec<BTreeSet<S>>) {
        let nfa = self.nfa;
        let rulebook = nfa.rulebook();
        let alphabet = rulebook.alphabet();

        let (start, _) = self
            .sets
            .insert_full(rulebook.follow_free_moves([nfa.start().clone()]));
        let mut q = VecDeque::from([start]);
        let mut rules = vec![];

        while let Some(id) = q.pop_front() {
            for &c in &alphabet {
                let next = rulebook.follow_free_moves(rulebook.next_states(&self.sets[id], Some(c)));
                let (next_id, fresh) = self.sets.insert_full(next);

                if fresh {
                    q.push_back(next_id);
                }

                rules.push(Rule::new(id, c, next_id));
            }
        }

        let accept: Vec<_> = self
            .sets
            .iter()
            .enumerate()
            .filter(|(_, set)| set.iter().any(|s| nfa.accept_states().contains(s)))
            .map(|(i, _)| i)
            .collect();

        tracing::debug!(
            nfa_rules = rulebook.rules().len(),
            dfa_states = self.sets.len(),
            dfa_accept = accept.len(),
            "Subset construction finished"
        );

        (
            DfaDesign::new(start, accept, DfaRulebook::new_unchecked(rules)),
            self.sets.into_iter().collect(),
        )
    }
}
