use super::Pattern;
use crate::{
    nfa::{NfaDesign, NfaRulebook},
    rule::Rule,
    state::{Fresh, State},
};

/// A partially-built automaton: everything reachable from `start` is already
/// in the builder's rule list
struct Fragment {
    start: State,
    accept: Vec<State>,
}

/// Thompson construction over a [`Pattern`] tree
///
/// Child fragments are never edited once built; each composite only appends
/// bridging free moves and mints its own fresh states.
pub struct NfaBuilder {
    rules: Vec<Rule<State>>,
    free: Fresh,
}

impl NfaBuilder {
    fn new() -> Self {
        Self {
            rules: vec![],
            free: Fresh::default(),
        }
    }

    pub fn build(pattern: &Pattern) -> NfaDesign<State> {
        let mut me = Self::new();
        let Fragment { start, accept } = me.build_in(pattern);

        tracing::trace!(
            %pattern,
            states = me.free.count(),
            rules = me.rules.len(),
            "Compiled pattern"
        );

        NfaDesign::new(start, accept, NfaRulebook::from(me.rules))
    }

    #[inline]
    fn connect(&mut self, from: State, to: State) { self.rules.push(Rule::free(from, to)); }

    fn build_in(&mut self, pattern: &Pattern) -> Fragment {
        match pattern {
            Pattern::Empty => {
                let start = self.free.state();

                Fragment {
                    start,
                    accept: vec![start],
                }
            },
            &Pattern::Literal(c) => {
                let start = self.free.state();
                let accept = self.free.state();
                self.rules.push(Rule::new(start, c, accept));

                Fragment {
                    start,
                    accept: vec![accept],
                }
            },
            Pattern::Concatenate(l, r) => {
                let l = self.build_in(l);
                let r = self.build_in(r);

                for &a in &l.accept {
                    self.connect(a, r.start);
                }

                Fragment {
                    start: l.start,
                    accept: r.accept,
                }
            },
            Pattern::Choose(l, r) => {
                let l = self.build_in(l);
                let r = self.build_in(r);
                let start = self.free.state();

                self.connect(start, l.start);
                self.connect(start, r.start);

                let mut accept = l.accept;
                accept.extend(r.accept);
                Fragment { start, accept }
            },
            Pattern::Repeat(p) => {
                let p = self.build_in(p);
                let start = self.free.state();

                for &a in &p.accept {
                    self.connect(a, p.start);
                }
                self.connect(start, p.start);

                let mut accept = vec![start];
                accept.extend(p.accept);
                Fragment { start, accept }
            },
        }
    }
}
