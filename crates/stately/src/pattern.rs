//! Regular expressions over characters, compiled to NFAs by Thompson
//! construction

use std::fmt;

use nfa_builder::NfaBuilder;

use crate::{nfa::NfaDesign, state::State};

mod nfa_builder;
mod syntax;

pub use syntax::{MAX_DEPTH, ParseError};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// Matches only the empty string
    Empty,
    Literal(char),
    Concatenate(Box<Pattern>, Box<Pattern>),
    Choose(Box<Pattern>, Box<Pattern>),
    /// Kleene star
    Repeat(Box<Pattern>),
}

impl From<char> for Pattern {
    #[inline]
    fn from(c: char) -> Self { Self::Literal(c) }
}

impl Pattern {
    #[inline]
    #[must_use]
    pub fn concatenate(l: impl Into<Self>, r: impl Into<Self>) -> Self {
        Self::Concatenate(Box::new(l.into()), Box::new(r.into()))
    }

    #[inline]
    #[must_use]
    pub fn choose(l: impl Into<Self>, r: impl Into<Self>) -> Self {
        Self::Choose(Box::new(l.into()), Box::new(r.into()))
    }

    #[inline]
    #[must_use]
    pub fn repeat(p: impl Into<Self>) -> Self { Self::Repeat(Box::new(p.into())) }

    /// Binding strength when rendered; higher binds tighter
    #[must_use]
    pub fn precedence(&self) -> u8 {
        match self {
            Self::Empty | Self::Literal(_) => 3,
            Self::Repeat(_) => 2,
            Self::Concatenate(..) => 1,
            Self::Choose(..) => 0,
        }
    }

    #[inline]
    fn bracket(&self, outer: u8) -> Bracket<'_> { Bracket(self, self.precedence() < outer) }

    /// Compile to a fresh NFA
    ///
    /// Every call allocates its own states, so the result shares nothing
    /// with any previously compiled design.
    #[inline]
    #[must_use]
    pub fn to_nfa_design(&self) -> NfaDesign<State> { NfaBuilder::build(self) }

    /// Test whether this pattern matches all of `input`
    #[inline]
    #[must_use]
    pub fn matches(&self, input: &str) -> bool { self.to_nfa_design().accepts(input) }
}

struct Bracket<'a>(&'a Pattern, bool);

impl fmt::Display for Bracket<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self(pat, paren) = *self;

        if paren {
            write!(f, "({pat})")
        } else {
            fmt::Display::fmt(pat, f)
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = self.precedence();

        match self {
            Self::Empty => Ok(()),
            Self::Literal(c) => write!(f, "{c}"),
            Self::Concatenate(l, r) => write!(f, "{}{}", l.bracket(prec), r.bracket(prec)),
            Self::Choose(l, r) => write!(f, "{}|{}", l.bracket(prec), r.bracket(prec)),
            Self::Repeat(p) => write!(f, "{}*", p.bracket(prec)),
        }
    }
}

#[cfg(any(test, feature = "proptest"))]
pub use prop::*;

#[cfg(any(test, feature = "proptest"))]
mod prop {
    use proptest::prelude::*;

    use super::Pattern;

    /// Random patterns over the characters produced by `chr`
    ///
    /// Leaves are literals, plus [`Pattern::Empty`] when `empty` is set.
    pub fn pattern(
        depth: u32,
        tree_size: u32,
        branch_size: u32,
        empty: bool,
        chr: impl Strategy<Value = char> + 'static,
    ) -> impl Strategy<Value = Pattern> {
        let lit = chr.prop_map(Pattern::Literal);
        let leaf = if empty {
            prop_oneof![1 => Just(Pattern::Empty), 4 => lit].boxed()
        } else {
            lit.boxed()
        };

        leaf.prop_recursive(depth, tree_size, branch_size, |s| {
            prop_oneof![
                (s.clone(), s.clone()).prop_map(|(l, r)| Pattern::concatenate(l, r)),
                (s.clone(), s.clone()).prop_map(|(l, r)| Pattern::choose(l, r)),
                s.prop_map(|p| Pattern::Repeat(Box::new(p))),
            ]
        })
    }

    /// Literal characters that are not pattern syntax
    pub fn symbol_safe() -> impl Strategy<Value = char> {
        any::<char>().prop_filter("Character is pattern syntax", |c| !"|*()".contains(*c))
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use super::Pattern;

    fn lit(c: char) -> Pattern { Pattern::Literal(c) }

    /// Every end offset reachable by matching `pat` against `s` from `start`
    fn ends(pat: &Pattern, s: &[char], start: usize) -> BTreeSet<usize> {
        match pat {
            Pattern::Empty => [start].into_iter().collect(),
            &Pattern::Literal(c) => (s.get(start) == Some(&c))
                .then_some(start + 1)
                .into_iter()
                .collect(),
            Pattern::Concatenate(l, r) => ends(l, s, start)
                .into_iter()
                .flat_map(|m| ends(r, s, m))
                .collect(),
            Pattern::Choose(l, r) => {
                let mut set = ends(l, s, start);
                set.extend(ends(r, s, start));
                set
            },
            Pattern::Repeat(p) => {
                let mut seen: BTreeSet<_> = [start].into_iter().collect();
                let mut todo = vec![start];

                while let Some(m) = todo.pop() {
                    for n in ends(p, s, m) {
                        if seen.insert(n) {
                            todo.push(n);
                        }
                    }
                }

                seen
            },
        }
    }

    fn reference_match(pat: &Pattern, s: &str) -> bool {
        let s: Vec<_> = s.chars().collect();
        ends(pat, &s, 0).contains(&s.len())
    }

    fn splits(s: &str) -> impl Iterator<Item = (&str, &str)> {
        s.char_indices()
            .map(|(i, _)| i)
            .chain([s.len()])
            .map(|i| s.split_at(i))
    }

    #[test]
    fn display() {
        let pat = Pattern::repeat(Pattern::choose(
            Pattern::concatenate('a', 'b'),
            'a',
        ));
        assert_eq!(pat.to_string(), "(ab|a)*");

        let pat = Pattern::repeat(Pattern::concatenate('a', Pattern::choose(Pattern::Empty, 'b')));
        assert_eq!(pat.to_string(), "(a(|b))*");

        assert_eq!(Pattern::concatenate('a', Pattern::concatenate('b', 'c')).to_string(), "abc");
        assert_eq!(Pattern::choose('a', Pattern::choose('b', 'c')).to_string(), "a|b|c");
        assert_eq!(Pattern::repeat(Pattern::repeat('a')).to_string(), "a**");
        assert_eq!(Pattern::concatenate(Pattern::repeat('a'), 'b').to_string(), "a*b");
        assert_eq!(Pattern::Empty.to_string(), "");
    }

    #[test]
    fn precedence() {
        assert_eq!(Pattern::Empty.precedence(), 3);
        assert_eq!(lit('a').precedence(), 3);
        assert_eq!(Pattern::repeat('a').precedence(), 2);
        assert_eq!(Pattern::concatenate('a', 'b').precedence(), 1);
        assert_eq!(Pattern::choose('a', 'b').precedence(), 0);
    }

    #[test]
    fn empty_and_literal() {
        assert!(Pattern::Empty.matches(""));
        assert!(!Pattern::Empty.matches("a"));
        assert!(lit('a').matches("a"));
        assert!(!lit('a').matches(""));
        assert!(!lit('a').matches("b"));
    }

    #[test]
    fn concatenate() {
        let pat = Pattern::concatenate('a', Pattern::concatenate('b', 'c'));

        assert!(!pat.matches("a"));
        assert!(!pat.matches("ab"));
        assert!(pat.matches("abc"));
        assert!(!pat.matches("abcd"));
    }

    #[test]
    fn choose() {
        let pat = Pattern::choose('a', 'b');

        assert!(pat.matches("a"));
        assert!(pat.matches("b"));
        assert!(!pat.matches("c"));
        assert!(!pat.matches("ab"));
    }

    #[test]
    fn repeat() {
        let pat = Pattern::repeat('a');

        assert!(pat.matches(""));
        assert!(pat.matches("a"));
        assert!(pat.matches("aaaa"));
        assert!(!pat.matches("b"));
    }

    #[test]
    fn optional_b() {
        let pat = Pattern::repeat(Pattern::concatenate('a', Pattern::choose(Pattern::Empty, 'b')));

        assert!(pat.matches(""));
        assert!(pat.matches("a"));
        assert!(pat.matches("ab"));
        assert!(pat.matches("aba"));
        assert!(pat.matches("abab"));
        assert!(pat.matches("abaab"));
        assert!(!pat.matches("abba"));
    }

    #[test]
    fn compiled_design_is_reusable() {
        let pat = Pattern::repeat(Pattern::choose(Pattern::concatenate('a', 'b'), 'a'));
        let design = pat.to_nfa_design();

        for s in ["", "a", "ab", "aab", "aba", "abb", "ba"] {
            assert_eq!(design.accepts(s), pat.matches(s), "{s:?}");
            assert_eq!(design.accepts(s), reference_match(&pat, s), "{s:?}");
        }
    }

    fn pattern() -> impl Strategy<Value = Pattern> {
        super::pattern(5, 24, 2, true, prop_oneof![Just('a'), Just('b')])
    }

    proptest! {
        #[test]
        fn matches_reference(pat in pattern(), s in "[ab]{0,7}") {
            prop_assert_eq!(pat.matches(&s), reference_match(&pat, &s));
        }

        #[test]
        fn matches_deterministic(pat in pattern(), s in "[ab]{0,7}") {
            let design = pat.to_nfa_design();
            prop_assert_eq!(design.accepts(&s), design.accepts(&s));
            prop_assert_eq!(design.accepts(&s), pat.matches(&s));
        }

        #[test]
        fn choose_is_union(l in pattern(), r in pattern(), s in "[ab]{0,6}") {
            let both = Pattern::choose(l.clone(), r.clone());
            prop_assert_eq!(both.matches(&s), l.matches(&s) || r.matches(&s));
        }

        #[test]
        fn concatenate_splits(l in pattern(), r in pattern(), s in "[ab]{0,6}") {
            let both = Pattern::concatenate(l.clone(), r.clone());
            let split = splits(&s).any(|(a, b)| l.matches(a) && r.matches(b));
            prop_assert_eq!(both.matches(&s), split);
        }

        #[test]
        fn repeat_decomposes(p in pattern(), s in "[ab]{0,6}") {
            // Nonempty pieces suffice: empty pieces never change the string
            fn pieces(p: &Pattern, s: &str) -> bool {
                s.is_empty()
                    || splits(s)
                        .skip(1)
                        .any(|(a, b)| p.matches(a) && pieces(p, b))
            }

            prop_assert_eq!(Pattern::repeat(p.clone()).matches(&s), pieces(&p, &s));
        }

        #[test]
        fn dfa_agrees(pat in pattern(), s in "[abc]{0,7}") {
            let nfa = pat.to_nfa_design();
            prop_assert_eq!(nfa.to_dfa_design().accepts(&s), nfa.accepts(&s));
        }
    }
}
