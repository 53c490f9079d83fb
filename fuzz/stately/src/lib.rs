use arbitrary::Arbitrary;
use stately::pattern::Pattern;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Arbitrary)]
pub enum Symbol {
    A,
    B,
    C,
}

impl From<Symbol> for char {
    fn from(sym: Symbol) -> Self {
        match sym {
            Symbol::A => 'a',
            Symbol::B => 'b',
            Symbol::C => 'c',
        }
    }
}

#[derive(Debug, Clone, Arbitrary)]
pub enum Tree {
    Empty,
    Literal(Symbol),
    Concatenate(Box<Tree>, Box<Tree>),
    Choose(Box<Tree>, Box<Tree>),
    Repeat(Box<Tree>),
}

impl Tree {
    pub fn into_pattern(self) -> Pattern {
        match self {
            Self::Empty => Pattern::Empty,
            Self::Literal(s) => Pattern::Literal(s.into()),
            Self::Concatenate(l, r) => Pattern::concatenate(l.into_pattern(), r.into_pattern()),
            Self::Choose(l, r) => Pattern::choose(l.into_pattern(), r.into_pattern()),
            Self::Repeat(p) => Pattern::repeat(p.into_pattern()),
        }
    }
}

#[derive(Debug, Arbitrary)]
pub struct Input {
    tree: Tree,
    strings: Vec<Vec<Symbol>>,
}

impl Input {
    /// Check that the NFA and its subset-constructed DFA agree
    pub fn run_differential(self) {
        let Self { tree, strings } = self;
        let pattern = tree.into_pattern();
        let nfa = pattern.to_nfa_design();
        let dfa = nfa.to_dfa_design();

        for s in strings {
            let s: String = s.into_iter().map(char::from).collect();
            assert_eq!(nfa.accepts(&s), dfa.accepts(&s), "{pattern} on {s:?}");
        }
    }
}

/// Parse arbitrary text and, if it is a pattern, match it against itself
pub fn run_parse(s: &str) {
    // Long runs of concatenation or `*` nest the tree once per character
    if s.len() > 4096 {
        return;
    }

    let Ok(pattern) = s.parse::<Pattern>() else {
        return;
    };

    let nfa = pattern.to_nfa_design();
    assert_eq!(nfa.accepts(s), nfa.to_dfa_design().accepts(s), "{pattern} on {s:?}");
}
