use std::fmt;

/// Input symbol of a transition, where `None` is an epsilon (free) move
pub type Symbol = Option<char>;

/// The symbol for a move that consumes no input
pub const EPSILON: Symbol = None;

/// A single labelled transition `state --symbol--> next`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rule<S> {
    state: S,
    symbol: Symbol,
    next: S,
}

impl<S> Rule<S> {
    #[inline]
    #[must_use]
    pub const fn new(state: S, symbol: char, next: S) -> Self {
        Self {
            state,
            symbol: Some(symbol),
            next,
        }
    }

    /// Construct an epsilon rule
    #[inline]
    #[must_use]
    pub const fn free(state: S, next: S) -> Self {
        Self {
            state,
            symbol: EPSILON,
            next,
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_symbol(state: S, symbol: Symbol, next: S) -> Self {
        Self {
            state,
            symbol,
            next,
        }
    }

    #[inline]
    pub fn state(&self) -> &S { &self.state }

    #[inline]
    pub fn symbol(&self) -> Symbol { self.symbol }

    #[inline]
    pub fn is_free(&self) -> bool { self.symbol.is_none() }

    /// The state this rule moves to
    #[inline]
    pub fn follow(&self) -> &S { &self.next }
}

impl<S: PartialEq> Rule<S> {
    /// Epsilon queries only match epsilon rules, and vice versa
    #[inline]
    pub fn applies_to(&self, state: &S, symbol: Symbol) -> bool {
        self.state == *state && self.symbol == symbol
    }
}

pub(crate) struct FmtSymbol(pub Symbol);

impl fmt::Display for FmtSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(c) => write!(f, "{}", c.escape_default()),
            None => f.write_str("ϵ"),
        }
    }
}

impl<S: fmt::Display> fmt::Display for Rule<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} --{}--> {}",
            self.state,
            FmtSymbol(self.symbol),
            self.next
        )
    }
}
