use std::{
    iter::{Enumerate, Peekable},
    str::{Chars, FromStr},
};

use super::Pattern;

/// Syntax errors, located by character offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Missing operand for '*' at {0}")]
    MissingOperand(usize),
    #[error("Unclosed parenthesis opened at {0}")]
    UnclosedParen(usize),
    #[error("Found extraneous right parenthesis at {0}")]
    TrailingParen(usize),
    #[error("Parentheses nested too deeply at {0}")]
    TooDeep(usize),
}

/// Maximum number of open parentheses at any point in a pattern
pub const MAX_DEPTH: usize = 256;

struct Parser<'a> {
    chars: Peekable<Enumerate<Chars<'a>>>,
    depth: usize,
}

impl Parser<'_> {
    #[inline]
    fn peek(&mut self) -> Option<(usize, char)> { self.chars.peek().copied() }

    fn eat(&mut self, c: char) -> bool { self.chars.next_if(|&(_, d)| d == c).is_some() }

    fn choose(&mut self) -> Result<Pattern, ParseError> {
        let mut alts = vec![self.concat()?];
        while self.eat('|') {
            alts.push(self.concat()?);
        }

        Ok(fold_right(alts, |l, r| Pattern::Choose(Box::new(l), Box::new(r))))
    }

    fn concat(&mut self) -> Result<Pattern, ParseError> {
        let mut items = vec![];
        while let Some((_, c)) = self.peek() {
            if matches!(c, '|' | ')') {
                break;
            }

            items.push(self.repeat()?);
        }

        Ok(if items.is_empty() {
            Pattern::Empty
        } else {
            fold_right(items, |l, r| {
                Pattern::Concatenate(Box::new(l), Box::new(r))
            })
        })
    }

    fn repeat(&mut self) -> Result<Pattern, ParseError> {
        let mut pat = self.atom()?;
        while self.eat('*') {
            pat = Pattern::repeat(pat);
        }

        Ok(pat)
    }

    fn atom(&mut self) -> Result<Pattern, ParseError> {
        match self.chars.next() {
            Some((i, '(')) => {
                if self.depth >= MAX_DEPTH {
                    return Err(ParseError::TooDeep(i));
                }

                self.depth += 1;
                let inner = self.choose()?;
                self.depth -= 1;

                if self.eat(')') {
                    Ok(inner)
                } else {
                    Err(ParseError::UnclosedParen(i))
                }
            },
            Some((i, '*')) => Err(ParseError::MissingOperand(i)),
            Some((_, c)) => {
                debug_assert!(!matches!(c, '|' | ')'));
                Ok(Pattern::Literal(c))
            },
            None => unreachable!("atom called at end of input"),
        }
    }
}

/// `[a, b, c]` becomes `f(a, f(b, c))`
fn fold_right(items: Vec<Pattern>, f: fn(Pattern, Pattern) -> Pattern) -> Pattern {
    items
        .into_iter()
        .rev()
        .reduce(|r, l| f(l, r))
        .unwrap_or_else(|| unreachable!())
}

impl FromStr for Pattern {
    type Err = ParseError;

    /// Parse `|`, postfix `*`, parentheses and literal characters
    ///
    /// Concatenation binds tighter than `|`, both associate to the right, and
    /// an empty operand (as in `(|b)`) is [`Pattern::Empty`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser {
            chars: s.chars().enumerate().peekable(),
            depth: 0,
        };
        let pat = parser.choose()?;

        match parser.peek() {
            None => Ok(pat),
            Some((i, c)) => {
                debug_assert_eq!(c, ')');
                Err(ParseError::TrailingParen(i))
            },
        }
    }
}
