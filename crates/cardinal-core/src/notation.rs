//! Compact text notation for content models.
//!
//! ```text
//! model    := choice
//! choice   := sequence ( '|' sequence )*
//! sequence := postfix ( ',' postfix )*
//! postfix  := primary ( '?' | '*' | '+' )*
//! primary  := NAME | '(' ')' | '(' choice ')'
//! NAME     := [A-Za-z_] [A-Za-z0-9_.:-]*
//! ```
//!
//! `,` binds tighter than `|`, so `a, b | c` is `(a, b) | c`. `()` is
//! epsilon. Whitespace is ignored between tokens.
//!
//! Lists of any length parse into one flat sequence or choice. Nesting,
//! counted as open groups plus stacked postfix operators, is capped at
//! [`MAX_NESTING`].

use std::iter::Peekable;
use std::str::CharIndices;

use thiserror::Error;

use crate::expr::Expression;

/// Deepest group/postfix nesting [`parse`] accepts.
pub const MAX_NESTING: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("unexpected character {found:?} at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },
    #[error("unexpected end of input at offset {offset}, expected {expected}")]
    UnexpectedEnd { offset: usize, expected: &'static str },
    #[error("parenthesis opened at offset {offset} is never closed")]
    Unclosed { offset: usize },
    #[error("unmatched ')' at offset {offset}")]
    Unmatched { offset: usize },
    #[error("nesting deeper than {limit} at offset {offset}")]
    TooDeep { offset: usize, limit: usize },
}

impl NotationError {
    /// Byte offset into the input where the problem was detected.
    #[must_use]
    pub const fn offset(&self) -> usize {
        match self {
            Self::UnexpectedChar { offset, .. }
            | Self::UnexpectedEnd { offset, .. }
            | Self::Unclosed { offset }
            | Self::Unmatched { offset }
            | Self::TooDeep { offset, .. } => *offset,
        }
    }
}

/// Parse a content model written in the compact notation.
///
/// # Errors
///
/// Returns a [`NotationError`] pointing at the first offending offset.
pub fn parse(input: &str) -> Result<Expression<String>, NotationError> {
    let mut parser = Parser {
        input,
        chars: input.char_indices().peekable(),
        depth: 0,
    };
    let expr = parser.choice()?;
    parser.skip_ws();
    match parser.chars.next() {
        None => Ok(expr),
        Some((offset, ')')) => Err(NotationError::Unmatched { offset }),
        Some((offset, found)) => Err(NotationError::UnexpectedChar { found, offset }),
    }
}

struct Parser<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    /// Groups currently open.
    depth: usize,
}

impl Parser<'_> {
    fn skip_ws(&mut self) {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    }

    fn peek(&mut self) -> Option<(usize, char)> {
        self.skip_ws();
        self.chars.peek().copied()
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_ws();
        self.chars.next_if(|&(_, c)| c == expected).is_some()
    }

    fn choice(&mut self) -> Result<Expression<String>, NotationError> {
        let mut expr = self.sequence()?;
        while self.eat('|') {
            expr = Expression::choice(expr, self.sequence()?);
        }
        Ok(expr)
    }

    fn sequence(&mut self) -> Result<Expression<String>, NotationError> {
        let mut expr = self.postfix()?;
        while self.eat(',') {
            expr = Expression::sequence(expr, self.postfix()?);
        }
        Ok(expr)
    }

    fn postfix(&mut self) -> Result<Expression<String>, NotationError> {
        let mut expr = self.primary()?;
        let mut stacked = 0;
        loop {
            let Some((offset, op)) = self.peek() else {
                return Ok(expr);
            };
            expr = match op {
                '?' => Expression::optional(expr),
                '*' => Expression::zero_or_more(expr),
                '+' => Expression::one_or_more(expr),
                _ => return Ok(expr),
            };
            stacked += 1;
            check_depth(self.depth + stacked, offset)?;
            self.chars.next();
        }
    }


    fn primary(&mut self) -> Result<Expression<String>, NotationError> {
        match self.peek() {
            None => Err(NotationError::UnexpectedEnd {
                offset: self.input.len(),
                expected: "a particle name or '('",
            }),
            Some((open, '(')) => {
                self.chars.next();
                if self.eat(')') {
                    return Ok(Expression::Epsilon);
                }
                check_depth(self.depth + 1, open)?;
                self.depth += 1;
                let inner = self.choice()?;
                self.depth -= 1;
                if self.eat(')') {
                    Ok(inner)
                } else {
                    match self.peek() {
                        None => Err(NotationError::Unclosed { offset: open }),
                        Some((offset, found)) => {
                            Err(NotationError::UnexpectedChar { found, offset })
                        }
                    }
                }
            }
            Some((start, c)) if is_name_start(c) => {
                let mut end = start;
                while let Some((offset, c)) = self.chars.next_if(|&(_, c)| is_name_char(c)) {
                    end = offset + c.len_utf8();
                }
                Ok(Expression::Atom(self.input[start..end].to_string()))
            }
            Some((offset, found)) => Err(NotationError::UnexpectedChar { found, offset }),
        }
    }
}

const fn check_depth(depth: usize, offset: usize) -> Result<(), NotationError> {
    if depth > MAX_NESTING {
        Err(NotationError::TooDeep {
            offset,
            limit: MAX_NESTING,
        })
    } else {
        Ok(())
    }
}

const fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

const fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '-')
}
