//! Lexical errors.

use crate::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenizeErrorKind {
    /// A character that cannot start any token.
    UnknownCharacter(char),
    /// Input ended before the closing `"` of a string literal.
    UnterminatedString,
    /// Source text longer than a span can address (4 GiB).
    InputTooLarge,
}

/// A tokenizer failure with the offending source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizeError {
    pub kind: TokenizeErrorKind,
    pub span: Span,
}

impl TokenizeError {
    pub fn new(kind: TokenizeErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

impl std::fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            TokenizeErrorKind::UnknownCharacter(c) => {
                write!(f, "unknown character found: {:?}", c)
            }
            TokenizeErrorKind::UnterminatedString => write!(f, "string literal not closed"),
            TokenizeErrorKind::InputTooLarge => write!(f, "input larger than 4 GiB"),
        }?;
        write!(f, " at offset {}", self.span.start)
    }
}

impl std::error::Error for TokenizeError {}
