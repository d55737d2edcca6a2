//! Read position within a token stream.

use sof_tokenizer::{Span, Token, TokenKind};

use crate::{ParseError, ParseErrorKind};

/// A position in a borrowed token sequence.
///
/// The cursor never mutates the tokens; it only moves forward. Once the
/// index reaches `len` the cursor is exhausted and [`Cursor::current`] fails
/// with [`ParseErrorKind::UnterminatedInput`].
#[derive(Debug, Clone)]
pub struct Cursor<'t, 'src> {
    tokens: &'t [Token<'src>],
    len: usize,
    index: usize,
    /// Where end-of-input errors point: the end of the source text.
    end: Span,
}

impl<'t, 'src> Cursor<'t, 'src> {
    /// Create a cursor at the first token. `source_len` is the byte length of
    /// the text the tokens came from; the tokenizer rejects anything past
    /// `u32::MAX`, so longer lengths are clamped.
    pub fn new(tokens: &'t [Token<'src>], source_len: usize) -> Self {
        Self {
            tokens,
            len: tokens.len(),
            index: 0,
            end: Span::empty(u32::try_from(source_len).unwrap_or(u32::MAX)),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.index >= self.len
    }

    /// The current token, or `None` once exhausted.
    #[inline]
    pub fn peek(&self) -> Option<&'t Token<'src>> {
        self.tokens[..self.len].get(self.index)
    }

    /// Whether the current token has the given kind.
    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|t| t.kind == kind)
    }

    /// The current token; fails if the input has run out.
    pub fn current(&self) -> Result<&'t Token<'src>, ParseError> {
        self.peek().ok_or_else(|| self.unexpected_end())
    }

    /// Move past the current token. Moving past the end is a no-op.
    #[inline]
    pub fn advance(&mut self) {
        if self.index < self.len {
            self.index += 1;
        }
    }

    /// Move past the current token, failing if that leaves no token to read.
    pub fn advance_or_fail(&mut self) -> Result<(), ParseError> {
        self.advance();
        if self.is_exhausted() {
            return Err(self.unexpected_end());
        }
        Ok(())
    }

    fn unexpected_end(&self) -> ParseError {
        ParseError::new(ParseErrorKind::UnterminatedInput, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sof_tokenizer::tokenize;

    #[test]
    fn test_walks_tokens_in_order() {
        let tokens = tokenize("a = \"b\"").unwrap();
        let mut cursor = Cursor::new(&tokens, 7);
        assert_eq!(cursor.len(), 3);
        assert!(cursor.check(TokenKind::Identifier));

        cursor.advance_or_fail().unwrap();
        assert!(cursor.check(TokenKind::Assignment));

        cursor.advance_or_fail().unwrap();
        assert_eq!(cursor.current().unwrap().as_string(), Some("b"));
        assert_eq!(cursor.index(), 2);
    }

    #[test]
    fn test_advance_or_fail_at_last_token() {
        let tokens = tokenize("a b").unwrap();
        let mut cursor = Cursor::new(&tokens, 3);
        cursor.advance_or_fail().unwrap();

        let err = cursor.advance_or_fail().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnterminatedInput);
        assert_eq!(err.span, Span::empty(3));
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_exhausted_cursor() {
        let mut cursor = Cursor::new(&[], 0);
        assert!(cursor.is_empty());
        assert!(cursor.is_exhausted());
        assert!(cursor.peek().is_none());
        assert!(!cursor.check(TokenKind::Identifier));
        assert_eq!(
            cursor.current().unwrap_err().kind,
            ParseErrorKind::UnterminatedInput
        );

        cursor.advance();
        assert_eq!(cursor.index(), 0);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_end_span_clamped() {
        let cursor = Cursor::new(&[], u32::MAX as usize + 10);
        assert_eq!(cursor.current().unwrap_err().span, Span::empty(u32::MAX));
    }
}
