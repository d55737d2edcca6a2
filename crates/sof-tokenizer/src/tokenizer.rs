//! Tokenizer for the session object format.

use std::borrow::Cow;

use crate::{Span, Token, TokenKind, TokenizeError, TokenizeErrorKind};
use tracing::trace;

/// Tokenize a whole document.
///
/// Stops at the first lexical error.
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, TokenizeError> {
    Tokenizer::new(source).collect()
}

/// A tokenizer that produces tokens from session object source text.
///
/// Structure is carried by [`TokenKind::Indentation`] tokens: every line
/// break followed by a non-blank line yields one, holding that line's leading
/// spaces. Blank lines (nothing but whitespace) produce nothing. The first
/// line never gets an indentation token.
#[derive(Clone)]
pub struct Tokenizer<'src> {
    /// The source text being tokenized.
    source: &'src str,
    /// The remaining source text (suffix of `source`).
    remaining: &'src str,
    /// Current byte position in `source`.
    pos: u32,
    /// Set after an error; the iterator is fused from then on.
    failed: bool,
}

impl<'src> Tokenizer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            remaining: source,
            pos: 0,
            failed: false,
        }
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    #[inline]
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining.chars().nth(n)
    }

    #[inline]
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8() as u32;
        self.remaining = &self.remaining[c.len_utf8()..];
        Some(c)
    }

    /// Source text from `start` to the current position.
    #[inline]
    fn slice(&self, start: u32) -> &'src str {
        &self.source[start as usize..self.pos as usize]
    }

    fn token(&self, kind: TokenKind, start: u32, text: impl Into<Cow<'src, str>>) -> Token<'src> {
        let token = Token::new(kind, Span::new(start, self.pos), text);
        trace!("Token {:?} at {:?}: {:?}", token.kind, token.span, token.text);
        token
    }

    /// Get the next token, `None` at end of input.
    pub fn next_token(&mut self) -> Option<Result<Token<'src>, TokenizeError>> {
        if self.failed {
            return None;
        }
        if self.pos == 0
            && let Err(e) = check_source_len(self.source.len())
        {
            self.failed = true;
            return Some(Err(e));
        }

        loop {
            let start = self.pos;
            let c = self.peek()?;

            let result = match c {
                '\n' => {
                    self.advance();
                    match self.tokenize_indentation() {
                        Some(token) => Ok(token),
                        None => continue,
                    }
                }
                '"' => self.tokenize_string(),
                '=' => {
                    self.advance();
                    Ok(self.token(TokenKind::Assignment, start, self.slice(start)))
                }
                '!' => {
                    self.advance();
                    Ok(self.token(TokenKind::DocumentMarker, start, self.slice(start)))
                }
                // Whitespace between tokens
                ' ' | '\t' => {
                    self.advance();
                    continue;
                }
                // CR of a CRLF line ending
                '\r' if matches!(self.peek_nth(1), None | Some('\n')) => {
                    self.advance();
                    continue;
                }
                _ if is_identifier_char(c) => Ok(self.tokenize_identifier()),
                _ => {
                    self.advance();
                    Err(TokenizeError::new(
                        TokenizeErrorKind::UnknownCharacter(c),
                        Span::new(start, self.pos),
                    ))
                }
            };

            if result.is_err() {
                self.failed = true;
            }
            return Some(result);
        }
    }

    /// Count the leading spaces of the line that starts at the current
    /// position. Returns `None` for a blank line, leaving the position on the
    /// line's terminating newline (or at end of input).
    ///
    /// Only spaces count: a tab ends the run and is skipped later as ordinary
    /// whitespace.
    fn tokenize_indentation(&mut self) -> Option<Token<'src>> {
        let start = self.pos;
        while self.peek() == Some(' ') {
            self.advance();
        }

        if self.rest_of_line_is_blank() {
            while let Some(c) = self.peek() {
                if c == '\n' {
                    break;
                }
                self.advance();
            }
            return None;
        }

        Some(self.token(TokenKind::Indentation, start, self.slice(start)))
    }

    fn rest_of_line_is_blank(&self) -> bool {
        self.remaining
            .split('\n')
            .next()
            .unwrap_or_default()
            .chars()
            .all(|c| matches!(c, ' ' | '\t' | '\r'))
    }

    fn tokenize_identifier(&mut self) -> Token<'src> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_identifier_char(c) {
                self.advance();
            } else {
                break;
            }
        }
        self.token(TokenKind::Identifier, start, self.slice(start))
    }

    /// Tokenize a string literal: `"..."`.
    ///
    /// A backslash protects the next character from closing the literal; the
    /// escapes themselves are resolved by [`unescape`].
    fn tokenize_string(&mut self) -> Result<Token<'src>, TokenizeError> {
        let start = self.pos;

        // Opening quote
        self.advance();
        let content_start = self.pos;

        let mut escaped = false;
        loop {
            match self.peek() {
                None => {
                    return Err(TokenizeError::new(
                        TokenizeErrorKind::UnterminatedString,
                        Span::new(start, self.pos),
                    ));
                }
                Some('"') if !escaped => break,
                Some('\\') if !escaped => escaped = true,
                Some(_) => escaped = false,
            }
            self.advance();
        }

        let content = self.slice(content_start);

        // Closing quote
        self.advance();

        Ok(self.token(TokenKind::StringLiteral, start, unescape(content)))
    }
}

impl<'src> Iterator for Tokenizer<'src> {
    type Item = Result<Token<'src>, TokenizeError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Spans are `u32`, so offsets must fit.
fn check_source_len(len: usize) -> Result<u32, TokenizeError> {
    u32::try_from(len)
        .map_err(|_| TokenizeError::new(TokenizeErrorKind::InputTooLarge, Span::empty(0)))
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Resolve `\t`, `\n` and `\"`. Any other backslash pair is kept as written.
fn unescape(raw: &str) -> Cow<'_, str> {
    if !raw.contains('\\') {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('"') => out.push('"'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    Cow::Owned(out)
}
