//! Token types for the session object format.

use std::borrow::Cow;

use crate::Span;

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Leading spaces of a non-blank line. Emitted after every line break
    /// whose line has content, even when there are zero spaces.
    Indentation,
    /// `[A-Za-z0-9_]+`
    Identifier,
    /// `"..."`, with `\t`, `\n` and `\"` resolved.
    StringLiteral,
    /// `=`
    Assignment,
    /// `!`, only meaningful as the first token of a document.
    DocumentMarker,
}

impl TokenKind {
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Indentation => "indentation",
            TokenKind::Identifier => "identifier",
            TokenKind::StringLiteral => "string",
            TokenKind::Assignment => "'='",
            TokenKind::DocumentMarker => "'!'",
        }
    }
}

/// A token with its kind, span, and text.
///
/// `text` is the token's value: the run of spaces for [`TokenKind::Indentation`],
/// the name for [`TokenKind::Identifier`], and the unescaped content (without
/// quotes) for [`TokenKind::StringLiteral`]. The span always covers the raw
/// source, quotes included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub span: Span,
    pub text: Cow<'src, str>,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, span: Span, text: impl Into<Cow<'src, str>>) -> Self {
        Self {
            kind,
            span,
            text: text.into(),
        }
    }

    /// Number of leading spaces, if this is an indentation token.
    pub fn indentation(&self) -> Option<usize> {
        match self.kind {
            TokenKind::Indentation => Some(self.text.len()),
            _ => None,
        }
    }

    /// The identifier text, if this is an identifier.
    pub fn as_identifier(&self) -> Option<&str> {
        match self.kind {
            TokenKind::Identifier => Some(&self.text),
            _ => None,
        }
    }

    /// The unescaped string content, if this is a string literal.
    pub fn as_string(&self) -> Option<&str> {
        match self.kind {
            TokenKind::StringLiteral => Some(&self.text),
            _ => None,
        }
    }

    /// Short human-readable form used in error messages.
    ///
    /// Indentation is shown as its width, since the spaces themselves would
    /// be invisible.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Indentation => self.text.len().to_string(),
            _ => self.text.to_string(),
        }
    }
}
