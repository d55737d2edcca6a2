//! Parse errors.

use sof_tokenizer::{Span, TokenizeError, TokenizeErrorKind};

/// What went wrong while reading a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A character that cannot start any token.
    UnknownCharacter(char),
    /// Input ended in the middle of the grammar (including inside a string).
    UnterminatedInput,
    /// Attribute name not followed by `=`.
    ExpectedAssignment { attribute: String },
    /// `=` not followed by a string literal.
    ExpectedStringValue { attribute: String },
    /// Something other than a line break or child name where a child object
    /// could start.
    ExpectedChildObject { found: String },
    /// A child indented by anything but its parent's indentation plus one.
    BadIndentationStep { parent: usize, found: usize },
    /// Objects nested deeper than [`MAX_DEPTH`](crate::MAX_DEPTH).
    NestingTooDeep { limit: usize },
    /// The document does not start with `!`.
    ExpectedMarker,
    /// `!` not followed by the document type.
    ExpectedTypeIdentifier,
    /// The document type is not followed by a line break.
    ExpectedNewlineAfterType,
    /// The line after the document type is indented.
    ExpectedTopLevelObject,
    /// No root object after the header.
    MissingRootObject,
    /// Source text too long for byte offsets to fit a span.
    InputTooLarge,
    /// Tokens left over after the root object.
    TrailingInput { found: String },
    /// A consumer asked for an attribute the object does not have.
    MissingAttribute { object: String, attribute: String },
}

impl ParseErrorKind {
    /// The human-readable message, without position.
    pub fn message(&self) -> String {
        match self {
            ParseErrorKind::UnknownCharacter(c) => format!("unknown character found: {:?}", c),
            ParseErrorKind::UnterminatedInput => "unexpected end of input".to_string(),
            ParseErrorKind::ExpectedAssignment { attribute } => {
                format!("expected '=' after attribute '{}'", attribute)
            }
            ParseErrorKind::ExpectedStringValue { attribute } => {
                format!("expected string literal as value for attribute '{}'", attribute)
            }
            ParseErrorKind::ExpectedChildObject { found } => {
                format!("expected child object instead of \"{}\"", found)
            }
            ParseErrorKind::BadIndentationStep { parent, found } => format!(
                "child object's indentation must be parent's plus one (parent {}, child {})",
                parent, found
            ),
            ParseErrorKind::NestingTooDeep { limit } => {
                format!("objects nested deeper than {} levels", limit)
            }
            ParseErrorKind::InputTooLarge => "input larger than 4 GiB".to_string(),
            ParseErrorKind::ExpectedMarker => "expected '!' at beginning of file".to_string(),
            ParseErrorKind::ExpectedTypeIdentifier => {
                "expected document type after '!'".to_string()
            }
            ParseErrorKind::ExpectedNewlineAfterType => {
                "expected newline after document type".to_string()
            }
            ParseErrorKind::ExpectedTopLevelObject => {
                "expected top-level object after document type".to_string()
            }
            ParseErrorKind::MissingRootObject => "missing root object".to_string(),
            ParseErrorKind::TrailingInput { found } => {
                format!("expected end of input, got \"{}\"", found)
            }
            ParseErrorKind::MissingAttribute { object, attribute } => {
                format!("object '{}' requires attribute '{}'", object, attribute)
            }
        }
    }
}

/// A parse error with source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// The offending token, or an empty span at the end of input.
    pub span: Span,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// 1-based line and column of the error in `source`.
    pub fn location(&self, source: &str) -> (usize, usize) {
        self.span.line_col(source)
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at offset {}", self.kind.message(), self.span.start)
    }
}

impl std::error::Error for ParseError {}

impl From<TokenizeError> for ParseError {
    fn from(err: TokenizeError) -> Self {
        let kind = match err.kind {
            TokenizeErrorKind::UnknownCharacter(c) => ParseErrorKind::UnknownCharacter(c),
            TokenizeErrorKind::UnterminatedString => ParseErrorKind::UnterminatedInput,
            TokenizeErrorKind::InputTooLarge => ParseErrorKind::InputTooLarge,
        };
        ParseError::new(kind, err.span)
    }
}
