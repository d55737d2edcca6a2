//! Top-level document parsing.

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use sof_tokenizer::{Span, TokenKind, tokenize};
use tracing::debug;

use crate::{Cursor, Object, ParseError, ParseErrorKind};

/// Parse a complete document: `!type`, a line break, and the root object.
pub fn parse(source: &str) -> Result<Document, ParseError> {
    let tokens = tokenize(source)?;
    let mut cursor = Cursor::new(&tokens, source.len());

    match cursor.peek() {
        Some(token) if token.kind == TokenKind::DocumentMarker => {}
        Some(token) => {
            return Err(ParseError::new(ParseErrorKind::ExpectedMarker, token.span));
        }
        None => {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedMarker,
                Span::empty(0),
            ));
        }
    }
    cursor.advance_or_fail()?;

    let type_token = cursor.current()?;
    let Some(doc_type) = type_token.as_identifier() else {
        return Err(ParseError::new(
            ParseErrorKind::ExpectedTypeIdentifier,
            type_token.span,
        ));
    };
    cursor.advance_or_fail()?;

    let newline = cursor.current()?;
    match newline.indentation() {
        Some(0) => {}
        Some(_) => {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedTopLevelObject,
                newline.span,
            ));
        }
        None => {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedNewlineAfterType,
                newline.span,
            ));
        }
    }

    cursor
        .advance_or_fail()
        .map_err(|e| ParseError::new(ParseErrorKind::MissingRootObject, e.span))?;
    let root_token = cursor.current()?;
    if root_token.kind != TokenKind::Identifier {
        return Err(ParseError::new(
            ParseErrorKind::MissingRootObject,
            root_token.span,
        ));
    }

    let root = Object::parse(&mut cursor, 0)?;

    if let Some(token) = cursor.peek() {
        return Err(ParseError::new(
            ParseErrorKind::TrailingInput {
                found: token.describe(),
            },
            token.span,
        ));
    }

    debug!(
        "Parsed {:?} document: root {:?} with {} children",
        doc_type,
        root.name(),
        root.children().len()
    );

    Ok(Document {
        doc_type: doc_type.to_string(),
        root,
    })
}

/// Read the file at `path` as document text.
///
/// Use this with [`parse`] when the text is still needed afterwards, e.g. to
/// render a diagnostic.
pub fn read_file(path: impl AsRef<Path>) -> Result<String, LoadError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: Some(path.to_path_buf()),
        error: e,
    })?;
    debug!("Read {} bytes from {}", source.len(), path.display());
    Ok(source)
}

/// Drain `reader` as document text.
pub fn read_stream<R: Read>(mut reader: R) -> Result<String, LoadError> {
    let mut source = String::new();
    reader
        .read_to_string(&mut source)
        .map_err(|e| LoadError::Io { path: None, error: e })?;
    Ok(source)
}

/// A parsed document: a type tag plus exactly one root object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    doc_type: String,
    root: Object,
}

impl Document {
    /// Parse a document from text.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        parse(source)
    }

    /// Read the whole stream, then parse it.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        Ok(parse(&read_stream(reader)?)?)
    }

    /// Read and parse the file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Ok(parse(&read_file(path)?)?)
    }

    /// The identifier after `!`.
    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }

    pub fn root(&self) -> &Object {
        &self.root
    }

    pub fn into_root(self) -> Object {
        self.root
    }
}

/// Failure to read or parse a document from a file or stream.
#[derive(Debug)]
pub enum LoadError {
    Io {
        /// `None` when reading from a stream.
        path: Option<PathBuf>,
        error: io::Error,
    },
    Parse(ParseError),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io {
                path: Some(path),
                error,
            } => write!(
                f,
                "could not open file '{}' for reading: {}",
                path.display(),
                error
            ),
            LoadError::Io { path: None, error } => write!(f, "could not read input: {}", error),
            LoadError::Parse(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { error, .. } => Some(error),
            LoadError::Parse(e) => Some(e),
        }
    }
}

impl From<ParseError> for LoadError {
    fn from(e: ParseError) -> Self {
        LoadError::Parse(e)
    }
}
