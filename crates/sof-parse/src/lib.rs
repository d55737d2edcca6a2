#![doc = include_str!("../README.md")]

mod cursor;
pub use cursor::Cursor;

mod error;
pub use error::{ParseError, ParseErrorKind};

mod diagnostic;

mod object;
pub use object::{MAX_DEPTH, Object};

mod document;
pub use document::{Document, LoadError, parse, read_file, read_stream};

pub use sof_tokenizer::{Span, Token, TokenKind, tokenize};
