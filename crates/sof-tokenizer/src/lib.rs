#![doc = include_str!("../README.md")]

mod span;
pub use span::Span;

mod token;
pub use token::{Token, TokenKind};

mod error;
pub use error::{TokenizeError, TokenizeErrorKind};

mod tokenizer;
pub use tokenizer::{Tokenizer, tokenize};
