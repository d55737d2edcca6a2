//! Objects and the recursive-descent tree builder.

use std::collections::BTreeMap;

use sof_tokenizer::{Span, TokenKind};
use tracing::trace;

use crate::{Cursor, ParseError, ParseErrorKind};

/// Deepest indentation a child object may have. Each level is one stack
/// frame of [`Object::parse`].
pub const MAX_DEPTH: usize = 256;

/// A named node with string attributes and ordered children.
///
/// An object's indentation is not stored; it is the depth the parser was at
/// when it built the object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    name: String,
    attributes: BTreeMap<String, String>,
    children: Vec<Object>,
    /// From the object's name to the end of its last attribute.
    span: Span,
}

impl Object {
    /// Build an object from the tokens at `cursor`, including all of its
    /// descendants.
    ///
    /// The caller must have checked that the current token is an identifier
    /// (the object's name). `indentation` is the depth of the line that
    /// introduced the object; children must sit at exactly
    /// `indentation + 1`. On success the cursor is left on the first token
    /// that belongs to an ancestor (an indentation of at most `indentation`),
    /// or exhausted.
    ///
    /// Children deeper than [`MAX_DEPTH`] fail with
    /// [`ParseErrorKind::NestingTooDeep`] instead of recursing further.
    pub fn parse(cursor: &mut Cursor<'_, '_>, indentation: usize) -> Result<Object, ParseError> {
        let name_token = cursor.current()?;
        let Some(name) = name_token.as_identifier() else {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedChildObject {
                    found: name_token.describe(),
                },
                name_token.span,
            ));
        };
        trace!("Object {:?} at indentation {}", name, indentation);

        let mut object = Object {
            name: name.to_string(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            span: name_token.span,
        };
        cursor.advance();

        while cursor.check(TokenKind::Identifier) {
            object.parse_attribute(cursor)?;
        }

        while let Some(token) = cursor.peek() {
            let Some(depth) = token.indentation() else {
                return Err(ParseError::new(
                    ParseErrorKind::ExpectedChildObject {
                        found: token.describe(),
                    },
                    token.span,
                ));
            };

            // Belongs to an ancestor; let it handle the line.
            if depth <= indentation {
                break;
            }

            if depth != indentation + 1 {
                return Err(ParseError::new(
                    ParseErrorKind::BadIndentationStep {
                        parent: indentation,
                        found: depth,
                    },
                    token.span,
                ));
            }

            if depth > MAX_DEPTH {
                return Err(ParseError::new(
                    ParseErrorKind::NestingTooDeep { limit: MAX_DEPTH },
                    token.span,
                ));
            }

            cursor.advance_or_fail()?;
            let next = cursor.current()?;
            if next.kind != TokenKind::Identifier {
                return Err(ParseError::new(
                    ParseErrorKind::ExpectedChildObject {
                        found: next.describe(),
                    },
                    next.span,
                ));
            }

            let child = Object::parse(cursor, depth)?;
            object.children.push(child);
        }

        Ok(object)
    }

    /// `name = "value"`. Starts on the name; leaves the cursor after the
    /// value. A repeated name overwrites the earlier value.
    fn parse_attribute(&mut self, cursor: &mut Cursor<'_, '_>) -> Result<(), ParseError> {
        let attribute = cursor.current()?.text.to_string();
        trace!("Attribute {:?} on {:?}", attribute, self.name);

        cursor.advance_or_fail()?;
        let assignment = cursor.current()?;
        if assignment.kind != TokenKind::Assignment {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedAssignment { attribute },
                assignment.span,
            ));
        }

        cursor.advance_or_fail()?;
        let value = cursor.current()?;
        let Some(text) = value.as_string() else {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedStringValue { attribute },
                value.span,
            ));
        };

        self.attributes.insert(attribute, text.to_string());
        self.span = Span::new(self.span.start, value.span.end);
        cursor.advance();
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Look up an attribute value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Look up an attribute that the caller's vocabulary requires.
    ///
    /// Fails with [`ParseErrorKind::MissingAttribute`] pointing at the object.
    pub fn required_attribute(&self, name: &str) -> Result<&str, ParseError> {
        self.attribute(name).ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::MissingAttribute {
                    object: self.name.clone(),
                    attribute: name.to_string(),
                },
                self.span,
            )
        })
    }

    /// Attributes as `(name, value)` pairs, sorted by name.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Child objects in document order.
    pub fn children(&self) -> &[Object] {
        &self.children
    }

    /// The first child with the given name.
    pub fn child(&self, name: &str) -> Option<&Object> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All children with the given name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Object> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
