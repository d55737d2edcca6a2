//! Property tests for the object tree parser.

use std::collections::BTreeMap;
use std::fmt::Write;

use proptest::prelude::*;
use sof_parse::{Object, ParseErrorKind, TokenKind, parse, tokenize};

#[derive(Debug, Clone)]
struct Node {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

fn identifier() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,6}"
}

/// Any text without backslashes; `\t`, `\n` and `"` are escaped when written.
fn value() -> impl Strategy<Value = String> {
    r#"[^\\]{0,8}"#
}

fn attributes() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec((identifier(), value()), 0..4)
}

fn node() -> impl Strategy<Value = Node> {
    let leaf = (identifier(), attributes()).prop_map(|(name, attributes)| Node {
        name,
        attributes,
        children: Vec::new(),
    });
    leaf.prop_recursive(4, 48, 5, |inner| {
        (identifier(), attributes(), prop::collection::vec(inner, 0..5)).prop_map(
            |(name, attributes, children)| Node {
                name,
                attributes,
                children,
            },
        )
    })
}

fn escape(value: &str) -> String {
    value
        .replace('\t', "\\t")
        .replace('\n', "\\n")
        .replace('"', "\\\"")
}

fn write_node(node: &Node, depth: usize, out: &mut String) {
    out.push_str(&node.name);
    for (name, value) in &node.attributes {
        write!(out, " {}=\"{}\"", name, escape(value)).unwrap();
    }
    for child in &node.children {
        out.push('\n');
        out.push_str(&" ".repeat(depth + 1));
        write_node(child, depth + 1, out);
    }
}

fn document(doc_type: &str, root: &Node) -> String {
    let mut out = format!("!{}\n", doc_type);
    write_node(root, 0, &mut out);
    out
}

fn assert_same(object: &Object, node: &Node) {
    assert_eq!(object.name(), node.name);

    let expected: BTreeMap<&str, &str> = node
        .attributes
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    let actual: BTreeMap<&str, &str> = object.attributes().collect();
    assert_eq!(actual, expected);

    assert_eq!(object.children().len(), node.children.len());
    for (child, expected) in object.children().iter().zip(&node.children) {
        assert_same(child, expected);
    }
}

proptest! {
    #[test]
    fn valid_documents_parse_to_the_written_tree(doc_type in identifier(), root in node()) {
        let source = document(&doc_type, &root);
        let doc = parse(&source).unwrap();
        prop_assert_eq!(doc.doc_type(), doc_type.as_str());
        assert_same(doc.root(), &root);
    }

    #[test]
    fn children_must_be_exactly_one_deeper(depth in 0usize..6, step in 2usize..12) {
        let mut source = String::from("!t\nn0");
        for d in 1..=depth {
            write!(source, "\n{}n{}", " ".repeat(d), d).unwrap();
        }
        write!(source, "\n{}bad", " ".repeat(depth + step)).unwrap();

        let err = parse(&source).unwrap_err();
        prop_assert_eq!(
            err.kind,
            ParseErrorKind::BadIndentationStep { parent: depth, found: depth + step }
        );
    }

    #[test]
    fn one_step_deeper_is_accepted(depth in 0usize..20) {
        let mut source = String::from("!t\nn0");
        for d in 1..=depth {
            write!(source, "\n{}n{}", " ".repeat(d), d).unwrap();
        }

        let doc = parse(&source).unwrap();
        let mut object = doc.root();
        for d in 1..=depth {
            prop_assert_eq!(object.children().len(), 1);
            object = &object.children()[0];
            prop_assert_eq!(object.name(), format!("n{}", d));
        }
        prop_assert!(object.is_leaf());
    }

    #[test]
    fn siblings_keep_document_order(names in prop::collection::vec(identifier(), 1..20)) {
        let mut source = String::from("!t\nroot");
        for name in &names {
            write!(source, "\n {}\n  nested", name).unwrap();
        }

        let doc = parse(&source).unwrap();
        let actual: Vec<_> = doc.root().children().iter().map(Object::name).collect();
        prop_assert_eq!(actual, names.iter().map(String::as_str).collect::<Vec<_>>());
        for child in doc.root().children() {
            prop_assert_eq!(child.children().len(), 1);
        }
    }

    #[test]
    fn later_attribute_wins(first in value(), second in value()) {
        let source = format!(
            "!t\nroot key=\"{}\" other=\"x\" key=\"{}\"",
            escape(&first),
            escape(&second)
        );
        let doc = parse(&source).unwrap();
        prop_assert_eq!(doc.root().attribute("key"), Some(second.as_str()));
        prop_assert_eq!(doc.root().attribute_count(), 2);
    }

    #[test]
    fn string_literals_unescape_to_their_content(content in value()) {
        let source = format!("\"{}\"", escape(&content));
        let tokens = tokenize(&source).unwrap();
        prop_assert_eq!(tokens.len(), 1);
        prop_assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        prop_assert_eq!(tokens[0].as_string(), Some(content.as_str()));
    }

    #[test]
    fn extra_top_level_line_is_trailing_input(root in node(), extra in identifier()) {
        let source = format!("{}\n{}", document("t", &root), extra);
        let err = parse(&source).unwrap_err();
        let is_trailing = matches!(err.kind, ParseErrorKind::TrailingInput { .. });
        prop_assert!(is_trailing, "got {:?}", err.kind);
    }
}
