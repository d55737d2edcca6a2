#![doc = include_str!("../README.md")]

use std::fmt::Write as _;
use std::io;

use clap::{ArgAction, Parser, Subcommand};
use sof_parse::{Document, LoadError, Object, ParseError};
use tracing::{Level, debug};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Exit codes
// ============================================================================

const EXIT_SUCCESS: i32 = 0;
const EXIT_SYNTAX_ERROR: i32 = 1;
const EXIT_IO_ERROR: i32 = 3;

// ============================================================================
// CLI argument structures
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "sof", version, about = "Inspect session object format files")]
struct Args {
    /// Log parser activity to stderr (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse the file and report the first error, if any
    Check {
        /// Input file (or "-" for stdin)
        file: String,
    },

    /// Show the object tree
    Tree {
        /// Input file (or "-" for stdin)
        file: String,
    },

    /// Convert the document to JSON on stdout
    Json {
        /// Input file (or "-" for stdin)
        file: String,

        /// Indent the output
        #[arg(long)]
        pretty: bool,
    },

    /// Show the token stream
    Tokens {
        /// Input file (or "-" for stdin)
        file: String,
    },
}

// ============================================================================
// Main entry point
// ============================================================================

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args.command) {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(e) => {
            match &e {
                CliError::Parse {
                    error,
                    source,
                    filename,
                } => error.write_report(filename, source, io::stderr()),
                CliError::Load(_) | CliError::Io(_) => eprintln!("error: {e}"),
            }
            std::process::exit(e.exit_code());
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(io::stderr)
        .init();
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Check { file } => {
            load(&file)?;
        }
        Command::Tree { file } => {
            let doc = load(&file)?;
            print!("{}", format_tree(&doc));
        }
        Command::Json { file, pretty } => {
            let doc = load(&file)?;
            let json = document_to_json(&doc);
            let output = if pretty {
                serde_json::to_string_pretty(&json)
            } else {
                serde_json::to_string(&json)
            }
            .map_err(|e| CliError::Io(io::Error::other(e)))?;
            println!("{output}");
        }
        Command::Tokens { file } => {
            let (source, filename) = read_input(&file)?;
            let tokens = sof_tokenizer::tokenize(&source).map_err(|e| CliError::Parse {
                error: e.into(),
                source: source.clone(),
                filename,
            })?;
            print!("{}", format_tokens(&tokens));
        }
    }
    Ok(())
}

// ============================================================================
// Error handling
// ============================================================================

#[derive(Debug)]
enum CliError {
    /// Reading the input failed.
    Load(LoadError),
    /// Writing the output failed.
    Io(io::Error),
    Parse {
        error: ParseError,
        source: String,
        filename: String,
    },
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Load(LoadError::Io { .. }) | CliError::Io(_) => EXIT_IO_ERROR,
            CliError::Load(LoadError::Parse(_)) | CliError::Parse { .. } => EXIT_SYNTAX_ERROR,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Load(e) => write!(f, "{e}"),
            CliError::Io(e) => write!(f, "{e}"),
            CliError::Parse { error, filename, .. } => write!(f, "{filename}: {error}"),
        }
    }
}

impl From<LoadError> for CliError {
    fn from(e: LoadError) -> Self {
        CliError::Load(e)
    }
}

// ============================================================================
// Input
// ============================================================================

/// Read a file, or stdin for "-". Returns the text and a display name.
///
/// The text is kept so parse errors can be rendered against it.
fn read_input(file: &str) -> Result<(String, String), CliError> {
    if file == "-" {
        let source = sof_parse::read_stream(io::stdin().lock())?;
        Ok((source, "<stdin>".to_string()))
    } else {
        let source = sof_parse::read_file(file)?;
        Ok((source, file.to_string()))
    }
}

fn load(file: &str) -> Result<Document, CliError> {
    let (source, filename) = read_input(file)?;
    debug!("Parsing {} ({} bytes)", filename, source.len());
    sof_parse::parse(&source).map_err(|error| CliError::Parse {
        error,
        source,
        filename,
    })
}

// ============================================================================
// Output
// ============================================================================

/// The document written back out: one object per line, one space of
/// indentation per level, attributes sorted by name.
fn format_tree(doc: &Document) -> String {
    fn walk(object: &Object, depth: usize, out: &mut String) {
        let _ = write!(out, "{}{}", " ".repeat(depth), object.name());
        for (name, value) in object.attributes() {
            let _ = write!(out, " {}=\"{}\"", name, escape(value));
        }
        out.push('\n');
        for child in object.children() {
            walk(child, depth + 1, out);
        }
    }

    let mut out = format!("!{}\n", doc.doc_type());
    walk(doc.root(), 0, &mut out);
    out
}

fn escape(value: &str) -> String {
    value
        .replace('\t', "\\t")
        .replace('\n', "\\n")
        .replace('"', "\\\"")
}

fn document_to_json(doc: &Document) -> serde_json::Value {
    serde_json::json!({
        "type": doc.doc_type(),
        "root": object_to_json(doc.root()),
    })
}

fn object_to_json(object: &Object) -> serde_json::Value {
    let attributes: serde_json::Map<String, serde_json::Value> = object
        .attributes()
        .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
        .collect();
    let children: Vec<_> = object.children().iter().map(object_to_json).collect();

    serde_json::json!({
        "name": object.name(),
        "attributes": attributes,
        "children": children,
    })
}

fn format_tokens(tokens: &[sof_tokenizer::Token<'_>]) -> String {
    let mut out = String::new();
    for token in tokens {
        let _ = writeln!(
            out,
            "{:<10} {:<11} {:?}",
            format!("{}..{}", token.span.start, token.span.end),
            token.kind.name(),
            token.text
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "!session
room
 user id=\"1\" name=\"Alice\"
 chat
  user_message user=\"1\" text=\"say \\\"hi\\\"\"
";

    #[test]
    fn test_tree_output() {
        let doc = sof_parse::parse(SOURCE).unwrap();
        insta::assert_snapshot!(format_tree(&doc), @r#"
        !session
        room
         user id="1" name="Alice"
         chat
          user_message text="say \"hi\"" user="1"
        "#);
    }

    #[test]
    fn test_tree_output_parses_back() {
        let source = "!session\nroom\n user id=\"1\"\n chat\n  m text=\"x\ty\"\n   deeper\n document";
        let doc = sof_parse::parse(source).unwrap();
        let output = format_tree(&doc);
        let reparsed = sof_parse::parse(&output).unwrap();
        assert_eq!(document_to_json(&reparsed), document_to_json(&doc));
        assert_eq!(format_tree(&reparsed), output);
    }

    #[test]
    fn test_json_output() {
        let doc = sof_parse::parse(SOURCE).unwrap();
        let json = document_to_json(&doc);
        assert_eq!(json["type"], "session");
        assert_eq!(json["root"]["name"], "room");
        assert_eq!(json["root"]["children"][0]["attributes"]["name"], "Alice");
        assert_eq!(
            json["root"]["children"][1]["children"][0]["attributes"]["text"],
            "say \"hi\""
        );
        assert_eq!(
            json["root"]["children"][0]["children"],
            serde_json::json!([])
        );
    }

    #[test]
    fn test_token_output() {
        let tokens = sof_tokenizer::tokenize("!s\nr a=\"b\"").unwrap();
        insta::assert_snapshot!(format_tokens(&tokens), @r#"
        0..1       '!'         "!"
        1..2       identifier  "s"
        3..3       indentation ""
        3..4       identifier  "r"
        5..6       identifier  "a"
        6..7       '='         "="
        7..10      string      "b"
        "#);
    }

    #[test]
    fn test_exit_codes() {
        let err = CliError::Io(io::Error::other("boom"));
        assert_eq!(err.exit_code(), EXIT_IO_ERROR);

        let err = CliError::from(sof_parse::read_file("/nonexistent/a.obby").unwrap_err());
        assert_eq!(err.exit_code(), EXIT_IO_ERROR);

        let err = CliError::Parse {
            error: sof_parse::parse("").unwrap_err(),
            source: String::new(),
            filename: "empty.obby".into(),
        };
        assert_eq!(err.exit_code(), EXIT_SYNTAX_ERROR);
        assert_eq!(
            err.to_string(),
            "empty.obby: expected '!' at beginning of file at offset 0"
        );
    }

    #[test]
    fn test_missing_file() {
        let err = read_input("/nonexistent/session.obby").unwrap_err();
        assert!(matches!(err, CliError::Load(LoadError::Io { .. })));
        assert!(
            err.to_string()
                .starts_with("could not open file '/nonexistent/session.obby' for reading")
        );
    }

    #[test]
    fn test_cli_arguments() {
        let args = Args::try_parse_from(["sof", "-vv", "json", "--pretty", "a.obby"]).unwrap();
        assert_eq!(args.verbose, 2);
        assert!(matches!(
            args.command,
            Command::Json { ref file, pretty: true } if file == "a.obby"
        ));
    }
}
