//! Diagnostic rendering for parse errors.

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::{ParseError, ParseErrorKind};

impl ParseError {
    /// Render this error with ariadne.
    ///
    /// Returns a string containing the formatted error message with source context.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| format!("{}", self))
    }

    /// Write the error report to a writer.
    pub fn write_report<W: std::io::Write>(&self, filename: &str, source: &str, writer: W) {
        let report = self.build_report(filename);
        let _ = report
            .finish()
            .write((filename, Source::from(source)), writer);
    }

    fn build_report<'a>(
        &self,
        filename: &'a str,
    ) -> ariadne::ReportBuilder<'static, (&'a str, std::ops::Range<usize>)> {
        let range: std::ops::Range<usize> = self.span.into();

        let mut report = Report::build(ReportKind::Error, (filename, range.clone()))
            .with_message(self.kind.message())
            .with_label(
                Label::new((filename, range))
                    .with_message(self.label())
                    .with_color(Color::Red),
            );
        if let Some(help) = self.help() {
            report = report.with_help(help);
        }
        report
    }

    fn label(&self) -> &'static str {
        match &self.kind {
            ParseErrorKind::UnknownCharacter(_) => "not allowed here",
            ParseErrorKind::UnterminatedInput => "input ends here",
            ParseErrorKind::ExpectedAssignment { .. } => "expected '=' here",
            ParseErrorKind::ExpectedStringValue { .. } => "expected a quoted string here",
            ParseErrorKind::ExpectedChildObject { .. } => "unexpected",
            ParseErrorKind::BadIndentationStep { .. } => "wrong indentation",
            ParseErrorKind::NestingTooDeep { .. } => "nested too deeply",
            ParseErrorKind::InputTooLarge => "input starts here",
            ParseErrorKind::ExpectedMarker => "expected '!' here",
            ParseErrorKind::ExpectedTypeIdentifier => "expected a document type here",
            ParseErrorKind::ExpectedNewlineAfterType => "expected a line break here",
            ParseErrorKind::ExpectedTopLevelObject => "root object must not be indented",
            ParseErrorKind::MissingRootObject => "expected the root object's name here",
            ParseErrorKind::TrailingInput { .. } => "unexpected content here",
            ParseErrorKind::MissingAttribute { .. } => "object defined here",
        }
    }

    fn help(&self) -> Option<String> {
        match &self.kind {
            ParseErrorKind::UnknownCharacter(_) => Some(
                "names are made of letters, digits and '_'; other text must be quoted".into(),
            ),
            ParseErrorKind::UnterminatedInput => {
                Some("check for an unclosed '\"' or an incomplete attribute".into())
            }
            ParseErrorKind::ExpectedStringValue { attribute } => {
                Some(format!("attribute values are quoted: {}=\"...\"", attribute))
            }
            ParseErrorKind::BadIndentationStep { parent, .. } => Some(format!(
                "indent child objects by exactly one space more than their parent (expected indentation {})",
                parent + 1
            )),
            ParseErrorKind::NestingTooDeep { limit } => Some(format!(
                "child objects may be indented at most {} spaces",
                limit
            )),
            ParseErrorKind::ExpectedMarker => {
                Some("documents start with '!' followed by their type, e.g. '!session'".into())
            }
            ParseErrorKind::TrailingInput { .. } => {
                Some("a document has exactly one root object; indent this line under it".into())
            }
            _ => None,
        }
    }
}
