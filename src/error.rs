//! Error types for parsing, element lookup and formatting

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Parse error at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },
}

impl ParseError {
    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        match self {
            ParseError::Syntax {
                span,
                message,
                expected,
            } => {
                let expected_str = if expected.is_empty() {
                    String::new()
                } else {
                    format!("\nExpected: {}", expected.join(", "))
                };

                let written = Report::build(ReportKind::Error, filename, span.start)
                    .with_message(message)
                    .with_label(
                        Label::new((filename, span.clone()))
                            .with_message(format!("{}{}", message, expected_str))
                            .with_color(Color::Red),
                    )
                    .finish()
                    .write((filename, Source::from(source)), &mut buf);
                if written.is_err() {
                    return self.to_string();
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl<'a> From<chumsky::error::Rich<'a, crate::markup::lexer::Token>> for ParseError {
    fn from(err: chumsky::error::Rich<'a, crate::markup::lexer::Token>) -> Self {
        use chumsky::error::RichReason;

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => {
                let found_str = match found {
                    Some(tok) => format_token(tok),
                    None => "end of input".to_string(),
                };
                format!("Unexpected {}", found_str)
            }
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                chumsky::error::RichPattern::Token(tok) => Some(format_token(tok)),
                chumsky::error::RichPattern::Label(label) => Some(label.to_string()),
                chumsky::error::RichPattern::EndOfInput => Some("end of input".to_string()),
                chumsky::error::RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
                chumsky::error::RichPattern::Any => Some("any token".to_string()),
                chumsky::error::RichPattern::SomethingElse => None,
            })
            .collect();

        ParseError::Syntax {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &crate::markup::lexer::Token) -> String {
    use crate::markup::lexer::Token;
    match tok {
        Token::OpenTag(head) => format!("opening tag <{}>", head.name),
        Token::CloseTag(name) => format!("closing tag </{}>", name),
        Token::Text(_) => "text".to_string(),
        Token::Lt => "'<'".to_string(),
        Token::Raw(_) => "comment".to_string(),
    }
}

/// Failure of the element lookup mechanism itself
///
/// Distinct from a lookup that simply finds nothing, which is never an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectorError {
    #[error("class selector is empty")]
    EmptyClassName,

    #[error("invalid class name '{name}' in selector '{selector}'")]
    InvalidClassName { selector: String, name: String },
}

/// Contract violations when formatting an element
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("node {node} is not an element")]
    NotAnElement { node: usize },

    #[error("<{tag}> element does not carry the 'formatted' marker")]
    MissingMarker { tag: String },
}
