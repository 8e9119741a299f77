//! Error types and reporting

use crate::ast::Span;
use crate::interp::RuntimeError;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, SourceError>;

/// Failure to turn source text into a program
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Lexer error at {span}: {message}")]
    Lexer { message: String, span: Span },

    #[error("Parser error at {span}: {message}")]
    Parser { message: String, span: Span },

    /// Input ended inside an open block; more lines may complete it
    #[error("Parser error at {span}: {message}")]
    Incomplete { message: String, span: Span },

    #[error("IO error: {message}")]
    Io { message: String },
}

impl SourceError {
    pub fn lexer(message: impl Into<String>, span: Span) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
        }
    }

    pub fn parser(message: impl Into<String>, span: Span) -> Self {
        Self::Parser {
            message: message.into(),
            span,
        }
    }

    pub fn incomplete(message: impl Into<String>, span: Span) -> Self {
        Self::Incomplete {
            message: message.into(),
            span,
        }
    }

    pub fn io_error(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Lexer { span, .. }
            | Self::Parser { span, .. }
            | Self::Incomplete { span, .. } => Some(*span),
            Self::Io { .. } => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Lexer { message, .. }
            | Self::Parser { message, .. }
            | Self::Incomplete { message, .. }
            | Self::Io { message } => message,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Lexer { .. } => "Lexer",
            Self::Parser { .. } | Self::Incomplete { .. } => "Parser",
            Self::Io { .. } => "IO",
        }
    }
}

/// Report a source error with ariadne
pub fn report_error(filename: &str, source: &str, error: &SourceError) {
    emit(
        filename,
        source,
        &format!("{} error", error.kind()),
        error.message(),
        error.span(),
    );
}

/// Report a runtime fault with ariadne, labelled at the faulting statement
pub fn report_runtime_error(filename: &str, source: &str, error: &RuntimeError) {
    emit(
        filename,
        source,
        &format!("Runtime error ({})", error.kind),
        &error.message,
        error.span,
    );
}

fn emit(filename: &str, source: &str, title: &str, message: &str, span: Option<Span>) {
    use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};

    // Spans are byte offsets
    let config = Config::default().with_index_type(IndexType::Byte);
    let result = if let Some(span) = span {
        let range: std::ops::Range<usize> = span.into();
        Report::build(ReportKind::Error, (filename, range.clone()))
            .with_config(config)
            .with_message(title)
            .with_label(
                Label::new((filename, range))
                    .with_message(message)
                    .with_color(Color::Red),
            )
            .finish()
            .eprint((filename, Source::from(source)))
    } else {
        Report::build(ReportKind::Error, (filename, 0..0))
            .with_config(config)
            .with_message(format!("{title}: {message}"))
            .finish()
            .eprint((filename, Source::from(source)))
    };

    if result.is_err() {
        eprintln!("{title}: {message}");
    }
}
