//! Miette-based diagnostics for configuration errors.
//!
//! A TOML parse failure is rendered with the offending file content and a
//! labeled span instead of the bare error string.

use std::path::Path;

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::error::{self, Error};

/// Configuration error with source location context.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(arbscout::config))]
pub struct ConfigDiagnostic {
    pub message: String,

    #[source_code]
    pub src: String,

    #[label("here")]
    pub span: SourceSpan,

    #[help]
    pub help: Option<String>,
}

impl ConfigDiagnostic {
    #[must_use]
    pub fn new(
        message: impl Into<String>,
        src: impl Into<String>,
        offset: usize,
        len: usize,
    ) -> Self {
        Self {
            message: message.into(),
            src: src.into(),
            span: (offset, len).into(),
            help: None,
        }
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Build a diagnostic from a TOML parse error, if it carries a span.
    #[must_use]
    pub fn from_parse(src: &str, parse: &toml::de::Error) -> Option<Self> {
        let span = parse.span()?;
        let len = span.end.saturating_sub(span.start).max(1);
        Some(
            Self::new(parse.message().trim(), src, span.start, len)
                .with_help("see config.toml.example for every key and its default"),
        )
    }
}

/// Print a source-annotated report for config parse failures.
///
/// Returns whether a report was printed; other errors are left to the caller.
pub fn report_config_error(path: &Path, err: &Error) -> bool {
    let Error::Config(error::ConfigError::Parse(parse)) = err else {
        return false;
    };
    let Ok(src) = std::fs::read_to_string(path) else {
        return false;
    };
    match ConfigDiagnostic::from_parse(&src, parse) {
        Some(diagnostic) => {
            eprintln!("{:?}", miette::Report::new(diagnostic));
            true
        }
        None => false,
    }
}
