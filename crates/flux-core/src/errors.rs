//! Structured error types shared across the flux-series crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`SeriesError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Offending values and sizes, keyed by name.
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional remediation hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Records a context entry, rendering the value with `Display`.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Records a shape-like value using its `Debug` rendering.
    pub fn with_shape(mut self, key: impl Into<String>, shape: &[usize]) -> Self {
        self.context.insert(key.into(), format!("{shape:?}"));
        self
    }

    /// Sets a remediation hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.message, self.code)?;
        let mut entries = self.context.iter().peekable();
        if entries.peek().is_some() {
            write!(f, " (")?;
            while let Some((key, value)) = entries.next() {
                write!(f, "{key}={value}")?;
                if entries.peek().is_some() {
                    write!(f, ", ")?;
                }
            }
            write!(f, ")")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, "; hint: {hint}")?;
        }
        Ok(())
    }
}

/// Canonical error type for Fourier series construction and evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum SeriesError {
    /// Coefficient or point arrays with an unusable shape.
    #[error("shape error: {0}")]
    Shape(ErrorInfo),
    /// A series built without any cosine or sine term.
    #[error("empty term error: {0}")]
    EmptyTerm(ErrorInfo),
    /// Inconsistent or invalid numbers of field periods.
    #[error("field period error: {0}")]
    FieldPeriods(ErrorInfo),
    /// Evaluation points outside the radial domain.
    #[error("domain error: {0}")]
    Domain(ErrorInfo),
    /// Invalid tolerances, grid counts or sampling domains.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Encoding and decoding failures.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl SeriesError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            SeriesError::Shape(info)
            | SeriesError::EmptyTerm(info)
            | SeriesError::FieldPeriods(info)
            | SeriesError::Domain(info)
            | SeriesError::Config(info)
            | SeriesError::Serde(info) => info,
        }
    }

    /// Returns the stable error code.
    pub fn code(&self) -> &str {
        &self.info().code
    }

    /// Shorthand for a [`SeriesError::Shape`] with a bare payload.
    pub fn shape(code: &str, message: impl Into<String>) -> Self {
        SeriesError::Shape(ErrorInfo::new(code, message))
    }

    /// Shorthand for a [`SeriesError::Domain`] with a bare payload.
    pub fn domain(code: &str, message: impl Into<String>) -> Self {
        SeriesError::Domain(ErrorInfo::new(code, message))
    }

    /// Shorthand for a [`SeriesError::Config`] with a bare payload.
    pub fn config(code: &str, message: impl Into<String>) -> Self {
        SeriesError::Config(ErrorInfo::new(code, message))
    }
}

/// Result alias used throughout the flux-series crates.
pub type SeriesResult<T> = Result<T, SeriesError>;
