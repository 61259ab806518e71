//! Error values returned by lattice, configuration and controller APIs.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Code, message and site/parameter context carried by a [`LatgasError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Kebab-case code such as `site-out-of-bounds`; hosts match on this.
    pub code: String,
    /// Message for logs and UIs.
    pub message: String,
    /// Offending values keyed by name, e.g. `row` and `width` for a bad site.
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Suggested fix, e.g. the valid range for a parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Payload with no context or hint.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Records an offending value under `key`.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Attaches a suggested fix.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Error returned by every fallible latgas operation, grouped by family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum LatgasError {
    /// A coordinate fell outside the lattice.
    #[error("out of bounds: {0}")]
    OutOfBounds(ErrorInfo),
    /// Invalid simulation parameters, rejected at the configuration boundary.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Operation not valid in the current run state or lattice configuration.
    #[error("state error: {0}")]
    State(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            let pairs: Vec<String> = self
                .context
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect();
            write!(f, " | context: [{}]", pairs.join(", "))?;
        }
        match &self.hint {
            Some(hint) => write!(f, " | hint: {hint}"),
            None => Ok(()),
        }
    }
}

impl LatgasError {
    /// Payload shared by every family.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            LatgasError::OutOfBounds(info)
            | LatgasError::Config(info)
            | LatgasError::State(info) => info,
        }
    }

    /// The payload's `code`.
    pub fn code(&self) -> &str {
        &self.info().code
    }
}
