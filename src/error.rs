use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Diagnostic severity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

/// A structured, non-fatal problem reported while applying a message.
///
/// Diagnostics never stop processing: the offending part of the message is
/// dropped and everything else is applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surface_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub(crate) fn warning(code: &str, message: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Warning,
            code: code.to_string(),
            surface_id: None,
            path: None,
            message: message.into(),
        }
    }

    pub(crate) fn error(code: &str, message: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Error,
            ..Self::warning(code, message)
        }
    }

    pub(crate) fn on_surface(mut self, surface_id: &str) -> Self {
        self.surface_id = Some(surface_id.to_string());
        self
    }

    pub(crate) fn at_path(mut self, path: &str) -> Self {
        self.path = Some(path.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)?;
        if let Some(surface) = &self.surface_id {
            write!(f, " [{}]", surface)?;
        }
        if let Some(path) = &self.path {
            write!(f, " at {}", path)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Produced by a data-model write that cannot be applied.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DataModelError {
    #[error("path has no segments")]
    EmptyPath,

    #[error("cannot descend into {found} at '{path}': expected {expected}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("segment '{segment}' at '{path}' is not a sequence index")]
    NotAnIndex { path: String, segment: String },

    #[error("index {index} at '{path}' exceeds the write limit of {limit}")]
    IndexTooLarge {
        path: String,
        index: usize,
        limit: usize,
    },
}

/// Produced when inbound text cannot be decoded into protocol messages.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("empty input")]
    Empty,

    #[error("invalid message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Produced when a configuration file cannot be read or decoded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Yaml(String),
}

/// Serialization error.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SerializeError {
    pub message: String,
}
