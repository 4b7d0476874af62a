//! Errors raised while reading, validating, or writing documents.
use std::path::PathBuf;

use thiserror::Error;

use crate::literal::Literal;

pub type Result<T> = std::result::Result<T, CnfError>;

/// Every failure surfaced by the readers and writers. Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum CnfError {
    /// A source or destination could not be opened.
    #[error("could not open '{}': {source}", .path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading from or writing to an already opened stream failed.
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    MalformedHeader { line: usize, message: String },

    #[error("line {line}: {message}")]
    MalformedClause { line: usize, message: String },

    #[error("line {line}: got {actual} clauses, expected {expected}")]
    CountMismatch {
        line: usize,
        actual: usize,
        expected: usize,
    },

    /// A directive or a builder call referenced something it must not.
    #[error("{}{message}", .line.map(|line| format!("line {line}: ")).unwrap_or_default())]
    Validation {
        line: Option<usize>,
        message: String,
    },

    /// Tautologous clause found while tautologies were being rejected.
    #[error("tautologous clause #{index}: [{}]", crate::literal::join(.literals))]
    Tautology { index: usize, literals: Vec<Literal> },
}

impl CnfError {
    pub(crate) fn resource(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CnfError::Resource {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn header(line: usize, message: impl Into<String>) -> Self {
        CnfError::MalformedHeader {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn clause(line: usize, message: impl Into<String>) -> Self {
        CnfError::MalformedClause {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn validation(line: Option<usize>, message: impl Into<String>) -> Self {
        CnfError::Validation {
            line,
            message: message.into(),
        }
    }

    /// Line the error refers to, if any.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            CnfError::MalformedHeader { line, .. }
            | CnfError::MalformedClause { line, .. }
            | CnfError::CountMismatch { line, .. } => Some(*line),
            CnfError::Validation { line, .. } => *line,
            CnfError::Resource { .. } | CnfError::Io(_) | CnfError::Tautology { .. } => None,
        }
    }
}
