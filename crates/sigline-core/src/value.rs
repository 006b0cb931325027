//! Values carried between pipeline stages

use std::fmt;

use crate::error::StageError;

/// A single item flowing through a conduit.
///
/// The stage sequence is fixed when a pipeline is built, so the set of
/// item kinds is closed: integers enter the pipeline, strings leave it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Text(String),
}

impl Value {
    /// Short name of the variant, used in logs and errors
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Text(_) => "text",
        }
    }

    pub fn into_int(self) -> Result<i64, StageError> {
        match self {
            Self::Int(v) => Ok(v),
            other => Err(StageError::UnexpectedValue {
                expected: "int",
                found: other.kind(),
            }),
        }
    }

    pub fn into_text(self) -> Result<String, StageError> {
        match self {
            Self::Text(s) => Ok(s),
            other => Err(StageError::UnexpectedValue {
                expected: "text",
                found: other.kind(),
            }),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}
