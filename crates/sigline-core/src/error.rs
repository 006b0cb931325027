//! Errors a stage may hit while handling a single item
//!
//! Stages never hand these to the executor. They log them and drop the
//! item (or stop emitting, for a closed conduit).

/// Error from handling one item inside a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    /// The stage received a value variant it does not process
    UnexpectedValue {
        expected: &'static str,
        found: &'static str,
    },
    /// The downstream conduit has no reader left
    ConduitClosed,
}

impl std::fmt::Display for StageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedValue { expected, found } => {
                write!(f, "expected {expected} value, got {found}")
            }
            Self::ConduitClosed => write!(f, "output conduit closed"),
        }
    }
}

impl std::error::Error for StageError {}
