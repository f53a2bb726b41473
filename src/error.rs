//! Error types for the editing surface
//!
//! Engine failures are caught where the engine is called and turned into
//! no-op edits; the surface error wraps them for callers that want detail.

use thiserror::Error;

/// Failure reported by (or while talking to) the notation engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The engine call threw
    #[error("engine call failed: {0}")]
    Call(String),

    /// The engine returned a value that does not have the expected shape
    #[error("unexpected engine result: {0}")]
    UnexpectedShape(String),

    /// The engine does not know the requested line
    #[error("line index {index} out of bounds (document has {count} lines)")]
    LineOutOfRange { index: usize, count: usize },
}

/// Top-level editing surface error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// No line handle exists for the index
    #[error("no line handle for line {index} ({count} lines rendered)")]
    LineOutOfRange { index: usize, count: usize },

    /// A DOM target (container, overlay layer) is absent
    #[error("missing DOM target: {0}")]
    MissingTarget(&'static str),
}

impl SurfaceError {
    /// Errors that are cosmetic and should be swallowed by event handlers
    pub fn is_cosmetic(&self) -> bool {
        matches!(self, SurfaceError::MissingTarget(_))
    }
}
