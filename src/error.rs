//! Error types for grammar validation, expansion and interpretation.

use std::fmt;

/// Which way the turtle's push/pop stack was misused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackFault {
    /// `]` with no matching `[`.
    Underflow,
    /// Nesting deeper than [`InterpreterConfig`](crate::InterpreterConfig) allows.
    Overflow,
}

impl fmt::Display for StackFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Underflow => f.write_str("pop on empty stack"),
            Self::Overflow => f.write_str("stack depth limit exceeded"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LsysError {
    /// A grammar or configuration field was rejected before any work began.
    #[error("invalid {field}: {reason}")]
    Configuration { field: String, reason: String },

    /// The turtle's branch stack was misused at symbol `offset`.
    #[error("malformed path at symbol {offset}: {fault}")]
    MalformedPath { offset: usize, fault: StackFault },

    /// Expansion would produce more symbols than allowed.
    #[error("expansion of {projected} symbols exceeds limit of {limit}")]
    ResourceLimit { projected: u64, limit: u64 },

    #[error("grammar parse error: {0}")]
    Parse(String),
}

impl LsysError {
    pub fn configuration(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Configuration {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for LsysError {
    fn from(e: serde_json::Error) -> Self {
        LsysError::Parse(e.to_string())
    }
}

/// An [`LsysError`] tagged with the figure it came from.
///
/// `generation` is `None` when the failure happened before a specific
/// generation was picked (grammar validation, layout).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{title}{}: {source}", generation_suffix(.generation))]
pub struct FigureError {
    pub title: String,
    pub generation: Option<u32>,
    #[source]
    pub source: LsysError,
}

fn generation_suffix(generation: &Option<u32>) -> String {
    generation
        .map(|g| format!(" (generation {g})"))
        .unwrap_or_default()
}

impl FigureError {
    pub fn new(title: impl Into<String>, generation: Option<u32>, source: LsysError) -> Self {
        Self {
            title: title.into(),
            generation,
            source,
        }
    }
}
