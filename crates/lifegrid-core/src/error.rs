//! Error types for the lifegrid engine, organised by subsystem: rule
//! execution, rulestring parsing, and the coordinator itself.

use std::fmt;

use thiserror::Error;

/// Which rule namespace a failing rule belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Invoked once per changed cell.
    Transition,
    /// Invoked once per generation.
    Step,
    /// Invoked per cell at render time.
    Color,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transition => write!(f, "transition"),
            Self::Step => write!(f, "step"),
            Self::Color => write!(f, "color"),
        }
    }
}

/// Errors returned by user-supplied rule functions.
///
/// Wrapped in [`EngineError::RuleFailed`] by the coordinator, which adds
/// the rule's name and namespace.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum RuleError {
    /// The rule body failed.
    #[error("execution failed: {reason}")]
    ExecutionFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// The rule produced a value it must not write (e.g. NaN).
    #[error("invalid value {value} written to channel '{channel}' at cell {cell_index}")]
    InvalidValue {
        /// Channel that received the value.
        channel: String,
        /// Cell index written.
        cell_index: usize,
        /// The offending value.
        value: f32,
    },
    /// The rule expected a channel that is not registered.
    #[error("channel '{name}' is not registered")]
    MissingChannel {
        /// Name of the missing channel.
        name: String,
    },
}

impl RuleError {
    /// Shorthand for [`RuleError::ExecutionFailed`].
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            reason: reason.into(),
        }
    }
}

/// Errors from parsing a `B…/S…` rulestring.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LifeRuleParseError {
    /// Input is not of the form `B<digits>/S<digits>`.
    #[error("malformed rulestring '{input}', expected B<digits>/S<digits>")]
    Malformed {
        /// The rejected input.
        input: String,
    },
    /// A neighbour count outside `0..=8` or a non-digit.
    #[error("invalid neighbour count '{found}'")]
    InvalidCount {
        /// The offending character.
        found: char,
    },
    /// The same section appeared twice.
    #[error("section '{section}' appears more than once")]
    Duplicate {
        /// `'B'` or `'S'`.
        section: char,
    },
}

/// Errors surfaced by the coordinator to its caller.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A user-supplied rule failed. The generation computed by the
    /// stepper has already been committed; channels touched by the
    /// failing rule may be partially updated.
    #[error("{kind} rule '{name}' failed: {source}")]
    RuleFailed {
        /// Namespace of the failing rule.
        kind: RuleKind,
        /// Name the rule was registered under.
        name: String,
        /// The underlying rule error.
        #[source]
        source: RuleError,
    },
    /// The computation context is gone; no further steps can run.
    #[error("computation unavailable: {reason}")]
    ComputationUnavailable {
        /// What was observed when the loss was detected.
        reason: String,
    },
    /// Requested dimensions or state length cannot be represented.
    #[error("invalid dimensions {cols}x{rows}")]
    InvalidDimensions {
        /// Requested columns.
        cols: usize,
        /// Requested rows.
        rows: usize,
    },
    /// The engine is shutting down.
    #[error("engine is shutting down")]
    ShuttingDown,
}

impl EngineError {
    /// Whether this error leaves the engine unusable for further steps.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ComputationUnavailable { .. } | Self::ShuttingDown)
    }
}
