//! Engine configuration, validation, and error types.
//!
//! [`EngineConfig`] is the builder-input for constructing a
//! [`Coordinator`](crate::Coordinator). [`validate()`](EngineConfig::validate)
//! checks structural invariants before any thread is spawned.

use lifegrid_core::{Dims, LifeRule, Topology};
use thiserror::Error;

// ── ExecutionMode ──────────────────────────────────────────────────

/// Where the stepper runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    /// A dedicated worker thread owns the stepper; all traffic is
    /// message passing over channels.
    #[default]
    Threaded,
    /// The stepper runs on the caller's thread inside `send`, with
    /// responses queued until the next pump.
    Inline,
}

// ── PlaybackConfig ─────────────────────────────────────────────────

/// Timer-loop settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaybackConfig {
    /// Initial interval between playback steps, in milliseconds.
    /// Zero steps as fast as results arrive. Default: 100.
    pub interval_ms: u64,
    /// How long [`run_for`](crate::Coordinator::run_for) parks the thread
    /// when there is nothing to do. Default: 1.
    pub idle_sleep_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            interval_ms: 100,
            idle_sleep_ms: 1,
        }
    }
}

// ── EngineConfig ───────────────────────────────────────────────────

/// Construction parameters for a [`Coordinator`](crate::Coordinator).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Grid width. Default: 64.
    pub cols: usize,
    /// Grid height. Default: 64.
    pub rows: usize,
    /// Initial topology. Default: bounded.
    pub topology: Topology,
    /// Birth/survival rule. Default: B3/S23.
    pub life_rule: LifeRule,
    /// Threaded or inline stepping. Default: threaded.
    pub execution: ExecutionMode,
    /// Seed for `randomize`. Default: 0.
    pub seed: u64,
    /// Playback timing.
    pub playback: PlaybackConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cols: 64,
            rows: 64,
            topology: Topology::Bounded,
            life_rule: LifeRule::CONWAY,
            execution: ExecutionMode::Threaded,
            seed: 0,
            playback: PlaybackConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Grid dimensions.
    pub fn dims(&self) -> Dims {
        Dims::new(self.cols, self.rows)
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dims().checked_cell_count().is_none() {
            return Err(ConfigError::CellCountOverflow {
                cols: self.cols,
                rows: self.rows,
            });
        }
        if self.playback.idle_sleep_ms == 0 {
            return Err(ConfigError::InvalidIdleSleep);
        }
        Ok(())
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while building a coordinator.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `cols * rows` exceeds `u32::MAX`.
    #[error("grid {cols}x{rows} exceeds the maximum cell count")]
    CellCountOverflow {
        /// Requested columns.
        cols: usize,
        /// Requested rows.
        rows: usize,
    },
    /// `idle_sleep_ms` is zero, which would busy-spin `run_for`.
    #[error("idle_sleep_ms must be at least 1")]
    InvalidIdleSleep,
    /// The worker thread could not be spawned.
    #[error("failed to spawn worker thread: {reason}")]
    ThreadSpawnFailed {
        /// OS error description.
        reason: String,
    },
}
