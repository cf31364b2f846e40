//! Test utilities for lifegrid development.
//!
//! Pattern fixtures live in [`fixtures`]. This module adds rules that
//! record or fail on demand, engine configs for each execution mode, and
//! helpers that drive a [`Coordinator`] until its outstanding work
//! drains.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use lifegrid_core::{Dims, EngineError, RuleError};
use lifegrid_engine::{Coordinator, EngineConfig, ExecutionMode};
use lifegrid_rules::{step_fn, transition_fn, StepRule, TransitionRule};

pub use fixtures::{
    grid_with, live_set, placed_wrapped, random_state, Pattern, BLINKER, BLOCK, GLIDER,
};

/// Upper bound on how long helpers wait for a threaded worker.
pub const SETTLE_TIMEOUT: Duration = Duration::from_secs(10);

// ── configs ────────────────────────────────────────────────────────

pub fn config(cols: usize, rows: usize, execution: ExecutionMode) -> EngineConfig {
    EngineConfig {
        cols,
        rows,
        execution,
        ..EngineConfig::default()
    }
}

/// Ready coordinator with the given execution mode.
pub fn ready(cols: usize, rows: usize, execution: ExecutionMode) -> Coordinator {
    let mut c = Coordinator::new(config(cols, rows, execution)).expect("valid config");
    settle(&mut c).expect("coordinator did not become ready");
    c
}

/// Place `pattern` at `origin` through `set_cell`.
pub fn place(c: &mut Coordinator, pattern: &Pattern, origin: (usize, usize)) {
    for &(x, y) in pattern {
        c.set_cell(origin.0 + x, origin.1 + y, lifegrid_core::ALIVE);
    }
}

// ── driving ────────────────────────────────────────────────────────

/// Pump until the coordinator is idle. Returns generations committed.
///
/// # Panics
///
/// Panics if work is still outstanding after [`SETTLE_TIMEOUT`].
pub fn settle(c: &mut Coordinator) -> Result<usize, EngineError> {
    let deadline = Instant::now() + SETTLE_TIMEOUT;
    let mut committed = c.pump()?;
    while !c.is_idle() {
        let remaining = deadline.saturating_duration_since(Instant::now());
        assert!(!remaining.is_zero(), "coordinator did not settle: {c:?}");
        committed += c.pump_blocking(remaining.min(Duration::from_millis(50)))?;
    }
    Ok(committed)
}

/// Request one step and wait for it to commit.
pub fn step_once(c: &mut Coordinator) -> Result<(), EngineError> {
    c.step()?;
    settle(c).map(|_| ())
}

/// Run `n` sequential steps.
pub fn step_n(c: &mut Coordinator, n: usize) -> Result<(), EngineError> {
    for _ in 0..n {
        step_once(c)?;
    }
    Ok(())
}

// ── rules ──────────────────────────────────────────────────────────

/// Shared call log written by recording rules.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Step rule that appends `tag` to `log` each generation.
pub fn recording_step(log: &CallLog, tag: &str) -> impl StepRule {
    let log = Arc::clone(log);
    let tag = tag.to_string();
    step_fn(move |_, _| {
        log.lock().unwrap().push(tag.clone());
        Ok(())
    })
}

/// Transition rule that appends `"{tag}@{index}"` to `log` per change.
pub fn recording_transition(log: &CallLog, tag: &str) -> impl TransitionRule {
    let log = Arc::clone(log);
    let tag = tag.to_string();
    transition_fn(move |change, _, _| {
        log.lock().unwrap().push(format!("{tag}@{}", change.index));
        Ok(())
    })
}

/// Step rule that always fails with `reason`.
pub fn failing_step(reason: &str) -> impl StepRule {
    let reason = reason.to_string();
    step_fn(move |_, _| Err(RuleError::failed(reason.clone())))
}

/// Transition rule that always fails with `reason`.
pub fn failing_transition(reason: &str) -> impl TransitionRule {
    let reason = reason.to_string();
    transition_fn(move |_, _, _| Err(RuleError::failed(reason.clone())))
}

/// Square dimensions.
pub fn square(n: usize) -> Dims {
    Dims::new(n, n)
}
