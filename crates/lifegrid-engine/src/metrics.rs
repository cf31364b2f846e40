//! Coordinator performance counters.

/// Timing of the latest generation plus cumulative scheduling counters.
///
/// Durations are in microseconds. The coordinator updates these as it
/// dispatches requests and commits or discards results.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EngineMetrics {
    /// Stepper time for the last committed generation, as reported by
    /// the computation context.
    pub last_compute_us: u64,
    /// Time spent applying transition and step rules to the last
    /// committed generation.
    pub last_rules_us: u64,
    /// Change-list length of the last committed generation.
    pub last_changed: usize,
    /// Cumulative step messages sent to the context.
    pub steps_dispatched: u64,
    /// Cumulative generations committed.
    pub steps_committed: u64,
    /// Cumulative step requests folded into an already-pending request.
    pub requests_coalesced: u64,
    /// Cumulative results dropped because their epoch was stale.
    pub results_discarded: u64,
}

impl EngineMetrics {
    /// Step messages whose result has not been committed or discarded.
    pub fn outstanding(&self) -> u64 {
        self.steps_dispatched
            .saturating_sub(self.steps_committed)
            .saturating_sub(self.results_discarded)
    }
}
