//! Messages exchanged between the coordinator and its computation context.
//!
//! Every payload is moved: once a buffer is sent, the sender no longer
//! holds it. Messages are processed in send order in each direction.

use lifegrid_core::{Dims, Epoch, LifeRule, Topology};

/// Coordinator → computation context.
#[derive(Debug)]
pub enum ToWorker {
    /// Allocate buffers and adopt the initial state.
    Init {
        /// Epoch the worker echoes in its `Ready`.
        epoch: Epoch,
        /// Grid dimensions.
        dims: Dims,
        /// Initial generation, `dims.cell_count()` bytes.
        state: Vec<u8>,
        /// Initial topology.
        topology: Topology,
        /// Initial birth/survival rule.
        rule: LifeRule,
    },
    /// Reallocate to `dims` and adopt the coordinator's resized state.
    ///
    /// The worker may have stepped past the canonical generation, so it
    /// never resizes its own copy.
    Resize {
        /// Epoch echoed in `Resized` and `Ready`.
        epoch: Epoch,
        /// New dimensions.
        dims: Dims,
        /// Canonical state already resized to `dims`.
        state: Vec<u8>,
    },
    /// Overwrite the current generation.
    SetState {
        /// Replacement generation.
        state: Vec<u8>,
    },
    /// Overwrite one cell of the current generation.
    SetCell {
        /// Row-major index.
        index: usize,
        /// New value.
        value: u8,
    },
    /// Toggle toroidal topology.
    SetWrap(bool),
    /// Replace the birth/survival rule.
    SetLifeRule(LifeRule),
    /// Compute one generation.
    Step {
        /// Epoch the result is tagged with.
        epoch: Epoch,
        /// Recycled buffer for the result state.
        spare_state: Vec<u8>,
        /// Recycled buffer for the change list.
        spare_changes: Vec<u32>,
    },
    /// Stop the worker loop.
    Shutdown,
}

/// Computation context → coordinator.
#[derive(Debug)]
pub enum FromWorker {
    /// Buffers are allocated and the worker is idle.
    Ready {
        /// Epoch of the `Init` or `Resize` this answers.
        epoch: Epoch,
    },
    /// Post-resize state, echoed for confirmation.
    Resized {
        /// Epoch of the `Resize` this answers.
        epoch: Epoch,
        /// The resized generation.
        state: Vec<u8>,
    },
    /// A completed generation.
    StepResult {
        /// Epoch of the `Step` this answers.
        epoch: Epoch,
        /// The new generation.
        state: Vec<u8>,
        /// Indices whose alive/dead value flipped, in scan order.
        changes: Vec<u32>,
        /// Time spent in the stepper, in microseconds.
        compute_us: u64,
    },
}
