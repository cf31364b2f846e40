//! Generation stepper for lifegrid.
//!
//! [`GridStepper`] computes the next generation of a row-major byte grid
//! and the list of cells whose alive/dead value flipped. It owns a
//! [`PingPong`] pair of generation buffers and a change-index buffer,
//! all reused across calls so a steady-state step performs no
//! allocation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod neighbourhood;
pub mod pingpong;
pub mod stepper;

pub use neighbourhood::{live_neighbours, moore_neighbours, MOORE_OFFSETS};
pub use pingpong::PingPong;
pub use stepper::{step_into, GridStepper, StepOutput, StepperError};
