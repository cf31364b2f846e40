//! Coordinator and computation contexts for the lifegrid engine.
//!
//! [`Coordinator`] owns the canonical grid, channels, rules, and
//! counters. It hands step work to a [`ComputeContext`] over an
//! ownership-transferring message protocol ([`ToWorker`] /
//! [`FromWorker`]) and applies the results on the owning thread, so
//! edits and reads never wait on a generation being computed.
//!
//! Two contexts are provided: [`ThreadedContext`] runs the stepper on a
//! dedicated worker thread; [`InlineContext`] runs it on the caller's
//! thread but still defers replies until the next pump.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod context;
pub mod coordinator;
pub mod events;
pub mod metrics;
pub mod playback;
pub mod protocol;
mod worker;

pub use config::{ConfigError, EngineConfig, ExecutionMode, PlaybackConfig};
pub use context::{ComputeContext, InlineContext, ThreadedContext};
pub use coordinator::{Coordinator, Phase};
pub use events::{EngineEvent, SubscriptionId};
pub use metrics::EngineMetrics;
pub use playback::Playback;
pub use protocol::{FromWorker, ToWorker};
