//! Channels, rules, and presets for lifegrid.
//!
//! Extension logic is layered onto the baseline stepper through three
//! rule signatures, each an object-safe trait:
//!
//! - [`TransitionRule`]: once per cell whose alive/dead value flipped.
//! - [`StepRule`]: once per generation over the whole grid.
//! - [`ColorRule`]: per cell at render time, read-only.
//!
//! Rules keep their mutable state in named per-cell [`ChannelRegistry`]
//! channels. [`RuleRegistry`] stores rules by name and applies them in
//! insertion order. A [`Preset`] bundles channels, rules, and activation
//! hooks into one switchable unit.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod channel;
pub mod preset;
pub mod registry;
pub mod rule;

pub use channel::ChannelRegistry;
pub use preset::{Preset, PresetBuilder, PresetHook, PresetHost};
pub use registry::RuleRegistry;
pub use rule::{
    color_fn, step_fn, transition_fn, CellChange, ColorRule, GridView, StepRule, TransitionRule,
};
