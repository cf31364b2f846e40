//! Lifegrid: a double-buffered Game of Life engine with a background
//! stepper, per-cell float channels, and pluggable rules.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all lifegrid sub-crates. For most users, adding `lifegrid` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use lifegrid::prelude::*;
//!
//! let mut grid = Coordinator::new(EngineConfig {
//!     cols: 8,
//!     rows: 8,
//!     execution: ExecutionMode::Inline,
//!     ..EngineConfig::default()
//! })
//! .unwrap();
//! grid.pump().unwrap();
//! assert_eq!(grid.phase(), Phase::Ready);
//!
//! // A blinker with a heat trail.
//! for x in 2..5 {
//!     grid.set_cell(x, 3, ALIVE);
//! }
//! grid.activate_preset(&Heat::default().preset());
//!
//! grid.step().unwrap();
//! assert_eq!(grid.pump().unwrap(), 1);
//! assert_eq!(grid.generation(), Generation(1));
//! assert_eq!(grid.get_cell(3, 2), Some(ALIVE));
//! assert!(grid.channels().get("heat").unwrap().iter().any(|&h| h > 0.0));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `lifegrid-core` | Dimensions, topology, Life rules, ids, colours, errors |
//! | [`stepper`] | `lifegrid-stepper` | Double-buffered stepper and change lists |
//! | [`rules`] | `lifegrid-rules` | Channels, rule traits, rule registry, presets |
//! | [`presets`] | `lifegrid-presets` | Built-in heat, age, sediment, history, edge, and wrap presets |
//! | [`engine`] | `lifegrid-engine` | Coordinator, worker protocol, events, playback |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types (`lifegrid-core`).
pub use lifegrid_core as types;

/// Double-buffered stepper (`lifegrid-stepper`).
///
/// [`stepper::GridStepper`] computes generations on its own; the
/// coordinator drives one from a worker thread.
pub use lifegrid_stepper as stepper;

/// Channels, rules, and presets (`lifegrid-rules`).
pub use lifegrid_rules as rules;

/// Built-in presets (`lifegrid-presets`).
pub use lifegrid_presets as presets;

/// Coordinator and computation contexts (`lifegrid-engine`).
///
/// [`engine::Coordinator`] is the main entry point.
pub use lifegrid_engine as engine;

/// Common imports for typical lifegrid usage.
///
/// ```rust
/// use lifegrid::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use lifegrid_core::{
        is_alive, Dims, EngineError, Epoch, Generation, LifeRule, Rgb, RuleError, Topology,
        ALIVE, DEAD,
    };

    // Rules
    pub use lifegrid_rules::{
        color_fn, step_fn, transition_fn, CellChange, ChannelRegistry, ColorRule, GridView,
        Preset, StepRule, TransitionRule,
    };

    // Presets
    pub use lifegrid_presets::{Age, Edges, Heat, RgbHistory, Sediment};

    // Engine
    pub use lifegrid_engine::{
        Coordinator, EngineConfig, EngineEvent, EngineMetrics, ExecutionMode, Phase,
    };
}
