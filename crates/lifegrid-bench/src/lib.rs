//! Benchmark profiles and utilities for the lifegrid engine.
//!
//! - [`REFERENCE`]: 256x256 grid (64K cells)
//! - [`STRESS`]: 1024x1024 grid (~1M cells)
//! - [`soup`]: reproducible random starting state
//! - [`warm_coordinator`]: a ready coordinator loaded with a soup, optionally
//!   running every preset in the catalog

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::error::Error;
use std::time::Duration;

use lifegrid_core::{Dims, EngineError, ALIVE, DEAD};
use lifegrid_engine::{Coordinator, EngineConfig, ExecutionMode};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Reference profile: 256x256 grid.
pub const REFERENCE: Dims = Dims::new(256, 256);

/// Stress profile: 1024x1024 grid.
pub const STRESS: Dims = Dims::new(1024, 1024);

/// Live-cell density of [`soup`], roughly where random Life soups
/// stay busy for thousands of generations.
pub const SOUP_DENSITY: f64 = 0.35;

/// Random state at [`SOUP_DENSITY`], reproducible from `seed`.
pub fn soup(dims: Dims, seed: u64) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..dims.cell_count())
        .map(|_| if rng.random_bool(SOUP_DENSITY) { ALIVE } else { DEAD })
        .collect()
}

/// Engine config for `dims` with the given execution mode.
pub fn config(dims: Dims, execution: ExecutionMode) -> EngineConfig {
    EngineConfig {
        cols: dims.cols,
        rows: dims.rows,
        execution,
        ..EngineConfig::default()
    }
}

/// Ready coordinator loaded with [`soup`]. With `presets`, every preset
/// in the catalog is active.
pub fn warm_coordinator(
    dims: Dims,
    execution: ExecutionMode,
    seed: u64,
    presets: bool,
) -> Result<Coordinator, Box<dyn Error>> {
    let mut c = Coordinator::new(config(dims, execution))?;
    c.load_state(soup(dims, seed))?;
    if presets {
        for preset in lifegrid_presets::catalog() {
            c.activate_preset(&preset);
        }
    }
    drain(&mut c)?;
    Ok(c)
}

/// Pump until the coordinator is idle.
pub fn drain(c: &mut Coordinator) -> Result<usize, EngineError> {
    let mut committed = 0;
    while !c.is_idle() {
        committed += c.pump_blocking(Duration::from_millis(100))?;
    }
    Ok(committed)
}

/// One full round trip: request, compute, commit.
pub fn round_trip(c: &mut Coordinator) -> Result<(), EngineError> {
    c.step()?;
    drain(c).map(|_| ())
}
