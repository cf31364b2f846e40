//! Lifegrid Quickstart: a glider with a heat trail on a threaded worker.
//!
//! Demonstrates:
//!   1. Building a Coordinator from an EngineConfig
//!   2. Editing cells and installing a preset
//!   3. Requesting single steps and pumping results
//!   4. Timer-driven playback with run_for
//!   5. Reading channels, colours, and metrics
//!
//! Run with:
//!   RUST_LOG=lifegrid_engine=debug cargo run --example quickstart

use std::time::Duration;

use lifegrid_core::{EngineError, Topology, ALIVE};
use lifegrid_engine::{Coordinator, EngineConfig, EngineEvent};
use lifegrid_presets::heat::HEAT;
use lifegrid_presets::Heat;

// ─── Grid parameters ────────────────────────────────────────────

const COLS: usize = 16;
const ROWS: usize = 12;
const GLIDER: [(usize, usize); 5] = [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];

/// Pump until nothing is outstanding.
fn settle(c: &mut Coordinator) -> Result<(), EngineError> {
    while !c.is_idle() {
        c.pump_blocking(Duration::from_millis(100))?;
    }
    Ok(())
}

fn render(c: &Coordinator) -> String {
    let heat = c.channels().get(HEAT).unwrap_or(&[]);
    let mut out = String::new();
    for y in 0..ROWS {
        for x in 0..COLS {
            let i = y * COLS + x;
            let ch = match (c.state()[i], heat.get(i).copied().unwrap_or(0.0)) {
                (ALIVE, _) => '#',
                (_, h) if h > 0.5 => '*',
                (_, h) if h > 0.1 => '.',
                _ => ' ',
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}

// ─── Main ───────────────────────────────────────────────────────

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Lifegrid Quickstart ===\n");

    // 1. A toroidal grid stepped on a background thread.
    let mut c = Coordinator::new(EngineConfig {
        cols: COLS,
        rows: ROWS,
        topology: Topology::Toroidal,
        ..EngineConfig::default()
    })?;
    let events = c.subscribe_channel();
    settle(&mut c)?;

    // 2. Place a glider and leave a heat trail behind it.
    for (x, y) in GLIDER {
        c.set_cell(x + 1, y + 1, ALIVE);
    }
    c.activate_preset(&Heat::default().preset());

    // 3. Four single steps: one full glider cycle.
    for _ in 0..4 {
        c.step()?;
        settle(&mut c)?;
    }
    println!("after {}:\n{}", c.generation(), render(&c));

    // 4. Let the timer drive it for a while.
    c.play(25);
    let committed = c.run_for(Duration::from_millis(500))?;
    c.pause();
    settle(&mut c)?;
    println!("playback committed {committed} generations");
    println!("after {}:\n{}", c.generation(), render(&c));

    // 5. Colours and counters.
    let (x, y) = (0..COLS * ROWS)
        .find(|&i| c.state()[i] == ALIVE)
        .map(|i| (i % COLS, i / COLS))
        .unwrap_or((0, 0));
    if let Some(rgb) = c.cell_color(x, y) {
        println!("cell ({x}, {y}) renders as {}", rgb?);
    }
    let m = c.metrics();
    println!(
        "alive={} last_compute={}us last_rules={}us coalesced={} discarded={}",
        c.alive_count(),
        m.last_compute_us,
        m.last_rules_us,
        m.requests_coalesced,
        m.results_discarded
    );
    let steps = events
        .try_iter()
        .filter(|e| matches!(e, EngineEvent::Step { .. }))
        .count();
    println!("observed {steps} step events");

    Ok(())
}
