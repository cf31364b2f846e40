//! Sediment: each death deposits a little sediment that never erodes.

use lifegrid_core::{is_alive, Dims, Rgb, RuleError};
use lifegrid_rules::{CellChange, ChannelRegistry, ColorRule, GridView, Preset, TransitionRule};

use crate::check_finite;

/// Channel holding per-cell sediment in `[0, 1]`.
pub const SEDIMENT: &str = "sediment";

const BROWN: Rgb = Rgb::new(139, 90, 43);

/// Sediment preset parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sediment {
    /// Sediment added per death, capped at 1.
    pub deposit: f32,
}

impl Default for Sediment {
    fn default() -> Self {
        Self { deposit: 0.1 }
    }
}

impl Sediment {
    /// Build the `sediment` preset.
    pub fn preset(self) -> Preset {
        Preset::builder("sediment")
            .channel(SEDIMENT)
            .transition(DepositOnDeath {
                deposit: self.deposit,
            })
            .color(SedimentColor)
            .build()
    }
}

/// Adds sediment where a cell dies.
#[derive(Clone, Copy, Debug)]
pub struct DepositOnDeath {
    /// Amount per death.
    pub deposit: f32,
}

impl TransitionRule for DepositOnDeath {
    fn apply(
        &self,
        change: &CellChange,
        channels: &mut ChannelRegistry,
        _dims: Dims,
    ) -> Result<(), RuleError> {
        if change.died() {
            let sediment = channels.require_mut(SEDIMENT)?;
            let v = check_finite(SEDIMENT, change.index, sediment[change.index] + self.deposit)?;
            sediment[change.index] = v.min(1.0);
        }
        Ok(())
    }
}

/// Live cells white; dead cells shade towards brown with sediment.
#[derive(Clone, Copy, Debug)]
pub struct SedimentColor;

impl ColorRule for SedimentColor {
    fn color(
        &self,
        index: usize,
        view: &GridView<'_>,
        channels: &ChannelRegistry,
    ) -> Result<Rgb, RuleError> {
        if is_alive(view.state[index]) {
            return Ok(Rgb::WHITE);
        }
        Ok(Rgb::BLACK.lerp(BROWN, channels.require(SEDIMENT)?[index]))
    }
}
