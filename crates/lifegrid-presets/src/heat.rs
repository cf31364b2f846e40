//! Heat: births add heat that decays geometrically every generation.
//!
//! Dead cells render on a black → red → yellow ramp by heat; live cells
//! render white.

use lifegrid_core::{is_alive, Dims, Rgb, RuleError};
use lifegrid_rules::{
    CellChange, ChannelRegistry, ColorRule, GridView, Preset, StepRule, TransitionRule,
};

use crate::check_finite;

/// Channel holding per-cell heat in `[0, 1]`.
pub const HEAT: &str = "heat";

const RED: Rgb = Rgb::new(255, 0, 0);
const YELLOW: Rgb = Rgb::new(255, 255, 0);

/// Heat preset parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Heat {
    /// Heat added to a cell when it is born. The result is capped at 1.
    pub boost: f32,
    /// Multiplier applied to every cell's heat once per generation.
    pub decay: f32,
}

impl Default for Heat {
    fn default() -> Self {
        Self {
            boost: 1.0,
            decay: 0.9,
        }
    }
}

impl Heat {
    /// Build the `heat` preset.
    pub fn preset(self) -> Preset {
        Preset::builder("heat")
            .channel(HEAT)
            .transition(HeatOnBirth { boost: self.boost })
            .step(HeatDecay { decay: self.decay })
            .color(HeatColor)
            .build()
    }
}

/// Raises heat on birth.
#[derive(Clone, Copy, Debug)]
pub struct HeatOnBirth {
    /// Amount added per birth.
    pub boost: f32,
}

impl TransitionRule for HeatOnBirth {
    fn apply(
        &self,
        change: &CellChange,
        channels: &mut ChannelRegistry,
        _dims: Dims,
    ) -> Result<(), RuleError> {
        if !change.born() {
            return Ok(());
        }
        let heat = channels.require_mut(HEAT)?;
        let v = check_finite(HEAT, change.index, heat[change.index] + self.boost)?;
        heat[change.index] = v.min(1.0);
        Ok(())
    }
}

/// Decays all heat by a fixed factor.
#[derive(Clone, Copy, Debug)]
pub struct HeatDecay {
    /// Per-generation multiplier.
    pub decay: f32,
}

impl StepRule for HeatDecay {
    fn apply(&self, _view: &GridView<'_>, channels: &mut ChannelRegistry) -> Result<(), RuleError> {
        let heat = channels.require_mut(HEAT)?;
        for (i, h) in heat.iter_mut().enumerate() {
            *h = check_finite(HEAT, i, *h * self.decay)?;
        }
        Ok(())
    }
}

/// Black → red → yellow by heat.
#[derive(Clone, Copy, Debug)]
pub struct HeatColor;

impl ColorRule for HeatColor {
    fn color(
        &self,
        index: usize,
        view: &GridView<'_>,
        channels: &ChannelRegistry,
    ) -> Result<Rgb, RuleError> {
        if is_alive(view.state[index]) {
            return Ok(Rgb::WHITE);
        }
        let t = channels.require(HEAT)?[index];
        Ok(if t < 0.5 {
            Rgb::BLACK.lerp(RED, t * 2.0)
        } else {
            RED.lerp(YELLOW, (t - 0.5) * 2.0)
        })
    }
}
