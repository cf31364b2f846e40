//! Age: how many generations each live cell has survived.

use lifegrid_core::{is_alive, Dims, Rgb, RuleError};
use lifegrid_rules::{
    CellChange, ChannelRegistry, ColorRule, GridView, Preset, StepRule, TransitionRule,
};

/// Channel holding per-cell age in generations.
pub const AGE: &str = "age";

const YOUNG: Rgb = Rgb::new(64, 255, 64);
const OLD: Rgb = Rgb::new(32, 64, 255);

/// Age preset parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Age {
    /// Age at which the colour ramp saturates.
    pub max_age: f32,
}

impl Default for Age {
    fn default() -> Self {
        Self { max_age: 50.0 }
    }
}

impl Age {
    /// Build the `age` preset.
    pub fn preset(self) -> Preset {
        Preset::builder("age")
            .channel(AGE)
            .transition(AgeOnBirth)
            .step(AgeTick)
            .color(AgeColor {
                max_age: self.max_age,
            })
            .build()
    }
}

/// Zeroes age on birth.
#[derive(Clone, Copy, Debug)]
pub struct AgeOnBirth;

impl TransitionRule for AgeOnBirth {
    fn apply(
        &self,
        change: &CellChange,
        channels: &mut ChannelRegistry,
        _dims: Dims,
    ) -> Result<(), RuleError> {
        if change.born() {
            channels.require_mut(AGE)?[change.index] = 0.0;
        }
        Ok(())
    }
}

/// Live cells age by one; dead cells reset to zero.
#[derive(Clone, Copy, Debug)]
pub struct AgeTick;

impl StepRule for AgeTick {
    fn apply(&self, view: &GridView<'_>, channels: &mut ChannelRegistry) -> Result<(), RuleError> {
        let age = channels.require_mut(AGE)?;
        for (a, &cell) in age.iter_mut().zip(view.state) {
            *a = if is_alive(cell) { *a + 1.0 } else { 0.0 };
        }
        Ok(())
    }
}

/// Young green to old blue; dead cells black.
#[derive(Clone, Copy, Debug)]
pub struct AgeColor {
    /// Age mapped to the end of the ramp.
    pub max_age: f32,
}

impl ColorRule for AgeColor {
    fn color(
        &self,
        index: usize,
        view: &GridView<'_>,
        channels: &ChannelRegistry,
    ) -> Result<Rgb, RuleError> {
        if !is_alive(view.state[index]) {
            return Ok(Rgb::BLACK);
        }
        let age = channels.require(AGE)?[index];
        let t = if self.max_age > 0.0 {
            age / self.max_age
        } else {
            1.0
        };
        Ok(YOUNG.lerp(OLD, t))
    }
}
