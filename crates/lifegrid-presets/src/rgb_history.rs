//! RGB history: three exponential moving averages of liveness at
//! different rates, displayed as the red, green, and blue components.
//!
//! Recently active regions glow red, steady regions trend to white, and
//! regions that were active long ago fade through blue.

use lifegrid_core::{is_alive, Rgb, RuleError};
use lifegrid_rules::{ChannelRegistry, ColorRule, GridView, Preset, StepRule};

/// Fast-moving average channel (red).
pub const HISTORY_R: &str = "history_r";
/// Medium-rate average channel (green).
pub const HISTORY_G: &str = "history_g";
/// Slow-moving average channel (blue).
pub const HISTORY_B: &str = "history_b";

/// RGB history preset parameters: smoothing rate per channel in `(0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RgbHistory {
    /// Red channel rate.
    pub fast: f32,
    /// Green channel rate.
    pub medium: f32,
    /// Blue channel rate.
    pub slow: f32,
}

impl Default for RgbHistory {
    fn default() -> Self {
        Self {
            fast: 0.5,
            medium: 0.15,
            slow: 0.03,
        }
    }
}

impl RgbHistory {
    /// Build the `rgb_history` preset.
    pub fn preset(self) -> Preset {
        Preset::builder("rgb_history")
            .channel(HISTORY_R)
            .channel(HISTORY_G)
            .channel(HISTORY_B)
            .step(HistoryBlend { rates: self })
            .color(HistoryColor)
            .build()
    }
}

/// Blends current liveness into each history channel.
#[derive(Clone, Copy, Debug)]
pub struct HistoryBlend {
    /// Rates for the three channels.
    pub rates: RgbHistory,
}

impl StepRule for HistoryBlend {
    fn apply(&self, view: &GridView<'_>, channels: &mut ChannelRegistry) -> Result<(), RuleError> {
        for (name, rate) in [
            (HISTORY_R, self.rates.fast),
            (HISTORY_G, self.rates.medium),
            (HISTORY_B, self.rates.slow),
        ] {
            let values = channels.require_mut(name)?;
            for (v, &cell) in values.iter_mut().zip(view.state) {
                let target = if is_alive(cell) { 1.0 } else { 0.0 };
                *v += rate * (target - *v);
            }
        }
        Ok(())
    }
}

/// `(history_r, history_g, history_b)` as a colour.
#[derive(Clone, Copy, Debug)]
pub struct HistoryColor;

impl ColorRule for HistoryColor {
    fn color(
        &self,
        index: usize,
        _view: &GridView<'_>,
        channels: &ChannelRegistry,
    ) -> Result<Rgb, RuleError> {
        Ok(Rgb::from_unit(
            channels.require(HISTORY_R)?[index],
            channels.require(HISTORY_G)?[index],
            channels.require(HISTORY_B)?[index],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifegrid_core::{Dims, Topology};

    #[test]
    fn blend_moves_towards_liveness_at_each_rate() {
        let dims = Dims::new(2, 1);
        let mut ch = ChannelRegistry::new(dims);
        for name in [HISTORY_R, HISTORY_G, HISTORY_B] {
            ch.ensure(name).copy_from_slice(&[0.0, 1.0]);
        }
        let rule = HistoryBlend {
            rates: RgbHistory {
                fast: 0.5,
                medium: 0.25,
                slow: 0.125,
            },
        };
        let view = GridView {
            state: &[1, 0],
            dims,
            topology: Topology::Bounded,
        };
        rule.apply(&view, &mut ch).unwrap();
        assert_eq!(ch.get(HISTORY_R).unwrap(), &[0.5, 0.5][..]);
        assert_eq!(ch.get(HISTORY_G).unwrap(), &[0.25, 0.75][..]);
        assert_eq!(ch.get(HISTORY_B).unwrap(), &[0.125, 0.875][..]);
    }

    #[test]
    fn color_reads_three_channels() {
        let dims = Dims::new(1, 1);
        let mut ch = ChannelRegistry::new(dims);
        ch.ensure(HISTORY_R)[0] = 1.0;
        ch.ensure(HISTORY_G)[0] = 0.0;
        ch.ensure(HISTORY_B)[0] = 1.0;
        let view = GridView {
            state: &[0],
            dims,
            topology: Topology::Bounded,
        };
        assert_eq!(
            HistoryColor.color(0, &view, &ch).unwrap(),
            Rgb::new(255, 0, 255)
        );
    }

    #[test]
    fn missing_channel_is_error() {
        let dims = Dims::new(1, 1);
        let ch = ChannelRegistry::new(dims);
        let view = GridView {
            state: &[0],
            dims,
            topology: Topology::Bounded,
        };
        assert!(matches!(
            HistoryColor.color(0, &view, &ch),
            Err(RuleError::MissingChannel { .. })
        ));
    }
}
