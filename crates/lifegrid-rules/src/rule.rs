//! The three rule signatures and their closure adapters.

use lifegrid_core::{is_alive, Dims, Rgb, RuleError, Topology};

use crate::channel::ChannelRegistry;

/// One cell whose alive/dead value flipped in the latest generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellChange {
    /// Row-major index.
    pub index: usize,
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
    /// The cell's new value.
    pub value: u8,
}

impl CellChange {
    /// The cell was born this generation.
    pub fn born(&self) -> bool {
        is_alive(self.value)
    }

    /// The cell died this generation.
    pub fn died(&self) -> bool {
        !self.born()
    }
}

/// Read-only view of the committed generation handed to step and color rules.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    /// Row-major cell values.
    pub state: &'a [u8],
    /// Grid dimensions.
    pub dims: Dims,
    /// Active topology, for rules that inspect neighbourhoods.
    pub topology: Topology,
}

/// Logic invoked once per changed cell, after each generation.
///
/// May write only the channels it owns.
pub trait TransitionRule: Send + Sync + 'static {
    /// Handle one changed cell.
    fn apply(
        &self,
        change: &CellChange,
        channels: &mut ChannelRegistry,
        dims: Dims,
    ) -> Result<(), RuleError>;
}

/// Logic invoked once per generation over the whole grid.
///
/// Runs after every transition rule. May write only the channels it owns.
pub trait StepRule: Send + Sync + 'static {
    /// Process one generation.
    fn apply(&self, view: &GridView<'_>, channels: &mut ChannelRegistry)
        -> Result<(), RuleError>;
}

/// Pure mapping from a cell's state and channels to a display colour.
///
/// May be invoked by a renderer at any cadence, so it must not mutate
/// anything; the shared borrows enforce that.
pub trait ColorRule: Send + Sync + 'static {
    /// Colour of the cell at `index`.
    fn color(
        &self,
        index: usize,
        view: &GridView<'_>,
        channels: &ChannelRegistry,
    ) -> Result<Rgb, RuleError>;
}

/// Closure-backed rule; build with [`transition_fn`], [`step_fn`] or [`color_fn`].
pub struct FnRule<F>(F);

impl<F> TransitionRule for FnRule<F>
where
    F: Fn(&CellChange, &mut ChannelRegistry, Dims) -> Result<(), RuleError>
        + Send
        + Sync
        + 'static,
{
    fn apply(
        &self,
        change: &CellChange,
        channels: &mut ChannelRegistry,
        dims: Dims,
    ) -> Result<(), RuleError> {
        (self.0)(change, channels, dims)
    }
}

/// Wrap a closure as a [`TransitionRule`].
///
/// ```
/// use lifegrid_rules::{transition_fn, ChannelRegistry, TransitionRule, CellChange};
/// use lifegrid_core::Dims;
///
/// let mark_births = transition_fn(|change, channels, _dims| {
///     if change.born() {
///         channels.require_mut("births")?[change.index] += 1.0;
///     }
///     Ok(())
/// });
///
/// let dims = Dims::new(2, 2);
/// let mut channels = ChannelRegistry::new(dims);
/// channels.ensure("births");
/// let change = CellChange { index: 3, x: 1, y: 1, value: 1 };
/// mark_births.apply(&change, &mut channels, dims).unwrap();
/// assert_eq!(channels.get("births").unwrap()[3], 1.0);
/// ```
pub fn transition_fn<F>(f: F) -> FnRule<F>
where
    F: Fn(&CellChange, &mut ChannelRegistry, Dims) -> Result<(), RuleError>
        + Send
        + Sync
        + 'static,
{
    FnRule(f)
}

/// Closure-backed step rule; build with [`step_fn`].
pub struct FnStepRule<F>(F);

impl<F> StepRule for FnStepRule<F>
where
    F: Fn(&GridView<'_>, &mut ChannelRegistry) -> Result<(), RuleError> + Send + Sync + 'static,
{
    fn apply(
        &self,
        view: &GridView<'_>,
        channels: &mut ChannelRegistry,
    ) -> Result<(), RuleError> {
        (self.0)(view, channels)
    }
}

/// Wrap a closure as a [`StepRule`].
pub fn step_fn<F>(f: F) -> FnStepRule<F>
where
    F: Fn(&GridView<'_>, &mut ChannelRegistry) -> Result<(), RuleError> + Send + Sync + 'static,
{
    FnStepRule(f)
}

/// Closure-backed color rule; build with [`color_fn`].
pub struct FnColorRule<F>(F);

impl<F> ColorRule for FnColorRule<F>
where
    F: Fn(usize, &GridView<'_>, &ChannelRegistry) -> Result<Rgb, RuleError>
        + Send
        + Sync
        + 'static,
{
    fn color(
        &self,
        index: usize,
        view: &GridView<'_>,
        channels: &ChannelRegistry,
    ) -> Result<Rgb, RuleError> {
        (self.0)(index, view, channels)
    }
}

/// Wrap a closure as a [`ColorRule`].
pub fn color_fn<F>(f: F) -> FnColorRule<F>
where
    F: Fn(usize, &GridView<'_>, &ChannelRegistry) -> Result<Rgb, RuleError>
        + Send
        + Sync
        + 'static,
{
    FnColorRule(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifegrid_core::{ALIVE, DEAD};

    #[test]
    fn cell_change_direction() {
        let born = CellChange {
            index: 0,
            x: 0,
            y: 0,
            value: ALIVE,
        };
        let died = CellChange { value: DEAD, ..born };
        assert!(born.born() && !born.died());
        assert!(died.died() && !died.born());
    }

    #[test]
    fn step_fn_sees_view() {
        let rule = step_fn(|view, channels| {
            let alive = view.state.iter().filter(|&&v| is_alive(v)).count();
            channels.require_mut("count")?[0] = alive as f32;
            Ok(())
        });
        let dims = Dims::new(3, 1);
        let mut channels = ChannelRegistry::new(dims);
        channels.ensure("count");
        let view = GridView {
            state: &[1, 0, 1],
            dims,
            topology: Topology::Bounded,
        };
        rule.apply(&view, &mut channels).unwrap();
        assert_eq!(channels.get("count").unwrap()[0], 2.0);
    }

    #[test]
    fn step_fn_missing_channel_errors() {
        let rule = step_fn(|_view, channels| {
            channels.require_mut("nope")?;
            Ok(())
        });
        let dims = Dims::new(1, 1);
        let mut channels = ChannelRegistry::new(dims);
        let view = GridView {
            state: &[0],
            dims,
            topology: Topology::Bounded,
        };
        assert!(matches!(
            rule.apply(&view, &mut channels),
            Err(RuleError::MissingChannel { .. })
        ));
    }

    #[test]
    fn color_fn_reads_state() {
        let rule = color_fn(|i, view, _| {
            Ok(if is_alive(view.state[i]) {
                Rgb::WHITE
            } else {
                Rgb::BLACK
            })
        });
        let dims = Dims::new(2, 1);
        let channels = ChannelRegistry::new(dims);
        let view = GridView {
            state: &[0, 1],
            dims,
            topology: Topology::Toroidal,
        };
        assert_eq!(rule.color(0, &view, &channels).unwrap(), Rgb::BLACK);
        assert_eq!(rule.color(1, &view, &channels).unwrap(), Rgb::WHITE);
    }
}
