//! Edge detection: marks live cells that border at least one dead cell.

use lifegrid_core::{is_alive, Rgb, RuleError};
use lifegrid_rules::{ChannelRegistry, ColorRule, GridView, Preset, StepRule};
use lifegrid_stepper::moore_neighbours;

/// Channel holding 1 for edge cells, 0 otherwise.
pub const EDGE: &str = "edge";

const HIGHLIGHT: Rgb = Rgb::new(255, 200, 0);

/// Edge preset. Has no parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Edges;

impl Edges {
    /// Build the `edges` preset.
    pub fn preset(self) -> Preset {
        Preset::builder("edges")
            .channel(EDGE)
            .step(DetectEdges)
            .color(EdgeColor)
            .build()
    }
}

/// Recomputes the edge channel from the committed generation.
///
/// Uses the active topology, so under wrapping a pattern touching the
/// border looks across it. Off-grid positions on a bounded grid are not
/// neighbours and therefore never make a cell an edge.
#[derive(Clone, Copy, Debug)]
pub struct DetectEdges;

impl StepRule for DetectEdges {
    fn apply(&self, view: &GridView<'_>, channels: &mut ChannelRegistry) -> Result<(), RuleError> {
        let edge = channels.require_mut(EDGE)?;
        let dims = view.dims;
        for (i, e) in edge.iter_mut().enumerate() {
            let on_edge = is_alive(view.state[i])
                && dims.coords(i).is_some_and(|(x, y)| {
                    moore_neighbours(dims, view.topology, x, y)
                        .iter()
                        .any(|&n| !is_alive(view.state[n]))
                });
            *e = if on_edge { 1.0 } else { 0.0 };
        }
        Ok(())
    }
}

/// Edge cells highlighted, interior live cells white, dead cells black.
#[derive(Clone, Copy, Debug)]
pub struct EdgeColor;

impl ColorRule for EdgeColor {
    fn color(
        &self,
        index: usize,
        view: &GridView<'_>,
        channels: &ChannelRegistry,
    ) -> Result<Rgb, RuleError> {
        if channels.require(EDGE)?[index] > 0.0 {
            Ok(HIGHLIGHT)
        } else if is_alive(view.state[index]) {
            Ok(Rgb::WHITE)
        } else {
            Ok(Rgb::BLACK)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifegrid_core::{Dims, Topology};

    fn detect(state: &[u8], dims: Dims, topology: Topology) -> Vec<f32> {
        let mut ch = ChannelRegistry::new(dims);
        ch.ensure(EDGE);
        let view = GridView {
            state,
            dims,
            topology,
        };
        DetectEdges.apply(&view, &mut ch).unwrap();
        ch.get(EDGE).unwrap().to_vec()
    }

    #[test]
    fn solid_block_interior_is_not_edge() {
        #[rustfmt::skip]
        let state = [
            0, 0, 0, 0, 0,
            0, 1, 1, 1, 0,
            0, 1, 1, 1, 0,
            0, 1, 1, 1, 0,
            0, 0, 0, 0, 0,
        ];
        let edge = detect(&state, Dims::new(5, 5), Topology::Bounded);
        assert_eq!(edge[12], 0.0);
        for i in [6, 7, 8, 11, 13, 16, 17, 18] {
            assert_eq!(edge[i], 1.0, "cell {i}");
        }
        assert_eq!(edge[0], 0.0);
    }

    #[test]
    fn full_grid_has_no_edges_either_topology() {
        let dims = Dims::new(3, 3);
        let state = [1; 9];
        assert!(detect(&state, dims, Topology::Bounded).iter().all(|&e| e == 0.0));
        assert!(detect(&state, dims, Topology::Toroidal).iter().all(|&e| e == 0.0));
    }

    #[test]
    fn wrapping_sees_across_border() {
        let dims = Dims::new(3, 2);
        let state = [1, 1, 1, 0, 0, 0];
        assert_eq!(detect(&state, dims, Topology::Bounded)[..3], [1.0; 3]);

        // (0,0) has only live neighbours until row 2 wraps in above it.
        let dims = Dims::new(2, 3);
        let state = [1, 1, 1, 1, 1, 0];
        let bounded = detect(&state, dims, Topology::Bounded);
        let wrapped = detect(&state, dims, Topology::Toroidal);
        assert_eq!(bounded[0], 0.0);
        assert_eq!(wrapped[0], 1.0);
    }
}
