//! Classic patterns driven end to end through the coordinator, in both
//! execution modes.

use lifegrid_core::{Dims, Generation, ALIVE};
use lifegrid_engine::{EngineEvent, ExecutionMode};
use lifegrid_test_utils::{
    live_set, place, placed_wrapped, ready, step_n, step_once, BLINKER, GLIDER,
};

const MODES: [ExecutionMode; 2] = [ExecutionMode::Inline, ExecutionMode::Threaded];

#[test]
fn glider_cycle_translates_diagonally() {
    for mode in MODES {
        let mut c = ready(12, 12, mode);
        place(&mut c, &GLIDER, (1, 1));
        let events = c.subscribe_channel();

        step_n(&mut c, 4).unwrap();

        assert_eq!(c.generation(), Generation(4));
        assert_eq!(
            live_set(c.state(), c.dims()),
            placed_wrapped(&GLIDER, (2, 2), c.dims()),
            "{mode:?}"
        );
        let changed: Vec<usize> = events
            .try_iter()
            .filter_map(|e| match e {
                EngineEvent::Step { changed, .. } => Some(changed),
                EngineEvent::Ready { .. } => None,
            })
            .collect();
        assert_eq!(changed.len(), 4);
        assert!(changed.iter().all(|&n| n > 0), "{mode:?}: {changed:?}");
    }
}

#[test]
fn blinker_alternates_every_generation() {
    for mode in MODES {
        let mut c = ready(9, 9, mode);
        place(&mut c, &BLINKER, (3, 4));
        let dims = c.dims();
        let horizontal = live_set(c.state(), dims);
        let vertical = placed_wrapped(&[(0, 0), (0, 1), (0, 2)], (4, 3), dims);

        for g in 1..=20u64 {
            step_once(&mut c).unwrap();
            assert_eq!(c.generation(), Generation(g));
            let expected = if g % 2 == 1 { &vertical } else { &horizontal };
            assert_eq!(&live_set(c.state(), dims), expected, "{mode:?} generation {g}");
            assert_eq!(c.alive_count(), 3);
        }
    }
}

#[test]
fn toroidal_glider_never_disappears() {
    for mode in MODES {
        let mut c = ready(8, 8, mode);
        c.set_wrap_edges(true);
        place(&mut c, &GLIDER, (5, 5));

        for g in 1..=32 {
            step_once(&mut c).unwrap();
            assert_eq!(c.alive_count(), 5, "{mode:?} generation {g}");
        }
        // Eight full cycles move it once around the torus.
        assert_eq!(
            live_set(c.state(), c.dims()),
            placed_wrapped(&GLIDER, (5, 5), c.dims())
        );
    }
}

#[test]
fn bounded_glider_is_truncated_at_the_edge() {
    let mut c = ready(8, 8, ExecutionMode::Inline);
    place(&mut c, &GLIDER, (5, 5));
    step_n(&mut c, 12).unwrap();
    assert_eq!(c.alive_count(), 4);
    assert_eq!(c.get_cell(7, 7), Some(ALIVE));
    assert_eq!(c.dims(), Dims::new(8, 8));
}
