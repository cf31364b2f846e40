//! Bursts of step requests against the inline context.

use lifegrid_core::Generation;
use lifegrid_engine::{ExecutionMode, Phase};
use lifegrid_test_utils::{place, ready, BLINKER};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// However many requests arrive while busy, a burst costs at most one
    /// in-flight step plus one deferred step.
    #[test]
    fn bursts_collapse_to_at_most_two_generations(
        bursts in proptest::collection::vec(1usize..30, 1..8),
    ) {
        let mut c = ready(6, 6, ExecutionMode::Inline);
        place(&mut c, &BLINKER, (1, 2));

        let mut generation = 0u64;
        let mut coalesced = 0u64;
        for burst in bursts {
            for _ in 0..burst {
                c.step().unwrap();
            }
            let committed = burst.min(2);
            prop_assert_eq!(c.pump().unwrap(), committed);
            prop_assert_eq!(c.phase(), Phase::Ready);
            prop_assert!(c.is_idle());

            generation += committed as u64;
            coalesced += (burst - committed) as u64;
            prop_assert_eq!(c.generation(), Generation(generation));
            prop_assert_eq!(c.metrics().steps_dispatched, generation);
            prop_assert_eq!(c.metrics().requests_coalesced, coalesced);
            prop_assert_eq!(c.alive_count(), 3);
        }
    }
}
