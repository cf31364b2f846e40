//! Presets installed on a running coordinator.

use lifegrid_core::{Rgb, Topology};
use lifegrid_engine::ExecutionMode;
use lifegrid_presets::age::AGE;
use lifegrid_presets::heat::HEAT;
use lifegrid_presets::sediment::SEDIMENT;
use lifegrid_presets::{by_name, catalog, toroidal, Age, Heat, Sediment};
use lifegrid_test_utils::{place, ready, step_n, BLINKER, GLIDER};

#[test]
fn heat_freezes_after_deactivation() {
    let mut c = ready(10, 10, ExecutionMode::Threaded);
    let heat = Heat::default().preset();
    c.activate_preset(&heat);
    place(&mut c, &GLIDER, (1, 1));

    step_n(&mut c, 6).unwrap();
    let warm = c.channels().get(HEAT).unwrap().to_vec();
    assert!(warm.iter().any(|&h| h > 0.0));
    assert!(warm.iter().all(|&h| (0.0..=1.0).contains(&h)));

    c.deactivate_preset(&heat);
    assert!(c.rules().is_empty());
    assert!(c.color_rule().is_none());

    step_n(&mut c, 10).unwrap();
    assert_eq!(c.channels().get(HEAT).unwrap(), warm.as_slice());
}

#[test]
fn heat_decays_while_active() {
    let mut c = ready(8, 8, ExecutionMode::Inline);
    c.activate_preset(&Heat::default().preset());
    place(&mut c, &BLINKER, (2, 3));

    // (3,2) is born in generation 1 and dies in generation 2.
    step_n(&mut c, 1).unwrap();
    let index = c.dims().index(3, 2).unwrap();
    let born = c.channels().get(HEAT).unwrap()[index];
    step_n(&mut c, 1).unwrap();
    let later = c.channels().get(HEAT).unwrap()[index];
    assert!(born > 0.0);
    assert!(later < born, "{later} >= {born}");
}

#[test]
fn age_counts_survived_generations() {
    let mut c = ready(9, 9, ExecutionMode::Inline);
    c.activate_preset(&Age::default().preset());
    place(&mut c, &BLINKER, (3, 4));

    step_n(&mut c, 4).unwrap();
    let centre = c.dims().index(4, 4).unwrap();
    assert_eq!(c.channels().get(AGE).unwrap()[centre], 4.0);
    assert_ne!(c.cell_color(4, 4).unwrap().unwrap(), Rgb::WHITE);
    assert_eq!(c.cell_color(0, 0).unwrap().unwrap(), Rgb::BLACK);
}

#[test]
fn sediment_accumulates_where_cells_die() {
    let mut c = ready(9, 9, ExecutionMode::Inline);
    c.activate_preset(&Sediment::default().preset());
    place(&mut c, &BLINKER, (3, 4));

    step_n(&mut c, 2).unwrap();
    let end = c.dims().index(3, 4).unwrap();
    let sediment = c.channels().get(SEDIMENT).unwrap();
    assert!(sediment[end] > 0.0);
    assert_eq!(sediment.iter().filter(|&&s| s > 0.0).count(), 4);
}

#[test]
fn toroidal_preset_switches_topology() {
    let mut c = ready(6, 6, ExecutionMode::Inline);
    let wrap = toroidal();
    c.activate_preset(&wrap);
    assert_eq!(c.topology(), Topology::Toroidal);
    c.deactivate_preset(&wrap);
    assert_eq!(c.topology(), Topology::Bounded);
}

#[test]
fn every_catalog_preset_runs_and_detaches() {
    for preset in catalog() {
        let mut c = ready(12, 12, ExecutionMode::Threaded);
        c.randomize(0.35);
        c.activate_preset(&preset);
        step_n(&mut c, 5).unwrap_or_else(|e| panic!("{}: {e}", preset.name()));
        for y in 0..12 {
            for x in 0..12 {
                c.cell_color(x, y).unwrap().unwrap();
            }
        }
        for channel in preset.channels() {
            assert!(c.channels().contains(channel), "{}", preset.name());
        }

        c.deactivate_preset(&preset);
        assert!(c.rules().is_empty(), "{}", preset.name());
        step_n(&mut c, 1).unwrap();
    }
}

#[test]
fn presets_are_found_by_name() {
    assert_eq!(by_name("heat").unwrap().name(), "heat");
    assert!(by_name("lava").is_none());
}
