//! Toroidal: wraps grid edges while active.

use lifegrid_rules::Preset;

/// Build the `toroidal` preset: no channels or rules, only hooks that
/// turn wrapping on at activation and off at deactivation.
pub fn toroidal() -> Preset {
    Preset::builder("toroidal")
        .on_activate(|host| host.set_wrap_edges(true))
        .on_deactivate(|host| host.set_wrap_edges(false))
        .build()
}
