//! Named bundles of channels, rules, and activation hooks.

use std::fmt;
use std::sync::Arc;

use crate::channel::ChannelRegistry;
use crate::registry::RuleRegistry;
use crate::rule::{ColorRule, StepRule, TransitionRule};

/// The engine surface a preset may touch when switched on or off.
pub trait PresetHost {
    /// The channel registry presets ensure their channels in.
    fn channels_mut(&mut self) -> &mut ChannelRegistry;
    /// The rule registry presets register into.
    fn rules_mut(&mut self) -> &mut RuleRegistry;
    /// Toggle toroidal topology.
    fn set_wrap_edges(&mut self, wrap: bool);
}

/// Activation or deactivation callback.
pub type PresetHook = Arc<dyn Fn(&mut dyn PresetHost) + Send + Sync>;

/// A switchable unit of extension behaviour.
///
/// Activation ensures the channels, registers the rules under
/// deterministic names derived from the preset name, then runs the
/// activation hook. Deactivation removes those same rules and runs the
/// deactivation hook. Channels are left in place so their accumulated
/// values survive a later reactivation.
#[derive(Clone)]
pub struct Preset {
    name: String,
    channels: Vec<String>,
    transition: Option<Arc<dyn TransitionRule>>,
    step: Option<Arc<dyn StepRule>>,
    color: Option<Arc<dyn ColorRule>>,
    on_activate: Option<PresetHook>,
    on_deactivate: Option<PresetHook>,
}

impl fmt::Debug for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preset")
            .field("name", &self.name)
            .field("channels", &self.channels)
            .field("transition", &self.transition.is_some())
            .field("step", &self.step.is_some())
            .field("color", &self.color.is_some())
            .finish_non_exhaustive()
    }
}

impl Preset {
    /// Start building a preset called `name`.
    pub fn builder(name: impl Into<String>) -> PresetBuilder {
        PresetBuilder {
            preset: Preset {
                name: name.into(),
                channels: Vec::new(),
                transition: None,
                step: None,
                color: None,
                on_activate: None,
                on_deactivate: None,
            },
        }
    }

    /// Preset name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Channels ensured on activation.
    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    /// Name the transition rule is registered under.
    pub fn transition_name(&self) -> String {
        format!("{}:transition", self.name)
    }

    /// Name the step rule is registered under.
    pub fn step_name(&self) -> String {
        format!("{}:step", self.name)
    }

    /// Name the color rule is registered under.
    pub fn color_name(&self) -> &str {
        &self.name
    }

    /// Switch the preset on.
    pub fn activate(&self, host: &mut dyn PresetHost) {
        for channel in &self.channels {
            host.channels_mut().ensure(channel);
        }
        let rules = host.rules_mut();
        if let Some(rule) = &self.transition {
            rules.add_transition(self.transition_name(), Arc::clone(rule));
        }
        if let Some(rule) = &self.step {
            rules.add_step(self.step_name(), Arc::clone(rule));
        }
        if let Some(rule) = &self.color {
            rules.set_color(self.color_name(), Arc::clone(rule));
        }
        if let Some(hook) = &self.on_activate {
            hook(host);
        }
        tracing::debug!(preset = %self.name, "preset activated");
    }

    /// Switch the preset off.
    ///
    /// The color rule is cleared only if it is still this preset's;
    /// another preset activated since keeps its colouring.
    pub fn deactivate(&self, host: &mut dyn PresetHost) {
        let rules = host.rules_mut();
        if self.transition.is_some() {
            rules.remove_transition(&self.transition_name());
        }
        if self.step.is_some() {
            rules.remove_step(&self.step_name());
        }
        if self.color.is_some() && rules.color_name() == Some(self.color_name()) {
            rules.clear_color();
        }
        if let Some(hook) = &self.on_deactivate {
            hook(host);
        }
        tracing::debug!(preset = %self.name, "preset deactivated");
    }
}

/// Builder for [`Preset`].
pub struct PresetBuilder {
    preset: Preset,
}

impl PresetBuilder {
    /// Add a channel to ensure on activation.
    pub fn channel(mut self, name: impl Into<String>) -> Self {
        self.preset.channels.push(name.into());
        self
    }

    /// Set the transition rule.
    pub fn transition(mut self, rule: impl TransitionRule) -> Self {
        self.preset.transition = Some(Arc::new(rule));
        self
    }

    /// Set the step rule.
    pub fn step(mut self, rule: impl StepRule) -> Self {
        self.preset.step = Some(Arc::new(rule));
        self
    }

    /// Set the color rule.
    pub fn color(mut self, rule: impl ColorRule) -> Self {
        self.preset.color = Some(Arc::new(rule));
        self
    }

    /// Hook run after the rules are registered.
    pub fn on_activate(mut self, hook: impl Fn(&mut dyn PresetHost) + Send + Sync + 'static) -> Self {
        self.preset.on_activate = Some(Arc::new(hook));
        self
    }

    /// Hook run after the rules are removed.
    pub fn on_deactivate(
        mut self,
        hook: impl Fn(&mut dyn PresetHost) + Send + Sync + 'static,
    ) -> Self {
        self.preset.on_deactivate = Some(Arc::new(hook));
        self
    }

    /// Finish building.
    pub fn build(self) -> Preset {
        self.preset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{color_fn, step_fn, transition_fn};
    use lifegrid_core::{Dims, Rgb};

    struct Host {
        channels: ChannelRegistry,
        rules: RuleRegistry,
        wrap: bool,
    }

    impl Host {
        fn new() -> Self {
            Self {
                channels: ChannelRegistry::new(Dims::new(4, 4)),
                rules: RuleRegistry::new(),
                wrap: false,
            }
        }
    }

    impl PresetHost for Host {
        fn channels_mut(&mut self) -> &mut ChannelRegistry {
            &mut self.channels
        }
        fn rules_mut(&mut self) -> &mut RuleRegistry {
            &mut self.rules
        }
        fn set_wrap_edges(&mut self, wrap: bool) {
            self.wrap = wrap;
        }
    }

    fn full_preset(name: &str) -> Preset {
        Preset::builder(name)
            .channel("glow")
            .channel("trail")
            .transition(transition_fn(|_, _, _| Ok(())))
            .step(step_fn(|_, _| Ok(())))
            .color(color_fn(|_, _, _| Ok(Rgb::BLACK)))
            .build()
    }

    #[test]
    fn activate_registers_deterministic_names() {
        let mut host = Host::new();
        let preset = full_preset("glow");
        preset.activate(&mut host);

        assert!(host.channels.contains("glow"));
        assert!(host.channels.contains("trail"));
        assert_eq!(
            host.rules.transition_names().collect::<Vec<_>>(),
            vec!["glow:transition"]
        );
        assert_eq!(host.rules.step_names().collect::<Vec<_>>(), vec!["glow:step"]);
        assert_eq!(host.rules.color_name(), Some("glow"));
    }

    #[test]
    fn reactivation_does_not_stack() {
        let mut host = Host::new();
        let preset = full_preset("glow");
        preset.activate(&mut host);
        preset.activate(&mut host);
        assert_eq!(host.rules.transition_names().count(), 1);
        assert_eq!(host.rules.step_names().count(), 1);
    }

    #[test]
    fn deactivate_removes_rules_keeps_channels() {
        let mut host = Host::new();
        let preset = full_preset("glow");
        preset.activate(&mut host);
        host.channels.get_mut("glow").unwrap()[3] = 0.7;
        preset.deactivate(&mut host);

        assert!(host.rules.is_empty());
        assert_eq!(host.channels.get("glow").unwrap()[3], 0.7);
    }

    #[test]
    fn deactivate_leaves_foreign_color_rule() {
        let mut host = Host::new();
        let a = full_preset("a");
        let b = full_preset("b");
        a.activate(&mut host);
        b.activate(&mut host);
        a.deactivate(&mut host);
        assert_eq!(host.rules.color_name(), Some("b"));
    }

    #[test]
    fn hooks_toggle_wrap() {
        let mut host = Host::new();
        let preset = Preset::builder("wrap")
            .on_activate(|h| h.set_wrap_edges(true))
            .on_deactivate(|h| h.set_wrap_edges(false))
            .build();
        preset.activate(&mut host);
        assert!(host.wrap);
        preset.deactivate(&mut host);
        assert!(!host.wrap);
        assert!(host.rules.is_empty());
    }
}
