//! Name-keyed rule storage and deterministic application.

use std::sync::Arc;

use indexmap::IndexMap;
use lifegrid_core::{is_alive, Dims, EngineError, Rgb, RuleError, RuleKind};

use crate::channel::ChannelRegistry;
use crate::rule::{CellChange, ColorRule, GridView, StepRule, TransitionRule};

/// Three independent rule namespaces: ordered transition rules, ordered
/// step rules, and at most one color rule.
///
/// Adding under an existing name replaces the entry in place, so its
/// position in the application order is unchanged. Removal shifts later
/// entries down, preserving their relative order.
#[derive(Default, Clone)]
pub struct RuleRegistry {
    transitions: IndexMap<String, Arc<dyn TransitionRule>>,
    steps: IndexMap<String, Arc<dyn StepRule>>,
    color: Option<(String, Arc<dyn ColorRule>)>,
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("transitions", &self.transitions.keys().collect::<Vec<_>>())
            .field("steps", &self.steps.keys().collect::<Vec<_>>())
            .field("color", &self.color_name())
            .finish()
    }
}

impl RuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // ── transition rules ───────────────────────────────────────────

    /// Register or replace a transition rule.
    ///
    /// Returns `true` if an existing rule was replaced.
    pub fn add_transition(&mut self, name: impl Into<String>, rule: Arc<dyn TransitionRule>) -> bool {
        self.transitions.insert(name.into(), rule).is_some()
    }

    /// Remove a transition rule. No-op (returns `false`) if absent.
    pub fn remove_transition(&mut self, name: &str) -> bool {
        self.transitions.shift_remove(name).is_some()
    }

    /// Transition rule names in application order.
    pub fn transition_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.transitions.keys().map(String::as_str)
    }

    // ── step rules ─────────────────────────────────────────────────

    /// Register or replace a step rule.
    ///
    /// Returns `true` if an existing rule was replaced.
    pub fn add_step(&mut self, name: impl Into<String>, rule: Arc<dyn StepRule>) -> bool {
        self.steps.insert(name.into(), rule).is_some()
    }

    /// Remove a step rule. No-op (returns `false`) if absent.
    pub fn remove_step(&mut self, name: &str) -> bool {
        self.steps.shift_remove(name).is_some()
    }

    /// Step rule names in application order.
    pub fn step_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.steps.keys().map(String::as_str)
    }

    // ── color rule ─────────────────────────────────────────────────

    /// Install the color rule, silently replacing any previous one.
    pub fn set_color(&mut self, name: impl Into<String>, rule: Arc<dyn ColorRule>) {
        self.color = Some((name.into(), rule));
    }

    /// Remove the color rule, returning to the default black/white mapping.
    pub fn clear_color(&mut self) {
        self.color = None;
    }

    /// The active color rule, if any.
    pub fn color(&self) -> Option<&Arc<dyn ColorRule>> {
        self.color.as_ref().map(|(_, rule)| rule)
    }

    /// Name of the active color rule, if any.
    pub fn color_name(&self) -> Option<&str> {
        self.color.as_ref().map(|(name, _)| name.as_str())
    }

    /// Whether no rule of any kind is registered.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty() && self.steps.is_empty() && self.color.is_none()
    }

    // ── application ────────────────────────────────────────────────

    /// Apply every transition rule, in registration order, once per
    /// changed index.
    ///
    /// Stops at the first failure. Channels written by rules that ran
    /// before the failure keep their updates.
    pub fn apply_transitions(
        &self,
        changes: &[u32],
        state: &[u8],
        channels: &mut ChannelRegistry,
        dims: Dims,
    ) -> Result<(), EngineError> {
        if changes.is_empty() || dims.cols == 0 {
            return Ok(());
        }
        for (name, rule) in &self.transitions {
            for &index in changes {
                let index = index as usize;
                let change = CellChange {
                    index,
                    x: index % dims.cols,
                    y: index / dims.cols,
                    value: state[index],
                };
                rule.apply(&change, channels, dims)
                    .map_err(|source| rule_failed(RuleKind::Transition, name, source))?;
            }
        }
        Ok(())
    }

    /// Apply every step rule once, in registration order.
    pub fn apply_steps(
        &self,
        view: &GridView<'_>,
        channels: &mut ChannelRegistry,
    ) -> Result<(), EngineError> {
        for (name, rule) in &self.steps {
            rule.apply(view, channels)
                .map_err(|source| rule_failed(RuleKind::Step, name, source))?;
        }
        Ok(())
    }

    /// Colour of the cell at `index` under the active color rule.
    ///
    /// Without a color rule, live cells are white and dead cells black.
    pub fn evaluate_color(
        &self,
        index: usize,
        view: &GridView<'_>,
        channels: &ChannelRegistry,
    ) -> Result<Rgb, EngineError> {
        match &self.color {
            Some((name, rule)) => rule
                .color(index, view, channels)
                .map_err(|source| rule_failed(RuleKind::Color, name, source)),
            None => Ok(if is_alive(view.state[index]) {
                Rgb::WHITE
            } else {
                Rgb::BLACK
            }),
        }
    }
}

fn rule_failed(kind: RuleKind, name: &str, source: RuleError) -> EngineError {
    tracing::warn!(%kind, rule = name, error = %source, "rule execution failed");
    EngineError::RuleFailed {
        kind,
        name: name.to_string(),
        source,
    }
}
