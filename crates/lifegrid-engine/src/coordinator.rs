//! The coordinator: sole owner of canonical state.
//!
//! ```text
//!                  Ready (matching epoch)
//!  Uninitialized ─────────────────────────► Ready ◄──────┐
//!        ▲                                    │           │ result (committed
//!        │ resize                             │ step      │ or discarded)
//!        └──────────── any phase              ▼           │
//!                                            Busy ────────┘
//! ```
//!
//! At most one step is ever outstanding. A step requested while `Busy`
//! or `Uninitialized` sets a single pending flag, so any number of
//! requests collapse into one deferred computation. Every step carries
//! the current [`Epoch`]; `reset`, `randomize`, `load_state`, and
//! `resize` advance it, and a result tagged with an older epoch is
//! dropped without touching state.

use std::fmt;
use std::mem;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use lifegrid_core::{
    is_alive, resize_preserving, Dims, EngineError, Epoch, Generation, LifeRule, Rgb, Topology,
    ALIVE, DEAD,
};
use lifegrid_rules::{
    ChannelRegistry, ColorRule, GridView, Preset, PresetHost, RuleRegistry, StepRule,
    TransitionRule,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::{ConfigError, EngineConfig, ExecutionMode};
use crate::context::{ComputeContext, InlineContext, ThreadedContext};
use crate::events::{EngineEvent, Observers, SubscriptionId};
use crate::metrics::EngineMetrics;
use crate::playback::Playback;
use crate::protocol::{FromWorker, ToWorker};

/// Coordinator lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the computation context to confirm its buffers.
    Uninitialized,
    /// Idle; a step request dispatches immediately.
    Ready,
    /// One step is outstanding.
    Busy,
}

/// Owns the grid, channels, rules, and counters, and schedules steps on
/// a [`ComputeContext`].
///
/// All mutation happens on the thread that owns the coordinator. Results
/// from the context are applied only when the owner calls
/// [`pump`](Self::pump), [`pump_blocking`](Self::pump_blocking),
/// [`tick`](Self::tick), or [`run_for`](Self::run_for).
pub struct Coordinator {
    dims: Dims,
    topology: Topology,
    life_rule: LifeRule,
    state: Vec<u8>,
    generation: Generation,
    alive: usize,

    epoch: Epoch,
    phase: Phase,
    /// Epoch of the last `Init`/`Resize`, until its `Ready` arrives.
    awaiting_ready: Option<Epoch>,
    pending: bool,
    in_flight: bool,
    /// Edits made while a step was in flight, replayed onto its result.
    edits: Vec<(usize, u8)>,
    spare_state: Vec<u8>,
    spare_changes: Vec<u32>,

    channels: ChannelRegistry,
    rules: RuleRegistry,
    observers: Observers,
    playback: Playback,
    idle_sleep: Duration,
    metrics: EngineMetrics,
    rng: ChaCha8Rng,

    context: Box<dyn ComputeContext>,
    unavailable: Option<String>,
}

impl fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("dims", &self.dims)
            .field("topology", &self.topology)
            .field("life_rule", &self.life_rule)
            .field("generation", &self.generation)
            .field("alive", &self.alive)
            .field("epoch", &self.epoch)
            .field("phase", &self.phase)
            .field("pending", &self.pending)
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

impl Coordinator {
    /// Build a coordinator with the context selected by `config.execution`.
    ///
    /// The grid starts all-dead in [`Phase::Uninitialized`]; it becomes
    /// [`Phase::Ready`] once the first pump sees the context's reply.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let context: Box<dyn ComputeContext> = match config.execution {
            ExecutionMode::Threaded => Box::new(ThreadedContext::spawn()?),
            ExecutionMode::Inline => Box::new(InlineContext::new()),
        };
        Self::with_context(config, context)
    }

    /// Build a coordinator around a caller-supplied context.
    pub fn with_context(
        config: EngineConfig,
        context: Box<dyn ComputeContext>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let dims = config.dims();
        let state = vec![DEAD; dims.cell_count()];
        let epoch = Epoch::default();
        let init = ToWorker::Init {
            epoch,
            dims,
            state: state.clone(),
            topology: config.topology,
            rule: config.life_rule,
        };
        let mut coordinator = Self {
            dims,
            topology: config.topology,
            life_rule: config.life_rule,
            state,
            generation: Generation::default(),
            alive: 0,
            epoch,
            phase: Phase::Uninitialized,
            awaiting_ready: Some(epoch),
            pending: false,
            in_flight: false,
            edits: Vec::new(),
            spare_state: Vec::with_capacity(dims.cell_count()),
            spare_changes: Vec::with_capacity(dims.cell_count()),
            channels: ChannelRegistry::new(dims),
            rules: RuleRegistry::new(),
            observers: Observers::default(),
            playback: Playback::new(Duration::from_millis(config.playback.interval_ms)),
            idle_sleep: Duration::from_millis(config.playback.idle_sleep_ms),
            metrics: EngineMetrics::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            context,
            unavailable: None,
        };
        coordinator.notify(init);
        tracing::debug!(%dims, topology = ?config.topology, rule = %config.life_rule, "coordinator created");
        Ok(coordinator)
    }

    // ── read views ─────────────────────────────────────────────────

    /// Canonical row-major state.
    pub fn state(&self) -> &[u8] {
        &self.state
    }

    /// Grid dimensions.
    pub fn dims(&self) -> Dims {
        self.dims
    }

    /// Active topology.
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Active birth/survival rule.
    pub fn life_rule(&self) -> LifeRule {
        self.life_rule
    }

    /// Generations committed since the last reset, randomize, load, or resize.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Live cells in the canonical state.
    pub fn alive_count(&self) -> usize {
        self.alive
    }

    /// Current epoch.
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether a deferred step is waiting for the current one to finish.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Ready with nothing outstanding or deferred.
    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Ready && !self.pending && !self.in_flight
    }

    /// Reason the computation context was lost, if it was.
    pub fn unavailable_reason(&self) -> Option<&str> {
        self.unavailable.as_deref()
    }

    /// Channel registry.
    pub fn channels(&self) -> &ChannelRegistry {
        &self.channels
    }

    /// Mutable channel registry.
    pub fn channels_mut(&mut self) -> &mut ChannelRegistry {
        &mut self.channels
    }

    /// Rule registry.
    pub fn rules(&self) -> &RuleRegistry {
        &self.rules
    }

    /// Mutable rule registry, for registering shared `Arc` rules.
    pub fn rules_mut(&mut self) -> &mut RuleRegistry {
        &mut self.rules
    }

    /// Active color rule, if any.
    pub fn color_rule(&self) -> Option<&Arc<dyn ColorRule>> {
        self.rules.color()
    }

    /// Performance counters.
    pub fn metrics(&self) -> &EngineMetrics {
        &self.metrics
    }

    /// Playback timer state.
    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    /// Value of the cell at `(x, y)`, or `None` if out of range.
    pub fn get_cell(&self, x: usize, y: usize) -> Option<u8> {
        self.dims.index(x, y).map(|i| self.state[i])
    }

    /// Colour of the cell at `(x, y)` under the active color rule, or
    /// `None` if out of range.
    pub fn cell_color(&self, x: usize, y: usize) -> Option<Result<Rgb, EngineError>> {
        let index = self.dims.index(x, y)?;
        let view = GridView {
            state: &self.state,
            dims: self.dims,
            topology: self.topology,
        };
        Some(self.rules.evaluate_color(index, &view, &self.channels))
    }

    // ── edits ──────────────────────────────────────────────────────

    /// Set one cell. Out-of-range coordinates are ignored.
    ///
    /// Takes effect on canonical state and the alive count immediately,
    /// in any phase. An edit made while a step is in flight is replayed
    /// onto that step's result.
    pub fn set_cell(&mut self, x: usize, y: usize, value: u8) {
        let Some(index) = self.dims.index(x, y) else {
            return;
        };
        let old = mem::replace(&mut self.state[index], value);
        match (is_alive(old), is_alive(value)) {
            (false, true) => self.alive += 1,
            (true, false) => self.alive -= 1,
            _ => {}
        }
        if self.in_flight {
            self.edits.push((index, value));
        }
        self.notify(ToWorker::SetCell { index, value });
    }

    /// Resize the grid, preserving the overlapping top-left sub-rectangle
    /// of the state and of every channel.
    ///
    /// Generation resets to 0 and the alive count is recomputed from the
    /// preserved cells. The coordinator stays [`Phase::Uninitialized`]
    /// until the context confirms; step requests made meanwhile are
    /// deferred. Callers are expected to have clamped the size already;
    /// only a cell count beyond `u32::MAX` is rejected here.
    pub fn resize(&mut self, cols: usize, rows: usize) -> Result<(), EngineError> {
        let dims = Dims::new(cols, rows);
        if dims.checked_cell_count().is_none() {
            return Err(EngineError::InvalidDimensions { cols, rows });
        }
        self.state = resize_preserving(&self.state, self.dims, dims);
        self.channels.resize(dims);
        self.dims = dims;
        self.generation = Generation::default();
        self.alive = count_alive(&self.state);
        self.advance_epoch();
        self.phase = Phase::Uninitialized;
        self.awaiting_ready = Some(self.epoch);
        tracing::debug!(%dims, epoch = %self.epoch, "grid resized");
        let state = self.state.clone();
        self.send(ToWorker::Resize {
            epoch: self.epoch,
            dims,
            state,
        })
    }

    /// Kill every cell and zero every channel.
    pub fn reset(&mut self) {
        self.state.fill(DEAD);
        self.channels.clear();
        self.restart("reset");
    }

    /// Set each cell alive with probability `density` (clamped to
    /// `[0, 1]`, NaN treated as 0) and zero every channel.
    pub fn randomize(&mut self, density: f64) {
        let p = if density.is_nan() {
            0.0
        } else {
            density.clamp(0.0, 1.0)
        };
        for cell in self.state.iter_mut() {
            *cell = if self.rng.random_bool(p) { ALIVE } else { DEAD };
        }
        self.channels.clear();
        self.restart("randomize");
    }

    /// Replace the whole state. Channels are kept.
    pub fn load_state(&mut self, state: Vec<u8>) -> Result<(), EngineError> {
        if state.len() != self.dims.cell_count() {
            return Err(EngineError::InvalidDimensions {
                cols: self.dims.cols,
                rows: self.dims.rows,
            });
        }
        self.state = state;
        self.restart("load_state");
        Ok(())
    }

    /// Switch toroidal topology on or off.
    pub fn set_wrap_edges(&mut self, wrap: bool) {
        self.topology = Topology::from_wrap(wrap);
        self.notify(ToWorker::SetWrap(wrap));
    }

    /// Replace the birth/survival rule for subsequent steps.
    pub fn set_life_rule(&mut self, rule: LifeRule) {
        self.life_rule = rule;
        self.notify(ToWorker::SetLifeRule(rule));
    }

    fn restart(&mut self, reason: &'static str) {
        self.generation = Generation::default();
        self.alive = count_alive(&self.state);
        self.advance_epoch();
        tracing::debug!(reason, epoch = %self.epoch, alive = self.alive, "state replaced");
        let state = self.state.clone();
        self.notify(ToWorker::SetState { state });
    }

    fn advance_epoch(&mut self) {
        self.epoch = self.epoch.next();
        self.edits.clear();
    }

    // ── channels, rules, presets ───────────────────────────────────

    /// Ensure a channel exists.
    pub fn add_channel(&mut self, name: &str) {
        self.channels.ensure(name);
    }

    /// Destroy a channel. Returns `false` if absent.
    pub fn remove_channel(&mut self, name: &str) -> bool {
        self.channels.remove(name)
    }

    /// Register or replace a transition rule. Returns `true` on replace.
    pub fn add_transition_rule(
        &mut self,
        name: impl Into<String>,
        rule: impl TransitionRule,
    ) -> bool {
        self.rules.add_transition(name, Arc::new(rule))
    }

    /// Remove a transition rule. Returns `false` if absent.
    pub fn remove_transition_rule(&mut self, name: &str) -> bool {
        self.rules.remove_transition(name)
    }

    /// Register or replace a step rule. Returns `true` on replace.
    pub fn add_step_rule(&mut self, name: impl Into<String>, rule: impl StepRule) -> bool {
        self.rules.add_step(name, Arc::new(rule))
    }

    /// Remove a step rule. Returns `false` if absent.
    pub fn remove_step_rule(&mut self, name: &str) -> bool {
        self.rules.remove_step(name)
    }

    /// Install the color rule, replacing any previous one.
    pub fn set_color_rule(&mut self, name: impl Into<String>, rule: impl ColorRule) {
        self.rules.set_color(name, Arc::new(rule));
    }

    /// Return to default black/white colouring.
    pub fn clear_color_rule(&mut self) {
        self.rules.clear_color();
    }

    /// Switch a preset on.
    pub fn activate_preset(&mut self, preset: &Preset) {
        preset.activate(self);
    }

    /// Switch a preset off. Its channels are kept.
    pub fn deactivate_preset(&mut self, preset: &Preset) {
        preset.deactivate(self);
    }

    // ── events ─────────────────────────────────────────────────────

    /// Call `callback` for every subsequent event.
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&EngineEvent) + Send + 'static,
    ) -> SubscriptionId {
        self.observers.subscribe(Box::new(callback))
    }

    /// Stop delivering to `id`. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Receive every subsequent event on a channel. Dropping the
    /// receiver unsubscribes.
    pub fn subscribe_channel(&mut self) -> Receiver<EngineEvent> {
        self.observers.subscribe_channel().1
    }

    // ── stepping ───────────────────────────────────────────────────

    /// Request one generation.
    ///
    /// Dispatches immediately when [`Phase::Ready`]; otherwise sets the
    /// pending flag, which a later completion or readiness consumes.
    pub fn step(&mut self) -> Result<(), EngineError> {
        self.check_available()?;
        match self.phase {
            Phase::Ready => self.dispatch(),
            Phase::Busy | Phase::Uninitialized => {
                if self.pending {
                    self.metrics.requests_coalesced += 1;
                    tracing::trace!(phase = ?self.phase, "step request coalesced");
                } else {
                    tracing::trace!(phase = ?self.phase, "step request deferred");
                }
                self.pending = true;
                Ok(())
            }
        }
    }

    /// Process every reply the context has ready, without blocking.
    ///
    /// Returns the number of generations committed without error. A rule
    /// failure stops the pump after its generation is committed and
    /// announced; remaining replies wait for the next pump.
    pub fn pump(&mut self) -> Result<usize, EngineError> {
        self.check_available()?;
        let mut committed = 0;
        loop {
            let msg = match self.context.try_recv() {
                Ok(Some(msg)) => msg,
                Ok(None) => break,
                Err(e) => return Err(self.lose(e)),
            };
            if self.handle(msg)? {
                committed += 1;
            }
        }
        Ok(committed)
    }

    /// Wait up to `timeout` for a reply, then process everything queued.
    pub fn pump_blocking(&mut self, timeout: Duration) -> Result<usize, EngineError> {
        self.check_available()?;
        let first = match self.context.recv_timeout(timeout) {
            Ok(Some(msg)) => self.handle(msg)?,
            Ok(None) => return Ok(0),
            Err(e) => return Err(self.lose(e)),
        };
        Ok(usize::from(first) + self.pump()?)
    }

    // ── playback ───────────────────────────────────────────────────

    /// Start continuous playback, one step per `interval_ms` (zero means
    /// as fast as results arrive).
    pub fn play(&mut self, interval_ms: u64) {
        self.playback
            .play(Duration::from_millis(interval_ms), Instant::now());
    }

    /// Stop playback and drop any deferred step. A step already in
    /// flight still completes and is committed.
    pub fn pause(&mut self) {
        self.playback.pause();
        self.pending = false;
    }

    /// Change the playback interval.
    pub fn update_interval(&mut self, interval_ms: u64) {
        self.playback
            .set_interval(Duration::from_millis(interval_ms));
    }

    /// Whether playback is running.
    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    /// Pump, then request a step if playback is due and nothing is
    /// outstanding.
    pub fn tick(&mut self, now: Instant) -> Result<usize, EngineError> {
        let committed = self.pump()?;
        if self.playback.is_due(now) && self.phase == Phase::Ready && !self.pending {
            self.step()?;
            self.playback.mark_requested(now);
        }
        Ok(committed)
    }

    /// Drive the timer loop on this thread for `duration`.
    ///
    /// Blocks on the context while a step is outstanding and sleeps
    /// until the next due time otherwise. Returns the number of
    /// generations committed.
    pub fn run_for(&mut self, duration: Duration) -> Result<usize, EngineError> {
        let deadline = Instant::now() + duration;
        let mut committed = 0;
        loop {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            committed += self.tick(now)?;
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.phase {
                Phase::Busy | Phase::Uninitialized => {
                    committed += self.pump_blocking(remaining)?;
                }
                Phase::Ready => {
                    let wait = self
                        .playback
                        .until_due(Instant::now())
                        .unwrap_or(self.idle_sleep)
                        .min(remaining);
                    if !wait.is_zero() {
                        thread::sleep(wait);
                    }
                }
            }
        }
        Ok(committed)
    }

    // ── internals ──────────────────────────────────────────────────

    fn check_available(&self) -> Result<(), EngineError> {
        match &self.unavailable {
            Some(reason) => Err(EngineError::ComputationUnavailable {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Record a lost context. Later calls fail fast with the same reason.
    fn lose(&mut self, err: EngineError) -> EngineError {
        if let EngineError::ComputationUnavailable { reason } = &err {
            if self.unavailable.is_none() {
                tracing::warn!(%reason, "computation context lost");
                self.unavailable = Some(reason.clone());
                self.playback.pause();
                self.pending = false;
            }
        }
        err
    }

    fn send(&mut self, msg: ToWorker) -> Result<(), EngineError> {
        self.check_available()?;
        match self.context.send(msg) {
            Ok(()) => Ok(()),
            Err(e) => Err(self.lose(e)),
        }
    }

    /// Send without a caller to report to; a loss surfaces on the next
    /// `step` or pump.
    fn notify(&mut self, msg: ToWorker) {
        let _ = self.send(msg);
    }

    fn dispatch(&mut self) -> Result<(), EngineError> {
        let msg = ToWorker::Step {
            epoch: self.epoch,
            spare_state: mem::take(&mut self.spare_state),
            spare_changes: mem::take(&mut self.spare_changes),
        };
        self.send(msg)?;
        self.phase = Phase::Busy;
        self.in_flight = true;
        self.pending = false;
        self.metrics.steps_dispatched += 1;
        tracing::trace!(epoch = %self.epoch, "step dispatched");
        Ok(())
    }

    /// Apply one reply. Returns whether a generation was committed.
    fn handle(&mut self, msg: FromWorker) -> Result<bool, EngineError> {
        match msg {
            FromWorker::Ready { epoch } => {
                if self.awaiting_ready != Some(epoch) {
                    tracing::trace!(%epoch, "superseded ready ignored");
                    return Ok(false);
                }
                self.awaiting_ready = None;
                self.phase = Phase::Ready;
                tracing::debug!(%epoch, dims = %self.dims, "computation context ready");
                self.observers.emit(&EngineEvent::Ready {
                    epoch,
                    dims: self.dims,
                });
                if self.pending {
                    self.dispatch()?;
                }
                Ok(false)
            }
            FromWorker::Resized { epoch, state } => {
                // Canonical state was resized locally; keep the echo as a
                // spare buffer.
                tracing::trace!(%epoch, cells = state.len(), "resize confirmed");
                self.spare_state = state;
                Ok(false)
            }
            FromWorker::StepResult {
                epoch,
                state,
                changes,
                compute_us,
            } => {
                self.in_flight = false;
                if epoch != self.epoch {
                    self.metrics.results_discarded += 1;
                    tracing::debug!(
                        result_epoch = %epoch,
                        current_epoch = %self.epoch,
                        "stale step result discarded"
                    );
                    self.spare_state = state;
                    self.spare_changes = changes;
                    self.edits.clear();
                    if self.phase == Phase::Busy {
                        self.phase = Phase::Ready;
                        if self.pending {
                            self.dispatch()?;
                        }
                    }
                    return Ok(false);
                }
                let outcome = self.commit(state, changes, compute_us);
                self.phase = Phase::Ready;
                if self.pending {
                    self.dispatch()?;
                }
                outcome.map(|()| true)
            }
        }
    }

    /// Adopt a computed generation: replay in-flight edits, run rules,
    /// update counters, and announce the step.
    ///
    /// The change list handed to rules is the diff between canonical
    /// state before and after the commit. Cells edited in flight are
    /// dropped from it.
    ///
    /// State and counters are committed even when a rule fails.
    fn commit(
        &mut self,
        state: Vec<u8>,
        mut changes: Vec<u32>,
        compute_us: u64,
    ) -> Result<(), EngineError> {
        self.spare_state = mem::replace(&mut self.state, state);
        if !self.edits.is_empty() {
            // An edited cell already shows its final value, so it does
            // not flip in this commit.
            let mut edited: Vec<u32> = Vec::with_capacity(self.edits.len());
            for (index, value) in self.edits.drain(..) {
                if let Some(cell) = self.state.get_mut(index) {
                    *cell = value;
                    edited.push(index as u32);
                }
            }
            edited.sort_unstable();
            changes.retain(|i| edited.binary_search(i).is_err());
        }

        let started = Instant::now();
        let view = GridView {
            state: &self.state,
            dims: self.dims,
            topology: self.topology,
        };
        let outcome = self
            .rules
            .apply_transitions(&changes, &self.state, &mut self.channels, self.dims)
            .and_then(|()| self.rules.apply_steps(&view, &mut self.channels));
        let rules_us = started.elapsed().as_micros() as u64;

        self.generation = self.generation.next();
        self.alive = count_alive(&self.state);

        self.metrics.last_compute_us = compute_us;
        self.metrics.last_rules_us = rules_us;
        self.metrics.last_changed = changes.len();
        self.metrics.steps_committed += 1;

        let event = EngineEvent::Step {
            generation: self.generation,
            alive: self.alive,
            changed: changes.len(),
        };
        self.spare_changes = changes;
        tracing::trace!(generation = %self.generation, alive = self.alive, "generation committed");
        self.observers.emit(&event);
        outcome
    }
}

impl PresetHost for Coordinator {
    fn channels_mut(&mut self) -> &mut ChannelRegistry {
        &mut self.channels
    }

    fn rules_mut(&mut self) -> &mut RuleRegistry {
        &mut self.rules
    }

    fn set_wrap_edges(&mut self, wrap: bool) {
        Coordinator::set_wrap_edges(self, wrap);
    }
}

fn count_alive(state: &[u8]) -> usize {
    state.iter().filter(|&&v| is_alive(v)).count()
}
