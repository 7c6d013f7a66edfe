use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use fastdraw_core::{
    Color, FontSpec, Host, LightSignal, RoundResult, RoundState, SessionSummary, TargetKey,
};
use fastdraw_timing::{Clock, Scheduler};
use rand::Rng;

use crate::binding::{LIGHT_ON_COLOR, LightBinding};
use crate::DrillConfig;

const SCORE_TEXT_POS: (f64, f64) = (25.0, 25.0);

/// Timer callbacks the drill schedules on itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tick {
    LightOn,
    LightOff,
    Arm,
}

/// Everything that can move the drill. Hosts reach these only through
/// `RoundController`; ticks come from the drill's own scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DrillEvent {
    Start,
    Pause,
    Resume,
    Reset,
    Destroy,
    Hit { present: bool },
    TargetRemoved,
    /// A timer firing, tagged with the epoch it was scheduled in
    Tick { epoch: u64, tick: Tick },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrillSnapshot {
    pub state: RoundState,
    pub blink_count: u32,
    pub light: LightSignal,
    pub light_bound: bool,
    pub row_highlight: bool,
    pub epoch: u64,
    pub rounds_scored: usize,
}

pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Drill state and every transition on it.
///
/// Lives behind one mutex; entry points and timer callbacks all go through
/// `handle_event`, so each transition is applied whole. Cancelling bumps
/// `epoch`, and a tick from an older epoch is dropped without effect.
pub(crate) struct RoundMachine<C, R>
where
    C: Clock,
    R: Rng,
{
    config: DrillConfig,
    clock: C,
    rng: R,
    state: RoundState,
    host: Host,
    scheduler: Scheduler,
    binding: Option<LightBinding>,
    lit: bool,
    stopwatch_start: Option<C::Timestamp>,
    row_highlight: bool,
    epoch: u64,
    results: Vec<RoundResult>,
    this: Weak<Mutex<Self>>,
}

impl<C, R> RoundMachine<C, R>
where
    C: Clock<Timestamp = u64>,
    R: Rng + Send + 'static,
{
    pub(crate) fn shared(
        config: DrillConfig,
        host: Host,
        scheduler: Scheduler,
        clock: C,
        rng: R,
    ) -> Arc<Mutex<Self>> {
        Arc::new_cyclic(|this| {
            Mutex::new(Self {
                config,
                clock,
                rng,
                state: RoundState::Idle,
                host,
                scheduler,
                binding: None,
                lit: false,
                stopwatch_start: None,
                row_highlight: false,
                epoch: 0,
                results: Vec::new(),
                this: this.clone(),
            })
        })
    }

    /// Returns whether the event changed anything.
    pub(crate) fn handle_event(&mut self, event: DrillEvent) -> bool {
        match (self.state, event) {
            (state, _) if state.is_terminal() => false,

            (_, DrillEvent::Tick { epoch, tick }) if epoch != self.epoch => {
                tracing::trace!(?tick, epoch, current = self.epoch, "stale tick dropped");
                false
            }

            (RoundState::Idle, DrillEvent::Start) => {
                self.start(self.config.start_delay());
                true
            }
            (RoundState::Idle, DrillEvent::Resume) => {
                self.start(self.config.resume_delay());
                true
            }

            (RoundState::Paused, DrillEvent::Pause) => false,
            (_, DrillEvent::Pause) => {
                self.pause();
                true
            }

            (RoundState::Paused, DrillEvent::Resume) => {
                self.resume();
                true
            }

            (_, DrillEvent::Reset) => {
                self.reset();
                true
            }

            (_, DrillEvent::Destroy) => {
                self.destroy();
                true
            }

            (state, DrillEvent::Hit { present: true }) if state.accepts_hits() => {
                self.score();
                true
            }
            (state, DrillEvent::Hit { present: true }) => {
                tracing::debug!(?state, "hit outside armed window ignored");
                false
            }

            (state, DrillEvent::TargetRemoved) if state.is_active() => {
                self.rebind();
                true
            }
            (RoundState::Paused, DrillEvent::TargetRemoved) => {
                // re-acquired on resume
                self.binding = None;
                true
            }

            (RoundState::Blinking(_) | RoundState::Scored, DrillEvent::Tick { tick: Tick::LightOn, .. })
                if !self.lit =>
            {
                self.light_on();
                true
            }
            (RoundState::Blinking(n), DrillEvent::Tick { tick: Tick::LightOff, .. }) if self.lit => {
                self.light_off(n);
                true
            }
            (RoundState::CooldownPending, DrillEvent::Tick { tick: Tick::Arm, .. }) => {
                self.arm();
                true
            }

            (state, event) => {
                tracing::trace!(?state, ?event, "event not handled");
                false
            }
        }
    }

    fn start(&mut self, delay: Duration) {
        tracing::info!(?delay, "drill started");
        self.bind();
        self.host.feedback.set_row_highlight(Some(Color::LIGHT_GRAY));
        self.host.hits.enable_hit_detection(false);
        self.enter_blinking(delay);
    }

    fn pause(&mut self) {
        tracing::info!(state = ?self.state, "drill paused");
        self.halt();
        self.state = RoundState::Paused;
    }

    fn resume(&mut self) {
        tracing::info!("drill resumed");
        self.scheduler = self.scheduler.fresh();
        if self.binding.is_none() {
            self.bind();
        }
        self.enter_blinking(self.config.resume_delay());
    }

    fn reset(&mut self) {
        tracing::info!(state = ?self.state, "drill reset");
        self.halt();
        self.scheduler = self.scheduler.fresh();
        if self.binding.is_none() {
            self.bind();
        }
        self.enter_blinking(self.config.start_delay());
    }

    fn destroy(&mut self) {
        tracing::info!(rounds = self.results.len(), "drill destroyed");
        self.scheduler.cancel_all();
        self.epoch += 1;
        self.host.hits.enable_hit_detection(false);
        self.stopwatch_start = None;
        self.state = RoundState::Stopped;
    }

    /// Cancels outstanding work and puts the light and sensing at rest.
    fn halt(&mut self) {
        self.scheduler.cancel_all();
        self.epoch += 1;
        self.host.hits.enable_hit_detection(false);
        self.set_light(false);
        self.stopwatch_start = None;
    }

    fn enter_blinking(&mut self, delay: Duration) {
        self.state = RoundState::Blinking(0);
        self.schedule(delay, Tick::LightOn);
    }

    fn light_on(&mut self) {
        if self.state == RoundState::Scored {
            self.state = RoundState::Blinking(0);
        }
        self.set_light(true);
        self.schedule(self.config.blink_interval(), Tick::LightOff);
    }

    fn light_off(&mut self, completed: u32) {
        self.set_light(false);
        let completed = completed + 1;
        if completed < self.config.blinks_per_cycle {
            self.state = RoundState::Blinking(completed);
            self.schedule(self.config.blink_interval(), Tick::LightOn);
        } else {
            let delay = self.config.draw_arming_delay(&mut self.rng);
            tracing::debug!(?delay, "blinks done, arming pending");
            self.state = RoundState::CooldownPending;
            self.schedule(delay, Tick::Arm);
        }
    }

    fn arm(&mut self) {
        self.set_light(true);
        self.host.hits.enable_hit_detection(true);
        self.stopwatch_start = Some(self.clock.now());
        self.state = RoundState::Armed;
        tracing::debug!("armed");
    }

    fn score(&mut self) {
        let Some(start) = self.stopwatch_start.take() else {
            return;
        };
        let now = self.clock.now();
        let result = RoundResult {
            round: self.results.len(),
            reaction_time_ns: self.clock.elapsed(start).as_nanos() as u64,
            timestamp_ns: now,
        };
        tracing::info!(round = result.round, ms = result.reaction_ms(), "hit scored");

        let (x, y) = SCORE_TEXT_POS;
        self.host.feedback.display_text(
            &result.display_text(),
            x,
            y,
            Color::BLACK,
            Color::RED,
            &FontSpec::default(),
        );
        let highlight = self.row_highlight.then_some(Color::LIGHT_GRAY);
        self.host.feedback.set_row_highlight(highlight);
        self.row_highlight = !self.row_highlight;

        self.set_light(false);
        self.host.hits.enable_hit_detection(false);
        self.results.push(result);
        self.state = RoundState::Scored;
        self.schedule(self.config.score_cooldown(), Tick::LightOn);
    }

    fn bind(&mut self) {
        self.binding = LightBinding::acquire(self.host.targets.as_ref(), &self.config);
    }

    fn rebind(&mut self) {
        tracing::info!(state = ?self.state, "light target removed, re-placing");
        self.bind();
        if self.lit {
            self.set_light(true);
        }
    }

    fn set_light(&mut self, lit: bool) {
        self.lit = lit;
        if let Some(binding) = &self.binding {
            binding.set_lit(self.host.targets.as_ref(), lit);
        }
    }

    fn schedule(&mut self, delay: Duration, tick: Tick) {
        let this = self.this.clone();
        let epoch = self.epoch;
        let scheduled = self.scheduler.schedule_after(delay, move || {
            if let Some(machine) = this.upgrade() {
                lock(&machine).handle_event(DrillEvent::Tick { epoch, tick });
            }
        });
        match scheduled {
            Ok(task) => tracing::trace!(?tick, due = ?task.due, epoch, "tick scheduled"),
            Err(e) => {
                tracing::error!(?tick, "{e}");
                if cfg!(debug_assertions) {
                    panic!("{tick:?} scheduled on an exhausted scheduler");
                }
            }
        }
    }

    #[cfg(test)]
    fn state(&self) -> RoundState {
        self.state
    }

    #[cfg(test)]
    fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_bound_to(&self, target: TargetKey) -> bool {
        self.binding.is_some_and(|b| b.target == target)
    }

    pub fn light(&self) -> LightSignal {
        match &self.binding {
            Some(b) => b.signal(self.lit),
            None => LightSignal {
                lit: self.lit,
                ..LightSignal::new(Color::default(), LIGHT_ON_COLOR)
            },
        }
    }

    pub fn snapshot(&self) -> DrillSnapshot {
        DrillSnapshot {
            state: self.state,
            blink_count: self.state.blink_count(),
            light: self.light(),
            light_bound: self.binding.is_some_and(|b| b.region.is_some()),
            row_highlight: self.row_highlight,
            epoch: self.epoch,
            rounds_scored: self.results.len(),
        }
    }

    pub fn results(&self) -> &[RoundResult] {
        &self.results
    }

    pub fn summary(&self) -> Option<SessionSummary> {
        SessionSummary::from_results(&self.results)
    }
}
