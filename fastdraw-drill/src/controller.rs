use std::sync::{Arc, Mutex};

use fastdraw_core::{Host, LightSignal, RoundResult, SessionSummary, TargetChange, TargetKey};
use fastdraw_timing::{Clock, Scheduler};
use rand::Rng;

use crate::machine::{DrillEvent, RoundMachine, lock};
use crate::{ConfigError, DrillConfig, DrillSnapshot};

/// Entry points of the drill for its host.
///
/// Cheap to clone; every clone drives the same drill. Calls may come from any
/// thread, including the shot detection thread. Collaborators are invoked
/// while the drill's lock is held and must not call back into the controller.
pub struct RoundController<C, R>
where
    C: Clock,
    R: Rng,
{
    machine: Arc<Mutex<RoundMachine<C, R>>>,
}

impl<C, R> Clone for RoundController<C, R>
where
    C: Clock,
    R: Rng,
{
    fn clone(&self) -> Self {
        Self {
            machine: Arc::clone(&self.machine),
        }
    }
}

impl<C, R> RoundController<C, R>
where
    C: Clock<Timestamp = u64>,
    R: Rng + Send + 'static,
{
    pub fn new(
        config: DrillConfig,
        host: Host,
        scheduler: Scheduler,
        clock: C,
        rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            machine: RoundMachine::shared(config, host, scheduler, clock, rng),
        })
    }

    pub fn start(&self) -> bool {
        self.handle_event(DrillEvent::Start)
    }

    pub fn pause(&self) -> bool {
        self.handle_event(DrillEvent::Pause)
    }

    pub fn resume(&self) -> bool {
        self.handle_event(DrillEvent::Resume)
    }

    pub fn reset(&self) -> bool {
        self.handle_event(DrillEvent::Reset)
    }

    pub fn destroy(&self) -> bool {
        self.handle_event(DrillEvent::Destroy)
    }

    /// One call per detected shot; `hit_present` tells whether it hit the target.
    pub fn report_hit(&self, hit_present: bool) -> bool {
        self.handle_event(DrillEvent::Hit {
            present: hit_present,
        })
    }

    pub fn notify_target_removed(&self) -> bool {
        self.handle_event(DrillEvent::TargetRemoved)
    }

    /// Host-wide target notifications; only removal of the light target matters.
    pub fn target_update(&self, target: TargetKey, change: TargetChange) -> bool {
        let mut machine = lock(&self.machine);
        if change == TargetChange::Removed && machine.is_bound_to(target) {
            machine.handle_event(DrillEvent::TargetRemoved)
        } else {
            false
        }
    }

    fn handle_event(&self, event: DrillEvent) -> bool {
        lock(&self.machine).handle_event(event)
    }

    pub fn snapshot(&self) -> DrillSnapshot {
        lock(&self.machine).snapshot()
    }

    pub fn light(&self) -> LightSignal {
        lock(&self.machine).light()
    }

    pub fn results(&self) -> Vec<RoundResult> {
        lock(&self.machine).results().to_vec()
    }

    pub fn summary(&self) -> Option<SessionSummary> {
        lock(&self.machine).summary()
    }
}
