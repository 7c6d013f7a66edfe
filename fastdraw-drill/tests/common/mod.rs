#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use fastdraw_core::{
    Color, Dimension, Feedback, FontSpec, HitGate, Host, RegionKey, TargetKey, TargetPlacement,
};
use fastdraw_drill::{DrillConfig, RoundController};
use fastdraw_timing::{MonotonicClock, Scheduler};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::runtime::Handle;
use tokio::time::Instant;

pub type Controller = RoundController<MonotonicClock, StdRng>;

pub const OFF: Color = Color::rgb(90, 90, 90);
pub const ON: Color = Color::CRIMSON;

#[derive(Default)]
struct Recorded {
    next_target: u64,
    live: Vec<TargetKey>,
    region_fill: HashMap<RegionKey, Color>,
    fills: Vec<Color>,
    texts: Vec<String>,
    highlights: Vec<Option<Color>>,
    detection: Vec<bool>,
}

/// In-memory stand-in for the rendering and sensing side
pub struct RecordingHost {
    has_light: bool,
    next_light_fill: Mutex<Color>,
    rec: Mutex<Recorded>,
}

impl RecordingHost {
    pub fn new(has_light: bool) -> Arc<Self> {
        Arc::new(Self {
            has_light,
            next_light_fill: Mutex::new(OFF),
            rec: Mutex::new(Recorded::default()),
        })
    }

    pub fn set_next_light_fill(&self, color: Color) {
        *self.next_light_fill.lock().unwrap() = color;
    }

    /// Simulates the shooter deleting the current target.
    pub fn remove_current(&self) -> Option<TargetKey> {
        let mut rec = self.rec.lock().unwrap();
        let target = rec.live.pop()?;
        rec.region_fill.retain(|r, _| r.target != target);
        Some(target)
    }

    pub fn current_target(&self) -> Option<TargetKey> {
        self.rec.lock().unwrap().live.last().copied()
    }

    pub fn current_light_fill(&self) -> Option<Color> {
        let rec = self.rec.lock().unwrap();
        let target = *rec.live.last()?;
        rec.region_fill
            .get(&RegionKey { target, index: 0 })
            .copied()
    }

    pub fn placements(&self) -> u64 {
        self.rec.lock().unwrap().next_target
    }

    pub fn fills(&self) -> Vec<Color> {
        self.rec.lock().unwrap().fills.clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.rec.lock().unwrap().texts.clone()
    }

    pub fn highlights(&self) -> Vec<Option<Color>> {
        self.rec.lock().unwrap().highlights.clone()
    }

    pub fn detection_enabled(&self) -> bool {
        self.rec
            .lock()
            .unwrap()
            .detection
            .last()
            .copied()
            .unwrap_or(false)
    }
}

impl TargetPlacement for RecordingHost {
    fn place_target(&self, _name: &str, _x: f64, _y: f64) -> Option<TargetKey> {
        let fill = *self.next_light_fill.lock().unwrap();
        let mut rec = self.rec.lock().unwrap();
        rec.next_target += 1;
        let target = TargetKey(rec.next_target);
        rec.live.push(target);
        if self.has_light {
            rec.region_fill.insert(RegionKey { target, index: 0 }, fill);
        }
        Some(target)
    }

    fn dimensions(&self, _target: TargetKey) -> Option<Dimension> {
        Some(Dimension {
            width: 300.0,
            height: 500.0,
        })
    }

    fn find_region_by_tag(&self, target: TargetKey, key: &str, value: &str) -> Option<RegionKey> {
        let rec = self.rec.lock().unwrap();
        let region = RegionKey { target, index: 0 };
        (key == "subtarget" && value == "light" && rec.region_fill.contains_key(&region))
            .then_some(region)
    }

    fn fill(&self, region: RegionKey) -> Option<Color> {
        self.rec.lock().unwrap().region_fill.get(&region).copied()
    }

    fn set_fill(&self, region: RegionKey, color: Color) -> bool {
        let mut rec = self.rec.lock().unwrap();
        match rec.region_fill.get_mut(&region) {
            Some(fill) => {
                *fill = color;
                rec.fills.push(color);
                true
            }
            None => false,
        }
    }
}

impl Feedback for RecordingHost {
    fn display_text(&self, text: &str, _x: f64, _y: f64, _fg: Color, _bg: Color, _font: &FontSpec) {
        self.rec.lock().unwrap().texts.push(text.to_string());
    }

    fn set_row_highlight(&self, color: Option<Color>) {
        self.rec.lock().unwrap().highlights.push(color);
    }
}

impl HitGate for RecordingHost {
    fn enable_hit_detection(&self, enabled: bool) {
        self.rec.lock().unwrap().detection.push(enabled);
    }
}

/// Arming after exactly two seconds keeps timelines predictable.
pub fn fixed_config() -> DrillConfig {
    DrillConfig {
        arming_delay_secs: (2, 2),
        ..DrillConfig::default()
    }
}

pub fn drill(config: DrillConfig, host: &Arc<RecordingHost>) -> Controller {
    RoundController::new(
        config,
        Host::from_shared(host.clone()),
        Scheduler::new(Handle::current()),
        MonotonicClock::new(),
        StdRng::seed_from_u64(11),
    )
    .unwrap()
}

/// Sleeps until `ms` after `t0`.
pub async fn at(t0: Instant, ms: u64) {
    tokio::time::sleep_until(t0 + Duration::from_millis(ms)).await;
}

// Default timeline from start() at t=0 with a 2 s arming delay:
// on 10000, off 10700, on 11400, off 12100, on 12800, off 13500, armed 15500.
pub const FIRST_ON: u64 = 10_000;
pub const LAST_OFF: u64 = 13_500;
pub const ARMED: u64 = 15_500;
