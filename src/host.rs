use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use fastdraw_core::{
    Color, Dimension, Feedback, FontSpec, HitGate, RegionKey, TargetKey, TargetPlacement,
};

struct Region {
    tags: HashMap<String, String>,
    fill: Color,
}

struct PlacedTarget {
    name: String,
    position: (f64, f64),
    dimension: Dimension,
    regions: Vec<Region>,
}

/// Terminal stand-in for the projector arena.
///
/// Targets live in memory; light changes and score text go to stdout.
pub struct ConsoleHost {
    targets: Mutex<HashMap<TargetKey, PlacedTarget>>,
    next_key: Mutex<u64>,
    detecting: AtomicBool,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ConsoleHost {
    pub fn new() -> Self {
        Self {
            targets: Mutex::new(HashMap::new()),
            next_key: Mutex::new(0),
            detecting: AtomicBool::new(false),
        }
    }

    pub fn detection_enabled(&self) -> bool {
        self.detecting.load(Ordering::SeqCst)
    }

    /// Removes the most recently placed target, as a shooter deleting it would.
    pub fn remove_latest(&self) -> Option<TargetKey> {
        let mut targets = lock(&self.targets);
        let key = targets.keys().max_by_key(|k| k.0).copied()?;
        if let Some(t) = targets.remove(&key) {
            println!("[arena] removed {} at {:?}", t.name, t.position);
        }
        Some(key)
    }

    /// The CFDA #3B silhouette: a body and a light above it.
    fn three_b(name: &str, position: (f64, f64)) -> PlacedTarget {
        let tagged = |value: &str, fill: Color| Region {
            tags: HashMap::from([("subtarget".to_string(), value.to_string())]),
            fill,
        };
        PlacedTarget {
            name: name.to_string(),
            position,
            dimension: Dimension {
                width: 300.0,
                height: 520.0,
            },
            regions: vec![tagged("body", Color::BLACK), tagged("light", Color::GRAY)],
        }
    }
}

impl Default for ConsoleHost {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetPlacement for ConsoleHost {
    fn place_target(&self, name: &str, offset_x: f64, offset_y: f64) -> Option<TargetKey> {
        let key = {
            let mut next = lock(&self.next_key);
            *next += 1;
            TargetKey(*next)
        };
        lock(&self.targets).insert(key, Self::three_b(name, (offset_x, offset_y)));
        println!("[arena] placed {name} as target {}", key.0);
        Some(key)
    }

    fn dimensions(&self, target: TargetKey) -> Option<Dimension> {
        lock(&self.targets).get(&target).map(|t| t.dimension)
    }

    fn find_region_by_tag(&self, target: TargetKey, key: &str, value: &str) -> Option<RegionKey> {
        let targets = lock(&self.targets);
        let index = targets
            .get(&target)?
            .regions
            .iter()
            .position(|r| r.tags.get(key).is_some_and(|v| v == value))?;
        Some(RegionKey { target, index })
    }

    fn fill(&self, region: RegionKey) -> Option<Color> {
        lock(&self.targets)
            .get(&region.target)?
            .regions
            .get(region.index)
            .map(|r| r.fill)
    }

    fn set_fill(&self, region: RegionKey, color: Color) -> bool {
        let mut targets = lock(&self.targets);
        let Some(r) = targets
            .get_mut(&region.target)
            .and_then(|t| t.regions.get_mut(region.index))
        else {
            return false;
        };
        r.fill = color;
        let [red, green, blue, _] = color.rgba();
        println!("[light] #{red:02x}{green:02x}{blue:02x}");
        true
    }
}

impl Feedback for ConsoleHost {
    fn display_text(&self, text: &str, x: f64, y: f64, _fg: Color, _bg: Color, font: &FontSpec) {
        println!("[feed @{x},{y} {}px] {text}", font.size);
    }

    fn set_row_highlight(&self, color: Option<Color>) {
        tracing::debug!(?color, "shot timer row highlight");
    }
}

impl HitGate for ConsoleHost {
    fn enable_hit_detection(&self, enabled: bool) {
        self.detecting.store(enabled, Ordering::SeqCst);
        tracing::debug!(enabled, "shot detection");
    }
}
