//! Interfaces the drill consumes from the application hosting it.
//!
//! Targets and regions are owned by the host. The drill only keeps the keys
//! below and resolves them on every use, so a target the host removed turns
//! into a lookup miss instead of a dangling reference.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetKey(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionKey {
    pub target: TargetKey,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetChange {
    Added,
    Removed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size: f32,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "default".to_string(),
            size: 40.0,
        }
    }
}

/// Places targets in the play area and exposes their tagged regions.
pub trait TargetPlacement: Send + Sync {
    /// Centering within the arena is the host's job.
    fn place_target(&self, name: &str, offset_x: f64, offset_y: f64) -> Option<TargetKey>;
    fn dimensions(&self, target: TargetKey) -> Option<Dimension>;
    fn find_region_by_tag(&self, target: TargetKey, key: &str, value: &str) -> Option<RegionKey>;
    fn fill(&self, region: RegionKey) -> Option<Color>;
    /// Returns false when the region no longer exists.
    fn set_fill(&self, region: RegionKey, color: Color) -> bool;
}

/// On-screen feedback for the shooter
pub trait Feedback: Send + Sync {
    fn display_text(&self, text: &str, x: f64, y: f64, fg: Color, bg: Color, font: &FontSpec);
    fn set_row_highlight(&self, color: Option<Color>);
}

/// Gate on the external shot detection pipeline
pub trait HitGate: Send + Sync {
    fn enable_hit_detection(&self, enabled: bool);
}

/// Collaborators handed to the drill at construction.
#[derive(Clone)]
pub struct Host {
    pub targets: Arc<dyn TargetPlacement>,
    pub feedback: Arc<dyn Feedback>,
    pub hits: Arc<dyn HitGate>,
}

impl Host {
    pub fn new(
        targets: Arc<dyn TargetPlacement>,
        feedback: Arc<dyn Feedback>,
        hits: Arc<dyn HitGate>,
    ) -> Self {
        Self {
            targets,
            feedback,
            hits,
        }
    }

    /// Convenience for hosts that implement every collaborator on one type.
    pub fn from_shared<H>(host: Arc<H>) -> Self
    where
        H: TargetPlacement + Feedback + HitGate + 'static,
    {
        Self {
            targets: host.clone(),
            feedback: host.clone(),
            hits: host,
        }
    }
}
