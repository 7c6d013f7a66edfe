use fastdraw_core::{Color, LightSignal, RegionKey, TargetKey, TargetPlacement};

use crate::DrillConfig;

pub const LIGHT_ON_COLOR: Color = Color::CRIMSON;

/// Association between the drill and the light region of a placed target.
///
/// Holds keys only. Every fill goes back through `TargetPlacement`, so once
/// the host removes the target the writes simply miss.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightBinding {
    pub target: TargetKey,
    /// `None` when the target carries no light region
    pub region: Option<RegionKey>,
    off_color: Color,
}

impl LightBinding {
    /// Places the target and captures the light's off-color from its current fill.
    pub fn acquire(targets: &dyn TargetPlacement, config: &DrillConfig) -> Option<Self> {
        let (x, y) = config.placement_offset;
        let Some(target) = targets.place_target(&config.target_name, x, y) else {
            tracing::warn!(name = %config.target_name, "target placement failed");
            return None;
        };
        if let Some(d) = targets.dimensions(target) {
            tracing::debug!(?target, width = d.width, height = d.height, "target placed");
        }

        let (key, value) = &config.light_tag;
        let region = targets.find_region_by_tag(target, key, value);
        let off_color = match region {
            Some(r) => targets.fill(r).unwrap_or_default(),
            None => {
                tracing::warn!(?target, %key, %value, "no light region on target, light disabled");
                Color::default()
            }
        };

        Some(Self {
            target,
            region,
            off_color,
        })
    }

    pub fn off_color(&self) -> Color {
        self.off_color
    }

    pub fn signal(&self, lit: bool) -> LightSignal {
        LightSignal {
            lit,
            ..LightSignal::new(self.off_color, LIGHT_ON_COLOR)
        }
    }

    /// No-op without a light region.
    pub fn set_lit(&self, targets: &dyn TargetPlacement, lit: bool) -> bool {
        let Some(region) = self.region else {
            return false;
        };
        let color = self.signal(lit).color();
        let applied = targets.set_fill(region, color);
        if !applied {
            tracing::debug!(?region, "light region gone, fill skipped");
        }
        applied
    }
}
