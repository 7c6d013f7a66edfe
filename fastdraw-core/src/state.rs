use serde::{Deserialize, Serialize};

use crate::Color;

/// Where the drill currently is in its round cycle
#[derive(Copy, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    Idle,
    /// Blink phase with the number of completed on/off cycles
    Blinking(u32),
    CooldownPending,
    Armed,
    Scored,
    Paused,
    Stopped,
}

impl Default for RoundState {
    fn default() -> Self {
        RoundState::Idle
    }
}

impl RoundState {
    /// Only the armed window gives a hit any scoring effect.
    pub fn accepts_hits(&self) -> bool {
        matches!(self, Self::Armed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// True once started and until paused or stopped.
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle | Self::Paused | Self::Stopped)
    }

    pub fn blink_count(&self) -> u32 {
        match self {
            Self::Blinking(n) => *n,
            _ => 0,
        }
    }
}

/// The light as seen by renderers
#[derive(Copy, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightSignal {
    pub lit: bool,
    pub on_color: Color,
    pub off_color: Color,
}

impl LightSignal {
    pub fn new(off_color: Color, on_color: Color) -> Self {
        Self {
            lit: false,
            on_color,
            off_color,
        }
    }

    pub fn color(&self) -> Color {
        if self.lit { self.on_color } else { self.off_color }
    }
}
