pub mod color;
pub mod host;
pub mod result;
pub mod state;

pub use color::Color;
pub use host::{
    Dimension, Feedback, FontSpec, HitGate, Host, RegionKey, TargetChange, TargetKey,
    TargetPlacement,
};
pub use result::{RoundResult, SessionSummary};
pub use state::{LightSignal, RoundState};
