pub mod binding;
pub mod config;
pub mod controller;
pub mod error;
mod machine;

pub use binding::LightBinding;
pub use config::DrillConfig;
pub use controller::RoundController;
pub use error::ConfigError;
pub use machine::DrillSnapshot;
