use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("arming delay range is empty: {min}s > {max}s")]
    EmptyArmingRange { min: u64, max: u64 },
    #[error("blinks_per_cycle must be at least 1")]
    NoBlinks,
    #[error("blink_interval_ms must be non-zero")]
    ZeroBlinkInterval,
    #[error("invalid config file: {0}")]
    Parse(String),
}
