use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("scheduler was cancelled and must be replaced before accepting work")]
    Exhausted,
}

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("failed to build worker runtime: {0}")]
    Build(#[from] std::io::Error),
}
