pub mod clock;
pub mod error;
pub mod pool;
pub mod scheduler;

pub use clock::{Clock, MonotonicClock};
pub use error::{PoolError, SchedulerError};
pub use pool::{PoolConfig, WorkerPool};
pub use scheduler::{ScheduledTask, Scheduler, SchedulerState};
