use serde::{Deserialize, Serialize};
use tokio::runtime::{Builder, Handle, Runtime};

use crate::{PoolError, Scheduler};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub worker_threads: usize,
    pub thread_name: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            worker_threads: 4,
            thread_name: "cowboy-fast-draw".to_string(),
        }
    }
}

/// Background threads that run scheduled callbacks.
///
/// Must be dropped outside of any async context.
pub struct WorkerPool {
    runtime: Runtime,
    config: PoolConfig,
}

impl WorkerPool {
    pub fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(config.worker_threads.max(1))
            .thread_name(config.thread_name.clone())
            .enable_time()
            .build()?;
        tracing::debug!(
            workers = config.worker_threads,
            name = %config.thread_name,
            "worker pool started"
        );
        Ok(Self { runtime, config })
    }

    pub fn handle(&self) -> Handle {
        self.runtime.handle().clone()
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// A new, active scheduler bound to this pool
    pub fn scheduler(&self) -> Scheduler {
        Scheduler::new(self.handle())
    }
}
