//! Bounded worker pool for per-item tasks and their fan-out.
//!
//! Stage threads are not part of the pool. They hand work to it with
//! [`rayon::ThreadPool::in_place_scope`], which keeps the stage's own read
//! loop on the stage thread and waits for every spawned task at scope end.

use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

/// Pool shared by every stage of one pipeline
pub type SharedPool = Arc<ThreadPool>;

/// Default worker count: available parallelism, capped at 8.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
        .min(8)
}

/// Build the worker pool (at least one thread).
pub fn build_pool(workers: usize) -> Result<SharedPool, ThreadPoolBuildError> {
    let workers = workers.max(1);
    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("sigline-worker-{i}"))
        .build()?;
    log::debug!("worker pool ready: {workers} threads");
    Ok(Arc::new(pool))
}
