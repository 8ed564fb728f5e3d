//! Rayon thread pool sizing for optimizer and comparison runs.

use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuilder};

/// A sized rayon pool, built once and reused by every [install](WorkerPool::install).
/// 0 workers means the global rayon pool.
#[derive(Debug, Clone, Default)]
pub struct WorkerPool {
    workers: usize,
    pool: Option<Arc<ThreadPool>>,
}

impl WorkerPool {
    /// Build the pool up front. A pool that cannot be built falls back to the
    /// global pool.
    pub fn with_workers(workers: usize) -> Self {
        if workers == 0 {
            return Self::default();
        }
        match ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => Self {
                workers,
                pool: Some(Arc::new(pool)),
            },
            Err(err) => {
                tracing::warn!(workers, error = %err, "thread pool unavailable, using global pool");
                Self { workers, pool: None }
            }
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Whether work runs on a dedicated pool rather than the global one.
    pub fn is_dedicated(&self) -> bool {
        self.pool.is_some()
    }

    pub fn install<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_pool_uses_requested_threads() {
        let pool = WorkerPool::with_workers(2);
        assert!(pool.is_dedicated());
        assert_eq!(pool.workers(), 2);
        assert_eq!(pool.install(rayon::current_num_threads), 2);
    }

    #[test]
    fn installs_reuse_one_pool() {
        let pool = WorkerPool::with_workers(2);
        let threads = || rayon::current_thread_index().map(|_| rayon::current_num_threads());
        let first = pool.install(threads);
        let copy = pool.clone();
        let second = copy.install(threads);
        assert_eq!(first, Some(2));
        assert_eq!(second, Some(2));
        let (Some(a), Some(b)) = (&pool.pool, &copy.pool) else {
            panic!("dedicated pool expected");
        };
        assert!(Arc::ptr_eq(a, b));
    }

    #[test]
    fn zero_workers_runs_on_global_pool() {
        let pool = WorkerPool::default();
        assert!(!pool.is_dedicated());
        assert_eq!(pool.install(|| 5 * 5), 25);
    }
}
