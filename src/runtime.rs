//! Runtime abstraction layer for worker jobs
//!
//! Tile fetch-and-decode and the world-size probe are blocking file and CPU
//! work that must stay off the tick thread. This module provides a
//! runtime-agnostic interface for handing such jobs to a worker context, so
//! the engine can run on Tokio, on plain OS threads, or inline in tests.

/// A boxed unit of blocking work
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// A trait for spawning blocking jobs (object-safe version)
pub trait AsyncSpawner: Send + Sync + 'static {
    /// Run `job` on a worker context. The call must not wait for the job.
    fn spawn_blocking_boxed(&self, job: Job);
}

/// Convenience function for spawning with type safety
pub fn spawn_blocking<F>(spawner: &dyn AsyncSpawner, job: F)
where
    F: FnOnce() + Send + 'static,
{
    spawner.spawn_blocking_boxed(Box::new(job));
}

/// Default spawner implementations
pub mod spawners {
    use super::*;

    #[cfg(feature = "tokio-runtime")]
    pub mod tokio_impl {
        use super::*;
        use crate::{Error, Result};
        use ::tokio::runtime::Handle;

        /// Tokio-based spawner; jobs land on the blocking thread pool
        #[derive(Debug, Clone)]
        pub struct TokioSpawner {
            handle: Handle,
        }

        impl TokioSpawner {
            pub fn new(handle: Handle) -> Self {
                Self { handle }
            }

            /// Bind to the runtime the caller is currently running inside.
            pub fn current() -> Result<Self> {
                Handle::try_current()
                    .map(Self::new)
                    .map_err(|e| Error::Runtime(e.to_string()))
            }
        }

        impl AsyncSpawner for TokioSpawner {
            fn spawn_blocking_boxed(&self, job: Job) {
                // Completion is reported through the job's own channel.
                let _ = self.handle.spawn_blocking(job);
            }
        }
    }

    /// One detached OS thread per job
    #[derive(Debug, Clone, Copy, Default)]
    pub struct ThreadSpawner;

    impl AsyncSpawner for ThreadSpawner {
        fn spawn_blocking_boxed(&self, job: Job) {
            if let Err(e) = std::thread::Builder::new()
                .name("tilescope-worker".to_string())
                .spawn(job)
            {
                log::warn!("failed to spawn worker thread: {}", e);
            }
        }
    }

    /// Runs every job synchronously on the calling thread.
    ///
    /// Useful for deterministic tests and single-threaded hosts; results still
    /// travel through the same channels so the tick logic is unchanged.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct InlineSpawner;

    impl AsyncSpawner for InlineSpawner {
        fn spawn_blocking_boxed(&self, job: Job) {
            job();
        }
    }
}
