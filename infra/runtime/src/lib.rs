//! # Runtime
//!
//! Tokio runtime profiles for the configurator.
//!
//! Every browsing context (the host page and the preview frame) is
//! single-threaded and cooperative, so the default profile is a current-thread
//! runtime. Tools that host several contexts in one process may use the
//! multi-thread `shared` profile instead; the contexts themselves still never
//! share state except through the frame bridge.
//!
//! ## Profiles
//! * **Single context**: current-thread scheduler, timers and I/O enabled.
//! * **Shared**: multi-thread scheduler sized from available parallelism.
//!
//! ## Example
//!
//! ```rust,ignore
//! #[haven_runtime::main(single_context)]
//! async fn main() -> anyhow::Result<()> {
//!     Ok(())
//! }
//! ```

pub use anyhow::Result;
pub use haven_derive::main;

use anyhow::anyhow;
use std::{thread::available_parallelism, time::Duration};
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

/// Worker count used when parallelism cannot be detected.
const DEFAULT_WORKER_THREADS: usize = 2;
/// Upper bound for the shared profile; a handful of contexts never needs more.
const MAX_WORKER_THREADS: usize = 64;
const THREAD_KEEP_ALIVE: Duration = Duration::from_secs(30);

/// Scheduler flavour backing a [`RuntimeConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheduler {
    /// Everything runs on the calling thread.
    CurrentThread,
    /// A work-stealing pool with the given worker count.
    MultiThread { workers: usize },
}

/// Configuration for a context runtime.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub scheduler: Scheduler,
    pub thread_name: String,
    pub thread_keep_alive: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::single_context()
    }
}

impl RuntimeConfig {
    /// One cooperative thread, matching a single browsing context.
    #[must_use]
    pub fn single_context() -> Self {
        Self {
            scheduler: Scheduler::CurrentThread,
            thread_name: "haven-context".to_owned(),
            thread_keep_alive: THREAD_KEEP_ALIVE,
        }
    }

    /// Multi-thread pool for tools that drive several contexts at once.
    #[must_use]
    pub fn shared() -> Self {
        let workers = available_parallelism()
            .map(std::num::NonZero::get)
            .unwrap_or(DEFAULT_WORKER_THREADS)
            .min(MAX_WORKER_THREADS);
        Self {
            scheduler: Scheduler::MultiThread { workers },
            thread_name: "haven-shared".to_owned(),
            thread_keep_alive: THREAD_KEEP_ALIVE,
        }
    }

    #[must_use = "Customize the number of worker threads for the shared profile"]
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.scheduler =
            Scheduler::MultiThread { workers: threads.clamp(1, MAX_WORKER_THREADS) };
        self
    }

    #[must_use = "Customize the thread name"]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.trim().is_empty() {
            self.thread_name = name;
        }
        self
    }
}

/// Builds a runtime for the given profile with timers and I/O enabled.
///
/// # Errors
///
/// Returns an [`anyhow::Error`] if the OS refuses to create the runtime threads.
///
/// # Examples
///
/// ```rust
/// use haven_runtime::{build_runtime, RuntimeConfig};
///
/// let rt = build_runtime(&RuntimeConfig::single_context())?;
/// let answer = rt.block_on(async { 42 });
/// assert_eq!(answer, 42);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn build_runtime(config: &RuntimeConfig) -> Result<Runtime> {
    debug!(config = ?config, "Building context runtime");

    let mut builder = match config.scheduler {
        Scheduler::CurrentThread => Builder::new_current_thread(),
        Scheduler::MultiThread { workers } => {
            let mut builder = Builder::new_multi_thread();
            builder.worker_threads(workers.clamp(1, MAX_WORKER_THREADS));
            builder
        },
    };

    builder
        .thread_name(&config.thread_name)
        .thread_keep_alive(config.thread_keep_alive)
        .enable_all();

    builder.build().map_err(|e| anyhow!("Failed to initialize runtime: {e}"))
}
