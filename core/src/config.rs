use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::warn;

use crate::error::Result;

/// Environment variable read by [`PoolConfig::from_env`].
pub const THREADS_ENV: &str = "GRAPH_TOOLS_THREADS";

/// Worker pool settings for the parallel transformations.
///
/// Transformations run on whatever rayon pool is current. Without a
/// configured pool that is the global one; to bound parallelism, build a
/// pool here and call the transformations inside [`ThreadPool::install`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolConfig {
    /// Worker count. `None` lets rayon pick (one per logical CPU).
    pub num_threads: Option<usize>,
}

impl PoolConfig {
    pub fn with_threads(num_threads: usize) -> Self {
        Self {
            num_threads: Some(num_threads).filter(|&n| n > 0),
        }
    }

    /// Read the worker count from `GRAPH_TOOLS_THREADS`.
    ///
    /// Unset, empty or `0` means the rayon default. Unparsable values are
    /// logged and treated the same way.
    pub fn from_env() -> Self {
        match std::env::var(THREADS_ENV) {
            Ok(raw) => Self::parse_threads(&raw),
            Err(_) => Self::default(),
        }
    }

    fn parse_threads(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Self::default();
        }
        match raw.parse::<usize>() {
            Ok(n) => Self::with_threads(n),
            Err(err) => {
                warn!(value = raw, error = %err, "ignoring invalid {}", THREADS_ENV);
                Self::default()
            }
        }
    }

    /// Build a dedicated worker pool with these settings.
    pub fn build_pool(&self) -> Result<ThreadPool> {
        let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("graph-tools-{}", i));
        if let Some(n) = self.num_threads {
            builder = builder.num_threads(n);
        }
        Ok(builder.build()?)
    }
}
