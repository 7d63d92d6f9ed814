//! Parallelism settings for the per-variable fan-out.

use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

/// Controls whether variables are analysed on rayon's thread pool.
///
/// Results are identical either way; sequential mode is mainly useful when
/// debugging or when comparing timings.
///
/// ```rust
/// use concordance::config::ParallelConfig;
///
/// let config = ParallelConfig {
///     enabled: true,
///     max_concurrency: Some(4),
/// };
/// assert_eq!(config.effective_concurrency(), 4);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParallelConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Worker threads for the global pool. `None` uses every available core.
    #[serde(default)]
    pub max_concurrency: Option<usize>,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_concurrency: None,
        }
    }
}

impl ParallelConfig {
    pub fn sequential() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    pub fn effective_concurrency(&self) -> usize {
        self.max_concurrency.unwrap_or_else(num_cpus)
    }
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1)
}

/// Configure rayon's global pool once at startup. A pool that is already
/// built is left alone.
pub fn configure_thread_pool(config: &ParallelConfig) {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = config.max_concurrency.filter(|&n| n > 0) {
        builder = builder.num_threads(threads);
    }
    if let Err(e) = builder.build_global() {
        tracing::debug!("Thread pool already configured: {}", e);
    }
}
