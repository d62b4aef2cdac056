//! Configuration types for walking and scanning

/// Number of candidate files inspected together when running in parallel.
pub const DEFAULT_BATCH_SIZE: usize = 256;

/// Configuration for directory walking behavior.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Descend at most this many directory levels below the root.
    /// `Some(0)` looks at the root's own files only.
    pub max_depth: Option<usize>,
    /// Entry names (exact or glob) to skip, files and directories alike.
    pub ignore_patterns: Vec<String>,
}

/// Configuration for a full scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub walker: WalkerConfig,
    /// Number of parallel workers for metadata inspection.
    /// 0 = auto-detect (use all available cores)
    /// 1 = sequential (no parallelism)
    /// N = use N worker threads
    pub parallel_workers: usize,
    /// Candidates per parallel batch. Reporting order is kept across batches.
    pub batch_size: usize,
}

impl ScanConfig {
    pub fn is_sequential(&self) -> bool {
        self.parallel_workers == 1
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            walker: WalkerConfig::default(),
            parallel_workers: 1,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}
