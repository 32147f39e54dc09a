use std::time::Duration;

/// Shortest interval the sweeper will tick at
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Configuration for a store and its background sweeper
///
/// # Example
///
/// ```rust
/// use ephemeral_core::StoreConfig;
/// use std::time::Duration;
///
/// let config = StoreConfig::default()
///     .with_sweep_interval(Duration::from_millis(500))
///     .with_expiration_logs(true);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Interval between sweeper passes (default: 1 second)
    pub sweep_interval: Duration,
    /// Whether the sweeper writes a record for each eviction (default: false)
    pub log_expirations: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_secs(1),
            log_expirations: false,
        }
    }
}

impl StoreConfig {
    /// Creates a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sweep interval
    ///
    /// This determines how often the background task scans for expired
    /// entries. Intervals below [`MIN_SWEEP_INTERVAL`] are raised to it.
    ///
    /// # Arguments
    ///
    /// * `interval` - The duration between sweeper passes
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval.max(MIN_SWEEP_INTERVAL);
        self
    }

    /// Enables or disables eviction records from the sweeper
    pub fn with_expiration_logs(mut self, enabled: bool) -> Self {
        self.log_expirations = enabled;
        self
    }
}
