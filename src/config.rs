use crate::error::Error;
use crate::error::Result;

/// Tombstone ratio above which a removal triggers compaction.
pub const TOMBSTONE_THRESHOLD: f64 = 0.25;

/// Construction parameters for a [`HashTable`](crate::HashTable).
///
/// # Examples
///
/// ```rust
/// use tab_hash::Config;
///
/// let config = Config::default()
///     .with_capacity(16)
///     .with_grow_threshold(0.5)
///     .with_shrink_threshold(0.125);
/// assert!(config.validate().is_ok());
///
/// assert!(Config::default().with_capacity(0).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Number of slots allocated up front. Must be positive.
    pub initial_capacity: usize,
    /// Load factor above which an insert doubles the table. In `(0, 1]`.
    pub grow_threshold: f64,
    /// Load factor below which a removal halves the table. In `[0, 1)`.
    pub shrink_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: 4,
            grow_threshold: 0.75,
            shrink_threshold: 0.25,
        }
    }
}

impl Config {
    /// Sets the initial slot count.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Sets the load factor that triggers growth.
    pub fn with_grow_threshold(mut self, threshold: f64) -> Self {
        self.grow_threshold = threshold;
        self
    }

    /// Sets the load factor that triggers shrinking.
    pub fn with_shrink_threshold(mut self, threshold: f64) -> Self {
        self.shrink_threshold = threshold;
        self
    }

    /// Checks the parameters.
    ///
    /// The two thresholds are checked independently; a shrink threshold at or
    /// above the grow threshold is accepted. NaN thresholds fail the range
    /// checks.
    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        if !(self.grow_threshold > 0.0 && self.grow_threshold <= 1.0) {
            return Err(Error::GrowThreshold(self.grow_threshold));
        }
        if !(self.shrink_threshold >= 0.0 && self.shrink_threshold < 1.0) {
            return Err(Error::ShrinkThreshold(self.shrink_threshold));
        }
        Ok(())
    }
}
