use crate::error::Error;

/// Number of slots a table starts with when no capacity is given.
pub const DEFAULT_INITIAL_CAPACITY: usize = 8;

/// Factor the slot count is multiplied by on every resize.
pub const DEFAULT_GROWTH_FACTOR: usize = 2;

cfg_if::cfg_if! {
    if #[cfg(feature = "density-ninety")] {
        /// Fill ratio at which an insertion triggers a resize.
        pub const DEFAULT_LOAD_FACTOR: f64 = 0.9;
    } else if #[cfg(feature = "density-fifty")] {
        /// Fill ratio at which an insertion triggers a resize.
        pub const DEFAULT_LOAD_FACTOR: f64 = 0.5;
    } else {
        /// Fill ratio at which an insertion triggers a resize.
        pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;
    }
}

/// Sizing parameters for a [`HashTable`](crate::HashTable) or
/// [`HashMap`](crate::HashMap).
///
/// The load factor default is picked at compile time through the `density-*`
/// cargo features; every parameter can be overridden per table.
///
/// # Examples
///
/// ```rust
/// use linear_probe::Config;
///
/// let config = Config::default()
///     .with_initial_capacity(16)
///     .with_growth_factor(4)
///     .with_load_factor(0.5);
/// assert!(config.validate().is_ok());
///
/// let bad = Config::default().with_growth_factor(1);
/// assert!(bad.validate().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Slot count of a freshly created table. Must be at least 1.
    pub initial_capacity: usize,
    /// Multiplier applied to the slot count on each resize. Must be at
    /// least 2.
    pub growth_factor: usize,
    /// Ratio of occupied slots to capacity at which an insertion triggers a
    /// resize. Must be in `(0.0, 1.0]`.
    pub load_factor: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            growth_factor: DEFAULT_GROWTH_FACTOR,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

impl Config {
    /// Sets the initial slot count.
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Sets the growth factor.
    pub fn with_growth_factor(mut self, growth_factor: usize) -> Self {
        self.growth_factor = growth_factor;
        self
    }

    /// Sets the load factor threshold.
    pub fn with_load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    /// Checks that every parameter is in range.
    pub fn validate(&self) -> Result<(), Error> {
        if self.initial_capacity == 0 {
            return Err(Error::InvalidConfig("initial_capacity must be at least 1"));
        }
        if self.growth_factor < 2 {
            return Err(Error::InvalidConfig("growth_factor must be at least 2"));
        }
        // Written so that NaN fails as well.
        if !(self.load_factor > 0.0 && self.load_factor <= 1.0) {
            return Err(Error::InvalidConfig("load_factor must be in (0.0, 1.0]"));
        }
        Ok(())
    }

    /// Number of occupied slots at which a table with `capacity` slots must
    /// grow. Always in `1..=capacity`.
    #[inline(always)]
    pub(crate) fn max_populated(&self, capacity: usize) -> usize {
        let exact = capacity as f64 * self.load_factor;
        let mut limit = exact as usize;
        if (limit as f64) < exact {
            limit += 1;
        }
        limit.clamp(1, capacity.max(1))
    }
}
