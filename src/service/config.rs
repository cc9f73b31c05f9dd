//! Service configuration

use std::time::Duration;

/// Smallest tick interval accepted; tokio intervals reject a zero period
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Longest initial delay accepted
pub const MAX_INITIAL_DELAY: Duration = Duration::from_secs(86400 * 365 * 30);

/// Default prefix of the string view of the counter
pub const DEFAULT_PREFIX: &str = "ab";

/// Default suffix of the string view of the counter
pub const DEFAULT_SUFFIX: &str = "cd";

/// Broadcast service configuration options
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Period between two ticks
    pub tick_interval: Duration,

    /// Delay before the first tick (zero fires it right after start)
    pub initial_delay: Duration,

    /// Increment step the counter starts with
    pub initial_increment: i64,

    /// Prepended to the counter in string updates
    pub prefix: String,

    /// Appended to the counter in string updates
    pub suffix: String,

    /// Buffer size of the control channel handed out by `bind()`
    pub control_capacity: usize,

    /// Update buffer size for client handles created via the service
    pub client_capacity: usize,

    /// How long `stop()` waits, in total, for background tasks before aborting them
    pub stop_grace_period: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            initial_delay: Duration::ZERO,
            initial_increment: 1,
            prefix: DEFAULT_PREFIX.to_string(),
            suffix: DEFAULT_SUFFIX.to_string(),
            control_capacity: 64,
            client_capacity: 64,
            stop_grace_period: Duration::from_secs(1),
        }
    }
}

impl ServiceConfig {
    /// Set the tick interval
    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval.max(MIN_TICK_INTERVAL);
        self
    }

    /// Set the delay before the first tick
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay.min(MAX_INITIAL_DELAY);
        self
    }

    /// Set the starting increment step
    pub fn initial_increment(mut self, step: i64) -> Self {
        self.initial_increment = step;
        self
    }

    /// Set the string update prefix and suffix
    pub fn affixes(mut self, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self.suffix = suffix.into();
        self
    }

    /// Set the control channel capacity
    pub fn control_capacity(mut self, capacity: usize) -> Self {
        self.control_capacity = capacity.max(1);
        self
    }

    /// Set the client update buffer capacity
    pub fn client_capacity(mut self, capacity: usize) -> Self {
        self.client_capacity = capacity.max(1);
        self
    }

    /// Set the stop grace period
    pub fn stop_grace_period(mut self, grace: Duration) -> Self {
        self.stop_grace_period = grace;
        self
    }

    /// String view of a counter value
    pub fn format_value(&self, counter: i64) -> String {
        format!("{}{}{}", self.prefix, counter, self.suffix)
    }

    /// Tick period actually used by the tick loop
    pub(crate) fn effective_tick_interval(&self) -> Duration {
        self.tick_interval.max(MIN_TICK_INTERVAL)
    }
}
