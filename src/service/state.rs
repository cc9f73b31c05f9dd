//! Service state
//!
//! Counter and increment step owned by one running service instance.

/// Lifecycle status of a broadcast service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    /// Not started yet, or stopped
    Stopped,
    /// Ticking and accepting control messages
    Running,
}

/// Mutable state of a running service
///
/// Created on start and dropped on stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceState {
    /// Current counter value
    pub counter: i64,
    /// Added to the counter on every tick
    pub increment: i64,
    /// Cleared when the service stops
    pub running: bool,
}

impl ServiceState {
    /// Fresh state with a zero counter
    pub fn new(increment: i64) -> Self {
        Self {
            counter: 0,
            increment,
            running: true,
        }
    }

    /// Advance the counter by one step, wrapping on overflow
    pub fn advance(&mut self) -> i64 {
        self.counter = self.counter.wrapping_add(self.increment);
        self.counter
    }
}

impl Default for ServiceState {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = ServiceState::default();

        assert_eq!(state.counter, 0);
        assert_eq!(state.increment, 1);
        assert!(state.running);
    }

    #[test]
    fn test_advance_n_times() {
        let mut state = ServiceState::new(7);

        for _ in 0..12 {
            state.advance();
        }

        assert_eq!(state.counter, 12 * 7);
    }

    #[test]
    fn test_advance_wraps() {
        let mut state = ServiceState::new(1);
        state.counter = i64::MAX;

        assert_eq!(state.advance(), i64::MIN);
    }

    #[test]
    fn test_zero_and_negative_steps() {
        let mut state = ServiceState::new(0);
        assert_eq!(state.advance(), 0);

        state.increment = -2;
        assert_eq!(state.advance(), -2);
    }
}
