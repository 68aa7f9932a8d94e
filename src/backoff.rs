//! Exponential backoff with jitter and saturation, for reconnect logic
//! built on top of the stream handler.

use rand::Rng;

const DEFAULT_MIN_DELAY: f64 = 0.5;
const DEFAULT_MAX_MULTIPLIER: f64 = 10.0;

/// Tracks a reconnect delay that grows on repeated failure and resets on
/// success.
///
/// Invariant: `min_delay <= current() <= max_delay` at all times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backoff {
    min_delay: f64,
    max_delay: f64,
    jitter: bool,
    current: f64,
    fails: u32,
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DELAY, None, true)
    }
}

impl Backoff {
    /// Creates a backoff tracker. `max_delay` defaults to `10 * min_delay`
    /// when `None`.
    pub fn new(min_delay: f64, max_delay: Option<f64>, jitter: bool) -> Self {
        let max_delay = max_delay.unwrap_or(min_delay * DEFAULT_MAX_MULTIPLIER);
        Self {
            min_delay,
            max_delay,
            jitter,
            current: min_delay,
            fails: 0,
        }
    }

    /// Consecutive failures recorded since the last [`Backoff::succeed`].
    pub fn fails(&self) -> u32 {
        self.fails
    }

    /// The delay (seconds) a caller should currently wait before retrying.
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Resets the tracker: `fails = 0`, `current = min_delay`.
    pub fn succeed(&mut self) {
        self.fails = 0;
        self.current = self.min_delay;
    }

    /// Records a failure and returns the new delay.
    ///
    /// `step = current * 2`; jittered by a uniform `[0, 1)` draw when
    /// enabled; `current = min(current + step, max_delay)`, rounded to two
    /// decimal places. Growth is added to `current`, not assigned outright,
    /// so repeated failures keep a minimum growth floor even with jitter.
    pub fn fail(&mut self) -> f64 {
        self.fails += 1;
        let mut step = self.current * 2.0;
        if self.jitter {
            step *= rand::thread_rng().gen::<f64>();
        }
        self.current = (self.current + step).min(self.max_delay);
        self.current = (self.current * 100.0).round() / 100.0;
        self.current
    }
}
