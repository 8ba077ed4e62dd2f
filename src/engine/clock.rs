// Monotonic time sources and the idle-wait abstraction

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Milliseconds on a monotonic clock. Only differences are meaningful.
pub type Millis = u64;

/// Monotonic tick time source
pub trait Clock {
    /// Current time in milliseconds since the clock's epoch
    fn now(&self) -> Millis;
}

/// Suspends the control loop between ticks
///
/// The controller never calls `std::thread::sleep` directly so tests can
/// advance a [`ManualClock`] instead of letting real time pass.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

/// Wall-clock backed monotonic clock, epoch is construction time
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Millis {
        self.start.elapsed().as_millis() as Millis
    }
}

/// Sleeper that blocks the current thread
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Synthetic clock for driving ticks without real time passing.
///
/// Clones share the same time value, so one handle can be given to the
/// controller as its clock and another as its sleeper: sleeping simply
/// advances the shared time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Millis>>,
}

impl ManualClock {
    pub fn new(start: Millis) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    /// Move time forward by `ms`
    pub fn advance(&self, ms: Millis) {
        self.now.set(self.now.get() + ms);
    }

    /// Jump to an absolute time. Going backwards is ignored.
    pub fn set(&self, ms: Millis) {
        if ms > self.now.get() {
            self.now.set(ms);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Millis {
        self.now.get()
    }
}

impl Sleeper for ManualClock {
    fn sleep(&mut self, duration: Duration) {
        self.advance(duration.as_millis() as Millis);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new(100);
        let mut sleeper = clock.clone();

        sleeper.sleep(Duration::from_millis(25));
        assert_eq!(clock.now(), 125);

        clock.advance(5);
        assert_eq!(sleeper.now(), 130);
    }

    #[test]
    fn test_manual_clock_never_goes_backwards() {
        let clock = ManualClock::new(50);
        clock.set(10);
        assert_eq!(clock.now(), 50);
        clock.set(70);
        assert_eq!(clock.now(), 70);
    }

    #[test]
    fn test_monotonic_clock_advances() {
        let clock = MonotonicClock::new();
        let first = clock.now();
        std::thread::sleep(Duration::from_millis(5));
        assert!(clock.now() >= first + 5);
    }
}
