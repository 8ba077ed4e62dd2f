/// Fixed-period tick cadence for the control loop
///
/// Every tick the controller samples inputs, arbitrates and sequences
/// outputs, then calls [`TickScheduler::wait_for_next_tick`]. That wait is
/// the only suspension point of the whole system and can be cut short by a
/// [`ShutdownSignal`].
use super::clock::{Clock, Millis, Sleeper};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Cooperative shutdown request, safe to trigger from any thread
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    requested: Arc<AtomicBool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the control loop to stop at its next suspension point
    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

/// Tick timing state
#[derive(Debug)]
pub struct TickScheduler {
    /// Tick period in milliseconds
    period_ms: Millis,

    /// Deadline of the next tick, `None` before the first tick
    next_deadline: Option<Millis>,

    /// Ticks released so far
    tick_count: u64,

    /// Times the loop fell more than a full period behind
    overruns: u64,
}

impl TickScheduler {
    /// Create a scheduler with the given period (clamped to at least 1 ms)
    pub fn new(period_ms: Millis) -> Self {
        Self {
            period_ms: period_ms.max(1),
            next_deadline: None,
            tick_count: 0,
            overruns: 0,
        }
    }

    pub fn period_ms(&self) -> Millis {
        self.period_ms
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn overruns(&self) -> u64 {
        self.overruns
    }

    /// Block until the next tick is due.
    ///
    /// Returns `false` without waiting further once shutdown is requested.
    /// The first call releases a tick immediately. If the caller fell more
    /// than one period behind, the cadence re-anchors on the current time
    /// instead of releasing a burst of catch-up ticks.
    pub fn wait_for_next_tick<C, S>(
        &mut self,
        clock: &C,
        sleeper: &mut S,
        shutdown: &ShutdownSignal,
    ) -> bool
    where
        C: Clock,
        S: Sleeper,
    {
        let now = clock.now();
        let mut deadline = self.next_deadline.unwrap_or(now);

        if now > deadline + self.period_ms {
            self.overruns += 1;
            log::debug!(
                "Tick overrun: {} ms behind schedule, re-anchoring",
                now - deadline
            );
            deadline = now;
        }

        loop {
            if shutdown.is_requested() {
                return false;
            }

            let now = clock.now();
            if now >= deadline {
                break;
            }

            // Sleep in slices so a shutdown request is noticed promptly
            let slice = (deadline - now).min(self.period_ms);
            sleeper.sleep(Duration::from_millis(slice));
        }

        self.next_deadline = Some(deadline + self.period_ms);
        self.tick_count += 1;
        true
    }
}
