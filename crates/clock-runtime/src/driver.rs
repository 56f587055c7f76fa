//! Real-time host driver.
//!
//! Sleeps until the next deadline, then dispatches everything due. The
//! handler's [`Handler::poll`] hook runs at least every `poll_interval`
//! so external requests (signals) are noticed even between long ticks.

use crate::scheduler::{EventLoop, Handler};
use std::ops::ControlFlow;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Why a driver run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The handler's poll hook asked to stop.
    Requested,
    /// No events were left to dispatch.
    Idle,
}

/// Outcome of a driver run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Events dispatched during this run.
    pub dispatched: u64,
    /// Why the run ended.
    pub reason: StopReason,
}

/// Drives an [`EventLoop`] against the monotonic clock.
#[derive(Debug, Clone)]
pub struct RealtimeDriver {
    start: Instant,
    poll_interval: Duration,
}

impl Default for RealtimeDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl RealtimeDriver {
    /// Create a driver whose loop time starts now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            poll_interval: Duration::from_millis(50),
        }
    }

    /// Set the maximum sleep between poll hook calls.
    #[must_use]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Loop time elapsed since the driver was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Run until the handler requests a stop or the queue drains.
    ///
    /// This blocks the current thread.
    pub fn run<E, H: Handler<E>>(&self, timers: &mut EventLoop<E>, handler: &mut H) -> RunSummary {
        info!("Entering event loop");
        let mut dispatched = 0u64;

        let reason = loop {
            timers.advance_to(self.elapsed());
            if handler.poll(timers) == ControlFlow::Break(()) {
                break StopReason::Requested;
            }

            let Some(deadline) = timers.next_deadline() else {
                break StopReason::Idle;
            };

            let wake = (self.start + deadline).min(Instant::now() + self.poll_interval);
            wait_until(wake);

            if self.elapsed() >= deadline {
                dispatched += timers.dispatch_due(self.elapsed(), handler) as u64;
            }
        };

        debug!(?reason, dispatched, "Event loop exited");
        RunSummary { dispatched, reason }
    }
}

/// Wait until the specified instant using high-precision sleep.
#[cfg(target_os = "linux")]
pub fn wait_until(deadline: Instant) {
    let now = Instant::now();
    if deadline <= now {
        return;
    }

    let duration = deadline - now;

    let ts = libc::timespec {
        tv_sec: duration.as_secs() as libc::time_t,
        tv_nsec: duration.subsec_nanos() as libc::c_long,
    };

    // SAFETY: clock_nanosleep only reads `ts`; the remainder pointer may be null.
    unsafe {
        libc::clock_nanosleep(libc::CLOCK_MONOTONIC, 0, &ts, std::ptr::null_mut());
    }
}

/// Wait until the specified instant.
#[cfg(not(target_os = "linux"))]
pub fn wait_until(deadline: Instant) {
    let now = Instant::now();
    if deadline > now {
        std::thread::sleep(deadline - now);
    }
}
