//! Cooperative timer queue.
//!
//! Every periodic behavior in the application is a self-rescheduling
//! event: a handler receives the event, does its work without blocking,
//! and schedules at most one follow-up before returning. Nothing runs
//! concurrently, so a handler always observes the latest state written by
//! the previous one.
//!
//! Time is loop time: a [`Duration`] since the loop started. A host driver
//! feeds it real elapsed time; tests feed it virtual time through
//! [`EventLoop::run_for`].

use clock_common::metrics::TickMetrics;
use std::collections::{BTreeMap, HashMap};
use std::ops::ControlFlow;
use std::time::Duration;
use tracing::trace;

/// Identifies one scheduled event for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Receives due events from an [`EventLoop`].
pub trait Handler<E> {
    /// Handle one due event. Follow-ups are scheduled on `timers`.
    fn handle(&mut self, event: E, timers: &mut EventLoop<E>);

    /// Called by host drivers between dispatches. Returning
    /// `ControlFlow::Break` ends the run.
    fn poll(&mut self, _timers: &mut EventLoop<E>) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// Queue of pending events ordered by due time, then scheduling order.
pub struct EventLoop<E> {
    queue: BTreeMap<(Duration, u64), E>,
    due_by_id: HashMap<u64, Duration>,
    now: Duration,
    next_seq: u64,
    dispatched: u64,
    metrics: TickMetrics,
}

impl<E> Default for EventLoop<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventLoop<E> {
    /// Create an empty loop at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::with_metrics(TickMetrics::new(1024, Duration::from_millis(20)))
    }

    /// Create an empty loop recording dispatch lateness into `metrics`.
    #[must_use]
    pub fn with_metrics(metrics: TickMetrics) -> Self {
        Self {
            queue: BTreeMap::new(),
            due_by_id: HashMap::new(),
            now: Duration::ZERO,
            next_seq: 0,
            dispatched: 0,
            metrics,
        }
    }

    /// Current loop time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move loop time forward without dispatching. Loop time never moves
    /// backwards.
    pub fn advance_to(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Schedule `event` to fire `delay` after the current loop time.
    pub fn schedule_after(&mut self, delay: Duration, event: E) -> TimerId {
        let due = self.now.saturating_add(delay);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.insert((due, seq), event);
        self.due_by_id.insert(seq, due);
        trace!(timer = seq, due_ms = due.as_millis(), "Scheduled");
        TimerId(seq)
    }

    /// Schedule `event` for the next dispatch pass.
    pub fn schedule_now(&mut self, event: E) -> TimerId {
        self.schedule_after(Duration::ZERO, event)
    }

    /// Cancel a pending event.
    ///
    /// Returns `false` if the event already fired or was cancelled;
    /// that case is not an error.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.due_by_id.remove(&id.0) {
            Some(due) => {
                self.queue.remove(&(due, id.0));
                trace!(timer = id.0, "Cancelled");
                true
            }
            None => false,
        }
    }

    /// Whether `id` is still waiting to fire.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.due_by_id.contains_key(&id.0)
    }

    /// Number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Due time of the earliest pending event.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.keys().next().map(|&(due, _)| due)
    }

    /// Total events dispatched.
    #[must_use]
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Dispatch lateness statistics.
    #[must_use]
    pub fn metrics(&self) -> &TickMetrics {
        &self.metrics
    }

    /// Advance loop time to `now` and dispatch every event due by then.
    ///
    /// Events scheduled by handlers during this pass wait for the next
    /// pass, even when already due, so a zero-delay follow-up cannot
    /// starve the loop. Returns the number of events dispatched.
    pub fn dispatch_due<H: Handler<E>>(&mut self, now: Duration, handler: &mut H) -> usize {
        self.advance_to(now);
        let limit = self.next_seq;
        let mut count = 0;

        while let Some(key) = self.first_due_before(limit) {
            let Some(event) = self.queue.remove(&key) else {
                break;
            };
            self.due_by_id.remove(&key.1);
            self.metrics.record(key.0, self.now);
            self.dispatched += 1;
            count += 1;
            handler.handle(event, self);
        }

        count
    }

    /// Run in virtual time for `span`, dispatching each event at exactly
    /// its due time. Loop time ends at `now + span`.
    pub fn run_for<H: Handler<E>>(&mut self, span: Duration, handler: &mut H) -> usize {
        let target = self.now.saturating_add(span);
        let mut count = 0;

        while let Some(deadline) = self.next_deadline() {
            if deadline > target {
                break;
            }
            count += self.dispatch_due(deadline, handler);
        }

        self.now = target;
        count
    }

    fn first_due_before(&self, limit: u64) -> Option<(Duration, u64)> {
        self.queue
            .range(..=(self.now, u64::MAX))
            .map(|(&key, _)| key)
            .find(|&(_, seq)| seq < limit)
    }
}

impl<E> std::fmt::Debug for EventLoop<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLoop")
            .field("now", &self.now)
            .field("pending", &self.queue.len())
            .field("dispatched", &self.dispatched)
            .finish_non_exhaustive()
    }
}
