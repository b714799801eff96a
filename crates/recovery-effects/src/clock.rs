//! Polling clock
//!
//! A timestamp that advances by exactly one interval per tick, seeded from
//! wall-clock time when it starts. It is the only time input for review
//! window countdowns, so a countdown only moves when the clock ticks.
//!
//! The timer runs as a spawned tokio task owned by the [`Clock`]. Dropping
//! the clock aborts the task on every exit path, so no orphaned timer keeps
//! triggering recomputation after its consumer is gone.

use recovery_core::effects::{PhysicalTimeEffects, TimeError};
use recovery_core::TimestampMs;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

/// Sub-minute precision is never displayed.
pub const DEFAULT_CLOCK_INTERVAL: Duration = Duration::from_secs(60);

const MIN_CLOCK_INTERVAL: Duration = Duration::from_millis(1);

/// Fixed-interval ticking timestamp
#[derive(Debug)]
pub struct Clock {
    interval: Duration,
    now: watch::Receiver<TimestampMs>,
    task: JoinHandle<()>,
}

impl Clock {
    /// Start a clock seeded from `time`.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn start<T>(time: &T, interval: Duration) -> Result<Self, TimeError>
    where
        T: PhysicalTimeEffects + ?Sized,
    {
        let start_ms = time.physical_time_ms().await?;
        Ok(Self::starting_at(start_ms, interval))
    }

    /// Start a clock at an explicit timestamp.
    ///
    /// Intervals below one millisecond are raised to one millisecond.
    /// Must be called from within a tokio runtime.
    pub fn starting_at(start_ms: TimestampMs, interval: Duration) -> Self {
        let interval = interval.max(MIN_CLOCK_INTERVAL);
        let step_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        let (tx, rx) = watch::channel(start_ms);
        let first_tick = Instant::now() + interval;

        let task = tokio::spawn(async move {
            let mut ticker = time::interval_at(first_tick, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                tx.send_modify(|ts| *ts = ts.saturating_add(step_ms));
                if tx.is_closed() {
                    break;
                }
            }
        });

        debug!(start_ms, interval_ms = step_ms, "clock started");
        Self {
            interval,
            now: rx,
            task,
        }
    }

    /// Timestamp as of the last tick
    pub fn now(&self) -> TimestampMs {
        *self.now.borrow()
    }

    /// Interval added on every tick
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait for the next tick and return the new timestamp.
    ///
    /// Returns `None` once the timer has stopped.
    pub async fn tick(&mut self) -> Option<TimestampMs> {
        self.now.changed().await.ok()?;
        let now = *self.now.borrow_and_update();
        Some(now)
    }

    /// Independent receiver of clock updates.
    ///
    /// The receiver reports closed once the clock is released.
    pub fn subscribe(&self) -> watch::Receiver<TimestampMs> {
        self.now.clone()
    }

    /// Whether the timer task is still alive
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Release the clock and cancel its timer.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for Clock {
    fn drop(&mut self) {
        self.task.abort();
        debug!(last_ms = self.now(), "clock released");
    }
}
