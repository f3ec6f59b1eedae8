//! Fixed-interval poll scheduler for Lootbridge sessions.
//!
//! A session reads the game's pickup slot on a timer. This crate owns that
//! timer: it decides when the next poll is due, what happens when a cycle
//! runs long, and keeps a few numbers about how long cycles take.
//!
//! # Integration
//!
//! The scheduler sits inside a session's `tokio::select!` loop next to a
//! shutdown signal:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         _ = shutdown.cancelled() => break,
//!         _poll = scheduler.wait_for_poll() => {
//!             session.poll_once().await;
//!             scheduler.record_poll_end();
//!         }
//!     }
//! }
//! ```

use std::time::{Duration, Instant};

use rand::Rng;
use tokio::time::{self, Instant as TokioInstant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// What to do when the scheduler wakes up after one or more polls were due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissedPollPolicy {
    /// Forget the missed polls and schedule the next one a full interval
    /// from now.
    #[default]
    Skip,
    /// Keep the original cadence; the next poll is due one interval after
    /// the one that was missed, which may be immediately.
    KeepCadence,
}

/// Configuration for [`PollScheduler`].
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Interval between polls.
    pub interval: Duration,
    /// Missed-poll handling.
    pub policy: MissedPollPolicy,
    /// Warn when a cycle uses more than this fraction of the interval.
    pub budget_warn_threshold: f64,
    /// Random delay (0–max ms) added to the first poll, so sessions started
    /// together don't hit their games in lockstep.
    pub initial_jitter_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(PollConfig::DEFAULT_INTERVAL_MS),
            policy: MissedPollPolicy::default(),
            budget_warn_threshold: 0.80,
            initial_jitter_ms: 0,
        }
    }
}

impl PollConfig {
    pub const DEFAULT_INTERVAL_MS: u64 = 100;
    /// Shortest interval accepted; game hooks cannot be read faster.
    pub const MIN_INTERVAL: Duration = Duration::from_millis(5);

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            ..Default::default()
        }
    }

    /// Clamps out-of-range values. Called by [`PollScheduler::new`].
    pub fn validated(mut self) -> Self {
        if self.interval < Self::MIN_INTERVAL {
            warn!(
                interval_ms = self.interval.as_millis() as u64,
                min_ms = Self::MIN_INTERVAL.as_millis() as u64,
                "poll interval below minimum, clamping"
            );
            self.interval = Self::MIN_INTERVAL;
        }
        self.budget_warn_threshold = self.budget_warn_threshold.clamp(0.0, 1.0);
        self
    }
}

// ---------------------------------------------------------------------------
// PollInfo / metrics
// ---------------------------------------------------------------------------

/// Returned by [`PollScheduler::wait_for_poll`] each time a poll is due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollInfo {
    /// Poll number, starting at 1.
    pub poll: u64,
    /// `true` if the scheduler woke up noticeably late.
    pub overrun: bool,
    /// Polls that were due but skipped.
    pub polls_skipped: u64,
}

/// Running numbers about poll cycles.
#[derive(Debug, Clone, Default)]
pub struct PollMetrics {
    pub total_polls: u64,
    pub total_overruns: u64,
    pub total_skipped: u64,
    /// Longest cycle reported through [`PollScheduler::record_poll_end`].
    pub max_cycle_time: Duration,
    /// Last cycle time as a fraction of the interval.
    pub budget_utilization: f64,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Fixed-interval poll timer. One per session.
pub struct PollScheduler {
    config: PollConfig,
    poll_count: u64,
    next_poll: TokioInstant,
    cycle_start: Option<Instant>,
    paused: bool,
    metrics: PollMetrics,
}

impl PollScheduler {
    /// Creates a scheduler whose first poll is due one interval (plus
    /// jitter) from now.
    pub fn new(config: PollConfig) -> Self {
        let config = config.validated();

        let jitter = if config.initial_jitter_ms > 0 {
            Duration::from_millis(rand::rng().random_range(0..config.initial_jitter_ms))
        } else {
            Duration::ZERO
        };
        let next_poll = TokioInstant::now() + config.interval + jitter;

        debug!(
            interval_ms = config.interval.as_millis() as u64,
            policy = ?config.policy,
            "poll scheduler created"
        );

        Self {
            config,
            poll_count: 0,
            next_poll,
            cycle_start: None,
            paused: false,
            metrics: PollMetrics::default(),
        }
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self::new(PollConfig::with_interval(interval))
    }

    /// Waits until the next poll is due.
    ///
    /// While paused this future never resolves; inside `tokio::select!` the
    /// other branches keep running.
    pub async fn wait_for_poll(&mut self) -> PollInfo {
        if self.paused {
            std::future::pending::<()>().await;
        }

        let due = self.next_poll;
        let interval = self.config.interval;
        time::sleep_until(due).await;

        let now = TokioInstant::now();
        self.poll_count += 1;
        self.cycle_start = Some(Instant::now());

        let late_by = now.saturating_duration_since(due);
        let overrun = late_by > interval / 10;
        let polls_skipped = if overrun {
            (late_by.as_nanos() / interval.as_nanos()) as u64
        } else {
            0
        };

        self.next_poll = match self.config.policy {
            MissedPollPolicy::Skip => {
                if polls_skipped > 0 {
                    warn!(
                        poll = self.poll_count,
                        skipped = polls_skipped,
                        late_ms = late_by.as_secs_f64() * 1000.0,
                        "poll overrun, skipping ahead"
                    );
                }
                now + interval
            }
            MissedPollPolicy::KeepCadence => due + interval,
        };

        if overrun {
            self.metrics.total_overruns += 1;
        }
        self.metrics.total_skipped += polls_skipped;
        self.metrics.total_polls += 1;

        trace!(poll = self.poll_count, overrun, "poll due");

        PollInfo {
            poll: self.poll_count,
            overrun,
            polls_skipped,
        }
    }

    /// Marks the end of the cycle started by the last `wait_for_poll`.
    pub fn record_poll_end(&mut self) {
        let Some(start) = self.cycle_start.take() else {
            return;
        };
        let elapsed = start.elapsed();
        let utilization = elapsed.as_secs_f64() / self.config.interval.as_secs_f64();

        if utilization >= self.config.budget_warn_threshold {
            warn!(
                poll = self.poll_count,
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                interval_ms = self.config.interval.as_millis() as u64,
                "poll cycle close to its interval"
            );
        }

        self.metrics.budget_utilization = utilization;
        if elapsed > self.metrics.max_cycle_time {
            self.metrics.max_cycle_time = elapsed;
        }
    }

    /// Stops polls from firing until [`resume`](Self::resume).
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            debug!(poll = self.poll_count, "poll scheduler paused");
        }
    }

    /// Resumes polling; the next poll is due one interval from now.
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.next_poll = TokioInstant::now() + self.config.interval;
            debug!(poll = self.poll_count, "poll scheduler resumed");
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn poll_count(&self) -> u64 {
        self.poll_count
    }

    pub fn interval(&self) -> Duration {
        self.config.interval
    }

    pub fn metrics(&self) -> &PollMetrics {
        &self.metrics
    }
}
