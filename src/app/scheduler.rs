//! Auto-refresh scheduling.
//!
//! A single repeating timer drives the dashboard refresh. The scheduler
//! owns its task handle: reconfiguring the interval aborts the old task
//! before spawning the replacement, so at most one timer is ever live.
//! Ticks while the operator is logged out are swallowed without stopping
//! the timer, which keeps it armed for when login completes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Default period between refresh cycles
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

/// Owner of the repeating refresh timer
#[derive(Debug)]
pub struct RefreshScheduler {
    ticks: mpsc::UnboundedSender<()>,
    authenticated: Arc<AtomicBool>,
    interval: Duration,
    handle: Option<JoinHandle<()>>,
}

impl RefreshScheduler {
    /// Create a scheduler that emits ticks on the given channel while the
    /// authenticated flag is set. The timer does not run until `start`.
    pub fn new(ticks: mpsc::UnboundedSender<()>, authenticated: Arc<AtomicBool>) -> Self {
        Self {
            ticks,
            authenticated,
            interval: DEFAULT_INTERVAL,
            handle: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Start the timer with the current interval
    pub fn start(&mut self) {
        self.spawn();
    }

    /// Change the period. A running timer is replaced atomically; the old
    /// task is aborted before the new one spawns.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
        if self.handle.is_some() {
            debug!(seconds = interval.as_secs(), "rescheduling refresh timer");
            self.spawn();
        }
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    fn spawn(&mut self) {
        self.stop();

        let ticks = self.ticks.clone();
        let authenticated = self.authenticated.clone();
        let period = self.interval;

        self.handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // interval yields its first tick immediately; the first refresh
            // should come one full period after (re)configuration
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if !authenticated.load(Ordering::Relaxed) {
                    continue;
                }
                if ticks.send(()).is_err() {
                    break;
                }
            }
        }));
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    fn scheduler_with_channel(
        authenticated: bool,
    ) -> (RefreshScheduler, mpsc::UnboundedReceiver<()>, Arc<AtomicBool>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let flag = Arc::new(AtomicBool::new(authenticated));
        (RefreshScheduler::new(tx, flag.clone()), rx, flag)
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_arrive_at_the_configured_period() {
        let (mut scheduler, mut rx, _flag) = scheduler_with_channel(true);
        scheduler.set_interval(Duration::from_secs(30));
        scheduler.start();

        let started = Instant::now();
        rx.recv().await.unwrap();
        assert_eq!(started.elapsed(), Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn reconfiguring_leaves_exactly_one_timer() {
        let (mut scheduler, mut rx, _flag) = scheduler_with_channel(true);
        scheduler.set_interval(Duration::from_secs(30));
        scheduler.start();

        rx.recv().await.unwrap();

        // 7s period deliberately shares no multiples with 30s inside the
        // probed window, so a leaked timer would show up as an off-beat gap
        scheduler.set_interval(Duration::from_secs(7));
        for _ in 0..5 {
            let before = Instant::now();
            rx.recv().await.unwrap();
            assert_eq!(before.elapsed(), Duration::from_secs(7));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn unauthenticated_ticks_are_silent_but_keep_the_timer_armed() {
        let (mut scheduler, mut rx, flag) = scheduler_with_channel(false);
        scheduler.set_interval(Duration::from_secs(10));
        scheduler.start();

        tokio::time::advance(Duration::from_secs(35)).await;
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        assert!(rx.try_recv().is_err());

        flag.store(true, Ordering::Relaxed);
        rx.recv().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_idempotent_and_reports_state() {
        let (mut scheduler, _rx, _flag) = scheduler_with_channel(true);
        assert!(!scheduler.is_running());
        scheduler.start();
        assert!(scheduler.is_running());
        scheduler.stop();
        assert!(!scheduler.is_running());
        scheduler.stop();
    }
}
