use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, SystemTime};

use chainwatch_logging::{watch_debug, watch_info, watch_warn};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

struct ArmedTimer {
    interval: Duration,
    next_fire_at: Arc<Mutex<Instant>>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Recurring trigger with a cancellable handle.
///
/// `start` always cancels the running timer before arming a new one, so two
/// timers never overlap and nothing carries over from the previous cadence.
/// Dropping the scheduler stops it.
pub struct RefreshScheduler {
    label: &'static str,
    armed: Option<ArmedTimer>,
}

impl RefreshScheduler {
    pub fn new(label: &'static str) -> Self {
        Self { label, armed: None }
    }

    /// Arms the timer. Must be called from within a tokio runtime.
    pub fn start<F>(&mut self, interval: Duration, on_tick: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.stop();
        if interval.is_zero() {
            watch_warn!("{} timer not armed: zero interval", self.label);
            return;
        }

        let next_fire_at = Arc::new(Mutex::new(Instant::now() + interval));
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_timer(
            self.label,
            interval,
            next_fire_at.clone(),
            cancel.clone(),
            on_tick,
        ));
        watch_info!("{} timer armed: every {:?}", self.label, interval);

        self.armed = Some(ArmedTimer {
            interval,
            next_fire_at,
            cancel,
            task,
        });
    }

    /// Cancels the pending trigger. Safe to call when not armed.
    pub fn stop(&mut self) {
        if let Some(timer) = self.armed.take() {
            timer.cancel.cancel();
            timer.task.abort();
            watch_info!("{} timer stopped", self.label);
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn interval(&self) -> Option<Duration> {
        self.armed.as_ref().map(|timer| timer.interval)
    }

    pub fn next_fire_at(&self) -> Option<Instant> {
        self.armed.as_ref().map(|timer| read(&timer.next_fire_at))
    }

    pub fn time_until_next_tick(&self) -> Option<Duration> {
        self.next_fire_at()
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    /// Wall-clock time of the next trigger, for display.
    pub fn next_fire_time(&self) -> Option<SystemTime> {
        self.time_until_next_tick()
            .map(|left| SystemTime::now() + left)
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_timer<F>(
    label: &'static str,
    interval: Duration,
    next_fire_at: Arc<Mutex<Instant>>,
    cancel: CancellationToken,
    on_tick: F,
) where
    F: Fn() + Send + Sync + 'static,
{
    loop {
        let deadline = read(&next_fire_at);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = time::sleep_until(deadline) => {
                *next_fire_at.lock().unwrap_or_else(PoisonError::into_inner) =
                    Instant::now() + interval;
                watch_debug!("{} timer fired", label);
                on_tick();
            }
        }
    }
}

fn read(slot: &Mutex<Instant>) -> Instant {
    *slot.lock().unwrap_or_else(PoisonError::into_inner)
}
