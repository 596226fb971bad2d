use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use scom_core::refresh::RefreshInterval;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Something the timer can poke on every tick.
#[async_trait]
pub trait Refresh: Send + Sync + 'static {
    async fn refresh_tick(&self);
}

/// Periodic refresh owned by a single handle.
///
/// At most one tick loop is alive per timer. Changing the interval aborts the running loop
/// before a new one is spawned, and dropping the timer aborts whatever is still scheduled.
/// The first tick fires one full period after the interval is set.
pub struct RefreshTimer {
    handle: Option<JoinHandle<()>>,
    interval: RefreshInterval,
    live: Arc<AtomicUsize>,
}

struct LiveGuard(Arc<AtomicUsize>);

impl LiveGuard {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl RefreshTimer {
    pub fn new() -> Self {
        Self {
            handle: None,
            interval: RefreshInterval::OFF,
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn interval(&self) -> RefreshInterval {
        self.interval
    }

    /// Replaces the schedule. `Off` only cancels. Must be called inside a tokio runtime.
    pub fn set_interval<T: Refresh>(&mut self, interval: RefreshInterval, target: Arc<T>) {
        self.cancel();
        self.interval = interval;

        let Some(period) = interval.period() else {
            tracing::debug!("auto-refresh off");
            return;
        };
        let Some(start) = Instant::now().checked_add(period) else {
            tracing::warn!(interval = %interval, "auto-refresh period out of range, not scheduled");
            return;
        };
        tracing::debug!(interval = %interval, "auto-refresh scheduled");

        let guard = LiveGuard::enter(&self.live);
        self.handle = Some(tokio::spawn(async move {
            let _guard = guard;
            let mut ticker = interval_at(start, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                target.refresh_tick().await;
            }
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Tick loops that have not yet been torn down, including ones still unwinding after
    /// an abort.
    pub fn running_tasks(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

impl Default for RefreshTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
