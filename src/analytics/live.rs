//! Live refresh of the mock analytics snapshot
//!
//! While live mode is on, a background task swaps in a freshly generated
//! snapshot every `interval`. Turning live mode off or dropping the
//! refresher aborts the task.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use arc_swap::ArcSwap;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, trace};

use super::mock::{AnalyticsSnapshot, generate_snapshot};

pub struct LiveRefresher {
    snapshot: Arc<ArcSwap<AnalyticsSnapshot>>,
    refreshes: Arc<AtomicU64>,
    interval: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl LiveRefresher {
    pub fn new(interval: Duration) -> Self {
        Self {
            snapshot: Arc::new(ArcSwap::from_pointee(generate_snapshot())),
            refreshes: Arc::new(AtomicU64::new(0)),
            interval,
            task: Mutex::new(None),
        }
    }

    /// 当前快照
    pub fn current(&self) -> Arc<AnalyticsSnapshot> {
        self.snapshot.load_full()
    }

    /// 手动刷新一次
    pub fn refresh(&self) -> Arc<AnalyticsSnapshot> {
        let fresh = Arc::new(generate_snapshot());
        self.snapshot.store(fresh.clone());
        self.refreshes.fetch_add(1, Ordering::Relaxed);
        fresh
    }

    /// 累计重新生成次数（手动 + 定时）
    pub fn refresh_count(&self) -> u64 {
        self.refreshes.load(Ordering::Relaxed)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_live(&self) -> bool {
        self.task_slot().as_ref().is_some_and(|h| !h.is_finished())
    }

    /// 开启或关闭实时刷新；重复开启不会产生第二个任务
    ///
    /// 必须在 tokio runtime 内调用。
    pub fn set_live(&self, enabled: bool) {
        let mut slot = self.task_slot();

        if !enabled {
            if let Some(handle) = slot.take() {
                handle.abort();
                debug!("Live analytics refresh stopped");
            }
            return;
        }

        if slot.as_ref().is_some_and(|h| !h.is_finished()) {
            return;
        }

        let snapshot = self.snapshot.clone();
        let refreshes = self.refreshes.clone();
        let interval = self.interval;

        *slot = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                snapshot.store(Arc::new(generate_snapshot()));
                refreshes.fetch_add(1, Ordering::Relaxed);
                trace!("Live analytics snapshot regenerated");
            }
        }));
        debug!("Live analytics refresh started ({:?})", interval);
    }

    fn task_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.task.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for LiveRefresher {
    fn drop(&mut self) {
        if let Some(handle) = self.task_slot().take() {
            handle.abort();
        }
    }
}
