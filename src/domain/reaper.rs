//! Background purge of expired mappings.
//!
//! The reaper sleeps for a fixed interval, deletes every mapping whose expiry
//! has passed, logs the outcome and goes back to sleep. It never runs on the
//! request path and a failed cycle never stops it; the next cycle runs on
//! schedule. The only way out of the loop is the [`CancellationToken`] held
//! by [`ReaperHandle`]; any other exit shows up in [`ReaperStatus`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::domain::repositories::{MappingStore, StoreError};
use crate::utils::clock::Clock;

/// Configuration for the reaper task.
#[derive(Debug, Clone)]
pub struct ReaperConfig {
    /// Time between purges (default: 12 hours).
    pub interval: Duration,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(12 * 60 * 60),
        }
    }
}

/// Shared, read-mostly view of the reaper task for the health check.
#[derive(Debug, Clone)]
pub struct ReaperStatus {
    cancel: CancellationToken,
    alive: Arc<AtomicBool>,
}

impl ReaperStatus {
    /// Status of a reaper that is running and has not been asked to stop.
    pub fn new() -> Self {
        Self {
            cancel: CancellationToken::new(),
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Asks the reaper to stop.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// False once the task has exited for any reason, panics included.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    pub fn is_running(&self) -> bool {
        self.is_alive() && !self.is_cancelled()
    }
}

impl Default for ReaperStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// Clears the alive flag when the task ends, including on panic.
struct AliveGuard(Arc<AtomicBool>);

impl Drop for AliveGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Handle to a running reaper task.
pub struct ReaperHandle {
    status: ReaperStatus,
    task: JoinHandle<()>,
}

impl ReaperHandle {
    pub fn status(&self) -> ReaperStatus {
        self.status.clone()
    }

    /// Stops the reaper and waits for the task to exit.
    ///
    /// A purge already in progress finishes first.
    pub async fn shutdown(self) {
        self.status.cancel();
        if let Err(e) = self.task.await {
            warn!(error = %e, "Reaper task ended abnormally");
        }
    }
}

/// Spawns the reaper on the current tokio runtime.
pub fn spawn_reaper<S>(store: Arc<S>, clock: Arc<dyn Clock>, config: ReaperConfig) -> ReaperHandle
where
    S: MappingStore + 'static,
{
    let status = ReaperStatus::new();
    let guard = AliveGuard(status.alive.clone());
    let cancel = status.cancel.clone();

    let task = tokio::spawn(async move {
        let _guard = guard;
        run_reaper(store, clock, config, cancel).await;
    });

    ReaperHandle { status, task }
}

/// Main reaper loop. The first purge happens one interval after start.
///
/// Returns immediately, with an error log, if the interval is zero or too
/// large to schedule.
pub async fn run_reaper<S>(
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    config: ReaperConfig,
    cancel: CancellationToken,
) where
    S: MappingStore + 'static,
{
    if config.interval.is_zero() {
        error!("Reaper interval is zero; reaper not started");
        return;
    }
    let Some(start) = Instant::now().checked_add(config.interval) else {
        error!(
            interval_secs = config.interval.as_secs(),
            "Reaper interval out of range; reaper not started"
        );
        return;
    };

    let mut ticker = interval_at(start, config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(interval_secs = config.interval.as_secs(), "Reaper started");

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("Reaper shutting down");
                break;
            }
            _ = ticker.tick() => {
                // Outcome is logged inside; errors wait for the next cycle.
                let _ = run_purge_cycle(store.as_ref(), clock.as_ref()).await;
            }
        }
    }
}

/// Runs one purge with `now` taken from `clock` and logs the outcome.
///
/// # Errors
///
/// Returns the store error after logging it.
pub async fn run_purge_cycle<S>(store: &S, clock: &dyn Clock) -> Result<u64, StoreError>
where
    S: MappingStore + ?Sized,
{
    let now = clock.now();

    match store.purge_expired(now).await {
        Ok(0) => {
            debug!(now, "Reaper: no expired mappings");
            Ok(0)
        }
        Ok(removed) => {
            info!(now, removed, "Reaper purged expired mappings");
            Ok(removed)
        }
        Err(e) => {
            warn!(now, error = %e, "Reaper purge failed");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockMappingStore;
    use crate::utils::clock::ManualClock;
    use mockall::predicate::eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const INTERVAL: Duration = Duration::from_secs(60);

    fn counting_store(calls: Arc<AtomicUsize>, fail_first: bool) -> MockMappingStore {
        let mut store = MockMappingStore::new();
        store.expect_purge_expired().returning(move |_| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if fail_first && n == 0 {
                Err(StoreError::Persistence(sqlx::Error::PoolTimedOut))
            } else {
                Ok(1)
            }
        });
        store
    }

    #[test]
    fn test_default_config() {
        let config = ReaperConfig::default();
        assert_eq!(config.interval, Duration::from_secs(43_200));
    }

    #[tokio::test]
    async fn test_purge_cycle_uses_clock_time() {
        let mut store = MockMappingStore::new();
        store
            .expect_purge_expired()
            .with(eq(1_000))
            .times(1)
            .returning(|_| Ok(3));

        let clock = ManualClock::new(1_000);
        let removed = run_purge_cycle(&store, &clock).await.unwrap();
        assert_eq!(removed, 3);
    }

    #[tokio::test]
    async fn test_purge_cycle_reports_failure() {
        let mut store = MockMappingStore::new();
        store
            .expect_purge_expired()
            .times(1)
            .returning(|_| Err(StoreError::Persistence(sqlx::Error::PoolTimedOut)));

        let result = run_purge_cycle(&store, &ManualClock::new(0)).await;
        assert!(matches!(result, Err(StoreError::Persistence(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_purge_waits_one_interval() {
        let calls = Arc::new(AtomicUsize::new(0));
        let store = Arc::new(counting_store(calls.clone(), false));
        let handle = spawn_reaper(store, Arc::new(ManualClock::new(0)), ReaperConfig {
            interval: INTERVAL,
        });

        tokio::time::sleep(INTERVAL - Duration::from_secs(1)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_cycle_does_not_stop_reaper() {
        let calls = Arc::new(AtomicUsize::new(0));
        let store = Arc::new(counting_store(calls.clone(), true));
        let handle = spawn_reaper(store, Arc::new(ManualClock::new(0)), ReaperConfig {
            interval: INTERVAL,
        });

        tokio::time::sleep(INTERVAL * 3 + Duration::from_secs(1)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_the_loop() {
        let calls = Arc::new(AtomicUsize::new(0));
        let store = Arc::new(counting_store(calls.clone(), false));
        let handle = spawn_reaper(store, Arc::new(ManualClock::new(0)), ReaperConfig {
            interval: INTERVAL,
        });
        let status = handle.status();
        assert!(status.is_running());

        handle.shutdown().await;
        assert!(status.is_cancelled());
        assert!(!status.is_alive());

        tokio::time::sleep(INTERVAL * 5).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unschedulable_interval_marks_reaper_dead() {
        for interval in [Duration::MAX, Duration::ZERO] {
            let mut store = MockMappingStore::new();
            store.expect_purge_expired().never();

            let handle = spawn_reaper(
                Arc::new(store),
                Arc::new(ManualClock::new(0)),
                ReaperConfig { interval },
            );
            let status = handle.status();

            tokio::time::timeout(Duration::from_secs(5), async {
                while status.is_alive() {
                    tokio::task::yield_now().await;
                }
            })
            .await
            .unwrap();

            assert!(!status.is_running());
            assert!(!status.is_cancelled());
            handle.shutdown().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_purge_marks_reaper_dead() {
        let mut store = MockMappingStore::new();
        store
            .expect_purge_expired()
            .returning(|_| panic!("store blew up"));

        let handle = spawn_reaper(Arc::new(store), Arc::new(ManualClock::new(0)), ReaperConfig {
            interval: INTERVAL,
        });
        let status = handle.status();

        tokio::time::sleep(INTERVAL + Duration::from_secs(1)).await;

        assert!(!status.is_alive());
        assert!(!status.is_cancelled());
        handle.shutdown().await;
    }
}
