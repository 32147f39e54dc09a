//! Background eviction of expired entries.
//!
//! Each store owns one sweeper task. The task holds only a weak reference to
//! the store state and stops when the shutdown signal fires or the state is
//! gone.

use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::clock::{is_expired, wall_clock_time, Clock};
use crate::config::MIN_SWEEP_INTERVAL;
use crate::logger::Eviction;
use crate::store::StoreInner;

/// Spawns the sweeper for `inner` on the current Tokio runtime.
///
/// `interval` is raised to [`MIN_SWEEP_INTERVAL`] if shorter.
///
/// # Panics
///
/// Panics if called outside of a Tokio runtime context.
pub(crate) fn spawn<T>(
    inner: &Arc<StoreInner<T>>,
    interval: Duration,
    shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    T: Send + Sync + 'static,
{
    let handle = match tokio::runtime::Handle::try_current() {
        Ok(handle) => handle,
        Err(_) => panic!(
            "ephemeral_core::Store requires a Tokio runtime. \
             Create the store from within a #[tokio::main] or #[tokio::test] \
             context, or from code running on a Tokio runtime."
        ),
    };

    let interval = interval.max(MIN_SWEEP_INTERVAL);
    handle.spawn(run(Arc::downgrade(inner), interval, shutdown_rx))
}

async fn run<T>(inner: Weak<StoreInner<T>>, interval: Duration, mut shutdown_rx: watch::Receiver<bool>)
where
    T: Send + Sync + 'static,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let Some(state) = inner.upgrade() else {
                    break;
                };
                sweep(&state);
            }
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
        }
    }

    tracing::trace!("sweeper stopped");
}

/// Removes every expired entry and reports the evictions.
///
/// Returns the number of entries removed.
pub(crate) fn sweep<T>(inner: &StoreInner<T>) -> usize {
    let clock = inner.clock.as_ref();
    let mut evicted: Vec<(String, Instant)> = Vec::new();

    {
        let mut data = inner.data.write();
        data.retain(|key, entry| match entry.expiration() {
            Some(at) if is_expired(clock, Some(at)) => {
                evicted.push((key.clone(), at));
                false
            }
            _ => true,
        });
    }

    let count = evicted.len();
    if count > 0 {
        tracing::debug!(evicted = count, "sweeper removed expired entries");
        report(inner, clock, evicted);
    }
    count
}

// Runs with the store lock released.
fn report<T>(inner: &StoreInner<T>, clock: &dyn Clock, evicted: Vec<(String, Instant)>) {
    if !inner.logs_enabled() {
        return;
    }

    let sink = inner.sink();
    for (key, at) in evicted {
        let eviction = Eviction {
            key,
            expiration: wall_clock_time(clock, at),
        };
        if let Err(err) = sink.record(&eviction) {
            tracing::warn!(error = %err, key = %eviction.key, "failed to write eviction record");
        }
    }
}
