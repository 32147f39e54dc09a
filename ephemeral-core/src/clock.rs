//! Time sources and expiration arithmetic.
//!
//! Every "now" the store samples goes through a [`Clock`], so tests can swap
//! the system clock for a [`ManualClock`] and step time forward explicitly.

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use std::fmt::Write;
use std::sync::Arc;
use std::time::{Duration, Instant, UNIX_EPOCH};

/// Source of monotonic time for expiration checks
pub trait Clock: Send + Sync + 'static {
    /// Returns the current instant
    fn now(&self) -> Instant;
}

/// The process monotonic clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same offset, so a test can keep one handle and give
/// another to the store.
///
/// # Example
///
/// ```rust
/// use ephemeral_core::{Clock, ManualClock};
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let start = clock.now();
/// clock.advance(Duration::from_secs(5));
/// assert_eq!(clock.now() - start, Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset: Arc<Mutex<Duration>>,
}

impl ManualClock {
    /// Creates a clock frozen at the current instant
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// Moves the clock forward by `by`
    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock();
        *offset = offset.saturating_add(by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + *self.offset.lock()
    }
}

/// Computes the expiration instant for a TTL.
///
/// A zero TTL, or one too large to represent, means the entry never expires
/// and yields `None`.
pub fn expiration_from(clock: &dyn Clock, ttl: Duration) -> Option<Instant> {
    if ttl.is_zero() {
        return None;
    }
    clock.now().checked_add(ttl)
}

/// Returns `true` once `now` is strictly past `expiration`.
///
/// `None` never expires.
#[inline]
pub fn is_expired(clock: &dyn Clock, expiration: Option<Instant>) -> bool {
    match expiration {
        Some(at) => clock.now() > at,
        None => false,
    }
}

/// Maps a monotonic instant to wall-clock UTC time, relative to the current
/// reading of `clock`.
pub fn wall_clock_time(clock: &dyn Clock, instant: Instant) -> DateTime<Utc> {
    let wall_now = Utc::now();
    let mono_now = clock.now();

    let shifted = if instant >= mono_now {
        TimeDelta::from_std(instant - mono_now)
            .ok()
            .and_then(|delta| wall_now.checked_add_signed(delta))
    } else {
        TimeDelta::from_std(mono_now - instant)
            .ok()
            .and_then(|delta| wall_now.checked_sub_signed(delta))
    };

    shifted.unwrap_or(wall_now)
}

/// Renders a duration as a time of day after midnight UTC, using a chrono
/// strftime pattern such as `"%H:%M:%S"`.
///
/// Returns `None` if the duration overflows or the pattern is invalid.
///
/// ```rust
/// use ephemeral_core::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(
///     format_duration(Duration::from_secs(3725), "%H:%M:%S").as_deref(),
///     Some("01:02:05")
/// );
/// ```
pub fn format_duration(duration: Duration, format: &str) -> Option<String> {
    let time: DateTime<Utc> = UNIX_EPOCH.checked_add(duration)?.into();
    let mut out = String::new();
    write!(out, "{}", time.format(format)).ok()?;
    Some(out)
}
