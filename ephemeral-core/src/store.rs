use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::clock::{expiration_from, Clock, SystemClock};
use crate::config::StoreConfig;
use crate::entry::Entry;
use crate::error::{CacheError, Result};
use crate::logger::{EvictionSink, WriterSink};
use crate::options::SetOptions;
use crate::sweeper;
use crate::validate::{validate_immutable, validate_key, validate_value};

/// Internal shared state for the store
pub(crate) struct StoreInner<T> {
    pub(crate) data: RwLock<HashMap<String, Entry<T>>>,
    pub(crate) clock: Arc<dyn Clock>,
    logs_enabled: AtomicBool,
    sink: RwLock<Arc<dyn EvictionSink>>,
    /// Sender to signal shutdown to the sweeper task
    shutdown_tx: watch::Sender<bool>,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl<T> StoreInner<T> {
    pub(crate) fn logs_enabled(&self) -> bool {
        self.logs_enabled.load(Ordering::Relaxed)
    }

    pub(crate) fn sink(&self) -> Arc<dyn EvictionSink> {
        self.sink.read().clone()
    }
}

impl<T> Drop for StoreInner<T> {
    fn drop(&mut self) {
        // Signal the sweeper to stop when the last handle is dropped
        self.shutdown_tx.send_replace(true);
    }
}

/// Thread-safe in-memory key-value store with per-entry TTL and immutability
///
/// A single readers-writer lock guards the whole map. Writes, `get`, and
/// sweeper passes take it exclusively; `has`, `len`, `keys`, `values` and
/// `entries` share it.
///
/// Each store spawns its own background sweeper that periodically removes
/// expired entries. The sweeper stops on [`shutdown`](Store::shutdown) or
/// when the last clone of the store is dropped.
///
/// Values are handed out as clones. For types with shared interior state
/// (`Arc<Mutex<_>>` and the like) the clone aliases the stored value.
///
/// # Example
///
/// ```rust,no_run
/// use ephemeral_core::{SetOptions, Store};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> ephemeral_core::Result<()> {
///     let store: Store<String> = Store::new();
///
///     store.set("greeting", "hello".to_string())?;
///     store.set_with(
///         "session",
///         "abc".to_string(),
///         SetOptions::new().ttl(Duration::from_secs(300)),
///     )?;
///
///     assert_eq!(store.get("greeting")?, "hello");
///     Ok(())
/// }
/// ```
pub struct Store<T> {
    inner: Arc<StoreInner<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Store<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates a new store with default configuration
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime context. The store requires
    /// a runtime to spawn its background sweeper.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Creates a new store with custom configuration
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime context.
    pub fn with_config(config: StoreConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a new store that reads time from `clock`
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime context.
    pub fn with_clock(config: StoreConfig, clock: Arc<dyn Clock>) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let sink: Arc<dyn EvictionSink> = Arc::new(WriterSink::stdout());

        let inner = Arc::new(StoreInner {
            data: RwLock::new(HashMap::new()),
            clock,
            logs_enabled: AtomicBool::new(config.log_expirations),
            sink: RwLock::new(sink),
            shutdown_tx,
            sweeper: Mutex::new(None),
        });

        let handle = sweeper::spawn(&inner, config.sweep_interval, shutdown_rx);
        *inner.sweeper.lock() = Some(handle);
        tracing::trace!(interval = ?config.sweep_interval, "store created");

        Self { inner }
    }

    /// Stores a value that never expires and stays mutable
    ///
    /// # Errors
    ///
    /// Returns `EmptyKey` for an empty key and `ImmutableValue` if the key
    /// currently holds an immutable entry.
    pub fn set(&self, key: impl Into<String>, value: T) -> Result<()> {
        self.set_with(key, value, SetOptions::default())
    }

    /// Stores a value with the given options
    ///
    /// A positive TTL expires the entry that long after this write; no TTL
    /// or a zero TTL never expires. An immutable entry keeps blocking writes
    /// after it expires, until a read or the sweeper removes it.
    ///
    /// # Errors
    ///
    /// Returns `EmptyKey` for an empty key and `ImmutableValue` if the key
    /// currently holds an immutable entry. A rejected write changes nothing.
    pub fn set_with(&self, key: impl Into<String>, value: T, options: SetOptions) -> Result<()> {
        let key = key.into();
        validate_key(&key)?;
        self.insert(key, value, options)
    }

    /// Stores a possibly-absent value
    ///
    /// # Errors
    ///
    /// Returns `EmptyKey` for an empty key, `EmptyValue` for `None`, and
    /// `ImmutableValue` if the key currently holds an immutable entry.
    pub fn set_optional(&self, key: impl Into<String>, value: Option<T>, options: SetOptions) -> Result<()> {
        let key = key.into();
        validate_key(&key)?;
        let value = validate_value(value)?;
        self.insert(key, value, options)
    }

    fn insert(&self, key: String, value: T, options: SetOptions) -> Result<()> {
        let clock = self.inner.clock.as_ref();
        let mut data = self.inner.data.write();

        if let Some(existing) = data.get(&key) {
            validate_immutable(&key, existing)?;
        }

        let expiration = expiration_from(clock, options.ttl_or_zero());
        data.insert(key, Entry::new(value, expiration, options.is_immutable()));
        Ok(())
    }

    /// Retrieves a value by key
    ///
    /// An expired entry is removed by this call and reported as missing.
    ///
    /// # Errors
    ///
    /// Returns `EmptyKey` for an empty key and `KeyNotFound` if the key is
    /// absent or expired.
    pub fn get(&self, key: &str) -> Result<T> {
        validate_key(key)?;

        let clock = self.inner.clock.as_ref();
        let mut data = self.inner.data.write();

        let expired = match data.get(key) {
            Some(entry) if entry.is_expired(clock) => true,
            Some(entry) => return Ok(entry.data().clone()),
            None => false,
        };

        if expired {
            data.remove(key);
            tracing::debug!(key, "evicted expired entry on read");
        }

        Err(CacheError::KeyNotFound(key.to_string()))
    }

    /// Deletes a key, whether or not its entry is immutable or expired
    ///
    /// # Errors
    ///
    /// Returns `EmptyKey` for an empty key and `KeyNotFound` if the key is
    /// absent.
    pub fn delete(&self, key: &str) -> Result<()> {
        validate_key(key)?;

        match self.inner.data.write().remove(key) {
            Some(_) => Ok(()),
            None => Err(CacheError::KeyNotFound(key.to_string())),
        }
    }

    /// Deletes all entries from the store.
    ///
    /// Returns the number of entries that were removed.
    pub fn clear(&self) -> usize {
        let mut data = self.inner.data.write();
        let count = data.len();
        data.clear();
        count
    }

    /// Returns the number of entries in the store (including expired ones
    /// the sweeper has not collected yet)
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.data.read().len()
    }

    /// Returns `true` if the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.data.read().is_empty()
    }

    /// Checks if a key is present, irrespective of expiration
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.inner.data.read().contains_key(key)
    }

    /// Returns a snapshot of all keys, in map iteration order
    pub fn keys(&self) -> Vec<String> {
        self.inner.data.read().keys().cloned().collect()
    }

    /// Returns a snapshot of all values, in map iteration order
    pub fn values(&self) -> Vec<T> {
        self.inner
            .data
            .read()
            .values()
            .map(|entry| entry.data().clone())
            .collect()
    }

    /// Returns a matched snapshot of keys and values taken in one pass
    pub fn entries(&self) -> Vec<(String, T)> {
        self.inner
            .data
            .read()
            .iter()
            .map(|(key, entry)| (key.clone(), entry.data().clone()))
            .collect()
    }

    /// Runs one sweeper pass now
    ///
    /// Returns the number of entries removed.
    ///
    /// Note: This is also done automatically by the background task.
    pub fn sweep(&self) -> usize {
        sweeper::sweep(&self.inner)
    }

    /// Stops the background sweeper
    ///
    /// This is called automatically when the last handle is dropped. The
    /// store keeps working afterwards; expired entries are then only removed
    /// by reads or by [`sweep`](Store::sweep).
    pub fn shutdown(&self) {
        self.inner.shutdown_tx.send_replace(true);
    }

    /// Returns `true` while the background sweeper task is alive
    pub fn is_sweeping(&self) -> bool {
        self.inner
            .sweeper
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Turns on eviction records from the sweeper
    pub fn enable_logs(&self) {
        self.inner.logs_enabled.store(true, Ordering::Relaxed);
    }

    /// Turns off eviction records from the sweeper
    pub fn disable_logs(&self) {
        self.inner.logs_enabled.store(false, Ordering::Relaxed);
    }

    /// Returns whether eviction records are enabled
    pub fn logs_enabled(&self) -> bool {
        self.inner.logs_enabled()
    }

    /// Sends eviction records to `writer`, one line each
    pub fn set_logger<W>(&self, writer: W)
    where
        W: Write + Send + 'static,
    {
        self.set_sink(WriterSink::new(writer));
    }

    /// Installs a custom destination for eviction records
    pub fn set_sink(&self, sink: impl EvictionSink + 'static) {
        let sink: Arc<dyn EvictionSink> = Arc::new(sink);
        *self.inner.sink.write() = sink;
    }
}

impl<T> Default for Store<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("len", &self.inner.data.read().len())
            .field("logs_enabled", &self.inner.logs_enabled())
            .finish_non_exhaustive()
    }
}
