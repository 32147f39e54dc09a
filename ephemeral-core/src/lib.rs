//! # Ephemeral Core
//!
//! An in-process key-value cache with per-entry TTL (time-to-live) support.
//!
//! ## Features
//!
//! - Generic over the value type, one type per store
//! - Thread-safe storage behind a single readers-writer lock
//! - Optional TTL per write; expired entries are removed on read (lazy cleanup)
//! - Immutable entries that reject overwrites until deleted
//! - Background sweeper task for each store instance, stopped on drop
//! - Optional eviction records to stdout, any writer, or `tracing`
//!
//! ## Example
//!
//! ```rust,no_run
//! use ephemeral_core::{SetOptions, Store, StoreConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> ephemeral_core::Result<()> {
//!     // Create store with default config (1 second sweep interval)
//!     let store: Store<u64> = Store::new();
//!
//!     // Or with a custom sweep interval and eviction records enabled
//!     let config = StoreConfig::default()
//!         .with_sweep_interval(Duration::from_millis(250))
//!         .with_expiration_logs(true);
//!     let store: Store<u64> = Store::with_config(config);
//!
//!     // Store a value with a 60 second TTL
//!     store.set_with("visits", 1, SetOptions::new().ttl(Duration::from_secs(60)))?;
//!
//!     // Lock a value against overwrites
//!     store.set_with("limit", 100, SetOptions::new().immutable(true))?;
//!     assert!(store.set("limit", 5).is_err());
//!
//!     // Retrieve the value
//!     let visits = store.get("visits")?;
//!     println!("visits: {}", visits);
//!
//!     // Delete a key (immutable keys included)
//!     store.delete("limit")?;
//!
//!     // Manual sweep (also done automatically by the background task)
//!     let removed_count = store.sweep();
//!     println!("removed {} expired entries", removed_count);
//!     Ok(())
//! }
//! ```

mod clock;
mod config;
mod entry;
mod error;
mod logger;
mod options;
mod store;
mod sweeper;
mod validate;

pub use clock::{expiration_from, format_duration, is_expired, wall_clock_time, Clock, ManualClock, SystemClock};
pub use config::{StoreConfig, MIN_SWEEP_INTERVAL};
pub use entry::Entry;
pub use error::{CacheError, Result};
pub use logger::{Eviction, EvictionSink, TracingSink, WriterSink};
pub use options::SetOptions;
pub use store::Store;
pub use validate::{validate_immutable, validate_key, validate_value};
