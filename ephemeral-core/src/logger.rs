//! Eviction records emitted by the sweeper.
//!
//! Logging is off by default. When enabled, the sweeper hands one
//! [`Eviction`] per removed entry to the store's [`EvictionSink`]. Records
//! are delivered after the store lock is released.

use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Stdout, Write};

/// One entry removed by the sweeper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eviction {
    pub key: String,
    pub expiration: DateTime<Utc>,
}

impl fmt::Display for Eviction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "key was expired [key = {:?}, expiration = {:?}]",
            self.key,
            self.expiration.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }
}

/// Destination for eviction records
pub trait EvictionSink: Send + Sync {
    fn record(&self, eviction: &Eviction) -> io::Result<()>;
}

/// Writes one line per eviction to any `Write` implementation
pub struct WriterSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl WriterSink<Stdout> {
    /// The default sink
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> EvictionSink for WriterSink<W> {
    fn record(&self, eviction: &Eviction) -> io::Result<()> {
        let mut writer = self.writer.lock();
        writeln!(writer, "{}", eviction)?;
        writer.flush()
    }
}

/// Forwards eviction records to `tracing` at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EvictionSink for TracingSink {
    fn record(&self, eviction: &Eviction) -> io::Result<()> {
        tracing::info!(
            key = %eviction.key,
            expiration = %eviction.expiration.to_rfc3339_opts(SecondsFormat::Secs, true),
            "key was expired"
        );
        Ok(())
    }
}
