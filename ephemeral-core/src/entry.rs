use std::time::Instant;

use crate::clock::{self, Clock};

/// A stored value with its expiration and immutability metadata
#[derive(Debug, Clone)]
pub struct Entry<T> {
    data: T,
    expiration: Option<Instant>,
    immutable: bool,
}

impl<T> Entry<T> {
    /// Creates a new entry. An `expiration` of `None` never expires.
    pub fn new(data: T, expiration: Option<Instant>, immutable: bool) -> Self {
        Self {
            data,
            expiration,
            immutable,
        }
    }

    /// Returns the stored value
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Consumes the entry and returns the stored value
    pub fn into_data(self) -> T {
        self.data
    }

    /// Returns the expiration instant, or `None` if the entry never expires
    pub fn expiration(&self) -> Option<Instant> {
        self.expiration
    }

    /// Returns `true` if the entry rejects overwrites
    pub fn is_immutable(&self) -> bool {
        self.immutable
    }

    /// Checks if this entry has expired according to `clock`
    pub fn is_expired(&self, clock: &dyn Clock) -> bool {
        clock::is_expired(clock, self.expiration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::time::Duration;

    #[test]
    fn test_entry_not_expired() {
        let clock = ManualClock::new();
        let entry = Entry::new("test_value", Some(clock.now() + Duration::from_secs(60)), false);

        assert_eq!(*entry.data(), "test_value");
        assert!(!entry.is_expired(&clock));
        assert!(!entry.is_immutable());
    }

    #[test]
    fn test_entry_expired() {
        let clock = ManualClock::new();
        let entry = Entry::new(7u32, Some(clock.now() + Duration::from_secs(1)), false);

        clock.advance(Duration::from_secs(2));
        assert!(entry.is_expired(&clock));
        assert_eq!(entry.into_data(), 7);
    }

    #[test]
    fn test_entry_without_expiration_never_expires() {
        let clock = ManualClock::new();
        let entry = Entry::new(vec![1, 2, 3], None, true);

        clock.advance(Duration::from_secs(100 * 365 * 24 * 60 * 60));
        assert!(!entry.is_expired(&clock));
        assert!(entry.is_immutable());
        assert_eq!(entry.expiration(), None);
    }
}
