use std::time::Duration;

/// Per-write options for [`Store::set_with`](crate::Store::set_with)
///
/// # Example
///
/// ```rust
/// use ephemeral_core::SetOptions;
/// use std::time::Duration;
///
/// let options = SetOptions::new()
///     .ttl(Duration::from_secs(30))
///     .immutable(true);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    ttl: Option<Duration>,
    immutable: Option<bool>,
}

impl SetOptions {
    /// Creates options with no TTL and a mutable entry
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the time-to-live. A zero TTL means the entry never expires.
    ///
    /// Calling this again replaces the previous TTL.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Marks the written entry as immutable until it is deleted
    pub fn immutable(mut self, immutable: bool) -> Self {
        self.immutable = Some(immutable);
        self
    }

    /// Overlays the fields `other` set explicitly on top of `self`
    pub fn merge(self, other: SetOptions) -> Self {
        Self {
            ttl: other.ttl.or(self.ttl),
            immutable: other.immutable.or(self.immutable),
        }
    }

    /// Returns the effective TTL; zero when none was given
    pub fn ttl_or_zero(&self) -> Duration {
        self.ttl.unwrap_or(Duration::ZERO)
    }

    /// Returns whether the entry should be immutable
    pub fn is_immutable(&self) -> bool {
        self.immutable.unwrap_or(false)
    }
}

impl FromIterator<SetOptions> for SetOptions {
    fn from_iter<I: IntoIterator<Item = SetOptions>>(iter: I) -> Self {
        iter.into_iter().fold(SetOptions::default(), SetOptions::merge)
    }
}
