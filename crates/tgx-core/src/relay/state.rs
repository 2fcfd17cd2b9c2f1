use std::time::Duration;

use chrono::{DateTime, Utc};

/// Relay-wide rate-limit state: when the last post was published.
///
/// `last_post_at` only moves forward, and only through `record_post`.
#[derive(Clone, Debug)]
pub struct RelayState {
    last_post_at: DateTime<Utc>,
}

impl Default for RelayState {
    fn default() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH)
    }
}

impl RelayState {
    pub fn new(last_post_at: DateTime<Utc>) -> Self {
        Self { last_post_at }
    }

    pub fn last_post_at(&self) -> DateTime<Utc> {
        self.last_post_at
    }

    /// Time left before another post is allowed, or `None` if posting is allowed at `now`.
    ///
    /// A `now` earlier than the last post (clock stepped back) counts as zero elapsed.
    pub fn remaining_cooldown(&self, now: DateTime<Utc>, min_interval: Duration) -> Option<Duration> {
        let elapsed = (now - self.last_post_at)
            .to_std()
            .unwrap_or(Duration::ZERO);
        if elapsed < min_interval {
            Some(min_interval - elapsed)
        } else {
            None
        }
    }

    pub fn record_post(&mut self, at: DateTime<Utc>) {
        if at > self.last_post_at {
            self.last_post_at = at;
        }
    }
}
