//! # Freshness Filter
//!
//! Messages queued while the bot was down are delivered all at once when it
//! comes back. Anything older than a day is ignored instead of printed.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use super::{Audience, Guard, Verdict};
use crate::message::Inbound;

/// Age, in hours, of the oldest message that still gets printed.
pub const MAX_AGE_HOURS: i64 = 24;

/// Whether a message sent at `sent` is too old to handle at `now`.
///
/// Exactly 24 hours old is still fresh.
///
/// ```
/// use chrono::{Duration, Utc};
/// use ludivina::gate::is_stale;
///
/// let now = Utc::now();
/// assert!(!is_stale(now - Duration::hours(24), now));
/// assert!(is_stale(now - Duration::hours(24) - Duration::seconds(1), now));
/// ```
pub fn is_stale(sent: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - sent > Duration::hours(MAX_AGE_HOURS)
}

/// Drops stale text and photo messages. Commands always pass.
#[derive(Debug, Clone)]
pub struct FreshnessFilter {
    clock: fn() -> DateTime<Utc>,
}

impl FreshnessFilter {
    /// Filter against a custom clock.
    pub fn with_clock(clock: fn() -> DateTime<Utc>) -> Self {
        Self { clock }
    }
}

impl Default for FreshnessFilter {
    fn default() -> Self {
        Self::with_clock(Utc::now)
    }
}

impl Guard for FreshnessFilter {
    fn name(&self) -> &'static str {
        "freshness"
    }

    fn check(&self, inbound: &Inbound, _audience: Audience) -> Verdict {
        if inbound.content.is_command() {
            return Verdict::Continue;
        }

        if is_stale(inbound.date, (self.clock)()) {
            debug!(
                update_id = inbound.update_id,
                sent = %inbound.date,
                "ignoring stale message"
            );
            Verdict::Drop
        } else {
            Verdict::Continue
        }
    }
}
