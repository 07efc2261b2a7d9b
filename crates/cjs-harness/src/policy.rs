//! Knobs that change how a roundtrip is judged or paced.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default fixed settle delay after each import
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(100);

/// How the driver waits for post-import analysis.
///
/// `Fixed` is a known flakiness source on slow engines; `Poll` asks the
/// engine directly and gives up after `timeout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlePolicy {
    /// Sleep for a fixed duration
    Fixed(Duration),
    /// Poll `is_settled()` every `interval` until it reports true
    Poll {
        /// Delay between polls
        interval: Duration,
        /// Give up and record a timeout after this long
        timeout: Duration,
    },
}

impl Default for SettlePolicy {
    fn default() -> Self {
        SettlePolicy::Fixed(DEFAULT_SETTLE)
    }
}

/// What an element count mismatch after JSON import means.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountMismatchPolicy {
    /// The fixture fails
    #[default]
    Fail,
    /// Recorded as a warning; the text comparison alone decides
    Warn,
}
