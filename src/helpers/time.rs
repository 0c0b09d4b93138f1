use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;

use crate::utils::constants::SAFETY_MARGIN_SECS;

pub fn safety_margin() -> Duration {
    Duration::from_secs(SAFETY_MARGIN_SECS)
}

pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Monotonic "now". Goes through tokio so paused-clock tests can move it.
pub fn get_instant() -> Instant {
    Instant::now()
}
