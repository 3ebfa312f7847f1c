use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::distributions::Alphanumeric;
use rand::Rng;

const MAX_BACKOFF_MS: u64 = 30_000;

pub(crate) fn jittered_delay(base_delay_ms: u64, attempt: u32) -> Duration {
    let backoff_multiplier = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
    let base = base_delay_ms.saturating_mul(backoff_multiplier);

    let jitter_upper_bound = base / 2;
    let jitter = if jitter_upper_bound == 0 {
        0
    } else {
        rand::thread_rng().gen_range(0..jitter_upper_bound)
    };

    let total_delay_ms = base.saturating_add(jitter).min(MAX_BACKOFF_MS);
    Duration::from_millis(total_delay_ms)
}

/// Random alphanumeric string for `nonce`/`noncestr` parameters.
pub(crate) fn nonce_str(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Current Unix time in seconds.
pub(crate) fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}
