//! Device clock timestamps
//!
//! The device has no notion of time zones: it wants the seconds since the
//! epoch of its local wall clock. The offset is therefore subtracted from
//! UTC "now" before truncating to seconds.

use chrono::{Local, Utc};

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch, UTC
    fn now_ms(&self) -> i64;

    /// UTC minus local wall time of this machine, in milliseconds
    fn local_offset_ms(&self) -> i64;
}

/// Wall clock of the host
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn local_offset_ms(&self) -> i64 {
        -i64::from(Local::now().offset().local_minus_utc()) * 1000
    }
}

/// Clock frozen at a given instant
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedClock {
    pub now_ms: i64,
    pub local_offset_ms: i64,
}

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.now_ms
    }

    fn local_offset_ms(&self) -> i64 {
        self.local_offset_ms
    }
}

/// Offset in milliseconds to subtract from UTC "now" for `timezone`.
///
/// `local` uses the host offset, `UTC` is zero, and `UTC+H` / `UTC-H` with
/// `H` in 1..=12 map to `-H` / `+H` hours: the label sign is inverted.
/// Anything else yields zero.
pub fn timezone_offset_ms(timezone: &str, clock: &dyn Clock) -> i64 {
    match timezone {
        "local" => clock.local_offset_ms(),
        "UTC" => 0,
        other => parse_utc_hours(other).map_or(0, |hours| -hours * 3_600_000),
    }
}

/// Signed hours of a `UTC+H` / `UTC-H` label
fn parse_utc_hours(label: &str) -> Option<i64> {
    let rest = label.strip_prefix("UTC")?;
    let (sign, digits) = match rest.as_bytes().first()? {
        b'+' => (1, &rest[1..]),
        b'-' => (-1, &rest[1..]),
        _ => return None,
    };
    // Plain hours only: no padding, no fractions
    if digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: i64 = digits.parse().ok()?;
    (1..=12).contains(&hours).then_some(sign * hours)
}

/// Seconds since the epoch the device should consider "now" in `timezone`
pub fn device_timestamp(timezone: &str, clock: &dyn Clock) -> i64 {
    let offset = timezone_offset_ms(timezone, clock);
    (clock.now_ms() - offset).div_euclid(1000)
}
