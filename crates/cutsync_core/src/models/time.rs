//! Helpers for signed durations.
//!
//! Offsets and boundary slack can be negative, so everything in the crate
//! uses `chrono::TimeDelta` rather than `std::time::Duration`.

use chrono::TimeDelta;

const NANOS_PER_SEC: i128 = 1_000_000_000;

/// Build a duration from fractional seconds (rounded to the nearest microsecond).
pub fn from_secs_f64(secs: f64) -> TimeDelta {
    TimeDelta::microseconds((secs * 1_000_000.0).round() as i64)
}

/// Convert a duration to fractional seconds.
pub fn to_secs_f64(delta: TimeDelta) -> f64 {
    total_nanos(delta) as f64 / NANOS_PER_SEC as f64
}

/// Total nanoseconds in a duration, widened so sums cannot overflow.
pub fn total_nanos(delta: TimeDelta) -> i128 {
    delta.num_seconds() as i128 * NANOS_PER_SEC + delta.subsec_nanos() as i128
}

/// Arithmetic mean of a set of durations, truncated to whole nanoseconds.
///
/// Returns zero for an empty iterator.
pub fn mean(values: impl IntoIterator<Item = TimeDelta>) -> TimeDelta {
    let (sum, count) = values
        .into_iter()
        .fold((0i128, 0i128), |(sum, count), v| (sum + total_nanos(v), count + 1));

    if count == 0 {
        return TimeDelta::zero();
    }
    TimeDelta::nanoseconds((sum / count) as i64)
}

/// Format a duration as `HH:MM:SS.fff`, with a leading `-` when negative.
pub fn format_timestamp(delta: TimeDelta) -> String {
    let total_ms = delta.num_milliseconds();
    let sign = if total_ms < 0 { "-" } else { "" };
    let ms = total_ms.unsigned_abs();

    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1000;
    let millis = ms % 1000;

    format!("{}{:02}:{:02}:{:02}.{:03}", sign, hours, minutes, seconds, millis)
}

/// Format a duration as plain seconds with millisecond precision (`124.750`).
pub fn format_seconds(delta: TimeDelta) -> String {
    format!("{:.3}", to_secs_f64(delta))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_truncates_to_nanos() {
        let values = [
            TimeDelta::milliseconds(2000),
            TimeDelta::milliseconds(2500),
        ];
        assert_eq!(mean(values), TimeDelta::milliseconds(2250));
        assert_eq!(mean(Vec::<TimeDelta>::new()), TimeDelta::zero());
    }

    #[test]
    fn mean_handles_negative_offsets() {
        let values = [TimeDelta::milliseconds(-1500), TimeDelta::milliseconds(-500)];
        assert_eq!(mean(values), TimeDelta::milliseconds(-1000));
    }

    #[test]
    fn formats_timestamps() {
        assert_eq!(format_timestamp(TimeDelta::milliseconds(124_750)), "00:02:04.750");
        assert_eq!(format_timestamp(TimeDelta::milliseconds(3_610_000)), "01:00:10.000");
        assert_eq!(format_timestamp(TimeDelta::milliseconds(-2500)), "-00:00:02.500");
    }

    #[test]
    fn converts_seconds() {
        assert_eq!(from_secs_f64(125.25), TimeDelta::milliseconds(125_250));
        assert!((to_secs_f64(TimeDelta::milliseconds(-1250)) + 1.25).abs() < 1e-9);
        assert_eq!(format_seconds(TimeDelta::milliseconds(124_750)), "124.750");
    }
}
