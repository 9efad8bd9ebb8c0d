//! Rendering of remaining times.
//!
//! Negative values mean the phase boundary has already passed and display as
//! zero. The result is seconds with one decimal digit, truncated toward zero.

use chrono::Duration;

/// Format signed milliseconds as `S.d` seconds, e.g. `8215` → `"8.2"`.
pub fn format_remaining(ms: i64) -> String {
    let ms = ms.max(0);
    format!("{}.{}", ms / 1000, (ms % 1000) / 100)
}

pub fn format_duration(remaining: Duration) -> String {
    format_remaining(remaining.num_milliseconds())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_clamps_to_zero() {
        assert_eq!(format_remaining(-500), "0.0");
        assert_eq!(format_remaining(i64::MIN), "0.0");
    }

    #[test]
    fn truncates_instead_of_rounding() {
        assert_eq!(format_remaining(8215), "8.2");
        assert_eq!(format_remaining(8999), "8.9");
        assert_eq!(format_remaining(9000), "9.0");
    }

    #[test]
    fn sub_second_values_keep_leading_zero() {
        assert_eq!(format_remaining(0), "0.0");
        assert_eq!(format_remaining(42), "0.0");
        assert_eq!(format_remaining(999), "0.9");
    }

    #[test]
    fn long_durations_keep_all_seconds() {
        assert_eq!(format_remaining(123_456), "123.4");
    }

    #[test]
    fn duration_uses_same_rule() {
        assert_eq!(format_duration(Duration::milliseconds(7050)), "7.0");
        assert_eq!(format_duration(Duration::milliseconds(-1)), "0.0");
    }
}
