//! Elapsed-time formatting for AFK notices.

const UNITS: [(u64, char); 4] = [(86_400, 'd'), (3_600, 'h'), (60, 'm'), (1, 's')];

/// Format elapsed seconds as `"1d 2h 3m 4s"`, skipping zero components.
///
/// Zero seconds formats as `"0s"` so a notice never shows an empty duration.
pub fn format_duration(secs: u64) -> String {
    let mut remaining = secs;
    let mut parts = Vec::with_capacity(UNITS.len());

    for (size, unit) in UNITS {
        let value = remaining / size;
        remaining %= size;
        if value > 0 {
            parts.push(format!("{value}{unit}"));
        }
    }

    if parts.is_empty() {
        return "0s".to_string();
    }
    parts.join(" ")
}

/// Seconds between two unix timestamps, clamped at zero for clock skew.
pub fn elapsed_secs(since: i64, now: i64) -> u64 {
    now.saturating_sub(since).max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_seconds() {
        assert_eq!(format_duration(0), "0s");
    }

    #[test]
    fn test_skips_empty_components() {
        assert_eq!(format_duration(65), "1m 5s");
        assert_eq!(format_duration(3_600), "1h");
        assert_eq!(format_duration(86_400 + 30), "1d 30s");
        assert_eq!(format_duration(59), "59s");
    }

    #[test]
    fn test_all_components() {
        assert_eq!(format_duration(90_061), "1d 1h 1m 1s");
        assert_eq!(format_duration(3 * 86_400 + 23 * 3_600 + 59 * 60 + 59), "3d 23h 59m 59s");
    }

    #[test]
    fn test_elapsed_clamps_skew() {
        assert_eq!(elapsed_secs(100, 160), 60);
        assert_eq!(elapsed_secs(200, 100), 0);
    }
}
