/// Format a millisecond duration as `45s`, `1m5s` or `2h3m`.
pub fn format_duration_millis(millis: u64) -> String {
    let seconds = millis / 1000;
    if seconds < 60 {
        format!("{seconds}s")
    } else if seconds < 3600 {
        format!("{}m{}s", seconds / 60, seconds % 60)
    } else {
        format!("{}h{}m", seconds / 3600, (seconds % 3600) / 60)
    }
}

/// Truncate a string safely by character count, not byte count.
/// This ensures we don't break UTF-8 encoding by cutting mid-character.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_millis() {
        assert_eq!(format_duration_millis(0), "0s");
        assert_eq!(format_duration_millis(45_999), "45s");
        assert_eq!(format_duration_millis(65_000), "1m5s");
        assert_eq!(format_duration_millis(3_600_000), "1h0m");
        assert_eq!(format_duration_millis(7_380_000), "2h3m");
    }

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate("build", 10), "build");
    }

    #[test]
    fn test_truncate_long_string() {
        assert_eq!(truncate("integration tests", 10), "integra...");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("déploiement", 6), "dép...");
    }
}
