//! Wall-clock helpers. Market timestamps are whole seconds since the epoch.

use chrono::{DateTime, Utc};

pub fn now_secs() -> i64 {
    Utc::now().timestamp()
}

/// Render epoch seconds as `HH:MM` (UTC). Out-of-range inputs render as `--:--`.
pub fn format_hhmm(ts_secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(ts_secs, 0)
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_epoch_seconds_as_utc_clock() {
        // 2024-01-01T13:45:00Z
        assert_eq!(format_hhmm(1_704_116_700), "13:45");
    }

    #[test]
    fn now_is_after_2020() {
        assert!(now_secs() > 1_577_836_800);
    }
}
