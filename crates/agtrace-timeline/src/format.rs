use chrono::DateTime;

use agtrace_types::EpochSeconds;

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Render a ledger timestamp as `YYYY-MM-DD HH:MM:SS UTC`.
///
/// Seconds outside chrono's representable range render as `@<seconds>`.
pub fn format_timestamp(ts: EpochSeconds) -> String {
    let secs = ts.as_secs();
    i64::try_from(secs)
        .ok()
        .and_then(|s| DateTime::from_timestamp(s, 0))
        .map(|dt| dt.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| format!("@{secs}"))
}
