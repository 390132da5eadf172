//! Duration parsing and display formatting
//!
//! The provider encodes video durations as ISO 8601 duration strings
//! (`PT1H5M30S`). Both filtering and scoring work in whole minutes, so the
//! parser truncates: total seconds divided by 60, toward zero.

/// Parse an ISO 8601 duration token (`PT#H#M#S`) into whole minutes.
///
/// Hour, minute, and second components are each optional; a missing
/// component counts as zero. `PT45S` parses to 0 minutes.
///
/// Returns `None` for strings that are not ISO 8601 durations.
///
/// # Examples
///
/// ```
/// use vgc_common::duration::parse_iso8601_minutes;
///
/// assert_eq!(parse_iso8601_minutes("PT1H5M0S"), Some(65));
/// assert_eq!(parse_iso8601_minutes("PT45S"), Some(0));
/// assert_eq!(parse_iso8601_minutes("PT90M"), Some(90));
/// assert_eq!(parse_iso8601_minutes("garbage"), None);
/// ```
pub fn parse_iso8601_minutes(token: &str) -> Option<u32> {
    let (hours, minutes, seconds) = parse_components(token)?;
    let total_seconds = hours * 3600 + minutes * 60 + seconds;
    Some((total_seconds / 60) as u32)
}

/// Format an ISO 8601 duration token as `"XhYmZs"`, omitting zero
/// components. Unparseable input formats as `"Unknown"`.
///
/// # Examples
///
/// ```
/// use vgc_common::duration::format_duration;
///
/// assert_eq!(format_duration("PT1H5M"), "1h5m");
/// assert_eq!(format_duration("PT45S"), "45s");
/// assert_eq!(format_duration("bogus"), "Unknown");
/// ```
pub fn format_duration(token: &str) -> String {
    let Some((hours, minutes, seconds)) = parse_components(token) else {
        return "Unknown".to_string();
    };

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if minutes > 0 {
        parts.push(format!("{}m", minutes));
    }
    if seconds > 0 {
        parts.push(format!("{}s", seconds));
    }

    if parts.is_empty() {
        // All-zero duration (e.g. upcoming premieres report PT0S)
        "0s".to_string()
    } else {
        parts.join("")
    }
}

/// Split `PT#H#M#S` into (hours, minutes, seconds), missing components zero.
fn parse_components(token: &str) -> Option<(u64, u64, u64)> {
    let rest = token.strip_prefix("PT")?;
    if rest.is_empty() {
        return None;
    }

    let mut hours = 0u64;
    let mut minutes = 0u64;
    let mut seconds = 0u64;
    let mut digits = String::new();

    for ch in rest.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        let value: u64 = digits.parse().ok()?;
        digits.clear();
        match ch {
            'H' => hours = value,
            'M' => minutes = value,
            'S' => seconds = value,
            _ => return None,
        }
    }

    // Trailing digits without a unit designator are malformed
    if !digits.is_empty() {
        return None;
    }

    Some((hours, minutes, seconds))
}
