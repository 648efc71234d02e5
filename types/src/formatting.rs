//! Display formatting for encounter offsets and damage values.
//!
//! Timings are rendered the way the log provider shows them in its own
//! timeline (`MM:SS.mmm` relative to the pull), so a tether reported here can
//! be found in the report by eye.

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;

/// Format a millisecond offset as `MM:SS.mmm`.
///
/// - Hours are prefixed (`H:MM:SS.mmm`) only when non-zero
/// - The fractional part is omitted when it is exactly zero
/// - Negative offsets are clamped to zero
///
/// # Examples
/// ```
/// use tethercalc_types::formatting::format_timing;
/// assert_eq!(format_timing(0), "00:00");
/// assert_eq!(format_timing(12_345), "00:12.345");
/// assert_eq!(format_timing(323_000), "05:23");
/// assert_eq!(format_timing(3_723_004), "1:02:03.004");
/// ```
pub fn format_timing(ms: i64) -> String {
    let ms = ms.max(0);
    let hours = ms / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (ms % MS_PER_MINUTE) / MS_PER_SECOND;
    let millis = ms % MS_PER_SECOND;

    let mut out = if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    };
    if millis > 0 {
        out.push_str(&format!(".{:03}", millis));
    }
    out
}

/// Format a damage total with thousands separators.
///
/// # Examples
/// ```
/// use tethercalc_types::formatting::format_thousands;
/// assert_eq!(format_thousands(0), "0");
/// assert_eq!(format_thousands(500), "500");
/// assert_eq!(format_thousands(1_500), "1,500");
/// assert_eq!(format_thousands(-1_500_000), "-1,500,000");
/// ```
pub fn format_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    if n < 0 {
        result.insert(0, '-');
    }
    result
}
