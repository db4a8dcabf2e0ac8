//! Formatting and parsing helpers for the command line and overlays.

use crate::{config::SessionConfig, Error, Result};

/// Format a second count as `mm:ss`; minutes keep growing past 59
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Parse `work/short/long` minutes, e.g. `25/5/15`
///
/// Values outside the supported range are clamped by the session clock, not
/// rejected here.
///
/// # Errors
///
/// Returns an error if the text does not hold exactly three whole numbers
pub fn parse_durations(text: &str) -> Result<SessionConfig> {
    let parts = text
        .split('/')
        .map(|part| {
            part.trim()
                .parse::<u32>()
                .map_err(|_| Error::InvalidInput(format!("'{part}' is not a number of minutes")))
        })
        .collect::<Result<Vec<_>>>()?;

    match parts.as_slice() {
        [work, short, long] => Ok(SessionConfig {
            work_minutes: *work,
            short_break_minutes: *short,
            long_break_minutes: *long,
        }),
        _ => Err(Error::InvalidInput(format!(
            "Expected work/short/long minutes, got '{text}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(59), "00:59");
        assert_eq!(format_clock(25 * 60), "25:00");
        assert_eq!(format_clock(7265), "121:05");
    }

    #[test]
    fn test_parse_durations() {
        let parsed = parse_durations("50 / 10 / 30").unwrap();
        assert_eq!(parsed.work_minutes, 50);
        assert_eq!(parsed.short_break_minutes, 10);
        assert_eq!(parsed.long_break_minutes, 30);
    }

    #[test]
    fn test_parse_durations_rejects_bad_input() {
        assert!(parse_durations("25/5").is_err());
        assert!(parse_durations("25/5/x").is_err());
        assert!(parse_durations("").is_err());
    }
}
