//! Minute-of-run helpers. Times in every input file and output are written as
//! `HH:MM`, and internally handled as `hours * 60 + minutes`.

/// Parses `HH:MM` into minutes. Hours are not limited to a single day.
pub fn parse_clock(token: &str) -> Option<u32> {
    let (hours, minutes) = token.trim().split_once(':')?;
    let hours: u32 = hours.trim().parse().ok()?;
    let minutes: u32 = minutes.trim().parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// Formats minutes as `%2d:%02d`.
pub fn format_clock(minute: u32) -> String {
    format!("{:2}:{:02}", minute / 60, minute % 60)
}
