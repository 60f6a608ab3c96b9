/// Clock-style duration formatting and parsing
use crate::error::{BotError, Result};
use std::time::Duration;

const CLOCK_MULTIPLIERS: [u64; 4] = [1, 60, 3_600, 86_400];

/// Format as `mm:ss`, or `hh:mm:ss` from one hour up
///
/// With `pad_start` the leading field is zero-padded to two digits.
pub fn format_duration(duration: Duration, pad_start: bool) -> String {
    let total = duration.as_secs();
    let seconds = total % 60;
    let mut minutes = total / 60;

    let lead = |n: u64| {
        if pad_start {
            format!("{:02}", n)
        } else {
            n.to_string()
        }
    };

    if minutes > 59 {
        let hours = minutes / 60;
        minutes %= 60;
        format!("{}:{:02}:{:02}", lead(hours), minutes, seconds)
    } else {
        format!("{}:{:02}", lead(minutes), seconds)
    }
}

/// Parse `ss`, `mm:ss`, `hh:mm:ss` or `dd:hh:mm:ss`
///
/// Fields are not range-checked: `90` and `1:30` are both 90 seconds.
pub fn parse_clock(input: &str) -> Result<Duration> {
    let invalid = || BotError::validation(format!("Invalid duration \"{}\"", input));

    let fields: Vec<&str> = input.trim().split(':').collect();
    if fields.len() > CLOCK_MULTIPLIERS.len() {
        return Err(invalid());
    }

    let mut seconds = 0u64;
    for (field, multiplier) in fields.iter().rev().zip(CLOCK_MULTIPLIERS) {
        let value: u64 = field.trim().parse().map_err(|_| invalid())?;
        seconds = value
            .checked_mul(multiplier)
            .and_then(|v| seconds.checked_add(v))
            .ok_or_else(invalid)?;
    }

    Ok(Duration::from_secs(seconds))
}
