/// Time unit accepted in loop period shorthands such as `"500ms"` or `"2s"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimeUnit {
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum PeriodParseError {
    #[error("invalid period '{0}': expected <number><ms|s|m|h>")]
    Malformed(String),

    #[error("period '{0}' does not fit in 32-bit milliseconds")]
    Overflow(String),
}

impl TimeUnit {
    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "ms" => Some(TimeUnit::Milliseconds),
            "s" => Some(TimeUnit::Seconds),
            "m" => Some(TimeUnit::Minutes),
            "h" => Some(TimeUnit::Hours),
            _ => None,
        }
    }

    fn to_millis(&self, value: u64) -> Option<u64> {
        let factor = match self {
            TimeUnit::Milliseconds => 1,
            TimeUnit::Seconds => 1_000,
            TimeUnit::Minutes => 60_000,
            TimeUnit::Hours => 3_600_000,
        };
        value.checked_mul(factor)
    }
}

/// Parse a loop period into milliseconds.
///
/// A bare number is taken as milliseconds. Otherwise the format is
/// `<number><suffix>` with a lowercase suffix (`ms`, `s`, `m`, `h`) and no
/// whitespace in between. `"0"` and `"0ms"` are valid and mean
/// back-to-back iterations.
pub fn parse_period(s: &str) -> Result<u32, PeriodParseError> {
    let s = s.trim();
    let split_pos = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());

    if split_pos == 0 {
        return Err(PeriodParseError::Malformed(s.to_string()));
    }

    let (num_str, unit_str) = s.split_at(split_pos);
    let value = num_str
        .parse::<u64>()
        .map_err(|_| PeriodParseError::Overflow(s.to_string()))?;

    let unit = if unit_str.is_empty() {
        TimeUnit::Milliseconds
    } else {
        TimeUnit::from_suffix(unit_str).ok_or_else(|| PeriodParseError::Malformed(s.to_string()))?
    };

    unit.to_millis(value)
        .and_then(|ms| u32::try_from(ms).ok())
        .ok_or_else(|| PeriodParseError::Overflow(s.to_string()))
}
