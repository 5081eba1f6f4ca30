//! `mm:ss[.ss]` timecodes and their conversion to absolute frame indices.
//!
//! Start and end times are given on the command line as minutes and
//! seconds, optionally with a fractional part. The fraction is kept to
//! millisecond precision (extra digits are truncated), and a timecode maps
//! to the frame index `floor(total_seconds * frames_per_second)`.
//!
//! # Example
//!
//! ```
//! use ytframes::Timecode;
//!
//! let start: Timecode = "1:02.5".parse()?;
//! assert_eq!(start.to_frame_number(30.0), 1875);
//! # Ok::<(), ytframes::YtFramesError>(())
//! ```

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
    time::Duration,
};

use crate::error::YtFramesError;

/// A point in time within a video, parsed from `mm:ss` or `mm:ss.ss`.
///
/// Seconds are not bounded to `0..60`, so `"0:90"` and `"1:30"` are the same
/// instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timecode {
    offset: Duration,
}

impl Timecode {
    /// Parse a timecode string.
    ///
    /// # Errors
    ///
    /// Returns [`YtFramesError::InvalidTimeFormat`] if the input is not
    /// `digits:digits` optionally followed by `.digits`.
    pub fn parse(text: &str) -> Result<Self, YtFramesError> {
        let invalid = || YtFramesError::InvalidTimeFormat(text.to_string());

        let (minutes, rest) = text.split_once(':').ok_or_else(invalid)?;
        let (seconds, fraction) = match rest.split_once('.') {
            Some((seconds, fraction)) => (seconds, Some(fraction)),
            None => (rest, None),
        };

        let minutes = parse_digits(minutes).ok_or_else(invalid)?;
        let seconds = parse_digits(seconds).ok_or_else(invalid)?;
        let milliseconds = match fraction {
            Some(fraction) => fraction_to_millis(fraction).ok_or_else(invalid)?,
            None => 0,
        };

        let total_millis = minutes
            .checked_mul(60_000)
            .and_then(|ms| ms.checked_add(seconds.checked_mul(1_000)?))
            .and_then(|ms| ms.checked_add(milliseconds))
            .ok_or_else(invalid)?;

        Ok(Self {
            offset: Duration::from_millis(total_millis),
        })
    }

    /// Offset of this timecode from the start of the video.
    pub fn offset(&self) -> Duration {
        self.offset
    }

    /// Convert to an absolute, zero-based frame index at the given rate.
    pub fn to_frame_number(&self, frames_per_second: f64) -> u64 {
        (self.offset.as_secs_f64() * frames_per_second).floor() as u64
    }
}

impl FromStr for Timecode {
    type Err = YtFramesError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Timecode::parse(text)
    }
}

impl Display for Timecode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let millis = self.offset.as_millis();
        let minutes = millis / 60_000;
        let seconds = (millis % 60_000) / 1_000;
        let fraction = millis % 1_000;
        if fraction == 0 {
            write!(f, "{minutes}:{seconds:02}")
        } else {
            write!(f, "{minutes}:{seconds:02}.{fraction:03}")
        }
    }
}

/// Parse a non-empty run of ASCII digits.
fn parse_digits(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Interpret the digits after the decimal point as milliseconds, truncating
/// anything finer.
fn fraction_to_millis(fraction: &str) -> Option<u64> {
    if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut millis = 0;
    for (position, digit) in fraction.bytes().chain(std::iter::repeat(b'0')).take(3).enumerate() {
        let scale = 10_u64.pow(2 - position as u32);
        millis += u64::from(digit - b'0') * scale;
    }
    Some(millis)
}

#[cfg(test)]
mod tests {
    use super::{Timecode, fraction_to_millis};

    #[test]
    fn fraction_truncates_to_milliseconds() {
        assert_eq!(fraction_to_millis("5"), Some(500));
        assert_eq!(fraction_to_millis("25"), Some(250));
        assert_eq!(fraction_to_millis("123456"), Some(123));
        assert_eq!(fraction_to_millis("0015"), Some(1));
        assert_eq!(fraction_to_millis(""), None);
        assert_eq!(fraction_to_millis("1a"), None);
    }

    #[test]
    fn display_round_trips_through_parse() {
        for text in ["0:00", "1:05", "12:34.500", "0:00.001"] {
            let timecode = Timecode::parse(text).unwrap();
            assert_eq!(Timecode::parse(&timecode.to_string()).unwrap(), timecode);
        }
    }
}
