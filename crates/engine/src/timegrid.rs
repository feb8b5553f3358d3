//! Shift time parsing and quarter-hour snapping.
//!
//! Arrival/departure entries are typed as `"9"`, `"9:30"` or `"9-18:15"`.
//! Times live on a quarter-hour grid: whatever minute is typed, the stored
//! minute is one of {0, 15, 30, 45}. Hour 24 is a valid "end of day" value
//! and always carries minute 0.
//!
//! A span with only a start time is a real state, not an error: it marks an
//! entry the user has not finished yet. It must survive a format/parse
//! round-trip without growing an end time.

use std::fmt;

/// Minutes per grid step.
pub const MINUTE_STEP: u32 = 15;

/// A time of day on the quarter-hour grid.
///
/// Invariants: hour <= 24, minute in {0, 15, 30, 45}, and minute == 0
/// whenever hour == 24. Enforced by [`TimeValue::new`]; the fields are
/// private so no other path exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeValue {
    hour: u8,
    minute: u8,
}

impl TimeValue {
    /// Build a snapped time from raw hour/minute input.
    ///
    /// Input minute may be anything in [0, 59]; it is snapped onto the
    /// grid. Hour 24 forces minute 0 regardless of input.
    pub fn new(hour: u32, minute: u32) -> Result<Self, TimeError> {
        if hour > 24 {
            return Err(TimeError::HourOutOfRange(hour));
        }
        if minute > 59 {
            return Err(TimeError::MinuteOutOfRange(minute));
        }
        if hour == 24 {
            return Ok(TimeValue { hour: 24, minute: 0 });
        }
        Ok(TimeValue {
            hour: hour as u8,
            minute: snap_minute(minute) as u8,
        })
    }

    #[inline]
    pub fn hour(&self) -> u32 {
        self.hour as u32
    }

    #[inline]
    pub fn minute(&self) -> u32 {
        self.minute as u32
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Snap a minute onto the quarter-hour grid.
///
/// Snaps to the step the minute falls in: 7 -> 0, 23 -> 15, 59 -> 45.
/// Equidistant inputs resolve to the lower step.
pub fn snap_minute(minute: u32) -> u32 {
    (minute / MINUTE_STEP) * MINUTE_STEP
}

/// An arrival time with an optional departure time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSpan {
    pub start: TimeValue,
    /// `None` while the user has only entered an arrival.
    pub end: Option<TimeValue>,
}

impl TimeSpan {
    pub fn new(start: TimeValue, end: Option<TimeValue>) -> Self {
        TimeSpan { start, end }
    }

    /// True when the departure half is still missing.
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }
}

impl fmt::Display for TimeSpan {
    /// Always re-joins with a plain hyphen, whatever dash was typed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "{}-{}", self.start, end),
            None => write!(f, "{}", self.start),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeError {
    Empty,
    /// Not in `H`, `H:MM` or `H[:MM]-H[:MM]` shape.
    Invalid,
    HourOutOfRange(u32),
    MinuteOutOfRange(u32),
}

impl fmt::Display for TimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeError::Empty => write!(f, "empty time"),
            TimeError::Invalid => write!(f, "not a valid time or time range"),
            TimeError::HourOutOfRange(h) => write!(f, "hour {} out of range 0-24", h),
            TimeError::MinuteOutOfRange(m) => write!(f, "minute {} out of range 0-59", m),
        }
    }
}

impl std::error::Error for TimeError {}

/// Dashes accepted between the two halves of a range.
const RANGE_SEPARATORS: [char; 3] = ['-', '\u{2013}', '\u{2014}'];

/// Parse `"9"`, `"9:30"`, `"9-18"`, `"9:15–18:45"` into a snapped span.
///
/// A lone start time, or a start followed by a dangling separator, yields
/// an open span (`end == None`).
pub fn parse_span(raw: &str) -> Result<TimeSpan, TimeError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(TimeError::Empty);
    }

    match text.split_once(&RANGE_SEPARATORS[..]) {
        None => Ok(TimeSpan::new(parse_token(text)?, None)),
        Some((start, end)) => {
            let start = parse_token(start)?;
            let end = end.trim();
            if end.is_empty() {
                Ok(TimeSpan::new(start, None))
            } else {
                Ok(TimeSpan::new(start, Some(parse_token(end)?)))
            }
        }
    }
}

/// Parse a single `H` or `H:MM` token.
pub fn parse_token(raw: &str) -> Result<TimeValue, TimeError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(TimeError::Empty);
    }

    let (hour_part, minute_part) = match text.split_once(':') {
        Some((h, m)) => (h.trim(), Some(m.trim())),
        None => (text, None),
    };

    let hour: u32 = hour_part.parse().map_err(|_| TimeError::Invalid)?;
    let minute: u32 = match minute_part {
        Some(m) => m.parse().map_err(|_| TimeError::Invalid)?,
        None => 0,
    };

    TimeValue::new(hour, minute)
}
