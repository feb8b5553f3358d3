//! Attendance cell text parsing.
//!
//! A cell holds free text like `"8"`, `"8,5"` or `"2x12"`. The reading is
//! the numeric interpretation of that text: a value plus an optional repeat
//! count (`"2x12"` means two units of twelve). Parsing is a pure function;
//! what to do with an error is the caller's business.

/// Parsed numeric reading of one attendance cell.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Reading {
    pub value: Option<f64>,
    /// Repeat count. `None` for the bare-number form.
    pub count: Option<f64>,
}

impl Reading {
    /// Empty cell text: no value, no count. Not an error.
    pub const EMPTY: Reading = Reading {
        value: None,
        count: None,
    };

    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    /// Quantity fed into payroll math: `count * value`, or the bare value.
    pub fn units(&self) -> f64 {
        match (self.count, self.value) {
            (Some(count), Some(value)) => count * value,
            (None, Some(value)) => value,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingError {
    /// Not a number (or the value half of a count form is not a number).
    InvalidValue,
    /// Repeat count has a fractional part.
    CountNotInteger,
}

impl std::fmt::Display for ReadingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadingError::InvalidValue => write!(f, "value is not a number"),
            ReadingError::CountNotInteger => write!(f, "repeat count must be a whole number"),
        }
    }
}

impl std::error::Error for ReadingError {}

/// Separators accepted between repeat count and value: `2x12`, `2*12`, `2×12`.
const COUNT_SEPARATORS: [char; 4] = ['x', 'X', '*', '×'];

/// Parse raw cell text into a [`Reading`].
///
/// Whitespace-only input yields [`Reading::EMPTY`], which is distinct from
/// a parse error. Decimal values accept both comma and dot separators.
pub fn parse_reading(raw: &str) -> Result<Reading, ReadingError> {
    let text = raw.trim();
    if text.is_empty() {
        return Ok(Reading::EMPTY);
    }

    if let Some((count_part, value_part)) = text.split_once(&COUNT_SEPARATORS[..]) {
        let count = parse_number(count_part.trim()).ok_or(ReadingError::InvalidValue)?;
        if count.fract() != 0.0 {
            return Err(ReadingError::CountNotInteger);
        }
        let value = parse_number(value_part.trim()).ok_or(ReadingError::InvalidValue)?;
        return Ok(Reading {
            value: Some(value),
            count: Some(count),
        });
    }

    let value = parse_number(text).ok_or(ReadingError::InvalidValue)?;
    Ok(Reading {
        value: Some(value),
        count: None,
    })
}

fn parse_number(text: &str) -> Option<f64> {
    if text.is_empty() {
        return None;
    }
    let normalized = text.replace(',', ".");
    let n: f64 = normalized.parse().ok()?;
    n.is_finite().then_some(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count_form() {
        assert_eq!(
            parse_reading("5x12"),
            Ok(Reading {
                value: Some(12.0),
                count: Some(5.0)
            })
        );
        assert_eq!(
            parse_reading("5×12,5"),
            Ok(Reading {
                value: Some(12.5),
                count: Some(5.0)
            })
        );
        assert_eq!(
            parse_reading("3*8"),
            Ok(Reading {
                value: Some(8.0),
                count: Some(3.0)
            })
        );
        assert_eq!(
            parse_reading("2X10.5"),
            Ok(Reading {
                value: Some(10.5),
                count: Some(2.0)
            })
        );
    }

    #[test]
    fn test_parse_bare_number() {
        assert_eq!(
            parse_reading("8"),
            Ok(Reading {
                value: Some(8.0),
                count: None
            })
        );
        assert_eq!(
            parse_reading("8,5"),
            Ok(Reading {
                value: Some(8.5),
                count: None
            })
        );
        assert_eq!(
            parse_reading(" 12.25 "),
            Ok(Reading {
                value: Some(12.25),
                count: None
            })
        );
    }

    #[test]
    fn test_parse_empty_is_not_an_error() {
        assert_eq!(parse_reading(""), Ok(Reading::EMPTY));
        assert_eq!(parse_reading("   "), Ok(Reading::EMPTY));
        assert!(parse_reading("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_reading("abc"), Err(ReadingError::InvalidValue));
        assert_eq!(parse_reading("5x"), Err(ReadingError::InvalidValue));
        assert_eq!(parse_reading("x5"), Err(ReadingError::InvalidValue));
        assert_eq!(parse_reading("5xabc"), Err(ReadingError::InvalidValue));
    }

    #[test]
    fn test_fractional_count_rejected() {
        assert_eq!(parse_reading("2.5x10"), Err(ReadingError::CountNotInteger));
        assert_eq!(parse_reading("2,5x10"), Err(ReadingError::CountNotInteger));
        // A whole count written with a decimal point is still whole.
        assert_eq!(
            parse_reading("2.0x10"),
            Ok(Reading {
                value: Some(10.0),
                count: Some(2.0)
            })
        );
    }

    #[test]
    fn test_units() {
        assert_eq!(parse_reading("5x12").unwrap().units(), 60.0);
        assert_eq!(parse_reading("8,5").unwrap().units(), 8.5);
        assert_eq!(Reading::EMPTY.units(), 0.0);
    }

    #[test]
    fn test_non_finite_rejected() {
        assert_eq!(parse_reading("inf"), Err(ReadingError::InvalidValue));
        assert_eq!(parse_reading("NaN"), Err(ReadingError::InvalidValue));
    }
}
