//! Date/time token parsing and formatting for tide gauge records.
//!
//! Tide gauge exports rarely agree on a date layout. The twelve supported
//! layouts combine a field order, a year width and optional seconds:
//!
//! ```text
//! yyyy/mm/dd hh:mm      yy/mm/dd hh:mm
//! mm/dd/yyyy hh:mm      mm/dd/yy hh:mm
//! dd/mm/yyyy hh:mm      dd/mm/yy hh:mm
//! (each also with :ss)
//! ```
//!
//! All layouts are rows of one table interpreted by a single parser and a
//! single formatter. Tokens are split on whitespace, `/`, `:` and `-`; the
//! trailing tokens are `[hh, mm]` or `[hh, mm, ss]` and the leading three
//! tokens are the date in the layout's field order. Two-digit years map to
//! `2000 + yy`.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use thiserror::Error;

/// Error type for date/time token parsing.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DateParseError {
    /// Wrong number of date/time tokens for the selected layout
    #[error("expected {expected} date/time fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    /// A token that is not a non-negative integer
    #[error("invalid {field} value '{token}'")]
    InvalidField { field: &'static str, token: String },

    /// Fields parsed but do not form a calendar date/time
    #[error("{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02} is not a valid date/time")]
    OutOfRange {
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    },

    /// Format identifier not in the table
    #[error("unknown date format '{0}'")]
    UnknownFormat(String),
}

/// Order of the three leading date fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DateOrder {
    /// yyyy/mm/dd
    YearMonthDay,
    /// mm/dd/yyyy
    MonthDayYear,
    /// dd/mm/yyyy
    DayMonthYear,
}

impl DateOrder {
    /// Positions of (year, month, day) within the leading date tokens.
    fn positions(self) -> (usize, usize, usize) {
        match self {
            DateOrder::YearMonthDay => (0, 1, 2),
            DateOrder::MonthDayYear => (2, 0, 1),
            DateOrder::DayMonthYear => (2, 1, 0),
        }
    }
}

/// Width of the year field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum YearWidth {
    /// `yyyy`
    Four,
    /// `yy`, interpreted as `2000 + yy`
    Two,
}

/// One row of the date layout table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DateFormat {
    id: &'static str,
    order: DateOrder,
    year: YearWidth,
    seconds: bool,
}

const fn row(id: &'static str, order: DateOrder, year: YearWidth, seconds: bool) -> DateFormat {
    DateFormat {
        id,
        order,
        year,
        seconds,
    }
}

const FORMAT_TABLE: [DateFormat; 12] = {
    use DateOrder::*;
    use YearWidth::*;
    [
        row("yyyy/mm/dd hh:mm", YearMonthDay, Four, false),
        row("yyyy/mm/dd hh:mm:ss", YearMonthDay, Four, true),
        row("mm/dd/yyyy hh:mm", MonthDayYear, Four, false),
        row("mm/dd/yyyy hh:mm:ss", MonthDayYear, Four, true),
        row("dd/mm/yyyy hh:mm", DayMonthYear, Four, false),
        row("dd/mm/yyyy hh:mm:ss", DayMonthYear, Four, true),
        row("yy/mm/dd hh:mm", YearMonthDay, Two, false),
        row("yy/mm/dd hh:mm:ss", YearMonthDay, Two, true),
        row("mm/dd/yy hh:mm", MonthDayYear, Two, false),
        row("mm/dd/yy hh:mm:ss", MonthDayYear, Two, true),
        row("dd/mm/yy hh:mm", DayMonthYear, Two, false),
        row("dd/mm/yy hh:mm:ss", DayMonthYear, Two, true),
    ]
};

impl DateFormat {
    /// Every supported input layout.
    pub const ALL: [DateFormat; 12] = FORMAT_TABLE;

    /// Layout used for diagnostics, time spans and manual range entry.
    pub const DISPLAY: DateFormat = FORMAT_TABLE[5];

    /// Look up a layout by its textual identifier (e.g. `"dd/mm/yy hh:mm"`).
    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.trim();
        FORMAT_TABLE.iter().copied().find(|f| f.id == id)
    }

    /// Textual identifier, which is also the layout's formatting pattern.
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// Order of the date fields.
    pub fn order(&self) -> DateOrder {
        self.order
    }

    /// Width of the year field.
    pub fn year_width(&self) -> YearWidth {
        self.year
    }

    /// Whether the layout carries a seconds field.
    pub fn has_seconds(&self) -> bool {
        self.seconds
    }

    /// Number of tokens a date/time string must split into.
    pub fn field_count(&self) -> usize {
        if self.seconds { 6 } else { 5 }
    }

    /// Parse a date/time token string.
    ///
    /// Minutes (and seconds) are read from the end of the token list, hours
    /// precede them, and the first three tokens are the date.
    pub fn parse(&self, text: &str) -> Result<NaiveDateTime, DateParseError> {
        let tokens: Vec<&str> = text
            .split(|c: char| c.is_whitespace() || matches!(c, '/' | ':' | '-'))
            .filter(|t| !t.is_empty())
            .collect();

        if tokens.len() != self.field_count() {
            return Err(DateParseError::FieldCount {
                expected: self.field_count(),
                found: tokens.len(),
            });
        }

        let (time_tokens, second) = if self.seconds {
            (&tokens[..5], parse_field(tokens[5], "second")?)
        } else {
            (&tokens[..5], 0)
        };
        let minute = parse_field(time_tokens[4], "minute")?;
        let hour = parse_field(time_tokens[3], "hour")?;

        let (yi, mi, di) = self.order.positions();
        let year_raw = parse_field(time_tokens[yi], "year")?;
        let month = parse_field(time_tokens[mi], "month")?;
        let day = parse_field(time_tokens[di], "day")?;

        let year = i32::try_from(year_raw)
            .ok()
            .and_then(|y| match self.year {
                YearWidth::Four => Some(y),
                YearWidth::Two => y.checked_add(2000),
            })
            .ok_or_else(|| DateParseError::InvalidField {
                field: "year",
                token: time_tokens[yi].to_string(),
            })?;

        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, minute, second))
            .ok_or(DateParseError::OutOfRange {
                year,
                month,
                day,
                hour,
                minute,
                second,
            })
    }

    /// Format a timestamp in this layout.
    pub fn format(&self, timestamp: &NaiveDateTime) -> String {
        format_with_pattern(timestamp, self.id)
    }
}

impl Default for DateFormat {
    fn default() -> Self {
        FORMAT_TABLE[0]
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id)
    }
}

impl FromStr for DateFormat {
    type Err = DateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| DateParseError::UnknownFormat(s.to_string()))
    }
}

fn parse_field(token: &str, field: &'static str) -> Result<u32, DateParseError> {
    token.parse::<u32>().map_err(|_| DateParseError::InvalidField {
        field,
        token: token.to_string(),
    })
}

/// Format a timestamp in the diagnostic layout `dd/mm/yyyy hh:mm:ss`.
pub fn format_display(timestamp: &NaiveDateTime) -> String {
    DateFormat::DISPLAY.format(timestamp)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PatternToken {
    Year4,
    Year2,
    /// `mm`, resolved to month or minute by its neighbours
    Mm,
    Month,
    Minute,
    Day,
    Hour,
    Second,
    Literal(char),
}

fn tokenize_pattern(pattern: &str) -> Vec<PatternToken> {
    const FIELDS: [(&str, PatternToken); 6] = [
        ("yyyy", PatternToken::Year4),
        ("yy", PatternToken::Year2),
        ("mm", PatternToken::Mm),
        ("dd", PatternToken::Day),
        ("hh", PatternToken::Hour),
        ("ss", PatternToken::Second),
    ];

    let mut tokens = Vec::new();
    let mut rest = pattern;
    'outer: while let Some(c) = rest.chars().next() {
        for (text, token) in FIELDS {
            if let Some(tail) = rest.strip_prefix(text) {
                tokens.push(token);
                rest = tail;
                continue 'outer;
            }
        }
        tokens.push(PatternToken::Literal(c));
        rest = &rest[c.len_utf8()..];
    }

    // `mm` next to `hh` or `ss` is minutes; anywhere else it is the month.
    let fields: Vec<usize> = (0..tokens.len())
        .filter(|&i| !matches!(tokens[i], PatternToken::Literal(_)))
        .collect();
    for (k, &i) in fields.iter().enumerate() {
        if tokens[i] != PatternToken::Mm {
            continue;
        }
        let prev = k.checked_sub(1).map(|j| tokens[fields[j]]);
        let next = fields.get(k + 1).map(|&j| tokens[j]);
        let is_minute =
            prev == Some(PatternToken::Hour) || next == Some(PatternToken::Second);
        tokens[i] = if is_minute {
            PatternToken::Minute
        } else {
            PatternToken::Month
        };
    }

    tokens
}

/// Format a timestamp with a free-form pattern over the tokens
/// `yyyy`, `yy`, `mm`, `dd`, `hh`, `ss`.
///
/// `mm` is read as minutes when it follows `hh` or precedes `ss`, and as the
/// month otherwise, so `"hh:mm dd/mm/yyyy"` formats both fields correctly.
/// Characters that are not part of a token are copied through.
pub fn format_with_pattern(timestamp: &NaiveDateTime, pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 4);
    for token in tokenize_pattern(pattern) {
        match token {
            PatternToken::Year4 => out.push_str(&format!("{:04}", timestamp.year())),
            PatternToken::Year2 => {
                out.push_str(&format!("{:02}", timestamp.year().rem_euclid(100)))
            }
            PatternToken::Month | PatternToken::Mm => {
                out.push_str(&format!("{:02}", timestamp.month()))
            }
            PatternToken::Minute => out.push_str(&format!("{:02}", timestamp.minute())),
            PatternToken::Day => out.push_str(&format!("{:02}", timestamp.day())),
            PatternToken::Hour => out.push_str(&format!("{:02}", timestamp.hour())),
            PatternToken::Second => out.push_str(&format!("{:02}", timestamp.second())),
            PatternToken::Literal(c) => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_parse_default_format() {
        let f = DateFormat::default();
        assert_eq!(f.parse("2025/08/22 06:40").unwrap(), ts(2025, 8, 22, 6, 40, 0));
    }

    #[test]
    fn test_parse_every_field_order() {
        let expected = ts(2024, 3, 7, 13, 5, 9);
        let cases = [
            ("yyyy/mm/dd hh:mm:ss", "2024/03/07 13:05:09"),
            ("mm/dd/yyyy hh:mm:ss", "03/07/2024 13:05:09"),
            ("dd/mm/yyyy hh:mm:ss", "07/03/2024 13:05:09"),
            ("yy/mm/dd hh:mm:ss", "24/03/07 13:05:09"),
            ("mm/dd/yy hh:mm:ss", "03/07/24 13:05:09"),
            ("dd/mm/yy hh:mm:ss", "07/03/24 13:05:09"),
        ];
        for (id, text) in cases {
            let f: DateFormat = id.parse().unwrap();
            assert_eq!(f.parse(text).unwrap(), expected, "format {}", id);
        }
    }

    #[test]
    fn test_round_trip_all_formats() {
        for f in DateFormat::ALL {
            let second = if f.has_seconds() { 42 } else { 0 };
            let t = ts(2031, 12, 31, 23, 59, second);
            let text = f.format(&t);
            assert_eq!(f.parse(&text).unwrap(), t, "round trip through {}", f);
        }
    }

    #[test]
    fn test_dash_separated_dates() {
        let f = DateFormat::default();
        assert_eq!(f.parse("2025-08-22 06:40").unwrap(), ts(2025, 8, 22, 6, 40, 0));
    }

    #[test]
    fn test_wrong_field_count() {
        let f = DateFormat::default();
        assert!(matches!(
            f.parse("2025/08/22 06:40:10"),
            Err(DateParseError::FieldCount {
                expected: 5,
                found: 6
            })
        ));
    }

    #[test]
    fn test_invalid_tokens() {
        let f = DateFormat::default();
        assert!(matches!(
            f.parse("2025/aug/22 06:40"),
            Err(DateParseError::InvalidField { field: "month", .. })
        ));
        assert!(matches!(
            f.parse("2025/02/30 06:40"),
            Err(DateParseError::OutOfRange { .. })
        ));
        assert!(matches!(
            f.parse("2025/02/10 24:00"),
            Err(DateParseError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_oversized_year_is_rejected() {
        let two_digit: DateFormat = "yy/mm/dd hh:mm".parse().unwrap();
        assert!(matches!(
            two_digit.parse("2147483000/01/01 00:00"),
            Err(DateParseError::InvalidField { field: "year", .. })
        ));

        let f = DateFormat::default();
        assert!(matches!(
            f.parse("4294967295/01/01 00:00"),
            Err(DateParseError::InvalidField { field: "year", .. })
        ));
        assert!(matches!(
            f.parse("2147483000/01/01 00:00"),
            Err(DateParseError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_unknown_format_id() {
        assert!(matches!(
            "yyyy.mm.dd".parse::<DateFormat>(),
            Err(DateParseError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_display_format() {
        assert_eq!(format_display(&ts(2025, 8, 22, 7, 0, 0)), "22/08/2025 07:00:00");
    }

    #[test]
    fn test_pattern_month_minute_disambiguation() {
        let t = ts(2025, 8, 22, 6, 40, 5);
        assert_eq!(format_with_pattern(&t, "yyyy/mm/dd hh:mm"), "2025/08/22 06:40");
        assert_eq!(format_with_pattern(&t, "hh:mm dd/mm/yyyy"), "06:40 22/08/2025");
        assert_eq!(format_with_pattern(&t, "mm/dd/yy hh:mm:ss"), "08/22/25 06:40:05");
        assert_eq!(format_with_pattern(&t, "dd.mm.yyyyThh:mm"), "22.08.2025T06:40");
    }
}
