//! UTC instants <-> `YYYY-MM-DDTHH:MM:SSZ`
//!
//! Years use astronomical numbering on a proleptic Gregorian calendar:
//! `0000` is 1 BC, `-0001` is 2 BC, and years past 9999 carry a `+`.
//!
//! Input patterns, tried in order:
//!
//! ```text
//! Y-MM-DDTHH:MM:SS[.f+](Z|+HH:MM|-HH:MM)
//! Y-MM-DD HH:MM:SS[.f+][Z]
//! ```
//!
//! Fractional seconds are accepted and dropped; offsets are folded into UTC.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike, Utc};

use crate::converter::StringConverter;
use crate::error::{ConvertError, ConvertResult};
use crate::types::ValueType;
use crate::value::Value;

/// Date/time converter. Every call formats into its own buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeConverter;

// ============================================================================
// SCANNER
// ============================================================================

/// Byte cursor over the input. Errors carry the offset that failed.
struct Scanner<'a> {
    text: &'a str,
    pos: usize,
}

type Scan<T> = Result<T, usize>;

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn expect(&mut self, byte: u8) -> Scan<()> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.pos)
        }
    }

    fn digit(&mut self) -> Scan<u32> {
        match self.peek() {
            Some(b) if b.is_ascii_digit() => {
                self.pos += 1;
                Ok(u32::from(b - b'0'))
            }
            _ => Err(self.pos),
        }
    }

    fn two_digits(&mut self) -> Scan<u32> {
        Ok(self.digit()? * 10 + self.digit()?)
    }

    fn skip_digits(&mut self) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn finish(&self) -> Scan<()> {
        if self.pos == self.text.len() {
            Ok(())
        } else {
            Err(self.pos)
        }
    }

    /// `[+-]?YYYY+-MM-DD`
    fn date(&mut self) -> Scan<NaiveDate> {
        let negative = match self.peek() {
            Some(b'-') => {
                self.pos += 1;
                true
            }
            Some(b'+') => {
                self.pos += 1;
                false
            }
            _ => false,
        };
        let year_start = self.pos;
        if self.skip_digits() < 4 {
            return Err(self.pos);
        }
        let year: i32 = self.text[year_start..self.pos]
            .parse()
            .map_err(|_| year_start)?;
        let year = if negative { -year } else { year };

        self.expect(b'-')?;
        let month_at = self.pos;
        let month = self.two_digits()?;
        self.expect(b'-')?;
        let day_at = self.pos;
        let day = self.two_digits()?;

        NaiveDate::from_ymd_opt(year, month, day).ok_or(if (1..=12).contains(&month) {
            day_at
        } else {
            month_at
        })
    }

    /// `HH:MM:SS[.f+]`, fraction discarded
    fn time(&mut self) -> Scan<NaiveTime> {
        let hour_at = self.pos;
        let hour = self.two_digits()?;
        self.expect(b':')?;
        let minute = self.two_digits()?;
        self.expect(b':')?;
        let second = self.two_digits()?;
        if self.peek() == Some(b'.') {
            self.pos += 1;
            if self.skip_digits() == 0 {
                return Err(self.pos);
            }
        }
        NaiveTime::from_hms_opt(hour, minute, second).ok_or(hour_at)
    }

    /// `Z` or `[+-]HH:MM`, as seconds east of UTC
    fn zone(&mut self) -> Scan<i64> {
        match self.peek() {
            Some(b'Z') => {
                self.pos += 1;
                Ok(0)
            }
            Some(sign @ (b'+' | b'-')) => {
                self.pos += 1;
                let zone_at = self.pos;
                let hours = self.two_digits()?;
                self.expect(b':')?;
                let minutes = self.two_digits()?;
                if hours > 23 || minutes > 59 {
                    return Err(zone_at);
                }
                let seconds = i64::from(hours * 3600 + minutes * 60);
                Ok(if sign == b'-' { -seconds } else { seconds })
            }
            _ => Err(self.pos),
        }
    }
}

fn parse_iso(text: &str) -> Scan<DateTime<Utc>> {
    let mut scanner = Scanner::new(text);
    let date = scanner.date()?;
    scanner.expect(b'T')?;
    let time = scanner.time()?;
    let zone_at = scanner.pos;
    let east = scanner.zone()?;
    scanner.finish()?;

    NaiveDateTime::new(date, time)
        .checked_sub_signed(TimeDelta::seconds(east))
        .map(|utc| utc.and_utc())
        .ok_or(zone_at)
}

fn parse_spaced(text: &str) -> Scan<DateTime<Utc>> {
    let mut scanner = Scanner::new(text);
    let date = scanner.date()?;
    scanner.expect(b' ')?;
    let time = scanner.time()?;
    if scanner.peek() == Some(b'Z') {
        scanner.pos += 1;
    }
    scanner.finish()?;
    Ok(NaiveDateTime::new(date, time).and_utc())
}

/// Parse with every pattern; on failure report the furthest offset reached.
pub(crate) fn parse(text: &str) -> ConvertResult<DateTime<Utc>> {
    parse_iso(text)
        .or_else(|iso_at| parse_spaced(text).map_err(|spaced_at| iso_at.max(spaced_at)))
        .map_err(|at| {
            ConvertError::conversion(text, "expected YYYY-MM-DDTHH:MM:SSZ").at(at)
        })
}

/// Canonical wire form.
pub(crate) fn format(instant: &DateTime<Utc>) -> String {
    let year = match instant.year() {
        y if y < 0 => format!("-{:04}", -y),
        y if y > 9999 => format!("+{y}"),
        y => format!("{y:04}"),
    };
    format!(
        "{year}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        instant.month(),
        instant.day(),
        instant.hour(),
        instant.minute(),
        instant.second(),
    )
}

impl StringConverter for DateTimeConverter {
    fn name(&self) -> &'static str {
        "datetime"
    }

    fn to_string(&self, value: &Value) -> ConvertResult<String> {
        match value {
            Value::DateTime(instant) => Ok(format(instant)),
            other => Err(ConvertError::unsupported(
                self.name(),
                other.value_type().name(),
            )),
        }
    }

    fn from_string(&self, text: &str, target: &ValueType) -> ConvertResult<Option<Value>> {
        if *target != ValueType::DateTime {
            return Err(ConvertError::unsupported(self.name(), target.name()));
        }
        if text.is_empty() {
            return Ok(None);
        }
        parse(text)
            .map(|instant| Some(Value::DateTime(instant)))
            .map_err(|e| e.with_context(text, target.name()))
    }
}
