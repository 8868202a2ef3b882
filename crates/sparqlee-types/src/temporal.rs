//! Calendar records for the XSD date/time and duration datatypes

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

const SECONDS_PER_DAY: i64 = 86_400;

/// Timezone offsets are limited to ±14:00 by XSD
const MAX_OFFSET_MINUTES: i16 = 14 * 60;

static DATE_TIME_LEXICAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(-?[0-9]{4,})-([0-9]{2})-([0-9]{2})T([0-9]{2}):([0-9]{2}):([0-9]{2}(?:\.[0-9]+)?)(Z|[+-][0-9]{2}:[0-9]{2})?$")
        .expect("valid dateTime pattern")
});
static DATE_LEXICAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(-?[0-9]{4,})-([0-9]{2})-([0-9]{2})(Z|[+-][0-9]{2}:[0-9]{2})?$").expect("valid date pattern")
});
static TIME_LEXICAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{2}):([0-9]{2}):([0-9]{2}(?:\.[0-9]+)?)(Z|[+-][0-9]{2}:[0-9]{2})?$").expect("valid time pattern")
});
static DURATION_LEXICAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(-)?P(?:([0-9]+)Y)?(?:([0-9]+)M)?(?:([0-9]+)D)?(?:T(?:([0-9]+)H)?(?:([0-9]+)M)?(?:([0-9]+(?:\.[0-9]+)?)S)?)?$")
        .expect("valid duration pattern")
});

/// Helper function to get the number of days in a month
pub fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0) {
                29
            } else {
                28
            }
        }
        _ => 31,
    }
}

fn write_year(f: &mut fmt::Formatter<'_>, year: i32) -> fmt::Result {
    if year < 0 {
        write!(f, "-{:04}", year.unsigned_abs())
    } else {
        write!(f, "{year:04}")
    }
}

fn write_seconds(f: &mut fmt::Formatter<'_>, second: Decimal) -> fmt::Result {
    let second = second.normalize();
    if second < Decimal::TEN {
        write!(f, "0{second}")
    } else {
        write!(f, "{second}")
    }
}

fn capture_u8(captures: &Captures<'_>, index: usize) -> Option<u8> {
    captures.get(index).and_then(|m| m.as_str().parse().ok())
}

fn capture_timezone(captures: &Captures<'_>, index: usize) -> Option<Option<TimezoneOffset>> {
    match captures.get(index) {
        Some(m) => TimezoneOffset::parse(m.as_str()).map(Some),
        None => Some(None),
    }
}

// ============================================================================
// Timezone
// ============================================================================

/// A timezone offset in minutes east of UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimezoneOffset {
    minutes: i16,
}

impl TimezoneOffset {
    pub const UTC: TimezoneOffset = TimezoneOffset { minutes: 0 };

    pub fn from_minutes(minutes: i16) -> Option<Self> {
        (minutes.abs() <= MAX_OFFSET_MINUTES).then_some(Self { minutes })
    }

    pub fn minutes(self) -> i16 {
        self.minutes
    }

    /// Parse `Z` or `±hh:mm`
    pub fn parse(lexical: &str) -> Option<Self> {
        if lexical == "Z" {
            return Some(Self::UTC);
        }
        let sign = match lexical.as_bytes().first()? {
            b'+' => 1,
            b'-' => -1,
            _ => return None,
        };
        let (hours, minutes) = lexical[1..].split_once(':')?;
        let hours: i16 = hours.parse().ok()?;
        let minutes: i16 = minutes.parse().ok()?;
        if minutes >= 60 {
            return None;
        }
        Self::from_minutes(sign * (hours * 60 + minutes))
    }

    /// The offset as a dayTimeDuration value
    pub fn to_duration(self) -> DurationValue {
        DurationValue::day_time(Decimal::from(i64::from(self.minutes) * 60))
    }
}

impl fmt::Display for TimezoneOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.minutes == 0 {
            return write!(f, "Z");
        }
        let sign = if self.minutes >= 0 { '+' } else { '-' };
        let hours = self.minutes.abs() / 60;
        let mins = self.minutes.abs() % 60;
        write!(f, "{sign}{hours:02}:{mins:02}")
    }
}

// ============================================================================
// dateTime
// ============================================================================

/// An `xsd:dateTime` value
///
/// Fields are validated on construction; `second` keeps the fractional part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateTimeValue {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: Decimal,
    pub timezone: Option<TimezoneOffset>,
}

impl DateTimeValue {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: Decimal,
        timezone: Option<TimezoneOffset>,
    ) -> Option<Self> {
        let whole_seconds = second.trunc().to_u32()?;
        if hour >= 24 || minute >= 60 || whole_seconds >= 60 || second.is_sign_negative() {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month.into(), day.into())?;
        Some(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            timezone,
        })
    }

    pub fn parse(lexical: &str) -> Option<Self> {
        let captures = DATE_TIME_LEXICAL.captures(lexical)?;
        let year: i32 = captures.get(1)?.as_str().parse().ok()?;
        let month = capture_u8(&captures, 2)?;
        let day = capture_u8(&captures, 3)?;
        let hour = capture_u8(&captures, 4)?;
        let minute = capture_u8(&captures, 5)?;
        let second = Decimal::from_str(captures.get(6)?.as_str()).ok()?;
        let timezone = capture_timezone(&captures, 7)?;

        // 24:00:00 is the first instant of the following day
        if hour == 24 && minute == 0 && second.is_zero() {
            let midnight = Self::new(year, month, day, 0, 0, Decimal::ZERO, timezone)?;
            let next = midnight.to_naive()?.checked_add_signed(TimeDelta::try_days(1)?)?;
            return Some(Self::from_naive(next, Decimal::ZERO, timezone));
        }
        Self::new(year, month, day, hour, minute, second, timezone)
    }

    /// Build from a chrono timestamp plus sub-second fraction
    pub fn from_naive(naive: NaiveDateTime, fraction: Decimal, timezone: Option<TimezoneOffset>) -> Self {
        Self {
            year: naive.year(),
            month: naive.month() as u8,
            day: naive.day() as u8,
            hour: naive.hour() as u8,
            minute: naive.minute() as u8,
            second: Decimal::from(naive.second()) + fraction,
            timezone,
        }
    }

    /// Wall-clock time with whole seconds
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, self.month.into(), self.day.into())?.and_hms_opt(
            self.hour.into(),
            self.minute.into(),
            self.second.trunc().to_u32()?,
        )
    }

    /// Seconds since the Unix epoch, reading a missing zone as `default_timezone`
    pub fn timestamp(&self, default_timezone: TimezoneOffset) -> Decimal {
        let offset = self.timezone.unwrap_or(default_timezone);
        let whole = self.to_naive().map(|naive| naive.and_utc().timestamp()).unwrap_or_default();
        Decimal::from(whole) + self.second.fract() - Decimal::from(i64::from(offset.minutes()) * 60)
    }

    pub fn compare(&self, other: &Self, default_timezone: TimezoneOffset) -> Ordering {
        self.timestamp(default_timezone).cmp(&other.timestamp(default_timezone))
    }

    /// XPath component-wise addition: months first (day pinned to the end
    /// of a shorter month), then seconds with carry
    pub fn add_duration(&self, duration: &DurationValue) -> Option<Self> {
        let total_months = i64::from(self.year) * 12 + i64::from(self.month) - 1 + duration.months;
        let year = i32::try_from(total_months.div_euclid(12)).ok()?;
        let month = u8::try_from(total_months.rem_euclid(12) + 1).ok()?;
        let day = self.day.min(days_in_month(year, month));
        let base = NaiveDate::from_ymd_opt(year, month.into(), day.into())?
            .and_hms_opt(self.hour.into(), self.minute.into(), 0)?;

        let total_seconds = self.second + duration.seconds;
        let whole = total_seconds.floor();
        let fraction = total_seconds - whole;
        let shifted = base.checked_add_signed(TimeDelta::try_seconds(whole.to_i64()?)?)?;
        Some(Self::from_naive(shifted, fraction, self.timezone))
    }

    pub fn subtract_duration(&self, duration: &DurationValue) -> Option<Self> {
        self.add_duration(&duration.negate())
    }

    /// Difference as a dayTimeDuration
    pub fn difference(&self, other: &Self, default_timezone: TimezoneOffset) -> DurationValue {
        DurationValue::day_time(self.timestamp(default_timezone) - other.timestamp(default_timezone))
    }

    pub fn date(&self) -> DateValue {
        DateValue {
            year: self.year,
            month: self.month,
            day: self.day,
            timezone: self.timezone,
        }
    }

    pub fn time(&self) -> TimeValue {
        TimeValue {
            hour: self.hour,
            minute: self.minute,
            second: self.second,
            timezone: self.timezone,
        }
    }
}

impl fmt::Display for DateTimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_year(f, self.year)?;
        write!(f, "-{:02}-{:02}T{:02}:{:02}:", self.month, self.day, self.hour, self.minute)?;
        write_seconds(f, self.second)?;
        if let Some(timezone) = self.timezone {
            write!(f, "{timezone}")?;
        }
        Ok(())
    }
}

// ============================================================================
// date
// ============================================================================

/// An `xsd:date` value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateValue {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub timezone: Option<TimezoneOffset>,
}

impl DateValue {
    pub fn new(year: i32, month: u8, day: u8, timezone: Option<TimezoneOffset>) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month.into(), day.into())?;
        Some(Self {
            year,
            month,
            day,
            timezone,
        })
    }

    pub fn parse(lexical: &str) -> Option<Self> {
        let captures = DATE_LEXICAL.captures(lexical)?;
        let year: i32 = captures.get(1)?.as_str().parse().ok()?;
        Self::new(
            year,
            capture_u8(&captures, 2)?,
            capture_u8(&captures, 3)?,
            capture_timezone(&captures, 4)?,
        )
    }

    /// Midnight at the start of this date
    pub fn to_date_time(&self) -> DateTimeValue {
        DateTimeValue {
            year: self.year,
            month: self.month,
            day: self.day,
            hour: 0,
            minute: 0,
            second: Decimal::ZERO,
            timezone: self.timezone,
        }
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_year(f, self.year)?;
        write!(f, "-{:02}-{:02}", self.month, self.day)?;
        if let Some(timezone) = self.timezone {
            write!(f, "{timezone}")?;
        }
        Ok(())
    }
}

// ============================================================================
// time
// ============================================================================

/// An `xsd:time` value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeValue {
    pub hour: u8,
    pub minute: u8,
    pub second: Decimal,
    pub timezone: Option<TimezoneOffset>,
}

impl TimeValue {
    /// Reference date used to compare and shift times (XPath uses 1972-12-31)
    const REFERENCE: (i32, u8, u8) = (1972, 12, 31);

    pub fn new(hour: u8, minute: u8, second: Decimal, timezone: Option<TimezoneOffset>) -> Option<Self> {
        let (year, month, day) = Self::REFERENCE;
        DateTimeValue::new(year, month, day, hour, minute, second, timezone).map(|dt| dt.time())
    }

    pub fn parse(lexical: &str) -> Option<Self> {
        let captures = TIME_LEXICAL.captures(lexical)?;
        let hour = capture_u8(&captures, 1)?;
        let minute = capture_u8(&captures, 2)?;
        let second = Decimal::from_str(captures.get(3)?.as_str()).ok()?;
        let timezone = capture_timezone(&captures, 4)?;
        if hour == 24 && minute == 0 && second.is_zero() {
            return Self::new(0, 0, Decimal::ZERO, timezone);
        }
        Self::new(hour, minute, second, timezone)
    }

    /// This time on the reference date
    pub fn to_date_time(&self) -> DateTimeValue {
        let (year, month, day) = Self::REFERENCE;
        DateTimeValue {
            year,
            month,
            day,
            hour: self.hour,
            minute: self.minute,
            second: self.second,
            timezone: self.timezone,
        }
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:", self.hour, self.minute)?;
        write_seconds(f, self.second)?;
        if let Some(timezone) = self.timezone {
            write!(f, "{timezone}")?;
        }
        Ok(())
    }
}

// ============================================================================
// Durations
// ============================================================================

/// An `xsd:duration` normalized to (months, seconds)
///
/// Both components carry the same sign. A dayTimeDuration has zero months, a
/// yearMonthDuration zero seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DurationValue {
    pub months: i64,
    pub seconds: Decimal,
}

impl DurationValue {
    pub const ZERO: DurationValue = DurationValue {
        months: 0,
        seconds: Decimal::ZERO,
    };

    pub fn new(months: i64, seconds: Decimal) -> Option<Self> {
        let mixed = (months > 0 && seconds.is_sign_negative() && !seconds.is_zero())
            || (months < 0 && seconds.is_sign_positive() && !seconds.is_zero());
        (!mixed).then_some(Self { months, seconds })
    }

    pub fn day_time(seconds: Decimal) -> Self {
        Self { months: 0, seconds }
    }

    pub fn year_month(months: i64) -> Self {
        Self {
            months,
            seconds: Decimal::ZERO,
        }
    }

    pub fn parse(lexical: &str) -> Option<Self> {
        Self::parse_components(lexical).map(|(value, _, _)| value)
    }

    /// Lexical form restricted to days, hours, minutes and seconds
    pub fn parse_day_time(lexical: &str) -> Option<Self> {
        match Self::parse_components(lexical)? {
            (value, false, _) => Some(value),
            _ => None,
        }
    }

    /// Lexical form restricted to years and months
    pub fn parse_year_month(lexical: &str) -> Option<Self> {
        match Self::parse_components(lexical)? {
            (value, _, false) => Some(value),
            _ => None,
        }
    }

    /// Parses and reports whether year/month and day/time parts were present
    fn parse_components(lexical: &str) -> Option<(Self, bool, bool)> {
        if lexical.ends_with('T') || lexical.ends_with('P') {
            return None;
        }
        let captures = DURATION_LEXICAL.captures(lexical)?;
        let number = |index: usize| -> Option<i64> {
            captures.get(index).map_or(Some(0), |m| m.as_str().parse().ok())
        };
        let years = number(2)?;
        let months = number(3)?;
        let days = number(4)?;
        let hours = number(5)?;
        let minutes = number(6)?;
        let seconds = match captures.get(7) {
            Some(m) => Decimal::from_str(m.as_str()).ok()?,
            None => Decimal::ZERO,
        };
        let has_year_month = captures.get(2).is_some() || captures.get(3).is_some();
        let has_day_time = (4..=7).any(|index| captures.get(index).is_some());

        let total_months = years.checked_mul(12)?.checked_add(months)?;
        let whole_seconds = days
            .checked_mul(SECONDS_PER_DAY)?
            .checked_add(hours.checked_mul(3600)?)?
            .checked_add(minutes.checked_mul(60)?)?;
        let total_seconds = Decimal::from(whole_seconds).checked_add(seconds)?;
        let value = if captures.get(1).is_some() {
            Self::new(-total_months, -total_seconds)?
        } else {
            Self::new(total_months, total_seconds)?
        };
        Some((value, has_year_month, has_day_time))
    }

    pub fn negate(&self) -> Self {
        Self {
            months: -self.months,
            seconds: -self.seconds,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.months == 0 && self.seconds.is_zero()
    }

    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        Self::new(
            self.months.checked_add(other.months)?,
            self.seconds.checked_add(other.seconds)?,
        )
    }

    fn is_negative(&self) -> bool {
        self.months < 0 || (self.seconds.is_sign_negative() && !self.seconds.is_zero())
    }

    pub fn years(&self) -> i64 {
        self.months / 12
    }

    /// Month component after whole years are removed
    pub fn month_component(&self) -> i64 {
        self.months % 12
    }

    pub fn days(&self) -> i64 {
        (self.seconds / Decimal::from(SECONDS_PER_DAY)).trunc().to_i64().unwrap_or_default()
    }

    pub fn hours(&self) -> i64 {
        ((self.seconds % Decimal::from(SECONDS_PER_DAY)) / Decimal::from(3600))
            .trunc()
            .to_i64()
            .unwrap_or_default()
    }

    pub fn minutes(&self) -> i64 {
        ((self.seconds % Decimal::from(3600)) / Decimal::from(60))
            .trunc()
            .to_i64()
            .unwrap_or_default()
    }

    /// Seconds component after whole minutes are removed
    pub fn second_component(&self) -> Decimal {
        self.seconds % Decimal::from(60)
    }

    /// Canonical lexical form of a yearMonthDuration
    pub fn to_year_month_string(&self) -> String {
        if self.months == 0 {
            "P0M".to_string()
        } else {
            self.to_string()
        }
    }
}

impl fmt::Display for DurationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "PT0S");
        }
        let magnitude = if self.is_negative() { self.negate() } else { *self };
        if self.is_negative() {
            write!(f, "-")?;
        }
        write!(f, "P")?;
        let (years, months, days) = (magnitude.years(), magnitude.month_component(), magnitude.days());
        if years != 0 {
            write!(f, "{years}Y")?;
        }
        if months != 0 {
            write!(f, "{months}M")?;
        }
        if days != 0 {
            write!(f, "{days}D")?;
        }
        let (hours, minutes, seconds) = (magnitude.hours(), magnitude.minutes(), magnitude.second_component());
        if hours != 0 || minutes != 0 || !seconds.is_zero() {
            write!(f, "T")?;
            if hours != 0 {
                write!(f, "{hours}H")?;
            }
            if minutes != 0 {
                write!(f, "{minutes}M")?;
            }
            if !seconds.is_zero() {
                write!(f, "{}S", seconds.normalize())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dt(lexical: &str) -> DateTimeValue {
        DateTimeValue::parse(lexical).unwrap()
    }

    #[test]
    fn test_date_time_round_trip() {
        for lexical in ["2024-02-29T10:30:05Z", "2011-01-10T14:45:13.815-05:00", "-0044-03-15T12:00:00"] {
            assert_eq!(dt(lexical).to_string(), lexical);
        }
    }

    #[test]
    fn test_date_time_rejects_invalid_calendar() {
        assert!(DateTimeValue::parse("2023-02-29T00:00:00").is_none());
        assert!(DateTimeValue::parse("2023-01-01T25:00:00").is_none());
        assert!(DateTimeValue::parse("2023-01-01").is_none());
        assert!(DateTimeValue::parse("2023-01-01T00:00:00+15:00").is_none());
    }

    #[test]
    fn test_midnight_24_rolls_over() {
        assert_eq!(dt("1999-12-31T24:00:00Z").to_string(), "2000-01-01T00:00:00Z");
    }

    #[test]
    fn test_add_months_pins_day() {
        let result = dt("2024-01-31T00:00:00").add_duration(&DurationValue::year_month(1)).unwrap();
        assert_eq!(result.to_string(), "2024-02-29T00:00:00");
    }

    #[test]
    fn test_add_seconds_carries() {
        let duration = DurationValue::parse_day_time("PT1H30M").unwrap();
        let result = dt("2024-12-31T23:00:00Z").add_duration(&duration).unwrap();
        assert_eq!(result.to_string(), "2025-01-01T00:30:00Z");
        let back = result.subtract_duration(&duration).unwrap();
        assert_eq!(back.to_string(), "2024-12-31T23:00:00Z");
    }

    #[test]
    fn test_difference_uses_default_timezone() {
        let a = dt("2024-01-01T12:00:00");
        let b = dt("2024-01-01T12:00:00Z");
        let plus_two = TimezoneOffset::from_minutes(120).unwrap();
        assert_eq!(a.difference(&b, plus_two).to_string(), "-PT2H");
        assert_eq!(a.difference(&b, TimezoneOffset::UTC).to_string(), "PT0S");
    }

    #[test]
    fn test_duration_parsing_and_canonical_form() {
        assert_eq!(DurationValue::parse("P1Y2M3DT4H5M6.5S").unwrap().to_string(), "P1Y2M3DT4H5M6.5S");
        assert_eq!(DurationValue::parse("PT36H").unwrap().to_string(), "P1DT12H");
        assert_eq!(DurationValue::parse("-P14M").unwrap().to_string(), "-P1Y2M");
        assert!(DurationValue::parse("P").is_none());
        assert!(DurationValue::parse("P1DT").is_none());
        assert!(DurationValue::parse_day_time("P1Y").is_none());
        assert!(DurationValue::parse_year_month("P1D").is_none());
        assert_eq!(DurationValue::ZERO.to_year_month_string(), "P0M");
    }

    #[test]
    fn test_timezone_display() {
        assert_eq!(TimezoneOffset::parse("-05:30").unwrap().to_string(), "-05:30");
        assert_eq!(TimezoneOffset::parse("+00:00").unwrap().to_string(), "Z");
        assert_eq!(TimezoneOffset::parse("-05:30").unwrap().to_duration().to_string(), "-PT5H30M");
    }

    #[test]
    fn test_time_parse_and_date_parse() {
        assert_eq!(TimeValue::parse("09:05:00.25Z").unwrap().to_string(), "09:05:00.25Z");
        assert_eq!(DateValue::parse("2020-05-01+01:00").unwrap().to_string(), "2020-05-01+01:00");
        assert!(DateValue::parse("2020-13-01").is_none());
    }
}
