//! Date/Time Functions
//!
//! Implements: NOW, YEAR, MONTH, DAY, HOURS, MINUTES, SECONDS, TIMEZONE, TZ
//!
//! Date components accept `xsd:dateTime` and `xsd:date`, time components
//! `xsd:dateTime` and `xsd:time`.

use crate::builder::OverloadBuilder;
use crate::error::{EvalError, EvalResult};
use crate::operators::literal_arg;
use crate::overload::{ArgumentType, OverloadTable};
use sparqlee_types::{Literal, LiteralValue, Term, TimezoneOffset};

pub fn now() -> OverloadTable {
    OverloadBuilder::new("now")
        .set([], |_, ctx| Ok(Term::Literal(Literal::date_time(*ctx.now()))))
        .collect()
}

/// Calendar fields of a dateTime or date
fn date_fields(term: &Term) -> EvalResult<(i32, u8, u8)> {
    match &literal_arg(term)?.value {
        LiteralValue::DateTime(value) => Ok((value.year, value.month, value.day)),
        LiteralValue::Date(value) => Ok((value.year, value.month, value.day)),
        _ => Err(EvalError::internal(format!("{term} has no date part"))),
    }
}

/// Clock fields of a dateTime or time
fn time_fields(term: &Term) -> EvalResult<(u8, u8, rust_decimal::Decimal)> {
    match &literal_arg(term)?.value {
        LiteralValue::DateTime(value) => Ok((value.hour, value.minute, value.second)),
        LiteralValue::Time(value) => Ok((value.hour, value.minute, value.second)),
        _ => Err(EvalError::internal(format!("{term} has no time part"))),
    }
}

fn timezone_of(term: &Term) -> EvalResult<Option<TimezoneOffset>> {
    match &literal_arg(term)?.value {
        LiteralValue::DateTime(value) => Ok(value.timezone),
        LiteralValue::Date(value) => Ok(value.timezone),
        LiteralValue::Time(value) => Ok(value.timezone),
        _ => Err(EvalError::internal(format!("{term} has no timezone field"))),
    }
}

fn date_accessor(name: &'static str, field: fn((i32, u8, u8)) -> i64) -> OverloadTable {
    OverloadBuilder::new(name)
        .on_unary(ArgumentType::DATE_TIME, move |term, _| Ok(Term::integer(field(date_fields(term)?))))
        .copy([ArgumentType::DATE_TIME], [ArgumentType::DATE])
        .collect()
}

fn time_accessor(name: &'static str, field: fn(u8, u8) -> u8) -> OverloadTable {
    OverloadBuilder::new(name)
        .on_unary(ArgumentType::DATE_TIME, move |term, _| {
            let (hour, minute, _) = time_fields(term)?;
            Ok(Term::integer(i64::from(field(hour, minute))))
        })
        .copy([ArgumentType::DATE_TIME], [ArgumentType::TIME])
        .collect()
}

pub fn year() -> OverloadTable {
    date_accessor("year", |(year, _, _)| i64::from(year))
}

pub fn month() -> OverloadTable {
    date_accessor("month", |(_, month, _)| i64::from(month))
}

pub fn day() -> OverloadTable {
    date_accessor("day", |(_, _, day)| i64::from(day))
}

pub fn hours() -> OverloadTable {
    time_accessor("hours", |hour, _| hour)
}

pub fn minutes() -> OverloadTable {
    time_accessor("minutes", |_, minute| minute)
}

/// Seconds with their fractional part, as `xsd:decimal`
pub fn seconds() -> OverloadTable {
    OverloadBuilder::new("seconds")
        .on_unary(ArgumentType::DATE_TIME, |term, _| {
            let (_, _, second) = time_fields(term)?;
            Ok(Term::Literal(Literal::decimal(second)))
        })
        .copy([ArgumentType::DATE_TIME], [ArgumentType::TIME])
        .collect()
}

/// Timezone as an `xsd:dayTimeDuration`; fails without one
pub fn timezone() -> OverloadTable {
    OverloadBuilder::new("timezone")
        .on_unary(ArgumentType::DATE_TIME, |term, _| {
            let offset = timezone_of(term)?.ok_or_else(|| EvalError::timezone_unavailable(term.to_string()))?;
            Ok(Term::Literal(Literal::day_time_duration(offset.to_duration())))
        })
        .copy([ArgumentType::DATE_TIME], [ArgumentType::DATE])
        .copy([ArgumentType::DATE_TIME], [ArgumentType::TIME])
        .collect()
}

/// Timezone as a string (`Z`, `-05:00`); fails without one
pub fn tz() -> OverloadTable {
    OverloadBuilder::new("tz")
        .on_unary(ArgumentType::DATE_TIME, |term, _| {
            let offset = timezone_of(term)?.ok_or_else(|| EvalError::timezone_unavailable(term.to_string()))?;
            Ok(Term::string(offset.to_string()))
        })
        .copy([ArgumentType::DATE_TIME], [ArgumentType::DATE])
        .copy([ArgumentType::DATE_TIME], [ArgumentType::TIME])
        .collect()
}
