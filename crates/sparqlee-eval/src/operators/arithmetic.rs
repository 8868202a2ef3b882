//! Arithmetic Operators
//!
//! Implements: `+`, `-`, `*`, `/`, unary `+` and unary `-` over numerics,
//! date/time arithmetic with durations, and duration sums.
//!
//! Integer division yields `xsd:decimal`. Dividing an integer by zero is an
//! error; dividing a decimal by zero yields `INF`, `-INF` or `NaN` as
//! `xsd:double`.

use crate::builder::OverloadBuilder;
use crate::context::EvaluationContext;
use crate::error::{EvalError, EvalResult};
use crate::operators::{duration_arg, literal_arg, temporal_arg};
use crate::overload::{ArgumentType, OverloadTable};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sparqlee_types::{DurationValue, Literal, LiteralValue, Numeric, Term};

const DATE_TIME: ArgumentType = ArgumentType::DATE_TIME;
const DATE: ArgumentType = ArgumentType::DATE;
const TIME: ArgumentType = ArgumentType::TIME;
const DAY_TIME: ArgumentType = ArgumentType::DAY_TIME_DURATION;
const YEAR_MONTH: ArgumentType = ArgumentType::YEAR_MONTH_DURATION;

/// Lift per-kind operations into one numeric operation over unified operands
fn numeric_operation(
    name: &'static str,
    integer: fn(i64, i64) -> Option<i64>,
    decimal: fn(Decimal, Decimal) -> Option<Decimal>,
    float: fn(f64, f64) -> f64,
) -> impl Fn(Numeric, Numeric) -> EvalResult<Numeric> + Send + Sync + 'static {
    move |left, right| match Numeric::unify(left, right) {
        (Numeric::Integer(a), Numeric::Integer(b)) => {
            integer(a, b).map(Numeric::Integer).ok_or_else(|| EvalError::overflow(name))
        }
        (Numeric::Decimal(a), Numeric::Decimal(b)) => {
            decimal(a, b).map(Numeric::Decimal).ok_or_else(|| EvalError::overflow(name))
        }
        (Numeric::Float(a), Numeric::Float(b)) => Ok(Numeric::Float(float(f64::from(a), f64::from(b)) as f32)),
        (a, b) => Ok(Numeric::Double(float(a.to_f64(), b.to_f64()))),
    }
}

fn date_time_overflow() -> EvalError {
    EvalError::overflow("date/time arithmetic")
}

/// Shift a dateTime, date or time literal by a duration, keeping its type
fn shift(term: &Term, duration: &DurationValue) -> EvalResult<Term> {
    let shifted = temporal_arg(term)?
        .add_duration(duration)
        .ok_or_else(date_time_overflow)?;
    let literal = match literal_arg(term)?.value {
        LiteralValue::Date(_) => Literal::date(shifted.date()),
        LiteralValue::Time(_) => Literal::time(shifted.time()),
        _ => Literal::date_time(shifted),
    };
    Ok(literal.into())
}

fn add_duration(temporal: &Term, duration: &Term, _: &EvaluationContext) -> EvalResult<Term> {
    shift(temporal, &duration_arg(duration)?)
}

fn subtract_duration(temporal: &Term, duration: &Term, _: &EvaluationContext) -> EvalResult<Term> {
    shift(temporal, &duration_arg(duration)?.negate())
}

/// Difference of two dateTime, date or time values as a dayTimeDuration
fn difference(left: &Term, right: &Term, ctx: &EvaluationContext) -> EvalResult<Term> {
    let duration = temporal_arg(left)?.difference(&temporal_arg(right)?, ctx.default_timezone());
    Ok(Literal::day_time_duration(duration).into())
}

fn combine_durations(
    left: &Term,
    right: &Term,
    negate_right: bool,
    make: fn(DurationValue) -> Literal,
) -> EvalResult<Term> {
    let right = duration_arg(right)?;
    let right = if negate_right { right.negate() } else { right };
    duration_arg(left)?
        .checked_add(&right)
        .map(|sum| make(sum).into())
        .ok_or_else(|| EvalError::overflow("duration arithmetic"))
}

pub fn addition() -> OverloadTable {
    OverloadBuilder::new("+")
        .arithmetic(numeric_operation("+", i64::checked_add, Decimal::checked_add, |a, b| a + b))
        .on_binary(DATE_TIME, DAY_TIME, add_duration)
        .on_binary(DATE_TIME, YEAR_MONTH, add_duration)
        .copy([DATE_TIME, DAY_TIME], [DATE, DAY_TIME])
        .copy([DATE_TIME, YEAR_MONTH], [DATE, YEAR_MONTH])
        .copy([DATE_TIME, DAY_TIME], [TIME, DAY_TIME])
        .on_binary(DAY_TIME, DAY_TIME, |a, b, _| combine_durations(a, b, false, Literal::day_time_duration))
        .on_binary(YEAR_MONTH, YEAR_MONTH, |a, b, _| {
            combine_durations(a, b, false, Literal::year_month_duration)
        })
        .collect()
}

pub fn subtraction() -> OverloadTable {
    OverloadBuilder::new("-")
        .arithmetic(numeric_operation("-", i64::checked_sub, Decimal::checked_sub, |a, b| a - b))
        .on_binary(DATE_TIME, DATE_TIME, difference)
        .copy([DATE_TIME, DATE_TIME], [DATE, DATE])
        .copy([DATE_TIME, DATE_TIME], [TIME, TIME])
        .on_binary(DATE_TIME, DAY_TIME, subtract_duration)
        .on_binary(DATE_TIME, YEAR_MONTH, subtract_duration)
        .copy([DATE_TIME, DAY_TIME], [DATE, DAY_TIME])
        .copy([DATE_TIME, YEAR_MONTH], [DATE, YEAR_MONTH])
        .copy([DATE_TIME, DAY_TIME], [TIME, DAY_TIME])
        .on_binary(DAY_TIME, DAY_TIME, |a, b, _| combine_durations(a, b, true, Literal::day_time_duration))
        .on_binary(YEAR_MONTH, YEAR_MONTH, |a, b, _| {
            combine_durations(a, b, true, Literal::year_month_duration)
        })
        .collect()
}

pub fn multiplication() -> OverloadTable {
    OverloadBuilder::new("*")
        .arithmetic(numeric_operation("*", i64::checked_mul, Decimal::checked_mul, |a, b| a * b))
        .collect()
}

pub fn division() -> OverloadTable {
    OverloadBuilder::new("/")
        .arithmetic(|left, right| match Numeric::unify(left, right) {
            (Numeric::Integer(a), Numeric::Integer(b)) => {
                if b == 0 {
                    return Err(EvalError::DivisionByZero);
                }
                Decimal::from(a)
                    .checked_div(Decimal::from(b))
                    .map(Numeric::Decimal)
                    .ok_or_else(|| EvalError::overflow("/"))
            }
            (Numeric::Decimal(a), Numeric::Decimal(b)) => {
                if b.is_zero() {
                    let numerator = a.to_f64().unwrap_or_default();
                    return Ok(Numeric::Double(numerator / 0.0));
                }
                a.checked_div(b).map(Numeric::Decimal).ok_or_else(|| EvalError::overflow("/"))
            }
            (Numeric::Float(a), Numeric::Float(b)) => Ok(Numeric::Float(a / b)),
            (a, b) => Ok(Numeric::Double(a.to_f64() / b.to_f64())),
        })
        .collect()
}

pub fn unary_plus() -> OverloadTable {
    OverloadBuilder::new("UPLUS").numeric_converter(Ok).collect()
}

pub fn unary_minus() -> OverloadTable {
    OverloadBuilder::new("UMINUS")
        .numeric_converter(|value| match value {
            Numeric::Integer(v) => v
                .checked_neg()
                .map(Numeric::Integer)
                .ok_or_else(|| EvalError::overflow("UMINUS")),
            Numeric::Decimal(v) => Ok(Numeric::Decimal(-v)),
            Numeric::Float(v) => Ok(Numeric::Float(-v)),
            Numeric::Double(v) => Ok(Numeric::Double(-v)),
        })
        .collect()
}
