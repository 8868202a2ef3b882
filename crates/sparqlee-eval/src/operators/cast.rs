//! XSD Constructor Functions
//!
//! Casts addressed by datatype IRI, e.g. `xsd:integer("12")`. Implements
//! casts to string, boolean, integer, decimal, float, double, dateTime, date,
//! time, duration, dayTimeDuration and yearMonthDuration.
//!
//! Casting from a string parses the trimmed value against the target
//! datatype; a value outside the target's lexical space is a cast error.

use crate::builder::OverloadBuilder;
use crate::context::EvaluationContext;
use crate::error::{EvalError, EvalResult};
use crate::operators::{boolean_arg, duration_arg, numeric_arg, string_arg, temporal_arg};
use crate::overload::{ArgumentType, OverloadTable};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use sparqlee_types::vocab::xsd;
use sparqlee_types::{DurationValue, Literal, Numeric, NumericKind, Term};

/// Every cast, keyed by target datatype IRI
pub fn all() -> Vec<(&'static str, OverloadTable)> {
    vec![
        (xsd::STRING, to_string()),
        (xsd::BOOLEAN, to_boolean()),
        (xsd::INTEGER, to_integer()),
        (xsd::DECIMAL, to_decimal()),
        (xsd::FLOAT, to_float()),
        (xsd::DOUBLE, to_double()),
        (xsd::DATE_TIME, to_date_time()),
        (xsd::DATE, to_date()),
        (xsd::TIME, to_time()),
        (xsd::DURATION, to_duration()),
        (xsd::DAY_TIME_DURATION, to_day_time_duration()),
        (xsd::YEAR_MONTH_DURATION, to_year_month_duration()),
    ]
}

/// Parse a string argument as `target`, canonicalizing the lexical form
fn parse_string(target: &'static str) -> impl Fn(&Term, &EvaluationContext) -> EvalResult<Term> + Send + Sync + 'static {
    move |term, ctx| {
        let mut literal = ctx.transformer().literal(string_arg(term)?.trim(), target, None);
        if literal.is_non_lexical() {
            return Err(EvalError::cast(term, target));
        }
        literal.lexical = None;
        Ok(literal.into())
    }
}

/// One rule per numeric source kind
fn from_numeric<F>(mut builder: OverloadBuilder, target: &'static str, convert: F) -> OverloadBuilder
where
    F: Fn(Numeric) -> Option<Literal> + Send + Sync + Copy + 'static,
{
    for kind in NumericKind::ALL {
        builder = builder.on_unary(ArgumentType::numeric(kind), move |term, _| {
            convert(numeric_arg(term)?)
                .map(Term::from)
                .ok_or_else(|| EvalError::cast(term, target))
        });
    }
    builder
}

fn boolean_number(value: bool) -> i64 {
    i64::from(value)
}

/// Truncate towards zero, rejecting NaN, infinities and out-of-range values
fn truncate_float(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value.trunc())?.to_i64()
}

pub fn to_string() -> OverloadTable {
    OverloadBuilder::new(xsd::STRING)
        .on_unary(ArgumentType::Literal, |term, _| Ok(Term::string(term.str()?)))
        .on_unary(ArgumentType::NamedNode, |term, _| Ok(Term::string(term.str()?)))
        .collect()
}

pub fn to_boolean() -> OverloadTable {
    let builder = OverloadBuilder::new(xsd::BOOLEAN)
        .on_unary(ArgumentType::BOOLEAN, |term, _| Ok(Term::boolean(boolean_arg(term)?)))
        .on_unary(ArgumentType::STRING, parse_string(xsd::BOOLEAN));
    from_numeric(builder, xsd::BOOLEAN, |value| Some(Literal::boolean(value.ebv()))).collect()
}

pub fn to_integer() -> OverloadTable {
    let builder = OverloadBuilder::new(xsd::INTEGER)
        .on_unary(ArgumentType::BOOLEAN, |term, _| Ok(Term::integer(boolean_number(boolean_arg(term)?))))
        .on_unary(ArgumentType::STRING, parse_string(xsd::INTEGER));
    from_numeric(builder, xsd::INTEGER, |value| {
        let integer = match value {
            Numeric::Integer(v) => Some(v),
            Numeric::Decimal(v) => v.trunc().to_i64(),
            Numeric::Float(v) => truncate_float(f64::from(v)),
            Numeric::Double(v) => truncate_float(v),
        };
        integer.map(Literal::integer)
    })
    .collect()
}

pub fn to_decimal() -> OverloadTable {
    let builder = OverloadBuilder::new(xsd::DECIMAL)
        .on_unary(ArgumentType::BOOLEAN, |term, _| {
            Ok(Term::Literal(Literal::decimal(Decimal::from(boolean_number(boolean_arg(term)?)))))
        })
        .on_unary(ArgumentType::STRING, parse_string(xsd::DECIMAL));
    from_numeric(builder, xsd::DECIMAL, |value| value.to_decimal().map(Literal::decimal)).collect()
}

pub fn to_float() -> OverloadTable {
    let builder = OverloadBuilder::new(xsd::FLOAT)
        .on_unary(ArgumentType::BOOLEAN, |term, _| {
            Ok(Term::Literal(Literal::float(if boolean_arg(term)? { 1.0 } else { 0.0 })))
        })
        .on_unary(ArgumentType::STRING, parse_string(xsd::FLOAT));
    from_numeric(builder, xsd::FLOAT, |value| {
        let float = match value {
            Numeric::Float(v) => v,
            other => other.to_f64() as f32,
        };
        Some(Literal::float(float))
    })
    .collect()
}

pub fn to_double() -> OverloadTable {
    let builder = OverloadBuilder::new(xsd::DOUBLE)
        .on_unary(ArgumentType::BOOLEAN, |term, _| {
            Ok(Term::Literal(Literal::double(if boolean_arg(term)? { 1.0 } else { 0.0 })))
        })
        .on_unary(ArgumentType::STRING, parse_string(xsd::DOUBLE));
    from_numeric(builder, xsd::DOUBLE, |value| Some(Literal::double(value.to_f64()))).collect()
}

pub fn to_date_time() -> OverloadTable {
    OverloadBuilder::new(xsd::DATE_TIME)
        .on_unary(ArgumentType::DATE_TIME, |term, _| Ok(Term::Literal(Literal::date_time(temporal_arg(term)?))))
        .copy([ArgumentType::DATE_TIME], [ArgumentType::DATE])
        .on_unary(ArgumentType::STRING, parse_string(xsd::DATE_TIME))
        .collect()
}

pub fn to_date() -> OverloadTable {
    OverloadBuilder::new(xsd::DATE)
        .on_unary(ArgumentType::DATE_TIME, |term, _| Ok(Term::Literal(Literal::date(temporal_arg(term)?.date()))))
        .copy([ArgumentType::DATE_TIME], [ArgumentType::DATE])
        .on_unary(ArgumentType::STRING, parse_string(xsd::DATE))
        .collect()
}

pub fn to_time() -> OverloadTable {
    OverloadBuilder::new(xsd::TIME)
        .on_unary(ArgumentType::DATE_TIME, |term, _| Ok(Term::Literal(Literal::time(temporal_arg(term)?.time()))))
        .copy([ArgumentType::DATE_TIME], [ArgumentType::TIME])
        .on_unary(ArgumentType::STRING, parse_string(xsd::TIME))
        .collect()
}

pub fn to_duration() -> OverloadTable {
    OverloadBuilder::new(xsd::DURATION)
        .on_unary(ArgumentType::DURATION, |term, _| Ok(Term::Literal(Literal::duration(duration_arg(term)?))))
        .on_unary(ArgumentType::STRING, parse_string(xsd::DURATION))
        .collect()
}

pub fn to_day_time_duration() -> OverloadTable {
    OverloadBuilder::new(xsd::DAY_TIME_DURATION)
        .on_unary(ArgumentType::DURATION, |term, _| {
            let seconds = duration_arg(term)?.seconds;
            Ok(Term::Literal(Literal::day_time_duration(DurationValue::day_time(seconds))))
        })
        .on_unary(ArgumentType::STRING, parse_string(xsd::DAY_TIME_DURATION))
        .collect()
}

pub fn to_year_month_duration() -> OverloadTable {
    OverloadBuilder::new(xsd::YEAR_MONTH_DURATION)
        .on_unary(ArgumentType::DURATION, |term, _| {
            let months = duration_arg(term)?.months;
            Ok(Term::Literal(Literal::year_month_duration(DurationValue::year_month(months))))
        })
        .on_unary(ArgumentType::STRING, parse_string(xsd::YEAR_MONTH_DURATION))
        .collect()
}
