//! SPARQL Operator and Function Implementations
//!
//! Each module builds the overload tables of one family of functions:
//! - Logical and arithmetic operators (`!`, `+`, `-`, `*`, `/`, unary `+`/`-`)
//! - Comparison operators (`=`, `!=`, `<`, `>`, `<=`, `>=`)
//! - RDF term functions (isIRI, STR, LANG, DATATYPE, IRI, STRDT, ...)
//! - String functions (STRLEN, SUBSTR, REGEX, REPLACE, ...)
//! - Numeric functions (ABS, ROUND, CEIL, FLOOR, RAND)
//! - Date/time functions (NOW, YEAR, ..., TIMEZONE, TZ)
//! - Hash functions (MD5, SHA1, SHA256, SHA384, SHA512)
//! - RDF-star functions (TRIPLE, SUBJECT, PREDICATE, OBJECT, isTRIPLE)
//! - XSD constructor functions (casts addressed by datatype IRI)

pub mod arithmetic;
pub mod cast;
pub mod comparison;
pub mod datetime;
pub mod hash;
pub mod logical;
pub mod numeric;
pub mod string;
pub mod term;
pub mod triple;

use crate::error::{EvalError, EvalResult, describe};
use sparqlee_types::{
    DateTimeValue, DurationValue, Literal, LiteralValue, NamedNode, Numeric, Term,
};

// ============================================================================
// Argument accessors
//
// Rules only run on arguments matching their signature, so a mismatch here
// means a rule was registered with the wrong implementation.
// ============================================================================

fn mismatch(expected: &str, term: &Term) -> EvalError {
    EvalError::internal(format!("expected {expected} argument, got {}", describe(term)))
}

pub fn literal_arg(term: &Term) -> EvalResult<&Literal> {
    term.as_literal().ok_or_else(|| mismatch("literal", term))
}

pub fn numeric_arg(term: &Term) -> EvalResult<Numeric> {
    literal_arg(term)?
        .as_numeric()
        .copied()
        .ok_or_else(|| mismatch("numeric", term))
}

pub fn boolean_arg(term: &Term) -> EvalResult<bool> {
    match &literal_arg(term)?.value {
        LiteralValue::Boolean(value) => Ok(*value),
        _ => Err(mismatch("boolean", term)),
    }
}

pub fn integer_arg(term: &Term) -> EvalResult<i64> {
    match numeric_arg(term)? {
        Numeric::Integer(value) => Ok(value),
        _ => Err(mismatch("integer", term)),
    }
}

/// Plain or language-tagged string literal
pub fn string_literal_arg(term: &Term) -> EvalResult<&Literal> {
    let literal = literal_arg(term)?;
    match literal.value {
        LiteralValue::String(_) | LiteralValue::LangString(_) => Ok(literal),
        _ => Err(mismatch("string", term)),
    }
}

/// String value of a plain or language-tagged string literal
pub fn string_arg(term: &Term) -> EvalResult<&str> {
    string_literal_arg(term)?
        .string_value()
        .ok_or_else(|| mismatch("string", term))
}

/// dateTime, date and time values as a dateTime (dates at midnight, times on
/// the reference day)
pub fn temporal_arg(term: &Term) -> EvalResult<DateTimeValue> {
    match &literal_arg(term)?.value {
        LiteralValue::DateTime(value) => Ok(*value),
        LiteralValue::Date(value) => Ok(value.to_date_time()),
        LiteralValue::Time(value) => Ok(value.to_date_time()),
        _ => Err(mismatch("date/time", term)),
    }
}

pub fn duration_arg(term: &Term) -> EvalResult<DurationValue> {
    match &literal_arg(term)?.value {
        LiteralValue::Duration(value)
        | LiteralValue::DayTimeDuration(value)
        | LiteralValue::YearMonthDuration(value) => Ok(*value),
        _ => Err(mismatch("duration", term)),
    }
}

pub fn named_node_arg(term: &Term) -> EvalResult<&NamedNode> {
    term.as_named_node().ok_or_else(|| mismatch("IRI", term))
}

/// A string result carrying the language tag of `source`, if any
pub fn string_like(source: &Literal, value: impl Into<String>) -> Term {
    match source.language() {
        Some(language) => Term::lang_string(value, language),
        None => Term::string(value),
    }
}
