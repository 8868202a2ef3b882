//! Numeric values
//!
//! The four XSD numeric primitives share one tagged value type. Behaviour that
//! differs per kind (formatting, promotion) dispatches on [`NumericKind`].

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::hierarchy::PrimitiveType;
use crate::vocab::xsd;

/// Numeric kinds ordered by the XPath promotion lattice
///
/// `integer < decimal < float < double`, so the least upper bound of two
/// kinds is simply their maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumericKind {
    Integer,
    Decimal,
    Float,
    Double,
}

impl NumericKind {
    pub const ALL: [NumericKind; 4] = [Self::Integer, Self::Decimal, Self::Float, Self::Double];

    pub fn datatype(self) -> &'static str {
        match self {
            Self::Integer => xsd::INTEGER,
            Self::Decimal => xsd::DECIMAL,
            Self::Float => xsd::FLOAT,
            Self::Double => xsd::DOUBLE,
        }
    }

    pub fn from_datatype(iri: &str) -> Option<Self> {
        PrimitiveType::from_iri(iri).and_then(Self::from_primitive)
    }

    pub fn from_primitive(primitive: PrimitiveType) -> Option<Self> {
        match primitive {
            PrimitiveType::Integer => Some(Self::Integer),
            PrimitiveType::Decimal => Some(Self::Decimal),
            PrimitiveType::Float => Some(Self::Float),
            PrimitiveType::Double => Some(Self::Double),
            _ => None,
        }
    }

    /// Strictly wider kinds this one promotes to, nearest first
    pub fn promotions(self) -> &'static [NumericKind] {
        match self {
            Self::Integer => &[Self::Decimal, Self::Float, Self::Double],
            Self::Decimal => &[Self::Float, Self::Double],
            Self::Float => &[Self::Double],
            Self::Double => &[],
        }
    }

    pub fn least_upper_bound(self, other: Self) -> Self {
        self.max(other)
    }
}

/// A numeric typed value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Integer(i64),
    Decimal(Decimal),
    Float(f32),
    Double(f64),
}

impl Numeric {
    pub fn kind(&self) -> NumericKind {
        match self {
            Self::Integer(_) => NumericKind::Integer,
            Self::Decimal(_) => NumericKind::Decimal,
            Self::Float(_) => NumericKind::Float,
            Self::Double(_) => NumericKind::Double,
        }
    }

    /// Convert to a wider kind; requests to narrow return the value unchanged
    pub fn promote(self, kind: NumericKind) -> Numeric {
        if kind <= self.kind() {
            return self;
        }
        match kind {
            NumericKind::Integer => self,
            NumericKind::Decimal => match self {
                Self::Integer(v) => Self::Decimal(Decimal::from(v)),
                other => other,
            },
            NumericKind::Float => Self::Float(self.to_f64() as f32),
            NumericKind::Double => Self::Double(self.to_f64()),
        }
    }

    /// Promote both operands to their least upper bound
    pub fn unify(left: Numeric, right: Numeric) -> (Numeric, Numeric) {
        let kind = left.kind().least_upper_bound(right.kind());
        (left.promote(kind), right.promote(kind))
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Self::Integer(v) => *v as f64,
            Self::Decimal(v) => v.to_f64().unwrap_or(f64::NAN),
            Self::Float(v) => f64::from(*v),
            Self::Double(v) => *v,
        }
    }

    /// Exact decimal value; `None` for NaN and infinities
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Integer(v) => Some(Decimal::from(*v)),
            Self::Decimal(v) => Some(*v),
            Self::Float(v) => Decimal::from_f32(*v),
            Self::Double(v) => Decimal::from_f64(*v),
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Self::Integer(v) => *v == 0,
            Self::Decimal(v) => v.is_zero(),
            Self::Float(v) => *v == 0.0,
            Self::Double(v) => *v == 0.0,
        }
    }

    pub fn is_nan(&self) -> bool {
        match self {
            Self::Float(v) => v.is_nan(),
            Self::Double(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Effective boolean value: false for zero and NaN
    pub fn ebv(&self) -> bool {
        !(self.is_zero() || self.is_nan())
    }

    /// Value comparison after promotion; `None` when NaN is involved
    pub fn compare(&self, other: &Numeric) -> Option<Ordering> {
        match Numeric::unify(*self, *other) {
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(&b)),
            (Self::Decimal(a), Self::Decimal(b)) => Some(a.cmp(&b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(&b),
            (a, b) => a.to_f64().partial_cmp(&b.to_f64()),
        }
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{}", v.normalize()),
            Self::Float(v) => f.write_str(&format_float(*v)),
            Self::Double(v) => f.write_str(&format_double(*v)),
        }
    }
}

/// Plain decimal rendering with XSD names for the special values
pub fn format_float(value: f32) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "INF" } else { "-INF" }.to_string()
    } else {
        value.to_string()
    }
}

/// XPath canonical double: `{mantissa}E{exponent}`, the mantissa always
/// carrying a decimal point and the exponent never a `+`
pub fn format_double(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "INF" } else { "-INF" }.to_string();
    }
    let formatted = format!("{value:E}");
    let (mantissa, exponent) = formatted.split_once('E').unwrap_or((formatted.as_str(), "0"));
    let exponent = exponent.trim_start_matches('+');
    if mantissa.contains('.') {
        format!("{mantissa}E{exponent}")
    } else {
        format!("{mantissa}.0E{exponent}")
    }
}

// ============================================================================
// Lexical parsing
// ============================================================================

static INTEGER_LEXICAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?[0-9]+$").expect("valid integer pattern"));
static DECIMAL_LEXICAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)$").expect("valid decimal pattern")
});
static DOUBLE_LEXICAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?|[+-]?INF|NaN)$")
        .expect("valid double pattern")
});

pub fn parse_integer(lexical: &str) -> Option<i64> {
    if !INTEGER_LEXICAL.is_match(lexical) {
        return None;
    }
    i64::from_str(lexical).ok()
}

pub fn parse_decimal(lexical: &str) -> Option<Decimal> {
    if !DECIMAL_LEXICAL.is_match(lexical) {
        return None;
    }
    let (negative, digits) = match lexical.as_bytes().first() {
        Some(b'-') => (true, &lexical[1..]),
        Some(b'+') => (false, &lexical[1..]),
        _ => (false, lexical),
    };
    let digits = digits.strip_suffix('.').unwrap_or(digits);
    let normalized = if digits.starts_with('.') {
        format!("0{digits}")
    } else {
        digits.to_string()
    };
    let value = Decimal::from_str(&normalized).ok()?;
    Some(if negative { -value } else { value })
}

pub fn parse_double(lexical: &str) -> Option<f64> {
    if !DOUBLE_LEXICAL.is_match(lexical) {
        return None;
    }
    f64::from_str(lexical).ok()
}

pub fn parse_boolean(lexical: &str) -> Option<bool> {
    match lexical {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
