//! Literal terms
//!
//! A literal is a typed value plus its datatype IRI, an optional
//! authoritative lexical form and an optional language tag. Each concrete
//! value space is one [`LiteralValue`] variant; the lexical form, when not
//! given, is produced by that variant's formatter.

use rust_decimal::Decimal;

use crate::error::TermError;
use crate::numeric::{Numeric, NumericKind};
use crate::rdf::RdfLiteral;
use crate::temporal::{DateTimeValue, DateValue, DurationValue, TimeValue};
use crate::vocab::{rdf, xsd};

/// What a literal with an invalid lexical form would have been
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NonLexicalCategory {
    /// Declared datatype derives from a numeric type
    NumericLike,
    /// Declared datatype derives from `xsd:boolean`
    BooleanLike,
    Opaque,
}

/// The typed value of a literal
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Numeric(Numeric),
    Boolean(bool),
    String(String),
    LangString(String),
    DateTime(DateTimeValue),
    Date(DateValue),
    Time(TimeValue),
    Duration(DurationValue),
    DayTimeDuration(DurationValue),
    YearMonthDuration(DurationValue),
    /// Invalid lexical form for the declared datatype; the literal's
    /// `lexical` field holds the original string
    NonLexical(NonLexicalCategory),
    /// A datatype outside the known value spaces
    Other(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: LiteralValue,
    pub datatype: String,
    pub lexical: Option<String>,
    pub language: Option<String>,
}

impl Literal {
    fn typed(value: LiteralValue, datatype: &str) -> Self {
        Self {
            value,
            datatype: datatype.to_string(),
            lexical: None,
            language: None,
        }
    }

    pub fn from_numeric(value: Numeric) -> Self {
        Self::typed(LiteralValue::Numeric(value), value.kind().datatype())
    }

    pub fn integer(value: i64) -> Self {
        Self::from_numeric(Numeric::Integer(value))
    }

    pub fn decimal(value: Decimal) -> Self {
        Self::from_numeric(Numeric::Decimal(value))
    }

    pub fn float(value: f32) -> Self {
        Self::from_numeric(Numeric::Float(value))
    }

    pub fn double(value: f64) -> Self {
        Self::from_numeric(Numeric::Double(value))
    }

    pub fn boolean(value: bool) -> Self {
        Self::typed(LiteralValue::Boolean(value), xsd::BOOLEAN)
    }

    /// A plain `xsd:string` literal
    pub fn string(value: impl Into<String>) -> Self {
        Self::typed(LiteralValue::String(value.into()), xsd::STRING)
    }

    pub fn lang_string(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            value: LiteralValue::LangString(value.into()),
            datatype: rdf::LANG_STRING.to_string(),
            lexical: None,
            language: Some(language.into()),
        }
    }

    pub fn date_time(value: DateTimeValue) -> Self {
        Self::typed(LiteralValue::DateTime(value), xsd::DATE_TIME)
    }

    pub fn date(value: DateValue) -> Self {
        Self::typed(LiteralValue::Date(value), xsd::DATE)
    }

    pub fn time(value: TimeValue) -> Self {
        Self::typed(LiteralValue::Time(value), xsd::TIME)
    }

    pub fn duration(value: DurationValue) -> Self {
        Self::typed(LiteralValue::Duration(value), xsd::DURATION)
    }

    pub fn day_time_duration(value: DurationValue) -> Self {
        Self::typed(LiteralValue::DayTimeDuration(value), xsd::DAY_TIME_DURATION)
    }

    pub fn year_month_duration(value: DurationValue) -> Self {
        Self::typed(LiteralValue::YearMonthDuration(value), xsd::YEAR_MONTH_DURATION)
    }

    pub fn non_lexical(
        lexical: impl Into<String>,
        datatype: impl Into<String>,
        category: NonLexicalCategory,
    ) -> Self {
        Self {
            value: LiteralValue::NonLexical(category),
            datatype: datatype.into(),
            lexical: Some(lexical.into()),
            language: None,
        }
    }

    pub fn other(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            value: LiteralValue::Other(lexical.into()),
            datatype: datatype.into(),
            lexical: None,
            language: None,
        }
    }

    /// Keep `lexical` as the authoritative string form
    pub fn with_lexical(mut self, lexical: impl Into<String>) -> Self {
        self.lexical = Some(lexical.into());
        self
    }

    /// Re-label with a derived datatype (e.g. `xsd:short` for an integer)
    pub fn with_datatype(mut self, datatype: impl Into<String>) -> Self {
        self.datatype = datatype.into();
        self
    }

    /// Lexical form
    pub fn str(&self) -> String {
        match &self.lexical {
            Some(lexical) => lexical.clone(),
            None => self.format_value(),
        }
    }

    fn format_value(&self) -> String {
        match &self.value {
            LiteralValue::Numeric(value) => value.to_string(),
            LiteralValue::Boolean(value) => value.to_string(),
            LiteralValue::String(value) | LiteralValue::LangString(value) | LiteralValue::Other(value) => {
                value.clone()
            }
            LiteralValue::DateTime(value) => value.to_string(),
            LiteralValue::Date(value) => value.to_string(),
            LiteralValue::Time(value) => value.to_string(),
            LiteralValue::Duration(value) | LiteralValue::DayTimeDuration(value) => value.to_string(),
            LiteralValue::YearMonthDuration(value) => value.to_year_month_string(),
            LiteralValue::NonLexical(_) => String::new(),
        }
    }

    pub fn coerce_ebv(&self) -> Result<bool, TermError> {
        match &self.value {
            LiteralValue::Boolean(value) => Ok(*value),
            LiteralValue::Numeric(value) => Ok(value.ebv()),
            LiteralValue::String(_) | LiteralValue::LangString(_) => Ok(!self.str().is_empty()),
            LiteralValue::NonLexical(NonLexicalCategory::NumericLike | NonLexicalCategory::BooleanLike) => {
                Ok(false)
            }
            _ => Err(TermError::ebv_coercion(self.to_rdf().to_string())),
        }
    }

    pub fn to_rdf(&self) -> RdfLiteral {
        RdfLiteral {
            value: self.str(),
            datatype: self.datatype.clone(),
            language: self.language.clone(),
        }
    }

    pub fn as_numeric(&self) -> Option<&Numeric> {
        match &self.value {
            LiteralValue::Numeric(value) => Some(value),
            _ => None,
        }
    }

    pub fn numeric_kind(&self) -> Option<NumericKind> {
        self.as_numeric().map(Numeric::kind)
    }

    pub fn is_non_lexical(&self) -> bool {
        matches!(self.value, LiteralValue::NonLexical(_))
    }

    /// Value of a plain or language-tagged string
    pub fn string_value(&self) -> Option<&str> {
        match &self.value {
            LiteralValue::String(value) | LiteralValue::LangString(value) => Some(value),
            _ => None,
        }
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}
