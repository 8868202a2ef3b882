//! Datatype hierarchy
//!
//! Overload resolution and literal parsing only know a handful of primitive
//! datatypes. Everything else reaches them by walking up a [`TypeHierarchy`]:
//! `xsd:short` is handled as `xsd:integer`, a custom `ex:age` registered as a
//! subtype of `xsd:byte` is handled as `xsd:integer` too.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

use crate::vocab::{rdf, xsd};

/// Guards against cyclic user registrations
const MAX_DEPTH: usize = 32;

/// Answers subtype queries over datatype IRIs
pub trait TypeHierarchy: Send + Sync + fmt::Debug {
    /// Direct supertype of `datatype`, if it has one
    fn parent_of(&self, datatype: &str) -> Option<String>;

    /// All supertypes of `datatype`, nearest first
    fn ancestors(&self, datatype: &str) -> Vec<String> {
        let mut result: Vec<String> = Vec::new();
        let mut current = datatype.to_string();
        while let Some(parent) = self.parent_of(&current) {
            if parent == datatype || result.contains(&parent) || result.len() >= MAX_DEPTH {
                break;
            }
            result.push(parent.clone());
            current = parent;
        }
        result
    }

    /// Whether `subtype` is `supertype` or derives from it
    fn is_subtype_of(&self, subtype: &str, supertype: &str) -> bool {
        subtype == supertype || self.ancestors(subtype).iter().any(|a| a == supertype)
    }
}

/// Built-in XSD derivations (child -> parent)
static XSD_DERIVATIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (xsd::INTEGER, xsd::DECIMAL),
        (xsd::NON_POSITIVE_INTEGER, xsd::INTEGER),
        (xsd::NEGATIVE_INTEGER, xsd::NON_POSITIVE_INTEGER),
        (xsd::LONG, xsd::INTEGER),
        (xsd::INT, xsd::LONG),
        (xsd::SHORT, xsd::INT),
        (xsd::BYTE, xsd::SHORT),
        (xsd::NON_NEGATIVE_INTEGER, xsd::INTEGER),
        (xsd::UNSIGNED_LONG, xsd::NON_NEGATIVE_INTEGER),
        (xsd::UNSIGNED_INT, xsd::UNSIGNED_LONG),
        (xsd::UNSIGNED_SHORT, xsd::UNSIGNED_INT),
        (xsd::UNSIGNED_BYTE, xsd::UNSIGNED_SHORT),
        (xsd::POSITIVE_INTEGER, xsd::NON_NEGATIVE_INTEGER),
        (xsd::NORMALIZED_STRING, xsd::STRING),
        (xsd::TOKEN, xsd::NORMALIZED_STRING),
        (xsd::LANGUAGE, xsd::TOKEN),
        (xsd::NMTOKEN, xsd::TOKEN),
        (xsd::NAME, xsd::TOKEN),
        (xsd::NCNAME, xsd::NAME),
        (xsd::ENTITY, xsd::NCNAME),
        (xsd::ID, xsd::NCNAME),
        (xsd::IDREF, xsd::NCNAME),
        (xsd::DAY_TIME_DURATION, xsd::DURATION),
        (xsd::YEAR_MONTH_DURATION, xsd::DURATION),
        (xsd::DATE_TIME_STAMP, xsd::DATE_TIME),
    ])
});

/// Value ranges of the bounded integer datatypes
static INTEGER_BOUNDS: Lazy<HashMap<&'static str, (i64, i64)>> = Lazy::new(|| {
    HashMap::from([
        (xsd::NON_POSITIVE_INTEGER, (i64::MIN, 0)),
        (xsd::NEGATIVE_INTEGER, (i64::MIN, -1)),
        (xsd::INT, (i64::from(i32::MIN), i64::from(i32::MAX))),
        (xsd::SHORT, (i64::from(i16::MIN), i64::from(i16::MAX))),
        (xsd::BYTE, (i64::from(i8::MIN), i64::from(i8::MAX))),
        (xsd::NON_NEGATIVE_INTEGER, (0, i64::MAX)),
        (xsd::UNSIGNED_LONG, (0, i64::MAX)),
        (xsd::UNSIGNED_INT, (0, i64::from(u32::MAX))),
        (xsd::UNSIGNED_SHORT, (0, i64::from(u16::MAX))),
        (xsd::UNSIGNED_BYTE, (0, i64::from(u8::MAX))),
        (xsd::POSITIVE_INTEGER, (1, i64::MAX)),
    ])
});

/// Range restriction of a bounded integer datatype
pub fn integer_bounds(datatype: &str) -> Option<(i64, i64)> {
    INTEGER_BOUNDS.get(datatype).copied()
}

/// The XSD derivation tree, optionally extended with custom datatypes
#[derive(Debug, Clone, Default)]
pub struct XsdTypeHierarchy {
    extensions: HashMap<String, String>,
}

impl XsdTypeHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `subtype` as deriving directly from `supertype`
    pub fn with_subtype(mut self, subtype: impl Into<String>, supertype: impl Into<String>) -> Self {
        self.register_subtype(subtype, supertype);
        self
    }

    pub fn register_subtype(&mut self, subtype: impl Into<String>, supertype: impl Into<String>) {
        self.extensions.insert(subtype.into(), supertype.into());
    }
}

impl TypeHierarchy for XsdTypeHierarchy {
    fn parent_of(&self, datatype: &str) -> Option<String> {
        self.extensions
            .get(datatype)
            .cloned()
            .or_else(|| XSD_DERIVATIONS.get(datatype).map(|parent| (*parent).to_string()))
    }
}

/// The datatypes with a dedicated value space in the term model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    String,
    LangString,
    Boolean,
    Integer,
    Decimal,
    Float,
    Double,
    DateTime,
    Date,
    Time,
    Duration,
    DayTimeDuration,
    YearMonthDuration,
}

impl PrimitiveType {
    pub fn from_iri(iri: &str) -> Option<Self> {
        Some(match iri {
            xsd::STRING => Self::String,
            rdf::LANG_STRING => Self::LangString,
            xsd::BOOLEAN => Self::Boolean,
            xsd::INTEGER => Self::Integer,
            xsd::DECIMAL => Self::Decimal,
            xsd::FLOAT => Self::Float,
            xsd::DOUBLE => Self::Double,
            xsd::DATE_TIME => Self::DateTime,
            xsd::DATE => Self::Date,
            xsd::TIME => Self::Time,
            xsd::DURATION => Self::Duration,
            xsd::DAY_TIME_DURATION => Self::DayTimeDuration,
            xsd::YEAR_MONTH_DURATION => Self::YearMonthDuration,
            _ => return None,
        })
    }

    pub fn iri(self) -> &'static str {
        match self {
            Self::String => xsd::STRING,
            Self::LangString => rdf::LANG_STRING,
            Self::Boolean => xsd::BOOLEAN,
            Self::Integer => xsd::INTEGER,
            Self::Decimal => xsd::DECIMAL,
            Self::Float => xsd::FLOAT,
            Self::Double => xsd::DOUBLE,
            Self::DateTime => xsd::DATE_TIME,
            Self::Date => xsd::DATE,
            Self::Time => xsd::TIME,
            Self::Duration => xsd::DURATION,
            Self::DayTimeDuration => xsd::DAY_TIME_DURATION,
            Self::YearMonthDuration => xsd::YEAR_MONTH_DURATION,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Decimal | Self::Float | Self::Double)
    }

    /// Nearest primitive reachable from `datatype` (itself included)
    pub fn resolve(hierarchy: &dyn TypeHierarchy, datatype: &str) -> Option<Self> {
        Self::from_iri(datatype).or_else(|| {
            hierarchy
                .ancestors(datatype)
                .iter()
                .find_map(|ancestor| Self::from_iri(ancestor))
        })
    }
}
