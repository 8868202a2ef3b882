//! Operator identities
//!
//! Names follow the lower-case SPARQL keywords (and the symbolic operators),
//! which is what an algebra translator hands over.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error for an operator name that is not part of the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperator(pub String);

impl fmt::Display for UnknownOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown operator '{}'", self.0)
    }
}

impl std::error::Error for UnknownOperator {}

/// Operators evaluated over already evaluated arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegularOperator {
    // Logic and arithmetic
    Not,
    UnaryMinus,
    UnaryPlus,
    Multiplication,
    Division,
    Addition,
    Subtraction,

    // Comparison
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessThanEqual,
    GreaterThanEqual,

    // RDF terms
    IsIri,
    IsUri,
    IsBlank,
    IsLiteral,
    IsNumeric,
    Str,
    Lang,
    Datatype,
    Iri,
    Uri,
    StrDt,
    StrLang,
    Uuid,
    StrUuid,

    // Strings
    StrLen,
    SubStr,
    UCase,
    LCase,
    StrStarts,
    StrEnds,
    Contains,
    StrBefore,
    StrAfter,
    EncodeForUri,
    LangMatches,
    Regex,
    Replace,

    // Numerics
    Abs,
    Round,
    Ceil,
    Floor,
    Rand,

    // Dates and times
    Now,
    Year,
    Month,
    Day,
    Hours,
    Minutes,
    Seconds,
    Timezone,
    Tz,

    // Hashes
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,

    // RDF-star
    Triple,
    Subject,
    Predicate,
    Object,
    IsTriple,
}

impl RegularOperator {
    pub const ALL: [RegularOperator; 64] = [
        Self::Not,
        Self::UnaryMinus,
        Self::UnaryPlus,
        Self::Multiplication,
        Self::Division,
        Self::Addition,
        Self::Subtraction,
        Self::Equal,
        Self::NotEqual,
        Self::LessThan,
        Self::GreaterThan,
        Self::LessThanEqual,
        Self::GreaterThanEqual,
        Self::IsIri,
        Self::IsUri,
        Self::IsBlank,
        Self::IsLiteral,
        Self::IsNumeric,
        Self::Str,
        Self::Lang,
        Self::Datatype,
        Self::Iri,
        Self::Uri,
        Self::StrDt,
        Self::StrLang,
        Self::Uuid,
        Self::StrUuid,
        Self::StrLen,
        Self::SubStr,
        Self::UCase,
        Self::LCase,
        Self::StrStarts,
        Self::StrEnds,
        Self::Contains,
        Self::StrBefore,
        Self::StrAfter,
        Self::EncodeForUri,
        Self::LangMatches,
        Self::Regex,
        Self::Replace,
        Self::Abs,
        Self::Round,
        Self::Ceil,
        Self::Floor,
        Self::Rand,
        Self::Now,
        Self::Year,
        Self::Month,
        Self::Day,
        Self::Hours,
        Self::Minutes,
        Self::Seconds,
        Self::Timezone,
        Self::Tz,
        Self::Md5,
        Self::Sha1,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
        Self::Triple,
        Self::Subject,
        Self::Predicate,
        Self::Object,
        Self::IsTriple,
    ];

    /// Get the operator name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Not => "!",
            Self::UnaryMinus => "UMINUS",
            Self::UnaryPlus => "UPLUS",
            Self::Multiplication => "*",
            Self::Division => "/",
            Self::Addition => "+",
            Self::Subtraction => "-",
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
            Self::LessThanEqual => "<=",
            Self::GreaterThanEqual => ">=",
            Self::IsIri => "isiri",
            Self::IsUri => "isuri",
            Self::IsBlank => "isblank",
            Self::IsLiteral => "isliteral",
            Self::IsNumeric => "isnumeric",
            Self::Str => "str",
            Self::Lang => "lang",
            Self::Datatype => "datatype",
            Self::Iri => "iri",
            Self::Uri => "uri",
            Self::StrDt => "strdt",
            Self::StrLang => "strlang",
            Self::Uuid => "uuid",
            Self::StrUuid => "struuid",
            Self::StrLen => "strlen",
            Self::SubStr => "substr",
            Self::UCase => "ucase",
            Self::LCase => "lcase",
            Self::StrStarts => "strstarts",
            Self::StrEnds => "strends",
            Self::Contains => "contains",
            Self::StrBefore => "strbefore",
            Self::StrAfter => "strafter",
            Self::EncodeForUri => "encode_for_uri",
            Self::LangMatches => "langmatches",
            Self::Regex => "regex",
            Self::Replace => "replace",
            Self::Abs => "abs",
            Self::Round => "round",
            Self::Ceil => "ceil",
            Self::Floor => "floor",
            Self::Rand => "rand",
            Self::Now => "now",
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Hours => "hours",
            Self::Minutes => "minutes",
            Self::Seconds => "seconds",
            Self::Timezone => "timezone",
            Self::Tz => "tz",
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
            Self::Triple => "triple",
            Self::Subject => "subject",
            Self::Predicate => "predicate",
            Self::Object => "object",
            Self::IsTriple => "istriple",
        }
    }

    /// Check if this is a comparison operator
    pub const fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Equal
                | Self::NotEqual
                | Self::LessThan
                | Self::GreaterThan
                | Self::LessThanEqual
                | Self::GreaterThanEqual
        )
    }

    /// Check if this is an arithmetic operator
    pub const fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            Self::UnaryMinus
                | Self::UnaryPlus
                | Self::Multiplication
                | Self::Division
                | Self::Addition
                | Self::Subtraction
        )
    }
}

impl fmt::Display for RegularOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RegularOperator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownOperator(s.to_string()))
    }
}

/// Functional forms: operators that receive their arguments unevaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialOperator {
    Bound,
    If,
    Coalesce,
    LogicalOr,
    LogicalAnd,
    SameTerm,
    In,
    NotIn,
    Concat,
    BNode,
}

impl SpecialOperator {
    pub const ALL: [SpecialOperator; 10] = [
        Self::Bound,
        Self::If,
        Self::Coalesce,
        Self::LogicalOr,
        Self::LogicalAnd,
        Self::SameTerm,
        Self::In,
        Self::NotIn,
        Self::Concat,
        Self::BNode,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Bound => "bound",
            Self::If => "if",
            Self::Coalesce => "coalesce",
            Self::LogicalOr => "||",
            Self::LogicalAnd => "&&",
            Self::SameTerm => "sameterm",
            Self::In => "in",
            Self::NotIn => "notin",
            Self::Concat => "concat",
            Self::BNode => "bnode",
        }
    }
}

impl fmt::Display for SpecialOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SpecialOperator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownOperator(s.to_string()))
    }
}
