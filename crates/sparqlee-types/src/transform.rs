//! Lifting raw RDF terms into typed terms
//!
//! Every literal, whether read from a binding or built by STRDT/STRLANG,
//! goes through [`TermTransformer::literal`]. A lexical form that does not fit
//! its datatype still produces a term (a NonLexical literal) so that RDF's
//! open-world semantics hold until a value-level operation is attempted.

use std::fmt;
use std::sync::Arc;

use crate::hierarchy::{PrimitiveType, TypeHierarchy, XsdTypeHierarchy, integer_bounds};
use crate::literal::{Literal, LiteralValue, NonLexicalCategory};
use crate::numeric::{Numeric, parse_boolean, parse_decimal, parse_double, parse_integer};
use crate::rdf::{RdfQuad, RdfTerm};
use crate::temporal::{DateTimeValue, DateValue, DurationValue, TimeValue};
use crate::term::{Quad, Term};

#[derive(Clone)]
pub struct TermTransformer {
    hierarchy: Arc<dyn TypeHierarchy>,
}

impl Default for TermTransformer {
    fn default() -> Self {
        Self::new(Arc::new(XsdTypeHierarchy::new()))
    }
}

impl fmt::Debug for TermTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TermTransformer")
            .field("hierarchy", &self.hierarchy)
            .finish()
    }
}

impl TermTransformer {
    pub fn new(hierarchy: Arc<dyn TypeHierarchy>) -> Self {
        Self { hierarchy }
    }

    pub fn hierarchy(&self) -> &dyn TypeHierarchy {
        self.hierarchy.as_ref()
    }

    pub fn transform(&self, term: &RdfTerm) -> Term {
        match term {
            RdfTerm::NamedNode(iri) => Term::named_node(iri.clone()),
            RdfTerm::BlankNode(id) => Term::blank_node(id.clone()),
            RdfTerm::Literal(literal) => {
                Term::Literal(self.literal(&literal.value, &literal.datatype, literal.language.as_deref()))
            }
            RdfTerm::Quad(quad) => Term::from(self.quad(quad.as_ref().clone())),
        }
    }

    pub fn quad(&self, raw: RdfQuad) -> Quad {
        Quad::from_rdf(raw, self.clone())
    }

    /// Parse `lexical` against `datatype`
    pub fn literal(&self, lexical: &str, datatype: &str, language: Option<&str>) -> Literal {
        if let Some(language) = language.filter(|language| !language.is_empty()) {
            return Literal::lang_string(lexical, language).with_lexical(lexical);
        }

        let Some(primitive) = PrimitiveType::resolve(self.hierarchy(), datatype) else {
            return Literal::other(lexical, datatype);
        };

        let value = match primitive {
            PrimitiveType::String => Some(LiteralValue::String(lexical.to_string())),
            PrimitiveType::LangString => None,
            PrimitiveType::Boolean => parse_boolean(lexical).map(LiteralValue::Boolean),
            PrimitiveType::Integer => parse_integer(lexical)
                .filter(|value| self.within_bounds(datatype, *value))
                .map(|value| LiteralValue::Numeric(Numeric::Integer(value))),
            PrimitiveType::Decimal => {
                parse_decimal(lexical).map(|value| LiteralValue::Numeric(Numeric::Decimal(value)))
            }
            PrimitiveType::Float => {
                parse_double(lexical).map(|value| LiteralValue::Numeric(Numeric::Float(value as f32)))
            }
            PrimitiveType::Double => {
                parse_double(lexical).map(|value| LiteralValue::Numeric(Numeric::Double(value)))
            }
            PrimitiveType::DateTime => DateTimeValue::parse(lexical).map(LiteralValue::DateTime),
            PrimitiveType::Date => DateValue::parse(lexical).map(LiteralValue::Date),
            PrimitiveType::Time => TimeValue::parse(lexical).map(LiteralValue::Time),
            PrimitiveType::Duration => DurationValue::parse(lexical).map(LiteralValue::Duration),
            PrimitiveType::DayTimeDuration => {
                DurationValue::parse_day_time(lexical).map(LiteralValue::DayTimeDuration)
            }
            PrimitiveType::YearMonthDuration => {
                DurationValue::parse_year_month(lexical).map(LiteralValue::YearMonthDuration)
            }
        };

        match value {
            Some(value) => Literal {
                value,
                datatype: datatype.to_string(),
                lexical: Some(lexical.to_string()),
                language: None,
            },
            None => Literal::non_lexical(lexical, datatype, Self::category(primitive)),
        }
    }

    fn category(primitive: PrimitiveType) -> NonLexicalCategory {
        if primitive.is_numeric() {
            NonLexicalCategory::NumericLike
        } else if primitive == PrimitiveType::Boolean {
            NonLexicalCategory::BooleanLike
        } else {
            NonLexicalCategory::Opaque
        }
    }

    /// Range restrictions of `datatype` and every bounded ancestor
    fn within_bounds(&self, datatype: &str, value: i64) -> bool {
        std::iter::once(datatype.to_string())
            .chain(self.hierarchy.ancestors(datatype))
            .filter_map(|iri| integer_bounds(&iri))
            .all(|(min, max)| (min..=max).contains(&value))
    }
}
