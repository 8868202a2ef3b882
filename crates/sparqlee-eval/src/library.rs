//! The function library: one overload table per regular operator and per
//! named (XSD constructor) function

use crate::context::EvaluationContext;
use crate::error::{EvalError, EvalResult};
use crate::operators::{
    arithmetic, cast, comparison, datetime, hash, logical, numeric, string, term, triple,
};
use crate::overload::OverloadTable;
use once_cell::sync::Lazy;
use sparqlee_ast::RegularOperator;
use sparqlee_types::Term;
use std::collections::HashMap;
use std::sync::Arc;

static SHARED: Lazy<Arc<FunctionLibrary>> = Lazy::new(|| Arc::new(FunctionLibrary::standard()));

/// Overload tables for every regular operator and named function
#[derive(Debug, Clone)]
pub struct FunctionLibrary {
    regular: HashMap<RegularOperator, Arc<OverloadTable>>,
    named: HashMap<String, Arc<OverloadTable>>,
}

impl Default for FunctionLibrary {
    fn default() -> Self {
        Self::standard()
    }
}

impl FunctionLibrary {
    /// Build the standard SPARQL 1.1 / RDF-star library
    pub fn standard() -> Self {
        let equal = comparison::equal();
        let less_than = comparison::less_than(Arc::clone(&equal));

        let regular = RegularOperator::ALL
            .iter()
            .map(|operator| (*operator, build_regular(*operator, &equal, &less_than)))
            .collect();

        let named = cast::all()
            .into_iter()
            .map(|(iri, table)| (iri.to_string(), Arc::new(table)))
            .collect();

        Self { regular, named }
    }

    /// Process-wide standard library, built on first use
    pub fn shared() -> Arc<Self> {
        Arc::clone(&SHARED)
    }

    pub fn regular(&self, operator: RegularOperator) -> Option<&Arc<OverloadTable>> {
        self.regular.get(&operator)
    }

    pub fn named(&self, iri: &str) -> Option<&Arc<OverloadTable>> {
        self.named.get(iri)
    }

    /// Replace or add the table for a regular operator
    pub fn set_regular(&mut self, operator: RegularOperator, table: OverloadTable) {
        self.regular.insert(operator, Arc::new(table));
    }

    /// Replace or add a named function
    pub fn set_named(&mut self, iri: impl Into<String>, table: OverloadTable) {
        self.named.insert(iri.into(), Arc::new(table));
    }

    /// Apply a regular operator to evaluated arguments
    pub fn apply(&self, operator: RegularOperator, args: &[Term], ctx: &EvaluationContext) -> EvalResult<Term> {
        let table = self
            .regular(operator)
            .ok_or_else(|| EvalError::internal(format!("no implementation for operator {operator}")))?;
        table.apply(args, ctx)
    }

    /// Apply a named function to evaluated arguments
    pub fn apply_named(&self, iri: &str, args: &[Term], ctx: &EvaluationContext) -> EvalResult<Term> {
        let table = self
            .named(iri)
            .ok_or_else(|| EvalError::UnknownNamedFunction { name: iri.to_string() })?;
        table.apply(args, ctx)
    }
}

fn build_regular(
    operator: RegularOperator,
    equal: &Arc<OverloadTable>,
    less_than: &Arc<OverloadTable>,
) -> Arc<OverloadTable> {
    let table = match operator {
        RegularOperator::Not => logical::not(),
        RegularOperator::UnaryMinus => arithmetic::unary_minus(),
        RegularOperator::UnaryPlus => arithmetic::unary_plus(),
        RegularOperator::Multiplication => arithmetic::multiplication(),
        RegularOperator::Division => arithmetic::division(),
        RegularOperator::Addition => arithmetic::addition(),
        RegularOperator::Subtraction => arithmetic::subtraction(),
        RegularOperator::Equal => return Arc::clone(equal),
        RegularOperator::NotEqual => comparison::not_equal(Arc::clone(equal)),
        RegularOperator::LessThan => return Arc::clone(less_than),
        RegularOperator::GreaterThan => comparison::greater_than(Arc::clone(less_than)),
        RegularOperator::LessThanEqual => comparison::less_than_equal(Arc::clone(less_than), Arc::clone(equal)),
        RegularOperator::GreaterThanEqual => {
            comparison::greater_than_equal(Arc::clone(less_than), Arc::clone(equal))
        }
        RegularOperator::IsIri => term::is_iri(),
        RegularOperator::IsUri => term::is_uri(),
        RegularOperator::IsBlank => term::is_blank(),
        RegularOperator::IsLiteral => term::is_literal(),
        RegularOperator::IsNumeric => term::is_numeric(),
        RegularOperator::Str => term::str(),
        RegularOperator::Lang => term::lang(),
        RegularOperator::Datatype => term::datatype(),
        RegularOperator::Iri => term::iri(),
        RegularOperator::Uri => term::uri(),
        RegularOperator::StrDt => term::strdt(),
        RegularOperator::StrLang => term::strlang(),
        RegularOperator::Uuid => term::uuid(),
        RegularOperator::StrUuid => term::struuid(),
        RegularOperator::StrLen => string::strlen(),
        RegularOperator::SubStr => string::substr(),
        RegularOperator::UCase => string::ucase(),
        RegularOperator::LCase => string::lcase(),
        RegularOperator::StrStarts => string::strstarts(),
        RegularOperator::StrEnds => string::strends(),
        RegularOperator::Contains => string::contains(),
        RegularOperator::StrBefore => string::strbefore(),
        RegularOperator::StrAfter => string::strafter(),
        RegularOperator::EncodeForUri => string::encode_for_uri_table(),
        RegularOperator::LangMatches => string::langmatches(),
        RegularOperator::Regex => string::regex(),
        RegularOperator::Replace => string::replace(),
        RegularOperator::Abs => numeric::abs(),
        RegularOperator::Round => numeric::round(),
        RegularOperator::Ceil => numeric::ceil(),
        RegularOperator::Floor => numeric::floor(),
        RegularOperator::Rand => numeric::rand(),
        RegularOperator::Now => datetime::now(),
        RegularOperator::Year => datetime::year(),
        RegularOperator::Month => datetime::month(),
        RegularOperator::Day => datetime::day(),
        RegularOperator::Hours => datetime::hours(),
        RegularOperator::Minutes => datetime::minutes(),
        RegularOperator::Seconds => datetime::seconds(),
        RegularOperator::Timezone => datetime::timezone(),
        RegularOperator::Tz => datetime::tz(),
        RegularOperator::Md5 => hash::md5(),
        RegularOperator::Sha1 => hash::sha1(),
        RegularOperator::Sha256 => hash::sha256(),
        RegularOperator::Sha384 => hash::sha384(),
        RegularOperator::Sha512 => hash::sha512(),
        RegularOperator::Triple => triple::triple(),
        RegularOperator::Subject => triple::subject(),
        RegularOperator::Predicate => triple::predicate(),
        RegularOperator::Object => triple::object(),
        RegularOperator::IsTriple => triple::is_triple(),
    };
    Arc::new(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sparqlee_types::vocab::xsd;

    #[test]
    fn test_comparison_tables_are_shared_with_derived_operators() {
        let library = FunctionLibrary::standard();
        for operator in [RegularOperator::Equal, RegularOperator::LessThan] {
            let table = library.regular(operator).unwrap();
            assert!(Arc::strong_count(table) > 1, "{operator} table was copied");
        }
    }

    #[test]
    fn test_every_operator_has_a_table() {
        let library = FunctionLibrary::standard();
        for operator in RegularOperator::ALL {
            assert!(library.regular(operator).is_some(), "missing {operator}");
        }
    }

    #[test]
    fn test_comparison_family_shares_base_tables() {
        let library = FunctionLibrary::shared();
        let ctx = EvaluationContext::new();
        let args = [Term::integer(3), Term::integer(3)];
        assert_eq!(library.apply(RegularOperator::Equal, &args, &ctx).unwrap(), Term::boolean(true));
        assert_eq!(library.apply(RegularOperator::NotEqual, &args, &ctx).unwrap(), Term::boolean(false));
        assert_eq!(library.apply(RegularOperator::GreaterThanEqual, &args, &ctx).unwrap(), Term::boolean(true));
    }

    #[test]
    fn test_named_function_lookup() {
        let library = FunctionLibrary::standard();
        let ctx = EvaluationContext::new();
        let result = library.apply_named(xsd::INTEGER, &[Term::string("7")], &ctx).unwrap();
        assert_eq!(result, Term::integer(7));
        let error = library.apply_named("http://ex.org/f", &[], &ctx).unwrap_err();
        assert!(matches!(error, EvalError::UnknownNamedFunction { .. }));
    }

    #[test]
    fn test_overriding_an_operator() {
        let mut library = FunctionLibrary::standard();
        library.set_regular(
            RegularOperator::Rand,
            crate::builder::OverloadBuilder::new("rand").set([], |_, _| Ok(Term::integer(4))).collect(),
        );
        let ctx = EvaluationContext::new();
        assert_eq!(library.apply(RegularOperator::Rand, &[], &ctx).unwrap(), Term::integer(4));
    }
}
