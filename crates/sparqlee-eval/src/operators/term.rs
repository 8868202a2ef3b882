//! RDF Term Functions
//!
//! Implements: isIRI, isURI, isBlank, isLiteral, isNumeric, STR, LANG,
//! DATATYPE, IRI, URI, STRDT, STRLANG, UUID, STRUUID

use crate::builder::OverloadBuilder;
use crate::context::EvaluationContext;
use crate::error::{EvalError, EvalResult};
use crate::operators::{literal_arg, named_node_arg, string_arg};
use crate::overload::{ArgumentType, OverloadTable};
use once_cell::sync::Lazy;
use oxiri::Iri;
use regex::Regex;
use sparqlee_types::{LiteralValue, Term};

static LANGUAGE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z]{1,8}(-[a-zA-Z0-9]{1,8})*$").expect("valid language tag pattern")
});

fn term_test(name: &'static str, test: fn(&Term) -> bool) -> OverloadTable {
    OverloadBuilder::new(name)
        .on_term1(move |term| Ok(Term::boolean(test(term))))
        .collect()
}

pub fn is_iri() -> OverloadTable {
    term_test("isiri", |term| matches!(term, Term::NamedNode(_)))
}

pub fn is_uri() -> OverloadTable {
    term_test("isuri", |term| matches!(term, Term::NamedNode(_)))
}

pub fn is_blank() -> OverloadTable {
    term_test("isblank", |term| matches!(term, Term::BlankNode(_)))
}

pub fn is_literal() -> OverloadTable {
    term_test("isliteral", |term| matches!(term, Term::Literal(_)))
}

/// Numeric literals with a valid lexical form
pub fn is_numeric() -> OverloadTable {
    term_test("isnumeric", |term| {
        term.as_literal()
            .is_some_and(|literal| matches!(literal.value, LiteralValue::Numeric(_)))
    })
}

/// Lexical form of a literal or the IRI of a named node
pub fn str() -> OverloadTable {
    OverloadBuilder::new("str")
        .on_unary(ArgumentType::Literal, |term, _| Ok(Term::string(term.str()?)))
        .on_unary(ArgumentType::NamedNode, |term, _| Ok(Term::string(term.str()?)))
        .collect()
}

pub fn lang() -> OverloadTable {
    OverloadBuilder::new("lang")
        .on_unary(ArgumentType::Literal, |term, _| {
            Ok(Term::string(literal_arg(term)?.language().unwrap_or_default()))
        })
        .collect()
}

pub fn datatype() -> OverloadTable {
    OverloadBuilder::new("datatype")
        .on_unary(ArgumentType::Literal, |term, _| {
            Ok(Term::named_node(literal_arg(term)?.datatype.clone()))
        })
        .collect()
}

/// Resolve a string against the base IRI, or validate it as absolute
fn resolve_iri(value: &str, ctx: &EvaluationContext) -> EvalResult<Term> {
    let resolved = match ctx.base_iri() {
        Some(base) => base.resolve(value).map(Iri::into_inner),
        None => Iri::parse(value.to_string()).map(Iri::into_inner),
    };
    resolved
        .map(Term::named_node)
        .map_err(|error| EvalError::invalid_iri(value, error.to_string()))
}

fn iri_table(name: &'static str) -> OverloadTable {
    OverloadBuilder::new(name)
        .on_unary(ArgumentType::NamedNode, |term, _| Ok(term.clone()))
        .on_unary(ArgumentType::STRING, |term, ctx| resolve_iri(string_arg(term)?, ctx))
        .collect()
}

pub fn iri() -> OverloadTable {
    iri_table("iri")
}

pub fn uri() -> OverloadTable {
    iri_table("uri")
}

/// Literal with the given lexical form and datatype, lifted through the
/// context's transformer
pub fn strdt() -> OverloadTable {
    OverloadBuilder::new("strdt")
        .on_binary(ArgumentType::STRING, ArgumentType::NamedNode, |lexical, datatype, ctx| {
            let literal = ctx
                .transformer()
                .literal(string_arg(lexical)?, named_node_arg(datatype)?.as_str(), None);
            Ok(Term::Literal(literal))
        })
        .collect()
}

/// Language-tagged literal; the tag is stored lowercased
pub fn strlang() -> OverloadTable {
    OverloadBuilder::new("strlang")
        .on_binary(ArgumentType::STRING, ArgumentType::STRING, |value, tag, _| {
            let tag = string_arg(tag)?;
            if !LANGUAGE_TAG.is_match(tag) {
                return Err(EvalError::InvalidLanguageTag { tag: tag.to_string() });
            }
            Ok(Term::lang_string(string_arg(value)?, tag.to_ascii_lowercase()))
        })
        .collect()
}

pub fn uuid() -> OverloadTable {
    OverloadBuilder::new("uuid")
        .set([], |_, _| Ok(Term::named_node(format!("urn:uuid:{}", uuid::Uuid::new_v4()))))
        .collect()
}

pub fn struuid() -> OverloadTable {
    OverloadBuilder::new("struuid")
        .set([], |_, _| Ok(Term::string(uuid::Uuid::new_v4().to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use sparqlee_types::vocab::{rdf, xsd};

    fn ctx() -> EvaluationContext {
        EvaluationContext::new()
    }

    fn typed(lexical: &str, datatype: &str) -> Term {
        Term::Literal(ctx().transformer().literal(lexical, datatype, None))
    }

    #[rstest]
    #[case(Term::named_node("http://ex.org/"), true, false, false)]
    #[case(Term::blank_node("b"), false, true, false)]
    #[case(Term::string("x"), false, false, true)]
    fn test_term_type_tests(
        #[case] term: Term,
        #[case] iri: bool,
        #[case] blank: bool,
        #[case] literal: bool,
    ) {
        let ctx = ctx();
        let args = [term];
        assert_eq!(is_iri().apply(&args, &ctx).unwrap(), Term::boolean(iri));
        assert_eq!(is_uri().apply(&args, &ctx).unwrap(), Term::boolean(iri));
        assert_eq!(is_blank().apply(&args, &ctx).unwrap(), Term::boolean(blank));
        assert_eq!(is_literal().apply(&args, &ctx).unwrap(), Term::boolean(literal));
    }

    #[test]
    fn test_is_numeric_excludes_invalid_lexical_forms() {
        let ctx = ctx();
        assert_eq!(is_numeric().apply(&[typed("12", xsd::BYTE)], &ctx).unwrap(), Term::boolean(true));
        assert_eq!(is_numeric().apply(&[typed("1200", xsd::BYTE)], &ctx).unwrap(), Term::boolean(false));
        assert_eq!(is_numeric().apply(&[Term::string("12")], &ctx).unwrap(), Term::boolean(false));
    }

    #[test]
    fn test_str_keeps_lexical_form() {
        let result = str().apply(&[typed("01", xsd::INTEGER)], &ctx()).unwrap();
        assert_eq!(result, Term::string("01"));
        let result = str().apply(&[Term::named_node("http://ex.org/a")], &ctx()).unwrap();
        assert_eq!(result, Term::string("http://ex.org/a"));
    }

    #[test]
    fn test_str_of_non_lexical_fails() {
        let error = str().apply(&[typed("abc", xsd::INTEGER)], &ctx()).unwrap_err();
        assert!(matches!(error, EvalError::InvalidLexicalForm { .. }));
    }

    #[test]
    fn test_lang_and_datatype() {
        let ctx = ctx();
        let tagged = Term::lang_string("chat", "fr");
        assert_eq!(lang().apply(&[tagged.clone()], &ctx).unwrap(), Term::string("fr"));
        assert_eq!(lang().apply(&[Term::integer(1)], &ctx).unwrap(), Term::string(""));
        assert_eq!(datatype().apply(&[tagged], &ctx).unwrap(), Term::named_node(rdf::LANG_STRING));
        assert_eq!(datatype().apply(&[Term::integer(1)], &ctx).unwrap(), Term::named_node(xsd::INTEGER));
    }

    #[test]
    fn test_iri_resolution_against_base() {
        let ctx = EvaluationContext::builder().base_iri("http://example.org/dir/").build().unwrap();
        let result = iri().apply(&[Term::string("file")], &ctx).unwrap();
        assert_eq!(result, Term::named_node("http://example.org/dir/file"));
    }

    #[test]
    fn test_relative_iri_without_base_fails() {
        let error = iri().apply(&[Term::string("file")], &ctx()).unwrap_err();
        assert!(matches!(error, EvalError::InvalidIri { .. }));
    }

    #[test]
    fn test_strdt_parses_value() {
        let result = strdt()
            .apply(&[Term::string("0012"), Term::named_node(xsd::INTEGER)], &ctx())
            .unwrap();
        let literal = result.as_literal().unwrap();
        assert_eq!(literal.as_numeric().map(|n| n.to_f64()), Some(12.0));
        assert_eq!(literal.str(), "0012");
    }

    #[test]
    fn test_strlang_lowercases_tag() {
        let result = strlang().apply(&[Term::string("hi"), Term::string("EN-gb")], &ctx()).unwrap();
        assert_eq!(result.as_literal().unwrap().language(), Some("en-gb"));
    }

    #[test]
    fn test_strlang_rejects_invalid_tag() {
        let error = strlang().apply(&[Term::string("hi"), Term::string("not a tag")], &ctx()).unwrap_err();
        assert!(matches!(error, EvalError::InvalidLanguageTag { .. }));
    }

    #[test]
    fn test_uuid_shapes() {
        let ctx = ctx();
        let iri = uuid().apply(&[], &ctx).unwrap();
        assert!(iri.as_named_node().unwrap().as_str().starts_with("urn:uuid:"));
        let value = struuid().apply(&[], &ctx).unwrap().str().unwrap();
        assert_eq!(value.len(), 36);
    }
}
