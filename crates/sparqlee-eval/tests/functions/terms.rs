//! RDF Term Function Tests
//!
//! Tests for: isIRI, isBlank, isLiteral, isNumeric, STR, LANG, DATATYPE,
//! IRI, STRDT, STRLANG, UUID, STRUUID, hashes, RDF-star accessors and XSD
//! constructor casts

use pretty_assertions::assert_eq;
use rstest::rstest;
use sparqlee_ast::{Expression, RegularOperator};
use sparqlee_eval::{Bindings, EvalError, EvaluationContext, ExpressionEvaluator};
use sparqlee_types::vocab::{rdf, xsd};
use sparqlee_types::{GraphName, Quad, Term};

use super::{eval, eval_op, lexical, typed};

// ============================================================================
// Term Tests And Accessors
// ============================================================================

#[rstest]
#[case(RegularOperator::IsIri, Term::named_node("http://example.org/"), true)]
#[case(RegularOperator::IsUri, Term::blank_node("b0"), false)]
#[case(RegularOperator::IsBlank, Term::blank_node("b0"), true)]
#[case(RegularOperator::IsLiteral, Term::string("x"), true)]
#[case(RegularOperator::IsNumeric, Term::integer(4), true)]
#[case(RegularOperator::IsNumeric, Term::string("4"), false)]
#[tokio::test]
async fn test_term_type_tests(#[case] operator: RegularOperator, #[case] argument: Term, #[case] expected: bool) {
    assert_eq!(eval_op(operator, vec![argument]).await.unwrap(), Term::boolean(expected));
}

#[tokio::test]
async fn test_is_numeric_on_malformed_literal() {
    let result = eval_op(RegularOperator::IsNumeric, vec![typed("x1", xsd::INTEGER)]).await.unwrap();
    assert_eq!(result, Term::boolean(false));
}

#[tokio::test]
async fn test_str_lang_datatype() {
    let tagged = Term::lang_string("chat", "fr");
    assert_eq!(eval_op(RegularOperator::Str, vec![tagged.clone()]).await.unwrap(), Term::string("chat"));
    assert_eq!(eval_op(RegularOperator::Lang, vec![tagged.clone()]).await.unwrap(), Term::string("fr"));
    assert_eq!(
        eval_op(RegularOperator::Datatype, vec![tagged]).await.unwrap(),
        Term::named_node(rdf::LANG_STRING)
    );
    assert_eq!(
        eval_op(RegularOperator::Str, vec![Term::named_node("http://example.org/a")]).await.unwrap(),
        Term::string("http://example.org/a")
    );
}

#[tokio::test]
async fn test_str_keeps_original_lexical_form() {
    let result = eval_op(RegularOperator::Str, vec![typed("01", xsd::INTEGER)]).await.unwrap();
    assert_eq!(result, Term::string("01"));
}

#[tokio::test]
async fn test_str_of_blank_node_is_type_error() {
    let error = eval_op(RegularOperator::Str, vec![Term::blank_node("b")]).await.unwrap_err();
    assert!(matches!(error, EvalError::ArgumentType { .. }));
}

// ============================================================================
// Term Constructors
// ============================================================================

#[tokio::test]
async fn test_iri_resolves_against_base() {
    let context = EvaluationContext::builder()
        .base_iri("http://example.org/dir/")
        .build()
        .unwrap();
    let evaluator = ExpressionEvaluator::new(context);
    let expression = Expression::operator(RegularOperator::Iri, vec![Expression::term(Term::string("file"))]);
    let result = evaluator.evaluate(&expression, &Bindings::new()).await.unwrap();
    assert_eq!(result, Term::named_node("http://example.org/dir/file"));
}

#[tokio::test]
async fn test_iri_passes_named_nodes_through() {
    let node = Term::named_node("http://example.org/x");
    assert_eq!(eval_op(RegularOperator::Uri, vec![node.clone()]).await.unwrap(), node);
}

#[tokio::test]
async fn test_strdt_parses_value() {
    let result = eval_op(
        RegularOperator::StrDt,
        vec![Term::string("123"), Term::named_node(xsd::INTEGER)],
    )
    .await
    .unwrap();
    let sum = eval_op(RegularOperator::Addition, vec![result, Term::integer(1)]).await.unwrap();
    assert_eq!(sum, Term::integer(124));
}

#[tokio::test]
async fn test_strlang() {
    let result = eval_op(RegularOperator::StrLang, vec![Term::string("chat"), Term::string("FR")])
        .await
        .unwrap();
    assert_eq!(result, Term::lang_string("chat", "fr"));

    let error = eval_op(RegularOperator::StrLang, vec![Term::string("chat"), Term::string("not a tag")])
        .await
        .unwrap_err();
    assert!(matches!(error, EvalError::InvalidLanguageTag { .. }));
}

#[tokio::test]
async fn test_uuid_forms() {
    let iri = eval(&Expression::operator(RegularOperator::Uuid, vec![])).await.unwrap();
    let iri = iri.as_named_node().map(|node| node.as_str().to_string()).unwrap();
    assert!(iri.starts_with("urn:uuid:"));

    let plain = eval(&Expression::operator(RegularOperator::StrUuid, vec![])).await.unwrap();
    assert_eq!(lexical(&plain).0.len(), 36);
}

// ============================================================================
// Hash Functions
// ============================================================================

#[rstest]
#[case(RegularOperator::Md5, "acbd18db4cc2f85cedef654fccc4a4d8")]
#[case(RegularOperator::Sha1, "0beec7b5ea3f0fdbc95d0dd47f3c5bc275da8a33")]
#[case(RegularOperator::Sha256, "2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae")]
#[tokio::test]
async fn test_hashes_of_foo(#[case] operator: RegularOperator, #[case] expected: &str) {
    assert_eq!(eval_op(operator, vec![Term::string("foo")]).await.unwrap(), Term::string(expected));
}

#[tokio::test]
async fn test_hash_rejects_language_strings() {
    let error = eval_op(RegularOperator::Md5, vec![Term::lang_string("foo", "en")]).await.unwrap_err();
    assert!(matches!(error, EvalError::ArgumentType { .. }));
}

// ============================================================================
// RDF-star
// ============================================================================

#[tokio::test]
async fn test_triple_roundtrip_through_accessors() {
    let (s, p, o) = (
        Term::named_node("http://example.org/s"),
        Term::named_node("http://example.org/p"),
        Term::integer(7),
    );
    let triple = eval_op(RegularOperator::Triple, vec![s.clone(), p.clone(), o.clone()]).await.unwrap();
    assert_eq!(eval_op(RegularOperator::IsTriple, vec![triple.clone()]).await.unwrap(), Term::boolean(true));
    assert_eq!(eval_op(RegularOperator::Subject, vec![triple.clone()]).await.unwrap(), s);
    assert_eq!(eval_op(RegularOperator::Predicate, vec![triple.clone()]).await.unwrap(), p);
    assert_eq!(eval_op(RegularOperator::Object, vec![triple]).await.unwrap(), o);
}

#[tokio::test]
async fn test_triple_rejects_literal_subject() {
    let error = eval_op(
        RegularOperator::Triple,
        vec![Term::string("s"), Term::named_node("http://example.org/p"), Term::integer(1)],
    )
    .await
    .unwrap_err();
    assert!(matches!(error, EvalError::ArgumentType { .. }));
}

#[tokio::test]
async fn test_is_triple_on_plain_terms() {
    let quad = Term::from(Quad::from_terms(
        Term::blank_node("b"),
        Term::named_node("http://example.org/p"),
        Term::string("o"),
        GraphName::DefaultGraph,
    ));
    assert_eq!(eval_op(RegularOperator::IsTriple, vec![quad]).await.unwrap(), Term::boolean(true));
    assert_eq!(
        eval_op(RegularOperator::IsTriple, vec![Term::string("o")]).await.unwrap(),
        Term::boolean(false)
    );
}

// ============================================================================
// Constructor Casts
// ============================================================================

async fn cast(target: &str, argument: Term) -> Result<Term, EvalError> {
    eval(&Expression::named(target, vec![Expression::term(argument)])).await
}

#[rstest]
#[case(xsd::INTEGER, Term::string(" 42 "), "42", xsd::INTEGER)]
#[case(xsd::INTEGER, typed("3.9", xsd::DECIMAL), "3", xsd::INTEGER)]
#[case(xsd::DECIMAL, Term::boolean(true), "1", xsd::DECIMAL)]
#[case(xsd::BOOLEAN, Term::integer(0), "false", xsd::BOOLEAN)]
#[case(xsd::STRING, typed("1.5", xsd::DECIMAL), "1.5", xsd::STRING)]
#[case(xsd::DOUBLE, Term::string("1e3"), "1.0E3", xsd::DOUBLE)]
#[tokio::test]
async fn test_casts(#[case] target: &str, #[case] argument: Term, #[case] expected: &str, #[case] expected_type: &str) {
    let result = cast(target, argument).await.unwrap();
    assert_eq!(lexical(&result), (expected.to_string(), expected_type.to_string()));
}

#[tokio::test]
async fn test_cast_of_unparseable_string_fails() {
    assert!(cast(xsd::INTEGER, Term::string("forty-two")).await.is_err());
}

#[tokio::test]
async fn test_unknown_named_function() {
    let error = cast("http://example.org/fn", Term::integer(1)).await.unwrap_err();
    assert!(matches!(error, EvalError::UnknownNamedFunction { .. }));
}
