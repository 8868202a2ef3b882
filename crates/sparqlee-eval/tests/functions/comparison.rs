//! Comparison Operator Tests
//!
//! Tests for: =, !=, <, >, <=, >= across numerics, strings, booleans,
//! date/times and quoted triples

use pretty_assertions::assert_eq;
use rstest::rstest;
use sparqlee_ast::RegularOperator;
use sparqlee_eval::EvalError;
use sparqlee_types::vocab::xsd;
use sparqlee_types::{GraphName, Quad, Term};

use super::{eval_op, typed};

fn quad(subject: &str, object: Term) -> Term {
    Term::from(Quad::from_terms(
        Term::named_node(subject),
        Term::named_node("http://example.org/p"),
        object,
        GraphName::DefaultGraph,
    ))
}

async fn compare(operator: RegularOperator, left: Term, right: Term) -> bool {
    let result = eval_op(operator, vec![left, right]).await.unwrap();
    result.coerce_ebv().unwrap()
}

// ============================================================================
// Ordering Operators
// ============================================================================

#[rstest]
#[case(RegularOperator::Equal, false)]
#[case(RegularOperator::NotEqual, true)]
#[case(RegularOperator::LessThan, true)]
#[case(RegularOperator::GreaterThan, false)]
#[case(RegularOperator::LessThanEqual, true)]
#[case(RegularOperator::GreaterThanEqual, false)]
#[tokio::test]
async fn test_operator_family_on_mixed_numerics(#[case] operator: RegularOperator, #[case] expected: bool) {
    // 1 (integer) against 1.5 (float)
    assert_eq!(compare(operator, Term::integer(1), typed("1.5", xsd::FLOAT)).await, expected);
}

#[rstest]
#[case(RegularOperator::LessThanEqual)]
#[case(RegularOperator::GreaterThanEqual)]
#[tokio::test]
async fn test_inclusive_operators_accept_equal_values(#[case] operator: RegularOperator) {
    assert!(compare(operator, typed("2", xsd::INTEGER), typed("2.0", xsd::DECIMAL)).await);
}

#[tokio::test]
async fn test_string_ordering_is_codepoint_based() {
    assert!(compare(RegularOperator::LessThan, Term::string("Z"), Term::string("a")).await);
    assert!(compare(RegularOperator::GreaterThan, Term::string("b"), Term::string("a")).await);
}

#[tokio::test]
async fn test_boolean_ordering() {
    assert!(compare(RegularOperator::LessThan, Term::boolean(false), Term::boolean(true)).await);
    assert!(!compare(RegularOperator::LessThan, Term::boolean(true), Term::boolean(false)).await);
}

#[tokio::test]
async fn test_date_times_compare_across_timezones() {
    let left = typed("2020-01-01T12:00:00Z", xsd::DATE_TIME);
    let right = typed("2020-01-01T14:00:00+02:00", xsd::DATE_TIME);
    assert!(compare(RegularOperator::Equal, left.clone(), right.clone()).await);
    assert!(!compare(RegularOperator::LessThan, left, right).await);
}

// ============================================================================
// Equality Edge Cases
// ============================================================================

#[tokio::test]
async fn test_language_strings() {
    let en = Term::lang_string("chat", "en");
    assert!(compare(RegularOperator::Equal, en.clone(), Term::lang_string("chat", "EN")).await);
    assert!(!compare(RegularOperator::Equal, en.clone(), Term::lang_string("chat", "fr")).await);
    assert!(!compare(RegularOperator::Equal, en, Term::string("chat")).await);
}

#[tokio::test]
async fn test_iris_compare_by_identity() {
    let a = Term::named_node("http://example.org/a");
    assert!(compare(RegularOperator::Equal, a.clone(), a.clone()).await);
    assert!(compare(RegularOperator::NotEqual, a, Term::named_node("http://example.org/b")).await);
}

#[tokio::test]
async fn test_unknown_datatypes_raise_on_inequality() {
    let left = typed("x", "http://example.org/custom");
    assert!(compare(RegularOperator::Equal, left.clone(), left.clone()).await);

    let right = typed("y", "http://example.org/custom");
    let error = eval_op(RegularOperator::Equal, vec![left, right]).await.unwrap_err();
    assert!(matches!(error, EvalError::RdfEqualType { .. }));
}

#[tokio::test]
async fn test_string_and_number_are_incomparable() {
    let error = eval_op(RegularOperator::LessThan, vec![Term::string("1"), Term::integer(1)])
        .await
        .unwrap_err();
    assert!(matches!(error, EvalError::ArgumentType { .. }));

    // != derives from =, so the underlying error surfaces unchanged
    let error = eval_op(RegularOperator::NotEqual, vec![Term::string("1"), Term::integer(1)])
        .await
        .unwrap_err();
    assert!(matches!(error, EvalError::RdfEqualType { .. }));
}

// ============================================================================
// Quoted Triples
// ============================================================================

#[tokio::test]
async fn test_quads_compare_component_wise() {
    let left = quad("http://example.org/s", Term::integer(1));
    let same = quad("http://example.org/s", typed("1.0", xsd::DECIMAL));
    let greater = quad("http://example.org/s", Term::integer(2));

    assert!(compare(RegularOperator::Equal, left.clone(), same.clone()).await);
    assert!(!compare(RegularOperator::LessThan, left.clone(), same).await);
    assert!(compare(RegularOperator::LessThan, left.clone(), greater.clone()).await);
    assert!(compare(RegularOperator::GreaterThan, greater, left).await);
}
