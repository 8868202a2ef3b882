//! Arithmetic Operator Tests
//!
//! Tests for: +, -, *, /, UMINUS, UPLUS, ABS, ROUND, CEIL, FLOOR

use pretty_assertions::assert_eq;
use rstest::rstest;
use sparqlee_ast::{Expression, RegularOperator};
use sparqlee_eval::EvalError;
use sparqlee_types::Term;
use sparqlee_types::vocab::xsd;

use super::{call, eval, eval_op, lexical, typed};

// ============================================================================
// Promotion
// ============================================================================

#[rstest]
#[case("1", xsd::INTEGER, "2", xsd::INTEGER, "3", xsd::INTEGER)]
#[case("1", xsd::INTEGER, "0.5", xsd::DECIMAL, "1.5", xsd::DECIMAL)]
#[case("1", xsd::SHORT, "2", xsd::BYTE, "3", xsd::INTEGER)]
#[case("1.5", xsd::DECIMAL, "1", xsd::FLOAT, "2.5", xsd::FLOAT)]
#[case("1", xsd::FLOAT, "1", xsd::DOUBLE, "2.0E0", xsd::DOUBLE)]
#[tokio::test]
async fn test_addition_promotes_to_least_upper_bound(
    #[case] left: &str,
    #[case] left_type: &str,
    #[case] right: &str,
    #[case] right_type: &str,
    #[case] expected: &str,
    #[case] expected_type: &str,
) {
    let result = eval_op(RegularOperator::Addition, vec![typed(left, left_type), typed(right, right_type)])
        .await
        .unwrap();
    assert_eq!(lexical(&result), (expected.to_string(), expected_type.to_string()));
}

#[tokio::test]
async fn test_nested_arithmetic() {
    // (2 * 3) - 10 / 4
    let expression = Expression::operator(
        RegularOperator::Subtraction,
        vec![
            call(RegularOperator::Multiplication, vec![Term::integer(2), Term::integer(3)]),
            call(RegularOperator::Division, vec![Term::integer(10), Term::integer(4)]),
        ],
    );
    let result = eval(&expression).await.unwrap();
    assert_eq!(lexical(&result), ("3.5".to_string(), xsd::DECIMAL.to_string()));
}

// ============================================================================
// Errors
// ============================================================================

#[tokio::test]
async fn test_division_by_integer_zero() {
    let error = eval_op(RegularOperator::Division, vec![Term::integer(3), Term::integer(0)])
        .await
        .unwrap_err();
    assert_eq!(error, EvalError::DivisionByZero);
}

#[tokio::test]
async fn test_double_division_by_zero_is_infinite() {
    let result = eval_op(RegularOperator::Division, vec![typed("1", xsd::DOUBLE), typed("0", xsd::DOUBLE)])
        .await
        .unwrap();
    assert_eq!(lexical(&result), ("INF".to_string(), xsd::DOUBLE.to_string()));
}

#[tokio::test]
async fn test_string_operand_is_argument_type_error() {
    let error = eval_op(RegularOperator::Addition, vec![Term::integer(1), Term::string("1")])
        .await
        .unwrap_err();
    assert!(matches!(error, EvalError::ArgumentType { .. }));
}

#[tokio::test]
async fn test_non_lexical_operand_is_invalid_lexical_form() {
    let error = eval_op(RegularOperator::Addition, vec![typed("abc", xsd::INTEGER), Term::integer(1)])
        .await
        .unwrap_err();
    assert!(matches!(error, EvalError::InvalidLexicalForm { .. }));
}

#[tokio::test]
async fn test_out_of_range_derived_integer_is_non_lexical() {
    let error = eval_op(RegularOperator::UnaryMinus, vec![typed("300", xsd::BYTE)])
        .await
        .unwrap_err();
    assert!(matches!(error, EvalError::InvalidLexicalForm { .. }));
}

// ============================================================================
// Numeric Functions
// ============================================================================

#[rstest]
#[case(RegularOperator::Abs, "-2.5", "2.5")]
#[case(RegularOperator::Round, "2.5", "3")]
#[case(RegularOperator::Round, "-2.5", "-2")]
#[case(RegularOperator::Ceil, "1.1", "2")]
#[case(RegularOperator::Floor, "-1.1", "-2")]
#[tokio::test]
async fn test_decimal_rounding_functions(
    #[case] operator: RegularOperator,
    #[case] input: &str,
    #[case] expected: &str,
) {
    let result = eval_op(operator, vec![typed(input, xsd::DECIMAL)]).await.unwrap();
    assert_eq!(lexical(&result), (expected.to_string(), xsd::DECIMAL.to_string()));
}

#[tokio::test]
async fn test_abs_keeps_integer_kind() {
    let result = eval_op(RegularOperator::Abs, vec![Term::integer(-7)]).await.unwrap();
    assert_eq!(result, Term::integer(7));
}

#[tokio::test]
async fn test_rand_is_unit_interval_double() {
    let result = eval(&Expression::operator(RegularOperator::Rand, vec![])).await.unwrap();
    assert_eq!(lexical(&result).1, xsd::DOUBLE);
    let value = result.as_literal().and_then(|l| l.as_numeric()).map(|n| n.to_f64()).unwrap();
    assert!((0.0..1.0).contains(&value), "{value} outside [0, 1)");
}
