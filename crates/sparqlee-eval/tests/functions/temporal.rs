//! Date/Time Function Tests
//!
//! Tests for: NOW, YEAR, MONTH, DAY, HOURS, MINUTES, SECONDS, TIMEZONE, TZ
//! and date/time arithmetic

use pretty_assertions::assert_eq;
use sparqlee_ast::{Expression, RegularOperator};
use sparqlee_eval::{Bindings, EvalError, EvaluationContext, ExpressionEvaluator};
use sparqlee_types::vocab::xsd;
use sparqlee_types::{DateTimeValue, Term};

use super::{eval_op, lexical, typed};

#[tokio::test]
async fn test_now_is_stable_within_a_context() {
    let now = DateTimeValue::parse("2022-03-04T05:06:07Z").unwrap();
    let evaluator = ExpressionEvaluator::new(EvaluationContext::builder().now(now).build().unwrap());
    let expression = Expression::operator(
        RegularOperator::Year,
        vec![Expression::operator(RegularOperator::Now, vec![])],
    );
    let bindings = Bindings::new();
    assert_eq!(evaluator.evaluate(&expression, &bindings).await.unwrap(), Term::integer(2022));
    assert_eq!(evaluator.evaluate(&expression, &bindings).await.unwrap(), Term::integer(2022));
}

#[tokio::test]
async fn test_components_of_date_time() {
    let value = typed("2011-01-10T14:45:13.815-05:00", xsd::DATE_TIME);
    assert_eq!(eval_op(RegularOperator::Month, vec![value.clone()]).await.unwrap(), Term::integer(1));
    assert_eq!(eval_op(RegularOperator::Minutes, vec![value.clone()]).await.unwrap(), Term::integer(45));
    let seconds = eval_op(RegularOperator::Seconds, vec![value.clone()]).await.unwrap();
    assert_eq!(lexical(&seconds), ("13.815".to_string(), xsd::DECIMAL.to_string()));
    let timezone = eval_op(RegularOperator::Timezone, vec![value.clone()]).await.unwrap();
    assert_eq!(lexical(&timezone), ("-PT5H".to_string(), xsd::DAY_TIME_DURATION.to_string()));
    assert_eq!(eval_op(RegularOperator::Tz, vec![value]).await.unwrap(), Term::string("-05:00"));
}

#[tokio::test]
async fn test_timezone_requires_zone() {
    let error = eval_op(RegularOperator::Timezone, vec![typed("2011-01-10T14:45:13", xsd::DATE_TIME)])
        .await
        .unwrap_err();
    assert!(matches!(error, EvalError::TimezoneUnavailable { .. }));
}

#[tokio::test]
async fn test_date_time_plus_duration() {
    let result = eval_op(
        RegularOperator::Addition,
        vec![typed("2020-12-31T23:30:00Z", xsd::DATE_TIME), typed("PT1H", xsd::DAY_TIME_DURATION)],
    )
    .await
    .unwrap();
    assert_eq!(lexical(&result), ("2021-01-01T00:30:00Z".to_string(), xsd::DATE_TIME.to_string()));
}

#[tokio::test]
async fn test_local_times_use_default_timezone() {
    // 10:00 local against 10:00Z is equal under the default UTC zone
    let local = typed("2020-01-01T10:00:00", xsd::DATE_TIME);
    let zoned = typed("2020-01-01T10:00:00Z", xsd::DATE_TIME);
    let result = eval_op(RegularOperator::Equal, vec![local, zoned]).await.unwrap();
    assert_eq!(result, Term::boolean(true));
}
