//! Function library integration tests
//!
//! Every test builds an expression tree and runs it through the public
//! [`ExpressionEvaluator`], so overload resolution, argument promotion and
//! the library tables are exercised together.

mod arithmetic;
mod comparison;
mod strings;
mod terms;
mod temporal;

use sparqlee_ast::{Expression, RegularOperator};
use sparqlee_eval::{Bindings, EvalResult, EvaluationContext, ExpressionEvaluator};
use sparqlee_types::Term;

// ============================================================================
// Test Helpers
// ============================================================================

pub fn evaluator() -> ExpressionEvaluator {
    ExpressionEvaluator::new(EvaluationContext::new())
}

pub fn typed(lexical: &str, datatype: &str) -> Term {
    Term::Literal(EvaluationContext::new().transformer().literal(lexical, datatype, None))
}

pub fn call(operator: RegularOperator, args: Vec<Term>) -> Expression {
    Expression::operator(operator, args.into_iter().map(Expression::term).collect())
}

pub async fn eval(expression: &Expression) -> EvalResult<Term> {
    evaluator().evaluate(expression, &Bindings::new()).await
}

pub async fn eval_op(operator: RegularOperator, args: Vec<Term>) -> EvalResult<Term> {
    eval(&call(operator, args)).await
}

/// Lexical form and datatype of a literal result
pub fn lexical(term: &Term) -> (String, String) {
    let literal = term.as_literal().expect("literal result");
    (literal.str(), literal.datatype.clone())
}
