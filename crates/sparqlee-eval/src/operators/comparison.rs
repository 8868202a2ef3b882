//! Comparison Operators
//!
//! Implements: `=`, `!=`, `<`, `>`, `<=`, `>=`
//!
//! Only `=` and `<` carry real overloads. The other operators are defined on
//! top of them (`a > b` is `b < a`, `a <= b` is `a < b || a = b`, ...), so
//! every member of the family accepts and rejects exactly the same argument
//! types. Quoted triples compare component-wise, which makes both base tables
//! call back into themselves.

use crate::builder::OverloadBuilder;
use crate::context::EvaluationContext;
use crate::error::{EvalError, EvalResult};
use crate::operators::{duration_arg, string_literal_arg};
use crate::overload::{ArgumentType, OverloadTable};
use sparqlee_types::{Quad, Term};
use std::cmp::Ordering;
use std::sync::{Arc, Weak};

fn lang_key(term: &Term) -> EvalResult<(&str, String)> {
    let literal = string_literal_arg(term)?;
    Ok((
        literal.string_value().unwrap_or_default(),
        literal.language().unwrap_or_default().to_ascii_lowercase(),
    ))
}

fn upgrade(table: &Weak<OverloadTable>) -> EvalResult<Arc<OverloadTable>> {
    table
        .upgrade()
        .ok_or_else(|| EvalError::internal("comparison table dropped during evaluation"))
}

fn holds(table: &OverloadTable, left: &Term, right: &Term, ctx: &EvaluationContext) -> EvalResult<bool> {
    Ok(table.apply(&[left.clone(), right.clone()], ctx)?.coerce_ebv()?)
}

fn components(quad: &Quad) -> [&Term; 3] {
    [quad.subject(), quad.predicate(), quad.object()]
}

/// RDF term equality: identical terms are equal, differing literals cannot
/// be compared, any other pair is unequal
fn rdf_term_equal(left: &Term, right: &Term) -> EvalResult<Term> {
    let same = left.to_rdf() == right.to_rdf();
    match (left, right) {
        (Term::Literal(_), Term::Literal(_)) if !same => Err(EvalError::rdf_equal_type(left, right)),
        _ => Ok(Term::boolean(same)),
    }
}

/// `=`
pub fn equal() -> Arc<OverloadTable> {
    Arc::new_cyclic(|this: &Weak<OverloadTable>| {
        let this = this.clone();
        OverloadBuilder::new("=")
            .number_test(|left, right| left.compare(&right) == Some(Ordering::Equal))
            .string_test(|left, right| left == right)
            .on_binary(ArgumentType::LANG_STRING, ArgumentType::LANG_STRING, |left, right, _| {
                Ok(Term::boolean(lang_key(left)? == lang_key(right)?))
            })
            .on_binary(ArgumentType::STRING, ArgumentType::LANG_STRING, |_, _, _| Ok(Term::boolean(false)))
            .on_binary(ArgumentType::LANG_STRING, ArgumentType::STRING, |_, _, _| Ok(Term::boolean(false)))
            .boolean_test(|left, right| left == right)
            .date_time_test(|left, right, timezone| left.compare(right, timezone) == Ordering::Equal)
            .copy([ArgumentType::DATE_TIME, ArgumentType::DATE_TIME], [ArgumentType::DATE, ArgumentType::DATE])
            .copy([ArgumentType::DATE_TIME, ArgumentType::DATE_TIME], [ArgumentType::TIME, ArgumentType::TIME])
            .on_binary(ArgumentType::DURATION, ArgumentType::DURATION, |left, right, _| {
                Ok(Term::boolean(duration_arg(left)? == duration_arg(right)?))
            })
            .on_binary(ArgumentType::Quad, ArgumentType::Quad, move |left, right, ctx| {
                let equal = upgrade(&this)?;
                let (Some(left), Some(right)) = (left.as_quad(), right.as_quad()) else {
                    return Ok(Term::boolean(false));
                };
                for (a, b) in components(left).into_iter().zip(components(right)) {
                    if !holds(&equal, a, b, ctx)? {
                        return Ok(Term::boolean(false));
                    }
                }
                Ok(Term::boolean(left.graph() == right.graph()))
            })
            .on_binary(ArgumentType::Term, ArgumentType::Term, |left, right, _| rdf_term_equal(left, right))
            .collect()
    })
}

/// `<`; `equal` decides which quad component is the first to differ
pub fn less_than(equal: Arc<OverloadTable>) -> Arc<OverloadTable> {
    Arc::new_cyclic(|this: &Weak<OverloadTable>| {
        let this = this.clone();
        OverloadBuilder::new("<")
            .number_test(|left, right| left.compare(&right) == Some(Ordering::Less))
            .string_test(|left, right| left < right)
            .on_binary(ArgumentType::LANG_STRING, ArgumentType::LANG_STRING, |left, right, _| {
                Ok(Term::boolean(lang_key(left)? < lang_key(right)?))
            })
            .boolean_test(|left, right| !left && right)
            .date_time_test(|left, right, timezone| left.compare(right, timezone) == Ordering::Less)
            .copy([ArgumentType::DATE_TIME, ArgumentType::DATE_TIME], [ArgumentType::DATE, ArgumentType::DATE])
            .copy([ArgumentType::DATE_TIME, ArgumentType::DATE_TIME], [ArgumentType::TIME, ArgumentType::TIME])
            .on_binary(
                ArgumentType::YEAR_MONTH_DURATION,
                ArgumentType::YEAR_MONTH_DURATION,
                |left, right, _| Ok(Term::boolean(duration_arg(left)?.months < duration_arg(right)?.months)),
            )
            .on_binary(
                ArgumentType::DAY_TIME_DURATION,
                ArgumentType::DAY_TIME_DURATION,
                |left, right, _| Ok(Term::boolean(duration_arg(left)?.seconds < duration_arg(right)?.seconds)),
            )
            .on_binary(ArgumentType::Quad, ArgumentType::Quad, move |left, right, ctx| {
                let less_than = upgrade(&this)?;
                let (Some(left), Some(right)) = (left.as_quad(), right.as_quad()) else {
                    return Ok(Term::boolean(false));
                };
                for (a, b) in components(left).into_iter().zip(components(right)) {
                    if !holds(&equal, a, b, ctx)? {
                        return Ok(Term::boolean(holds(&less_than, a, b, ctx)?));
                    }
                }
                Ok(Term::boolean(false))
            })
            .collect()
    })
}

/// `!=`
pub fn not_equal(equal: Arc<OverloadTable>) -> OverloadTable {
    OverloadBuilder::new("!=")
        .on_binary(ArgumentType::Term, ArgumentType::Term, move |left, right, ctx| {
            Ok(Term::boolean(!holds(&equal, left, right, ctx)?))
        })
        .collect()
}

/// `>`
pub fn greater_than(less_than: Arc<OverloadTable>) -> OverloadTable {
    OverloadBuilder::new(">")
        .on_binary(ArgumentType::Term, ArgumentType::Term, move |left, right, ctx| {
            less_than.apply(&[right.clone(), left.clone()], ctx)
        })
        .collect()
}

/// `<=`
pub fn less_than_equal(less_than: Arc<OverloadTable>, equal: Arc<OverloadTable>) -> OverloadTable {
    OverloadBuilder::new("<=")
        .on_binary(ArgumentType::Term, ArgumentType::Term, move |left, right, ctx| {
            let result = holds(&less_than, left, right, ctx)? || holds(&equal, left, right, ctx)?;
            Ok(Term::boolean(result))
        })
        .collect()
}

/// `>=`
pub fn greater_than_equal(less_than: Arc<OverloadTable>, equal: Arc<OverloadTable>) -> OverloadTable {
    OverloadBuilder::new(">=")
        .on_binary(ArgumentType::Term, ArgumentType::Term, move |left, right, ctx| {
            let result = holds(&less_than, right, left, ctx)? || holds(&equal, left, right, ctx)?;
            Ok(Term::boolean(result))
        })
        .collect()
}
