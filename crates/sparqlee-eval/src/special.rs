//! Special forms: functions that receive unevaluated argument expressions
//!
//! Implements: BOUND, IF, COALESCE, `||`, `&&`, SAMETERM, IN, NOT IN,
//! CONCAT, BNODE
//!
//! Each form decides which of its arguments to evaluate and in which order,
//! and how errors raised by those evaluations are masked or reported.

use crate::context::{Bindings, EvaluationContext};
use crate::error::{EvalError, EvalResult};
use crate::overload::OverloadTable;
use async_trait::async_trait;
use futures::future::{try_join, try_join_all};
use log::debug;
use sparqlee_ast::{Expression, SpecialOperator};
use sparqlee_types::{LiteralValue, Term};
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::Arc;

/// Recursive evaluation handed to special forms
#[async_trait]
pub trait SubEvaluator: Send + Sync {
    async fn evaluate(&self, expression: &Expression, bindings: &Bindings) -> EvalResult<Term>;

    fn context(&self) -> &EvaluationContext;
}

/// A function over unevaluated arguments
#[async_trait]
pub trait SpecialForm: Send + Sync {
    /// Accepted argument counts
    fn arity(&self) -> RangeInclusive<usize>;

    async fn apply(
        &self,
        args: &[Expression],
        bindings: &Bindings,
        evaluator: &dyn SubEvaluator,
    ) -> EvalResult<Term>;
}

async fn evaluate_ebv(evaluator: &dyn SubEvaluator, expression: &Expression, bindings: &Bindings) -> EvalResult<bool> {
    Ok(evaluator.evaluate(expression, bindings).await?.coerce_ebv()?)
}

// ============================================================================
// BOUND, IF, COALESCE
// ============================================================================

/// `BOUND(?x)`: whether the variable has a value; its argument is never evaluated
#[derive(Debug, Default)]
pub struct Bound;

#[async_trait]
impl SpecialForm for Bound {
    fn arity(&self) -> RangeInclusive<usize> {
        1..=1
    }

    async fn apply(&self, args: &[Expression], bindings: &Bindings, _: &dyn SubEvaluator) -> EvalResult<Term> {
        let [arg] = args else {
            return Err(EvalError::arity(SpecialOperator::Bound.name(), args.len()));
        };
        match arg {
            Expression::Variable(variable) => Ok(Term::boolean(bindings.contains_key(variable))),
            other => Err(EvalError::ArgumentType {
                function: SpecialOperator::Bound.name().to_string(),
                types: format!("{:?}", other.expression_type()),
            }),
        }
    }
}

/// `IF(c, a, b)`: evaluates exactly one branch
#[derive(Debug, Default)]
pub struct If;

#[async_trait]
impl SpecialForm for If {
    fn arity(&self) -> RangeInclusive<usize> {
        3..=3
    }

    async fn apply(&self, args: &[Expression], bindings: &Bindings, evaluator: &dyn SubEvaluator) -> EvalResult<Term> {
        let [condition, then, otherwise] = args else {
            return Err(EvalError::arity(SpecialOperator::If.name(), args.len()));
        };
        let branch = if evaluate_ebv(evaluator, condition, bindings).await? {
            then
        } else {
            otherwise
        };
        evaluator.evaluate(branch, bindings).await
    }
}

/// `COALESCE(e1, ...)`: first argument that evaluates without error
#[derive(Debug, Default)]
pub struct Coalesce;

#[async_trait]
impl SpecialForm for Coalesce {
    fn arity(&self) -> RangeInclusive<usize> {
        0..=usize::MAX
    }

    async fn apply(&self, args: &[Expression], bindings: &Bindings, evaluator: &dyn SubEvaluator) -> EvalResult<Term> {
        let mut errors = Vec::new();
        for arg in args {
            match evaluator.evaluate(arg, bindings).await {
                Ok(term) => return Ok(term),
                Err(error) => {
                    debug!("COALESCE skipping failed argument: {error}");
                    errors.push(error);
                }
            }
        }
        Err(EvalError::aggregate("COALESCE", errors))
    }
}

// ============================================================================
// Logical connectives
// ============================================================================

/// `a || b`: an error on one side is masked when the other side is true
#[derive(Debug, Default)]
pub struct LogicalOr;

#[async_trait]
impl SpecialForm for LogicalOr {
    fn arity(&self) -> RangeInclusive<usize> {
        2..=2
    }

    async fn apply(&self, args: &[Expression], bindings: &Bindings, evaluator: &dyn SubEvaluator) -> EvalResult<Term> {
        let [left, right] = args else {
            return Err(EvalError::arity(SpecialOperator::LogicalOr.name(), args.len()));
        };
        match evaluate_ebv(evaluator, left, bindings).await {
            Ok(true) => Ok(Term::boolean(true)),
            Ok(false) => Ok(Term::boolean(evaluate_ebv(evaluator, right, bindings).await?)),
            Err(left_error) => match evaluate_ebv(evaluator, right, bindings).await {
                Ok(true) => {
                    debug!("|| masking left error: {left_error}");
                    Ok(Term::boolean(true))
                }
                Ok(false) | Err(_) => Err(left_error),
            },
        }
    }
}

/// `a && b`: an error on one side is masked when the other side is false
#[derive(Debug, Default)]
pub struct LogicalAnd;

#[async_trait]
impl SpecialForm for LogicalAnd {
    fn arity(&self) -> RangeInclusive<usize> {
        2..=2
    }

    async fn apply(&self, args: &[Expression], bindings: &Bindings, evaluator: &dyn SubEvaluator) -> EvalResult<Term> {
        let [left, right] = args else {
            return Err(EvalError::arity(SpecialOperator::LogicalAnd.name(), args.len()));
        };
        match evaluate_ebv(evaluator, left, bindings).await {
            Ok(false) => Ok(Term::boolean(false)),
            Ok(true) => Ok(Term::boolean(evaluate_ebv(evaluator, right, bindings).await?)),
            Err(left_error) => match evaluate_ebv(evaluator, right, bindings).await {
                Ok(false) => {
                    debug!("&& masking left error: {left_error}");
                    Ok(Term::boolean(false))
                }
                Ok(true) | Err(_) => Err(left_error),
            },
        }
    }
}

// ============================================================================
// SAMETERM, IN, NOT IN
// ============================================================================

/// `SAMETERM(a, b)`: RDF term identity, lexical forms included
#[derive(Debug, Default)]
pub struct SameTerm;

#[async_trait]
impl SpecialForm for SameTerm {
    fn arity(&self) -> RangeInclusive<usize> {
        2..=2
    }

    async fn apply(&self, args: &[Expression], bindings: &Bindings, evaluator: &dyn SubEvaluator) -> EvalResult<Term> {
        let [left, right] = args else {
            return Err(EvalError::arity(SpecialOperator::SameTerm.name(), args.len()));
        };
        let (left, right) = try_join(
            evaluator.evaluate(left, bindings),
            evaluator.evaluate(right, bindings),
        )
        .await?;
        Ok(Term::boolean(left.to_rdf() == right.to_rdf()))
    }
}

/// `x IN (e1, ...)`: compares with the injected `=` table, stopping at the
/// first match
#[derive(Debug)]
pub struct In {
    equal: Arc<OverloadTable>,
}

impl In {
    pub fn new(equal: Arc<OverloadTable>) -> Self {
        Self { equal }
    }

    async fn test(
        &self,
        form: SpecialOperator,
        args: &[Expression],
        bindings: &Bindings,
        evaluator: &dyn SubEvaluator,
    ) -> EvalResult<bool> {
        let Some((needle, candidates)) = args.split_first() else {
            return Err(EvalError::arity(form.name(), 0));
        };
        let needle = evaluator.evaluate(needle, bindings).await?;
        let mut errors = Vec::new();
        for candidate in candidates {
            let outcome = match evaluator.evaluate(candidate, bindings).await {
                Ok(value) => self
                    .equal
                    .apply(&[needle.clone(), value], evaluator.context())
                    .and_then(|result| result.coerce_ebv().map_err(EvalError::from)),
                Err(error) => Err(error),
            };
            match outcome {
                Ok(true) => return Ok(true),
                Ok(false) => {}
                Err(error) => errors.push(error),
            }
        }
        if errors.is_empty() {
            Ok(false)
        } else {
            debug!("{form} failed with {} suppressed error(s)", errors.len());
            Err(EvalError::aggregate(form.name().to_uppercase(), errors))
        }
    }
}

#[async_trait]
impl SpecialForm for In {
    fn arity(&self) -> RangeInclusive<usize> {
        1..=usize::MAX
    }

    async fn apply(&self, args: &[Expression], bindings: &Bindings, evaluator: &dyn SubEvaluator) -> EvalResult<Term> {
        Ok(Term::boolean(self.test(SpecialOperator::In, args, bindings, evaluator).await?))
    }
}

/// `x NOT IN (e1, ...)`: negation of IN, errors included
#[derive(Debug)]
pub struct NotIn {
    inner: Arc<In>,
}

impl NotIn {
    pub fn new(inner: Arc<In>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl SpecialForm for NotIn {
    fn arity(&self) -> RangeInclusive<usize> {
        1..=usize::MAX
    }

    async fn apply(&self, args: &[Expression], bindings: &Bindings, evaluator: &dyn SubEvaluator) -> EvalResult<Term> {
        let found = self.inner.test(SpecialOperator::NotIn, args, bindings, evaluator).await?;
        Ok(Term::boolean(!found))
    }
}

// ============================================================================
// CONCAT, BNODE
// ============================================================================

/// `CONCAT(s1, ...)`: the language tag survives only when all arguments share it
#[derive(Debug, Default)]
pub struct Concat;

#[async_trait]
impl SpecialForm for Concat {
    fn arity(&self) -> RangeInclusive<usize> {
        0..=usize::MAX
    }

    async fn apply(&self, args: &[Expression], bindings: &Bindings, evaluator: &dyn SubEvaluator) -> EvalResult<Term> {
        let values = try_join_all(args.iter().map(|arg| evaluator.evaluate(arg, bindings))).await?;

        let mut result = String::new();
        let mut language: Option<Option<String>> = None;
        for value in &values {
            let literal = match value {
                Term::Literal(literal)
                    if matches!(literal.value, LiteralValue::String(_) | LiteralValue::LangString(_)) =>
                {
                    literal
                }
                _ => return Err(EvalError::argument_type(SpecialOperator::Concat.name(), &values)),
            };
            result.push_str(literal.string_value().unwrap_or_default());
            let tag = literal.language().map(str::to_ascii_lowercase);
            language = match language {
                None => Some(tag),
                Some(shared) if shared == tag => Some(shared),
                Some(_) => Some(None),
            };
        }

        Ok(match language.flatten() {
            Some(tag) => Term::lang_string(result, tag),
            None => Term::string(result),
        })
    }
}

/// `BNODE()` / `BNODE(label)`: fresh blank node, or one named by a simple literal
#[derive(Debug, Default)]
pub struct BNode;

#[async_trait]
impl SpecialForm for BNode {
    fn arity(&self) -> RangeInclusive<usize> {
        0..=1
    }

    async fn apply(&self, args: &[Expression], bindings: &Bindings, evaluator: &dyn SubEvaluator) -> EvalResult<Term> {
        let Some(label) = args.first() else {
            return Ok(Term::blank_node(evaluator.context().blank_nodes().next_label()));
        };
        let label = evaluator.evaluate(label, bindings).await?;
        match label.as_literal().map(|literal| &literal.value) {
            Some(LiteralValue::String(value)) => Ok(Term::blank_node(value.clone())),
            _ => Err(EvalError::argument_type(SpecialOperator::BNode.name(), &[label.clone()])),
        }
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Special form implementations keyed by operator
#[derive(Clone)]
pub struct SpecialForms {
    forms: HashMap<SpecialOperator, Arc<dyn SpecialForm>>,
}

impl SpecialForms {
    /// Standard forms; IN and NOT IN compare with `equal`
    pub fn standard(equal: Arc<OverloadTable>) -> Self {
        let in_form = Arc::new(In::new(equal));
        let forms: HashMap<SpecialOperator, Arc<dyn SpecialForm>> = HashMap::from([
            (SpecialOperator::Bound, Arc::new(Bound) as Arc<dyn SpecialForm>),
            (SpecialOperator::If, Arc::new(If)),
            (SpecialOperator::Coalesce, Arc::new(Coalesce)),
            (SpecialOperator::LogicalOr, Arc::new(LogicalOr)),
            (SpecialOperator::LogicalAnd, Arc::new(LogicalAnd)),
            (SpecialOperator::SameTerm, Arc::new(SameTerm)),
            (SpecialOperator::In, Arc::clone(&in_form) as Arc<dyn SpecialForm>),
            (SpecialOperator::NotIn, Arc::new(NotIn::new(in_form))),
            (SpecialOperator::Concat, Arc::new(Concat)),
            (SpecialOperator::BNode, Arc::new(BNode)),
        ]);
        Self { forms }
    }

    pub fn get(&self, operator: SpecialOperator) -> Option<&Arc<dyn SpecialForm>> {
        self.forms.get(&operator)
    }

    /// Check the argument count and run the form
    pub async fn apply(
        &self,
        operator: SpecialOperator,
        args: &[Expression],
        bindings: &Bindings,
        evaluator: &dyn SubEvaluator,
    ) -> EvalResult<Term> {
        let form = self
            .get(operator)
            .ok_or_else(|| EvalError::internal(format!("no implementation for special form {operator}")))?;
        if !form.arity().contains(&args.len()) {
            return Err(EvalError::arity(operator.name(), args.len()));
        }
        form.apply(args, bindings, evaluator).await
    }
}

impl std::fmt::Debug for SpecialForms {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpecialForms")
            .field("forms", &self.forms.keys().collect::<Vec<_>>())
            .finish()
    }
}
