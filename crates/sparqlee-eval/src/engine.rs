//! SPARQL Expression Evaluator
//!
//! This module provides the main ExpressionEvaluator which evaluates
//! expression trees against one solution's bindings.

use crate::context::{Bindings, EvaluationContext};
use crate::error::{EvalError, EvalResult};
use crate::library::FunctionLibrary;
use crate::special::{SpecialForms, SubEvaluator};
use async_trait::async_trait;
use futures::future::try_join_all;
use log::debug;
use sparqlee_ast::{Expression, ExtensionExpression, RegularOperator};
use sparqlee_types::Term;
use std::sync::Arc;

/// The main expression evaluation engine
///
/// Regular operators evaluate all of their arguments concurrently and then
/// dispatch on the argument types; special forms receive their arguments
/// unevaluated.
#[derive(Debug, Clone)]
pub struct ExpressionEvaluator {
    context: Arc<EvaluationContext>,
    library: Arc<FunctionLibrary>,
    special: Arc<SpecialForms>,
}

impl ExpressionEvaluator {
    /// Create an evaluator using the shared standard library
    pub fn new(context: EvaluationContext) -> Self {
        Self::with_library(context, FunctionLibrary::shared())
    }

    /// Create an evaluator with a custom library
    pub fn with_library(context: EvaluationContext, library: Arc<FunctionLibrary>) -> Self {
        let equal = match library.regular(RegularOperator::Equal) {
            Some(table) => Arc::clone(table),
            None => FunctionLibrary::shared()
                .regular(RegularOperator::Equal)
                .map(Arc::clone)
                .unwrap_or_else(crate::operators::comparison::equal),
        };
        Self {
            context: Arc::new(context),
            library,
            special: Arc::new(SpecialForms::standard(equal)),
        }
    }

    pub fn context(&self) -> &EvaluationContext {
        &self.context
    }

    pub fn library(&self) -> &FunctionLibrary {
        &self.library
    }

    /// Evaluate an expression to a term
    pub async fn evaluate(&self, expression: &Expression, bindings: &Bindings) -> EvalResult<Term> {
        SubEvaluator::evaluate(self, expression, bindings).await
    }

    /// Evaluate an expression to its effective boolean value
    pub async fn evaluate_as_ebv(&self, expression: &Expression, bindings: &Bindings) -> EvalResult<bool> {
        Ok(self.evaluate(expression, bindings).await?.coerce_ebv()?)
    }

    async fn evaluate_args(&self, args: &[Expression], bindings: &Bindings) -> EvalResult<Vec<Term>> {
        try_join_all(args.iter().map(|arg| SubEvaluator::evaluate(self, arg, bindings))).await
    }

    async fn evaluate_extension(
        &self,
        extension: &ExtensionExpression,
        bindings: &Bindings,
        asynchronous: bool,
    ) -> EvalResult<Term> {
        let name = extension.name.as_str();
        let extensions = self.context.extensions();
        let unknown = || EvalError::UnknownExtension { name: name.to_string() };
        debug!("Dispatching extension function <{name}>");
        if asynchronous {
            let function = Arc::clone(extensions.async_function(name).ok_or_else(unknown)?);
            let args = self.evaluate_args(&extension.args, bindings).await?;
            function.apply(args).await
        } else {
            let function = Arc::clone(extensions.sync_function(name).ok_or_else(unknown)?);
            let args = self.evaluate_args(&extension.args, bindings).await?;
            function(&args)
        }
    }
}

#[async_trait]
impl SubEvaluator for ExpressionEvaluator {
    async fn evaluate(&self, expression: &Expression, bindings: &Bindings) -> EvalResult<Term> {
        match expression {
            Expression::Term(term) => Ok(term.clone()),
            Expression::Variable(variable) => bindings
                .get(variable)
                .map(|raw| self.context.transformer().transform(raw))
                .ok_or_else(|| EvalError::unbound_variable(variable.name())),
            Expression::Operator(call) => {
                let args = self.evaluate_args(&call.args, bindings).await?;
                self.library.apply(call.operator, &args, &self.context)
            }
            Expression::SpecialOperator(call) => {
                self.special.apply(call.operator, &call.args, bindings, self).await
            }
            Expression::Named(call) => {
                let name = call.name.as_str();
                let table = Arc::clone(
                    self.library
                        .named(name)
                        .ok_or_else(|| EvalError::UnknownNamedFunction { name: name.to_string() })?,
                );
                let args = self.evaluate_args(&call.args, bindings).await?;
                table.apply(&args, &self.context)
            }
            Expression::SyncExtension(extension) => self.evaluate_extension(extension, bindings, false).await,
            Expression::AsyncExtension(extension) => self.evaluate_extension(extension, bindings, true).await,
            Expression::Existence(existence) => {
                let hook = Arc::clone(
                    self.context
                        .existence_hook()
                        .ok_or_else(|| EvalError::missing_hook("existence"))?,
                );
                let exists = hook.exists(existence, bindings).await?;
                Ok(Term::boolean(exists != existence.not))
            }
            Expression::Aggregate(aggregate) => {
                let hook = Arc::clone(
                    self.context
                        .aggregate_hook()
                        .ok_or_else(|| EvalError::missing_hook("aggregate"))?,
                );
                hook.aggregate(aggregate).await
            }
        }
    }

    fn context(&self) -> &EvaluationContext {
        &self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sparqlee_ast::SpecialOperator;
    use sparqlee_types::RdfTerm;

    fn evaluator() -> ExpressionEvaluator {
        ExpressionEvaluator::new(EvaluationContext::new())
    }

    #[tokio::test]
    async fn test_constant_term() {
        let result = evaluator()
            .evaluate(&Expression::term(Term::integer(1)), &Bindings::new())
            .await
            .unwrap();
        assert_eq!(result, Term::integer(1));
    }

    #[tokio::test]
    async fn test_variable_lookup_lifts_raw_term() {
        let mut bindings = Bindings::new();
        bindings.insert(
            sparqlee_ast::Variable::new("x"),
            RdfTerm::literal("5", sparqlee_types::vocab::xsd::INTEGER),
        );
        let expression = Expression::operator(
            RegularOperator::Addition,
            vec![Expression::variable("x"), Expression::term(Term::integer(1))],
        );
        let result = evaluator().evaluate(&expression, &bindings).await.unwrap();
        assert_eq!(result, Term::integer(6));
    }

    #[tokio::test]
    async fn test_unbound_variable() {
        let error = evaluator()
            .evaluate(&Expression::variable("missing"), &Bindings::new())
            .await
            .unwrap_err();
        assert_eq!(error, EvalError::unbound_variable("missing"));
    }

    #[tokio::test]
    async fn test_special_form_arity() {
        let expression = Expression::special(SpecialOperator::If, vec![Expression::term(Term::boolean(true))]);
        let error = evaluator().evaluate(&expression, &Bindings::new()).await.unwrap_err();
        assert!(matches!(error, EvalError::ArgumentType { function, .. } if function == "if"));
    }

    #[tokio::test]
    async fn test_missing_hooks() {
        let error = evaluator()
            .evaluate(&Expression::existence(false, serde_json::Value::Null), &Bindings::new())
            .await
            .unwrap_err();
        assert_eq!(error, EvalError::missing_hook("existence"));
    }

    #[tokio::test]
    async fn test_evaluate_as_ebv() {
        let ebv = evaluator()
            .evaluate_as_ebv(&Expression::term(Term::string("x")), &Bindings::new())
            .await
            .unwrap();
        assert!(ebv);
    }
}
