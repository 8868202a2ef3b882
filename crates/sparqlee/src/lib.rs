//! SPARQL expression evaluation for Rust
//!
//! This crate bundles the pieces needed to evaluate SPARQL 1.1 / RDF-star
//! expressions inside a query engine:
//! - RDF terms with typed, lazily validated literal values
//! - The XSD datatype hierarchy and numeric promotion
//! - Overload-resolved built-in functions and XSD casts
//! - Special forms with SPARQL's error-masking semantics
//!
//! # Example
//!
//! ```
//! use sparqlee::{Bindings, EvaluationContext, Expression, ExpressionEvaluator, SpecialOperator, Term};
//!
//! let evaluator = ExpressionEvaluator::new(EvaluationContext::new());
//! let expression = Expression::special(
//!     SpecialOperator::Concat,
//!     vec![
//!         Expression::term(Term::lang_string("foo", "en")),
//!         Expression::term(Term::lang_string("bar", "en")),
//!     ],
//! );
//! let result = futures::executor::block_on(evaluator.evaluate(&expression, &Bindings::new()))?;
//! assert_eq!(result, Term::lang_string("foobar", "en"));
//! # Ok::<(), sparqlee::EvalError>(())
//! ```

// Re-export all public APIs from internal crates
pub use sparqlee_ast as ast;
pub use sparqlee_eval as eval;
pub use sparqlee_types as types;

// Convenience re-exports
pub use sparqlee_ast::{Expression, RegularOperator, SpecialOperator, Variable};
pub use sparqlee_eval::{
    Bindings, EvalError, EvalResult, EvaluationContext, EvaluatorConfig, ExpressionEvaluator, FunctionLibrary,
};
pub use sparqlee_types::{Literal, RdfTerm, Term, TermTransformer};
