//! SPARQL Expression Evaluation Engine
//!
//! This crate evaluates SPARQL 1.1 (and RDF-star) expression trees against
//! variable bindings. It provides:
//!
//! - **Overload resolution**: every function is a table of typed overloads;
//!   calls dispatch on argument datatypes, following XSD subtyping and numeric
//!   promotion (`integer < decimal < float < double`)
//! - **Function library**: arithmetic, comparison, RDF term, string, numeric,
//!   date/time, hash and RDF-star functions plus XSD constructor casts
//! - **Special forms**: BOUND, IF, COALESCE, `||`, `&&`, SAMETERM, IN,
//!   NOT IN, CONCAT and BNODE, with SPARQL's error-masking rules
//! - **Hooks**: EXISTS and aggregates are delegated to the caller; extension
//!   functions are registered by IRI
//!
//! # Example
//!
//! ```
//! use sparqlee_ast::{Expression, RegularOperator};
//! use sparqlee_eval::{Bindings, EvaluationContext, ExpressionEvaluator};
//! use sparqlee_types::Term;
//!
//! let evaluator = ExpressionEvaluator::new(EvaluationContext::new());
//! let expression = Expression::operator(
//!     RegularOperator::Addition,
//!     vec![Expression::term(Term::integer(1)), Expression::term(Term::integer(2))],
//! );
//! let result = futures::executor::block_on(evaluator.evaluate(&expression, &Bindings::new()));
//! assert_eq!(result.unwrap(), Term::integer(3));
//! ```
//!
//! # Errors
//!
//! Evaluation errors are ordinary values: the surrounding query engine drops
//! the solution (FILTER) or leaves the variable unbound (BIND). Special forms
//! such as `||`, `&&`, COALESCE and IN absorb errors of their arguments where
//! SPARQL's semantics allow it.

pub mod builder;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod library;
pub mod operators;
pub mod overload;
pub mod special;

pub use builder::OverloadBuilder;
pub use config::EvaluatorConfig;
pub use context::{
    AggregateHook, AsyncExtensionFunction, Bindings, BlankNodeCounter, EvaluationContext,
    EvaluationContextBuilder, ExistenceHook, ExtensionRegistry, SyncExtensionFn,
};
pub use engine::ExpressionEvaluator;
pub use error::{EvalError, EvalResult};
pub use library::FunctionLibrary;
pub use overload::{ArgumentType, Candidates, OverloadCache, OverloadRule, OverloadTable, Signature};
pub use special::{SpecialForm, SpecialForms, SubEvaluator};
