//! Unevaluated SPARQL expression trees
//!
//! The algebra translator produces an [`Expression`] per FILTER, BIND or
//! aggregate argument. Operators are identified by [`RegularOperator`] (eager
//! arguments) and [`SpecialOperator`] (functional forms with lazy arguments).

mod expression;
mod operator;

pub use expression::*;
pub use operator::*;
