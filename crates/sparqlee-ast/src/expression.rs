//! Expression tree
//!
//! Trees are produced once per query by the algebra translator and are
//! immutable afterwards; evaluation only borrows them.

use serde::{Deserialize, Serialize};
use std::fmt;

use sparqlee_types::{NamedNode, Term};

use crate::operator::{RegularOperator, SpecialOperator};

/// Sub-algebra carried verbatim for the pipeline's own hooks (EXISTS
/// patterns, aggregate inputs)
pub type RawAlgebra = serde_json::Value;

/// A query variable, stored without its `?`/`$` sigil
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Variable(String);

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        match name.strip_prefix(['?', '$']) {
            Some(stripped) => Self(stripped.to_string()),
            None => Self(name),
        }
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.0)
    }
}

/// Discriminant of an [`Expression`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionType {
    Aggregate,
    Existence,
    Named,
    Operator,
    SpecialOperator,
    Term,
    Variable,
    AsyncExtension,
    SyncExtension,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateExpression {
    /// Aggregator name, e.g. `count` or `group_concat`
    pub aggregator: String,
    pub distinct: bool,
    pub expression: RawAlgebra,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExistenceExpression {
    /// `NOT EXISTS` when set
    pub not: bool,
    pub pattern: RawAlgebra,
}

/// Call of a built-in function identified by IRI (XSD constructors)
#[derive(Debug, Clone, PartialEq)]
pub struct NamedExpression {
    pub name: NamedNode,
    pub args: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperatorExpression {
    pub operator: RegularOperator,
    pub args: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpecialOperatorExpression {
    pub operator: SpecialOperator,
    pub args: Vec<Expression>,
}

/// Call of a user-registered extension function
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionExpression {
    pub name: NamedNode,
    pub args: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Aggregate(AggregateExpression),
    Existence(ExistenceExpression),
    Named(NamedExpression),
    Operator(OperatorExpression),
    SpecialOperator(SpecialOperatorExpression),
    Term(Term),
    Variable(Variable),
    AsyncExtension(ExtensionExpression),
    SyncExtension(ExtensionExpression),
}

impl Expression {
    pub fn term(term: impl Into<Term>) -> Self {
        Self::Term(term.into())
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(Variable::new(name))
    }

    pub fn operator(operator: RegularOperator, args: Vec<Expression>) -> Self {
        Self::Operator(OperatorExpression { operator, args })
    }

    pub fn special(operator: SpecialOperator, args: Vec<Expression>) -> Self {
        Self::SpecialOperator(SpecialOperatorExpression { operator, args })
    }

    pub fn named(name: impl Into<String>, args: Vec<Expression>) -> Self {
        Self::Named(NamedExpression {
            name: NamedNode::new(name),
            args,
        })
    }

    pub fn sync_extension(name: impl Into<String>, args: Vec<Expression>) -> Self {
        Self::SyncExtension(ExtensionExpression {
            name: NamedNode::new(name),
            args,
        })
    }

    pub fn async_extension(name: impl Into<String>, args: Vec<Expression>) -> Self {
        Self::AsyncExtension(ExtensionExpression {
            name: NamedNode::new(name),
            args,
        })
    }

    pub fn existence(not: bool, pattern: RawAlgebra) -> Self {
        Self::Existence(ExistenceExpression { not, pattern })
    }

    pub fn aggregate(aggregator: impl Into<String>, distinct: bool, expression: RawAlgebra) -> Self {
        Self::Aggregate(AggregateExpression {
            aggregator: aggregator.into(),
            distinct,
            expression,
        })
    }

    pub fn expression_type(&self) -> ExpressionType {
        match self {
            Self::Aggregate(_) => ExpressionType::Aggregate,
            Self::Existence(_) => ExpressionType::Existence,
            Self::Named(_) => ExpressionType::Named,
            Self::Operator(_) => ExpressionType::Operator,
            Self::SpecialOperator(_) => ExpressionType::SpecialOperator,
            Self::Term(_) => ExpressionType::Term,
            Self::Variable(_) => ExpressionType::Variable,
            Self::AsyncExtension(_) => ExpressionType::AsyncExtension,
            Self::SyncExtension(_) => ExpressionType::SyncExtension,
        }
    }

    /// Direct sub-expressions; empty for leaves and raw sub-algebra
    pub fn args(&self) -> &[Expression] {
        match self {
            Self::Named(e) => &e.args,
            Self::Operator(e) => &e.args,
            Self::SpecialOperator(e) => &e.args,
            Self::AsyncExtension(e) | Self::SyncExtension(e) => &e.args,
            Self::Aggregate(_) | Self::Existence(_) | Self::Term(_) | Self::Variable(_) => &[],
        }
    }
}
