//! Declarative construction of overload tables
//!
//! ```
//! use sparqlee_eval::{ArgumentType, EvaluationContext, OverloadBuilder};
//! use sparqlee_types::Term;
//!
//! let table = OverloadBuilder::new("twice")
//!     .on_string1(|value| Ok(Term::string(value.repeat(2))))
//!     .collect();
//! let ctx = EvaluationContext::new();
//! assert_eq!(table.apply(&[Term::string("ab")], &ctx).unwrap(), Term::string("abab"));
//! ```

use crate::context::EvaluationContext;
use crate::error::EvalResult;
use crate::operators::{boolean_arg, numeric_arg, string_literal_arg, temporal_arg};
use crate::overload::{ArgumentType, OverloadRule, OverloadTable, Signature};
use sparqlee_types::{DateTimeValue, Literal, Numeric, NumericKind, Term, TimezoneOffset};
use std::sync::Arc;

/// Collects overload rules for one function
pub struct OverloadBuilder {
    name: &'static str,
    rules: Vec<OverloadRule>,
}

impl OverloadBuilder {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            rules: Vec::new(),
        }
    }

    /// Register an implementation for an exact signature
    pub fn set<F>(mut self, signature: impl IntoIterator<Item = ArgumentType>, implementation: F) -> Self
    where
        F: Fn(&[Term], &EvaluationContext) -> EvalResult<Term> + Send + Sync + 'static,
    {
        let signature: Signature = signature.into_iter().collect();
        self.rules.push(OverloadRule::new(signature, Arc::new(implementation)));
        self
    }

    pub fn on_unary<F>(self, argument: ArgumentType, implementation: F) -> Self
    where
        F: Fn(&Term, &EvaluationContext) -> EvalResult<Term> + Send + Sync + 'static,
    {
        self.set([argument], move |args, ctx| implementation(&args[0], ctx))
    }

    pub fn on_binary<F>(self, left: ArgumentType, right: ArgumentType, implementation: F) -> Self
    where
        F: Fn(&Term, &Term, &EvaluationContext) -> EvalResult<Term> + Send + Sync + 'static,
    {
        self.set([left, right], move |args, ctx| implementation(&args[0], &args[1], ctx))
    }

    pub fn on_ternary<F>(
        self,
        first: ArgumentType,
        second: ArgumentType,
        third: ArgumentType,
        implementation: F,
    ) -> Self
    where
        F: Fn(&Term, &Term, &Term, &EvaluationContext) -> EvalResult<Term> + Send + Sync + 'static,
    {
        self.set([first, second, third], move |args, ctx| {
            implementation(&args[0], &args[1], &args[2], ctx)
        })
    }

    /// Single argument of any term type
    pub fn on_term1<F>(self, implementation: F) -> Self
    where
        F: Fn(&Term) -> EvalResult<Term> + Send + Sync + 'static,
    {
        self.on_unary(ArgumentType::Term, move |term, _| implementation(term))
    }

    /// Single `xsd:string` argument
    pub fn on_string1<F>(self, implementation: F) -> Self
    where
        F: Fn(&str) -> EvalResult<Term> + Send + Sync + 'static,
    {
        self.on_unary(ArgumentType::STRING, move |term, _| {
            let literal = string_literal_arg(term)?;
            implementation(literal.string_value().unwrap_or_default())
        })
    }

    /// Single plain or language-tagged string argument
    pub fn on_stringly1<F>(self, implementation: F) -> Self
    where
        F: Fn(&Literal) -> EvalResult<Term> + Send + Sync + 'static,
    {
        let implementation = Arc::new(implementation);
        let tagged = Arc::clone(&implementation);
        self.on_unary(ArgumentType::STRING, move |term, _| implementation(string_literal_arg(term)?))
            .on_unary(ArgumentType::LANG_STRING, move |term, _| tagged(string_literal_arg(term)?))
    }

    /// One rule per numeric kind mapping a number to a number of the same kind
    pub fn numeric_converter<F>(mut self, converter: F) -> Self
    where
        F: Fn(Numeric) -> EvalResult<Numeric> + Send + Sync + 'static,
    {
        let converter = Arc::new(converter);
        for kind in NumericKind::ALL {
            let converter = Arc::clone(&converter);
            self = self.on_unary(ArgumentType::numeric(kind), move |term, _| {
                Ok(Literal::from_numeric(converter(numeric_arg(term)?)?).into())
            });
        }
        self
    }

    /// One rule per homogeneous numeric pair; mixed pairs reach them through promotion
    pub fn arithmetic<F>(mut self, operation: F) -> Self
    where
        F: Fn(Numeric, Numeric) -> EvalResult<Numeric> + Send + Sync + 'static,
    {
        let operation = Arc::new(operation);
        for kind in NumericKind::ALL {
            let operation = Arc::clone(&operation);
            let parameter = ArgumentType::numeric(kind);
            self = self.on_binary(parameter.clone(), parameter, move |left, right, _| {
                Ok(Literal::from_numeric(operation(numeric_arg(left)?, numeric_arg(right)?)?).into())
            });
        }
        self
    }

    /// Boolean-valued test over homogeneous numeric pairs
    pub fn number_test<F>(mut self, test: F) -> Self
    where
        F: Fn(Numeric, Numeric) -> bool + Send + Sync + 'static,
    {
        let test = Arc::new(test);
        for kind in NumericKind::ALL {
            let test = Arc::clone(&test);
            let parameter = ArgumentType::numeric(kind);
            self = self.on_binary(parameter.clone(), parameter, move |left, right, _| {
                Ok(Term::boolean(test(numeric_arg(left)?, numeric_arg(right)?)))
            });
        }
        self
    }

    /// Boolean-valued test over two `xsd:string` values
    pub fn string_test<F>(self, test: F) -> Self
    where
        F: Fn(&str, &str) -> bool + Send + Sync + 'static,
    {
        self.on_binary(ArgumentType::STRING, ArgumentType::STRING, move |left, right, _| {
            let left = string_literal_arg(left)?.string_value().unwrap_or_default();
            let right = string_literal_arg(right)?.string_value().unwrap_or_default();
            Ok(Term::boolean(test(left, right)))
        })
    }

    pub fn boolean_test<F>(self, test: F) -> Self
    where
        F: Fn(bool, bool) -> bool + Send + Sync + 'static,
    {
        self.on_binary(ArgumentType::BOOLEAN, ArgumentType::BOOLEAN, move |left, right, _| {
            Ok(Term::boolean(test(boolean_arg(left)?, boolean_arg(right)?)))
        })
    }

    /// Boolean-valued test over two `xsd:dateTime` values; the context's
    /// default timezone is passed for values without one
    pub fn date_time_test<F>(self, test: F) -> Self
    where
        F: Fn(&DateTimeValue, &DateTimeValue, TimezoneOffset) -> bool + Send + Sync + 'static,
    {
        self.on_binary(ArgumentType::DATE_TIME, ArgumentType::DATE_TIME, move |left, right, ctx| {
            let (left, right) = (temporal_arg(left)?, temporal_arg(right)?);
            Ok(Term::boolean(test(&left, &right, ctx.default_timezone())))
        })
    }

    /// Register the implementation of signature `from` for signature `to`
    pub fn copy(
        mut self,
        from: impl IntoIterator<Item = ArgumentType>,
        to: impl IntoIterator<Item = ArgumentType>,
    ) -> Self {
        let from: Signature = from.into_iter().collect();
        match self.rules.iter().find(|rule| rule.signature() == from.as_slice()) {
            Some(rule) => {
                let implementation = Arc::clone(rule.implementation());
                self.rules.push(OverloadRule::new(to.into_iter().collect(), implementation));
            }
            None => log::warn!("{}: no overload {:?} to copy", self.name, from),
        }
        self
    }

    pub fn collect(self) -> OverloadTable {
        OverloadTable::new(self.name, self.rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_numeric_converter_registers_every_kind() {
        let table = OverloadBuilder::new("id").numeric_converter(Ok).collect();
        let signatures: Vec<_> = table.rules(1).iter().map(|rule| rule.signature().to_vec()).collect();
        assert_eq!(
            signatures,
            vec![
                vec![ArgumentType::INTEGER],
                vec![ArgumentType::DECIMAL],
                vec![ArgumentType::FLOAT],
                vec![ArgumentType::DOUBLE],
            ]
        );
    }

    #[test]
    fn test_copy_duplicates_implementation() {
        let table = OverloadBuilder::new("f")
            .on_term1(|_| Ok(Term::integer(7)))
            .copy([ArgumentType::Term], [ArgumentType::Literal])
            .collect();
        assert_eq!(table.rules(1).len(), 2);
        assert_eq!(table.rules(1)[1].signature(), &[ArgumentType::Literal]);
        let ctx = EvaluationContext::new();
        assert_eq!(table.apply(&[Term::string("x")], &ctx).unwrap(), Term::integer(7));
    }

    #[test]
    fn test_copy_of_missing_signature_is_ignored() {
        let table = OverloadBuilder::new("f")
            .copy([ArgumentType::Term], [ArgumentType::Literal])
            .collect();
        assert_eq!(table.rules(1).len(), 0);
    }

    #[test]
    fn test_arithmetic_mixed_pair_promotes() {
        let table = OverloadBuilder::new("+")
            .arithmetic(|left, right| Ok(Numeric::Double(left.to_f64() + right.to_f64())))
            .collect();
        let ctx = EvaluationContext::new();
        let result = table
            .apply(&[Term::integer(1), Term::Literal(Literal::float(0.5))], &ctx)
            .unwrap();
        assert_eq!(result, Term::Literal(Literal::double(1.5)));
    }
}
