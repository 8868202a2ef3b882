//! Logical Operators
//!
//! Implements: `!` (NOT). `||` and `&&` are special forms.

use crate::builder::OverloadBuilder;
use crate::overload::OverloadTable;
use sparqlee_types::Term;

/// `!x`: negated effective boolean value
pub fn not() -> OverloadTable {
    OverloadBuilder::new("!")
        .on_term1(|term| Ok(Term::boolean(!term.coerce_ebv()?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::EvaluationContext;
    use crate::error::EvalError;

    #[test]
    fn test_not() {
        let ctx = EvaluationContext::new();
        let table = not();
        assert_eq!(table.apply(&[Term::boolean(true)], &ctx).unwrap(), Term::boolean(false));
        assert_eq!(table.apply(&[Term::string("")], &ctx).unwrap(), Term::boolean(true));
        assert_eq!(table.apply(&[Term::integer(0)], &ctx).unwrap(), Term::boolean(true));
    }

    #[test]
    fn test_not_on_iri_fails() {
        let ctx = EvaluationContext::new();
        let error = not().apply(&[Term::named_node("http://ex.org/")], &ctx).unwrap_err();
        assert!(matches!(error, EvalError::EbvCoercion { .. }));
    }
}
