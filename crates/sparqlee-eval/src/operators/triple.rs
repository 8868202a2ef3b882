//! RDF-star Functions
//!
//! Implements: TRIPLE, SUBJECT, PREDICATE, OBJECT, isTRIPLE

use crate::builder::OverloadBuilder;
use crate::error::{EvalError, EvalResult};
use crate::overload::{ArgumentType, OverloadTable};
use sparqlee_types::{GraphName, Quad, Term};

fn quad_arg(term: &Term) -> EvalResult<&Quad> {
    term.as_quad()
        .ok_or_else(|| EvalError::internal(format!("expected quoted triple, got {term}")))
}

/// Quoted triple from subject, predicate and object
pub fn triple() -> OverloadTable {
    OverloadBuilder::new("triple")
        .on_ternary(ArgumentType::Term, ArgumentType::Term, ArgumentType::Term, |s, p, o, _| {
            let valid_subject = matches!(s, Term::NamedNode(_) | Term::BlankNode(_) | Term::Quad(_));
            if !valid_subject || !matches!(p, Term::NamedNode(_)) {
                return Err(EvalError::argument_type("triple", &[s.clone(), p.clone(), o.clone()]));
            }
            Ok(Term::from(Quad::from_terms(s.clone(), p.clone(), o.clone(), GraphName::DefaultGraph)))
        })
        .collect()
}

pub fn subject() -> OverloadTable {
    OverloadBuilder::new("subject")
        .on_unary(ArgumentType::Quad, |term, _| Ok(quad_arg(term)?.subject().clone()))
        .collect()
}

pub fn predicate() -> OverloadTable {
    OverloadBuilder::new("predicate")
        .on_unary(ArgumentType::Quad, |term, _| Ok(quad_arg(term)?.predicate().clone()))
        .collect()
}

pub fn object() -> OverloadTable {
    OverloadBuilder::new("object")
        .on_unary(ArgumentType::Quad, |term, _| Ok(quad_arg(term)?.object().clone()))
        .collect()
}

pub fn is_triple() -> OverloadTable {
    OverloadBuilder::new("istriple")
        .on_term1(|term| Ok(Term::boolean(matches!(term, Term::Quad(_)))))
        .collect()
}
