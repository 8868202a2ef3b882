//! RDF term and value model
//!
//! This crate defines the values a SPARQL expression evaluates to:
//! - Raw RDF terms as handed over by the query pipeline ([`RdfTerm`])
//! - Typed terms ([`Term`]) with their literal value spaces ([`LiteralValue`])
//! - Numeric, date/time and duration records with XSD canonical formatting
//! - The datatype hierarchy used for subtype substitution ([`TypeHierarchy`])
//! - The transformer that validates lexical forms ([`TermTransformer`])

pub mod error;
pub mod hierarchy;
pub mod literal;
pub mod numeric;
pub mod rdf;
pub mod temporal;
pub mod term;
pub mod transform;
pub mod vocab;

pub use error::TermError;
pub use hierarchy::{PrimitiveType, TypeHierarchy, XsdTypeHierarchy};
pub use literal::{Literal, LiteralValue, NonLexicalCategory};
pub use numeric::{Numeric, NumericKind, format_double, format_float};
pub use rdf::{GraphName, RdfLiteral, RdfQuad, RdfTerm};
pub use temporal::{DateTimeValue, DateValue, DurationValue, TimeValue, TimezoneOffset};
pub use term::{BlankNode, NamedNode, Quad, Term, TermType};
pub use transform::TermTransformer;
