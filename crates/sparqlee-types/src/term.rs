//! Evaluated RDF terms

use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;

use crate::error::TermError;
use crate::literal::Literal;
use crate::rdf::{GraphName, RdfQuad, RdfTerm};
use crate::transform::TermTransformer;

/// Kind of an evaluated term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermType {
    NamedNode,
    BlankNode,
    Literal,
    Quad,
}

impl fmt::Display for TermType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NamedNode => write!(f, "namedNode"),
            Self::BlankNode => write!(f, "blankNode"),
            Self::Literal => write!(f, "literal"),
            Self::Quad => write!(f, "quad"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedNode {
    iri: String,
}

impl NamedNode {
    pub fn new(iri: impl Into<String>) -> Self {
        Self { iri: iri.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.iri
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlankNode {
    id: String,
}

impl BlankNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }
}

/// A fully evaluated RDF value
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    NamedNode(NamedNode),
    BlankNode(BlankNode),
    Literal(Literal),
    Quad(Arc<Quad>),
}

impl Term {
    pub fn named_node(iri: impl Into<String>) -> Self {
        Self::NamedNode(NamedNode::new(iri))
    }

    pub fn blank_node(id: impl Into<String>) -> Self {
        Self::BlankNode(BlankNode::new(id))
    }

    pub fn boolean(value: bool) -> Self {
        Self::Literal(Literal::boolean(value))
    }

    pub fn integer(value: i64) -> Self {
        Self::Literal(Literal::integer(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(Literal::string(value))
    }

    pub fn lang_string(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self::Literal(Literal::lang_string(value, language))
    }

    pub fn term_type(&self) -> TermType {
        match self {
            Self::NamedNode(_) => TermType::NamedNode,
            Self::BlankNode(_) => TermType::BlankNode,
            Self::Literal(_) => TermType::Literal,
            Self::Quad(_) => TermType::Quad,
        }
    }

    /// Lexical form; quoted triples have none
    pub fn str(&self) -> Result<String, TermError> {
        match self {
            Self::NamedNode(node) => Ok(node.iri.clone()),
            Self::BlankNode(node) => Ok(node.id.clone()),
            Self::Literal(literal) => Ok(literal.str()),
            Self::Quad(_) => Err(TermError::NoStringValue {
                term_type: TermType::Quad.to_string(),
            }),
        }
    }

    pub fn coerce_ebv(&self) -> Result<bool, TermError> {
        match self {
            Self::Literal(literal) => literal.coerce_ebv(),
            other => Err(TermError::ebv_coercion(other.to_string())),
        }
    }

    pub fn to_rdf(&self) -> RdfTerm {
        match self {
            Self::NamedNode(node) => RdfTerm::NamedNode(node.iri.clone()),
            Self::BlankNode(node) => RdfTerm::BlankNode(node.id.clone()),
            Self::Literal(literal) => RdfTerm::Literal(literal.to_rdf()),
            Self::Quad(quad) => RdfTerm::Quad(Box::new(quad.to_rdf())),
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    pub fn as_named_node(&self) -> Option<&NamedNode> {
        match self {
            Self::NamedNode(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_quad(&self) -> Option<&Quad> {
        match self {
            Self::Quad(quad) => Some(quad),
            _ => None,
        }
    }
}

impl From<Literal> for Term {
    fn from(literal: Literal) -> Self {
        Self::Literal(literal)
    }
}

impl From<NamedNode> for Term {
    fn from(node: NamedNode) -> Self {
        Self::NamedNode(node)
    }
}

impl From<BlankNode> for Term {
    fn from(node: BlankNode) -> Self {
        Self::BlankNode(node)
    }
}

impl From<Quad> for Term {
    fn from(quad: Quad) -> Self {
        Self::Quad(Arc::new(quad))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_rdf())
    }
}

/// A quoted triple / quad term
///
/// Subject, predicate and object are lifted into [`Term`] values on first
/// access through the transformer the quad was created with.
pub struct Quad {
    raw: RdfQuad,
    transformer: TermTransformer,
    subject: OnceCell<Term>,
    predicate: OnceCell<Term>,
    object: OnceCell<Term>,
}

impl Quad {
    pub fn from_rdf(raw: RdfQuad, transformer: TermTransformer) -> Self {
        Self {
            raw,
            transformer,
            subject: OnceCell::new(),
            predicate: OnceCell::new(),
            object: OnceCell::new(),
        }
    }

    /// Build from already evaluated components
    pub fn from_terms(subject: Term, predicate: Term, object: Term, graph: GraphName) -> Self {
        let raw = RdfQuad {
            subject: subject.to_rdf(),
            predicate: predicate.to_rdf(),
            object: object.to_rdf(),
            graph,
        };
        Self {
            raw,
            transformer: TermTransformer::default(),
            subject: OnceCell::with_value(subject),
            predicate: OnceCell::with_value(predicate),
            object: OnceCell::with_value(object),
        }
    }

    pub fn subject(&self) -> &Term {
        self.subject.get_or_init(|| self.transformer.transform(&self.raw.subject))
    }

    pub fn predicate(&self) -> &Term {
        self.predicate.get_or_init(|| self.transformer.transform(&self.raw.predicate))
    }

    pub fn object(&self) -> &Term {
        self.object.get_or_init(|| self.transformer.transform(&self.raw.object))
    }

    pub fn graph(&self) -> &GraphName {
        &self.raw.graph
    }

    pub fn to_rdf(&self) -> RdfQuad {
        self.raw.clone()
    }
}

impl PartialEq for Quad {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl fmt::Debug for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quad")
            .field("subject", &self.raw.subject)
            .field("predicate", &self.raw.predicate)
            .field("object", &self.raw.object)
            .field("graph", &self.raw.graph)
            .finish()
    }
}
