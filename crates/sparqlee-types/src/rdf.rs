//! Raw RDF data model
//!
//! These are the terms handed over by the query pipeline (bindings, quads
//! read from sources). They carry lexical forms only; [`crate::TermTransformer`]
//! lifts them into typed [`crate::Term`] values.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::vocab::{rdf, xsd};

/// A raw RDF term
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "termType", content = "value")]
pub enum RdfTerm {
    NamedNode(String),
    BlankNode(String),
    Literal(RdfLiteral),
    /// A quoted triple (RDF-star)
    Quad(Box<RdfQuad>),
}

/// A raw RDF literal
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RdfLiteral {
    pub value: String,
    pub datatype: String,
    pub language: Option<String>,
}

/// Graph component of a quad
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GraphName {
    #[default]
    DefaultGraph,
    NamedNode(String),
    BlankNode(String),
}

/// A raw RDF quad
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RdfQuad {
    pub subject: RdfTerm,
    pub predicate: RdfTerm,
    pub object: RdfTerm,
    pub graph: GraphName,
}

impl RdfTerm {
    pub fn named_node(iri: impl Into<String>) -> Self {
        Self::NamedNode(iri.into())
    }

    pub fn blank_node(id: impl Into<String>) -> Self {
        Self::BlankNode(id.into())
    }

    /// A typed literal
    pub fn literal(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self::Literal(RdfLiteral {
            value: value.into(),
            datatype: datatype.into(),
            language: None,
        })
    }

    /// A plain `xsd:string` literal
    pub fn simple_literal(value: impl Into<String>) -> Self {
        Self::literal(value, xsd::STRING)
    }

    /// A language-tagged literal
    pub fn lang_literal(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self::Literal(RdfLiteral {
            value: value.into(),
            datatype: rdf::LANG_STRING.to_string(),
            language: Some(language.into()),
        })
    }

    pub fn quad(subject: RdfTerm, predicate: RdfTerm, object: RdfTerm, graph: GraphName) -> Self {
        Self::Quad(Box::new(RdfQuad {
            subject,
            predicate,
            object,
            graph,
        }))
    }
}

impl fmt::Display for RdfTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NamedNode(iri) => write!(f, "<{iri}>"),
            Self::BlankNode(id) => write!(f, "_:{id}"),
            Self::Literal(literal) => write!(f, "{literal}"),
            Self::Quad(quad) => write!(f, "<< {} {} {} >>", quad.subject, quad.predicate, quad.object),
        }
    }
}

impl fmt::Display for RdfLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.value.replace('\\', "\\\\").replace('"', "\\\""))?;
        match &self.language {
            Some(language) => write!(f, "@{language}"),
            None if self.datatype == xsd::STRING => Ok(()),
            None => write!(f, "^^<{}>", self.datatype),
        }
    }
}

impl fmt::Display for GraphName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DefaultGraph => write!(f, "DEFAULT"),
            Self::NamedNode(iri) => write!(f, "<{iri}>"),
            Self::BlankNode(id) => write!(f, "_:{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_display() {
        assert_eq!(RdfTerm::simple_literal("a\"b").to_string(), "\"a\\\"b\"");
        assert_eq!(RdfTerm::lang_literal("chat", "fr").to_string(), "\"chat\"@fr");
        assert_eq!(
            RdfTerm::literal("1", xsd::INTEGER).to_string(),
            "\"1\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
    }

    #[test]
    fn test_quad_display() {
        let quad = RdfTerm::quad(
            RdfTerm::named_node("http://ex.org/s"),
            RdfTerm::named_node("http://ex.org/p"),
            RdfTerm::blank_node("o"),
            GraphName::DefaultGraph,
        );
        assert_eq!(quad.to_string(), "<< <http://ex.org/s> <http://ex.org/p> _:o >>");
    }
}
