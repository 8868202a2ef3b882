//! Term-level errors

use thiserror::Error;

/// Errors raised by the term model itself
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TermError {
    /// Effective boolean value is undefined for this term
    #[error("Cannot coerce {term} to an effective boolean value")]
    EbvCoercion { term: String },

    /// The term has no string value (e.g. a quoted triple)
    #[error("{term_type} terms have no string value")]
    NoStringValue { term_type: String },

    /// The literal's lexical form is not valid for its datatype
    #[error("Invalid lexical form '{lexical}' for datatype <{datatype}>")]
    InvalidLexicalForm { lexical: String, datatype: String },
}

impl TermError {
    pub fn ebv_coercion(term: impl Into<String>) -> Self {
        Self::EbvCoercion { term: term.into() }
    }

    pub fn invalid_lexical_form(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self::InvalidLexicalForm {
            lexical: lexical.into(),
            datatype: datatype.into(),
        }
    }
}
