//! Evaluation errors

use sparqlee_types::{LiteralValue, Term, TermError};
use thiserror::Error;

/// Result type for evaluation operations
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors that end the evaluation of one expression for one binding
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    /// No overload accepts the argument types (also covers arity mismatches)
    #[error("Argument types not valid for operator '{function}': {types}")]
    ArgumentType { function: String, types: String },

    /// Effective boolean value undefined for the term
    #[error("Cannot coerce {term} to an effective boolean value")]
    EbvCoercion { term: String },

    /// Binary string function over differently tagged strings
    #[error("Language tags '{left}' and '{right}' are not compatible")]
    LanguageTagMismatch { left: String, right: String },

    /// RDF term equality between incomparable literals
    #[error("Literals {left} and {right} cannot be compared for equality")]
    RdfEqualType { left: String, right: String },

    /// Every alternative of a functional form failed
    #[error("{form} failed with {} error(s): {}", .errors.len(), join_errors(.errors))]
    Aggregate { form: String, errors: Vec<EvalError> },

    /// TIMEZONE/TZ on a value without zone information
    #[error("No timezone available in {value}")]
    TimezoneUnavailable { value: String },

    /// A value-level operation on a literal with an invalid lexical form
    #[error("Invalid lexical form '{lexical}' for datatype <{datatype}>")]
    InvalidLexicalForm { lexical: String, datatype: String },

    /// Division by zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Arithmetic overflow
    #[error("Arithmetic overflow in {operation}")]
    Overflow { operation: String },

    #[error("Unbound variable: ?{name}")]
    UnboundVariable { name: String },

    #[error("Invalid IRI '{iri}': {message}")]
    InvalidIri { iri: String, message: String },

    #[error("Invalid regex pattern '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },

    #[error("Invalid language tag '{tag}'")]
    InvalidLanguageTag { tag: String },

    /// XSD constructor function failure
    #[error("Cannot cast {value} to <{target}>")]
    Cast { value: String, target: String },

    #[error("Unknown named function: <{name}>")]
    UnknownNamedFunction { name: String },

    #[error("Unknown extension function: <{name}>")]
    UnknownExtension { name: String },

    /// EXISTS or aggregate evaluation requested without a hook installed
    #[error("No {kind} hook configured")]
    MissingHook { kind: String },

    /// Failure reported by a user extension function
    #[error("Extension function <{name}> failed: {message}")]
    Extension { name: String, message: String },

    #[error("Invalid configuration: {message}")]
    Configuration { message: String },

    /// Internal error (should not happen)
    #[error("Internal evaluation error: {message}")]
    Internal { message: String },
}

fn join_errors(errors: &[EvalError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Short type description of a term for error messages
pub fn describe(term: &Term) -> String {
    match term {
        Term::Literal(literal) => match &literal.value {
            LiteralValue::NonLexical(_) => format!("nonlexical <{}>", literal.datatype),
            _ => format!("<{}>", literal.datatype),
        },
        other => other.term_type().to_string(),
    }
}

impl EvalError {
    /// Create an argument type error for a call with `args`
    pub fn argument_type(function: impl Into<String>, args: &[Term]) -> Self {
        Self::ArgumentType {
            function: function.into(),
            types: format!("({})", args.iter().map(describe).collect::<Vec<_>>().join(", ")),
        }
    }

    /// Create an arity error
    pub fn arity(function: impl Into<String>, count: usize) -> Self {
        Self::ArgumentType {
            function: function.into(),
            types: format!("{count} argument(s)"),
        }
    }

    pub fn aggregate(form: impl Into<String>, errors: Vec<EvalError>) -> Self {
        Self::Aggregate {
            form: form.into(),
            errors,
        }
    }

    pub fn language_tag_mismatch(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::LanguageTagMismatch {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn rdf_equal_type(left: &Term, right: &Term) -> Self {
        Self::RdfEqualType {
            left: left.to_string(),
            right: right.to_string(),
        }
    }

    pub fn timezone_unavailable(value: impl Into<String>) -> Self {
        Self::TimezoneUnavailable { value: value.into() }
    }

    pub fn overflow(operation: impl Into<String>) -> Self {
        Self::Overflow {
            operation: operation.into(),
        }
    }

    pub fn unbound_variable(name: impl Into<String>) -> Self {
        Self::UnboundVariable { name: name.into() }
    }

    pub fn invalid_iri(iri: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidIri {
            iri: iri.into(),
            message: message.into(),
        }
    }

    pub fn invalid_regex(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRegex {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    pub fn cast(value: &Term, target: impl Into<String>) -> Self {
        Self::Cast {
            value: value.to_string(),
            target: target.into(),
        }
    }

    pub fn missing_hook(kind: impl Into<String>) -> Self {
        Self::MissingHook { kind: kind.into() }
    }

    pub fn extension(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extension {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<TermError> for EvalError {
    fn from(error: TermError) -> Self {
        match error {
            TermError::EbvCoercion { term } => Self::EbvCoercion { term },
            TermError::NoStringValue { term_type } => Self::ArgumentType {
                function: "str".to_string(),
                types: term_type,
            },
            TermError::InvalidLexicalForm { lexical, datatype } => {
                Self::InvalidLexicalForm { lexical, datatype }
            }
        }
    }
}
