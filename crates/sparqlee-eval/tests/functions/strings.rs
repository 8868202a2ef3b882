//! String Function Tests
//!
//! Tests for: STRLEN, SUBSTR, UCASE, LCASE, STRSTARTS, STRENDS, CONTAINS,
//! STRBEFORE, STRAFTER, ENCODE_FOR_URI, LANGMATCHES, REGEX, REPLACE

use pretty_assertions::assert_eq;
use rstest::rstest;
use sparqlee_ast::RegularOperator;
use sparqlee_eval::EvalError;
use sparqlee_types::Term;
use sparqlee_types::vocab::xsd;

use super::{eval_op, typed};

// ============================================================================
// Length And Substrings
// ============================================================================

#[tokio::test]
async fn test_strlen_counts_characters() {
    let result = eval_op(RegularOperator::StrLen, vec![Term::lang_string("chat\u{e9}", "fr")])
        .await
        .unwrap();
    assert_eq!(result, Term::integer(5));
}

#[rstest]
#[case(vec![Term::string("motorcar"), Term::integer(6)], Term::string("car"))]
#[case(vec![Term::string("metadata"), Term::integer(4), Term::integer(3)], Term::string("ada"))]
#[case(vec![Term::lang_string("foobar", "en"), Term::integer(4)], Term::lang_string("bar", "en"))]
#[tokio::test]
async fn test_substr(#[case] args: Vec<Term>, #[case] expected: Term) {
    assert_eq!(eval_op(RegularOperator::SubStr, args).await.unwrap(), expected);
}

#[tokio::test]
async fn test_substr_accepts_derived_integer_positions() {
    let args = vec![Term::string("abcdef"), typed("2", xsd::SHORT), typed("2", xsd::UNSIGNED_BYTE)];
    assert_eq!(eval_op(RegularOperator::SubStr, args).await.unwrap(), Term::string("bc"));
}

#[tokio::test]
async fn test_case_mapping_keeps_language_tag() {
    let result = eval_op(RegularOperator::UCase, vec![Term::lang_string("foo", "en")]).await.unwrap();
    assert_eq!(result, Term::lang_string("FOO", "en"));
    let result = eval_op(RegularOperator::LCase, vec![Term::string("BAR")]).await.unwrap();
    assert_eq!(result, Term::string("bar"));
}

// ============================================================================
// Argument Compatibility
// ============================================================================

#[rstest]
#[case(Term::string("foobar"), Term::string("foo"), true)]
#[case(Term::lang_string("foobar", "en"), Term::string("foo"), true)]
#[case(Term::lang_string("foobar", "en"), Term::lang_string("foo", "en"), true)]
#[case(Term::string("foobar"), Term::string("bar"), false)]
#[tokio::test]
async fn test_strstarts_compatible_arguments(#[case] source: Term, #[case] prefix: Term, #[case] expected: bool) {
    let result = eval_op(RegularOperator::StrStarts, vec![source, prefix]).await.unwrap();
    assert_eq!(result, Term::boolean(expected));
}

#[tokio::test]
async fn test_mismatched_language_tags_fail() {
    let error = eval_op(
        RegularOperator::Contains,
        vec![Term::lang_string("abc", "en"), Term::lang_string("b", "fr")],
    )
    .await
    .unwrap_err();
    assert!(matches!(error, EvalError::LanguageTagMismatch { .. }));
}

#[tokio::test]
async fn test_plain_source_with_tagged_needle_fails() {
    let error = eval_op(RegularOperator::StrEnds, vec![Term::string("abc"), Term::lang_string("c", "en")])
        .await
        .unwrap_err();
    assert!(matches!(error, EvalError::ArgumentType { .. }));
}

#[tokio::test]
async fn test_strbefore_and_strafter() {
    let source = Term::lang_string("abc", "en");
    let before = eval_op(RegularOperator::StrBefore, vec![source.clone(), Term::string("b")]).await.unwrap();
    assert_eq!(before, Term::lang_string("a", "en"));
    let after = eval_op(RegularOperator::StrAfter, vec![source.clone(), Term::string("b")]).await.unwrap();
    assert_eq!(after, Term::lang_string("c", "en"));
    // no match yields a plain empty string
    let missing = eval_op(RegularOperator::StrAfter, vec![source, Term::string("z")]).await.unwrap();
    assert_eq!(missing, Term::string(""));
}

#[tokio::test]
async fn test_encode_for_uri() {
    let result = eval_op(RegularOperator::EncodeForUri, vec![Term::string("Los Angeles")]).await.unwrap();
    assert_eq!(result, Term::string("Los%20Angeles"));
}

#[rstest]
#[case("de-DE", "de", true)]
#[case("de", "de-DE", false)]
#[case("en", "*", true)]
#[case("", "*", false)]
#[tokio::test]
async fn test_langmatches(#[case] tag: &str, #[case] range: &str, #[case] expected: bool) {
    let result = eval_op(RegularOperator::LangMatches, vec![Term::string(tag), Term::string(range)])
        .await
        .unwrap();
    assert_eq!(result, Term::boolean(expected));
}

// ============================================================================
// Regular Expressions
// ============================================================================

#[rstest]
#[case(vec![Term::string("Alice"), Term::string("^ali")], false)]
#[case(vec![Term::string("Alice"), Term::string("^ali"), Term::string("i")], true)]
#[case(vec![Term::string("a.c"), Term::string("."), Term::string("q")], true)]
#[case(vec![Term::string("abc"), Term::string("a.c"), Term::string("q")], false)]
#[tokio::test]
async fn test_regex_flags(#[case] args: Vec<Term>, #[case] expected: bool) {
    assert_eq!(eval_op(RegularOperator::Regex, args).await.unwrap(), Term::boolean(expected));
}

#[tokio::test]
async fn test_regex_rejects_unknown_flag() {
    let args = vec![Term::string("abc"), Term::string("b"), Term::string("z")];
    let error = eval_op(RegularOperator::Regex, args).await.unwrap_err();
    assert!(matches!(error, EvalError::InvalidRegex { .. }));
}

#[tokio::test]
async fn test_replace_with_group_references() {
    let args = vec![Term::string("abcd"), Term::string("(b)(c)"), Term::string("$2$1")];
    assert_eq!(eval_op(RegularOperator::Replace, args).await.unwrap(), Term::string("acbd"));
}
