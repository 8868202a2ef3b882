//! String Functions
//!
//! Implements: STRLEN, SUBSTR, UCASE, LCASE, STRSTARTS, STRENDS, CONTAINS,
//! STRBEFORE, STRAFTER, ENCODE_FOR_URI, LANGMATCHES, REGEX, REPLACE
//!
//! Lengths and positions count Unicode characters. Two-string functions take
//! a plain or language-tagged first argument and a second argument that is
//! either plain or tagged with the same language.

use crate::builder::OverloadBuilder;
use crate::context::EvaluationContext;
use crate::error::{EvalError, EvalResult};
use crate::operators::{integer_arg, string_arg, string_like, string_literal_arg};
use crate::overload::{ArgumentType, OverloadTable};
use regex::{Regex, RegexBuilder};
use sparqlee_types::{Literal, Term};
use std::borrow::Cow;
use std::fmt::Write;
use std::sync::Arc;

const STRING: ArgumentType = ArgumentType::STRING;
const LANG_STRING: ArgumentType = ArgumentType::LANG_STRING;

const REGEX_SIZE_LIMIT: usize = 1_000_000;

/// Register a two-string function for every compatible pair of string kinds
fn compatible_strings<F>(builder: OverloadBuilder, implementation: F) -> OverloadBuilder
where
    F: Fn(&Literal, &Literal) -> EvalResult<Term> + Send + Sync + 'static,
{
    let implementation = Arc::new(implementation);
    let plain = Arc::clone(&implementation);
    let tagged_plain = Arc::clone(&implementation);
    builder
        .on_binary(STRING, STRING, move |left, right, _| {
            plain(string_literal_arg(left)?, string_literal_arg(right)?)
        })
        .on_binary(LANG_STRING, STRING, move |left, right, _| {
            tagged_plain(string_literal_arg(left)?, string_literal_arg(right)?)
        })
        .on_binary(LANG_STRING, LANG_STRING, move |left, right, _| {
            let (left, right) = (string_literal_arg(left)?, string_literal_arg(right)?);
            let (left_tag, right_tag) = (
                left.language().unwrap_or_default(),
                right.language().unwrap_or_default(),
            );
            if !left_tag.eq_ignore_ascii_case(right_tag) {
                return Err(EvalError::language_tag_mismatch(left_tag, right_tag));
            }
            implementation(left, right)
        })
}

fn value(literal: &Literal) -> &str {
    literal.string_value().unwrap_or_default()
}

fn string_test(name: &'static str, test: fn(&str, &str) -> bool) -> OverloadTable {
    compatible_strings(OverloadBuilder::new(name), move |left, right| {
        Ok(Term::boolean(test(value(left), value(right))))
    })
    .collect()
}

/// A possibly empty substring of `source`; empty results lose the language tag
fn substring_result(source: &Literal, result: &str) -> Term {
    if result.is_empty() {
        Term::string("")
    } else {
        string_like(source, result)
    }
}

pub fn strlen() -> OverloadTable {
    OverloadBuilder::new("strlen")
        .on_stringly1(|literal| {
            let length = i64::try_from(value(literal).chars().count())
                .map_err(|_| EvalError::overflow("strlen"))?;
            Ok(Term::integer(length))
        })
        .collect()
}

/// Characters at 1-based positions `start <= p < start + length`
fn substring(value: &str, start: i64, length: Option<i64>) -> String {
    value
        .chars()
        .zip(1_i64..)
        .filter(|(_, position)| {
            *position >= start && length.is_none_or(|length| *position < start.saturating_add(length))
        })
        .map(|(character, _)| character)
        .collect()
}

pub fn substr() -> OverloadTable {
    OverloadBuilder::new("substr")
        .on_binary(STRING, ArgumentType::INTEGER, |source, start, _| {
            let source = string_literal_arg(source)?;
            Ok(string_like(source, substring(value(source), integer_arg(start)?, None)))
        })
        .copy([STRING, ArgumentType::INTEGER], [LANG_STRING, ArgumentType::INTEGER])
        .on_ternary(STRING, ArgumentType::INTEGER, ArgumentType::INTEGER, |source, start, length, _| {
            let source = string_literal_arg(source)?;
            let result = substring(value(source), integer_arg(start)?, Some(integer_arg(length)?));
            Ok(string_like(source, result))
        })
        .copy(
            [STRING, ArgumentType::INTEGER, ArgumentType::INTEGER],
            [LANG_STRING, ArgumentType::INTEGER, ArgumentType::INTEGER],
        )
        .collect()
}

pub fn ucase() -> OverloadTable {
    OverloadBuilder::new("ucase")
        .on_stringly1(|literal| Ok(string_like(literal, value(literal).to_uppercase())))
        .collect()
}

pub fn lcase() -> OverloadTable {
    OverloadBuilder::new("lcase")
        .on_stringly1(|literal| Ok(string_like(literal, value(literal).to_lowercase())))
        .collect()
}

pub fn strstarts() -> OverloadTable {
    string_test("strstarts", |value, prefix| value.starts_with(prefix))
}

pub fn strends() -> OverloadTable {
    string_test("strends", |value, suffix| value.ends_with(suffix))
}

pub fn contains() -> OverloadTable {
    string_test("contains", |value, needle| value.contains(needle))
}

pub fn strbefore() -> OverloadTable {
    compatible_strings(OverloadBuilder::new("strbefore"), |source, needle| {
        let haystack = value(source);
        let result = haystack.find(value(needle)).map_or("", |index| &haystack[..index]);
        Ok(substring_result(source, result))
    })
    .collect()
}

pub fn strafter() -> OverloadTable {
    compatible_strings(OverloadBuilder::new("strafter"), |source, needle| {
        let (haystack, needle) = (value(source), value(needle));
        let result = haystack
            .find(needle)
            .map_or("", |index| &haystack[index + needle.len()..]);
        Ok(substring_result(source, result))
    })
    .collect()
}

/// Percent-encode everything outside the unreserved URI characters
fn encode_for_uri(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            encoded.push(char::from(byte));
        } else {
            let _ = write!(encoded, "%{byte:02X}");
        }
    }
    encoded
}

pub fn encode_for_uri_table() -> OverloadTable {
    OverloadBuilder::new("encode_for_uri")
        .on_stringly1(|literal| Ok(Term::string(encode_for_uri(value(literal)))))
        .collect()
}

/// Basic language range matching
fn lang_matches(tag: &str, range: &str) -> bool {
    if range == "*" {
        return !tag.is_empty();
    }
    let (tag, range) = (tag.to_ascii_lowercase(), range.to_ascii_lowercase());
    tag == range || tag.strip_prefix(&range).is_some_and(|rest| rest.starts_with('-'))
}

pub fn langmatches() -> OverloadTable {
    OverloadBuilder::new("langmatches")
        .on_binary(STRING, STRING, |tag, range, _| {
            Ok(Term::boolean(lang_matches(string_arg(tag)?, string_arg(range)?)))
        })
        .collect()
}

/// Compile an XPath-style pattern with flags `s`, `m`, `i`, `x` and `q`
pub fn compile_pattern(pattern: &str, flags: Option<&str>) -> EvalResult<Regex> {
    let flags = flags.unwrap_or_default();
    let source = if flags.contains('q') {
        Cow::Owned(regex::escape(pattern))
    } else {
        Cow::Borrowed(pattern)
    };
    let mut builder = RegexBuilder::new(&source);
    for flag in flags.chars() {
        match flag {
            's' => {
                builder.dot_matches_new_line(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            'i' => {
                builder.case_insensitive(true);
            }
            'x' => {
                builder.ignore_whitespace(true);
            }
            'q' => {}
            other => {
                return Err(EvalError::invalid_regex(pattern, format!("unsupported flag '{other}'")));
            }
        }
    }
    builder
        .size_limit(REGEX_SIZE_LIMIT)
        .build()
        .map_err(|error| EvalError::invalid_regex(pattern, error.to_string()))
}

fn regex_test(args: &[Term], _: &EvaluationContext) -> EvalResult<Term> {
    let text = string_arg(&args[0])?;
    let flags = args.get(2).map(string_arg).transpose()?;
    let regex = compile_pattern(string_arg(&args[1])?, flags)?;
    Ok(Term::boolean(regex.is_match(text)))
}

pub fn regex() -> OverloadTable {
    OverloadBuilder::new("regex")
        .set([STRING, STRING], regex_test)
        .set([LANG_STRING, STRING], regex_test)
        .set([STRING, STRING, STRING], regex_test)
        .set([LANG_STRING, STRING, STRING], regex_test)
        .collect()
}

/// XPath replacement strings escape `$` and `\` with a backslash
fn replacement_template(replacement: &str) -> String {
    let mut template = String::with_capacity(replacement.len());
    let mut characters = replacement.chars();
    while let Some(character) = characters.next() {
        match character {
            '\\' => match characters.next() {
                Some('$') => template.push_str("$$"),
                Some(other) => template.push(other),
                None => template.push('\\'),
            },
            '$' => {
                let digits: String = characters.clone().take_while(char::is_ascii_digit).collect();
                if digits.is_empty() {
                    template.push_str("$$");
                } else {
                    for _ in 0..digits.len() {
                        characters.next();
                    }
                    let _ = write!(template, "${{{digits}}}");
                }
            }
            other => template.push(other),
        }
    }
    template
}

fn regex_replace(args: &[Term], _: &EvaluationContext) -> EvalResult<Term> {
    let source = string_literal_arg(&args[0])?;
    let flags = args.get(3).map(string_arg).transpose()?;
    let regex = compile_pattern(string_arg(&args[1])?, flags)?;
    let template = replacement_template(string_arg(&args[2])?);
    let replaced = regex.replace_all(value(source), template.as_str());
    Ok(string_like(source, replaced))
}

pub fn replace() -> OverloadTable {
    OverloadBuilder::new("replace")
        .set([STRING, STRING, STRING], regex_replace)
        .set([LANG_STRING, STRING, STRING], regex_replace)
        .set([STRING, STRING, STRING, STRING], regex_replace)
        .set([LANG_STRING, STRING, STRING, STRING], regex_replace)
        .collect()
}
