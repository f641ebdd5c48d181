//! Parser Types
//!
//! Shared types used across the tokenizer: the parsed `Command` record and
//! the parse-time exception.

use std::fmt;
use thiserror::Error;

/// A single parameter of a `Command`. Named parameters carry `Some(key)`;
/// positional parameters carry `None`. Order and duplicates are preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub key: Option<String>,
    pub value: String,
}

impl Parameter {
    pub fn named(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: Some(key.into()), value: value.into() }
    }

    pub fn positional(value: impl Into<String>) -> Self {
        Self { key: None, value: value.into() }
    }
}

/// One parsed line of a macro. `kind` is `"UNKNOWN"` only by convention of
/// the parser never failing on an unrecognised command; the executor is the
/// layer that decides whether unknown kinds are fatal.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub kind: String,
    pub parameters: Vec<Parameter>,
    pub raw: String,
    pub line_number: usize,
    pub referenced_variables: Vec<String>,
}

impl Command {
    /// Case-insensitive lookup returning the first matching occurrence,
    /// per the data-model invariant that parameter lookup is case-insensitive
    /// and first-match.
    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|p| p.key.as_deref().is_some_and(|k| k.eq_ignore_ascii_case(key)))
            .map(|p| p.value.as_str())
    }

    /// All positional (unkeyed) parameters, in source order.
    pub fn positional_params(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().filter(|p| p.key.is_none()).map(|p| p.value.as_str())
    }
}

/// Raised only for malformed syntax (an unterminated quoted string); unknown
/// command kinds are not parse errors, per the tokenizer contract.
#[derive(Debug, Error, Clone, PartialEq)]
pub struct ParseException {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for ParseException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error at {}:{}: {}", self.line, self.column, self.message)
    }
}

impl ParseException {
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self { message: message.into(), line, column }
    }
}

/// A named parameter key must look like `[A-Z_][A-Z0-9_]*` (case-insensitive
/// at the source level; canonicalised to upper-case on storage).
pub fn is_valid_key(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
