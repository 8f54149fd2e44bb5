//! Token classification against a [`Registry`].
//!
//! Parsing never fails on user input. Every token that cannot be reconciled
//! with the declared vocabulary is recorded as a [`ParseError`] and the scan
//! moves on, except a keyword with no value at end of input, which stops it.

use crate::registry::{ArgKind, Registry};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, trace};

/// A problem with the user's arguments, collected during parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseError {
    #[error("unrecognized argument: \"{token}\"")]
    UnrecognizedArg { token: String },

    #[error("no corresponding value for keyword argument \"{key}\"")]
    NoValueForKey { key: String },

    #[error("{}", redefinition_message(ArgKind::Keyword, .key, .count))]
    RedefinitionOfKey { key: String, count: u32 },

    #[error("{}", redefinition_message(ArgKind::Unary, .name, .count))]
    RedefinitionOfUnaryArg { name: String, count: u32 },
}

fn redefinition_message(kind: ArgKind, name: &str, count: &u32) -> String {
    if *count <= 2 {
        format!("{kind} argument \"{name}\" has been redefined")
    } else {
        format!("{kind} argument \"{name}\" has been defined {count} times")
    }
}

impl ParseError {
    /// Occurrence count for redefinition errors.
    pub fn count(&self) -> Option<u32> {
        match self {
            ParseError::RedefinitionOfKey { count, .. }
            | ParseError::RedefinitionOfUnaryArg { count, .. } => Some(*count),
            _ => None,
        }
    }

    fn bump(&mut self) {
        if let ParseError::RedefinitionOfKey { count, .. }
        | ParseError::RedefinitionOfUnaryArg { count, .. } = self
        {
            *count += 1;
        }
    }
}

/// Lookup of a name that was never declared.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("no such unary argument: \"{0}\"")]
    NoSuchUnary(String),

    #[error("no such keyword argument: \"{0}\"")]
    NoSuchKeyword(String),
}

/// What one parse observed for a single declared argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgState {
    pub kind: ArgKind,
    pub name: String,
    pub defined: bool,
    /// Last value assigned; always `None` for unary arguments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// The result of parsing one argument vector.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ParseOutcome {
    exec_name: Option<String>,
    args: Vec<ArgState>,
    errors: Vec<ParseError>,
}

impl ParseOutcome {
    /// The first raw token, if any were given.
    pub fn exec_name(&self) -> Option<&str> {
        self.exec_name.as_deref()
    }

    /// Errors in the order they were first encountered.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Per-argument state in registration order.
    pub fn args(&self) -> &[ArgState] {
        &self.args
    }

    pub fn has_unary(&self, name: &str) -> bool {
        self.state(ArgKind::Unary, name).is_some()
    }

    pub fn has_keyword(&self, name: &str) -> bool {
        self.state(ArgKind::Keyword, name).is_some()
    }

    /// Whether the unary argument `name` appeared. Abbreviations are not
    /// accepted here.
    pub fn unary_defined(&self, name: &str) -> Result<bool, QueryError> {
        self.state(ArgKind::Unary, name)
            .map(|s| s.defined)
            .ok_or_else(|| QueryError::NoSuchUnary(name.to_string()))
    }

    pub fn keyword_defined(&self, name: &str) -> Result<bool, QueryError> {
        self.state(ArgKind::Keyword, name)
            .map(|s| s.defined)
            .ok_or_else(|| QueryError::NoSuchKeyword(name.to_string()))
    }

    /// The last value given for keyword `name`, or `None` if it never appeared.
    pub fn keyword_value(&self, name: &str) -> Result<Option<&str>, QueryError> {
        self.state(ArgKind::Keyword, name)
            .map(|s| s.value.as_deref())
            .ok_or_else(|| QueryError::NoSuchKeyword(name.to_string()))
    }

    fn state(&self, kind: ArgKind, name: &str) -> Option<&ArgState> {
        self.args.iter().find(|s| s.kind == kind && s.name == name)
    }
}

/// Parse `args` against `registry`. `args[0]` is the executable name.
pub fn parse_args<S: AsRef<str>>(registry: &Registry, args: &[S]) -> ParseOutcome {
    Parser::new(registry).parse(args)
}

impl Registry {
    /// Parse an argument vector. See [`parse_args`].
    pub fn parse<S: AsRef<str>>(&self, args: &[S]) -> ParseOutcome {
        parse_args(self, args)
    }
}

/// Internal parser state.
struct Parser<'a> {
    registry: &'a Registry,
    outcome: ParseOutcome,
    /// Spec index -> position of its redefinition error in `outcome.errors`.
    redefinitions: HashMap<usize, usize>,
}

impl<'a> Parser<'a> {
    fn new(registry: &'a Registry) -> Self {
        let args = registry
            .specs()
            .iter()
            .map(|spec| ArgState {
                kind: spec.kind(),
                name: spec.name().to_string(),
                defined: false,
                value: None,
            })
            .collect();

        Self {
            registry,
            outcome: ParseOutcome {
                exec_name: None,
                args,
                errors: Vec::new(),
            },
            redefinitions: HashMap::new(),
        }
    }

    fn parse<S: AsRef<str>>(mut self, args: &[S]) -> ParseOutcome {
        let Some((exec_name, rest)) = args.split_first() else {
            return self.outcome;
        };
        self.outcome.exec_name = Some(AsRef::<str>::as_ref(exec_name).to_string());

        let mut tokens = rest.iter().map(|s| AsRef::<str>::as_ref(s));

        while let Some(token) = tokens.next() {
            // A token carrying a separator is only ever an inline keyword.
            if let Some((pos, separator)) = self.registry.find_separator(token) {
                let key = &token[..pos];
                let value = &token[pos + separator.len_utf8()..];
                match self.registry.find(ArgKind::Keyword, key) {
                    Some(index) => {
                        trace!(token, key, value, "inline keyword");
                        self.define_keyword(index, value);
                    }
                    None => self.unrecognized(token),
                }
                continue;
            }

            if let Some(index) = self.registry.find(ArgKind::Unary, token) {
                trace!(token, "unary");
                self.define_unary(index);
                continue;
            }

            if let Some(index) = self.registry.find(ArgKind::Keyword, token) {
                match tokens.next() {
                    Some(value) => {
                        trace!(token, value, "keyword pair");
                        self.define_keyword(index, value);
                    }
                    None => {
                        debug!(token, "keyword at end of input has no value, stopping");
                        self.outcome.errors.push(ParseError::NoValueForKey {
                            key: token.to_string(),
                        });
                        break;
                    }
                }
                continue;
            }

            self.unrecognized(token);
        }

        self.outcome
    }

    fn define_unary(&mut self, index: usize) {
        if self.outcome.args[index].defined {
            self.redefined(index);
        } else {
            self.outcome.args[index].defined = true;
        }
    }

    fn define_keyword(&mut self, index: usize, value: &str) {
        if self.outcome.args[index].defined {
            self.redefined(index);
        } else {
            self.outcome.args[index].defined = true;
        }
        // Last write wins, redefinition or not.
        self.outcome.args[index].value = Some(value.to_string());
    }

    fn redefined(&mut self, index: usize) {
        if !self.registry.redefinition_is_error() {
            return;
        }

        // One record per argument; later repeats bump it in place.
        if let Some(&at) = self.redefinitions.get(&index) {
            self.outcome.errors[at].bump();
            return;
        }

        let state = &self.outcome.args[index];
        let error = match state.kind {
            ArgKind::Unary => ParseError::RedefinitionOfUnaryArg {
                name: state.name.clone(),
                count: 2,
            },
            ArgKind::Keyword => ParseError::RedefinitionOfKey {
                key: state.name.clone(),
                count: 2,
            },
        };
        self.redefinitions.insert(index, self.outcome.errors.len());
        self.outcome.errors.push(error);
    }

    fn unrecognized(&mut self, token: &str) {
        trace!(token, "unrecognized");
        self.outcome.errors.push(ParseError::UnrecognizedArg {
            token: token.to_string(),
        });
    }
}
