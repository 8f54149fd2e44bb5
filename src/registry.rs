//! The declared argument vocabulary and its registration-time invariants.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Separator characters used when a registry is created.
pub const DEFAULT_SEPARATORS: &[char] = &['='];

/// The two kinds of argument a registry can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgKind {
    /// A flag with no value (e.g., --verbose)
    Unary,
    /// An option taking exactly one value (e.g., --out file.txt or --out=file.txt)
    Keyword,
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgKind::Unary => f.write_str("unary"),
            ArgKind::Keyword => f.write_str("keyword"),
        }
    }
}

/// Which label of a spec a collision was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Name,
    Abbreviation,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Name => f.write_str("name"),
            Label::Abbreviation => f.write_str("abbreviation"),
        }
    }
}

/// Errors raised while declaring the vocabulary.
///
/// These are programming mistakes in the defining code, never user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("{kind} argument name must not be empty")]
    EmptyName { kind: ArgKind },

    #[error("abbreviation of {kind} argument \"{name}\" must not be empty")]
    EmptyAbbreviation { kind: ArgKind, name: String },

    #[error("{kind} argument \"{name}\" uses its own name as its abbreviation")]
    AbbreviationIsName { kind: ArgKind, name: String },

    #[error("duplicate {kind} argument: \"{name}\"")]
    Duplicate { kind: ArgKind, name: String },

    #[error(
        "{kind} argument \"{name}\" matches the {existing_label} of {existing_kind} argument \"{existing_name}\""
    )]
    NameCollision {
        kind: ArgKind,
        name: String,
        existing_label: Label,
        existing_kind: ArgKind,
        existing_name: String,
    },

    #[error(
        "abbreviation \"{abbreviation}\" of {kind} argument \"{name}\" matches the {existing_label} of {existing_kind} argument \"{existing_name}\""
    )]
    AbbreviationCollision {
        kind: ArgKind,
        name: String,
        abbreviation: String,
        existing_label: Label,
        existing_kind: ArgKind,
        existing_name: String,
    },

    #[error("{kind} argument \"{name}\" contains the separator character '{separator}'")]
    NameContainsSeparator {
        kind: ArgKind,
        name: String,
        separator: char,
    },

    #[error(
        "abbreviation \"{abbreviation}\" of {kind} argument \"{name}\" contains the separator character '{separator}'"
    )]
    AbbreviationContainsSeparator {
        kind: ArgKind,
        name: String,
        abbreviation: String,
        separator: char,
    },

    #[error("separator characters cannot include '{separator}' which is in {kind} argument \"{name}\"")]
    SeparatorInName {
        separator: char,
        kind: ArgKind,
        name: String,
    },

    #[error(
        "separator characters cannot include '{separator}' which is in the abbreviation (\"{abbreviation}\") of {kind} argument \"{name}\""
    )]
    SeparatorInAbbreviation {
        separator: char,
        kind: ArgKind,
        name: String,
        abbreviation: String,
    },
}

/// A declared argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ArgSpec {
    /// A flag whose only state is presence.
    Unary {
        name: String,
        abbreviation: Option<String>,
    },
    /// An option that takes exactly one value.
    Keyword {
        name: String,
        abbreviation: Option<String>,
    },
}

impl ArgSpec {
    /// Build a spec of the given kind.
    pub fn new(kind: ArgKind, name: impl Into<String>, abbreviation: Option<String>) -> Self {
        let name = name.into();
        match kind {
            ArgKind::Unary => ArgSpec::Unary { name, abbreviation },
            ArgKind::Keyword => ArgSpec::Keyword { name, abbreviation },
        }
    }

    pub fn kind(&self) -> ArgKind {
        match self {
            ArgSpec::Unary { .. } => ArgKind::Unary,
            ArgSpec::Keyword { .. } => ArgKind::Keyword,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ArgSpec::Unary { name, .. } | ArgSpec::Keyword { name, .. } => name,
        }
    }

    pub fn abbreviation(&self) -> Option<&str> {
        match self {
            ArgSpec::Unary { abbreviation, .. } | ArgSpec::Keyword { abbreviation, .. } => {
                abbreviation.as_deref()
            }
        }
    }

    /// Whether a token is this spec's name or abbreviation.
    pub fn matches(&self, token: &str) -> bool {
        self.name() == token || self.abbreviation() == Some(token)
    }

    /// The labels this spec answers to, name first.
    fn labels(&self) -> impl Iterator<Item = (Label, &str)> {
        std::iter::once((Label::Name, self.name()))
            .chain(self.abbreviation().map(|abbr| (Label::Abbreviation, abbr)))
    }
}

/// The set of declared arguments plus the settings that shape parsing.
///
/// A registry is only mutated while declaring. Parsing borrows it
/// immutably, so one registry can serve concurrent parses.
#[derive(Debug, Clone)]
pub struct Registry {
    specs: Vec<ArgSpec>,
    separators: Vec<char>,
    redefinition_is_error: bool,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create an empty registry with `=` as the only separator and
    /// redefinition reporting turned on.
    pub fn new() -> Self {
        Self {
            specs: Vec::new(),
            separators: DEFAULT_SEPARATORS.to_vec(),
            redefinition_is_error: true,
        }
    }

    /// Declare a unary argument.
    pub fn register_unary(
        &mut self,
        name: &str,
        abbreviation: Option<&str>,
    ) -> Result<(), RegistryError> {
        self.register(ArgSpec::new(
            ArgKind::Unary,
            name,
            abbreviation.map(str::to_string),
        ))
    }

    /// Declare a keyword argument.
    pub fn register_keyword(
        &mut self,
        name: &str,
        abbreviation: Option<&str>,
    ) -> Result<(), RegistryError> {
        self.register(ArgSpec::new(
            ArgKind::Keyword,
            name,
            abbreviation.map(str::to_string),
        ))
    }

    /// Declare an argument, rejecting it if any of its labels collide with
    /// an existing spec or contain a separator character.
    pub fn register(&mut self, spec: ArgSpec) -> Result<(), RegistryError> {
        self.validate_spec(&spec)?;
        debug!(
            kind = %spec.kind(),
            name = spec.name(),
            abbreviation = spec.abbreviation(),
            "registered argument"
        );
        self.specs.push(spec);
        Ok(())
    }

    fn validate_spec(&self, spec: &ArgSpec) -> Result<(), RegistryError> {
        let kind = spec.kind();
        let name = spec.name();

        if name.is_empty() {
            return Err(RegistryError::EmptyName { kind });
        }
        if let Some(abbr) = spec.abbreviation() {
            if abbr.is_empty() {
                return Err(RegistryError::EmptyAbbreviation {
                    kind,
                    name: name.to_string(),
                });
            }
            if abbr == name {
                return Err(RegistryError::AbbreviationIsName {
                    kind,
                    name: name.to_string(),
                });
            }
        }

        // Every label of the new spec against every label of every existing spec.
        for existing in &self.specs {
            for (existing_label, existing_value) in existing.labels() {
                if name == existing_value {
                    if existing_label == Label::Name && existing.kind() == kind {
                        return Err(RegistryError::Duplicate {
                            kind,
                            name: name.to_string(),
                        });
                    }
                    return Err(RegistryError::NameCollision {
                        kind,
                        name: name.to_string(),
                        existing_label,
                        existing_kind: existing.kind(),
                        existing_name: existing.name().to_string(),
                    });
                }
                if let Some(abbr) = spec.abbreviation() {
                    if abbr == existing_value {
                        return Err(RegistryError::AbbreviationCollision {
                            kind,
                            name: name.to_string(),
                            abbreviation: abbr.to_string(),
                            existing_label,
                            existing_kind: existing.kind(),
                            existing_name: existing.name().to_string(),
                        });
                    }
                }
            }
        }

        for &separator in &self.separators {
            if name.contains(separator) {
                return Err(RegistryError::NameContainsSeparator {
                    kind,
                    name: name.to_string(),
                    separator,
                });
            }
            if let Some(abbr) = spec.abbreviation() {
                if abbr.contains(separator) {
                    return Err(RegistryError::AbbreviationContainsSeparator {
                        kind,
                        name: name.to_string(),
                        abbreviation: abbr.to_string(),
                        separator,
                    });
                }
            }
        }

        Ok(())
    }

    /// Replace the separator set.
    ///
    /// Repeated characters are collapsed, keeping first-occurrence order.
    /// Fails without touching the current set if any declared name or
    /// abbreviation contains one of the new characters.
    pub fn set_separators<I>(&mut self, separators: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = char>,
    {
        let mut next: Vec<char> = Vec::new();
        for c in separators {
            if !next.contains(&c) {
                next.push(c);
            }
        }

        for &separator in &next {
            for spec in &self.specs {
                if spec.name().contains(separator) {
                    return Err(RegistryError::SeparatorInName {
                        separator,
                        kind: spec.kind(),
                        name: spec.name().to_string(),
                    });
                }
                if let Some(abbr) = spec.abbreviation() {
                    if abbr.contains(separator) {
                        return Err(RegistryError::SeparatorInAbbreviation {
                            separator,
                            kind: spec.kind(),
                            name: spec.name().to_string(),
                            abbreviation: abbr.to_string(),
                        });
                    }
                }
            }
        }

        debug!(separators = ?next, "separator set replaced");
        self.separators = next;
        Ok(())
    }

    /// The active separator characters, in configured order.
    pub fn separators(&self) -> &[char] {
        &self.separators
    }

    /// Whether repeating an argument is reported as an error.
    pub fn redefinition_is_error(&self) -> bool {
        self.redefinition_is_error
    }

    /// Turn redefinition reporting on or off. When off, repeats
    /// silently overwrite.
    pub fn set_redefinition_is_error(&mut self, redefinition_is_error: bool) {
        self.redefinition_is_error = redefinition_is_error;
    }

    /// All declared specs in registration order.
    pub fn specs(&self) -> &[ArgSpec] {
        &self.specs
    }

    pub fn has_unary(&self, name: &str) -> bool {
        self.has(ArgKind::Unary, name)
    }

    pub fn has_keyword(&self, name: &str) -> bool {
        self.has(ArgKind::Keyword, name)
    }

    fn has(&self, kind: ArgKind, name: &str) -> bool {
        self.specs
            .iter()
            .any(|s| s.kind() == kind && s.name() == name)
    }

    /// Index of the spec of `kind` whose name or abbreviation is `token`.
    pub(crate) fn find(&self, kind: ArgKind, token: &str) -> Option<usize> {
        self.specs
            .iter()
            .position(|s| s.kind() == kind && s.matches(token))
    }

    /// Locate the inline separator in a token.
    ///
    /// Separators are tried in configured order; the first one present in
    /// the token wins, at its first occurrence. Returns the byte offset and
    /// the separator.
    pub(crate) fn find_separator(&self, token: &str) -> Option<(usize, char)> {
        self.separators
            .iter()
            .find_map(|&c| token.find(c).map(|pos| (pos, c)))
    }
}
