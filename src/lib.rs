//! argvet - declare unary and keyword arguments, parse argv, collect errors.
//!
//! A [`Registry`] holds the declared vocabulary and rejects colliding names
//! at registration time. Parsing an argument vector against it yields a
//! [`ParseOutcome`]: per-argument presence and values, plus every
//! [`ParseError`] found along the way.

pub mod config;
pub mod parser;
pub mod registry;
pub mod report;

pub use config::{ArgConfig, Config, ConfigError};
pub use parser::{parse_args, ArgState, ParseError, ParseOutcome, QueryError};
pub use registry::{ArgKind, ArgSpec, Label, Registry, RegistryError, DEFAULT_SEPARATORS};
pub use report::{render_errors, render_json, render_text};
