//! Derive command-line parsers from plain record types.
//!
//! A record describes its fields once, as a schema. This crate walks that
//! schema, turns every field into an argument through a fixed set of
//! derivation rules, and registers the result with the embedded token
//! engine from `recarg-argparse`. After a parse the values flow back
//! through the same schema and the record is rebuilt.
//!
//! The rules are deliberately boring: a field named `log_level` answers to
//! `--log-level`, a `bool` becomes a switch, an `Option` reads absence as
//! `None`, a `Vec` needs a declared arity, literal members double as the
//! allowed choices, and a field without a default is required. Anything
//! the rules cannot resolve is a [`ConfigurationError`] at construction,
//! never a surprise at parse time.
//!
//! # Example
//!
//! ```
//! use recarg::Record;
//!
//! /// Serve files over HTTP.
//! #[derive(Debug, Record)]
//! struct Serve {
//!     /// Port to listen on
//!     #[arg(default = 8080)]
//!     port: u16,
//!     /// Bind address
//!     #[arg(args("-b", "--bind"), default = "127.0.0.1")]
//!     bind: String,
//!     /// Log every request
//!     verbose: bool,
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! let serve: Serve = recarg::parse_args(["--port", "9000", "--verbose"])?;
//! assert_eq!(serve.port, 9000);
//! assert_eq!(serve.bind, "127.0.0.1");
//! assert!(serve.verbose);
//! # Ok(())
//! # }
//! ```
//!
//! Hand-written [`Record`] implementations work the same way; the derive
//! only writes the schema and the reconstruction boilerplate.

mod error;
mod mapper;
mod parser;
mod schema;
mod values;

pub use error::{ConfigurationError, ConstructionError, Error};
pub use parser::ArgumentParser;
pub use schema::{DefaultSlot, FieldDescriptor, FieldKind, Group, Record, RecordSchema};
pub use values::{FromValue, ParsedValues, materialize};

pub use recarg_argparse::{Arity, Converter, Matches, ParseError, Value, ValueKind};

/// The embedded token engine, for use without a record schema.
pub use recarg_argparse as argparse;

/// Derives [`Record`] for a struct with named fields.
///
/// Field behavior is tuned with `#[arg(..)]`; the struct-level
/// `#[record(name = "..", about = "..")]` overrides the program identity.
/// Doc comments become help text.
pub use recarg_macros::Record;

/// Build a fresh parser from `R`'s schema and parse strictly.
///
/// User errors print usage and exit the process. Every call rebuilds the
/// parser, so default factories fire per call; hold an
/// [`ArgumentParser`] to reuse one construction instead.
pub fn parse_args<R, I, S>(argv: I) -> Result<R, Error>
where
    R: Record,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ArgumentParser::<R>::new()?.parse_args(argv)
}

/// Like [`parse_args`] but unrecognized arguments are returned alongside
/// the record, in the order they appeared, instead of being an error.
pub fn parse_known_args<R, I, S>(argv: I) -> Result<(R, Vec<String>), Error>
where
    R: Record,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ArgumentParser::<R>::new()?.parse_known_args(argv)
}
