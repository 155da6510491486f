//! Typed, declarative argument parsing and help rendering.
//!
//! This crate is intentionally small and dependency-free so it can be
//! embedded wherever a declarative front-end needs a token engine. Callers
//! register [`Arg`] definitions (flags, converters, defaults, choices,
//! arities, help sections) and get back typed [`Value`]s keyed by
//! destination name.
//!
//! The token engine understands `--flag`, `--flag=value`, short flags with
//! clustering (`-vx`) and attached values (`-ovalue`), the `--` separator,
//! and positional arguments filled in declaration order. `-h`/`--help` is
//! answered with rendered help unless an argument claims either spelling.
//!
//! # Example
//!
//! ```
//! use recarg_argparse::{Arg, Converter, Parser, Value, ValueKind};
//!
//! # fn main() -> Result<(), recarg_argparse::ParseError> {
//! let mut parser = Parser::new("serve");
//! parser.about("Serve a directory over HTTP");
//! parser
//!     .arg(
//!         Arg::new("port")
//!             .flag("--port")
//!             .converter(Converter::for_kind(ValueKind::Int).unwrap())
//!             .default(8080),
//!     )
//!     .arg(Arg::new("root").flag("root"));
//!
//! let argv = vec!["--port=9000".to_string(), "site/".to_string()];
//! let matches = parser.try_parse(&argv)?;
//! assert_eq!(matches.get("port"), Some(&Value::Int(9000)));
//! # Ok(()) }
//! ```

mod error;
mod help;
mod parser;
mod value;

pub use error::{ParseError, ParseResult};
pub use parser::{Arg, Arity, GroupId, Matches, Parser, SwitchStyle};
pub use value::{Converter, Value, ValueKind};
