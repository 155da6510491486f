use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;

use indexmap::IndexMap;
use recarg_argparse::{GroupId, Parser};
use tracing::debug;

use crate::error::{ConfigurationError, Error};
use crate::mapper::derive_arg_spec;
use crate::schema::{Record, RecordSchema};
use crate::values::materialize;

/// A command-line parser derived from a record type's schema.
///
/// Construction walks the schema once: every field is derived into an
/// argument and registered with the embedded token engine, and default
/// factories fire at that point. Reusing one handle across parses reuses
/// their values; the free functions in the crate root rebuild per call.
pub struct ArgumentParser<R: Record> {
    inner: Parser,
    _record: PhantomData<R>,
}

impl<R: Record> ArgumentParser<R> {
    /// Build a parser from `R`'s schema.
    pub fn new() -> Result<Self, ConfigurationError> {
        Self::from_schema(R::schema())
    }

    /// Build with the program name overridden, keeping everything else
    /// from the schema.
    pub fn with_prog(prog: impl Into<String>) -> Result<Self, ConfigurationError> {
        let mut schema = R::schema();
        schema.name = prog.into();
        Self::from_schema(schema)
    }

    fn from_schema(schema: RecordSchema) -> Result<Self, ConfigurationError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for field in schema.fields() {
            if !seen.insert(field.name()) {
                return Err(ConfigurationError::DuplicateField(field.name().to_string()));
            }
        }

        let mut parser = Parser::new(schema.name.clone());
        if let Some(about) = &schema.about {
            parser.about(about.clone());
        }

        // Fields naming the same group title share one section; untitled
        // groups (including empty titles) get a fresh section every time.
        let mut titled: IndexMap<String, GroupId> = IndexMap::new();
        for field in schema.fields() {
            let spec = derive_arg_spec(field)?;
            match spec.group {
                None => {
                    parser.arg(spec.arg);
                }
                Some(group) => {
                    let title = group.title.as_deref().filter(|title| !title.is_empty());
                    let id = match title {
                        Some(title) => *titled.entry(title.to_string()).or_insert_with(|| {
                            parser.group(Some(title), group.description.as_deref())
                        }),
                        None => parser.group(None, group.description.as_deref()),
                    };
                    parser.arg_in_group(id, spec.arg);
                }
            }
        }

        parser
            .check()
            .map_err(|err| ConfigurationError::Definition(err.message().to_string()))?;
        debug!(prog = %parser.prog(), fields = schema.fields().len(), "derived parser");

        Ok(ArgumentParser {
            inner: parser,
            _record: PhantomData,
        })
    }

    /// Parse strictly and materialize the record.
    ///
    /// User errors print usage to stderr and exit the process with status 2;
    /// a help request prints to stdout and exits 0.
    pub fn parse_args<I, S>(&self, argv: I) -> Result<R, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        let matches = self.inner.parse(&argv);
        Ok(materialize::<R>(matches)?)
    }

    /// Parse, tolerate unrecognized arguments, and return them alongside
    /// the record in the order they appeared.
    pub fn parse_known_args<I, S>(&self, argv: I) -> Result<(R, Vec<String>), Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        let (matches, rest) = self.inner.parse_known(&argv);
        let record = materialize::<R>(matches)?;
        Ok((record, rest))
    }

    /// Like [`parse_args`](Self::parse_args) but reports user errors as
    /// values instead of exiting.
    pub fn try_parse_args<I, S>(&self, argv: I) -> Result<R, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        let matches = self.inner.try_parse(&argv)?;
        Ok(materialize::<R>(matches)?)
    }

    /// Like [`parse_known_args`](Self::parse_known_args) but reports user
    /// errors as values instead of exiting.
    pub fn try_parse_known_args<I, S>(&self, argv: I) -> Result<(R, Vec<String>), Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        let (matches, rest) = self.inner.try_parse_known(&argv)?;
        let record = materialize::<R>(matches)?;
        Ok((record, rest))
    }

    /// The rendered help text, exactly as a help request would print it.
    pub fn format_help(&self) -> String {
        self.inner.format_help()
    }
}

impl<R: Record> Clone for ArgumentParser<R> {
    fn clone(&self) -> Self {
        ArgumentParser {
            inner: self.inner.clone(),
            _record: PhantomData,
        }
    }
}

impl<R: Record> fmt::Debug for ArgumentParser<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentParser")
            .field("prog", &self.inner.prog())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConstructionError;
    use crate::schema::{FieldDescriptor, FieldKind};
    use crate::values::ParsedValues;

    #[derive(Debug, PartialEq)]
    struct Server {
        host: String,
        port: i64,
        verbose: bool,
    }

    impl Record for Server {
        fn schema() -> RecordSchema {
            RecordSchema::new("server")
                .about("Toy server")
                .field(
                    FieldDescriptor::new("host", FieldKind::Str)
                        .default("localhost")
                        .group(("Network", "Socket knobs")),
                )
                .field(
                    FieldDescriptor::new("port", FieldKind::Int)
                        .default(8080)
                        .group("Network"),
                )
                .field(FieldDescriptor::new("verbose", FieldKind::Bool))
        }

        fn from_values(values: &mut ParsedValues) -> Result<Self, ConstructionError> {
            Ok(Server {
                host: values.take("host")?,
                port: values.take("port")?,
                verbose: values.take("verbose")?,
            })
        }
    }

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_and_materializes() {
        let parser = ArgumentParser::<Server>::new().unwrap();
        let server = parser
            .try_parse_args(argv(&["--port", "9000", "--verbose"]))
            .unwrap();
        assert_eq!(
            server,
            Server {
                host: "localhost".to_string(),
                port: 9000,
                verbose: true,
            }
        );
    }

    #[test]
    fn titled_groups_share_one_help_section() {
        let parser = ArgumentParser::<Server>::new().unwrap();
        let help = parser.format_help();
        assert_eq!(help.matches("Network:").count(), 1);
        assert!(help.contains("Socket knobs"));
        let host_at = help.find("--host").unwrap();
        let port_at = help.find("--port").unwrap();
        assert!(host_at < port_at);
    }

    #[test]
    fn with_prog_overrides_the_schema_name() {
        let parser = ArgumentParser::<Server>::with_prog("srv").unwrap();
        assert!(parser.format_help().starts_with("srv - Toy server"));
    }

    #[test]
    fn try_parse_surfaces_user_errors() {
        let parser = ArgumentParser::<Server>::new().unwrap();
        let err = parser
            .try_parse_args(argv(&["--port", "lots"]))
            .unwrap_err();
        match err {
            Error::Parse(parse) => assert!(
                parse.message().contains("invalid value 'lots'"),
                "message: {}",
                parse.message()
            ),
            other => panic!("expected parse error, got: {other:?}"),
        }
    }

    #[test]
    fn known_mode_returns_leftovers_in_order() {
        let parser = ArgumentParser::<Server>::new().unwrap();
        let (server, rest) = parser
            .try_parse_known_args(argv(&["--future", "--port", "81", "extra"]))
            .unwrap();
        assert_eq!(server.port, 81);
        assert_eq!(rest, argv(&["--future", "extra"]));
    }

    #[test]
    fn duplicate_field_names_are_rejected() {
        struct Twice;
        impl Record for Twice {
            fn schema() -> RecordSchema {
                RecordSchema::new("twice")
                    .field(FieldDescriptor::new("x", FieldKind::Int).default(0))
                    .field(FieldDescriptor::new("x", FieldKind::Int).default(1))
            }
            fn from_values(values: &mut ParsedValues) -> Result<Self, ConstructionError> {
                let _: i64 = values.take("x")?;
                Ok(Twice)
            }
        }

        match ArgumentParser::<Twice>::new().unwrap_err() {
            ConfigurationError::DuplicateField(name) => assert_eq!(name, "x"),
            other => panic!("expected duplicate error, got: {other:?}"),
        }
    }

    #[test]
    fn anonymous_groups_never_merge() {
        struct Anon;
        impl Record for Anon {
            fn schema() -> RecordSchema {
                RecordSchema::new("anon")
                    .field(
                        FieldDescriptor::new("a", FieldKind::Int)
                            .default(0)
                            .group(crate::schema::Group::anonymous_described("First block")),
                    )
                    .field(
                        FieldDescriptor::new("b", FieldKind::Int)
                            .default(0)
                            .group(crate::schema::Group::anonymous_described("Second block")),
                    )
            }
            fn from_values(values: &mut ParsedValues) -> Result<Self, ConstructionError> {
                let _: i64 = values.take("a")?;
                let _: i64 = values.take("b")?;
                Ok(Anon)
            }
        }

        let parser = ArgumentParser::<Anon>::new().unwrap();
        let help = parser.format_help();
        assert!(help.contains("First block"));
        assert!(help.contains("Second block"));
    }

    #[test]
    fn empty_titles_count_as_anonymous() {
        struct Blank;
        impl Record for Blank {
            fn schema() -> RecordSchema {
                RecordSchema::new("blank")
                    .field(
                        FieldDescriptor::new("a", FieldKind::Int)
                            .default(0)
                            .group(crate::schema::Group::described("", "Left block")),
                    )
                    .field(
                        FieldDescriptor::new("b", FieldKind::Int)
                            .default(0)
                            .group(crate::schema::Group::described("", "Right block")),
                    )
            }
            fn from_values(values: &mut ParsedValues) -> Result<Self, ConstructionError> {
                let _: i64 = values.take("a")?;
                let _: i64 = values.take("b")?;
                Ok(Blank)
            }
        }

        let help = ArgumentParser::<Blank>::new().unwrap().format_help();
        // Each lands in its own untitled block; no ":" header is rendered.
        assert!(help.contains("Left block"), "help:\n{help}");
        assert!(help.contains("Right block"), "help:\n{help}");
        assert!(!help.contains(":\n  Left block"), "help:\n{help}");
    }
}
