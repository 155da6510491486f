use recarg_argparse::ParseError;
use thiserror::Error;

/// A schema that cannot be turned into a working parser.
///
/// All of these are programmer errors in the record definition and surface
/// from parser construction, before any command-line token is looked at.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("duplicate field name '{0}'")]
    DuplicateField(String),

    #[error("field '{0}': choices cannot be combined with a literal type")]
    ChoicesWithLiteral(String),

    #[error("field '{field}': literal members mix {kinds}")]
    MixedLiteralKinds { field: String, kinds: String },

    #[error("field '{0}': a literal type needs at least one member")]
    EmptyLiteral(String),

    #[error("field '{0}': cannot infer an element type for the list")]
    UnknownElementType(String),

    #[error("field '{0}': a list field needs an explicit value count")]
    ListWithoutArity(String),

    #[error("field '{0}': a union of this shape needs an explicit converter")]
    UnionWithoutConverter(String),

    #[error("field '{0}': a boolean field cannot be positional")]
    PositionalBool(String),

    #[error("field '{0}': no converter can be derived; supply one with parse_with")]
    NoConverter(String),

    #[error("invalid argument definitions: {0}")]
    Definition(String),
}

/// A parsed value set that does not fit back into the record.
#[derive(Debug, Error)]
pub enum ConstructionError {
    #[error("missing value for field '{0}'")]
    MissingField(String),

    #[error("field '{field}': expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("field '{field}': {message}")]
    Invalid { field: String, message: String },
}

/// Any failure a parse entry point can report.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
