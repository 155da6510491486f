use std::fmt;

/// Errors surfaced by the non-fatal parse entry points.
///
/// `parse` and `parse_known` handle these internally (print and exit); the
/// `try_` variants hand them back to the caller.
#[derive(Debug, Clone)]
pub enum ParseError {
    /// The supplied tokens do not satisfy the argument definitions.
    InvalidArgs(String),
    /// The argument definitions themselves are inconsistent.
    Definition(String),
    /// `-h`/`--help` was requested. The payload is the rendered help text.
    HelpRequested(String),
}

impl ParseError {
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidArgs(msg) | Self::Definition(msg) | Self::HelpRequested(msg) => {
                msg.as_str()
            }
        }
    }

    /// Whether this is a help request rather than a failure.
    pub fn is_help(&self) -> bool {
        matches!(self, Self::HelpRequested(_))
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgs(msg) | Self::Definition(msg) => f.write_str(msg),
            Self::HelpRequested(_) => f.write_str("help requested"),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<String> for ParseError {
    fn from(msg: String) -> Self {
        Self::InvalidArgs(msg)
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
