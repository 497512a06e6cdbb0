use std::fmt;

use rms::parser::ParseError;

/// A document that could not be reduced. A failed document never aborts
/// the processing of other documents in a multi-file run.
#[derive(Debug)]
pub enum ReduceError {
    /// The source contained directives that cannot be interpreted
    /// (a `percent_chance` without a weight, an `if` without a symbol,
    /// a `#define` without a name).
    Parse(Vec<ParseError>),
    /// A mappack was requested with no input maps.
    NoMaps,
}

impl fmt::Display for ReduceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReduceError::Parse(errors) => {
                write!(f, "{} uninterpretable directive(s)", errors.len())
            }
            ReduceError::NoMaps => write!(f, "mappack requested with no input maps"),
        }
    }
}

impl std::error::Error for ReduceError {}

impl From<Vec<ParseError>> for ReduceError {
    fn from(errors: Vec<ParseError>) -> Self {
        ReduceError::Parse(errors)
    }
}
