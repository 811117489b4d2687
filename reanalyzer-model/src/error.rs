use std::fmt::{self, Display};

/// Errors produced by model constructors and validation routines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Neither a title nor a filename was supplied.
    MissingLookupField,
    /// Both a title and a filename were supplied.
    AmbiguousLookup,
    /// A field name outside the supported set was requested.
    UnsupportedField(String),
    /// A cache-miss policy name that is not recognised.
    UnknownMissPolicy(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::MissingLookupField => {
                write!(f, "either a media title or a media filename is required")
            }
            ModelError::AmbiguousLookup => write!(
                f,
                "only one of media title or media filename may be provided"
            ),
            ModelError::UnsupportedField(field) => {
                write!(f, "unsupported search field '{field}'")
            }
            ModelError::UnknownMissPolicy(name) => write!(
                f,
                "unknown miss policy '{name}' (expected 'targeted' or 'full_sync')"
            ),
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
