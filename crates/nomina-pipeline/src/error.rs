//! Batch loading errors

use nomina_parser::ExtractError;
use thiserror::Error;

/// Failure to turn one input document into a record
///
/// Always carries the display name of the document so a batch summary can say
/// which file went wrong.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The document could not be read
    #[error("could not read file {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },

    /// The document was read but extraction rejected it
    #[error("error processing {file}: {source}")]
    Extract {
        file: String,
        #[source]
        source: ExtractError,
    },
}

/// Specialized Result type for batch loading
pub type LoadResult<T> = Result<T, LoadError>;

impl LoadError {
    pub fn io(file: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            file: file.into(),
            source,
        }
    }

    pub fn extract(file: impl Into<String>, source: ExtractError) -> Self {
        Self::Extract {
            file: file.into(),
            source,
        }
    }

    /// Display name of the failing document
    pub fn file(&self) -> &str {
        match self {
            Self::Io { file, .. } | Self::Extract { file, .. } => file,
        }
    }

    /// Extraction cause, if extraction is what failed
    pub fn extract_error(&self) -> Option<&ExtractError> {
        match self {
            Self::Extract { source, .. } => Some(source),
            Self::Io { .. } => None,
        }
    }
}
