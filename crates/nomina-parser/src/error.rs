//! Extraction error types

use thiserror::Error;

/// Per-document extraction failure
///
/// Both variants are scoped to the offending document; a batch keeps going after
/// either of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// The input is not well-formed XML
    #[error("the file is not valid XML: {0}")]
    Parse(String),

    /// Well-formed XML that lacks the markers of a payroll receipt
    #[error("the file does not look like a valid CFDI: missing {0}")]
    Schema(String),
}

/// Specialized Result type for extraction
pub type ExtractResult<T> = Result<T, ExtractError>;

impl ExtractError {
    /// Create a malformed-markup error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a missing-marker error
    pub fn schema(marker: impl Into<String>) -> Self {
        Self::Schema(marker.into())
    }

    /// Check if the document failed the well-formedness gate
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }

    /// Check if the document failed the structural gate
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let err = ExtractError::parse("unexpected end of stream");
        assert!(err.is_parse());
        assert!(!err.is_schema());

        let err = ExtractError::schema("TimbreFiscalDigital");
        assert!(err.is_schema());
        assert!(!err.is_parse());
    }

    #[test]
    fn test_error_display() {
        let err = ExtractError::schema("TimbreFiscalDigital");
        assert_eq!(
            err.to_string(),
            "the file does not look like a valid CFDI: missing TimbreFiscalDigital"
        );

        let err = ExtractError::parse("unknown token at 1:1");
        assert_eq!(err.to_string(), "the file is not valid XML: unknown token at 1:1");
    }
}
