//! Error types for XML parsing and serialization.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for catner-xml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or writing an XML document.
#[derive(Debug, Error)]
pub enum Error {
    /// XML syntax error from quick-xml.
    #[error("XML syntax error: {message}{}", .position.map(|p| format!(" at byte {p}")).unwrap_or_default())]
    XmlSyntax {
        message: String,
        /// Byte offset where the error occurred.
        position: Option<u64>,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEof {
        /// What was expected when EOF was encountered.
        expected: String,
    },

    /// Mismatched end tag.
    #[error("Mismatched end tag: expected </{expected}>, found </{found}>")]
    MismatchedEndTag { expected: String, found: String },

    /// Closing tag without a matching opening tag.
    #[error("Unexpected closing tag </{name}>")]
    UnexpectedEndTag { name: String },

    /// Multiple root elements.
    #[error("Invalid XML: multiple root elements")]
    MultipleRoots,

    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing to an in-memory or stream sink failed.
    #[error("Write error: {0}")]
    Write(#[from] std::io::Error),
}

impl Error {
    /// Stable short code for this error, used in CLI output.
    pub fn code(&self) -> &'static str {
        match self {
            Error::XmlSyntax { .. } => "X-1",
            Error::UnexpectedEof { .. } => "X-2",
            Error::MismatchedEndTag { .. } => "X-3",
            Error::UnexpectedEndTag { .. } => "X-4",
            Error::MultipleRoots => "X-5",
            Error::Io { .. } => "X-6",
            Error::Write(_) => "X-7",
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlSyntax {
            message: err.to_string(),
            position: None,
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlSyntax {
            message: format!("Attribute error: {}", err),
            position: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_display_includes_position() {
        let err = Error::XmlSyntax {
            message: "bad".to_string(),
            position: Some(12),
        };
        assert_eq!(err.to_string(), "XML syntax error: bad at byte 12");

        let err = Error::XmlSyntax {
            message: "bad".to_string(),
            position: None,
        };
        assert_eq!(err.to_string(), "XML syntax error: bad");
    }

    #[test]
    fn test_error_codes_are_distinct() {
        let codes = [
            Error::MultipleRoots.code(),
            Error::UnexpectedEof {
                expected: "x".to_string(),
            }
            .code(),
            Error::MismatchedEndTag {
                expected: "a".to_string(),
                found: "b".to_string(),
            }
            .code(),
        ];
        assert_eq!(codes, ["X-5", "X-2", "X-3"]);
    }
}
