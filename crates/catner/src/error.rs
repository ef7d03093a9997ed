//! Error taxonomy for catalog operations.
//!
//! Every fallible [`Catalog`](crate::Catalog) operation returns a [`Result`].
//! The [`ErrorKind`] of the most recent failure is also kept in the catalog's
//! last-error slot, which [`Catalog::last_error`](crate::Catalog::last_error)
//! reads and clears.

use std::fmt;
use thiserror::Error;

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The category of a catalog failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Duplicate key on an add operation.
    AlreadyExists,
    /// A value failed validation (locale length, empty AID, ...).
    InvalidValue,
    NoSuchArticle,
    NoSuchFeature,
    NoSuchVariant,
    /// Any other lookup miss (territory, image, category, end of traversal).
    NoSuchNode,
    NoSelectionArticle,
    NoSelectionFeature,
    NoSelectionVariant,
    NoSelectionImage,
    NoSelectionUnit,
    /// A mandatory anchor element is missing from a loaded document.
    StructuralLoadFailure,
    /// `save()` was called on a catalog that was not loaded from a file.
    NoOriginPath,
    /// The underlying XML could not be parsed or written.
    Xml,
    /// Reading or writing a file failed.
    Io,
}

impl ErrorKind {
    /// Stable short code, included in CLI log output.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::AlreadyExists => "C-1",
            ErrorKind::InvalidValue => "C-2",
            ErrorKind::NoSuchArticle => "C-10",
            ErrorKind::NoSuchFeature => "C-11",
            ErrorKind::NoSuchVariant => "C-12",
            ErrorKind::NoSuchNode => "C-13",
            ErrorKind::NoSelectionArticle => "C-20",
            ErrorKind::NoSelectionFeature => "C-21",
            ErrorKind::NoSelectionVariant => "C-22",
            ErrorKind::NoSelectionImage => "C-23",
            ErrorKind::NoSelectionUnit => "C-24",
            ErrorKind::StructuralLoadFailure => "C-30",
            ErrorKind::NoOriginPath => "C-31",
            ErrorKind::Xml => "C-40",
            ErrorKind::Io => "C-41",
        }
    }

    fn describe(self) -> &'static str {
        match self {
            ErrorKind::AlreadyExists => "already exists",
            ErrorKind::InvalidValue => "invalid value",
            ErrorKind::NoSuchArticle => "no such article",
            ErrorKind::NoSuchFeature => "no such feature",
            ErrorKind::NoSuchVariant => "no such variant",
            ErrorKind::NoSuchNode => "no such node",
            ErrorKind::NoSelectionArticle => "no article selected",
            ErrorKind::NoSelectionFeature => "no feature selected",
            ErrorKind::NoSelectionVariant => "no variant selected",
            ErrorKind::NoSelectionImage => "no image selected",
            ErrorKind::NoSelectionUnit => "no unit selected",
            ErrorKind::StructuralLoadFailure => "structural load failure",
            ErrorKind::NoOriginPath => "no origin path",
            ErrorKind::Xml => "XML error",
            ErrorKind::Io => "I/O error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A failed catalog operation.
#[derive(Debug, Error)]
pub enum Error {
    /// A catalog-level failure with a human readable detail.
    #[error("{kind}: {message}")]
    Catalog { kind: ErrorKind, message: String },

    /// Parsing or serializing the XML tree failed.
    #[error(transparent)]
    Xml(#[from] catner_xml::Error),
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Error::Catalog {
            kind,
            message: message.into(),
        }
    }

    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Catalog { kind, .. } => *kind,
            Error::Xml(catner_xml::Error::Io { .. } | catner_xml::Error::Write(_)) => ErrorKind::Io,
            Error::Xml(_) => ErrorKind::Xml,
        }
    }
}
