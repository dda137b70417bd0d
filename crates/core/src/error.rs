//! Error types for slapdb
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Store operations wrap whatever failed underneath them in
//! [`Error::Context`], so a message reads like `create: invalid parameter: ...`.
//! Use [`Error::kind`] to match on the underlying failure regardless of how
//! many layers of context were added.

use std::io;
use thiserror::Error;

/// Result type alias for slapdb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for slapdb
#[derive(Debug, Error)]
pub enum Error {
    /// Wrong argument shape or value passed to an operation
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A value could not be encoded or decoded against its declared type
    #[error("type conversion: {0}")]
    TypeConversion(String),

    /// The record does not exist
    #[error("record does not exist: {0}")]
    NoRecord(String),

    /// A schema, table or field name collides with an internal identifier
    #[error("reserved identifier used: {0}")]
    ReservedWord(String),

    /// The record shape declares no primary identifier field
    #[error("primary ID field does not exist in {0}")]
    NoPrimaryId(String),

    /// A key could not be built because a required segment is empty
    #[error("malformed key or zero key fields: {0}")]
    MalformedKey(String),

    /// Failure reported by the underlying key-value engine
    #[error("storage error: {0}")]
    Storage(String),

    /// I/O error (data directory, config file)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration file could not be parsed or holds an invalid setting
    #[error("config error: {0}")]
    Config(String),

    /// An error annotated with the operation that produced it
    #[error("{op}: {source}")]
    Context {
        /// Operation name (`create`, `read`, ...)
        op: &'static str,
        /// The wrapped error
        #[source]
        source: Box<Error>,
    },
}

/// Discriminant of [`Error`] with context layers stripped away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`Error::InvalidParameter`]
    InvalidParameter,
    /// See [`Error::TypeConversion`]
    TypeConversion,
    /// See [`Error::NoRecord`]
    NoRecord,
    /// See [`Error::ReservedWord`]
    ReservedWord,
    /// See [`Error::NoPrimaryId`]
    NoPrimaryId,
    /// See [`Error::MalformedKey`]
    MalformedKey,
    /// See [`Error::Storage`]
    Storage,
    /// See [`Error::Io`]
    Io,
    /// See [`Error::Config`]
    Config,
}

impl Error {
    /// Wrap this error with the name of the operation that produced it
    pub fn context(self, op: &'static str) -> Self {
        Error::Context {
            op,
            source: Box::new(self),
        }
    }

    /// Kind of the innermost error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidParameter(_) => ErrorKind::InvalidParameter,
            Error::TypeConversion(_) => ErrorKind::TypeConversion,
            Error::NoRecord(_) => ErrorKind::NoRecord,
            Error::ReservedWord(_) => ErrorKind::ReservedWord,
            Error::NoPrimaryId(_) => ErrorKind::NoPrimaryId,
            Error::MalformedKey(_) => ErrorKind::MalformedKey,
            Error::Storage(_) => ErrorKind::Storage,
            Error::Io(_) => ErrorKind::Io,
            Error::Config(_) => ErrorKind::Config,
            Error::Context { source, .. } => source.kind(),
        }
    }

    /// Returns true if the innermost error is of the given kind
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind() == kind
    }
}

/// Attach an operation name to the error side of a `Result`
pub trait ResultExt<T> {
    /// Wrap any error with `op`
    fn op(self, op: &'static str) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn op(self, op: &'static str) -> Result<T> {
        self.map_err(|e| e.context(op))
    }
}
