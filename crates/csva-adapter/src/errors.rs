//! Error types for the CSV adapter with row context

use csva_record::CodecError;
use csva_schema::{FieldDescriptor, SchemaError};
use std::io;
use thiserror::Error;

/// Errors that can occur when adapting records to and from CSV
#[derive(Error, Debug)]
pub enum CsvError {
    /// Schema compilation failed while building the adapter
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// The header row could not be read
    #[error("error reading csv header: {source}")]
    ReadingHeader { source: csv::Error },

    /// A data row could not be read
    #[error("error reading csv lines at line {line}: {source}")]
    ReadingLines { line: usize, source: csv::Error },

    /// A row breaks the quoting rules while lazy quotes are off. Line 0 is the
    /// header row.
    #[error("error reading csv lines at line {line}, column {column}: {reason}")]
    MalformedQuotes {
        line: usize,
        column: usize,
        reason: &'static str,
    },

    /// A field of a data row failed; wraps the cause with row context
    #[error("error processing field {field} ({alias}) at line {line}: {source}")]
    ProcessingLine {
        line: usize,
        field: String,
        alias: String,
        source: Box<CsvError>,
    },

    /// A required column is missing, or a record has no such field
    #[error("field {alias} not found in csv")]
    FieldNotFound { alias: String },

    /// A required field has an empty value
    #[error("empty value")]
    EmptyValue,

    /// A value could not be converted to or from text
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The underlying sink failed
    #[error("error writing csv lines: {0}")]
    WritingLines(#[from] csv::Error),
}

/// Flat classification of [`CsvError`]s
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotAStruct,
    UnsupportedTag,
    InvalidTag,
    AliasNotFound,
    Config,
    ReadingLines,
    ProcessingLines,
    FieldNotFound,
    EmptyValue,
    ParsingType,
    UnprocessableType,
    Custom,
    WritingLines,
}

impl CsvError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create the error reported for an input without a header row
    pub fn empty_input() -> Self {
        Self::ReadingHeader {
            source: io::Error::new(io::ErrorKind::UnexpectedEof, "no header row in input").into(),
        }
    }

    /// Create a field-not-found error
    pub fn field_not_found(alias: impl Into<String>) -> Self {
        Self::FieldNotFound {
            alias: alias.into(),
        }
    }

    /// Wrap `source` with the row number and the field it happened on
    pub fn processing(line: usize, field: &FieldDescriptor, source: CsvError) -> Self {
        Self::ProcessingLine {
            line,
            field: field.name.to_string(),
            alias: field.alias.clone(),
            source: Box::new(source),
        }
    }

    /// Classify the error. A row-level wrapper reports `ProcessingLines`; use
    /// [`CsvError::is`] or [`CsvError::root`] to look at its cause.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Schema(SchemaError::NotAStruct { .. }) => ErrorKind::NotAStruct,
            Self::Schema(SchemaError::UnsupportedTag { .. }) => ErrorKind::UnsupportedTag,
            Self::Schema(SchemaError::InvalidTag { .. }) => ErrorKind::InvalidTag,
            Self::Schema(SchemaError::AliasNotFound { .. }) => ErrorKind::AliasNotFound,
            Self::Config(_) => ErrorKind::Config,
            Self::ReadingHeader { .. }
            | Self::ReadingLines { .. }
            | Self::MalformedQuotes { .. } => ErrorKind::ReadingLines,
            Self::ProcessingLine { .. } => ErrorKind::ProcessingLines,
            Self::FieldNotFound { .. } => ErrorKind::FieldNotFound,
            Self::EmptyValue => ErrorKind::EmptyValue,
            Self::Codec(CodecError::ParsingType { .. }) => ErrorKind::ParsingType,
            Self::Codec(CodecError::UnprocessableType { .. }) => ErrorKind::UnprocessableType,
            Self::Codec(CodecError::Custom(_)) => ErrorKind::Custom,
            Self::WritingLines(_) => ErrorKind::WritingLines,
        }
    }

    /// Whether this error, or the cause it wraps, is of `kind`
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind() == kind || self.root().kind() == kind
    }

    /// The innermost cause, unwrapping row context
    pub fn root(&self) -> &CsvError {
        match self {
            Self::ProcessingLine { source, .. } => source.root(),
            other => other,
        }
    }

    /// Get the data-row number if available
    pub fn line_number(&self) -> Option<usize> {
        match self {
            Self::ReadingLines { line, .. }
            | Self::MalformedQuotes { line, .. }
            | Self::ProcessingLine { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Whether the input ended before a header row could be read
    pub fn is_eof(&self) -> bool {
        match self {
            Self::ReadingHeader { source } => matches!(
                source.kind(),
                csv::ErrorKind::Io(err) if err.kind() == io::ErrorKind::UnexpectedEof
            ),
            _ => false,
        }
    }

    /// Whether the underlying csv error is a row-length mismatch
    pub fn is_unequal_lengths(&self) -> bool {
        match self.root() {
            Self::ReadingLines { source, .. } | Self::ReadingHeader { source } => {
                matches!(source.kind(), csv::ErrorKind::UnequalLengths { .. })
            }
            _ => false,
        }
    }
}

impl From<io::Error> for CsvError {
    fn from(e: io::Error) -> Self {
        Self::WritingLines(e.into())
    }
}

/// Result type alias for CSV operations
pub type CsvResult<T> = std::result::Result<T, CsvError>;
