//! CSV configuration options

use crate::errors::{CsvError, CsvResult};
use serde::{Deserialize, Serialize};

/// Configuration for CSV reading and writing
///
/// Applied once when the adapter is built. Deserializes with every field
/// optional, so partial documents fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvConfig {
    /// Field delimiter character (default: comma)
    pub delimiter: char,
    /// Lines starting with this character are skipped on read (default: none)
    pub comment: Option<char>,
    /// Tolerate stray quotes inside fields (default: false). When off, a `"` in an
    /// unquoted field or a closing `"` not followed by the delimiter or the end of
    /// the row fails that row with a read error.
    pub lazy_quotes: bool,
    /// Ignore leading whitespace in each cell on read (default: false). Trimming
    /// happens before quote detection, so ` "a, b"` reads as the quoted `a, b`.
    pub trim_leading_space: bool,
    /// Reuse one row buffer for every row on read (default: false)
    pub reuse_record: bool,
    /// Row terminator on write (default: LF)
    pub line_ending: LineEnding,
    /// Emit a header row on write (default: true)
    pub write_header: bool,
    /// Do not use field names as aliases for untagged fields (default: false)
    pub no_implicit_alias: bool,
}

/// Line ending options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineEnding {
    /// Unix-style line feed (\n)
    #[default]
    LF,
    /// Windows-style carriage return + line feed (\r\n)
    CRLF,
}

impl LineEnding {
    /// Get the line ending as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::LF => "\n",
            LineEnding::CRLF => "\r\n",
        }
    }

    fn terminator(self) -> csv::Terminator {
        match self {
            LineEnding::LF => csv::Terminator::Any(b'\n'),
            LineEnding::CRLF => csv::Terminator::CRLF,
        }
    }
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            comment: None,
            lazy_quotes: false,
            trim_leading_space: false,
            reuse_record: false,
            line_ending: LineEnding::LF,
            write_header: true,
            no_implicit_alias: false,
        }
    }
}

impl CsvConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delimiter character
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the comment character
    pub fn comment(mut self, comment: char) -> Self {
        self.comment = Some(comment);
        self
    }

    /// Set the lazy quotes flag
    pub fn lazy_quotes(mut self, lazy_quotes: bool) -> Self {
        self.lazy_quotes = lazy_quotes;
        self
    }

    /// Set the trim leading space flag
    pub fn trim_leading_space(mut self, trim_leading_space: bool) -> Self {
        self.trim_leading_space = trim_leading_space;
        self
    }

    /// Set the reuse record flag
    pub fn reuse_record(mut self, reuse_record: bool) -> Self {
        self.reuse_record = reuse_record;
        self
    }

    /// Set line ending
    pub fn line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Terminate written rows with CRLF instead of LF
    pub fn use_crlf(self, use_crlf: bool) -> Self {
        self.line_ending(if use_crlf {
            LineEnding::CRLF
        } else {
            LineEnding::LF
        })
    }

    /// Configure header writing
    pub fn write_header(mut self, write_header: bool) -> Self {
        self.write_header = write_header;
        self
    }

    /// Disable header row on write
    pub fn without_header(self) -> Self {
        self.write_header(false)
    }

    /// Set the no implicit alias flag
    pub fn no_implicit_alias(mut self, no_implicit_alias: bool) -> Self {
        self.no_implicit_alias = no_implicit_alias;
        self
    }

    /// Check that delimiter and comment characters are usable.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when either character is not a single-byte
    /// ASCII character, is a quote or line break, or when both are equal.
    pub fn validate(&self) -> CsvResult<()> {
        check_special_char("delimiter", self.delimiter)?;
        if let Some(comment) = self.comment {
            check_special_char("comment", comment)?;
            if comment == self.delimiter {
                return Err(CsvError::config(format!(
                    "comment character {comment:?} is also the delimiter"
                )));
            }
        }
        Ok(())
    }

    /// Convert delimiter to u8 for csv crate; only meaningful once `validate` passed
    pub(crate) fn delimiter_u8(&self) -> u8 {
        self.delimiter as u8
    }

    /// Convert comment char to u8 for csv crate; only meaningful once `validate` passed
    pub(crate) fn comment_u8(&self) -> Option<u8> {
        self.comment.map(|c| c as u8)
    }

    /// Reader builder for this configuration. Headers are handled by the adapter,
    /// so the csv reader treats every line as a record.
    pub(crate) fn reader_builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .has_headers(false)
            .flexible(false)
            .delimiter(self.delimiter_u8())
            .comment(self.comment_u8())
            .trim(csv::Trim::None);
        builder
    }

    /// Writer builder for this configuration.
    pub(crate) fn writer_builder(&self) -> csv::WriterBuilder {
        let mut builder = csv::WriterBuilder::new();
        builder
            .has_headers(false)
            .delimiter(self.delimiter_u8())
            .terminator(self.line_ending.terminator());
        builder
    }
}

fn check_special_char(name: &str, c: char) -> CsvResult<()> {
    if !c.is_ascii() || matches!(c, '\0' | '"' | '\r' | '\n') {
        return Err(CsvError::config(format!("invalid {name} character {c:?}")));
    }
    Ok(())
}
