//! CSV reader
//!
//! Reading is split in two phases. [`CsvReader::open`] eagerly reads the header
//! and resolves every field to a column; the returned [`Records`] iterator then
//! decodes one row per call to `next`. Nothing is read ahead, so dropping the
//! iterator stops all further I/O.

use crate::config::CsvConfig;
use crate::errors::{CsvError, CsvResult};
use crate::input::{Input, check_quotes};
use csv::StringRecord;
use csva_record::{Record, codec};
use csva_schema::{FieldDescriptor, Schema};
use std::collections::HashMap;
use std::io::Read;
use std::marker::PhantomData;
use tracing::{debug, trace, warn};

/// Reader for CSV input
#[derive(Debug, Clone, Copy)]
pub struct CsvReader<'a> {
    schema: &'a Schema,
    config: &'a CsvConfig,
}

impl<'a> CsvReader<'a> {
    /// Create a new CSV reader over an already validated configuration
    pub(crate) fn new(schema: &'a Schema, config: &'a CsvConfig) -> Self {
        Self { schema, config }
    }

    /// Read the header from `reader` and return a lazy iterator over the records.
    ///
    /// # Errors
    ///
    /// Returns `ReadingHeader` when no header row can be read (including empty
    /// input), `MalformedQuotes` for a badly quoted header unless quotes are lazy,
    /// and `FieldNotFound` when a field that is not omit-empty has no column in
    /// the header.
    pub fn open<T: Record, R: Read>(&self, reader: R) -> CsvResult<Records<'a, T, R>> {
        let mut input = Input::new(reader);
        if self.config.trim_leading_space {
            input = input
                .trim_leading_space(self.config.delimiter_u8(), self.config.comment_u8());
        }
        if !self.config.lazy_quotes {
            input = input.capture();
        }
        let mut records = Records {
            reader: self.config.reader_builder().from_reader(input),
            fields: self.schema.fields(),
            positions: Vec::with_capacity(self.schema.len()),
            row: StringRecord::new(),
            reuse_record: self.config.reuse_record,
            strict_quotes: !self.config.lazy_quotes,
            delimiter: self.config.delimiter_u8(),
            comment: self.config.comment_u8(),
            line: 0,
            done: false,
            _record: PhantomData,
        };

        let mut header = StringRecord::new();
        match records.reader.read_record(&mut header) {
            Ok(true) => records.check_raw(header.position().map(|position| position.byte()))?,
            Ok(false) => return Err(CsvError::empty_input()),
            Err(source) => return Err(CsvError::ReadingHeader { source }),
        }

        let columns: HashMap<&str, usize> = header
            .iter()
            .enumerate()
            .map(|(index, name)| (name, index))
            .collect();

        for field in self.schema.fields() {
            match columns.get(field.alias.as_str()) {
                Some(&index) => records.positions.push(Some(index)),
                None if field.omit_empty => records.positions.push(None),
                None => return Err(CsvError::field_not_found(&field.alias)),
            }
        }

        debug!(
            record = self.schema.type_name(),
            columns = header.len(),
            "Resolved CSV header"
        );

        Ok(records)
    }
}

/// Lazy iterator over the records of one read call.
///
/// Yields `Ok(record)` for every decoded row and `Err` for every row that failed;
/// iteration continues after a failed row. An I/O failure of the source is
/// reported once and ends the iteration.
pub struct Records<'a, T, R> {
    reader: csv::Reader<Input<R>>,
    fields: &'a [FieldDescriptor],
    /// Column index of each field, `None` for omit-empty fields missing from the header
    positions: Vec<Option<usize>>,
    row: StringRecord,
    reuse_record: bool,
    strict_quotes: bool,
    delimiter: u8,
    comment: Option<u8>,
    line: usize,
    done: bool,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record, R: Read> Records<'_, T, R> {
    /// Number of data rows pulled so far
    pub fn line(&self) -> usize {
        self.line
    }

    fn decode_row(&self) -> CsvResult<T> {
        let mut record = T::default();
        for (field, position) in self.fields.iter().zip(&self.positions) {
            let Some(cell) = position.and_then(|index| self.row.get(index)) else {
                if field.omit_empty {
                    continue;
                }
                return Err(self.field_error(field, CsvError::field_not_found(&field.alias)));
            };

            if cell.is_empty() {
                if field.omit_empty {
                    continue;
                }
                return Err(self.field_error(field, CsvError::EmptyValue));
            }

            let Some(slot) = record.field_mut(field.name) else {
                return Err(self.field_error(field, CsvError::field_not_found(&field.alias)));
            };
            codec::decode(slot, cell).map_err(|err| self.field_error(field, err.into()))?;
        }
        Ok(record)
    }

    /// Check the raw bytes of the row that started at byte `start` and release
    /// everything read so far. Only strict quoting captures bytes to check.
    fn check_raw(&mut self, start: Option<u64>) -> CsvResult<()> {
        let checked = match start {
            Some(start) if self.strict_quotes => {
                let raw = self.reader.get_ref().span(start, self.reader.position().byte());
                check_quotes(raw, self.delimiter, self.comment)
            }
            _ => Ok(()),
        };
        self.release_raw();
        checked.map_err(|err| CsvError::MalformedQuotes {
            line: self.line,
            column: err.column,
            reason: err.reason,
        })
    }

    fn release_raw(&mut self) {
        let end = self.reader.position().byte();
        self.reader.get_mut().release(end);
    }

    fn field_error(&self, field: &FieldDescriptor, source: CsvError) -> CsvError {
        CsvError::processing(self.line, field, source)
    }
}

impl<T: Record, R: Read> Iterator for Records<'_, T, R> {
    type Item = CsvResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.reuse_record {
            self.row = StringRecord::new();
        }

        match self.reader.read_record(&mut self.row) {
            Ok(true) => {
                self.line += 1;
                let start = self.row.position().map(|position| position.byte());
                if let Err(err) = self.check_raw(start) {
                    warn!(line = self.line, error = %err, "Rejected CSV row");
                    return Some(Err(err));
                }
            }
            Ok(false) => {
                self.done = true;
                debug!(rows = self.line, "Finished reading CSV");
                return None;
            }
            Err(source) => {
                self.line += 1;
                self.release_raw();
                if source.is_io_error() {
                    self.done = true;
                }
                warn!(line = self.line, error = %source, "Failed to read CSV row");
                return Some(Err(CsvError::ReadingLines {
                    line: self.line,
                    source,
                }));
            }
        }

        let result = self.decode_row();
        if result.is_ok() {
            trace!(line = self.line, "Decoded CSV row");
        }
        Some(result)
    }
}
