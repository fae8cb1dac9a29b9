//! CSV writer

use crate::config::CsvConfig;
use crate::errors::{CsvError, CsvResult};
use csva_record::{FieldRef, Record, codec};
use csva_schema::Schema;
use std::borrow::Borrow;
use std::io::Write;
use tracing::{debug, trace};

/// Writer for CSV output
#[derive(Debug, Clone, Copy)]
pub struct CsvWriter<'a> {
    schema: &'a Schema,
    config: &'a CsvConfig,
}

impl<'a> CsvWriter<'a> {
    /// Create a new CSV writer over an already validated configuration
    pub(crate) fn new(schema: &'a Schema, config: &'a CsvConfig) -> Self {
        Self { schema, config }
    }

    /// Write `records` to `writer`, preceded by a header row when configured.
    ///
    /// The output is flushed before returning, on failure too: rows written
    /// before the failing one stay in the sink.
    ///
    /// # Errors
    ///
    /// Any failure aborts the whole write: `FieldNotFound` when a record lacks a
    /// mapped field, `EmptyValue` when a field that is not omit-empty encodes to
    /// an empty cell, codec errors, and `WritingLines` for sink failures. Row-level
    /// causes are wrapped in `ProcessingLine`.
    pub fn write<T, W, I>(&self, writer: W, records: I) -> CsvResult<()>
    where
        T: Record,
        W: Write,
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let mut csv_writer = self.config.writer_builder().from_writer(writer);

        let written = self.write_rows::<T, W, I>(&mut csv_writer, records);
        let flushed = csv_writer.flush();
        let record_count = written?;
        flushed?;

        debug!(
            record = self.schema.type_name(),
            record_count, "Finished writing CSV"
        );
        Ok(())
    }

    fn write_rows<T, W, I>(&self, csv_writer: &mut csv::Writer<W>, records: I) -> CsvResult<usize>
    where
        T: Record,
        W: Write,
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        if self.config.write_header {
            csv_writer.write_record(self.schema.aliases())?;
        }

        let mut row = Vec::with_capacity(self.schema.len());
        let mut line = 0;
        for item in records {
            line += 1;
            let record: &T = item.borrow();

            row.clear();
            for field in self.schema.fields() {
                let Some(value) = record.field(field.name) else {
                    return Err(CsvError::processing(
                        line,
                        field,
                        CsvError::field_not_found(&field.alias),
                    ));
                };
                if let FieldRef::Optional(None) = value {
                    row.push(String::new());
                    continue;
                }

                let cell = codec::encode(value)
                    .map_err(|err| CsvError::processing(line, field, err.into()))?;
                if cell.is_empty() && !field.omit_empty {
                    return Err(CsvError::processing(line, field, CsvError::EmptyValue));
                }
                row.push(cell);
            }

            csv_writer.write_record(&row)?;
            trace!(line, "Wrote CSV row");
        }
        Ok(line)
    }
}
