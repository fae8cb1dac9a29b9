//! # csva-adapter
//!
//! Struct-to-CSV adapter driven by field tags.
//!
//! A record type is declared once with [`record!`]; the adapter compiles its field
//! tags into a schema when it is built and then converts between records and CSV
//! rows as many times as needed.
//!
//! ## Example Usage
//!
//! ```rust
//! use csva_adapter::{CsvAdapter, record};
//!
//! record! {
//!     #[derive(Debug, Default, Clone, PartialEq)]
//!     pub struct Person {
//!         pub name: String => "name",
//!         pub age: u32 => "age",
//!         pub email: String => "email,omitempty",
//!     }
//! }
//!
//! let adapter = CsvAdapter::<Person>::new().unwrap();
//!
//! let data = "name,age,email\nJohn Doe,30,\nJane Smith,25,jane@example.com\n";
//! let people: Vec<Person> = adapter.read_all(data.as_bytes()).unwrap();
//! assert_eq!(people[0].age, 30);
//!
//! let output = adapter.write_to_string(&people).unwrap();
//! assert_eq!(output, data);
//! ```

pub mod config;
pub mod errors;
mod input;
pub mod reader;
pub mod writer;

// Re-export main types
pub use config::{CsvConfig, LineEnding};
pub use errors::{CsvError, CsvResult, ErrorKind};
pub use reader::{CsvReader, Records};
pub use writer::CsvWriter;

pub use csva_record::{
    BoxError, CodecError, Extension, Field, FieldMeta, FieldMut, FieldRef, Record, Shape,
    TextMarshaler, TextUnmarshaler, codec, extension, record,
};
pub use csva_schema::{FieldDescriptor, Schema, SchemaBuilder, SchemaError};

use std::borrow::Borrow;
use std::fmt;
use std::io::{Read, Write};
use std::marker::PhantomData;
use tracing::debug;

/// CSV adapter for one record type
///
/// Built once per record type and configuration; holds no per-call state, so a
/// shared reference can serve any number of reads and writes.
pub struct CsvAdapter<T> {
    schema: Schema,
    config: CsvConfig,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> CsvAdapter<T> {
    /// Create a new CSV adapter with default configuration
    ///
    /// # Errors
    ///
    /// Returns a schema error when `T` is not a struct or its tags are invalid.
    pub fn new() -> CsvResult<Self> {
        Self::with_config(CsvConfig::default())
    }

    /// Create adapter with configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error for unusable delimiter or comment
    /// characters, or a schema error when `T` cannot be mapped.
    pub fn with_config(config: CsvConfig) -> CsvResult<Self> {
        config.validate()?;
        let schema = SchemaBuilder::new()
            .no_implicit_alias(config.no_implicit_alias)
            .build::<T>()?;

        debug!(
            record = T::NAME,
            fields = schema.len(),
            delimiter = %config.delimiter,
            lazy_quotes = config.lazy_quotes,
            "Built CSV adapter"
        );
        Ok(Self {
            schema,
            config,
            _record: PhantomData,
        })
    }

    /// Compiled field schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Field descriptors in column order
    pub fn fields(&self) -> &[FieldDescriptor] {
        self.schema.fields()
    }

    /// Resolved configuration
    pub fn config(&self) -> &CsvConfig {
        &self.config
    }

    /// Get a reader configured with this adapter's settings
    pub fn reader(&self) -> CsvReader<'_> {
        CsvReader::new(&self.schema, &self.config)
    }

    /// Get a writer configured with this adapter's settings
    pub fn writer(&self) -> CsvWriter<'_> {
        CsvWriter::new(&self.schema, &self.config)
    }

    /// Read the header of `reader` and return a lazy iterator over its records.
    ///
    /// # Errors
    ///
    /// See [`CsvReader::open`].
    pub fn read_from<R: Read>(&self, reader: R) -> CsvResult<Records<'_, T, R>> {
        self.reader().open(reader)
    }

    /// Read every record of `reader`, stopping at the first failed row.
    ///
    /// # Errors
    ///
    /// Returns the header error or the first row error.
    pub fn read_all<R: Read>(&self, reader: R) -> CsvResult<Vec<T>> {
        self.read_from(reader)?.collect()
    }

    /// Write `records` to `writer`.
    ///
    /// # Errors
    ///
    /// See [`CsvWriter::write`].
    pub fn write_to<W, I>(&self, writer: W, records: I) -> CsvResult<()>
    where
        W: Write,
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        self.writer().write::<T, W, I>(writer, records)
    }

    /// Write `records` into a string.
    ///
    /// # Errors
    ///
    /// See [`CsvWriter::write`].
    pub fn write_to_string<I>(&self, records: I) -> CsvResult<String>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let mut output = Vec::new();
        self.write_to(&mut output, records)?;
        Ok(String::from_utf8_lossy(&output).into_owned())
    }
}

impl<T> Clone for CsvAdapter<T> {
    fn clone(&self) -> Self {
        Self {
            schema: self.schema.clone(),
            config: self.config.clone(),
            _record: PhantomData,
        }
    }
}

impl<T> fmt::Debug for CsvAdapter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsvAdapter")
            .field("schema", &self.schema)
            .field("config", &self.config)
            .finish()
    }
}

impl<T> fmt::Display for CsvAdapter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CsvAdapter({})", self.schema.type_name())
    }
}
