//! # csva-schema
//!
//! Compiles the field-mapping schema of a record type from its field tags.
//!
//! ```rust
//! use csva_record::record;
//! use csva_schema::SchemaBuilder;
//!
//! record! {
//!     #[derive(Debug, Default)]
//!     pub struct Person {
//!         pub name: String => "name",
//!         pub age: i32 => "alias=age",
//!         pub email: String => "email,omitempty",
//!         pub password: String => "-",
//!     }
//! }
//!
//! let schema = SchemaBuilder::new().build::<Person>().unwrap();
//! assert_eq!(schema.aliases(), vec!["name", "age", "email"]);
//! ```

pub mod schema;
pub mod tag;

pub use schema::{FieldDescriptor, Schema, SchemaBuilder};
pub use tag::Segment;

use thiserror::Error;

/// Errors raised while compiling a schema
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("not a struct: {type_name} is a {kind}")]
    NotAStruct { type_name: String, kind: String },

    #[error("unsupported tag '{tag}' on field {field}")]
    UnsupportedTag { field: String, tag: String },

    #[error("invalid tag '{tag}' on field {field}")]
    InvalidTag { field: String, tag: String },

    #[error("alias not found for field {field}")]
    AliasNotFound { field: String },
}

/// Crate-local result type for schema compilation.
pub type Result<T> = std::result::Result<T, SchemaError>;
