#![warn(rust_2018_idioms)]
#![warn(clippy::all)]

//! # csva-record
//!
//! Record reflection and per-value text codec for csva.
//!
//! Rust has no runtime reflection, so a record type describes itself through the
//! [`Record`] trait: its field names and mapping tags in declaration order, plus
//! typed read and write views of every field. The [`record!`] macro derives all of
//! it from a plain struct declaration:
//!
//! ```rust
//! use csva_record::{Record, Shape, record};
//!
//! record! {
//!     #[derive(Debug, Default, Clone, PartialEq)]
//!     pub struct Person {
//!         pub name: String => "name",
//!         pub age: u32 => "age",
//!         pub email: Option<String> => "email,omitempty",
//!     }
//! }
//!
//! let Shape::Struct(fields) = Person::shape() else { unreachable!() };
//! assert_eq!(fields.len(), 3);
//! assert_eq!(fields[2].tag, Some("email,omitempty"));
//! ```
//!
//! Values move between fields and text through [`codec::decode`] and
//! [`codec::encode`]. Types outside the built-in set opt in with [`extension!`].

/// Text decoding and encoding of single field values.
pub mod codec;
/// Capability contracts for user-defined field types.
pub mod extension;
/// Typed field views and the [`Field`] trait.
pub mod field;
/// The [`Record`] trait and its declaration macro.
pub mod record;

/// Capability traits for custom field codecs.
pub use extension::{Extension, TextMarshaler, TextUnmarshaler};
/// Field views used by the codec.
pub use field::{Field, FieldMut, FieldRef, OptionalSlot};
/// Record reflection primitives.
pub use record::{FieldMeta, Record, Shape};

use thiserror::Error;

/// Boxed error returned by custom text codecs.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while converting a single value to or from text
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("error parsing type {kind}: cannot parse {value:?}: {reason}")]
    ParsingType {
        kind: &'static str,
        value: String,
        reason: String,
    },

    #[error("unprocessable type {kind}")]
    UnprocessableType { kind: &'static str },

    /// Error returned by a [`TextUnmarshaler`] or [`TextMarshaler`], passed through untouched.
    #[error(transparent)]
    Custom(BoxError),
}

impl CodecError {
    /// Build a parsing error for a scalar kind.
    pub fn parsing(
        kind: &'static str,
        value: impl Into<String>,
        reason: impl std::fmt::Display,
    ) -> Self {
        Self::ParsingType {
            kind,
            value: value.into(),
            reason: reason.to_string(),
        }
    }

    /// Build an unprocessable-type error naming the field kind.
    pub fn unprocessable(kind: &'static str) -> Self {
        Self::UnprocessableType { kind }
    }
}

/// Crate-local result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
