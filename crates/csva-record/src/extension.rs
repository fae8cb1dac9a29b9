//! Capability contracts for custom field types
//!
//! A type that is not one of the built-in scalars can still live in a record if it
//! knows how to turn itself into text and back. It opts in with [`extension!`],
//! naming the capabilities it implements:
//!
//! ```rust
//! use csva_record::{BoxError, TextMarshaler, TextUnmarshaler, extension};
//!
//! #[derive(Debug, Default, Clone, PartialEq)]
//! struct Email(String);
//!
//! impl TextUnmarshaler for Email {
//!     fn unmarshal_text(&mut self, text: &str) -> Result<(), BoxError> {
//!         if !text.contains('@') {
//!             return Err(format!("{text:?} is not an email address").into());
//!         }
//!         self.0 = text.to_string();
//!         Ok(())
//!     }
//! }
//!
//! impl TextMarshaler for Email {
//!     fn marshal_text(&self) -> Result<String, BoxError> {
//!         Ok(self.0.clone())
//!     }
//! }
//!
//! extension!(Email: unmarshal, marshal);
//! ```
//!
//! [`extension!`]: crate::extension!

use crate::BoxError;
use std::fmt;

/// Populate a value from its textual form
pub trait TextUnmarshaler {
    /// Fill `self` from `text`; malformed input is reported with a caller-defined error.
    fn unmarshal_text(&mut self, text: &str) -> Result<(), BoxError>;
}

/// Render a value as text
pub trait TextMarshaler {
    /// Produce the textual form of `self`.
    fn marshal_text(&self) -> Result<String, BoxError>;
}

/// Runtime capability lookup for field types outside the built-in set.
///
/// Each accessor returns `Some` only when the type implements the matching
/// capability. Implement it through [`extension!`](crate::extension!).
pub trait Extension {
    /// Name reported in `UnprocessableType` errors.
    fn type_name(&self) -> &'static str;

    fn as_unmarshaler(&mut self) -> Option<&mut dyn TextUnmarshaler> {
        None
    }

    fn as_marshaler(&self) -> Option<&dyn TextMarshaler> {
        None
    }

    fn as_display(&self) -> Option<&dyn fmt::Display> {
        None
    }
}

/// Register a type as a record field with the listed text capabilities.
///
/// Capabilities are any of `unmarshal` ([`TextUnmarshaler`]), `marshal`
/// ([`TextMarshaler`]) and `display` ([`std::fmt::Display`]). A type registered
/// without a capability is accepted in records but fails to convert with
/// `UnprocessableType`.
#[macro_export]
macro_rules! extension {
    (@capability unmarshal) => {
        fn as_unmarshaler(&mut self) -> Option<&mut dyn $crate::TextUnmarshaler> {
            Some(self)
        }
    };

    (@capability marshal) => {
        fn as_marshaler(&self) -> Option<&dyn $crate::TextMarshaler> {
            Some(self)
        }
    };

    (@capability display) => {
        fn as_display(&self) -> Option<&dyn ::std::fmt::Display> {
            Some(self)
        }
    };

    ($ty:ty $(: $($cap:ident),* $(,)?)?) => {
        impl $crate::Field for $ty {
            fn as_field(&self) -> $crate::FieldRef<'_> {
                $crate::FieldRef::Extension(self)
            }

            fn as_field_mut(&mut self) -> $crate::FieldMut<'_> {
                $crate::FieldMut::Extension(self)
            }
        }

        impl $crate::Extension for $ty {
            fn type_name(&self) -> &'static str {
                stringify!($ty)
            }

            $($($crate::extension!(@capability $cap);)*)?
        }
    };
}

#[cfg(feature = "chrono")]
mod chrono_support {
    use super::{TextMarshaler, TextUnmarshaler};
    use crate::BoxError;
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

    const DATE_FORMAT: &str = "%Y-%m-%d";
    const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    impl TextUnmarshaler for NaiveDate {
        fn unmarshal_text(&mut self, text: &str) -> Result<(), BoxError> {
            *self = NaiveDate::parse_from_str(text, DATE_FORMAT)?;
            Ok(())
        }
    }

    impl TextMarshaler for NaiveDate {
        fn marshal_text(&self) -> Result<String, BoxError> {
            Ok(self.format(DATE_FORMAT).to_string())
        }
    }

    impl TextUnmarshaler for NaiveDateTime {
        fn unmarshal_text(&mut self, text: &str) -> Result<(), BoxError> {
            *self = NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT)?;
            Ok(())
        }
    }

    impl TextMarshaler for NaiveDateTime {
        fn marshal_text(&self) -> Result<String, BoxError> {
            Ok(self.format(DATE_TIME_FORMAT).to_string())
        }
    }

    impl TextUnmarshaler for DateTime<Utc> {
        fn unmarshal_text(&mut self, text: &str) -> Result<(), BoxError> {
            *self = DateTime::parse_from_rfc3339(text)?.with_timezone(&Utc);
            Ok(())
        }
    }

    impl TextMarshaler for DateTime<Utc> {
        fn marshal_text(&self) -> Result<String, BoxError> {
            Ok(self.to_rfc3339())
        }
    }

    crate::extension!(NaiveDate: unmarshal, marshal, display);
    crate::extension!(NaiveDateTime: unmarshal, marshal, display);
    crate::extension!(DateTime<Utc>: unmarshal, marshal, display);
}
