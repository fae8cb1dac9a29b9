//! Value codec
//!
//! [`decode`] parses one cell into a field, [`encode`] renders one field into a
//! cell. Dispatch happens on the field's value kind; the extension kind falls back
//! to the capabilities the type registered.

use crate::field::{FieldMut, FieldRef};
use crate::{CodecError, Result};
use std::fmt::Display;
use std::str::FromStr;
use tracing::trace;

/// Decode `value` into the field behind `field`.
///
/// # Errors
///
/// Returns `ParsingType` when a scalar cannot be parsed at the field's width,
/// `UnprocessableType` when an extension type cannot be populated from text, or
/// the unmarshaler's own error verbatim.
pub fn decode(field: FieldMut<'_>, value: &str) -> Result<()> {
    match field {
        FieldMut::Text(slot) => {
            slot.clear();
            slot.push_str(value);
        }
        FieldMut::I8(slot) => *slot = parse_scalar("i8", value)?,
        FieldMut::I16(slot) => *slot = parse_scalar("i16", value)?,
        FieldMut::I32(slot) => *slot = parse_scalar("i32", value)?,
        FieldMut::I64(slot) => *slot = parse_scalar("i64", value)?,
        FieldMut::Isize(slot) => *slot = parse_scalar("isize", value)?,
        FieldMut::U8(slot) => *slot = parse_scalar("u8", value)?,
        FieldMut::U16(slot) => *slot = parse_scalar("u16", value)?,
        FieldMut::U32(slot) => *slot = parse_scalar("u32", value)?,
        FieldMut::U64(slot) => *slot = parse_scalar("u64", value)?,
        FieldMut::Usize(slot) => *slot = parse_scalar("usize", value)?,
        FieldMut::F32(slot) => *slot = parse_scalar("f32", value)?,
        FieldMut::F64(slot) => *slot = parse_scalar("f64", value)?,
        FieldMut::Bool(slot) => *slot = parse_bool(value)?,
        FieldMut::Optional(slot) => return decode(slot.get_or_insert_default(), value),
        FieldMut::Extension(ext) => {
            let kind = ext.type_name();
            let Some(unmarshaler) = ext.as_unmarshaler() else {
                return Err(CodecError::unprocessable(kind));
            };
            trace!(kind, "Unmarshaling extension value");
            unmarshaler
                .unmarshal_text(value)
                .map_err(CodecError::Custom)?;
        }
    }
    Ok(())
}

/// Encode the field behind `field` as text.
///
/// Floats use fixed notation with six fractional digits. An absent optional
/// encodes as the empty string.
///
/// # Errors
///
/// Returns `UnprocessableType` when an extension type has neither a marshaler nor
/// a display rendering, or the marshaler's own error verbatim.
pub fn encode(field: FieldRef<'_>) -> Result<String> {
    match field {
        FieldRef::Text(text) => Ok(text.to_string()),
        FieldRef::Signed(value) => Ok(value.to_string()),
        FieldRef::Unsigned(value) => Ok(value.to_string()),
        FieldRef::Float(value) => Ok(format!("{value:.6}")),
        FieldRef::Bool(value) => Ok(value.to_string()),
        FieldRef::Optional(None) => Ok(String::new()),
        FieldRef::Optional(Some(inner)) => encode(inner.as_field()),
        FieldRef::Extension(ext) => {
            if let Some(marshaler) = ext.as_marshaler() {
                return marshaler.marshal_text().map_err(CodecError::Custom);
            }
            if let Some(display) = ext.as_display() {
                return Ok(display.to_string());
            }
            Err(CodecError::unprocessable(ext.type_name()))
        }
    }
}

fn parse_scalar<V>(kind: &'static str, value: &str) -> Result<V>
where
    V: FromStr,
    V::Err: Display,
{
    value
        .parse()
        .map_err(|err| CodecError::parsing(kind, value, err))
}

/// Boolean literals accepted on input, matching the conventional set.
fn parse_bool(value: &str) -> Result<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(CodecError::parsing("bool", value, "invalid syntax")),
    }
}
