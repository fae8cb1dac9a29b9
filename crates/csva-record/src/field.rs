//! Typed field views
//!
//! Every mappable field type exposes a read view ([`FieldRef`]) and a write view
//! ([`FieldMut`]). The set of variants is closed: scalars carry their bit width in
//! the variant, optionals recurse into their pointee, and everything else goes
//! through the [`Extension`] capability check.

use crate::extension::Extension;

/// Read view of a field value
#[derive(Clone, Copy)]
pub enum FieldRef<'a> {
    Text(&'a str),
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Bool(bool),
    /// `None` when the optional holds no value.
    Optional(Option<&'a dyn Field>),
    Extension(&'a dyn Extension),
}

/// Write view of a field value
pub enum FieldMut<'a> {
    Text(&'a mut String),
    I8(&'a mut i8),
    I16(&'a mut i16),
    I32(&'a mut i32),
    I64(&'a mut i64),
    Isize(&'a mut isize),
    U8(&'a mut u8),
    U16(&'a mut u16),
    U32(&'a mut u32),
    U64(&'a mut u64),
    Usize(&'a mut usize),
    F32(&'a mut f32),
    F64(&'a mut f64),
    Bool(&'a mut bool),
    Optional(&'a mut dyn OptionalSlot),
    Extension(&'a mut dyn Extension),
}

impl FieldRef<'_> {
    /// Name of the value kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldRef::Text(_) => "string",
            FieldRef::Signed(_) => "int",
            FieldRef::Unsigned(_) => "uint",
            FieldRef::Float(_) => "float",
            FieldRef::Bool(_) => "bool",
            FieldRef::Optional(_) => "optional",
            FieldRef::Extension(ext) => ext.type_name(),
        }
    }
}

impl FieldMut<'_> {
    /// Name of the value kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldMut::Text(_) => "string",
            FieldMut::I8(_) => "i8",
            FieldMut::I16(_) => "i16",
            FieldMut::I32(_) => "i32",
            FieldMut::I64(_) => "i64",
            FieldMut::Isize(_) => "isize",
            FieldMut::U8(_) => "u8",
            FieldMut::U16(_) => "u16",
            FieldMut::U32(_) => "u32",
            FieldMut::U64(_) => "u64",
            FieldMut::Usize(_) => "usize",
            FieldMut::F32(_) => "f32",
            FieldMut::F64(_) => "f64",
            FieldMut::Bool(_) => "bool",
            FieldMut::Optional(_) => "optional",
            FieldMut::Extension(ext) => ext.type_name(),
        }
    }
}

/// A value that can be stored in a record field
pub trait Field {
    /// Borrow the value for encoding.
    fn as_field(&self) -> FieldRef<'_>;

    /// Borrow the value for decoding in place.
    fn as_field_mut(&mut self) -> FieldMut<'_>;
}

/// Storage of an optional field, allocated on first write
pub trait OptionalSlot {
    /// Fill the slot with a default pointee if it is empty and return it.
    fn get_or_insert_default(&mut self) -> FieldMut<'_>;
}

impl<T: Field + Default> OptionalSlot for Option<T> {
    fn get_or_insert_default(&mut self) -> FieldMut<'_> {
        self.get_or_insert_with(T::default).as_field_mut()
    }
}

impl<T: Field + Default> Field for Option<T> {
    fn as_field(&self) -> FieldRef<'_> {
        FieldRef::Optional(self.as_ref().map(|value| value as &dyn Field))
    }

    fn as_field_mut(&mut self) -> FieldMut<'_> {
        FieldMut::Optional(self)
    }
}

impl Field for String {
    fn as_field(&self) -> FieldRef<'_> {
        FieldRef::Text(self)
    }

    fn as_field_mut(&mut self) -> FieldMut<'_> {
        FieldMut::Text(self)
    }
}

impl Field for bool {
    fn as_field(&self) -> FieldRef<'_> {
        FieldRef::Bool(*self)
    }

    fn as_field_mut(&mut self) -> FieldMut<'_> {
        FieldMut::Bool(self)
    }
}

macro_rules! impl_numeric_field {
    ($($ty:ty => $view:ident($widen:ty), $variant:ident;)*) => {
        $(
            impl Field for $ty {
                fn as_field(&self) -> FieldRef<'_> {
                    FieldRef::$view(*self as $widen)
                }

                fn as_field_mut(&mut self) -> FieldMut<'_> {
                    FieldMut::$variant(self)
                }
            }
        )*
    };
}

impl_numeric_field! {
    i8 => Signed(i64), I8;
    i16 => Signed(i64), I16;
    i32 => Signed(i64), I32;
    i64 => Signed(i64), I64;
    isize => Signed(i64), Isize;
    u8 => Unsigned(u64), U8;
    u16 => Unsigned(u64), U16;
    u32 => Unsigned(u64), U32;
    u64 => Unsigned(u64), U64;
    usize => Unsigned(u64), Usize;
    f32 => Float(f64), F32;
    f64 => Float(f64), F64;
}
