//! Record reflection

use crate::field::{FieldMut, FieldRef};

/// Declaration-order metadata of one struct field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMeta {
    /// Field identifier inside the record type
    pub name: &'static str,
    /// Mapping annotation, `None` when the field carries none
    pub tag: Option<&'static str>,
}

impl FieldMeta {
    pub const fn new(name: &'static str, tag: Option<&'static str>) -> Self {
        Self { name, tag }
    }
}

/// Shape of a record type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A struct with its fields in declaration order
    Struct(&'static [FieldMeta]),
    /// Anything that is not a struct, named by its kind
    Scalar(&'static str),
}

impl Shape {
    /// Kind name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Struct(_) => "struct",
            Shape::Scalar(kind) => *kind,
        }
    }
}

/// A type that can be mapped to and from a tabular row.
///
/// Usually implemented with [`record!`](crate::record!). Field access goes by the
/// field's declared name; `None` means the record has no such field.
pub trait Record: Default {
    /// Type name used in diagnostics.
    const NAME: &'static str;

    fn shape() -> Shape;

    fn field(&self, name: &str) -> Option<FieldRef<'_>>;

    fn field_mut(&mut self, name: &str) -> Option<FieldMut<'_>>;
}

macro_rules! impl_scalar_record {
    ($($ty:ty => $kind:literal),* $(,)?) => {
        $(
            impl Record for $ty {
                const NAME: &'static str = $kind;

                fn shape() -> Shape {
                    Shape::Scalar($kind)
                }

                fn field(&self, _name: &str) -> Option<FieldRef<'_>> {
                    None
                }

                fn field_mut(&mut self, _name: &str) -> Option<FieldMut<'_>> {
                    None
                }
            }
        )*
    };
}

impl_scalar_record! {
    String => "string",
    bool => "bool",
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    isize => "isize",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    usize => "usize",
    f32 => "f32",
    f64 => "f64",
}

/// Declare a struct and implement [`Record`] for it.
///
/// Each field may be followed by `=> "<tag>"`, its mapping annotation. The tag is
/// a comma-separated list of `alias=<name>`, `omitempty`, a bare `<name>` (the
/// positional alias) or `-` (exclude the field). Fields without a tag are mapped
/// under their own name unless implicit aliasing is disabled.
///
/// ```rust
/// use csva_record::{Record, Shape, record};
///
/// record! {
///     #[derive(Debug, Default)]
///     pub struct Order {
///         /// Order number
///         pub id: u64 => "order_id",
///         pub note: Option<String> => "alias=note,omitempty",
///         pub internal: bool => "-",
///         pub total: f64,
///     }
/// }
///
/// assert_eq!(Order::NAME, "Order");
/// assert!(matches!(Order::shape(), Shape::Struct(fields) if fields.len() == 4));
/// ```
#[macro_export]
macro_rules! record {
    (@tag) => {
        None
    };

    (@tag $tag:literal) => {
        Some($tag)
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty $(=> $tag:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::Record for $name {
            const NAME: &'static str = stringify!($name);

            fn shape() -> $crate::Shape {
                const FIELDS: &[$crate::FieldMeta] = &[
                    $(
                        $crate::FieldMeta::new(
                            stringify!($field),
                            $crate::record!(@tag $($tag)?),
                        ),
                    )*
                ];
                $crate::Shape::Struct(FIELDS)
            }

            fn field(&self, name: &str) -> Option<$crate::FieldRef<'_>> {
                $(
                    if name == stringify!($field) {
                        return Some($crate::Field::as_field(&self.$field));
                    }
                )*
                None
            }

            fn field_mut(&mut self, name: &str) -> Option<$crate::FieldMut<'_>> {
                $(
                    if name == stringify!($field) {
                        return Some($crate::Field::as_field_mut(&mut self.$field));
                    }
                )*
                None
            }
        }
    };
}
