//! Field-mapping schema
//!
//! The schema is compiled once from a record type's field tags and never changes
//! afterwards. Field order is declaration order, which is also the column order
//! of written headers.

use crate::tag::{Segment, segments};
use crate::{Result, SchemaError};
use csva_record::{FieldMeta, Record, Shape};
use std::collections::HashSet;
use tracing::{debug, trace, warn};

/// Compiled mapping between one record field and its column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field identifier inside the record type
    pub name: &'static str,
    /// Column name matched against the header
    pub alias: String,
    /// Whether an absent column or empty cell is tolerated
    pub omit_empty: bool,
}

impl FieldDescriptor {
    /// Create a new field descriptor
    pub fn new(name: &'static str, alias: impl Into<String>) -> Self {
        Self {
            name,
            alias: alias.into(),
            omit_empty: false,
        }
    }

    /// Mark the field as omit-empty
    pub fn omit_empty(mut self) -> Self {
        self.omit_empty = true;
        self
    }
}

/// Ordered field list of one record type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    type_name: &'static str,
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    /// Compile the schema of `T` with implicit aliasing enabled.
    ///
    /// # Errors
    ///
    /// See [`SchemaBuilder::build`].
    pub fn for_record<T: Record>() -> Result<Self> {
        SchemaBuilder::new().build::<T>()
    }

    /// Record type name the schema was compiled from
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Field descriptors in declaration order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Header row values, in field order
    pub fn aliases(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.alias.as_str()).collect()
    }

    /// Get field descriptor by alias
    pub fn get_field(&self, alias: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.alias == alias)
    }

    /// Get the number of mapped fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the schema maps no field
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Compiles [`Schema`]s from record shapes
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaBuilder {
    no_implicit_alias: bool,
}

impl SchemaBuilder {
    /// Create a builder with implicit aliasing enabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop using field names as aliases for fields without one
    pub fn no_implicit_alias(mut self, no_implicit_alias: bool) -> Self {
        self.no_implicit_alias = no_implicit_alias;
        self
    }

    /// Compile the schema of record type `T`.
    ///
    /// # Errors
    ///
    /// The first offending field aborts the build: `NotAStruct` when `T` is not a
    /// struct, `InvalidTag` / `UnsupportedTag` for malformed tags, `AliasNotFound`
    /// when a field resolves to an empty alias.
    pub fn build<T: Record>(&self) -> Result<Schema> {
        self.build_shape(T::NAME, T::shape())
    }

    /// Compile a schema from an explicit shape.
    ///
    /// # Errors
    ///
    /// Same as [`SchemaBuilder::build`].
    pub fn build_shape(&self, type_name: &'static str, shape: Shape) -> Result<Schema> {
        let Shape::Struct(metas) = shape else {
            return Err(SchemaError::NotAStruct {
                type_name: type_name.to_string(),
                kind: shape.kind().to_string(),
            });
        };

        let mut fields = Vec::with_capacity(metas.len());
        let mut seen = HashSet::with_capacity(metas.len());
        for meta in metas {
            let Some(field) = self.compile_field(meta)? else {
                trace!(field = meta.name, "Skipping field");
                continue;
            };
            if !seen.insert(field.alias.clone()) {
                warn!(
                    record = type_name,
                    alias = %field.alias,
                    "Duplicate alias; the last matching header column wins on read"
                );
            }
            fields.push(field);
        }

        debug!(record = type_name, fields = fields.len(), "Built field schema");
        Ok(Schema { type_name, fields })
    }

    fn compile_field(&self, meta: &FieldMeta) -> Result<Option<FieldDescriptor>> {
        let parts: Vec<Segment<'_>> = segments(meta.tag.unwrap_or_default()).collect();
        if parts.contains(&Segment::Skip) {
            return Ok(None);
        }

        let mut explicit = None;
        let mut positional = None;
        let mut omit_empty = false;
        for part in parts {
            match part {
                Segment::Alias(alias) => explicit = Some(alias),
                Segment::OmitEmpty => omit_empty = true,
                Segment::Positional(alias) => {
                    if explicit.is_some() || positional.is_some() {
                        return Err(SchemaError::UnsupportedTag {
                            field: meta.name.to_string(),
                            tag: alias.to_string(),
                        });
                    }
                    positional = Some(alias);
                }
                Segment::Invalid(raw) => {
                    return Err(SchemaError::InvalidTag {
                        field: meta.name.to_string(),
                        tag: raw.to_string(),
                    });
                }
                Segment::Skip => {}
            }
        }

        let implicit = (!self.no_implicit_alias).then_some(meta.name);
        let alias = explicit.or(positional).or(implicit).unwrap_or_default();
        if alias.is_empty() {
            return Err(SchemaError::AliasNotFound {
                field: meta.name.to_string(),
            });
        }

        let mut field = FieldDescriptor::new(meta.name, alias);
        field.omit_empty = omit_empty;
        Ok(Some(field))
    }
}
