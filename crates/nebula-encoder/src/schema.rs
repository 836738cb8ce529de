// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Row layout derived from a raw schema and its version.
//!
//! A [`SchemaDescriptor`] fixes, for one schema version, where every field
//! lives in the row's fixed section and which null-flag bit it owns. It is
//! built per encode call and never mutated afterwards.

use std::collections::HashMap;

use crate::error::EncodeError;
use crate::meta::{PropertyType, Schema};

/// Largest version that fits the 7 version bytes a row header can carry.
pub const MAX_SCHEMA_VERSION: i64 = (1 << 56) - 1;

/// One field of a [`SchemaDescriptor`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    property_type: PropertyType,
    type_length: usize,
    nullable: bool,
    default_value: Option<Vec<u8>>,
    offset: usize,
    size: usize,
    null_slot: Option<usize>,
}

impl FieldDescriptor {
    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared property type.
    pub fn property_type(&self) -> PropertyType {
        self.property_type
    }

    /// Declared length, 0 when the type implies it.
    pub fn type_length(&self) -> usize {
        self.type_length
    }

    /// Whether the field accepts null.
    pub fn nullable(&self) -> bool {
        self.nullable
    }

    /// Declared default, recorded but never substituted by the writer.
    pub fn default_value(&self) -> Option<&[u8]> {
        self.default_value.as_deref()
    }

    /// `true` if a default is declared.
    pub fn has_default(&self) -> bool {
        self.default_value.is_some()
    }

    /// Offset within the fixed section.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes occupied in the fixed section.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Null-flag slot for nullable fields.
    pub fn null_slot(&self) -> Option<usize> {
        self.null_slot
    }
}

/// Versioned, ordered field layout of a tag or edge schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaDescriptor {
    version: i64,
    fields: Vec<FieldDescriptor>,
    by_name: HashMap<String, usize>,
    num_nullable: usize,
    fixed_size: usize,
}

impl SchemaDescriptor {
    /// Build the layout for `schema` at `version`.
    ///
    /// Fails with `UnsupportedConfiguration` for a version outside
    /// `0..=MAX_SCHEMA_VERSION`, a column type the row writer cannot encode, or
    /// a zero-length `FIXED_STRING`; with `InvalidArgument` for duplicate
    /// column names.
    pub fn from_schema(version: i64, schema: &Schema) -> Result<Self, EncodeError> {
        if !(0..=MAX_SCHEMA_VERSION).contains(&version) {
            return Err(EncodeError::UnsupportedConfiguration(format!(
                "schema version {version} does not fit in a row header"
            )));
        }

        let mut fields = Vec::with_capacity(schema.columns.len());
        let mut by_name = HashMap::with_capacity(schema.columns.len());
        let mut offset = 0usize;
        let mut num_nullable = 0usize;

        for (index, col) in schema.columns.iter().enumerate() {
            let property_type = col.column_type.property_type;
            let type_length = col.column_type.type_length.map_or(0, usize::from);
            let size = property_type
                .fixed_size(type_length)
                .filter(|size| *size > 0)
                .ok_or_else(|| {
                    EncodeError::UnsupportedConfiguration(format!(
                        "column `{}` has unsupported type {property_type}",
                        col.name
                    ))
                })?;

            if by_name.insert(col.name.clone(), index).is_some() {
                return Err(EncodeError::InvalidArgument(format!(
                    "duplicate column `{}` in schema",
                    col.name
                )));
            }

            let null_slot = col.nullable.then(|| {
                num_nullable += 1;
                num_nullable - 1
            });

            fields.push(FieldDescriptor {
                name: col.name.clone(),
                property_type,
                type_length,
                nullable: col.nullable,
                default_value: col.default_value.clone(),
                offset,
                size,
                null_slot,
            });
            offset += size;
        }

        Ok(Self {
            version,
            fields,
            by_name,
            num_nullable,
            fixed_size: offset,
        })
    }

    /// Schema version.
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// `true` when the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Position of `name`.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.field_index(name).map(|i| &self.fields[i])
    }

    /// Number of nullable fields, i.e. null-flag bits in a row.
    pub fn num_nullable_fields(&self) -> usize {
        self.num_nullable
    }

    /// Total width of the fixed section.
    pub fn fixed_size(&self) -> usize {
        self.fixed_size
    }
}
