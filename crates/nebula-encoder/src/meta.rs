// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Metadata port and the catalog types it returns.
//!
//! The encoder never owns metadata. Spaces, partition allocations, tags and
//! edge types come from a [`MetadataAccessor`] injected at construction; in
//! production that is a client-side cache of the meta service, in tests an
//! in-memory [`MemoryCatalog`](crate::MemoryCatalog).
//!
//! # Absence Semantics
//!
//! Accessor methods return `None` for unknown names. Absence is not an error at
//! this layer; the encoder turns it into the matching `*NotFound` variant of
//! [`EncodeError`](crate::EncodeError).

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// 1-based partition number within a space.
pub type PartitionId = u32;

/// Partition number → hosts serving it. The partition count is its length.
pub type PartsAlloc = BTreeMap<PartitionId, Vec<HostAddr>>;

/// A storage host.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostAddr {
    /// Host name or address.
    pub host: String,
    /// Port.
    pub port: u16,
}

/// Property types a schema column (or a vid) may declare.
///
/// Only the scalar kinds are encodable; the rest exist so that a schema using
/// them is rejected with a clear error instead of failing to deserialize.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyType {
    /// Unset type marker.
    Unknown,
    /// Boolean, 1 byte.
    Bool,
    /// 64-bit signed integer.
    Int64,
    /// Integer vid marker.
    Vid,
    /// 32-bit IEEE float.
    Float,
    /// 64-bit IEEE float.
    Double,
    /// Variable-length string, stored out of line.
    String,
    /// Fixed-length string, stored inline and zero padded.
    FixedString,
    /// 8-bit signed integer.
    Int8,
    /// 16-bit signed integer.
    Int16,
    /// 32-bit signed integer.
    Int32,
    /// Seconds since the epoch as a 64-bit integer.
    Timestamp,
    /// Calendar date.
    Date,
    /// Date and time of day.
    #[serde(rename = "DATETIME")]
    DateTime,
    /// Time of day.
    Time,
    /// Geography shapes.
    Geography,
}

impl PropertyType {
    /// Bytes the type occupies in a row's fixed section.
    ///
    /// `declared_len` is only consulted for [`PropertyType::FixedString`].
    /// Returns `None` for types the row writer cannot encode.
    pub const fn fixed_size(self, declared_len: usize) -> Option<usize> {
        match self {
            Self::Bool | Self::Int8 => Some(1),
            Self::Int16 => Some(2),
            Self::Int32 | Self::Float | Self::Date => Some(4),
            Self::Int64 | Self::Double | Self::Timestamp => Some(8),
            // u32 heap offset + u32 length
            Self::String => Some(8),
            // hour, minute, sec, u32 microsec
            Self::Time => Some(7),
            // i16 year, month, day, hour, minute, sec, u32 microsec
            Self::DateTime => Some(11),
            Self::FixedString => Some(declared_len),
            Self::Unknown | Self::Vid | Self::Geography => None,
        }
    }

    /// Upper-case name as the meta service spells it.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Bool => "BOOL",
            Self::Int64 => "INT64",
            Self::Vid => "VID",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::String => "STRING",
            Self::FixedString => "FIXED_STRING",
            Self::Int8 => "INT8",
            Self::Int16 => "INT16",
            Self::Int32 => "INT32",
            Self::Timestamp => "TIMESTAMP",
            Self::Date => "DATE",
            Self::DateTime => "DATETIME",
            Self::Time => "TIME",
            Self::Geography => "GEOGRAPHY",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Column type: a property type plus an optional declared length.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnTypeDef {
    /// Property type.
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    /// Declared length; meaningful for `FIXED_STRING`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_length: Option<u16>,
}

impl ColumnTypeDef {
    /// A column type with no declared length.
    pub fn new(property_type: PropertyType) -> Self {
        Self {
            property_type,
            type_length: None,
        }
    }

    /// A `FIXED_STRING(len)` column type.
    pub fn fixed_string(len: u16) -> Self {
        Self {
            property_type: PropertyType::FixedString,
            type_length: Some(len),
        }
    }
}

/// One column of a raw tag/edge schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name, unique within the schema.
    pub name: String,
    /// Column type.
    #[serde(rename = "type")]
    pub column_type: ColumnTypeDef,
    /// Whether the column accepts null.
    #[serde(default)]
    pub nullable: bool,
    /// Serialized default expression, if the column declares one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Vec<u8>>,
}

impl ColumnDef {
    /// A non-nullable column without a default.
    pub fn new(name: impl Into<String>, column_type: ColumnTypeDef) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: false,
            default_value: None,
        }
    }

    /// Mark the column nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Attach a serialized default expression.
    pub fn with_default(mut self, default_value: impl Into<Vec<u8>>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }
}

/// Raw schema as stored by the meta service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Columns in declaration order.
    pub columns: Vec<ColumnDef>,
}

impl Schema {
    /// Schema over the given columns.
    pub fn new(columns: Vec<ColumnDef>) -> Self {
        Self { columns }
    }
}

/// How a space identifies its vertices.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VidType {
    /// Fixed-length byte string; shorter vids are zero padded.
    FixedString {
        /// Vid length in bytes.
        length: usize,
    },
    /// 64-bit integer vids. Not encodable by this crate.
    Int64,
}

impl VidType {
    /// Property type the meta service reports for this vid type.
    pub const fn property_type(&self) -> PropertyType {
        match self {
            Self::FixedString { .. } => PropertyType::FixedString,
            Self::Int64 => PropertyType::Int64,
        }
    }
}

/// Space definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceItem {
    /// Numeric space id.
    #[serde(default)]
    pub space_id: i32,
    /// Space name.
    pub name: String,
    /// Vertex identifier type.
    pub vid_type: VidType,
}

/// Tag definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagItem {
    /// Numeric tag id written into vertex keys.
    pub tag_id: i32,
    /// Tag name.
    pub tag_name: String,
    /// Schema version written into row headers.
    #[serde(default)]
    pub version: i64,
    /// Property schema.
    #[serde(default)]
    pub schema: Schema,
}

/// Edge type definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeItem {
    /// Numeric edge type written into edge keys; the sign marks direction.
    pub edge_type: i32,
    /// Edge name.
    pub edge_name: String,
    /// Schema version written into row headers.
    #[serde(default)]
    pub version: i64,
    /// Property schema.
    #[serde(default)]
    pub schema: Schema,
}

/// Per-space facts the key codec needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpaceDescriptor {
    /// Fixed vid length, > 0.
    pub vid_len: usize,
    /// Number of partitions, > 0.
    pub partition_count: usize,
}

/// Read-only view of cluster metadata.
///
/// Implementations must be safe for concurrent reads if the encoder is shared
/// across threads; the encoder adds no synchronization of its own. Each call
/// returns an owned snapshot.
pub trait MetadataAccessor {
    /// Space definition by name.
    fn space(&self, space: &str) -> Option<SpaceItem>;

    /// Partition allocation of a space.
    fn parts_alloc(&self, space: &str) -> Option<PartsAlloc>;

    /// Tag definition by name.
    fn tag(&self, space: &str, tag: &str) -> Option<TagItem>;

    /// Edge type definition by name.
    fn edge(&self, space: &str, edge: &str) -> Option<EdgeItem>;
}

impl<T: MetadataAccessor + ?Sized> MetadataAccessor for &T {
    fn space(&self, space: &str) -> Option<SpaceItem> {
        (**self).space(space)
    }

    fn parts_alloc(&self, space: &str) -> Option<PartsAlloc> {
        (**self).parts_alloc(space)
    }

    fn tag(&self, space: &str, tag: &str) -> Option<TagItem> {
        (**self).tag(space, tag)
    }

    fn edge(&self, space: &str, edge: &str) -> Option<EdgeItem> {
        (**self).edge(space, edge)
    }
}

impl<T: MetadataAccessor + ?Sized> MetadataAccessor for Arc<T> {
    fn space(&self, space: &str) -> Option<SpaceItem> {
        (**self).space(space)
    }

    fn parts_alloc(&self, space: &str) -> Option<PartsAlloc> {
        (**self).parts_alloc(space)
    }

    fn tag(&self, space: &str, tag: &str) -> Option<TagItem> {
        (**self).tag(space, tag)
    }

    fn edge(&self, space: &str, edge: &str) -> Option<EdgeItem> {
        (**self).edge(space, edge)
    }
}
