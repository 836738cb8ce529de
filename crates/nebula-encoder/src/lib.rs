// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Storage-key and row encoder for the Nebula graph key-value layout.
//!
//! `nebula-encoder` produces the exact bytes the storage engine expects for
//! vertex keys, edge keys and property rows, so that data can be written into
//! the engine's key-value store without going through a storage daemon.
//!
//! The pieces, leaves first:
//!
//! - [`hash`]: MurmurHash64A partition assignment (1-based).
//! - [`rank`]: sign-flipped, big-endian edge ranks that sort like `i64`.
//! - [`KeyCodec`]: fixed-width vertex and edge key layouts.
//! - [`SchemaDescriptor`] + [`RowWriter`]: versioned, schema-driven rows.
//! - [`NebulaEncoder`]: resolves names through a [`MetadataAccessor`] and
//!   drives the above.
//!
//! # Byte Order
//!
//! Integer key fields and row scalars are written in an explicit
//! [`ByteOrder`] from [`EncoderOptions`], never the host's. It must match the
//! engine's on-disk order (little-endian on every platform the engine ships
//! for). Ranks are always big-endian.
//!
//! # Row Timestamp
//!
//! The engine may keep an 8-byte write timestamp after a row's string heap.
//! [`RowTimestamp`] controls it; the default omits it so that equal inputs
//! encode to equal bytes.
//!
//! # Default Values
//!
//! Column defaults are carried in the schema but not substituted: an omitted
//! non-nullable field fails the encode even if it declares a default.
#![forbid(unsafe_code)]

mod byte_order;
mod codec;
mod error;
pub mod hash;
mod key;
mod memory;
mod meta;
mod options;
pub mod rank;
mod row;
mod schema;
mod value;

pub use byte_order::ByteOrder;
pub use codec::NebulaEncoder;
pub use error::{EncodeError, RowError};
pub use hash::{hash64, partition_for, partition_for_hash, PARTITION_SEED};
pub use key::{
    edge_key_len, partition_word, vertex_key_len, KeyCodec, DEFAULT_EDGE_VERSION, EDGE_KEY_TYPE,
    VERTEX_KEY_TYPE,
};
pub use memory::{Catalog, MemoryCatalog, SpaceDef};
pub use meta::{
    ColumnDef, ColumnTypeDef, EdgeItem, HostAddr, MetadataAccessor, PartitionId, PartsAlloc,
    PropertyType, Schema, SpaceDescriptor, SpaceItem, TagItem, VidType,
};
pub use options::{EncoderOptions, RowTimestamp};
pub use rank::{decode_rank, encode_rank, RANK_LEN};
pub use row::{null_flag_bytes, version_width, RowWriter, ROW_HEADER_BASE};
pub use schema::{FieldDescriptor, SchemaDescriptor, MAX_SCHEMA_VERSION};
pub use value::{Date, DateTime, Time, Value};
