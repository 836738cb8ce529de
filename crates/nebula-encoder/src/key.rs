// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Vertex and edge key layouts.
//!
//! ```text
//! vertex: [part << 8 | 0x01 : 4][vid, zero padded : vid_len][tag_id : 4]
//! edge:   [part << 8 | 0x02 : 4][src, zero padded : vid_len][edge_type : 4]
//!         [rank, sign-flipped BE : 8][dst, zero padded : vid_len][version : 1]
//! ```
//!
//! The 4-byte fields follow the codec's [`ByteOrder`]; the rank is always
//! big-endian. Identifiers longer than `vid_len` are rejected before any
//! output is allocated.

use crate::byte_order::{ByteOrder, OrderedWriter};
use crate::error::EncodeError;
use crate::meta::PartitionId;
use crate::rank::{encode_rank, RANK_LEN};

/// Low byte of the leading word of a vertex key.
pub const VERTEX_KEY_TYPE: u32 = 0x0000_0001;
/// Low byte of the leading word of an edge key.
pub const EDGE_KEY_TYPE: u32 = 0x0000_0002;
/// Version placeholder written by [`KeyCodec::edge_key_default_version`].
pub const DEFAULT_EDGE_VERSION: u8 = 1;

const PARTITION_WORD_LEN: usize = 4;
const TAG_ID_LEN: usize = 4;
const EDGE_TYPE_LEN: usize = 4;
const EDGE_VERSION_LEN: usize = 1;

/// Length of a vertex key for the given vid length.
pub const fn vertex_key_len(vid_len: usize) -> usize {
    PARTITION_WORD_LEN + vid_len + TAG_ID_LEN
}

/// Length of an edge key for the given vid length.
pub const fn edge_key_len(vid_len: usize) -> usize {
    PARTITION_WORD_LEN + EDGE_TYPE_LEN + RANK_LEN + EDGE_VERSION_LEN + 2 * vid_len
}

/// Leading word of a key: partition in the upper 24 bits, key type below.
pub const fn partition_word(partition: PartitionId, key_type: u32) -> u32 {
    (partition << 8) | key_type
}

/// Builds storage keys in a fixed byte order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyCodec {
    order: ByteOrder,
}

impl KeyCodec {
    /// Codec writing multi-byte fields in `order`.
    pub const fn new(order: ByteOrder) -> Self {
        Self { order }
    }

    /// Byte order of the 4-byte fields.
    pub const fn byte_order(&self) -> ByteOrder {
        self.order
    }

    /// Key of a vertex's tag row.
    pub fn vertex_key(
        &self,
        vid_len: usize,
        partition: PartitionId,
        vid: &[u8],
        tag_id: i32,
    ) -> Result<Vec<u8>, EncodeError> {
        check_vid(vid, vid_len)?;

        let mut w = OrderedWriter::with_capacity(self.order, vertex_key_len(vid_len));
        w.write_u32(partition_word(partition, VERTEX_KEY_TYPE));
        w.write_zero_padded(vid, vid_len);
        w.write_i32(tag_id);
        Ok(w.into_vec())
    }

    /// Key of an edge row with an explicit version placeholder byte.
    #[allow(clippy::too_many_arguments)] // mirrors the on-disk field list
    pub fn edge_key(
        &self,
        vid_len: usize,
        partition: PartitionId,
        src: &[u8],
        edge_type: i32,
        rank: i64,
        dst: &[u8],
        version: u8,
    ) -> Result<Vec<u8>, EncodeError> {
        check_vid(src, vid_len)?;
        check_vid(dst, vid_len)?;

        let mut w = OrderedWriter::with_capacity(self.order, edge_key_len(vid_len));
        w.write_u32(partition_word(partition, EDGE_KEY_TYPE));
        w.write_zero_padded(src, vid_len);
        w.write_i32(edge_type);
        w.write_bytes(&encode_rank(rank));
        w.write_zero_padded(dst, vid_len);
        w.write_u8(version);
        Ok(w.into_vec())
    }

    /// [`edge_key`](Self::edge_key) with [`DEFAULT_EDGE_VERSION`].
    pub fn edge_key_default_version(
        &self,
        vid_len: usize,
        partition: PartitionId,
        src: &[u8],
        edge_type: i32,
        rank: i64,
        dst: &[u8],
    ) -> Result<Vec<u8>, EncodeError> {
        self.edge_key(vid_len, partition, src, edge_type, rank, dst, DEFAULT_EDGE_VERSION)
    }
}

fn check_vid(vid: &[u8], vid_len: usize) -> Result<(), EncodeError> {
    if vid.len() > vid_len {
        return Err(EncodeError::VidTooLong {
            actual: vid.len(),
            vid_len,
        });
    }
    Ok(())
}
