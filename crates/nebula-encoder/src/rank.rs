// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Order-preserving edge rank encoding.
//!
//! Keys are compared as unsigned byte strings. Flipping the sign bit maps
//! `i64::MIN..=i64::MAX` onto `0..=u64::MAX` monotonically, and big-endian
//! serialization makes byte-wise order match numeric order. The rank is the
//! only key field that ignores the configured [`ByteOrder`](crate::ByteOrder).

/// Width of an encoded rank in bytes.
pub const RANK_LEN: usize = 8;

/// Encode `rank` so that byte-wise comparison follows signed order.
#[inline]
pub fn encode_rank(rank: i64) -> [u8; RANK_LEN] {
    (rank ^ i64::MIN).to_be_bytes()
}

/// Inverse of [`encode_rank`].
#[inline]
pub fn decode_rank(bytes: [u8; RANK_LEN]) -> i64 {
    i64::from_be_bytes(bytes) ^ i64::MIN
}
