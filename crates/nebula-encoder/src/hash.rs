// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Vertex-to-partition assignment.
//!
//! The storage engine places a vertex (and every out-edge of it) on partition
//! `murmur64(vid) % partition_count + 1`. The hash is MurmurHash2 in its
//! 64-bit `64A` form over the raw vid bytes, seeded with [`PARTITION_SEED`].
//! Partitions are numbered from 1.

use crate::meta::PartitionId;

/// Seed the storage engine uses when hashing vids.
pub const PARTITION_SEED: u32 = 0xC70F_6907;

const MURMUR_M: u64 = 0xc6a4_a793_5bd1_e995;
const MURMUR_R: u32 = 47;

/// MurmurHash64A of `data` with the given 32-bit seed.
///
/// Eight-byte blocks are read little-endian regardless of the host, so the
/// result is identical on every platform.
pub fn hash64(data: &[u8], seed: u32) -> u64 {
    let mut h = u64::from(seed) ^ (data.len() as u64).wrapping_mul(MURMUR_M);

    let mut blocks = data.chunks_exact(8);
    for block in &mut blocks {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(block);
        let mut k = u64::from_le_bytes(raw);
        k = k.wrapping_mul(MURMUR_M);
        k ^= k >> MURMUR_R;
        k = k.wrapping_mul(MURMUR_M);

        h ^= k;
        h = h.wrapping_mul(MURMUR_M);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        for (i, byte) in tail.iter().enumerate() {
            h ^= u64::from(*byte) << (8 * i);
        }
        h = h.wrapping_mul(MURMUR_M);
    }

    h ^= h >> MURMUR_R;
    h = h.wrapping_mul(MURMUR_M);
    h ^= h >> MURMUR_R;
    h
}

/// Map an already-computed vid hash onto `1..=partition_count`.
///
/// Returns `None` when `partition_count` is zero.
pub fn partition_for_hash(hash: u64, partition_count: usize) -> Option<PartitionId> {
    let count = u64::try_from(partition_count).ok().filter(|c| *c > 0)?;
    PartitionId::try_from(hash % count + 1).ok()
}

/// Partition owning `vid` in a space with `partition_count` partitions.
///
/// Returns `None` when `partition_count` is zero.
pub fn partition_for(vid: &[u8], partition_count: usize) -> Option<PartitionId> {
    partition_for_hash(hash64(vid, PARTITION_SEED), partition_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_with_zero_seed_hashes_to_zero() {
        assert_eq!(hash64(b"", 0), 0);
    }

    #[test]
    fn reference_vectors() {
        assert_eq!(hash64(b"a", 0), 0x0717_17d2_d36b_6b11);
        assert_eq!(hash64(b"", PARTITION_SEED), 0x553e_9390_1e46_2a6e);
        assert_eq!(hash64(b"Tim Duncan", PARTITION_SEED), 0x4e94_3923_fa0c_59e9);
        // exactly one block, no tail
        assert_eq!(hash64(b"12345678", PARTITION_SEED), 0x8c5b_90a3_3a04_dca5);
        // one block plus a four byte tail
        assert_eq!(hash64(b"hello world!", PARTITION_SEED), 0x5b83_cb3a_55a9_669f);
    }

    #[test]
    fn partitions_are_one_based() {
        assert_eq!(partition_for(b"Tim Duncan", 100), Some(38));
        assert_eq!(partition_for(b"player100", 10), Some(7));
        assert_eq!(partition_for(b"anything", 1), Some(1));
    }

    #[test]
    fn high_bit_hashes_use_unsigned_modulo() {
        // 0x8c5b... is negative as i64; a signed modulo would pick another part.
        assert_eq!(partition_for(b"12345678", 100), Some(86));
    }

    #[test]
    fn zero_partitions_has_no_owner() {
        assert_eq!(partition_for(b"a", 0), None);
        assert_eq!(partition_for_hash(42, 0), None);
    }
}
