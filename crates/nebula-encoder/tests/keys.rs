// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Key layout properties and metadata-resolved keys.
#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use nebula_encoder::{
    edge_key_len, encode_rank, partition_for, vertex_key_len, ByteOrder, EncodeError,
    EncoderOptions, KeyCodec, NebulaEncoder, DEFAULT_EDGE_VERSION,
};
use proptest::prelude::*;

fn vid_and_len() -> impl Strategy<Value = (Vec<u8>, usize)> {
    (1usize..=64).prop_flat_map(|len| (prop::collection::vec(any::<u8>(), 0..=len), Just(len)))
}

proptest! {
    #[test]
    fn vertex_key_is_fixed_width_and_zero_padded(
        (vid, vid_len) in vid_and_len(),
        part in 1u32..=0x00FF_FFFF,
        tag_id in any::<i32>(),
    ) {
        let key = KeyCodec::default().vertex_key(vid_len, part, &vid, tag_id).unwrap();
        prop_assert_eq!(key.len(), vertex_key_len(vid_len));
        prop_assert_eq!(&key[..4], &((part << 8) | 1).to_le_bytes()[..]);
        prop_assert_eq!(&key[4..4 + vid.len()], &vid[..]);
        prop_assert!(key[4 + vid.len()..4 + vid_len].iter().all(|b| *b == 0));
        prop_assert_eq!(&key[4 + vid_len..], &tag_id.to_le_bytes()[..]);
    }

    #[test]
    fn edge_key_fields_land_at_fixed_offsets(
        (src, vid_len) in vid_and_len(),
        dst_seed in prop::collection::vec(any::<u8>(), 0..=64),
        part in 1u32..=0x00FF_FFFF,
        edge_type in any::<i32>(),
        rank in any::<i64>(),
    ) {
        let dst = &dst_seed[..dst_seed.len().min(vid_len)];
        let key = KeyCodec::default()
            .edge_key_default_version(vid_len, part, &src, edge_type, rank, dst)
            .unwrap();
        prop_assert_eq!(key.len(), edge_key_len(vid_len));

        let mut at = 0;
        prop_assert_eq!(&key[at..at + 4], &((part << 8) | 2).to_le_bytes()[..]);
        at += 4;
        prop_assert_eq!(&key[at..at + src.len()], &src[..]);
        at += vid_len;
        prop_assert_eq!(&key[at..at + 4], &edge_type.to_le_bytes()[..]);
        at += 4;
        prop_assert_eq!(&key[at..at + 8], &encode_rank(rank)[..]);
        at += 8;
        prop_assert_eq!(&key[at..at + dst.len()], dst);
        prop_assert!(key[at + dst.len()..at + vid_len].iter().all(|b| *b == 0));
        at += vid_len;
        prop_assert_eq!(key[at], DEFAULT_EDGE_VERSION);
    }

    #[test]
    fn byte_orders_differ_only_in_word_fields(
        (vid, vid_len) in vid_and_len(),
        part in 1u32..=0x00FF_FFFF,
        tag_id in any::<i32>(),
    ) {
        let le = KeyCodec::new(ByteOrder::Little).vertex_key(vid_len, part, &vid, tag_id).unwrap();
        let be = KeyCodec::new(ByteOrder::Big).vertex_key(vid_len, part, &vid, tag_id).unwrap();
        let swap = |b: &[u8]| b.iter().rev().copied().collect::<Vec<_>>();
        prop_assert_eq!(swap(&le[..4]), be[..4].to_vec());
        prop_assert_eq!(&le[4..4 + vid_len], &be[4..4 + vid_len]);
        prop_assert_eq!(swap(&le[4 + vid_len..]), be[4 + vid_len..].to_vec());
    }

    #[test]
    fn oversized_vids_never_encode(vid_len in 1usize..=32, extra in 1usize..=8) {
        let vid = vec![b'x'; vid_len + extra];
        let err = KeyCodec::default().vertex_key(vid_len, 1, &vid, 0).unwrap_err();
        prop_assert_eq!(err, EncodeError::VidTooLong { actual: vid_len + extra, vid_len });
    }
}

#[test]
fn vid_of_exactly_vid_len_is_accepted() {
    let enc = NebulaEncoder::new(common::catalog());
    let key = enc.vertex_key("tiny", b"abcd", "t").unwrap();
    assert_eq!(&key[4..8], b"abcd");
    assert_eq!(
        enc.vertex_key("tiny", b"abcde", "t"),
        Err(EncodeError::VidTooLong {
            actual: 5,
            vid_len: 4
        })
    );
}

#[test]
fn resolved_vertex_key_uses_tag_id_and_partition() {
    let enc = NebulaEncoder::new(common::catalog());
    let key = enc
        .vertex_key(common::SPACE, b"Tim Duncan", "player")
        .unwrap();
    assert_eq!(key.len(), vertex_key_len(common::VID_LEN));
    // murmur("Tim Duncan") % 100 + 1 == 38
    assert_eq!(&key[..4], &[0x01, 38, 0, 0]);
    assert_eq!(&key[4..14], b"Tim Duncan");
    assert_eq!(&key[36..], &[2, 0, 0, 0]);
}

#[test]
fn resolved_edge_key_takes_partition_from_source() {
    let enc = NebulaEncoder::new(common::catalog());
    let key = enc
        .edge_key(common::SPACE, b"player100", "follow", -1, b"Tim Duncan")
        .unwrap();
    let part = partition_for(b"player100", common::PARTS as usize).unwrap();
    assert_eq!(part, 57);
    assert_eq!(&key[..4], &((part << 8) | 2).to_le_bytes());
    assert_eq!(&key[36..40], &5i32.to_le_bytes());
    assert_eq!(&key[40..48], &[0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
    assert_eq!(&key[48..58], b"Tim Duncan");
    assert_eq!(key.last(), Some(&DEFAULT_EDGE_VERSION));
}

#[test]
fn big_endian_option_flows_into_keys() {
    let enc = NebulaEncoder::with_options(
        common::catalog(),
        EncoderOptions::with_byte_order(ByteOrder::Big),
    );
    let key = enc
        .vertex_key(common::SPACE, b"Tim Duncan", "player")
        .unwrap();
    assert_eq!(&key[..4], &[0, 0, 38, 0x01]);
    assert_eq!(&key[36..], &[0, 0, 0, 2]);
}

#[test]
fn unknown_names_fail_lookups() {
    let enc = NebulaEncoder::new(common::catalog());
    assert!(enc.vertex_key("nope", b"v", "player").unwrap_err().is_not_found());
    assert!(matches!(
        enc.vertex_key(common::SPACE, b"v", "coach"),
        Err(EncodeError::TagNotFound { .. })
    ));
    assert!(matches!(
        enc.edge_key(common::SPACE, b"a", "likes", 0, b"b"),
        Err(EncodeError::EdgeNotFound { .. })
    ));
}

#[test]
fn fields_read_back_in_the_order_they_were_written() {
    for order in [ByteOrder::Little, ByteOrder::Big] {
        let key = KeyCodec::new(order).vertex_key(8, 0x0012_3456, b"v", -42).unwrap();
        let word: [u8; 4] = key[..4].try_into().unwrap();
        let tag: [u8; 4] = key[12..].try_into().unwrap();
        assert_eq!(order.read_u32(word), 0x1234_5601);
        assert_eq!(order.read_i32(tag), -42);
    }
}
