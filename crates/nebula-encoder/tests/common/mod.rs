// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared catalog fixture for integration tests.
#![allow(dead_code)]

use nebula_encoder::{
    ColumnDef, ColumnTypeDef, EdgeItem, MemoryCatalog, PropertyType, Schema, SpaceItem, TagItem,
    VidType,
};

/// Space `nba`: 32-byte vids over 100 partitions.
pub const SPACE: &str = "nba";
pub const VID_LEN: usize = 32;
pub const PARTS: u32 = 100;

/// `player(name STRING, age INT64 NULL)` at version 1, `follow(degree INT64
/// DEFAULT)` at version 0, and a `tiny` space with 4-byte vids.
pub fn catalog() -> MemoryCatalog {
    let mut mem = MemoryCatalog::new();
    mem.insert_space(
        SpaceItem {
            space_id: 1,
            name: SPACE.into(),
            vid_type: VidType::FixedString { length: VID_LEN },
        },
        PARTS,
        &[],
    );
    mem.insert_tag(
        SPACE,
        TagItem {
            tag_id: 2,
            tag_name: "player".into(),
            version: 1,
            schema: Schema::new(vec![
                ColumnDef::new("name", ColumnTypeDef::new(PropertyType::String)),
                ColumnDef::new("age", ColumnTypeDef::new(PropertyType::Int64)).nullable(),
            ]),
        },
    )
    .unwrap();
    mem.insert_edge(
        SPACE,
        EdgeItem {
            edge_type: 5,
            edge_name: "follow".into(),
            version: 0,
            schema: Schema::new(vec![ColumnDef::new(
                "degree",
                ColumnTypeDef::new(PropertyType::Int64),
            )
            .with_default(vec![0u8; 8])]),
        },
    )
    .unwrap();

    mem.insert_space(
        SpaceItem {
            space_id: 2,
            name: "tiny".into(),
            vid_type: VidType::FixedString { length: 4 },
        },
        10,
        &[],
    );
    mem.insert_tag(
        "tiny",
        TagItem {
            tag_id: 7,
            tag_name: "t".into(),
            version: 0,
            schema: Schema::default(),
        },
    )
    .unwrap();
    mem
}
