// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! End-to-end row encoding through the metadata-resolving encoder.
#![allow(clippy::unwrap_used)]

mod common;

use std::sync::Arc;

use nebula_encoder::{
    ByteOrder, ColumnDef, ColumnTypeDef, DateTime, EdgeItem, EncodeError, EncoderOptions,
    MemoryCatalog, MetadataAccessor, NebulaEncoder, PropertyType, RowError, RowTimestamp, Schema,
    SchemaDescriptor, TagItem, Time, Value,
};
use proptest::prelude::*;

fn player_row(name: &str, age: i64) -> Vec<u8> {
    let mut row = vec![0x09, 0x01, 0x00];
    row.extend_from_slice(&19u32.to_le_bytes());
    row.extend_from_slice(&u32::try_from(name.len()).unwrap().to_le_bytes());
    row.extend_from_slice(&age.to_le_bytes());
    row.extend_from_slice(name.as_bytes());
    row
}

#[test]
fn tag_row_golden() {
    let enc = NebulaEncoder::new(common::catalog());
    let row = enc
        .encode_tag(
            common::SPACE,
            "player",
            &["name", "age"],
            &[Value::from("Tim Duncan"), Value::Int(42)],
        )
        .unwrap();
    assert_eq!(row, player_row("Tim Duncan", 42));
}

#[test]
fn property_order_does_not_matter() {
    let enc = NebulaEncoder::new(common::catalog());
    let row = enc
        .encode_tag(
            common::SPACE,
            "player",
            &["age", "name"],
            &[Value::Int(42), Value::from("Tim Duncan")],
        )
        .unwrap();
    assert_eq!(row, player_row("Tim Duncan", 42));
}

#[test]
fn omitted_nullable_field_is_flagged_null() {
    let enc = NebulaEncoder::new(common::catalog());
    let omitted = enc
        .encode_tag(common::SPACE, "player", &["name"], &[Value::from("x")])
        .unwrap();
    let explicit = enc
        .encode_tag(
            common::SPACE,
            "player",
            &["name", "age"],
            &[Value::from("x"), Value::Null],
        )
        .unwrap();
    assert_eq!(omitted, explicit);
    assert_eq!(omitted[2], 0x80);
    assert_eq!(&omitted[11..19], &[0; 8]);
}

#[test]
fn big_endian_rows() {
    let enc = NebulaEncoder::with_options(
        common::catalog(),
        EncoderOptions::with_byte_order(ByteOrder::Big),
    );
    let row = enc
        .encode_edge(common::SPACE, "follow", &["degree"], &[Value::Int(95)])
        .unwrap();
    assert_eq!(row, vec![0x08, 0, 0, 0, 0, 0, 0, 0, 95]);
}

#[test]
fn temporal_fields_pack_microsec_after_sec() {
    let mut mem = common::catalog();
    mem.insert_tag(
        common::SPACE,
        TagItem {
            tag_id: 3,
            tag_name: "clock".into(),
            version: 0,
            schema: Schema::new(vec![
                ColumnDef::new("t", ColumnTypeDef::new(PropertyType::Time)),
                ColumnDef::new("dt", ColumnTypeDef::new(PropertyType::DateTime)),
            ]),
        },
    )
    .unwrap();
    let enc = NebulaEncoder::new(mem);
    let row = enc
        .encode_tag(
            common::SPACE,
            "clock",
            &["t", "dt"],
            &[
                Value::from(Time {
                    hour: 1,
                    minute: 2,
                    sec: 3,
                    microsec: 0x0A0B_0C0D,
                }),
                Value::from(DateTime {
                    year: 2000,
                    month: 1,
                    day: 2,
                    hour: 3,
                    minute: 4,
                    sec: 5,
                    microsec: 6,
                }),
            ],
        )
        .unwrap();
    assert_eq!(
        row,
        vec![
            0x08, // header, version 0
            1, 2, 3, 0x0D, 0x0C, 0x0B, 0x0A, // TIME: 7 bytes
            0xD0, 0x07, 1, 2, 3, 4, 5, 6, 0, 0, 0, // DATETIME: 11 bytes
        ]
    );
}

#[test]
fn fixed_row_timestamp_is_appended() {
    let options = EncoderOptions::with_byte_order(ByteOrder::Little)
        .with_row_timestamp(RowTimestamp::Fixed(1_700_000_000_000_000));
    let enc = NebulaEncoder::with_options(common::catalog(), options);
    let row = enc
        .encode_tag(
            common::SPACE,
            "player",
            &["name", "age"],
            &[Value::from("Tim Duncan"), Value::Int(42)],
        )
        .unwrap();
    let mut expected = player_row("Tim Duncan", 42);
    expected.extend_from_slice(&1_700_000_000_000_000i64.to_le_bytes());
    assert_eq!(row, expected);
}

#[test]
fn now_row_timestamp_adds_eight_bytes() {
    let options = EncoderOptions::default().with_row_timestamp(RowTimestamp::Now);
    let enc = NebulaEncoder::with_options(common::catalog(), options);
    let row = enc
        .encode_edge(common::SPACE, "follow", &["degree"], &[Value::Int(95)])
        .unwrap();
    assert_eq!(row.len(), 9 + 8);
    assert_eq!(&row[..9], &[0x08, 95, 0, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn arity_mismatch_is_invalid_argument() {
    let enc = NebulaEncoder::new(common::catalog());
    let err = enc
        .encode_tag(common::SPACE, "player", &["name", "age"], &[Value::from("x")])
        .unwrap_err();
    assert_eq!(err, EncodeError::ArityMismatch { names: 2, values: 1 });
    assert!(err.is_invalid_argument());
}

#[test]
fn row_errors_surface_through_the_encoder() {
    let enc = NebulaEncoder::new(common::catalog());
    let missing = enc
        .encode_tag(common::SPACE, "player", &["age"], &[Value::Int(1)])
        .unwrap_err();
    assert_eq!(
        missing,
        EncodeError::Row(RowError::MissingRequiredField {
            field: "name".into()
        })
    );

    let unknown = enc
        .encode_tag(common::SPACE, "player", &["height"], &[Value::Int(1)])
        .unwrap_err();
    assert!(matches!(
        unknown,
        EncodeError::Row(RowError::UnknownField { .. })
    ));

    let mismatch = enc
        .encode_tag(common::SPACE, "player", &["name"], &[Value::Int(1)])
        .unwrap_err();
    assert!(matches!(
        mismatch,
        EncodeError::Row(RowError::TypeMismatch {
            expected: PropertyType::String,
            ..
        })
    ));
}

#[test]
fn unsupported_column_types_are_configuration_errors() {
    let mut mem = common::catalog();
    mem.insert_edge(
        common::SPACE,
        EdgeItem {
            edge_type: 9,
            edge_name: "located".into(),
            version: 0,
            schema: Schema::new(vec![ColumnDef::new(
                "where",
                ColumnTypeDef::new(PropertyType::Geography),
            )]),
        },
    )
    .unwrap();
    let enc = NebulaEncoder::new(mem);
    let err = enc
        .encode_edge(common::SPACE, "located", &["where"], &[Value::from("POINT(0 0)")])
        .unwrap_err();
    assert!(err.is_unsupported_configuration());
}

fn catalog_with_default(default: Vec<u8>) -> MemoryCatalog {
    let mut mem = common::catalog();
    mem.insert_edge(
        common::SPACE,
        EdgeItem {
            edge_type: 6,
            edge_name: "serve".into(),
            version: 0,
            schema: Schema::new(vec![ColumnDef::new(
                "start_year",
                ColumnTypeDef::new(PropertyType::Int64),
            )
            .with_default(default)]),
        },
    )
    .unwrap();
    mem
}

proptest! {
    #[test]
    fn defaults_are_never_substituted(
        default in prop::collection::vec(any::<u8>(), 1..16),
        year in any::<i64>(),
    ) {
        let mem = catalog_with_default(default.clone());
        let serve = mem.edge(common::SPACE, "serve").unwrap();
        let desc = SchemaDescriptor::from_schema(serve.version, &serve.schema).unwrap();
        prop_assert_eq!(desc.fields()[0].default_value(), Some(&default[..]));

        let enc = NebulaEncoder::new(mem);
        let none: [&str; 0] = [];
        let err = enc.encode_edge(common::SPACE, "serve", &none, &[]).unwrap_err();
        prop_assert_eq!(
            err,
            EncodeError::Row(RowError::DefaultValueUnsupported { field: "start_year".into() })
        );

        let row = enc
            .encode_edge(common::SPACE, "serve", &["start_year"], &[Value::Int(year)])
            .unwrap();
        prop_assert_eq!(row[0], 0x08);
        prop_assert_eq!(&row[1..], &year.to_le_bytes()[..]);
    }

    #[test]
    fn encoding_is_deterministic(name in "[a-zA-Z ]{0,40}", age in any::<i64>()) {
        let enc = NebulaEncoder::new(common::catalog());
        let names = ["name", "age"];
        let values = [Value::from(name.as_str()), Value::Int(age)];
        let a = enc.encode_tag(common::SPACE, "player", &names, &values).unwrap();
        let b = enc.encode_tag(common::SPACE, "player", &names, &values).unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a, player_row(&name, age));
    }
}

#[test]
fn shared_encoder_across_threads() {
    let enc = NebulaEncoder::new(Arc::new(common::catalog()));
    let expected = player_row("Tim Duncan", 42);
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                s.spawn(|| {
                    (0..64)
                        .map(|_| {
                            enc.encode_tag(
                                common::SPACE,
                                "player",
                                &["name", "age"],
                                &[Value::from("Tim Duncan"), Value::Int(42)],
                            )
                            .unwrap()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for handle in handles {
            for row in handle.join().unwrap() {
                assert_eq!(row, expected);
            }
        }
    });
}
