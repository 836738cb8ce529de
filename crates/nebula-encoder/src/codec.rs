// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Metadata-resolving front end: names in, key and row bytes out.

use tracing::{debug, instrument, trace, warn};

use crate::error::EncodeError;
use crate::hash::partition_for;
use crate::key::KeyCodec;
use crate::meta::{MetadataAccessor, PartitionId, Schema, SpaceDescriptor, VidType};
use crate::options::EncoderOptions;
use crate::row::RowWriter;
use crate::schema::SchemaDescriptor;
use crate::value::Value;

/// Encoder bound to a metadata source.
///
/// Holds no mutable state: every call reads a fresh metadata snapshot and
/// returns freshly allocated bytes. Shareable across threads whenever `M` is.
#[derive(Clone, Debug)]
pub struct NebulaEncoder<M> {
    meta: M,
    options: EncoderOptions,
}

impl<M: MetadataAccessor> NebulaEncoder<M> {
    /// Encoder with default options.
    pub fn new(meta: M) -> Self {
        Self::with_options(meta, EncoderOptions::default())
    }

    /// Encoder with explicit options.
    pub fn with_options(meta: M, options: EncoderOptions) -> Self {
        Self { meta, options }
    }

    /// Options in effect.
    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    /// The injected metadata source.
    pub fn metadata(&self) -> &M {
        &self.meta
    }

    /// Key codec using this encoder's byte order.
    pub fn keys(&self) -> KeyCodec {
        KeyCodec::new(self.options.byte_order)
    }

    /// Fixed vid length of `space`.
    pub fn vid_len(&self, space: &str) -> Result<usize, EncodeError> {
        let item = self
            .meta
            .space(space)
            .ok_or_else(|| EncodeError::SpaceNotFound {
                space: space.into(),
            })?;
        match item.vid_type {
            VidType::FixedString { length } if length > 0 => Ok(length),
            VidType::FixedString { .. } => {
                warn!(space, "space declares a zero-length vid");
                Err(EncodeError::UnsupportedConfiguration(format!(
                    "space `{space}` declares a zero-length vid"
                )))
            }
            other => {
                warn!(space, vid_type = %other.property_type(), "unsupported vid type");
                Err(EncodeError::UnsupportedVidType {
                    space: space.into(),
                    vid_type: other.property_type().to_string(),
                })
            }
        }
    }

    /// Number of partitions of `space`.
    pub fn partition_count(&self, space: &str) -> Result<usize, EncodeError> {
        self.meta
            .parts_alloc(space)
            .map(|parts| parts.len())
            .filter(|count| *count > 0)
            .ok_or_else(|| EncodeError::PartsNotFound {
                space: space.into(),
            })
    }

    /// Vid length and partition count of `space`.
    pub fn space_descriptor(&self, space: &str) -> Result<SpaceDescriptor, EncodeError> {
        Ok(SpaceDescriptor {
            vid_len: self.vid_len(space)?,
            partition_count: self.partition_count(space)?,
        })
    }

    /// Partition owning `vid` in `space`.
    pub fn partition_of(&self, space: &str, vid: &[u8]) -> Result<PartitionId, EncodeError> {
        let count = self.partition_count(space)?;
        partition_for(vid, count).ok_or_else(|| EncodeError::PartsNotFound {
            space: space.into(),
        })
    }

    /// Key of `vid`'s row for tag `tag`.
    #[instrument(level = "debug", skip(self, vid), fields(vid_bytes = vid.len()))]
    pub fn vertex_key(&self, space: &str, vid: &[u8], tag: &str) -> Result<Vec<u8>, EncodeError> {
        let vid_len = self.vid_len(space)?;
        let partition = self.partition_of(space, vid)?;
        let tag_item = self
            .meta
            .tag(space, tag)
            .ok_or_else(|| EncodeError::TagNotFound {
                space: space.into(),
                tag: tag.into(),
            })?;
        debug!(partition, tag_id = tag_item.tag_id, "resolved vertex key");
        self.keys()
            .vertex_key(vid_len, partition, vid, tag_item.tag_id)
    }

    /// Key of the `edge` row from `src` to `dst` at `rank`, default version.
    ///
    /// The edge lives on the partition of its source vertex.
    #[instrument(level = "debug", skip(self, src, dst))]
    pub fn edge_key(
        &self,
        space: &str,
        src: &[u8],
        edge: &str,
        rank: i64,
        dst: &[u8],
    ) -> Result<Vec<u8>, EncodeError> {
        let vid_len = self.vid_len(space)?;
        let partition = self.partition_of(space, src)?;
        let edge_item = self
            .meta
            .edge(space, edge)
            .ok_or_else(|| EncodeError::EdgeNotFound {
                space: space.into(),
                edge: edge.into(),
            })?;
        debug!(partition, edge_type = edge_item.edge_type, "resolved edge key");
        self.keys().edge_key_default_version(
            vid_len,
            partition,
            src,
            edge_item.edge_type,
            rank,
            dst,
        )
    }

    /// Encode a tag row from parallel name/value slices.
    #[instrument(level = "debug", skip(self, names, values), fields(props = names.len()))]
    pub fn encode_tag<S: AsRef<str>>(
        &self,
        space: &str,
        tag: &str,
        names: &[S],
        values: &[Value],
    ) -> Result<Vec<u8>, EncodeError> {
        check_arity(names, values)?;
        let item = self
            .meta
            .tag(space, tag)
            .ok_or_else(|| EncodeError::TagNotFound {
                space: space.into(),
                tag: tag.into(),
            })?;
        self.encode(&item.schema, item.version, names, values)
    }

    /// Encode an edge row from parallel name/value slices.
    #[instrument(level = "debug", skip(self, names, values), fields(props = names.len()))]
    pub fn encode_edge<S: AsRef<str>>(
        &self,
        space: &str,
        edge: &str,
        names: &[S],
        values: &[Value],
    ) -> Result<Vec<u8>, EncodeError> {
        check_arity(names, values)?;
        let item = self
            .meta
            .edge(space, edge)
            .ok_or_else(|| EncodeError::EdgeNotFound {
                space: space.into(),
                edge: edge.into(),
            })?;
        self.encode(&item.schema, item.version, names, values)
    }

    fn encode<S: AsRef<str>>(
        &self,
        schema: &Schema,
        version: i64,
        names: &[S],
        values: &[Value],
    ) -> Result<Vec<u8>, EncodeError> {
        let descriptor = SchemaDescriptor::from_schema(version, schema)?;
        debug!(version, fields = descriptor.len(), "encoding row");
        let mut writer = RowWriter::new(&descriptor, self.options.byte_order);
        if let Some(micros) = self.options.row_timestamp.resolve() {
            trace!(micros, "appending row timestamp");
            writer = writer.with_timestamp(micros);
        }
        for (name, value) in names.iter().zip(values) {
            writer.set_value(name.as_ref(), value)?;
        }
        Ok(writer.finish()?)
    }
}

fn check_arity<S>(names: &[S], values: &[Value]) -> Result<(), EncodeError> {
    if names.len() != values.len() {
        return Err(EncodeError::ArityMismatch {
            names: names.len(),
            values: values.len(),
        });
    }
    Ok(())
}
