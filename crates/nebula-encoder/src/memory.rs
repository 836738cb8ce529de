// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory metadata catalog.
//!
//! [`MemoryCatalog`] implements [`MetadataAccessor`] over plain maps. It backs
//! the CLI (loaded from a JSON [`Catalog`] document) and serves as the test
//! double for the encoder. Once built it is only read, so a shared reference
//! or an `Arc` can be handed to encoders on any number of threads.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::EncodeError;
use crate::meta::{
    EdgeItem, HostAddr, MetadataAccessor, PartitionId, PartsAlloc, SpaceItem, TagItem, VidType,
};
use crate::options::EncoderOptions;

/// JSON document describing spaces, their partitions, tags and edges.
///
/// ```json
/// {
///   "options": { "byte_order": "little" },
///   "spaces": [{
///     "name": "nba",
///     "vid_type": { "type": "FIXED_STRING", "length": 32 },
///     "partition_num": 100,
///     "tags": [{ "tag_id": 2, "tag_name": "player", "version": 0,
///                "schema": { "columns": [
///                  { "name": "age", "type": { "type": "INT64" } } ] } }],
///     "edges": []
///   }]
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Encoder options stored alongside the metadata.
    #[serde(default)]
    pub options: EncoderOptions,
    /// Space definitions.
    #[serde(default)]
    pub spaces: Vec<SpaceDef>,
}

impl Catalog {
    /// Parse a catalog from JSON.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// One space in a [`Catalog`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceDef {
    /// Space name.
    pub name: String,
    /// Numeric space id.
    #[serde(default)]
    pub space_id: i32,
    /// Vertex identifier type.
    pub vid_type: VidType,
    /// Number of partitions.
    pub partition_num: u32,
    /// Storage hosts; partitions are assigned to them round-robin.
    #[serde(default)]
    pub hosts: Vec<HostAddr>,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<TagItem>,
    /// Edge types.
    #[serde(default)]
    pub edges: Vec<EdgeItem>,
}

#[derive(Clone, Debug)]
struct SpaceEntry {
    item: SpaceItem,
    parts: PartsAlloc,
    tags: HashMap<String, TagItem>,
    edges: HashMap<String, EdgeItem>,
}

/// Map-backed [`MetadataAccessor`].
#[derive(Clone, Debug, Default)]
pub struct MemoryCatalog {
    spaces: HashMap<String, SpaceEntry>,
}

impl MemoryCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a parsed [`Catalog`]. Options are not consumed here.
    pub fn from_catalog(catalog: &Catalog) -> Result<Self, EncodeError> {
        let mut out = Self::new();
        for def in &catalog.spaces {
            out.insert_space(
                SpaceItem {
                    space_id: def.space_id,
                    name: def.name.clone(),
                    vid_type: def.vid_type.clone(),
                },
                def.partition_num,
                &def.hosts,
            );
            for tag in &def.tags {
                out.insert_tag(&def.name, tag.clone())?;
            }
            for edge in &def.edges {
                out.insert_edge(&def.name, edge.clone())?;
            }
        }
        Ok(out)
    }

    /// Register a space with `partition_num` partitions served round-robin
    /// by `hosts`. Replaces any space of the same name, dropping its tags and
    /// edges.
    pub fn insert_space(&mut self, item: SpaceItem, partition_num: u32, hosts: &[HostAddr]) {
        let parts = (1..=partition_num)
            .map(|part: PartitionId| {
                let owners = if hosts.is_empty() {
                    Vec::new()
                } else {
                    vec![hosts[(part as usize - 1) % hosts.len()].clone()]
                };
                (part, owners)
            })
            .collect();
        self.spaces.insert(
            item.name.clone(),
            SpaceEntry {
                item,
                parts,
                tags: HashMap::new(),
                edges: HashMap::new(),
            },
        );
    }

    /// Register a tag in an existing space.
    pub fn insert_tag(&mut self, space: &str, tag: TagItem) -> Result<(), EncodeError> {
        let entry = self.entry_mut(space)?;
        entry.tags.insert(tag.tag_name.clone(), tag);
        Ok(())
    }

    /// Register an edge type in an existing space.
    pub fn insert_edge(&mut self, space: &str, edge: EdgeItem) -> Result<(), EncodeError> {
        let entry = self.entry_mut(space)?;
        entry.edges.insert(edge.edge_name.clone(), edge);
        Ok(())
    }

    /// Number of spaces.
    pub fn len(&self) -> usize {
        self.spaces.len()
    }

    /// `true` when no space is registered.
    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty()
    }

    fn entry_mut(&mut self, space: &str) -> Result<&mut SpaceEntry, EncodeError> {
        self.spaces
            .get_mut(space)
            .ok_or_else(|| EncodeError::SpaceNotFound {
                space: space.into(),
            })
    }
}

impl MetadataAccessor for MemoryCatalog {
    fn space(&self, space: &str) -> Option<SpaceItem> {
        self.spaces.get(space).map(|e| e.item.clone())
    }

    fn parts_alloc(&self, space: &str) -> Option<PartsAlloc> {
        self.spaces.get(space).map(|e| e.parts.clone())
    }

    fn tag(&self, space: &str, tag: &str) -> Option<TagItem> {
        self.spaces.get(space)?.tags.get(tag).cloned()
    }

    fn edge(&self, space: &str, edge: &str) -> Option<EdgeItem> {
        self.spaces.get(space)?.edges.get(edge).cloned()
    }
}
