//! # Block Catalog Module
//!
//! An immutable-after-startup lookup of per-type block properties. The
//! generator and mesher only consult solidity; the extension fields
//! (`aura_emission`, `growth_rate`) are carried for the environmental and
//! ecosystem subsystems that sit outside this core.
//!
//! Registration is append-only: duplicate ids are rejected with a warning and
//! the first registration wins. Lookups of unknown ids return a permissive
//! default entry instead of erroring, so future block ids introduced by data
//! files never crash a query path.

use std::collections::HashMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::voxels::BlockId;

/// The physical and visual properties of one block type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockEntry {
    /// The type id this entry describes. Id `0` is reserved for empty space.
    pub id: BlockId,
    /// Human-readable name, used in logs and inspection tooling.
    pub name: String,
    /// Whether the block occludes its neighbors' faces.
    pub solid: bool,
    /// Whether the block lets light through.
    pub transparent: bool,
    /// Relative mining hardness.
    pub hardness: f32,
    /// Ambient field strength contributed to the aura simulation.
    pub aura_emission: f32,
    /// Growth speed multiplier consumed by the plant ecosystem.
    pub growth_rate: f32,
}

impl Default for BlockEntry {
    /// The permissive fallback entry returned for unmapped ids: not solid,
    /// transparent, unit hardness.
    fn default() -> Self {
        BlockEntry {
            id: 0,
            name: String::from("unknown"),
            solid: false,
            transparent: true,
            hardness: 1.0,
            aura_emission: 0.0,
            growth_rate: 0.0,
        }
    }
}

/// On-disk shape of a block data file: a single list of entries.
#[derive(Deserialize)]
struct BlocksFile {
    blocks: Vec<BlockEntry>,
}

/// The catalog of all registered block types, built once at startup and
/// read-mostly afterwards.
pub struct BlockCatalog {
    entries: HashMap<BlockId, BlockEntry>,
    default_entry: BlockEntry,
}

impl BlockCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        BlockCatalog {
            entries: HashMap::new(),
            default_entry: BlockEntry::default(),
        }
    }

    /// Creates a catalog pre-populated with the built-in terrain block set
    /// used by the default world configuration.
    pub fn with_defaults() -> Self {
        let mut catalog = BlockCatalog::new();
        catalog.register(BlockEntry {
            id: 1,
            name: String::from("stone"),
            solid: true,
            transparent: false,
            hardness: 3.0,
            ..BlockEntry::default()
        });
        catalog.register(BlockEntry {
            id: 2,
            name: String::from("dirt"),
            solid: true,
            transparent: false,
            hardness: 0.8,
            growth_rate: 0.5,
            ..BlockEntry::default()
        });
        catalog.register(BlockEntry {
            id: 3,
            name: String::from("grass"),
            solid: true,
            transparent: false,
            hardness: 0.7,
            aura_emission: 0.1,
            growth_rate: 1.0,
            ..BlockEntry::default()
        });
        catalog.register(BlockEntry {
            id: 4,
            name: String::from("water"),
            solid: false,
            transparent: true,
            hardness: 100.0,
            ..BlockEntry::default()
        });
        catalog
    }

    /// Registers a block type.
    ///
    /// Registration is append-only. An already-registered id is left
    /// untouched and the attempt is logged; id `0` is reserved for empty
    /// space and is likewise rejected.
    ///
    /// # Returns
    /// `true` if the entry was inserted, `false` if it was rejected.
    pub fn register(&mut self, entry: BlockEntry) -> bool {
        if entry.id == 0 {
            warn!("rejected block registration '{}': id 0 is reserved for empty space", entry.name);
            return false;
        }
        if let Some(existing) = self.entries.get(&entry.id) {
            warn!(
                "rejected duplicate block registration '{}' for id {}: '{}' is already registered",
                entry.name, entry.id, existing.name
            );
            return false;
        }
        self.entries.insert(entry.id, entry);
        true
    }

    /// Loads block entries from a JSON string of the shape
    /// `{ "blocks": [ ... ] }`, registering each in order.
    ///
    /// # Returns
    /// The number of entries that were actually registered (duplicates are
    /// skipped, not errors), or the parse error.
    pub fn load_from_json(&mut self, json: &str) -> Result<usize, serde_json::Error> {
        let file: BlocksFile = serde_json::from_str(json)?;
        let mut registered = 0;
        for entry in file.blocks {
            if self.register(entry) {
                registered += 1;
            }
        }
        Ok(registered)
    }

    /// Looks up the entry for a block type id.
    ///
    /// Unmapped ids resolve to the permissive default entry (not solid,
    /// transparent, unit hardness) rather than an error.
    #[inline]
    pub fn lookup(&self, id: BlockId) -> &BlockEntry {
        self.entries.get(&id).unwrap_or(&self.default_entry)
    }

    /// Whether the given block type occludes neighboring faces. Id `0` is
    /// never solid.
    #[inline]
    pub fn is_solid(&self, id: BlockId) -> bool {
        self.lookup(id).solid
    }

    /// The number of registered block types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no block types have been registered yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all registered entries, in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = &BlockEntry> {
        self.entries.values()
    }
}

impl Default for BlockCatalog {
    fn default() -> Self {
        Self::new()
    }
}
