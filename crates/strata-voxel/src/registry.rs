//! Block registry: maps compact [`BlockId`] values to [`BlockDef`] metadata.
//!
//! Built once before generation starts and handed to rasterizers, which
//! resolve the names they need up front. Air is always ID 0 so a freshly
//! allocated chunk is empty space.

use rustc_hash::FxHashMap;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Compact identifier stored in every chunk cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u16);

impl BlockId {
    /// The empty block.
    pub const AIR: BlockId = BlockId(0);

    /// Returns `true` for [`BlockId::AIR`].
    pub fn is_air(self) -> bool {
        self == Self::AIR
    }
}

/// Descriptor for a block type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockDef {
    /// Unique name, e.g. `"stone"` or `"tall_grass"`.
    pub name: String,
    /// Whether the block fills its cell (stone) or is decoration (grass).
    pub solid: bool,
}

impl BlockDef {
    pub fn solid(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            solid: true,
        }
    }

    pub fn decoration(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            solid: false,
        }
    }
}

/// Errors that can occur during block registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A block with the same name has already been registered.
    #[error("duplicate block name: {0}")]
    DuplicateName(String),
    /// Every `u16` slot is taken.
    #[error("block registry is full (max 65536 types)")]
    RegistryFull,
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Maps [`BlockId`] → [`BlockDef`] with O(1) lookup either way.
#[derive(Clone, Debug)]
pub struct BlockRegistry {
    /// Dense array where `index == BlockId.0`.
    blocks: Vec<BlockDef>,
    name_to_id: FxHashMap<String, BlockId>,
}

impl BlockRegistry {
    /// Creates a registry with `"air"` pre-registered as ID 0.
    pub fn new() -> Self {
        let mut name_to_id = FxHashMap::default();
        name_to_id.insert("air".to_string(), BlockId::AIR);
        Self {
            blocks: vec![BlockDef::decoration("air")],
            name_to_id,
        }
    }

    /// Registers a block and returns its ID. IDs are handed out sequentially
    /// from 1.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] if the name is taken, or
    /// [`RegistryError::RegistryFull`] once all IDs are used.
    pub fn register(&mut self, def: BlockDef) -> Result<BlockId, RegistryError> {
        if self.name_to_id.contains_key(&def.name) {
            return Err(RegistryError::DuplicateName(def.name));
        }
        if self.blocks.len() > u16::MAX as usize {
            return Err(RegistryError::RegistryFull);
        }

        let id = BlockId(self.blocks.len() as u16);
        self.name_to_id.insert(def.name.clone(), id);
        self.blocks.push(def);
        Ok(id)
    }

    /// Definition for `id`, or `None` if it was never registered.
    pub fn get(&self, id: BlockId) -> Option<&BlockDef> {
        self.blocks.get(id.0 as usize)
    }

    /// ID for a block name, or `None` if not registered.
    pub fn lookup_by_name(&self, name: &str) -> Option<BlockId> {
        self.name_to_id.get(name).copied()
    }

    /// Returns `true` if `id` names a solid block. Unknown IDs count as
    /// non-solid.
    pub fn is_solid(&self, id: BlockId) -> bool {
        self.get(id).is_some_and(|def| def.solid)
    }

    /// Total number of registered blocks, air included.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if only air is registered.
    pub fn is_empty(&self) -> bool {
        self.blocks.len() <= 1
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
