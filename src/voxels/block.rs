//! # Block Module
//!
//! This module defines the block value type, the smallest unit of world data.
//! A block is a plain 4-byte record with no identity of its own; it is copied
//! freely between chunk storage, the generator, and the mesher.

/// The underlying integer type used to represent block type ids.
/// Id `0` is reserved for the empty block and is never registered
/// in the catalog.
pub type BlockId = u16;

/// A single voxel value.
///
/// Blocks are stored by the million inside chunk storage, so the layout is
/// kept to exactly four bytes: a 16-bit type id, an 8-bit state value, and an
/// 8-bit metadata value. The meaning of `state` and `metadata` is defined by
/// the block type (growth stage, damage, orientation); the core only carries
/// them.
///
/// # Memory Layout
/// The `#[repr(C)]` attribute ensures a consistent memory layout so block
/// arrays can be copied into GPU or inspection buffers without conversion.
#[repr(C)]
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Block {
    /// The block type id. `0` means empty.
    pub id: BlockId,
    /// Type-defined state value.
    pub state: u8,
    /// Type-defined metadata value.
    pub metadata: u8,
}

impl Block {
    /// The empty block. Out-of-bounds and non-resident reads resolve to this.
    pub const EMPTY: Block = Block {
        id: 0,
        state: 0,
        metadata: 0,
    };

    /// Creates a block of the given type with zeroed state and metadata.
    ///
    /// # Arguments
    /// * `id` - The block type id
    pub fn new(id: BlockId) -> Self {
        Block {
            id,
            state: 0,
            metadata: 0,
        }
    }

    /// Creates a block with explicit state and metadata values.
    ///
    /// # Arguments
    /// * `id` - The block type id
    /// * `state` - Type-defined state value
    /// * `metadata` - Type-defined metadata value
    pub fn with_state(id: BlockId, state: u8, metadata: u8) -> Self {
        Block {
            id,
            state,
            metadata,
        }
    }

    /// Returns `true` if this is the empty block (type id `0`).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.id == 0
    }
}

impl Default for Block {
    fn default() -> Self {
        Block::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_is_four_bytes() {
        assert_eq!(std::mem::size_of::<Block>(), 4);
    }

    #[test]
    fn empty_block_has_zero_id() {
        assert!(Block::EMPTY.is_empty());
        assert!(!Block::new(1).is_empty());
    }

    #[test]
    fn with_state_preserves_all_fields() {
        let block = Block::with_state(42, 3, 200);
        assert_eq!(block.id, 42);
        assert_eq!(block.state, 3);
        assert_eq!(block.metadata, 200);
    }
}
