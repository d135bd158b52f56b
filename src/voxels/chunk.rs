//! # Chunk Module
//!
//! This module provides the `ChunkStore` struct, a fixed-size flat container
//! of block values representing one rectangular column of the world, plus the
//! state flags the streaming pipeline drives it through.
//!
//! ## Storage Layout
//!
//! Blocks are stored in a single contiguous `Vec<Block>` of exactly
//! `width * height * depth` entries, addressed by
//! `index = x + width * (y + height * z)` where `x`/`z` are the horizontal
//! axes and `y` is the vertical axis. The flat layout keeps generation and
//! meshing sweeps cache-friendly and makes the whole column one `memcpy`-able
//! region.
//!
//! ## Lifecycle
//!
//! A store is allocated once (or drawn from the streaming manager's reuse
//! pool), reset with [`ChunkStore::initialize`], filled by the world
//! generator (which sets `generated` and `dirty`), meshed (which clears
//! `dirty`), edited (which sets `dirty` again), and eventually returned to
//! the pool for reuse at a different coordinate.

use cgmath::Point2;

use super::block::Block;

/// The 2D coordinate of a chunk on the world grid. One unit along `x` or `y`
/// here spans a whole chunk width or depth in world space.
pub type ChunkCoord = Point2<i32>;

/// The fixed dimensions of every chunk store, taken from the startup
/// configuration and immutable thereafter.
///
/// `width` and `depth` are the horizontal extents (world `x` and `z`),
/// `height` is the vertical extent (world `y`).
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ChunkExtents {
    /// Horizontal extent along world `x`.
    pub width: i32,
    /// Vertical extent along world `y`.
    pub height: i32,
    /// Horizontal extent along world `z`.
    pub depth: i32,
}

impl ChunkExtents {
    /// Creates a new extent triple.
    pub fn new(width: i32, height: i32, depth: i32) -> Self {
        ChunkExtents {
            width,
            height,
            depth,
        }
    }

    /// The total number of blocks a store of these extents holds.
    #[inline]
    pub fn volume(&self) -> usize {
        self.width as usize * self.height as usize * self.depth as usize
    }

    /// Returns `true` if the local coordinate lies inside the extents.
    #[inline]
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height && z >= 0 && z < self.depth
    }

    /// The extents as an `[x, y, z]` array, convenient for axis-indexed
    /// sweeps.
    #[inline]
    pub fn as_array(&self) -> [i32; 3] {
        [self.width, self.height, self.depth]
    }
}

/// A fixed-size column of block values at one chunk coordinate.
///
/// The store is plain data: it carries no behavior beyond indexed access and
/// flag bookkeeping. Generation, meshing, and streaming are performed by the
/// services that own it.
pub struct ChunkStore {
    /// The chunk coordinate this store currently represents.
    pub coord: ChunkCoord,
    /// Set once the world generator has filled the block array.
    pub generated: bool,
    /// Set when the stored blocks have changed since the last mesh build.
    pub dirty: bool,
    extents: ChunkExtents,
    blocks: Vec<Block>,
}

impl ChunkStore {
    /// Allocates a new, fully empty store at coordinate `(0, 0)`.
    ///
    /// # Arguments
    /// * `extents` - The fixed chunk dimensions from the startup configuration
    pub fn new(extents: ChunkExtents) -> Self {
        ChunkStore {
            coord: ChunkCoord::new(0, 0),
            generated: false,
            dirty: false,
            extents,
            blocks: vec![Block::EMPTY; extents.volume()],
        }
    }

    /// Resets this store for (re)use at the given coordinate.
    ///
    /// Clears both flags and overwrites every stored block with
    /// [`Block::EMPTY`]. The explicit clear matters for pool reuse: a store
    /// returning from a previous coordinate must not leak any of its old
    /// blocks into the chunk generated at the new one.
    ///
    /// # Arguments
    /// * `coord` - The chunk coordinate the store will represent next
    pub fn initialize(&mut self, coord: ChunkCoord) {
        self.coord = coord;
        self.generated = false;
        self.dirty = false;
        self.blocks.fill(Block::EMPTY);
    }

    /// The fixed dimensions of this store.
    #[inline]
    pub fn extents(&self) -> ChunkExtents {
        self.extents
    }

    /// Converts in-bounds local coordinates to the linear block index.
    ///
    /// Callers must guarantee the coordinate is inside the extents; the
    /// public accessors below perform the bounds handling.
    #[inline]
    pub fn index(&self, x: i32, y: i32, z: i32) -> usize {
        x as usize
            + self.extents.width as usize * (y as usize + self.extents.height as usize * z as usize)
    }

    /// Reads the block at the given local coordinates.
    ///
    /// # Arguments
    /// * `x`, `y`, `z` - Local coordinates within the chunk
    ///
    /// # Returns
    /// The stored block, or [`Block::EMPTY`] when the coordinate lies outside
    /// the chunk extents. Out-of-bounds reads are a defined fallback, not an
    /// error.
    #[inline]
    pub fn block(&self, x: i32, y: i32, z: i32) -> Block {
        if !self.extents.contains(x, y, z) {
            return Block::EMPTY;
        }
        self.blocks[self.index(x, y, z)]
    }

    /// Writes the block at the given local coordinates.
    ///
    /// Out-of-bounds writes are silently ignored. The store does not track
    /// dirtiness itself on write; the owning service decides whether an edit
    /// invalidates existing geometry.
    ///
    /// # Arguments
    /// * `x`, `y`, `z` - Local coordinates within the chunk
    /// * `block` - The value to store
    ///
    /// # Returns
    /// `true` if the write landed, `false` if the coordinate was out of
    /// bounds.
    #[inline]
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: Block) -> bool {
        if !self.extents.contains(x, y, z) {
            return false;
        }
        let index = self.index(x, y, z);
        self.blocks[index] = block;
        true
    }

    /// Direct read access to the flat block array, in linear index order.
    #[inline]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Creates a store completely filled with one block type (for testing).
    #[allow(dead_code)]
    pub fn solid(extents: ChunkExtents, block: Block) -> Self {
        let mut store = ChunkStore::new(extents);
        store.blocks.fill(block);
        store
    }

    /// Creates a store with a 3D checkerboard of the given block and empty
    /// space (for testing). This is the worst case for face merging: no two
    /// adjacent faces share a type.
    #[allow(dead_code)]
    pub fn checkerboard(extents: ChunkExtents, block: Block) -> Self {
        let mut store = ChunkStore::new(extents);
        for z in 0..extents.depth {
            for y in 0..extents.height {
                for x in 0..extents.width {
                    if (x + y + z) % 2 == 0 {
                        store.set_block(x, y, z, block);
                    }
                }
            }
        }
        store
    }

    /// Creates a store with blocks scattered at random positions (for
    /// testing).
    ///
    /// # Arguments
    /// * `extents` - The chunk dimensions
    /// * `block` - The block value to scatter
    /// * `fill_ratio` - Approximate fraction of cells to fill, in `[0, 1]`
    #[allow(dead_code)]
    pub fn scattered(extents: ChunkExtents, block: Block, fill_ratio: f64) -> Self {
        let mut store = ChunkStore::new(extents);
        for slot in store.blocks.iter_mut() {
            if fastrand::f64() < fill_ratio {
                *slot = block;
            }
        }
        store
    }
}
