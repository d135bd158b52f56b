//! # Voxels Module
//!
//! Core world data: the block value type and the fixed-size chunk store the
//! rest of the pipeline generates into, meshes from, and streams.

pub mod block;
pub mod chunk;

pub use block::{Block, BlockId};
pub use chunk::{ChunkCoord, ChunkExtents, ChunkStore};
