#![warn(missing_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Core
//!
//! The runtime core of a voxel world: block storage, procedural terrain
//! generation, greedy surface meshing, and streaming of a bounded working
//! set of chunks around a moving observer.
//!
//! ## Key Modules
//!
//! * `voxels` - The block value type and the fixed-size chunk store
//! * `catalog` - Per-type block properties, registered once at startup
//! * `generation` - The deterministic height field and terrain fill
//! * `meshing` - Greedy extraction of merged surface rectangles
//! * `streaming` - The tick-driven manager owning residency, queues, and the
//!   storage reuse pool
//! * `config` - The immutable startup configuration surface
//!
//! ## Architecture
//!
//! Chunks are plain data. All behavior lives in services that are handed
//! their dependencies explicitly: the streaming manager owns the catalog and
//! generator it was constructed with, and nothing resolves dependencies
//! through globals. The host loop drives everything through
//! [`streaming::StreamingManager::tick`], which performs a bounded amount of
//! generation and meshing work per call.
//!
//! ## Usage
//!
//! ```no_run
//! use cgmath::Point3;
//! use voxel_core::catalog::BlockCatalog;
//! use voxel_core::config::WorldConfig;
//! use voxel_core::streaming::StreamingManager;
//!
//! let config = WorldConfig::default();
//! let catalog = BlockCatalog::with_defaults();
//! let mut streaming = StreamingManager::new(config, catalog).expect("valid configuration");
//!
//! // In the host loop:
//! streaming.tick(Point3::new(0.0, 80.0, 0.0), 0.016);
//! for (_coord, _mesh) in streaming.take_ready_meshes() {
//!     // Upload the mesh for this coordinate, replacing any previous
//!     // geometry.
//! }
//! ```
//!
//! Everything outside this core (movement, HUD, environmental simulations,
//! editor tooling) consumes the block read/write API and the streaming
//! statistics; none of it is part of this crate.

pub mod catalog;
pub mod config;
pub mod generation;
pub mod meshing;
pub mod streaming;
pub mod voxels;

pub use catalog::{BlockCatalog, BlockEntry};
pub use config::{AtlasLayout, ConfigError, WorldConfig};
pub use generation::WorldGenerator;
pub use meshing::{build_chunk_mesh, ChunkMesh, MeshVertex};
pub use streaming::{StreamingManager, StreamingStats};
pub use voxels::{Block, BlockId, ChunkCoord, ChunkExtents, ChunkStore};
