//! # Streaming Module
//!
//! This module provides the `StreamingManager`, the coordinator that keeps a
//! bounded set of chunks resident around a moving anchor. It owns the
//! resident map, a generation queue, a mesh queue, and a reuse pool of chunk
//! storage, and it is the only component that mutates any of them.
//!
//! ## Scheduling
//!
//! All work happens inside `tick()`, driven once per frame by the host loop.
//! Each tick drains at most `max_generations_per_tick` coordinates from the
//! generation queue and `max_mesh_builds_per_tick` from the mesh queue, so a
//! tick's cost is bounded no matter how much work is pending. The queues act
//! as backpressure when the anchor moves quickly: chunks simply appear over
//! the following ticks instead of stalling a frame.
//!
//! ## Chunk Lifecycle
//!
//! Unloaded -> queued for generation -> generated (dirty) -> meshed ->
//! dirty again on edit (and re-meshed) -> unloaded back into the pool.
//! Pooled storage is fully reset on reuse, so no block from a previous
//! coordinate can ever be observed in a freshly generated chunk.

use std::collections::{HashMap, HashSet, VecDeque};

use cgmath::Point3;
use log::{debug, info};

use crate::catalog::BlockCatalog;
use crate::config::{ConfigError, WorldConfig};
use crate::generation::WorldGenerator;
use crate::meshing::{build_chunk_mesh, ChunkMesh};
use crate::voxels::{Block, ChunkCoord, ChunkExtents, ChunkStore};

/// A snapshot of the streaming state, consumed by HUD and inspection
/// tooling outside this core.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct StreamingStats {
    /// Number of chunks currently resident.
    pub resident: usize,
    /// Number of chunk stores waiting in the reuse pool.
    pub pooled: usize,
    /// Coordinates waiting for terrain generation.
    pub pending_generation: usize,
    /// Coordinates waiting for a mesh build.
    pub pending_mesh: usize,
    /// Chunks generated during the most recent tick.
    pub generated_this_tick: usize,
    /// Meshes built during the most recent tick.
    pub meshed_this_tick: usize,
    /// Total ticks processed.
    pub ticks: u64,
}

/// Owns every resident chunk and schedules generation and meshing around the
/// anchor position.
pub struct StreamingManager {
    config: WorldConfig,
    extents: ChunkExtents,
    catalog: BlockCatalog,
    generator: WorldGenerator,
    resident: HashMap<ChunkCoord, ChunkStore>,
    pool: Vec<ChunkStore>,
    generation_queue: VecDeque<ChunkCoord>,
    queued_generation: HashSet<ChunkCoord>,
    mesh_queue: VecDeque<ChunkCoord>,
    queued_mesh: HashSet<ChunkCoord>,
    ready_meshes: Vec<(ChunkCoord, ChunkMesh)>,
    anchor_coord: Option<ChunkCoord>,
    ticks: u64,
    generated_this_tick: usize,
    meshed_this_tick: usize,
}

impl StreamingManager {
    /// Creates a manager from a validated configuration and a populated
    /// catalog.
    ///
    /// # Errors
    /// Returns the first configuration violation; the manager refuses to
    /// exist with an invalid configuration, since every later invariant
    /// depends on it.
    pub fn new(config: WorldConfig, catalog: BlockCatalog) -> Result<Self, ConfigError> {
        config.validate()?;
        let generator = WorldGenerator::new(&config);
        let extents = config.extents();
        info!(
            "streaming ready: chunks {}x{}x{}, radius {}, budgets {}/{} per tick",
            extents.width,
            extents.height,
            extents.depth,
            config.render_radius,
            config.max_generations_per_tick,
            config.max_mesh_builds_per_tick,
        );
        Ok(StreamingManager {
            extents,
            generator,
            catalog,
            config,
            resident: HashMap::new(),
            pool: Vec::new(),
            generation_queue: VecDeque::new(),
            queued_generation: HashSet::new(),
            mesh_queue: VecDeque::new(),
            queued_mesh: HashSet::new(),
            ready_meshes: Vec::new(),
            anchor_coord: None,
            ticks: 0,
            generated_this_tick: 0,
            meshed_this_tick: 0,
        })
    }

    /// Advances the streaming state by one host-loop step.
    ///
    /// When the anchor has entered a new chunk, the desired resident set is
    /// recomputed as every coordinate within the render radius (squared
    /// chunk distance), missing coordinates are queued for generation, and
    /// coordinates that fell outside are unloaded into the reuse pool. The
    /// two work queues are then drained up to their per-tick budgets.
    ///
    /// # Arguments
    /// * `anchor` - The observer position in world space
    /// * `_dt` - The host-loop time step; the schedule is budget-driven, so
    ///   the value is accepted for interface stability but not consulted
    pub fn tick(&mut self, anchor: Point3<f32>, _dt: f32) {
        self.ticks += 1;
        self.generated_this_tick = 0;
        self.meshed_this_tick = 0;

        let center = self.anchor_chunk(anchor);
        if self.anchor_coord != Some(center) {
            self.anchor_coord = Some(center);
            self.update_residency(center);
        }

        self.drain_generation_queue(center);
        self.drain_mesh_queue();
    }

    /// Reads the block at a world coordinate.
    ///
    /// # Returns
    /// The stored block, or [`Block::EMPTY`] when the owning chunk is not
    /// resident or the vertical coordinate is out of range. Never errors.
    pub fn block_at(&self, world_x: i32, world_y: i32, world_z: i32) -> Block {
        let (coord, local_x, local_z) = self.resolve(world_x, world_z);
        match self.resident.get(&coord) {
            Some(chunk) => chunk.block(local_x, world_y, local_z),
            None => Block::EMPTY,
        }
    }

    /// Writes the block at a world coordinate.
    ///
    /// A landed write marks the owning chunk dirty and queues it for a mesh
    /// rebuild (at most once; re-queuing an already queued chunk is a no-op).
    /// Writes to non-resident chunks or out-of-range vertical coordinates
    /// are silently dropped.
    ///
    /// # Returns
    /// `true` if the write landed.
    pub fn set_block_at(&mut self, world_x: i32, world_y: i32, world_z: i32, block: Block) -> bool {
        let (coord, local_x, local_z) = self.resolve(world_x, world_z);
        let Some(chunk) = self.resident.get_mut(&coord) else {
            debug!(
                "dropped block write at ({}, {}, {}): chunk ({}, {}) not resident",
                world_x, world_y, world_z, coord.x, coord.y
            );
            return false;
        };
        if !chunk.set_block(local_x, world_y, local_z, block) {
            return false;
        }
        chunk.dirty = true;
        self.enqueue_mesh(coord);
        true
    }

    /// Drains the meshes completed since the last call. Each entry replaces
    /// any geometry the consumer holds for that coordinate; an empty mesh
    /// means the chunk was unloaded and its geometry should be dropped.
    pub fn take_ready_meshes(&mut self) -> Vec<(ChunkCoord, ChunkMesh)> {
        std::mem::take(&mut self.ready_meshes)
    }

    /// A snapshot of the current streaming state.
    pub fn stats(&self) -> StreamingStats {
        StreamingStats {
            resident: self.resident.len(),
            pooled: self.pool.len(),
            pending_generation: self.generation_queue.len(),
            pending_mesh: self.mesh_queue.len(),
            generated_this_tick: self.generated_this_tick,
            meshed_this_tick: self.meshed_this_tick,
            ticks: self.ticks,
        }
    }

    /// The startup configuration this manager runs with.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Whether a chunk coordinate is currently resident.
    pub fn is_resident(&self, coord: ChunkCoord) -> bool {
        self.resident.contains_key(&coord)
    }

    /// The currently resident chunk coordinates, in no particular order.
    pub fn resident_coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.resident.keys().copied()
    }

    /// Releases all streaming state: resident chunks, queues, pool, and any
    /// undelivered meshes.
    pub fn shutdown(&mut self) {
        info!(
            "streaming shutdown: releasing {} resident chunks, {} pooled stores",
            self.resident.len(),
            self.pool.len()
        );
        self.resident.clear();
        self.pool.clear();
        self.generation_queue.clear();
        self.queued_generation.clear();
        self.mesh_queue.clear();
        self.queued_mesh.clear();
        self.ready_meshes.clear();
        self.anchor_coord = None;
    }

    /// Every chunk coordinate within `radius` of `center`, by the squared
    /// chunk-distance test, sorted nearest first so close terrain appears
    /// before distant terrain.
    pub fn desired_coords(center: ChunkCoord, radius: i32) -> Vec<ChunkCoord> {
        let mut coords = Vec::new();
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dz * dz <= radius * radius {
                    coords.push(ChunkCoord::new(center.x + dx, center.y + dz));
                }
            }
        }
        coords.sort_by_key(|coord| {
            let dx = coord.x - center.x;
            let dz = coord.y - center.y;
            dx * dx + dz * dz
        });
        coords
    }

    /// The chunk coordinate containing a world-space position.
    fn anchor_chunk(&self, anchor: Point3<f32>) -> ChunkCoord {
        ChunkCoord::new(
            (anchor.x / self.extents.width as f32).floor() as i32,
            (anchor.z / self.extents.depth as f32).floor() as i32,
        )
    }

    /// Splits world x/z into the owning chunk coordinate and local offsets.
    fn resolve(&self, world_x: i32, world_z: i32) -> (ChunkCoord, i32, i32) {
        let coord = ChunkCoord::new(
            world_x.div_euclid(self.extents.width),
            world_z.div_euclid(self.extents.depth),
        );
        (coord, world_x.rem_euclid(self.extents.width), world_z.rem_euclid(self.extents.depth))
    }

    fn within_radius(coord: ChunkCoord, center: ChunkCoord, radius: i32) -> bool {
        let dx = coord.x - center.x;
        let dz = coord.y - center.y;
        dx * dx + dz * dz <= radius * radius
    }

    /// Reconciles the resident set against the desired set around a new
    /// anchor chunk: unloads what fell outside the radius and queues what is
    /// missing.
    fn update_residency(&mut self, center: ChunkCoord) {
        let desired = Self::desired_coords(center, self.config.render_radius);

        let stale: Vec<ChunkCoord> = self
            .resident
            .keys()
            .filter(|coord| !Self::within_radius(**coord, center, self.config.render_radius))
            .copied()
            .collect();
        for coord in stale {
            if let Some(store) = self.resident.remove(&coord) {
                self.pool.push(store);
                // An empty mesh tells the renderer to drop the geometry.
                self.publish_mesh(coord, ChunkMesh::new());
                debug!("unloaded chunk ({}, {})", coord.x, coord.y);
            }
        }

        for coord in desired {
            if !self.resident.contains_key(&coord) && self.queued_generation.insert(coord) {
                self.generation_queue.push_back(coord);
            }
        }
    }

    /// Pops up to the generation budget from the queue, filling each chunk
    /// from pooled or fresh storage. Coordinates that left the radius while
    /// queued are discarded rather than generated.
    fn drain_generation_queue(&mut self, center: ChunkCoord) {
        for _ in 0..self.config.max_generations_per_tick {
            let Some(coord) = self.generation_queue.pop_front() else {
                break;
            };
            self.queued_generation.remove(&coord);
            if !Self::within_radius(coord, center, self.config.render_radius) {
                debug!("discarded stale generation request ({}, {})", coord.x, coord.y);
                continue;
            }
            if self.resident.contains_key(&coord) {
                continue;
            }

            let mut store = self
                .pool
                .pop()
                .unwrap_or_else(|| ChunkStore::new(self.extents));
            store.initialize(coord);
            self.generator.generate(&mut store);
            self.resident.insert(coord, store);
            self.enqueue_mesh(coord);
            self.generated_this_tick += 1;
        }
    }

    /// Pops up to the mesh budget from the queue, rebuilding each chunk that
    /// is still resident and still dirty. A clean chunk is recognized as a
    /// no-op and costs nothing beyond the queue pop.
    fn drain_mesh_queue(&mut self) {
        for _ in 0..self.config.max_mesh_builds_per_tick {
            let Some(coord) = self.mesh_queue.pop_front() else {
                break;
            };
            self.queued_mesh.remove(&coord);
            let Some(chunk) = self.resident.get_mut(&coord) else {
                continue;
            };
            if !chunk.dirty {
                continue;
            }

            let mesh = build_chunk_mesh(chunk, &self.catalog, &self.config.atlas);
            chunk.dirty = false;
            self.publish_mesh(coord, mesh);
            self.meshed_this_tick += 1;
        }
    }

    fn enqueue_mesh(&mut self, coord: ChunkCoord) {
        if self.queued_mesh.insert(coord) {
            self.mesh_queue.push_back(coord);
        }
    }

    fn publish_mesh(&mut self, coord: ChunkCoord, mesh: ChunkMesh) {
        self.ready_meshes.retain(|(existing, _)| *existing != coord);
        self.ready_meshes.push((coord, mesh));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A small world that one tick can fully generate and mesh.
    fn test_config() -> WorldConfig {
        let mut config = WorldConfig::default();
        config.chunk_width = 8;
        config.chunk_height = 16;
        config.chunk_depth = 8;
        config.render_radius = 2;
        config.max_generations_per_tick = 64;
        config.max_mesh_builds_per_tick = 64;
        config.terrain.base_height = 4;
        config.terrain.max_terrain_height = 6;
        config
    }

    fn manager() -> StreamingManager {
        StreamingManager::new(test_config(), BlockCatalog::with_defaults()).unwrap()
    }

    #[test]
    fn construction_rejects_invalid_configuration() {
        let mut config = test_config();
        config.render_radius = 0;
        assert!(StreamingManager::new(config, BlockCatalog::with_defaults()).is_err());
    }

    #[test]
    fn first_tick_makes_the_radius_disc_resident() {
        let mut manager = manager();
        manager.tick(Point3::new(0.0, 0.0, 0.0), 0.016);

        let mut resident: Vec<ChunkCoord> = manager.resident_coords().collect();
        let mut expected = StreamingManager::desired_coords(ChunkCoord::new(0, 0), 2);
        resident.sort_by_key(|c| (c.x, c.y));
        expected.sort_by_key(|c| (c.x, c.y));
        assert_eq!(resident, expected);
    }

    #[test]
    fn generation_respects_the_per_tick_budget() {
        let mut config = test_config();
        config.max_generations_per_tick = 3;
        let mut manager = StreamingManager::new(config, BlockCatalog::with_defaults()).unwrap();

        manager.tick(Point3::new(0.0, 0.0, 0.0), 0.016);
        let stats = manager.stats();
        assert_eq!(stats.generated_this_tick, 3);
        assert_eq!(stats.resident, 3);
        assert!(stats.pending_generation > 0);

        // The remaining work drains over later ticks.
        for _ in 0..8 {
            manager.tick(Point3::new(0.0, 0.0, 0.0), 0.016);
        }
        assert_eq!(manager.stats().pending_generation, 0);
        assert_eq!(manager.stats().resident, 13);
    }

    #[test]
    fn world_coordinate_reads_resolve_into_resident_chunks() {
        let mut manager = manager();
        manager.tick(Point3::new(0.0, 0.0, 0.0), 0.016);

        // The generated surface block is readable through world coordinates,
        // including in chunks at negative coordinates.
        for (wx, wz) in [(0, 0), (-1, -1), (11, -6)] {
            let mut found_surface = false;
            for wy in (0..16).rev() {
                let block = manager.block_at(wx, wy, wz);
                if !block.is_empty() {
                    assert_eq!(block.id, manager.config().terrain.surface_block);
                    found_surface = true;
                    break;
                }
            }
            assert!(found_surface, "no surface found at column ({}, {})", wx, wz);
        }
    }

    #[test]
    fn reads_outside_the_resident_set_return_empty() {
        let mut manager = manager();
        manager.tick(Point3::new(0.0, 0.0, 0.0), 0.016);
        assert_eq!(manager.block_at(10_000, 4, 10_000), Block::EMPTY);
    }

    #[test]
    fn writes_outside_the_resident_set_are_dropped() {
        let mut manager = manager();
        manager.tick(Point3::new(0.0, 0.0, 0.0), 0.016);
        assert!(!manager.set_block_at(10_000, 4, 10_000, Block::new(1)));
        assert_eq!(manager.block_at(10_000, 4, 10_000), Block::EMPTY);
    }

    #[test]
    fn edits_mark_the_chunk_dirty_and_requeue_exactly_once() {
        let mut manager = manager();
        manager.tick(Point3::new(0.0, 0.0, 0.0), 0.016);
        manager.take_ready_meshes();

        assert!(manager.set_block_at(1, 12, 1, Block::new(1)));
        assert!(manager.set_block_at(2, 12, 1, Block::new(1)));
        assert_eq!(manager.stats().pending_mesh, 1);
        assert_eq!(manager.block_at(1, 12, 1), Block::new(1));

        manager.tick(Point3::new(0.0, 0.0, 0.0), 0.016);
        let meshes = manager.take_ready_meshes();
        assert_eq!(meshes.len(), 1);
        assert_eq!(meshes[0].0, ChunkCoord::new(0, 0));
        assert!(!meshes[0].1.is_empty());
    }

    #[test]
    fn clean_chunks_are_not_remeshed() {
        let mut manager = manager();
        manager.tick(Point3::new(0.0, 0.0, 0.0), 0.016);
        manager.take_ready_meshes();

        // No edits between ticks: nothing to rebuild, nothing delivered.
        manager.tick(Point3::new(0.0, 0.0, 0.0), 0.016);
        assert_eq!(manager.stats().meshed_this_tick, 0);
        assert!(manager.take_ready_meshes().is_empty());
    }

    #[test]
    fn vertical_out_of_range_writes_are_ignored() {
        let mut manager = manager();
        manager.tick(Point3::new(0.0, 0.0, 0.0), 0.016);
        assert!(!manager.set_block_at(0, 16, 0, Block::new(1)));
        assert!(!manager.set_block_at(0, -1, 0, Block::new(1)));
        assert_eq!(manager.stats().pending_mesh, 0);
    }

    #[test]
    fn unloading_publishes_an_empty_mesh_for_the_coordinate() {
        let mut manager = manager();
        manager.tick(Point3::new(0.0, 0.0, 0.0), 0.016);
        manager.take_ready_meshes();

        // Jump far enough that the whole previous disc unloads.
        manager.tick(Point3::new(800.0, 0.0, 800.0), 0.016);
        let meshes = manager.take_ready_meshes();
        let dropped = meshes
            .iter()
            .filter(|(coord, mesh)| mesh.is_empty() && coord.x * coord.x + coord.y * coord.y <= 4)
            .count();
        assert_eq!(dropped, 13);
        assert!(manager.stats().pooled + manager.stats().resident >= 13);
    }
}
