//! # World Generation Module
//!
//! Procedural terrain generation: a deterministic height function over world
//! coordinates, and the column fill that turns a freshly initialized chunk
//! store into terrain.
//!
//! Generation is total: every integer coordinate produces a defined result,
//! and implausible noise parameters only affect how the terrain looks, never
//! whether generation succeeds. The world is always regenerated from the
//! seed; nothing is persisted.

pub mod noise;

use crate::config::{TerrainConfig, WorldConfig};
use crate::voxels::{Block, ChunkExtents, ChunkStore};

use self::noise::NoiseField;

/// Fills chunk stores with terrain derived from a seeded height field.
pub struct WorldGenerator {
    noise: NoiseField,
    terrain: TerrainConfig,
    extents: ChunkExtents,
}

impl WorldGenerator {
    /// Builds a generator from the startup configuration.
    pub fn new(config: &WorldConfig) -> Self {
        WorldGenerator {
            noise: NoiseField::new(&config.noise),
            terrain: config.terrain,
            extents: config.extents(),
        }
    }

    /// The terrain surface height at a world column.
    ///
    /// The normalized noise sample is remapped from `[-1, 1]` to
    /// `[base_height, base_height + max_terrain_height]` and clamped to the
    /// vertical chunk extent. Identical configuration and coordinates always
    /// produce the identical height.
    pub fn height(&self, world_x: i32, world_z: i32) -> i32 {
        let sample = self.noise.sample(world_x as f64, world_z as f64).clamp(-1.0, 1.0);
        let span = self.terrain.max_terrain_height as f64;
        let raw = self.terrain.base_height as f64 + (sample + 1.0) * 0.5 * span;
        (raw.round() as i32).clamp(0, self.extents.height - 1)
    }

    /// Fills every column of the chunk with banded terrain and marks the
    /// store as generated and in need of meshing.
    ///
    /// The store is expected to come straight from
    /// [`ChunkStore::initialize`]: cells above the surface are left at
    /// [`Block::EMPTY`] rather than written.
    pub fn generate(&self, chunk: &mut ChunkStore) {
        let base_x = chunk.coord.x * self.extents.width;
        let base_z = chunk.coord.y * self.extents.depth;

        for local_z in 0..self.extents.depth {
            for local_x in 0..self.extents.width {
                let surface = self.height(base_x + local_x, base_z + local_z);
                self.fill_column(chunk, local_x, local_z, surface);
            }
        }

        chunk.generated = true;
        chunk.dirty = true;
    }

    /// Assigns one column's block types by depth from the surface: the
    /// surface cell gets the surface type, the `band_width` cells beneath it
    /// the subsurface type, and everything deeper the bedrock type.
    fn fill_column(&self, chunk: &mut ChunkStore, local_x: i32, local_z: i32, surface: i32) {
        for y in 0..=surface {
            let id = if y == surface {
                self.terrain.surface_block
            } else if y > surface - self.terrain.band_width {
                self.terrain.subsurface_block
            } else {
                self.terrain.bedrock_block
            };
            chunk.set_block(local_x, y, local_z, Block::new(id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::ChunkCoord;

    fn generator() -> WorldGenerator {
        WorldGenerator::new(&WorldConfig::default())
    }

    #[test]
    fn height_is_deterministic_across_instances() {
        let first = generator();
        let second = generator();

        let reference = first.height(0, 0);
        for _ in 0..10 {
            assert_eq!(first.height(0, 0), reference);
        }
        for (x, z) in [(0, 0), (100, -250), (-3181, 777)] {
            assert_eq!(first.height(x, z), second.height(x, z));
        }
    }

    #[test]
    fn height_stays_inside_the_configured_range() {
        let config = WorldConfig::default();
        let generator = generator();
        let floor = config.terrain.base_height.max(0);
        let ceiling =
            (config.terrain.base_height + config.terrain.max_terrain_height).min(config.chunk_height - 1);

        for x in -64..64 {
            let h = generator.height(x * 7, x * -13);
            assert!((floor..=ceiling).contains(&h), "height {} out of range", h);
        }
    }

    #[test]
    fn generated_columns_are_banded_by_depth() {
        let config = WorldConfig::default();
        let generator = generator();
        let mut chunk = ChunkStore::new(config.extents());
        chunk.initialize(ChunkCoord::new(2, -1));

        generator.generate(&mut chunk);

        assert!(chunk.generated);
        assert!(chunk.dirty);

        for local_z in 0..config.chunk_depth {
            for local_x in 0..config.chunk_width {
                let surface = generator.height(
                    chunk.coord.x * config.chunk_width + local_x,
                    chunk.coord.y * config.chunk_depth + local_z,
                );

                assert_eq!(chunk.block(local_x, surface, local_z).id, config.terrain.surface_block);
                assert!(chunk.block(local_x, surface + 1, local_z).is_empty());
                if surface >= 1 {
                    assert_eq!(
                        chunk.block(local_x, surface - 1, local_z).id,
                        config.terrain.subsurface_block
                    );
                }
                if surface >= config.terrain.band_width {
                    assert_eq!(chunk.block(local_x, 0, local_z).id, config.terrain.bedrock_block);
                }
            }
        }
    }

    #[test]
    fn regeneration_reproduces_the_same_chunk() {
        let config = WorldConfig::default();
        let generator = generator();

        let mut first = ChunkStore::new(config.extents());
        first.initialize(ChunkCoord::new(-4, 9));
        generator.generate(&mut first);

        let mut second = ChunkStore::new(config.extents());
        second.initialize(ChunkCoord::new(-4, 9));
        generator.generate(&mut second);

        assert_eq!(first.blocks(), second.blocks());
    }
}
