//! # Configuration Module
//!
//! The startup configuration surface for the world core. A `WorldConfig` is
//! read once (from defaults or a JSON document), validated, and then treated
//! as immutable; every downstream invariant (chunk indexing, radius math,
//! tick budgets) depends on it, so validation fails fast before any ticking
//! begins.

use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::voxels::{BlockId, ChunkExtents};

/// Parameters of the multi-octave value-noise height function.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// World seed. Identical seeds always reproduce identical terrain.
    pub seed: u32,
    /// Base sampling scale applied to world coordinates.
    pub scale: f64,
    /// Number of noise octaves accumulated per sample.
    pub octaves: u32,
    /// Amplitude falloff per octave.
    pub persistence: f64,
    /// Frequency growth per octave.
    pub lacunarity: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        NoiseConfig {
            seed: 12345,
            scale: 0.05,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// Terrain shaping parameters: where the surface sits and which block types
/// fill each depth band.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Lowest possible surface height.
    pub base_height: i32,
    /// Maximum terrain rise above `base_height`.
    pub max_terrain_height: i32,
    /// Thickness of the subsurface band directly under the surface block.
    pub band_width: i32,
    /// Block type exposed at the surface.
    pub surface_block: BlockId,
    /// Block type filling the band below the surface.
    pub subsurface_block: BlockId,
    /// Block type filling everything beneath the subsurface band.
    pub bedrock_block: BlockId,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        TerrainConfig {
            base_height: 32,
            max_terrain_height: 48,
            band_width: 4,
            surface_block: 3,
            subsurface_block: 2,
            bedrock_block: 1,
        }
    }
}

/// Layout of the fixed-cell texture atlas that mesh UVs index into. Cell
/// `n` sits at column `n % cells_per_row`, row `n / cells_per_row`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasLayout {
    /// Number of cells along one row of the atlas texture.
    pub cells_per_row: u32,
    /// Side length of one cell in UV space.
    pub cell_size: f32,
}

impl Default for AtlasLayout {
    fn default() -> Self {
        AtlasLayout {
            cells_per_row: 16,
            cell_size: 1.0 / 16.0,
        }
    }
}

impl AtlasLayout {
    /// The UV-space origin of the atlas cell for a block type id.
    #[inline]
    pub fn cell_origin(&self, id: BlockId) -> [f32; 2] {
        let cell = id as u32;
        let column = cell % self.cells_per_row;
        let row = cell / self.cells_per_row;
        [column as f32 * self.cell_size, row as f32 * self.cell_size]
    }
}

/// The complete startup configuration for the world core.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Chunk extent along world `x`.
    pub chunk_width: i32,
    /// Chunk extent along world `y` (vertical).
    pub chunk_height: i32,
    /// Chunk extent along world `z`.
    pub chunk_depth: i32,
    /// Chunk-distance radius kept resident around the anchor.
    pub render_radius: i32,
    /// Maximum chunk generations performed per tick.
    pub max_generations_per_tick: usize,
    /// Maximum mesh builds performed per tick.
    pub max_mesh_builds_per_tick: usize,
    /// Height-function noise parameters.
    pub noise: NoiseConfig,
    /// Terrain band parameters.
    pub terrain: TerrainConfig,
    /// Texture atlas layout for mesh UVs.
    pub atlas: AtlasLayout,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            chunk_width: 16,
            chunk_height: 128,
            chunk_depth: 16,
            render_radius: 6,
            max_generations_per_tick: 4,
            max_mesh_builds_per_tick: 4,
            noise: NoiseConfig::default(),
            terrain: TerrainConfig::default(),
            atlas: AtlasLayout::default(),
        }
    }
}

impl WorldConfig {
    /// Parses a configuration from a JSON document. Missing fields fall back
    /// to their defaults; the result still needs [`WorldConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The chunk extents as the storage layer consumes them.
    pub fn extents(&self) -> ChunkExtents {
        ChunkExtents::new(self.chunk_width, self.chunk_height, self.chunk_depth)
    }

    /// Checks every startup precondition, returning the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_width <= 0 {
            return Err(ConfigError::NonPositiveExtent("chunk_width", self.chunk_width));
        }
        if self.chunk_height <= 0 {
            return Err(ConfigError::NonPositiveExtent("chunk_height", self.chunk_height));
        }
        if self.chunk_depth <= 0 {
            return Err(ConfigError::NonPositiveExtent("chunk_depth", self.chunk_depth));
        }
        if self.render_radius <= 0 {
            return Err(ConfigError::NonPositiveRadius(self.render_radius));
        }
        if self.max_generations_per_tick == 0 {
            return Err(ConfigError::ZeroBudget("max_generations_per_tick"));
        }
        if self.max_mesh_builds_per_tick == 0 {
            return Err(ConfigError::ZeroBudget("max_mesh_builds_per_tick"));
        }
        if self.noise.octaves == 0 {
            return Err(ConfigError::InvalidNoise("octaves must be at least 1"));
        }
        if self.noise.scale <= 0.0 {
            return Err(ConfigError::InvalidNoise("scale must be positive"));
        }
        if self.noise.persistence <= 0.0 {
            return Err(ConfigError::InvalidNoise("persistence must be positive"));
        }
        if self.noise.lacunarity <= 0.0 {
            return Err(ConfigError::InvalidNoise("lacunarity must be positive"));
        }
        if self.terrain.max_terrain_height < 0 {
            return Err(ConfigError::InvalidTerrain("max_terrain_height must not be negative"));
        }
        if self.terrain.band_width < 1 {
            return Err(ConfigError::InvalidTerrain("band_width must be at least 1"));
        }
        if self.atlas.cells_per_row == 0 {
            return Err(ConfigError::InvalidAtlas("cells_per_row must be at least 1"));
        }
        if self.atlas.cell_size <= 0.0 {
            return Err(ConfigError::InvalidAtlas("cell_size must be positive"));
        }
        Ok(())
    }
}

/// A startup precondition violation. Construction of the streaming manager
/// refuses to proceed past any of these.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A chunk extent was zero or negative.
    NonPositiveExtent(&'static str, i32),
    /// The render radius was zero or negative.
    NonPositiveRadius(i32),
    /// A per-tick work budget was zero.
    ZeroBudget(&'static str),
    /// A noise parameter was out of range.
    InvalidNoise(&'static str),
    /// A terrain parameter was out of range.
    InvalidTerrain(&'static str),
    /// An atlas parameter was out of range.
    InvalidAtlas(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveExtent(field, value) => {
                write!(f, "invalid configuration: {} must be positive, got {}", field, value)
            }
            ConfigError::NonPositiveRadius(value) => {
                write!(f, "invalid configuration: render_radius must be positive, got {}", value)
            }
            ConfigError::ZeroBudget(field) => {
                write!(f, "invalid configuration: {} must be at least 1", field)
            }
            ConfigError::InvalidNoise(reason) => {
                write!(f, "invalid noise configuration: {}", reason)
            }
            ConfigError::InvalidTerrain(reason) => {
                write!(f, "invalid terrain configuration: {}", reason)
            }
            ConfigError::InvalidAtlas(reason) => {
                write!(f, "invalid atlas configuration: {}", reason)
            }
        }
    }
}

impl Error for ConfigError {}
