//! Demo driver for the voxel world core.
//!
//! Runs the streaming pipeline headlessly: walks an anchor across the world
//! for a fixed number of ticks, applies a block edit, and logs the streaming
//! statistics along the way. The meshes that a real host would upload to a
//! renderer are only counted here.

use std::error::Error;

use cgmath::Point3;
use log::info;

use voxel_core::catalog::BlockCatalog;
use voxel_core::config::WorldConfig;
use voxel_core::streaming::StreamingManager;
use voxel_core::voxels::Block;

const TICKS: u32 = 240;
const TICK_SECONDS: f32 = 1.0 / 60.0;
const ANCHOR_SPEED: f32 = 24.0;

fn main() -> Result<(), Box<dyn Error>> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    let config = WorldConfig::default();
    let catalog = BlockCatalog::with_defaults();
    let mut streaming = StreamingManager::new(config, catalog)?;

    let mut quads_delivered = 0usize;
    for tick in 0..TICKS {
        let distance = tick as f32 * TICK_SECONDS * ANCHOR_SPEED;
        let anchor = Point3::new(distance, 80.0, distance * 0.5);
        streaming.tick(anchor, TICK_SECONDS);

        for (_, mesh) in streaming.take_ready_meshes() {
            quads_delivered += mesh.quad_count();
        }

        if tick % 60 == 0 {
            let stats = streaming.stats();
            info!(
                "tick {}: {} resident, {} pooled, {} awaiting generation, {} awaiting mesh",
                stats.ticks,
                stats.resident,
                stats.pooled,
                stats.pending_generation,
                stats.pending_mesh
            );
        }
    }

    // A gameplay-style edit: knock the surface block out of a column near
    // the anchor path and let the next tick remesh the chunk.
    let surface = streaming.config().terrain.base_height;
    streaming.set_block_at(4, surface, 4, Block::EMPTY);
    streaming.tick(Point3::new(96.0, 80.0, 48.0), TICK_SECONDS);
    for (coord, mesh) in streaming.take_ready_meshes() {
        info!(
            "rebuilt chunk ({}, {}): {} quads",
            coord.x,
            coord.y,
            mesh.quad_count()
        );
        quads_delivered += mesh.quad_count();
    }

    let stats = streaming.stats();
    info!(
        "done after {} ticks: {} quads delivered, {} chunks resident",
        stats.ticks, quads_delivered, stats.resident
    );

    streaming.shutdown();
    Ok(())
}
