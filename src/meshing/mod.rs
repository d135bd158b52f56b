//! # Meshing Module
//!
//! Greedy surface extraction: reduces a chunk's exposed block faces to a
//! minimal set of axis-aligned rectangles, independently for the six
//! cardinal directions.
//!
//! ## Algorithm
//!
//! For each of the three axes, a plane index sweeps the chunk from just
//! outside the negative boundary to the positive one. At every plane
//! position a 2D face mask is built by comparing the solidity of the two
//! blocks the plane separates: a face exists exactly where one side is
//! solid and the other is not. The mask stores `+id` when the solid side is
//! on the near plane (an outward face) and `-id` when it is on the far plane
//! (an inward face). The mask is then merged into maximal rectangles and one
//! quad is emitted per rectangle.
//!
//! ## Boundary Convention
//!
//! Positions outside the chunk extents are treated as empty, so faces are
//! always emitted at a chunk's own outer boundary regardless of what the
//! neighboring chunk holds. Where two solid chunks meet this produces
//! back-to-back geometry along the seam; the behavior is deliberate, since
//! it keeps each chunk's mesh a pure function of that chunk alone.
//!
//! Cost is O(volume) per chunk per rebuild, and rebuilds happen only for
//! chunks flagged dirty.

pub mod greedy;
pub mod mesh;

pub use mesh::{ChunkMesh, MeshVertex};

use bitvec::vec::BitVec;

use crate::catalog::BlockCatalog;
use crate::config::AtlasLayout;
use crate::voxels::ChunkStore;

use self::greedy::{merge_mask, MaskRect};

/// Extracts the merged surface mesh of one chunk.
///
/// Pure with respect to its inputs: the same chunk contents, catalog, and
/// atlas always produce the identical mesh. The chunk's `dirty` flag is not
/// touched here; scheduling is the streaming manager's concern.
///
/// # Arguments
/// * `chunk` - The chunk store to extract surfaces from
/// * `catalog` - Consulted for block solidity only
/// * `atlas` - Fixed-cell atlas layout keyed by block type id
pub fn build_chunk_mesh(
    chunk: &ChunkStore,
    catalog: &BlockCatalog,
    atlas: &AtlasLayout,
) -> ChunkMesh {
    let dims = chunk.extents().as_array();
    let solid = solidity_mask(chunk, catalog);

    let mut mesh = ChunkMesh::new();
    let mut rects: Vec<MaskRect> = Vec::new();

    for axis in 0..3 {
        let axis_u = (axis + 1) % 3;
        let axis_v = (axis + 2) % 3;
        let size_u = dims[axis_u] as usize;
        let size_v = dims[axis_v] as usize;
        let mut mask = vec![0i32; size_u * size_v];

        for plane in -1..dims[axis] {
            let mut cell = [0i32; 3];
            let mut n = 0;
            for v in 0..dims[axis_v] {
                cell[axis_v] = v;
                for u in 0..dims[axis_u] {
                    cell[axis_u] = u;

                    cell[axis] = plane;
                    let near_solid =
                        plane >= 0 && solid[chunk.index(cell[0], cell[1], cell[2])];
                    cell[axis] = plane + 1;
                    let far_solid = plane + 1 < dims[axis]
                        && solid[chunk.index(cell[0], cell[1], cell[2])];

                    mask[n] = if near_solid == far_solid {
                        0
                    } else if near_solid {
                        cell[axis] = plane;
                        chunk.block(cell[0], cell[1], cell[2]).id as i32
                    } else {
                        -(chunk.block(cell[0], cell[1], cell[2]).id as i32)
                    };
                    n += 1;
                }
            }

            merge_mask(&mut mask, size_u, size_v, &mut rects);
            for rect in &rects {
                emit_rect(&mut mesh, atlas, axis, axis_u, axis_v, plane, rect);
            }
        }
    }

    mesh
}

/// Precomputes one solidity bit per block so the sweep compares bits instead
/// of repeating catalog lookups for every pair of cells.
fn solidity_mask(chunk: &ChunkStore, catalog: &BlockCatalog) -> BitVec {
    let mut solid = BitVec::repeat(false, chunk.blocks().len());
    for (index, block) in chunk.blocks().iter().enumerate() {
        if catalog.is_solid(block.id) {
            solid.set(index, true);
        }
    }
    solid
}

/// Emits one merged rectangle as a quad at the slice above `plane`.
fn emit_rect(
    mesh: &mut ChunkMesh,
    atlas: &AtlasLayout,
    axis: usize,
    axis_u: usize,
    axis_v: usize,
    plane: i32,
    rect: &MaskRect,
) {
    let outward = rect.value > 0;
    let id = rect.value.unsigned_abs() as u16;

    let mut origin = [0.0f32; 3];
    origin[axis] = (plane + 1) as f32;
    origin[axis_u] = rect.u as f32;
    origin[axis_v] = rect.v as f32;

    let mut du = [0.0f32; 3];
    du[axis_u] = rect.width as f32;
    let mut dv = [0.0f32; 3];
    dv[axis_v] = rect.height as f32;

    let mut normal = [0.0f32; 3];
    normal[axis] = if outward { 1.0 } else { -1.0 };

    mesh.push_quad(
        origin,
        du,
        dv,
        normal,
        outward,
        atlas.cell_origin(id),
        atlas.cell_size,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BlockCatalog;
    use crate::voxels::{Block, ChunkExtents};

    fn atlas() -> AtlasLayout {
        AtlasLayout::default()
    }

    fn extents() -> ChunkExtents {
        ChunkExtents::new(4, 6, 4)
    }

    /// Counts exposed unit faces the naive way: one per solid block side
    /// whose neighbor is not solid.
    fn naive_face_count(chunk: &ChunkStore, catalog: &BlockCatalog) -> usize {
        let e = chunk.extents();
        let mut faces = 0;
        for z in 0..e.depth {
            for y in 0..e.height {
                for x in 0..e.width {
                    if !catalog.is_solid(chunk.block(x, y, z).id) {
                        continue;
                    }
                    for (dx, dy, dz) in
                        [(1, 0, 0), (-1, 0, 0), (0, 1, 0), (0, -1, 0), (0, 0, 1), (0, 0, -1)]
                    {
                        if !catalog.is_solid(chunk.block(x + dx, y + dy, z + dz).id) {
                            faces += 1;
                        }
                    }
                }
            }
        }
        faces
    }

    /// Sums quad areas from vertex positions: each quad's corners adjacent
    /// to its first vertex span its two edges.
    fn total_quad_area(mesh: &ChunkMesh) -> f32 {
        let length = |a: [f32; 3], b: [f32; 3]| {
            ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2) + (b[2] - a[2]).powi(2)).sqrt()
        };
        mesh.vertices
            .chunks_exact(4)
            .map(|quad| {
                length(quad[0].position, quad[1].position)
                    * length(quad[0].position, quad[3].position)
            })
            .sum()
    }

    #[test]
    fn empty_chunk_produces_no_quads() {
        let chunk = ChunkStore::new(extents());
        let mesh = build_chunk_mesh(&chunk, &BlockCatalog::with_defaults(), &atlas());
        assert!(mesh.is_empty());
    }

    #[test]
    fn fully_solid_chunk_produces_exactly_six_quads() {
        let catalog = BlockCatalog::with_defaults();
        let chunk = ChunkStore::solid(extents(), Block::new(1));
        let mesh = build_chunk_mesh(&chunk, &catalog, &atlas());

        assert_eq!(mesh.quad_count(), 6);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);

        // One maximal face per cardinal direction.
        let mut normals: Vec<[f32; 3]> = mesh
            .vertices
            .chunks_exact(4)
            .map(|quad| quad[0].normal)
            .collect();
        normals.sort_by(|a, b| a.partial_cmp(b).unwrap());
        normals.dedup();
        assert_eq!(normals.len(), 6);
    }

    #[test]
    fn adjacent_same_type_blocks_share_merged_faces() {
        let catalog = BlockCatalog::with_defaults();
        let mut chunk = ChunkStore::new(extents());
        chunk.set_block(1, 2, 1, Block::new(1));
        chunk.set_block(2, 2, 1, Block::new(1));

        let mesh = build_chunk_mesh(&chunk, &catalog, &atlas());

        // A 2x1x1 bar still has six rectangular faces.
        assert_eq!(mesh.quad_count(), 6);
    }

    #[test]
    fn adjacent_blocks_of_different_types_do_not_merge() {
        let catalog = BlockCatalog::with_defaults();
        let mut chunk = ChunkStore::new(extents());
        chunk.set_block(1, 2, 1, Block::new(1));
        chunk.set_block(2, 2, 1, Block::new(2));

        let mesh = build_chunk_mesh(&chunk, &catalog, &atlas());

        // Five exposed faces each; the shared interface emits nothing.
        assert_eq!(mesh.quad_count(), 10);
    }

    #[test]
    fn non_solid_blocks_emit_no_faces() {
        let catalog = BlockCatalog::with_defaults();
        // Id 4 is water (registered, not solid); id 900 is unregistered.
        let mut chunk = ChunkStore::new(extents());
        chunk.set_block(0, 0, 0, Block::new(4));
        chunk.set_block(1, 0, 0, Block::new(900));

        let mesh = build_chunk_mesh(&chunk, &catalog, &atlas());
        assert!(mesh.is_empty());
    }

    #[test]
    fn checkerboard_matches_the_naive_face_count() {
        let catalog = BlockCatalog::with_defaults();
        let chunk = ChunkStore::checkerboard(extents(), Block::new(1));
        let mesh = build_chunk_mesh(&chunk, &catalog, &atlas());

        // The worst case: nothing merges, so the quad count equals the
        // per-voxel face count.
        assert_eq!(mesh.quad_count(), naive_face_count(&chunk, &catalog));
    }

    #[test]
    fn merged_quads_cover_exactly_the_exposed_faces() {
        let catalog = BlockCatalog::with_defaults();
        let chunk = ChunkStore::scattered(extents(), Block::new(2), 0.4);
        let mesh = build_chunk_mesh(&chunk, &catalog, &atlas());

        let naive = naive_face_count(&chunk, &catalog);
        assert!(mesh.quad_count() <= naive);
        assert_eq!(total_quad_area(&mesh).round() as usize, naive);
    }

    #[test]
    fn rebuilding_an_unchanged_chunk_is_idempotent() {
        let catalog = BlockCatalog::with_defaults();
        let chunk = ChunkStore::scattered(extents(), Block::new(1), 0.3);

        let first = build_chunk_mesh(&chunk, &catalog, &atlas());
        let second = build_chunk_mesh(&chunk, &catalog, &atlas());
        assert_eq!(first, second);
    }

    #[test]
    fn boundary_faces_are_emitted_without_neighbor_lookups() {
        let catalog = BlockCatalog::with_defaults();
        let e = ChunkExtents::new(2, 2, 2);
        let chunk = ChunkStore::solid(e, Block::new(1));
        let mesh = build_chunk_mesh(&chunk, &catalog, &atlas());

        // Every outer face of the cube is present even though a neighboring
        // chunk might be solid there.
        assert_eq!(mesh.quad_count(), 6);
        assert_eq!(total_quad_area(&mesh).round() as usize, 24);
    }
}
