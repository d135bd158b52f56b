//! Mesh data structures handed to the external renderer and collider.
//!
//! A `ChunkMesh` is plain geometry: interleaved vertices (position, normal,
//! UV) and a triangle index buffer. Each delivered mesh replaces whatever
//! geometry the consumer previously held for the same chunk coordinate.

/// One mesh vertex in chunk-local space.
///
/// # Memory Layout
/// `#[repr(C)]` plus the `Pod` derive let a vertex slice be uploaded to a GPU
/// buffer byte-for-byte.
#[repr(C)]
#[derive(Copy, Clone, PartialEq, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Position in chunk-local block units.
    pub position: [f32; 3],
    /// Unit face normal.
    pub normal: [f32; 3],
    /// Texture atlas coordinate.
    pub uv: [f32; 2],
}

impl MeshVertex {
    /// Creates a vertex from its components.
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        MeshVertex {
            position,
            normal,
            uv,
        }
    }
}

/// The renderable surface extracted from one chunk.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct ChunkMesh {
    /// Vertex buffer, four vertices per emitted quad.
    pub vertices: Vec<MeshVertex>,
    /// Index buffer, six indices (two triangles) per emitted quad.
    pub indices: Vec<u32>,
}

impl ChunkMesh {
    /// Creates an empty mesh. Delivering an empty mesh for a coordinate
    /// tells the consumer to drop that chunk's geometry.
    pub fn new() -> Self {
        ChunkMesh::default()
    }

    /// Whether the mesh contains no geometry.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The number of quads in the mesh.
    pub fn quad_count(&self) -> usize {
        self.indices.len() / 6
    }

    /// Appends one rectangular face.
    ///
    /// The four corners are `origin`, `origin + du`, `origin + du + dv`, and
    /// `origin + dv`. For an outward face (`outward == true`) they are
    /// emitted in that order, which winds counter-clockwise when viewed from
    /// along `du × dv`; for an inward face the order is reversed so
    /// front-face culling keeps the visible side.
    ///
    /// # Arguments
    /// * `origin` - The corner of the rectangle at the face plane
    /// * `du`, `dv` - The rectangle's edge vectors
    /// * `normal` - The unit face normal
    /// * `outward` - Whether the face looks along the positive sweep axis
    /// * `uv_origin` - Atlas cell origin for the face's block type
    /// * `uv_size` - Atlas cell side length
    pub fn push_quad(
        &mut self,
        origin: [f32; 3],
        du: [f32; 3],
        dv: [f32; 3],
        normal: [f32; 3],
        outward: bool,
        uv_origin: [f32; 2],
        uv_size: f32,
    ) {
        let corner = |a: bool, b: bool| {
            [
                origin[0] + if a { du[0] } else { 0.0 } + if b { dv[0] } else { 0.0 },
                origin[1] + if a { du[1] } else { 0.0 } + if b { dv[1] } else { 0.0 },
                origin[2] + if a { du[2] } else { 0.0 } + if b { dv[2] } else { 0.0 },
            ]
        };
        let uv = |s: f32, t: f32| [uv_origin[0] + s * uv_size, uv_origin[1] + t * uv_size];

        let base = self.vertices.len() as u32;
        let corners = if outward {
            [corner(false, false), corner(true, false), corner(true, true), corner(false, true)]
        } else {
            [corner(false, false), corner(false, true), corner(true, true), corner(true, false)]
        };
        let uvs = [uv(0.0, 0.0), uv(1.0, 0.0), uv(1.0, 1.0), uv(0.0, 1.0)];

        for (position, uv) in corners.into_iter().zip(uvs) {
            self.vertices.push(MeshVertex::new(position, normal, uv));
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}
