//! Mesh data and GPU mesh handles
//!
//! [`MeshData`] is CPU-side geometry; [`Mesh`] is the uploaded, immutable
//! GPU resource whose only operation is [`Mesh::draw`].

use bytemuck::{Pod, Zeroable};

use crate::foundation::math::constants::PI;
use crate::render::api::{BackendResult, GraphicsBackend, MeshId};
use crate::render::RenderError;

/// Vertex data structure
///
/// Layout matches the vertex attribute bindings of the shipped shaders:
/// location 0 position, 1 color, 2 tex_coord, 3 normal.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in model space
    pub position: [f32; 3],
    /// Vertex color (RGBA8, normalized on the GPU)
    pub color: [u8; 4],
    /// Texture coordinate
    pub tex_coord: [f32; 2],
    /// Surface normal in model space
    pub normal: [f32; 3],
}

impl Vertex {
    /// White vertex
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self {
            position,
            color: [255, 255, 255, 255],
            tex_coord,
            normal,
        }
    }
}

/// CPU-side indexed triangle list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex data
    pub vertices: Vec<Vertex>,
    /// Triangle indices, three per face
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Create mesh data from raw parts
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Number of indices drawn
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Unit cube centred on the origin, four vertices per face
    pub fn cube() -> Self {
        // (normal, tangent u, tangent v) per face
        let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ];
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, u, v) in faces {
            let base = u32::try_from(vertices.len()).unwrap_or(u32::MAX);
            for (su, sv) in corners {
                let position = [
                    0.5 * (normal[0] + su * u[0] + sv * v[0]),
                    0.5 * (normal[1] + su * u[1] + sv * v[1]),
                    0.5 * (normal[2] + su * u[2] + sv * v[2]),
                ];
                let tex_coord = [(su + 1.0) * 0.5, (sv + 1.0) * 0.5];
                vertices.push(Vertex::new(position, normal, tex_coord));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
        }

        Self { vertices, indices }
    }

    /// Unit quad in the XY plane facing +Z
    pub fn quad() -> Self {
        let normal = [0.0, 0.0, 1.0];
        let vertices = vec![
            Vertex::new([-0.5, -0.5, 0.0], normal, [0.0, 0.0]),
            Vertex::new([0.5, -0.5, 0.0], normal, [1.0, 0.0]),
            Vertex::new([0.5, 0.5, 0.0], normal, [1.0, 1.0]),
            Vertex::new([-0.5, 0.5, 0.0], normal, [0.0, 1.0]),
        ];
        Self { vertices, indices: vec![0, 1, 2, 2, 3, 0] }
    }

    /// Unit plane in the XZ plane facing +Y
    pub fn plane() -> Self {
        let normal = [0.0, 1.0, 0.0];
        let vertices = vec![
            Vertex::new([-0.5, 0.0, 0.5], normal, [0.0, 0.0]),
            Vertex::new([0.5, 0.0, 0.5], normal, [1.0, 0.0]),
            Vertex::new([0.5, 0.0, -0.5], normal, [1.0, 1.0]),
            Vertex::new([-0.5, 0.0, -0.5], normal, [0.0, 1.0]),
        ];
        Self { vertices, indices: vec![0, 1, 2, 2, 3, 0] }
    }

    /// UV sphere of radius 1
    ///
    /// `segments` slices around Y, `rings` stacks from pole to pole.
    #[allow(clippy::cast_precision_loss)]
    pub fn sphere(segments: u32, rings: u32) -> Self {
        let segments = segments.max(3);
        let rings = rings.max(2);

        let mut vertices = Vec::with_capacity(((segments + 1) * (rings + 1)) as usize);
        for ring in 0..=rings {
            let v = ring as f32 / rings as f32;
            let phi = v * PI;
            for segment in 0..=segments {
                let u = segment as f32 / segments as f32;
                let theta = u * 2.0 * PI;
                let normal = [phi.sin() * theta.cos(), phi.cos(), -phi.sin() * theta.sin()];
                vertices.push(Vertex::new(normal, normal, [u, 1.0 - v]));
            }
        }

        let stride = segments + 1;
        let mut indices = Vec::with_capacity((segments * rings * 6) as usize);
        for ring in 0..rings {
            for segment in 0..segments {
                let current = ring * stride + segment;
                let below = current + stride;
                indices.extend_from_slice(&[current, below, current + 1, current + 1, below, below + 1]);
            }
        }

        Self { vertices, indices }
    }
}

/// GPU-resident mesh
///
/// Immutable after upload. Owned by the asset cache; render commands refer to
/// it through a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mesh {
    id: MeshId,
    index_count: u32,
}

impl Mesh {
    /// Upload mesh data to the backend
    pub fn upload(data: &MeshData, gpu: &mut dyn GraphicsBackend) -> BackendResult<Self> {
        let index_count = u32::try_from(data.indices.len())
            .map_err(|_| RenderError::ResourceCreationFailed("mesh has too many indices".to_string()))?;
        let id = gpu.create_mesh(&data.vertices, &data.indices)?;
        log::debug!("Uploaded mesh {:?}: {} vertices, {} indices", id, data.vertices.len(), index_count);
        Ok(Self { id, index_count })
    }

    /// Backend name
    pub fn id(&self) -> MeshId {
        self.id
    }

    /// Number of indices drawn
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Bind the buffers and issue the indexed draw
    pub fn draw(&self, gpu: &mut dyn GraphicsBackend) {
        gpu.draw_mesh(self.id, self.index_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 36);
        let vertex = Vertex::new([1.0, 2.0, 3.0], [0.0, 1.0, 0.0], [0.5, 0.5]);
        assert_eq!(bytemuck::bytes_of(&vertex).len(), 36);
    }

    #[test]
    fn test_cube_topology() {
        let cube = MeshData::cube();
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.index_count(), 36);
        assert!(cube.vertices.iter().all(|v| v.position.iter().all(|c| c.abs() <= 0.5 + 1e-6)));
    }

    #[test]
    fn test_sphere_indices_in_range() {
        let sphere = MeshData::sphere(12, 8);
        let vertex_count = u32::try_from(sphere.vertices.len()).unwrap();

        assert_eq!(sphere.index_count(), 12 * 8 * 6);
        assert!(sphere.indices.iter().all(|&index| index < vertex_count));
        for vertex in &sphere.vertices {
            let length = vertex.position.iter().map(|c| c * c).sum::<f32>().sqrt();
            assert!((length - 1.0).abs() < 1e-5);
        }
    }
}
