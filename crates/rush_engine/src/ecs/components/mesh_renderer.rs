//! Mesh renderer component

use crate::assets::{MaterialHandle, MeshHandle};
use crate::ecs::Component;

/// Marks an entity as drawable
///
/// Holds lookup handles into the asset cache only. The cache owns the mesh and
/// the material; a handle that outlives them fails to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshRendererComponent {
    /// Geometry to draw
    pub mesh: MeshHandle,
    /// Shading state to draw it with
    pub material: MaterialHandle,
}

impl Component for MeshRendererComponent {}

impl MeshRendererComponent {
    /// Create a mesh renderer
    pub fn new(mesh: MeshHandle, material: MaterialHandle) -> Self {
        Self { mesh, material }
    }
}
